//! # Signature Forgery
//!
//! Attempts to pass a warp message with less stake than the quorum, by
//! inflating the signer bitset or padding it.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use qc_warp::{BitSetSignature, QuorumConfig, SignerBitSet, WarpError, WarpVerifier};

    use crate::fixtures::{node, Subnet};

    fn verifier(subnet: &Subnet) -> WarpVerifier<node_runtime::ScopeRegistry> {
        WarpVerifier::new(Arc::clone(&subnet.registry), QuorumConfig::new(2, 3).unwrap()).unwrap()
    }

    #[tokio::test]
    async fn test_claiming_non_signers_fails() {
        let subnet = Subnet::with_weights(&[10, 20, 70]);
        let message = subnet.message(b"mint 1000");
        let mut signature = subnet.attest(&message, &[node(1)]);

        // claim every validator while only the lightest signed
        let mut all = SignerBitSet::new(3);
        for i in 0..3 {
            all.insert(i).unwrap();
        }
        signature.signers = all.to_bytes();

        assert_eq!(
            verifier(&subnet).verify(&message, &signature, 1).await,
            Err(WarpError::InvalidSignature)
        );
    }

    #[tokio::test]
    async fn test_padded_bitset_rejected() {
        let subnet = Subnet::with_weights(&[10, 20, 70]);
        let message = subnet.message(b"payload");
        let mut signature = subnet.attest(&message, &[node(2), node(3)]);
        signature.signers.insert(0, 0x00);

        let err = verifier(&subnet)
            .verify(&message, &signature, 1)
            .await
            .unwrap_err();
        assert!(matches!(err, WarpError::InvalidBitset(_)));
        assert!(err.is_integrity_error());
    }

    #[tokio::test]
    async fn test_bit_past_signer_count_rejected() {
        let subnet = Subnet::with_weights(&[10, 20, 70]);
        let message = subnet.message(b"payload");
        let mut signature = subnet.attest(&message, &[node(2), node(3)]);
        signature.signers[0] |= 0x80;

        assert!(matches!(
            verifier(&subnet).verify(&message, &signature, 1).await,
            Err(WarpError::InvalidBitset(_))
        ));
    }

    #[tokio::test]
    async fn test_empty_bitset_rejected() {
        let subnet = Subnet::with_weights(&[10, 20, 70]);
        let message = subnet.message(b"payload");
        let signature = BitSetSignature::new(vec![0x00], [0u8; 96]);

        assert!(matches!(
            verifier(&subnet).verify(&message, &signature, 1).await,
            Err(WarpError::InsufficientWeight { sig_weight: 0, .. })
        ));
    }

    #[tokio::test]
    async fn test_replay_on_other_network_fails() {
        let subnet = Subnet::with_weights(&[10, 20, 70]);
        let message = subnet.message(b"payload");
        let signature = subnet.attest(&message, &[node(2), node(3)]);

        let mut replayed = message.clone();
        replayed.network_id += 1;
        assert_eq!(
            verifier(&subnet).verify(&replayed, &signature, 1).await,
            Err(WarpError::InvalidSignature)
        );
    }

    #[tokio::test]
    async fn test_shared_key_weight_merges_into_one_position() {
        let subnet = Subnet::with_weights(&[10, 20]);
        // a second node registers the heavy signer's key
        let (_, heavy) = &subnet.signers[1];
        subnet
            .scope
            .validators
            .add(node(77), Some(heavy.public_key()), 70)
            .unwrap();
        assert_eq!(subnet.canonical().len(), 2);
        let height = subnet.next_height();

        let message = subnet.message(b"payload");
        let signature = subnet.attest(&message, &[node(2)]);
        // 20 + 70 under one key
        verifier(&subnet)
            .verify(&message, &signature, height)
            .await
            .unwrap();
    }
}
