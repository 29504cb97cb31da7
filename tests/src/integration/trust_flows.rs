//! # Trust Flows
//!
//! Inbound message → throttler admission → warp verification, over one
//! subnet wired through the node runtime's scope registry.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use qc_throttling::{AdmissionState, ThrottleError};
    use qc_warp::{QuorumConfig, WarpError, WarpVerifier};
    use tokio_util::sync::CancellationToken;

    use crate::fixtures::{node, Subnet, CHAIN};

    #[tokio::test]
    async fn test_admitted_message_verified_at_quorum() {
        let subnet = Subnet::with_weights(&[10, 20, 70]);
        let verifier =
            WarpVerifier::new(Arc::clone(&subnet.registry), QuorumConfig::new(2, 3).unwrap())
                .unwrap();

        let message = subnet.message(b"cross-chain transfer");
        let signature = subnet.attest(&message, &[node(2), node(3)]);

        // the sender is a validator; the message fits its share
        let permit = subnet
            .scope
            .throttler
            .acquire_permit(node(3), message.bytes().unwrap().len() as u64)
            .unwrap();
        assert_eq!(
            subnet.scope.throttler.admission_state(&node(3)),
            AdmissionState::Admitted
        );

        verifier.verify(&message, &signature, 1).await.unwrap();
        drop(permit);
        assert_eq!(
            subnet.scope.throttler.admission_state(&node(3)),
            AdmissionState::Idle
        );
    }

    #[tokio::test]
    async fn test_minority_signature_rejected() {
        let subnet = Subnet::with_weights(&[10, 20, 70]);
        let verifier =
            WarpVerifier::new(Arc::clone(&subnet.registry), QuorumConfig::new(2, 3).unwrap())
                .unwrap();
        let message = subnet.message(b"payload");
        let signature = subnet.attest(&message, &[node(1)]);

        let err = verifier.verify(&message, &signature, 1).await.unwrap_err();
        assert!(matches!(
            err,
            WarpError::InsufficientWeight {
                sig_weight: 10,
                total_weight: 100,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_keyless_stake_counts_against_quorum() {
        let subnet = Subnet::with_weights(&[30, 30]);
        // 40 weight with no signing key joins: 60 of 100 signed
        subnet.scope.validators.add(node(99), None, 40).unwrap();
        let height = subnet.next_height();
        let verifier =
            WarpVerifier::new(Arc::clone(&subnet.registry), QuorumConfig::new(2, 3).unwrap())
                .unwrap();
        let message = subnet.message(b"payload");
        let signature = subnet.attest(&message, &[node(1), node(2)]);

        assert!(matches!(
            verifier.verify(&message, &signature, height).await,
            Err(WarpError::InsufficientWeight { total_weight: 100, .. })
        ));

        let lenient =
            WarpVerifier::new(Arc::clone(&subnet.registry), QuorumConfig::new(3, 5).unwrap())
                .unwrap();
        lenient.verify(&message, &signature, height).await.unwrap();
    }

    #[tokio::test]
    async fn test_signature_invalidated_by_validator_churn() {
        let subnet = Subnet::with_weights(&[10, 20, 70]);
        let verifier =
            WarpVerifier::new(Arc::clone(&subnet.registry), QuorumConfig::default()).unwrap();
        let message = subnet.message(b"payload");
        let signature = subnet.attest(&message, &[node(2), node(3)]);
        verifier.verify(&message, &signature, 1).await.unwrap();

        // heavy stake joins at height 2: the old signers fall below quorum,
        // or the shifted positions name keys that never signed
        let newcomer = crate::fixtures::signer(50);
        subnet
            .scope
            .validators
            .add(node(50), Some(newcomer.public_key()), 200)
            .unwrap();
        let height = subnet.next_height();
        assert!(verifier.verify(&message, &signature, height).await.is_err());

        // the set as of height 1 is unchanged
        verifier.verify(&message, &signature, 1).await.unwrap();
    }

    #[tokio::test]
    async fn test_unknown_chain_and_cancel() {
        let subnet = Subnet::with_weights(&[10]);
        let verifier =
            WarpVerifier::new(Arc::clone(&subnet.registry), QuorumConfig::default()).unwrap();
        let message = subnet.message(b"payload");
        let signature = subnet.attest(&message, &[node(1)]);

        let mut foreign = message.clone();
        foreign.source_chain_id = shared_types::ChainId([0xEE; 32]);
        assert!(matches!(
            verifier.verify(&foreign, &signature, 1).await,
            Err(WarpError::UnknownSource(_))
        ));

        let token = CancellationToken::new();
        token.cancel();
        assert_eq!(
            verifier
                .verify_with_cancel(&message, &signature, 1, &token)
                .await,
            Err(WarpError::Cancelled)
        );
        assert_eq!(message.source_chain_id, CHAIN);
    }

    #[test]
    fn test_throttler_back_pressure_then_recovery() {
        let subnet = Subnet::with_weights(&[50, 50]);
        let throttler = &subnet.scope.throttler;
        // share = 1_000_000 * 50 / 100, plus the 10_000 per-node at-large cap
        throttler.acquire(node(1), 510_000).unwrap();
        assert!(matches!(
            throttler.acquire(node(1), 1),
            Err(ThrottleError::Exhausted { available: 0, .. })
        ));
        assert_eq!(
            throttler.admission_state(&node(1)),
            AdmissionState::Exhausted
        );

        // the other validator is unaffected
        throttler.acquire(node(2), 500_000).unwrap();

        throttler.release(node(1), 10_000).unwrap();
        assert!(throttler.try_acquire(node(1), 10_000));
    }
}
