//! # Bitset Signature
//!
//! An aggregate BLS signature plus the bitset naming which canonical signers
//! contributed to it.
//!
//! ## Verification order
//!
//! 1. Decode the bitset against the canonical length
//! 2. Sum the signers' weight and check it against the quorum
//! 3. Parse the aggregate signature
//! 4. Aggregate the signers' public keys and verify over the message bytes
//!
//! The weight check runs before any curve operation, so an under-weight
//! claim is refused without pairing work.

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, Bytes};
use shared_crypto::{BlsPublicKey, BlsSignature, SIGNATURE_LEN};

use qc_validators::{CanonicalValidator, CanonicalValidatorSet};

use super::bitset::SignerBitSet;
use super::errors::{WarpError, WarpResult};
use super::message::UnsignedMessage;
use super::quorum::verify_weight;

/// Aggregate signature over an [`UnsignedMessage`].
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BitSetSignature {
    /// Big-endian signer bitset over the canonical ordering.
    pub signers: Vec<u8>,
    #[serde_as(as = "Bytes")]
    pub signature: [u8; SIGNATURE_LEN],
}

impl BitSetSignature {
    pub fn new(signers: Vec<u8>, signature: [u8; SIGNATURE_LEN]) -> Self {
        Self { signers, signature }
    }

    /// Combine individual signatures, each tagged with its signer's canonical
    /// position.
    pub fn aggregate<I>(canonical: &CanonicalValidatorSet, signatures: I) -> WarpResult<Self>
    where
        I: IntoIterator<Item = (usize, BlsSignature)>,
    {
        let mut bitset = SignerBitSet::new(canonical.len());
        let mut collected = Vec::new();
        for (index, signature) in signatures {
            if bitset.contains(index) {
                return Err(WarpError::InvalidBitset(format!(
                    "signer {index} appears twice"
                )));
            }
            bitset.insert(index)?;
            collected.push(signature);
        }
        if collected.is_empty() {
            return Err(WarpError::NoSigners);
        }
        let aggregate = BlsSignature::aggregate(&collected).map_err(WarpError::Aggregation)?;
        Ok(Self {
            signers: bitset.to_bytes(),
            signature: aggregate.to_bytes(),
        })
    }

    /// Decode the signer bitset against `canonical`.
    pub fn signer_set(&self, canonical: &CanonicalValidatorSet) -> WarpResult<SignerBitSet> {
        SignerBitSet::from_bytes(&self.signers, canonical.len())
    }

    /// Verify against an already canonicalized validator set.
    pub fn verify_canonical(
        &self,
        message: &UnsignedMessage,
        canonical: &CanonicalValidatorSet,
        quorum_num: u64,
        quorum_den: u64,
    ) -> WarpResult<()> {
        if quorum_den == 0 || quorum_num == 0 || quorum_num > quorum_den {
            return Err(WarpError::InvalidQuorum {
                num: quorum_num,
                den: quorum_den,
            });
        }

        let bitset = self.signer_set(canonical)?;
        let signers: Vec<&CanonicalValidator> =
            bitset.iter().filter_map(|i| canonical.get(i)).collect();

        // a subset of a checked total cannot overflow
        let sig_weight: u64 = signers.iter().map(|v| v.weight).sum();
        verify_weight(sig_weight, canonical.total_weight(), quorum_num, quorum_den)?;
        if signers.is_empty() {
            return Err(WarpError::NoSigners);
        }

        let signature =
            BlsSignature::from_bytes(&self.signature).map_err(WarpError::ParseSignature)?;
        let aggregate_key = BlsPublicKey::aggregate(signers.iter().map(|v| &v.public_key))
            .map_err(WarpError::Aggregation)?;

        if !aggregate_key.verify(&message.bytes()?, &signature) {
            return Err(WarpError::InvalidSignature);
        }
        Ok(())
    }
}
