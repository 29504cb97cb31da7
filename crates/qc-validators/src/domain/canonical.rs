//! # Canonical Validator Ordering
//!
//! Deterministic projection of a validator snapshot onto signer positions.
//!
//! Validators sharing a BLS public key collapse into one entry whose weight
//! is the sum of theirs. Entries are ordered by compressed public key bytes,
//! so every node holding the same snapshot assigns the same bit position to
//! the same signer.
//!
//! Validators without a key cannot sign. They are left out of the entries
//! but their weight still counts toward the total the quorum is measured
//! against.
//!
//! A snapshot naming the same node twice is malformed and rejected.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use shared_crypto::BlsPublicKey;
use shared_types::NodeId;

use super::errors::{ValidatorError, ValidatorResult};
use super::validator::ValidatorOutput;

/// One signer position in the canonical ordering.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalValidator {
    pub public_key: BlsPublicKey,
    pub weight: u64,
    /// Every node registered under `public_key`, ascending.
    pub node_ids: Vec<NodeId>,
}

/// Ordered signer positions plus the total weight of the snapshot.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalValidatorSet {
    validators: Vec<CanonicalValidator>,
    total_weight: u64,
}

impl CanonicalValidatorSet {
    /// Number of signer positions
    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    /// Weight of the whole snapshot, signers or not.
    pub fn total_weight(&self) -> u64 {
        self.total_weight
    }

    pub fn get(&self, index: usize) -> Option<&CanonicalValidator> {
        self.validators.get(index)
    }

    pub fn validators(&self) -> &[CanonicalValidator] {
        &self.validators
    }

    pub fn iter(&self) -> impl Iterator<Item = &CanonicalValidator> {
        self.validators.iter()
    }

    /// Signer position of the entry `node_id` belongs to.
    pub fn position_of(&self, node_id: &NodeId) -> Option<usize> {
        self.validators
            .iter()
            .position(|v| v.node_ids.binary_search(node_id).is_ok())
    }

    /// Signer position of `public_key`.
    pub fn position_of_key(&self, public_key: &BlsPublicKey) -> Option<usize> {
        self.validators
            .binary_search_by(|v| v.public_key.cmp(public_key))
            .ok()
    }
}

/// Canonicalize a validator snapshot.
///
/// # Errors
/// * `DuplicateIdentity` if a node appears more than once
/// * `WeightOverflow` if the snapshot's weights do not fit in `u64`
pub fn canonicalize(snapshot: &[ValidatorOutput]) -> ValidatorResult<CanonicalValidatorSet> {
    let mut total_weight = 0u64;
    let mut by_key: BTreeMap<BlsPublicKey, CanonicalValidator> = BTreeMap::new();
    let mut seen: HashSet<NodeId> = HashSet::with_capacity(snapshot.len());

    for v in snapshot {
        if !seen.insert(v.node_id) {
            return Err(ValidatorError::DuplicateIdentity(v.node_id));
        }
        total_weight = total_weight
            .checked_add(v.weight)
            .ok_or(ValidatorError::WeightOverflow {
                current: total_weight,
                delta: v.weight,
            })?;

        let Some(public_key) = &v.public_key else {
            continue;
        };

        let entry = by_key
            .entry(public_key.clone())
            .or_insert_with(|| CanonicalValidator {
                public_key: public_key.clone(),
                weight: 0,
                node_ids: Vec::new(),
            });
        entry.weight = entry
            .weight
            .checked_add(v.weight)
            .ok_or(ValidatorError::WeightOverflow {
                current: entry.weight,
                delta: v.weight,
            })?;
        entry.node_ids.push(v.node_id);
    }

    let validators = by_key
        .into_values()
        .map(|mut v| {
            v.node_ids.sort_unstable();
            v
        })
        .collect();

    Ok(CanonicalValidatorSet {
        validators,
        total_weight,
    })
}

/// Canonicalize, requiring every named participant present in the snapshot
/// to have a public key.
///
/// # Errors
/// * `MissingPublicKey` for the first participant found without a key
/// * `WeightOverflow` as for [`canonicalize`]
pub fn canonicalize_for(
    snapshot: &[ValidatorOutput],
    participants: &[NodeId],
) -> ValidatorResult<CanonicalValidatorSet> {
    for participant in participants {
        let keyless = snapshot
            .iter()
            .any(|v| v.node_id == *participant && v.public_key.is_none());
        if keyless {
            return Err(ValidatorError::MissingPublicKey(*participant));
        }
    }
    canonicalize(snapshot)
}
