//! Validator domain entities

use serde::{Deserialize, Serialize};
use shared_crypto::BlsPublicKey;
use shared_types::{NodeId, TxId};

/// A validator record as stored inside a [`ValidatorSet`](super::ValidatorSet).
///
/// `position` is the record's slot in the set's dense backing storage. Only
/// the set reads or writes it.
#[derive(Clone, Debug)]
pub struct Validator {
    pub node_id: NodeId,
    pub public_key: Option<BlsPublicKey>,
    pub tx_id: Option<TxId>,
    pub weight: u64,
    pub(crate) position: usize,
}

impl Validator {
    /// Public projection of this record.
    pub fn output(&self) -> ValidatorOutput {
        ValidatorOutput {
            node_id: self.node_id,
            public_key: self.public_key.clone(),
            weight: self.weight,
        }
    }
}

/// The publicly relevant values of a validator.
///
/// This is what `list()` and the validator-state oracle hand out; it has no
/// slot bookkeeping.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorOutput {
    pub node_id: NodeId,
    pub public_key: Option<BlsPublicKey>,
    pub weight: u64,
}

impl ValidatorOutput {
    pub fn new(node_id: NodeId, public_key: Option<BlsPublicKey>, weight: u64) -> Self {
        Self {
            node_id,
            public_key,
            weight,
        }
    }
}
