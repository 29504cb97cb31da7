//! Error types for the validator set and canonical ordering

use shared_types::NodeId;
use thiserror::Error;

/// Validator set error types
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidatorError {
    #[error("Validator already in set: {0}")]
    DuplicateIdentity(NodeId),

    #[error("Unknown validator: {0}")]
    UnknownIdentity(NodeId),

    #[error("Zero weight for validator: {0}")]
    ZeroWeight(NodeId),

    #[error("Weight overflow: {current} + {delta} exceeds u64")]
    WeightOverflow { current: u64, delta: u64 },

    #[error("Insufficient stake on {node_id}: has {weight}, asked to remove {requested}")]
    InsufficientStake {
        node_id: NodeId,
        weight: u64,
        requested: u64,
    },

    #[error("Validator has no registered public key: {0}")]
    MissingPublicKey(NodeId),

    #[error("Cached total weight {cached} differs from scanned sum {scanned}")]
    TotalWeightMismatch { cached: u64, scanned: u64 },

    #[error("Lookup table has {entries} entries for {slots} slots")]
    CorruptLookup { entries: usize, slots: usize },

    /// Slot bookkeeping disagrees with the lookup table. Always a bug.
    #[error("Position index corrupted for {node_id}: lookup says {indexed}, slot says {stored}")]
    CorruptPosition {
        node_id: NodeId,
        indexed: usize,
        stored: usize,
    },
}

/// Result type for validator set operations
pub type ValidatorResult<T> = Result<T, ValidatorError>;
