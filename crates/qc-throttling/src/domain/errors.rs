//! Error types for the message throttler

use shared_types::NodeId;
use thiserror::Error;

/// Errors from `acquire`/`release`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ThrottleError {
    /// Not enough bytes in the pools this node may draw from. Transient:
    /// back-pressure the peer and retry after releases.
    #[error("Byte budget exhausted for {node_id}: requested {requested}, available {available}")]
    Exhausted {
        node_id: NodeId,
        requested: u64,
        available: u64,
    },

    /// Releasing more than the node holds. The caller's accounting is broken.
    #[error("Over-release by {node_id}: releasing {requested}, outstanding {outstanding}")]
    OverRelease {
        node_id: NodeId,
        requested: u64,
        outstanding: u64,
    },

    #[error("Acquire cancelled for {0}")]
    Cancelled(NodeId),
}

/// Throttler configuration errors. Fatal at setup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Invalid throttler parameters: {0}")]
    InvalidParameters(String),
}
