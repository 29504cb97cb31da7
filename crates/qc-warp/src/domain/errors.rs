//! Error types for warp message verification

use qc_validators::{OracleError, ValidatorError};
use shared_crypto::CryptoError;
use shared_types::ChainId;
use thiserror::Error;

/// Warp verification errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WarpError {
    #[error("Unknown source chain: {0}")]
    UnknownSource(ChainId),

    #[error("Validator state query failed: {0}")]
    Oracle(#[from] OracleError),

    #[error("Canonicalization failed: {0}")]
    Canonicalization(#[from] ValidatorError),

    #[error("Invalid signer bitset: {0}")]
    InvalidBitset(String),

    #[error(
        "Insufficient weight: {quorum_num}*{total_weight} > {quorum_den}*{sig_weight}"
    )]
    InsufficientWeight {
        sig_weight: u64,
        total_weight: u64,
        quorum_num: u64,
        quorum_den: u64,
    },

    #[error("Signature claims no signers")]
    NoSigners,

    #[error("Failed to parse signature: {0}")]
    ParseSignature(CryptoError),

    #[error("Failed to aggregate: {0}")]
    Aggregation(CryptoError),

    #[error("Signature is invalid")]
    InvalidSignature,

    #[error("Invalid quorum fraction {num}/{den}")]
    InvalidQuorum { num: u64, den: u64 },

    #[error("Signer is for {expected}, message is from {actual}")]
    WrongSource { expected: ChainId, actual: ChainId },

    #[error("Signer is for network {expected}, message is for {actual}")]
    WrongNetwork { expected: u32, actual: u32 },

    #[error("Malformed message: {0}")]
    MalformedMessage(String),

    #[error("Verification cancelled")]
    Cancelled,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl WarpError {
    /// Whether the input itself is hostile or corrupt. The sender may be
    /// penalized; no other state is affected.
    pub fn is_integrity_error(&self) -> bool {
        matches!(
            self,
            WarpError::InvalidBitset(_)
                | WarpError::InsufficientWeight { .. }
                | WarpError::NoSigners
                | WarpError::ParseSignature(_)
                | WarpError::InvalidSignature
                | WarpError::MalformedMessage(_)
        )
    }

    /// Whether retrying later may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            WarpError::Oracle(OracleError::HeightNotReached { .. })
                | WarpError::Oracle(OracleError::Unavailable(_))
                | WarpError::Cancelled
        )
    }

    /// `integrity`, `transient` or `fatal`.
    pub fn class(&self) -> &'static str {
        if self.is_integrity_error() {
            "integrity"
        } else if self.is_transient() {
            "transient"
        } else {
            "fatal"
        }
    }

    /// Short stable name of the variant, for labels.
    pub fn reason(&self) -> &'static str {
        match self {
            WarpError::UnknownSource(_) => "unknown_source",
            WarpError::Oracle(_) => "oracle",
            WarpError::Canonicalization(_) => "canonicalization",
            WarpError::InvalidBitset(_) => "invalid_bitset",
            WarpError::InsufficientWeight { .. } => "insufficient_weight",
            WarpError::NoSigners => "no_signers",
            WarpError::ParseSignature(_) => "parse_signature",
            WarpError::Aggregation(_) => "aggregation",
            WarpError::InvalidSignature => "invalid_signature",
            WarpError::InvalidQuorum { .. } => "invalid_quorum",
            WarpError::WrongSource { .. } => "wrong_source",
            WarpError::WrongNetwork { .. } => "wrong_network",
            WarpError::MalformedMessage(_) => "malformed_message",
            WarpError::Cancelled => "cancelled",
            WarpError::Internal(_) => "internal",
        }
    }
}

/// Result type for warp operations
pub type WarpResult<T> = Result<T, WarpError>;
