//! # Error Types
//!
//! Errors shared across the trust components.

use thiserror::Error;

/// Failure to build an identifier from external input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdParseError {
    /// Decoded input has the wrong width.
    #[error("Invalid identifier length: expected {expected} bytes, got {actual}")]
    Length { expected: usize, actual: usize },

    /// Input is not valid hex.
    #[error("Invalid identifier hex: {0}")]
    Hex(String),
}
