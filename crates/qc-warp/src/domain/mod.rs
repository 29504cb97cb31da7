//! Domain layer for warp messages
//!
//! - message: the signed byte encoding
//! - bitset: signer positions over the canonical ordering
//! - quorum: the exact stake-fraction check
//! - signature: aggregate signature verification

mod bitset;
mod errors;
mod message;
mod quorum;
mod signature;

pub use bitset::*;
pub use errors::*;
pub use message::*;
pub use quorum::*;
pub use signature::*;
