//! # Shared Types Crate
//!
//! Identifier types used by every stake-weighted trust component. This is
//! the single source of truth for node, chain, subnet and staking
//! transaction identifiers, so a `NodeId` seen by the throttler is the same
//! type the validator set and the warp verifier index on.
//!
//! ## Design Principles
//!
//! - **Fixed width**: identifiers are byte arrays, never strings.
//! - **Total order**: every identifier is `Ord` over its raw bytes, which the
//!   canonical validator ordering relies on.

pub mod entities;
pub mod errors;

pub use entities::*;
pub use errors::*;
