//! Attack simulations against the trust checks.
//!
//! - sybil_flood: unstaked identities exhausting processing capacity
//! - signature_forgery: malformed or inflated warp signatures

pub mod signature_forgery;
pub mod sybil_flood;
