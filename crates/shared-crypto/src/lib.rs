//! # Shared Crypto - BLS Primitives
//!
//! ## Components
//!
//! | Module | Algorithm | Use Case |
//! |--------|-----------|----------|
//! | `bls` | BLS12-381 (min-pk) | Validator keys, warp aggregate signatures |
//!
//! ## Security Properties
//!
//! - **Key validation**: public keys are subgroup-checked and non-identity on parse
//! - **Proof-of-possession DST**: same-message aggregation is rogue-key safe
//!   given registered keys carry a proof of possession
//! - **Secret hygiene**: generated keying material is zeroized

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod bls;
pub mod errors;

// Re-exports
pub use bls::{BlsKeyPair, BlsPublicKey, BlsSignature, PUBLIC_KEY_LEN, SIGNATURE_LEN};
pub use errors::CryptoError;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
