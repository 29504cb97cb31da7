//! # qc-warp
//!
//! Quorum-threshold aggregate signature verification for cross-chain
//! ("warp") messages.
//!
//! A warp message is trusted when signers holding at least
//! `quorumNum / quorumDen` of the source subnet's stake produced one
//! aggregate BLS signature over its canonical bytes. The signers are named
//! by a bitset over the canonical validator ordering.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): message encoding, signer bitset, the
//!   exact quorum check and `BitSetSignature` verification
//! - **Service Layer** (`service.rs`): `WarpVerifier` over the
//!   validator-state oracle, and `WarpSigner`
//! - **Metrics** (`metrics.rs`): verification outcome counters, behind the
//!   `metrics` feature
//!
//! ## Security
//!
//! - The weight comparison is done in 128-bit integers; no floating point
//! - Bitsets must have exactly `ceil(n / 8)` bytes and no bits past `n`
//! - Verification either confirms the quorum or fails; there is no partial
//!   trust

pub mod domain;
pub mod metrics;
pub mod service;

// Re-export main types
pub use domain::{
    verify_weight, BitSetSignature, QuorumConfig, SignerBitSet, UnsignedMessage, WarpError,
    WarpResult, CODEC_VERSION,
};
pub use service::{verify_canonical, WarpSigner, WarpVerifier};
