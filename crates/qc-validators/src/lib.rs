//! # qc-validators
//!
//! Stake-weighted validator sets for one scope (primary network or subnet).
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): the O(1)-mutation `ValidatorSet` and the
//!   deterministic canonical signer ordering
//! - **Ports Layer** (`ports/`): the validator-state oracle and membership
//!   listener traits
//! - **Adapters Layer** (`adapters/`): an in-memory, height-indexed oracle
//! - **Service Layer** (`service.rs`): `SharedValidatorSet`, the locked
//!   per-scope handle
//!
//! ## Usage
//!
//! ```rust,ignore
//! use qc_validators::SharedValidatorSet;
//!
//! let vdrs = SharedValidatorSet::new();
//! vdrs.add(node_id, Some(public_key), 2_000)?;
//! let canonical = vdrs.canonical()?;
//! ```
//!
//! ## Invariants
//!
//! - Every stored weight is non-zero
//! - `total_weight()` equals the sum of stored weights after every mutation
//! - A removal never changes another validator's weight or key

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

// Re-export main types
pub use adapters::InMemoryValidatorState;
pub use domain::{
    canonicalize, canonicalize_for, CanonicalValidator, CanonicalValidatorSet, Validator,
    ValidatorError, ValidatorOutput, ValidatorResult, ValidatorSet,
};
pub use ports::outbound::{OracleError, ValidatorSetListener, ValidatorState};
pub use service::SharedValidatorSet;
