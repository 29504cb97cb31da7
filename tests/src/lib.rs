//! # Trust Subsystem Test Suite
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── exploits/      # Attack simulations against the trust checks
//! └── integration/   # Validator set, throttler and verifier together
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p qc-tests
//! cargo test -p qc-tests exploits::
//! cargo bench -p qc-tests
//! ```

pub mod exploits;
pub mod fixtures;
pub mod integration;
