//! # qc-throttling
//!
//! Sybil-safe inbound message byte throttler.
//!
//! Processing capacity is split into two pools. The validator pool is shared
//! by stake weight, so a validator's allowance is `vdrAllocSize * w / total`
//! against the live total. The at-large pool serves everyone, validator or
//! not, with a per-node cap. Spinning up identities without stake only ever
//! competes for the at-large pool.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): configuration and the closed byte
//!   accounting
//! - **Service Layer** (`service.rs`): `MessageThrottler`, the locked
//!   per-scope gate, and `ThrottlePermit`
//! - **Metrics** (`metrics.rs`): pool gauges and refusal counters, behind the
//!   `metrics` feature
//!
//! ## Usage
//!
//! ```rust,ignore
//! use qc_throttling::{MessageThrottler, MsgByteThrottlerConfig};
//!
//! let throttler = MessageThrottler::new(MsgByteThrottlerConfig::default(), vdrs.clone())?;
//! let permit = throttler.acquire_permit(peer, msg.len() as u64)?;
//! handle(msg);
//! drop(permit);
//! ```

pub mod domain;
pub mod metrics;
pub mod service;

// Re-export main types
pub use domain::{
    vdr_allowance, AdmissionState, ByteBudget, ConfigError, Grant, MsgByteThrottlerConfig,
    NodeUsage, ThrottleError, MIB,
};
pub use service::{MessageThrottler, ThrottlePermit, DEFAULT_SCOPE_LABEL};
