//! # Warp Metrics
//!
//! Prometheus counters for warp verification outcomes.
//!
//! ## Usage
//!
//! Enable with the `metrics` feature:
//! ```toml
//! qc-warp = { path = "...", features = ["metrics"] }
//! ```
//!
//! ## Metrics Exported
//!
//! - `warp_messages_verified_total` - Counter of messages that met quorum
//! - `warp_messages_rejected_total` - Counter of rejections (by class and reason)

#[cfg(feature = "metrics")]
use lazy_static::lazy_static;

#[cfg(feature = "metrics")]
use prometheus::{register_int_counter, register_int_counter_vec, IntCounter, IntCounterVec};

#[cfg(feature = "metrics")]
use crate::domain::WarpError;

#[cfg(feature = "metrics")]
lazy_static! {
    /// Messages that met quorum
    pub static ref MESSAGES_VERIFIED: IntCounter = register_int_counter!(
        "warp_messages_verified_total",
        "Total number of warp messages verified"
    )
    .expect("Failed to create MESSAGES_VERIFIED metric");

    /// Rejected messages, labeled by error class and reason
    pub static ref MESSAGES_REJECTED: IntCounterVec = register_int_counter_vec!(
        "warp_messages_rejected_total",
        "Total number of warp messages rejected",
        &["class", "reason"]
    )
    .expect("Failed to create MESSAGES_REJECTED metric");
}

// =============================================================================
// METRIC RECORDING FUNCTIONS
// =============================================================================

/// Record one verification outcome
#[cfg(feature = "metrics")]
pub fn record_outcome<T>(result: &Result<T, WarpError>) {
    match result {
        Ok(_) => MESSAGES_VERIFIED.inc(),
        Err(err) => MESSAGES_REJECTED
            .with_label_values(&[err.class(), err.reason()])
            .inc(),
    }
}

// =============================================================================
// NO-OP IMPLEMENTATIONS (when metrics feature disabled)
// =============================================================================

#[cfg(not(feature = "metrics"))]
pub fn record_outcome<T>(_result: &Result<T, crate::domain::WarpError>) {}
