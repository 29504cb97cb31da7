//! # Throttler Metrics
//!
//! Prometheus gauges for pool state and counters for refused acquires.
//!
//! ## Usage
//!
//! Enable with the `metrics` feature:
//! ```toml
//! qc-throttling = { path = "...", features = ["metrics"] }
//! ```
//!
//! ## Metrics Exported
//!
//! All series carry a `scope` label naming the throttler's subnet.
//!
//! - `throttler_remaining_vdr_bytes` - Gauge of bytes left in the validator pool
//! - `throttler_remaining_at_large_bytes` - Gauge of bytes left in the at-large pool
//! - `throttler_active_nodes` - Gauge of nodes holding bytes
//! - `throttler_acquires_refused_total` - Counter of refused acquires (by reason)

#[cfg(feature = "metrics")]
use lazy_static::lazy_static;

#[cfg(feature = "metrics")]
use prometheus::{register_int_counter_vec, register_int_gauge_vec, IntCounterVec, IntGaugeVec};

#[cfg(feature = "metrics")]
lazy_static! {
    /// Bytes left in the validator pool
    pub static ref REMAINING_VDR_BYTES: IntGaugeVec = register_int_gauge_vec!(
        "throttler_remaining_vdr_bytes",
        "Bytes left in the validator pool",
        &["scope"]
    )
    .expect("Failed to create REMAINING_VDR_BYTES metric");

    /// Bytes left in the at-large pool
    pub static ref REMAINING_AT_LARGE_BYTES: IntGaugeVec = register_int_gauge_vec!(
        "throttler_remaining_at_large_bytes",
        "Bytes left in the at-large pool",
        &["scope"]
    )
    .expect("Failed to create REMAINING_AT_LARGE_BYTES metric");

    /// Nodes currently holding bytes
    pub static ref ACTIVE_NODES: IntGaugeVec = register_int_gauge_vec!(
        "throttler_active_nodes",
        "Number of nodes holding bytes",
        &["scope"]
    )
    .expect("Failed to create ACTIVE_NODES metric");

    /// Refused acquires, labeled by reason
    pub static ref ACQUIRES_REFUSED: IntCounterVec = register_int_counter_vec!(
        "throttler_acquires_refused_total",
        "Total number of refused acquires",
        &["scope", "reason"]
    )
    .expect("Failed to create ACQUIRES_REFUSED metric");
}

#[cfg(feature = "metrics")]
fn gauge_value<T: TryInto<i64>>(value: T) -> i64 {
    value.try_into().unwrap_or(i64::MAX)
}

// =============================================================================
// METRIC RECORDING FUNCTIONS
// =============================================================================

/// Publish the pool state of `scope`
#[cfg(feature = "metrics")]
pub fn set_pool_state(
    scope: &str,
    remaining_vdr: u64,
    remaining_at_large: u64,
    active_nodes: usize,
) {
    REMAINING_VDR_BYTES
        .with_label_values(&[scope])
        .set(gauge_value(remaining_vdr));
    REMAINING_AT_LARGE_BYTES
        .with_label_values(&[scope])
        .set(gauge_value(remaining_at_large));
    ACTIVE_NODES
        .with_label_values(&[scope])
        .set(gauge_value(active_nodes));
}

/// Record a refused acquire with reason
#[cfg(feature = "metrics")]
pub fn record_acquire_refused(scope: &str, reason: &str) {
    ACQUIRES_REFUSED.with_label_values(&[scope, reason]).inc();
}

// =============================================================================
// NO-OP IMPLEMENTATIONS (when metrics feature disabled)
// =============================================================================

#[cfg(not(feature = "metrics"))]
pub fn set_pool_state(
    _scope: &str,
    _remaining_vdr: u64,
    _remaining_at_large: u64,
    _active_nodes: usize,
) {
}

#[cfg(not(feature = "metrics"))]
pub fn record_acquire_refused(_scope: &str, _reason: &str) {}
