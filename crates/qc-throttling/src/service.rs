//! # Message Throttler Service
//!
//! Per-scope admission gate for inbound messages. One instance is shared by
//! every connection handler of the scope.
//!
//! ## Locking
//!
//! The budget mutex is taken first, then the validator set's shared lock to
//! read the node's weight and the live total. Both are held only for the
//! in-memory update. The throttler never blocks waiting for bytes: an
//! exhausted acquire returns immediately and back-pressure is the caller's
//! policy.

use parking_lot::Mutex;
use qc_validators::SharedValidatorSet;
use shared_types::NodeId;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

use crate::domain::{
    AdmissionState, ByteBudget, ConfigError, Grant, MsgByteThrottlerConfig, NodeUsage,
    ThrottleError,
};
use crate::metrics;

/// Metrics label of a throttler built without [`MessageThrottler::with_scope_label`].
pub const DEFAULT_SCOPE_LABEL: &str = "default";

/// Sybil-safe byte throttler for one scope.
#[derive(Debug)]
pub struct MessageThrottler {
    validators: SharedValidatorSet,
    budget: Mutex<ByteBudget>,
    scope_label: String,
}

impl MessageThrottler {
    pub fn new(
        config: MsgByteThrottlerConfig,
        validators: SharedValidatorSet,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        debug!(
            vdr_alloc_size = config.vdr_alloc_size,
            at_large_alloc_size = config.at_large_alloc_size,
            node_max_at_large_bytes = config.node_max_at_large_bytes,
            "Message throttler created"
        );
        let throttler = Self {
            validators,
            budget: Mutex::new(ByteBudget::new(config)),
            scope_label: DEFAULT_SCOPE_LABEL.to_string(),
        };
        throttler.publish(&throttler.budget.lock());
        Ok(throttler)
    }

    /// Label the exported metrics of this throttler with `label`.
    pub fn with_scope_label(mut self, label: impl Into<String>) -> Self {
        self.scope_label = label.into();
        self.publish(&self.budget.lock());
        self
    }

    pub fn scope_label(&self) -> &str {
        &self.scope_label
    }

    fn publish(&self, budget: &ByteBudget) {
        metrics::set_pool_state(
            &self.scope_label,
            budget.remaining_vdr_bytes(),
            budget.remaining_at_large_bytes(),
            budget.active_nodes(),
        );
    }

    fn refused(&self, err: &ThrottleError) {
        let reason = match err {
            ThrottleError::Exhausted { .. } => "exhausted",
            ThrottleError::Cancelled(_) => "cancelled",
            _ => "other",
        };
        metrics::record_acquire_refused(&self.scope_label, reason);
    }

    /// Take `size` bytes for a message from `node_id`.
    ///
    /// Either the whole request is granted or nothing is taken.
    pub fn acquire(&self, node_id: NodeId, size: u64) -> Result<Grant, ThrottleError> {
        if size == 0 {
            return Ok(Grant::default());
        }
        let mut budget = self.budget.lock();
        let (weight, total_weight) = self.validators.weight_and_total(&node_id);
        let result = budget.acquire(node_id, size, weight, total_weight);
        match &result {
            Ok(grant) => {
                self.publish(&budget);
                debug!(
                    %node_id,
                    size,
                    vdr_bytes = grant.vdr_bytes,
                    at_large_bytes = grant.at_large_bytes,
                    "Bytes acquired"
                );
            }
            Err(err) => {
                self.refused(err);
                warn!(%node_id, size, weight, %err, "Acquire refused");
            }
        }
        result
    }

    /// [`acquire`](Self::acquire), unless `cancel` fires first.
    ///
    /// The token is checked again under the lock, so a cancellation observed
    /// before the commit point leaves the pools untouched.
    pub fn acquire_with_cancel(
        &self,
        node_id: NodeId,
        size: u64,
        cancel: &CancellationToken,
    ) -> Result<Grant, ThrottleError> {
        if cancel.is_cancelled() {
            return Err(ThrottleError::Cancelled(node_id));
        }
        if size == 0 {
            return Ok(Grant::default());
        }
        let mut budget = self.budget.lock();
        let (weight, total_weight) = self.validators.weight_and_total(&node_id);
        let grant = budget.plan(node_id, size, weight, total_weight);
        if cancel.is_cancelled() {
            let err = ThrottleError::Cancelled(node_id);
            self.refused(&err);
            return Err(err);
        }
        match grant {
            Ok(grant) => {
                budget.commit(node_id, grant);
                self.publish(&budget);
                Ok(grant)
            }
            Err(err) => {
                budget.mark_exhausted(node_id);
                self.refused(&err);
                warn!(%node_id, size, weight, %err, "Acquire refused");
                Err(err)
            }
        }
    }

    /// Boolean form of [`acquire`](Self::acquire).
    pub fn try_acquire(&self, node_id: NodeId, size: u64) -> bool {
        self.acquire(node_id, size).is_ok()
    }

    /// Acquire and wrap the grant in a guard that releases on drop.
    pub fn acquire_permit(
        &self,
        node_id: NodeId,
        size: u64,
    ) -> Result<ThrottlePermit<'_>, ThrottleError> {
        self.acquire(node_id, size)?;
        Ok(ThrottlePermit {
            throttler: self,
            node_id,
            size,
        })
    }

    /// Return `size` bytes previously acquired by `node_id`.
    pub fn release(&self, node_id: NodeId, size: u64) -> Result<Grant, ThrottleError> {
        let mut budget = self.budget.lock();
        let result = budget.release(node_id, size);
        if result.is_ok() {
            self.publish(&budget);
        }
        drop(budget);
        match &result {
            Ok(grant) => debug!(
                %node_id,
                size,
                vdr_bytes = grant.vdr_bytes,
                at_large_bytes = grant.at_large_bytes,
                "Bytes released"
            ),
            Err(err) => error!(%node_id, size, %err, "Release exceeds outstanding bytes"),
        }
        result
    }

    pub fn remaining_vdr_bytes(&self) -> u64 {
        self.budget.lock().remaining_vdr_bytes()
    }

    pub fn remaining_at_large_bytes(&self) -> u64 {
        self.budget.lock().remaining_at_large_bytes()
    }

    pub fn usage(&self, node_id: &NodeId) -> NodeUsage {
        self.budget.lock().usage(node_id)
    }

    /// Number of nodes holding bytes.
    pub fn active_nodes(&self) -> usize {
        self.budget.lock().active_nodes()
    }

    /// Number of nodes holding bytes whose last acquire was refused.
    pub fn exhausted_nodes(&self) -> usize {
        self.budget.lock().exhausted_nodes()
    }

    pub fn admission_state(&self, node_id: &NodeId) -> AdmissionState {
        self.budget.lock().admission_state(node_id)
    }

    pub fn config(&self) -> MsgByteThrottlerConfig {
        self.budget.lock().config().clone()
    }

    pub fn validators(&self) -> &SharedValidatorSet {
        &self.validators
    }
}

/// Bytes held by one in-flight message. Released when dropped.
#[derive(Debug)]
pub struct ThrottlePermit<'a> {
    throttler: &'a MessageThrottler,
    node_id: NodeId,
    size: u64,
}

impl ThrottlePermit<'_> {
    pub fn node_id(&self) -> NodeId {
        self.node_id
    }

    pub fn size(&self) -> u64 {
        self.size
    }
}

impl Drop for ThrottlePermit<'_> {
    fn drop(&mut self) {
        // logged by release
        let _ = self.throttler.release(self.node_id, self.size);
    }
}
