//! # Byte Budget
//!
//! Closed accounting of the validator and at-large byte pools.
//!
//! ## Algorithm
//!
//! A request of `n` bytes from a node of weight `w` (out of `total`):
//!
//! 1. Validators first draw from their personal share of the validator pool,
//!    `vdr_alloc_size * w / total` against the live total, less what they
//!    already hold, bounded by what is left in the pool.
//! 2. The shortfall, and every byte a non-validator asks for, comes from the
//!    at-large pool, bounded by `node_max_at_large_bytes` less what the node
//!    already holds there.
//! 3. If the two together cannot cover `n`, nothing is taken.
//!
//! The two caps are independent upper bounds: a validator's at-large draw is
//! bounded by the per-node cap only, not by its stake share.
//!
//! ## Invariant
//!
//! `remaining_vdr + Σ vdr_used == vdr_alloc_size` and
//! `remaining_at_large + Σ at_large_used == at_large_alloc_size` after every
//! operation.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use shared_types::NodeId;

use super::config::MsgByteThrottlerConfig;
use super::errors::ThrottleError;

/// Bytes a node currently holds from each pool.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct NodeUsage {
    pub vdr_bytes: u64,
    pub at_large_bytes: u64,
}

impl NodeUsage {
    pub fn total(&self) -> u64 {
        self.vdr_bytes + self.at_large_bytes
    }

    fn is_empty(&self) -> bool {
        self.vdr_bytes == 0 && self.at_large_bytes == 0
    }
}

/// How a successful acquire (or a release) split across the pools.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Grant {
    pub vdr_bytes: u64,
    pub at_large_bytes: u64,
}

impl Grant {
    pub fn total(&self) -> u64 {
        self.vdr_bytes + self.at_large_bytes
    }
}

/// Admission state of one connection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum AdmissionState {
    /// Holds nothing.
    Idle,
    /// Holds bytes from at least one pool.
    Admitted,
    /// Holds bytes, its last acquire failed and nothing was released since.
    ///
    /// A refused node that holds nothing stays `Idle`, so refusals never
    /// grow the per-node state.
    Exhausted,
}

/// A validator's personal share of the validator pool.
///
/// Computed in 128 bits; the result never exceeds `vdr_alloc_size`.
pub fn vdr_allowance(vdr_alloc_size: u64, weight: u64, total_weight: u64) -> u64 {
    if weight == 0 || total_weight == 0 {
        return 0;
    }
    let share = u128::from(vdr_alloc_size) * u128::from(weight) / u128::from(total_weight);
    // weight <= total_weight keeps share <= vdr_alloc_size
    u64::try_from(share).unwrap_or(vdr_alloc_size)
}

/// Pool state for one scope.
#[derive(Debug)]
pub struct ByteBudget {
    config: MsgByteThrottlerConfig,
    remaining_vdr_bytes: u64,
    remaining_at_large_bytes: u64,
    usage: HashMap<NodeId, NodeUsage>,
    exhausted: HashSet<NodeId>,
}

impl ByteBudget {
    pub fn new(config: MsgByteThrottlerConfig) -> Self {
        Self {
            remaining_vdr_bytes: config.vdr_alloc_size,
            remaining_at_large_bytes: config.at_large_alloc_size,
            config,
            usage: HashMap::new(),
            exhausted: HashSet::new(),
        }
    }

    pub fn config(&self) -> &MsgByteThrottlerConfig {
        &self.config
    }

    /// Work out how `size` bytes would be split, without taking them.
    pub fn plan(
        &self,
        node_id: NodeId,
        size: u64,
        weight: u64,
        total_weight: u64,
    ) -> Result<Grant, ThrottleError> {
        let usage = self.usage(&node_id);

        let vdr_bytes = if weight > 0 {
            let allowance = vdr_allowance(self.config.vdr_alloc_size, weight, total_weight);
            allowance
                .saturating_sub(usage.vdr_bytes)
                .min(self.remaining_vdr_bytes)
                .min(size)
        } else {
            0
        };

        let at_large_available = self
            .config
            .node_max_at_large_bytes
            .saturating_sub(usage.at_large_bytes)
            .min(self.remaining_at_large_bytes);
        let shortfall = size - vdr_bytes;

        if shortfall > at_large_available {
            return Err(ThrottleError::Exhausted {
                node_id,
                requested: size,
                available: vdr_bytes + at_large_available,
            });
        }
        Ok(Grant {
            vdr_bytes,
            at_large_bytes: shortfall,
        })
    }

    /// Take a planned grant out of the pools.
    pub fn commit(&mut self, node_id: NodeId, grant: Grant) {
        if grant.total() == 0 {
            return;
        }
        self.remaining_vdr_bytes -= grant.vdr_bytes;
        self.remaining_at_large_bytes -= grant.at_large_bytes;
        let usage = self.usage.entry(node_id).or_default();
        usage.vdr_bytes += grant.vdr_bytes;
        usage.at_large_bytes += grant.at_large_bytes;
        self.exhausted.remove(&node_id);
    }

    /// Plan and commit in one step. All-or-nothing.
    pub fn acquire(
        &mut self,
        node_id: NodeId,
        size: u64,
        weight: u64,
        total_weight: u64,
    ) -> Result<Grant, ThrottleError> {
        match self.plan(node_id, size, weight, total_weight) {
            Ok(grant) => {
                self.commit(node_id, grant);
                Ok(grant)
            }
            Err(err) => {
                self.mark_exhausted(node_id);
                Err(err)
            }
        }
    }

    /// Record a refused acquire for `node_id`. No-op for nodes holding nothing.
    pub fn mark_exhausted(&mut self, node_id: NodeId) {
        if self.usage.contains_key(&node_id) {
            self.exhausted.insert(node_id);
        }
    }

    /// Return `size` bytes held by `node_id`, at-large first.
    pub fn release(&mut self, node_id: NodeId, size: u64) -> Result<Grant, ThrottleError> {
        if size == 0 {
            return Ok(Grant::default());
        }
        let usage = self.usage(&node_id);
        if size > usage.total() {
            return Err(ThrottleError::OverRelease {
                node_id,
                requested: size,
                outstanding: usage.total(),
            });
        }

        let at_large_bytes = size.min(usage.at_large_bytes);
        let vdr_bytes = size - at_large_bytes;
        let remaining = NodeUsage {
            vdr_bytes: usage.vdr_bytes - vdr_bytes,
            at_large_bytes: usage.at_large_bytes - at_large_bytes,
        };
        if remaining.is_empty() {
            self.usage.remove(&node_id);
        } else {
            self.usage.insert(node_id, remaining);
        }
        self.remaining_vdr_bytes += vdr_bytes;
        self.remaining_at_large_bytes += at_large_bytes;
        self.exhausted.remove(&node_id);

        Ok(Grant {
            vdr_bytes,
            at_large_bytes,
        })
    }

    pub fn usage(&self, node_id: &NodeId) -> NodeUsage {
        self.usage.get(node_id).copied().unwrap_or_default()
    }

    pub fn admission_state(&self, node_id: &NodeId) -> AdmissionState {
        if self.exhausted.contains(node_id) {
            AdmissionState::Exhausted
        } else if self.usage.contains_key(node_id) {
            AdmissionState::Admitted
        } else {
            AdmissionState::Idle
        }
    }

    pub fn remaining_vdr_bytes(&self) -> u64 {
        self.remaining_vdr_bytes
    }

    pub fn remaining_at_large_bytes(&self) -> u64 {
        self.remaining_at_large_bytes
    }

    /// Number of nodes holding bytes.
    pub fn active_nodes(&self) -> usize {
        self.usage.len()
    }

    /// Number of nodes in the `Exhausted` state. Never exceeds `active_nodes`.
    pub fn exhausted_nodes(&self) -> usize {
        self.exhausted.len()
    }

    /// Whether both pools balance against the per-node records.
    pub fn is_balanced(&self) -> bool {
        let (vdr_used, at_large_used) = self
            .usage
            .values()
            .fold((0u128, 0u128), |(v, a), u| {
                (v + u128::from(u.vdr_bytes), a + u128::from(u.at_large_bytes))
            });
        vdr_used + u128::from(self.remaining_vdr_bytes) == u128::from(self.config.vdr_alloc_size)
            && at_large_used + u128::from(self.remaining_at_large_bytes)
                == u128::from(self.config.at_large_alloc_size)
    }
}
