//! # Shared Validator Set
//!
//! The per-scope handle every connection handler, the throttler and the
//! staking layer hold. Mutations take the exclusive lock for the duration of
//! the in-memory update only; reads take the shared lock, and `list()`
//! copies so callers iterate without holding it.

use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard};
use shared_crypto::BlsPublicKey;
use shared_types::{NodeId, TxId};

use crate::domain::{
    canonicalize, CanonicalValidatorSet, ValidatorOutput, ValidatorResult, ValidatorSet,
};
use crate::ports::outbound::ValidatorSetListener;

/// Cloneable, thread-safe handle to one scope's validator set.
#[derive(Clone, Default, Debug)]
pub struct SharedValidatorSet {
    inner: Arc<RwLock<ValidatorSet>>,
}

impl SharedValidatorSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_set(set: ValidatorSet) -> Self {
        Self {
            inner: Arc::new(RwLock::new(set)),
        }
    }

    // === MUTATIONS (staking layer) ===

    pub fn add(
        &self,
        node_id: NodeId,
        public_key: Option<BlsPublicKey>,
        weight: u64,
    ) -> ValidatorResult<()> {
        self.inner.write().add(node_id, public_key, weight)
    }

    pub fn add_staker(
        &self,
        node_id: NodeId,
        public_key: Option<BlsPublicKey>,
        tx_id: Option<TxId>,
        weight: u64,
    ) -> ValidatorResult<()> {
        self.inner
            .write()
            .add_staker(node_id, public_key, tx_id, weight)
    }

    pub fn remove(&self, node_id: &NodeId) -> ValidatorResult<ValidatorOutput> {
        self.inner.write().remove(node_id)
    }

    pub fn set_weight(&self, node_id: &NodeId, weight: u64) -> ValidatorResult<()> {
        self.inner.write().set_weight(node_id, weight)
    }

    pub fn add_weight(&self, node_id: &NodeId, delta: u64) -> ValidatorResult<()> {
        self.inner.write().add_weight(node_id, delta)
    }

    pub fn remove_weight(&self, node_id: &NodeId, delta: u64) -> ValidatorResult<()> {
        self.inner.write().remove_weight(node_id, delta)
    }

    pub fn register_listener(&self, listener: Arc<dyn ValidatorSetListener>) {
        self.inner.write().register_listener(listener);
    }

    // === READS ===

    pub fn get(&self, node_id: &NodeId) -> Option<ValidatorOutput> {
        self.inner.read().get(node_id)
    }

    pub fn weight(&self, node_id: &NodeId) -> u64 {
        self.inner.read().weight(node_id)
    }

    /// `node_id`'s weight and the total, read under one guard.
    pub fn weight_and_total(&self, node_id: &NodeId) -> (u64, u64) {
        let set = self.inner.read();
        (set.weight(node_id), set.total_weight())
    }

    pub fn contains(&self, node_id: &NodeId) -> bool {
        self.inner.read().contains(node_id)
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    pub fn total_weight(&self) -> u64 {
        self.inner.read().total_weight()
    }

    /// Snapshot copy, safe to iterate while the set keeps changing.
    pub fn list(&self) -> Vec<ValidatorOutput> {
        self.inner.read().list()
    }

    /// Canonicalize a snapshot; the lock is released before sorting.
    pub fn canonical(&self) -> ValidatorResult<CanonicalValidatorSet> {
        let snapshot = self.list();
        canonicalize(&snapshot)
    }

    /// Shared guard for composite reads.
    pub fn read(&self) -> RwLockReadGuard<'_, ValidatorSet> {
        self.inner.read()
    }
}
