//! Validator set
//!
//! Authoritative node → weight → public key mapping for one scope (the
//! primary network or a subnet).
//!
//! ## Storage
//!
//! A dense `Vec<Validator>` plus a `NodeId → position` lookup. Removal
//! swaps the last slot into the vacated one and patches the moved record's
//! position and lookup entry inside the same `&mut self` call, so no caller
//! can observe the two out of step.
//!
//! `total_weight` is maintained incrementally with checked arithmetic and is
//! never recomputed by scanning on the hot path.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use shared_crypto::BlsPublicKey;
use shared_types::{NodeId, TxId};
use tracing::{debug, error};

use super::errors::{ValidatorError, ValidatorResult};
use super::validator::{Validator, ValidatorOutput};
use crate::ports::outbound::ValidatorSetListener;

/// Validator set with stake information
#[derive(Default)]
pub struct ValidatorSet {
    validators: Vec<Validator>,
    positions: HashMap<NodeId, usize>,
    total_weight: u64,
    listeners: Vec<Arc<dyn ValidatorSetListener>>,
}

impl fmt::Debug for ValidatorSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatorSet")
            .field("len", &self.validators.len())
            .field("total_weight", &self.total_weight)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl ValidatorSet {
    /// Create an empty validator set
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from validator outputs, e.g. a genesis allocation.
    pub fn from_outputs<I>(outputs: I) -> ValidatorResult<Self>
    where
        I: IntoIterator<Item = ValidatorOutput>,
    {
        let mut set = Self::new();
        for v in outputs {
            set.add(v.node_id, v.public_key, v.weight)?;
        }
        Ok(set)
    }

    /// Add a validator.
    ///
    /// # Errors
    /// * `ZeroWeight` if `weight == 0`
    /// * `DuplicateIdentity` if the node is already present
    /// * `WeightOverflow` if the total would exceed `u64::MAX`
    pub fn add(
        &mut self,
        node_id: NodeId,
        public_key: Option<BlsPublicKey>,
        weight: u64,
    ) -> ValidatorResult<()> {
        self.add_staker(node_id, public_key, None, weight)
    }

    /// Add a validator, recording the staking transaction that added it.
    pub fn add_staker(
        &mut self,
        node_id: NodeId,
        public_key: Option<BlsPublicKey>,
        tx_id: Option<TxId>,
        weight: u64,
    ) -> ValidatorResult<()> {
        if weight == 0 {
            return Err(ValidatorError::ZeroWeight(node_id));
        }
        if self.positions.contains_key(&node_id) {
            return Err(ValidatorError::DuplicateIdentity(node_id));
        }
        let total_weight =
            self.total_weight
                .checked_add(weight)
                .ok_or(ValidatorError::WeightOverflow {
                    current: self.total_weight,
                    delta: weight,
                })?;

        let position = self.validators.len();
        self.validators.push(Validator {
            node_id,
            public_key,
            tx_id,
            weight,
            position,
        });
        self.positions.insert(node_id, position);
        self.total_weight = total_weight;

        debug!(node_id = %node_id, weight, total_weight, "validator added");
        let added = &self.validators[position];
        for listener in &self.listeners {
            listener.on_validator_added(node_id, added.public_key.as_ref(), weight);
        }
        Ok(())
    }

    /// Remove a validator in O(1), returning its last public projection.
    pub fn remove(&mut self, node_id: &NodeId) -> ValidatorResult<ValidatorOutput> {
        let position = self.checked_position(node_id)?;

        self.positions.remove(node_id);
        let removed = self.validators.swap_remove(position);
        if let Some(moved) = self.validators.get_mut(position) {
            moved.position = position;
            self.positions.insert(moved.node_id, position);
        }
        // Every member's weight is part of the total, so this cannot underflow.
        self.total_weight -= removed.weight;

        debug!(
            node_id = %node_id,
            weight = removed.weight,
            total_weight = self.total_weight,
            "validator removed"
        );
        for listener in &self.listeners {
            listener.on_validator_removed(*node_id, removed.weight);
        }
        Ok(removed.output())
    }

    /// Replace a validator's weight.
    pub fn set_weight(&mut self, node_id: &NodeId, new_weight: u64) -> ValidatorResult<()> {
        let position = self.checked_position(node_id)?;
        if new_weight == 0 {
            return Err(ValidatorError::ZeroWeight(*node_id));
        }
        let old_weight = self.validators[position].weight;
        let without = self.total_weight - old_weight;
        let total_weight = without
            .checked_add(new_weight)
            .ok_or(ValidatorError::WeightOverflow {
                current: without,
                delta: new_weight,
            })?;

        self.validators[position].weight = new_weight;
        self.total_weight = total_weight;
        self.notify_weight_changed(*node_id, old_weight, new_weight);
        Ok(())
    }

    /// Increase a validator's weight by `delta`.
    pub fn add_weight(&mut self, node_id: &NodeId, delta: u64) -> ValidatorResult<()> {
        let position = self.checked_position(node_id)?;
        if delta == 0 {
            return Ok(());
        }
        let old_weight = self.validators[position].weight;
        let new_weight = old_weight
            .checked_add(delta)
            .ok_or(ValidatorError::WeightOverflow {
                current: old_weight,
                delta,
            })?;
        let total_weight =
            self.total_weight
                .checked_add(delta)
                .ok_or(ValidatorError::WeightOverflow {
                    current: self.total_weight,
                    delta,
                })?;

        self.validators[position].weight = new_weight;
        self.total_weight = total_weight;
        self.notify_weight_changed(*node_id, old_weight, new_weight);
        Ok(())
    }

    /// Decrease a validator's weight by `delta`; reaching zero removes it.
    pub fn remove_weight(&mut self, node_id: &NodeId, delta: u64) -> ValidatorResult<()> {
        let position = self.checked_position(node_id)?;
        if delta == 0 {
            return Ok(());
        }
        let old_weight = self.validators[position].weight;
        match old_weight.cmp(&delta) {
            std::cmp::Ordering::Less => Err(ValidatorError::InsufficientStake {
                node_id: *node_id,
                weight: old_weight,
                requested: delta,
            }),
            std::cmp::Ordering::Equal => self.remove(node_id).map(|_| ()),
            std::cmp::Ordering::Greater => {
                let new_weight = old_weight - delta;
                self.validators[position].weight = new_weight;
                self.total_weight -= delta;
                self.notify_weight_changed(*node_id, old_weight, new_weight);
                Ok(())
            }
        }
    }

    /// Look up a validator's public projection.
    pub fn get(&self, node_id: &NodeId) -> Option<ValidatorOutput> {
        self.get_validator(node_id).map(Validator::output)
    }

    /// Borrow the full validator record.
    pub fn get_validator(&self, node_id: &NodeId) -> Option<&Validator> {
        self.positions
            .get(node_id)
            .and_then(|&position| self.validators.get(position))
    }

    /// Weight of `node_id`, zero if absent.
    pub fn weight(&self, node_id: &NodeId) -> u64 {
        self.get_validator(node_id).map_or(0, |v| v.weight)
    }

    /// Check if a validator is in the set
    pub fn contains(&self, node_id: &NodeId) -> bool {
        self.positions.contains_key(node_id)
    }

    /// Get the number of validators
    pub fn len(&self) -> usize {
        self.validators.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    /// Cached sum of all weights.
    pub fn total_weight(&self) -> u64 {
        self.total_weight
    }

    /// Combined weight of the given nodes; absent nodes count as zero.
    pub fn subset_weight<'a, I>(&self, node_ids: I) -> ValidatorResult<u64>
    where
        I: IntoIterator<Item = &'a NodeId>,
    {
        node_ids.into_iter().try_fold(0u64, |acc, node_id| {
            let weight = self.weight(node_id);
            acc.checked_add(weight)
                .ok_or(ValidatorError::WeightOverflow {
                    current: acc,
                    delta: weight,
                })
        })
    }

    /// Snapshot copy of every validator, in storage order.
    pub fn list(&self) -> Vec<ValidatorOutput> {
        self.validators.iter().map(Validator::output).collect()
    }

    /// Iterate the stored records in storage order.
    pub fn iter(&self) -> impl Iterator<Item = &Validator> {
        self.validators.iter()
    }

    /// Subscribe to membership changes.
    ///
    /// The listener first receives `on_validator_added` for every current
    /// member, then a callback for every later successful mutation.
    /// Callbacks run synchronously inside the mutation.
    pub fn register_listener(&mut self, listener: Arc<dyn ValidatorSetListener>) {
        for v in &self.validators {
            listener.on_validator_added(v.node_id, v.public_key.as_ref(), v.weight);
        }
        self.listeners.push(listener);
    }

    /// Full consistency scan: positions, lookup table and cached total.
    pub fn check_invariants(&self) -> ValidatorResult<()> {
        let mut sum = 0u64;
        for (slot, v) in self.validators.iter().enumerate() {
            let indexed = self.positions.get(&v.node_id).copied();
            if v.position != slot || indexed != Some(slot) {
                return Err(ValidatorError::CorruptPosition {
                    node_id: v.node_id,
                    indexed: indexed.unwrap_or(usize::MAX),
                    stored: v.position,
                });
            }
            sum = sum
                .checked_add(v.weight)
                .ok_or(ValidatorError::WeightOverflow {
                    current: sum,
                    delta: v.weight,
                })?;
        }
        if self.positions.len() != self.validators.len() {
            error!(
                entries = self.positions.len(),
                slots = self.validators.len(),
                "validator lookup table has stray entries"
            );
            return Err(ValidatorError::CorruptLookup {
                entries: self.positions.len(),
                slots: self.validators.len(),
            });
        }
        if sum != self.total_weight {
            error!(
                cached = self.total_weight,
                scanned = sum,
                "validator set total weight diverged"
            );
            return Err(ValidatorError::TotalWeightMismatch {
                cached: self.total_weight,
                scanned: sum,
            });
        }
        Ok(())
    }

    /// Resolve `node_id` to its slot, verifying both sides agree.
    fn checked_position(&self, node_id: &NodeId) -> ValidatorResult<usize> {
        let position = *self
            .positions
            .get(node_id)
            .ok_or(ValidatorError::UnknownIdentity(*node_id))?;
        match self.validators.get(position) {
            Some(v) if v.node_id == *node_id && v.position == position => Ok(position),
            other => {
                let stored = other.map_or(usize::MAX, |v| v.position);
                error!(node_id = %node_id, indexed = position, stored, "validator position corrupted");
                Err(ValidatorError::CorruptPosition {
                    node_id: *node_id,
                    indexed: position,
                    stored,
                })
            }
        }
    }

    fn notify_weight_changed(&self, node_id: NodeId, old_weight: u64, new_weight: u64) {
        debug!(
            node_id = %node_id,
            old_weight,
            new_weight,
            total_weight = self.total_weight,
            "validator weight changed"
        );
        for listener in &self.listeners {
            listener.on_validator_weight_changed(node_id, old_weight, new_weight);
        }
    }
}
