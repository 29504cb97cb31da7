//! In-memory validator-state oracle
//!
//! Implements the `ValidatorState` port over height-indexed snapshots.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use parking_lot::RwLock;
use shared_types::{ChainId, SubnetId};

use crate::domain::ValidatorOutput;
use crate::ports::outbound::{OracleError, ValidatorState};

#[derive(Default)]
struct OracleInner {
    chains: HashMap<ChainId, SubnetId>,
    /// subnet -> height -> validators recorded at that height
    history: HashMap<SubnetId, BTreeMap<u64, Vec<ValidatorOutput>>>,
    current_height: u64,
}

/// In-memory oracle for tests and local wiring.
///
/// A query at height `h` is answered with the latest snapshot recorded at
/// or below `h`.
pub struct InMemoryValidatorState {
    inner: RwLock<OracleInner>,
}

impl InMemoryValidatorState {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(OracleInner::default()),
        }
    }

    /// Map `chain_id` to the subnet that validates it.
    pub fn register_chain(&self, chain_id: ChainId, subnet_id: SubnetId) {
        self.inner.write().chains.insert(chain_id, subnet_id);
    }

    /// Record the validators of `subnet_id` as of `height`, advancing the
    /// current height if needed.
    pub fn record(&self, height: u64, subnet_id: SubnetId, validators: Vec<ValidatorOutput>) {
        let mut inner = self.inner.write();
        inner
            .history
            .entry(subnet_id)
            .or_default()
            .insert(height, validators);
        inner.current_height = inner.current_height.max(height);
    }

    pub fn set_current_height(&self, height: u64) {
        self.inner.write().current_height = height;
    }
}

impl Default for InMemoryValidatorState {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ValidatorState for InMemoryValidatorState {
    async fn get_current_height(&self) -> Result<u64, OracleError> {
        Ok(self.inner.read().current_height)
    }

    async fn get_subnet_id(&self, chain_id: ChainId) -> Result<SubnetId, OracleError> {
        self.inner
            .read()
            .chains
            .get(&chain_id)
            .copied()
            .ok_or(OracleError::UnknownChain(chain_id))
    }

    async fn get_validator_set(
        &self,
        height: u64,
        subnet_id: SubnetId,
    ) -> Result<Vec<ValidatorOutput>, OracleError> {
        let inner = self.inner.read();
        if height > inner.current_height {
            return Err(OracleError::HeightNotReached {
                requested: height,
                current: inner.current_height,
            });
        }
        let history = inner
            .history
            .get(&subnet_id)
            .ok_or(OracleError::UnknownSubnet(subnet_id))?;
        history
            .range(..=height)
            .next_back()
            .map(|(_, validators)| validators.clone())
            .ok_or(OracleError::UnknownSubnet(subnet_id))
    }
}
