//! # Scope Registry
//!
//! One [`TrustScope`] per active subnet (the primary network included),
//! each owning its validator set and throttler. Scopes are independent: no
//! state is shared between subnets.
//!
//! The registry also answers [`ValidatorState`] queries, so a
//! [`qc_warp::WarpVerifier`] can run directly on top of it. Each
//! [`advance_height`](ScopeRegistry::advance_height) records a snapshot of
//! every active set; a query at height `h` is answered with the latest
//! snapshot at or below `h`, never with the live set. Changes made after the
//! current height was reached become visible at the next height.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use qc_throttling::{MessageThrottler, MsgByteThrottlerConfig};
use qc_validators::{OracleError, SharedValidatorSet, ValidatorOutput, ValidatorState};
use shared_types::{ChainId, SubnetId};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Scope already active: {0}")]
    ScopeExists(SubnetId),

    #[error(transparent)]
    Throttler(#[from] qc_throttling::ConfigError),
}

/// Validator set and throttler of one subnet.
#[derive(Debug)]
pub struct TrustScope {
    pub subnet_id: SubnetId,
    pub validators: SharedValidatorSet,
    pub throttler: MessageThrottler,
}

impl TrustScope {
    pub fn new(subnet_id: SubnetId, config: MsgByteThrottlerConfig) -> Result<Self, RegistryError> {
        let validators = SharedValidatorSet::new();
        let throttler = MessageThrottler::new(config, validators.clone())?
            .with_scope_label(subnet_id.to_string());
        Ok(Self {
            subnet_id,
            validators,
            throttler,
        })
    }
}

#[derive(Default)]
struct RegistryInner {
    scopes: HashMap<SubnetId, Arc<TrustScope>>,
    chains: HashMap<ChainId, SubnetId>,
    /// subnet -> height -> validators as of that height
    history: HashMap<SubnetId, BTreeMap<u64, Vec<ValidatorOutput>>>,
    height: u64,
}

impl RegistryInner {
    /// Record `validators` at `height` unless they equal the latest snapshot.
    fn record(&mut self, subnet_id: SubnetId, height: u64, validators: Vec<ValidatorOutput>) {
        let history = self.history.entry(subnet_id).or_default();
        let unchanged = history
            .range(..=height)
            .next_back()
            .is_some_and(|(_, latest)| *latest == validators);
        if !unchanged {
            history.insert(height, validators);
        }
    }
}

/// All active scopes of a node.
pub struct ScopeRegistry {
    throttler_config: MsgByteThrottlerConfig,
    inner: RwLock<RegistryInner>,
}

impl ScopeRegistry {
    pub fn new(throttler_config: MsgByteThrottlerConfig) -> Self {
        Self {
            throttler_config,
            inner: RwLock::new(RegistryInner::default()),
        }
    }

    /// Activate an empty scope for `subnet_id`.
    pub fn activate(&self, subnet_id: SubnetId) -> Result<Arc<TrustScope>, RegistryError> {
        let mut inner = self.inner.write();
        if inner.scopes.contains_key(&subnet_id) {
            return Err(RegistryError::ScopeExists(subnet_id));
        }
        let scope = Arc::new(TrustScope::new(subnet_id, self.throttler_config.clone())?);
        inner.scopes.insert(subnet_id, Arc::clone(&scope));
        let height = inner.height;
        inner.history.insert(subnet_id, BTreeMap::from([(height, Vec::new())]));
        info!(%subnet_id, primary = subnet_id.is_primary_network(), height, "Scope activated");
        Ok(scope)
    }

    /// Drop the scope of `subnet_id`, its chain mappings and its snapshots.
    ///
    /// Holders of the returned scope keep a consistent, detached copy; a
    /// later [`activate`](Self::activate) starts from an empty set.
    pub fn deactivate(&self, subnet_id: &SubnetId) -> Option<Arc<TrustScope>> {
        let mut inner = self.inner.write();
        let removed = inner.scopes.remove(subnet_id);
        if removed.is_some() {
            inner.chains.retain(|_, subnet| subnet != subnet_id);
            inner.history.remove(subnet_id);
            info!(%subnet_id, "Scope deactivated");
        }
        removed
    }

    pub fn scope(&self, subnet_id: &SubnetId) -> Option<Arc<TrustScope>> {
        self.inner.read().scopes.get(subnet_id).cloned()
    }

    /// Scope validating `chain_id`, if both are known.
    pub fn scope_for_chain(&self, chain_id: &ChainId) -> Option<Arc<TrustScope>> {
        let inner = self.inner.read();
        let subnet_id = inner.chains.get(chain_id)?;
        inner.scopes.get(subnet_id).cloned()
    }

    pub fn register_chain(&self, chain_id: ChainId, subnet_id: SubnetId) {
        self.inner.write().chains.insert(chain_id, subnet_id);
    }

    pub fn active_scopes(&self) -> usize {
        self.inner.read().scopes.len()
    }

    pub fn current_height(&self) -> u64 {
        self.inner.read().height
    }

    /// Advance the staking height and snapshot every active set at it.
    ///
    /// Never moves backwards; returns the height now in effect.
    pub fn advance_height(&self, height: u64) -> u64 {
        let mut inner = self.inner.write();
        if height <= inner.height {
            return inner.height;
        }
        inner.height = height;
        let snapshots: Vec<(SubnetId, Vec<ValidatorOutput>)> = inner
            .scopes
            .iter()
            .map(|(subnet_id, scope)| (*subnet_id, scope.validators.list()))
            .collect();
        for (subnet_id, validators) in snapshots {
            inner.record(subnet_id, height, validators);
        }
        debug!(height, scopes = inner.scopes.len(), "Height advanced");
        height
    }

    /// Number of snapshots retained for `subnet_id`.
    pub fn snapshot_count(&self, subnet_id: &SubnetId) -> usize {
        self.inner
            .read()
            .history
            .get(subnet_id)
            .map_or(0, BTreeMap::len)
    }
}

#[async_trait]
impl ValidatorState for ScopeRegistry {
    async fn get_current_height(&self) -> Result<u64, OracleError> {
        Ok(self.current_height())
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
        if height > inner.height {
            return Err(OracleError::HeightNotReached {
                requested: height,
                current: inner.height,
            });
        }
        // heights before activation have no snapshot
        inner
            .history
            .get(&subnet_id)
            .and_then(|history| history.range(..=height).next_back())
            .map(|(_, validators)| validators.clone())
            .ok_or(OracleError::UnknownSubnet(subnet_id))
    }
}
