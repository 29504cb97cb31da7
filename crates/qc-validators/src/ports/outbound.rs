//! Driven ports (Outbound dependencies)

use async_trait::async_trait;
use shared_crypto::BlsPublicKey;
use shared_types::{ChainId, NodeId, SubnetId};
use thiserror::Error;

use crate::domain::ValidatorOutput;

/// Error from the validator-state oracle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OracleError {
    #[error("Unknown chain: {0}")]
    UnknownChain(ChainId),

    #[error("Unknown subnet: {0}")]
    UnknownSubnet(SubnetId),

    #[error("Height {requested} not reached, current height is {current}")]
    HeightNotReached { requested: u64, current: u64 },

    #[error("Validator state unavailable: {0}")]
    Unavailable(String),
}

/// Validator-state oracle (queries the staking chain)
///
/// Authoritative and read-only from this crate's point of view.
#[async_trait]
pub trait ValidatorState: Send + Sync {
    /// Latest height the oracle can answer for.
    async fn get_current_height(&self) -> Result<u64, OracleError>;

    /// Subnet that validates `chain_id`.
    async fn get_subnet_id(&self, chain_id: ChainId) -> Result<SubnetId, OracleError>;

    /// Validators of `subnet_id` as of `height`.
    async fn get_validator_set(
        &self,
        height: u64,
        subnet_id: SubnetId,
    ) -> Result<Vec<ValidatorOutput>, OracleError>;
}

/// Receives validator set membership changes.
///
/// Called synchronously while the set is being mutated; implementations
/// must not call back into the set.
pub trait ValidatorSetListener: Send + Sync {
    fn on_validator_added(&self, node_id: NodeId, public_key: Option<&BlsPublicKey>, weight: u64);

    fn on_validator_removed(&self, node_id: NodeId, weight: u64);

    fn on_validator_weight_changed(&self, node_id: NodeId, old_weight: u64, new_weight: u64);
}
