//! Shared fixtures: deterministic keys and a wired subnet.

use std::sync::Arc;

use node_runtime::{ScopeRegistry, TrustScope};
use qc_throttling::MsgByteThrottlerConfig;
use qc_warp::{BitSetSignature, UnsignedMessage, WarpSigner};
use qc_validators::CanonicalValidatorSet;
use shared_crypto::BlsKeyPair;
use shared_types::{ChainId, NodeId, SubnetId};

pub const NETWORK_ID: u32 = 7;
pub const CHAIN: ChainId = ChainId([0xC1; 32]);
pub const SUBNET: SubnetId = SubnetId([0x5B; 32]);

/// Node id derived from a small integer.
pub fn node(id: u16) -> NodeId {
    let mut bytes = [0u8; 20];
    bytes[..2].copy_from_slice(&id.to_be_bytes());
    NodeId(bytes)
}

/// Deterministic signer for validator `id`.
pub fn signer(id: u16) -> WarpSigner {
    let mut ikm = [0u8; 32];
    ikm[..2].copy_from_slice(&id.to_be_bytes());
    ikm[31] = 0xAA;
    let keypair = BlsKeyPair::from_ikm(&ikm).expect("fixed ikm is valid");
    WarpSigner::new(keypair, NETWORK_ID, CHAIN)
}

pub struct Subnet {
    pub registry: Arc<ScopeRegistry>,
    pub scope: Arc<TrustScope>,
    pub signers: Vec<(NodeId, WarpSigner)>,
}

impl Subnet {
    /// A subnet with one keyed validator per weight, at height 1.
    pub fn with_weights(weights: &[u64]) -> Self {
        let registry = Arc::new(ScopeRegistry::new(
            MsgByteThrottlerConfig::new(1_000_000, 100_000, 10_000).expect("valid budgets"),
        ));
        let scope = registry.activate(SUBNET).expect("fresh registry");
        registry.register_chain(CHAIN, SUBNET);

        let signers: Vec<(NodeId, WarpSigner)> = weights
            .iter()
            .enumerate()
            .map(|(i, &weight)| {
                let id = node(i as u16 + 1);
                let signer = signer(i as u16 + 1);
                scope
                    .validators
                    .add(id, Some(signer.public_key()), weight)
                    .expect("distinct validators");
                (id, signer)
            })
            .collect();
        registry.advance_height(1);
        Self {
            registry,
            scope,
            signers,
        }
    }

    /// Snapshot the live set at the next height and return that height.
    pub fn next_height(&self) -> u64 {
        self.registry.advance_height(self.registry.current_height() + 1)
    }

    pub fn message(&self, payload: &[u8]) -> UnsignedMessage {
        UnsignedMessage::new(NETWORK_ID, CHAIN, payload.to_vec())
    }

    pub fn canonical(&self) -> CanonicalValidatorSet {
        self.scope.validators.canonical().expect("keys are distinct")
    }

    /// Aggregate the signatures of the given validators (by node id).
    pub fn attest(&self, message: &UnsignedMessage, nodes: &[NodeId]) -> BitSetSignature {
        let canonical = self.canonical();
        let parts = self
            .signers
            .iter()
            .filter(|(id, _)| nodes.contains(id))
            .map(|(id, signer)| {
                let position = canonical.position_of(id).expect("signer is canonical");
                (position, signer.sign(message).expect("own chain"))
            });
        BitSetSignature::aggregate(&canonical, parts).expect("at least one signer")
    }
}
