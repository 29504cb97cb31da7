//! # Warp Verifier Service
//!
//! Resolves the source chain's validators through the [`ValidatorState`]
//! oracle, canonicalizes them and checks a [`BitSetSignature`] against the
//! configured quorum.
//!
//! Pairing work runs on the blocking pool so async callers are never stalled
//! by it. No lock on shared state is held while verifying: the oracle hands
//! back an owned snapshot.

use std::sync::Arc;

use qc_validators::{canonicalize, CanonicalValidatorSet, OracleError, ValidatorState};
use rayon::prelude::*;
use shared_crypto::{BlsKeyPair, BlsPublicKey, BlsSignature};
use shared_types::ChainId;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

use crate::domain::{BitSetSignature, QuorumConfig, UnsignedMessage, WarpError, WarpResult};
use crate::metrics;

/// Verify `signature` over `message` against an already canonicalized set.
pub fn verify_canonical(
    message: &UnsignedMessage,
    signature: &BitSetSignature,
    canonical: &CanonicalValidatorSet,
    quorum_num: u64,
    quorum_den: u64,
) -> WarpResult<()> {
    signature.verify_canonical(message, canonical, quorum_num, quorum_den)
}

/// Quorum verifier for warp messages.
pub struct WarpVerifier<S> {
    state: Arc<S>,
    quorum: QuorumConfig,
}

impl<S> WarpVerifier<S>
where
    S: ValidatorState + 'static,
{
    pub fn new(state: Arc<S>, quorum: QuorumConfig) -> WarpResult<Self> {
        quorum.validate()?;
        Ok(Self { state, quorum })
    }

    pub fn quorum(&self) -> QuorumConfig {
        self.quorum
    }

    /// Canonical signer set of `source_chain_id`'s subnet at `height`.
    pub async fn canonical_set(
        &self,
        source_chain_id: ChainId,
        height: u64,
    ) -> WarpResult<CanonicalValidatorSet> {
        let subnet_id = self
            .state
            .get_subnet_id(source_chain_id)
            .await
            .map_err(|err| match err {
                OracleError::UnknownChain(chain) => WarpError::UnknownSource(chain),
                other => WarpError::Oracle(other),
            })?;
        let validators = self.state.get_validator_set(height, subnet_id).await?;
        let canonical = canonicalize(&validators)?;
        trace!(
            %source_chain_id,
            %subnet_id,
            height,
            signers = canonical.len(),
            total_weight = canonical.total_weight(),
            "Resolved canonical validator set"
        );
        Ok(canonical)
    }

    /// Verify that `signature` carries the configured quorum of the source
    /// chain's stake at `height`.
    pub async fn verify(
        &self,
        message: &UnsignedMessage,
        signature: &BitSetSignature,
        height: u64,
    ) -> WarpResult<()> {
        let result = self.verify_at(message, signature, height).await;
        metrics::record_outcome(&result);

        match &result {
            Ok(()) => debug!(
                message_id = %message.id().map(hex::encode).unwrap_or_default(),
                source_chain_id = %message.source_chain_id,
                height,
                "Warp message verified"
            ),
            Err(err) if err.is_integrity_error() => warn!(
                message_id = %message.id().map(hex::encode).unwrap_or_default(),
                source_chain_id = %message.source_chain_id,
                height,
                %err,
                "Rejected warp signature"
            ),
            Err(err) => debug!(%err, height, "Warp verification failed"),
        }
        result
    }

    async fn verify_at(
        &self,
        message: &UnsignedMessage,
        signature: &BitSetSignature,
        height: u64,
    ) -> WarpResult<()> {
        let canonical = self.canonical_set(message.source_chain_id, height).await?;

        let QuorumConfig {
            quorum_num,
            quorum_den,
        } = self.quorum;
        let owned_message = message.clone();
        let owned_signature = signature.clone();
        tokio::task::spawn_blocking(move || {
            owned_signature.verify_canonical(&owned_message, &canonical, quorum_num, quorum_den)
        })
        .await
        .map_err(|e| WarpError::Internal(format!("verification task failed: {e}")))?
    }

    /// [`verify`](Self::verify), abandoned as soon as `cancel` fires.
    pub async fn verify_with_cancel(
        &self,
        message: &UnsignedMessage,
        signature: &BitSetSignature,
        height: u64,
        cancel: &CancellationToken,
    ) -> WarpResult<()> {
        if cancel.is_cancelled() {
            let cancelled: WarpResult<()> = Err(WarpError::Cancelled);
            metrics::record_outcome(&cancelled);
            return cancelled;
        }
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                let cancelled: WarpResult<()> = Err(WarpError::Cancelled);
                metrics::record_outcome(&cancelled);
                cancelled
            }
            result = self.verify(message, signature, height) => result,
        }
    }

    /// Verify independent requests against one canonical set in parallel.
    ///
    /// Results are in request order.
    pub fn verify_batch(
        &self,
        canonical: &CanonicalValidatorSet,
        requests: &[(UnsignedMessage, BitSetSignature)],
    ) -> Vec<WarpResult<()>> {
        let QuorumConfig {
            quorum_num,
            quorum_den,
        } = self.quorum;
        requests
            .par_iter()
            .map(|(message, signature)| {
                let result = signature.verify_canonical(message, canonical, quorum_num, quorum_den);
                metrics::record_outcome(&result);
                result
            })
            .collect()
    }
}

/// Signs warp messages originating from one chain with the local key.
pub struct WarpSigner {
    keypair: BlsKeyPair,
    network_id: u32,
    source_chain_id: ChainId,
}

impl WarpSigner {
    pub fn new(keypair: BlsKeyPair, network_id: u32, source_chain_id: ChainId) -> Self {
        Self {
            keypair,
            network_id,
            source_chain_id,
        }
    }

    pub fn public_key(&self) -> BlsPublicKey {
        self.keypair.public_key()
    }

    /// Build a message from this signer's chain.
    pub fn new_message(&self, payload: Vec<u8>) -> UnsignedMessage {
        UnsignedMessage::new(self.network_id, self.source_chain_id, payload)
    }

    /// Sign `message`. Refuses messages from another chain or network.
    pub fn sign(&self, message: &UnsignedMessage) -> WarpResult<BlsSignature> {
        if message.source_chain_id != self.source_chain_id {
            return Err(WarpError::WrongSource {
                expected: self.source_chain_id,
                actual: message.source_chain_id,
            });
        }
        if message.network_id != self.network_id {
            return Err(WarpError::WrongNetwork {
                expected: self.network_id,
                actual: message.network_id,
            });
        }
        Ok(self.keypair.sign(&message.bytes()?))
    }
}
