//! # Unsigned Warp Message
//!
//! The bytes every signer signs:
//!
//! ```text
//! codec version   u16 BE  (0)
//! network id      u32 BE
//! source chain    32 bytes
//! payload length  u32 BE
//! payload         payload length bytes
//! ```

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use shared_types::{ChainId, Hash, ID_LEN};

use super::errors::{WarpError, WarpResult};

/// Only codec version understood.
pub const CODEC_VERSION: u16 = 0;

const HEADER_LEN: usize = 2 + 4 + ID_LEN + 4;

/// A message attested by a source chain's validators.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnsignedMessage {
    pub network_id: u32,
    pub source_chain_id: ChainId,
    pub payload: Vec<u8>,
}

impl UnsignedMessage {
    pub fn new(network_id: u32, source_chain_id: ChainId, payload: Vec<u8>) -> Self {
        Self {
            network_id,
            source_chain_id,
            payload,
        }
    }

    /// Canonical byte encoding, the input to signing.
    ///
    /// # Errors
    /// * `MalformedMessage` if the payload length does not fit in `u32`
    pub fn bytes(&self) -> WarpResult<Vec<u8>> {
        let len = payload_len_prefix(self.payload.len())?;
        let mut out = Vec::with_capacity(HEADER_LEN + self.payload.len());
        out.extend_from_slice(&CODEC_VERSION.to_be_bytes());
        out.extend_from_slice(&self.network_id.to_be_bytes());
        out.extend_from_slice(self.source_chain_id.as_bytes());
        out.extend_from_slice(&len);
        out.extend_from_slice(&self.payload);
        Ok(out)
    }

    /// Parse the canonical encoding. Rejects unknown versions and trailing
    /// bytes.
    pub fn parse(bytes: &[u8]) -> WarpResult<Self> {
        if bytes.len() < HEADER_LEN {
            return Err(WarpError::MalformedMessage(format!(
                "{} bytes, header needs {HEADER_LEN}",
                bytes.len()
            )));
        }
        let (version, rest) = bytes.split_at(2);
        let version = u16::from_be_bytes([version[0], version[1]]);
        if version != CODEC_VERSION {
            return Err(WarpError::MalformedMessage(format!(
                "unknown codec version {version}"
            )));
        }
        let (network_id, rest) = rest.split_at(4);
        let network_id =
            u32::from_be_bytes([network_id[0], network_id[1], network_id[2], network_id[3]]);
        let (chain, rest) = rest.split_at(ID_LEN);
        let source_chain_id = ChainId::from_slice(chain)
            .map_err(|e| WarpError::MalformedMessage(e.to_string()))?;
        let (len, payload) = rest.split_at(4);
        let len = u32::from_be_bytes([len[0], len[1], len[2], len[3]]) as usize;
        if payload.len() != len {
            return Err(WarpError::MalformedMessage(format!(
                "payload length {len}, found {} bytes",
                payload.len()
            )));
        }
        Ok(Self::new(network_id, source_chain_id, payload.to_vec()))
    }

    /// SHA-256 of the canonical bytes.
    pub fn id(&self) -> WarpResult<Hash> {
        Ok(Sha256::digest(self.bytes()?).into())
    }
}

fn payload_len_prefix(len: usize) -> WarpResult<[u8; 4]> {
    u32::try_from(len)
        .map(u32::to_be_bytes)
        .map_err(|_| {
            WarpError::MalformedMessage(format!("payload of {len} bytes exceeds u32 length"))
        })
}
