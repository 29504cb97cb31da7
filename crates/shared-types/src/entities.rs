//! # Identifiers
//!
//! Fixed-width identifiers shared by every trust component.
//!
//! - **Nodes**: `NodeId` (20 bytes) names a network participant
//! - **Chains & Subnets**: `ChainId`, `SubnetId` (32 bytes) scope validator sets
//! - **Staking**: `TxId` (32 bytes) names the transaction that added a validator

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::IdParseError;

/// A 32-byte hash (SHA-256).
pub type Hash = [u8; 32];

/// Length of a `NodeId` in bytes.
pub const NODE_ID_LEN: usize = 20;

/// Length of chain, subnet and transaction identifiers in bytes.
pub const ID_LEN: usize = 32;

macro_rules! fixed_id {
    ($(#[$meta:meta])* $name:ident, $len:expr) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
        pub struct $name(pub [u8; $len]);

        impl $name {
            /// Raw bytes.
            pub fn as_bytes(&self) -> &[u8; $len] {
                &self.0
            }

            /// Build from a slice of exactly the right width.
            pub fn from_slice(bytes: &[u8]) -> Result<Self, IdParseError> {
                let arr: [u8; $len] = bytes.try_into().map_err(|_| IdParseError::Length {
                    expected: $len,
                    actual: bytes.len(),
                })?;
                Ok(Self(arr))
            }
        }

        impl From<[u8; $len]> for $name {
            fn from(bytes: [u8; $len]) -> Self {
                Self(bytes)
            }
        }

        impl AsRef<[u8]> for $name {
            fn as_ref(&self) -> &[u8] {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&hex::encode(self.0))
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), hex::encode(self.0))
            }
        }

        impl FromStr for $name {
            type Err = IdParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let trimmed = s.strip_prefix("0x").unwrap_or(s);
                let bytes = hex::decode(trimmed).map_err(|e| IdParseError::Hex(e.to_string()))?;
                Self::from_slice(&bytes)
            }
        }
    };
}

fixed_id!(
    /// Identifier of a network participant.
    NodeId,
    NODE_ID_LEN
);

fixed_id!(
    /// Identifier of a chain; resolved to its subnet by the validator-state oracle.
    ChainId,
    ID_LEN
);

fixed_id!(
    /// Identifier of a validator scope (the primary network or a subnet).
    SubnetId,
    ID_LEN
);

fixed_id!(
    /// Identifier of the staking transaction that added a validator.
    TxId,
    ID_LEN
);

/// The primary network's scope.
pub const PRIMARY_NETWORK_ID: SubnetId = SubnetId([0u8; ID_LEN]);

impl SubnetId {
    /// Whether this is the primary network.
    pub fn is_primary_network(&self) -> bool {
        *self == PRIMARY_NETWORK_ID
    }
}
