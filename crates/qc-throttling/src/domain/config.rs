//! Throttler configuration and validation
//!
//! # Example
//!
//! ```ignore
//! use qc_throttling::MsgByteThrottlerConfig;
//!
//! let config = MsgByteThrottlerConfig::default()
//!     .with_vdr_alloc_size(64 * MIB)
//!     .with_node_max_at_large_bytes(MIB);
//! config.validate()?;
//! ```

use serde::{Deserialize, Serialize};

use super::errors::ConfigError;

/// One mebibyte.
pub const MIB: u64 = 1024 * 1024;

/// Byte budgets for the sybil-safe message throttler.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MsgByteThrottlerConfig {
    /// Bytes reserved for validators, shared by stake weight.
    pub vdr_alloc_size: u64,
    /// Bytes available to any peer, validator or not.
    pub at_large_alloc_size: u64,
    /// Per-node cap on what one node may hold from the at-large pool.
    pub node_max_at_large_bytes: u64,
}

impl Default for MsgByteThrottlerConfig {
    fn default() -> Self {
        Self {
            vdr_alloc_size: 32 * MIB,
            at_large_alloc_size: 6 * MIB,
            node_max_at_large_bytes: 2 * MIB,
        }
    }
}

impl MsgByteThrottlerConfig {
    pub fn new(
        vdr_alloc_size: u64,
        at_large_alloc_size: u64,
        node_max_at_large_bytes: u64,
    ) -> Result<Self, ConfigError> {
        let config = Self {
            vdr_alloc_size,
            at_large_alloc_size,
            node_max_at_large_bytes,
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject budgets the throttler cannot account for.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.vdr_alloc_size == 0 && self.at_large_alloc_size == 0 {
            return Err(ConfigError::InvalidParameters(
                "vdrAllocSize and atLargeAllocSize cannot both be 0".to_string(),
            ));
        }
        if self
            .vdr_alloc_size
            .checked_add(self.at_large_alloc_size)
            .is_none()
        {
            return Err(ConfigError::InvalidParameters(format!(
                "vdrAllocSize {} + atLargeAllocSize {} overflows",
                self.vdr_alloc_size, self.at_large_alloc_size
            )));
        }
        Ok(())
    }

    /// Sum of both pools.
    pub fn total_alloc_size(&self) -> u64 {
        self.vdr_alloc_size.saturating_add(self.at_large_alloc_size)
    }

    /// Builder-style method to set the validator pool
    pub fn with_vdr_alloc_size(mut self, bytes: u64) -> Self {
        self.vdr_alloc_size = bytes;
        self
    }

    /// Builder-style method to set the at-large pool
    pub fn with_at_large_alloc_size(mut self, bytes: u64) -> Self {
        self.at_large_alloc_size = bytes;
        self
    }

    /// Builder-style method to set the per-node at-large cap
    pub fn with_node_max_at_large_bytes(mut self, bytes: u64) -> Self {
        self.node_max_at_large_bytes = bytes;
        self
    }
}
