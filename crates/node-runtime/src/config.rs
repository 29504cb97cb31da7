//! # Trust Configuration
//!
//! Throttler budgets, the warp quorum and logging options for a node.
//!
//! ## Sources (later wins)
//!
//! 1. Built-in defaults
//! 2. JSON file (path from the first CLI argument or `QC_TRUST_CONFIG`)
//! 3. Environment overrides:
//!    `QC_NETWORK_ID`, `QC_VDR_ALLOC_SIZE`, `QC_AT_LARGE_ALLOC_SIZE`,
//!    `QC_NODE_MAX_AT_LARGE_BYTES`, `QC_QUORUM_NUM`, `QC_QUORUM_DEN`,
//!    `QC_LOG_LEVEL`, `QC_JSON_LOGS`
//!
//! The result is validated before any component is built.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use qc_throttling::MsgByteThrottlerConfig;
use qc_warp::{QuorumConfig, WarpError};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

/// Environment variable naming the config file.
pub const CONFIG_PATH_ENV: &str = "QC_TRUST_CONFIG";

/// Configuration errors. Fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid value for {key}: {value:?}")]
    InvalidEnv { key: &'static str, value: String },

    #[error(transparent)]
    Throttler(#[from] qc_throttling::ConfigError),

    #[error("Invalid quorum: {0}")]
    Quorum(#[source] WarpError),
}

/// Logging options.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub level: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Complete trust-subsystem configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TrustConfig {
    /// Network the warp messages belong to.
    pub network_id: u32,
    pub throttler: MsgByteThrottlerConfig,
    pub quorum: QuorumConfig,
    pub logging: LoggingConfig,
}

impl Default for TrustConfig {
    fn default() -> Self {
        Self {
            network_id: 1,
            throttler: MsgByteThrottlerConfig::default(),
            quorum: QuorumConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl TrustConfig {
    /// Load from `path` (if any), apply environment overrides and validate.
    ///
    /// A path that does not exist falls back to defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) if path.exists() => Self::from_file(path)?,
            Some(path) => {
                warn!(path = %path.display(), "Config file not found, using defaults");
                Self::default()
            }
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), "Loaded trust configuration");
        Ok(config)
    }

    /// Apply overrides from `lookup`, normally the process environment.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        override_parsed(&lookup, "QC_NETWORK_ID", &mut self.network_id)?;
        override_parsed(&lookup, "QC_VDR_ALLOC_SIZE", &mut self.throttler.vdr_alloc_size)?;
        override_parsed(
            &lookup,
            "QC_AT_LARGE_ALLOC_SIZE",
            &mut self.throttler.at_large_alloc_size,
        )?;
        override_parsed(
            &lookup,
            "QC_NODE_MAX_AT_LARGE_BYTES",
            &mut self.throttler.node_max_at_large_bytes,
        )?;
        override_parsed(&lookup, "QC_QUORUM_NUM", &mut self.quorum.quorum_num)?;
        override_parsed(&lookup, "QC_QUORUM_DEN", &mut self.quorum.quorum_den)?;
        if let Some(level) = lookup("QC_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(json) = lookup("QC_JSON_LOGS") {
            self.logging.json = json.to_lowercase() == "true" || json == "1";
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.throttler.validate()?;
        self.quorum.validate().map_err(ConfigError::Quorum)?;
        Ok(())
    }
}

fn override_parsed<F, T>(lookup: &F, key: &'static str, target: &mut T) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    if let Some(value) = lookup(key) {
        *target = value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidEnv { key, value })?;
    }
    Ok(())
}
