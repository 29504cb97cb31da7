//! # Node Runtime Library
//!
//! Wiring for the stake-weighted trust subsystem. The main entry point is
//! the `main.rs` binary; the modules are exposed for integration tests.
//!
//! - `config`: JSON file plus environment overrides
//! - `telemetry`: `tracing-subscriber` setup
//! - `registry`: per-subnet validator sets and throttlers, and the
//!   validator-state oracle over them

pub mod config;
pub mod registry;
pub mod telemetry;

pub use config::{ConfigError, LoggingConfig, TrustConfig, CONFIG_PATH_ENV};
pub use registry::{RegistryError, ScopeRegistry, TrustScope};
pub use telemetry::{init_logging, TelemetryError};
