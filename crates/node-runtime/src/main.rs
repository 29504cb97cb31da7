//! # Trust Node Runtime
//!
//! ## Startup Sequence
//!
//! 1. Load configuration (file, then environment)
//! 2. Initialize logging
//! 3. Activate the primary-network scope
//! 4. Build the warp verifier over the scope registry
//! 5. Wait for Ctrl+C

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use qc_warp::WarpVerifier;
use shared_types::PRIMARY_NETWORK_ID;
use tracing::info;

use node_runtime::{init_logging, ScopeRegistry, TrustConfig, CONFIG_PATH_ENV};

/// Config path from the first CLI argument, else the environment.
fn config_path() -> Option<PathBuf> {
    std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from))
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = TrustConfig::load(config_path().as_deref())
        .context("failed to load trust configuration")?;
    init_logging(&config.logging).context("failed to initialize logging")?;

    let registry = Arc::new(ScopeRegistry::new(config.throttler.clone()));
    let primary = registry
        .activate(PRIMARY_NETWORK_ID)
        .context("failed to activate primary network scope")?;
    let verifier = WarpVerifier::new(Arc::clone(&registry), config.quorum)
        .context("failed to build warp verifier")?;

    info!(
        network_id = config.network_id,
        vdr_alloc_size = config.throttler.vdr_alloc_size,
        at_large_alloc_size = config.throttler.at_large_alloc_size,
        node_max_at_large_bytes = config.throttler.node_max_at_large_bytes,
        quorum_num = verifier.quorum().quorum_num,
        quorum_den = verifier.quorum().quorum_den,
        validators = primary.validators.len(),
        "Trust subsystem ready. Press Ctrl+C to stop."
    );

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for Ctrl+C")?;

    info!(
        active_scopes = registry.active_scopes(),
        height = registry.current_height(),
        "Shutting down"
    );
    Ok(())
}
