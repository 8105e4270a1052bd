//! Serve command implementation.

use super::{build_service, CliStore};
use rostersync_engine::SyncConfig;
use rostersync_server::{ServerConfig, SyncServer};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};

/// Runs the HTTP server until Ctrl-C.
pub fn run(
    store: CliStore,
    config: SyncConfig,
    bind: SocketAddr,
) -> Result<bool, Box<dyn std::error::Error>> {
    let service = Arc::new(build_service(store, config)?);
    let server = SyncServer::new(ServerConfig::new(bind), service);

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(server.run(async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for shutdown signal");
            return;
        }
        info!("Shutdown signal received");
    }))?;

    Ok(true)
}
