//! Fetch command implementation.

use super::{build_service, print_envelope, CliStore};
use rostersync_engine::{Strategy, SyncConfig};
use rostersync_store::StudentStore;
use tracing::info;

/// Runs the fetch command. Returns whether the fetch succeeded.
pub fn run(
    store: CliStore,
    config: SyncConfig,
    strategy: Strategy,
    format: &str,
) -> Result<bool, Box<dyn std::error::Error>> {
    let service = build_service(store, config)?;

    let envelope = match strategy {
        Strategy::Reactive => {
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(service.fetch_and_save_reactive())
        }
        Strategy::Blocking => service.fetch_and_save_blocking(),
    };

    info!(stored = service.store().find_all()?.len(), "Store updated");
    print_envelope(&envelope, format)
}
