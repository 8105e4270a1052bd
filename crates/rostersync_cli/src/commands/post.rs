//! Post command implementation.

use super::{build_service, print_envelope, CliStore};
use rostersync_engine::{Strategy, SyncConfig};

/// Runs the post command. Returns whether every batch was accepted.
pub fn run(
    store: CliStore,
    config: SyncConfig,
    strategy: Strategy,
    url: &str,
    format: &str,
) -> Result<bool, Box<dyn std::error::Error>> {
    let service = build_service(store, config)?;

    let envelope = match strategy {
        Strategy::Reactive => {
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(service.post_reactive(url))
        }
        Strategy::Blocking => service.post_blocking(url),
    };

    print_envelope(&envelope, format)
}
