//! Rostersync CLI
//!
//! Command-line front end for student roster synchronization.
//!
//! # Commands
//!
//! - `fetch` - Fetch the remote listing and save it
//! - `post` - Submit stored students to a remote URL in batches
//! - `list` - Print stored students
//! - `serve` - Expose the sync operations over HTTP

mod commands;

use clap::{Parser, Subcommand};
use commands::CliStore;
use rostersync_engine::{
    Strategy, SyncConfig, DEFAULT_BATCH_SIZE, DEFAULT_FETCH_URL, DEFAULT_MAX_IN_FLIGHT,
};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Student roster synchronization.
#[derive(Parser)]
#[command(name = "rostersync")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON file backing the student store (in-memory if omitted)
    #[arg(global = true, long)]
    store: Option<PathBuf>,

    /// Remote listing fetched by `fetch`
    #[arg(global = true, long, default_value = DEFAULT_FETCH_URL)]
    fetch_url: String,

    /// Per-request timeout in seconds
    #[arg(global = true, long, default_value_t = 10)]
    timeout_secs: u64,

    /// Students per outbound batch
    #[arg(global = true, long, default_value_t = DEFAULT_BATCH_SIZE)]
    batch_size: usize,

    /// Outbound batches in flight at once (reactive strategy)
    #[arg(global = true, long, default_value_t = DEFAULT_MAX_IN_FLIGHT)]
    max_in_flight: usize,

    /// Output format (text, json)
    #[arg(global = true, long, default_value = "text")]
    format: String,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the remote listing and save every record
    Fetch {
        /// Request strategy (reactive, blocking)
        #[arg(short, long, default_value = "reactive")]
        strategy: Strategy,
    },

    /// Submit every stored student to a remote URL
    Post {
        /// Request strategy (reactive, blocking)
        #[arg(short, long, default_value = "reactive")]
        strategy: Strategy,

        /// Destination URL
        #[arg(short, long)]
        url: Option<String>,
    },

    /// Print stored students
    List,

    /// Serve the sync operations over HTTP
    Serve {
        /// Address to bind to
        #[arg(short, long, default_value = "127.0.0.1:8080")]
        bind: SocketAddr,
    },

    /// Show version information
    Version,
}

impl Cli {
    fn sync_config(&self) -> SyncConfig {
        SyncConfig::new(self.fetch_url.clone())
            .with_timeout(Duration::from_secs(self.timeout_secs))
            .with_batch_size(self.batch_size)
            .with_max_in_flight(self.max_in_flight)
    }
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging; RUST_LOG wins over --verbose
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = cli.sync_config();
    let store = CliStore::open(cli.store.as_deref())?;

    let succeeded = match cli.command {
        Commands::Fetch { strategy } => commands::fetch::run(store, config, strategy, &cli.format)?,
        Commands::Post { strategy, url } => {
            let url = url.unwrap_or_default();
            commands::post::run(store, config, strategy, &url, &cli.format)?
        }
        Commands::List => commands::list::run(&store, &cli.format)?,
        Commands::Serve { bind } => commands::serve::run(store, config, bind)?,
        Commands::Version => {
            println!("rostersync v{}", env!("CARGO_PKG_VERSION"));
            true
        }
    };

    Ok(if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn post_arguments_parse() {
        let cli = Cli::parse_from([
            "rostersync",
            "--batch-size",
            "5",
            "post",
            "--strategy",
            "blocking",
            "--url",
            "http://remote/ingest",
        ]);

        assert_eq!(cli.sync_config().batch_size, 5);
        match cli.command {
            Commands::Post { strategy, url } => {
                assert_eq!(strategy, Strategy::Blocking);
                assert_eq!(url.as_deref(), Some("http://remote/ingest"));
            }
            _ => panic!("expected post"),
        }
    }

    #[test]
    fn unknown_strategy_is_rejected() {
        assert!(Cli::try_parse_from(["rostersync", "fetch", "-s", "fax"]).is_err());
    }
}
