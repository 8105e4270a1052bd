//! Configuration for the sync engine.

use std::time::Duration;

/// Remote listing fetched by the inbound sync when no URL is configured.
pub const DEFAULT_FETCH_URL: &str = "https://example.org/students";

/// Per-call request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Number of students submitted per outbound request.
pub const DEFAULT_BATCH_SIZE: usize = 10;

/// Number of outbound batches the reactive strategy keeps in flight.
pub const DEFAULT_MAX_IN_FLIGHT: usize = 4;

/// Configuration for sync operations.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// URL of the remote student listing.
    pub fetch_url: String,
    /// Timeout applied to every individual request.
    ///
    /// Each batch of an outbound sync gets a fresh budget; there is no
    /// deadline spanning the whole operation.
    pub timeout: Duration,
    /// Maximum number of students per outbound batch.
    pub batch_size: usize,
    /// Maximum number of batches the reactive strategy submits concurrently.
    pub max_in_flight: usize,
}

impl SyncConfig {
    /// Creates a configuration fetching from `fetch_url`.
    pub fn new(fetch_url: impl Into<String>) -> Self {
        Self {
            fetch_url: fetch_url.into(),
            timeout: DEFAULT_TIMEOUT,
            batch_size: DEFAULT_BATCH_SIZE,
            max_in_flight: DEFAULT_MAX_IN_FLIGHT,
        }
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the outbound batch size.
    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size;
        self
    }

    /// Sets how many outbound batches may be in flight at once.
    ///
    /// Values below one are treated as one.
    pub fn with_max_in_flight(mut self, max: usize) -> Self {
        self.max_in_flight = max.max(1);
        self
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self::new(DEFAULT_FETCH_URL)
    }
}
