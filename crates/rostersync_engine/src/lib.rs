//! # Rostersync Engine
//!
//! Student roster synchronization engine.
//!
//! This crate provides:
//! - Inbound sync (fetch a remote listing, save every record)
//! - Outbound sync (load stored students, submit them in batches)
//! - Two interchangeable transports: reactive (deferred) and blocking
//! - Batching policy
//! - Basic-Auth header injection
//! - A recording mock transport for tests
//!
//! ## Architecture
//!
//! The [`SyncService`] sits between a [`StudentStore`](rostersync_store::StudentStore)
//! and the remote endpoints:
//!
//! 1. Inbound: remote → transport → service → store
//! 2. Outbound: store → service → batching → transport → remote
//!
//! Which transport runs is decided by the operation the caller invokes.
//! Both transports classify responses through the same code path, so the
//! same remote behaviour yields the same envelope.
//!
//! ## Key Invariants
//!
//! - Every operation returns exactly one [`ResultEnvelope`](rostersync_protocol::ResultEnvelope)
//! - A failed fetch saves nothing
//! - A blank post URL never touches the store; an empty store never touches the transport
//! - Batches preserve store order; the first failed batch fails the operation
//! - Timeouts apply per request

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod batch;
mod blocking;
mod config;
mod error;
mod headers;
mod http;
mod mock;
mod reactive;
mod service;
mod transport;

pub use batch::partition;
pub use blocking::BlockingHttpClient;
pub use config::{
    SyncConfig, DEFAULT_BATCH_SIZE, DEFAULT_FETCH_URL, DEFAULT_MAX_IN_FLIGHT, DEFAULT_TIMEOUT,
};
pub use error::{SyncError, SyncResult};
pub use headers::{BasicAuthHeaders, HeaderProvider, HeaderSet};
pub use mock::{MockTransport, RecordedCall};
pub use reactive::ReactiveHttpClient;
pub use service::{student_from_record, Strategy, SyncService};
pub use transport::{BlockingTransport, Deferred, ReactiveTransport};
