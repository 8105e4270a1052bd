//! # Rostersync Server
//!
//! HTTP surface for rostersync.
//!
//! This crate provides:
//! - Routes triggering the four sync operations
//! - `/health` endpoint
//! - Mapping of escaped failures to HTTP responses
//! - Server lifecycle with graceful shutdown
//!
//! # Routes
//!
//! | Method | Path                                        | Operation                  |
//! |--------|---------------------------------------------|----------------------------|
//! | GET    | `/api/students/fetch/reactive`              | inbound sync, reactive     |
//! | GET    | `/api/students/fetch/blocking`              | inbound sync, blocking     |
//! | POST   | `/api/students/post/reactive?postUrl=<url>` | outbound sync, reactive    |
//! | POST   | `/api/students/post/blocking?postUrl=<url>` | outbound sync, blocking    |
//! | GET    | `/health`                                   | liveness                   |
//!
//! Sync routes answer `200` with a result envelope whatever the outcome.
//! Blocking operations run on the blocking thread pool, never on an async
//! worker.
//!
//! # Error mapping
//!
//! - Remote status error: that status, `API error: <message>`
//! - Timeout: `408`, `Request timed out: <message>`
//! - Anything else: `500`, `An unexpected error occurred`

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod config;
mod error;
mod handler;
mod server;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use handler::{build_router, AppState, HealthResponse, PostParams};
pub use server::SyncServer;
