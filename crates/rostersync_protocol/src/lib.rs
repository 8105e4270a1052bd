//! # Rostersync Protocol
//!
//! Wire types exchanged with remote student collections.
//!
//! This crate provides:
//! - `StudentRecord` / `SubjectRecord` as decoded from a remote listing
//! - `ResultEnvelope` and `SyncStatus`, the uniform outcome of every sync call
//! - `ResponseBody`, the loosely typed JSON body returned by a batch submit
//!
//! Decoding is forward compatible: unknown fields are ignored and missing
//! fields decode as absent.
//!
//! This is a pure protocol crate with no I/O operations.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod envelope;
mod error;
mod record;

pub use envelope::{ResponseBody, ResultEnvelope, SyncStatus};
pub use error::{ProtocolError, ProtocolResult};
pub use record::{StudentRecord, SubjectRecord};
