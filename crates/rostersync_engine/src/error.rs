//! Error types for the sync engine.

use rostersync_store::StoreError;
use std::time::Duration;
use thiserror::Error;

/// Result type for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors that can occur during sync operations.
///
/// The service folds every variant into a failed envelope; the variants
/// stay distinct so outer layers can still tell a timeout from a rejected
/// request.
#[derive(Error, Debug)]
pub enum SyncError {
    /// Rejected before any network or store call.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Non-2xx response, connection failure or undecodable body.
    #[error("transport error: {message}")]
    Transport {
        /// HTTP status, when a response was received.
        status: Option<u16>,
        /// Diagnostic message.
        message: String,
    },

    /// The call did not complete within its budget.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// Store collaborator failure.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl SyncError {
    /// Creates an invalid-input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Creates a transport error for a response with the given status.
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self::Transport {
            status: Some(status),
            message: message.into(),
        }
    }

    /// Creates a transport error for a request that got no response.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Transport {
            status: None,
            message: message.into(),
        }
    }

    /// Returns the HTTP status carried by the error, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            SyncError::Transport { status, .. } => *status,
            _ => None,
        }
    }

    /// Returns true if the call exceeded its timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, SyncError::Timeout(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_code_only_for_responses() {
        assert_eq!(SyncError::status(503, "unavailable").status_code(), Some(503));
        assert_eq!(SyncError::connection("refused").status_code(), None);
        assert_eq!(SyncError::Timeout(Duration::from_secs(1)).status_code(), None);
    }

    #[test]
    fn timeout_classification() {
        assert!(SyncError::Timeout(Duration::from_secs(10)).is_timeout());
        assert!(!SyncError::status(504, "gateway timeout").is_timeout());
    }

    #[test]
    fn error_display() {
        let err = SyncError::Timeout(Duration::from_secs(10));
        assert_eq!(err.to_string(), "request timed out after 10s");

        let err = SyncError::status(500, "GET request failed with status code: 500");
        assert_eq!(
            err.to_string(),
            "transport error: GET request failed with status code: 500"
        );

        let err: SyncError = StoreError::MissingField { field: "email" }.into();
        assert!(err.to_string().contains("email"));
    }
}
