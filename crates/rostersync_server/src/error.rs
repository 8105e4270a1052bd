//! Error types for the sync server.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use rostersync_engine::SyncError;
use thiserror::Error;
use tracing::error;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

/// Errors that can occur in the sync server.
///
/// Handlers return these for failures that escape the sync service; each
/// variant maps to one HTTP response.
#[derive(Error, Debug)]
pub enum ServerError {
    /// The remote answered with an error status.
    #[error("API error: {message}")]
    Api {
        /// Status reported by the remote.
        status: u16,
        /// Diagnostic message.
        message: String,
    },

    /// The operation did not finish in time.
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// Any other failure.
    #[error("internal error: {0}")]
    Internal(String),

    /// Listener could not be bound.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        /// Requested address.
        addr: std::net::SocketAddr,
        /// Underlying error.
        source: std::io::Error,
    },

    /// I/O error while serving.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ServerError {
    /// Returns the HTTP status this error is answered with.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServerError::Api { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            ServerError::Timeout(_) => StatusCode::REQUEST_TIMEOUT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns true if this is a client error (4xx).
    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }

    /// Returns true if this is a server error (5xx).
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }
}

impl From<SyncError> for ServerError {
    fn from(err: SyncError) -> Self {
        match err {
            SyncError::Transport {
                status: Some(status),
                message,
            } => ServerError::Api { status, message },
            SyncError::Timeout(_) => ServerError::Timeout(err.to_string()),
            other => ServerError::Internal(other.to_string()),
        }
    }
}

impl From<tokio::task::JoinError> for ServerError {
    fn from(err: tokio::task::JoinError) -> Self {
        ServerError::Internal(format!("sync task failed: {err}"))
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match &self {
            ServerError::Api { .. } | ServerError::Timeout(_) => self.to_string(),
            _ => {
                error!(error = %self, "Unhandled server error");
                "An unexpected error occurred".to_string()
            }
        };
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn error_classification() {
        let api = ServerError::Api {
            status: 404,
            message: "missing".into(),
        };
        assert!(api.is_client_error());
        assert_eq!(api.status_code(), StatusCode::NOT_FOUND);

        assert!(ServerError::Timeout("slow".into()).is_client_error());
        assert_eq!(
            ServerError::Timeout("slow".into()).status_code(),
            StatusCode::REQUEST_TIMEOUT
        );
        assert!(ServerError::Internal("oops".into()).is_server_error());
    }

    #[test]
    fn out_of_range_status_is_bad_gateway() {
        let err = ServerError::Api {
            status: 1000,
            message: "weird".into(),
        };
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn sync_error_conversion() {
        let err: ServerError = SyncError::status(503, "down").into();
        assert!(matches!(err, ServerError::Api { status: 503, .. }));
        assert_eq!(err.to_string(), "API error: down");

        let err: ServerError = SyncError::Timeout(Duration::from_secs(10)).into();
        assert_eq!(err.to_string(), "Request timed out: request timed out after 10s");

        let err: ServerError = SyncError::connection("refused").into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
