//! Error types for the protocol crate.

use thiserror::Error;

/// Result type for protocol operations.
pub type ProtocolResult<T> = Result<T, ProtocolError>;

/// Errors raised while interpreting wire payloads.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The JSON payload did not match the expected shape.
    #[error("invalid payload: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err: ProtocolError = serde_json::from_str::<u32>("\"x\"").unwrap_err().into();
        assert!(err.to_string().starts_with("invalid payload:"));
    }
}
