//! Result envelopes.

use crate::error::ProtocolResult;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Loosely typed body returned by a successful batch submit.
pub type ResponseBody = serde_json::Value;

/// Outcome classification carried by a [`ResultEnvelope`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SyncStatus {
    /// The operation completed.
    Success,
    /// The operation failed; the message says why.
    Failure,
}

impl SyncStatus {
    /// Returns the wire name of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncStatus::Success => "SUCCESS",
            SyncStatus::Failure => "FAILURE",
        }
    }
}

impl fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The uniform outcome of an orchestrated sync call.
///
/// Envelopes are immutable: the message and status are fixed at
/// construction and only readable afterwards. Callers branch on
/// [`status`](Self::status); the message is diagnostic text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultEnvelope {
    message: String,
    status: SyncStatus,
}

impl ResultEnvelope {
    /// Creates a successful envelope.
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: SyncStatus::Success,
        }
    }

    /// Creates a failed envelope.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: SyncStatus::Failure,
        }
    }

    /// Returns the human-readable message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the status.
    pub fn status(&self) -> SyncStatus {
        self.status
    }

    /// Returns true if the status is [`SyncStatus::Success`].
    pub fn is_success(&self) -> bool {
        self.status == SyncStatus::Success
    }

    /// Interprets a submit response body as an envelope.
    pub fn from_response_body(body: &ResponseBody) -> ProtocolResult<Self> {
        Ok(Self::deserialize(body)?)
    }
}

impl fmt::Display for ResultEnvelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.status, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn envelope_wire_format() {
        let envelope = ResultEnvelope::success("done");
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(value, json!({"message": "done", "status": "SUCCESS"}));
    }

    #[test]
    fn envelope_from_response_body() {
        let body = json!({"message": "rejected", "status": "FAILURE", "trace": "abc"});
        let envelope = ResultEnvelope::from_response_body(&body).unwrap();
        assert_eq!(envelope.status(), SyncStatus::Failure);
        assert_eq!(envelope.message(), "rejected");
        assert!(!envelope.is_success());
    }

    #[test]
    fn envelope_from_unrelated_body_fails() {
        let body = json!([1, 2, 3]);
        assert!(ResultEnvelope::from_response_body(&body).is_err());
    }

    #[test]
    fn envelope_display() {
        let envelope = ResultEnvelope::failure("No students found in the database");
        assert_eq!(
            envelope.to_string(),
            "[FAILURE] No students found in the database"
        );
    }
}
