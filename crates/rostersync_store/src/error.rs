//! Error types for the student store.

use crate::id::StudentId;
use std::io;
use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur in store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A required column was empty.
    #[error("missing required field: {field}")]
    MissingField {
        /// Name of the field.
        field: &'static str,
    },

    /// Another student already uses this email.
    #[error("duplicate email: {email} is already used by student {existing}")]
    DuplicateEmail {
        /// The conflicting email.
        email: String,
        /// The student that owns it.
        existing: StudentId,
    },

    /// No student with this id.
    #[error("student not found: {0}")]
    NotFound(StudentId),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Snapshot encoding error.
    #[error("snapshot codec error: {0}")]
    Codec(#[from] serde_json::Error),
}

impl StoreError {
    /// Returns true if the error is a constraint violation rather than an
    /// I/O or codec failure.
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            StoreError::MissingField { .. } | StoreError::DuplicateEmail { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = StoreError::DuplicateEmail {
            email: "john@example.com".into(),
            existing: StudentId::new(7),
        };
        let msg = err.to_string();
        assert!(msg.contains("john@example.com"));
        assert!(msg.contains('7'));
    }

    #[test]
    fn constraint_classification() {
        assert!(StoreError::MissingField { field: "email" }.is_constraint_violation());
        assert!(!StoreError::NotFound(StudentId::new(1)).is_constraint_violation());
    }
}
