//! Error types for the hierarchy stores

use thiserror::Error;

/// Result type alias for store and backend operations
pub type Result<T> = std::result::Result<T, BackendError>;

/// Category of a backend failure
///
/// Stores treat every kind the same way (the error is returned to the caller,
/// never retried); the kind exists so outer layers can pick a status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendErrorKind {
    /// The addressed record does not exist
    NotFound,

    /// A key, foreign-key, not-null or check constraint rejected the request
    Constraint,

    /// The backend could not be reached or failed internally
    Transport,

    /// A record or filter did not match the table layout
    Malformed,
}

impl std::fmt::Display for BackendErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendErrorKind::NotFound => write!(f, "not found"),
            BackendErrorKind::Constraint => write!(f, "constraint violation"),
            BackendErrorKind::Transport => write!(f, "transport error"),
            BackendErrorKind::Malformed => write!(f, "malformed record"),
        }
    }
}

/// Failure reported by (or on behalf of) the relational backend
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct BackendError {
    pub kind: BackendErrorKind,
    pub message: String,
}

impl BackendError {
    pub fn new(kind: BackendErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(BackendErrorKind::NotFound, message)
    }

    pub fn constraint(message: impl Into<String>) -> Self {
        Self::new(BackendErrorKind::Constraint, message)
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(BackendErrorKind::Transport, message)
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(BackendErrorKind::Malformed, message)
    }

    /// Check if this error is a "not found" error
    pub fn is_not_found(&self) -> bool {
        self.kind == BackendErrorKind::NotFound
    }

    /// Check if this error is a constraint violation
    pub fn is_constraint(&self) -> bool {
        self.kind == BackendErrorKind::Constraint
    }
}
