//! Request-cycle error model.

use thiserror::Error;

/// Result type used across the request layer.
pub type GateResult<T> = Result<T, GateError>;

/// Request-level error.
///
/// Keep this focused on deterministic request failures (missing or malformed
/// input). Token and transport concerns belong elsewhere.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GateError {
    /// A required request parameter was absent or empty.
    #[error("missing parameter: {0}")]
    MissingParameter(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl GateError {
    pub fn missing(field: impl Into<String>) -> Self {
        Self::MissingParameter(field.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }
}
