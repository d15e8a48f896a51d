//! Error types for sqlclause

use thiserror::Error;

/// Result type alias for sqlclause operations
pub type ClauseResult<T> = Result<T, ClauseError>;

/// Caller contract violations that have no safe fallback.
///
/// Inputs with a documented fallback (unknown clause names, rejected operator
/// symbols, unrecognized sanitizer tokens) never produce an error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClauseError {
    /// A comparison received values it cannot render (wrong arity, empty set)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The builder is not in a state that allows the call (no current field)
    #[error("Invalid state: {0}")]
    InvalidState(String),
}

impl ClauseError {
    /// Create an invalid argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Create an invalid state error
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState(message.into())
    }

    /// Check if this is an invalid argument error
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }

    /// Check if this is an invalid state error
    pub fn is_invalid_state(&self) -> bool {
        matches!(self, Self::InvalidState(_))
    }
}
