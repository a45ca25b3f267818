//! Error types for relq

use thiserror::Error;

/// Result type alias for relq operations
pub type RelqResult<T> = Result<T, RelqError>;

/// Boxed driver error carried by [`RelqError::Connection`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Error types for query construction, execution and scanning
#[derive(Debug, Error)]
pub enum RelqError {
    /// Dialect name not recognized by [`Dialect::by_name`](crate::Dialect::by_name)
    #[error("unsupported DB dialect: {0}")]
    UnsupportedDialect(String),

    /// Builder state rejected before any SQL was emitted
    #[error("Validation error: {0}")]
    Validation(String),

    /// A scan key or relationship column is missing from the active selections
    #[error("key not found in active selections: {0}")]
    KeyNotFound(String),

    /// Row decode/mapping error
    #[error("Decode error on column {index}: {message}")]
    Decode { index: usize, message: String },

    /// Error raised by the caller's connection, passed through untouched
    #[error("Connection error: {0}")]
    Connection(#[source] BoxError),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl RelqError {
    /// Create a decode error for a column position
    pub fn decode(index: usize, message: impl Into<String>) -> Self {
        Self::Decode {
            index,
            message: message.into(),
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a key-not-found error
    pub fn key_not_found(what: impl Into<String>) -> Self {
        Self::KeyNotFound(what.into())
    }

    /// Wrap a driver error coming from a [`Connection`](crate::Connection) implementation
    pub fn connection(err: impl Into<BoxError>) -> Self {
        Self::Connection(err.into())
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this is a key-not-found error
    pub fn is_key_not_found(&self) -> bool {
        matches!(self, Self::KeyNotFound(_))
    }

    /// Check if this is a decode error
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode { .. })
    }

    /// Check if this error came from the connection
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }

    /// Attach a column position to a decode error that was raised without one.
    pub(crate) fn at_column(self, index: usize) -> Self {
        match self {
            Self::Decode { message, .. } => Self::Decode { index, message },
            other => other,
        }
    }
}
