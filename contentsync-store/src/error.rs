//! Error types for the state store layer.

use thiserror::Error;

/// Result type for state store operations.
pub type StateStoreResult<T> = Result<T, StateStoreError>;

/// Errors that can occur in state store operations.
#[derive(Debug, Error)]
pub enum StateStoreError {
    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Stored data that cannot be decoded.
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// Backend-specific storage failure.
    #[error("storage error: {0}")]
    Storage(String),
}
