//! Error types for the sync engine.

use contentsync_store::StateStoreError;
use thiserror::Error;

/// Result type for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors that can occur in sync operations.
///
/// Index-client failures are deliberately *not* here: an unavailable index
/// is a non-fatal outcome (`SyncOutcome::IndexUnavailable`), not an error,
/// because nothing is mutated and the next event or bulk pass retries.
/// State-store failures do surface as errors — a swallowed cursor or marker
/// write would break resumability.
#[derive(Debug, Error)]
pub enum SyncError {
    /// State store failure (cursor/marker/document-id persistence).
    #[error("state store error: {0}")]
    Store(#[from] StateStoreError),

    /// Content store lookup failure.
    #[error("content store error: {0}")]
    ContentStore(String),

    /// Routing config lookup failure.
    #[error("config error: {0}")]
    Config(String),

    /// Index client transport failure surfaced by a collaborator.
    #[error("index client error: {0}")]
    Index(String),
}
