//! Store-level error type.

use surfsup_core::{AppError, DatabaseError, RusqliteErrorExt, ValidationError};
use thiserror::Error;

/// Errors that can occur while answering a query.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A request parameter could not be used (e.g. malformed date).
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The database could not be opened or queried.
    #[error(transparent)]
    Database(#[from] DatabaseError),

    /// The blocking query task panicked or was cancelled.
    #[error("Query task failed: {0}")]
    Task(String),
}

impl StoreError {
    /// Create a schema mismatch error.
    pub fn schema(message: impl Into<String>) -> Self {
        Self::Database(DatabaseError::SchemaMismatch(message.into()))
    }

    /// True when the store itself could not be reached.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Database(e) if e.is_unavailable())
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        Self::Database(e.into_database_error())
    }
}

impl From<tokio::task::JoinError> for StoreError {
    fn from(e: tokio::task::JoinError) -> Self {
        Self::Task(e.to_string())
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Validation(e) => AppError::Validation(e),
            StoreError::Database(e) => AppError::Database(e),
            StoreError::Task(msg) => AppError::Other(anyhow::anyhow!(msg)),
        }
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
