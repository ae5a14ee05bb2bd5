//! Centralized error types for the Surfs Up service.
//!
//! This module provides a typed error hierarchy that:
//! - Separates caller mistakes (bad dates) from store failures
//! - Provides short messages suitable for API error bodies
//! - Preserves full error context for logging

use thiserror::Error;

/// Top-level application error type.
///
/// All errors in the service should be convertible to this type.
/// Use `user_message()` to get a client-appropriate message.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl AppError {
    /// Returns a message suitable for returning to API clients.
    ///
    /// Store internals are never leaked; validation errors are echoed
    /// verbatim since they describe the caller's own input.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation(e) => e.to_string(),
            AppError::Database(e) => e.user_message().to_string(),
            AppError::Config(e) => e.user_message().to_string(),
            AppError::Io(_) => "A file operation failed.".to_string(),
            AppError::Other(_) => "An unexpected error occurred.".to_string(),
        }
    }

    /// True when the error was caused by the request rather than the service.
    pub fn is_client_error(&self) -> bool {
        matches!(self, AppError::Validation(_))
    }
}

/// Request parameter errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Invalid {field} '{value}': dates must be written as YYYY-MM-DD")]
    InvalidDate { field: &'static str, value: String },
}

impl ValidationError {
    /// Create an invalid date error for the named parameter.
    pub fn invalid_date(field: &'static str, value: impl Into<String>) -> Self {
        ValidationError::InvalidDate {
            field,
            value: value.into(),
        }
    }
}

/// Database/storage errors (SQLite).
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Database unavailable: {0}")]
    Unavailable(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    #[error("Data corruption detected: {0}")]
    Corruption(String),

    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),
}

impl DatabaseError {
    pub fn user_message(&self) -> &'static str {
        match self {
            DatabaseError::Unavailable(_) => {
                "The observation store is unavailable. Please try again later."
            }
            DatabaseError::QueryFailed(_) => "The query could not be completed.",
            DatabaseError::Corruption(_) => "The observation store appears to be corrupted.",
            DatabaseError::SchemaMismatch(_) => {
                "The observation store does not have the expected layout."
            }
        }
    }

    /// True for transient failures worth retrying later.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, DatabaseError::Unavailable(_))
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Configuration parse error: {0}")]
    ParseError(String),
}

impl ConfigError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ConfigError::NotFound(_) => "Configuration not found. Using defaults.",
            ConfigError::Invalid(_) => "Invalid configuration. Check your settings.",
            ConfigError::ParseError(_) => "Configuration file is malformed. Check your settings.",
        }
    }
}

/// Extension trait for converting rusqlite errors to our error types.
pub trait RusqliteErrorExt {
    fn into_database_error(self) -> DatabaseError;
}

impl RusqliteErrorExt for rusqlite::Error {
    fn into_database_error(self) -> DatabaseError {
        use rusqlite::ErrorCode;

        match &self {
            rusqlite::Error::SqliteFailure(err, _)
                if matches!(
                    err.code,
                    ErrorCode::CannotOpen
                        | ErrorCode::DatabaseBusy
                        | ErrorCode::DatabaseLocked
                        | ErrorCode::PermissionDenied
                ) =>
            {
                DatabaseError::Unavailable(self.to_string())
            }
            rusqlite::Error::SqliteFailure(err, _)
                if matches!(err.code, ErrorCode::DatabaseCorrupt | ErrorCode::NotADatabase) =>
            {
                DatabaseError::Corruption(self.to_string())
            }
            rusqlite::Error::SqliteFailure(_, Some(msg)) if msg.contains("corrupt") => {
                DatabaseError::Corruption(self.to_string())
            }
            _ => DatabaseError::QueryFailed(self.to_string()),
        }
    }
}
