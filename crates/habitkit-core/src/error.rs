//! Core error types for habitkit-core.
//!
//! This module defines the error hierarchy using thiserror so that storage,
//! configuration, validation and platform failures can be reported uniformly.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for habitkit-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Theme lookup errors
    #[error("Theme error: {0}")]
    Theme(#[from] ThemeError),

    /// Host capability errors (share sheet, notifications)
    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Database-specific errors.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Migration failed
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,

    /// Row was expected but not found
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Data directory could not be resolved or created
    #[error("Failed to prepare data directory {path}: {message}")]
    DataDir { path: PathBuf, message: String },

    /// Failed to load configuration
    #[error("Failed to load settings from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save settings to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown dot-path key
    #[error("unknown settings key: {0}")]
    UnknownKey(String),
}

/// Validation errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    /// Habit name is empty after trimming
    #[error("Habit name must not be empty")]
    EmptyName,

    /// Habit name exceeds the maximum length
    #[error("Habit name is {len} characters, maximum is {max}")]
    NameTooLong { len: usize, max: usize },

    /// A completion was marked for a day that has not happened yet
    #[error("Cannot mark {day} as completed: it is after {today}")]
    FutureDay {
        day: chrono::NaiveDate,
        today: chrono::NaiveDate,
    },

    /// Invalid calendar month
    #[error("Invalid month: {0} (expected 1-12)")]
    InvalidMonth(u32),

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Theme lookup errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ThemeError {
    /// The key is not one of the known theme names
    #[error("unknown theme '{name}' (expected one of: {known})")]
    UnknownTheme { name: String, known: String },
}

/// Errors reported by host capabilities.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlatformError {
    /// The user dismissed the share sheet
    #[error("Share was dismissed")]
    ShareDismissed,

    /// The capability is not available on this host
    #[error("{0} is not available on this platform")]
    Unavailable(&'static str),

    /// The capability failed
    #[error("{capability} failed: {message}")]
    Failed {
        capability: &'static str,
        message: String,
    },
}

impl From<rusqlite::Error> for DatabaseError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(err, _msg) => {
                if err.code == rusqlite::ErrorCode::DatabaseLocked
                    || err.code == rusqlite::ErrorCode::DatabaseBusy
                {
                    DatabaseError::Locked
                } else {
                    DatabaseError::QueryFailed(err.to_string())
                }
            }
            _ => DatabaseError::QueryFailed(err.to_string()),
        }
    }
}

impl From<rusqlite::Error> for CoreError {
    fn from(err: rusqlite::Error) -> Self {
        CoreError::Database(err.into())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
