//! Storage error types.
//!
//! Raised by store backends, the connection supervisor and [`crate::StorageAdapter`].
//! Callers log them; none of them is fatal once the pipeline is running.

use thiserror::Error;

/// Errors that can occur when using storage operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// The connection is unusable: initial connect, lost mid-operation, or rejected while disconnected.
    #[error("Connection failure: {0}")]
    ConnectionFailure(String),
    /// The backend rejected a write over a live connection (constraint, validation, decode).
    #[error("Write failure: {0}")]
    WriteFailure(String),
    /// Required configuration is missing or invalid. Fatal at startup.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

impl StorageError {
    pub fn is_connection_failure(&self) -> bool {
        matches!(self, StorageError::ConnectionFailure(_))
    }
}

/// Classifies driver errors into connection-level and write-level failures.
impl From<sqlx::Error> for StorageError {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::Protocol(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed
            | sqlx::Error::Configuration(_) => StorageError::ConnectionFailure(e.to_string()),
            _ => StorageError::WriteFailure(e.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, StorageError>;
