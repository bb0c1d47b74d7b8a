//! # Storage Error Types
//!
//! Errors raised by durable storage operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                            │
//! │                                                                 │
//! │  Backend failure (sqlite, serde, io)                            │
//! │       │                                                         │
//! │       ▼                                                         │
//! │  StoreError (this module)                                       │
//! │       │                                                         │
//! │       ▼                                                         │
//! │  PersistedStore: logged at warn, retried on the next flush.     │
//! │  In-memory state stays authoritative; nothing reaches the user. │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Errors from the durable storage layer.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Store name is not a usable storage key.
    #[error("invalid store name: {0}")]
    InvalidName(String),

    /// Backend read/write failed.
    #[error("backend error: {0}")]
    Backend(String),

    /// Cannot connect to or open the storage medium.
    #[error("connection error: {0}")]
    Connection(String),

    /// Persisted blob could not be serialized or deserialized.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for storage operations.
pub type Result<T> = std::result::Result<T, StoreError>;

impl StoreError {
    /// Whether retrying the operation (on the next flush) can succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            StoreError::Backend(_)
                | StoreError::Connection(_)
                | StoreError::Database(_)
                | StoreError::Io(_)
        )
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StoreError::InvalidName("".to_string());
        assert!(err.to_string().contains("invalid store name"));
    }

    #[test]
    fn test_retryable_errors() {
        assert!(StoreError::Backend("write failed".to_string()).is_retryable());
        assert!(StoreError::Connection("no disk".to_string()).is_retryable());
        assert!(!StoreError::InvalidName("x".to_string()).is_retryable());
        assert!(!StoreError::Serialization("bad json".to_string()).is_retryable());
    }
}
