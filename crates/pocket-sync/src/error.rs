//! # Sync Error Types
//!
//! Error types for the offline queue and its drain loop.
//!
//! Per-item replay failures never surface through these types: the drain
//! catches them, counts them, and leaves the affected records pending. What
//! does propagate is unexpected trouble - storage failures and
//! configuration mistakes.

use thiserror::Error;

use pocket_db::DbError;

/// Sync engine errors.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Durable storage failed underneath the queue.
    #[error("Storage error: {0}")]
    Db(#[from] DbError),

    /// The backend rejected or never received a request.
    ///
    /// Carries the HTTP status when one was received; `None` means the
    /// request never completed (connection refused, timeout, DNS).
    #[error("Backend error{}: {message}", status.map(|s| format!(" (HTTP {s})")).unwrap_or_default())]
    Backend {
        status: Option<u16>,
        message: String,
    },

    /// Configuration is missing or inconsistent.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl SyncError {
    /// Creates a backend error without an HTTP status.
    pub fn backend(message: impl Into<String>) -> Self {
        SyncError::Backend {
            status: None,
            message: message.into(),
        }
    }
}

/// Result type for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_error_messages() {
        let err = SyncError::Backend {
            status: Some(503),
            message: "service unavailable".to_string(),
        };
        assert_eq!(err.to_string(), "Backend error (HTTP 503): service unavailable");

        let err = SyncError::backend("connection refused");
        assert_eq!(err.to_string(), "Backend error: connection refused");
    }

    #[test]
    fn test_db_error_converts() {
        let err: SyncError = DbError::PoolExhausted.into();
        assert!(matches!(err, SyncError::Db(_)));
    }
}
