//! Platform error type
//!
//! Wraps the per-crate errors so callers can match on one type:
//! - validation failures (abort the submission, show a message)
//! - missing records
//! - persistence failures (the in-memory change is kept)
//! - configuration and logging setup

use sentinel_model::ValidationError;
use sentinel_persist::PersistError;
use sentinel_scanner::ScanError;
use sentinel_store::StoreError;
use std::path::PathBuf;

/// Result alias for platform operations
pub type Result<T> = std::result::Result<T, PlatformError>;

/// Main platform error type
#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    /// Input failed validation before reaching a store
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Store rejected the mutation
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Snapshot could not be read or written
    #[error("persistence error: {0}")]
    Persist(#[from] PersistError),

    /// Scan run failed
    #[error("scan error: {0}")]
    Scan(#[from] ScanError),

    /// Configuration file could not be used
    #[error("config error in {path}: {reason}")]
    Config { path: PathBuf, reason: String },

    /// Filesystem failure outside snapshot storage
    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Tracing subscriber could not be installed
    #[error("logging setup failed: {0}")]
    Logging(String),
}

impl PlatformError {
    /// Create config error for path
    pub fn config(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Config {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether the caller supplied incomplete or out-of-range input
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_)) || matches!(self, Self::Store(e) if e.is_validation())
    }

    /// Whether a referenced record does not exist
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Store(StoreError::NotFound { .. }))
    }
}
