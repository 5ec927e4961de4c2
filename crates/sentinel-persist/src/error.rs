//! Persistence error types

use crate::key::SnapshotKey;
use std::path::PathBuf;

/// Result alias for persistence operations
pub type Result<T> = std::result::Result<T, PersistError>;

/// Errors reading or writing snapshot entries
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    /// Filesystem failure
    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Snapshot could not be serialized
    #[error("failed to encode {key}: {source}")]
    Encode {
        key: SnapshotKey,
        #[source]
        source: serde_json::Error,
    },

    /// Stored bytes are not a valid envelope or payload
    #[error("failed to decode {key}: {source}")]
    Decode {
        key: SnapshotKey,
        #[source]
        source: serde_json::Error,
    },

    /// Envelope parsed but failed integrity checks
    #[error("entry {key} is corrupted: {reason}")]
    Corrupted { key: SnapshotKey, reason: String },

    /// Unknown entry name
    #[error("unknown snapshot key: '{0}'")]
    UnknownKey(String),
}

impl PersistError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create integrity error for an entry
    pub fn corrupted(key: SnapshotKey, reason: impl Into<String>) -> Self {
        Self::Corrupted {
            key,
            reason: reason.into(),
        }
    }
}
