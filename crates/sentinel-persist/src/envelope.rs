//! Wire format of a persisted entry
//!
//! ```json
//! { "key": "sentinel-risk-storage", "checksum": "<blake3 hex>",
//!   "savedAt": "2024-01-01T00:00:00Z", "payload": { ... } }
//! ```
//!
//! The checksum covers the compact JSON encoding of `payload`.

use crate::checksum::Checksum;
use crate::error::{PersistError, Result};
use crate::key::SnapshotKey;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A named, checksummed snapshot payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    pub key: SnapshotKey,
    pub checksum: Checksum,
    pub saved_at: DateTime<Utc>,
    pub payload: Value,
}

impl Envelope {
    /// Wrap a snapshot
    ///
    /// # Errors
    /// Returns [`PersistError::Encode`] if the value cannot be represented as JSON
    pub fn seal<T: Serialize>(key: SnapshotKey, value: &T) -> Result<Self> {
        let payload =
            serde_json::to_value(value).map_err(|source| PersistError::Encode { key, source })?;
        let checksum = payload_checksum(key, &payload)?;
        Ok(Self {
            key,
            checksum,
            saved_at: Utc::now(),
            payload,
        })
    }

    /// Check integrity and extract the snapshot
    ///
    /// # Errors
    /// Returns [`PersistError::Corrupted`] on key or checksum mismatch, or
    /// [`PersistError::Decode`] if the payload has the wrong shape
    pub fn open<T: DeserializeOwned>(self, expected: SnapshotKey) -> Result<T> {
        if self.key != expected {
            return Err(PersistError::corrupted(
                expected,
                format!("envelope is labelled {}", self.key),
            ));
        }
        let actual = payload_checksum(expected, &self.payload)?;
        if actual != self.checksum {
            return Err(PersistError::corrupted(
                expected,
                format!(
                    "checksum mismatch: stored {}, computed {}",
                    self.checksum.short(),
                    actual.short()
                ),
            ));
        }
        serde_json::from_value(self.payload).map_err(|source| PersistError::Decode {
            key: expected,
            source,
        })
    }

    /// Serialize for storage
    ///
    /// # Errors
    /// Returns [`PersistError::Encode`] on serializer failure
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        serde_json::to_vec_pretty(self).map_err(|source| PersistError::Encode {
            key: self.key,
            source,
        })
    }

    /// Parse stored bytes for `key`
    ///
    /// # Errors
    /// Returns [`PersistError::Decode`] for malformed JSON
    pub fn from_bytes(key: SnapshotKey, bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(|source| PersistError::Decode { key, source })
    }
}

fn payload_checksum(key: SnapshotKey, payload: &Value) -> Result<Checksum> {
    let bytes =
        serde_json::to_vec(payload).map_err(|source| PersistError::Encode { key, source })?;
    Ok(Checksum::compute(&bytes))
}
