//! Typed snapshot I/O over a backend

use crate::backend::SnapshotBackend;
use crate::envelope::Envelope;
use crate::error::Result;
use crate::key::SnapshotKey;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

/// Reads and writes whole snapshots as checksummed envelopes
#[derive(Clone)]
pub struct Repository {
    backend: Arc<dyn SnapshotBackend>,
}

impl std::fmt::Debug for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository").finish_non_exhaustive()
    }
}

impl Repository {
    pub fn new(backend: Arc<dyn SnapshotBackend>) -> Self {
        Self { backend }
    }

    /// Restore an entry; `None` if it was never written
    ///
    /// # Errors
    /// Returns an error if the entry exists but cannot be read or fails its
    /// integrity checks
    pub async fn load<T: DeserializeOwned>(&self, key: SnapshotKey) -> Result<Option<T>> {
        let Some(bytes) = self.backend.load(key).await? else {
            debug!(%key, "No stored entry");
            return Ok(None);
        };
        let envelope = Envelope::from_bytes(key, &bytes)?;
        let value = envelope.open(key).map_err(|e| {
            warn!(%key, error = %e, "Stored entry rejected");
            e
        })?;
        Ok(Some(value))
    }

    /// Overwrite an entry with `value`
    ///
    /// # Errors
    /// Returns an error if encoding or the backend write fails
    pub async fn save<T: Serialize + Sync>(&self, key: SnapshotKey, value: &T) -> Result<()> {
        let envelope = Envelope::seal(key, value)?;
        let bytes = envelope.to_bytes()?;
        debug!(%key, checksum = %envelope.checksum.short(), "Saving entry");
        self.backend.save(key, bytes).await
    }

    /// Delete an entry
    ///
    /// # Errors
    /// Returns an error if the backend fails
    pub async fn remove(&self, key: SnapshotKey) -> Result<()> {
        self.backend.remove(key).await
    }
}
