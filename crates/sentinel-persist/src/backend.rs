//! Storage backends for raw entry bytes

use crate::error::{PersistError, Result};
use crate::key::SnapshotKey;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;
use ulid::Ulid;

/// Keyed byte storage for snapshot entries
///
/// A save replaces the whole entry.
#[async_trait]
pub trait SnapshotBackend: Send + Sync {
    /// Stored bytes, or `None` if the entry was never written
    async fn load(&self, key: SnapshotKey) -> Result<Option<Vec<u8>>>;

    /// Overwrite the entry
    async fn save(&self, key: SnapshotKey, bytes: Vec<u8>) -> Result<()>;

    /// Delete the entry; missing entries are not an error
    async fn remove(&self, key: SnapshotKey) -> Result<()>;
}

/// One `<key>.json` file per entry under a state directory
#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File holding `key`
    #[must_use]
    pub fn path_for(&self, key: SnapshotKey) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

#[async_trait]
impl SnapshotBackend for FileBackend {
    async fn load(&self, key: SnapshotKey) -> Result<Option<Vec<u8>>> {
        let path = self.path_for(key);
        match tokio::fs::read(&path).await {
            Ok(bytes) => {
                debug!(%key, path = %path.display(), bytes = bytes.len(), "Entry read");
                Ok(Some(bytes))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(PersistError::io_error(path, e)),
        }
    }

    async fn save(&self, key: SnapshotKey, bytes: Vec<u8>) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| PersistError::io_error(&self.dir, e))?;

        let path = self.path_for(key);
        // one staging file per write; concurrent saves never share it
        let staging = self.dir.join(format!("{key}.{}.json.tmp", Ulid::new()));
        if let Err(e) = tokio::fs::write(&staging, &bytes).await {
            let _ = tokio::fs::remove_file(&staging).await;
            return Err(PersistError::io_error(&staging, e));
        }
        if let Err(e) = tokio::fs::rename(&staging, &path).await {
            let _ = tokio::fs::remove_file(&staging).await;
            return Err(PersistError::io_error(&path, e));
        }

        debug!(%key, path = %path.display(), bytes = bytes.len(), "Entry written");
        Ok(())
    }

    async fn remove(&self, key: SnapshotKey) -> Result<()> {
        let path = self.path_for(key);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(PersistError::io_error(path, e)),
        }
    }
}

/// Process-local backend for tests and ephemeral sessions
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: RwLock<HashMap<SnapshotKey, Vec<u8>>>,
}

impl MemoryBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw bytes of an entry
    #[must_use]
    pub fn get(&self, key: SnapshotKey) -> Option<Vec<u8>> {
        self.entries.read().get(&key).cloned()
    }

    /// Overwrite an entry without going through an envelope
    pub fn insert_raw(&self, key: SnapshotKey, bytes: impl Into<Vec<u8>>) {
        self.entries.write().insert(key, bytes.into());
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

#[async_trait]
impl SnapshotBackend for MemoryBackend {
    async fn load(&self, key: SnapshotKey) -> Result<Option<Vec<u8>>> {
        Ok(self.get(key))
    }

    async fn save(&self, key: SnapshotKey, bytes: Vec<u8>) -> Result<()> {
        self.insert_raw(key, bytes);
        Ok(())
    }

    async fn remove(&self, key: SnapshotKey) -> Result<()> {
        self.entries.write().remove(&key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_backend_overwrites() {
        let backend = MemoryBackend::new();
        assert!(backend.load(SnapshotKey::Risk).await.unwrap().is_none());
        backend.save(SnapshotKey::Risk, b"one".to_vec()).await.unwrap();
        backend.save(SnapshotKey::Risk, b"two".to_vec()).await.unwrap();
        assert_eq!(backend.load(SnapshotKey::Risk).await.unwrap(), Some(b"two".to_vec()));
        assert_eq!(backend.len(), 1);
        backend.remove(SnapshotKey::Risk).await.unwrap();
        assert!(backend.is_empty());
    }

    #[tokio::test]
    async fn file_backend_layout() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileBackend::new(dir.path().join("state"));
        backend.save(SnapshotKey::Vendor, b"{}".to_vec()).await.unwrap();

        let path = dir.path().join("state/sentinel-vendor-storage.json");
        assert_eq!(backend.path_for(SnapshotKey::Vendor), path);
        assert_eq!(std::fs::read(&path).unwrap(), b"{}");
        assert_eq!(std::fs::read_dir(dir.path().join("state")).unwrap().count(), 1);

        backend.remove(SnapshotKey::Vendor).await.unwrap();
        backend.remove(SnapshotKey::Vendor).await.unwrap();
        assert!(backend.load(SnapshotKey::Vendor).await.unwrap().is_none());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_file_saves_do_not_collide() {
        let dir = tempfile::tempdir().unwrap();
        let backend = std::sync::Arc::new(FileBackend::new(dir.path()));

        let writes: Vec<_> = (0..16u8)
            .map(|n| {
                let backend = backend.clone();
                tokio::spawn(async move {
                    backend.save(SnapshotKey::Risk, vec![b'a' + n; 64]).await
                })
            })
            .collect();
        for write in writes {
            write.await.unwrap().unwrap();
        }

        let stored = backend.load(SnapshotKey::Risk).await.unwrap().unwrap();
        assert_eq!(stored.len(), 64);
        assert!(stored.iter().all(|b| *b == stored[0]));
        assert!((b'a'..b'a' + 16).contains(&stored[0]));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
