//! Snapshot round trips through real backends, plus failure paths

use chrono::Utc;
use mockall::mock;
use pretty_assertions::assert_eq;
use sentinel_model::{demo_risks, Risk, RiskDraft};
use sentinel_persist::{
    FileBackend, MemoryBackend, PersistError, Repository, SnapshotBackend, SnapshotKey,
};
use sentinel_store::{ControlSnapshot, ControlStore, RiskStore, Snapshot};
use std::sync::Arc;

mock! {
    pub Backend {}

    #[async_trait::async_trait]
    impl SnapshotBackend for Backend {
        async fn load(&self, key: SnapshotKey) -> sentinel_persist::Result<Option<Vec<u8>>>;
        async fn save(&self, key: SnapshotKey, bytes: Vec<u8>) -> sentinel_persist::Result<()>;
        async fn remove(&self, key: SnapshotKey) -> sentinel_persist::Result<()>;
    }
}

#[tokio::test]
async fn risk_snapshot_restores_equal() {
    let store = RiskStore::new();
    store.load_demo_data();
    let snapshot = store
        .add(RiskDraft::new("Insider threat", "Human Risk", "HR"))
        .unwrap();

    let repo = Repository::new(Arc::new(MemoryBackend::new()));
    repo.save(SnapshotKey::Risk, &snapshot).await.unwrap();
    let restored: Snapshot<Risk> = repo.load(SnapshotKey::Risk).await.unwrap().unwrap();

    assert_eq!(restored, snapshot);
    assert_eq!(restored.next_seq(), 10);
}

#[tokio::test]
async fn control_snapshot_survives_file_backend() {
    let dir = tempfile::tempdir().unwrap();
    let repo = Repository::new(Arc::new(FileBackend::new(dir.path())));

    let store = ControlStore::new();
    let toggled = store
        .toggle_implemented(&"A.12.4".parse().unwrap())
        .unwrap();
    repo.save(SnapshotKey::Iso, &toggled).await.unwrap();

    let reopened = Repository::new(Arc::new(FileBackend::new(dir.path())));
    let restored: ControlSnapshot = reopened.load(SnapshotKey::Iso).await.unwrap().unwrap();
    assert_eq!(restored, toggled);
    assert_eq!(restored.implemented_count(), 10);
}

#[tokio::test]
async fn missing_entry_is_none() {
    let repo = Repository::new(Arc::new(MemoryBackend::new()));
    let loaded: Option<Snapshot<Risk>> = repo.load(SnapshotKey::Risk).await.unwrap();
    assert!(loaded.is_none());
}

#[tokio::test]
async fn tampered_entry_is_rejected() {
    let backend = Arc::new(MemoryBackend::new());
    let repo = Repository::new(backend.clone());
    let snapshot = Snapshot::from_records(demo_risks(Utc::now()));
    repo.save(SnapshotKey::Risk, &snapshot).await.unwrap();

    let text = String::from_utf8(backend.get(SnapshotKey::Risk).unwrap()).unwrap();
    let tampered = text.replacen("Vendor SLA Non-Compliance", "Vendor SLA Compliance", 1);
    assert_ne!(text, tampered, "seed data contains the edited word");
    backend.insert_raw(SnapshotKey::Risk, tampered);

    let err = repo.load::<Snapshot<Risk>>(SnapshotKey::Risk).await.unwrap_err();
    assert!(matches!(err, PersistError::Corrupted { key: SnapshotKey::Risk, .. }));
}

#[tokio::test]
async fn malformed_entry_is_decode_error() {
    let backend = Arc::new(MemoryBackend::new());
    backend.insert_raw(SnapshotKey::Vendor, "[1, 2");
    let repo = Repository::new(backend);
    let err = repo.load::<Snapshot<Risk>>(SnapshotKey::Vendor).await.unwrap_err();
    assert!(matches!(err, PersistError::Decode { .. }));
}

#[tokio::test]
async fn backend_failures_propagate() {
    let mut backend = MockBackend::new();
    backend
        .expect_save()
        .times(1)
        .returning(|_, _| {
            Err(PersistError::io_error(
                "/readonly",
                std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
            ))
        });
    backend
        .expect_load()
        .withf(|key| *key == SnapshotKey::Auth)
        .returning(|_| Ok(None));

    let repo = Repository::new(Arc::new(backend));
    let err = repo
        .save(SnapshotKey::Risk, &Snapshot::<Risk>::default())
        .await
        .unwrap_err();
    assert!(matches!(err, PersistError::Io { .. }));
    assert!(repo
        .load::<serde_json::Value>(SnapshotKey::Auth)
        .await
        .unwrap()
        .is_none());
}
