//! Platform behaviour across stores, persistence and reopen

use mockall::mock;
use pretty_assertions::assert_eq;
use sentinel_core::prelude::*;
use sentinel_model::{ControlId, UserPatch};
use sentinel_persist::{FileBackend, PersistError, SnapshotBackend, SnapshotKey};
use sentinel_store::StoreError;
use sentinel_test_utils::{fast_config, memory_platform, memory_platform_with, risk_draft, vendor_draft};
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

fn control(code: &str) -> ControlId {
    code.parse().unwrap()
}

#[tokio::test]
async fn fresh_platform_defaults() {
    let (platform, backend) = memory_platform().await;

    assert!(platform.risks().is_empty());
    assert!(platform.vendors().is_empty());
    assert_eq!(platform.controls().completion_percentage(), 45);
    assert!(!platform.session().is_authenticated());
    assert!(backend.is_empty());
}

#[tokio::test]
async fn starts_as_demo_user_without_persisted_session() {
    let (platform, _) = memory_platform_with(PlatformConfig::new().without_delays()).await;
    let session = platform.session();
    assert_eq!(session.user().map(|u| u.name.as_str()), Some("Alex Davis"));
}

#[tokio::test]
async fn mutation_writes_its_entry() {
    let (platform, backend) = memory_platform().await;

    platform.add_risk(risk_draft("Ransomware", 4, 5)).await.unwrap();

    assert!(backend.get(SnapshotKey::Risk).is_some());
    assert!(backend.get(SnapshotKey::Vendor).is_none());
    assert_eq!(backend.len(), 1);
}

#[tokio::test]
async fn validation_failure_commits_and_writes_nothing() {
    let (platform, backend) = memory_platform().await;

    let err = platform.add_risk(risk_draft(" ", 2, 2)).await.unwrap_err();
    assert!(err.is_validation());
    assert!(platform.risks().is_empty());
    assert_eq!(platform.risks().version(), 0);
    assert!(backend.is_empty());
}

#[tokio::test]
async fn unknown_ids_are_not_found() {
    let (platform, _) = memory_platform().await;

    let risk = platform.delete_risk("RSK-042".parse().unwrap()).await.unwrap_err();
    assert!(risk.is_not_found());

    let vendor = platform
        .export_certificate("VND-007".parse().unwrap())
        .await
        .unwrap_err();
    assert!(vendor.is_not_found());

    let err = platform.toggle_control(&control("A.99.9")).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn state_survives_reopen_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let config = fast_config().with_state_dir(dir.path());

    let first = Platform::open(config.clone()).await.unwrap();
    first.load_demo_risks().await.unwrap();
    first.delete_risk("RSK-008".parse().unwrap()).await.unwrap();
    first.load_demo_vendors().await.unwrap();
    first.toggle_control(&control("A.5.1")).await.unwrap();
    first
        .login(&Credentials::new("jordan.lee@corp.example", "hunter2"))
        .await
        .unwrap();
    let before = (first.risks(), first.vendors(), first.controls(), first.session());
    drop(first);

    let second = Platform::open(config).await.unwrap();
    assert_eq!(second.risks(), before.0);
    assert_eq!(second.vendors(), before.1);
    assert_eq!(second.controls(), before.2);
    assert_eq!(second.session(), before.3);
    assert_eq!(
        second.session().user().map(|u| u.name.as_str()),
        Some("Jordan Lee")
    );

    // id counter persisted with the list
    let snapshot = second.add_risk(risk_draft("Insider threat", 2, 3)).await.unwrap();
    assert_eq!(snapshot.latest().unwrap().id.to_string(), "RSK-009");
}

#[tokio::test]
async fn corrupted_entry_fails_open() {
    let dir = tempfile::tempdir().unwrap();
    let backend = FileBackend::new(dir.path());
    backend
        .save(SnapshotKey::Vendor, b"{ definitely not an envelope".to_vec())
        .await
        .unwrap();

    let err = Platform::with_backend(fast_config(), Arc::new(backend))
        .await
        .unwrap_err();
    assert!(matches!(err, PlatformError::Persist(PersistError::Decode { .. })));
}

#[tokio::test]
async fn failed_save_keeps_in_memory_change() {
    let mut backend = MockBackend::new();
    backend.expect_load().returning(|_| Ok(None));
    backend.expect_save().times(1).returning(|key, _| {
        Err(PersistError::io_error(
            format!("/readonly/{key}.json"),
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
        ))
    });

    let platform = Platform::with_backend(fast_config(), Arc::new(backend))
        .await
        .unwrap();
    let err = platform.add_vendor(vendor_draft("Acme", 10)).await.unwrap_err();

    assert!(matches!(err, PlatformError::Persist(PersistError::Io { .. })));
    assert_eq!(platform.vendors().len(), 1);
    assert_eq!(platform.vendors().version(), 1);
}

#[tokio::test]
async fn vendor_assessment_and_reassessment() {
    let (platform, _) = memory_platform().await;

    let snapshot = platform
        .assess_vendor(
            "Nimbus Storage",
            "Backup",
            Criticality::Critical,
            &Assessment::with_yes_count(12),
            Some("security@nimbus.example".into()),
        )
        .await
        .unwrap();
    let vendor = snapshot.latest().unwrap().clone();
    assert_eq!(u8::from(vendor.assessment_score), 100);
    assert_eq!(vendor.contact.as_deref(), Some("security@nimbus.example"));

    let snapshot = platform
        .reassess_vendor(vendor.id, &Assessment::with_yes_count(6))
        .await
        .unwrap();
    let metrics = platform.dashboard();
    assert_eq!(u8::from(snapshot.get(vendor.id).unwrap().assessment_score), 50);
    assert_eq!(metrics.non_compliant_vendors, 1);
    assert_eq!(metrics.compliant_vendors, 0);
}

#[tokio::test]
async fn certificate_lands_in_export_dir() {
    let dir = tempfile::tempdir().unwrap();
    let (platform, _) = memory_platform_with(
        fast_config()
            .with_export_dir(dir.path())
            .with_organization("Acme Holdings"),
    )
    .await;
    platform.add_vendor(vendor_draft("Blue Sky", 10)).await.unwrap();

    let path = platform
        .export_certificate("VND-001".parse().unwrap())
        .await
        .unwrap();

    assert_eq!(path, dir.path().join("Blue_Sky_Assessment.txt"));
    let text = std::fs::read_to_string(path).unwrap();
    assert!(text.starts_with("Acme Holdings"));
    assert!(text.contains("Overall Status: PASSED"));
}

#[tokio::test]
async fn session_lifecycle_is_persisted() {
    let (platform, backend) = memory_platform().await;

    let err = platform.update_profile(UserPatch::default()).await.unwrap_err();
    assert!(matches!(err, PlatformError::Store(StoreError::NotSignedIn)));
    assert!(backend.get(SnapshotKey::Auth).is_none());

    let bad = platform.login(&Credentials::new("", "secret")).await.unwrap_err();
    assert!(bad.is_validation());

    platform
        .signup("Sam Rivera", &Credentials::new("sam@corp.example", "secret"))
        .await
        .unwrap();
    let state = platform
        .update_profile(UserPatch {
            role: Some("DPO".into()),
            ..UserPatch::default()
        })
        .await
        .unwrap();
    assert_eq!(state.user().unwrap().role, "DPO");
    assert!(backend.get(SnapshotKey::Auth).is_some());

    assert!(!platform.logout().await.unwrap().is_authenticated());
}

#[tokio::test]
async fn subscribers_see_platform_mutations() {
    let (platform, _) = memory_platform().await;
    let mut rx = platform.risk_store().subscribe();

    platform.load_demo_risks().await.unwrap();

    assert!(rx.has_changed().unwrap());
    assert_eq!(rx.borrow_and_update().len(), 8);
}

#[tokio::test]
async fn scan_tally_follows_configuration() {
    let (platform, _) = memory_platform().await;
    let config = ScanConfig::insecure();

    let report = platform.scan(config).await.unwrap();

    assert!(!report.passed());
    assert_eq!(report.critical, config.expected_critical());
    assert_eq!(report.warnings, config.expected_warnings());
    assert_eq!(report.findings.len(), 3);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_mutations_reopen_with_latest_entry() {
    let dir = tempfile::tempdir().unwrap();
    let config = fast_config().with_state_dir(dir.path());
    let platform = Arc::new(Platform::open(config.clone()).await.unwrap());

    let adds: Vec<_> = (0..16u8)
        .map(|n| {
            let platform = platform.clone();
            tokio::spawn(async move {
                let draft = risk_draft(&format!("Risk {n}"), n % 5 + 1, n % 3 + 1);
                platform.add_risk(draft).await
            })
        })
        .collect();
    for add in adds {
        add.await.unwrap().unwrap();
    }

    let reopened = Platform::open(config).await.unwrap();
    let risks = reopened.risks();
    assert_eq!(risks, platform.risks());
    assert_eq!(risks.len(), 16);
    assert_eq!(risks.next_seq(), 17);

    let mut ids: Vec<_> = risks.iter().map(|r| r.id.to_string()).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 16);
}

#[tokio::test(start_paused = true)]
async fn instant_scan_skips_stage_delays() {
    let (platform, _) = memory_platform_with(PlatformConfig::new()).await;
    let config = ScanConfig::insecure();

    let started = tokio::time::Instant::now();
    let report = platform.scan_instant(config).await.unwrap();
    assert_eq!(started.elapsed(), std::time::Duration::ZERO);
    assert_eq!(report.critical, config.expected_critical());

    let started = tokio::time::Instant::now();
    platform.scan(config).await.unwrap();
    assert!(started.elapsed() > std::time::Duration::ZERO);
}
