//! Platform facade
//!
//! Owns one store per domain plus the snapshot repository. Every mutating
//! operation validates, commits to its store, then overwrites the store's
//! persisted entry. When that write fails the committed state is kept and
//! the error is returned; the next successful save rewrites the whole entry.
//! Saves of one entry are serialized and always write the store's current
//! snapshot, so concurrent mutations cannot leave an older version on disk.

use crate::auth::Authenticator;
use crate::certificate;
use crate::config::PlatformConfig;
use crate::dashboard::{self, DashboardMetrics, HeatPoint};
use crate::error::{PlatformError, Result};
use chrono::Utc;
use sentinel_model::{
    Assessment, ControlId, Credentials, Criticality, Risk, RiskDraft, RiskId, RiskPatch, User,
    UserPatch, Vendor, VendorDraft, VendorId, VendorPatch,
};
use sentinel_persist::{FileBackend, MemoryBackend, Repository, SnapshotBackend, SnapshotKey};
use sentinel_scanner::{LogLine, ScanConfig, ScanReport, ScanTiming, ScenarioRunner};
use sentinel_store::{
    ControlSnapshot, ControlStore, RiskStore, SessionState, SessionStore, Snapshot, StoreError,
    VendorStore,
};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex, MutexGuard};
use tracing::{info, warn};

/// GRC platform: stores, persistence, auth and derived views
pub struct Platform {
    config: PlatformConfig,
    risks: RiskStore,
    vendors: VendorStore,
    controls: ControlStore,
    session: SessionStore,
    repo: Repository,
    save_locks: SaveLocks,
    auth: Authenticator,
    scanner: ScenarioRunner,
}

impl std::fmt::Debug for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Platform")
            .field("config", &self.config)
            .field("risks", &self.risks.snapshot().len())
            .field("vendors", &self.vendors.snapshot().len())
            .finish_non_exhaustive()
    }
}

impl Platform {
    /// Open with the backend implied by `config.state_dir`
    ///
    /// # Errors
    /// Returns an error if a persisted entry exists but cannot be restored
    pub async fn open(config: PlatformConfig) -> Result<Self> {
        let backend: Arc<dyn SnapshotBackend> = match &config.state_dir {
            Some(dir) => Arc::new(FileBackend::new(dir)),
            None => Arc::new(MemoryBackend::new()),
        };
        Self::with_backend(config, backend).await
    }

    /// Open over an explicit backend, restoring all four entries concurrently
    ///
    /// Missing entries fall back to store defaults: empty risk and vendor
    /// lists, the default control catalogue, and a session that is signed
    /// in as the demo user when `auth.start_signed_in` is set.
    ///
    /// # Errors
    /// Returns [`PlatformError::Persist`] for unreadable or corrupted entries
    pub async fn with_backend(
        config: PlatformConfig,
        backend: Arc<dyn SnapshotBackend>,
    ) -> Result<Self> {
        let repo = Repository::new(backend);
        let (session, controls, risks, vendors) = futures::try_join!(
            repo.load::<SessionState>(SnapshotKey::Auth),
            repo.load::<ControlSnapshot>(SnapshotKey::Iso),
            repo.load::<Snapshot<Risk>>(SnapshotKey::Risk),
            repo.load::<Snapshot<Vendor>>(SnapshotKey::Vendor),
        )?;

        let session = session.unwrap_or_else(|| {
            if config.auth.start_signed_in {
                SessionState::signed_in(User::demo(Utc::now()))
            } else {
                SessionState::default()
            }
        });
        let platform = Self {
            auth: Authenticator::new(config.auth),
            scanner: ScenarioRunner::new(config.scan),
            risks: RiskStore::with_snapshot(risks.unwrap_or_default()),
            vendors: VendorStore::with_snapshot(vendors.unwrap_or_default()),
            controls: ControlStore::with_snapshot(controls.unwrap_or_default()),
            session: SessionStore::new(session),
            repo,
            save_locks: SaveLocks::default(),
            config,
        };

        info!(
            risks = platform.risks.snapshot().len(),
            vendors = platform.vendors.snapshot().len(),
            signed_in = platform.session.state().is_authenticated(),
            "Platform opened"
        );
        Ok(platform)
    }

    #[must_use]
    pub fn config(&self) -> &PlatformConfig {
        &self.config
    }

    // Stores, for subscriptions

    #[must_use]
    pub fn risk_store(&self) -> &RiskStore {
        &self.risks
    }

    #[must_use]
    pub fn vendor_store(&self) -> &VendorStore {
        &self.vendors
    }

    #[must_use]
    pub fn control_store(&self) -> &ControlStore {
        &self.controls
    }

    #[must_use]
    pub fn session_store(&self) -> &SessionStore {
        &self.session
    }

    // Snapshots

    #[must_use]
    pub fn risks(&self) -> Snapshot<Risk> {
        self.risks.snapshot()
    }

    #[must_use]
    pub fn vendors(&self) -> Snapshot<Vendor> {
        self.vendors.snapshot()
    }

    #[must_use]
    pub fn controls(&self) -> ControlSnapshot {
        self.controls.snapshot()
    }

    #[must_use]
    pub fn session(&self) -> SessionState {
        self.session.state()
    }

    // Risk register

    /// # Errors
    /// Returns a validation error for missing fields, or a persistence error
    pub async fn add_risk(&self, draft: RiskDraft) -> Result<Snapshot<Risk>> {
        let snapshot = self.risks.add(draft)?;
        self.persist(SnapshotKey::Risk).await?;
        Ok(snapshot)
    }

    /// # Errors
    /// Returns a validation, not-found or persistence error
    pub async fn update_risk(&self, id: RiskId, patch: RiskPatch) -> Result<Snapshot<Risk>> {
        let snapshot = self.risks.update(id, patch)?;
        self.persist(SnapshotKey::Risk).await?;
        Ok(snapshot)
    }

    /// # Errors
    /// Returns a not-found or persistence error
    pub async fn delete_risk(&self, id: RiskId) -> Result<Snapshot<Risk>> {
        let snapshot = self.risks.delete(id)?;
        self.persist(SnapshotKey::Risk).await?;
        Ok(snapshot)
    }

    /// # Errors
    /// Returns a persistence error
    pub async fn load_demo_risks(&self) -> Result<Snapshot<Risk>> {
        let snapshot = self.risks.load_demo_data();
        self.persist(SnapshotKey::Risk).await?;
        Ok(snapshot)
    }

    /// # Errors
    /// Returns a persistence error
    pub async fn reset_risks(&self) -> Result<Snapshot<Risk>> {
        let snapshot = self.risks.reset();
        self.persist(SnapshotKey::Risk).await?;
        Ok(snapshot)
    }

    /// Matching risks, highest score first
    #[must_use]
    pub fn risk_register(&self, query: &str) -> Vec<Risk> {
        let snapshot = self.risks.snapshot();
        dashboard::risk_register(&snapshot, query)
            .into_iter()
            .cloned()
            .collect()
    }

    #[must_use]
    pub fn heatmap(&self) -> Vec<HeatPoint> {
        dashboard::heatmap(&self.risks.snapshot())
    }

    // Vendors

    /// # Errors
    /// Returns a validation error for missing fields, or a persistence error
    pub async fn add_vendor(&self, draft: VendorDraft) -> Result<Snapshot<Vendor>> {
        let snapshot = self.vendors.add(draft)?;
        self.persist(SnapshotKey::Vendor).await?;
        Ok(snapshot)
    }

    /// Create a vendor scored from a questionnaire
    ///
    /// # Errors
    /// Returns a validation error for missing fields, or a persistence error
    pub async fn assess_vendor(
        &self,
        name: &str,
        service_type: &str,
        criticality: Criticality,
        assessment: &Assessment,
        contact: Option<String>,
    ) -> Result<Snapshot<Vendor>> {
        let draft = VendorDraft::from_assessment(name, service_type, criticality, assessment);
        let draft = match contact {
            Some(contact) => draft.with_contact(contact),
            None => draft,
        };
        self.add_vendor(draft).await
    }

    /// # Errors
    /// Returns a validation, not-found or persistence error
    pub async fn update_vendor(&self, id: VendorId, patch: VendorPatch) -> Result<Snapshot<Vendor>> {
        let snapshot = self.vendors.update(id, patch)?;
        self.persist(SnapshotKey::Vendor).await?;
        Ok(snapshot)
    }

    /// Recompute score, status and assessment date from new answers
    ///
    /// # Errors
    /// Returns a not-found or persistence error
    pub async fn reassess_vendor(
        &self,
        id: VendorId,
        assessment: &Assessment,
    ) -> Result<Snapshot<Vendor>> {
        let snapshot = self.vendors.reassess(id, assessment)?;
        self.persist(SnapshotKey::Vendor).await?;
        Ok(snapshot)
    }

    /// # Errors
    /// Returns a not-found or persistence error
    pub async fn delete_vendor(&self, id: VendorId) -> Result<Snapshot<Vendor>> {
        let snapshot = self.vendors.delete(id)?;
        self.persist(SnapshotKey::Vendor).await?;
        Ok(snapshot)
    }

    /// # Errors
    /// Returns a persistence error
    pub async fn load_demo_vendors(&self) -> Result<Snapshot<Vendor>> {
        let snapshot = self.vendors.load_demo_data();
        self.persist(SnapshotKey::Vendor).await?;
        Ok(snapshot)
    }

    /// # Errors
    /// Returns a persistence error
    pub async fn reset_vendors(&self) -> Result<Snapshot<Vendor>> {
        let snapshot = self.vendors.reset();
        self.persist(SnapshotKey::Vendor).await?;
        Ok(snapshot)
    }

    /// Write a vendor's certificate into the export directory
    ///
    /// # Errors
    /// Returns a not-found error for an unknown vendor, or an IO error
    pub async fn export_certificate(&self, id: VendorId) -> Result<PathBuf> {
        let snapshot = self.vendors.snapshot();
        let vendor = snapshot
            .get(id)
            .ok_or_else(|| StoreError::not_found("vendor", id))?;
        certificate::export(vendor, &self.config.organization, &self.config.export_dir).await
    }

    // Controls

    /// # Errors
    /// Returns a not-found or persistence error
    pub async fn toggle_control(&self, id: &ControlId) -> Result<ControlSnapshot> {
        let snapshot = self.controls.toggle_implemented(id)?;
        self.persist(SnapshotKey::Iso).await?;
        Ok(snapshot)
    }

    /// Restore catalogue defaults
    ///
    /// # Errors
    /// Returns a persistence error
    pub async fn reset_controls(&self) -> Result<ControlSnapshot> {
        let snapshot = self.controls.load_controls();
        self.persist(SnapshotKey::Iso).await?;
        Ok(snapshot)
    }

    // Session

    /// # Errors
    /// Returns a validation error for bad credentials, or a persistence error
    pub async fn login(&self, credentials: &Credentials) -> Result<SessionState> {
        let user = self.auth.login(credentials).await?;
        let state = self.session.sign_in(user);
        self.persist(SnapshotKey::Auth).await?;
        Ok(state)
    }

    /// # Errors
    /// Returns a validation error for bad input, or a persistence error
    pub async fn signup(&self, name: &str, credentials: &Credentials) -> Result<SessionState> {
        let user = self.auth.signup(name, credentials).await?;
        let state = self.session.sign_in(user);
        self.persist(SnapshotKey::Auth).await?;
        Ok(state)
    }

    /// # Errors
    /// Returns a persistence error
    pub async fn logout(&self) -> Result<SessionState> {
        let state = self.session.sign_out();
        self.persist(SnapshotKey::Auth).await?;
        Ok(state)
    }

    /// # Errors
    /// Returns a not-signed-in, validation or persistence error
    pub async fn update_profile(&self, patch: UserPatch) -> Result<SessionState> {
        let state = self.session.update_profile(patch)?;
        self.persist(SnapshotKey::Auth).await?;
        Ok(state)
    }

    // Derived views

    #[must_use]
    pub fn dashboard(&self) -> DashboardMetrics {
        DashboardMetrics::compute(
            &self.risks.snapshot(),
            &self.vendors.snapshot(),
            &self.controls.snapshot(),
        )
    }

    // Cloud scan

    /// Run the scan scenario, streaming lines to `sink`
    ///
    /// # Errors
    /// Returns a scan error if the receiver is dropped mid-run
    pub async fn run_scan(
        &self,
        config: ScanConfig,
        sink: mpsc::Sender<LogLine>,
    ) -> Result<ScanReport> {
        Ok(self.scanner.run(config, sink).await?)
    }

    /// Run the scan scenario and return only the report
    ///
    /// # Errors
    /// Returns a scan error
    pub async fn scan(&self, config: ScanConfig) -> Result<ScanReport> {
        Ok(self.scanner.run_collect(config).await?)
    }

    /// Run the scan scenario without stage delays, ignoring `config.scan`
    ///
    /// # Errors
    /// Returns a scan error
    pub async fn scan_instant(&self, config: ScanConfig) -> Result<ScanReport> {
        let runner = ScenarioRunner::new(ScanTiming::instant());
        Ok(runner.run_collect(config).await?)
    }

    /// Overwrite `key`'s entry with that store's current snapshot
    ///
    /// Saves for one key run one at a time and always write the latest
    /// state, so the last save to finish reflects the last mutation.
    async fn persist(&self, key: SnapshotKey) -> Result<()> {
        let _guard = self.save_locks.lock_for(key).await;
        let saved = match key {
            SnapshotKey::Auth => self.repo.save(key, &self.session.state()).await,
            SnapshotKey::Iso => self.repo.save(key, &self.controls.snapshot()).await,
            SnapshotKey::Risk => self.repo.save(key, &self.risks.snapshot()).await,
            SnapshotKey::Vendor => self.repo.save(key, &self.vendors.snapshot()).await,
        };
        saved.map_err(|e| {
            warn!(%key, error = %e, "Snapshot not saved; in-memory state kept");
            PlatformError::from(e)
        })
    }
}

/// One save lock per persisted entry
#[derive(Debug, Default)]
struct SaveLocks {
    auth: Mutex<()>,
    iso: Mutex<()>,
    risk: Mutex<()>,
    vendor: Mutex<()>,
}

impl SaveLocks {
    async fn lock_for(&self, key: SnapshotKey) -> MutexGuard<'_, ()> {
        match key {
            SnapshotKey::Auth => self.auth.lock().await,
            SnapshotKey::Iso => self.iso.lock().await,
            SnapshotKey::Risk => self.risk.lock().await,
            SnapshotKey::Vendor => self.vendor.lock().await,
        }
    }
}
