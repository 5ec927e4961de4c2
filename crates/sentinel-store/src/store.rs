//! Record stores for risks and vendors

use crate::cell::StateCell;
use crate::error::{Result, StoreError};
use crate::record::{Record, Snapshot};
use chrono::Utc;
use sentinel_model::{Assessment, Risk, Validate, Vendor, VendorId};
use tokio::sync::watch;
use tracing::{debug, info};

/// Store for risks
pub type RiskStore = RecordStore<Risk>;

/// Store for vendors
pub type VendorStore = RecordStore<Vendor>;

/// Explicit container for one record list
///
/// Every mutation validates its input first, then publishes a whole new
/// [`Snapshot`] to subscribers and returns it. A rejected mutation publishes
/// nothing.
#[derive(Debug)]
pub struct RecordStore<R: Record> {
    cell: StateCell<Snapshot<R>>,
}

impl<R: Record> Default for RecordStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Record> RecordStore<R> {
    /// Empty store
    #[must_use]
    pub fn new() -> Self {
        Self::with_snapshot(Snapshot::default())
    }

    /// Store starting from a restored snapshot
    #[must_use]
    pub fn with_snapshot(snapshot: Snapshot<R>) -> Self {
        Self {
            cell: StateCell::new(snapshot),
        }
    }

    /// Current snapshot
    #[must_use]
    pub fn snapshot(&self) -> Snapshot<R> {
        self.cell.current()
    }

    /// Receiver notified on every committed mutation
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Snapshot<R>> {
        self.cell.subscribe()
    }

    /// Validate and append a new record under the next id
    ///
    /// # Errors
    /// Returns [`StoreError::Validation`] if the draft is incomplete
    pub fn add(&self, draft: R::Draft) -> Result<Snapshot<R>> {
        draft.validate()?;
        let mut issued = None;
        let snapshot = self.cell.commit(|current| {
            let (next, id) = current.with_added(draft, Utc::now());
            issued = Some(id);
            Ok(next)
        })?;
        if let Some(id) = issued {
            info!(kind = R::KIND, %id, "Record added");
        }
        count(R::KIND, "add");
        Ok(snapshot)
    }

    /// Merge a partial update into an existing record
    ///
    /// # Errors
    /// Returns [`StoreError::Validation`] for a bad patch, or
    /// [`StoreError::NotFound`] for an unknown id
    pub fn update(&self, id: R::Id, patch: R::Patch) -> Result<Snapshot<R>> {
        patch.validate()?;
        let snapshot = self.cell.commit(|current| {
            current
                .with_updated(id, patch)
                .ok_or_else(|| StoreError::not_found(R::KIND, id))
        })?;
        info!(kind = R::KIND, %id, "Record updated");
        count(R::KIND, "update");
        Ok(snapshot)
    }

    /// Remove a record; nothing else references it
    ///
    /// # Errors
    /// Returns [`StoreError::NotFound`] for an unknown id
    pub fn delete(&self, id: R::Id) -> Result<Snapshot<R>> {
        let snapshot = self.cell.commit(|current| {
            current
                .without(id)
                .ok_or_else(|| StoreError::not_found(R::KIND, id))
        })?;
        info!(kind = R::KIND, %id, "Record deleted");
        count(R::KIND, "delete");
        Ok(snapshot)
    }

    /// Replace the list with the fixed seed set
    ///
    /// Idempotent. The id counter is moved past the seeds but never back.
    pub fn load_demo_data(&self) -> Snapshot<R> {
        let snapshot = self
            .cell
            .apply(|current| current.with_records(R::demo_records(Utc::now())));
        info!(kind = R::KIND, count = snapshot.len(), "Demo data loaded");
        count(R::KIND, "demo");
        snapshot
    }

    /// Empty the list, keeping the id counter
    pub fn reset(&self) -> Snapshot<R> {
        let snapshot = self.cell.apply(Snapshot::cleared);
        info!(kind = R::KIND, "Store reset");
        count(R::KIND, "reset");
        snapshot
    }

    /// Publish a snapshot restored from storage
    pub fn restore(&self, restored: Snapshot<R>) -> Snapshot<R> {
        debug!(kind = R::KIND, records = restored.len(), "Snapshot restored");
        self.cell.apply(move |_| restored)
    }
}

impl RecordStore<Vendor> {
    /// Re-score a vendor from a new questionnaire
    ///
    /// Unlike a plain patch this recomputes compliance status and the
    /// assessment date together with the score.
    ///
    /// # Errors
    /// Returns [`StoreError::NotFound`] for an unknown id
    pub fn reassess(&self, id: VendorId, assessment: &Assessment) -> Result<Snapshot<Vendor>> {
        let now = Utc::now();
        let snapshot = self.cell.commit(|current| {
            current
                .with_modified(id, |vendor| vendor.reassess(assessment, now))
                .ok_or_else(|| StoreError::not_found(Vendor::KIND, id))
        })?;
        info!(%id, score = %assessment.score(), "Vendor reassessed");
        count(Vendor::KIND, "reassess");
        Ok(snapshot)
    }
}

pub(crate) fn count(kind: &'static str, op: &'static str) {
    metrics::counter!("sentinel_store_mutations_total", "kind" => kind, "op" => op).increment(1);
}
