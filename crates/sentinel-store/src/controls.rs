//! ISO 27001 control checklist store

use crate::cell::{StateCell, Versioned};
use crate::error::{Result, StoreError};
use crate::store::count;
use im::Vector;
use indexmap::IndexMap;
use sentinel_model::{completion_percentage, iso27001_catalog, Control, ControlFilter, ControlId};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, info};

const KIND: &str = "control";

/// Immutable view of the checklist
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlSnapshot {
    controls: Vector<Control>,
    #[serde(skip)]
    version: u64,
}

impl Default for ControlSnapshot {
    /// The catalogue with its default flags
    fn default() -> Self {
        Self::from_controls(iso27001_catalog())
    }
}

impl PartialEq for ControlSnapshot {
    fn eq(&self, other: &Self) -> bool {
        self.controls == other.controls
    }
}

impl Versioned for ControlSnapshot {
    fn version(&self) -> u64 {
        self.version
    }

    fn set_version(&mut self, version: u64) {
        self.version = version;
    }
}

impl ControlSnapshot {
    #[must_use]
    pub fn from_controls(controls: impl IntoIterator<Item = Control>) -> Self {
        Self {
            controls: controls.into_iter().collect(),
            version: 0,
        }
    }

    #[inline]
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Controls in catalogue order
    pub fn iter(&self) -> impl Iterator<Item = &Control> {
        self.controls.iter()
    }

    #[must_use]
    pub fn get(&self, id: &ControlId) -> Option<&Control> {
        self.controls.iter().find(|c| &c.id == id)
    }

    #[inline]
    #[must_use]
    pub fn total(&self) -> usize {
        self.controls.len()
    }

    #[must_use]
    pub fn implemented_count(&self) -> usize {
        self.controls.iter().filter(|c| c.implemented).count()
    }

    /// Rounded share of implemented controls (0 when empty)
    #[must_use]
    pub fn completion_percentage(&self) -> u8 {
        completion_percentage(self.implemented_count(), self.total())
    }

    /// Controls passing `filter`, grouped by category in catalogue order
    ///
    /// Categories with no passing control are left out.
    #[must_use]
    pub fn grouped(&self, filter: ControlFilter) -> IndexMap<&str, Vec<&Control>> {
        let mut groups: IndexMap<&str, Vec<&Control>> = IndexMap::new();
        for control in self.controls.iter().filter(|c| filter.accepts(c)) {
            groups
                .entry(control.category.as_str())
                .or_default()
                .push(control);
        }
        groups
    }

    fn toggled(&self, id: &ControlId) -> Option<Self> {
        let index = self.controls.iter().position(|c| &c.id == id)?;
        let mut control = self.controls[index].clone();
        control.implemented = !control.implemented;
        let mut next = self.clone();
        next.controls.set(index, control);
        Some(next)
    }
}

/// Container for the control checklist
#[derive(Debug)]
pub struct ControlStore {
    cell: StateCell<ControlSnapshot>,
}

impl Default for ControlStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ControlStore {
    /// Store holding the default catalogue
    #[must_use]
    pub fn new() -> Self {
        Self::with_snapshot(ControlSnapshot::default())
    }

    #[must_use]
    pub fn with_snapshot(snapshot: ControlSnapshot) -> Self {
        Self {
            cell: StateCell::new(snapshot),
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> ControlSnapshot {
        self.cell.current()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ControlSnapshot> {
        self.cell.subscribe()
    }

    /// Flip the implemented flag of one control
    ///
    /// # Errors
    /// Returns [`StoreError::NotFound`] for an id outside the catalogue
    pub fn toggle_implemented(&self, id: &ControlId) -> Result<ControlSnapshot> {
        let snapshot = self.cell.commit(|current| {
            current
                .toggled(id)
                .ok_or_else(|| StoreError::not_found(KIND, id))
        })?;
        let implemented = snapshot.get(id).is_some_and(|c| c.implemented);
        info!(%id, implemented, "Control toggled");
        count(KIND, "toggle");
        Ok(snapshot)
    }

    /// Restore the catalogue defaults
    pub fn load_controls(&self) -> ControlSnapshot {
        let snapshot = self.cell.apply(|_| ControlSnapshot::default());
        info!(total = snapshot.total(), "Controls reloaded");
        count(KIND, "load");
        snapshot
    }

    /// Publish a snapshot restored from storage
    pub fn restore(&self, restored: ControlSnapshot) -> ControlSnapshot {
        debug!(total = restored.total(), "Control snapshot restored");
        self.cell.apply(move |_| restored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(code: &str) -> ControlId {
        code.parse().unwrap()
    }

    #[test]
    fn default_completion() {
        let snapshot = ControlSnapshot::default();
        assert_eq!(snapshot.total(), 20);
        assert_eq!(snapshot.implemented_count(), 9);
        assert_eq!(snapshot.completion_percentage(), 45);
    }

    #[test]
    fn toggle_twice_restores_flag() {
        let store = ControlStore::new();
        let before = store.snapshot().get(&id("A.5.1")).unwrap().implemented;
        let once = store.toggle_implemented(&id("A.5.1")).unwrap();
        assert_ne!(once.get(&id("A.5.1")).unwrap().implemented, before);
        assert_eq!(once.completion_percentage(), 50);
        let twice = store.toggle_implemented(&id("A.5.1")).unwrap();
        assert_eq!(twice.get(&id("A.5.1")).unwrap().implemented, before);
        assert_eq!(twice.version(), 2);
    }

    #[test]
    fn toggle_unknown_is_not_found() {
        let store = ControlStore::new();
        let err = store.toggle_implemented(&id("A.99.1")).unwrap_err();
        assert!(matches!(err, StoreError::NotFound { kind: "control", .. }));
        assert_eq!(store.snapshot().version(), 0);
    }

    #[test]
    fn grouping_keeps_catalogue_order_and_drops_empty() {
        let snapshot = ControlSnapshot::default();
        let all = snapshot.grouped(ControlFilter::All);
        let categories: Vec<_> = all.keys().copied().collect();
        assert_eq!(categories.first(), Some(&"Organizational Controls"));
        assert_eq!(categories.last(), Some(&"Compliance"));
        assert_eq!(all.values().map(Vec::len).sum::<usize>(), 20);

        let implemented = snapshot.grouped(ControlFilter::Implemented);
        assert!(!implemented.contains_key("Organizational Controls"));
        assert!(!implemented.contains_key("Compliance"));
        assert_eq!(implemented.values().map(Vec::len).sum::<usize>(), 9);

        let pending = snapshot.grouped(ControlFilter::Pending);
        assert_eq!(pending["Access Control"].len(), 1);
    }

    #[test]
    fn load_controls_resets_flags() {
        let store = ControlStore::new();
        store.toggle_implemented(&id("A.18.2")).unwrap();
        assert_eq!(store.load_controls(), ControlSnapshot::default());
    }
}
