//! Identified records and their immutable list snapshots

use crate::cell::Versioned;
use chrono::{DateTime, Utc};
use im::Vector;
use sentinel_model::{
    demo_risks, demo_vendors, Risk, RiskDraft, RiskId, RiskPatch, SequentialId, Validate, Vendor,
    VendorDraft, VendorId, VendorPatch,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Entity kept in a [`RecordStore`](crate::RecordStore)
pub trait Record:
    Clone + Debug + PartialEq + Send + Sync + Serialize + DeserializeOwned + 'static
{
    /// Sequential identifier type
    type Id: SequentialId + Send + Sync;
    /// Creation input
    type Draft: Validate + Debug + Send;
    /// Partial update input
    type Patch: Validate + Debug + Send;

    /// Lower-case entity name used in errors, logs and metric labels
    const KIND: &'static str;

    fn id(&self) -> Self::Id;

    /// Build a record from a validated draft
    fn create(id: Self::Id, draft: Self::Draft, now: DateTime<Utc>) -> Self;

    /// Merge a validated patch
    fn apply_patch(&mut self, patch: Self::Patch);

    /// Fixed onboarding seed set
    fn demo_records(now: DateTime<Utc>) -> Vec<Self>;
}

impl Record for Risk {
    type Id = RiskId;
    type Draft = RiskDraft;
    type Patch = RiskPatch;

    const KIND: &'static str = "risk";

    fn id(&self) -> RiskId {
        self.id
    }

    fn create(id: RiskId, draft: RiskDraft, now: DateTime<Utc>) -> Self {
        Risk::new(id, draft, now)
    }

    fn apply_patch(&mut self, patch: RiskPatch) {
        self.apply(patch);
    }

    fn demo_records(now: DateTime<Utc>) -> Vec<Self> {
        demo_risks(now)
    }
}

impl Record for Vendor {
    type Id = VendorId;
    type Draft = VendorDraft;
    type Patch = VendorPatch;

    const KIND: &'static str = "vendor";

    fn id(&self) -> VendorId {
        self.id
    }

    fn create(id: VendorId, draft: VendorDraft, now: DateTime<Utc>) -> Self {
        Vendor::new(id, draft, now)
    }

    fn apply_patch(&mut self, patch: VendorPatch) {
        self.apply(patch);
    }

    fn demo_records(now: DateTime<Utc>) -> Vec<Self> {
        demo_vendors(now)
    }
}

/// Immutable view of a record list at one version
///
/// `next_seq` is the id counter. It only ever moves forward, so ids of
/// deleted records are never issued again. It is persisted with the list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", bound = "")]
pub struct Snapshot<R: Record> {
    next_seq: u32,
    records: Vector<R>,
    #[serde(skip)]
    version: u64,
}

impl<R: Record> Default for Snapshot<R> {
    fn default() -> Self {
        Self {
            next_seq: 1,
            records: Vector::new(),
            version: 0,
        }
    }
}

impl<R: Record> PartialEq for Snapshot<R> {
    fn eq(&self, other: &Self) -> bool {
        self.next_seq == other.next_seq && self.records == other.records
    }
}

impl<R: Record> Versioned for Snapshot<R> {
    fn version(&self) -> u64 {
        self.version
    }

    fn set_version(&mut self, version: u64) {
        self.version = version;
    }
}

impl<R: Record> Snapshot<R> {
    /// Snapshot holding `records`, with the counter past their highest id
    #[must_use]
    pub fn from_records(records: impl IntoIterator<Item = R>) -> Self {
        Self::default().with_records(records)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Publication counter (not persisted)
    #[inline]
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Sequence number the next added record will receive
    #[inline]
    #[must_use]
    pub fn next_seq(&self) -> u32 {
        self.next_seq
    }

    /// Records in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &R> {
        self.records.iter()
    }

    #[inline]
    #[must_use]
    pub fn records(&self) -> &Vector<R> {
        &self.records
    }

    /// Look up a record by id
    #[must_use]
    pub fn get(&self, id: R::Id) -> Option<&R> {
        self.records.iter().find(|r| r.id() == id)
    }

    /// Most recently appended record
    #[must_use]
    pub fn latest(&self) -> Option<&R> {
        self.records.last()
    }

    fn position(&self, id: R::Id) -> Option<usize> {
        self.records.iter().position(|r| r.id() == id)
    }

    /// Append a record built from `draft` under the next id
    #[must_use]
    pub fn with_added(&self, draft: R::Draft, now: DateTime<Utc>) -> (Self, R::Id) {
        let id = R::Id::from_seq(self.next_seq);
        let mut next = self.clone();
        next.records.push_back(R::create(id, draft, now));
        next.next_seq += 1;
        (next, id)
    }

    /// Copy with one record rewritten in place; `None` for an unknown id
    #[must_use]
    pub fn with_modified(&self, id: R::Id, edit: impl FnOnce(&mut R)) -> Option<Self> {
        let index = self.position(id)?;
        let mut record = self.records[index].clone();
        edit(&mut record);
        let mut next = self.clone();
        next.records.set(index, record);
        Some(next)
    }

    /// Copy with `patch` merged into one record
    #[must_use]
    pub fn with_updated(&self, id: R::Id, patch: R::Patch) -> Option<Self> {
        self.with_modified(id, |record| record.apply_patch(patch))
    }

    /// Copy without the record; `None` for an unknown id
    #[must_use]
    pub fn without(&self, id: R::Id) -> Option<Self> {
        let index = self.position(id)?;
        let mut next = self.clone();
        next.records.remove(index);
        Some(next)
    }

    /// Copy whose list is replaced wholesale
    #[must_use]
    pub fn with_records(&self, records: impl IntoIterator<Item = R>) -> Self {
        let records: Vector<R> = records.into_iter().collect();
        let past_highest = records
            .iter()
            .map(|r| r.id().seq().saturating_add(1))
            .max()
            .unwrap_or(1);
        Self {
            next_seq: self.next_seq.max(past_highest),
            records,
            version: self.version,
        }
    }

    /// Copy with an empty list; the counter is kept
    #[must_use]
    pub fn cleared(&self) -> Self {
        self.with_records(std::iter::empty())
    }
}
