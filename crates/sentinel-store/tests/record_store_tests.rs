//! Behaviour of the risk and vendor stores

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use sentinel_model::{
    Assessment, AssessmentScore, ComplianceStatus, Criticality, Rating, RiskDraft, RiskId,
    RiskLevel, RiskPatch, SequentialId, VendorDraft, VendorId, VendorPatch,
};
use sentinel_store::{RiskStore, StoreError, VendorStore};

fn rating(value: u8) -> Rating {
    Rating::new(value).unwrap()
}

fn draft(title: &str) -> RiskDraft {
    RiskDraft::new(title, "Technical", "IT Security")
}

#[test]
fn add_scores_and_bands() {
    let store = RiskStore::new();
    let snapshot = store
        .add(draft("Ransomware").rated(rating(4), rating(5)))
        .unwrap();
    let risk = snapshot.latest().unwrap();
    assert_eq!(risk.id.to_string(), "RSK-001");
    assert_eq!(risk.score.value(), 20);
    assert_eq!(risk.level(), RiskLevel::Critical);
    assert_eq!(risk.level().as_str(), "critical");
}

#[test]
fn validation_failure_commits_nothing() {
    let store = RiskStore::new();
    let err = store.add(RiskDraft::new("", "Technical", "IT")).unwrap_err();
    assert_eq!(err, StoreError::Validation(sentinel_model::ValidationError::MissingField("title")));
    assert!(store.snapshot().is_empty());
    assert_eq!(store.snapshot().version(), 0);
}

#[test]
fn delete_then_add_never_reuses_ids() {
    let store = RiskStore::new();
    store.add(draft("a")).unwrap();
    let second = store.add(draft("b")).unwrap().latest().unwrap().id;
    store.delete(second).unwrap();
    let third = store.add(draft("c")).unwrap().latest().unwrap().id;
    assert_eq!(third.seq(), 3);
    assert_ne!(third, second);
}

#[test]
fn unknown_ids_are_not_found() {
    let store = RiskStore::new();
    let missing = RiskId::from_seq(42);
    assert_eq!(
        store.delete(missing).unwrap_err(),
        StoreError::not_found("risk", "RSK-042")
    );
    assert!(matches!(
        store.update(missing, RiskPatch::new().title("x")),
        Err(StoreError::NotFound { .. })
    ));
}

#[test]
fn update_without_factors_keeps_score() {
    let store = RiskStore::new();
    let id = store
        .add(draft("a").rated(rating(2), rating(3)))
        .unwrap()
        .latest()
        .unwrap()
        .id;
    let snapshot = store.update(id, RiskPatch::new().owner("Legal")).unwrap();
    let risk = snapshot.get(id).unwrap();
    assert_eq!(risk.owner, "Legal");
    assert_eq!(risk.score.value(), 6);

    let snapshot = store.update(id, RiskPatch::new().impact(rating(5))).unwrap();
    assert_eq!(snapshot.get(id).unwrap().score.value(), 10);
}

#[test]
fn demo_data_is_idempotent() {
    let store = RiskStore::new();
    let first = store.load_demo_data();
    let second = store.load_demo_data();
    assert_eq!(first.len(), 8);
    let ids = |s: &sentinel_store::Snapshot<sentinel_model::Risk>| {
        s.iter().map(|r| r.id).collect::<Vec<_>>()
    };
    assert_eq!(ids(&first), ids(&second));
    assert_eq!(second.next_seq(), 9);
    assert_eq!(store.add(draft("next")).unwrap().latest().unwrap().id.to_string(), "RSK-009");
}

#[test]
fn reset_keeps_counter() {
    let store = RiskStore::new();
    store.load_demo_data();
    let cleared = store.reset();
    assert!(cleared.is_empty());
    assert_eq!(store.add(draft("after")).unwrap().latest().unwrap().id.seq(), 9);
}

#[tokio::test]
async fn subscribers_see_each_commit() {
    let store = RiskStore::new();
    let mut rx = store.subscribe();
    store.add(draft("a")).unwrap();
    rx.changed().await.unwrap();
    assert_eq!(rx.borrow_and_update().len(), 1);

    let _ = store.delete(RiskId::from_seq(9));
    assert!(!rx.has_changed().unwrap(), "failed mutation publishes nothing");
}

#[test]
fn vendor_patch_keeps_status_until_reassessed() {
    let store = VendorStore::new();
    let assessment = Assessment::with_yes_count(10);
    let draft = VendorDraft::from_assessment("Acme", "Hosting", Criticality::High, &assessment);
    let vendor = store.add(draft).unwrap().latest().cloned().unwrap();
    assert_eq!(vendor.id, VendorId::from_seq(1));
    assert_eq!(vendor.compliance_status, ComplianceStatus::Compliant);

    let low = AssessmentScore::new(20).unwrap();
    let patched = store
        .update(vendor.id, VendorPatch::new().assessment_score(low))
        .unwrap();
    let patched = patched.get(vendor.id).unwrap();
    assert_eq!(patched.assessment_score.value(), 20);
    assert_eq!(patched.compliance_status, ComplianceStatus::Compliant);

    let reassessed = store
        .reassess(vendor.id, &Assessment::with_yes_count(3))
        .unwrap();
    let reassessed = reassessed.get(vendor.id).unwrap();
    assert_eq!(reassessed.assessment_score.value(), 25);
    assert_eq!(reassessed.compliance_status, ComplianceStatus::NonCompliant);
    assert!(reassessed.last_assessment >= vendor.last_assessment);
}

#[test]
fn vendor_demo_set() {
    let store = VendorStore::new();
    let snapshot = store.load_demo_data();
    assert_eq!(snapshot.len(), 5);
    assert_eq!(snapshot.next_seq(), 6);
    assert!(store.reassess(VendorId::from_seq(77), &Assessment::new()).is_err());
}

proptest! {
    #[test]
    fn score_is_product(l in 1u8..=5, i in 1u8..=5) {
        let store = RiskStore::new();
        let snapshot = store.add(draft("p").rated(rating(l), rating(i))).unwrap();
        prop_assert_eq!(snapshot.latest().unwrap().score.value(), l * i);
    }

    #[test]
    fn ids_strictly_increase(ops in prop::collection::vec(any::<bool>(), 1..40)) {
        let store = RiskStore::new();
        let mut last_issued = 0;
        for add in ops {
            if add {
                let id = store.add(draft("p")).unwrap().latest().unwrap().id.seq();
                prop_assert!(id > last_issued);
                last_issued = id;
            } else if let Some(first) = store.snapshot().iter().next().map(|r| r.id) {
                store.delete(first).unwrap();
            }
        }
    }
}
