use chrono::Utc;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use sentinel_core::dashboard::{self, DashboardMetrics};
use sentinel_model::{demo_risks, demo_vendors, Rating, Risk, RiskDraft};
use sentinel_store::{ControlSnapshot, RiskStore, Snapshot};

fn register_of(size: usize) -> Snapshot<Risk> {
    let store = RiskStore::new();
    for i in 0..size {
        let likelihood = Rating::new(u8::try_from(i % 5 + 1).unwrap()).unwrap();
        let impact = Rating::new(u8::try_from((i / 5) % 5 + 1).unwrap()).unwrap();
        store
            .add(RiskDraft::new(format!("Risk {i}"), "Operational", "COO").rated(likelihood, impact))
            .unwrap();
    }
    store.snapshot()
}

fn bench_metrics(c: &mut Criterion) {
    let now = Utc::now();
    let risks = Snapshot::from_records(demo_risks(now));
    let vendors = Snapshot::from_records(demo_vendors(now));
    let controls = ControlSnapshot::default();

    c.bench_function("metrics_demo_dataset", |b| {
        b.iter(|| black_box(DashboardMetrics::compute(&risks, &vendors, &controls)));
    });
}

fn bench_register(c: &mut Criterion) {
    let mut group = c.benchmark_group("risk_register");
    for size in [10, 100, 1_000] {
        let risks = register_of(size);
        group.bench_with_input(BenchmarkId::new("sorted", size), &risks, |b, risks| {
            b.iter(|| black_box(dashboard::risk_register(risks, "")));
        });
        group.bench_with_input(BenchmarkId::new("search", size), &risks, |b, risks| {
            b.iter(|| black_box(dashboard::risk_register(risks, "risk 9")));
        });
    }
    group.finish();
}

fn bench_snapshot_clone(c: &mut Criterion) {
    let risks = register_of(1_000);
    c.bench_function("snapshot_clone_1000", |b| {
        b.iter(|| black_box(risks.clone()));
    });
}

criterion_group!(benches, bench_metrics, bench_register, bench_snapshot_clone);
criterion_main!(benches);
