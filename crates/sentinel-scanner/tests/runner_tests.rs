//! Scan runner transcripts, timing and tallies

use pretty_assertions::assert_eq;
use sentinel_scanner::{
    Check, DbEncryption, IamPolicy, LogKind, S3Access, ScanConfig, ScanError, ScanTiming,
    ScenarioRunner,
};
use std::time::Duration;
use tokio::sync::mpsc;

fn messages(lines: &[sentinel_scanner::LogLine]) -> Vec<&str> {
    lines.iter().map(|l| l.message.as_str()).collect()
}

#[tokio::test]
async fn secure_config_transcript() {
    let report = ScenarioRunner::new(ScanTiming::instant())
        .run_collect(ScanConfig::default())
        .await
        .unwrap();

    assert_eq!(
        messages(&report.lines),
        vec![
            "$ aws-security-scan --profile production",
            "Scanning AWS infrastructure...",
            "",
            "[SCANNER] Analyzing S3 bucket configurations...",
            "[OK] S3 Buckets: All buckets are private",
            "",
            "[SCANNER] Checking IAM policies...",
            "[OK] IAM Policies: Least privilege enforced",
            "",
            "[SCANNER] Verifying database encryption...",
            "[OK] RDS Databases: Encryption at rest enabled",
            "",
            "╔═══════════════════════════════════════╗",
            "║   SCAN COMPLETE                        ║",
            "╚═══════════════════════════════════════╝",
            "Critical Issues: 0",
            "Warnings: 0",
            "",
            "✓ All checks passed! Infrastructure is secure.",
        ]
    );
    assert!(report.passed());
    assert!(report.findings.is_empty());
}

#[tokio::test]
async fn insecure_config_findings() {
    let report = ScenarioRunner::new(ScanTiming::instant())
        .run_collect(ScanConfig::insecure())
        .await
        .unwrap();

    assert_eq!(report.critical, 2);
    assert_eq!(report.warnings, 1);
    assert!(!report.passed());
    let checks: Vec<_> = report.findings.iter().map(|f| f.check).collect();
    assert_eq!(checks, vec![Check::S3Access, Check::IamPolicy, Check::DbEncryption]);

    let last = report.lines.last().unwrap();
    assert_eq!(last.kind, LogKind::Error);
    assert_eq!(last.message, "✗ Action required: Review findings above");
    assert_eq!(report.lines.iter().filter(|l| l.kind == LogKind::Warning).count(), 5);
    assert_eq!(report.lines.iter().filter(|l| l.kind == LogKind::Error).count(), 11);

    let text = report.generate_text();
    assert!(text.contains("Critical Issues: 2"));
    assert!(text.contains("aws s3api put-public-access-block"));
    assert!(text.ends_with("=== Result: FAIL ===\n"));
}

#[tokio::test]
async fn tallies_follow_configuration_only() {
    let runner = ScenarioRunner::new(ScanTiming::instant());
    for config in ScanConfig::all() {
        let report = runner.run_collect(config).await.unwrap();
        assert_eq!(report.critical, config.expected_critical(), "{config:?}");
        assert_eq!(report.warnings, config.expected_warnings(), "{config:?}");
        assert!(report
            .lines
            .iter()
            .any(|l| l.message == format!("Critical Issues: {}", report.critical)));
    }
}

#[tokio::test(start_paused = true)]
async fn default_timing_takes_4700ms() {
    let runner = ScenarioRunner::default();
    let (tx, mut rx) = mpsc::channel(64);
    let start = tokio::time::Instant::now();
    let config = ScanConfig::new(S3Access::Public, IamPolicy::LeastPrivilege, DbEncryption::Enabled);
    let report = runner.run(config, tx).await.unwrap();
    assert_eq!(start.elapsed(), Duration::from_millis(4700));

    let mut streamed = Vec::new();
    while let Some(line) = rx.recv().await {
        streamed.push(line);
    }
    assert_eq!(streamed, report.lines);
    assert_eq!(report.critical, 1);
}

#[tokio::test(start_paused = true)]
async fn lines_arrive_stage_by_stage() {
    let runner = ScenarioRunner::default();
    let (tx, mut rx) = mpsc::channel(64);
    let handle = tokio::spawn(async move { runner.run(ScanConfig::default(), tx).await });

    let first = rx.recv().await.unwrap();
    assert_eq!(first.message, "$ aws-security-scan --profile production");
    let second = rx.recv().await.unwrap();
    assert_eq!(second.message, "Scanning AWS infrastructure...");

    let before = tokio::time::Instant::now();
    let third = rx.recv().await.unwrap();
    assert_eq!(third.message, "");
    assert_eq!(before.elapsed(), Duration::from_millis(500));

    while rx.recv().await.is_some() {}
    assert!(handle.await.unwrap().unwrap().passed());
}

#[tokio::test]
async fn dropped_receiver_cancels() {
    let (tx, rx) = mpsc::channel(1);
    drop(rx);
    let err = ScenarioRunner::new(ScanTiming::instant())
        .run(ScanConfig::default(), tx)
        .await
        .unwrap_err();
    assert!(matches!(err, ScanError::Cancelled { .. }));
}
