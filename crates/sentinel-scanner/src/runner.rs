//! Scripted scan runner
//!
//! A run emits a fixed transcript in timed stages:
//!
//! 1. banner, then S3 stage header after `start_delay_ms`
//! 2. S3 result after `s3_delay_ms`
//! 3. IAM header, IAM result, DB header, DB result, summary, each after
//!    `stage_delay_ms`
//!
//! Lines are sent to the sink as they are produced. Critical and warning
//! tallies come only from the configuration, never from counting lines.

use crate::config::{DbEncryption, IamPolicy, S3Access, ScanConfig, ScanTiming};
use crate::error::ScanError;
use crate::finding::{Finding, Severity};
use crate::log::{LogKind, LogLine};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info};
use ulid::Ulid;

const BOX_TOP: &str = "╔═══════════════════════════════════════╗";
const BOX_TITLE: &str = "║   SCAN COMPLETE                        ║";
const BOX_BOTTOM: &str = "╚═══════════════════════════════════════╝";

/// Outcome of one run
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanReport {
    pub run_id: Ulid,
    pub config: ScanConfig,
    pub findings: Vec<Finding>,
    pub lines: Vec<LogLine>,
    pub critical: usize,
    pub warnings: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl ScanReport {
    /// True when nothing was found
    #[must_use]
    pub fn passed(&self) -> bool {
        self.critical == 0 && self.warnings == 0
    }

    /// Plain-text summary
    #[must_use]
    pub fn generate_text(&self) -> String {
        let mut report = String::new();

        report.push_str("=== Cloud Security Scan Report ===\n\n");
        report.push_str(&format!("Run: {}\n", self.run_id));
        report.push_str(&format!("S3 Access: {}\n", self.config.s3_access));
        report.push_str(&format!("IAM Policy: {}\n", self.config.iam_policy));
        report.push_str(&format!("DB Encryption: {}\n", self.config.db_encryption));
        report.push_str(&format!("Critical Issues: {}\n", self.critical));
        report.push_str(&format!("Warnings: {}\n", self.warnings));

        if !self.findings.is_empty() {
            report.push_str("\n=== Findings ===\n");
            for (i, finding) in self.findings.iter().enumerate() {
                report.push_str(&format!(
                    "{}. [{}] {}: {}\n",
                    i + 1,
                    finding.severity,
                    finding.resource,
                    finding.issue
                ));
            }

            report.push_str("\n=== Remediation ===\n");
            for finding in &self.findings {
                report.push_str(&format!("\n-- {} --\n", finding.check.title()));
                report.push_str(finding.check.remediation());
                report.push('\n');
            }
        }

        report.push_str(&format!(
            "\n=== Result: {} ===\n",
            if self.passed() { "PASS" } else { "FAIL" }
        ));

        report
    }
}

/// Runs the scripted scenario with configurable stage delays
#[derive(Debug, Clone, Copy, Default)]
pub struct ScenarioRunner {
    timing: ScanTiming,
}

impl ScenarioRunner {
    #[must_use]
    pub const fn new(timing: ScanTiming) -> Self {
        Self { timing }
    }

    #[must_use]
    pub const fn timing(&self) -> ScanTiming {
        self.timing
    }

    /// Run the scenario, streaming each line to `sink`
    ///
    /// # Errors
    /// Returns [`ScanError::Cancelled`] if the receiver is dropped mid-run
    pub async fn run(
        &self,
        config: ScanConfig,
        sink: mpsc::Sender<LogLine>,
    ) -> Result<ScanReport, ScanError> {
        self.execute(config, Some(&sink)).await
    }

    /// Run the scenario and only return the report
    ///
    /// # Errors
    /// Never fails without a sink; the `Result` mirrors [`run`](Self::run)
    pub async fn run_collect(&self, config: ScanConfig) -> Result<ScanReport, ScanError> {
        self.execute(config, None).await
    }

    async fn execute(
        &self,
        config: ScanConfig,
        sink: Option<&mpsc::Sender<LogLine>>,
    ) -> Result<ScanReport, ScanError> {
        let mut t = Transcript::new(sink);
        let started_at = Utc::now();
        info!(run_id = %t.run_id, ?config, "Scan started");

        t.info("$ aws-security-scan --profile production").await?;
        t.info("Scanning AWS infrastructure...").await?;

        pause(self.timing.start_delay_ms).await;
        t.stage("[SCANNER] Analyzing S3 bucket configurations...").await?;

        pause(self.timing.s3_delay_ms).await;
        match config.s3_access {
            S3Access::Public => t.finding(Finding::PUBLIC_BUCKET).await?,
            S3Access::Private => t.ok("[OK] S3 Buckets: All buckets are private").await?,
        }

        pause(self.timing.stage_delay_ms).await;
        t.stage("[SCANNER] Checking IAM policies...").await?;

        pause(self.timing.stage_delay_ms).await;
        match config.iam_policy {
            IamPolicy::AdminAll => t.finding(Finding::ADMIN_POLICY).await?,
            IamPolicy::LeastPrivilege => {
                t.ok("[OK] IAM Policies: Least privilege enforced").await?;
            }
        }

        pause(self.timing.stage_delay_ms).await;
        t.stage("[SCANNER] Verifying database encryption...").await?;

        pause(self.timing.stage_delay_ms).await;
        match config.db_encryption {
            DbEncryption::Disabled => t.finding(Finding::UNENCRYPTED_DB).await?,
            DbEncryption::Enabled => {
                t.ok("[OK] RDS Databases: Encryption at rest enabled").await?;
            }
        }

        pause(self.timing.stage_delay_ms).await;
        let critical = config.expected_critical();
        let warnings = config.expected_warnings();
        t.info("").await?;
        t.ok(BOX_TOP).await?;
        t.ok(BOX_TITLE).await?;
        t.ok(BOX_BOTTOM).await?;
        t.info(format!("Critical Issues: {critical}")).await?;
        t.info(format!("Warnings: {warnings}")).await?;
        t.info("").await?;
        if critical == 0 && warnings == 0 {
            t.ok("✓ All checks passed! Infrastructure is secure.").await?;
        } else {
            t.emit(LogKind::Error, "✗ Action required: Review findings above")
                .await?;
        }

        debug_assert_eq!(
            t.findings.iter().filter(|f| f.severity == Severity::Critical).count(),
            critical
        );
        info!(run_id = %t.run_id, critical, warnings, "Scan complete");

        Ok(ScanReport {
            run_id: t.run_id,
            config,
            findings: t.findings,
            lines: t.lines,
            critical,
            warnings,
            started_at,
            finished_at: Utc::now(),
        })
    }
}

async fn pause(ms: u64) {
    if ms > 0 {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }
}

struct Transcript<'a> {
    run_id: Ulid,
    sink: Option<&'a mpsc::Sender<LogLine>>,
    lines: Vec<LogLine>,
    findings: Vec<Finding>,
}

impl<'a> Transcript<'a> {
    fn new(sink: Option<&'a mpsc::Sender<LogLine>>) -> Self {
        Self {
            run_id: Ulid::new(),
            sink,
            lines: Vec::new(),
            findings: Vec::new(),
        }
    }

    async fn emit(&mut self, kind: LogKind, message: impl Into<String>) -> Result<(), ScanError> {
        let line = LogLine::new(kind, message);
        if let Some(sink) = self.sink {
            sink.send(line.clone())
                .await
                .map_err(|_| ScanError::Cancelled {
                    run_id: self.run_id,
                })?;
        }
        self.lines.push(line);
        Ok(())
    }

    async fn info(&mut self, message: impl Into<String>) -> Result<(), ScanError> {
        self.emit(LogKind::Info, message).await
    }

    async fn ok(&mut self, message: impl Into<String>) -> Result<(), ScanError> {
        self.emit(LogKind::Success, message).await
    }

    /// Blank separator followed by a stage header
    async fn stage(&mut self, header: &str) -> Result<(), ScanError> {
        debug!(run_id = %self.run_id, header, "Scan stage");
        self.info("").await?;
        self.info(header).await
    }

    async fn finding(&mut self, finding: Finding) -> Result<(), ScanError> {
        let kind = match finding.severity {
            Severity::Critical => LogKind::Error,
            Severity::High => LogKind::Warning,
        };
        for line in finding.transcript() {
            self.emit(kind, line).await?;
        }
        self.findings.push(finding);
        Ok(())
    }
}
