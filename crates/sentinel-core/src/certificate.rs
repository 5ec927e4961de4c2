//! Vendor assessment certificates

use crate::error::{PlatformError, Result};
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use sentinel_model::{ComplianceStatus, Vendor};
use std::path::{Path, PathBuf};
use tracing::info;

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("static pattern"));

const STATEMENT: &str = "This vendor has been assessed according to SentinelGRC security standards.";
const FOOTER: &str = "SentinelGRC - Enterprise Governance, Risk & Compliance Platform";

/// Verdict line wording for a compliance status
#[must_use]
pub const fn overall_status(status: ComplianceStatus) -> &'static str {
    match status {
        ComplianceStatus::Compliant => "PASSED",
        ComplianceStatus::UnderReview => "NEEDS REVIEW",
        ComplianceStatus::NonCompliant => "FAILED",
    }
}

/// `Acme  Cloud Ltd` → `Acme_Cloud_Ltd_Assessment.txt`
#[must_use]
pub fn file_name(vendor_name: &str) -> String {
    format!("{}_Assessment.txt", WHITESPACE.replace_all(vendor_name, "_"))
}

/// Fixed-layout text certificate for one vendor
#[must_use]
pub fn render(vendor: &Vendor, organization: &str, generated: DateTime<Utc>) -> String {
    let rows = [
        ("Vendor Name", vendor.name.clone()),
        ("Service Type", vendor.service_type.clone()),
        ("Criticality", vendor.criticality.to_string()),
        ("Assessment Score", vendor.assessment_score.to_string()),
        ("Compliance Status", vendor.compliance_status.to_string()),
        (
            "Last Assessment",
            vendor.last_assessment.format("%Y-%m-%d").to_string(),
        ),
    ];
    let label_width = rows.iter().map(|(k, _)| k.len()).max().unwrap_or(0).max("Field".len());
    let value_width = rows
        .iter()
        .map(|(_, v)| v.chars().count())
        .max()
        .unwrap_or(0)
        .max("Value".len());
    let rule = format!("+-{}-+-{}-+\n", "-".repeat(label_width), "-".repeat(value_width));
    let row = |k: &str, v: &str| {
        let pad = value_width - v.chars().count();
        format!("| {k:<label_width$} | {v}{} |\n", " ".repeat(pad))
    };

    let mut out = String::new();
    out.push_str(organization);
    out.push('\n');
    out.push_str("Vendor Security Assessment Certification\n");
    out.push_str(&format!("Generated: {}\n\n", generated.format("%Y-%m-%d")));
    out.push_str("Vendor Information\n");
    out.push_str(&rule);
    out.push_str(&row("Field", "Value"));
    out.push_str(&rule);
    for (k, v) in &rows {
        out.push_str(&row(k, v));
    }
    out.push_str(&rule);
    out.push('\n');
    out.push_str("Assessment Summary\n");
    out.push_str(&format!(
        "Overall Status: {}\n",
        overall_status(vendor.compliance_status)
    ));
    out.push_str(STATEMENT);
    out.push_str("\n\n");
    out.push_str(FOOTER);
    out.push('\n');
    out
}

/// Write a vendor's certificate into `dir`, returning the file path
///
/// # Errors
/// Returns [`PlatformError::Io`] if the directory or file cannot be written
pub async fn export(vendor: &Vendor, organization: &str, dir: &Path) -> Result<PathBuf> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| PlatformError::io_error(dir, e))?;
    let path = dir.join(file_name(&vendor.name));
    let text = render(vendor, organization, Utc::now());
    tokio::fs::write(&path, text)
        .await
        .map_err(|e| PlatformError::io_error(&path, e))?;
    info!(vendor = %vendor.id, path = %path.display(), "Certificate exported");
    Ok(path)
}
