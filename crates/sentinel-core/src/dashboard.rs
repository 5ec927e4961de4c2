//! Read-side metrics over store snapshots

use sentinel_model::{ComplianceStatus, Impact, Likelihood, Risk, RiskId, RiskLevel, RiskStatus, Vendor};
use sentinel_store::{ControlSnapshot, Snapshot};
use serde::Serialize;

/// Headline figures for the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetrics {
    pub total_risks: usize,
    pub critical_risks: usize,
    pub high_risks: usize,
    pub open_risks: usize,
    /// Mitigated or closed
    pub resolved_risks: usize,
    pub total_vendors: usize,
    pub compliant_vendors: usize,
    pub non_compliant_vendors: usize,
    /// Under review
    pub pending_vendors: usize,
    pub implemented_controls: usize,
    pub total_controls: usize,
    pub compliance_percentage: u8,
}

impl DashboardMetrics {
    /// Compute every figure from the three snapshots
    #[must_use]
    pub fn compute(
        risks: &Snapshot<Risk>,
        vendors: &Snapshot<Vendor>,
        controls: &ControlSnapshot,
    ) -> Self {
        let risk_level_count = |level: RiskLevel| risks.iter().filter(|r| r.level() == level).count();
        let vendor_count = |status: ComplianceStatus| {
            vendors
                .iter()
                .filter(|v| v.compliance_status == status)
                .count()
        };
        let open_risks = risks.iter().filter(|r| r.status == RiskStatus::Open).count();

        Self {
            total_risks: risks.len(),
            critical_risks: risk_level_count(RiskLevel::Critical),
            high_risks: risk_level_count(RiskLevel::High),
            open_risks,
            resolved_risks: risks.len() - open_risks,
            total_vendors: vendors.len(),
            compliant_vendors: vendor_count(ComplianceStatus::Compliant),
            non_compliant_vendors: vendor_count(ComplianceStatus::NonCompliant),
            pending_vendors: vendor_count(ComplianceStatus::UnderReview),
            implemented_controls: controls.implemented_count(),
            total_controls: controls.total(),
            compliance_percentage: controls.completion_percentage(),
        }
    }

    /// Plain-text rendering for the CLI
    #[must_use]
    pub fn generate_text(&self) -> String {
        let mut out = String::new();
        out.push_str("=== Compliance Dashboard ===\n\n");
        out.push_str(&format!(
            "Compliance Score: {}% ({} of {} controls implemented)\n",
            self.compliance_percentage, self.implemented_controls, self.total_controls
        ));
        out.push_str(&format!(
            "Risks: {} total, {} critical, {} high\n",
            self.total_risks, self.critical_risks, self.high_risks
        ));
        out.push_str(&format!(
            "  {} open, {} mitigated or closed\n",
            self.open_risks, self.resolved_risks
        ));
        out.push_str(&format!(
            "Vendors: {} total, {} compliant, {} non-compliant, {} pending review\n",
            self.total_vendors,
            self.compliant_vendors,
            self.non_compliant_vendors,
            self.pending_vendors
        ));
        out
    }
}

/// One risk positioned on the likelihood × impact grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatPoint {
    pub id: RiskId,
    pub title: String,
    pub likelihood: Likelihood,
    pub impact: Impact,
    pub score: u8,
    pub level: RiskLevel,
}

/// Heat-map points, one per risk
#[must_use]
pub fn heatmap(risks: &Snapshot<Risk>) -> Vec<HeatPoint> {
    risks
        .iter()
        .map(|r| HeatPoint {
            id: r.id,
            title: r.title.clone(),
            likelihood: r.likelihood,
            impact: r.impact,
            score: r.score.value(),
            level: r.level(),
        })
        .collect()
}

/// Risks matching `query`, highest score first
///
/// Ties keep insertion order.
#[must_use]
pub fn risk_register<'a>(risks: &'a Snapshot<Risk>, query: &str) -> Vec<&'a Risk> {
    let mut matching: Vec<&Risk> = risks.iter().filter(|r| r.matches(query)).collect();
    matching.sort_by(|a, b| b.score.cmp(&a.score));
    matching
}
