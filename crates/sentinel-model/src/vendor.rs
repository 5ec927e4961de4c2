//! Third-party vendors and their assessment outcome

use crate::assessment::Assessment;
use crate::id::{SequentialId, VendorId};
use crate::validation::{require, require_if_present, Validate, ValidationError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Business criticality of a vendor
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum Criticality {
    Critical,
    High,
    #[default]
    Medium,
    Low,
}

impl Criticality {
    /// Display label
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Critical => "Critical",
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }
}

impl Display for Criticality {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Criticality {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "critical" => Ok(Self::Critical),
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            _ => Err(ValidationError::unparseable("criticality", s)),
        }
    }
}

/// Questionnaire score as a percentage (0..=100)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct AssessmentScore(u8);

impl AssessmentScore {
    /// Create a score
    ///
    /// # Errors
    /// Returns [`ValidationError::OutOfRange`] above 100
    #[inline]
    pub fn new(value: u8) -> Result<Self, ValidationError> {
        if value <= 100 {
            Ok(Self(value))
        } else {
            Err(ValidationError::OutOfRange {
                field: "assessment score",
                min: 0,
                max: 100,
                actual: u32::from(value),
            })
        }
    }

    /// `round(100 * part / whole)`, half rounded up; 0 when `whole` is 0
    #[must_use]
    pub fn from_ratio(part: usize, whole: usize) -> Self {
        if whole == 0 {
            return Self(0);
        }
        let part = part.min(whole);
        let pct = (200 * part + whole) / (2 * whole);
        Self(u8::try_from(pct).unwrap_or(100))
    }

    /// Numeric value
    #[inline]
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for AssessmentScore {
    type Error = ValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AssessmentScore> for u8 {
    fn from(score: AssessmentScore) -> Self {
        score.0
    }
}

impl Display for AssessmentScore {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// Tri-state compliance classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComplianceStatus {
    Compliant,
    #[serde(rename = "Non-Compliant")]
    NonCompliant,
    #[serde(rename = "Under Review")]
    UnderReview,
}

impl ComplianceStatus {
    /// ≥80 Compliant, ≥60 Under Review, else Non-Compliant
    #[must_use]
    pub const fn from_score(score: AssessmentScore) -> Self {
        if score.0 >= 80 {
            Self::Compliant
        } else if score.0 >= 60 {
            Self::UnderReview
        } else {
            Self::NonCompliant
        }
    }

    /// Display label
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Compliant => "Compliant",
            Self::NonCompliant => "Non-Compliant",
            Self::UnderReview => "Under Review",
        }
    }
}

impl Display for ComplianceStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An assessed third-party vendor
///
/// `compliance_status` is fixed when the vendor is created or re-assessed. A
/// plain patch of `assessment_score` leaves it unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vendor {
    pub id: VendorId,
    pub name: String,
    pub criticality: Criticality,
    pub service_type: String,
    pub assessment_score: AssessmentScore,
    pub compliance_status: ComplianceStatus,
    pub last_assessment: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
}

impl Vendor {
    /// Materialise a draft under an issued id
    #[must_use]
    pub fn new(id: VendorId, draft: VendorDraft, assessed_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: draft.name,
            criticality: draft.criticality,
            service_type: draft.service_type,
            assessment_score: draft.assessment_score,
            compliance_status: draft.compliance_status,
            last_assessment: assessed_at,
            contact: draft.contact.filter(|c| !c.trim().is_empty()),
        }
    }

    /// Merge a patch without touching `compliance_status`
    pub fn apply(&mut self, patch: VendorPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(criticality) = patch.criticality {
            self.criticality = criticality;
        }
        if let Some(service_type) = patch.service_type {
            self.service_type = service_type;
        }
        if let Some(score) = patch.assessment_score {
            self.assessment_score = score;
        }
        if let Some(contact) = patch.contact {
            self.contact = contact;
        }
    }

    /// Replace score, status and assessment date from a new questionnaire
    pub fn reassess(&mut self, assessment: &Assessment, assessed_at: DateTime<Utc>) {
        self.assessment_score = assessment.score();
        self.compliance_status = assessment.compliance_status();
        self.last_assessment = assessed_at;
    }
}

/// Input for creating a vendor
///
/// The caller supplies `compliance_status`; use
/// [`VendorDraft::from_assessment`] to derive it from a questionnaire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorDraft {
    pub name: String,
    pub criticality: Criticality,
    pub service_type: String,
    pub assessment_score: AssessmentScore,
    pub compliance_status: ComplianceStatus,
    #[serde(default)]
    pub contact: Option<String>,
}

impl VendorDraft {
    /// Draft scored from a completed (or partial) questionnaire
    pub fn from_assessment(
        name: impl Into<String>,
        service_type: impl Into<String>,
        criticality: Criticality,
        assessment: &Assessment,
    ) -> Self {
        Self {
            name: name.into(),
            criticality,
            service_type: service_type.into(),
            assessment_score: assessment.score(),
            compliance_status: assessment.compliance_status(),
            contact: None,
        }
    }

    /// Set contact address
    #[must_use]
    pub fn with_contact(mut self, contact: impl Into<String>) -> Self {
        self.contact = Some(contact.into());
        self
    }
}

impl Validate for VendorDraft {
    fn validate(&self) -> Result<(), ValidationError> {
        require("name", &self.name)?;
        require("service type", &self.service_type)
    }
}

/// Partial update of a vendor
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorPatch {
    pub name: Option<String>,
    pub criticality: Option<Criticality>,
    pub service_type: Option<String>,
    pub assessment_score: Option<AssessmentScore>,
    /// `Some(None)` clears the contact
    #[serde(default, skip_serializing_if = "Option::is_none", with = "crate::double_option")]
    pub contact: Option<Option<String>>,
}

impl VendorPatch {
    /// Empty patch
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Change name
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Change criticality
    #[must_use]
    pub fn criticality(mut self, criticality: Criticality) -> Self {
        self.criticality = Some(criticality);
        self
    }

    /// Change service type
    #[must_use]
    pub fn service_type(mut self, service_type: impl Into<String>) -> Self {
        self.service_type = Some(service_type.into());
        self
    }

    /// Change the recorded score (status is not recomputed)
    #[must_use]
    pub fn assessment_score(mut self, score: AssessmentScore) -> Self {
        self.assessment_score = Some(score);
        self
    }

    /// Replace or clear the contact address
    #[must_use]
    pub fn contact(mut self, contact: Option<String>) -> Self {
        self.contact = Some(contact);
        self
    }
}

impl Validate for VendorPatch {
    fn validate(&self) -> Result<(), ValidationError> {
        require_if_present("name", self.name.as_ref())?;
        require_if_present("service type", self.service_type.as_ref())
    }
}

const DEMO_VENDORS: [(&str, Criticality, &str, u8, &str); 5] = [
    ("AWS (Amazon Web Services)", Criticality::Critical, "Cloud Infrastructure", 95, "cloud-support@aws.amazon.com"),
    ("Datadog", Criticality::High, "Monitoring & Observability", 88, "security@datadog.com"),
    ("Stripe", Criticality::Critical, "Payment Processing", 97, "compliance@stripe.com"),
    ("SendGrid", Criticality::Medium, "Email Delivery", 72, "support@sendgrid.com"),
    ("Acme Analytics Co.", Criticality::Low, "Business Intelligence", 58, "sales@acmeanalytics.example"),
];

/// The fixed onboarding seed set (`VND-001`..`VND-005`)
#[must_use]
pub fn demo_vendors(now: DateTime<Utc>) -> Vec<Vendor> {
    DEMO_VENDORS
        .iter()
        .zip(1u32..)
        .map(|(&(name, criticality, service_type, score, contact), seq)| {
            let assessment_score = AssessmentScore::new(score).unwrap_or_default();
            Vendor {
                id: VendorId::from_seq(seq),
                name: name.to_string(),
                criticality,
                service_type: service_type.to_string(),
                assessment_score,
                compliance_status: ComplianceStatus::from_score(assessment_score),
                last_assessment: now,
                contact: Some(contact.to_string()),
            }
        })
        .collect()
}
