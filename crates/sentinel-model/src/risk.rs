//! Risk register entries

use crate::id::{RiskId, SequentialId};
use crate::rating::{Impact, Likelihood, Rating, RiskLevel, RiskScore};
use crate::validation::{require, require_if_present, Validate, ValidationError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Treatment status of a risk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RiskStatus {
    /// Not yet treated
    #[default]
    Open,
    /// Controls in place
    Mitigated,
    /// No longer tracked
    Closed,
}

impl RiskStatus {
    /// Display label
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::Mitigated => "Mitigated",
            Self::Closed => "Closed",
        }
    }
}

impl Display for RiskStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "open" => Ok(Self::Open),
            "mitigated" => Ok(Self::Mitigated),
            "closed" => Ok(Self::Closed),
            _ => Err(ValidationError::unparseable("risk status", s)),
        }
    }
}

/// A tracked security risk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Risk {
    pub id: RiskId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category: String,
    pub likelihood: Likelihood,
    pub impact: Impact,
    pub score: RiskScore,
    pub status: RiskStatus,
    pub owner: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mitigation: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Risk {
    /// Materialise a draft under an issued id
    #[must_use]
    pub fn new(id: RiskId, draft: RiskDraft, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            score: RiskScore::compute(draft.likelihood, draft.impact),
            title: draft.title,
            description: draft.description,
            category: draft.category,
            likelihood: draft.likelihood,
            impact: draft.impact,
            status: draft.status,
            owner: draft.owner,
            mitigation: draft.mitigation.filter(|m| !m.trim().is_empty()),
            created_at,
        }
    }

    /// Merge a patch; the score is recomputed only when a factor changes
    pub fn apply(&mut self, patch: RiskPatch) {
        let rescore = patch.likelihood.is_some() || patch.impact.is_some();

        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(likelihood) = patch.likelihood {
            self.likelihood = likelihood;
        }
        if let Some(impact) = patch.impact {
            self.impact = impact;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(owner) = patch.owner {
            self.owner = owner;
        }
        if let Some(mitigation) = patch.mitigation {
            self.mitigation = mitigation;
        }

        if rescore {
            self.score = RiskScore::compute(self.likelihood, self.impact);
        }
    }

    /// Level band of the current score
    #[inline]
    #[must_use]
    pub fn level(&self) -> RiskLevel {
        self.score.level()
    }

    /// Case-insensitive match against title, category or id
    #[must_use]
    pub fn matches(&self, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        needle.is_empty()
            || self.title.to_lowercase().contains(&needle)
            || self.category.to_lowercase().contains(&needle)
            || self.id.to_string().to_lowercase().contains(&needle)
    }
}

/// Input for creating a risk
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskDraft {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category: String,
    pub likelihood: Likelihood,
    pub impact: Impact,
    #[serde(default)]
    pub status: RiskStatus,
    pub owner: String,
    #[serde(default)]
    pub mitigation: Option<String>,
}

impl RiskDraft {
    /// Start a draft with the required fields and default 3×3 rating
    pub fn new(
        title: impl Into<String>,
        category: impl Into<String>,
        owner: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            category: category.into(),
            owner: owner.into(),
            ..Self::default()
        }
    }

    /// Set likelihood and impact
    #[must_use]
    pub fn rated(mut self, likelihood: Likelihood, impact: Impact) -> Self {
        self.likelihood = likelihood;
        self.impact = impact;
        self
    }

    /// Set description
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set status
    #[must_use]
    pub fn with_status(mut self, status: RiskStatus) -> Self {
        self.status = status;
        self
    }

    /// Set mitigation plan
    #[must_use]
    pub fn with_mitigation(mut self, mitigation: impl Into<String>) -> Self {
        self.mitigation = Some(mitigation.into());
        self
    }
}

impl Validate for RiskDraft {
    fn validate(&self) -> Result<(), ValidationError> {
        require("title", &self.title)?;
        require("category", &self.category)?;
        require("owner", &self.owner)
    }
}

/// Partial update of a risk; absent fields are left untouched
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub likelihood: Option<Likelihood>,
    pub impact: Option<Impact>,
    pub status: Option<RiskStatus>,
    pub owner: Option<String>,
    /// `Some(None)` clears the mitigation
    #[serde(default, skip_serializing_if = "Option::is_none", with = "crate::double_option")]
    pub mitigation: Option<Option<String>>,
}

impl RiskPatch {
    /// Empty patch
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Change likelihood
    #[must_use]
    pub fn likelihood(mut self, likelihood: Likelihood) -> Self {
        self.likelihood = Some(likelihood);
        self
    }

    /// Change impact
    #[must_use]
    pub fn impact(mut self, impact: Impact) -> Self {
        self.impact = Some(impact);
        self
    }

    /// Change status
    #[must_use]
    pub fn status(mut self, status: RiskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Change title
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Change owner
    #[must_use]
    pub fn owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    /// Replace or clear the mitigation plan
    #[must_use]
    pub fn mitigation(mut self, mitigation: Option<String>) -> Self {
        self.mitigation = Some(mitigation);
        self
    }

    /// True when no field is set
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl Validate for RiskPatch {
    fn validate(&self) -> Result<(), ValidationError> {
        require_if_present("title", self.title.as_ref())?;
        require_if_present("category", self.category.as_ref())?;
        require_if_present("owner", self.owner.as_ref())
    }
}

struct Seed {
    title: &'static str,
    description: &'static str,
    category: &'static str,
    likelihood: u8,
    impact: u8,
    status: RiskStatus,
    owner: &'static str,
    mitigation: Option<&'static str>,
}

const DEMO_RISKS: [Seed; 8] = [
    Seed {
        title: "Unencrypted Data at Rest",
        description: "Customer PII stored in S3 buckets without server-side encryption enabled",
        category: "Data Security",
        likelihood: 4,
        impact: 5,
        status: RiskStatus::Open,
        owner: "Security Team",
        mitigation: Some("Enable AWS S3 server-side encryption (SSE-KMS) across all buckets containing sensitive data."),
    },
    Seed {
        title: "Missing MFA for Admin Accounts",
        description: "Administrative accounts lack multi-factor authentication enforcement",
        category: "Access Control",
        likelihood: 5,
        impact: 4,
        status: RiskStatus::Open,
        owner: "IAM Team",
        mitigation: None,
    },
    Seed {
        title: "Outdated Third-Party Dependencies",
        description: "Production application using npm packages with known CVEs",
        category: "Application Security",
        likelihood: 4,
        impact: 4,
        status: RiskStatus::Mitigated,
        owner: "DevOps Team",
        mitigation: Some("Implemented Dependabot and Snyk scanning. Quarterly dependency update cycle established."),
    },
    Seed {
        title: "No Disaster Recovery Testing",
        description: "DR plan exists but has never been tested end-to-end",
        category: "Business Continuity",
        likelihood: 3,
        impact: 5,
        status: RiskStatus::Open,
        owner: "Infrastructure Team",
        mitigation: None,
    },
    Seed {
        title: "Public S3 Bucket Exposure",
        description: "Three S3 buckets configured with public read access for legacy reasons",
        category: "Cloud Security",
        likelihood: 5,
        impact: 5,
        status: RiskStatus::Open,
        owner: "Cloud Security Team",
        mitigation: Some("Migrate to CloudFront with OAI. Block all public S3 access at the organization level."),
    },
    Seed {
        title: "Lack of Security Awareness Training",
        description: "Employees have not received security training in over 18 months",
        category: "Human Risk",
        likelihood: 4,
        impact: 3,
        status: RiskStatus::Mitigated,
        owner: "HR / Compliance",
        mitigation: Some("Launched mandatory quarterly security awareness training via KnowBe4."),
    },
    Seed {
        title: "Insufficient Logging and Monitoring",
        description: "CloudTrail logs not centralized; no alerting on critical events",
        category: "Detection & Response",
        likelihood: 3,
        impact: 4,
        status: RiskStatus::Open,
        owner: "SecOps Team",
        mitigation: None,
    },
    Seed {
        title: "Vendor SLA Non-Compliance",
        description: "Critical vendor failed to meet uptime SLA for Q3",
        category: "Third-Party Risk",
        likelihood: 2,
        impact: 4,
        status: RiskStatus::Closed,
        owner: "Procurement",
        mitigation: Some("Renegotiated contract with penalty clauses and monthly SLA reviews."),
    },
];

/// The fixed onboarding seed set (`RSK-001`..`RSK-008`)
#[must_use]
pub fn demo_risks(now: DateTime<Utc>) -> Vec<Risk> {
    DEMO_RISKS
        .iter()
        .zip(1u32..)
        .map(|(seed, seq)| {
            let likelihood = Rating::new(seed.likelihood).unwrap_or_default();
            let impact = Rating::new(seed.impact).unwrap_or_default();
            Risk {
                id: RiskId::from_seq(seq),
                title: seed.title.to_string(),
                description: seed.description.to_string(),
                category: seed.category.to_string(),
                likelihood,
                impact,
                score: RiskScore::compute(likelihood, impact),
                status: seed.status,
                owner: seed.owner.to_string(),
                mitigation: seed.mitigation.map(str::to_string),
                created_at: now,
            }
        })
        .collect()
}
