//! Likelihood/impact ratings, risk scores and level banding

use crate::validation::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// A 1..=5 rating used for both likelihood and impact
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    /// Lowest rating
    pub const MIN: Rating = Rating(1);
    /// Highest rating
    pub const MAX: Rating = Rating(5);

    /// Create a rating
    ///
    /// # Errors
    /// Returns [`ValidationError::OutOfRange`] outside 1..=5
    #[inline]
    pub fn new(value: u8) -> Result<Self, ValidationError> {
        if (1..=5).contains(&value) {
            Ok(Self(value))
        } else {
            Err(ValidationError::OutOfRange {
                field: "rating",
                min: 1,
                max: 5,
                actual: u32::from(value),
            })
        }
    }

    /// Numeric value
    #[inline]
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }

    /// All ratings in ascending order
    pub fn all() -> impl Iterator<Item = Rating> {
        (1..=5).map(Rating)
    }
}

impl Default for Rating {
    fn default() -> Self {
        Rating(3)
    }
}

impl TryFrom<u8> for Rating {
    type Error = ValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

impl Display for Rating {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Rating {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: u8 = s
            .trim()
            .parse()
            .map_err(|_| ValidationError::unparseable("rating", s))?;
        Self::new(value)
    }
}

/// Likelihood of a risk materialising
pub type Likelihood = Rating;

/// Impact of a risk if it materialises
pub type Impact = Rating;

/// Inherent risk score, always `likelihood * impact` (1..=25)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RiskScore(u8);

impl RiskScore {
    /// Compute score from its two factors
    #[inline]
    #[must_use]
    pub const fn compute(likelihood: Likelihood, impact: Impact) -> Self {
        Self(likelihood.0 * impact.0)
    }

    /// Numeric value
    #[inline]
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Level band for this score
    #[inline]
    #[must_use]
    pub const fn level(self) -> RiskLevel {
        risk_level(self.0)
    }
}

impl Display for RiskScore {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Display band for a risk score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    /// Score below 8
    Low,
    /// Score 8..=14
    Medium,
    /// Score 15..=19
    High,
    /// Score 20 and above
    Critical,
}

impl RiskLevel {
    /// Lowercase label
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl Display for RiskLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Band a raw score: ≥20 critical, ≥15 high, ≥8 medium, else low
#[inline]
#[must_use]
pub const fn risk_level(score: u8) -> RiskLevel {
    if score >= 20 {
        RiskLevel::Critical
    } else if score >= 15 {
        RiskLevel::High
    } else if score >= 8 {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}
