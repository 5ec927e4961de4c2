//! SentinelGRC domain model
//!
//! Typed entities for governance, risk and compliance tracking.
//!
//! # Core Concepts
//!
//! - [`Risk`]: register entry whose [`RiskScore`] is always likelihood × impact
//! - [`Vendor`]: third party with a questionnaire-derived [`ComplianceStatus`]
//! - [`Control`]: ISO 27001 catalogue entry with a mutable `implemented` flag
//! - [`Assessment`]: the 12-question vendor security questionnaire
//! - Drafts and patches implement [`Validate`] so bad input never reaches a store
//!
//! # Example
//!
//! ```rust,ignore
//! use sentinel_model::{Assessment, Criticality, VendorDraft};
//!
//! let answers = Assessment::with_yes_count(10);
//! let draft = VendorDraft::from_assessment("Acme", "Hosting", Criticality::High, &answers);
//! assert_eq!(draft.assessment_score.value(), 83);
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
pub mod assessment;
pub mod control;
pub mod gdpr;
pub mod id;
pub mod rating;
pub mod risk;
pub mod user;
pub mod validation;
pub mod vendor;

mod double_option;

// Re-exports
pub use assessment::{Answer, Assessment, Question, SECURITY_QUESTIONS};
pub use control::{completion_percentage, iso27001_catalog, Control, ControlFilter, ControlId};
pub use gdpr::{GdprFine, YearlyFines, FINES_BY_YEAR, GDPR_FINES};
pub use id::{RiskId, SequentialId, VendorId};
pub use rating::{risk_level, Impact, Likelihood, Rating, RiskLevel, RiskScore};
pub use risk::{demo_risks, Risk, RiskDraft, RiskPatch, RiskStatus};
pub use user::{Credentials, User, UserPatch};
pub use validation::{Validate, ValidationError};
pub use vendor::{
    demo_vendors, AssessmentScore, ComplianceStatus, Criticality, Vendor, VendorDraft,
    VendorPatch,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
