//! Scripted cloud misconfiguration scans
//!
//! A [`ScenarioRunner`] plays back a fixed security-scan transcript for a
//! [`ScanConfig`] of three switches (S3 access, IAM policy, DB encryption).
//! It streams [`LogLine`]s to an `mpsc` sink and returns a [`ScanReport`].
//!
//! ```rust,ignore
//! let runner = ScenarioRunner::new(ScanTiming::instant());
//! let report = runner.run_collect(ScanConfig::insecure()).await?;
//! assert_eq!(report.critical, 2);
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod config;
pub mod error;
pub mod finding;
pub mod log;
pub mod runner;

pub use config::{DbEncryption, IamPolicy, S3Access, ScanConfig, ScanTiming};
pub use error::ScanError;
pub use finding::{Check, Finding, Severity};
pub use log::{LogKind, LogLine};
pub use runner::{ScanReport, ScenarioRunner};
