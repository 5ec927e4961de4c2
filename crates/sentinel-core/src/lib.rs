//! SentinelGRC Core - platform facade
//!
//! Wires the domain stores to snapshot persistence and exposes the
//! operations behind the `sentinel` CLI:
//! - Risk register with scoring, search and heat map
//! - Vendor assessments, re-scoring and certificate export
//! - ISO 27001 control checklist
//! - Simulated sign-in, sign-up and profile edits
//! - Scripted cloud security scan
//! - Dashboard metrics derived from the other stores
//!
//! # Example
//!
//! ```rust,ignore
//! use sentinel_core::prelude::*;
//!
//! # async fn example() -> sentinel_core::Result<()> {
//! let platform = Platform::open(PlatformConfig::new().without_delays()).await?;
//! platform.load_demo_risks().await?;
//!
//! let metrics = platform.dashboard();
//! println!("{} critical risks", metrics.critical_risks);
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod auth;
pub mod certificate;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod logging;
pub mod platform;

pub use auth::Authenticator;
pub use config::{AuthConfig, LogConfig, PlatformConfig};
pub use dashboard::{DashboardMetrics, HeatPoint};
pub use error::{PlatformError, Result};
pub use logging::init_tracing;
pub use platform::Platform;

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for driving the platform
    pub use crate::{DashboardMetrics, Platform, PlatformConfig, PlatformError};
    pub use sentinel_model::{
        Assessment, Credentials, Criticality, Impact, Likelihood, RiskDraft, RiskId, RiskPatch,
        RiskStatus, VendorDraft, VendorId, VendorPatch,
    };
    pub use sentinel_scanner::{ScanConfig, ScanReport};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
