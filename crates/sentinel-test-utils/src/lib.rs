//! Testing utilities for the SentinelGRC workspace
//!
//! Shared fixtures for building drafts and in-memory platforms.

#![allow(missing_docs)]

use sentinel_core::{AuthConfig, Platform, PlatformConfig};
use sentinel_model::{
    Assessment, Criticality, Impact, Likelihood, Rating, RiskDraft, VendorDraft,
};
use sentinel_persist::{MemoryBackend, SnapshotBackend};
use std::sync::Arc;

pub fn rating(value: u8) -> Rating {
    Rating::new(value).unwrap()
}

/// Risk draft with the given likelihood and impact
pub fn risk_draft(title: &str, likelihood: u8, impact: u8) -> RiskDraft {
    let (likelihood, impact): (Likelihood, Impact) = (rating(likelihood), rating(impact));
    RiskDraft::new(title, "Cybersecurity", "CISO").rated(likelihood, impact)
}

/// Vendor draft scored from `yes` answers out of twelve
pub fn vendor_draft(name: &str, yes: usize) -> VendorDraft {
    VendorDraft::from_assessment(
        name,
        "Cloud Infrastructure",
        Criticality::High,
        &Assessment::with_yes_count(yes),
    )
}

/// Config with no delays, signed out, state kept in memory
pub fn fast_config() -> PlatformConfig {
    PlatformConfig::new().with_auth(AuthConfig {
        login_delay_ms: 0,
        signup_delay_ms: 0,
        start_signed_in: false,
    })
    .without_delays()
}

pub async fn memory_platform() -> (Platform, Arc<MemoryBackend>) {
    memory_platform_with(fast_config()).await
}

pub async fn memory_platform_with(config: PlatformConfig) -> (Platform, Arc<MemoryBackend>) {
    let backend = Arc::new(MemoryBackend::new());
    let shared: Arc<dyn SnapshotBackend> = backend.clone();
    let platform = Platform::with_backend(config, shared).await.unwrap();
    (platform, backend)
}
