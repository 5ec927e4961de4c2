//! SentinelGRC state containers
//!
//! Each store owns one immutable snapshot and publishes a replacement on
//! every committed mutation:
//!
//! - [`RecordStore`]: risks ([`RiskStore`]) and vendors ([`VendorStore`])
//!   keyed by monotonic sequential ids
//! - [`ControlStore`]: the ISO 27001 checklist
//! - [`SessionStore`]: the signed-in user
//!
//! Subscribers receive snapshots through [`tokio::sync::watch`] receivers.
//! Snapshots share structure through [`im::Vector`], so cloning one is cheap.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod cell;
pub mod controls;
pub mod error;
pub mod record;
pub mod session;
pub mod store;

pub use cell::Versioned;
pub use controls::{ControlSnapshot, ControlStore};
pub use error::{Result, StoreError};
pub use record::{Record, Snapshot};
pub use session::{SessionState, SessionStore};
pub use store::{RecordStore, RiskStore, VendorStore};
