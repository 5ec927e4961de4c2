//! Transcript lines

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Line category, used for colouring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogKind {
    Info,
    Warning,
    Error,
    Success,
}

/// One timestamped transcript line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogLine {
    pub kind: LogKind,
    pub message: String,
    pub at: DateTime<Utc>,
}

impl LogLine {
    pub fn new(kind: LogKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            at: Utc::now(),
        }
    }

    /// First line of a fresh console
    #[must_use]
    pub fn initialized() -> Self {
        Self::new(LogKind::Info, "Cloud Security Simulator initialized")
    }

    /// Console line after a configuration reset
    #[must_use]
    pub fn reset() -> Self {
        Self::new(LogKind::Info, "Cloud Security Simulator reset")
    }
}
