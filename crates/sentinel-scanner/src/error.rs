//! Scan error types

use ulid::Ulid;

/// Scan runner failure
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScanError {
    /// The log receiver went away before the run finished
    #[error("scan {run_id} cancelled: log receiver dropped")]
    Cancelled { run_id: Ulid },

    /// A scenario option could not be parsed
    #[error("invalid {option} setting: '{value}'")]
    InvalidOption { option: &'static str, value: String },
}

impl ScanError {
    pub(crate) fn invalid(option: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidOption {
            option,
            value: value.into(),
        }
    }
}
