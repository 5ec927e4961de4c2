//! Store error types

use sentinel_model::ValidationError;
use thiserror::Error;

/// Result alias for store operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Store mutation failure; nothing is committed when one is returned
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Draft or patch failed validation
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// No record with the given id
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    /// Profile operation without a signed-in user
    #[error("no user is signed in")]
    NotSignedIn,
}

impl StoreError {
    /// Create not-found error
    pub fn not_found(kind: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    /// Whether this is a validation failure
    #[inline]
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
