//! Required-field and range validation
//!
//! Drafts and patches are checked before any store mutation is attempted.
//! A failed check aborts the submission; nothing is committed.

/// Validation failure for a draft, patch or value type
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A required text field was empty or whitespace
    #[error("required field missing: {0}")]
    MissingField(&'static str),

    /// A numeric value fell outside its allowed range
    #[error("{field} must be between {min} and {max}, got {actual}")]
    OutOfRange {
        field: &'static str,
        min: u32,
        max: u32,
        actual: u32,
    },

    /// A value could not be parsed from text
    #[error("invalid {kind}: '{value}'")]
    Unparseable { kind: &'static str, value: String },
}

impl ValidationError {
    /// Create parse error for a kind of value
    pub fn unparseable(kind: &'static str, value: impl Into<String>) -> Self {
        Self::Unparseable {
            kind,
            value: value.into(),
        }
    }
}

/// Types that can be checked before they reach a store
pub trait Validate {
    /// Check required fields and invariants
    ///
    /// # Errors
    /// Returns the first failing check
    fn validate(&self) -> Result<(), ValidationError>;
}

/// Fail with `MissingField` when `value` is blank
///
/// # Errors
/// Returns [`ValidationError::MissingField`] for empty or whitespace-only input
#[inline]
pub fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::MissingField(field))
    } else {
        Ok(())
    }
}

/// Like [`require`], but only when the optional patch field is present
///
/// # Errors
/// Returns [`ValidationError::MissingField`] for a present but blank value
#[inline]
pub fn require_if_present(
    field: &'static str,
    value: Option<&String>,
) -> Result<(), ValidationError> {
    value.map_or(Ok(()), |v| require(field, v))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_rejects_blank() {
        assert_eq!(require("title", ""), Err(ValidationError::MissingField("title")));
        assert_eq!(require("title", "   \t"), Err(ValidationError::MissingField("title")));
        assert!(require("title", "x").is_ok());
    }

    #[test]
    fn require_if_present_skips_absent() {
        assert!(require_if_present("owner", None).is_ok());
        let blank = String::from(" ");
        assert!(require_if_present("owner", Some(&blank)).is_err());
    }

    #[test]
    fn error_messages() {
        let err = ValidationError::OutOfRange {
            field: "likelihood",
            min: 1,
            max: 5,
            actual: 9,
        };
        assert_eq!(err.to_string(), "likelihood must be between 1 and 5, got 9");
        assert!(ValidationError::MissingField("owner")
            .to_string()
            .contains("owner"));
    }
}
