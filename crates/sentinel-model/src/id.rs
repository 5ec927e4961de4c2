//! Sequential display identifiers (`RSK-001`, `VND-014`)
//!
//! Identifiers are issued from a monotonic counter owned by the store, never
//! from the current list length, so a delete followed by an add cannot reuse
//! an id.

use crate::validation::ValidationError;
use std::fmt::{Debug, Display};
use std::hash::Hash;
use std::str::FromStr;

/// Identifier backed by a sequence number and rendered with a fixed prefix
pub trait SequentialId:
    Copy + Eq + Ord + Hash + Debug + Display + FromStr<Err = ValidationError>
{
    /// Display prefix, e.g. `RSK`
    const PREFIX: &'static str;

    /// Build the id for a sequence number (1-based)
    fn from_seq(seq: u32) -> Self;

    /// Sequence number of this id
    fn seq(&self) -> u32;
}

macro_rules! sequential_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
            serde::Serialize, serde::Deserialize,
        )]
        #[serde(into = "String", try_from = "String")]
        pub struct $name(u32);

        impl SequentialId for $name {
            const PREFIX: &'static str = $prefix;

            #[inline]
            fn from_seq(seq: u32) -> Self {
                Self(seq)
            }

            #[inline]
            fn seq(&self) -> u32 {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}-{:03}", $prefix, self.0)
            }
        }

        impl FromStr for $name {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let digits = s
                    .trim()
                    .strip_prefix(concat!($prefix, "-"))
                    .ok_or_else(|| ValidationError::unparseable(stringify!($name), s))?;
                digits
                    .parse::<u32>()
                    .ok()
                    .filter(|seq| *seq > 0)
                    .map(Self)
                    .ok_or_else(|| ValidationError::unparseable(stringify!($name), s))
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.to_string()
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }
    };
}

sequential_id!(
    /// Risk register identifier (`RSK-NNN`)
    RiskId,
    "RSK"
);

sequential_id!(
    /// Vendor identifier (`VND-NNN`)
    VendorId,
    "VND"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_pads_to_three_digits() {
        assert_eq!(RiskId::from_seq(1).to_string(), "RSK-001");
        assert_eq!(VendorId::from_seq(42).to_string(), "VND-042");
        assert_eq!(RiskId::from_seq(1234).to_string(), "RSK-1234");
    }

    #[test]
    fn parse_round_trips_display() {
        let id: RiskId = "RSK-007".parse().unwrap();
        assert_eq!(id.seq(), 7);
        assert_eq!(id, RiskId::from_seq(7));
    }

    #[test]
    fn parse_rejects_wrong_prefix_and_zero() {
        assert!("VND-001".parse::<RiskId>().is_err());
        assert!("RSK-000".parse::<RiskId>().is_err());
        assert!("RSK-abc".parse::<RiskId>().is_err());
        assert!("001".parse::<VendorId>().is_err());
    }

    #[test]
    fn serde_uses_display_form() {
        let json = serde_json::to_string(&VendorId::from_seq(3)).unwrap();
        assert_eq!(json, "\"VND-003\"");
        let back: VendorId = serde_json::from_str(&json).unwrap();
        assert_eq!(back.seq(), 3);
        assert!(serde_json::from_str::<VendorId>("\"nope\"").is_err());
    }
}
