//! Scenario inputs and stage timing

use crate::error::ScanError;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;
use std::time::Duration;

/// S3 bucket access level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum S3Access {
    #[default]
    Private,
    Public,
}

/// IAM policy posture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IamPolicy {
    #[default]
    LeastPrivilege,
    AdminAll,
}

/// Database encryption at rest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DbEncryption {
    #[default]
    Enabled,
    Disabled,
}

macro_rules! option_text {
    ($ty:ident, $option:literal, { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $ty {
            /// Option value as accepted on the command line
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)+
                }
            }
        }

        impl Display for $ty {
            fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = ScanError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($text => Ok(Self::$variant),)+
                    _ => Err(ScanError::invalid($option, s)),
                }
            }
        }
    };
}

option_text!(S3Access, "s3 access", { Private => "private", Public => "public" });
option_text!(IamPolicy, "iam policy", { LeastPrivilege => "least-privilege", AdminAll => "admin-all" });
option_text!(DbEncryption, "db encryption", { Enabled => "enabled", Disabled => "disabled" });

/// The three scenario switches; the default is the secure configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanConfig {
    pub s3_access: S3Access,
    pub iam_policy: IamPolicy,
    pub db_encryption: DbEncryption,
}

impl ScanConfig {
    #[must_use]
    pub const fn new(s3_access: S3Access, iam_policy: IamPolicy, db_encryption: DbEncryption) -> Self {
        Self {
            s3_access,
            iam_policy,
            db_encryption,
        }
    }

    /// Every setting misconfigured
    #[must_use]
    pub const fn insecure() -> Self {
        Self::new(S3Access::Public, IamPolicy::AdminAll, DbEncryption::Disabled)
    }

    /// All eight combinations
    pub fn all() -> impl Iterator<Item = ScanConfig> {
        [S3Access::Private, S3Access::Public].into_iter().flat_map(|s3| {
            [IamPolicy::LeastPrivilege, IamPolicy::AdminAll]
                .into_iter()
                .flat_map(move |iam| {
                    [DbEncryption::Enabled, DbEncryption::Disabled]
                        .into_iter()
                        .map(move |db| ScanConfig::new(s3, iam, db))
                })
        })
    }

    /// Critical findings this configuration produces
    #[must_use]
    pub fn expected_critical(&self) -> usize {
        usize::from(self.s3_access == S3Access::Public)
            + usize::from(self.db_encryption == DbEncryption::Disabled)
    }

    /// Warnings this configuration produces
    #[must_use]
    pub fn expected_warnings(&self) -> usize {
        usize::from(self.iam_policy == IamPolicy::AdminAll)
    }
}

/// Delays before each stage, in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanTiming {
    /// Before the S3 stage header
    pub start_delay_ms: u64,
    /// Before the S3 result
    pub s3_delay_ms: u64,
    /// Before every later step
    pub stage_delay_ms: u64,
}

impl Default for ScanTiming {
    fn default() -> Self {
        Self {
            start_delay_ms: 500,
            s3_delay_ms: 1000,
            stage_delay_ms: 800,
        }
    }
}

impl ScanTiming {
    /// No waiting at all
    #[must_use]
    pub const fn instant() -> Self {
        Self {
            start_delay_ms: 0,
            s3_delay_ms: 0,
            stage_delay_ms: 0,
        }
    }

    /// Wall time of a full run
    #[must_use]
    pub fn total(&self) -> Duration {
        Duration::from_millis(self.start_delay_ms + self.s3_delay_ms + 4 * self.stage_delay_ms)
    }
}
