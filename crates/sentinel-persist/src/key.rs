//! Names of the persisted entries

use crate::error::PersistError;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// One of the four named snapshot entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "&'static str", try_from = "String")]
pub enum SnapshotKey {
    Auth,
    Iso,
    Risk,
    Vendor,
}

impl SnapshotKey {
    /// Every entry, in restore order
    pub const ALL: [SnapshotKey; 4] = [Self::Auth, Self::Iso, Self::Risk, Self::Vendor];

    /// Entry name, e.g. `sentinel-risk-storage`
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Auth => "sentinel-auth-storage",
            Self::Iso => "sentinel-iso-storage",
            Self::Risk => "sentinel-risk-storage",
            Self::Vendor => "sentinel-vendor-storage",
        }
    }
}

impl Display for SnapshotKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SnapshotKey {
    type Err = PersistError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| PersistError::UnknownKey(s.to_string()))
    }
}

impl From<SnapshotKey> for &'static str {
    fn from(key: SnapshotKey) -> Self {
        key.as_str()
    }
}

impl TryFrom<String> for SnapshotKey {
    type Error = PersistError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
