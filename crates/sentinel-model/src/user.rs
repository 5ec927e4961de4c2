//! Signed-in user profile

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::validation::{require, require_if_present, Validate, ValidationError};

/// Role assigned to every new account
pub const DEFAULT_ROLE: &str = "Compliance Manager";
/// Department assigned to every new account
pub const DEFAULT_DEPARTMENT: &str = "Security & Compliance";

/// A platform user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    pub department: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// New account with a random `usr-` id and the default role
    pub fn new(name: impl Into<String>, email: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: random_user_id(),
            name: name.into(),
            email: email.into(),
            role: DEFAULT_ROLE.to_string(),
            department: DEFAULT_DEPARTMENT.to_string(),
            avatar: None,
            created_at: now,
        }
    }

    /// New account named after the email's local part
    pub fn from_email(email: impl Into<String>, now: DateTime<Utc>) -> Self {
        let email = email.into();
        let name = display_name_from_email(&email);
        Self::new(name, email, now)
    }

    /// The demo account the platform starts signed in as
    #[must_use]
    pub fn demo(now: DateTime<Utc>) -> Self {
        Self {
            id: "usr-001".to_string(),
            name: "Alex Davis".to_string(),
            email: "alex.davis@sentinelgrc.com".to_string(),
            role: DEFAULT_ROLE.to_string(),
            department: DEFAULT_DEPARTMENT.to_string(),
            avatar: None,
            created_at: now,
        }
    }

    /// Merge profile edits
    pub fn apply(&mut self, patch: UserPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(role) = patch.role {
            self.role = role;
        }
        if let Some(department) = patch.department {
            self.department = department;
        }
        if let Some(avatar) = patch.avatar {
            self.avatar = avatar;
        }
    }

    /// Upper-case initials of each name part (`Alex Davis` → `AD`)
    #[must_use]
    pub fn initials(&self) -> String {
        self.name
            .split_whitespace()
            .filter_map(|part| part.chars().next())
            .flat_map(char::to_uppercase)
            .collect()
    }
}

/// Profile edits; absent fields are left untouched
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub department: Option<String>,
    /// `Some(None)` removes the avatar
    #[serde(default, skip_serializing_if = "Option::is_none", with = "crate::double_option")]
    pub avatar: Option<Option<String>>,
}

impl Validate for UserPatch {
    fn validate(&self) -> Result<(), ValidationError> {
        require_if_present("name", self.name.as_ref())?;
        require_if_present("email", self.email.as_ref())
    }
}

/// Sign-in credentials
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    /// Pair an email with a password
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl Validate for Credentials {
    fn validate(&self) -> Result<(), ValidationError> {
        require("email", &self.email)?;
        if !self.email.contains('@') {
            return Err(ValidationError::unparseable("email", self.email.clone()));
        }
        require("password", &self.password)
    }
}

/// `alex.davis@corp` → `Alex Davis`
#[must_use]
pub fn display_name_from_email(email: &str) -> String {
    let local = email.split('@').next().unwrap_or_default();
    local
        .split(['.', '_', '-', ' '])
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars).collect()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn random_user_id() -> String {
    let mut rng = rand::rng();
    let suffix: String = (0..9)
        .map(|_| char::from_digit(rng.random_range(0..36), 36).unwrap_or('0'))
        .collect();
    format!("usr-{suffix}")
}
