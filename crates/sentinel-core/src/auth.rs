//! Simulated sign-in
//!
//! There is no credential store: any well-formed email and non-empty
//! password succeed after a fixed delay, and the account is derived from the
//! email address.

use crate::config::AuthConfig;
use chrono::Utc;
use sentinel_model::validation::require;
use sentinel_model::{Credentials, User, Validate, ValidationError};
use std::time::Duration;
use tracing::info;

/// Produces users for login and signup requests
#[derive(Debug, Clone, Copy, Default)]
pub struct Authenticator {
    config: AuthConfig,
}

impl Authenticator {
    #[must_use]
    pub const fn new(config: AuthConfig) -> Self {
        Self { config }
    }

    /// User for an existing account, named after the email's local part
    ///
    /// # Errors
    /// Returns a [`ValidationError`] for a blank or malformed email or a
    /// blank password; no delay is applied in that case
    pub async fn login(&self, credentials: &Credentials) -> Result<User, ValidationError> {
        credentials.validate()?;
        wait(self.config.login_delay()).await;
        let user = User::from_email(credentials.email.trim(), Utc::now());
        info!(user = %user.id, "Login accepted");
        Ok(user)
    }

    /// User for a new account with an explicit display name
    ///
    /// # Errors
    /// Returns a [`ValidationError`] for a blank name or bad credentials
    pub async fn signup(
        &self,
        name: &str,
        credentials: &Credentials,
    ) -> Result<User, ValidationError> {
        require("name", name)?;
        credentials.validate()?;
        wait(self.config.signup_delay()).await;
        let user = User::new(name.trim(), credentials.email.trim(), Utc::now());
        info!(user = %user.id, "Signup accepted");
        Ok(user)
    }
}

async fn wait(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn login_waits_and_derives_name() {
        let auth = Authenticator::default();
        let start = tokio::time::Instant::now();
        let user = auth
            .login(&Credentials::new("alex.davis@sentinelgrc.com", "secret"))
            .await
            .unwrap();
        assert_eq!(start.elapsed(), Duration::from_millis(1000));
        assert_eq!(user.name, "Alex Davis");
        assert_eq!(user.role, "Compliance Manager");
        assert_eq!(user.department, "Security & Compliance");
    }

    #[tokio::test(start_paused = true)]
    async fn signup_uses_given_name() {
        let auth = Authenticator::default();
        let start = tokio::time::Instant::now();
        let user = auth
            .signup("Sam Ray", &Credentials::new("sr@corp.example", "pw"))
            .await
            .unwrap();
        assert_eq!(start.elapsed(), Duration::from_millis(1200));
        assert_eq!(user.name, "Sam Ray");
        assert!(user.id.starts_with("usr-"));
    }

    #[tokio::test]
    async fn rejects_missing_fields_immediately() {
        let auth = Authenticator::default();
        let start = tokio::time::Instant::now();
        assert_eq!(
            auth.login(&Credentials::new("a@b.c", "")).await.unwrap_err(),
            ValidationError::MissingField("password")
        );
        assert_eq!(
            auth.signup(" ", &Credentials::new("a@b.c", "x")).await.unwrap_err(),
            ValidationError::MissingField("name")
        );
        assert!(start.elapsed() < Duration::from_millis(500));
    }
}
