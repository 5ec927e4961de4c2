//! Authenticated session store

use crate::cell::{StateCell, Versioned};
use crate::error::{Result, StoreError};
use crate::store::count;
use sentinel_model::{User, UserPatch, Validate};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::info;

const KIND: &str = "session";

/// Current session; authenticated exactly when a user is present
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionState {
    user: Option<User>,
    #[serde(skip)]
    version: u64,
}

impl PartialEq for SessionState {
    fn eq(&self, other: &Self) -> bool {
        self.user == other.user
    }
}

impl Versioned for SessionState {
    fn version(&self) -> u64 {
        self.version
    }

    fn set_version(&mut self, version: u64) {
        self.version = version;
    }
}

impl SessionState {
    /// Session signed in as `user`
    #[must_use]
    pub fn signed_in(user: User) -> Self {
        Self {
            user: Some(user),
            version: 0,
        }
    }

    #[inline]
    #[must_use]
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    #[inline]
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}

/// Container for the session
#[derive(Debug)]
pub struct SessionStore {
    cell: StateCell<SessionState>,
}

impl Default for SessionStore {
    /// Signed-out store
    fn default() -> Self {
        Self::new(SessionState::default())
    }
}

impl SessionStore {
    #[must_use]
    pub fn new(initial: SessionState) -> Self {
        Self {
            cell: StateCell::new(initial),
        }
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.cell.current()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.cell.subscribe()
    }

    /// Replace the session user
    pub fn sign_in(&self, user: User) -> SessionState {
        info!(user = %user.id, "Signed in");
        count(KIND, "sign_in");
        self.cell.apply(move |_| SessionState::signed_in(user))
    }

    /// Drop the session user
    pub fn sign_out(&self) -> SessionState {
        info!("Signed out");
        count(KIND, "sign_out");
        self.cell.apply(|_| SessionState::default())
    }

    /// Edit the signed-in user's profile
    ///
    /// # Errors
    /// Returns [`StoreError::NotSignedIn`] without a session user, or
    /// [`StoreError::Validation`] for a blank name or email
    pub fn update_profile(&self, patch: UserPatch) -> Result<SessionState> {
        patch.validate()?;
        let state = self.cell.commit(|current| {
            let mut user = current.user.clone().ok_or(StoreError::NotSignedIn)?;
            user.apply(patch);
            Ok(SessionState::signed_in(user))
        })?;
        info!("Profile updated");
        count(KIND, "update_profile");
        Ok(state)
    }

    /// Publish a session restored from storage
    pub fn restore(&self, restored: SessionState) -> SessionState {
        self.cell.apply(move |_| restored)
    }
}
