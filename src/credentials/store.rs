//! One logical credential mirrored into two physical slots.
//!
//! The cookie slot is what navigation middleware can see; the persistent
//! slot (`token` + `user`) is what the client runtime reads. `set` and
//! `clear` always touch all of them, and `get` refuses to return anything
//! unless every slot agrees.

use std::sync::Arc;

use time::Duration;

use super::cookie::{AUTH_COOKIE, CookieSlot};
use super::storage::{KeyValueStore, StorageError};
use crate::net::types::UserProfile;

pub const TOKEN_KEY: &str = "token";
pub const USER_KEY: &str = "user";

/// Token and cached profile read back from the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub token: String,
    pub profile: UserProfile,
}

#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Slots disagree: one holds a token the other lacks, or they differ.
    #[error("credential slots are inconsistent: {0}")]
    Inconsistent(&'static str),

    /// The cached `user` entry does not parse as a profile.
    #[error("cached profile is malformed: {0}")]
    MalformedProfile(String),
}

pub struct CredentialStore {
    cookie: CookieSlot,
    persistent: Arc<dyn KeyValueStore>,
}

impl CredentialStore {
    #[must_use]
    pub fn new(cookies: Arc<dyn KeyValueStore>, persistent: Arc<dyn KeyValueStore>, cookie_max_age: Duration) -> Self {
        Self { cookie: CookieSlot::new(cookies, AUTH_COOKIE, cookie_max_age), persistent }
    }

    /// Store backed by fresh in-memory maps.
    #[must_use]
    pub fn in_memory(cookie_max_age: Duration) -> Self {
        Self::new(
            Arc::new(super::storage::MemoryStore::new()),
            Arc::new(super::storage::MemoryStore::new()),
            cookie_max_age,
        )
    }

    #[must_use]
    pub fn cookie(&self) -> &CookieSlot {
        &self.cookie
    }

    /// Write token and profile to every slot.
    ///
    /// Either all slots end up written or, on failure, everything already
    /// written is rolled back before the error is returned.
    ///
    /// # Errors
    ///
    /// Returns the first storage error encountered.
    pub fn set(&self, token: &str, profile: &UserProfile) -> Result<(), CredentialError> {
        let user_json =
            serde_json::to_string(profile).map_err(|e| CredentialError::MalformedProfile(e.to_string()))?;

        let written = self
            .cookie
            .set(token)
            .and_then(|()| self.persistent.set(TOKEN_KEY, token))
            .and_then(|()| self.persistent.set(USER_KEY, &user_json));

        if let Err(e) = written {
            tracing::warn!(error = %e, "credential write failed; rolling back");
            self.clear_quietly();
            return Err(e.into());
        }
        Ok(())
    }

    /// Read back a consistent token/profile pair.
    ///
    /// Returns `Ok(None)` only when every slot is empty.
    ///
    /// # Errors
    ///
    /// `Inconsistent` when the slots disagree, `MalformedProfile` when the
    /// cached profile does not parse, `Storage` on backend failure.
    pub fn get(&self) -> Result<Option<Credentials>, CredentialError> {
        let cookie_token = self.cookie.get()?;
        let stored_token = self.persistent.get(TOKEN_KEY)?;
        let user_json = self.persistent.get(USER_KEY)?;

        let token = match (cookie_token, stored_token) {
            (None, None) => {
                return if user_json.is_some() {
                    Err(CredentialError::Inconsistent("profile cached without a token"))
                } else {
                    Ok(None)
                };
            }
            (Some(_), None) => return Err(CredentialError::Inconsistent("cookie token without stored token")),
            (None, Some(_)) => return Err(CredentialError::Inconsistent("stored token without live cookie")),
            (Some(a), Some(b)) if a != b => return Err(CredentialError::Inconsistent("cookie and stored token differ")),
            (Some(a), Some(_)) => a,
        };

        let Some(user_json) = user_json else {
            return Err(CredentialError::Inconsistent("token without cached profile"));
        };
        let profile: UserProfile =
            serde_json::from_str(&user_json).map_err(|e| CredentialError::MalformedProfile(e.to_string()))?;

        Ok(Some(Credentials { token, profile }))
    }

    /// Token of a consistent pair, if any.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.get().ok().flatten().map(|c| c.token)
    }

    /// Remove every slot. Attempts all of them even if one fails.
    ///
    /// # Errors
    ///
    /// Returns the first storage error encountered.
    pub fn clear(&self) -> Result<(), CredentialError> {
        let results = [
            self.cookie.clear(),
            self.persistent.remove(TOKEN_KEY),
            self.persistent.remove(USER_KEY),
        ];
        for result in results {
            result?;
        }
        Ok(())
    }

    fn clear_quietly(&self) {
        if let Err(e) = self.clear() {
            tracing::warn!(error = %e, "credential clear failed");
        }
    }
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
