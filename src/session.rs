//! Auth session manager for the current client instance.
//!
//! SYSTEM CONTEXT
//! ==============
//! One `AuthSession` exists per running client and is shared by `Arc` with
//! every view and hook. It owns the in-memory `Session` and is the only code
//! that writes the `CredentialStore`.
//!
//! TRADE-OFFS
//! ==========
//! Resolution trusts the cached profile without asking the API whether the
//! token is still valid. Views never block on a network round trip at start
//! up; the cost is a staleness window until the cookie expires or an API
//! call comes back 401.

use std::sync::{Arc, PoisonError, RwLock};

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};

use crate::credentials::{CredentialError, CredentialStore};
use crate::failure::{Failure, FailureKind};
use crate::net::api::LogrosApi;
use crate::net::types::{AuthGrant, UserProfile};

pub const LOGIN_FAILED: &str = "login failed";
pub const REGISTER_FAILED: &str = "registration failed";
pub const STORAGE_FAILED: &str = "could not save credentials";

/// Snapshot of the auth state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub user: Option<UserProfile>,
    pub loading: bool,
}

impl Session {
    fn unresolved() -> Self {
        Self { user: None, loading: true }
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}

pub struct AuthSession {
    api: Arc<dyn LogrosApi>,
    credentials: Arc<CredentialStore>,
    state: RwLock<Session>,
}

impl AuthSession {
    /// Create the manager and resolve the session from stored credentials.
    #[must_use]
    pub fn new(api: Arc<dyn LogrosApi>, credentials: Arc<CredentialStore>) -> Self {
        let manager = Self { api, credentials, state: RwLock::new(Session::unresolved()) };
        manager.resolve_session();
        manager
    }

    #[must_use]
    pub fn session(&self) -> Session {
        self.state.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    #[must_use]
    pub fn user(&self) -> Option<UserProfile> {
        self.session().user
    }

    /// API handle shared with the resource hooks.
    #[must_use]
    pub fn api(&self) -> &Arc<dyn LogrosApi> {
        &self.api
    }

    #[must_use]
    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    fn update(&self, apply: impl FnOnce(&mut Session)) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        apply(&mut state);
    }

    /// Populate the session from the credential store without touching the
    /// network. Inconsistent or malformed credentials are wiped and the
    /// session ends anonymous. Always leaves `loading == false`.
    pub fn resolve_session(&self) {
        let user = match self.credentials.get() {
            Ok(Some(creds)) => Some(creds.profile),
            Ok(None) => None,
            Err(err) => {
                match &err {
                    CredentialError::Storage(e) => tracing::warn!(error = %e, "credential read failed"),
                    other => tracing::info!(reason = %other, "discarding unusable credentials"),
                }
                self.clear_credentials();
                None
            }
        };

        if let Some(profile) = &user {
            tracing::debug!(user_id = profile.id, "session resolved from stored credentials");
        }
        self.update(|s| {
            s.user = user;
            s.loading = false;
        });
    }

    /// Sign in with email and password.
    ///
    /// # Errors
    ///
    /// Returns a `Failure` when the API rejects the credentials, the API is
    /// unreachable, or the credentials cannot be stored. The credential
    /// store is untouched on API failure.
    pub async fn login(&self, email: &str, password: &str) -> Result<UserProfile, Failure> {
        let grant = self.api.login(email, password).await.map_err(|e| Failure::from_api(e, LOGIN_FAILED))?;
        let profile = UserProfile { id: grant.user_id, email: email.to_owned(), nombre: None, apellido: None };
        self.establish(&grant, profile)
    }

    /// Create an account and sign in with it.
    ///
    /// # Errors
    ///
    /// Same as [`AuthSession::login`].
    pub async fn register(
        &self,
        nombre: &str,
        apellido: &str,
        email: &str,
        password: &str,
    ) -> Result<UserProfile, Failure> {
        let grant = self
            .api
            .register(nombre, apellido, email, password)
            .await
            .map_err(|e| Failure::from_api(e, REGISTER_FAILED))?;
        let profile = UserProfile {
            id: grant.user_id,
            email: email.to_owned(),
            nombre: Some(nombre.to_owned()),
            apellido: Some(apellido.to_owned()),
        };
        self.establish(&grant, profile)
    }

    fn establish(&self, grant: &AuthGrant, profile: UserProfile) -> Result<UserProfile, Failure> {
        // `set` rolls every slot back on failure; the user goes with them.
        if let Err(e) = self.credentials.set(&grant.token, &profile) {
            tracing::error!(error = %e, "failed to persist credentials");
            self.update(|s| s.user = None);
            return Err(Failure::new(FailureKind::Storage, STORAGE_FAILED));
        }
        tracing::info!(user_id = profile.id, "signed in");
        let user = profile.clone();
        self.update(|s| s.user = Some(user));
        Ok(profile)
    }

    /// Forget the current user and wipe every credential slot. Never fails.
    pub fn logout(&self) {
        self.clear_credentials();
        self.update(|s| s.user = None);
        tracing::info!("signed out");
    }

    fn clear_credentials(&self) {
        if let Err(e) = self.credentials.clear() {
            tracing::warn!(error = %e, "credential clear failed");
        }
    }

    /// `Authorization: Bearer <token>` when a consistent token is stored,
    /// otherwise an empty map.
    #[must_use]
    pub fn auth_header(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(token) = self.credentials.token() {
            match HeaderValue::from_str(&format!("Bearer {token}")) {
                Ok(value) => {
                    headers.insert(AUTHORIZATION, value);
                }
                Err(_) => tracing::warn!("stored token is not a valid header value"),
            }
        }
        headers
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
