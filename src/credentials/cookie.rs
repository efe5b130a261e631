//! Short-lived cookie slot.
//!
//! The slot stores the full `Set-Cookie` rendering of the cookie so the
//! expiry travels with the value, the same way a browser jar would hold it.
//! Values are percent-encoded on write, so an opaque token containing `;`,
//! `,` or spaces reads back unchanged. An expired or unreadable cookie reads
//! as absent.

use std::sync::Arc;

use axum_extra::extract::cookie::{Cookie, SameSite};
use time::{Duration, OffsetDateTime};

use super::storage::{KeyValueStore, StorageError};

/// Name of the cookie carrying the bearer token.
pub const AUTH_COOKIE: &str = "auth-token";

/// Build the cookie exactly as it is written: `Path=/`, `SameSite=Lax`,
/// absolute expiry.
#[must_use]
pub fn build_cookie(name: &str, value: &str, expires: OffsetDateTime) -> Cookie<'static> {
    Cookie::build((name.to_owned(), value.to_owned()))
        .path("/")
        .same_site(SameSite::Lax)
        .expires(expires)
        .build()
}

pub struct CookieSlot {
    backend: Arc<dyn KeyValueStore>,
    name: String,
    max_age: Duration,
}

impl CookieSlot {
    #[must_use]
    pub fn new(backend: Arc<dyn KeyValueStore>, name: &str, max_age: Duration) -> Self {
        Self { backend, name: name.to_owned(), max_age }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn max_age(&self) -> Duration {
        self.max_age
    }

    /// Write `value` with an expiry of now plus the slot's max age.
    ///
    /// # Errors
    ///
    /// Returns the backend's error if the write fails.
    pub fn set(&self, value: &str) -> Result<(), StorageError> {
        self.set_at(value, OffsetDateTime::now_utc())
    }

    /// Write `value` as if the current time were `now`.
    ///
    /// # Errors
    ///
    /// Returns `ExpiryOutOfRange` if `now` plus the max age is not a
    /// representable date, or the backend's error if the write fails.
    pub fn set_at(&self, value: &str, now: OffsetDateTime) -> Result<(), StorageError> {
        let expires = now
            .checked_add(self.max_age)
            .ok_or_else(|| StorageError::ExpiryOutOfRange { name: self.name.clone() })?;
        let cookie = build_cookie(&self.name, value, expires);
        self.backend.set(&self.name, &cookie.encoded().to_string())
    }

    /// Current cookie value, if one is stored and not expired.
    ///
    /// # Errors
    ///
    /// Returns the backend's error if the read fails.
    pub fn get(&self) -> Result<Option<String>, StorageError> {
        self.get_at(OffsetDateTime::now_utc())
    }

    /// Cookie value as seen at `now`.
    ///
    /// # Errors
    ///
    /// Returns the backend's error if the read fails.
    pub fn get_at(&self, now: OffsetDateTime) -> Result<Option<String>, StorageError> {
        let Some(raw) = self.backend.get(&self.name)? else {
            return Ok(None);
        };

        let cookie = match Cookie::parse_encoded(raw) {
            Ok(cookie) => cookie,
            Err(e) => {
                tracing::warn!(cookie = %self.name, error = %e, "unreadable cookie treated as absent");
                return Ok(None);
            }
        };

        if cookie.expires_datetime().is_some_and(|expires| expires <= now) {
            tracing::debug!(cookie = %self.name, "cookie expired");
            return Ok(None);
        }
        if cookie.value().is_empty() {
            return Ok(None);
        }
        Ok(Some(cookie.value().to_owned()))
    }

    /// Remove the cookie. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns the backend's error if the removal fails.
    pub fn clear(&self) -> Result<(), StorageError> {
        self.backend.remove(&self.name)
    }
}

#[cfg(test)]
#[path = "cookie_test.rs"]
mod tests;
