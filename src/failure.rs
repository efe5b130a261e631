//! User-facing failure shape shared by the session manager and the hooks.
//!
//! ERROR HANDLING
//! ==============
//! `ApiError` describes what went wrong on the wire; `Failure` describes what
//! a view should show: a banner message, optional per-field messages, and a
//! kind so the view can decide whether to prompt for a new login.

use crate::net::api::ApiError;
use crate::net::types::FieldErrors;

pub const NETWORK_ERROR: &str = "network error";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The API rejected specific fields.
    Validation,
    /// Bad credentials or a missing/rejected token.
    Auth,
    /// Transport failure or an unreadable response.
    Network,
    /// Any other rejection (404, 5xx, ...).
    Server,
    /// Credentials could not be persisted locally.
    Storage,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub kind: FailureKind,
    pub error: String,
    pub fields: Option<FieldErrors>,
}

impl Failure {
    #[must_use]
    pub fn new(kind: FailureKind, error: impl Into<String>) -> Self {
        Self { kind, error: error.into(), fields: None }
    }

    /// Translate an API error, using `fallback` when the API gave no message.
    #[must_use]
    pub fn from_api(err: ApiError, fallback: &str) -> Self {
        match err {
            ApiError::Transport(_) | ApiError::Decode(_) | ApiError::HttpClientBuild(_) => {
                Self::new(FailureKind::Network, NETWORK_ERROR)
            }
            ApiError::Rejected { status, error, fields } => {
                let fields = fields.filter(|f| !f.is_empty());
                let kind = if fields.is_some() {
                    FailureKind::Validation
                } else if matches!(status, 401 | 403) {
                    FailureKind::Auth
                } else {
                    FailureKind::Server
                };
                let error = error.filter(|e| !e.trim().is_empty()).unwrap_or_else(|| fallback.to_owned());
                Self { kind, error, fields }
            }
        }
    }

    /// Same as `from_api`, but always carries a field map (empty when the API
    /// sent none). Entry forms bind to this shape.
    #[must_use]
    pub fn from_api_with_fields(err: ApiError, fallback: &str) -> Self {
        let mut failure = Self::from_api(err, fallback);
        if failure.kind != FailureKind::Network && failure.fields.is_none() {
            failure.fields = Some(FieldErrors::new());
        }
        failure
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.as_ref().and_then(|f| f.get(name)).map(String::as_str)
    }

    /// Whether the view should send the user back to the login screen.
    #[must_use]
    pub fn requires_login(&self) -> bool {
        self.kind == FailureKind::Auth
    }
}

impl std::fmt::Display for Failure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.error)
    }
}

impl std::error::Error for Failure {}

#[cfg(test)]
#[path = "failure_test.rs"]
mod tests;
