//! Navigation guard.
//!
//! SYSTEM CONTEXT
//! ==============
//! Runs in front of every page route and looks only at the `auth-token`
//! cookie. It never consults `AuthSession`, so a page can render before the
//! client has resolved its in-memory user.
//!
//! DESIGN
//! ======
//! `decide` is a pure function over (path, token present) so the terminal
//! front end can evaluate the same rules offline. `route_guard` is the axum
//! middleware that applies it to requests.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar};

use crate::config::DEFAULT_PROTECTED_PREFIXES;
use crate::credentials::AUTH_COOKIE;

pub const LOGIN_PATH: &str = "/login";
pub const HOME_PATH: &str = "/home";

const PUBLIC_AUTH_PATHS: &[&str] = &["/login", "/signin"];
const EXCLUDED_PREFIXES: &[&str] = &["/api", "/static", "/assets"];
const EXCLUDED_PATHS: &[&str] = &["/favicon.ico"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardConfig {
    pub protected_prefixes: Vec<String>,
    pub public_auth_paths: Vec<String>,
    pub login_path: String,
    pub home_path: String,
}

impl GuardConfig {
    #[must_use]
    pub fn new(protected_prefixes: Vec<String>) -> Self {
        Self {
            protected_prefixes,
            public_auth_paths: PUBLIC_AUTH_PATHS.iter().map(|p| (*p).to_owned()).collect(),
            login_path: LOGIN_PATH.to_owned(),
            home_path: HOME_PATH.to_owned(),
        }
    }

    fn is_protected(&self, path: &str) -> bool {
        self.protected_prefixes.iter().any(|prefix| path.starts_with(prefix.as_str()))
    }

    fn is_public_auth(&self, path: &str) -> bool {
        self.public_auth_paths.iter().any(|p| p == path)
    }
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self::new(DEFAULT_PROTECTED_PREFIXES.iter().map(|p| (*p).to_owned()).collect())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Redirect(String),
}

/// Paths the guard never inspects.
#[must_use]
pub fn is_excluded(path: &str) -> bool {
    EXCLUDED_PATHS.contains(&path)
        || EXCLUDED_PREFIXES
            .iter()
            .any(|prefix| path == *prefix || path.starts_with(&format!("{prefix}/")))
}

/// Apply the redirect rules for a navigation to `path`.
#[must_use]
pub fn decide(config: &GuardConfig, path: &str, token_present: bool) -> GuardDecision {
    if is_excluded(path) {
        return GuardDecision::Allow;
    }
    if !token_present && config.is_protected(path) {
        return GuardDecision::Redirect(config.login_path.clone());
    }
    if token_present && config.is_public_auth(path) {
        return GuardDecision::Redirect(config.home_path.clone());
    }
    GuardDecision::Allow
}

/// Whether the jar carries a non-empty auth cookie.
#[must_use]
pub fn token_present(jar: &CookieJar) -> bool {
    jar.get(AUTH_COOKIE).map(Cookie::value).is_some_and(|v| !v.is_empty())
}

// =============================================================================
// MIDDLEWARE
// =============================================================================

pub async fn route_guard(
    State(config): State<Arc<GuardConfig>>,
    jar: CookieJar,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_owned();
    match decide(&config, &path, token_present(&jar)) {
        GuardDecision::Allow => next.run(request).await,
        GuardDecision::Redirect(to) => {
            tracing::debug!(%path, %to, "guard redirect");
            Redirect::temporary(&to).into_response()
        }
    }
}

#[cfg(test)]
#[path = "guard_test.rs"]
mod tests;
