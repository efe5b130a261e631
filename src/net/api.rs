//! Remote API client.
//!
//! `LogrosApi` is the seam the session manager and the hooks talk to;
//! `HttpApi` is the reqwest-backed implementation. Response interpretation
//! lives in pure `parse_*` functions so it can be tested without a server.
//!
//! ERROR HANDLING
//! ==============
//! Every failure comes back as an `ApiError`. Callers translate it into the
//! user-facing `Failure` shape; nothing here panics on bad input.

use std::time::Duration;

use reqwest::header::HeaderMap;
use serde_json::Value;

use super::types::{AuthGrant, EntryPayload, ErrorBody, FieldErrors, LoginRequest, RegisterRequest, RegistroEntry, RegistroList};
use crate::config::ApiTimeouts;

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by API calls.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request never produced a response (connect, timeout, TLS, ...).
    #[error("request failed: {0}")]
    Transport(String),

    /// A response arrived but its body could not be interpreted.
    #[error("response parse failed: {0}")]
    Decode(String),

    /// The API refused the request.
    #[error("request rejected: status {status}")]
    Rejected { status: u16, error: Option<String>, fields: Option<FieldErrors> },

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl ApiError {
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}

// =============================================================================
// TRAIT
// =============================================================================

/// Operations exposed by the remote achievement-log API.
///
/// `auth` carries the headers built by `AuthSession::auth_header`; it may be
/// empty, in which case the API decides how to reject the call.
#[async_trait::async_trait]
pub trait LogrosApi: Send + Sync {
    async fn login(&self, email: &str, password: &str) -> Result<AuthGrant, ApiError>;

    async fn register(&self, nombre: &str, apellido: &str, email: &str, password: &str)
    -> Result<AuthGrant, ApiError>;

    async fn list_registros(&self, auth: &HeaderMap) -> Result<Vec<RegistroEntry>, ApiError>;

    async fn create_registro(&self, auth: &HeaderMap, payload: &EntryPayload) -> Result<(), ApiError>;

    async fn edit_registro(&self, auth: &HeaderMap, id: i64, payload: &EntryPayload) -> Result<(), ApiError>;

    async fn delete_registro(&self, auth: &HeaderMap, id: i64) -> Result<(), ApiError>;
}

// =============================================================================
// HTTP CLIENT
// =============================================================================

pub struct HttpApi {
    http: reqwest::Client,
    base_url: String,
}

impl HttpApi {
    /// Build a client rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::HttpClientBuild` if reqwest rejects the settings.
    pub fn new(base_url: &str, timeouts: ApiTimeouts) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeouts.request_secs))
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .build()
            .map_err(|e| ApiError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, base_url: base_url.trim_end_matches('/').to_owned() })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<(u16, String), ApiError> {
        let response = request.send().await.map_err(|e| ApiError::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        let text = response.text().await.map_err(|e| ApiError::Transport(e.to_string()))?;
        tracing::debug!(status, bytes = text.len(), "api response");
        Ok((status, text))
    }
}

#[async_trait::async_trait]
impl LogrosApi for HttpApi {
    async fn login(&self, email: &str, password: &str) -> Result<AuthGrant, ApiError> {
        let body = LoginRequest { email, password };
        let (status, text) = self.send(self.http.post(self.url("/login")).json(&body)).await?;
        parse_grant(status, &text)
    }

    async fn register(
        &self,
        nombre: &str,
        apellido: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthGrant, ApiError> {
        let body = RegisterRequest { nombre, apellido, email, password };
        let (status, text) = self.send(self.http.post(self.url("/register")).json(&body)).await?;
        parse_grant(status, &text)
    }

    async fn list_registros(&self, auth: &HeaderMap) -> Result<Vec<RegistroEntry>, ApiError> {
        let request = self.http.get(self.url("/registros")).headers(auth.clone());
        let (status, text) = self.send(request).await?;
        parse_registro_list(status, &text)
    }

    async fn create_registro(&self, auth: &HeaderMap, payload: &EntryPayload) -> Result<(), ApiError> {
        let request = self.http.post(self.url("/registros")).headers(auth.clone()).json(payload);
        let (status, text) = self.send(request).await?;
        parse_create(status, &text)
    }

    async fn edit_registro(&self, auth: &HeaderMap, id: i64, payload: &EntryPayload) -> Result<(), ApiError> {
        let request = self
            .http
            .patch(self.url(&format!("/registros/{id}")))
            .headers(auth.clone())
            .json(payload);
        let (status, text) = self.send(request).await?;
        parse_edit(status, &text)
    }

    async fn delete_registro(&self, auth: &HeaderMap, id: i64) -> Result<(), ApiError> {
        let request = self.http.delete(self.url(&format!("/registros/{id}"))).headers(auth.clone());
        let (status, _text) = self.send(request).await?;
        parse_delete(status)
    }
}

// =============================================================================
// PARSING
// =============================================================================

fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

/// Build a `Rejected` error from whatever the body holds. Non-JSON bodies
/// still produce a rejection, just without a message.
fn rejection(status: u16, body: &str) -> ApiError {
    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
    ApiError::Rejected { status, error: parsed.error, fields: parsed.fields }
}

/// Parse a 2xx body into JSON, treating an empty body as `None`.
fn success_json(body: &str) -> Result<Option<Value>, ApiError> {
    if body.trim().is_empty() {
        return Ok(None);
    }
    serde_json::from_str(body).map(Some).map_err(|e| ApiError::Decode(e.to_string()))
}

fn embedded_error(status: u16, value: &Value) -> Option<ApiError> {
    let error = value.get("error").and_then(Value::as_str)?;
    let fields = value
        .get("fields")
        .and_then(|f| serde_json::from_value::<FieldErrors>(f.clone()).ok());
    Some(ApiError::Rejected { status, error: Some(error.to_owned()), fields })
}

pub(crate) fn parse_grant(status: u16, body: &str) -> Result<AuthGrant, ApiError> {
    if !is_success(status) {
        return Err(rejection(status, body));
    }
    serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))
}

pub(crate) fn parse_registro_list(status: u16, body: &str) -> Result<Vec<RegistroEntry>, ApiError> {
    if !is_success(status) {
        return Err(rejection(status, body));
    }
    let list: RegistroList = serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))?;
    Ok(list.registros.unwrap_or_default())
}

pub(crate) fn parse_create(status: u16, body: &str) -> Result<(), ApiError> {
    if !is_success(status) {
        return Err(rejection(status, body));
    }
    match success_json(body)? {
        Some(value) => embedded_error(status, &value).map_or(Ok(()), Err),
        None => Ok(()),
    }
}

pub(crate) fn parse_edit(status: u16, body: &str) -> Result<(), ApiError> {
    if !is_success(status) {
        return Err(rejection(status, body));
    }
    let Some(value) = success_json(body)? else {
        return Ok(());
    };
    if let Some(err) = embedded_error(status, &value) {
        return Err(err);
    }
    if value.get("ok").and_then(Value::as_bool) == Some(true) {
        Ok(())
    } else {
        Err(ApiError::Rejected { status, error: None, fields: None })
    }
}

pub(crate) fn parse_delete(status: u16) -> Result<(), ApiError> {
    if is_success(status) {
        Ok(())
    } else {
        Err(ApiError::Rejected { status, error: None, fields: None })
    }
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;
