//! HTTP front end.
//!
//! SYSTEM CONTEXT
//! ==============
//! Serves the page shells for the weekly log. Page routes sit behind the
//! navigation guard; static assets and the health check do not.
//!
//! TRADE-OFFS
//! ==========
//! Pages are shells for the guard only. The server never signs anyone in and
//! never issues `Set-Cookie: auth-token`; the cookie is written by the client
//! that owns the credentials (see `credentials::cookie::build_cookie`). Entry
//! data is never proxied through this server.

pub mod pages;

use std::sync::Arc;

use axum::Router;
use axum::http::StatusCode;
use axum::middleware;
use axum::routing::get;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::guard::{GuardConfig, route_guard};

/// Page routes wrapped in the navigation guard.
fn page_routes(guard: Arc<GuardConfig>) -> Router {
    Router::new()
        .route("/", get(pages::landing))
        .route("/login", get(pages::login))
        .route("/signin", get(pages::signin))
        .route("/home", get(pages::home))
        .route("/registros", get(pages::registros))
        .route("/registros/crear", get(pages::crear))
        .route("/registros/{id}", get(pages::registro))
        .layer(middleware::from_fn_with_state(guard, route_guard))
}

/// Full router: guarded pages, `/static` assets, and `/healthz`.
#[must_use]
pub fn app(config: &Config) -> Router {
    let guard = Arc::new(GuardConfig::new(config.protected_prefixes.clone()));

    page_routes(guard)
        .route("/healthz", get(healthz))
        .nest_service("/static", ServeDir::new(&config.static_dir))
        .layer(TraceLayer::new_for_http())
}

/// Bind `0.0.0.0:{port}` and serve until the process stops.
///
/// # Errors
///
/// Returns the I/O error if the listener cannot bind or the server fails.
pub async fn serve(config: &Config) -> std::io::Result<()> {
    let port = config.port;
    let app = app(config);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await?;

    tracing::info!(%port, api_url = %config.api_url, "logros listening");
    axum::serve(listener, app).await
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

#[cfg(test)]
#[path = "web_test.rs"]
mod tests;
