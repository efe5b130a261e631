use super::*;
use axum::body::Body;
use axum::http::{Request, header};
use std::path::PathBuf;
use tower::ServiceExt;

use crate::config::ApiTimeouts;

fn config() -> Config {
    Config {
        api_url: "http://localhost:4000".into(),
        data_dir: PathBuf::from(".logros"),
        static_dir: PathBuf::from("static"),
        port: 0,
        cookie_days: 7,
        timeouts: ApiTimeouts { request_secs: 30, connect_secs: 10 },
        protected_prefixes: vec!["/home".into(), "/registros".into()],
    }
}

fn get_req(path: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(path);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

#[tokio::test]
async fn healthz_is_unguarded() {
    let response = app(&config()).oneshot(get_req("/healthz", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn landing_renders_without_token() {
    let response = app(&config()).oneshot(get_req("/", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn create_page_requires_token() {
    let response = app(&config()).oneshot(get_req("/registros/crear", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/login");
}

#[tokio::test]
async fn entry_page_renders_with_token() {
    let response = app(&config()).oneshot(get_req("/registros/3", Some("auth-token=t1"))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn signin_redirects_when_signed_in() {
    let response = app(&config()).oneshot(get_req("/signin", Some("auth-token=t1"))).await.unwrap();
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/home");
}

#[tokio::test]
async fn auth_shells_never_set_the_auth_cookie() {
    for path in ["/login", "/signin"] {
        let response = app(&config()).oneshot(get_req(path, None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK, "{path}");
        assert!(response.headers().get(header::SET_COOKIE).is_none(), "{path}");
    }
}
