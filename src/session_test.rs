use super::*;
use crate::credentials::test_helpers::FailingStore;
use crate::credentials::{AUTH_COOKIE, KeyValueStore, MemoryStore};
use crate::credentials::store::{TOKEN_KEY, USER_KEY};
use crate::net::api::ApiError;
use crate::net::test_helpers::{MockApi, grant, rejected, MockReply};
use time::Duration;

struct Fixture {
    cookies: Arc<MemoryStore>,
    persistent: Arc<MemoryStore>,
    credentials: Arc<CredentialStore>,
}

impl Fixture {
    fn new() -> Self {
        let cookies = Arc::new(MemoryStore::new());
        let persistent = Arc::new(MemoryStore::new());
        let credentials = Arc::new(CredentialStore::new(cookies.clone(), persistent.clone(), Duration::days(7)));
        Self { cookies, persistent, credentials }
    }

    fn manager(&self, replies: Vec<MockReply>) -> AuthSession {
        AuthSession::new(Arc::new(MockApi::new(replies)), self.credentials.clone())
    }

    fn slots_empty(&self) -> bool {
        self.cookies.get(AUTH_COOKIE).unwrap().is_none()
            && self.persistent.get(TOKEN_KEY).unwrap().is_none()
            && self.persistent.get(USER_KEY).unwrap().is_none()
    }
}

// =============================================================================
// resolve_session
// =============================================================================

#[test]
fn fresh_store_resolves_anonymous_and_not_loading() {
    let fx = Fixture::new();
    let manager = fx.manager(vec![]);
    assert_eq!(manager.session(), Session { user: None, loading: false });
}

#[test]
fn stored_credentials_resolve_without_network() {
    let fx = Fixture::new();
    let profile = UserProfile { id: 3, email: "c@d.com".into(), nombre: Some("C".into()), apellido: None };
    fx.credentials.set("tok", &profile).unwrap();

    let api = Arc::new(MockApi::new(vec![]));
    let manager = AuthSession::new(api.clone(), fx.credentials.clone());
    assert_eq!(manager.user(), Some(profile));
    assert!(!manager.session().loading);
    assert!(api.calls().is_empty());
}

#[test]
fn malformed_profile_clears_store_silently() {
    let fx = Fixture::new();
    fx.credentials.set("tok", &UserProfile { id: 1, email: "x".into(), nombre: None, apellido: None }).unwrap();
    fx.persistent.set(USER_KEY, "{broken").unwrap();

    let manager = fx.manager(vec![]);
    assert!(manager.user().is_none());
    assert!(!manager.session().loading);
    assert!(fx.slots_empty());
}

#[test]
fn persistent_only_session_is_anonymous_and_wiped() {
    let fx = Fixture::new();
    fx.persistent.set(TOKEN_KEY, "stale").unwrap();
    fx.persistent.set(USER_KEY, r#"{"id":1,"email":"x@y.z"}"#).unwrap();

    let manager = fx.manager(vec![]);
    assert!(manager.user().is_none());
    assert!(fx.slots_empty());
}

// =============================================================================
// login
// =============================================================================

#[tokio::test]
async fn login_success_sets_user_and_cookie() {
    let fx = Fixture::new();
    let manager = fx.manager(vec![grant("t1", 7)]);

    let profile = manager.login("a@b.com", "x").await.unwrap();
    let expected = UserProfile { id: 7, email: "a@b.com".into(), nombre: None, apellido: None };
    assert_eq!(profile, expected);
    assert_eq!(manager.user(), Some(expected));
    assert_eq!(fx.credentials.cookie().get().unwrap().as_deref(), Some("t1"));
    assert_eq!(fx.persistent.get(TOKEN_KEY).unwrap().as_deref(), Some("t1"));
}

#[tokio::test]
async fn login_then_fresh_manager_round_trips() {
    let fx = Fixture::new();
    let first = fx.manager(vec![grant("t1", 7)]);
    let profile = first.login("a@b.com", "x").await.unwrap();

    let second = fx.manager(vec![]);
    assert_eq!(second.user(), Some(profile));
}

#[tokio::test]
async fn login_rejection_leaves_store_untouched() {
    let fx = Fixture::new();
    let manager = fx.manager(vec![MockReply::Grant(Err(rejected(401, "invalid credentials", &[])))]);

    let failure = manager.login("a@b.com", "bad").await.unwrap_err();
    assert_eq!(failure.kind, FailureKind::Auth);
    assert_eq!(failure.error, "invalid credentials");
    assert!(failure.fields.is_none());
    assert!(manager.user().is_none());
    assert!(fx.slots_empty());
}

#[tokio::test]
async fn login_field_errors_surface() {
    let fx = Fixture::new();
    let manager = fx.manager(vec![MockReply::Grant(Err(rejected(
        422,
        "validation failed",
        &[("email", "invalid email")],
    )))]);

    let failure = manager.login("nope", "x").await.unwrap_err();
    assert_eq!(failure.kind, FailureKind::Validation);
    assert_eq!(failure.field("email"), Some("invalid email"));
}

#[tokio::test]
async fn login_network_failure_is_generic() {
    let fx = Fixture::new();
    let manager = fx.manager(vec![MockReply::Grant(Err(ApiError::Transport("connection refused".into())))]);

    let failure = manager.login("a@b.com", "x").await.unwrap_err();
    assert_eq!(failure.kind, FailureKind::Network);
    assert_eq!(failure.error, crate::failure::NETWORK_ERROR);
}

#[tokio::test]
async fn login_rejection_without_message_uses_default() {
    let fx = Fixture::new();
    let err = ApiError::Rejected { status: 500, error: None, fields: None };
    let manager = fx.manager(vec![MockReply::Grant(Err(err))]);
    assert_eq!(manager.login("a@b.com", "x").await.unwrap_err().error, LOGIN_FAILED);
}

#[tokio::test]
async fn token_with_cookie_separators_survives_reopen() {
    let fx = Fixture::new();
    let manager = fx.manager(vec![grant("a;b c,d", 7)]);
    manager.login("a@b.com", "x").await.unwrap();

    assert_eq!(fx.credentials.cookie().get().unwrap().as_deref(), Some("a;b c,d"));
    let reopened = fx.manager(vec![]);
    assert_eq!(reopened.user().map(|u| u.id), Some(7));
    let headers = reopened.auth_header();
    assert_eq!(headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()), Some("Bearer a;b c,d"));
}

// =============================================================================
// storage failures during sign-in
// =============================================================================

struct FailingFixture {
    cookies: Arc<MemoryStore>,
    persistent: Arc<FailingStore>,
    credentials: Arc<CredentialStore>,
}

impl FailingFixture {
    fn new() -> Self {
        let cookies = Arc::new(MemoryStore::new());
        let persistent = Arc::new(FailingStore::new(USER_KEY));
        let credentials = Arc::new(CredentialStore::new(cookies.clone(), persistent.clone(), Duration::days(7)));
        Self { cookies, persistent, credentials }
    }

    fn manager(&self, replies: Vec<MockReply>) -> AuthSession {
        AuthSession::new(Arc::new(MockApi::new(replies)), self.credentials.clone())
    }

    fn slots_empty(&self) -> bool {
        self.cookies.get(AUTH_COOKIE).unwrap().is_none()
            && self.persistent.get(TOKEN_KEY).unwrap().is_none()
            && self.persistent.get(USER_KEY).unwrap().is_none()
    }
}

#[tokio::test]
async fn login_storage_failure_stays_anonymous() {
    let fx = FailingFixture::new();
    let manager = fx.manager(vec![grant("t1", 7)]);

    let failure = manager.login("a@b.com", "x").await.unwrap_err();
    assert_eq!(failure.kind, FailureKind::Storage);
    assert_eq!(failure.error, STORAGE_FAILED);
    assert!(manager.user().is_none());
    assert!(fx.slots_empty());
}

#[tokio::test]
async fn relogin_storage_failure_drops_previous_user() {
    let fx = FailingFixture::new();
    fx.persistent.set_armed(false);
    let manager = fx.manager(vec![grant("t1", 7), grant("t2", 8)]);
    manager.login("a@b.com", "x").await.unwrap();
    assert_eq!(manager.user().map(|u| u.id), Some(7));

    fx.persistent.set_armed(true);
    let failure = manager.register("B", "C", "b@c.com", "y").await.unwrap_err();
    assert_eq!(failure.kind, FailureKind::Storage);
    assert!(manager.user().is_none());
    assert!(!manager.session().is_authenticated());
    assert!(fx.slots_empty());
    assert!(manager.auth_header().is_empty());
}

#[tokio::test]
async fn unrepresentable_cookie_expiry_is_storage_failure() {
    let credentials = Arc::new(CredentialStore::in_memory(Duration::days(10_000_000)));
    let manager = AuthSession::new(Arc::new(MockApi::new(vec![grant("t1", 7)])), credentials.clone());

    let failure = manager.login("a@b.com", "x").await.unwrap_err();
    assert_eq!(failure.kind, FailureKind::Storage);
    assert!(manager.user().is_none());
    assert!(credentials.get().unwrap().is_none());
}

// =============================================================================
// register
// =============================================================================

#[tokio::test]
async fn register_caches_names() {
    let fx = Fixture::new();
    let manager = fx.manager(vec![grant("t2", 11)]);

    let profile = manager.register("Ana", "Ruiz", "ana@r.com", "pw").await.unwrap();
    assert_eq!(profile.nombre.as_deref(), Some("Ana"));
    assert_eq!(profile.apellido.as_deref(), Some("Ruiz"));

    let reopened = fx.manager(vec![]);
    assert_eq!(reopened.user().unwrap().display_name(), "Ana Ruiz");
}

#[tokio::test]
async fn register_conflict_reports_default_message() {
    let fx = Fixture::new();
    let err = ApiError::Rejected { status: 409, error: None, fields: None };
    let manager = fx.manager(vec![MockReply::Grant(Err(err))]);
    let failure = manager.register("A", "B", "a@b.com", "pw").await.unwrap_err();
    assert_eq!(failure.error, REGISTER_FAILED);
    assert!(fx.slots_empty());
}

// =============================================================================
// logout / auth_header
// =============================================================================

#[tokio::test]
async fn logout_clears_everything() {
    let fx = Fixture::new();
    let manager = fx.manager(vec![grant("t1", 7)]);
    manager.login("a@b.com", "x").await.unwrap();

    manager.logout();
    assert!(manager.user().is_none());
    assert!(fx.slots_empty());
}

#[test]
fn logout_when_anonymous_is_harmless() {
    let fx = Fixture::new();
    let manager = fx.manager(vec![]);
    manager.logout();
    manager.logout();
    assert!(manager.user().is_none());
    assert!(fx.slots_empty());
}

#[tokio::test]
async fn auth_header_tracks_token() {
    let fx = Fixture::new();
    let manager = fx.manager(vec![grant("t1", 7)]);
    assert!(manager.auth_header().is_empty());

    manager.login("a@b.com", "x").await.unwrap();
    let headers = manager.auth_header();
    assert_eq!(headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()), Some("Bearer t1"));

    manager.logout();
    assert!(manager.auth_header().is_empty());
}
