use super::*;

fn agent() -> HeaderValue {
    HeaderValue::from_static("insight-sync/test")
}

#[test]
fn anonymous_headers_have_no_authorization() {
    let headers = build_headers(&agent(), None).unwrap();
    assert_eq!(headers[header::CONTENT_TYPE], "application/json");
    assert_eq!(headers[header::CACHE_CONTROL], "no-cache");
    assert_eq!(headers[header::PRAGMA], "no-cache");
    assert_eq!(headers[header::USER_AGENT], "insight-sync/test");
    assert!(headers.get(header::AUTHORIZATION).is_none());
}

#[test]
fn token_adds_bearer_entry() {
    let headers = build_headers(&agent(), Some("abc123")).unwrap();
    assert_eq!(headers[header::AUTHORIZATION], "Bearer abc123");
}

#[test]
fn token_with_newline_is_rejected() {
    let err = build_headers(&agent(), Some("bad\ntoken")).unwrap_err();
    assert!(matches!(err, PersistenceError::InvalidFormat(_)));
}

#[tokio::test]
async fn new_session_is_unauthenticated() {
    let session = Session::new(&SyncConfig::new("http://127.0.0.1:9", "ana", "pw")).unwrap();
    assert!(!session.is_authenticated().await);
    assert_eq!(session.token().await, None);
    assert!(session.headers().await.get(header::AUTHORIZATION).is_none());
    // Logging out while logged out is harmless.
    session.logout().await;
    assert!(!session.is_authenticated().await);
}

#[tokio::test]
async fn login_without_password_fails_without_network() {
    let mut config = SyncConfig::new("http://127.0.0.1:9", "ana", "pw");
    config.password = None;
    let session = Session::new(&config).unwrap();
    assert!(!session.login().await);
    assert!(!session.is_authenticated().await);
}
