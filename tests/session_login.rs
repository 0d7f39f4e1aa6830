mod common;

use anyhow::Result;
use futures::future::join_all;
use reqwest::header;

use insight_sync::PersistenceError;
use insight_sync::remote::{RemoteClient, SearchFilter, Session};

#[tokio::test]
async fn concurrent_logins_share_one_exchange() -> Result<()> {
    let guard = common::spawn_stub_with(&["--login-delay-ms", "200"]).await?;
    let session = Session::new(&guard.config())?;

    let outcomes = join_all((0..8).map(|_| {
        let session = session.clone();
        async move { session.login().await }
    }))
    .await;

    assert!(outcomes.iter().all(|ok| *ok));
    assert!(session.is_authenticated().await);
    assert_eq!(guard.auth_calls().await?, 1);
    Ok(())
}

#[tokio::test]
async fn login_when_authenticated_makes_no_call() -> Result<()> {
    let guard = common::spawn_stub().await?;
    let session = Session::new(&guard.config())?;
    assert!(session.login().await);
    guard.clear_calls().await?;

    assert!(session.login().await);
    assert!(guard.calls().await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn rejected_credentials_leave_session_logged_out() -> Result<()> {
    let guard = common::spawn_stub().await?;
    let mut config = guard.config();
    config.password = Some("wrong".to_string());
    let session = Session::new(&config)?;

    let outcomes = join_all((0..3).map(|_| session.login())).await;
    assert!(outcomes.iter().all(|ok| !*ok));
    assert!(!session.is_authenticated().await);
    assert!(session.headers().await.get(header::AUTHORIZATION).is_none());
    assert_eq!(guard.auth_calls().await?, 1);

    // A later attempt is a fresh exchange.
    assert!(!session.login().await);
    assert_eq!(guard.auth_calls().await?, 2);
    Ok(())
}

#[tokio::test]
async fn logout_drops_the_bearer_token() -> Result<()> {
    let guard = common::spawn_stub().await?;
    let session = Session::new(&guard.config())?;
    assert!(session.login().await);

    let token = session.token().await.expect("token after login");
    assert_eq!(
        session.headers().await[header::AUTHORIZATION],
        format!("Bearer {}", token)
    );

    session.logout().await;
    assert!(!session.is_authenticated().await);
    assert!(session.headers().await.get(header::AUTHORIZATION).is_none());

    // The client refuses to call out without a session.
    guard.clear_calls().await?;
    let client = RemoteClient::new(&guard.config(), session.clone());
    let err = client.search_projects(&SearchFilter::all()).await.unwrap_err();
    assert!(matches!(err, PersistenceError::Unauthorized));
    assert!(guard.calls().await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn unreachable_service_fails_login_quietly() -> Result<()> {
    let guard = common::spawn_stub().await?;
    let mut config = guard.config();
    config.host = "http://127.0.0.1:9/".to_string();
    let session = Session::new(&config)?;
    assert!(!session.login().await);
    assert!(!session.is_authenticated().await);
    Ok(())
}

#[tokio::test]
async fn slow_token_exchange_times_out_quietly() -> Result<()> {
    let guard = common::spawn_stub_with(&["--login-delay-ms", "3000"]).await?;
    let mut config = guard.config();
    config.login_timeout_secs = 1;
    let session = Session::new(&config)?;

    assert!(!session.login().await);
    assert!(!session.is_authenticated().await);
    assert!(session.token().await.is_none());
    assert!(session.headers().await.get(header::AUTHORIZATION).is_none());
    assert_eq!(guard.auth_calls().await?, 1);

    // Nothing else is attempted with the failed session.
    let client = RemoteClient::new(&config, session);
    let err = client.search_projects(&SearchFilter::all()).await.unwrap_err();
    assert!(matches!(err, PersistenceError::Unauthorized));
    assert!(guard.api_calls().await?.is_empty());
    Ok(())
}
