//! Authentication lifecycle and the shared request header set.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt, Shared};
use reqwest::header::{self, HeaderMap, HeaderValue};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::types::{OAuthRequest, OAuthResponse};
use crate::error::{PersistenceError, Result};
use crate::model::SyncConfig;

const AUTH_PATH: &str = "dxauth/oauth2/token";

type LoginAttempt = Shared<BoxFuture<'static, bool>>;

/// Session with the project service, shared by every client that talks to it.
///
/// Cloning is cheap; clones observe the same token and headers.
#[derive(Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    base_url: String,
    username: String,
    password: Option<String>,
    user_agent: HeaderValue,
    login_timeout: Duration,
    http: reqwest::Client,
    state: RwLock<SessionState>,
    // At most one login exchange in flight; cleared once it resolves.
    pending: Mutex<Option<LoginAttempt>>,
}

struct SessionState {
    token: Option<OAuthResponse>,
    headers: HeaderMap,
}

impl Session {
    pub fn new(config: &SyncConfig) -> Result<Self> {
        let user_agent = HeaderValue::from_str(&config.user_agent())
            .map_err(|e| PersistenceError::InvalidFormat(format!("user agent: {}", e)))?;

        if config.accept_invalid_certs {
            warn!(
                host = %config.host,
                "TLS certificate validation is disabled for the project service"
            );
        }
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent())
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()
            .map_err(|e| PersistenceError::Transport(format!("build http client: {}", e)))?;

        let headers = build_headers(&user_agent, None)?;
        Ok(Self {
            inner: Arc::new(SessionInner {
                base_url: config.base_url(),
                username: config.username.clone(),
                password: config.password.clone(),
                user_agent,
                login_timeout: config.login_timeout(),
                http,
                state: RwLock::new(SessionState {
                    token: None,
                    headers,
                }),
                pending: Mutex::new(None),
            }),
        })
    }

    pub fn username(&self) -> &str {
        &self.inner.username
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.inner.http
    }

    pub async fn is_authenticated(&self) -> bool {
        self.inner.state.read().await.token.is_some()
    }

    /// Current header set, including the bearer token once authenticated.
    pub async fn headers(&self) -> HeaderMap {
        self.inner.state.read().await.headers.clone()
    }

    pub async fn token(&self) -> Option<String> {
        self.inner
            .state
            .read()
            .await
            .token
            .as_ref()
            .map(|t| t.access_token.clone())
    }

    /// Logs in unless already authenticated.
    ///
    /// Never fails: a rejected or timed-out exchange is logged and leaves the
    /// session unauthenticated, so callers check [`Session::is_authenticated`]
    /// afterwards. Concurrent callers share one exchange and its outcome.
    pub async fn login(&self) -> bool {
        if self.is_authenticated().await {
            return true;
        }

        let attempt = {
            let mut pending = self
                .inner
                .pending
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            match pending.as_ref() {
                Some(attempt) => attempt.clone(),
                None => {
                    let inner = self.inner.clone();
                    let attempt = async move {
                        let ok = inner.authenticate().await;
                        inner
                            .pending
                            .lock()
                            .unwrap_or_else(PoisonError::into_inner)
                            .take();
                        ok
                    }
                    .boxed()
                    .shared();
                    *pending = Some(attempt.clone());
                    attempt
                }
            }
        };
        attempt.await
    }

    /// Drops the token and restores the unauthenticated header set.
    pub async fn logout(&self) {
        let mut state = self.inner.state.write().await;
        if state.token.take().is_some() {
            info!(user = %self.inner.username, "logged out");
        }
        state.headers = self.inner.anonymous_headers();
    }
}

impl SessionInner {
    async fn authenticate(&self) -> bool {
        // A previous attempt may have finished between the caller's check and now.
        if self.state.read().await.token.is_some() {
            return true;
        }

        let Some(password) = self.password.as_deref() else {
            warn!(user = %self.username, "login skipped: no password configured");
            self.reset().await;
            return false;
        };

        debug!(user = %self.username, "authenticating");
        let resp = self
            .http
            .post(format!("{}{}", self.base_url, AUTH_PATH))
            .headers(self.anonymous_headers())
            .json(&OAuthRequest {
                username: &self.username,
                password,
            })
            .timeout(self.login_timeout)
            .send()
            .await;

        let resp = match resp {
            Ok(resp) => resp,
            Err(err) => {
                warn!(user = %self.username, error = %err, "login failed");
                self.reset().await;
                return false;
            }
        };
        if !resp.status().is_success() {
            warn!(
                user = %self.username,
                status = resp.status().as_u16(),
                "login rejected"
            );
            self.reset().await;
            return false;
        }

        let token: OAuthResponse = match resp.json().await {
            Ok(token) => token,
            Err(err) => {
                warn!(user = %self.username, error = %err, "parse login response");
                self.reset().await;
                return false;
            }
        };
        let headers = match build_headers(&self.user_agent, Some(&token.access_token)) {
            Ok(headers) => headers,
            Err(err) => {
                warn!(user = %self.username, error = %err, "unusable access token");
                self.reset().await;
                return false;
            }
        };

        let mut state = self.state.write().await;
        state.token = Some(token);
        state.headers = headers;
        info!(user = %self.username, "logged in");
        true
    }

    async fn reset(&self) {
        let mut state = self.state.write().await;
        state.token = None;
        state.headers = self.anonymous_headers();
    }

    fn anonymous_headers(&self) -> HeaderMap {
        // Only the token can make header construction fail.
        build_headers(&self.user_agent, None).unwrap_or_default()
    }
}

fn build_headers(user_agent: &HeaderValue, token: Option<&str>) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    headers.insert(
        header::ACCEPT,
        HeaderValue::from_static("application/json, text/plain, */*"),
    );
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    headers.insert(header::PRAGMA, HeaderValue::from_static("no-cache"));
    headers.insert(
        header::EXPIRES,
        HeaderValue::from_static("Sat, 01 Jan 2000 00:00:00 GMT"),
    );
    headers.insert(header::USER_AGENT, user_agent.clone());
    if let Some(token) = token {
        let bearer = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|e| PersistenceError::InvalidFormat(format!("access token: {}", e)))?;
        headers.insert(header::AUTHORIZATION, bearer);
    }
    Ok(headers)
}

#[cfg(test)]
#[path = "../tests/remote/session_tests.rs"]
mod tests;
