use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::*;

/// Body-level marker the service uses to flag a stale `__v` on a 400.
pub(super) const CONFLICT_CODE: &str = "VERSION_CONFLICT";

/// Describes one logical remote call for logging and error classification.
#[derive(Clone, Copy, Debug)]
pub(super) struct Call<'a> {
    pub(super) kind: EntityKind,
    pub(super) label: &'static str,
    pub(super) subject: Option<&'a str>,
}

impl<'a> Call<'a> {
    pub(super) fn new(kind: EntityKind, label: &'static str) -> Self {
        Self {
            kind,
            label,
            subject: None,
        }
    }

    pub(super) fn on(mut self, remote_id: &'a str) -> Self {
        self.subject = Some(remote_id);
        self
    }
}

impl RemoteClient {
    pub(super) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub(super) async fn get<T: DeserializeOwned>(&self, call: Call<'_>, path: &str) -> Result<T> {
        self.execute(call, Method::GET, path, None).await
    }

    pub(super) async fn delete<T: DeserializeOwned>(
        &self,
        call: Call<'_>,
        path: &str,
    ) -> Result<T> {
        self.execute(call, Method::DELETE, path, None).await
    }

    pub(super) async fn post<B, T>(&self, call: Call<'_>, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = encode(call, body)?;
        self.execute(call, Method::POST, path, Some(body)).await
    }

    pub(super) async fn post_empty<T: DeserializeOwned>(
        &self,
        call: Call<'_>,
        path: &str,
    ) -> Result<T> {
        self.execute(call, Method::POST, path, None).await
    }

    pub(super) async fn put<B, T>(&self, call: Call<'_>, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = encode(call, body)?;
        self.execute(call, Method::PUT, path, Some(body)).await
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        call: Call<'_>,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
    ) -> Result<T> {
        // Without a session the server would answer 401 anyway.
        if !self.session.is_authenticated().await {
            debug!(label = call.label, "not logged in; skipping remote call");
            return Err(PersistenceError::Unauthorized);
        }

        let mut req = self
            .session
            .http()
            .request(method.clone(), self.url(path))
            .headers(self.session.headers().await)
            .timeout(self.timeout);
        if let Some(body) = body {
            req = req.body(body);
        }

        debug!(%method, path, label = call.label, "remote call");
        let resp = req.send().await?;
        let status = resp.status();
        let bytes = resp.bytes().await?;
        if !status.is_success() {
            let err = classify(status, &bytes, call);
            debug!(status = status.as_u16(), label = call.label, error = %err, "remote call failed");
            return Err(err);
        }

        serde_json::from_slice(&bytes)
            .map_err(|e| PersistenceError::Decode(format!("{}: {}", call.label, e)))
    }
}

fn encode<B: Serialize + ?Sized>(call: Call<'_>, body: &B) -> Result<Vec<u8>> {
    serde_json::to_vec(body)
        .map_err(|e| PersistenceError::InvalidFormat(format!("{}: {}", call.label, e)))
}

/// Maps a non-success status (and, for 400, its body) to the error taxonomy.
pub(super) fn classify(status: StatusCode, body: &[u8], call: Call<'_>) -> PersistenceError {
    match status {
        StatusCode::UNAUTHORIZED => PersistenceError::Unauthorized,
        StatusCode::FORBIDDEN => PersistenceError::InsufficientRights,
        StatusCode::CONFLICT => outdated(call),
        StatusCode::BAD_REQUEST if has_conflict_marker(body) => outdated(call),
        StatusCode::BAD_REQUEST => PersistenceError::InvalidFormat(
            error_message(body).unwrap_or_else(|| format!("{} rejected", call.label)),
        ),
        other => PersistenceError::Status {
            code: other.as_u16(),
        },
    }
}

fn outdated(call: Call<'_>) -> PersistenceError {
    PersistenceError::Outdated {
        kind: call.kind,
        remote_id: call.subject.unwrap_or_default().to_string(),
    }
}

fn has_conflict_marker(body: &[u8]) -> bool {
    serde_json::from_slice::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("code").and_then(|c| c.as_str()).map(|c| c == CONFLICT_CODE))
        .unwrap_or(false)
}

fn error_message(body: &[u8]) -> Option<String> {
    let v: serde_json::Value = serde_json::from_slice(body).ok()?;
    v.get("error")
        .and_then(|x| x.as_str())
        .map(|s| s.to_string())
}

#[cfg(test)]
#[path = "../tests/remote/http_client_tests.rs"]
mod tests;
