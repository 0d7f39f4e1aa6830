use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_LOGIN_TIMEOUT_SECS: u64 = 5;

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

fn default_login_timeout_secs() -> u64 {
    DEFAULT_LOGIN_TIMEOUT_SECS
}

fn is_false(v: &bool) -> bool {
    !*v
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Base URL of the project service, e.g. `https://insight.example.com/`.
    pub host: String,

    pub username: String,

    // Usually supplied through the environment rather than the config file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_login_timeout_secs")]
    pub login_timeout_secs: u64,

    /// Disables TLS certificate validation. Development servers only.
    #[serde(default, skip_serializing_if = "is_false")]
    pub accept_invalid_certs: bool,

    /// Only treat explicit conflict responses (409, or 400 with a conflict
    /// code) as outdated; a bare 400 on update stays an invalid-format error.
    #[serde(default, skip_serializing_if = "is_false")]
    pub strict_conflict_status: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_dir: Option<PathBuf>,
}

impl SyncConfig {
    pub fn new(host: &str, username: &str, password: &str) -> Self {
        Self {
            host: host.to_string(),
            username: username.to_string(),
            password: Some(password.to_string()),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            login_timeout_secs: DEFAULT_LOGIN_TIMEOUT_SECS,
            accept_invalid_certs: false,
            strict_conflict_status: false,
            user_agent: None,
            cache_dir: None,
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let bytes =
            std::fs::read(path).with_context(|| format!("read config {}", path.display()))?;
        let cfg: SyncConfig = serde_json::from_slice(&bytes)
            .with_context(|| format!("parse config {}", path.display()))?;
        Ok(cfg)
    }

    /// Host with a guaranteed trailing slash, ready for path concatenation.
    pub fn base_url(&self) -> String {
        if self.host.ends_with('/') {
            self.host.clone()
        } else {
            format!("{}/", self.host)
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn login_timeout(&self) -> Duration {
        Duration::from_secs(self.login_timeout_secs)
    }

    pub fn user_agent(&self) -> String {
        self.user_agent
            .clone()
            .unwrap_or_else(|| format!("insight-sync/{}", env!("CARGO_PKG_VERSION")))
    }
}
