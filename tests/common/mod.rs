#![allow(dead_code)]

use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};

use insight_sync::InsightRepository;
use insight_sync::model::SyncConfig;
use insight_sync::store::FolderCache;

pub const USERNAME: &str = "pilot";
pub const PASSWORD: &str = "secret";

const AUTH_CALL: &str = "POST /dxauth/oauth2/token";

pub struct ServerGuard {
    pub base_url: String,
    http: reqwest::Client,
    _data_dir: tempfile::TempDir,
    child: Child,
}

impl Drop for ServerGuard {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

pub async fn spawn_stub() -> Result<ServerGuard> {
    spawn_stub_with(&[]).await
}

pub async fn spawn_stub_with(extra_args: &[&str]) -> Result<ServerGuard> {
    let data_dir = tempfile::tempdir().context("create server tempdir")?;
    let addr_file = data_dir.path().join("addr.txt");

    let child = Command::new(env!("CARGO_BIN_EXE_insight-stub"))
        .args([
            "--addr",
            "127.0.0.1:0",
            "--addr-file",
            addr_file.to_str().context("addr file path")?,
            "--username",
            USERNAME,
            "--password",
            PASSWORD,
        ])
        .args(extra_args)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .context("spawn insight-stub")?;

    let mut guard = ServerGuard {
        base_url: String::new(),
        http: reqwest::Client::new(),
        _data_dir: data_dir,
        child,
    };
    guard.base_url = read_addr_file(&addr_file).await?;
    guard.wait_for_healthz().await?;
    Ok(guard)
}

async fn read_addr_file(addr_file: &std::path::Path) -> Result<String> {
    let start = Instant::now();
    loop {
        if start.elapsed() > Duration::from_secs(5) {
            anyhow::bail!("addr file not written at {}", addr_file.display());
        }

        if let Ok(s) = std::fs::read_to_string(addr_file) {
            let s = s.trim();
            if !s.is_empty() {
                return Ok(format!("http://{}", s));
            }
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

impl ServerGuard {
    async fn wait_for_healthz(&self) -> Result<()> {
        let start = Instant::now();
        loop {
            if start.elapsed() > Duration::from_secs(5) {
                anyhow::bail!("server did not become healthy at {}/healthz", self.base_url);
            }
            match self
                .http
                .get(format!("{}/healthz", self.base_url))
                .send()
                .await
            {
                Ok(resp) if resp.status().is_success() => return Ok(()),
                _ => tokio::time::sleep(Duration::from_millis(50)).await,
            }
        }
    }

    pub fn config(&self) -> SyncConfig {
        SyncConfig::new(&self.base_url, USERNAME, PASSWORD)
    }

    /// Repository with its own cache directory, which must outlive it.
    pub fn repository(&self) -> Result<(InsightRepository, tempfile::TempDir)> {
        self.repository_with(self.config())
    }

    pub fn repository_with(
        &self,
        config: SyncConfig,
    ) -> Result<(InsightRepository, tempfile::TempDir)> {
        let cache_dir = tempfile::tempdir().context("create cache tempdir")?;
        let cache = FolderCache::open(cache_dir.path())?;
        let repo = InsightRepository::new(config, Arc::new(cache))?;
        Ok((repo, cache_dir))
    }

    /// Every call the stub has seen, as `"METHOD /path"`, oldest first.
    pub async fn calls(&self) -> Result<Vec<String>> {
        let resp = self
            .http
            .get(format!("{}/__calls", self.base_url))
            .send()
            .await
            .context("get call log")?
            .error_for_status()
            .context("call log status")?;
        resp.json().await.context("parse call log")
    }

    /// Like [`ServerGuard::calls`] without token exchanges.
    pub async fn api_calls(&self) -> Result<Vec<String>> {
        Ok(self
            .calls()
            .await?
            .into_iter()
            .filter(|c| c != AUTH_CALL)
            .collect())
    }

    pub async fn auth_calls(&self) -> Result<usize> {
        Ok(self.calls().await?.iter().filter(|c| *c == AUTH_CALL).count())
    }

    pub async fn clear_calls(&self) -> Result<()> {
        self.http
            .delete(format!("{}/__calls", self.base_url))
            .send()
            .await
            .context("clear call log")?
            .error_for_status()
            .context("clear call log status")?;
        Ok(())
    }

    /// Answers the next `times` requests matching `method` and path prefix with `status`.
    pub async fn inject_fault(&self, method: &str, path: &str, status: u16, times: u32) -> Result<()> {
        self.arm(serde_json::json!({
            "method": method,
            "path": path,
            "status": status,
            "times": times,
        }))
        .await
    }

    /// Stalls the next `times` matching requests by `delay_ms` before serving them.
    pub async fn inject_delay(&self, method: &str, path: &str, delay_ms: u64, times: u32) -> Result<()> {
        self.arm(serde_json::json!({
            "method": method,
            "path": path,
            "delay_ms": delay_ms,
            "times": times,
        }))
        .await
    }

    async fn arm(&self, fault: serde_json::Value) -> Result<()> {
        self.http
            .post(format!("{}/__faults", self.base_url))
            .json(&fault)
            .send()
            .await
            .context("inject fault")?
            .error_for_status()
            .context("inject fault status")?;
        Ok(())
    }
}

/// Splits `"METHOD /a/b/c"` into the method and the path with ids replaced by `:id`.
pub fn shape(call: &str) -> String {
    let (method, path) = call.split_once(' ').unwrap_or((call, ""));
    let path: Vec<&str> = path
        .split('/')
        .map(|seg| {
            if seg.len() == 24 && seg.chars().all(|c| c.is_ascii_hexdigit()) {
                ":id"
            } else {
                seg
            }
        })
        .collect();
    format!("{} {}", method, path.join("/"))
}
