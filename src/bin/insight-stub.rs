//! In-memory stand-in for the remote project service, for development and tests.

use std::collections::HashSet;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use clap::Parser;
use serde_json::{Value, json};
use tokio::sync::RwLock;
use tracing::info;

#[path = "insight_stub/http_error.rs"]
mod http_error;
use self::http_error::*;
#[path = "insight_stub/db.rs"]
mod db;
use self::db::*;
#[path = "insight_stub/auth.rs"]
mod auth;
use self::auth::*;
#[path = "insight_stub/debug.rs"]
mod debug;
use self::debug::*;
#[path = "insight_stub/handlers_projects.rs"]
mod handlers_projects;
use self::handlers_projects::*;
#[path = "insight_stub/handlers_missions.rs"]
mod handlers_missions;
use self::handlers_missions::*;
#[path = "insight_stub/handlers_annotations.rs"]
mod handlers_annotations;
use self::handlers_annotations::*;
#[path = "insight_stub/handlers_datasets.rs"]
mod handlers_datasets;
use self::handlers_datasets::*;
#[path = "insight_stub/routes.rs"]
mod routes;
use self::routes::*;

struct AppState {
    username: String,
    password: String,
    login_delay: Duration,

    tokens: RwLock<HashSet<String>>,
    db: RwLock<Db>,

    // Debug surface.
    calls: RwLock<Vec<String>>,
    faults: RwLock<Vec<Fault>>,
}

#[derive(Parser)]
struct Args {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:8080")]
    addr: SocketAddr,

    /// Write bound address to this file (dev/test convenience)
    #[arg(long)]
    addr_file: Option<PathBuf>,

    /// Accepted user name
    #[arg(long, default_value = "dev")]
    username: String,

    /// Accepted password
    #[arg(long, default_value = "dev")]
    password: String,

    /// Delay every token exchange by this many milliseconds
    #[arg(long, default_value_t = 0)]
    login_delay_ms: u64,
}

#[tokio::main]
async fn main() {
    insight_sync::logging::init("info");
    if let Err(err) = run().await {
        eprintln!("{:#}", err);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let args = Args::parse();

    let state = Arc::new(AppState {
        username: args.username,
        password: args.password,
        login_delay: Duration::from_millis(args.login_delay_ms),
        tokens: RwLock::new(HashSet::new()),
        db: RwLock::new(Db::default()),
        calls: RwLock::new(Vec::new()),
        faults: RwLock::new(Vec::new()),
    });

    let app = Router::new()
        .route("/healthz", get(healthz))
        .route("/__calls", get(list_calls).delete(clear_calls))
        .route("/__faults", post(add_fault))
        .merge(api_router(state.clone()))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(args.addr)
        .await
        .with_context(|| format!("bind {}", args.addr))?;

    let local_addr = listener.local_addr().context("read listener local addr")?;
    info!(%local_addr, "insight-stub listening");

    if let Some(addr_file) = &args.addr_file {
        std::fs::write(addr_file, local_addr.to_string())
            .with_context(|| format!("write addr file {}", addr_file.display()))?;
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

async fn healthz() -> Json<Value> {
    Json(json!({"status": "ok"}))
}
