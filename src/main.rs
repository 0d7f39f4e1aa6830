use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};

use insight_sync::model::{ProjectSnapshot, SyncConfig};
use insight_sync::store::FolderCache;
use insight_sync::{InsightRepository, ProjectQuery, logging};

const DEFAULT_CACHE_DIR: &str = ".insight-cache";

#[derive(Parser)]
#[command(name = "insight-sync")]
#[command(about = "Synchronise survey projects with the project service", long_about = None)]
struct Cli {
    /// JSON config file; flags override its values
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Base URL of the project service
    #[arg(long, global = true, env = "INSIGHT_HOST")]
    host: Option<String>,

    #[arg(long, global = true, env = "INSIGHT_USERNAME")]
    username: Option<String>,

    #[arg(long, global = true, env = "INSIGHT_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Local mirror directory (defaults to .insight-cache)
    #[arg(long, global = true)]
    cache_dir: Option<PathBuf>,

    /// Skip TLS certificate validation (development servers only)
    #[arg(long, global = true)]
    accept_invalid_certs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check the configured credentials
    Login,

    /// Create an empty project
    Create {
        name: String,
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },

    /// List remote projects with their missions
    List {
        /// Only projects with exactly this name
        #[arg(long)]
        name: Option<String>,
        /// Emit JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete every remote project with the given name
    Delete {
        #[arg(long)]
        name: String,
    },
}

#[tokio::main]
async fn main() {
    logging::init("warn");
    if let Err(err) = run().await {
        eprintln!("{:#}", err);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = resolve_config(&cli)?;

    let cache_dir = cli
        .cache_dir
        .clone()
        .or_else(|| config.cache_dir.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CACHE_DIR));
    let cache = FolderCache::open(&cache_dir).context("open local cache")?;
    let repo = InsightRepository::new(config, Arc::new(cache)).context("set up repository")?;

    match cli.command {
        Commands::Login => {
            let session = repo.session();
            if !session.login().await {
                return Err(anyhow!("login failed for {}", session.username()));
            }
            println!("Logged in as {}", session.username());
        }
        Commands::Create { name, json } => {
            let project = repo
                .create(&name)
                .await
                .with_context(|| format!("create project {}", name))?;
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&project).context("serialize project")?
                );
            } else {
                println!("Created project {} ({})", project.name, project.id);
            }
        }
        Commands::List { name, json } => {
            let query = match name {
                Some(name) => ProjectQuery::ByName(name),
                None => ProjectQuery::All,
            };
            let projects = repo.query(query).await.context("list projects")?;
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&projects).context("serialize projects")?
                );
            } else if projects.is_empty() {
                println!("No projects");
            } else {
                for project in &projects {
                    println!("{}", summary_line(project));
                }
            }
        }
        Commands::Delete { name } => {
            let projects = repo
                .query(ProjectQuery::ByName(name.clone()))
                .await
                .with_context(|| format!("find project {}", name))?;
            for project in &projects {
                repo.delete(project.id)
                    .await
                    .with_context(|| format!("delete project {}", project.id))?;
            }
            println!("Deleted {} project(s) named {}", projects.len(), name);
        }
    }

    Ok(())
}

fn resolve_config(cli: &Cli) -> Result<SyncConfig> {
    let mut config = match &cli.config {
        Some(path) => SyncConfig::load(path)?,
        None => {
            let host = cli
                .host
                .as_deref()
                .ok_or_else(|| anyhow!("missing --host (or a --config file)"))?;
            let username = cli
                .username
                .as_deref()
                .ok_or_else(|| anyhow!("missing --username (or a --config file)"))?;
            let mut config = SyncConfig::new(host, username, "");
            config.password = None;
            config
        }
    };

    if let Some(host) = &cli.host {
        config.host = host.clone();
    }
    if let Some(username) = &cli.username {
        config.username = username.clone();
    }
    if let Some(password) = &cli.password {
        config.password = Some(password.clone());
    }
    if cli.accept_invalid_certs {
        config.accept_invalid_certs = true;
    }
    Ok(config)
}

fn summary_line(project: &ProjectSnapshot) -> String {
    let goals: usize = project.missions.iter().map(|m| m.goals.len()).sum();
    let plans: usize = project.missions.iter().map(|m| m.flight_plans.len()).sum();
    format!(
        "{}  {}  missions={} goals={} flight_plans={} flights={}",
        project.id,
        project.name,
        project.missions.len(),
        goals,
        plans,
        project.flights.len()
    )
}
