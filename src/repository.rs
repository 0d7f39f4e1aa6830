//! Public create/save/delete/query surface over the project service.
//!
//! Every operation runs as a spawned tokio task and is handed back as a
//! [`SyncTask`]; the caller awaits it (or drops it) without blocking. Saves
//! walk the project graph parent-first and commit each entity independently:
//! a failed save leaves an unknown prefix of the graph persisted remotely.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::{EntityKind, PersistenceError, Result};
use crate::mapping::{IdentityMap, ProjectConverter};
use crate::model::{LocalId, ProjectSnapshot, SyncConfig, UserSnapshot};
use crate::remote::{RemoteClient, Session};
use crate::store::ProjectCache;

mod query;
mod save;
mod task;

pub use self::task::SyncTask;

/// Which remote projects a query hydrates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProjectQuery {
    All,
    /// Only the project linked to this local id; empty if it was never synced.
    ById(LocalId),
    /// Projects whose name matches exactly.
    ByName(String),
}

#[derive(Clone)]
pub struct InsightRepository {
    inner: Arc<RepositoryInner>,
}

struct RepositoryInner {
    session: Session,
    client: RemoteClient,
    identity: Arc<IdentityMap>,
    converter: ProjectConverter,
    cache: Arc<dyn ProjectCache>,
    strict_conflict_status: bool,
}

impl InsightRepository {
    pub fn new(config: SyncConfig, cache: Arc<dyn ProjectCache>) -> Result<Self> {
        let session = Session::new(&config)?;
        let client = RemoteClient::new(&config, session.clone());
        let identity = Arc::new(IdentityMap::new());
        Ok(Self {
            inner: Arc::new(RepositoryInner {
                session,
                client,
                converter: ProjectConverter::new(identity.clone()),
                identity,
                cache,
                strict_conflict_status: config.strict_conflict_status,
            }),
        })
    }

    pub fn session(&self) -> &Session {
        &self.inner.session
    }

    pub fn client(&self) -> &RemoteClient {
        &self.inner.client
    }

    pub fn identity(&self) -> &IdentityMap {
        &self.inner.identity
    }

    /// Creates an empty project owned by the session user and saves it.
    pub fn create(&self, name: &str) -> SyncTask<ProjectSnapshot> {
        let owner = UserSnapshot {
            id: LocalId::new(),
            name: self.inner.session.username().to_string(),
        };
        self.save(ProjectSnapshot::new(name, owner))
    }

    /// Pushes `project` and its children, then mirrors it into the cache.
    ///
    /// Resolves to the snapshot as stored by the cache.
    pub fn save(&self, project: ProjectSnapshot) -> SyncTask<ProjectSnapshot> {
        self.save_with_cancel(project, CancellationToken::new())
    }

    /// Like [`InsightRepository::save`], checking `cancel` before each entity.
    ///
    /// Entities pushed before cancellation stay committed.
    pub fn save_with_cancel(
        &self,
        project: ProjectSnapshot,
        cancel: CancellationToken,
    ) -> SyncTask<ProjectSnapshot> {
        let inner = self.inner.clone();
        SyncTask::spawn(async move {
            inner.session.login().await;
            info!(project = %project.id, name = %project.name, "saving project");
            inner.save_project(&project, &cancel).await?;
            let mirrored = inner.mirror(project).await?;
            info!(project = %mirrored.id, "project saved");
            Ok(mirrored)
        })
    }

    /// Deletes the remote project linked to `id`; unknown ids are a no-op.
    ///
    /// The id mapping is kept so later back-references stay consistent.
    pub fn delete(&self, id: LocalId) -> SyncTask<()> {
        let inner = self.inner.clone();
        SyncTask::spawn(async move {
            let Some(remote) = inner.identity.remote_id_for(&id) else {
                debug!(project = %id, "delete skipped: project never synced");
                return Ok(());
            };
            inner.session.login().await;
            inner.client.delete_project(remote.as_str()).await?;
            inner.forget(id).await?;
            info!(project = %id, remote_id = %remote, "project deleted");
            Ok(())
        })
    }

    /// Fetches and fully hydrates the matching remote projects.
    pub fn query(&self, query: ProjectQuery) -> SyncTask<Vec<ProjectSnapshot>> {
        let inner = self.inner.clone();
        SyncTask::spawn(async move {
            inner.session.login().await;
            let projects = inner.query_projects(&query).await?;
            info!(count = projects.len(), ?query, "query complete");
            Ok(projects)
        })
    }
}

impl RepositoryInner {
    async fn mirror(&self, project: ProjectSnapshot) -> Result<ProjectSnapshot> {
        let cache = self.cache.clone();
        tokio::task::spawn_blocking(move || cache.save(&project))
            .await
            .map_err(|e| PersistenceError::Background(e.to_string()))?
            .map_err(|e| PersistenceError::Cache(format!("{:#}", e)))
    }

    async fn forget(&self, id: LocalId) -> Result<()> {
        let cache = self.cache.clone();
        tokio::task::spawn_blocking(move || cache.remove(&id))
            .await
            .map_err(|e| PersistenceError::Background(e.to_string()))?
            .map_err(|e| PersistenceError::Cache(format!("{:#}", e)))
    }

    /// Translates a conflict on any entity into the project-level condition.
    ///
    /// Unless strict conflict statuses are configured, a plain 400 on an
    /// update is read as a stale version.
    fn conflict(
        &self,
        err: PersistenceError,
        project: LocalId,
        kind: EntityKind,
        updating: bool,
    ) -> PersistenceError {
        let outdated = match &err {
            PersistenceError::Outdated { .. } => true,
            PersistenceError::InvalidFormat(_) => updating && !self.strict_conflict_status,
            _ => false,
        };
        if !outdated {
            return err;
        }
        warn!(project = %project, %kind, error = %err, "save aborted: project outdated");
        PersistenceError::ProjectOutdated { project, kind }
    }
}

#[cfg(test)]
#[path = "tests/repository_tests.rs"]
mod tests;
