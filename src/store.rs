//! Local mirror of synchronised projects.
//!
//! The repository only talks to the cache through [`ProjectCache`]; the
//! remote service stays authoritative and the cache is rewritten after every
//! successful save.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::model::{LocalId, ProjectSnapshot};

const PROJECTS_DIR: &str = "projects";

/// Write-through mirror consumed by the repository.
///
/// Calls are blocking; the repository runs them off the async workers.
pub trait ProjectCache: Send + Sync {
    /// Stores `project` and returns the snapshot as the cache now holds it.
    fn save(&self, project: &ProjectSnapshot) -> Result<ProjectSnapshot>;

    fn read(&self, id: &LocalId) -> Result<Option<ProjectSnapshot>>;

    fn list(&self) -> Result<Vec<ProjectSnapshot>>;

    /// Removing an unknown project is not an error.
    fn remove(&self, id: &LocalId) -> Result<()>;
}

/// One pretty-printed JSON file per project under `<root>/projects/`.
#[derive(Clone, Debug)]
pub struct FolderCache {
    root: PathBuf,
}

impl FolderCache {
    pub fn open(root: &Path) -> Result<Self> {
        fs::create_dir_all(root.join(PROJECTS_DIR))
            .with_context(|| format!("create cache dir {}", root.display()))?;
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn project_path(&self, id: &LocalId) -> PathBuf {
        self.root.join(PROJECTS_DIR).join(format!("{}.json", id))
    }
}

impl ProjectCache for FolderCache {
    fn save(&self, project: &ProjectSnapshot) -> Result<ProjectSnapshot> {
        let bytes = serde_json::to_vec_pretty(project).context("serialize project")?;
        let path = self.project_path(&project.id);
        write_atomic(&path, &bytes).with_context(|| format!("write {}", path.display()))?;
        // Hand back what a later read would see.
        self.read(&project.id)?
            .with_context(|| format!("project {} vanished after write", project.id))
    }

    fn read(&self, id: &LocalId) -> Result<Option<ProjectSnapshot>> {
        let path = self.project_path(id);
        if !path.exists() {
            return Ok(None);
        }
        let bytes = fs::read(&path).with_context(|| format!("read {}", path.display()))?;
        let project = serde_json::from_slice(&bytes)
            .with_context(|| format!("parse {}", path.display()))?;
        Ok(Some(project))
    }

    fn list(&self) -> Result<Vec<ProjectSnapshot>> {
        let dir = self.root.join(PROJECTS_DIR);
        let mut out = Vec::new();
        for entry in fs::read_dir(&dir).with_context(|| format!("read {}", dir.display()))? {
            let entry = entry.context("read cache dir entry")?;
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }
            let bytes = fs::read(&path).with_context(|| format!("read {}", path.display()))?;
            let project: ProjectSnapshot = serde_json::from_slice(&bytes)
                .with_context(|| format!("parse {}", path.display()))?;
            out.push(project);
        }
        out.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(out)
    }

    fn remove(&self, id: &LocalId) -> Result<()> {
        let path = self.project_path(id);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err).with_context(|| format!("remove {}", path.display())),
        }
    }
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("create parent directories")?;
    }
    let tmp = path.with_extension(format!("tmp.{}", std::process::id()));
    fs::write(&tmp, bytes).with_context(|| format!("write temp file {}", tmp.display()))?;
    fs::rename(&tmp, path)
        .with_context(|| format!("rename {} -> {}", tmp.display(), path.display()))?;
    Ok(())
}

#[cfg(test)]
#[path = "tests/store_tests.rs"]
mod tests;
