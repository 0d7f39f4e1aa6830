//! Project CRUD, search and change probing.

use super::*;

impl RemoteClient {
    pub async fn search_projects(&self, filter: &SearchFilter) -> Result<Vec<Project>> {
        let list: ProjectList = self
            .post(
                Call::new(EntityKind::Project, "search projects"),
                "uisrv/projects/search",
                filter,
            )
            .await?;
        Ok(list.projects)
    }

    pub async fn create_project(&self, project: &Project) -> Result<Project> {
        let created: ProjectEnvelope = self
            .post(
                Call::new(EntityKind::Project, "create project"),
                "uisrv/projects",
                project,
            )
            .await?;
        Ok(created.project)
    }

    pub async fn read_project(&self, project_id: &str) -> Result<Project> {
        self.get(
            Call::new(EntityKind::Project, "read project").on(project_id),
            &format!("dxpm/projects/{}", project_id),
        )
        .await
    }

    /// Pushes `project` using the version it carries; a stale version fails.
    pub async fn update_project(&self, project: &Project) -> Result<Project> {
        let id = require_id(project.id.as_deref(), EntityKind::Project, "update")?;
        self.put(
            Call::new(EntityKind::Project, "update project").on(id),
            &format!("dxpm/projects/{}", id),
            project,
        )
        .await
    }

    pub async fn delete_project(&self, project_id: &str) -> Result<Project> {
        self.delete(
            Call::new(EntityKind::Project, "delete project").on(project_id),
            &format!("dxpm/projects/{}", project_id),
        )
        .await
    }

    pub async fn project_last_changes(&self, project_id: &str) -> Result<ProjectLastChanges> {
        self.post_empty(
            Call::new(EntityKind::Project, "project last changes").on(project_id),
            &format!("dxpm/projects/{}/last-changes", project_id),
        )
        .await
    }
}
