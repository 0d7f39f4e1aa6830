use tracing::debug;

use super::{ProjectQuery, RepositoryInner};
use crate::error::{PersistenceError, Result};
use crate::model::ProjectSnapshot;
use crate::remote::{HydratedMission, HydratedProject, Project, SearchFilter};

impl RepositoryInner {
    pub(super) async fn query_projects(&self, query: &ProjectQuery) -> Result<Vec<ProjectSnapshot>> {
        let projects = match query {
            ProjectQuery::All => self.client.search_projects(&SearchFilter::all()).await?,
            ProjectQuery::ByName(name) => {
                let mut found = self.client.search_projects(&SearchFilter::by_name(name)).await?;
                // Server-side search is a substring match.
                found.retain(|p| &p.name == name);
                found
            }
            ProjectQuery::ById(local) => match self.identity.remote_id_for(local) {
                Some(remote) => vec![self.client.read_project(remote.as_str()).await?],
                None => {
                    debug!(project = %local, "query by id: project never synced");
                    return Ok(Vec::new());
                }
            },
        };

        let mut out = Vec::with_capacity(projects.len());
        for project in projects {
            let hydrated = self.hydrate(project).await?;
            out.push(self.converter.project_from_wire(&hydrated));
        }
        Ok(out)
    }

    /// Eagerly fetches every mission with its goals and flight plans, plus
    /// the project's flights.
    async fn hydrate(&self, project: Project) -> Result<HydratedProject> {
        let project_id = project
            .id
            .clone()
            .ok_or_else(|| PersistenceError::Decode(format!("project {} without _id", project.name)))?;

        let mut missions = Vec::new();
        for mission in self
            .client
            .search_missions(&SearchFilter::by_project(&project_id))
            .await?
        {
            let Some(mission_id) = mission.id.clone() else {
                return Err(PersistenceError::Decode(format!(
                    "mission {} without _id",
                    mission.name
                )));
            };
            let filter = SearchFilter::by_mission(&project_id, &mission_id);
            let annotations = self.client.search_annotations(&filter).await?;
            let flight_plans = self.client.search_flight_plans(&filter).await?;
            missions.push(HydratedMission {
                mission,
                annotations,
                flight_plans,
            });
        }

        let flights = self
            .client
            .search_flights(&SearchFilter::by_project(&project_id))
            .await?;
        debug!(
            remote_id = %project_id,
            missions = missions.len(),
            flights = flights.len(),
            "project hydrated"
        );
        Ok(HydratedProject {
            project,
            missions,
            flights,
        })
    }
}
