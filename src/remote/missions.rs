//! Mission CRUD and search.

use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use super::*;

impl RemoteClient {
    /// Creates a bare mission under `project_id`.
    ///
    /// The service only accepts name, creation time and parent on create;
    /// the remaining fields have to be pushed with [`RemoteClient::update_mission`].
    pub async fn create_mission(&self, project_id: &str, mission: &Mission) -> Result<Mission> {
        let created = OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .map_err(|e| PersistenceError::InvalidFormat(format!("format timestamp: {}", e)))?;
        let body = CreateMissionRequest {
            name: mission.name.clone(),
            created,
            project: ProjectRef {
                id: project_id.to_string(),
            },
        };
        self.post(
            Call::new(EntityKind::Mission, "create mission"),
            "dxpm/missions",
            &body,
        )
        .await
    }

    pub async fn read_mission(&self, mission_id: &str) -> Result<Mission> {
        self.get(
            Call::new(EntityKind::Mission, "read mission").on(mission_id),
            &format!("dxpm/missions/{}", mission_id),
        )
        .await
    }

    pub async fn update_mission(&self, mission: &Mission) -> Result<Mission> {
        let id = require_id(mission.id.as_deref(), EntityKind::Mission, "update")?;
        self.put(
            Call::new(EntityKind::Mission, "update mission").on(id),
            &format!("dxpm/missions/{}", id),
            mission,
        )
        .await
    }

    pub async fn search_missions(&self, filter: &SearchFilter) -> Result<Vec<Mission>> {
        let list: MissionList = self
            .post(
                Call::new(EntityKind::Mission, "search missions"),
                "dxpm/missions/search",
                filter,
            )
            .await?;
        Ok(list.missions)
    }
}
