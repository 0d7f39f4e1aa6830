//! Parent-first save walk.
//!
//! Order: project, then per mission the mission itself, its goals and its
//! flight plans, then the project's flights. Each entity is created when it
//! has no remote id yet and updated with its last recorded version otherwise;
//! a linked entity whose version is unknown is never updated.

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::RepositoryInner;
use crate::error::{EntityKind, PersistenceError, Result};
use crate::model::{
    FlightPlanSnapshot, FlightSnapshot, GoalSnapshot, LocalId, MissionSnapshot, ProjectSnapshot,
    RemoteId,
};
use crate::remote::WireEntity;

impl RepositoryInner {
    pub(super) async fn save_project(
        &self,
        project: &ProjectSnapshot,
        cancel: &CancellationToken,
    ) -> Result<()> {
        checkpoint(cancel, project.id)?;
        let project_rid = self.sync_project(project).await?;

        for mission in &project.missions {
            checkpoint(cancel, project.id)?;
            let mission_rid = self.sync_mission(project.id, &project_rid, mission).await?;

            for goal in &mission.goals {
                checkpoint(cancel, project.id)?;
                self.sync_goal(project.id, &project_rid, &mission_rid, goal)
                    .await?;
            }
            for flight_plan in &mission.flight_plans {
                checkpoint(cancel, project.id)?;
                self.sync_flight_plan(project.id, &project_rid, &mission_rid, flight_plan)
                    .await?;
            }
        }

        for flight in &project.flights {
            checkpoint(cancel, project.id)?;
            self.sync_flight(project.id, &project_rid, flight).await?;
        }
        Ok(())
    }

    async fn sync_project(&self, project: &ProjectSnapshot) -> Result<RemoteId> {
        let wire = self.converter.project_to_wire(project);
        let saved = if wire.id.is_none() {
            debug!(project = %project.id, "creating project");
            self.client
                .create_project(&wire)
                .await
                .map_err(|e| self.conflict(e, project.id, EntityKind::Project, false))?
        } else {
            debug!(project = %project.id, version = ?wire.v, "updating project");
            require_version(wire.v, project.id, EntityKind::Project)?;
            self.client
                .update_project(&wire)
                .await
                .map_err(|e| self.conflict(e, project.id, EntityKind::Project, true))?
        };
        self.record(project.id, &saved)
    }

    async fn sync_mission(
        &self,
        project: LocalId,
        project_rid: &RemoteId,
        mission: &MissionSnapshot,
    ) -> Result<RemoteId> {
        let wire = self.converter.mission_to_wire(mission, project_rid);
        let kind = EntityKind::Mission;

        if wire.id.is_some() {
            debug!(mission = %mission.id, version = ?wire.v, "updating mission");
            require_version(wire.v, project, kind)?;
            let updated = self
                .client
                .update_mission(&wire)
                .await
                .map_err(|e| self.conflict(e, project, kind, true))?;
            return self.record(mission.id, &updated);
        }

        debug!(mission = %mission.id, "creating mission");
        let created = self
            .client
            .create_mission(project_rid.as_str(), &wire)
            .await
            .map_err(|e| self.conflict(e, project, kind, false))?;
        let mission_rid = self.record(mission.id, &created)?;

        // The create body is reduced; read the canonical state back and push
        // the full local mission on top of it.
        let canonical = self
            .client
            .read_mission(mission_rid.as_str())
            .await
            .map_err(|e| self.conflict(e, project, kind, false))?;
        self.record(mission.id, &canonical)?;
        let wire = self.converter.mission_to_wire(mission, project_rid);
        let reconciled = self
            .client
            .update_mission(&wire)
            .await
            .map_err(|e| self.conflict(e, project, kind, true))?;
        self.record(mission.id, &reconciled)
    }

    async fn sync_goal(
        &self,
        project: LocalId,
        project_rid: &RemoteId,
        mission_rid: &RemoteId,
        goal: &GoalSnapshot,
    ) -> Result<RemoteId> {
        let wire = self.converter.goal_to_wire(goal, project_rid, mission_rid);

        let saved = if wire.id.is_some() {
            debug!(goal = %goal.id, version = ?wire.v, "updating goal");
            require_version(wire.v, project, EntityKind::Annotation)?;
            self.client
                .update_annotation(&wire)
                .await
                .map_err(|e| self.conflict(e, project, EntityKind::Annotation, true))?
        } else {
            debug!(goal = %goal.id, "creating goal");
            match self.client.create_annotation(&wire).await {
                Ok(created) => created,
                Err(PersistenceError::PartiallyCreated {
                    kind,
                    remote_id,
                    version,
                    source,
                }) => {
                    // Link the unconfigured annotation so a retried save
                    // configures it instead of creating another one.
                    let remote = RemoteId(remote_id.clone());
                    self.identity.bind(goal.id, remote.clone());
                    if let Some(version) = version {
                        self.identity.record_version(&remote, version);
                    }
                    warn!(goal = %goal.id, %remote_id, ?version, "goal left unconfigured");
                    return Err(PersistenceError::PartiallyCreated {
                        kind,
                        remote_id,
                        version,
                        source,
                    });
                }
                Err(e) => return Err(self.conflict(e, project, EntityKind::Annotation, false)),
            }
        };
        self.record(goal.id, &saved)
    }

    async fn sync_flight_plan(
        &self,
        project: LocalId,
        project_rid: &RemoteId,
        mission_rid: &RemoteId,
        flight_plan: &FlightPlanSnapshot,
    ) -> Result<RemoteId> {
        let wire = self
            .converter
            .flight_plan_to_wire(flight_plan, project_rid, mission_rid);
        let saved = if wire.id.is_some() {
            debug!(flight_plan = %flight_plan.id, version = ?wire.v, "updating flight plan");
            require_version(wire.v, project, EntityKind::FlightPlan)?;
            self.client
                .update_flight_plan(&wire)
                .await
                .map_err(|e| self.conflict(e, project, EntityKind::FlightPlan, true))?
        } else {
            debug!(flight_plan = %flight_plan.id, "creating flight plan");
            self.client
                .create_flight_plan(&wire)
                .await
                .map_err(|e| self.conflict(e, project, EntityKind::FlightPlan, false))?
        };
        self.record(flight_plan.id, &saved)
    }

    async fn sync_flight(
        &self,
        project: LocalId,
        project_rid: &RemoteId,
        flight: &FlightSnapshot,
    ) -> Result<RemoteId> {
        let wire = self.converter.flight_to_wire(flight, project_rid);
        let saved = if wire.id.is_some() {
            debug!(flight = %flight.id, version = ?wire.v, "updating flight");
            require_version(wire.v, project, EntityKind::Flight)?;
            self.client
                .update_flight(&wire)
                .await
                .map_err(|e| self.conflict(e, project, EntityKind::Flight, true))?
        } else {
            debug!(flight = %flight.id, "creating flight");
            self.client
                .create_flight(&wire)
                .await
                .map_err(|e| self.conflict(e, project, EntityKind::Flight, false))?
        };
        self.record(flight.id, &saved)
    }

    /// Links `local` to the id the server returned and records its version.
    fn record<E: WireEntity>(&self, local: LocalId, entity: &E) -> Result<RemoteId> {
        let remote = entity.remote_id().map(RemoteId::from).ok_or_else(|| {
            PersistenceError::Decode(format!("{} response without _id", E::KIND))
        })?;
        self.identity.bind(local, remote.clone());
        if let Some(version) = entity.version() {
            self.identity.record_version(&remote, version);
        }
        Ok(remote)
    }
}

fn checkpoint(cancel: &CancellationToken, project: LocalId) -> Result<()> {
    if cancel.is_cancelled() {
        info!(project = %project, "save cancelled");
        return Err(PersistenceError::Cancelled);
    }
    Ok(())
}

/// Linked entities are only updated against a version observed from the server.
fn require_version(version: Option<u64>, project: LocalId, kind: EntityKind) -> Result<()> {
    if version.is_none() {
        warn!(project = %project, %kind, "update refused: remote version unknown");
        return Err(PersistenceError::ProjectOutdated { project, kind });
    }
    Ok(())
}
