//! Snapshot <-> wire conversion, filling ids and versions from the [`IdentityMap`].

use std::sync::Arc;

use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use super::IdentityMap;
use crate::model::{
    AoiParameters, DEFAULT_EPSG, FlightPlanSnapshot, FlightSnapshot, GeoPoint, GoalSnapshot,
    LocalId, MissionSnapshot, Point3, ProjectSnapshot, RemoteId, UserSnapshot, WaypointSnapshot,
};
use crate::remote::{
    Annotation, AnnotationParameters, Feature, Flight, FlightPlan, Geometry, HydratedMission,
    HydratedProject, Mission, Project, Target, User, Waypoint, WireEntity,
};

const FLIGHT_PLAN_TYPE: &str = "SURVEY";

#[derive(Clone)]
pub struct ProjectConverter {
    identity: Arc<IdentityMap>,
}

impl ProjectConverter {
    pub fn new(identity: Arc<IdentityMap>) -> Self {
        Self { identity }
    }

    pub fn identity(&self) -> &IdentityMap {
        &self.identity
    }

    /// Remote id and cached version for a local entity.
    fn remote_of(&self, local: &LocalId) -> (Option<String>, Option<u64>) {
        match self.identity.remote_id_for(local) {
            Some(remote) => {
                let v = self.identity.version_of(&remote);
                (Some(remote.0), v)
            }
            None => (None, None),
        }
    }

    pub fn project_to_wire(&self, project: &ProjectSnapshot) -> Project {
        let (id, v) = self.remote_of(&project.id);
        let epsg = if project.srs_epsg.is_empty() {
            DEFAULT_EPSG.to_string()
        } else {
            project.srs_epsg.clone()
        };
        Project {
            id,
            v,
            name: project.name.clone(),
            epsg: Some(epsg),
            created: format_timestamp(project.created),
            modification_date: format_timestamp(project.modified),
            user: Some(self.user_to_wire(&project.owner)),
        }
    }

    fn user_to_wire(&self, user: &UserSnapshot) -> User {
        User {
            id: self.identity.remote_id_for(&user.id).map(|r| r.0),
            display_name: Some(user.name.clone()),
        }
    }

    pub fn mission_to_wire(&self, mission: &MissionSnapshot, project: &RemoteId) -> Mission {
        let (id, v) = self.remote_of(&mission.id);
        Mission {
            id,
            v,
            name: mission.name.clone(),
            reference_point: vec![mission.origin_lat, mission.origin_lon],
            project: Some(project.0.clone()),
            created: None,
            cameras: Vec::new(),
        }
    }

    pub fn goal_to_wire(
        &self,
        goal: &GoalSnapshot,
        project: &RemoteId,
        mission: &RemoteId,
    ) -> Annotation {
        let (id, v) = self.remote_of(&goal.id);

        // GeoJSON rings are closed: the first corner is repeated at the end.
        let mut ring: Vec<Vec<f64>> = goal.corners.iter().map(|p| vec![p.lon, p.lat]).collect();
        if let Some(first) = goal.corners.first() {
            ring.push(vec![first.lon, first.lat]);
        }
        let coordinates = if ring.is_empty() { Vec::new() } else { vec![ring] };

        let params = &goal.parameters;
        Annotation {
            id,
            v,
            project_id: Some(project.0.clone()),
            mission_id: Some(mission.0.clone()),
            feature: Some(Feature {
                kind: "Feature".to_string(),
                geometry: Geometry {
                    kind: "Polygon".to_string(),
                    coordinates,
                },
            }),
            target: Some(Target {
                kind: "2d".to_string(),
            }),
            parameters: Some(AnnotationParameters {
                name: goal.name.clone(),
                gsd: params.gsd,
                distance: params.distance,
                forward_overlap: params.forward_overlap,
                forward_overlap_min: params.forward_overlap_min,
                lateral_overlap: params.lateral_overlap,
                lateral_overlap_min: params.lateral_overlap_min,
            }),
            created_date: None,
            modified_date: None,
        }
    }

    pub fn flight_plan_to_wire(
        &self,
        flight_plan: &FlightPlanSnapshot,
        project: &RemoteId,
        mission: &RemoteId,
    ) -> FlightPlan {
        let (id, v) = self.remote_of(&flight_plan.id);
        FlightPlan {
            id,
            v,
            project_id: Some(project.0.clone()),
            mission_id: Some(mission.0.clone()),
            name: flight_plan.name.clone(),
            kind: Some(FLIGHT_PLAN_TYPE.to_string()),
            takeoff: point_to_wire(&flight_plan.takeoff),
            landing: point_to_wire(&flight_plan.landing),
            safety_altitude: Some(flight_plan.safety_altitude),
            max_ground_speed: Some(flight_plan.max_ground_speed),
            waypoints: flight_plan
                .waypoints
                .iter()
                .map(|w| Waypoint {
                    target_point: point_to_wire(&w.target),
                    drone_point: point_to_wire(&w.drone),
                    warning: w.warning.clone(),
                })
                .collect(),
            hw_config: flight_plan.hw_config.clone(),
        }
    }

    pub fn flight_to_wire(&self, flight: &FlightSnapshot, project: &RemoteId) -> Flight {
        let (id, v) = self.remote_of(&flight.id);
        Flight {
            id,
            v,
            project: Some(project.0.clone()),
            name: flight.name.clone(),
            survey_date: format_timestamp(flight.survey_date),
            cameras: flight.photos.clone(),
            logs: flight.logs.clone(),
        }
    }

    /// Materialises a hydrated remote project as a local snapshot.
    ///
    /// Every entity seen here is linked to a local id (minted on first sight)
    /// and its version is recorded.
    pub fn project_from_wire(&self, hydrated: &HydratedProject) -> ProjectSnapshot {
        let project = &hydrated.project;
        ProjectSnapshot {
            id: self.observe(project),
            name: project.name.clone(),
            owner: self.user_from_wire(project.user.as_ref()),
            srs_epsg: project
                .epsg
                .clone()
                .unwrap_or_else(|| DEFAULT_EPSG.to_string()),
            created: parse_timestamp(project.created.as_deref()),
            modified: parse_timestamp(project.modification_date.as_deref()),
            missions: hydrated
                .missions
                .iter()
                .map(|m| self.mission_from_wire(m))
                .collect(),
            flights: hydrated
                .flights
                .iter()
                .map(|f| self.flight_from_wire(f))
                .collect(),
        }
    }

    fn mission_from_wire(&self, hydrated: &HydratedMission) -> MissionSnapshot {
        let mission = &hydrated.mission;
        let (origin_lat, origin_lon) = match mission.reference_point.as_slice() {
            [lat, lon] => (*lat, *lon),
            _ => (0.0, 0.0),
        };
        MissionSnapshot {
            id: self.observe(mission),
            name: mission.name.clone(),
            origin_lat,
            origin_lon,
            goals: hydrated
                .annotations
                .iter()
                .map(|a| self.goal_from_wire(a))
                .collect(),
            flight_plans: hydrated
                .flight_plans
                .iter()
                .map(|fp| self.flight_plan_from_wire(fp))
                .collect(),
        }
    }

    fn goal_from_wire(&self, annotation: &Annotation) -> GoalSnapshot {
        let mut corners = Vec::new();
        if let Some(feature) = &annotation.feature {
            for ring in &feature.geometry.coordinates {
                // Drop the closing corner of each ring.
                if ring.len() > 1 {
                    for corner in &ring[..ring.len() - 1] {
                        if let [lon, lat, ..] = corner.as_slice() {
                            corners.push(GeoPoint {
                                lat: *lat,
                                lon: *lon,
                            });
                        }
                    }
                }
            }
        }

        let params = annotation.parameters.clone().unwrap_or_default();
        GoalSnapshot {
            id: self.observe(annotation),
            name: params.name.clone(),
            corners,
            parameters: AoiParameters {
                gsd: params.gsd,
                distance: params.distance,
                forward_overlap: params.forward_overlap,
                forward_overlap_min: params.forward_overlap_min,
                lateral_overlap: params.lateral_overlap,
                lateral_overlap_min: params.lateral_overlap_min,
            },
        }
    }

    fn flight_plan_from_wire(&self, flight_plan: &FlightPlan) -> FlightPlanSnapshot {
        FlightPlanSnapshot {
            id: self.observe(flight_plan),
            name: flight_plan.name.clone(),
            takeoff: point_from_wire(&flight_plan.takeoff),
            landing: point_from_wire(&flight_plan.landing),
            safety_altitude: flight_plan.safety_altitude.unwrap_or(0.0),
            max_ground_speed: flight_plan.max_ground_speed.unwrap_or(0.0),
            waypoints: flight_plan
                .waypoints
                .iter()
                .map(|w| WaypointSnapshot {
                    target: point_from_wire(&w.target_point),
                    drone: point_from_wire(&w.drone_point),
                    warning: w.warning.clone(),
                })
                .collect(),
            hw_config: flight_plan.hw_config.clone(),
        }
    }

    fn flight_from_wire(&self, flight: &Flight) -> FlightSnapshot {
        FlightSnapshot {
            id: self.observe(flight),
            name: flight.name.clone(),
            survey_date: parse_timestamp(flight.survey_date.as_deref()),
            photos: flight.cameras.clone(),
            logs: flight.logs.clone(),
        }
    }

    fn user_from_wire(&self, user: Option<&User>) -> UserSnapshot {
        let Some(user) = user else {
            return UserSnapshot {
                id: LocalId::new(),
                name: String::new(),
            };
        };
        let id = match &user.id {
            Some(remote) => self.identity.local_id_for(&RemoteId(remote.clone())),
            None => LocalId::new(),
        };
        UserSnapshot {
            id,
            name: user.display_name.clone().unwrap_or_default(),
        }
    }

    fn observe<E: WireEntity>(&self, entity: &E) -> LocalId {
        let Some(remote) = entity.remote_id() else {
            return LocalId::new();
        };
        let remote = RemoteId(remote.to_string());
        if let Some(v) = entity.version() {
            self.identity.record_version(&remote, v);
        }
        self.identity.local_id_for(&remote)
    }
}

fn format_timestamp(ts: OffsetDateTime) -> Option<String> {
    ts.format(&Rfc3339).ok()
}

fn parse_timestamp(raw: Option<&str>) -> OffsetDateTime {
    raw.and_then(|s| OffsetDateTime::parse(s, &Rfc3339).ok())
        .unwrap_or(OffsetDateTime::UNIX_EPOCH)
}

fn point_to_wire(p: &Point3) -> Vec<f64> {
    vec![p.x, p.y, p.z]
}

fn point_from_wire(coords: &[f64]) -> Point3 {
    match coords {
        [x, y, z] => Point3 {
            x: *x,
            y: *y,
            z: *z,
        },
        _ => Point3::default(),
    }
}

#[cfg(test)]
#[path = "../tests/mapping/converter_tests.rs"]
mod tests;
