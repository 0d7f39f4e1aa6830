//! Wire entities and request/response payloads of the project service.

use serde::{Deserialize, Serialize};

use crate::error::EntityKind;

/// Common view over wire entities that carry a remote id and a version.
pub trait WireEntity {
    const KIND: EntityKind;

    fn remote_id(&self) -> Option<&str>;
    fn version(&self) -> Option<u64>;
}

macro_rules! wire_entity {
    ($ty:ty, $kind:expr) => {
        impl WireEntity for $ty {
            const KIND: EntityKind = $kind;

            fn remote_id(&self) -> Option<&str> {
                self.id.as_deref()
            }

            fn version(&self) -> Option<u64> {
                self.v
            }
        }
    };
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Project {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "__v", default, skip_serializing_if = "Option::is_none")]
    pub v: Option<u64>,

    pub name: String,

    #[serde(default)]
    pub epsg: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modification_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
}
wire_entity!(Project, EntityKind::Project);

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Mission {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "__v", default, skip_serializing_if = "Option::is_none")]
    pub v: Option<u64>,

    pub name: String,

    /// `[lat, lon]` of the mission origin.
    #[serde(default)]
    pub reference_point: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    #[serde(default)]
    pub cameras: Vec<String>,
}
wire_entity!(Mission, EntityKind::Mission);

#[derive(Clone, Debug, Serialize)]
pub(super) struct ProjectRef {
    #[serde(rename = "_id")]
    pub(super) id: String,
}

/// Missions are created from a reduced body and completed by a follow-up update.
#[derive(Clone, Debug, Serialize)]
pub(super) struct CreateMissionRequest {
    pub(super) name: String,
    pub(super) created: String,
    pub(super) project: ProjectRef,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    #[serde(rename = "type")]
    pub kind: String,
    /// GeoJSON polygon rings of `[lon, lat]` pairs.
    #[serde(default)]
    pub coordinates: Vec<Vec<Vec<f64>>>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type")]
    pub kind: String,
    pub geometry: Geometry,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Target {
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotationParameters {
    pub name: String,
    pub gsd: f64,
    pub distance: f64,
    pub forward_overlap: f64,
    pub forward_overlap_min: f64,
    pub lateral_overlap: f64,
    pub lateral_overlap_min: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "__v", default, skip_serializing_if = "Option::is_none")]
    pub v: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mission_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature: Option<Feature>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<Target>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<AnnotationParameters>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_date: Option<String>,
}
wire_entity!(Annotation, EntityKind::Annotation);

#[derive(Clone, Debug, Deserialize)]
pub(super) struct AnnotationEnvelope {
    pub(super) annotation: Annotation,
}

#[derive(Clone, Debug, Serialize)]
pub(super) struct AnnotationParametersRequest<'a> {
    #[serde(rename = "__v", skip_serializing_if = "Option::is_none")]
    pub(super) v: Option<u64>,
    pub(super) parameters: &'a AnnotationParameters,
}

#[derive(Clone, Debug, Serialize)]
pub(super) struct AnnotationFeatureRequest<'a> {
    #[serde(rename = "__v", skip_serializing_if = "Option::is_none")]
    pub(super) v: Option<u64>,
    pub(super) feature: &'a Feature,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    #[serde(default)]
    pub target_point: Vec<f64>,
    #[serde(default)]
    pub drone_point: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FlightPlan {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "__v", default, skip_serializing_if = "Option::is_none")]
    pub v: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mission_id: Option<String>,

    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    #[serde(default)]
    pub takeoff: Vec<f64>,
    #[serde(default)]
    pub landing: Vec<f64>,
    #[serde(default)]
    pub safety_altitude: Option<f64>,
    #[serde(default)]
    pub max_ground_speed: Option<f64>,
    #[serde(default)]
    pub waypoints: Vec<Waypoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hw_config: Option<String>,
}
wire_entity!(FlightPlan, EntityKind::FlightPlan);

#[derive(Clone, Debug, Deserialize)]
pub(super) struct FlightPlanEnvelope {
    pub(super) flight_plan: FlightPlan,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Flight {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "__v", default, skip_serializing_if = "Option::is_none")]
    pub v: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,

    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub survey_date: Option<String>,
    /// Photo references.
    #[serde(default)]
    pub cameras: Vec<String>,
    #[serde(default)]
    pub logs: Vec<String>,
}
wire_entity!(Flight, EntityKind::Flight);

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "__v", default, skip_serializing_if = "Option::is_none")]
    pub v: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,

    pub model: String,
    #[serde(default)]
    pub focal_length: Option<f64>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub aspect_ratio: Option<f64>,
}
wire_entity!(Camera, EntityKind::Camera);

/// Filter body accepted by every `.../search` endpoint.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SearchFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mission_id: Option<String>,
}

impl SearchFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn by_name(name: &str) -> Self {
        Self {
            search: Some(name.to_string()),
            ..Self::default()
        }
    }

    pub fn by_project(project_id: &str) -> Self {
        Self {
            project_id: Some(project_id.to_string()),
            ..Self::default()
        }
    }

    pub fn by_mission(project_id: &str, mission_id: &str) -> Self {
        Self {
            project_id: Some(project_id.to_string()),
            mission_id: Some(mission_id.to_string()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct ProjectEnvelope {
    pub(super) project: Project,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct ProjectList {
    #[serde(default)]
    pub(super) projects: Vec<Project>,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct MissionList {
    #[serde(default)]
    pub(super) missions: Vec<Mission>,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct AnnotationList {
    #[serde(default)]
    pub(super) annotations: Vec<Annotation>,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct FlightPlanList {
    #[serde(default)]
    pub(super) flight_plans: Vec<FlightPlan>,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct FlightList {
    #[serde(default)]
    pub(super) flights: Vec<Flight>,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct CameraList {
    #[serde(default)]
    pub(super) cameras: Vec<Camera>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProjectLastChanges {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub modification_date: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct OAuthRequest<'a> {
    pub(super) username: &'a str,
    pub(super) password: &'a str,
}

#[derive(Clone, Debug, Deserialize)]
pub struct OAuthResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub token_type: Option<String>,
}

/// A remote mission together with its children, as assembled by a query.
#[derive(Clone, Debug, Default)]
pub struct HydratedMission {
    pub mission: Mission,
    pub annotations: Vec<Annotation>,
    pub flight_plans: Vec<FlightPlan>,
}

/// A remote project together with its missions and flights.
#[derive(Clone, Debug, Default)]
pub struct HydratedProject {
    pub project: Project,
    pub missions: Vec<HydratedMission>,
    pub flights: Vec<Flight>,
}
