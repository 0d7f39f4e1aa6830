//! Local snapshot graph handed to and returned from the repository.
//!
//! The synchroniser only does identity and version bookkeeping on these types;
//! the domain fields are carried through unchanged.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::LocalId;

pub const DEFAULT_EPSG: &str = "EPSG:4326";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserSnapshot {
    pub id: LocalId,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProjectSnapshot {
    pub id: LocalId,
    pub name: String,
    pub owner: UserSnapshot,
    pub srs_epsg: String,

    #[serde(with = "time::serde::rfc3339")]
    pub created: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub modified: OffsetDateTime,

    #[serde(default)]
    pub missions: Vec<MissionSnapshot>,
    #[serde(default)]
    pub flights: Vec<FlightSnapshot>,
}

impl ProjectSnapshot {
    /// Fresh, empty project owned by `owner`.
    pub fn new(name: &str, owner: UserSnapshot) -> Self {
        let now = OffsetDateTime::now_utc();
        Self {
            id: LocalId::new(),
            name: name.to_string(),
            owner,
            srs_epsg: DEFAULT_EPSG.to_string(),
            created: now,
            modified: now,
            missions: Vec::new(),
            flights: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MissionSnapshot {
    pub id: LocalId,
    pub name: String,
    pub origin_lat: f64,
    pub origin_lon: f64,

    #[serde(default)]
    pub goals: Vec<GoalSnapshot>,
    #[serde(default)]
    pub flight_plans: Vec<FlightPlanSnapshot>,
}

impl MissionSnapshot {
    pub fn new(name: &str) -> Self {
        Self {
            id: LocalId::new(),
            name: name.to_string(),
            origin_lat: 0.0,
            origin_lon: 0.0,
            goals: Vec::new(),
            flight_plans: Vec::new(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AoiParameters {
    pub gsd: f64,
    pub distance: f64,
    pub forward_overlap: f64,
    pub forward_overlap_min: f64,
    pub lateral_overlap: f64,
    pub lateral_overlap_min: f64,
}

/// Area of interest the mission should cover.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GoalSnapshot {
    pub id: LocalId,
    pub name: String,
    /// Polygon corners, open ring (first corner is not repeated).
    #[serde(default)]
    pub corners: Vec<GeoPoint>,
    #[serde(default)]
    pub parameters: AoiParameters,
}

impl GoalSnapshot {
    pub fn new(name: &str, corners: Vec<GeoPoint>) -> Self {
        Self {
            id: LocalId::new(),
            name: name.to_string(),
            corners,
            parameters: AoiParameters::default(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WaypointSnapshot {
    pub target: Point3,
    pub drone: Point3,
    #[serde(default)]
    pub warning: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FlightPlanSnapshot {
    pub id: LocalId,
    pub name: String,
    pub takeoff: Point3,
    pub landing: Point3,
    pub safety_altitude: f64,
    pub max_ground_speed: f64,
    #[serde(default)]
    pub waypoints: Vec<WaypointSnapshot>,
    /// Serialized hardware configuration, opaque here.
    #[serde(default)]
    pub hw_config: Option<String>,
}

impl FlightPlanSnapshot {
    pub fn new(name: &str) -> Self {
        Self {
            id: LocalId::new(),
            name: name.to_string(),
            takeoff: Point3::default(),
            landing: Point3::default(),
            safety_altitude: 0.0,
            max_ground_speed: 0.0,
            waypoints: Vec::new(),
            hw_config: None,
        }
    }
}

/// Recorded flight (dataset) attached to a project.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FlightSnapshot {
    pub id: LocalId,
    pub name: String,
    #[serde(with = "time::serde::rfc3339")]
    pub survey_date: OffsetDateTime,
    #[serde(default)]
    pub photos: Vec<String>,
    #[serde(default)]
    pub logs: Vec<String>,
}

impl FlightSnapshot {
    pub fn new(name: &str) -> Self {
        Self {
            id: LocalId::new(),
            name: name.to_string(),
            survey_date: OffsetDateTime::now_utc(),
            photos: Vec::new(),
            logs: Vec::new(),
        }
    }
}
