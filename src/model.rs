mod config;
mod ids;
mod snapshot;

pub use self::config::{
    DEFAULT_LOGIN_TIMEOUT_SECS, DEFAULT_REQUEST_TIMEOUT_SECS, SyncConfig,
};
pub use self::ids::{LocalId, RemoteId};
pub use self::snapshot::{
    AoiParameters, DEFAULT_EPSG, FlightPlanSnapshot, FlightSnapshot, GeoPoint, GoalSnapshot,
    MissionSnapshot, Point3, ProjectSnapshot, UserSnapshot, WaypointSnapshot,
};
