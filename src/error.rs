//! Failure taxonomy shared by the session, the remote client and the repository.

use std::fmt;

use crate::model::LocalId;

/// Kind of remote entity an error or a call refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Project,
    Mission,
    Annotation,
    FlightPlan,
    Flight,
    Camera,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Project => "project",
            EntityKind::Mission => "mission",
            EntityKind::Annotation => "annotation",
            EntityKind::FlightPlan => "flight plan",
            EntityKind::Flight => "flight",
            EntityKind::Camera => "camera",
        };
        f.write_str(name)
    }
}

/// Errors produced while synchronising with the remote project service.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    /// Not logged in, or the server answered 401.
    #[error("unauthorized: please log in again")]
    Unauthorized,

    /// Server answered 403.
    #[error("insufficient rights for this operation")]
    InsufficientRights,

    /// Server rejected the request body (400 without a conflict marker).
    #[error("invalid format: {0}")]
    InvalidFormat(String),

    /// Server reported a version conflict for a single entity.
    #[error("{kind} {remote_id} is outdated on the server")]
    Outdated { kind: EntityKind, remote_id: String },

    /// A save was aborted because one of the project's entities is outdated.
    #[error("project {project} is outdated ({kind} conflict): reload and retry")]
    ProjectOutdated { project: LocalId, kind: EntityKind },

    /// Unexpected HTTP status (404, 500, ...).
    #[error("remote request failed with status {code}")]
    Status { code: u16 },

    /// Response body did not match the expected schema.
    #[error("invalid response body: {0}")]
    Decode(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("remote request timed out")]
    Timeout,

    #[error("operation cancelled")]
    Cancelled,

    /// First step of a two-step creation succeeded, the second did not.
    #[error("{kind} {remote_id} was created but not configured: {source}")]
    PartiallyCreated {
        kind: EntityKind,
        remote_id: String,
        /// Version the server returned for the first step.
        version: Option<u64>,
        #[source]
        source: Box<PersistenceError>,
    },

    #[error("local cache error: {0}")]
    Cache(String),

    #[error("background task failed: {0}")]
    Background(String),
}

pub type Result<T> = std::result::Result<T, PersistenceError>;

impl PersistenceError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, PersistenceError::Unauthorized)
    }

    /// True for both the per-entity and the project-level conflict.
    pub fn is_outdated(&self) -> bool {
        matches!(
            self,
            PersistenceError::Outdated { .. } | PersistenceError::ProjectOutdated { .. }
        )
    }

    /// HTTP status behind the error, when there is one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            PersistenceError::Unauthorized => Some(401),
            PersistenceError::InsufficientRights => Some(403),
            PersistenceError::InvalidFormat(_) => Some(400),
            PersistenceError::Status { code } => Some(*code),
            PersistenceError::PartiallyCreated { source, .. } => source.status_code(),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for PersistenceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            PersistenceError::Timeout
        } else if err.is_decode() {
            PersistenceError::Decode(err.to_string())
        } else {
            PersistenceError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for PersistenceError {
    fn from(err: serde_json::Error) -> Self {
        PersistenceError::Decode(err.to_string())
    }
}
