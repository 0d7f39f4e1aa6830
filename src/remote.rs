use std::time::Duration;

use crate::error::{EntityKind, PersistenceError, Result};
use crate::model::SyncConfig;

mod http_client;
use self::http_client::Call;

mod types;
pub use self::types::*;
mod annotations;
mod cameras;
mod flight_plans;
mod flights;
mod missions;
mod projects;
pub mod session;

pub use self::session::Session;

/// Typed access to the project service, one method family per resource kind.
///
/// Stateless apart from the shared [`Session`]: every call requires the
/// session to be authenticated and fails with
/// [`PersistenceError::Unauthorized`] without touching the network otherwise.
#[derive(Clone)]
pub struct RemoteClient {
    session: Session,
    base_url: String,
    timeout: Duration,
}

impl RemoteClient {
    pub fn new(config: &SyncConfig, session: Session) -> Self {
        Self {
            session,
            base_url: config.base_url(),
            timeout: config.request_timeout(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

fn require_id<'a>(id: Option<&'a str>, kind: EntityKind, op: &str) -> Result<&'a str> {
    id.ok_or_else(|| PersistenceError::InvalidFormat(format!("{} {} without remote id", op, kind)))
}
