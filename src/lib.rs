//! Keeps a local mission-planning project graph in sync with a remote
//! project service.
//!
//! The entry point is [`repository::InsightRepository`]; the lower layers
//! ([`remote::Session`], [`remote::RemoteClient`], [`mapping::IdentityMap`])
//! are public for callers that need finer control.

pub mod error;
pub mod logging;
pub mod mapping;
pub mod model;
pub mod remote;
pub mod repository;
pub mod store;

pub use error::{EntityKind, PersistenceError, Result};
pub use repository::{InsightRepository, ProjectQuery, SyncTask};
