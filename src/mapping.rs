//! Bidirectional local-id/remote-id mapping and the last-known remote versions.
//!
//! The map is a best-effort session cache; the remote service stays
//! authoritative. Both directions live behind one lock so readers never see a
//! half-inserted pair.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::model::{LocalId, RemoteId};

mod converter;
pub use self::converter::ProjectConverter;

#[derive(Default)]
struct Links {
    local_to_remote: HashMap<LocalId, RemoteId>,
    remote_to_local: HashMap<RemoteId, LocalId>,
}

#[derive(Default)]
pub struct IdentityMap {
    links: Mutex<Links>,
    versions: Mutex<HashMap<RemoteId, u64>>,
}

impl IdentityMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remote id of a local entity; `None` means it was never created remotely.
    pub fn remote_id_for(&self, local: &LocalId) -> Option<RemoteId> {
        self.links().local_to_remote.get(local).cloned()
    }

    /// Local id for a remote entity, minting and linking a fresh one on a miss.
    pub fn local_id_for(&self, remote: &RemoteId) -> LocalId {
        let mut links = self.links();
        if let Some(local) = links.remote_to_local.get(remote) {
            return *local;
        }
        let local = LocalId::new();
        links.local_to_remote.insert(local, remote.clone());
        links.remote_to_local.insert(remote.clone(), local);
        local
    }

    /// Links `local` and `remote`. Re-binding an existing pair is a no-op.
    ///
    /// # Panics
    ///
    /// If either id is already linked to a different partner. The map must stay
    /// a bijection; a violation is a programming error.
    pub fn bind(&self, local: LocalId, remote: RemoteId) {
        let mut links = self.links();
        if let Some(existing) = links.local_to_remote.get(&local) {
            assert!(
                existing == &remote,
                "identity map violation: local {} already linked to {}, not {}",
                local,
                existing,
                remote
            );
            return;
        }
        if let Some(existing) = links.remote_to_local.get(&remote) {
            panic!(
                "identity map violation: remote {} already linked to {}, not {}",
                remote, existing, local
            );
        }
        links.local_to_remote.insert(local, remote.clone());
        links.remote_to_local.insert(remote, local);
    }

    pub fn record_version(&self, remote: &RemoteId, version: u64) {
        self.versions().insert(remote.clone(), version);
    }

    /// Last recorded version, `None` when unknown.
    pub fn version_of(&self, remote: &RemoteId) -> Option<u64> {
        self.versions().get(remote).copied()
    }

    pub fn len(&self) -> usize {
        self.links().local_to_remote.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn links(&self) -> MutexGuard<'_, Links> {
        self.links.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn versions(&self) -> MutexGuard<'_, HashMap<RemoteId, u64>> {
        self.versions.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
#[path = "tests/mapping/identity_tests.rs"]
mod tests;
