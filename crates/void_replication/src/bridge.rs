//! Replication transport seam

use serde::{Deserialize, Serialize};
use void_core::{EntityId, Revision};

/// Identifier of a remote observer (a connected client)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PeerId(pub u32);

impl std::fmt::Display for PeerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "peer{}", self.0)
    }
}

/// Transport used by replicated components.
///
/// Components only call into the bridge; the bridge never calls back into
/// gameplay code. Inbound data reaches replicas as
/// [`crate::ReplicationMessage`]s that the owner of the replica applies.
pub trait ReplicationBridge: Send + Sync {
    /// Record that `entity` changed and needs to be replicated
    fn mark_dirty(&self, entity: EntityId);

    /// Check if `observer` has not yet received `revision` of `entity`
    fn is_stale(&self, observer: PeerId, entity: EntityId, revision: Revision) -> bool;

    /// Send a full snapshot of `entity` at `revision` to `observer`
    fn push_snapshot(&self, observer: PeerId, entity: EntityId, revision: Revision, payload: Vec<u8>);

    /// Ask `observer` to refresh its presentation of `entity` without new state
    fn deliver_refresh(&self, observer: PeerId, entity: EntityId);
}
