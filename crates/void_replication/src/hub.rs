//! In-memory replication transport

use crate::bridge::{PeerId, ReplicationBridge};
use crate::message::ReplicationMessage;
use parking_lot::Mutex;
use std::collections::{BTreeSet, HashMap, VecDeque};
use void_core::{EntityId, Revision};

#[derive(Default)]
struct HubState {
    /// Entities changed since the last `take_dirty`
    dirty: BTreeSet<EntityId>,
    /// Last revision sent per observer and entity
    sent: HashMap<(PeerId, EntityId), Revision>,
    /// Ordered inbound messages per observer
    inboxes: HashMap<PeerId, VecDeque<ReplicationMessage>>,
}

/// Loopback transport connecting one authority to any number of replicas.
///
/// Delivery is reliable and FIFO per observer. A pushed snapshot counts as
/// received, so the same revision is never sent twice to one observer.
#[derive(Default)]
pub struct ReplicationHub {
    state: Mutex<HubState>,
}

impl ReplicationHub {
    /// Create an empty hub
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer
    pub fn connect(&self, peer: PeerId) {
        let mut state = self.state.lock();
        state.inboxes.entry(peer).or_default();
        log::debug!("Replication observer {} connected", peer);
    }

    /// Drop an observer and everything it was sent
    pub fn disconnect(&self, peer: PeerId) {
        let mut state = self.state.lock();
        state.inboxes.remove(&peer);
        state.sent.retain(|(observer, _), _| *observer != peer);
        log::debug!("Replication observer {} disconnected", peer);
    }

    /// Connected observers, in id order
    pub fn peers(&self) -> Vec<PeerId> {
        let state = self.state.lock();
        let mut peers: Vec<PeerId> = state.inboxes.keys().copied().collect();
        peers.sort();
        peers
    }

    /// Check if an entity was marked dirty and not yet collected
    pub fn is_dirty(&self, entity: EntityId) -> bool {
        self.state.lock().dirty.contains(&entity)
    }

    /// Collect and clear the dirty set
    pub fn take_dirty(&self) -> Vec<EntityId> {
        let mut state = self.state.lock();
        std::mem::take(&mut state.dirty).into_iter().collect()
    }

    /// Take every pending message for an observer, in delivery order
    pub fn drain(&self, peer: PeerId) -> Vec<ReplicationMessage> {
        let mut state = self.state.lock();
        state
            .inboxes
            .get_mut(&peer)
            .map(|inbox| inbox.drain(..).collect())
            .unwrap_or_default()
    }

    /// Number of pending messages for an observer
    pub fn pending(&self, peer: PeerId) -> usize {
        self.state
            .lock()
            .inboxes
            .get(&peer)
            .map(|inbox| inbox.len())
            .unwrap_or(0)
    }

    fn enqueue(state: &mut HubState, observer: PeerId, message: ReplicationMessage) {
        match state.inboxes.get_mut(&observer) {
            Some(inbox) => inbox.push_back(message),
            None => log::warn!(
                "Dropping replication message for unknown observer {}",
                observer
            ),
        }
    }
}

impl ReplicationBridge for ReplicationHub {
    fn mark_dirty(&self, entity: EntityId) {
        self.state.lock().dirty.insert(entity);
    }

    fn is_stale(&self, observer: PeerId, entity: EntityId, revision: Revision) -> bool {
        let state = self.state.lock();
        state.sent.get(&(observer, entity)) != Some(&revision)
    }

    fn push_snapshot(&self, observer: PeerId, entity: EntityId, revision: Revision, payload: Vec<u8>) {
        let mut state = self.state.lock();
        if !state.inboxes.contains_key(&observer) {
            log::warn!("Snapshot of {} for unknown observer {}", entity, observer);
            return;
        }
        state.sent.insert((observer, entity), revision);
        Self::enqueue(
            &mut state,
            observer,
            ReplicationMessage::Snapshot {
                entity,
                revision,
                payload,
            },
        );
        log::trace!("Pushed snapshot {} of {} to {}", revision, entity, observer);
    }

    fn deliver_refresh(&self, observer: PeerId, entity: EntityId) {
        let mut state = self.state.lock();
        Self::enqueue(&mut state, observer, ReplicationMessage::Refresh { entity });
    }
}

impl std::fmt::Debug for ReplicationHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("ReplicationHub")
            .field("peers", &state.inboxes.len())
            .field("dirty", &state.dirty.len())
            .finish()
    }
}
