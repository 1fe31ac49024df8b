//! Inventory snapshots and replica refresh

use crate::inventory::{InventoryEvent, InventoryStore};
use crate::item::{Item, ItemId, ItemKind};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use void_core::{EntityId, Revision};
use void_replication::{decode_payload, encode_payload, PeerId, ReplicationError, ReplicationMessage};

/// Replicated state of one stack
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemSnapshot {
    pub id: ItemId,
    pub kind: ItemKind,
    pub quantity: u32,
    pub revision: Revision,
}

/// Full replicated state of an inventory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventorySnapshot {
    pub owner: EntityId,
    pub revision: Revision,
    pub capacity: u32,
    pub weight_capacity: f32,
    pub items: Vec<ItemSnapshot>,
}

impl InventoryStore {
    /// Capture the full state
    pub fn snapshot(&self) -> InventorySnapshot {
        InventorySnapshot {
            owner: self.owner(),
            revision: self.revision,
            capacity: self.capacity(),
            weight_capacity: self.weight_capacity(),
            items: self
                .items
                .iter()
                .map(|item| ItemSnapshot {
                    id: item.id(),
                    kind: item.kind().clone(),
                    quantity: item.quantity(),
                    revision: item.revision(),
                })
                .collect(),
        }
    }

    /// Start replicating to an observer
    pub fn add_observer(&mut self, peer: PeerId) {
        if !self.observers.contains(&peer) {
            self.observers.push(peer);
        }
    }

    /// Stop replicating to an observer
    pub fn remove_observer(&mut self, peer: PeerId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|observer| *observer != peer);
        self.observers.len() != before
    }

    /// Observers receiving this inventory
    pub fn observers(&self) -> &[PeerId] {
        &self.observers
    }

    /// Push a snapshot to every observer that has not seen the current
    /// revision. Returns the number of snapshots sent.
    pub fn replicate(&self) -> void_replication::Result<usize> {
        if !self.has_authority() {
            return Ok(0);
        }
        let Some(bridge) = &self.bridge else {
            return Ok(0);
        };

        let owner = self.owner();
        let mut payload: Option<Vec<u8>> = None;
        let mut sent = 0;
        for &observer in &self.observers {
            if !bridge.is_stale(observer, owner, self.revision) {
                continue;
            }
            let bytes = match &payload {
                Some(bytes) => bytes.clone(),
                None => {
                    let bytes = encode_payload(&self.snapshot())?;
                    payload = Some(bytes.clone());
                    bytes
                }
            };
            bridge.push_snapshot(observer, owner, self.revision, bytes);
            sent += 1;
        }
        Ok(sent)
    }

    /// Apply a message delivered by the transport
    pub fn receive(&mut self, message: &ReplicationMessage) -> void_replication::Result<()> {
        if message.entity() != self.owner() {
            return Err(ReplicationError::EntityMismatch {
                expected: self.owner(),
                received: message.entity(),
            });
        }

        match message {
            ReplicationMessage::Refresh { .. } => {
                self.events.broadcast(&InventoryEvent::Updated {
                    inventory: self.owner(),
                });
            }
            ReplicationMessage::Snapshot { payload, .. } => {
                let snapshot: InventorySnapshot = decode_payload(payload)?;
                self.apply_snapshot(snapshot);
            }
        }
        Ok(())
    }

    /// Replace local state with a snapshot from the authority.
    ///
    /// Snapshots older than the last applied one are ignored. Listeners get
    /// one `Updated`, then `ItemAdded` for every item seen for the first
    /// time, `ItemModified` for changed quantities and `ItemRemoved` for
    /// vanished items. Returns whether the snapshot was applied.
    pub fn apply_snapshot(&mut self, snapshot: InventorySnapshot) -> bool {
        let owner = self.owner();
        if self.has_authority() {
            log::warn!("Inventory {}: authority ignoring inbound snapshot", owner);
            return false;
        }
        if let Some(last) = self.last_applied {
            if snapshot.revision < last {
                log::trace!(
                    "Inventory {}: stale snapshot {} (have {})",
                    owner,
                    snapshot.revision,
                    last
                );
                return false;
            }
        }

        let mut previous: Vec<Item> = std::mem::take(&mut self.items);
        let mut added = Vec::new();
        let mut modified = Vec::new();

        for entry in snapshot.items {
            let existing = previous
                .iter()
                .position(|item| item.id() == entry.id)
                .map(|index| previous.swap_remove(index));

            let mut item = match existing {
                Some(item) => item,
                None => {
                    let Some(definition) = self.catalog().get(&entry.kind).cloned() else {
                        log::warn!(
                            "Inventory {}: snapshot item {} has unknown kind {}",
                            owner,
                            entry.id,
                            entry.kind
                        );
                        continue;
                    };
                    let mut item = Item::new(entry.id, definition, 0);
                    item.attach(owner);
                    item
                }
            };

            if item.apply_replicated(entry.quantity, entry.revision) && self.known_items.contains(&entry.id) {
                modified.push((entry.id, item.quantity()));
            }
            if !self.known_items.contains(&entry.id) {
                added.push((entry.id, item.kind().clone(), item.quantity()));
            }
            self.items.push(item);
        }

        let removed: Vec<(ItemId, ItemKind)> = previous
            .into_iter()
            .map(|mut item| {
                item.detach();
                (item.id(), item.kind().clone())
            })
            .collect();

        self.revision = snapshot.revision;
        self.last_applied = Some(snapshot.revision);
        self.sync_limits(snapshot.capacity, snapshot.weight_capacity);

        let live: HashSet<ItemId> = self.items.iter().map(|item| item.id()).collect();
        self.known_items.retain(|id| live.contains(id));

        self.events.broadcast(&InventoryEvent::Updated { inventory: owner });
        for (item, kind, quantity) in added {
            self.known_items.insert(item);
            self.events.broadcast(&InventoryEvent::ItemAdded {
                inventory: owner,
                item,
                kind,
                quantity,
            });
        }
        for (item, quantity) in modified {
            self.events.broadcast(&InventoryEvent::ItemModified {
                inventory: owner,
                item,
                quantity,
            });
        }
        for (item, kind) in removed {
            self.events.broadcast(&InventoryEvent::ItemRemoved {
                inventory: owner,
                item,
                kind,
            });
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InventoryConfig;
    use crate::item::{ItemCatalog, ItemDefinition};
    use parking_lot::Mutex;
    use std::sync::Arc;
    use void_core::NetRole;
    use void_replication::{ReplicationBridge, ReplicationHub};

    const PLAYER: EntityId = EntityId::new(7);
    const CLIENT: PeerId = PeerId(1);

    fn catalog() -> Arc<ItemCatalog> {
        let mut catalog = ItemCatalog::new();
        catalog
            .register(ItemDefinition::new("arrow", "Arrow").with_weight(0.1).with_max_stack(50))
            .unwrap();
        catalog
            .register(ItemDefinition::new("gem", "Gem").with_weight(1.0).non_stackable())
            .unwrap();
        Arc::new(catalog)
    }

    fn pair(hub: &Arc<ReplicationHub>) -> (InventoryStore, InventoryStore) {
        hub.connect(CLIENT);
        let mut authority = InventoryStore::new(PLAYER, NetRole::Authority, InventoryConfig::default(), catalog())
            .with_bridge(hub.clone());
        authority.add_observer(CLIENT);
        let replica = InventoryStore::new(PLAYER, NetRole::Replica, InventoryConfig::default(), catalog());
        (authority, replica)
    }

    fn deliver(hub: &ReplicationHub, replica: &mut InventoryStore) {
        for message in hub.drain(CLIENT) {
            replica.receive(&message).unwrap();
        }
    }

    fn record(store: &mut InventoryStore) -> Arc<Mutex<Vec<InventoryEvent>>> {
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = log.clone();
        store.subscribe(move |event| sink.lock().push(event.clone()));
        log
    }

    #[test]
    fn test_replicate_is_revision_gated() {
        let hub = Arc::new(ReplicationHub::new());
        let (mut authority, mut replica) = pair(&hub);

        authority.try_add_item(&"arrow".into(), 10);
        assert!(hub.is_dirty(PLAYER));
        assert_eq!(authority.replicate().unwrap(), 1);
        assert_eq!(authority.replicate().unwrap(), 0);

        deliver(&hub, &mut replica);
        assert_eq!(replica.revision(), authority.revision());
        assert_eq!(replica.count_of(&"arrow".into()), 10);

        authority.try_add_item(&"arrow".into(), 5);
        assert_eq!(authority.replicate().unwrap(), 1);
        deliver(&hub, &mut replica);
        assert_eq!(replica.count_of(&"arrow".into()), 15);
        assert_eq!(replica.snapshot(), authority.snapshot());
    }

    #[test]
    fn test_item_added_fires_once() {
        let hub = Arc::new(ReplicationHub::new());
        let (mut authority, mut replica) = pair(&hub);
        let events = record(&mut replica);

        authority.try_add_item(&"arrow".into(), 1);
        authority.replicate().unwrap();
        deliver(&hub, &mut replica);

        authority.try_add_item(&"gem".into(), 1);
        authority.replicate().unwrap();
        deliver(&hub, &mut replica);

        // Re-applying the same state announces nothing new
        replica.apply_snapshot(authority.snapshot());

        let added: Vec<ItemKind> = events
            .lock()
            .iter()
            .filter_map(|event| match event {
                InventoryEvent::ItemAdded { kind, .. } => Some(kind.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(added, vec![ItemKind::new("arrow"), ItemKind::new("gem")]);
    }

    #[test]
    fn test_refresh_reports_changes() {
        let hub = Arc::new(ReplicationHub::new());
        let (mut authority, mut replica) = pair(&hub);

        let arrows = authority.try_add_item(&"arrow".into(), 10).item.unwrap();
        let gem = authority.try_add_item(&"gem".into(), 1).item.unwrap();
        authority.replicate().unwrap();
        deliver(&hub, &mut replica);

        let events = record(&mut replica);
        authority.consume_item(arrows, 4);
        authority.remove_item(gem);
        authority.replicate().unwrap();
        deliver(&hub, &mut replica);

        let events = events.lock();
        // consume_item sent a refresh before the snapshot
        assert_eq!(events[0], InventoryEvent::Updated { inventory: PLAYER });
        assert!(events.contains(&InventoryEvent::ItemModified {
            inventory: PLAYER,
            item: arrows,
            quantity: 6,
        }));
        assert!(events.contains(&InventoryEvent::ItemRemoved {
            inventory: PLAYER,
            item: gem,
            kind: "gem".into(),
        }));
        assert!(replica.find_item_by_id(gem).is_none());
    }

    #[test]
    fn test_stale_snapshot_ignored() {
        let hub = Arc::new(ReplicationHub::new());
        let (mut authority, mut replica) = pair(&hub);

        authority.try_add_item(&"arrow".into(), 3);
        let old = authority.snapshot();
        authority.try_add_item(&"arrow".into(), 3);
        let new = authority.snapshot();

        assert!(replica.apply_snapshot(new));
        assert!(!replica.apply_snapshot(old));
        assert_eq!(replica.count_of(&"arrow".into()), 6);
    }

    #[test]
    fn test_authority_ignores_snapshots() {
        let hub = Arc::new(ReplicationHub::new());
        let (mut authority, _) = pair(&hub);
        let snapshot = authority.snapshot();
        assert!(!authority.apply_snapshot(snapshot));
    }

    #[test]
    fn test_receive_wrong_entity() {
        let hub = Arc::new(ReplicationHub::new());
        let (_, mut replica) = pair(&hub);

        let message = ReplicationMessage::Refresh {
            entity: EntityId::new(99),
        };
        assert!(matches!(
            replica.receive(&message),
            Err(ReplicationError::EntityMismatch { .. })
        ));
    }

    #[test]
    fn test_receive_garbage_payload() {
        let hub = Arc::new(ReplicationHub::new());
        let (_, mut replica) = pair(&hub);
        hub.push_snapshot(CLIENT, PLAYER, Revision::new(1), vec![0xFF]);

        let messages = hub.drain(CLIENT);
        assert!(matches!(
            replica.receive(&messages[0]),
            Err(ReplicationError::Decode(_))
        ));
        assert!(replica.is_empty());
    }

    #[test]
    fn test_unknown_kind_skipped() {
        let hub = Arc::new(ReplicationHub::new());
        let (_, mut replica) = pair(&hub);

        let snapshot = InventorySnapshot {
            owner: PLAYER,
            revision: Revision::new(3),
            capacity: 20,
            weight_capacity: 80.0,
            items: vec![
                ItemSnapshot {
                    id: ItemId(1),
                    kind: "relic".into(),
                    quantity: 1,
                    revision: Revision::new(1),
                },
                ItemSnapshot {
                    id: ItemId(2),
                    kind: "arrow".into(),
                    quantity: 4,
                    revision: Revision::new(1),
                },
            ],
        };
        assert!(replica.apply_snapshot(snapshot));
        assert_eq!(replica.len(), 1);
        assert_eq!(replica.revision(), Revision::new(3));
    }
}
