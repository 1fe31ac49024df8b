//! Item use and drop requests
//!
//! Replicas never change inventory contents themselves. They queue an
//! [`InventoryRequest`] that the caller ships to the authority, which applies
//! it with [`InventoryStore::handle_request`]; the result flows back through
//! the next snapshot.

use crate::behavior::ItemUseContext;
use crate::error::InventoryError;
use crate::inventory::InventoryStore;
use crate::item::{ItemId, ItemKind};
use crate::pickup::Pickup;
use serde::{Deserialize, Serialize};
use void_core::EntityId;

/// Request sent from a replica to the authority
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InventoryRequest {
    /// Use an item
    UseItem { item: ItemId, actor: EntityId },
    /// Drop part of a stack into the world
    DropItem { item: ItemId, quantity: u32 },
}

/// Result of applying a request on the authority
#[derive(Debug, Clone, PartialEq)]
pub enum RequestOutcome {
    /// The item's use hooks ran
    Used,
    /// Units left the inventory as a pickup
    Dropped(Pickup),
    /// Nothing happened
    Rejected(InventoryError),
}

impl InventoryStore {
    /// Use an item held by this inventory.
    ///
    /// On the authority the item must be present; its behavior's `on_use`
    /// and `use_item` hooks then run. A replica queues the request and runs
    /// the hooks locally for immediate feedback.
    pub fn use_item(&mut self, id: ItemId, actor: EntityId) -> bool {
        let Some(kind) = self.find_item_by_id(id).map(|item| item.kind().clone()) else {
            log::trace!("Inventory {}: use of missing {}", self.owner(), id);
            return false;
        };

        if !self.has_authority() {
            self.requests.push(InventoryRequest::UseItem { item: id, actor });
        }
        self.run_use_hooks(&kind, id, actor);
        true
    }

    /// Drop up to `quantity` units of a stack.
    ///
    /// Returns the pickup on the authority; a replica queues the request and
    /// returns `None`.
    pub fn drop_item(&mut self, id: ItemId, quantity: u32) -> Option<Pickup> {
        if !self.has_authority() {
            self.requests.push(InventoryRequest::DropItem { item: id, quantity });
            return None;
        }

        let kind = self.find_item_by_id(id)?.kind().clone();
        let dropped = self.consume_item(id, quantity);
        if dropped == 0 {
            return None;
        }
        log::debug!("Inventory {}: dropped {} x{}", self.owner(), kind, dropped);
        Some(Pickup::new(kind, dropped).with_dropped_by(self.owner()))
    }

    /// Requests queued on this replica
    pub fn pending_requests(&self) -> &[InventoryRequest] {
        &self.requests
    }

    /// Take the queued requests for sending
    pub fn take_requests(&mut self) -> Vec<InventoryRequest> {
        std::mem::take(&mut self.requests)
    }

    /// Apply a request received from a replica
    pub fn handle_request(&mut self, request: InventoryRequest) -> RequestOutcome {
        if let Err(err) = self.ensure_authority("handle_request") {
            return RequestOutcome::Rejected(err);
        }

        match request {
            InventoryRequest::UseItem { item, actor } => {
                if self.use_item(item, actor) {
                    RequestOutcome::Used
                } else {
                    RequestOutcome::Rejected(InventoryError::ItemNotFound)
                }
            }
            InventoryRequest::DropItem { item, quantity } => {
                let Some(available) = self.find_item_by_id(item).map(|stack| stack.quantity()) else {
                    return RequestOutcome::Rejected(InventoryError::ItemNotFound);
                };
                match self.drop_item(item, quantity) {
                    Some(pickup) => RequestOutcome::Dropped(pickup),
                    None => RequestOutcome::Rejected(InventoryError::InvalidQuantity {
                        requested: quantity,
                        available,
                    }),
                }
            }
        }
    }

    fn run_use_hooks(&mut self, kind: &ItemKind, item: ItemId, actor: EntityId) {
        let Some(behavior) = self.catalog().behavior_for(kind) else {
            return;
        };
        let mut ctx = ItemUseContext {
            store: self,
            item,
            actor,
        };
        behavior.on_use(&mut ctx);
        behavior.use_item(&mut ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behavior::{ConsumeOnUse, ItemBehavior};
    use crate::config::InventoryConfig;
    use crate::item::{ItemCatalog, ItemDefinition};
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;
    use void_core::NetRole;

    const PLAYER: EntityId = EntityId::new(3);

    #[derive(Default)]
    struct CountingBehavior {
        on_use: AtomicU32,
        used: AtomicU32,
    }

    impl ItemBehavior for CountingBehavior {
        fn on_use(&self, _ctx: &mut ItemUseContext<'_>) {
            self.on_use.fetch_add(1, Ordering::SeqCst);
        }

        fn use_item(&self, ctx: &mut ItemUseContext<'_>) {
            assert_eq!(ctx.actor, PLAYER);
            self.used.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn catalog(behavior: Arc<CountingBehavior>) -> Arc<ItemCatalog> {
        let mut catalog = ItemCatalog::new();
        catalog
            .register(ItemDefinition::new("food", "Food").with_max_stack(10))
            .unwrap();
        catalog
            .register(
                ItemDefinition::new("bread", "Bread")
                    .with_parent("food")
                    .with_max_stack(10),
            )
            .unwrap();
        catalog
            .register(ItemDefinition::new("torch", "Torch").with_max_stack(5))
            .unwrap();
        Arc::new(
            catalog
                .with_behavior("food", behavior)
                .with_behavior("torch", Arc::new(ConsumeOnUse)),
        )
    }

    fn store(role: NetRole, behavior: Arc<CountingBehavior>) -> InventoryStore {
        InventoryStore::new(PLAYER, role, InventoryConfig::default(), catalog(behavior))
    }

    #[test]
    fn test_use_runs_inherited_hooks() {
        let behavior = Arc::new(CountingBehavior::default());
        let mut store = store(NetRole::Authority, behavior.clone());
        let bread = store.try_add_item(&"bread".into(), 2).item.unwrap();

        assert!(store.use_item(bread, PLAYER));
        assert_eq!(behavior.on_use.load(Ordering::SeqCst), 1);
        assert_eq!(behavior.used.load(Ordering::SeqCst), 1);
        assert!(store.pending_requests().is_empty());
    }

    #[test]
    fn test_use_missing_item() {
        let behavior = Arc::new(CountingBehavior::default());
        let mut store = store(NetRole::Authority, behavior.clone());

        assert!(!store.use_item(ItemId(42), PLAYER));
        assert_eq!(
            store.handle_request(InventoryRequest::UseItem {
                item: ItemId(42),
                actor: PLAYER,
            }),
            RequestOutcome::Rejected(InventoryError::ItemNotFound)
        );
        assert_eq!(behavior.used.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_consume_on_use() {
        let mut store = store(NetRole::Authority, Arc::default());
        let torch = store.try_add_item(&"torch".into(), 2).item.unwrap();

        store.use_item(torch, PLAYER);
        assert_eq!(store.count_of(&"torch".into()), 1);
        store.use_item(torch, PLAYER);
        assert!(store.find_item_by_id(torch).is_none());
    }

    #[test]
    fn test_drop_creates_pickup() {
        let mut store = store(NetRole::Authority, Arc::default());
        let torch = store.try_add_item(&"torch".into(), 5).item.unwrap();

        let pickup = store.drop_item(torch, 2).unwrap();
        assert_eq!(pickup.kind, ItemKind::new("torch"));
        assert_eq!(pickup.quantity, 2);
        assert_eq!(pickup.dropped_by, Some(PLAYER));
        assert_eq!(store.count_of(&"torch".into()), 3);

        // Asking for more than held drops the rest
        let pickup = store.drop_item(torch, 10).unwrap();
        assert_eq!(pickup.quantity, 3);
        assert!(store.is_empty());
        assert!(store.drop_item(torch, 1).is_none());
    }

    #[test]
    fn test_replica_forwards_requests() {
        let behavior = Arc::new(CountingBehavior::default());
        let mut authority = store(NetRole::Authority, behavior.clone());
        let bread = authority.try_add_item(&"bread".into(), 4).item.unwrap();

        let mut replica = store(NetRole::Replica, behavior.clone());
        replica.apply_snapshot(authority.snapshot());

        // Hooks run speculatively on the replica
        assert!(replica.use_item(bread, PLAYER));
        assert_eq!(behavior.used.load(Ordering::SeqCst), 1);
        assert!(replica.drop_item(bread, 1).is_none());
        assert_eq!(replica.count_of(&"bread".into()), 4);

        let requests = replica.take_requests();
        assert_eq!(
            requests,
            vec![
                InventoryRequest::UseItem {
                    item: bread,
                    actor: PLAYER
                },
                InventoryRequest::DropItem {
                    item: bread,
                    quantity: 1
                },
            ]
        );
        assert!(replica.pending_requests().is_empty());

        let outcomes: Vec<RequestOutcome> = requests
            .into_iter()
            .map(|request| authority.handle_request(request))
            .collect();
        assert_eq!(outcomes[0], RequestOutcome::Used);
        assert!(matches!(&outcomes[1], RequestOutcome::Dropped(pickup) if pickup.quantity == 1));
        assert_eq!(behavior.used.load(Ordering::SeqCst), 2);
        assert_eq!(authority.count_of(&"bread".into()), 3);
    }

    #[test]
    fn test_replica_cannot_handle_requests() {
        let mut replica = store(NetRole::Replica, Arc::default());
        assert_eq!(
            replica.handle_request(InventoryRequest::DropItem {
                item: ItemId(1),
                quantity: 1,
            }),
            RequestOutcome::Rejected(InventoryError::NotAuthoritative)
        );
    }
}
