//! Inventory store

use crate::config::{InventoryConfig, MAX_CAPACITY};
use crate::error::InventoryError;
use crate::item::{Item, ItemCatalog, ItemDefinition, ItemId, ItemKind};
use crate::request::InventoryRequest;
use crate::result::AddResult;
use std::collections::HashSet;
use std::sync::Arc;
use void_core::{EntityId, IdGenerator, NetRole, Revision};
use void_event::{Multicast, SubscriberId};
use void_replication::{PeerId, ReplicationBridge};

/// Unit weights at or below this count as weightless
const WEIGHT_EPSILON: f32 = 1e-8;

/// Slack when dividing the weight budget, so 0.3 / 0.1 admits 3 units
const ADMIT_TOLERANCE: f64 = 1e-6;

/// Inventory events
#[derive(Debug, Clone, PartialEq)]
pub enum InventoryEvent {
    /// Contents or limits changed
    Updated { inventory: EntityId },
    /// A stack appeared
    ItemAdded {
        inventory: EntityId,
        item: ItemId,
        kind: ItemKind,
        quantity: u32,
    },
    /// A stack disappeared
    ItemRemoved {
        inventory: EntityId,
        item: ItemId,
        kind: ItemKind,
    },
    /// A stack's quantity changed
    ItemModified {
        inventory: EntityId,
        item: ItemId,
        quantity: u32,
    },
}

/// Inventory of a single entity.
///
/// The authority instance owns the contents; replica instances only mirror
/// snapshots and forward requests. Every mutating entry point checks the
/// role once and is a no-op on replicas.
pub struct InventoryStore {
    owner: EntityId,
    role: NetRole,
    capacity: u32,
    weight_capacity: f32,
    pub(crate) items: Vec<Item>,
    pub(crate) revision: Revision,
    catalog: Arc<ItemCatalog>,
    pub(crate) bridge: Option<Arc<dyn ReplicationBridge>>,
    pub(crate) observers: Vec<PeerId>,
    pub(crate) events: Multicast<InventoryEvent>,
    item_ids: IdGenerator,
    /// Items already announced with `ItemAdded`
    pub(crate) known_items: HashSet<ItemId>,
    /// Revision of the last snapshot applied on a replica
    pub(crate) last_applied: Option<Revision>,
    /// Requests queued on a replica for the authority
    pub(crate) requests: Vec<InventoryRequest>,
}

impl InventoryStore {
    /// Create an empty inventory
    pub fn new(owner: EntityId, role: NetRole, config: InventoryConfig, catalog: Arc<ItemCatalog>) -> Self {
        Self {
            owner,
            role,
            capacity: config.capacity.min(MAX_CAPACITY),
            weight_capacity: config.weight_capacity.max(0.0),
            items: Vec::new(),
            revision: Revision::ZERO,
            catalog,
            bridge: None,
            observers: Vec::new(),
            events: Multicast::new(),
            item_ids: IdGenerator::starting_at(1),
            known_items: HashSet::new(),
            last_applied: None,
            requests: Vec::new(),
        }
    }

    /// Attach a replication transport
    pub fn with_bridge(mut self, bridge: Arc<dyn ReplicationBridge>) -> Self {
        self.bridge = Some(bridge);
        self
    }

    /// Owning entity
    pub fn owner(&self) -> EntityId {
        self.owner
    }

    /// Network role of this instance
    pub fn role(&self) -> NetRole {
        self.role
    }

    /// Check if this instance may mutate
    pub fn has_authority(&self) -> bool {
        self.role.has_authority()
    }

    /// Current revision
    pub fn revision(&self) -> Revision {
        self.revision
    }

    /// Maximum number of stacks
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Maximum total weight
    pub fn weight_capacity(&self) -> f32 {
        self.weight_capacity
    }

    /// Item catalog
    pub fn catalog(&self) -> &Arc<ItemCatalog> {
        &self.catalog
    }

    /// Swap the item catalog (e.g. after reloading definitions)
    pub fn replace_catalog(&mut self, catalog: Arc<ItemCatalog>) {
        self.catalog = catalog;
    }

    /// Subscribe to inventory events
    pub fn subscribe<F>(&mut self, handler: F) -> SubscriberId
    where
        F: Fn(&InventoryEvent) + Send + Sync + 'static,
    {
        self.events.subscribe(handler)
    }

    /// Unsubscribe from inventory events
    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        self.events.unsubscribe(id)
    }

    /// Stacks in insertion order
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Number of stacks
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the inventory holds nothing
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of free stack slots
    pub fn free_slots(&self) -> u32 {
        self.capacity.saturating_sub(self.items.len() as u32)
    }

    /// Total weight of every stack
    pub fn current_weight(&self) -> f32 {
        self.current_weight_precise() as f32
    }

    fn current_weight_precise(&self) -> f64 {
        self.items
            .iter()
            .map(|item| item.quantity() as f64 * item.unit_weight() as f64)
            .sum()
    }

    /// First stack of exactly `kind`
    pub fn find_item(&self, kind: &ItemKind) -> Option<&Item> {
        self.items.iter().find(|item| item.kind() == kind)
    }

    /// Every stack of `kind` or one of its subtypes
    pub fn find_items_by_kind(&self, kind: &ItemKind) -> Vec<&Item> {
        self.items
            .iter()
            .filter(|item| item.definition().is_a(kind))
            .collect()
    }

    /// Stack with the given id
    pub fn find_item_by_id(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// Total units of exactly `kind`
    pub fn count_of(&self, kind: &ItemKind) -> u32 {
        self.items
            .iter()
            .filter(|item| item.kind() == kind)
            .map(|item| item.quantity())
            .sum()
    }

    /// Check if at least `quantity` units of `kind` are held
    pub fn has_item(&self, kind: &ItemKind, quantity: u32) -> bool {
        self.count_of(kind) >= quantity
    }

    /// Add up to `quantity` units of `kind`.
    ///
    /// Stackable kinds grow their existing stack or open one new stack;
    /// non-stackable kinds always add exactly one unit in a new slot. The
    /// weight budget and slot capacity are never exceeded: whatever does not
    /// fit is reported in the result rather than dropped silently.
    pub fn try_add_item(&mut self, kind: &ItemKind, quantity: u32) -> AddResult {
        if let Err(err) = self.ensure_authority("try_add_item") {
            return AddResult::added_none(quantity, err);
        }

        let Some(definition) = self.catalog.get(kind).cloned() else {
            log::warn!("Inventory {}: unknown item kind {}", self.owner, kind);
            return AddResult::added_none(quantity, InventoryError::UnknownKind(kind.clone()));
        };

        if quantity == 0 {
            return AddResult::added_none(
                0,
                InventoryError::InvalidQuantity {
                    requested: 0,
                    available: definition.max_stack_size(),
                },
            );
        }

        let result = if definition.is_stackable() {
            self.add_stackable(&definition, quantity)
        } else {
            self.add_single(&definition)
        };

        debug_assert!(self.items.len() <= self.capacity as usize);
        debug_assert!(self.current_weight_precise() <= self.weight_capacity as f64 + 1e-3);
        result
    }

    fn add_stackable(&mut self, definition: &Arc<ItemDefinition>, requested: u32) -> AddResult {
        let name = definition.display_name.clone();
        let weight_room = self.weight_room(definition.weight);

        // One stack per kind: grow it, or refuse once it is full
        if let Some(index) = self.items.iter().position(|item| item.kind() == &definition.kind) {
            let stack = &self.items[index];
            if stack.is_stack_full() {
                return AddResult::added_none(requested, InventoryError::StackFull { item: name });
            }

            let stack_room = stack.max_stack_size() - stack.quantity();
            let admit = weight_room.min(stack_room).min(requested);
            if admit == 0 {
                return AddResult::added_none(requested, InventoryError::WeightFull { item: name });
            }

            let stack = &mut self.items[index];
            let quantity = stack.quantity() + admit;
            stack.set_quantity(quantity);
            let id = stack.id();
            log::debug!(
                "Inventory {}: {} +{} (now {})",
                self.owner,
                definition.kind,
                admit,
                quantity
            );
            self.events.broadcast(&InventoryEvent::ItemModified {
                inventory: self.owner,
                item: id,
                quantity,
            });
            self.commit();

            return if admit == requested {
                AddResult::added_all(requested, id)
            } else if weight_room < stack_room.min(requested) {
                AddResult::added_some(requested, admit, id, InventoryError::WeightFull { item: name })
            } else {
                AddResult::added_some(requested, admit, id, InventoryError::StackFull { item: name })
            };
        }

        if self.items.len() as u32 + 1 > self.capacity {
            return AddResult::added_none(requested, InventoryError::CapacityFull { item: name });
        }

        let stack_limit = definition.max_stack_size().min(requested);
        let admit = weight_room.min(stack_limit);
        if admit == 0 {
            return AddResult::added_none(requested, InventoryError::WeightFull { item: name });
        }

        let id = self.insert_stack(definition, admit);
        if admit == requested {
            AddResult::added_all(requested, id)
        } else if weight_room < stack_limit {
            AddResult::added_some(requested, admit, id, InventoryError::WeightFull { item: name })
        } else {
            AddResult::added_some(requested, admit, id, InventoryError::StackFull { item: name })
        }
    }

    fn add_single(&mut self, definition: &Arc<ItemDefinition>) -> AddResult {
        let name = definition.display_name.clone();

        if self.items.len() as u32 + 1 > self.capacity {
            return AddResult::added_none(1, InventoryError::CapacityFull { item: name });
        }

        if definition.weight > WEIGHT_EPSILON
            && self.current_weight_precise() + definition.weight as f64 > self.weight_capacity as f64
        {
            return AddResult::added_none(1, InventoryError::WeightFull { item: name });
        }

        let id = self.insert_stack(definition, 1);
        AddResult::added_all(1, id)
    }

    /// Units of the given weight that still fit
    fn weight_room(&self, unit_weight: f32) -> u32 {
        if unit_weight <= WEIGHT_EPSILON {
            return u32::MAX;
        }
        let remaining = self.weight_capacity as f64 - self.current_weight_precise();
        if remaining <= 0.0 {
            return 0;
        }
        let room = (remaining / unit_weight as f64 + ADMIT_TOLERANCE).floor();
        if room >= u32::MAX as f64 {
            u32::MAX
        } else {
            room as u32
        }
    }

    fn insert_stack(&mut self, definition: &Arc<ItemDefinition>, quantity: u32) -> ItemId {
        let id = ItemId(self.item_ids.next_raw());

        let mut item = Item::new(id, definition.clone(), quantity);
        item.attach(self.owner);
        self.items.push(item);
        self.known_items.insert(id);

        log::debug!(
            "Inventory {}: new stack {} of {} x{}",
            self.owner,
            id,
            definition.kind,
            quantity
        );
        self.events.broadcast(&InventoryEvent::ItemAdded {
            inventory: self.owner,
            item: id,
            kind: definition.kind.clone(),
            quantity,
        });
        self.commit();
        id
    }

    /// Remove a stack entirely
    pub fn remove_item(&mut self, id: ItemId) -> bool {
        if self.ensure_authority("remove_item").is_err() {
            return false;
        }
        match self.index_of(id) {
            Some(index) => {
                self.remove_at(index);
                true
            }
            None => false,
        }
    }

    fn remove_at(&mut self, index: usize) -> Item {
        let mut item = self.items.remove(index);
        item.detach();
        self.known_items.remove(&item.id());

        log::debug!("Inventory {}: removed {} ({})", self.owner, item.id(), item.kind());
        self.events.broadcast(&InventoryEvent::ItemRemoved {
            inventory: self.owner,
            item: item.id(),
            kind: item.kind().clone(),
        });
        self.commit();
        item
    }

    /// Consume up to `quantity` units of a stack, removing it when empty.
    ///
    /// Returns the number of units consumed.
    pub fn consume_item(&mut self, id: ItemId, quantity: u32) -> u32 {
        if self.ensure_authority("consume_item").is_err() {
            return 0;
        }
        let Some(index) = self.index_of(id) else {
            log::trace!("Inventory {}: consume of missing {}", self.owner, id);
            return 0;
        };

        let available = self.items[index].quantity();
        if quantity == 0 {
            log::debug!(
                "Inventory {}: {}",
                self.owner,
                InventoryError::InvalidQuantity {
                    requested: quantity,
                    available,
                }
            );
            return 0;
        }

        let consumed = quantity.min(available);
        let remaining = available - consumed;
        if remaining == 0 {
            self.remove_at(index);
        } else {
            self.items[index].set_quantity(remaining);
            self.events.broadcast(&InventoryEvent::ItemModified {
                inventory: self.owner,
                item: id,
                quantity: remaining,
            });
            self.commit();
            self.refresh_observers();
        }
        consumed
    }

    /// Consume a whole stack
    pub fn consume_all(&mut self, id: ItemId) -> u32 {
        let quantity = self.find_item_by_id(id).map_or(0, |item| item.quantity());
        self.consume_item(id, quantity)
    }

    /// Set a stack's quantity directly; 0 removes it.
    ///
    /// Growth is limited by the stack size and the weight budget.
    pub fn set_item_quantity(&mut self, id: ItemId, quantity: u32) -> bool {
        if self.ensure_authority("set_item_quantity").is_err() {
            return false;
        }
        let Some(index) = self.index_of(id) else {
            return false;
        };
        if quantity == 0 {
            self.remove_at(index);
            return true;
        }

        let current = self.items[index].quantity();
        let room = self.weight_room(self.items[index].unit_weight());
        let target = quantity.min(current.saturating_add(room));
        if !self.items[index].set_quantity(target) {
            return false;
        }
        let quantity = self.items[index].quantity();
        self.events.broadcast(&InventoryEvent::ItemModified {
            inventory: self.owner,
            item: id,
            quantity,
        });
        self.commit();
        true
    }

    /// Change the slot capacity; never below the current stack count
    pub fn set_capacity(&mut self, capacity: u32) {
        if self.ensure_authority("set_capacity").is_err() {
            return;
        }
        let floor = (self.items.len() as u32).min(MAX_CAPACITY);
        self.capacity = capacity.clamp(floor, MAX_CAPACITY);
        self.commit();
    }

    /// Change the weight budget; never below the current weight
    pub fn set_weight_capacity(&mut self, weight_capacity: f32) {
        if self.ensure_authority("set_weight_capacity").is_err() {
            return;
        }
        self.weight_capacity = weight_capacity.max(self.current_weight());
        self.commit();
    }

    /// Mirror limits received from the authority
    pub(crate) fn sync_limits(&mut self, capacity: u32, weight_capacity: f32) {
        self.capacity = capacity.min(MAX_CAPACITY);
        self.weight_capacity = weight_capacity.max(0.0);
    }

    pub(crate) fn index_of(&self, id: ItemId) -> Option<usize> {
        self.items.iter().position(|item| item.id() == id)
    }

    /// Single authority gate for every mutating entry point
    pub(crate) fn ensure_authority(&self, operation: &str) -> Result<(), InventoryError> {
        if self.role.has_authority() {
            Ok(())
        } else {
            log::trace!("Inventory {}: {} ignored on replica", self.owner, operation);
            Err(InventoryError::NotAuthoritative)
        }
    }

    /// Bump the revision, flag for replication and notify listeners
    fn commit(&mut self) {
        self.revision.bump();
        if let Some(bridge) = &self.bridge {
            bridge.mark_dirty(self.owner);
        }
        self.events.broadcast(&InventoryEvent::Updated {
            inventory: self.owner,
        });
    }

    fn refresh_observers(&self) {
        if let Some(bridge) = &self.bridge {
            for &observer in &self.observers {
                bridge.deliver_refresh(observer, self.owner);
            }
        }
    }
}

impl std::fmt::Debug for InventoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InventoryStore")
            .field("owner", &self.owner)
            .field("role", &self.role)
            .field("revision", &self.revision)
            .field("capacity", &self.capacity)
            .field("weight_capacity", &self.weight_capacity)
            .field("items", &self.items.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::ItemDefinition;
    use crate::result::AddOutcome;
    use approx::assert_relative_eq;
    use parking_lot::Mutex;

    fn catalog() -> Arc<ItemCatalog> {
        let mut catalog = ItemCatalog::new();
        catalog
            .register(ItemDefinition::new("sword", "Sword").with_weight(10.0).non_stackable())
            .unwrap();
        catalog
            .register(ItemDefinition::new("shield", "Shield").with_weight(10.0).non_stackable())
            .unwrap();
        catalog
            .register(ItemDefinition::new("ore", "Ore").with_weight(2.0).with_max_stack(5))
            .unwrap();
        catalog
            .register(ItemDefinition::new("arrow", "Arrow").with_weight(0.1).with_max_stack(50))
            .unwrap();
        catalog
            .register(ItemDefinition::new("note", "Note").with_weight(0.0).with_max_stack(3))
            .unwrap();
        catalog
            .register(ItemDefinition::new("food", "Food").with_weight(0.5).with_max_stack(10))
            .unwrap();
        catalog
            .register(
                ItemDefinition::new("apple", "Apple")
                    .with_parent("food")
                    .with_weight(0.5)
                    .with_max_stack(10),
            )
            .unwrap();
        Arc::new(catalog)
    }

    fn store(config: InventoryConfig) -> InventoryStore {
        InventoryStore::new(EntityId::new(1), NetRole::Authority, config, catalog())
    }

    fn assert_invariants(store: &InventoryStore) {
        assert!(store.len() <= store.capacity() as usize);
        assert!(store.current_weight() <= store.weight_capacity() + 1e-4);
    }

    #[test]
    fn test_capacity_full() {
        let mut store = store(InventoryConfig::default().with_capacity(1).with_weight_capacity(100.0));

        let first = store.try_add_item(&"sword".into(), 1);
        assert_eq!(first.outcome, AddOutcome::AddedAll);

        let second = store.try_add_item(&"shield".into(), 1);
        assert_eq!(second.outcome, AddOutcome::AddedNone);
        assert!(matches!(second.reason, Some(InventoryError::CapacityFull { .. })));
        assert_eq!(
            second.error_text(),
            "Couldn't add Shield to Inventory. Inventory is full."
        );
        assert_eq!(store.len(), 1);
        assert_invariants(&store);
    }

    #[test]
    fn test_weight_limited_partial_add() {
        let mut store = store(InventoryConfig::default().with_weight_capacity(6.0));

        let result = store.try_add_item(&"ore".into(), 5);
        assert_eq!(result.outcome, AddOutcome::AddedSome);
        assert_eq!(result.given, 3);
        assert!(matches!(result.reason, Some(InventoryError::WeightFull { .. })));
        assert_eq!(store.count_of(&"ore".into()), 3);
        assert_relative_eq!(store.current_weight(), 6.0);
        assert_invariants(&store);

        let again = store.try_add_item(&"ore".into(), 1);
        assert_eq!(again.outcome, AddOutcome::AddedNone);
        assert!(matches!(again.reason, Some(InventoryError::WeightFull { .. })));
    }

    #[test]
    fn test_replica_add_is_rejected() {
        let mut store = InventoryStore::new(
            EntityId::new(1),
            NetRole::Replica,
            InventoryConfig::default(),
            catalog(),
        );

        let result = store.try_add_item(&"arrow".into(), 3);
        assert_eq!(result.outcome, AddOutcome::AddedNone);
        assert_eq!(result.reason, Some(InventoryError::NotAuthoritative));
        assert_eq!(store.revision(), Revision::ZERO);
        assert!(store.is_empty());
    }

    #[test]
    fn test_stack_grows_instead_of_splitting() {
        let mut store = store(InventoryConfig::default());

        store.try_add_item(&"arrow".into(), 20);
        let result = store.try_add_item(&"arrow".into(), 20);
        assert_eq!(result.outcome, AddOutcome::AddedAll);
        assert_eq!(store.len(), 1);
        assert_eq!(store.count_of(&"arrow".into()), 40);

        // Only 10 more fit in the stack
        let result = store.try_add_item(&"arrow".into(), 20);
        assert_eq!(result.outcome, AddOutcome::AddedSome);
        assert_eq!(result.given, 10);
        assert!(matches!(result.reason, Some(InventoryError::StackFull { .. })));
        assert_eq!(store.len(), 1);

        let result = store.try_add_item(&"arrow".into(), 1);
        assert_eq!(result.outcome, AddOutcome::AddedNone);
        assert_eq!(
            result.error_text(),
            "Couldn't add Arrow. Tried adding items to a stack that was full."
        );
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_new_stack_capped_at_max_stack() {
        let mut store = store(InventoryConfig::default());

        let result = store.try_add_item(&"ore".into(), 8);
        assert_eq!(result.outcome, AddOutcome::AddedSome);
        assert_eq!(result.given, 5);
        assert!(matches!(result.reason, Some(InventoryError::StackFull { .. })));
    }

    #[test]
    fn test_non_stackable_normalized_to_one() {
        let mut store = store(InventoryConfig::default());

        let result = store.try_add_item(&"sword".into(), 4);
        assert_eq!(result.outcome, AddOutcome::AddedAll);
        assert_eq!(result.requested, 1);
        assert_eq!(result.given, 1);

        store.try_add_item(&"sword".into(), 1);
        assert_eq!(store.len(), 2);
        assert_eq!(store.count_of(&"sword".into()), 2);
    }

    #[test]
    fn test_non_stackable_weight_full() {
        let mut store = store(InventoryConfig::default().with_weight_capacity(15.0));

        store.try_add_item(&"sword".into(), 1);
        let result = store.try_add_item(&"shield".into(), 1);
        assert_eq!(result.outcome, AddOutcome::AddedNone);
        assert_eq!(result.error_text(), "Couldn't add Shield, too much weight.");
        assert_invariants(&store);
    }

    #[test]
    fn test_weightless_items_ignore_budget() {
        let mut store = store(InventoryConfig::default().with_weight_capacity(0.0));

        let result = store.try_add_item(&"note".into(), 3);
        assert_eq!(result.outcome, AddOutcome::AddedAll);
        assert_eq!(store.current_weight(), 0.0);
    }

    #[test]
    fn test_fractional_weights_admit_exactly() {
        let mut store = store(InventoryConfig::default().with_weight_capacity(0.3));

        let result = store.try_add_item(&"arrow".into(), 10);
        assert_eq!(result.given, 3);
        assert_invariants(&store);
    }

    #[test]
    fn test_zero_admit_creates_no_stack() {
        let mut store = store(InventoryConfig::default().with_weight_capacity(1.0));

        let result = store.try_add_item(&"ore".into(), 2);
        assert_eq!(result.outcome, AddOutcome::AddedNone);
        assert!(store.is_empty());
        assert_eq!(store.revision(), Revision::ZERO);
    }

    #[test]
    fn test_unknown_kind_and_zero_quantity() {
        let mut store = store(InventoryConfig::default());

        let result = store.try_add_item(&"dragon".into(), 1);
        assert!(matches!(result.reason, Some(InventoryError::UnknownKind(_))));

        let result = store.try_add_item(&"arrow".into(), 0);
        assert_eq!(result.outcome, AddOutcome::AddedNone);
        assert!(matches!(result.reason, Some(InventoryError::InvalidQuantity { .. })));
        assert_eq!(store.revision(), Revision::ZERO);
    }

    #[test]
    fn test_admission_is_monotonic() {
        // Admitting into a roomier inventory never admits less
        let mut previous = 0;
        for weight_capacity in [0.0, 1.0, 2.0, 3.5, 6.0, 8.0, 20.0] {
            let mut store = store(InventoryConfig::default().with_weight_capacity(weight_capacity));
            let given = store.try_add_item(&"ore".into(), 5).given;
            assert!(given >= previous);
            previous = given;
        }
        assert_eq!(previous, 5);
    }

    #[test]
    fn test_invariants_hold_across_adds() {
        let mut store = store(InventoryConfig::default().with_capacity(3).with_weight_capacity(25.0));
        for kind in ["sword", "ore", "arrow", "shield", "ore", "food", "note"] {
            store.try_add_item(&kind.into(), 7);
            assert_invariants(&store);
        }
    }

    #[test]
    fn test_consume_round_trip() {
        let mut store = store(InventoryConfig::default());
        let id = store.try_add_item(&"arrow".into(), 12).item.unwrap();
        let before = store.revision();

        assert_eq!(store.consume_item(id, 5), 5);
        assert_eq!(store.find_item_by_id(id).unwrap().quantity(), 7);
        assert!(store.revision() > before);

        assert_eq!(store.consume_item(id, 100), 7);
        assert!(store.find_item_by_id(id).is_none());
        assert!(store.is_empty());
        assert_eq!(store.current_weight(), 0.0);

        assert_eq!(store.consume_item(id, 1), 0);
    }

    #[test]
    fn test_consume_zero_is_rejected() {
        let mut store = store(InventoryConfig::default());
        let id = store.try_add_item(&"arrow".into(), 2).item.unwrap();
        let revision = store.revision();

        assert_eq!(store.consume_item(id, 0), 0);
        assert_eq!(store.revision(), revision);
    }

    #[test]
    fn test_consume_all() {
        let mut store = store(InventoryConfig::default());
        let id = store.try_add_item(&"food".into(), 4).item.unwrap();

        assert_eq!(store.consume_all(id), 4);
        assert!(!store.has_item(&"food".into(), 1));
    }

    #[test]
    fn test_remove_and_set_quantity() {
        let mut store = store(InventoryConfig::default().with_weight_capacity(8.0));
        let ore = store.try_add_item(&"ore".into(), 1).item.unwrap();

        // Weight budget allows 3 more, stack allows 4 more
        assert!(store.set_item_quantity(ore, 5));
        assert_eq!(store.find_item_by_id(ore).unwrap().quantity(), 4);
        assert_invariants(&store);

        assert!(store.set_item_quantity(ore, 0));
        assert!(store.is_empty());
        assert!(!store.remove_item(ore));
    }

    #[test]
    fn test_subtype_queries() {
        let mut store = store(InventoryConfig::default());
        store.try_add_item(&"apple".into(), 2);
        store.try_add_item(&"food".into(), 1);
        store.try_add_item(&"arrow".into(), 1);

        assert_eq!(store.find_items_by_kind(&"food".into()).len(), 2);
        assert_eq!(store.find_items_by_kind(&"apple".into()).len(), 1);
        assert_eq!(store.find_item(&"food".into()).unwrap().quantity(), 1);
        assert!(store.has_item(&"apple".into(), 2));
        assert!(!store.has_item(&"apple".into(), 3));
    }

    #[test]
    fn test_items_attach_to_owner() {
        let mut store = store(InventoryConfig::default());
        let id = store.try_add_item(&"arrow".into(), 1).item.unwrap();
        assert_eq!(store.find_item_by_id(id).unwrap().owner(), Some(EntityId::new(1)));
    }

    #[test]
    fn test_capacity_setters() {
        let mut store = store(InventoryConfig::default());
        store.try_add_item(&"sword".into(), 1);
        store.try_add_item(&"shield".into(), 1);

        store.set_capacity(1);
        assert_eq!(store.capacity(), 2);
        store.set_capacity(1000);
        assert_eq!(store.capacity(), MAX_CAPACITY);

        store.set_weight_capacity(5.0);
        assert_relative_eq!(store.weight_capacity(), 20.0);
        store.set_weight_capacity(30.0);
        assert_relative_eq!(store.weight_capacity(), 30.0);
    }

    #[test]
    fn test_event_order() {
        let mut store = store(InventoryConfig::default());
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = log.clone();
        store.subscribe(move |event| {
            let name = match event {
                InventoryEvent::Updated { .. } => "updated",
                InventoryEvent::ItemAdded { .. } => "added",
                InventoryEvent::ItemRemoved { .. } => "removed",
                InventoryEvent::ItemModified { .. } => "modified",
            };
            sink.lock().push(name);
        });

        let id = store.try_add_item(&"arrow".into(), 2).item.unwrap();
        store.try_add_item(&"arrow".into(), 2);
        store.consume_item(id, 1);
        store.remove_item(id);

        assert_eq!(
            *log.lock(),
            vec![
                "added", "updated", "modified", "updated", "modified", "updated", "removed",
                "updated"
            ]
        );
    }

    #[test]
    fn test_replica_mutations_are_noops() {
        let mut authority = store(InventoryConfig::default());
        let id = authority.try_add_item(&"arrow".into(), 3).item.unwrap();

        let mut replica = InventoryStore::new(
            EntityId::new(1),
            NetRole::Replica,
            InventoryConfig::default(),
            catalog(),
        );
        replica.apply_snapshot(authority.snapshot());
        let revision = replica.revision();

        assert!(!replica.remove_item(id));
        assert_eq!(replica.consume_item(id, 1), 0);
        assert!(!replica.set_item_quantity(id, 1));
        replica.set_capacity(1);
        assert_eq!(replica.revision(), revision);
        assert_eq!(replica.count_of(&"arrow".into()), 3);
    }
}
