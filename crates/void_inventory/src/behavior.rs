//! Item use hooks

use crate::inventory::InventoryStore;
use crate::item::ItemId;
use void_core::EntityId;

/// Context handed to item use hooks
pub struct ItemUseContext<'a> {
    /// Inventory holding the item
    pub store: &'a mut InventoryStore,
    /// Item being used
    pub item: ItemId,
    /// Entity using the item
    pub actor: EntityId,
}

/// Gameplay behavior attached to an item kind.
///
/// `on_use` runs first and is meant for bookkeeping shared by every item of a
/// family; `use_item` carries the kind specific effect. Both may run
/// speculatively on a replica, where the store rejects mutations, so effects
/// that matter must go through the store.
pub trait ItemBehavior: Send + Sync {
    /// Called before `use_item`
    fn on_use(&self, _ctx: &mut ItemUseContext<'_>) {}

    /// Apply the item's effect
    fn use_item(&self, _ctx: &mut ItemUseContext<'_>) {}
}

/// Behavior that consumes one unit per use
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsumeOnUse;

impl ItemBehavior for ConsumeOnUse {
    fn use_item(&self, ctx: &mut ItemUseContext<'_>) {
        ctx.store.consume_item(ctx.item, 1);
    }
}
