//! World pickups

use crate::error::InventoryError;
use crate::inventory::InventoryStore;
use crate::item::ItemKind;
use crate::result::AddResult;
use serde::{Deserialize, Serialize};
use void_core::EntityId;

/// Items lying in the world.
///
/// A pickup is independent of any inventory: dropping creates a new one and
/// collecting moves units out of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pickup {
    /// Item kind
    pub kind: ItemKind,
    /// Units left
    pub quantity: u32,
    /// Whether the pickup can be collected
    pub enabled: bool,
    /// Entity whose inventory dropped this
    pub dropped_by: Option<EntityId>,
    /// World position
    pub position: [f32; 3],
    /// Collection radius
    pub radius: f32,
}

impl Pickup {
    /// Create a new pickup
    pub fn new(kind: impl Into<ItemKind>, quantity: u32) -> Self {
        Self {
            kind: kind.into(),
            quantity,
            enabled: quantity > 0,
            dropped_by: None,
            position: [0.0; 3],
            radius: 1.0,
        }
    }

    /// Set world position
    pub fn with_position(mut self, position: [f32; 3]) -> Self {
        self.position = position;
        self
    }

    /// Set pickup radius
    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }

    /// Record the dropping inventory
    pub fn with_dropped_by(mut self, owner: EntityId) -> Self {
        self.dropped_by = Some(owner);
        self
    }

    /// Check if anything can be collected
    pub fn can_pickup(&self) -> bool {
        self.enabled && self.quantity > 0
    }

    /// Check if everything was collected
    pub fn is_depleted(&self) -> bool {
        self.quantity == 0
    }

    /// Check if a position is within collection range
    pub fn in_range(&self, picker_pos: [f32; 3]) -> bool {
        let dx = picker_pos[0] - self.position[0];
        let dy = picker_pos[1] - self.position[1];
        let dz = picker_pos[2] - self.position[2];
        dx * dx + dy * dy + dz * dz <= self.radius * self.radius
    }

    /// Move as many units as fit into `store`.
    ///
    /// Whatever does not fit stays in the pickup; an emptied pickup disables
    /// itself.
    pub fn collect_into(&mut self, store: &mut InventoryStore) -> AddResult {
        if !self.can_pickup() {
            return AddResult::added_none(
                0,
                InventoryError::InvalidQuantity {
                    requested: 0,
                    available: self.quantity,
                },
            );
        }

        let result = store.try_add_item(&self.kind, self.quantity);
        self.quantity -= result.given;
        if self.quantity == 0 {
            self.enabled = false;
        }
        if result.given > 0 {
            log::debug!(
                "{} collected {} x{} ({} left)",
                store.owner(),
                self.kind,
                result.given,
                self.quantity
            );
        }
        result
    }
}
