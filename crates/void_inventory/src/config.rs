//! Inventory configuration

use serde::{Deserialize, Serialize};

/// Upper bound for the slot capacity of a single inventory
pub const MAX_CAPACITY: u32 = 200;

/// Inventory configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryConfig {
    /// Maximum number of distinct stacks
    pub capacity: u32,
    /// Maximum total weight
    pub weight_capacity: f32,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            capacity: 20,
            weight_capacity: 80.0,
        }
    }
}

impl InventoryConfig {
    /// Set slot capacity (clamped to [`MAX_CAPACITY`])
    pub fn with_capacity(mut self, capacity: u32) -> Self {
        self.capacity = capacity.min(MAX_CAPACITY);
        self
    }

    /// Set weight capacity
    pub fn with_weight_capacity(mut self, weight: f32) -> Self {
        self.weight_capacity = weight.max(0.0);
        self
    }
}
