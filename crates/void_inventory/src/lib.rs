//! Void Inventory - Item and Inventory System
//!
//! This crate provides the server-authoritative inventory used by player
//! characters and containers.
//!
//! # Features
//!
//! - Item catalog with a kind taxonomy (subtype queries), loadable from JSON
//! - Inventory store with slot capacity and a shared weight budget
//! - Deterministic, partially-successful item admission ([`AddResult`])
//! - Authority-gated mutation; replicas forward requests instead
//! - Revision-gated full-snapshot replication with added/removed/modified
//!   notifications on the replica side
//! - Item use hooks and world pickups
//!
//! # Example
//!
//! ```ignore
//! use void_inventory::prelude::*;
//!
//! let mut catalog = ItemCatalog::new();
//! catalog.register(
//!     ItemDefinition::new("arrow", "Arrow")
//!         .with_weight(0.1)
//!         .with_max_stack(50),
//! )?;
//!
//! let mut inventory = InventoryStore::new(
//!     player,
//!     NetRole::Authority,
//!     InventoryConfig::default(),
//!     Arc::new(catalog),
//! );
//! let result = inventory.try_add_item(&"arrow".into(), 20);
//! assert_eq!(result.outcome, AddOutcome::AddedAll);
//! ```

pub mod behavior;
pub mod config;
pub mod error;
pub mod inventory;
pub mod item;
pub mod pickup;
pub mod replication;
pub mod request;
pub mod result;

pub mod prelude {
    pub use crate::behavior::{ConsumeOnUse, ItemBehavior, ItemUseContext};
    pub use crate::config::{InventoryConfig, MAX_CAPACITY};
    pub use crate::error::{CatalogError, InventoryError};
    pub use crate::inventory::{InventoryEvent, InventoryStore};
    pub use crate::item::{Item, ItemCatalog, ItemDefinition, ItemId, ItemKind, ItemRarity};
    pub use crate::pickup::Pickup;
    pub use crate::replication::{InventorySnapshot, ItemSnapshot};
    pub use crate::request::{InventoryRequest, RequestOutcome};
    pub use crate::result::{AddOutcome, AddResult};
}

pub use prelude::*;
