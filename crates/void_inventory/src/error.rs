//! Error types for the inventory system

use crate::item::ItemKind;
use thiserror::Error;

/// Reasons an inventory mutation did not (fully) happen.
///
/// These are reported inside results, never raised: callers decide whether
/// to retry, drop the excess or show the message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InventoryError {
    /// No free slot for a new stack
    #[error("Couldn't add {item} to Inventory. Inventory is full.")]
    CapacityFull { item: String },

    /// The stack of this kind is already at its maximum size
    #[error("Couldn't add {item}. Tried adding items to a stack that was full.")]
    StackFull { item: String },

    /// Not enough weight budget left
    #[error("Couldn't add {item}, too much weight.")]
    WeightFull { item: String },

    /// Mutation attempted on a replica
    #[error("Inventory can only be modified by the authority")]
    NotAuthoritative,

    /// Zero quantity, or more than the source stack holds
    #[error("Invalid quantity {requested} (available: {available})")]
    InvalidQuantity { requested: u32, available: u32 },

    /// The item kind is not in the catalog
    #[error("Unknown item kind: {0}")]
    UnknownKind(ItemKind),

    /// The item is not in this inventory
    #[error("Item not found in inventory")]
    ItemNotFound,
}

/// Item catalog errors
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A definition with this kind already exists
    #[error("Item kind already registered: {0}")]
    AlreadyRegistered(ItemKind),

    /// The parent kind has not been registered
    #[error("Item kind {kind} derives from unknown kind {parent}")]
    UnknownParent { kind: ItemKind, parent: ItemKind },

    /// Catalog file could not be parsed
    #[error("Failed to parse item catalog: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Result type for catalog operations
pub type Result<T> = std::result::Result<T, CatalogError>;
