//! Outcome of an add attempt

use crate::error::InventoryError;
use crate::item::ItemId;

/// How much of an add request was admitted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// Nothing was added
    AddedNone,
    /// Part of the request was added
    AddedSome,
    /// The whole request was added
    AddedAll,
}

/// Result of [`InventoryStore::try_add_item`](crate::InventoryStore::try_add_item)
#[derive(Debug, Clone, PartialEq)]
pub struct AddResult {
    /// Amount the caller asked for (after normalization)
    pub requested: u32,
    /// Amount actually admitted
    pub given: u32,
    /// Outcome
    pub outcome: AddOutcome,
    /// Why the request was not fully admitted
    pub reason: Option<InventoryError>,
    /// Stack the items went into
    pub item: Option<ItemId>,
}

impl AddResult {
    /// Nothing added
    pub fn added_none(requested: u32, reason: InventoryError) -> Self {
        Self {
            requested,
            given: 0,
            outcome: AddOutcome::AddedNone,
            reason: Some(reason),
            item: None,
        }
    }

    /// Part of the request added
    pub fn added_some(requested: u32, given: u32, item: ItemId, reason: InventoryError) -> Self {
        debug_assert!(given > 0 && given < requested);
        Self {
            requested,
            given,
            outcome: AddOutcome::AddedSome,
            reason: Some(reason),
            item: Some(item),
        }
    }

    /// Everything added
    pub fn added_all(requested: u32, item: ItemId) -> Self {
        Self {
            requested,
            given: requested,
            outcome: AddOutcome::AddedAll,
            reason: None,
            item: Some(item),
        }
    }

    /// Check if anything was added
    pub fn is_success(&self) -> bool {
        self.given > 0
    }

    /// Amount not admitted
    pub fn remainder(&self) -> u32 {
        self.requested - self.given
    }

    /// Human-facing text for the failure, empty on full success
    pub fn error_text(&self) -> String {
        self.reason
            .as_ref()
            .map(|reason| reason.to_string())
            .unwrap_or_default()
    }
}
