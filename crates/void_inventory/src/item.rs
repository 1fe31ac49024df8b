//! Item definitions, the item catalog and item stacks

use crate::behavior::ItemBehavior;
use crate::error::{CatalogError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use void_core::{EntityId, Revision};

/// Identity of an item definition
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemKind(String);

impl ItemKind {
    /// Create a kind from its name
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Get the kind name
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ItemKind {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ItemKind {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Item rarity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemRarity {
    /// Common items
    #[default]
    Common,
    /// Uncommon items
    Uncommon,
    /// Rare items
    Rare,
    /// Epic items
    Epic,
    /// Legendary items
    Legendary,
}

/// Item definition
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemDefinition {
    /// Unique kind
    pub kind: ItemKind,
    /// Kind this one specializes (for subtype queries)
    pub parent: Option<ItemKind>,
    /// Display name
    pub display_name: String,
    /// Description
    pub description: String,
    /// Prompt shown for the use action
    pub use_action_text: String,
    /// Rarity
    pub rarity: ItemRarity,
    /// Weight per unit
    pub weight: f32,
    /// Whether several units share one stack
    pub stackable: bool,
    /// Maximum stack size for stackable items
    pub max_stack: u32,
    /// Parent chain, nearest first; filled in by the catalog
    #[serde(skip)]
    ancestors: Vec<ItemKind>,
}

impl ItemDefinition {
    /// Create a new item definition
    pub fn new(kind: impl Into<ItemKind>, display_name: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            parent: None,
            display_name: display_name.into(),
            description: String::new(),
            use_action_text: "Use".to_string(),
            rarity: ItemRarity::default(),
            weight: 0.01,
            stackable: true,
            max_stack: 2,
            ancestors: Vec::new(),
        }
    }

    /// Set parent kind
    pub fn with_parent(mut self, parent: impl Into<ItemKind>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Set description
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    /// Set use action text
    pub fn with_use_action(mut self, text: impl Into<String>) -> Self {
        self.use_action_text = text.into();
        self
    }

    /// Set rarity
    pub fn with_rarity(mut self, rarity: ItemRarity) -> Self {
        self.rarity = rarity;
        self
    }

    /// Set weight per unit
    pub fn with_weight(mut self, weight: f32) -> Self {
        self.weight = weight.max(0.0);
        self
    }

    /// Make stackable with the given max stack size
    pub fn with_max_stack(mut self, max: u32) -> Self {
        self.stackable = true;
        self.max_stack = max.max(1);
        self
    }

    /// Make non-stackable (one unit per slot)
    pub fn non_stackable(mut self) -> Self {
        self.stackable = false;
        self
    }

    /// Check if stackable
    pub fn is_stackable(&self) -> bool {
        self.stackable
    }

    /// Effective stack limit: `max_stack` when stackable, else 1
    pub fn max_stack_size(&self) -> u32 {
        if self.stackable {
            self.max_stack.max(1)
        } else {
            1
        }
    }

    /// Check if this definition is `kind` or derives from it
    pub fn is_a(&self, kind: &ItemKind) -> bool {
        &self.kind == kind || self.ancestors.contains(kind)
    }

    /// Parent chain, nearest first
    pub fn ancestors(&self) -> &[ItemKind] {
        &self.ancestors
    }
}

impl Default for ItemDefinition {
    fn default() -> Self {
        Self::new("unknown", "Item")
    }
}

/// Registry of item definitions and their behaviors
#[derive(Default)]
pub struct ItemCatalog {
    definitions: HashMap<ItemKind, Arc<ItemDefinition>>,
    behaviors: HashMap<ItemKind, Arc<dyn ItemBehavior>>,
}

impl ItemCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Load definitions from a JSON array.
    ///
    /// Parents may appear after their children in the file.
    pub fn from_json(json: &str) -> Result<Self> {
        let mut pending: Vec<ItemDefinition> = serde_json::from_str(json)?;
        let mut catalog = Self::new();

        while !pending.is_empty() {
            let before = pending.len();
            let mut deferred = Vec::new();
            for definition in pending {
                let parent_ready = definition
                    .parent
                    .as_ref()
                    .map_or(true, |parent| catalog.contains(parent));
                if parent_ready {
                    catalog.register(definition)?;
                } else {
                    deferred.push(definition);
                }
            }
            if deferred.len() == before {
                // Nothing resolved this pass: report the first dangling parent
                let orphan = deferred.swap_remove(0);
                let parent = orphan.parent.unwrap_or_else(|| orphan.kind.clone());
                return Err(CatalogError::UnknownParent {
                    kind: orphan.kind,
                    parent,
                });
            }
            pending = deferred;
        }

        Ok(catalog)
    }

    /// Register a definition
    pub fn register(&mut self, mut definition: ItemDefinition) -> Result<Arc<ItemDefinition>> {
        if self.definitions.contains_key(&definition.kind) {
            return Err(CatalogError::AlreadyRegistered(definition.kind));
        }

        definition.ancestors.clear();
        if let Some(parent) = definition.parent.clone() {
            let Some(parent_def) = self.definitions.get(&parent) else {
                return Err(CatalogError::UnknownParent {
                    kind: definition.kind,
                    parent,
                });
            };
            definition.ancestors.push(parent);
            definition
                .ancestors
                .extend(parent_def.ancestors.iter().cloned());
        }

        let definition = Arc::new(definition);
        self.definitions
            .insert(definition.kind.clone(), definition.clone());
        Ok(definition)
    }

    /// Attach a use behavior to a kind (inherited by its subtypes)
    pub fn with_behavior(mut self, kind: impl Into<ItemKind>, behavior: Arc<dyn ItemBehavior>) -> Self {
        self.set_behavior(kind, behavior);
        self
    }

    /// Attach a use behavior to a kind (inherited by its subtypes)
    pub fn set_behavior(&mut self, kind: impl Into<ItemKind>, behavior: Arc<dyn ItemBehavior>) {
        self.behaviors.insert(kind.into(), behavior);
    }

    /// Get a definition
    pub fn get(&self, kind: &ItemKind) -> Option<&Arc<ItemDefinition>> {
        self.definitions.get(kind)
    }

    /// Check if a kind is registered
    pub fn contains(&self, kind: &ItemKind) -> bool {
        self.definitions.contains_key(kind)
    }

    /// Check if `kind` is `ancestor` or one of its subtypes
    pub fn is_kind_of(&self, kind: &ItemKind, ancestor: &ItemKind) -> bool {
        self.definitions
            .get(kind)
            .map(|definition| definition.is_a(ancestor))
            .unwrap_or(false)
    }

    /// Behavior for a kind, falling back to the nearest ancestor's
    pub fn behavior_for(&self, kind: &ItemKind) -> Option<Arc<dyn ItemBehavior>> {
        if let Some(behavior) = self.behaviors.get(kind) {
            return Some(behavior.clone());
        }
        let definition = self.definitions.get(kind)?;
        definition
            .ancestors
            .iter()
            .find_map(|ancestor| self.behaviors.get(ancestor).cloned())
    }

    /// Number of definitions
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Check if the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

impl fmt::Debug for ItemCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ItemCatalog")
            .field("definitions", &self.definitions.len())
            .field("behaviors", &self.behaviors.len())
            .finish()
    }
}

/// Stable id of an item stack, assigned by the authority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemId(pub u64);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "item{}", self.0)
    }
}

/// A stack of one item kind.
///
/// Stacks are created by an inventory. `owner` names the inventory's entity
/// and is `None` once the stack has been removed; it never keeps the
/// inventory alive.
#[derive(Debug, Clone)]
pub struct Item {
    id: ItemId,
    definition: Arc<ItemDefinition>,
    quantity: u32,
    revision: Revision,
    owner: Option<EntityId>,
}

impl Item {
    /// Create a detached stack; quantity is clamped to the stack limit
    pub fn new(id: ItemId, definition: Arc<ItemDefinition>, quantity: u32) -> Self {
        let quantity = quantity.min(definition.max_stack_size());
        Self {
            id,
            definition,
            quantity,
            revision: Revision::ZERO,
            owner: None,
        }
    }

    /// Stable id
    pub fn id(&self) -> ItemId {
        self.id
    }

    /// Item kind
    pub fn kind(&self) -> &ItemKind {
        &self.definition.kind
    }

    /// Definition
    pub fn definition(&self) -> &Arc<ItemDefinition> {
        &self.definition
    }

    /// Display name
    pub fn display_name(&self) -> &str {
        &self.definition.display_name
    }

    /// Units in this stack
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Stack limit
    pub fn max_stack_size(&self) -> u32 {
        self.definition.max_stack_size()
    }

    /// Check if stackable
    pub fn is_stackable(&self) -> bool {
        self.definition.is_stackable()
    }

    /// Check if the stack is at its limit
    pub fn is_stack_full(&self) -> bool {
        self.quantity >= self.max_stack_size()
    }

    /// Weight of one unit
    pub fn unit_weight(&self) -> f32 {
        self.definition.weight
    }

    /// Weight of the whole stack
    pub fn stack_weight(&self) -> f32 {
        self.quantity as f32 * self.definition.weight
    }

    /// Revision, bumped on every quantity change
    pub fn revision(&self) -> Revision {
        self.revision
    }

    /// Entity of the owning inventory, if any
    pub fn owner(&self) -> Option<EntityId> {
        self.owner
    }

    /// Check if the stack belongs to no inventory
    pub fn is_detached(&self) -> bool {
        self.owner.is_none()
    }

    /// Set the quantity, clamped to `[0, max_stack_size]`.
    ///
    /// Returns whether the stored quantity changed; only then is the
    /// revision bumped. Inventories use the return value to mark themselves
    /// dirty for replication.
    pub fn set_quantity(&mut self, quantity: u32) -> bool {
        let clamped = quantity.min(self.max_stack_size());
        if clamped == self.quantity {
            return false;
        }
        self.quantity = clamped;
        self.revision.bump();
        true
    }

    pub(crate) fn attach(&mut self, owner: EntityId) {
        self.owner = Some(owner);
    }

    pub(crate) fn detach(&mut self) {
        self.owner = None;
    }

    /// Overwrite state with values received from the authority
    pub(crate) fn apply_replicated(&mut self, quantity: u32, revision: Revision) -> bool {
        debug_assert!(
            quantity <= self.max_stack_size(),
            "replicated quantity {} exceeds stack limit {}",
            quantity,
            self.max_stack_size()
        );
        let quantity = quantity.min(self.max_stack_size());
        let changed = quantity != self.quantity;
        self.quantity = quantity;
        self.revision = revision;
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arrow() -> Arc<ItemDefinition> {
        Arc::new(
            ItemDefinition::new("arrow", "Arrow")
                .with_weight(0.1)
                .with_max_stack(10),
        )
    }

    #[test]
    fn test_item_definition() {
        let item = ItemDefinition::new("health_potion", "Health Potion")
            .with_rarity(ItemRarity::Uncommon)
            .with_max_stack(10)
            .with_use_action("Drink");

        assert_eq!(item.kind, ItemKind::new("health_potion"));
        assert!(item.is_stackable());
        assert_eq!(item.max_stack_size(), 10);
        assert_eq!(item.use_action_text, "Drink");
    }

    #[test]
    fn test_non_stackable_limit() {
        let sword = ItemDefinition::new("sword", "Sword")
            .with_max_stack(10)
            .non_stackable();
        assert_eq!(sword.max_stack_size(), 1);
    }

    #[test]
    fn test_set_quantity_clamps_and_bumps_revision() {
        let mut stack = Item::new(ItemId(1), arrow(), 3);
        assert_eq!(stack.revision(), Revision::ZERO);

        assert!(stack.set_quantity(25));
        assert_eq!(stack.quantity(), 10);
        assert_eq!(stack.revision(), Revision::new(1));

        // Clamps to the same value: no change, no bump
        assert!(!stack.set_quantity(40));
        assert_eq!(stack.revision(), Revision::new(1));

        assert!(stack.set_quantity(0));
        assert_eq!(stack.quantity(), 0);
        assert_eq!(stack.revision(), Revision::new(2));
    }

    #[test]
    fn test_new_item_is_detached_and_clamped() {
        let stack = Item::new(ItemId(2), arrow(), 99);
        assert!(stack.is_detached());
        assert_eq!(stack.quantity(), 10);
        assert!(stack.is_stack_full());
        assert!((stack.stack_weight() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_catalog_taxonomy() {
        let mut catalog = ItemCatalog::new();
        catalog
            .register(ItemDefinition::new("consumable", "Consumable"))
            .unwrap();
        catalog
            .register(ItemDefinition::new("food", "Food").with_parent("consumable"))
            .unwrap();
        catalog
            .register(ItemDefinition::new("apple", "Apple").with_parent("food"))
            .unwrap();

        let apple = ItemKind::new("apple");
        assert!(catalog.is_kind_of(&apple, &"food".into()));
        assert!(catalog.is_kind_of(&apple, &"consumable".into()));
        assert!(catalog.is_kind_of(&apple, &apple));
        assert!(!catalog.is_kind_of(&"food".into(), &apple));
        assert_eq!(
            catalog.get(&apple).unwrap().ancestors(),
            &[ItemKind::new("food"), ItemKind::new("consumable")]
        );
    }

    #[test]
    fn test_catalog_rejects_duplicates_and_dangling_parents() {
        let mut catalog = ItemCatalog::new();
        catalog.register(ItemDefinition::new("gem", "Gem")).unwrap();

        assert!(matches!(
            catalog.register(ItemDefinition::new("gem", "Gem")),
            Err(CatalogError::AlreadyRegistered(_))
        ));
        assert!(matches!(
            catalog.register(ItemDefinition::new("ruby", "Ruby").with_parent("jewel")),
            Err(CatalogError::UnknownParent { .. })
        ));
    }

    #[test]
    fn test_catalog_from_json() {
        let json = r#"[
            { "kind": "apple", "display_name": "Apple", "parent": "food", "max_stack": 5, "weight": 0.5 },
            { "kind": "food", "display_name": "Food" },
            { "kind": "sword", "display_name": "Sword", "stackable": false, "weight": 4.0, "rarity": "rare" }
        ]"#;

        let catalog = ItemCatalog::from_json(json).unwrap();
        assert_eq!(catalog.len(), 3);

        let apple = catalog.get(&"apple".into()).unwrap();
        assert_eq!(apple.max_stack_size(), 5);
        assert!(apple.is_a(&"food".into()));

        let sword = catalog.get(&"sword".into()).unwrap();
        assert!(!sword.is_stackable());
        assert_eq!(sword.rarity, ItemRarity::Rare);
    }

    #[test]
    fn test_catalog_from_json_dangling_parent() {
        let json = r#"[{ "kind": "apple", "display_name": "Apple", "parent": "food" }]"#;
        assert!(matches!(
            ItemCatalog::from_json(json),
            Err(CatalogError::UnknownParent { .. })
        ));
    }
}
