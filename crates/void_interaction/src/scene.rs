//! Interaction targets and countdowns of one simulation

use crate::target::InteractionTarget;
use crate::timer::InteractionTimers;
use std::collections::HashMap;
use void_core::EntityId;

/// Every interactable object plus the running countdowns
#[derive(Debug, Default)]
pub struct InteractionScene {
    targets: HashMap<EntityId, InteractionTarget>,
    timers: InteractionTimers,
}

impl InteractionScene {
    /// Create an empty scene
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a target, returning the one it replaced
    pub fn spawn(&mut self, target: InteractionTarget) -> Option<InteractionTarget> {
        self.targets.insert(target.id(), target)
    }

    /// Remove a target without notifying anyone
    pub(crate) fn remove(&mut self, id: EntityId) -> Option<InteractionTarget> {
        self.targets.remove(&id)
    }

    /// Get a target
    pub fn get(&self, id: EntityId) -> Option<&InteractionTarget> {
        self.targets.get(&id)
    }

    /// Get a mutable target
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut InteractionTarget> {
        self.targets.get_mut(&id)
    }

    /// Check if a target exists
    pub fn contains(&self, id: EntityId) -> bool {
        self.targets.contains_key(&id)
    }

    /// Check if a target exists and accepts focus
    pub fn is_available(&self, id: EntityId) -> bool {
        self.targets
            .get(&id)
            .map(|target| target.is_available())
            .unwrap_or(false)
    }

    /// Iterate over targets
    pub fn targets(&self) -> impl Iterator<Item = &InteractionTarget> {
        self.targets.values()
    }

    /// Number of targets
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Check if there are no targets
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Running countdowns
    pub fn timers(&self) -> &InteractionTimers {
        &self.timers
    }

    /// Running countdowns
    pub fn timers_mut(&mut self) -> &mut InteractionTimers {
        &mut self.timers
    }

    /// Progress of a target's first interactor
    pub fn interact_percentage(&self, id: EntityId, now: f64) -> f32 {
        self.targets
            .get(&id)
            .map(|target| target.interact_percentage(&self.timers, now))
            .unwrap_or(0.0)
    }
}
