//! Interactable objects

use crate::config::{InteractionTargetConfig, MIN_INTERACTION_DISTANCE};
use crate::error::{InteractionError, Result};
use crate::events::InteractionEvent;
use crate::timer::InteractionTimers;
use void_core::EntityId;
use void_event::{Multicast, SubscriberId};

/// Interactable component of a world object.
///
/// Holds the set of actors currently interacting, keyed by entity id. A
/// target that only allows one interactor never holds more than one.
pub struct InteractionTarget {
    id: EntityId,
    config: InteractionTargetConfig,
    active: bool,
    owner_present: bool,
    interactors: Vec<EntityId>,
    events: Multicast<InteractionEvent>,
}

impl InteractionTarget {
    /// Create an active target
    pub fn new(id: EntityId, mut config: InteractionTargetConfig) -> Self {
        config.interaction_distance = config.interaction_distance.max(MIN_INTERACTION_DISTANCE);
        Self {
            id,
            config,
            active: true,
            owner_present: true,
            interactors: Vec::new(),
            events: Multicast::new(),
        }
    }

    /// Entity this target belongs to
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Configuration
    pub fn config(&self) -> &InteractionTargetConfig {
        &self.config
    }

    /// Check if the target accepts focus and interaction
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Check if the owning object still exists
    pub fn has_owner(&self) -> bool {
        self.owner_present
    }

    /// Mark the owning object as gone (or back)
    pub fn set_owner_present(&mut self, present: bool) {
        self.owner_present = present;
    }

    /// Check if focus and interaction are possible at all
    pub fn is_available(&self) -> bool {
        self.active && self.owner_present
    }

    /// Actors currently interacting, in arrival order
    pub fn interactors(&self) -> &[EntityId] {
        &self.interactors
    }

    /// Check if an actor is interacting
    pub fn is_interactor(&self, actor: EntityId) -> bool {
        self.interactors.contains(&actor)
    }

    /// Subscribe to this target's events
    pub fn subscribe<F>(&mut self, handler: F) -> SubscriberId
    where
        F: Fn(&InteractionEvent) + Send + Sync + 'static,
    {
        self.events.subscribe(handler)
    }

    /// Unsubscribe from this target's events
    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        self.events.unsubscribe(id)
    }

    /// An actor started looking at this target
    pub fn begin_focus(&mut self, actor: EntityId) {
        if !self.is_available() || actor.is_null() {
            return;
        }
        log::trace!("{} focused {}", actor, self.id);
        self.events.broadcast(&InteractionEvent::BeginFocus {
            target: self.id,
            interactor: actor,
        });
    }

    /// An actor stopped looking at this target; always announced
    pub fn end_focus(&mut self, actor: EntityId) {
        log::trace!("{} unfocused {}", actor, self.id);
        self.events.broadcast(&InteractionEvent::EndFocus {
            target: self.id,
            interactor: actor,
        });
    }

    /// Check if `actor` may interact now.
    ///
    /// A single-interactor target is blocked while anyone holds it.
    pub fn can_interact(&self, actor: EntityId) -> bool {
        if !self.is_available() || actor.is_null() {
            return false;
        }
        self.config.allow_multiple_interactors || self.interactors.is_empty()
    }

    /// Start interacting
    pub fn begin_interact(&mut self, actor: EntityId) -> Result<()> {
        if !self.can_interact(actor) {
            return Err(InteractionError::TargetUnavailable(self.id));
        }
        if !self.interactors.contains(&actor) {
            self.interactors.push(actor);
        }
        debug_assert!(self.config.allow_multiple_interactors || self.interactors.len() <= 1);
        log::debug!("{} began interacting with {}", actor, self.id);
        self.events.broadcast(&InteractionEvent::BeginInteract {
            target: self.id,
            interactor: actor,
        });
        Ok(())
    }

    /// Stop interacting; harmless if `actor` was not interacting
    pub fn end_interact(&mut self, actor: EntityId) {
        self.interactors.retain(|interactor| *interactor != actor);
        log::debug!("{} stopped interacting with {}", actor, self.id);
        self.events.broadcast(&InteractionEvent::EndInteract {
            target: self.id,
            interactor: actor,
        });
    }

    /// Complete the interaction
    pub fn interact(&mut self, actor: EntityId) -> Result<()> {
        if !self.can_interact(actor) {
            return Err(InteractionError::TargetUnavailable(self.id));
        }
        log::debug!("{} interacted with {}", actor, self.id);
        self.events.broadcast(&InteractionEvent::Interact {
            target: self.id,
            interactor: actor,
        });
        Ok(())
    }

    /// Deactivate, force-ending every interactor (latest first).
    ///
    /// Safe to call repeatedly.
    pub fn deactivate(&mut self) {
        self.active = false;
        let interactors = std::mem::take(&mut self.interactors);
        for &actor in interactors.iter().rev() {
            self.end_focus(actor);
            self.end_interact(actor);
        }
    }

    /// Reactivate a deactivated target
    pub fn activate(&mut self) {
        self.active = true;
    }

    /// Progress of the first interactor's countdown in `[0, 1]`
    pub fn interact_percentage(&self, timers: &InteractionTimers, now: f64) -> f32 {
        let Some(&first) = self.interactors.first() else {
            return 0.0;
        };
        if self.config.interaction_time <= f32::EPSILON {
            return 0.0;
        }
        match timers.get(first) {
            Some(pending) if pending.target == self.id => {
                (1.0 - (pending.remaining(now) / self.config.interaction_time).abs()).clamp(0.0, 1.0)
            }
            _ => 0.0,
        }
    }

    /// Set the prompt name
    pub fn set_name_text(&mut self, text: impl Into<String>) {
        self.config.name_text = text.into();
        self.prompt_changed();
    }

    /// Set the prompt verb
    pub fn set_action_text(&mut self, text: impl Into<String>) {
        self.config.action_text = text.into();
        self.prompt_changed();
    }

    /// Set the hold time; running countdowns keep their length
    pub fn set_interaction_time(&mut self, seconds: f32) {
        self.config.interaction_time = seconds.max(0.0);
        self.prompt_changed();
    }

    /// Set the interaction distance; never below [`MIN_INTERACTION_DISTANCE`]
    pub fn set_interaction_distance(&mut self, distance: f32) {
        self.config.interaction_distance = distance.max(MIN_INTERACTION_DISTANCE);
        self.prompt_changed();
    }

    fn prompt_changed(&mut self) {
        self.events
            .broadcast(&InteractionEvent::PromptChanged { target: self.id });
    }
}

impl std::fmt::Debug for InteractionTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InteractionTarget")
            .field("id", &self.id)
            .field("active", &self.active)
            .field("owner_present", &self.owner_present)
            .field("interactors", &self.interactors)
            .field("config", &self.config)
            .finish()
    }
}
