//! Interaction system driving every tracker of one simulation

use crate::config::TrackerConfig;
use crate::error::{InteractionError, Result};
use crate::probe::{Aim, WorldProbe};
use crate::scene::InteractionScene;
use crate::target::InteractionTarget;
use crate::tracker::{InteractionRequest, InteractionTracker};
use std::collections::HashMap;
use void_core::{EntityId, NetRole};

/// Owns the scene and the trackers of one authority or replica.
pub struct InteractionSystem {
    role: NetRole,
    scene: InteractionScene,
    trackers: HashMap<EntityId, InteractionTracker>,
    now: f64,
}

impl InteractionSystem {
    /// Create an empty system
    pub fn new(role: NetRole) -> Self {
        Self {
            role,
            scene: InteractionScene::new(),
            trackers: HashMap::new(),
            now: 0.0,
        }
    }

    /// Network role
    pub fn role(&self) -> NetRole {
        self.role
    }

    /// Simulation time of the last update
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Targets and countdowns
    pub fn scene(&self) -> &InteractionScene {
        &self.scene
    }

    /// Targets and countdowns
    pub fn scene_mut(&mut self) -> &mut InteractionScene {
        &mut self.scene
    }

    /// Add an interactable object
    pub fn spawn_target(&mut self, target: InteractionTarget) {
        if let Some(previous) = self.scene.spawn(target) {
            log::warn!("Replaced interaction target {}", previous.id());
        }
    }

    /// Get a target
    pub fn target(&self, id: EntityId) -> Option<&InteractionTarget> {
        self.scene.get(id)
    }

    /// Get a mutable target
    pub fn target_mut(&mut self, id: EntityId) -> Option<&mut InteractionTarget> {
        self.scene.get_mut(id)
    }

    /// Register an actor that can focus and interact
    pub fn add_tracker(&mut self, owner: EntityId, config: TrackerConfig) {
        self.trackers
            .insert(owner, InteractionTracker::new(owner, self.role, config));
    }

    /// Unregister an actor, releasing whatever it held
    pub fn remove_tracker(&mut self, owner: EntityId) -> Option<InteractionTracker> {
        let mut tracker = self.trackers.remove(&owner)?;
        if tracker.is_interaction_held() {
            tracker.end_interaction_attempt(&mut self.scene);
        }
        tracker.lose_target(&mut self.scene);
        Some(tracker)
    }

    /// Get a tracker
    pub fn tracker(&self, owner: EntityId) -> Option<&InteractionTracker> {
        self.trackers.get(&owner)
    }

    /// Advance to `now`.
    ///
    /// Drops focus on targets that went away (ending focus and interaction
    /// on any that still exist), completes elapsed countdowns
    /// and, on replicas, probes along each actor's aim at the tracker's
    /// probe frequency.
    pub fn update(&mut self, now: f64, probe: &dyn WorldProbe, aims: &HashMap<EntityId, Aim>) {
        self.now = now;

        for tracker in self.trackers.values_mut() {
            if let Some(target) = tracker.focused() {
                if !self.scene.is_available(target) {
                    log::debug!("{} lost focus on vanished {}", tracker.owner(), target);
                    tracker.lose_target(&mut self.scene);
                }
            }
        }

        for (interactor, pending) in self.scene.timers_mut().take_due(now) {
            let result = match self.trackers.get_mut(&interactor) {
                Some(tracker) if tracker.focused() == Some(pending.target) => tracker.interact(&mut self.scene),
                _ => Err(InteractionError::TargetUnavailable(pending.target)),
            };
            if let Err(err) = result {
                log::debug!("Countdown of {} did not complete: {}", interactor, err);
            }
        }

        if self.role.is_replica() {
            let mut owners: Vec<EntityId> = self.trackers.keys().copied().collect();
            owners.sort();
            for owner in owners {
                let (Some(tracker), Some(aim)) = (self.trackers.get_mut(&owner), aims.get(&owner)) else {
                    continue;
                };
                if tracker.should_probe(now) {
                    tracker.perform_probe(&mut self.scene, probe, *aim, now);
                }
            }
        }
    }

    /// Press interact for an actor
    pub fn begin_interaction(&mut self, owner: EntityId, aim: Aim, probe: &dyn WorldProbe) -> Result<()> {
        let now = self.now;
        let tracker = self
            .trackers
            .get_mut(&owner)
            .ok_or(InteractionError::UnknownInteractor(owner))?;
        tracker.begin_interaction_attempt(&mut self.scene, probe, aim, now)
    }

    /// Release interact for an actor
    pub fn end_interaction(&mut self, owner: EntityId) -> Result<()> {
        let tracker = self
            .trackers
            .get_mut(&owner)
            .ok_or(InteractionError::UnknownInteractor(owner))?;
        tracker.end_interaction_attempt(&mut self.scene);
        Ok(())
    }

    /// Collect requests every replica tracker queued for the authority
    pub fn take_requests(&mut self) -> Vec<(EntityId, InteractionRequest)> {
        let mut owners: Vec<EntityId> = self.trackers.keys().copied().collect();
        owners.sort();
        let mut requests = Vec::new();
        for owner in owners {
            if let Some(tracker) = self.trackers.get_mut(&owner) {
                requests.extend(tracker.take_requests().into_iter().map(|request| (owner, request)));
            }
        }
        requests
    }

    /// Apply a request forwarded by a replica
    pub fn handle_request(&mut self, owner: EntityId, request: InteractionRequest, probe: &dyn WorldProbe) -> Result<()> {
        if !self.role.has_authority() {
            return Err(InteractionError::NotAuthoritative);
        }
        match request {
            InteractionRequest::BeginInteraction { aim } => self.begin_interaction(owner, aim, probe),
            InteractionRequest::EndInteraction => self.end_interaction(owner),
        }
    }

    /// Deactivate a target, ending focus and interaction for every actor on
    /// it and returning their trackers to idle immediately
    pub fn deactivate_target(&mut self, id: EntityId) -> bool {
        let Some(target) = self.scene.get_mut(id) else {
            return false;
        };

        let mut watchers: Vec<EntityId> = self
            .trackers
            .values()
            .filter(|tracker| tracker.focused() == Some(id))
            .map(|tracker| tracker.owner())
            .collect();
        watchers.sort();

        for &watcher in &watchers {
            if !target.is_interactor(watcher) {
                target.end_focus(watcher);
            }
        }
        target.deactivate();

        self.scene.timers_mut().cancel_target(id);
        for watcher in watchers {
            if let Some(tracker) = self.trackers.get_mut(&watcher) {
                tracker.force_idle(&mut self.scene);
            }
        }
        log::debug!("Deactivated interaction target {}", id);
        true
    }

    /// Remove a target from the world
    pub fn despawn_target(&mut self, id: EntityId) -> Option<InteractionTarget> {
        self.deactivate_target(id);
        self.scene.remove(id)
    }
}

impl std::fmt::Debug for InteractionSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InteractionSystem")
            .field("role", &self.role)
            .field("now", &self.now)
            .field("targets", &self.scene.len())
            .field("trackers", &self.trackers.len())
            .finish()
    }
}
