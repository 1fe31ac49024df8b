//! Per-actor focus and interaction state

use crate::config::TrackerConfig;
use crate::error::{InteractionError, Result};
use crate::probe::{distance, Aim, WorldProbe};
use crate::scene::InteractionScene;
use serde::{Deserialize, Serialize};
use void_core::{EntityId, NetRole};

/// Request sent from a replica's tracker to the authority
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InteractionRequest {
    /// Start interacting with whatever `aim` points at
    BeginInteraction { aim: Aim },
    /// Stop interacting
    EndInteraction,
}

/// Observable tracker state
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrackerState {
    /// Nothing focused
    Idle,
    /// Looking at a target
    Focused(EntityId),
    /// Counting down a timed interaction
    InteractionPending { target: EntityId, deadline: f64 },
}

/// Tracks what one actor is looking at and interacting with.
///
/// The tracker refers to targets by id only; every operation that touches a
/// target takes the [`InteractionScene`] holding it.
#[derive(Debug, Clone)]
pub struct InteractionTracker {
    owner: EntityId,
    role: NetRole,
    config: TrackerConfig,
    focused: Option<EntityId>,
    interaction_held: bool,
    last_probe_time: Option<f64>,
    outbox: Vec<InteractionRequest>,
}

impl InteractionTracker {
    /// Create an idle tracker
    pub fn new(owner: EntityId, role: NetRole, config: TrackerConfig) -> Self {
        Self {
            owner,
            role,
            config,
            focused: None,
            interaction_held: false,
            last_probe_time: None,
            outbox: Vec::new(),
        }
    }

    /// Actor this tracker belongs to
    pub fn owner(&self) -> EntityId {
        self.owner
    }

    /// Network role
    pub fn role(&self) -> NetRole {
        self.role
    }

    /// Configuration
    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Focused target
    pub fn focused(&self) -> Option<EntityId> {
        self.focused
    }

    /// Check if the interact input is held
    pub fn is_interaction_held(&self) -> bool {
        self.interaction_held
    }

    /// Simulation time of the last probe
    pub fn last_probe_time(&self) -> Option<f64> {
        self.last_probe_time
    }

    /// Current state
    pub fn state(&self, scene: &InteractionScene) -> TrackerState {
        let Some(target) = self.focused else {
            return TrackerState::Idle;
        };
        match scene.timers().get(self.owner) {
            Some(pending) if pending.target == target => TrackerState::InteractionPending {
                target,
                deadline: pending.deadline(),
            },
            _ => TrackerState::Focused(target),
        }
    }

    /// Check if a timed interaction is counting down
    pub fn is_interacting(&self, scene: &InteractionScene) -> bool {
        scene.timers().is_active(self.owner)
    }

    /// Seconds left on the running countdown (0 when none)
    pub fn remaining_interact_time(&self, scene: &InteractionScene, now: f64) -> f32 {
        scene.timers().remaining(self.owner, now).unwrap_or(0.0)
    }

    /// Check if the probe interval has elapsed
    pub fn should_probe(&self, now: f64) -> bool {
        self.last_probe_time
            .map_or(true, |last| now - last > self.config.probe_frequency as f64)
    }

    /// Look along `aim` and update focus
    pub fn perform_probe(&mut self, scene: &mut InteractionScene, probe: &dyn WorldProbe, aim: Aim, now: f64) {
        self.last_probe_time = Some(now);

        let hit = probe.probe(aim.origin, aim.direction, self.config.probe_distance, self.owner);
        let Some(hit) = hit.filter(|hit| scene.is_available(hit.hit_object)) else {
            if self.focused.is_some() {
                log::trace!("{} probe found nothing", self.owner);
            }
            self.lose_target(scene);
            return;
        };

        let reach = scene
            .get(hit.hit_object)
            .map_or(0.0, |target| target.config().interaction_distance);
        let in_range = distance(aim.origin, hit.impact_point) <= reach;

        if in_range && self.focused != Some(hit.hit_object) {
            self.acquire_target(scene, hit.hit_object);
        } else if !in_range && self.focused.is_some() {
            self.lose_target(scene);
        }
    }

    /// Switch focus to `target`
    pub fn acquire_target(&mut self, scene: &mut InteractionScene, target: EntityId) {
        if self.interaction_held || scene.timers().is_active(self.owner) {
            self.end_interaction_attempt(scene);
        }
        if let Some(previous) = self.focused.take() {
            if let Some(previous) = scene.get_mut(previous) {
                previous.end_focus(self.owner);
            }
        }

        log::debug!("{} focused {}", self.owner, target);
        self.focused = Some(target);
        if let Some(target) = scene.get_mut(target) {
            target.begin_focus(self.owner);
        }
    }

    /// Drop focus: end focus, then end the interaction if it was held
    pub fn lose_target(&mut self, scene: &mut InteractionScene) {
        scene.timers_mut().cancel(self.owner);
        let Some(target_id) = self.focused.take() else {
            return;
        };

        if let Some(target) = scene.get_mut(target_id) {
            target.end_focus(self.owner);
            if self.interaction_held {
                target.end_interact(self.owner);
            }
        }
        if self.interaction_held && self.role.is_replica() {
            self.outbox.push(InteractionRequest::EndInteraction);
        }
        self.interaction_held = false;
        log::debug!("{} lost focus on {}", self.owner, target_id);
    }

    /// Press interact.
    ///
    /// The authority re-probes first so it acts on its own view of the
    /// world; a replica acts on its current focus and forwards the request.
    /// Instant targets complete immediately, timed ones start a countdown.
    pub fn begin_interaction_attempt(
        &mut self,
        scene: &mut InteractionScene,
        probe: &dyn WorldProbe,
        aim: Aim,
        now: f64,
    ) -> Result<()> {
        if self.role.is_replica() {
            self.outbox.push(InteractionRequest::BeginInteraction { aim });
        } else {
            self.perform_probe(scene, probe, aim, now);
        }

        self.interaction_held = true;

        let target_id = self.focused.ok_or(InteractionError::TargetUnavailable(EntityId::NULL))?;
        let target = scene
            .get_mut(target_id)
            .ok_or(InteractionError::TargetUnavailable(target_id))?;
        target.begin_interact(self.owner)?;

        let duration = target.config().interaction_time;
        if duration <= f32::EPSILON {
            self.interact(scene)
        } else {
            scene.timers_mut().arm(self.owner, target_id, now, duration);
            Ok(())
        }
    }

    /// Complete the interaction with the focused target
    pub fn interact(&mut self, scene: &mut InteractionScene) -> Result<()> {
        scene.timers_mut().cancel(self.owner);
        let target_id = self.focused.ok_or(InteractionError::TargetUnavailable(EntityId::NULL))?;
        let target = scene
            .get_mut(target_id)
            .ok_or(InteractionError::TargetUnavailable(target_id))?;
        target.interact(self.owner)
    }

    /// Release interact
    pub fn end_interaction_attempt(&mut self, scene: &mut InteractionScene) {
        if self.role.is_replica() {
            self.outbox.push(InteractionRequest::EndInteraction);
        }
        self.interaction_held = false;
        scene.timers_mut().cancel(self.owner);

        if let Some(target) = self.focused.and_then(|id| scene.get_mut(id)) {
            target.end_interact(self.owner);
        }
    }

    /// Reset to idle without touching any target
    pub fn force_idle(&mut self, scene: &mut InteractionScene) {
        scene.timers_mut().cancel(self.owner);
        self.focused = None;
        self.interaction_held = false;
    }

    /// Requests queued for the authority
    pub fn pending_requests(&self) -> &[InteractionRequest] {
        &self.outbox
    }

    /// Take queued requests for sending
    pub fn take_requests(&mut self) -> Vec<InteractionRequest> {
        std::mem::take(&mut self.outbox)
    }
}
