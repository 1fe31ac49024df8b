//! Interaction countdowns

use std::collections::HashMap;
use void_core::EntityId;

/// A timed interaction waiting to complete
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingInteraction {
    /// Target being interacted with
    pub target: EntityId,
    /// Simulation time the countdown started
    pub armed_at: f64,
    /// Countdown length in seconds
    pub duration: f32,
}

impl PendingInteraction {
    /// Simulation time the interaction completes
    pub fn deadline(&self) -> f64 {
        self.armed_at + self.duration as f64
    }

    /// Seconds left at `now`
    pub fn remaining(&self, now: f64) -> f32 {
        (self.deadline() - now).max(0.0) as f32
    }
}

/// Countdowns keyed by interactor; at most one per interactor
#[derive(Debug, Clone, Default)]
pub struct InteractionTimers {
    pending: HashMap<EntityId, PendingInteraction>,
}

impl InteractionTimers {
    /// Create an empty timer set
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a countdown, replacing the interactor's previous one
    pub fn arm(&mut self, interactor: EntityId, target: EntityId, now: f64, duration: f32) -> Option<PendingInteraction> {
        self.pending.insert(
            interactor,
            PendingInteraction {
                target,
                armed_at: now,
                duration: duration.max(0.0),
            },
        )
    }

    /// Cancel an interactor's countdown
    pub fn cancel(&mut self, interactor: EntityId) -> Option<PendingInteraction> {
        self.pending.remove(&interactor)
    }

    /// Cancel every countdown on `target`, returning the interactors affected
    pub fn cancel_target(&mut self, target: EntityId) -> Vec<EntityId> {
        let mut cancelled: Vec<EntityId> = self
            .pending
            .iter()
            .filter(|(_, pending)| pending.target == target)
            .map(|(interactor, _)| *interactor)
            .collect();
        cancelled.sort();
        for interactor in &cancelled {
            self.pending.remove(interactor);
        }
        cancelled
    }

    /// Check if an interactor has a running countdown
    pub fn is_active(&self, interactor: EntityId) -> bool {
        self.pending.contains_key(&interactor)
    }

    /// Get an interactor's countdown
    pub fn get(&self, interactor: EntityId) -> Option<&PendingInteraction> {
        self.pending.get(&interactor)
    }

    /// Seconds left on an interactor's countdown
    pub fn remaining(&self, interactor: EntityId, now: f64) -> Option<f32> {
        self.pending.get(&interactor).map(|pending| pending.remaining(now))
    }

    /// Remove and return every countdown that has elapsed at `now`,
    /// earliest deadline first (ties broken by interactor id)
    pub fn take_due(&mut self, now: f64) -> Vec<(EntityId, PendingInteraction)> {
        let mut due: Vec<(EntityId, PendingInteraction)> = self
            .pending
            .iter()
            .filter(|(_, pending)| pending.deadline() <= now)
            .map(|(interactor, pending)| (*interactor, *pending))
            .collect();
        due.sort_by(|a, b| a.1.deadline().total_cmp(&b.1.deadline()).then(a.0.cmp(&b.0)));
        for (interactor, _) in &due {
            self.pending.remove(interactor);
        }
        due
    }

    /// Number of running countdowns
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Check if nothing is counting down
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const CHEST: EntityId = EntityId::new(10);
    const DOOR: EntityId = EntityId::new(11);

    #[test]
    fn test_arm_replaces() {
        let mut timers = InteractionTimers::new();
        let player = EntityId::new(1);

        assert!(timers.arm(player, CHEST, 0.0, 2.0).is_none());
        let previous = timers.arm(player, DOOR, 1.0, 3.0).unwrap();
        assert_eq!(previous.target, CHEST);
        assert_eq!(timers.len(), 1);
        assert_eq!(timers.get(player).unwrap().target, DOOR);
        assert_relative_eq!(timers.remaining(player, 2.0).unwrap(), 2.0);
    }

    #[test]
    fn test_take_due_in_deadline_order() {
        let mut timers = InteractionTimers::new();
        timers.arm(EntityId::new(1), CHEST, 0.0, 2.0);
        timers.arm(EntityId::new(2), CHEST, 0.0, 1.0);
        timers.arm(EntityId::new(3), DOOR, 0.0, 5.0);

        assert!(timers.take_due(0.5).is_empty());

        let due = timers.take_due(2.0);
        let interactors: Vec<EntityId> = due.iter().map(|(id, _)| *id).collect();
        assert_eq!(interactors, vec![EntityId::new(2), EntityId::new(1)]);
        assert_eq!(timers.len(), 1);
    }

    #[test]
    fn test_cancel_target() {
        let mut timers = InteractionTimers::new();
        timers.arm(EntityId::new(1), CHEST, 0.0, 2.0);
        timers.arm(EntityId::new(2), DOOR, 0.0, 2.0);
        timers.arm(EntityId::new(3), CHEST, 0.0, 2.0);

        assert_eq!(timers.cancel_target(CHEST), vec![EntityId::new(1), EntityId::new(3)]);
        assert!(timers.is_active(EntityId::new(2)));
        assert!(timers.cancel(EntityId::new(2)).is_some());
        assert!(timers.is_empty());
    }

    #[test]
    fn test_remaining_never_negative() {
        let pending = PendingInteraction {
            target: CHEST,
            armed_at: 1.0,
            duration: 0.5,
        };
        assert_relative_eq!(pending.deadline(), 1.5);
        assert_eq!(pending.remaining(4.0), 0.0);
    }
}
