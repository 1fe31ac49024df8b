//! Void Interaction - Focus and Interaction Tracking
//!
//! This crate decides which world object an actor is looking at and drives
//! the focus / interact state machine between actors and interactable
//! objects.
//!
//! # Features
//!
//! - [`WorldProbe`] seam for line-of-sight queries, with a simple
//!   [`SphereWorld`] implementation
//! - Interaction targets with focus, begin/end interact and interact events
//! - Instant and timed interactions with cancellable countdowns
//! - Authority re-checks; replicas act speculatively and forward requests
//! - Robust to targets being deactivated or destroyed mid-interaction
//!
//! # Example
//!
//! ```ignore
//! use void_interaction::prelude::*;
//!
//! let mut system = InteractionSystem::new(NetRole::Authority);
//! system.spawn_target(InteractionTarget::new(chest, InteractionTargetConfig::default()
//!     .with_interaction_time(1.5)));
//! system.add_tracker(player, TrackerConfig::default());
//!
//! system.begin_interaction(player, aim, &world, 0.0)?;
//! system.update(1.5, &world, &aims); // countdown elapses, Interact fires
//! ```

pub mod config;
pub mod error;
pub mod events;
pub mod probe;
pub mod scene;
pub mod system;
pub mod target;
pub mod timer;
pub mod tracker;

pub mod prelude {
    pub use crate::config::{InteractionTargetConfig, TrackerConfig, MIN_INTERACTION_DISTANCE};
    pub use crate::error::{InteractionError, Result};
    pub use crate::events::InteractionEvent;
    pub use crate::probe::{Aim, ProbeHit, SphereWorld, WorldProbe};
    pub use crate::scene::InteractionScene;
    pub use crate::system::InteractionSystem;
    pub use crate::target::InteractionTarget;
    pub use crate::timer::{InteractionTimers, PendingInteraction};
    pub use crate::tracker::{InteractionRequest, InteractionTracker, TrackerState};
}

pub use prelude::*;
