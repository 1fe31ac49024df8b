//! Interaction configuration

use serde::{Deserialize, Serialize};

/// Smallest accepted interaction distance
pub const MIN_INTERACTION_DISTANCE: f32 = 0.01;

/// Interactable object configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionTargetConfig {
    /// Seconds the interaction must be held (0 = instant)
    pub interaction_time: f32,
    /// Maximum distance from the viewer to the aimed-at point
    pub interaction_distance: f32,
    /// Whether several actors may interact at once
    pub allow_multiple_interactors: bool,
    /// Name shown in the prompt
    pub name_text: String,
    /// Verb shown in the prompt
    pub action_text: String,
}

impl Default for InteractionTargetConfig {
    fn default() -> Self {
        Self {
            interaction_time: 0.0,
            interaction_distance: 200.0,
            allow_multiple_interactors: true,
            name_text: "Interactable Object".to_string(),
            action_text: "Interact".to_string(),
        }
    }
}

impl InteractionTargetConfig {
    /// Set hold time
    pub fn with_interaction_time(mut self, seconds: f32) -> Self {
        self.interaction_time = seconds.max(0.0);
        self
    }

    /// Set interaction distance
    pub fn with_interaction_distance(mut self, distance: f32) -> Self {
        self.interaction_distance = distance.max(MIN_INTERACTION_DISTANCE);
        self
    }

    /// Allow only one interactor at a time
    pub fn single_interactor(mut self) -> Self {
        self.allow_multiple_interactors = false;
        self
    }

    /// Set prompt texts
    pub fn with_prompt(mut self, name: impl Into<String>, action: impl Into<String>) -> Self {
        self.name_text = name.into();
        self.action_text = action.into();
        self
    }
}

/// Per-actor tracker configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// How far the probe reaches
    pub probe_distance: f32,
    /// Minimum seconds between probes (0 = every update)
    pub probe_frequency: f32,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            probe_distance: 5000.0,
            probe_frequency: 0.0,
        }
    }
}

impl TrackerConfig {
    /// Set probe distance
    pub fn with_probe_distance(mut self, distance: f32) -> Self {
        self.probe_distance = distance;
        self
    }

    /// Set probe frequency
    pub fn with_probe_frequency(mut self, seconds: f32) -> Self {
        self.probe_frequency = seconds.max(0.0);
        self
    }
}
