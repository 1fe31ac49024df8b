//! Sandbox configuration
//!
//! # Configuration Sources (in priority order)
//!
//! 1. Environment variable: `VOID_SANDBOX_CONFIG=/path/to/sandbox.toml`
//! 2. `sandbox.toml` in the working directory
//! 3. Built-in defaults

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use void_interaction::{InteractionTargetConfig, TrackerConfig};
use void_inventory::{CatalogError, InventoryConfig};

/// Sandbox errors
#[derive(Debug, Error)]
pub enum SandboxError {
    /// Config or catalog file could not be read
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML
    #[error("Invalid sandbox config: {0}")]
    Config(#[from] toml::de::Error),

    /// Item catalog could not be loaded
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Snapshot encoding or delivery failed
    #[error(transparent)]
    Replication(#[from] void_replication::ReplicationError),
}

/// Result type for the sandbox
pub type Result<T> = std::result::Result<T, SandboxError>;

/// Session timing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Number of simulation ticks
    pub ticks: u32,
    /// Seconds per tick
    pub tick_seconds: f64,
    /// Units the client drops after looting
    pub drop_quantity: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ticks: 12,
            tick_seconds: 0.25,
            drop_quantity: 5,
        }
    }
}

/// Loot placed in front of the player
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LootConfig {
    /// Item kind
    pub kind: String,
    /// Units in the pickup
    pub quantity: u32,
    /// World position
    pub position: [f32; 3],
    /// Probe radius
    pub radius: f32,
}

impl Default for LootConfig {
    fn default() -> Self {
        Self {
            kind: "coin".to_string(),
            quantity: 30,
            position: [150.0, 0.0, 0.0],
            radius: 1.0,
        }
    }
}

/// Complete sandbox configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SandboxConfig {
    /// JSON item catalog; the built-in one is used when unset
    pub catalog: Option<String>,
    pub session: SessionConfig,
    pub inventory: InventoryConfig,
    pub tracker: TrackerConfig,
    pub target: InteractionTargetConfig,
    pub loot: LootConfig,
}

impl SandboxConfig {
    /// Load from the environment override, then `sandbox.toml`, then
    /// defaults
    pub fn load() -> Result<Self> {
        if let Ok(path) = std::env::var("VOID_SANDBOX_CONFIG") {
            log::info!("Sandbox config from env: {}", path);
            return Self::load_from_file(&path);
        }

        if Path::new("sandbox.toml").exists() {
            return Self::load_from_file("sandbox.toml");
        }

        log::info!("No sandbox config found, using defaults");
        Ok(Self::default())
    }

    /// Load from a TOML file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| SandboxError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}
