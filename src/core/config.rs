//! Generation configuration with documented constants
//!
//! All tunable numbers of the placement planner are collected here with
//! notes on how they interact.

use serde::Deserialize;
use std::path::Path;

use super::error::{ForgeError, Result};

/// Configuration for dungeon generation runs
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    // === COLLISION ===
    /// Penetration depth (world units) at or below which two solid volumes
    /// count as touching rather than colliding.
    ///
    /// Modules are authored to meet flush at their sockets, so shared walls
    /// produce depths around float epsilon. Raising this lets modules sink
    /// into each other; lowering it below ~1e-5 rejects legal joins.
    pub penetration_tolerance: f32,

    // === DRAW POLICY ===
    /// Reject terminal blueprints while more than half the budget remains
    pub avoid_early_terminals: bool,

    /// How many times a terminal draw is re-rolled before falling back to a
    /// uniform draw over the non-terminal blueprints
    pub terminal_retry_limit: u32,

    /// Try the candidate's sockets in a shuffled order.
    ///
    /// When false, sockets are tried in authored order, which makes layouts
    /// depend only on the blueprint draw.
    pub shuffle_sockets: bool,

    // === RUN ===
    /// Zones to place (seed module included) when the caller gives no count
    pub default_total_zones: u32,

    /// Where candidates are instantiated before they are snapped into place
    pub staging_origin: [f32; 3],
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            penetration_tolerance: 0.001,
            avoid_early_terminals: true,
            terminal_retry_limit: 8,
            shuffle_sockets: true,
            default_total_zones: 10,
            staging_origin: [9999.0, 9999.0, 9999.0],
        }
    }
}

impl GenerationConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a config from a TOML file; missing keys keep their defaults
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse_toml(&content)
    }

    /// Parse a config from a TOML string and validate it
    pub fn parse_toml(content: &str) -> Result<Self> {
        let config: GenerationConfig = toml::from_str(content)?;
        config.validate().map_err(ForgeError::InvalidConfig)?;
        Ok(config)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.penetration_tolerance.is_nan() || self.penetration_tolerance < 0.0 {
            return Err(format!(
                "penetration_tolerance ({}) must be non-negative",
                self.penetration_tolerance
            ));
        }

        if self.default_total_zones == 0 {
            return Err("default_total_zones must include the seed module".into());
        }

        if self.staging_origin.iter().any(|c| !c.is_finite()) {
            return Err(format!(
                "staging_origin {:?} must be finite",
                self.staging_origin
            ));
        }

        Ok(())
    }
}

// === GLOBAL CONFIG ACCESS ===

use std::sync::OnceLock;

static CONFIG: OnceLock<GenerationConfig> = OnceLock::new();

/// Get the global generation config (initializes with defaults if not set)
pub fn config() -> &'static GenerationConfig {
    CONFIG.get_or_init(GenerationConfig::default)
}

/// Set the global generation config (can only be called once)
///
/// Returns Err if config was already set.
pub fn set_config(config: GenerationConfig) -> std::result::Result<(), GenerationConfig> {
    CONFIG.set(config)
}
