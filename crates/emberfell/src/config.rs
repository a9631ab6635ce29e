//! # Simulation Configuration
//!
//! Capacities, seed and tuning knobs, read once at startup:
//!
//! ```toml
//! seed = 7
//! max_entities = 256
//!
//! [field]
//! max_lines = 1024
//!
//! [tuning]
//! interaction_radius = 256
//!
//! [boss]
//! activate_distance = 1500
//! ```
//!
//! Every key is optional; missing keys take the values below. Distances are
//! in fixed-point world units.

use crate::error::{SimError, SimResult};
use emberfell_core::{WorldLimits, MAX_SLOTS};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level simulation configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimConfig {
    /// Seed of the combat and loot RNG.
    pub seed: u64,
    /// Maximum number of live entities.
    pub max_entities: usize,
    /// Maximum number of registered component types.
    pub max_component_types: usize,
    /// Maximum number of simultaneously open queries.
    pub max_query_depth: usize,
    /// Capacity of the outgoing event channel.
    pub event_capacity: usize,
    /// Collision field storage.
    pub field: FieldConfig,
    /// Pathfinding grid bounds.
    pub navgrid: NavGridConfig,
    /// Gameplay distances and iteration counts.
    pub tuning: TuningConfig,
    /// Boss script timings.
    pub boss: BossConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 0x00C0_FFEE,
            max_entities: 256,
            max_component_types: 64,
            max_query_depth: 8,
            event_capacity: 1024,
            field: FieldConfig::default(),
            navgrid: NavGridConfig::default(),
            tuning: TuningConfig::default(),
            boss: BossConfig::default(),
        }
    }
}

/// Collision field storage limits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FieldConfig {
    /// Maximum number of boundary edges.
    pub max_lines: usize,
    /// Maximum number of boundary vertices.
    pub max_vertices: usize,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            max_lines: 1024,
            max_vertices: 1024,
        }
    }
}

/// Pathfinding grid bounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NavGridConfig {
    /// Maximum grid width in tiles.
    pub max_width: usize,
    /// Maximum grid height in tiles.
    pub max_height: usize,
    /// Maximum stored waypoints per route.
    pub max_path_length: usize,
}

impl Default for NavGridConfig {
    fn default() -> Self {
        Self {
            max_width: 128,
            max_height: 128,
            max_path_length: 16,
        }
    }
}

/// Gameplay distances and iteration counts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TuningConfig {
    /// Reach of the player's interaction check.
    pub interaction_radius: i32,
    /// Reach of the player's item pickup check.
    pub collect_radius: i32,
    /// Maximum pushout passes per entity against the field.
    pub field_resolve_attempts: u32,
    /// Distance at which a waypoint counts as reached.
    pub waypoint_tolerance: i32,
    /// Distance past which an enemy forgets its target.
    pub enemy_forget_distance: i32,
    /// Distance past which an enemy paths instead of steering.
    pub enemy_path_distance: i32,
    /// Ticks a status effect stays active.
    pub status_effect_duration: i32,
    /// Experience needed per level.
    pub xp_per_level: i32,
}

impl Default for TuningConfig {
    fn default() -> Self {
        Self {
            interaction_radius: 256,
            collect_radius: 256,
            field_resolve_attempts: 10,
            waypoint_tolerance: 128,
            enemy_forget_distance: 240 * 16,
            enemy_path_distance: 768,
            status_effect_duration: 20 * 60,
            xp_per_level: 50,
        }
    }
}

/// Boss script timings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BossConfig {
    /// Player distance that wakes the boss.
    pub activate_distance: i32,
    /// Player distance that puts the boss back to sleep.
    pub deactivate_distance: i32,
    /// Timer value at which tentacles spawn.
    pub tentacle_spawn_time: i32,
    /// Timer value after which the tentacle phase ends.
    pub tentacle_phase_length: i32,
    /// Timer value after which the minion phase ends.
    pub minion_phase_length: i32,
    /// Stun added per tentacle kill.
    pub tentacle_stun: i32,
    /// Stun added when the last tentacle of a wave dies.
    pub wave_stun: i32,
    /// Tentacles per wave.
    pub tentacles_per_wave: i32,
}

impl Default for BossConfig {
    fn default() -> Self {
        Self {
            activate_distance: 1500,
            deactivate_distance: 3000,
            tentacle_spawn_time: 10,
            tentacle_phase_length: 100,
            minion_phase_length: 200,
            tentacle_stun: 50,
            wave_stun: 200,
            tentacles_per_wave: 3,
        }
    }
}

impl SimConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// [`SimError::InvalidConfig`] on malformed TOML or out-of-range values.
    pub fn from_toml_str(text: &str) -> SimResult<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| SimError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// [`SimError::Io`] if the file cannot be read, otherwise as
    /// [`SimConfig::from_toml_str`].
    pub fn from_path(path: impl AsRef<Path>) -> SimResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| SimError::Io(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// [`SimError::InvalidConfig`] naming the first bad key.
    pub fn validate(&self) -> SimResult<()> {
        let bad = |key: &str, why: &str| Err(SimError::InvalidConfig(format!("{key} {why}")));

        if self.max_entities == 0 || self.max_entities > MAX_SLOTS {
            return bad("max_entities", "must be between 1 and 65536");
        }
        if self.max_component_types == 0 || self.max_component_types > 256 {
            return bad("max_component_types", "must be between 1 and 256");
        }
        if self.max_query_depth == 0 {
            return bad("max_query_depth", "must be positive");
        }
        if self.event_capacity == 0 {
            return bad("event_capacity", "must be positive");
        }
        if self.navgrid.max_path_length == 0 {
            return bad("navgrid.max_path_length", "must be positive");
        }
        if self.boss.deactivate_distance < self.boss.activate_distance {
            return bad("boss.deactivate_distance", "must not be below activate_distance");
        }
        if self.tuning.xp_per_level <= 0 {
            return bad("tuning.xp_per_level", "must be positive");
        }
        Ok(())
    }

    /// Entity store limits derived from this configuration.
    #[must_use]
    pub fn world_limits(&self) -> WorldLimits {
        WorldLimits {
            max_entities: self.max_entities,
            max_component_types: self.max_component_types,
            max_query_depth: self.max_query_depth,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_is_default() {
        let config = SimConfig::from_toml_str("").unwrap();
        assert_eq!(config, SimConfig::default());
    }

    #[test]
    fn test_partial_sections() {
        let config = SimConfig::from_toml_str(
            "seed = 42\n[tuning]\ncollect_radius = 512\n[boss]\nactivate_distance = 900\n",
        )
        .unwrap();
        assert_eq!(config.seed, 42);
        assert_eq!(config.tuning.collect_radius, 512);
        assert_eq!(config.tuning.interaction_radius, 256);
        assert_eq!(config.boss.activate_distance, 900);
        assert_eq!(config.boss.deactivate_distance, 3000);
    }

    #[test]
    fn test_rejects_unknown_keys() {
        let err = SimConfig::from_toml_str("max_entitys = 5").unwrap_err();
        assert!(matches!(err, SimError::InvalidConfig(_)));
    }

    #[test]
    fn test_rejects_out_of_range() {
        let err = SimConfig::from_toml_str("max_entities = 0").unwrap_err();
        assert_eq!(
            err,
            SimError::InvalidConfig("max_entities must be between 1 and 65536".into())
        );
        assert!(SimConfig::from_toml_str("max_entities = 70000").is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = SimConfig::from_path("/nonexistent/emberfell.toml").unwrap_err();
        assert!(matches!(err, SimError::Io(_)));
    }
}
