//! Designer-facing tuning data.
//!
//! Every section deserializes with defaults for missing fields, so a JSON
//! file only needs to list what it changes. The combo table is the exception:
//! it has no sensible default and is validated when loaded.

use crate::combo::{ComboConfig, ComboError, ComboManager};
use crate::core::DEFAULT_HISTORY_CAPACITY;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading a [`CombatConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse combat configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    Combo(#[from] ComboError),
}

/// Hit-count health with delayed regeneration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthConfig {
    pub max_hits: u32,
    /// Seconds between regenerated hits.
    pub regeneration_interval: f32,
    /// Seconds after taking damage before regeneration starts.
    pub wait_before_regeneration: f32,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            max_hits: 5,
            regeneration_interval: 3.0,
            wait_before_regeneration: 2.0,
        }
    }
}

/// Scoring weights for picking which agent gets the next attack slot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlotWeights {
    /// Favors agents outside the target's facing direction.
    pub alignment: f32,
    /// Favors agents close to the target.
    pub range: f32,
    /// Favors agents with more health left.
    pub health: f32,
    /// Distance at which the range score reaches zero.
    pub max_range: f32,
    /// Hit count treated as full health by the health score.
    pub health_reference: f32,
}

impl Default for SlotWeights {
    fn default() -> Self {
        Self {
            alignment: 0.5,
            range: 0.8,
            health: 1.2,
            max_range: 20.0,
            health_reference: 100.0,
        }
    }
}

/// Attack slot allocation around a single target.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlotConfig {
    pub max_slots: u32,
    /// Seconds to regenerate one slot while below `max_slots`.
    pub slot_recovery_time: f32,
    /// Seconds an agent waits after receiving a slot before it is eligible again.
    pub attack_cooldown_time: f32,
    /// Seconds between assignment attempts.
    pub slot_assignment_interval: f32,
    pub required_minimum_weight: f32,
    pub weights: SlotWeights,
}

impl Default for SlotConfig {
    fn default() -> Self {
        Self {
            max_slots: 3,
            slot_recovery_time: 2.0,
            attack_cooldown_time: 4.0,
            slot_assignment_interval: 2.0,
            required_minimum_weight: 0.5,
            weights: SlotWeights::default(),
        }
    }
}

/// Reach of a single combatant.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatantConfig {
    /// Target must be closer than this to start an attack.
    pub attack_distance: f32,
    /// Target closer than this opens the counter window.
    pub counter_distance: f32,
}

impl Default for CombatantConfig {
    fn default() -> Self {
        Self {
            attack_distance: 2.0,
            counter_distance: 3.0,
        }
    }
}

fn default_history_capacity() -> usize {
    DEFAULT_HISTORY_CAPACITY
}

/// Everything needed to set up one combatant and the shared slot allocator.
///
/// # Example
///
/// ```rust
/// use combat_fsm::config::CombatConfig;
///
/// let config = CombatConfig::from_json_str(r#"{
///     "combo": {
///         "cooldown": 1.5,
///         "combos": [ { "name": "basic", "attacks": [ { "name": "slash" } ] } ]
///     },
///     "health": { "max_hits": 3 }
/// }"#)?;
///
/// assert_eq!(config.health.max_hits, 3);
/// assert_eq!(config.slots.max_slots, 3);
/// assert_eq!(config.combo_manager()?.cooldown(), 1.5);
/// # Ok::<(), combat_fsm::config::ConfigError>(())
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CombatConfig {
    pub combo: ComboConfig,
    #[serde(default)]
    pub health: HealthConfig,
    #[serde(default)]
    pub slots: SlotConfig,
    #[serde(default)]
    pub combatant: CombatantConfig,
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,
}

impl CombatConfig {
    /// Parse and validate a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.combo_manager()?;
        Ok(config)
    }

    /// Fresh combo cursor over this configuration's table.
    pub fn combo_manager(&self) -> Result<ComboManager, ComboError> {
        ComboManager::from_config(self.combo.clone())
    }
}
