//! Simulation configuration.
//!
//! All tunable parameters live in `SimulationConfig`, optionally loaded from
//! JSON so balance runs do not require recompilation. The defaults reproduce
//! the reference ecosystem: a 1200x800 arena where prey flock and forage
//! while predators hunt them down.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Per-species prey parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PreyConfig {
    pub base_speed: f32,
    /// Predator detection radius.
    pub vision: f32,
    /// Food detection radius.
    pub food_vision: f32,
    pub initial_energy: f32,
    pub max_energy: f32,
    /// Energy deducted every tick.
    pub metabolic_loss: f32,
    /// Energy gained per food item eaten.
    pub food_energy_gain: f32,
    /// Below this energy a prey prefers foraging over flocking.
    pub forage_threshold: f32,
    /// Minimum energy to be reproduction-eligible.
    pub reproduction_energy: f32,
    /// Energy paid by the reproduction initiator.
    pub reproduction_cost: f32,
    /// Ticks between an agent's successive reproductions.
    pub reproduction_cooldown: u32,
}

impl Default for PreyConfig {
    fn default() -> Self {
        Self {
            base_speed: 2.0,
            vision: 100.0,
            food_vision: 150.0,
            initial_energy: 100.0,
            max_energy: 150.0,
            metabolic_loss: 0.1,
            food_energy_gain: 30.0,
            forage_threshold: 80.0,
            reproduction_energy: 120.0,
            reproduction_cost: 40.0,
            reproduction_cooldown: 200,
        }
    }
}

/// Per-species predator parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PredatorConfig {
    pub base_speed: f32,
    /// Prey detection radius.
    pub vision: f32,
    pub initial_energy: f32,
    pub max_energy: f32,
    pub metabolic_loss: f32,
    /// Energy gained per prey eaten.
    pub prey_energy_gain: f32,
    pub reproduction_energy: f32,
    pub reproduction_cost: f32,
    pub reproduction_cooldown: u32,
}

impl Default for PredatorConfig {
    fn default() -> Self {
        Self {
            base_speed: 1.8,
            vision: 150.0,
            initial_energy: 150.0,
            max_energy: 200.0,
            metabolic_loss: 0.25,
            prey_energy_gain: 50.0,
            reproduction_energy: 160.0,
            reproduction_cost: 60.0,
            reproduction_cooldown: 300,
        }
    }
}

/// Three-rule flocking parameters for prey.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FlockingConfig {
    /// Neighbors inside this radius participate in flocking.
    pub radius: f32,
    /// Tighter sub-radius within which separation applies.
    pub separation_radius: f32,
    pub separation_weight: f32,
    pub alignment_weight: f32,
    pub cohesion_weight: f32,
    /// Speed boost per neighbor while flocking.
    pub speed_bonus: f32,
    /// Cap on the total flocking speed boost.
    pub speed_bonus_cap: f32,
}

impl Default for FlockingConfig {
    fn default() -> Self {
        Self {
            radius: 50.0,
            separation_radius: 20.0,
            separation_weight: 1.5,
            alignment_weight: 1.0,
            cohesion_weight: 1.0,
            speed_bonus: 0.1,
            speed_bonus_cap: 1.5,
        }
    }
}

/// Food replenishment parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FoodConfig {
    /// Ticks between spawn attempts.
    pub spawn_interval: u32,
    /// Hard cap on total food in the arena.
    pub max_food: usize,
    /// Display radius of a food item.
    pub radius: f32,
}

impl Default for FoodConfig {
    fn default() -> Self {
        Self {
            spawn_interval: 30,
            max_food: 80,
            radius: 4.0,
        }
    }
}

/// Complete simulation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Arena width; positions are clamped into `[0, width]`.
    pub width: f32,
    /// Arena height; positions are clamped into `[0, height]`.
    pub height: f32,

    pub initial_prey: usize,
    pub initial_predators: usize,
    pub initial_food: usize,
    pub initial_obstacles: usize,

    pub prey: PreyConfig,
    pub predator: PredatorConfig,
    pub flocking: FlockingConfig,
    pub food: FoodConfig,

    /// Obstacles influence agents within `obstacle.radius + avoidance_offset`.
    pub avoidance_offset: f32,
    /// Prey eat food within this distance.
    pub prey_eat_range: f32,
    /// Predators eat prey within this distance.
    pub predator_eat_range: f32,
    /// Two eligible prey within this distance may reproduce.
    pub prey_mating_range: f32,
    /// Two eligible predators within this distance may reproduce.
    pub predator_mating_range: f32,
    /// Offspring spawn within `[-birth_offset, birth_offset]` of the parent
    /// on each axis.
    pub birth_offset: i32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
            initial_prey: 30,
            initial_predators: 5,
            initial_food: 40,
            initial_obstacles: 3,
            prey: PreyConfig::default(),
            predator: PredatorConfig::default(),
            flocking: FlockingConfig::default(),
            food: FoodConfig::default(),
            avoidance_offset: 30.0,
            prey_eat_range: 10.0,
            predator_eat_range: 8.0,
            prey_mating_range: 30.0,
            predator_mating_range: 40.0,
            birth_offset: 20,
        }
    }
}

impl SimulationConfig {
    /// Load a config from a JSON file. Missing fields take their defaults.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let config: SimulationConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Sanity-check parameter ranges that would make the tick loop degenerate.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width <= 0.0 || self.height <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "arena dimensions must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if self.prey.base_speed < 0.0 || self.predator.base_speed < 0.0 {
            return Err(ConfigError::Invalid(
                "base speeds must be non-negative".into(),
            ));
        }
        if self.prey.max_energy < self.prey.initial_energy {
            return Err(ConfigError::Invalid(
                "prey max_energy must be >= initial_energy".into(),
            ));
        }
        if self.predator.max_energy < self.predator.initial_energy {
            return Err(ConfigError::Invalid(
                "predator max_energy must be >= initial_energy".into(),
            ));
        }
        if self.birth_offset < 0 {
            return Err(ConfigError::Invalid("birth_offset must be >= 0".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(SimulationConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_degenerate_arena() {
        let config = SimulationConfig {
            width: 0.0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: SimulationConfig =
            serde_json::from_str(r#"{"width": 600.0, "initial_prey": 10}"#).unwrap();
        assert_eq!(config.width, 600.0);
        assert_eq!(config.initial_prey, 10);
        assert_eq!(config.height, 800.0);
        assert_eq!(config.prey.forage_threshold, 80.0);
    }

    #[test]
    fn test_rejects_max_below_initial_energy() {
        let mut config = SimulationConfig::default();
        config.prey.max_energy = 50.0;
        assert!(config.validate().is_err());
    }
}
