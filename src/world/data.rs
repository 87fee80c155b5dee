//! Gameplay data structures and RON loading.

use bevy::prelude::*;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use super::error::{DataLoadError, SetupError};
use super::score::ScoreConfig;
use crate::containers::{ContainerConfig, ContainerSeed};
use crate::enemies::AgentConfig;
use crate::items::{ItemCatalog, ItemType, SpawnerConfig, SupplyBoxPlacement};
use crate::player::PlayerConfig;

/// Default location of the gameplay data file.
pub const GAMEPLAY_CONFIG_PATH: &str = "assets/data/gameplay.ron";

/// A container placed by the level file.
#[derive(Deserialize, Clone, Debug)]
pub struct ContainerPlacement {
    pub position: (f32, f32, f32),
    #[serde(default)]
    pub seed: ContainerSeed,
}

/// Entities present when a level starts.
#[derive(Deserialize, Clone, Debug)]
#[serde(default)]
pub struct LevelLayout {
    pub player_start: (f32, f32, f32),
    pub containers: Vec<ContainerPlacement>,
    /// Spawn points of agents present from the start
    pub agents: Vec<(f32, f32, f32)>,
    pub supply_boxes: Vec<SupplyBoxPlacement>,
}

impl Default for LevelLayout {
    fn default() -> Self {
        Self {
            player_start: (0.0, 1.0, 0.0),
            containers: Vec::new(),
            agents: Vec::new(),
            supply_boxes: Vec::new(),
        }
    }
}

/// Everything the simulation needs to know about a game, loaded from RON.
#[derive(Resource, Deserialize, Clone, Debug, Default)]
#[serde(default)]
pub struct GameplayConfig {
    /// Fixed seed for reproducible runs; entropy when absent
    pub rng_seed: Option<u64>,
    pub items: ItemCatalog,
    pub container: ContainerConfig,
    pub player: PlayerConfig,
    pub agent: AgentConfig,
    pub spawner: SpawnerConfig,
    pub score: ScoreConfig,
    pub level: LevelLayout,
}

impl GameplayConfig {
    /// Load gameplay config from the default RON file, falling back to defaults.
    pub fn load() -> Self {
        match Self::from_path(GAMEPLAY_CONFIG_PATH) {
            Ok(config) => {
                info!("Loaded gameplay config from {}", GAMEPLAY_CONFIG_PATH);
                config
            }
            Err(DataLoadError::FileNotFound(path)) => {
                warn!("Could not find {}. Using defaults.", path);
                Self::default()
            }
            Err(e) => {
                error!("{}. Using defaults.", e);
                Self::default()
            }
        }
    }

    /// Load gameplay config from a RON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DataLoadError> {
        let path = path.as_ref();
        let display = path.display().to_string();
        if !path.exists() {
            return Err(DataLoadError::FileNotFound(display));
        }
        let contents = fs::read_to_string(path).map_err(|e| DataLoadError::ReadError {
            path: display.clone(),
            details: e.to_string(),
        })?;
        Self::from_ron(&contents).map_err(|details| DataLoadError::ParseError { path: display, details })
    }

    /// Parse gameplay config from RON text.
    pub fn from_ron(contents: &str) -> Result<Self, String> {
        ron::from_str(contents).map_err(|e| e.to_string())
    }

    /// Reject values the simulation cannot run with.
    pub fn validate(&self) -> Result<(), SetupError> {
        for item_type in ItemType::ALL {
            positive("items.lifetime_secs", self.items.blueprint(item_type).lifetime_secs)?;
        }
        positive("container.self_destruct_secs", self.container.self_destruct_secs)?;
        non_negative("container.agent_spawn_delay_secs", self.container.agent_spawn_delay_secs)?;
        positive("container.interaction_radius", self.container.interaction_radius)?;
        non_negative("container.indicator_display_secs", self.container.indicator_display_secs)?;

        positive("player.move_speed", self.player.move_speed)?;
        non_negative("player.dash_distance", self.player.dash_distance)?;
        positive("player.dash_max_secs", self.player.dash_max_secs)?;
        positive("player.pickup_radius", self.player.pickup_radius)?;
        non_negative("player.stun_cooldown_secs", self.player.stun_cooldown_secs)?;

        non_negative("agent.patrol_radius", self.agent.patrol_radius)?;
        non_negative("agent.detection_radius", self.agent.detection_radius)?;
        positive("agent.arrival_threshold", self.agent.arrival_threshold)?;
        non_negative("agent.move_speed", self.agent.move_speed)?;
        non_negative("agent.stun_duration_secs", self.agent.stun_duration_secs)?;

        if self.spawner.enabled {
            positive("spawner.interval_secs", self.spawner.interval_secs)?;
            if self.spawner.min_count > self.spawner.max_count {
                return Err(SetupError::InvalidConfig {
                    field: "spawner.min_count",
                    reason: format!(
                        "{} is greater than max_count {}",
                        self.spawner.min_count, self.spawner.max_count
                    ),
                });
            }
        }

        if self.score.win_threshold == 0 {
            return Err(SetupError::InvalidConfig {
                field: "score.win_threshold",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), SetupError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(SetupError::InvalidConfig {
            field,
            reason: format!("{value} must be greater than zero"),
        })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), SetupError> {
    if value >= 0.0 {
        Ok(())
    } else {
        Err(SetupError::InvalidConfig {
            field,
            reason: format!("{value} must not be negative"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::SeedPolicy;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(GameplayConfig::default().validate(), Ok(()));
    }

    #[test]
    fn partial_ron_fills_in_defaults() {
        let config = GameplayConfig::from_ron(
            r#"(
                rng_seed: Some(7),
                container: (self_destruct_secs: 12.0),
                spawner: (enabled: false, seed_policy: Independent),
                level: (
                    containers: [
                        (position: (1.0, 0.0, 2.0), seed: (type_b: true)),
                    ],
                    supply_boxes: [
                        (position: (0.0, 0.0, 0.0), spawn_point: (0.0, 0.0, 1.0), item_type: C),
                    ],
                ),
            )"#,
        )
        .expect("valid RON");

        assert_eq!(config.rng_seed, Some(7));
        assert_eq!(config.container.self_destruct_secs, 12.0);
        assert_eq!(config.container.agent_spawn_delay_secs, 5.0);
        assert_eq!(config.spawner.seed_policy, SeedPolicy::Independent);
        assert!(!config.spawner.enabled);
        assert!(config.level.containers[0].seed.type_b);
        assert!(!config.level.containers[0].seed.type_a);
        assert_eq!(config.level.supply_boxes[0].item_type, ItemType::C);
        assert_eq!(config.level.supply_boxes[0].reach, 2.0);
    }

    #[test]
    fn shipped_config_loads_and_validates() {
        let config = GameplayConfig::from_path(GAMEPLAY_CONFIG_PATH).expect("shipped config parses");
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.level.supply_boxes.len(), 3);
        assert!(config.level.containers[1].seed.type_a);
    }

    #[test]
    fn missing_file_is_reported() {
        let result = GameplayConfig::from_path("does/not/exist.ron");
        assert!(matches!(result, Err(DataLoadError::FileNotFound(_))));
    }

    #[test]
    fn bad_ron_is_a_parse_error() {
        assert!(GameplayConfig::from_ron("(container: oops)").is_err());
    }

    #[test]
    fn validation_rejects_bad_ranges() {
        let mut config = GameplayConfig::default();
        config.container.self_destruct_secs = 0.0;
        assert!(matches!(
            config.validate(),
            Err(SetupError::InvalidConfig {
                field: "container.self_destruct_secs",
                ..
            })
        ));

        let mut config = GameplayConfig::default();
        config.spawner.min_count = 6;
        assert!(config.validate().is_err());

        config.spawner.enabled = false;
        assert_eq!(config.validate(), Ok(()));
    }
}
