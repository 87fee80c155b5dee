//! World module - gameplay config, scoring and the simulation driver.

mod data;
mod error;
mod plugin;
mod score;
mod simulation;

pub use data::{ContainerPlacement, GameplayConfig, LevelLayout, GAMEPLAY_CONFIG_PATH};
pub use error::{DataLoadError, SetupError};
pub use plugin::{ActiveSimulation, GameplaySet, WorldPlugin};
pub use score::{ScoreConfig, ScoreKeeper, Scoreboard};
pub use simulation::{Simulation, SimulationBuilder};
