//! Items module - decaying items, the type catalog and item sources.

mod catalog;
mod components;
mod spawner;

pub use catalog::{ItemBlueprint, ItemCatalog};
pub use components::*;
pub use spawner::{ContainerSpawner, SeedPolicy, SpawnRequest, SpawnerConfig, SupplyBox, SupplyBoxPlacement};
