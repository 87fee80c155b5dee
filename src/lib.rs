//! Supply Run - a survival puzzle game about feeding containers before they blow.
//!
//! Items decay over time. Containers want one item of each type and self-destruct
//! when their timer runs out. Filling a container scores a point, releases its
//! items and, a little later, an agent that patrols the area and stuns the
//! player on contact.
//!
//! # Architecture
//!
//! The gameplay core is plain Rust driven by [`world::Simulation`], which ticks
//! every entity in a fixed order (items, containers, agents, player) and reports
//! what happened as [`core::GameEvent`]s. The Bevy plugins are a thin shell:
//!
//! - **Core**: Game states, the event channel, config loading
//! - **World**: Builds the simulation and ticks it each frame
//! - **Player**: Keyboard input and the kinematic body
//! - **Enemies**: Agent bodies
//! - **Presentation**: Meshes, tints and indicators
//! - **UI**: HUD and victory screen

pub mod containers;
pub mod core;
pub mod enemies;
pub mod items;
pub mod player;
pub mod presentation;
pub mod ui;
pub mod world;

use bevy::prelude::*;

/// Main game plugin that adds all sub-plugins.
pub struct SupplyRunPlugin;

impl Plugin for SupplyRunPlugin {
    fn build(&self, app: &mut App) {
        app
            // Core systems (must be first)
            .add_plugins(core::CorePlugin)
            // Simulation and system ordering
            .add_plugins(world::WorldPlugin)
            .add_plugins(player::PlayerPlugin)
            .add_plugins(enemies::EnemyPlugin)
            .add_plugins(presentation::PresentationPlugin)
            .add_plugins(ui::UiPlugin);
    }
}
