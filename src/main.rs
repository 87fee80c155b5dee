//! Supply Run - Entry Point
//!
//! Controls:
//! - WASD: Move
//! - Space: Dash
//! - E: Pick up, or use the held item on the closest container
//! - Q: Drop the held item

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Supply Run".to_string(),
                resolution: (1280.0, 720.0).into(),
                ..default()
            }),
            ..default()
        }))
        // Physics
        .add_plugins(RapierPhysicsPlugin::<NoUserData>::default())
        .add_plugins(supply_run::SupplyRunPlugin)
        .run();
}
