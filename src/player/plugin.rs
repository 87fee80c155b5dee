//! Player plugin - body spawning, keyboard input and kinematic motion.

use bevy::prelude::*;

use super::movement;
use crate::core::GameState;
use crate::world::GameplaySet;

/// Player plugin - feeds the keyboard into the simulation and moves the body.
pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(GameState::InGame), movement::spawn_player)
            .add_systems(Update, movement::read_player_input.in_set(GameplaySet::Input))
            .add_systems(
                Update,
                movement::drive_character_controller.in_set(GameplaySet::Present),
            );
    }
}
