//! Game state definitions that control the overall flow of the game.
//!
//! Gameplay systems only run in `InGame`; reaching the win threshold moves
//! the game to `Won`, which freezes the simulation with the world visible.

use bevy::prelude::*;

#[derive(States, Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub enum GameState {
    /// Reading the gameplay data file
    #[default]
    Loading,
    /// Active gameplay
    InGame,
    /// Win threshold reached
    Won,
}
