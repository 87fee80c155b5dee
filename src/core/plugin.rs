//! Core plugin that sets up game states, events and the gameplay config.

use bevy::prelude::*;

use super::events::GameEvent;
use super::states::GameState;
use crate::world::GameplayConfig;

/// Core plugin - must be added first as other plugins depend on it.
///
/// This plugin sets up:
/// - Game states (Loading, InGame, Won)
/// - The `GameEvent` channel the simulation publishes on
/// - Loading of `GameplayConfig` from RON
pub struct CorePlugin;

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<GameState>()
            .add_event::<GameEvent>()
            .add_systems(OnEnter(GameState::Loading), load_gameplay_config)
            .add_systems(Update, enter_won_state.run_if(in_state(GameState::InGame)));
    }
}

/// Read the gameplay data file and start the game.
fn load_gameplay_config(mut commands: Commands, mut next_state: ResMut<NextState<GameState>>) {
    commands.insert_resource(GameplayConfig::load());
    next_state.set(GameState::InGame);
}

fn enter_won_state(mut events: EventReader<GameEvent>, mut next_state: ResMut<NextState<GameState>>) {
    if events.read().any(|event| *event == GameEvent::Victory) {
        info!("Victory!");
        next_state.set(GameState::Won);
    }
}
