//! UI plugin - HUD and the victory screen.

use bevy::app::AppExit;
use bevy::prelude::*;

use super::hud;
use crate::core::GameState;
use crate::world::ActiveSimulation;

/// UI plugin - handles all user interface.
pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        hud::setup_hud_systems(app);

        app.add_systems(OnEnter(GameState::Won), setup_victory_screen)
            .add_systems(Update, victory_input.run_if(in_state(GameState::Won)));
    }
}

/// Marker for victory screen entities.
#[derive(Component)]
struct VictoryUi;

fn setup_victory_screen(mut commands: Commands, simulation: Option<Res<ActiveSimulation>>) {
    let score = simulation.map_or(0, |simulation| simulation.score());

    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                position_type: PositionType::Absolute,
                ..default()
            },
            BackgroundColor(Color::srgba(0.0, 0.05, 0.0, 0.8)),
            VictoryUi,
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new("SUPPLIES DELIVERED"),
                TextFont {
                    font_size: 64.0,
                    ..default()
                },
                TextColor(Color::srgb(0.6, 0.9, 0.5)),
            ));
            parent.spawn((
                Text::new(format!("{score} containers filled. Press Escape to quit.")),
                TextFont {
                    font_size: 20.0,
                    ..default()
                },
                TextColor(Color::srgb(0.8, 0.8, 0.8)),
                Node {
                    margin: UiRect::top(Val::Px(20.0)),
                    ..default()
                },
            ));
        });
}

fn victory_input(keyboard: Res<ButtonInput<KeyCode>>, mut exit: EventWriter<AppExit>) {
    if keyboard.just_pressed(KeyCode::Escape) {
        exit.send(AppExit::Success);
    }
}
