//! In-game HUD - score, carried item and the closest container's timer.

use bevy::prelude::*;

use crate::core::GameState;
use crate::world::{ActiveSimulation, GameplaySet};

/// Marker for HUD root entity.
#[derive(Component)]
pub struct HudRoot;

#[derive(Component)]
pub struct ScoreText;

/// Carried item and stun status.
#[derive(Component)]
pub struct StatusText;

/// Fill of the closest container's self-destruct bar.
#[derive(Component)]
pub struct ContainerTimerBar;

/// Setup HUD systems.
pub fn setup_hud_systems(app: &mut App) {
    app.add_systems(OnEnter(GameState::InGame), spawn_hud)
        .add_systems(
            Update,
            (update_score_text, update_status_text, update_container_timer).in_set(GameplaySet::Present),
        );
}

/// Spawn the HUD UI.
fn spawn_hud(mut commands: Commands) {
    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::Start,
                align_items: AlignItems::Start,
                padding: UiRect::all(Val::Px(20.0)),
                ..default()
            },
            HudRoot,
        ))
        .with_children(|parent| {
            spawn_label(parent, ScoreText);
            spawn_label(parent, StatusText);

            parent
                .spawn((Node {
                    flex_direction: FlexDirection::Row,
                    align_items: AlignItems::Center,
                    margin: UiRect::top(Val::Px(5.0)),
                    ..default()
                },))
                .with_children(|bar_parent| {
                    bar_parent.spawn((
                        Text::new("Timer"),
                        TextFont {
                            font_size: 14.0,
                            ..default()
                        },
                        TextColor(Color::srgb(0.8, 0.8, 0.8)),
                        Node {
                            width: Val::Px(60.0),
                            ..default()
                        },
                    ));

                    // Bar background
                    bar_parent
                        .spawn((
                            Node {
                                width: Val::Px(150.0),
                                height: Val::Px(12.0),
                                ..default()
                            },
                            BackgroundColor(Color::srgb(0.1, 0.1, 0.1)),
                        ))
                        .with_children(|bg| {
                            bg.spawn((
                                Node {
                                    width: Val::Percent(0.0),
                                    height: Val::Percent(100.0),
                                    ..default()
                                },
                                BackgroundColor(Color::srgb(0.8, 0.3, 0.2)),
                                ContainerTimerBar,
                            ));
                        });
                });
        });
}

fn spawn_label<M: Component>(parent: &mut ChildBuilder, marker: M) {
    parent.spawn((
        Text::new(""),
        TextFont {
            font_size: 18.0,
            ..default()
        },
        TextColor(Color::srgb(0.9, 0.9, 0.9)),
        marker,
    ));
}

fn update_score_text(
    simulation: Option<Res<ActiveSimulation>>,
    mut text_query: Query<&mut Text, With<ScoreText>>,
) {
    let Some(simulation) = simulation else {
        return;
    };
    let Ok(mut text) = text_query.get_single_mut() else {
        return;
    };
    text.0 = format!(
        "Score: {} / {}",
        simulation.score(),
        simulation.config().score.win_threshold
    );
}

fn update_status_text(
    simulation: Option<Res<ActiveSimulation>>,
    mut text_query: Query<&mut Text, With<StatusText>>,
) {
    let Some(simulation) = simulation else {
        return;
    };
    let Ok(mut text) = text_query.get_single_mut() else {
        return;
    };

    let player = simulation.player();
    let carrying = player
        .held_item()
        .and_then(|id| simulation.item(id))
        .map(|item| format!("Carrying {:?}", item.item_type))
        .unwrap_or_else(|| "Empty-handed".to_string());
    text.0 = if player.is_stunned() {
        format!("{carrying} (stunned)")
    } else {
        carrying
    };
}

/// Show how long the closest container has left.
fn update_container_timer(
    simulation: Option<Res<ActiveSimulation>>,
    mut bar_query: Query<&mut Node, With<ContainerTimerBar>>,
) {
    let Some(simulation) = simulation else {
        return;
    };
    let Ok(mut bar) = bar_query.get_single_mut() else {
        return;
    };

    let total = simulation.config().container.self_destruct_secs;
    let fraction = simulation
        .player()
        .closest_container()
        .and_then(|id| simulation.container(id))
        .map_or(0.0, |container| container.self_destruct_remaining() / total);
    bar.width = Val::Percent(fraction.clamp(0.0, 1.0) * 100.0);
}
