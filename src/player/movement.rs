//! Keyboard input and kinematic movement for the player body.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use super::components::PlayerInput;
use crate::world::{ActiveSimulation, GameplayConfig};

/// Marker for the player's physics body.
#[derive(Component)]
pub struct PlayerBody;

/// Marker for the camera following the player.
#[derive(Component)]
pub struct PlayerCamera;

/// Spawn the player body with a camera looking down on it.
pub fn spawn_player(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    config: Res<GameplayConfig>,
) {
    let position = Vec3::from(config.level.player_start);

    commands
        .spawn((
            PlayerBody,
            Mesh3d(meshes.add(Capsule3d::new(0.3, 1.0))),
            MeshMaterial3d(materials.add(Color::srgb(0.9, 0.9, 0.85))),
            Transform::from_translation(position),
            // Rapier physics components
            RigidBody::KinematicPositionBased,
            Collider::capsule_y(0.5, 0.3),
            KinematicCharacterController {
                offset: CharacterLength::Absolute(0.01),
                max_slope_climb_angle: 45_f32.to_radians(),
                min_slope_slide_angle: 30_f32.to_radians(),
                snap_to_ground: Some(CharacterLength::Absolute(0.5)),
                ..default()
            },
        ))
        .with_children(|parent| {
            parent.spawn((
                Camera3d::default(),
                PlayerCamera,
                Transform::from_xyz(0.0, 12.0, 9.0).looking_at(Vec3::ZERO, Vec3::Y),
            ));
        });

    info!("Player spawned at {:?}", position);
}

/// Translate keys into this frame's `PlayerInput`.
///
/// WASD moves, Space dashes, E uses and Q drops.
pub fn read_player_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut input: ResMut<PlayerInput>,
    player_query: Query<&Transform, With<PlayerBody>>,
) {
    let mut direction = Vec3::ZERO;
    if keyboard.pressed(KeyCode::KeyW) {
        direction.z -= 1.0;
    }
    if keyboard.pressed(KeyCode::KeyS) {
        direction.z += 1.0;
    }
    if keyboard.pressed(KeyCode::KeyA) {
        direction.x -= 1.0;
    }
    if keyboard.pressed(KeyCode::KeyD) {
        direction.x += 1.0;
    }

    *input = PlayerInput {
        position: player_query.get_single().ok().map(|transform| transform.translation),
        movement: direction,
        dash: keyboard.just_pressed(KeyCode::Space),
        use_pressed: keyboard.just_pressed(KeyCode::KeyE),
        drop_pressed: keyboard.just_pressed(KeyCode::KeyQ),
    };
}

/// Hand the simulated motion to Rapier so walls still block it.
pub fn drive_character_controller(
    simulation: Option<Res<ActiveSimulation>>,
    mut controller_query: Query<&mut KinematicCharacterController, With<PlayerBody>>,
) {
    let Some(simulation) = simulation else {
        return;
    };
    let Ok(mut controller) = controller_query.get_single_mut() else {
        return;
    };
    controller.translation = Some(simulation.player().motion);
}
