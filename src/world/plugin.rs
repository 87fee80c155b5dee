//! World plugin - builds the simulation and ticks it once per frame.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use super::data::GameplayConfig;
use super::score::Scoreboard;
use super::simulation::{Simulation, SimulationBuilder};
use crate::core::{GameEvent, GameState};
use crate::enemies::DirectNavigator;
use crate::player::{ObstacleProbe, OpenGround, PlayerBody, PlayerInput};

/// Ordering of the per-frame gameplay work.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameplaySet {
    /// Read devices into `PlayerInput`
    Input,
    /// Advance the simulation and publish its events
    Simulate,
    /// Mirror simulation state onto entities
    Present,
}

/// Extra floor around the container spawn area.
const ARENA_MARGIN: f32 = 4.0;

/// The running simulation.
#[derive(Resource, Deref, DerefMut)]
pub struct ActiveSimulation(pub Simulation);

/// World plugin - handles simulation setup and the fixed tick order.
pub struct WorldPlugin;

impl Plugin for WorldPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PlayerInput>()
            .configure_sets(
                Update,
                (GameplaySet::Input, GameplaySet::Simulate, GameplaySet::Present)
                    .chain()
                    .run_if(in_state(GameState::InGame)),
            )
            .add_systems(OnEnter(GameState::InGame), (start_simulation, spawn_arena))
            .add_systems(Update, advance_simulation.in_set(GameplaySet::Simulate));
    }
}

/// Build the simulation from config with the stock collaborators.
pub fn start_simulation(mut commands: Commands, config: Res<GameplayConfig>) {
    let scoreboard = Scoreboard::new(&config.score);
    let navigator = DirectNavigator::new(config.agent.move_speed);

    match SimulationBuilder::new(config.clone())
        .score_keeper(scoreboard)
        .navigator(navigator)
        .build()
    {
        Ok(simulation) => commands.insert_resource(ActiveSimulation(simulation)),
        Err(e) => error!("Could not start the simulation: {}", e),
    }
}

/// Ground, walls and light for the play area.
fn spawn_arena(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    config: Res<GameplayConfig>,
) {
    let (width, _, depth) = config.spawner.size;
    let half_width = width / 2.0 + ARENA_MARGIN;
    let half_depth = depth / 2.0 + ARENA_MARGIN;
    let floor = materials.add(Color::srgb(0.3, 0.28, 0.25));
    let wall = materials.add(Color::srgb(0.45, 0.42, 0.4));

    commands.spawn((
        Mesh3d(meshes.add(Cuboid::new(half_width * 2.0, 0.2, half_depth * 2.0))),
        MeshMaterial3d(floor),
        Transform::from_xyz(0.0, -0.1, 0.0),
        Collider::cuboid(half_width, 0.1, half_depth),
    ));

    let walls = [
        (Vec3::new(0.0, 1.0, -half_depth), Vec3::new(half_width, 1.0, 0.2)),
        (Vec3::new(0.0, 1.0, half_depth), Vec3::new(half_width, 1.0, 0.2)),
        (Vec3::new(-half_width, 1.0, 0.0), Vec3::new(0.2, 1.0, half_depth)),
        (Vec3::new(half_width, 1.0, 0.0), Vec3::new(0.2, 1.0, half_depth)),
    ];
    for (center, half_extents) in walls {
        commands.spawn((
            Mesh3d(meshes.add(Cuboid::from_size(half_extents * 2.0))),
            MeshMaterial3d(wall.clone()),
            Transform::from_translation(center),
            Collider::cuboid(half_extents.x, half_extents.y, half_extents.z),
        ));
    }

    commands.spawn((
        DirectionalLight {
            illuminance: 8000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(4.0, 10.0, 6.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}

/// Obstacle queries answered by the physics world.
struct RapierProbe<'a> {
    context: &'a RapierContext,
    exclude: Option<Entity>,
}

impl ObstacleProbe for RapierProbe<'_> {
    fn cast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<f32> {
        let mut filter = QueryFilter::default().exclude_sensors();
        if let Some(entity) = self.exclude {
            filter = filter.exclude_collider(entity);
        }
        self.context
            .cast_ray(origin, direction, max_distance, true, filter)
            .map(|(_, distance)| distance)
    }
}

/// Tick the simulation by the frame time and forward its events.
fn advance_simulation(
    time: Res<Time>,
    input: Res<PlayerInput>,
    simulation: Option<ResMut<ActiveSimulation>>,
    rapier_context: Query<&RapierContext>,
    player_query: Query<Entity, With<PlayerBody>>,
    mut events: EventWriter<GameEvent>,
) {
    let Some(mut simulation) = simulation else {
        return;
    };

    let produced = match rapier_context.get_single() {
        Ok(context) => {
            let probe = RapierProbe {
                context,
                exclude: player_query.get_single().ok(),
            };
            simulation.tick(time.delta_secs(), &input, &probe)
        }
        Err(_) => simulation.tick(time.delta_secs(), &input, &OpenGround),
    };
    events.send_batch(produced);
}
