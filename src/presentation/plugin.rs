//! Presentation plugin - spawns, tints and hides the visuals the simulation asks for.
//!
//! The simulation never touches entities. Everything here reacts to
//! `GameEvent`s, so the gameplay core stays testable without a renderer.

use bevy::prelude::*;
use bevy::utils::HashMap;

use crate::containers::ContainerId;
use crate::core::{GameEvent, GameState, Indicator};
use crate::items::{ItemCatalog, ItemId, ItemType};
use crate::world::{ActiveSimulation, GameplayConfig, GameplaySet};

const CONTAINER_FRESH: Vec3 = Vec3::new(0.55, 0.4, 0.25);
const CONTAINER_EXPIRING: Vec3 = Vec3::new(0.6, 0.05, 0.05);
const HIGHLIGHT_COLOR: Color = Color::srgb(1.0, 0.9, 0.3);
const SUPPLY_BOX_COLOR: Color = Color::srgb(0.3, 0.5, 0.3);

/// Entities standing in for simulation objects.
#[derive(Resource, Default)]
pub struct SceneIndex {
    pub items: HashMap<ItemId, Entity>,
    pub containers: HashMap<ContainerId, Entity>,
    pub indicators: HashMap<(ContainerId, Indicator), Entity>,
}

/// Presentation plugin - keeps visuals in step with the simulation.
pub struct PresentationPlugin;

impl Plugin for PresentationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SceneIndex>()
            .add_systems(OnEnter(GameState::InGame), spawn_supply_boxes)
            .add_systems(
                Update,
                (spawn_and_despawn, apply_tints, apply_indicator_visibility, follow_items)
                    .chain()
                    .in_set(GameplaySet::Present),
            );
    }
}

fn spawn_supply_boxes(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    config: Res<GameplayConfig>,
) {
    for placement in &config.level.supply_boxes {
        commands.spawn((
            Mesh3d(meshes.add(Cuboid::new(1.2, 1.0, 1.2))),
            MeshMaterial3d(materials.add(SUPPLY_BOX_COLOR)),
            Transform::from_translation(Vec3::from(placement.position)),
        ));
    }
}

fn spawn_and_despawn(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut index: ResMut<SceneIndex>,
    mut events: EventReader<GameEvent>,
    config: Res<GameplayConfig>,
) {
    for event in events.read() {
        match event {
            GameEvent::ItemSpawned {
                item,
                item_type,
                position,
            } => {
                let color = config.items.blueprint(*item_type).tint(1.0);
                let entity = commands
                    .spawn((
                        Mesh3d(meshes.add(Sphere::new(0.25))),
                        MeshMaterial3d(materials.add(color)),
                        Transform::from_translation(*position),
                    ))
                    .id();
                index.items.insert(*item, entity);
            }
            GameEvent::ItemRemoved { item, .. } => {
                if let Some(entity) = index.items.remove(item) {
                    commands.entity(entity).despawn_recursive();
                }
            }
            GameEvent::ContainerSpawned {
                container, position, ..
            } => {
                spawn_container(
                    &mut commands,
                    &mut meshes,
                    &mut materials,
                    &mut index,
                    &config.items,
                    *container,
                    *position,
                );
            }
            GameEvent::ContainerTerminated { container, .. } => {
                index.indicators.retain(|(owner, _), _| owner != container);
                if let Some(entity) = index.containers.remove(container) {
                    commands.entity(entity).despawn_recursive();
                }
            }
            _ => {}
        }
    }
}

/// A container body with its highlight and one hidden cue per item type.
fn spawn_container(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    index: &mut SceneIndex,
    catalog: &ItemCatalog,
    container: ContainerId,
    position: Vec3,
) {
    let body_color = Color::srgb(CONTAINER_FRESH.x, CONTAINER_FRESH.y, CONTAINER_FRESH.z);
    let mut indicators = Vec::new();

    let entity = commands
        .spawn((
            Mesh3d(meshes.add(Cuboid::new(1.0, 1.0, 1.0))),
            MeshMaterial3d(materials.add(body_color)),
            Transform::from_translation(position),
        ))
        .with_children(|parent| {
            let highlight = parent
                .spawn((
                    Mesh3d(meshes.add(Torus::new(0.8, 1.0))),
                    MeshMaterial3d(materials.add(HIGHLIGHT_COLOR)),
                    Transform::from_xyz(0.0, -0.45, 0.0),
                    Visibility::Hidden,
                ))
                .id();
            indicators.push((Indicator::Highlight, highlight));

            for (slot, item_type) in ItemType::ALL.into_iter().enumerate() {
                let cue = parent
                    .spawn((
                        Mesh3d(meshes.add(Sphere::new(0.15))),
                        MeshMaterial3d(materials.add(catalog.blueprint(item_type).tint(1.0))),
                        Transform::from_xyz(slot as f32 * 0.4 - 0.4, 0.9, 0.0),
                        Visibility::Hidden,
                    ))
                    .id();
                indicators.push((Indicator::Missing(item_type), cue));
            }
        })
        .id();

    index.containers.insert(container, entity);
    for (indicator, cue) in indicators {
        index.indicators.insert((container, indicator), cue);
    }
}

fn apply_tints(
    mut events: EventReader<GameEvent>,
    index: Res<SceneIndex>,
    simulation: Option<Res<ActiveSimulation>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    material_query: Query<&MeshMaterial3d<StandardMaterial>>,
) {
    let Some(simulation) = simulation else {
        return;
    };

    for event in events.read() {
        let (entity, color) = match event {
            GameEvent::ItemTinted { item, fraction } => {
                let (Some(entity), Some(state)) = (index.items.get(item), simulation.item(*item)) else {
                    continue;
                };
                let blueprint = simulation.config().items.blueprint(state.item_type);
                (*entity, blueprint.tint(*fraction))
            }
            GameEvent::ContainerTinted { container, fraction } => {
                let Some(entity) = index.containers.get(container) else {
                    continue;
                };
                let rgb = CONTAINER_EXPIRING.lerp(CONTAINER_FRESH, fraction.clamp(0.0, 1.0));
                (*entity, Color::srgb(rgb.x, rgb.y, rgb.z))
            }
            _ => continue,
        };

        if let Ok(handle) = material_query.get(entity) {
            if let Some(material) = materials.get_mut(&handle.0) {
                material.base_color = color;
            }
        }
    }
}

fn apply_indicator_visibility(
    mut events: EventReader<GameEvent>,
    index: Res<SceneIndex>,
    mut visibility_query: Query<&mut Visibility>,
) {
    for event in events.read() {
        let GameEvent::IndicatorVisibility {
            container,
            indicator,
            visible,
        } = event
        else {
            continue;
        };
        let Some(entity) = index.indicators.get(&(*container, *indicator)) else {
            continue;
        };
        if let Ok(mut visibility) = visibility_query.get_mut(*entity) {
            *visibility = if *visible {
                Visibility::Inherited
            } else {
                Visibility::Hidden
            };
        }
    }
}

/// Keep item meshes on their simulated positions, including carried ones.
fn follow_items(
    simulation: Option<Res<ActiveSimulation>>,
    index: Res<SceneIndex>,
    mut transform_query: Query<&mut Transform>,
) {
    let Some(simulation) = simulation else {
        return;
    };
    for item in simulation.items() {
        let Some(entity) = index.items.get(&item.id) else {
            continue;
        };
        if let Ok(mut transform) = transform_query.get_mut(*entity) {
            transform.translation = item.position;
        }
    }
}
