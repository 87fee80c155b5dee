//! Enemy plugin - mirrors simulated agents onto entities.

use bevy::prelude::*;

use super::components::{AgentId, AiMode};
use crate::core::GameEvent;
use crate::world::GameplaySet;

/// Links an entity to the agent it shows.
#[derive(Component, Debug, Clone, Copy)]
pub struct AgentBody(pub AgentId);

const PATROL_COLOR: Color = Color::srgb(0.35, 0.4, 0.8);
const CHASE_COLOR: Color = Color::srgb(0.9, 0.2, 0.15);

/// Enemy plugin - spawns agent bodies and keeps them in sync.
pub struct EnemyPlugin;

impl Plugin for EnemyPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, sync_agent_bodies.in_set(GameplaySet::Present));
    }
}

/// Spawn a body per new agent and move existing ones to their reported position.
fn sync_agent_bodies(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut events: EventReader<GameEvent>,
    mut body_query: Query<(&AgentBody, &mut Transform, &MeshMaterial3d<StandardMaterial>)>,
) {
    for event in events.read() {
        match event {
            GameEvent::AgentSpawned { agent, position } => {
                commands.spawn((
                    AgentBody(*agent),
                    Mesh3d(meshes.add(Capsule3d::new(0.4, 1.0))),
                    MeshMaterial3d(materials.add(PATROL_COLOR)),
                    Transform::from_translation(*position),
                ));
            }
            GameEvent::AgentMoved { agent, position, mode } => {
                let Some((_, mut transform, material)) =
                    body_query.iter_mut().find(|(body, _, _)| body.0 == *agent)
                else {
                    continue;
                };
                transform.translation = *position;
                if let Some(material) = materials.get_mut(&material.0) {
                    material.base_color = match mode {
                        AiMode::Patrolling => PATROL_COLOR,
                        AiMode::Chasing => CHASE_COLOR,
                    };
                }
            }
            _ => {}
        }
    }
}
