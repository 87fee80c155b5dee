//! Patrol agent state.

use bevy::prelude::*;
use rand::Rng;
use serde::Deserialize;

/// Stable handle for an agent owned by the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AgentId(pub u32);

/// AI state machine for agent behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AiMode {
    /// Walking the ring of patrol points.
    #[default]
    Patrolling,
    /// Heading straight for the player.
    Chasing,
}

/// Agent tuning loaded from the gameplay data file.
#[derive(Deserialize, Clone, Debug)]
#[serde(default)]
pub struct AgentConfig {
    pub patrol_point_count: usize,
    /// Leash range around the spawn point; also bounds the patrol points
    pub patrol_radius: f32,
    pub detection_radius: f32,
    /// Distance at which a patrol point counts as reached
    pub arrival_threshold: f32,
    pub move_speed: f32,
    /// Distance at which the agent touches the player
    pub contact_radius: f32,
    pub stun_duration_secs: f32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            patrol_point_count: 4,
            patrol_radius: 20.0,
            detection_radius: 10.0,
            arrival_threshold: 0.5,
            move_speed: 3.5,
            contact_radius: 1.0,
            stun_duration_secs: 3.0,
        }
    }
}

/// A patrolling agent that chases the player inside its leash range.
#[derive(Debug, Clone)]
pub struct AiAgent {
    pub id: AgentId,
    pub home: Vec3,
    pub patrol_radius: f32,
    pub detection_radius: f32,
    pub arrival_threshold: f32,
    pub contact_radius: f32,
    pub(crate) mode: AiMode,
    pub(crate) patrol_points: Vec<Vec3>,
    pub(crate) current_patrol_index: usize,
    pub(crate) touching_player: bool,
}

impl AiAgent {
    /// Create an agent at `home` with patrol points sampled around it.
    pub fn spawn<R: Rng + ?Sized>(id: AgentId, home: Vec3, config: &AgentConfig, rng: &mut R) -> Self {
        let patrol_points = sample_patrol_points(home, config.patrol_radius, config.patrol_point_count, rng);
        Self::with_patrol_points(id, home, patrol_points, config)
    }

    /// Create an agent with a fixed patrol route.
    pub fn with_patrol_points(id: AgentId, home: Vec3, patrol_points: Vec<Vec3>, config: &AgentConfig) -> Self {
        Self {
            id,
            home,
            patrol_radius: config.patrol_radius,
            detection_radius: config.detection_radius,
            arrival_threshold: config.arrival_threshold,
            contact_radius: config.contact_radius,
            mode: AiMode::Patrolling,
            patrol_points,
            current_patrol_index: 0,
            touching_player: false,
        }
    }

    pub fn mode(&self) -> AiMode {
        self.mode
    }

    pub fn patrol_points(&self) -> &[Vec3] {
        &self.patrol_points
    }

    /// Index of the patrol point that will be targeted next.
    pub fn current_patrol_index(&self) -> usize {
        self.current_patrol_index
    }
}

/// Sample `count` points uniformly inside a disc of `radius` around `home`,
/// all at `home`'s height.
pub fn sample_patrol_points<R: Rng + ?Sized>(home: Vec3, radius: f32, count: usize, rng: &mut R) -> Vec<Vec3> {
    (0..count)
        .map(|_| loop {
            let x: f32 = rng.gen_range(-1.0..=1.0);
            let z: f32 = rng.gen_range(-1.0..=1.0);
            if x * x + z * z <= 1.0 {
                break Vec3::new(home.x + x * radius, home.y, home.z + z * radius);
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn patrol_points_stay_inside_radius_at_spawn_height() {
        let mut rng = StdRng::seed_from_u64(42);
        let home = Vec3::new(3.0, 1.5, -2.0);
        let points = sample_patrol_points(home, 20.0, 64, &mut rng);

        assert_eq!(points.len(), 64);
        for point in points {
            assert_eq!(point.y, 1.5);
            assert!(point.distance(home) <= 20.0 + f32::EPSILON * 32.0);
        }
    }

    #[test]
    fn spawned_agent_starts_patrolling() {
        let mut rng = StdRng::seed_from_u64(1);
        let agent = AiAgent::spawn(AgentId(0), Vec3::ZERO, &AgentConfig::default(), &mut rng);
        assert_eq!(agent.mode(), AiMode::Patrolling);
        assert_eq!(agent.patrol_points().len(), 4);
        assert_eq!(agent.current_patrol_index(), 0);
    }
}
