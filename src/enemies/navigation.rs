//! Navigation collaborator used by agents.

use std::collections::HashMap;

use bevy::prelude::*;

use super::components::AgentId;

/// Moves agents towards destinations and reports where they are.
///
/// Pathfinding lives behind this trait; the simulation only asks agents to
/// go somewhere and reads back positions and remaining distance.
pub trait Navigator: Send + Sync {
    fn register(&mut self, agent: AgentId, position: Vec3);
    fn navigate_to(&mut self, agent: AgentId, destination: Vec3);
    fn advance(&mut self, dt: f32);
    fn position_of(&self, agent: AgentId) -> Option<Vec3>;
    fn remaining_distance(&self, agent: AgentId) -> Option<f32>;
}

#[derive(Debug, Clone)]
struct Walker {
    position: Vec3,
    destination: Vec3,
}

/// Straight-line navigation at a fixed speed. Ignores obstacles.
#[derive(Debug, Clone)]
pub struct DirectNavigator {
    speed: f32,
    walkers: HashMap<AgentId, Walker>,
}

impl DirectNavigator {
    pub fn new(speed: f32) -> Self {
        Self {
            speed,
            walkers: HashMap::new(),
        }
    }
}

impl Navigator for DirectNavigator {
    fn register(&mut self, agent: AgentId, position: Vec3) {
        self.walkers.insert(
            agent,
            Walker {
                position,
                destination: position,
            },
        );
    }

    fn navigate_to(&mut self, agent: AgentId, destination: Vec3) {
        if let Some(walker) = self.walkers.get_mut(&agent) {
            walker.destination = destination;
        }
    }

    fn advance(&mut self, dt: f32) {
        let step = self.speed * dt;
        for walker in self.walkers.values_mut() {
            let offset = walker.destination - walker.position;
            let distance = offset.length();
            if distance <= step {
                walker.position = walker.destination;
            } else {
                walker.position += offset / distance * step;
            }
        }
    }

    fn position_of(&self, agent: AgentId) -> Option<Vec3> {
        self.walkers.get(&agent).map(|walker| walker.position)
    }

    fn remaining_distance(&self, agent: AgentId) -> Option<f32> {
        self.walkers
            .get(&agent)
            .map(|walker| walker.position.distance(walker.destination))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walks_in_a_straight_line_and_stops() {
        let mut navigator = DirectNavigator::new(2.0);
        navigator.register(AgentId(0), Vec3::ZERO);
        navigator.navigate_to(AgentId(0), Vec3::new(3.0, 0.0, 0.0));

        navigator.advance(1.0);
        assert_eq!(navigator.position_of(AgentId(0)), Some(Vec3::new(2.0, 0.0, 0.0)));
        assert_eq!(navigator.remaining_distance(AgentId(0)), Some(1.0));

        navigator.advance(1.0);
        assert_eq!(navigator.position_of(AgentId(0)), Some(Vec3::new(3.0, 0.0, 0.0)));
        assert_eq!(navigator.remaining_distance(AgentId(0)), Some(0.0));
    }

    #[test]
    fn unknown_agents_are_ignored() {
        let mut navigator = DirectNavigator::new(1.0);
        navigator.navigate_to(AgentId(7), Vec3::ONE);
        assert_eq!(navigator.position_of(AgentId(7)), None);
    }
}
