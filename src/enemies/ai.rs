//! Patrol, detection and chase decisions.

use bevy::prelude::*;

use super::components::{AiAgent, AiMode};

/// What the agent perceives on one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentSenses {
    pub position: Vec3,
    pub player: Vec3,
    /// Whether navigation reports the current destination as reached
    pub arrived: bool,
}

impl AiAgent {
    /// Chase only when the player is both detectable from where the agent
    /// stands and inside the leash range around home.
    pub fn should_chase(&self, position: Vec3, player: Vec3) -> bool {
        position.distance(player) <= self.detection_radius && self.home.distance(player) <= self.patrol_radius
    }

    /// First destination after spawning.
    pub fn begin_patrol(&mut self) -> Option<Vec3> {
        self.advance_patrol()
    }

    /// Decide this tick's mode and, if it changed, the new destination.
    pub fn think(&mut self, senses: AgentSenses) -> Option<Vec3> {
        let chase = self.should_chase(senses.position, senses.player);
        match (self.mode, chase) {
            (AiMode::Patrolling, true) => {
                debug!("Agent {:?} spotted the player", self.id);
                self.mode = AiMode::Chasing;
                Some(senses.player)
            }
            (AiMode::Chasing, true) => Some(senses.player),
            (AiMode::Chasing, false) => {
                debug!("Agent {:?} lost the player, resuming patrol", self.id);
                self.mode = AiMode::Patrolling;
                self.advance_patrol()
            }
            (AiMode::Patrolling, false) if senses.arrived => self.advance_patrol(),
            (AiMode::Patrolling, false) => None,
        }
    }

    /// Report whether the agent just came into contact with the player.
    ///
    /// Only the transition into contact counts, so standing next to the
    /// player does not produce a contact every tick.
    pub fn check_contact(&mut self, position: Vec3, player: Vec3) -> bool {
        let touching = position.distance(player) <= self.contact_radius;
        let entered = touching && !self.touching_player;
        self.touching_player = touching;
        entered
    }

    /// Target the current patrol point and move the cursor along the ring.
    fn advance_patrol(&mut self) -> Option<Vec3> {
        if self.patrol_points.is_empty() {
            return None;
        }
        let target = self.patrol_points[self.current_patrol_index];
        self.current_patrol_index = (self.current_patrol_index + 1) % self.patrol_points.len();
        Some(target)
    }
}
