//! Obstacle-aware dash.

use bevy::prelude::*;

/// Distance at which a dash counts as having reached its target.
pub const DASH_ARRIVAL_DISTANCE: f32 = 0.05;

/// Answers "how far can I travel along this ray before hitting something?".
pub trait ObstacleProbe {
    /// Distance to the first obstacle along `direction` within `max_distance`.
    fn cast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<f32>;
}

/// A probe for levels with nothing in the way.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenGround;

impl ObstacleProbe for OpenGround {
    fn cast(&self, _origin: Vec3, _direction: Vec3, _max_distance: f32) -> Option<f32> {
        None
    }
}

/// Result of advancing a dash by one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DashStep {
    /// Still travelling; apply this translation.
    Moving(Vec3),
    /// Done after applying this translation.
    Finished(Vec3),
}

/// A dash in progress towards a fixed end point.
#[derive(Debug, Clone, PartialEq)]
pub struct Dash {
    pub target: Vec3,
    speed: f32,
    elapsed: f32,
    max_secs: f32,
}

impl Dash {
    /// Plan a dash from `origin` along `direction`, stopping `skin` short of
    /// the first obstacle the probe reports.
    pub fn plan(
        origin: Vec3,
        direction: Vec3,
        distance: f32,
        skin: f32,
        speed: f32,
        max_secs: f32,
        probe: &dyn ObstacleProbe,
    ) -> Self {
        let direction = direction.normalize_or_zero();
        let reach = match probe.cast(origin, direction, distance) {
            Some(hit) => (hit - skin).clamp(0.0, distance),
            None => distance,
        };
        Self {
            target: origin + direction * reach,
            speed,
            elapsed: 0.0,
            max_secs,
        }
    }

    /// Advance from `position` by `dt`.
    pub fn step(&mut self, position: Vec3, dt: f32) -> DashStep {
        self.elapsed += dt;
        if self.elapsed > self.max_secs {
            return DashStep::Finished(Vec3::ZERO);
        }

        let to_target = self.target - position;
        let distance = to_target.length();
        let travel = self.speed * dt;
        if distance <= DASH_ARRIVAL_DISTANCE || travel >= distance {
            return DashStep::Finished(to_target);
        }
        DashStep::Moving(to_target / distance * travel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct WallAt(f32);

    impl ObstacleProbe for WallAt {
        fn cast(&self, _origin: Vec3, _direction: Vec3, max_distance: f32) -> Option<f32> {
            (self.0 <= max_distance).then_some(self.0)
        }
    }

    #[test]
    fn open_dash_reaches_full_distance() {
        let mut dash = Dash::plan(Vec3::ZERO, Vec3::X, 5.0, 0.25, 10.0, 1.0, &OpenGround);
        assert_eq!(dash.target, Vec3::new(5.0, 0.0, 0.0));

        let mut position = Vec3::ZERO;
        let DashStep::Moving(step) = dash.step(position, 0.25) else {
            panic!("first step should still be moving");
        };
        position += step;
        assert_eq!(position, Vec3::new(2.5, 0.0, 0.0));

        assert_eq!(dash.step(position, 0.25), DashStep::Finished(Vec3::new(2.5, 0.0, 0.0)));
    }

    #[test]
    fn obstacle_clamps_target_short_of_hit() {
        let dash = Dash::plan(Vec3::ZERO, Vec3::Z, 5.0, 0.25, 10.0, 1.0, &WallAt(2.0));
        assert_eq!(dash.target, Vec3::new(0.0, 0.0, 1.75));
    }

    #[test]
    fn obstacle_closer_than_skin_means_no_travel() {
        let dash = Dash::plan(Vec3::ZERO, Vec3::Z, 5.0, 0.5, 10.0, 1.0, &WallAt(0.25));
        assert_eq!(dash.target, Vec3::ZERO);
    }

    #[test]
    fn dash_times_out() {
        let mut dash = Dash::plan(Vec3::ZERO, Vec3::X, 100.0, 0.0, 1.0, 0.5, &OpenGround);
        assert!(matches!(dash.step(Vec3::ZERO, 0.25), DashStep::Moving(_)));
        assert!(matches!(dash.step(Vec3::ZERO, 0.25), DashStep::Moving(_)));
        assert_eq!(dash.step(Vec3::ZERO, 0.25), DashStep::Finished(Vec3::ZERO));
    }
}
