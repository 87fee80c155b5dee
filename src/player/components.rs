//! Player state: carried item, stun, dash and container proximity.

use bevy::prelude::*;
use serde::Deserialize;

use super::dash::Dash;
use crate::containers::ContainerId;
use crate::items::ItemId;

/// Player tuning loaded from the gameplay data file.
#[derive(Deserialize, Clone, Debug)]
#[serde(default)]
pub struct PlayerConfig {
    /// Base movement speed in units per second
    pub move_speed: f32,
    /// How far a dash carries the player
    pub dash_distance: f32,
    /// Dash speed as a multiple of `move_speed`
    pub dash_speed_multiplier: f32,
    /// A dash that has not arrived by now is abandoned
    pub dash_max_secs: f32,
    /// Gap kept between a dash end point and the obstacle that clipped it
    pub dash_skin: f32,
    /// Radius searched for items on pickup
    pub pickup_radius: f32,
    /// Invulnerability window after a stun wears off
    pub stun_cooldown_secs: f32,
    /// Offset of a carried item along the facing direction
    pub carry_offset: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            move_speed: 5.0,
            dash_distance: 5.0,
            dash_speed_multiplier: 2.0,
            dash_max_secs: 1.0,
            dash_skin: 0.3,
            pickup_radius: 1.0,
            stun_cooldown_secs: 5.0,
            carry_offset: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StunState {
    #[default]
    Normal,
    Stunned,
}

/// What the input layer reports for one tick.
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct PlayerInput {
    /// Authoritative position from physics, if the caller has one
    pub position: Option<Vec3>,
    /// Desired horizontal movement direction (need not be normalised)
    pub movement: Vec3,
    pub dash: bool,
    /// Pick up, use on the closest container, or drop when nothing is near
    pub use_pressed: bool,
    pub drop_pressed: bool,
}

/// The player avatar's gameplay state.
#[derive(Debug, Clone)]
pub struct Player {
    pub position: Vec3,
    /// Last non-zero horizontal movement direction
    pub facing: Vec3,
    /// Translation requested this tick, for the physics layer to apply
    pub motion: Vec3,
    pub(crate) held: Option<ItemId>,
    stun: StunState,
    stun_end: f32,
    stun_cooldown_end: f32,
    pub(crate) dash: Option<Dash>,
    pub(crate) nearby: Vec<ContainerId>,
    pub(crate) closest: Option<ContainerId>,
}

impl Player {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            facing: Vec3::NEG_Z,
            motion: Vec3::ZERO,
            held: None,
            stun: StunState::Normal,
            stun_end: 0.0,
            stun_cooldown_end: f32::NEG_INFINITY,
            dash: None,
            nearby: Vec::new(),
            closest: None,
        }
    }

    /// Try to stun the player at time `now`.
    ///
    /// Rejected while `now` is inside the cooldown window of the previous
    /// stun. On acceptance any stun in flight is replaced and the cooldown is
    /// measured from the new end time.
    pub fn stun(&mut self, now: f32, duration: f32, cooldown: f32) -> bool {
        if now < self.stun_cooldown_end {
            debug!("Stun at {:.2} ignored, cooldown until {:.2}", now, self.stun_cooldown_end);
            return false;
        }
        self.stun = StunState::Stunned;
        self.stun_end = now + duration.max(0.0);
        self.stun_cooldown_end = self.stun_end + cooldown.max(0.0);
        self.dash = None;
        info!("Player stunned until {:.2}", self.stun_end);
        true
    }

    /// Leave the stunned state once its time is up. Returns whether the
    /// player recovered on this call.
    pub fn update_stun(&mut self, now: f32) -> bool {
        if self.stun == StunState::Stunned && now >= self.stun_end {
            self.stun = StunState::Normal;
            return true;
        }
        false
    }

    pub fn is_stunned(&self) -> bool {
        self.stun == StunState::Stunned
    }

    pub fn stun_state(&self) -> StunState {
        self.stun
    }

    pub fn stun_end_time(&self) -> f32 {
        self.stun_end
    }

    pub fn stun_cooldown_end_time(&self) -> f32 {
        self.stun_cooldown_end
    }

    pub fn held_item(&self) -> Option<ItemId> {
        self.held
    }

    pub fn is_holding(&self) -> bool {
        self.held.is_some()
    }

    pub fn is_dashing(&self) -> bool {
        self.dash.is_some()
    }

    pub fn nearby_containers(&self) -> &[ContainerId] {
        &self.nearby
    }

    pub fn closest_container(&self) -> Option<ContainerId> {
        self.closest
    }

    /// Where a carried item sits relative to the player.
    pub fn carry_point(&self, offset: f32) -> Vec3 {
        self.position + self.facing * offset
    }
}
