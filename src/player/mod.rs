//! Player module - interaction controller, stun, dash and keyboard input.

mod components;
mod dash;
mod interaction;
mod movement;
mod plugin;

pub use components::*;
pub use dash::{Dash, DashStep, ObstacleProbe, OpenGround, DASH_ARRIVAL_DISTANCE};
pub use movement::{PlayerBody, PlayerCamera};
pub use plugin::PlayerPlugin;
