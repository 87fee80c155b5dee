//! Enemies module - patrolling agents, their AI and navigation.

mod ai;
mod components;
mod navigation;
mod plugin;

pub use ai::AgentSenses;
pub use components::*;
pub use navigation::{DirectNavigator, Navigator};
pub use plugin::{AgentBody, EnemyPlugin};
