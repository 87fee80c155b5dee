//! Core module - timers, suspended tasks, game events and states.
//!
//! Everything else builds on the countdown and task primitives here.

mod countdown;
mod events;
mod plugin;
mod states;
mod task;

pub use countdown::Countdown;
pub use events::{GameEvent, Indicator, RemovalReason};
pub use plugin::CorePlugin;
pub use states::GameState;
pub use task::Delayed;
