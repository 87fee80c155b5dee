//! UI module - HUD and end-of-game screens.

mod hud;
mod plugin;

pub use plugin::UiPlugin;
