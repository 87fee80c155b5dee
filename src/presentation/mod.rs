//! Presentation module - turns simulation events into meshes and materials.

mod plugin;

pub use plugin::{PresentationPlugin, SceneIndex};
