//! Item catalog: maps each item type to the blueprint used to spawn it.

use bevy::prelude::*;
use serde::Deserialize;

use super::components::{Item, ItemId, ItemType};

/// Spawn parameters for one item type.
#[derive(Deserialize, Clone, Debug)]
pub struct ItemBlueprint {
    /// Seconds before a fresh item spoils
    pub lifetime_secs: f32,
    /// Colour at full life
    pub fresh_color: (f32, f32, f32),
    /// Colour just before spoiling
    pub spoiled_color: (f32, f32, f32),
}

impl ItemBlueprint {
    fn with_color(fresh_color: (f32, f32, f32)) -> Self {
        Self {
            lifetime_secs: 10.0,
            fresh_color,
            spoiled_color: (1.0, 0.0, 0.0),
        }
    }

    /// Colour for an item with `fraction` of its life left.
    pub fn tint(&self, fraction: f32) -> Color {
        let spoiled = Vec3::from(self.spoiled_color);
        let fresh = Vec3::from(self.fresh_color);
        let rgb = spoiled.lerp(fresh, fraction.clamp(0.0, 1.0));
        Color::srgb(rgb.x, rgb.y, rgb.z)
    }
}

/// Blueprints for the closed set of item types.
#[derive(Deserialize, Clone, Debug)]
#[serde(default)]
pub struct ItemCatalog {
    pub a: ItemBlueprint,
    pub b: ItemBlueprint,
    pub c: ItemBlueprint,
}

impl Default for ItemCatalog {
    fn default() -> Self {
        Self {
            a: ItemBlueprint::with_color((0.9, 0.9, 0.9)),
            b: ItemBlueprint::with_color((0.3, 0.6, 1.0)),
            c: ItemBlueprint::with_color((0.4, 0.9, 0.4)),
        }
    }
}

impl ItemCatalog {
    pub fn blueprint(&self, item_type: ItemType) -> &ItemBlueprint {
        match item_type {
            ItemType::A => &self.a,
            ItemType::B => &self.b,
            ItemType::C => &self.c,
        }
    }

    /// Create a fresh item of `item_type` at `position`.
    pub fn instantiate(&self, id: ItemId, item_type: ItemType, position: Vec3) -> Item {
        Item::new(id, item_type, position, self.blueprint(item_type).lifetime_secs)
    }
}
