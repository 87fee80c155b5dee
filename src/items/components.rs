//! Collectible item state.

use bevy::prelude::*;
use serde::Deserialize;

use crate::core::Countdown;

/// The closed set of item kinds a container can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
pub enum ItemType {
    A,
    B,
    C,
}

impl ItemType {
    /// All item types in enumeration order.
    pub const ALL: [ItemType; 3] = [ItemType::A, ItemType::B, ItemType::C];
}

/// Stable handle for an item owned by the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(pub u32);

/// Who currently owns an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Holder {
    /// Lying in the world, available for pickup.
    #[default]
    World,
    /// Carried by the player.
    Player,
}

/// Outcome of advancing an item's spoilage by one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ItemTick {
    /// Still alive with this fraction of its life left.
    Decaying(f32),
    /// Life ran out during this tick. Reported once.
    Spoiled,
    /// The item was already gone.
    Gone,
}

/// A pickup-able item that spoils after a fixed lifetime.
///
/// Unclaimed items are meant to be perishable: nothing stops the decay, held
/// or not.
#[derive(Debug, Clone)]
pub struct Item {
    pub id: ItemId,
    pub item_type: ItemType,
    pub position: Vec3,
    pub holder: Holder,
    life: Countdown,
    alive: bool,
}

impl Item {
    pub fn new(id: ItemId, item_type: ItemType, position: Vec3, lifetime: f32) -> Self {
        Self {
            id,
            item_type,
            position,
            holder: Holder::World,
            life: Countdown::new(lifetime),
            alive: true,
        }
    }

    pub fn tick(&mut self, dt: f32) -> ItemTick {
        if !self.alive {
            return ItemTick::Gone;
        }
        let fraction = self.life.tick(dt);
        if self.life.expired() {
            self.alive = false;
            ItemTick::Spoiled
        } else {
            ItemTick::Decaying(fraction)
        }
    }

    pub fn pick_up(&mut self) {
        self.holder = Holder::Player;
    }

    pub fn drop_at(&mut self, position: Vec3) {
        self.holder = Holder::World;
        self.position = position;
    }

    /// Mark the item as gone without waiting for it to spoil.
    pub fn remove(&mut self) {
        self.alive = false;
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn is_held(&self) -> bool {
        self.holder == Holder::Player
    }

    pub fn remaining_life(&self) -> f32 {
        self.life.remaining()
    }

    pub fn total_life(&self) -> f32 {
        self.life.total()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(lifetime: f32) -> Item {
        Item::new(ItemId(1), ItemType::A, Vec3::ZERO, lifetime)
    }

    #[test]
    fn spoils_after_lifetime() {
        let mut item = item(2.0);
        assert_eq!(item.tick(1.0), ItemTick::Decaying(0.5));
        assert_eq!(item.tick(1.0), ItemTick::Spoiled);
        assert!(!item.is_alive());
    }

    #[test]
    fn ticking_a_spoiled_item_is_a_no_op() {
        let mut item = item(1.0);
        item.tick(3.0);
        assert_eq!(item.tick(1.0), ItemTick::Gone);
        assert_eq!(item.remaining_life(), 0.0);
    }

    #[test]
    fn life_stays_within_bounds() {
        let mut item = item(10.0);
        item.tick(4.0);
        assert!(item.remaining_life() >= 0.0);
        assert!(item.remaining_life() <= item.total_life());
    }

    #[test]
    fn held_items_keep_decaying() {
        let mut item = item(1.0);
        item.pick_up();
        assert!(item.is_held());
        assert_eq!(item.tick(1.0), ItemTick::Spoiled);
    }

    #[test]
    fn drop_returns_item_to_world() {
        let mut item = item(5.0);
        item.pick_up();
        item.drop_at(Vec3::X);
        assert_eq!(item.holder, Holder::World);
        assert_eq!(item.position, Vec3::X);
    }
}
