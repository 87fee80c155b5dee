//! Player interaction: pickup, drop and closest-container arbitration.

use std::collections::BTreeMap;

use bevy::prelude::*;

use super::components::Player;
use crate::containers::{Container, ContainerId, ProximityState};
use crate::core::GameEvent;
use crate::items::{Item, ItemId};

impl Player {
    /// Pick up an item lying within `radius`.
    ///
    /// Candidates are scanned in ascending id order and the first one in range
    /// wins. Does nothing while stunned or already holding something.
    pub fn try_pick_up(&mut self, items: &mut BTreeMap<ItemId, Item>, radius: f32) -> Option<ItemId> {
        if self.is_stunned() || self.is_holding() {
            return None;
        }
        let position = self.position;
        let item = items
            .values_mut()
            .find(|item| item.is_alive() && !item.is_held() && item.position.distance(position) <= radius)?;

        item.pick_up();
        self.held = Some(item.id);
        debug!("Picked up {:?} item {:?}", item.item_type, item.id);
        Some(item.id)
    }

    /// Put down whatever is held at the player's feet.
    pub fn drop_held(&mut self, items: &mut BTreeMap<ItemId, Item>) -> Option<ItemId> {
        let id = self.held.take()?;
        if let Some(item) = items.get_mut(&id) {
            item.drop_at(self.position);
        }
        Some(id)
    }

    /// Forget the held item without dropping it (it was consumed or spoiled).
    pub fn release_held(&mut self) -> Option<ItemId> {
        self.held.take()
    }

    /// Track proximity triggers: containers the player walks into join the
    /// nearby set in entry order, ones it leaves (or that ended) drop out.
    pub fn refresh_nearby(
        &mut self,
        containers: &mut BTreeMap<ContainerId, Container>,
        events: &mut Vec<GameEvent>,
    ) {
        let position = self.position;

        self.nearby.retain(|id| {
            let Some(container) = containers.get_mut(id) else {
                return false;
            };
            if !container.is_active() {
                return false;
            }
            if container.contains_point(position) {
                return true;
            }
            container.set_proximity(ProximityState::Far, events);
            false
        });

        for (id, container) in containers.iter_mut() {
            if container.is_active() && !self.nearby.contains(id) && container.contains_point(position) {
                self.nearby.push(*id);
                container.set_proximity(ProximityState::Near, events);
            }
        }

        if self.closest.is_some_and(|id| !self.nearby.contains(&id)) {
            self.closest = None;
        }
    }

    /// Stop tracking a container that no longer exists.
    pub fn forget_container(&mut self, id: ContainerId) {
        self.nearby.retain(|nearby| *nearby != id);
        if self.closest == Some(id) {
            self.closest = None;
        }
    }

    /// Recompute the nearest container and move the `Closest` rank to it.
    ///
    /// Distance ties go to whichever container entered the nearby set first.
    pub fn select_closest(
        &mut self,
        containers: &mut BTreeMap<ContainerId, Container>,
        events: &mut Vec<GameEvent>,
    ) -> Option<ContainerId> {
        let mut nearest: Option<(ContainerId, f32)> = None;
        for id in &self.nearby {
            let Some(container) = containers.get(id) else {
                continue;
            };
            let distance = container.position.distance(self.position);
            if nearest.map_or(true, |(_, best)| distance < best) {
                nearest = Some((*id, distance));
            }
        }
        let nearest = nearest.map(|(id, _)| id);

        if nearest != self.closest {
            if let Some(previous) = self.closest.and_then(|id| containers.get_mut(&id)) {
                previous.set_proximity(ProximityState::Near, events);
            }
            if let Some(next) = nearest.and_then(|id| containers.get_mut(&id)) {
                next.set_proximity(ProximityState::Closest, events);
            }
            self.closest = nearest;
        }
        self.closest
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::containers::{ContainerConfig, ContainerSeed};
    use crate::items::ItemType;

    fn containers_at(positions: &[Vec3]) -> BTreeMap<ContainerId, Container> {
        let config = ContainerConfig {
            interaction_radius: 3.0,
            ..default()
        };
        positions
            .iter()
            .enumerate()
            .map(|(index, position)| {
                let id = ContainerId(index as u32);
                (id, Container::new(id, *position, ContainerSeed::default(), &config))
            })
            .collect()
    }

    fn closest_count(containers: &BTreeMap<ContainerId, Container>) -> usize {
        containers
            .values()
            .filter(|container| container.proximity() == ProximityState::Closest)
            .count()
    }

    fn arbitrate(player: &mut Player, containers: &mut BTreeMap<ContainerId, Container>) -> Option<ContainerId> {
        let mut events = Vec::new();
        player.refresh_nearby(containers, &mut events);
        player.select_closest(containers, &mut events)
    }

    #[test]
    fn nearest_container_becomes_closest() {
        let mut containers = containers_at(&[Vec3::new(2.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0)]);
        let mut player = Player::new(Vec3::ZERO);

        assert_eq!(arbitrate(&mut player, &mut containers), Some(ContainerId(1)));
        assert_eq!(containers[&ContainerId(0)].proximity(), ProximityState::Near);
        assert_eq!(containers[&ContainerId(1)].proximity(), ProximityState::Closest);
    }

    #[test]
    fn closest_moves_as_player_walks() {
        let mut containers = containers_at(&[Vec3::new(-2.0, 0.0, 0.0), Vec3::new(2.0, 0.0, 0.0)]);
        let mut player = Player::new(Vec3::new(-1.0, 0.0, 0.0));

        for step in 0..=8 {
            player.position = Vec3::new(-2.0 + step as f32 * 0.5, 0.0, 0.0);
            let closest = arbitrate(&mut player, &mut containers);
            assert!(closest_count(&containers) <= 1);

            let expected = player
                .nearby_containers()
                .iter()
                .copied()
                .fold(None::<(ContainerId, f32)>, |best, id| {
                    let distance = containers[&id].position.distance(player.position);
                    match best {
                        Some((_, best_distance)) if best_distance <= distance => best,
                        _ => Some((id, distance)),
                    }
                })
                .map(|(id, _)| id);
            assert_eq!(closest, expected);
        }
    }

    #[test]
    fn ties_go_to_the_first_container_entered() {
        let mut containers = containers_at(&[Vec3::new(1.0, 0.0, 0.0), Vec3::new(-1.0, 0.0, 0.0)]);
        let mut player = Player::new(Vec3::ZERO);
        assert_eq!(arbitrate(&mut player, &mut containers), Some(ContainerId(0)));
    }

    #[test]
    fn leaving_range_clears_closest() {
        let mut containers = containers_at(&[Vec3::ZERO]);
        let mut player = Player::new(Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(arbitrate(&mut player, &mut containers), Some(ContainerId(0)));

        player.position = Vec3::new(10.0, 0.0, 0.0);
        assert_eq!(arbitrate(&mut player, &mut containers), None);
        assert!(player.nearby_containers().is_empty());
        assert_eq!(containers[&ContainerId(0)].proximity(), ProximityState::Far);
    }

    #[test]
    fn pickup_takes_an_item_in_range() {
        let mut items = BTreeMap::new();
        items.insert(ItemId(4), Item::new(ItemId(4), ItemType::B, Vec3::new(0.5, 0.0, 0.0), 10.0));
        items.insert(ItemId(9), Item::new(ItemId(9), ItemType::C, Vec3::new(5.0, 0.0, 0.0), 10.0));
        let mut player = Player::new(Vec3::ZERO);

        assert_eq!(player.try_pick_up(&mut items, 1.0), Some(ItemId(4)));
        assert!(items[&ItemId(4)].is_held());
        assert!(!items[&ItemId(9)].is_held());
    }

    #[test]
    fn pickup_is_refused_when_holding_or_stunned() {
        let mut items = BTreeMap::new();
        items.insert(ItemId(1), Item::new(ItemId(1), ItemType::A, Vec3::ZERO, 10.0));
        items.insert(ItemId(2), Item::new(ItemId(2), ItemType::B, Vec3::ZERO, 10.0));

        let mut player = Player::new(Vec3::ZERO);
        player.try_pick_up(&mut items, 1.0);
        assert_eq!(player.try_pick_up(&mut items, 1.0), None);
        assert_eq!(player.held_item(), Some(ItemId(1)));

        let mut stunned = Player::new(Vec3::ZERO);
        stunned.stun(0.0, 3.0, 5.0);
        assert_eq!(stunned.try_pick_up(&mut items, 1.0), None);
        assert_eq!(stunned.held_item(), None);
    }

    #[test]
    fn drop_is_a_no_op_with_empty_hands() {
        let mut items = BTreeMap::new();
        let mut player = Player::new(Vec3::ZERO);
        assert_eq!(player.drop_held(&mut items), None);
    }
}
