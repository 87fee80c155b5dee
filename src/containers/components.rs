//! Container state machine: consumption, self-destruct and proximity indicators.
//!
//! A container starts `Active` and ends in exactly one terminal phase:
//! `FullyConsumed` when every required type has been fed to it, or `Expired`
//! when its self-destruct countdown runs out. The destroyed flag makes the
//! terminal transition idempotent even if both triggers land in one tick.

use bevy::prelude::*;
use serde::Deserialize;
use thiserror::Error;

use crate::core::{Delayed, GameEvent, Indicator};
use crate::items::ItemType;

/// Stable handle for a container owned by the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContainerId(pub u32);

/// Which item types are already satisfied when a container is placed.
#[derive(Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(default)]
pub struct ContainerSeed {
    pub type_a: bool,
    pub type_b: bool,
    pub type_c: bool,
}

impl ContainerSeed {
    pub fn types(&self) -> Vec<ItemType> {
        ItemType::ALL
            .into_iter()
            .filter(|item_type| match item_type {
                ItemType::A => self.type_a,
                ItemType::B => self.type_b,
                ItemType::C => self.type_c,
            })
            .collect()
    }
}

/// Tuning shared by every container.
#[derive(Deserialize, Clone, Debug)]
#[serde(default)]
pub struct ContainerConfig {
    /// Seconds until an untouched container expires
    pub self_destruct_secs: f32,
    /// Delay between full consumption and the agent it releases
    pub agent_spawn_delay_secs: f32,
    /// Radius of the proximity trigger around the container
    pub interaction_radius: f32,
    /// How long missing-type cues stay up after the container becomes closest
    pub indicator_display_secs: f32,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            self_destruct_secs: 30.0,
            agent_spawn_delay_secs: 5.0,
            interaction_radius: 2.0,
            indicator_display_secs: 3.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerPhase {
    Active,
    FullyConsumed,
    Expired,
}

/// The two irreversible ways a container can end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalKind {
    FullyConsumed,
    Expired,
}

/// Proximity rank assigned by the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProximityState {
    #[default]
    Far,
    Near,
    Closest,
}

/// Commands the player can direct at a container.
///
/// There is deliberately no destroy command: containers only end through
/// full consumption or timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractCommand {
    UseHeldItem,
    Idle,
}

/// What a terminal transition leaves behind.
#[derive(Debug, Clone, PartialEq)]
pub struct Termination {
    pub container: ContainerId,
    pub kind: TerminalKind,
    pub position: Vec3,
    /// One item of each consumed type, in consumption order
    pub spawned: Vec<ItemType>,
    /// Delay before an agent is released, only on full consumption
    pub agent_spawn_delay: Option<f32>,
}

/// A successful consumption.
#[derive(Debug, Clone, PartialEq)]
pub struct Consumed {
    pub item_type: ItemType,
    /// Set when this consumption completed the container.
    pub termination: Option<Termination>,
}

/// Benign rejections of a consume request. The held item stays held.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum ConsumeError {
    #[error("item type {0:?} was already consumed")]
    AlreadyConsumed(ItemType),

    #[error("container is no longer active")]
    Inactive,
}

#[derive(Debug, Clone)]
pub struct Container {
    pub id: ContainerId,
    pub position: Vec3,
    pub interaction_radius: f32,
    required: Vec<ItemType>,
    consumed: Vec<ItemType>,
    phase: ContainerPhase,
    proximity: ProximityState,
    self_destruct: Delayed<()>,
    indicator_reveal: Delayed<()>,
    indicator_display_secs: f32,
    agent_spawn_delay_secs: f32,
    destroyed: bool,
}

impl Container {
    pub fn new(id: ContainerId, position: Vec3, seed: ContainerSeed, config: &ContainerConfig) -> Self {
        Self {
            id,
            position,
            interaction_radius: config.interaction_radius,
            required: ItemType::ALL.to_vec(),
            consumed: seed.types(),
            phase: ContainerPhase::Active,
            proximity: ProximityState::Far,
            self_destruct: Delayed::new(config.self_destruct_secs, ()),
            indicator_reveal: Delayed::idle(),
            indicator_display_secs: config.indicator_display_secs,
            agent_spawn_delay_secs: config.agent_spawn_delay_secs,
            destroyed: false,
        }
    }

    /// Accept an item of `item_type` if that type is still missing.
    pub fn consume(
        &mut self,
        item_type: ItemType,
        events: &mut Vec<GameEvent>,
    ) -> Result<Consumed, ConsumeError> {
        if self.destroyed {
            return Err(ConsumeError::Inactive);
        }
        if self.consumed.contains(&item_type) {
            debug!("Container {:?} already holds {:?}", self.id, item_type);
            return Err(ConsumeError::AlreadyConsumed(item_type));
        }

        self.consumed.push(item_type);
        info!("Container {:?} consumed {:?}", self.id, item_type);

        if self.indicator_reveal.is_pending() {
            events.push(GameEvent::IndicatorVisibility {
                container: self.id,
                indicator: Indicator::Missing(item_type),
                visible: false,
            });
        }

        let termination = if self.is_complete() {
            self.fire_terminal(TerminalKind::FullyConsumed)
        } else {
            None
        };

        Ok(Consumed {
            item_type,
            termination,
        })
    }

    /// Advance the container's suspended work by `dt`.
    pub fn tick(&mut self, dt: f32, events: &mut Vec<GameEvent>) -> Option<Termination> {
        if self.destroyed {
            return None;
        }

        if self.indicator_reveal.tick(dt).is_some() {
            self.push_missing_cues(false, events);
        }

        let expired = self.self_destruct.tick(dt).is_some();
        events.push(GameEvent::ContainerTinted {
            container: self.id,
            fraction: self.self_destruct.fraction_remaining(),
        });

        if expired {
            self.fire_terminal(TerminalKind::Expired)
        } else {
            None
        }
    }

    /// Run the terminal transition once. Later triggers are ignored.
    pub fn fire_terminal(&mut self, kind: TerminalKind) -> Option<Termination> {
        if self.destroyed {
            return None;
        }
        self.destroyed = true;
        self.cancel_pending_work();
        self.phase = match kind {
            TerminalKind::FullyConsumed => ContainerPhase::FullyConsumed,
            TerminalKind::Expired => ContainerPhase::Expired,
        };

        info!(
            "Container {:?} terminated ({:?}), releasing {} item(s)",
            self.id,
            kind,
            self.consumed.len()
        );

        Some(Termination {
            container: self.id,
            kind,
            position: self.position,
            spawned: self.consumed.clone(),
            agent_spawn_delay: match kind {
                TerminalKind::FullyConsumed => Some(self.agent_spawn_delay_secs),
                TerminalKind::Expired => None,
            },
        })
    }

    /// Move to a new proximity rank, showing or hiding the indicator on
    /// transitions into or out of `Closest`.
    pub fn set_proximity(&mut self, state: ProximityState, events: &mut Vec<GameEvent>) {
        if self.destroyed || self.proximity == state {
            return;
        }
        let previous = std::mem::replace(&mut self.proximity, state);

        if state == ProximityState::Closest {
            events.push(GameEvent::IndicatorVisibility {
                container: self.id,
                indicator: Indicator::Highlight,
                visible: true,
            });
            self.push_missing_cues(true, events);
            self.indicator_reveal.restart(self.indicator_display_secs, ());
        } else if previous == ProximityState::Closest {
            events.push(GameEvent::IndicatorVisibility {
                container: self.id,
                indicator: Indicator::Highlight,
                visible: false,
            });
            if self.indicator_reveal.cancel() {
                self.push_missing_cues(false, events);
            }
        }
    }

    /// Dispatch a player command. Only `UseHeldItem` with an item in hand does anything.
    pub fn interact(
        &mut self,
        command: InteractCommand,
        held: Option<ItemType>,
        events: &mut Vec<GameEvent>,
    ) -> Option<Result<Consumed, ConsumeError>> {
        match (command, held) {
            (InteractCommand::UseHeldItem, Some(item_type)) => Some(self.consume(item_type, events)),
            _ => None,
        }
    }

    /// Cancel every suspended operation this container owns.
    fn cancel_pending_work(&mut self) {
        self.self_destruct.cancel();
        self.indicator_reveal.cancel();
    }

    fn push_missing_cues(&self, visible: bool, events: &mut Vec<GameEvent>) {
        for item_type in self.missing_types() {
            events.push(GameEvent::IndicatorVisibility {
                container: self.id,
                indicator: Indicator::Missing(item_type),
                visible,
            });
        }
    }

    pub fn is_complete(&self) -> bool {
        self.required.iter().all(|item_type| self.consumed.contains(item_type))
    }

    pub fn missing_types(&self) -> Vec<ItemType> {
        self.required
            .iter()
            .copied()
            .filter(|item_type| !self.consumed.contains(item_type))
            .collect()
    }

    pub fn consumed_types(&self) -> &[ItemType] {
        &self.consumed
    }

    pub fn required_types(&self) -> &[ItemType] {
        &self.required
    }

    pub fn phase(&self) -> ContainerPhase {
        self.phase
    }

    pub fn proximity(&self) -> ProximityState {
        self.proximity
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn is_active(&self) -> bool {
        !self.destroyed
    }

    pub fn self_destruct_remaining(&self) -> f32 {
        self.self_destruct.remaining()
    }

    pub fn has_pending_work(&self) -> bool {
        self.self_destruct.is_pending() || self.indicator_reveal.is_pending()
    }

    /// Whether `point` is inside the proximity trigger.
    pub fn contains_point(&self, point: Vec3) -> bool {
        self.position.distance(point) <= self.interaction_radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn container(seed: ContainerSeed) -> Container {
        Container::new(ContainerId(1), Vec3::ZERO, seed, &ContainerConfig::default())
    }

    fn empty() -> Container {
        container(ContainerSeed::default())
    }

    #[test]
    fn seed_prepopulates_consumed_types() {
        let container = container(ContainerSeed {
            type_a: true,
            type_b: false,
            type_c: true,
        });
        assert_eq!(container.consumed_types(), &[ItemType::A, ItemType::C]);
        assert_eq!(container.missing_types(), vec![ItemType::B]);
    }

    #[test]
    fn consuming_a_duplicate_type_changes_nothing() {
        let mut container = empty();
        let mut events = Vec::new();

        assert!(container.consume(ItemType::A, &mut events).is_ok());
        let before = container.consumed_types().to_vec();

        for _ in 0..3 {
            assert_eq!(
                container.consume(ItemType::A, &mut events),
                Err(ConsumeError::AlreadyConsumed(ItemType::A))
            );
        }
        assert_eq!(container.consumed_types(), before.as_slice());
    }

    #[test]
    fn consuming_every_type_fires_fully_consumed() {
        let mut container = empty();
        let mut events = Vec::new();

        let first = container.consume(ItemType::B, &mut events).unwrap();
        assert_eq!(first.termination, None);
        container.consume(ItemType::A, &mut events).unwrap();
        let last = container.consume(ItemType::C, &mut events).unwrap();

        let termination = last.termination.expect("completion terminates the container");
        assert_eq!(termination.kind, TerminalKind::FullyConsumed);
        assert_eq!(termination.spawned, vec![ItemType::B, ItemType::A, ItemType::C]);
        assert_eq!(termination.agent_spawn_delay, Some(5.0));
        assert_eq!(container.phase(), ContainerPhase::FullyConsumed);
        assert!(!container.has_pending_work());
    }

    #[test]
    fn expiry_fires_once_with_no_agent_delay() {
        let mut container = empty();
        let mut events = Vec::new();

        for _ in 0..29 {
            assert_eq!(container.tick(1.0, &mut events), None);
        }
        let termination = container.tick(1.0, &mut events).expect("expires at 30s");
        assert_eq!(termination.kind, TerminalKind::Expired);
        assert!(termination.spawned.is_empty());
        assert_eq!(termination.agent_spawn_delay, None);

        assert_eq!(container.tick(1.0, &mut events), None);
        assert_eq!(container.phase(), ContainerPhase::Expired);
    }

    #[test]
    fn terminal_transition_is_idempotent() {
        let mut container = empty();
        assert!(container.fire_terminal(TerminalKind::Expired).is_some());
        assert_eq!(container.fire_terminal(TerminalKind::FullyConsumed), None);
        assert_eq!(container.phase(), ContainerPhase::Expired);
    }

    #[test]
    fn destroyed_container_ignores_everything() {
        let mut container = empty();
        let mut events = Vec::new();
        container.consume(ItemType::A, &mut events).unwrap();
        container.fire_terminal(TerminalKind::Expired);
        events.clear();

        assert_eq!(container.consume(ItemType::B, &mut events), Err(ConsumeError::Inactive));
        assert_eq!(container.tick(100.0, &mut events), None);
        container.set_proximity(ProximityState::Closest, &mut events);

        assert!(events.is_empty());
        assert_eq!(container.consumed_types(), &[ItemType::A]);
        assert_eq!(container.proximity(), ProximityState::Far);
    }

    #[test]
    fn becoming_closest_shows_highlight_and_missing_cues() {
        let mut container = container(ContainerSeed {
            type_a: true,
            ..default()
        });
        let mut events = Vec::new();

        container.set_proximity(ProximityState::Near, &mut events);
        assert!(events.is_empty());

        container.set_proximity(ProximityState::Closest, &mut events);
        assert_eq!(
            events,
            vec![
                GameEvent::IndicatorVisibility {
                    container: ContainerId(1),
                    indicator: Indicator::Highlight,
                    visible: true,
                },
                GameEvent::IndicatorVisibility {
                    container: ContainerId(1),
                    indicator: Indicator::Missing(ItemType::B),
                    visible: true,
                },
                GameEvent::IndicatorVisibility {
                    container: ContainerId(1),
                    indicator: Indicator::Missing(ItemType::C),
                    visible: true,
                },
            ]
        );
    }

    #[test]
    fn leaving_closest_hides_highlight() {
        let mut container = empty();
        let mut events = Vec::new();
        container.set_proximity(ProximityState::Closest, &mut events);
        events.clear();

        container.set_proximity(ProximityState::Near, &mut events);
        assert_eq!(
            events[0],
            GameEvent::IndicatorVisibility {
                container: ContainerId(1),
                indicator: Indicator::Highlight,
                visible: false,
            }
        );
        assert_eq!(events.len(), 4);
    }

    #[test]
    fn missing_cues_hide_after_display_duration() {
        let mut container = empty();
        let mut events = Vec::new();
        container.set_proximity(ProximityState::Closest, &mut events);
        events.clear();

        container.tick(2.0, &mut events);
        assert!(!events
            .iter()
            .any(|event| matches!(event, GameEvent::IndicatorVisibility { visible: false, .. })));

        container.tick(1.0, &mut events);
        let hidden = events
            .iter()
            .filter(|event| matches!(event, GameEvent::IndicatorVisibility { visible: false, .. }))
            .count();
        assert_eq!(hidden, 3);
    }

    #[test]
    fn interact_only_consumes_on_use_with_item() {
        let mut container = empty();
        let mut events = Vec::new();

        assert!(container.interact(InteractCommand::Idle, Some(ItemType::A), &mut events).is_none());
        assert!(container.interact(InteractCommand::UseHeldItem, None, &mut events).is_none());
        assert!(container.consumed_types().is_empty());

        let result = container.interact(InteractCommand::UseHeldItem, Some(ItemType::A), &mut events);
        assert!(matches!(result, Some(Ok(_))));
    }

    #[test]
    fn self_destruct_tints_towards_zero() {
        let mut container = empty();
        let mut events = Vec::new();
        container.tick(15.0, &mut events);
        assert!(events.contains(&GameEvent::ContainerTinted {
            container: ContainerId(1),
            fraction: 0.5,
        }));
    }
}
