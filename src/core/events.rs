//! Gameplay events emitted by the simulation.
//!
//! The simulation never touches rendering or UI directly. Each tick it hands
//! back a list of these events and the presentation layer reacts to them:
//! spawning meshes, tinting materials, toggling indicators.

use bevy::prelude::*;

use crate::containers::{ContainerId, TerminalKind};
use crate::enemies::{AgentId, AiMode};
use crate::items::{ItemId, ItemType};

/// Visual cue a container can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Indicator {
    /// Marks the container the player would interact with.
    Highlight,
    /// Shows that an item type is still wanted.
    Missing(ItemType),
}

/// Why an item left the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalReason {
    Spoiled,
    Consumed,
}

#[derive(Event, Debug, Clone, PartialEq)]
pub enum GameEvent {
    ItemSpawned {
        item: ItemId,
        item_type: ItemType,
        position: Vec3,
    },
    /// Remaining life fraction, for colour feedback.
    ItemTinted { item: ItemId, fraction: f32 },
    ItemRemoved { item: ItemId, reason: RemovalReason },
    ItemPickedUp { item: ItemId },
    ItemDropped { item: ItemId, position: Vec3 },

    ContainerSpawned {
        container: ContainerId,
        position: Vec3,
        consumed: Vec<ItemType>,
    },
    /// Remaining self-destruct fraction, for colour feedback.
    ContainerTinted { container: ContainerId, fraction: f32 },
    IndicatorVisibility {
        container: ContainerId,
        indicator: Indicator,
        visible: bool,
    },
    ItemConsumed {
        container: ContainerId,
        item: ItemId,
        item_type: ItemType,
    },
    ConsumptionRejected {
        container: ContainerId,
        item_type: ItemType,
    },
    ContainerTerminated {
        container: ContainerId,
        kind: TerminalKind,
    },

    AgentSpawned { agent: AgentId, position: Vec3 },
    AgentMoved {
        agent: AgentId,
        position: Vec3,
        mode: AiMode,
    },

    PlayerStunned { until: f32 },
    PlayerRecovered,
    DashStarted { target: Vec3 },
    DashFinished,

    ScoreAwarded { total: u32 },
    Victory,
}
