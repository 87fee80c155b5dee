//! The simulation driver: owns every gameplay entity and ticks them in a fixed order.
//!
//! Each call to [`Simulation::tick`] runs four stages, always in this order:
//!
//! 1. **Items** decay and spoiled ones are removed.
//! 2. **Containers** run their self-destruct and indicator timers; the
//!    spawner drops new containers.
//! 3. **Agents** spawn when their delay is up, then patrol, chase and stun.
//! 4. **Player** recovers from stun, moves or dashes, arbitrates the closest
//!    container and acts on it.
//!
//! Effects that cross stages (a stun landing before the player acts, a
//! consumption completing a container) depend on this order.

use std::collections::BTreeMap;

use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::data::GameplayConfig;
use super::error::SetupError;
use super::score::ScoreKeeper;
use crate::containers::{
    Container, ContainerId, ContainerSeed, InteractCommand, TerminalKind, Termination,
};
use crate::core::{Delayed, GameEvent, RemovalReason};
use crate::enemies::{AgentId, AgentSenses, AiAgent, Navigator};
use crate::items::{ContainerSpawner, Item, ItemId, ItemTick, ItemType, SupplyBox};
use crate::player::{Dash, DashStep, ObstacleProbe, Player, PlayerInput};

/// Assembles a [`Simulation`] from config and its required collaborators.
pub struct SimulationBuilder {
    config: GameplayConfig,
    score_keeper: Option<Box<dyn ScoreKeeper>>,
    navigator: Option<Box<dyn Navigator>>,
}

impl SimulationBuilder {
    pub fn new(config: GameplayConfig) -> Self {
        Self {
            config,
            score_keeper: None,
            navigator: None,
        }
    }

    pub fn score_keeper(mut self, score_keeper: impl ScoreKeeper + 'static) -> Self {
        self.score_keeper = Some(Box::new(score_keeper));
        self
    }

    pub fn navigator(mut self, navigator: impl Navigator + 'static) -> Self {
        self.navigator = Some(Box::new(navigator));
        self
    }

    /// Validate the config, bind collaborators and place the level's entities.
    ///
    /// Fails instead of activating when a collaborator is missing.
    pub fn build(self) -> Result<Simulation, SetupError> {
        self.config.validate()?;
        let score_keeper = self
            .score_keeper
            .ok_or(SetupError::MissingCollaborator("score keeper"))?;
        let navigator = self
            .navigator
            .ok_or(SetupError::MissingCollaborator("navigator"))?;

        let rng = match self.config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let level = self.config.level.clone();

        let mut simulation = Simulation {
            clock: 0.0,
            rng,
            items: BTreeMap::new(),
            containers: BTreeMap::new(),
            agents: BTreeMap::new(),
            supply_boxes: level.supply_boxes.iter().map(SupplyBox::from).collect(),
            player: Player::new(Vec3::from(level.player_start)),
            spawner: ContainerSpawner::new(self.config.spawner.clone()),
            pending_agents: Vec::new(),
            score_keeper,
            navigator,
            next_id: 0,
            won: false,
            outbox: Vec::new(),
            config: self.config,
        };

        for placement in &level.containers {
            simulation.spawn_container(Vec3::from(placement.position), placement.seed);
        }
        for position in &level.agents {
            simulation.spawn_agent(Vec3::from(*position));
        }

        info!(
            "Simulation ready: {} container(s), {} agent(s), {} supply box(es)",
            simulation.containers.len(),
            simulation.agents.len(),
            simulation.supply_boxes.len()
        );
        Ok(simulation)
    }
}

pub struct Simulation {
    config: GameplayConfig,
    clock: f32,
    rng: StdRng,
    items: BTreeMap<ItemId, Item>,
    containers: BTreeMap<ContainerId, Container>,
    agents: BTreeMap<AgentId, AiAgent>,
    supply_boxes: Vec<SupplyBox>,
    player: Player,
    spawner: ContainerSpawner,
    pending_agents: Vec<Delayed<Vec3>>,
    score_keeper: Box<dyn ScoreKeeper>,
    navigator: Box<dyn Navigator>,
    next_id: u32,
    won: bool,
    outbox: Vec<GameEvent>,
}

impl Simulation {
    /// Advance the whole game by `dt` seconds and return what happened.
    pub fn tick(&mut self, dt: f32, input: &PlayerInput, probe: &dyn ObstacleProbe) -> Vec<GameEvent> {
        let dt = dt.max(0.0);
        self.clock += dt;
        if let Some(position) = input.position {
            self.player.position = position;
        }

        self.tick_items(dt);
        self.tick_containers(dt);
        self.tick_agents(dt);
        self.tick_player(dt, input, probe);

        self.take_events()
    }

    /// Drain events queued outside a tick (level setup, direct spawns).
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.outbox)
    }

    fn tick_items(&mut self, dt: f32) {
        let mut spoiled = Vec::new();
        for item in self.items.values_mut() {
            match item.tick(dt) {
                ItemTick::Decaying(fraction) => self.outbox.push(GameEvent::ItemTinted {
                    item: item.id,
                    fraction,
                }),
                ItemTick::Spoiled => spoiled.push(item.id),
                ItemTick::Gone => {}
            }
        }

        for id in spoiled {
            self.items.remove(&id);
            if self.player.held_item() == Some(id) {
                self.player.release_held();
            }
            debug!("Item {:?} spoiled", id);
            self.outbox.push(GameEvent::ItemRemoved {
                item: id,
                reason: RemovalReason::Spoiled,
            });
        }
    }

    fn tick_containers(&mut self, dt: f32) {
        for request in self.spawner.tick(dt, &mut self.rng) {
            self.spawn_container(request.position, request.seed);
        }

        let mut terminations = Vec::new();
        for container in self.containers.values_mut() {
            if let Some(termination) = container.tick(dt, &mut self.outbox) {
                terminations.push(termination);
            }
        }
        for termination in terminations {
            self.resolve_termination(termination);
        }
    }

    fn tick_agents(&mut self, dt: f32) {
        let due: Vec<Vec3> = self
            .pending_agents
            .iter_mut()
            .filter_map(|task| task.tick(dt))
            .collect();
        self.pending_agents.retain(Delayed::is_pending);
        for position in due {
            self.spawn_agent(position);
        }

        self.navigator.advance(dt);

        let player_position = self.player.position;
        let mut touched = false;
        for agent in self.agents.values_mut() {
            let Some(position) = self.navigator.position_of(agent.id) else {
                continue;
            };
            let arrived = self
                .navigator
                .remaining_distance(agent.id)
                .is_some_and(|distance| distance < agent.arrival_threshold);

            let senses = AgentSenses {
                position,
                player: player_position,
                arrived,
            };
            if let Some(destination) = agent.think(senses) {
                self.navigator.navigate_to(agent.id, destination);
            }
            self.outbox.push(GameEvent::AgentMoved {
                agent: agent.id,
                position,
                mode: agent.mode(),
            });

            if agent.check_contact(position, player_position) {
                touched = true;
            }
        }

        if touched && !self.player.is_stunned() {
            self.stun_player(self.config.agent.stun_duration_secs);
        }
    }

    fn tick_player(&mut self, dt: f32, input: &PlayerInput, probe: &dyn ObstacleProbe) {
        if self.player.update_stun(self.clock) {
            info!("Player recovered from stun");
            self.outbox.push(GameEvent::PlayerRecovered);
        }

        self.player.motion = Vec3::ZERO;
        let stunned = self.player.is_stunned();
        if !stunned {
            self.move_player(dt, input, probe);
        }

        self.player.refresh_nearby(&mut self.containers, &mut self.outbox);
        self.player.select_closest(&mut self.containers, &mut self.outbox);

        if input.drop_pressed {
            self.drop_held();
        } else if input.use_pressed && !stunned {
            self.handle_use();
        }

        if let Some(id) = self.player.held_item() {
            let carry_point = self.player.carry_point(self.config.player.carry_offset);
            if let Some(item) = self.items.get_mut(&id) {
                item.position = carry_point;
            }
        }
    }

    fn move_player(&mut self, dt: f32, input: &PlayerInput, probe: &dyn ObstacleProbe) {
        let config = self.config.player.clone();
        let direction = Vec3::new(input.movement.x, 0.0, input.movement.z).normalize_or_zero();
        if direction != Vec3::ZERO {
            self.player.facing = direction;
        }

        if input.dash && direction != Vec3::ZERO && !self.player.is_dashing() {
            let dash = Dash::plan(
                self.player.position,
                direction,
                config.dash_distance,
                config.dash_skin,
                config.move_speed * config.dash_speed_multiplier,
                config.dash_max_secs,
                probe,
            );
            self.outbox.push(GameEvent::DashStarted { target: dash.target });
            self.player.dash = Some(dash);
        }

        let position = self.player.position;
        let motion = match self.player.dash.as_mut() {
            Some(dash) => match dash.step(position, dt) {
                DashStep::Moving(translation) => translation,
                DashStep::Finished(translation) => {
                    self.player.dash = None;
                    self.outbox.push(GameEvent::DashFinished);
                    translation
                }
            },
            None => direction * config.move_speed * dt,
        };

        self.player.motion = motion;
        self.player.position += motion;
    }

    /// Use: consume into the closest container, drop when none is near,
    /// pick up when empty-handed, or fall back to a supply box.
    fn handle_use(&mut self) {
        if let Some(item_id) = self.player.held_item() {
            match self.player.closest_container() {
                Some(container_id) => self.use_on_container(container_id, item_id),
                None => self.drop_held(),
            }
            return;
        }

        if let Some(item) = self.player.try_pick_up(&mut self.items, self.config.player.pickup_radius) {
            self.outbox.push(GameEvent::ItemPickedUp { item });
            return;
        }

        let position = self.player.position;
        if let Some(supply) = self.supply_boxes.iter().find(|supply| supply.in_reach(position)).cloned() {
            debug!("Supply box dispensed a {:?} item", supply.item_type);
            self.spawn_item(supply.item_type, supply.spawn_point);
        }
    }

    fn use_on_container(&mut self, container_id: ContainerId, item_id: ItemId) {
        let Some(item_type) = self.items.get(&item_id).map(|item| item.item_type) else {
            self.player.release_held();
            return;
        };
        let Some(container) = self.containers.get_mut(&container_id) else {
            return;
        };

        match container.interact(InteractCommand::UseHeldItem, Some(item_type), &mut self.outbox) {
            Some(Ok(consumed)) => {
                self.player.release_held();
                if let Some(mut item) = self.items.remove(&item_id) {
                    item.remove();
                }
                self.outbox.push(GameEvent::ItemConsumed {
                    container: container_id,
                    item: item_id,
                    item_type,
                });
                self.outbox.push(GameEvent::ItemRemoved {
                    item: item_id,
                    reason: RemovalReason::Consumed,
                });
                if let Some(termination) = consumed.termination {
                    self.resolve_termination(termination);
                }
            }
            Some(Err(error)) => {
                debug!("Container {:?} rejected item: {}", container_id, error);
                self.outbox.push(GameEvent::ConsumptionRejected {
                    container: container_id,
                    item_type,
                });
            }
            None => {}
        }
    }

    fn drop_held(&mut self) {
        if let Some(item) = self.player.drop_held(&mut self.items) {
            self.outbox.push(GameEvent::ItemDropped {
                item,
                position: self.player.position,
            });
        }
    }

    /// Apply the side effects of a container ending, then drop it.
    fn resolve_termination(&mut self, termination: Termination) {
        self.outbox.push(GameEvent::ContainerTerminated {
            container: termination.container,
            kind: termination.kind,
        });
        self.containers.remove(&termination.container);
        self.player.forget_container(termination.container);

        for item_type in &termination.spawned {
            self.spawn_item(*item_type, termination.position);
        }

        if termination.kind == TerminalKind::FullyConsumed {
            self.score_keeper.add_score();
            let total = self.score_keeper.score();
            info!("Score is now {}", total);
            self.outbox.push(GameEvent::ScoreAwarded { total });
            if !self.won && self.score_keeper.check_win() {
                self.won = true;
                info!("Win threshold reached");
                self.outbox.push(GameEvent::Victory);
            }
        }

        if let Some(delay) = termination.agent_spawn_delay {
            self.pending_agents.push(Delayed::new(delay, termination.position));
        }
    }

    /// Stun the player with the configured cooldown. Returns whether it landed.
    ///
    /// A dash in flight is cut off and reported as finished.
    pub fn stun_player(&mut self, duration: f32) -> bool {
        let was_dashing = self.player.is_dashing();
        let accepted = self
            .player
            .stun(self.clock, duration, self.config.player.stun_cooldown_secs);
        if accepted {
            if was_dashing {
                self.outbox.push(GameEvent::DashFinished);
            }
            self.outbox.push(GameEvent::PlayerStunned {
                until: self.player.stun_end_time(),
            });
        }
        accepted
    }

    fn allocate_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn spawn_item(&mut self, item_type: ItemType, position: Vec3) -> ItemId {
        let id = ItemId(self.allocate_id());
        let item = self.config.items.instantiate(id, item_type, position);
        self.items.insert(id, item);
        self.outbox.push(GameEvent::ItemSpawned {
            item: id,
            item_type,
            position,
        });
        id
    }

    pub fn spawn_container(&mut self, position: Vec3, seed: ContainerSeed) -> ContainerId {
        let id = ContainerId(self.allocate_id());
        let container = Container::new(id, position, seed, &self.config.container);
        self.outbox.push(GameEvent::ContainerSpawned {
            container: id,
            position,
            consumed: container.consumed_types().to_vec(),
        });
        self.containers.insert(id, container);
        id
    }

    pub fn spawn_agent(&mut self, position: Vec3) -> AgentId {
        let id = AgentId(self.allocate_id());
        let mut agent = AiAgent::spawn(id, position, &self.config.agent, &mut self.rng);
        self.navigator.register(id, position);
        if let Some(destination) = agent.begin_patrol() {
            self.navigator.navigate_to(id, destination);
        }
        self.agents.insert(id, agent);
        info!("Agent {:?} spawned at {:?}", id, position);
        self.outbox.push(GameEvent::AgentSpawned { agent: id, position });
        id
    }

    /// Seconds since the simulation started.
    pub fn now(&self) -> f32 {
        self.clock
    }

    pub fn config(&self) -> &GameplayConfig {
        &self.config
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn item(&self, id: ItemId) -> Option<&Item> {
        self.items.get(&id)
    }

    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.items.values()
    }

    pub fn container(&self, id: ContainerId) -> Option<&Container> {
        self.containers.get(&id)
    }

    pub fn containers(&self) -> impl Iterator<Item = &Container> {
        self.containers.values()
    }

    pub fn agent(&self, id: AgentId) -> Option<&AiAgent> {
        self.agents.get(&id)
    }

    pub fn agents(&self) -> impl Iterator<Item = &AiAgent> {
        self.agents.values()
    }

    pub fn agent_position(&self, id: AgentId) -> Option<Vec3> {
        self.navigator.position_of(id)
    }

    pub fn supply_boxes(&self) -> &[SupplyBox] {
        &self.supply_boxes
    }

    /// Agent spawns still waiting on their delay.
    pub fn pending_agent_spawns(&self) -> usize {
        self.pending_agents.len()
    }

    pub fn score(&self) -> u32 {
        self.score_keeper.score()
    }

    pub fn has_won(&self) -> bool {
        self.won
    }
}
