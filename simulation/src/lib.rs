#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Frame orchestration that wires input, systems and the world together.
//!
//! A [`Simulation`] owns the world and every system. Each call to
//! [`Simulation::step`] drains one frame of input, routes it through the
//! interaction and movement systems, applies the resulting commands and hands
//! back a renderable [`Scene`].

use std::{mem, sync::Arc};

use log::{debug, error, info};
use overworld_core::{Command, ConfigError, Event, InputEvent, NpcId, SimulationConfig, TileMap};
use overworld_rendering::{NpcPresentation, PlayerPresentation, Scene};
use overworld_system_interaction::Interaction;
use overworld_system_movement::Movement;
use overworld_world::{self as world, query, NpcSeed, World, WorldError};
use thiserror::Error;

/// Result of advancing the simulation by one frame.
#[derive(Clone, Debug, PartialEq)]
pub enum StepOutcome {
    /// The frame was simulated; the scene describes the new state.
    Continue(Scene),
    /// A quit request was observed; the world was left untouched.
    Quit,
}

/// Errors raised while building or stepping the simulation.
#[derive(Debug, Error)]
pub enum SimulationError {
    /// The configuration failed validation.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The world rejected its construction or a command.
    #[error(transparent)]
    World(#[from] WorldError),
    /// A dialog was requested for a character that does not exist.
    #[error("no character with id {}", .0.get())]
    UnknownNpc(NpcId),
}

/// Owns the world and drives it one frame at a time.
#[derive(Debug)]
pub struct Simulation {
    world: World,
    movement: Movement,
    interaction: Interaction,
    commands: Vec<Command>,
    unseen_events: Vec<Event>,
    last_events: Vec<Event>,
}

impl Simulation {
    /// Builds a simulation over the provided map and characters.
    pub fn new(
        config: SimulationConfig,
        map: Arc<TileMap>,
        npcs: Vec<NpcSeed>,
    ) -> Result<Self, SimulationError> {
        config.validate()?;
        let world = World::new(config, map, npcs)?;
        Ok(Self::from_world(world))
    }

    /// Builds the town simulation with its default characters.
    pub fn with_defaults(config: SimulationConfig) -> Result<Self, SimulationError> {
        config.validate()?;
        let world = World::with_defaults(config)?;
        Ok(Self::from_world(world))
    }

    fn from_world(world: World) -> Self {
        let player = query::player(&world);
        info!(
            "simulation ready: {}x{} map, {} characters, player at cell ({}, {})",
            query::map(&world).columns(),
            query::map(&world).rows(),
            query::npcs(&world).len(),
            player.cell.column(),
            player.cell.row(),
        );

        Self {
            world,
            movement: Movement::new(),
            interaction: Interaction::new(),
            commands: Vec::new(),
            unseen_events: Vec::new(),
            last_events: Vec::new(),
        }
    }

    /// Advances the simulation by one frame using the drained input.
    ///
    /// A quit request short-circuits the frame. Any error leaves the world in
    /// the state reached before the failing command.
    pub fn step<I>(&mut self, input: I) -> Result<StepOutcome, SimulationError>
    where
        I: IntoIterator<Item = InputEvent>,
    {
        let input: Vec<InputEvent> = input.into_iter().collect();
        if input.contains(&InputEvent::Quit) {
            info!(
                "quit requested after {} frames",
                query::tick_index(&self.world)
            );
            return Ok(StepOutcome::Quit);
        }

        let mut events = Vec::new();
        let dt = query::config(&self.world).step_duration();
        self.apply(Command::Tick { dt }, &mut events)?;

        self.interaction
            .handle(&self.unseen_events, &input, &mut self.commands);
        self.unseen_events.clear();
        self.apply_pending(&mut events)?;

        self.movement.handle(&input, &mut self.commands);
        self.apply_pending(&mut events)?;

        for event in &events {
            debug!("frame {}: {event:?}", query::tick_index(&self.world));
        }
        self.unseen_events.extend_from_slice(&events);
        self.last_events = events;

        Ok(StepOutcome::Continue(self.scene()))
    }

    /// Opens the dialog banner with the provided text.
    ///
    /// Returns whether a dialog was opened; empty text is ignored.
    pub fn show_dialog(&mut self, text: impl Into<String>) -> Result<bool, SimulationError> {
        let mut events = Vec::new();
        self.apply(Command::ShowDialog { text: text.into() }, &mut events)?;
        let opened = !events.is_empty();
        self.unseen_events.extend(events);
        Ok(opened)
    }

    /// Opens the dialog attached to the provided character.
    pub fn talk_to(&mut self, npc: NpcId) -> Result<bool, SimulationError> {
        let text = query::npc_dialog(&self.world, npc)
            .ok_or(SimulationError::UnknownNpc(npc))?
            .to_owned();
        self.show_dialog(text)
    }

    /// Events emitted by the most recent call to [`Simulation::step`].
    #[must_use]
    pub fn last_events(&self) -> &[Event] {
        &self.last_events
    }

    /// Read-only access to the simulated world.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Captures the current state as a renderable scene.
    #[must_use]
    pub fn scene(&self) -> Scene {
        let world = &self.world;
        let player = query::player(world);
        let npcs = query::npcs(world)
            .into_iter()
            .map(|npc| NpcPresentation::new(npc.id, npc.cell))
            .collect();

        Scene::new(
            query::tick_index(world),
            Arc::clone(query::map(world)),
            query::config(world).tile_size,
            PlayerPresentation::new(player.position, player.facing, player.animation_frame),
            npcs,
            query::welcome_banner(world),
            query::dialog_banner(world).text().map(str::to_owned),
        )
    }

    fn apply_pending(&mut self, events: &mut Vec<Event>) -> Result<(), SimulationError> {
        for command in mem::take(&mut self.commands) {
            self.apply(command, events)?;
        }
        Ok(())
    }

    fn apply(&mut self, command: Command, events: &mut Vec<Event>) -> Result<(), SimulationError> {
        world::apply(&mut self.world, command, events).map_err(|err| {
            error!("world rejected a command: {err}");
            SimulationError::from(err)
        })
    }
}
