#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Overworld.

mod collision;
mod entities;
mod interaction;

use std::sync::Arc;

use overworld_core::{
    CellCoord, Command, Event, MapError, NpcId, SimulationConfig, TileMap, TileQueryError,
};
use thiserror::Error;

pub use collision::{resolve_move, MoveResolution};

use self::{
    entities::{Npc, Player},
    interaction::Interaction,
};

/// Town map loaded when no other map is supplied.
pub const DEFAULT_MAP: [&str; 7] = [
    "BBBBBBBBBBBBBBBB",
    "B..............B",
    "B..P.......P...B",
    "B..............B",
    "B.......B......B",
    "B..............B",
    "BBBBBBBBBBBBBBBB",
];

/// Placement and dialog of a character created at startup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NpcSeed {
    /// Cell the character stands on.
    pub cell: CellCoord,
    /// Text shown when the character is talked to.
    pub dialog: String,
}

impl NpcSeed {
    /// Creates a new seed.
    #[must_use]
    pub fn new(cell: CellCoord, dialog: impl Into<String>) -> Self {
        Self {
            cell,
            dialog: dialog.into(),
        }
    }
}

/// Characters placed on [`DEFAULT_MAP`].
#[must_use]
pub fn default_npcs() -> Vec<NpcSeed> {
    vec![
        NpcSeed::new(CellCoord::new(5, 3), "Welcome to the world of POKEMON!"),
        NpcSeed::new(CellCoord::new(10, 3), "This is PALLET TOWN."),
    ]
}

/// Errors raised while building or mutating the world.
#[derive(Debug, Error)]
pub enum WorldError {
    /// The map definition is malformed.
    #[error("invalid map: {0}")]
    Map(#[from] MapError),
    /// The map has no spawn marker to place the player on.
    #[error("map has no spawn point for the player")]
    MissingSpawn,
    /// A character was placed on a wall.
    #[error("character {} stands on impassable cell ({}, {})", npc.get(), cell.column(), cell.row())]
    ImpassableNpc {
        /// Identifier the character would have received.
        npc: NpcId,
        /// Offending cell.
        cell: CellCoord,
    },
    /// A tile query left the map, which an enclosing wall ring rules out.
    #[error("tile query outside the map: {0}")]
    TileQuery(#[from] TileQueryError),
}

/// Represents the authoritative Overworld state.
#[derive(Debug)]
pub struct World {
    config: SimulationConfig,
    map: Arc<TileMap>,
    player: Player,
    npcs: Vec<Npc>,
    interaction: Interaction,
    tick_index: u64,
}

impl World {
    /// Creates a world on the provided map, placing the player on its first spawn point.
    pub fn new(
        config: SimulationConfig,
        map: Arc<TileMap>,
        npcs: Vec<NpcSeed>,
    ) -> Result<Self, WorldError> {
        let spawn = *map.spawn_points().first().ok_or(WorldError::MissingSpawn)?;

        let mut placed = Vec::with_capacity(npcs.len());
        for (index, seed) in npcs.into_iter().enumerate() {
            let id = NpcId::new(index as u32);
            if !map.is_passable(seed.cell)? {
                return Err(WorldError::ImpassableNpc {
                    npc: id,
                    cell: seed.cell,
                });
            }
            placed.push(Npc {
                id,
                cell: seed.cell,
                dialog: seed.dialog,
            });
        }

        Ok(Self {
            player: Player::spawn_at(spawn, config.tile_size),
            config,
            map,
            npcs: placed,
            interaction: Interaction::default(),
            tick_index: 0,
        })
    }

    /// Creates the town world with its default characters.
    pub fn with_defaults(config: SimulationConfig) -> Result<Self, WorldError> {
        let map = TileMap::parse(DEFAULT_MAP)?;
        Self::new(config, Arc::new(map), default_npcs())
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Returns an error only when a move would leave the map.
pub fn apply(
    world: &mut World,
    command: Command,
    out_events: &mut Vec<Event>,
) -> Result<(), WorldError> {
    match command {
        Command::Tick { dt } => {
            world.tick_index = world.tick_index.saturating_add(1);
            out_events.push(Event::TimeAdvanced { dt });
        }
        Command::StepPlayer { direction } => {
            let resolution = resolve_move(
                &world.map,
                world.player.position,
                direction,
                world.config.player_speed,
                world.config.tile_size,
            )?;

            world.player.facing = direction;
            match resolution {
                MoveResolution::Accepted { to, cell } => {
                    let from = world.player.position;
                    world.player.advance(to, cell);
                    out_events.push(Event::PlayerMoved {
                        from,
                        to,
                        direction,
                    });
                }
                MoveResolution::Blocked { cell } => {
                    out_events.push(Event::PlayerBlocked { direction, cell });
                }
            }
        }
        Command::DismissWelcome => {
            if world.interaction.dismiss_welcome() {
                out_events.push(Event::WelcomeDismissed);
            }
        }
        Command::ShowDialog { text } => {
            if world.interaction.show_dialog(text.clone()) {
                out_events.push(Event::DialogOpened { text });
            }
        }
        Command::DismissDialog => {
            if world.interaction.dismiss_dialog() {
                out_events.push(Event::DialogClosed);
            }
        }
    }

    Ok(())
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::sync::Arc;

    use super::World;
    use overworld_core::{
        DialogBanner, NpcId, NpcSnapshot, PlayerSnapshot, SimulationConfig, TileMap, WelcomeBanner,
    };

    /// Configuration the world was built with.
    #[must_use]
    pub fn config(world: &World) -> SimulationConfig {
        world.config
    }

    /// Shared handle to the immutable tile map.
    #[must_use]
    pub fn map(world: &World) -> &Arc<TileMap> {
        &world.map
    }

    /// Number of ticks applied since the world was created.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Captures the player's current state.
    #[must_use]
    pub fn player(world: &World) -> PlayerSnapshot {
        let player = &world.player;
        PlayerSnapshot {
            position: player.position,
            cell: player.cell,
            facing: player.facing,
            animation_frame: player.animation_frame,
        }
    }

    /// Captures every character in identifier order.
    #[must_use]
    pub fn npcs(world: &World) -> Vec<NpcSnapshot> {
        world
            .npcs
            .iter()
            .map(|npc| NpcSnapshot {
                id: npc.id,
                cell: npc.cell,
                dialog: npc.dialog.clone(),
            })
            .collect()
    }

    /// Dialog text attached to the provided character, if it exists.
    #[must_use]
    pub fn npc_dialog(world: &World, npc: NpcId) -> Option<&str> {
        world
            .npcs
            .iter()
            .find(|candidate| candidate.id == npc)
            .map(|candidate| candidate.dialog.as_str())
    }

    /// Current state of the welcome banner.
    #[must_use]
    pub fn welcome_banner(world: &World) -> WelcomeBanner {
        world.interaction.welcome()
    }

    /// Current state of the dialog banner.
    #[must_use]
    pub fn dialog_banner(world: &World) -> &DialogBanner {
        world.interaction.dialog()
    }
}
