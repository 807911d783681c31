#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Overworld engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`InputEvent`]
//! values, systems translate them into [`Command`] values describing desired
//! mutations, the world executes those commands via its `apply` entry point,
//! and then broadcasts [`Event`] values describing what actually happened.

mod config;
mod map;

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub use config::{ConfigError, SimulationConfig};
pub use map::{MapError, Tile, TileMap, TileQueryError, FLOOR_MARKER, SPAWN_MARKER, WALL_MARKER};

/// Canonical banner shown when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to the world of POKEMON!";

/// Side length of a square tile measured in world pixels.
pub const TILE_SIZE: u32 = 32;

/// Largest accepted tile side length in world pixels.
pub const MAX_TILE_SIZE: u32 = 1024;

/// Distance travelled by the player during a single accepted step.
pub const PLAYER_SPEED: f32 = 3.0;

/// Number of simulation steps executed per second.
pub const FRAME_RATE: u32 = 30;

/// Modulus of the cosmetic player animation counter.
pub const ANIMATION_FRAMES: u8 = 10;

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Advances the simulation clock by a single fixed step.
    Tick {
        /// Duration of simulated time covered by the step.
        dt: Duration,
    },
    /// Requests that the player attempt a single step in the provided direction.
    StepPlayer {
        /// Direction of travel for the attempted step.
        direction: Direction,
    },
    /// Hides the welcome banner for the rest of the session.
    DismissWelcome,
    /// Opens the dialog banner with the provided text.
    ShowDialog {
        /// Text displayed inside the dialog banner.
        text: String,
    },
    /// Closes the dialog banner if it is currently open.
    DismissDialog,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that the player moved between two positions.
    PlayerMoved {
        /// Position occupied before the step.
        from: Position,
        /// Position occupied after the step.
        to: Position,
        /// Direction the player travelled.
        direction: Direction,
    },
    /// Reports that a step was rejected because the destination is impassable.
    PlayerBlocked {
        /// Direction the player attempted to travel; the player now faces it.
        direction: Direction,
        /// Cell that rejected the move.
        cell: CellCoord,
    },
    /// Announces that the welcome banner was hidden.
    WelcomeDismissed,
    /// Announces that the dialog banner now shows the provided text.
    DialogOpened {
        /// Text displayed inside the dialog banner.
        text: String,
    },
    /// Announces that the dialog banner was closed.
    DialogClosed,
}

/// Discrete input observed by an adapter during a single frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputEvent {
    /// Requests that the loop stops.
    Quit,
    /// A key was pressed during the frame.
    KeyDown(Key),
    /// A direction key is held during the frame.
    DirectionHeld(Direction),
}

/// Edge-triggered keys recognised by the interaction controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    /// Hides the welcome banner.
    DismissWelcome,
    /// Closes the active dialog.
    DismissDialog,
}

/// Cardinal directions available to the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    Up,
    /// Movement toward increasing row indices.
    Down,
    /// Movement toward decreasing column indices.
    Left,
    /// Movement toward increasing column indices.
    Right,
}

impl Direction {
    /// Directions ordered by the priority applied when several are held at once.
    pub const BY_PRIORITY: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
    ];

    /// Unit vector of the direction expressed as `(dx, dy)` in world space.
    #[must_use]
    pub const fn unit(self) -> (f32, f32) {
        match self {
            Self::Up => (0.0, -1.0),
            Self::Down => (0.0, 1.0),
            Self::Left => (-1.0, 0.0),
            Self::Right => (1.0, 0.0),
        }
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// World-space position of the cell's upper-left corner.
    #[must_use]
    pub fn origin(self, tile_size: u32) -> Position {
        let tile_size = tile_size as f32;
        Position::new(self.column as f32 * tile_size, self.row as f32 * tile_size)
    }
}

/// Continuous world-space coordinate with sub-tile precision.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Position {
    x: f32,
    y: f32,
}

impl Position {
    /// Creates a new position from world-space pixel coordinates.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Horizontal coordinate.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Vertical coordinate.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }

    /// Position displaced by `distance` along the provided direction.
    #[must_use]
    pub fn offset(self, direction: Direction, distance: f32) -> Self {
        let (dx, dy) = direction.unit();
        Self {
            x: self.x + dx * distance,
            y: self.y + dy * distance,
        }
    }
}

/// Unique identifier assigned to a non-player character.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NpcId(u32);

impl NpcId {
    /// Creates a new identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Visibility of the one-shot welcome banner.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WelcomeBanner {
    /// Banner is displayed; initial state.
    #[default]
    Shown,
    /// Banner was dismissed and never returns.
    Hidden,
}

impl WelcomeBanner {
    /// Reports whether the banner is currently displayed.
    #[must_use]
    pub const fn is_shown(&self) -> bool {
        matches!(self, Self::Shown)
    }
}

/// State of the dismissible dialog banner.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DialogBanner {
    /// No dialog is displayed; initial state.
    #[default]
    Inactive,
    /// Dialog displaying the contained text.
    Active(String),
}

impl DialogBanner {
    /// Reports whether a dialog is currently displayed.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self, Self::Active(_))
    }

    /// Text of the active dialog, if any.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Active(text) => Some(text),
            Self::Inactive => None,
        }
    }
}

/// Immutable representation of the player's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerSnapshot {
    /// Continuous world-space position of the player's upper-left corner.
    pub position: Position,
    /// Grid cell containing [`PlayerSnapshot::position`].
    pub cell: CellCoord,
    /// Direction the player currently faces.
    pub facing: Direction,
    /// Cosmetic animation counter in `0..ANIMATION_FRAMES`.
    pub animation_frame: u8,
}

/// Immutable representation of a non-player character used for queries.
#[derive(Clone, Debug, PartialEq)]
pub struct NpcSnapshot {
    /// Identifier of the character.
    pub id: NpcId,
    /// Grid cell the character stands on.
    pub cell: CellCoord,
    /// Text shown when the character is talked to.
    pub dialog: String,
}
