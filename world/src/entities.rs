//! Player and non-player character state owned by the world.

use overworld_core::{CellCoord, Direction, NpcId, Position, ANIMATION_FRAMES};

/// Player avatar with continuous position.
#[derive(Clone, Debug)]
pub(crate) struct Player {
    pub(crate) position: Position,
    pub(crate) cell: CellCoord,
    pub(crate) facing: Direction,
    pub(crate) animation_frame: u8,
}

impl Player {
    /// Places a player on the upper-left corner of the provided cell, facing down.
    pub(crate) fn spawn_at(cell: CellCoord, tile_size: u32) -> Self {
        Self {
            position: cell.origin(tile_size),
            cell,
            facing: Direction::Down,
            animation_frame: 0,
        }
    }

    /// Commits an accepted move and advances the animation counter.
    pub(crate) fn advance(&mut self, to: Position, cell: CellCoord) {
        self.position = to;
        self.cell = cell;
        self.animation_frame = (self.animation_frame + 1) % ANIMATION_FRAMES;
    }
}

/// Stationary character with attached dialog.
#[derive(Clone, Debug)]
pub(crate) struct Npc {
    pub(crate) id: NpcId,
    pub(crate) cell: CellCoord,
    pub(crate) dialog: String,
}
