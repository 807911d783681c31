//! All-or-nothing collision resolution against the tile map.

use overworld_core::{CellCoord, Direction, Position, TileMap, TileQueryError};

/// Outcome of resolving a single proposed move.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MoveResolution {
    /// The destination lies on a passable tile.
    Accepted {
        /// Position after the move.
        to: Position,
        /// Cell containing the destination.
        cell: CellCoord,
    },
    /// The destination lies on an impassable tile; the mover stays put.
    Blocked {
        /// Cell that rejected the move.
        cell: CellCoord,
    },
}

/// Resolves a move of `speed` world units from `position` along `direction`.
///
/// Only the destination point is tested, so a speed larger than a tile can
/// skip over a one-tile wall. A destination outside the map is an error: maps
/// are expected to be enclosed by walls.
pub fn resolve_move(
    map: &TileMap,
    position: Position,
    direction: Direction,
    speed: f32,
    tile_size: u32,
) -> Result<MoveResolution, TileQueryError> {
    let proposed = position.offset(direction, speed);
    let cell = map.cell_at(proposed, tile_size)?;

    if map.is_passable(cell)? {
        Ok(MoveResolution::Accepted { to: proposed, cell })
    } else {
        Ok(MoveResolution::Blocked { cell })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corridor() -> TileMap {
        TileMap::parse(["BBBBBB", "B....B", "B.B..B", "BBBBBB"]).expect("valid map")
    }

    #[test]
    fn accepts_moves_onto_floor() {
        let map = corridor();
        let start = Position::new(32.0, 32.0);

        let resolution = resolve_move(&map, start, Direction::Right, 3.0, 32).expect("in bounds");

        assert_eq!(
            resolution,
            MoveResolution::Accepted {
                to: Position::new(35.0, 32.0),
                cell: CellCoord::new(1, 1),
            }
        );
    }

    #[test]
    fn rejects_moves_whose_destination_is_a_wall() {
        let map = corridor();
        let start = Position::new(32.0, 32.0);

        let resolution = resolve_move(&map, start, Direction::Up, 3.0, 32).expect("in bounds");

        assert_eq!(
            resolution,
            MoveResolution::Blocked {
                cell: CellCoord::new(1, 0)
            }
        );
    }

    #[test]
    fn only_the_destination_point_is_tested() {
        let map = corridor();
        let start = Position::new(33.0, 64.0);

        let resolution = resolve_move(&map, start, Direction::Right, 64.0, 32).expect("in bounds");

        assert_eq!(
            resolution,
            MoveResolution::Accepted {
                to: Position::new(97.0, 64.0),
                cell: CellCoord::new(3, 2),
            }
        );
    }

    #[test]
    fn leaving_the_grid_is_reported() {
        let map = TileMap::parse(["...", "..."]).expect("valid map");

        let error = resolve_move(&map, Position::new(1.0, 1.0), Direction::Left, 3.0, 32)
            .expect_err("destination left of the grid");

        assert_eq!(error, TileQueryError::OutOfBounds { column: -1, row: 0 });
    }
}
