//! Immutable tile map shared by the world, the collision resolver and renderers.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{CellCoord, Position};

/// Marker denoting an impassable wall tile in map text.
pub const WALL_MARKER: char = 'B';
/// Marker denoting a plain floor tile in map text.
pub const FLOOR_MARKER: char = '.';
/// Marker denoting a special floor tile that also records a spawn point.
pub const SPAWN_MARKER: char = 'P';

/// Terrain classification of a single grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tile {
    /// Impassable terrain.
    Wall,
    /// Regular walkable terrain.
    Floor,
    /// Walkable terrain drawn with a distinct style.
    SpecialFloor,
}

impl Tile {
    /// Reports whether entities may stand on the tile.
    #[must_use]
    pub const fn is_passable(self) -> bool {
        matches!(self, Self::Floor | Self::SpecialFloor)
    }

    const fn marker(self) -> char {
        match self {
            Self::Wall => WALL_MARKER,
            Self::Floor => FLOOR_MARKER,
            Self::SpecialFloor => SPAWN_MARKER,
        }
    }
}

/// Errors raised while constructing a [`TileMap`] from text rows.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MapError {
    /// The definition contained no rows or no columns.
    #[error("map definition is empty")]
    Empty,
    /// A row's length differs from the first row.
    #[error("map row {row} has {found} tiles, expected {expected}")]
    RaggedRow {
        /// Zero-based index of the offending row.
        row: usize,
        /// Width established by the first row.
        expected: usize,
        /// Width of the offending row.
        found: usize,
    },
    /// A character outside the marker alphabet was found.
    #[error("unknown tile marker {marker:?} at column {column}, row {row}")]
    UnknownMarker {
        /// Zero-based row of the marker.
        row: usize,
        /// Zero-based column of the marker.
        column: usize,
        /// Offending character.
        marker: char,
    },
}

/// Errors raised by tile queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum TileQueryError {
    /// The queried cell lies outside the grid.
    #[error("cell ({column}, {row}) lies outside the map")]
    OutOfBounds {
        /// Column of the query; negative when left of the grid.
        column: i64,
        /// Row of the query; negative when above the grid.
        row: i64,
    },
}

/// Immutable grid of tiles with spawn points recorded beside it.
///
/// The map serialises as its text rows, so deserialising re-validates the
/// definition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct TileMap {
    columns: u32,
    rows: u32,
    tiles: Vec<Tile>,
    spawn_points: Vec<CellCoord>,
}

impl TileMap {
    /// Builds a map from equal-length rows of marker characters.
    pub fn parse<I, S>(rows: I) -> Result<Self, MapError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut tiles = Vec::new();
        let mut spawn_points = Vec::new();
        let mut width: Option<usize> = None;
        let mut row_count = 0usize;

        for (row, line) in rows.into_iter().enumerate() {
            let line = line.as_ref();
            let mut found = 0usize;
            for (column, marker) in line.chars().enumerate() {
                let tile = match marker {
                    WALL_MARKER => Tile::Wall,
                    FLOOR_MARKER => Tile::Floor,
                    SPAWN_MARKER => {
                        spawn_points.push(CellCoord::new(column as u32, row as u32));
                        Tile::SpecialFloor
                    }
                    _ => return Err(MapError::UnknownMarker { row, column, marker }),
                };
                tiles.push(tile);
                found += 1;
            }

            let expected = *width.get_or_insert(found);
            if found != expected {
                return Err(MapError::RaggedRow {
                    row,
                    expected,
                    found,
                });
            }
            row_count += 1;
        }

        let columns = width.unwrap_or(0);
        if columns == 0 || row_count == 0 {
            return Err(MapError::Empty);
        }

        Ok(Self {
            columns: columns as u32,
            rows: row_count as u32,
            tiles,
            spawn_points,
        })
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Cells where the spawn marker appeared, in row-major order.
    #[must_use]
    pub fn spawn_points(&self) -> &[CellCoord] {
        &self.spawn_points
    }

    /// Returns the tile stored at the provided cell.
    pub fn tile_at(&self, cell: CellCoord) -> Result<Tile, TileQueryError> {
        self.index(cell)
            .map(|index| self.tiles[index])
            .ok_or(TileQueryError::OutOfBounds {
                column: i64::from(cell.column()),
                row: i64::from(cell.row()),
            })
    }

    /// Reports whether the tile at the provided cell is walkable.
    pub fn is_passable(&self, cell: CellCoord) -> Result<bool, TileQueryError> {
        self.tile_at(cell).map(Tile::is_passable)
    }

    /// Converts a continuous position into the grid cell that contains it.
    ///
    /// Coordinates are floored, so any negative coordinate lies outside the map.
    pub fn cell_at(&self, position: Position, tile_size: u32) -> Result<CellCoord, TileQueryError> {
        let length = tile_size.max(1) as f32;
        let column = (position.x() / length).floor();
        let row = (position.y() / length).floor();

        let inside = column.is_finite()
            && row.is_finite()
            && column >= 0.0
            && row >= 0.0
            && column < self.columns as f32
            && row < self.rows as f32;
        if !inside {
            return Err(TileQueryError::OutOfBounds {
                column: column as i64,
                row: row as i64,
            });
        }

        Ok(CellCoord::new(column as u32, row as u32))
    }

    /// Iterates over every cell and its tile in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (CellCoord, Tile)> + '_ {
        let columns = self.columns.max(1);
        self.tiles.iter().enumerate().map(move |(index, tile)| {
            let index = index as u32;
            (CellCoord::new(index % columns, index / columns), *tile)
        })
    }

    /// Renders the map back into marker rows.
    #[must_use]
    pub fn to_rows(&self) -> Vec<String> {
        self.tiles
            .chunks(self.columns as usize)
            .map(|row| row.iter().map(|tile| tile.marker()).collect())
            .collect()
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.column() < self.columns && cell.row() < self.rows {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}

impl FromStr for TileMap {
    type Err = MapError;

    /// Parses newline-separated rows, trimming whitespace around each row.
    ///
    /// Blank lines before the first row and after the last row are ignored; a
    /// blank line between rows is a row of length zero and fails as ragged.
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let lines: Vec<&str> = text.lines().map(str::trim).collect();
        let first = lines.iter().position(|line| !line.is_empty());
        let last = lines.iter().rposition(|line| !line.is_empty());

        match (first, last) {
            (Some(first), Some(last)) => Self::parse(&lines[first..=last]),
            _ => Err(MapError::Empty),
        }
    }
}

impl TryFrom<Vec<String>> for TileMap {
    type Error = MapError;

    fn try_from(rows: Vec<String>) -> Result<Self, Self::Error> {
        Self::parse(rows)
    }
}

impl From<TileMap> for Vec<String> {
    fn from(map: TileMap) -> Self {
        map.to_rows()
    }
}
