//! Grid model: cells, coordinates, and the normalized rectangular grid.
//!
//! Cells are addressed positionally by `(row, col)`. Labels such as `code` or
//! `hexId` ride along for display only and never act as keys.

#[cfg(test)]
#[path = "grid_test.rs"]
mod grid_test;

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_GRID_CELLS, MAX_GRID_DIM};
use crate::error::GridError;

/// Offset-hex coordinate. Signed so that padding cells outside the grid can be addressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HexCoord {
    pub row: i32,
    pub col: i32,
}

impl HexCoord {
    #[must_use]
    pub fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Whether this row is shifted right by half a hex.
    #[must_use]
    pub fn is_odd_row(self) -> bool {
        self.row.rem_euclid(2) == 1
    }
}

/// One hex of map data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    /// Key into the terrain table. Empty string means the empty terrain.
    #[serde(default)]
    pub terrain: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, alias = "hexId", skip_serializing_if = "Option::is_none")]
    pub hex_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
    #[serde(default, alias = "districtColor", skip_serializing_if = "Option::is_none")]
    pub district_color: Option<String>,
    #[serde(default, alias = "hasRoad")]
    pub has_road: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<serde_json::Value>,
}

impl Cell {
    #[must_use]
    pub fn with_terrain(terrain: impl Into<String>) -> Self {
        Self { terrain: terrain.into(), ..Self::default() }
    }

    /// Display label: `code`, else `hex_id`, else the zero-padded position.
    #[must_use]
    pub fn display_code(&self, coord: HexCoord) -> String {
        self.code
            .clone()
            .or_else(|| self.hex_id.clone())
            .unwrap_or_else(|| format!("{:02}{:02}", coord.row, coord.col))
    }
}

/// Raw map payload as produced by a parser: `{ grid, rows?, cols? }`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MapData {
    pub grid: Vec<Vec<Cell>>,
    #[serde(default)]
    pub rows: Option<usize>,
    #[serde(default)]
    pub cols: Option<usize>,
}

/// Rectangular grid of cells. Every `(row, col)` in `[0, rows) × [0, cols)` holds a cell.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Grid {
    cells: Vec<Vec<Cell>>,
    rows: usize,
    cols: usize,
}

impl Grid {
    /// Build a grid filled with copies of `fill`.
    #[cfg(test)]
    #[must_use]
    pub(crate) fn filled(rows: usize, cols: usize, fill: &Cell) -> Self {
        Self { cells: vec![vec![fill.clone(); cols]; rows], rows, cols }
    }

    /// Normalize a parsed payload into a rectangular grid.
    ///
    /// Missing dimensions default to the array's extent. Short rows are padded
    /// with empty cells and excess cells beyond `cols` are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::EmptyGrid`] when the result would have no cells, and
    /// [`GridError::Parse`] when the dimensions exceed [`MAX_GRID_DIM`] per side
    /// or [`MAX_GRID_CELLS`] in total.
    pub fn from_map_data(data: MapData) -> Result<Self, GridError> {
        let rows = data.rows.unwrap_or(data.grid.len());
        let cols = data
            .cols
            .unwrap_or_else(|| data.grid.iter().map(Vec::len).max().unwrap_or(0));
        if rows == 0 || cols == 0 {
            return Err(GridError::EmptyGrid);
        }
        if rows > MAX_GRID_DIM || cols > MAX_GRID_DIM {
            return Err(GridError::Parse(format!("grid {rows}x{cols} exceeds {MAX_GRID_DIM} per side")));
        }
        if rows.checked_mul(cols).is_none_or(|n| n > MAX_GRID_CELLS) {
            return Err(GridError::Parse(format!("grid {rows}x{cols} exceeds {MAX_GRID_CELLS} cells")));
        }
        let mut source = data.grid.into_iter();
        let cells = (0..rows)
            .map(|_| {
                let mut row = source.next().unwrap_or_default();
                row.resize_with(cols, Cell::default);
                row
            })
            .collect();
        Ok(Self { cells, rows, cols })
    }

    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    #[must_use]
    pub fn contains(&self, coord: HexCoord) -> bool {
        self.index(coord).is_some()
    }

    /// Look up a cell. Out-of-bounds coordinates (including negatives) yield `None`.
    #[must_use]
    pub fn get(&self, coord: HexCoord) -> Option<&Cell> {
        let (r, c) = self.index(coord)?;
        self.cells.get(r).and_then(|row| row.get(c))
    }

    pub fn get_mut(&mut self, coord: HexCoord) -> Option<&mut Cell> {
        let (r, c) = self.index(coord)?;
        self.cells.get_mut(r).and_then(|row| row.get_mut(c))
    }

    /// Iterate every cell with its coordinate, row-major.
    pub fn iter(&self) -> impl Iterator<Item = (HexCoord, &Cell)> {
        self.cells.iter().enumerate().flat_map(|(r, row)| {
            row.iter()
                .enumerate()
                .map(move |(c, cell)| (HexCoord::new(to_i32(r), to_i32(c)), cell))
        })
    }

    fn index(&self, coord: HexCoord) -> Option<(usize, usize)> {
        let (Ok(r), Ok(c)) = (usize::try_from(coord.row), usize::try_from(coord.col)) else {
            return None;
        };
        (r < self.rows && c < self.cols).then_some((r, c))
    }
}

fn to_i32(n: usize) -> i32 {
    i32::try_from(n).unwrap_or(i32::MAX)
}
