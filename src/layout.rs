//! Offset-hex layout: grid coordinates to world positions and back.
//!
//! Rows are stacked `1.5 * size` apart and every odd row is nudged right by
//! half a hex width. The whole grid is centered on the world origin.

#[cfg(test)]
#[path = "layout_test.rs"]
mod layout_test;

use crate::camera::Point;
use crate::consts::{FIRST_VERTEX_DEG, ROW_STEP_RATIO, SQRT_3};
use crate::grid::HexCoord;

/// Neighbor offsets `(d_row, d_col)` for even rows.
const EVEN_ROW_NEIGHBORS: [(i32, i32); 6] = [(0, -1), (0, 1), (-1, -1), (-1, 0), (1, -1), (1, 0)];

/// Neighbor offsets `(d_row, d_col)` for odd rows.
const ODD_ROW_NEIGHBORS: [(i32, i32); 6] = [(0, -1), (0, 1), (-1, 0), (-1, 1), (1, 0), (1, 1)];

/// Diagonal neighbors of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Diagonals {
    pub nw: HexCoord,
    pub ne: HexCoord,
    pub sw: HexCoord,
    pub se: HexCoord,
}

/// Geometry of a `rows × cols` grid of hexes with radius `size`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HexLayout {
    pub size: f64,
    pub rows: usize,
    pub cols: usize,
}

impl HexLayout {
    #[must_use]
    pub fn new(size: f64, rows: usize, cols: usize) -> Self {
        Self { size, rows, cols }
    }

    /// Horizontal distance between neighboring centers in a row.
    #[must_use]
    pub fn width(&self) -> f64 {
        SQRT_3 * self.size
    }

    /// Vertical distance between row centers.
    #[must_use]
    pub fn y_step(&self) -> f64 {
        ROW_STEP_RATIO * self.size
    }

    /// World-space offset of cell `(0, 0)` that centers the grid on the origin.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn origin_offset(&self) -> Point {
        Point::new(
            -(self.cols as f64 * self.width()) / 2.0,
            -(self.rows as f64 * self.y_step()) / 2.0,
        )
    }

    /// World-space center of a cell. Works for coordinates outside the grid too.
    #[must_use]
    pub fn center(&self, coord: HexCoord) -> Point {
        let w = self.width();
        let offset = self.origin_offset();
        let shift = if coord.is_odd_row() { w / 2.0 } else { 0.0 };
        Point::new(
            offset.x + f64::from(coord.col) * w + shift,
            offset.y + f64::from(coord.row) * self.y_step(),
        )
    }

    /// Nearest row/col by rounding, ignoring the odd-row shift. Only a starting point for hit-testing.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn approximate(&self, world: Point) -> HexCoord {
        let offset = self.origin_offset();
        let row = ((world.y - offset.y) / self.y_step()).round();
        let col = ((world.x - offset.x) / self.width()).round();
        HexCoord::new(row as i32, col as i32)
    }

    /// The six polygon vertices around `center`, starting at -30° and stepping 60°.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn vertices(&self, center: Point) -> [Point; 6] {
        std::array::from_fn(|i| {
            let angle = (FIRST_VERTEX_DEG + 60.0 * i as f64).to_radians();
            Point::new(center.x + self.size * angle.cos(), center.y + self.size * angle.sin())
        })
    }

    #[must_use]
    pub fn contains(&self, coord: HexCoord) -> bool {
        usize::try_from(coord.row).is_ok_and(|r| r < self.rows)
            && usize::try_from(coord.col).is_ok_and(|c| c < self.cols)
    }
}

/// All six neighbors of `coord`, which may lie outside the grid.
#[must_use]
pub fn neighbors(coord: HexCoord) -> [HexCoord; 6] {
    let table = if coord.is_odd_row() { &ODD_ROW_NEIGHBORS } else { &EVEN_ROW_NEIGHBORS };
    table.map(|(dr, dc)| HexCoord::new(coord.row + dr, coord.col + dc))
}

/// Diagonal neighbors of `coord`: the row-above and row-below entries of the neighbor table.
#[must_use]
pub fn diagonals(coord: HexCoord) -> Diagonals {
    let [_, _, nw, ne, sw, se] = neighbors(coord);
    Diagonals { nw, ne, sw, se }
}
