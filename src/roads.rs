//! Road overlay: one connector per pair of adjacent road cells.

#[cfg(test)]
#[path = "roads_test.rs"]
mod roads_test;

use std::collections::HashSet;

use crate::grid::{Grid, HexCoord};
use crate::layout::neighbors;

/// An undirected road edge. `a < b` by row, then col.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RoadEdge {
    pub a: HexCoord,
    pub b: HexCoord,
}

impl RoadEdge {
    /// Canonical edge between two cells regardless of argument order.
    #[must_use]
    pub fn new(x: HexCoord, y: HexCoord) -> Self {
        if x <= y { Self { a: x, b: y } } else { Self { a: y, b: x } }
    }
}

/// Every road edge in the grid, each exactly once, in first-visit order.
#[must_use]
pub fn road_edges(grid: &Grid) -> Vec<RoadEdge> {
    let is_road = |coord: HexCoord| grid.get(coord).is_some_and(|cell| cell.has_road);

    let mut seen = HashSet::new();
    let mut edges = Vec::new();
    for (coord, cell) in grid.iter() {
        if !cell.has_road {
            continue;
        }
        for n in neighbors(coord) {
            if !is_road(n) {
                continue;
            }
            let edge = RoadEdge::new(coord, n);
            if seen.insert(edge) {
                edges.push(edge);
            }
        }
    }
    edges
}
