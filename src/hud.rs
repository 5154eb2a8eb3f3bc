//! Hover/selection payload handed to observers instead of writing to the DOM.

#[cfg(test)]
#[path = "hud_test.rs"]
mod hud_test;

use crate::grid::{Cell, HexCoord};
use crate::terrain::TerrainMap;

/// What the pointer is over (or what is selected), ready for display.
#[derive(Debug, Clone, PartialEq)]
pub struct HoverInfo {
    pub coord: HexCoord,
    pub cell: Cell,
    /// Terrain label, or the raw terrain key when the table has no label.
    pub terrain_label: String,
    pub display_code: String,
}

impl HoverInfo {
    #[must_use]
    pub fn new(coord: HexCoord, cell: &Cell, terrain: &TerrainMap) -> Self {
        let style = terrain.style_for(&cell.terrain);
        let terrain_label = if style.label.is_empty() { cell.terrain.clone() } else { style.label.clone() };
        Self { coord, cell: cell.clone(), terrain_label, display_code: cell.display_code(coord) }
    }

    /// One-line HUD text: `"<code> · <label>"`.
    #[must_use]
    pub fn hud_text(&self) -> String {
        format!("{} · {}", self.display_code, self.terrain_label)
    }
}
