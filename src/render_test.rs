#![allow(clippy::float_cmp)]

use std::collections::HashMap;

use super::*;
use crate::grid::Cell;
use crate::surface::surface_test::{Op, RecordingSurface};
use crate::terrain::TerrainStyle;

// =============================================================
// Helpers
// =============================================================

fn style(glyph: &str, fill: &str) -> TerrainStyle {
    TerrainStyle {
        glyph: glyph.to_owned(),
        fill: fill.to_owned(),
        hover_fill: format!("{fill}-hover"),
        symbol_color: format!("{fill}-symbol"),
        hovered_symbol_color: format!("{fill}-symbol-hover"),
        label: fill.to_owned(),
    }
}

fn terrain() -> TerrainMap {
    let mut styles = HashMap::new();
    styles.insert("empty".to_owned(), style("", "void"));
    styles.insert("plains".to_owned(), style("", "plains"));
    styles.insert("city".to_owned(), style("C", "city"));
    styles.insert("bridge".to_owned(), style("=", "bridge"));
    TerrainMap::new(styles, "empty")
}

struct Fixture {
    grid: Grid,
    terrain: TerrainMap,
    camera: Camera,
    style: RenderStyle,
    viewport: Viewport,
    hovered: Option<HexCoord>,
    highlight: Option<HexCoord>,
}

impl Fixture {
    fn new() -> Self {
        Self {
            grid: Grid::filled(10, 10, &Cell::with_terrain("plains")),
            terrain: terrain(),
            camera: Camera::default(),
            style: RenderStyle::default(),
            viewport: Viewport::new(800.0, 600.0, 1.0),
            hovered: None,
            highlight: None,
        }
    }

    fn set(&mut self, row: i32, col: i32, cell: Cell) {
        if let Some(slot) = self.grid.get_mut(HexCoord::new(row, col)) {
            *slot = cell;
        }
    }

    fn scene(&self) -> Scene<'_> {
        Scene {
            grid: &self.grid,
            terrain: &self.terrain,
            layout: HexLayout::new(20.0, self.grid.rows(), self.grid.cols()),
            camera: &self.camera,
            style: &self.style,
            viewport: self.viewport,
            bridge_terrain: "bridge",
            hovered: self.hovered,
            highlight: self.highlight,
        }
    }

    fn draw(&self) -> (RecordingSurface, FrameStats) {
        let mut surface = RecordingSurface::with_backing(800, 600);
        let stats = draw(&mut surface, &self.scene()).unwrap();
        (surface, stats)
    }
}

fn road(terrain: &str) -> Cell {
    Cell { has_road: true, ..Cell::with_terrain(terrain) }
}

// =============================================================
// Frame setup
// =============================================================

#[test]
fn frame_starts_with_clear_and_background() {
    let fx = Fixture::new();
    let (s, _) = fx.draw();
    assert_eq!(s.ops[0], Op::SetTransform([1.0, 0.0, 0.0, 1.0, 0.0, 0.0]));
    assert_eq!(s.ops[1], Op::ClearRect);
    assert_eq!(s.ops[2], Op::FillStyle(fx.style.background.clone()));
    assert_eq!(s.ops[3], Op::FillRect);
}

#[test]
fn camera_transform_is_applied_once_in_translate_scale_rotate_order() {
    let mut fx = Fixture::new();
    fx.camera.pan_x = 10.0;
    fx.camera.pan_y = -4.0;
    let (s, _) = fx.draw();
    assert_eq!(s.ops[4], Op::Translate(410.0, 296.0));
    assert_eq!(s.ops[5], Op::Scale(1.2, 1.2 * 0.55));
    assert_eq!(s.ops[6], Op::Rotate((-45f64).to_radians()));
    assert_eq!(s.count(|op| matches!(op, Op::Rotate(_))), 1);
}

#[test]
fn dpr_scales_base_transform() {
    let mut fx = Fixture::new();
    fx.viewport = Viewport::new(400.0, 300.0, 2.0);
    let (s, _) = fx.draw();
    assert_eq!(s.ops[0], Op::SetTransform([2.0, 0.0, 0.0, 2.0, 0.0, 0.0]));
}

// =============================================================
// Cells
// =============================================================

#[test]
fn padding_ring_draws_beyond_grid() {
    let fx = Fixture::new();
    let (s, stats) = fx.draw();
    assert!(stats.cells > 100, "only {} cells drawn", stats.cells);
    assert!(s.fill_styles().iter().any(|f| f == "void"));
}

#[test]
fn zoomed_in_view_culls_offscreen_cells() {
    let mut fx = Fixture::new();
    fx.camera.set_zoom(3.0);
    fx.viewport = Viewport::new(120.0, 90.0, 1.0);
    let (_, stats) = fx.draw();
    assert!(stats.cells > 0);
    assert!(stats.cells < 100);
}

#[test]
fn district_color_overrides_terrain_fill() {
    let mut fx = Fixture::new();
    fx.set(0, 0, Cell { district_color: Some("#abcdef".into()), ..Cell::with_terrain("plains") });
    let (s, _) = fx.draw();
    assert_eq!(s.fill_styles().iter().filter(|f| *f == "#abcdef").count(), 1);
}

#[test]
fn hovered_cell_uses_hover_fill_and_symbol_color() {
    let mut fx = Fixture::new();
    fx.set(3, 4, Cell::with_terrain("city"));
    fx.hovered = Some(HexCoord::new(3, 4));
    let (s, _) = fx.draw();
    let fills = s.fill_styles();
    assert!(fills.iter().any(|f| f == "city-hover"));
    assert!(fills.iter().any(|f| f == "city-symbol-hover"));
    assert!(!fills.iter().any(|f| f == "city-symbol"));
}

#[test]
fn hover_district_cell_prefers_hover_fill() {
    let mut fx = Fixture::new();
    fx.set(1, 1, Cell { district_color: Some("#123456".into()), ..Cell::with_terrain("plains") });
    fx.hovered = Some(HexCoord::new(1, 1));
    let (s, _) = fx.draw();
    let fills = s.fill_styles();
    assert!(fills.iter().any(|f| f == "plains-hover"));
    assert!(!fills.iter().any(|f| f == "#123456"));
}

#[test]
fn grid_lines_use_grid_alpha_and_gaps() {
    let mut fx = Fixture::new();
    fx.camera.set_grid_alpha(0.25);
    let (s, _) = fx.draw();
    assert!(s.ops.contains(&Op::GlobalAlpha(0.25)));

    // Every gapped edge segment is 70% of the hex side (side == radius == 20).
    let mut checked = 0;
    for pair in s.ops.windows(2) {
        if let [Op::MoveTo(x0, y0), Op::LineTo(x1, y1)] = pair {
            let len = ((x1 - x0).powi(2) + (y1 - y0).powi(2)).sqrt();
            if (len - 14.0).abs() < 1e-6 {
                checked += 1;
            }
        }
    }
    assert!(checked >= 6 * 100);
}

// =============================================================
// Glyphs
// =============================================================

#[test]
fn glyphs_are_drawn_at_projected_centers_in_screen_space() {
    let mut fx = Fixture::new();
    fx.set(3, 4, Cell::with_terrain("city"));
    let (s, stats) = fx.draw();
    assert_eq!(stats.glyphs, 1);

    let layout = HexLayout::new(20.0, 10, 10);
    let expected = fx.camera.world_to_screen(layout.center(HexCoord::new(3, 4)), fx.viewport.center());
    let texts = s.texts();
    assert_eq!(texts.len(), 1);
    let (text, x, y) = &texts[0];
    assert_eq!(text, "C");
    assert!((x - expected.x).abs() < 1e-9 && (y - expected.y).abs() < 1e-9);
}

#[test]
fn glyph_pass_resets_to_dpr_transform() {
    let mut fx = Fixture::new();
    fx.set(0, 0, Cell::with_terrain("city"));
    let (s, _) = fx.draw();
    let text_at = s.ops.iter().position(|op| matches!(op, Op::FillText { .. })).unwrap();
    let last_transform = s.ops[..text_at]
        .iter()
        .rev()
        .find(|op| matches!(op, Op::SetTransform(_)))
        .unwrap();
    assert_eq!(last_transform, &Op::SetTransform([1.0, 0.0, 0.0, 1.0, 0.0, 0.0]));
    assert!(s.ops.contains(&Op::TextAlign("center".into())));
    assert!(s.ops.contains(&Op::TextBaseline("middle".into())));
}

#[test]
fn terrain_without_glyph_draws_no_text() {
    let fx = Fixture::new();
    let (s, stats) = fx.draw();
    assert_eq!(stats.glyphs, 0);
    assert!(s.texts().is_empty());
}

// =============================================================
// Bridges
// =============================================================

#[test]
fn bridge_mirrors_when_ne_sw_axis_dominates() {
    let mut grid = Grid::filled(5, 5, &Cell::with_terrain("river"));
    // (2, 2) is an even row: NE = (1, 2), SW = (3, 1).
    for (r, c) in [(2, 2), (1, 2), (3, 1)] {
        if let Some(cell) = grid.get_mut(HexCoord::new(r, c)) {
            cell.terrain = "bridge".into();
        }
    }
    assert!(bridge_mirrored(&grid, HexCoord::new(2, 2), "bridge"));
}

#[test]
fn bridge_stays_unmirrored_on_tie_or_nw_se_majority() {
    let mut grid = Grid::filled(5, 5, &Cell::with_terrain("river"));
    assert!(!bridge_mirrored(&grid, HexCoord::new(2, 2), "bridge"));
    // (2, 2): NW = (1, 1), NE = (1, 2).
    for (r, c) in [(1, 1), (1, 2)] {
        if let Some(cell) = grid.get_mut(HexCoord::new(r, c)) {
            cell.terrain = "bridge".into();
        }
    }
    assert!(!bridge_mirrored(&grid, HexCoord::new(2, 2), "bridge"));
}

#[test]
fn odd_row_bridge_uses_odd_diagonals() {
    let mut grid = Grid::filled(5, 5, &Cell::with_terrain("river"));
    // (3, 2) is odd: NE = (2, 3), SW = (4, 2).
    for (r, c) in [(2, 3), (4, 2)] {
        if let Some(cell) = grid.get_mut(HexCoord::new(r, c)) {
            cell.terrain = "bridge".into();
        }
    }
    assert!(bridge_mirrored(&grid, HexCoord::new(3, 2), "bridge"));
}

#[test]
fn ne_sw_bridge_run_draws_flipped_glyphs() {
    let mut fx = Fixture::new();
    for (r, c) in [(2, 2), (1, 2), (3, 1)] {
        fx.set(r, c, Cell::with_terrain("bridge"));
    }
    let (s, stats) = fx.draw();
    // Each cell on a NE-SW run of bridges has a bridge on that axis.
    assert_eq!(stats.glyphs, 3);
    assert_eq!(s.count(|op| *op == Op::Scale(-1.0, 1.0)), 3);
    assert!(s.texts().iter().any(|(t, x, y)| t == "=" && *x == 0.0 && *y == 0.0));
}

// =============================================================
// Roads
// =============================================================

#[test]
fn mutual_road_neighbors_draw_one_dashed_segment() {
    let mut fx = Fixture::new();
    fx.set(4, 4, road("plains"));
    fx.set(4, 5, road("plains"));
    let (s, stats) = fx.draw();
    assert_eq!(stats.roads, 1);
    assert!(s.ops.contains(&Op::LineDash(ROAD_DASH.to_vec())));
    assert_eq!(s.ops.iter().rev().find(|op| matches!(op, Op::LineDash(_))), Some(&Op::LineDash(vec![])));
}

#[test]
fn road_segment_connects_world_centers() {
    let mut fx = Fixture::new();
    fx.set(4, 4, road("plains"));
    fx.set(5, 4, road("plains"));
    let (s, _) = fx.draw();
    let layout = HexLayout::new(20.0, 10, 10);
    let a = layout.center(HexCoord::new(4, 4));
    let b = layout.center(HexCoord::new(5, 4));
    let dash_at = s.ops.iter().position(|op| *op == Op::LineDash(ROAD_DASH.to_vec())).unwrap();
    let tail = &s.ops[dash_at..];
    assert!(tail.windows(2).any(|w| w == [Op::MoveTo(a.x, a.y), Op::LineTo(b.x, b.y)]));
}

#[test]
fn no_roads_means_no_dash_changes() {
    let fx = Fixture::new();
    let (s, stats) = fx.draw();
    assert_eq!(stats.roads, 0);
    assert_eq!(s.count(|op| matches!(op, Op::LineDash(_))), 0);
}

// =============================================================
// Highlight
// =============================================================

#[test]
fn highlight_outlines_in_bounds_cell() {
    let mut fx = Fixture::new();
    fx.highlight = Some(HexCoord::new(2, 2));
    let (s, _) = fx.draw();
    assert!(s.ops.contains(&Op::StrokeStyle(fx.style.highlight_color.clone())));
}

#[test]
fn highlight_out_of_bounds_is_ignored() {
    let mut fx = Fixture::new();
    fx.highlight = Some(HexCoord::new(-1, 2));
    let (s, _) = fx.draw();
    assert!(!s.ops.contains(&Op::StrokeStyle(fx.style.highlight_color.clone())));
}

// =============================================================
// Padding
// =============================================================

#[test]
fn padding_is_at_least_one_and_capped() {
    let layout = HexLayout::new(20.0, 10, 10);
    let cam = Camera::default();
    assert_eq!(padding(&layout, &cam, Viewport::default()), 1);
    assert_eq!(padding(&layout, &cam, Viewport::new(1e7, 1e7, 1.0)), MAX_PAD);
}

#[test]
fn padding_grows_when_zoomed_out() {
    let layout = HexLayout::new(20.0, 10, 10);
    let vp = Viewport::new(800.0, 600.0, 1.0);
    let mut cam = Camera::default();
    let near = padding(&layout, &cam, vp);
    cam.set_zoom(cam.min_zoom);
    assert!(padding(&layout, &cam, vp) > near);
}
