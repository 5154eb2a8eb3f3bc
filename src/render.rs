//! Rendering: draws one frame of the hex grid to a [`Surface`].
//!
//! Geometry (fills, grid lines, roads, highlight) is drawn in world units under
//! the camera transform applied once at context level. Glyphs are projected to
//! screen space first and drawn in a second pass under the DPR-only transform,
//! so they stay upright whatever the rotation or tilt.
//!
//! This module reads grid, terrain, and camera state and never mutates it.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use crate::camera::{Camera, Point};
use crate::config::RenderStyle;
use crate::consts::{EDGE_GAP_FRACTION, GLYPH_SCALE, MAX_PAD, ROAD_DASH};
use crate::error::GridError;
use crate::grid::{Grid, HexCoord};
use crate::layout::{HexLayout, diagonals};
use crate::roads::road_edges;
use crate::surface::Surface;
use crate::terrain::TerrainMap;
use crate::viewport::Viewport;

/// Read-only inputs for one frame.
pub struct Scene<'a> {
    pub grid: &'a Grid,
    pub terrain: &'a TerrainMap,
    pub layout: HexLayout,
    pub camera: &'a Camera,
    pub style: &'a RenderStyle,
    pub viewport: Viewport,
    pub bridge_terrain: &'a str,
    pub hovered: Option<HexCoord>,
    pub highlight: Option<HexCoord>,
}

/// What a frame actually drew.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub cells: usize,
    pub roads: usize,
    pub glyphs: usize,
}

/// A glyph waiting for the screen-space pass.
#[derive(Debug, Clone)]
struct QueuedGlyph<'a> {
    text: &'a str,
    at: Point,
    color: &'a str,
    mirrored: bool,
}

/// Draw the full frame.
///
/// # Errors
///
/// Returns `Err` if any fallible surface call fails (e.g. invalid context state).
pub fn draw<S: Surface>(surface: &mut S, scene: &Scene<'_>) -> Result<FrameStats, GridError> {
    let vp = scene.viewport;
    let cam = scene.camera;
    let center = vp.center();
    let mut stats = FrameStats::default();

    // Layer 1: clear and paint the background in CSS pixels.
    surface.set_transform(vp.dpr, 0.0, 0.0, vp.dpr, 0.0, 0.0)?;
    surface.clear_rect(0.0, 0.0, vp.width, vp.height);
    surface.set_fill_style(&scene.style.background);
    surface.fill_rect(0.0, 0.0, vp.width, vp.height);

    // Layer 2: world geometry under the camera transform.
    surface.translate(center.x + cam.pan_x, center.y + cam.pan_y)?;
    surface.scale(cam.zoom, cam.zoom * cam.tilt)?;
    surface.rotate(cam.rotation_deg.to_radians())?;

    let glyphs = draw_cells(surface, scene, &mut stats);
    stats.roads = draw_roads(surface, scene)?;
    if let Some(coord) = scene.highlight.filter(|c| scene.grid.contains(*c)) {
        draw_highlight(surface, scene, coord);
    }

    // Layer 3: upright glyphs in screen space.
    surface.set_transform(vp.dpr, 0.0, 0.0, vp.dpr, 0.0, 0.0)?;
    stats.glyphs = draw_glyphs(surface, scene, &glyphs)?;

    Ok(stats)
}

/// Padding ring (in cells) needed to cover the viewport at the current zoom.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn padding(layout: &HexLayout, camera: &Camera, viewport: Viewport) -> i32 {
    let step = camera.world_dist_to_screen_min(layout.y_step());
    if step <= 0.0 {
        return MAX_PAD;
    }
    let cells = (viewport.width.max(viewport.height) / step).ceil();
    (cells.min(f64::from(MAX_PAD)) as i32).clamp(1, MAX_PAD)
}

// =============================================================
// Cells
// =============================================================

fn draw_cells<'a, S: Surface>(surface: &mut S, scene: &Scene<'a>, stats: &mut FrameStats) -> Vec<QueuedGlyph<'a>> {
    let layout = &scene.layout;
    let cam = scene.camera;
    let center = scene.viewport.center();
    let pad = padding(layout, cam, scene.viewport);
    let margin = 2.0 * layout.size * cam.zoom;
    let rows = i32::try_from(layout.rows).unwrap_or(i32::MAX - MAX_PAD);
    let cols = i32::try_from(layout.cols).unwrap_or(i32::MAX - MAX_PAD);

    let line_width = scene.style.grid_line_width / cam.zoom;
    let mut glyphs = Vec::new();

    for row in -pad..rows + pad {
        for col in -pad..cols + pad {
            let coord = HexCoord::new(row, col);
            let world = layout.center(coord);
            let screen = cam.world_to_screen(world, center);
            if !on_screen(screen, margin, scene.viewport) {
                continue;
            }

            let cell = scene.grid.get(coord);
            let style = cell.map_or_else(|| scene.terrain.empty_style(), |c| scene.terrain.style_for(&c.terrain));
            let hovered = cell.is_some() && scene.hovered == Some(coord);

            let fill = if hovered {
                style.hover_fill.as_str()
            } else {
                cell.and_then(|c| c.district_color.as_deref()).unwrap_or(style.fill.as_str())
            };

            let verts = layout.vertices(world);
            trace_polygon(surface, &verts);
            surface.set_fill_style(fill);
            surface.fill();

            surface.set_global_alpha(cam.grid_alpha);
            surface.set_stroke_style(&scene.style.grid_line_color);
            surface.set_line_width(line_width);
            stroke_gapped_edges(surface, &verts);
            surface.set_global_alpha(1.0);
            stats.cells += 1;

            if style.glyph.is_empty() {
                continue;
            }
            let mirrored = cell.is_some_and(|c| c.terrain == scene.bridge_terrain)
                && bridge_mirrored(scene.grid, coord, scene.bridge_terrain);
            glyphs.push(QueuedGlyph {
                text: style.glyph.as_str(),
                at: screen,
                color: if hovered { style.hovered_symbol_color.as_str() } else { style.symbol_color.as_str() },
                mirrored,
            });
        }
    }
    glyphs
}

fn on_screen(p: Point, margin: f64, vp: Viewport) -> bool {
    p.x >= -margin && p.x <= vp.width + margin && p.y >= -margin && p.y <= vp.height + margin
}

fn trace_polygon<S: Surface>(surface: &mut S, verts: &[Point; 6]) {
    surface.begin_path();
    surface.move_to(verts[0].x, verts[0].y);
    for v in &verts[1..] {
        surface.line_to(v.x, v.y);
    }
    surface.close_path();
}

/// Stroke the middle part of each edge, leaving gaps at the corners.
fn stroke_gapped_edges<S: Surface>(surface: &mut S, verts: &[Point; 6]) {
    surface.begin_path();
    for i in 0..6 {
        let a = verts[i];
        let b = verts[(i + 1) % 6];
        let dx = b.x - a.x;
        let dy = b.y - a.y;
        let lo = EDGE_GAP_FRACTION;
        let hi = 1.0 - EDGE_GAP_FRACTION;
        surface.move_to(a.x + dx * lo, a.y + dy * lo);
        surface.line_to(a.x + dx * hi, a.y + dy * hi);
    }
    surface.stroke();
}

/// Whether a bridge glyph should be mirrored to follow its neighbors.
///
/// Counts bridge cells on each diagonal axis and mirrors when the
/// north-east/south-west axis has strictly more.
#[must_use]
pub fn bridge_mirrored(grid: &Grid, coord: HexCoord, bridge_terrain: &str) -> bool {
    let is_bridge = |c: HexCoord| grid.get(c).is_some_and(|cell| cell.terrain == bridge_terrain);
    let d = diagonals(coord);
    let nw_se = usize::from(is_bridge(d.nw)) + usize::from(is_bridge(d.se));
    let ne_sw = usize::from(is_bridge(d.ne)) + usize::from(is_bridge(d.sw));
    ne_sw > nw_se
}

// =============================================================
// Roads and highlight
// =============================================================

fn draw_roads<S: Surface>(surface: &mut S, scene: &Scene<'_>) -> Result<usize, GridError> {
    let edges = road_edges(scene.grid);
    if edges.is_empty() {
        return Ok(0);
    }
    surface.set_stroke_style(&scene.style.road_color);
    surface.set_line_width(scene.style.road_width);
    surface.set_line_dash(&ROAD_DASH)?;
    for edge in &edges {
        let a = scene.layout.center(edge.a);
        let b = scene.layout.center(edge.b);
        surface.begin_path();
        surface.move_to(a.x, a.y);
        surface.line_to(b.x, b.y);
        surface.stroke();
    }
    surface.set_line_dash(&[])?;
    Ok(edges.len())
}

fn draw_highlight<S: Surface>(surface: &mut S, scene: &Scene<'_>, coord: HexCoord) {
    let verts = scene.layout.vertices(scene.layout.center(coord));
    trace_polygon(surface, &verts);
    surface.set_stroke_style(&scene.style.highlight_color);
    surface.set_line_width(scene.style.highlight_width / scene.camera.zoom);
    surface.stroke();
}

// =============================================================
// Glyphs
// =============================================================

fn draw_glyphs<S: Surface>(surface: &mut S, scene: &Scene<'_>, glyphs: &[QueuedGlyph<'_>]) -> Result<usize, GridError> {
    if glyphs.is_empty() {
        return Ok(0);
    }
    let font_px = (scene.layout.size * scene.camera.zoom * GLYPH_SCALE).max(1.0);
    surface.set_font(&format!("{font_px:.0}px {}", scene.style.font_family));
    surface.set_text_align("center");
    surface.set_text_baseline("middle");

    for g in glyphs {
        surface.set_fill_style(g.color);
        if g.mirrored {
            surface.save();
            surface.translate(g.at.x, g.at.y)?;
            surface.scale(-1.0, 1.0)?;
            surface.fill_text(g.text, 0.0, 0.0)?;
            surface.restore();
        } else {
            surface.fill_text(g.text, g.at.x, g.at.y)?;
        }
    }
    Ok(glyphs.len())
}
