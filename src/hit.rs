#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::camera::{Camera, Point};
use crate::grid::HexCoord;
use crate::layout::HexLayout;

/// Resolve the in-bounds hex under a screen point, if any.
///
/// The rounded row/col estimate ignores the odd-row shift, so the 3×3
/// neighborhood around it is searched for the nearest true center. A
/// candidate only counts if the point lies within one hex size of its
/// center. Inside the grid that matches the hexagon exactly; along the outer
/// border the circle reaches slightly past the drawn edge.
#[must_use]
pub fn screen_to_hex(screen: Point, camera: &Camera, layout: &HexLayout, viewport_center: Point) -> Option<HexCoord> {
    let world = camera.screen_to_world(screen, viewport_center);
    world_to_hex(world, layout)
}

/// World-space half of [`screen_to_hex`].
#[must_use]
pub fn world_to_hex(world: Point, layout: &HexLayout) -> Option<HexCoord> {
    let guess = layout.approximate(world);
    let radius_sq = layout.size * layout.size;

    let mut best: Option<(HexCoord, f64)> = None;
    for dr in -1..=1 {
        for dc in -1..=1 {
            let candidate = HexCoord::new(guess.row + dr, guess.col + dc);
            if !layout.contains(candidate) {
                continue;
            }
            let d = layout.center(candidate).distance_sq(world);
            if d >= radius_sq {
                continue;
            }
            if best.is_none_or(|(_, best_d)| d < best_d) {
                best = Some((candidate, d));
            }
        }
    }
    best.map(|(coord, _)| coord)
}
