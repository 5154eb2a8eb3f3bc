#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use crate::config::{
    DEFAULT_GRID_ALPHA, DEFAULT_MAX_ZOOM, DEFAULT_MIN_ZOOM, DEFAULT_ROTATION_DEG, DEFAULT_TILT, DEFAULT_ZOOM, GridConfig,
};
use crate::consts::MIN_TILT;

/// A point in either screen or world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn distance_sq(self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }
}

/// Camera state for the oblique hex projection.
///
/// `pan_x` / `pan_y` are in CSS pixels, measured from the viewport center.
/// `zoom` is a scale factor (1.0 = one world unit per pixel). `rotation_deg`
/// spins the grid around the world origin, and `tilt` squashes the y axis
/// after scaling to fake a viewing angle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub pan_x: f64,
    pub pan_y: f64,
    pub zoom: f64,
    pub rotation_deg: f64,
    pub tilt: f64,
    pub grid_alpha: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self::from_config(&GridConfig::default())
    }
}

impl Camera {
    /// Build a camera from the configured initial parameters, clamping each one.
    ///
    /// Inverted zoom bounds are swapped; non-positive or non-finite bounds fall
    /// back to the defaults. NaN parameters keep their defaults.
    #[must_use]
    pub fn from_config(cfg: &GridConfig) -> Self {
        let (min_zoom, max_zoom) = zoom_bounds(cfg.min_zoom, cfg.max_zoom);
        let mut cam = Self {
            pan_x: 0.0,
            pan_y: 0.0,
            zoom: DEFAULT_ZOOM.clamp(min_zoom, max_zoom),
            rotation_deg: if cfg.rot.is_finite() { cfg.rot } else { DEFAULT_ROTATION_DEG },
            tilt: DEFAULT_TILT,
            grid_alpha: DEFAULT_GRID_ALPHA,
            min_zoom,
            max_zoom,
        };
        cam.set_zoom(cfg.zoom);
        cam.set_tilt(cfg.tilt);
        cam.set_grid_alpha(cfg.grid_alpha);
        cam
    }

    /// Set zoom, clamped to `[min_zoom, max_zoom]`. Returns `true` if it changed.
    /// NaN is ignored.
    pub fn set_zoom(&mut self, zoom: f64) -> bool {
        if zoom.is_nan() {
            return false;
        }
        let next = zoom.clamp(self.min_zoom, self.max_zoom);
        let changed = (next - self.zoom).abs() > f64::EPSILON;
        self.zoom = next;
        changed
    }

    /// Adjust zoom by `delta`, clamped. Returns `true` if it changed.
    pub fn zoom_by(&mut self, delta: f64) -> bool {
        self.set_zoom(self.zoom + delta)
    }

    pub fn set_tilt(&mut self, tilt: f64) {
        if tilt.is_nan() {
            return;
        }
        self.tilt = tilt.clamp(MIN_TILT, 1.0);
    }

    pub fn set_grid_alpha(&mut self, alpha: f64) {
        if alpha.is_nan() {
            return;
        }
        self.grid_alpha = alpha.clamp(0.0, 1.0);
    }

    /// Shift the camera by a raw screen-pixel delta.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.pan_x += dx;
        self.pan_y += dy;
    }

    /// Put the world origin back at the viewport center.
    pub fn recenter(&mut self) {
        self.pan_x = 0.0;
        self.pan_y = 0.0;
    }

    /// Convert a world-space point to screen coordinates (CSS pixels).
    ///
    /// `center` is the screen-space center of the viewport.
    /// Order: rotate, scale by zoom, squash y by tilt, translate.
    #[must_use]
    pub fn world_to_screen(&self, world: Point, center: Point) -> Point {
        let (sin, cos) = self.rotation_deg.to_radians().sin_cos();
        let rx = world.x * cos - world.y * sin;
        let ry = world.x * sin + world.y * cos;
        Point {
            x: rx * self.zoom + self.pan_x + center.x,
            y: ry * self.zoom * self.tilt + self.pan_y + center.y,
        }
    }

    /// Convert a screen-space point (CSS pixels) to world coordinates.
    ///
    /// Exact inverse of [`Camera::world_to_screen`] for the same `center`.
    #[must_use]
    pub fn screen_to_world(&self, screen: Point, center: Point) -> Point {
        let rx = (screen.x - self.pan_x - center.x) / self.zoom;
        let ry = (screen.y - self.pan_y - center.y) / (self.zoom * self.tilt);
        let (sin, cos) = self.rotation_deg.to_radians().sin_cos();
        Point {
            x: rx * cos + ry * sin,
            y: -rx * sin + ry * cos,
        }
    }

    /// Convert a world-space distance to an approximate on-screen length.
    ///
    /// Uses the vertical scale, which is the smaller of the two axes.
    #[must_use]
    pub fn world_dist_to_screen_min(&self, world_dist: f64) -> f64 {
        world_dist * self.zoom * self.tilt
    }
}

fn zoom_bounds(min: f64, max: f64) -> (f64, f64) {
    let usable = |z: f64| z.is_finite() && z > 0.0;
    if !usable(min) || !usable(max) {
        return (DEFAULT_MIN_ZOOM, DEFAULT_MAX_ZOOM);
    }
    (min.min(max), min.max(max))
}
