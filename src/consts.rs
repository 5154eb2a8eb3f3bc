//! Shared numeric constants for the hex grid engine.

// ── Layout ──────────────────────────────────────────────────────

/// √3, the ratio of a pointy-top hex's width to its radius.
pub const SQRT_3: f64 = 1.732_050_807_568_877_2;

/// Vertical distance between row centers, in hex radii.
pub const ROW_STEP_RATIO: f64 = 1.5;

/// Angle of the first polygon vertex, in degrees.
pub const FIRST_VERTEX_DEG: f64 = -30.0;

/// Largest row or column count a map payload may declare.
pub const MAX_GRID_DIM: usize = 4096;

/// Largest total cell count a map payload may declare.
pub const MAX_GRID_CELLS: usize = 1 << 20;

// ── Camera ──────────────────────────────────────────────────────

/// Zoom change applied per wheel notch.
pub const WHEEL_ZOOM_STEP: f64 = 0.05;

/// Lower bound for the vertical tilt factor. Zero would collapse the y axis.
pub const MIN_TILT: f64 = 0.05;

// ── Input ───────────────────────────────────────────────────────

/// Window in which a second click turns a pending single click into a double click.
pub const DOUBLE_CLICK_WINDOW_MS: f64 = 250.0;

/// Pointer travel (CSS pixels) after which a drag swallows the trailing click.
pub const DRAG_CLICK_SLOP_PX: f64 = 4.0;

// ── Rendering ───────────────────────────────────────────────────

/// Fraction trimmed from each end of a hex edge when stroking grid lines.
pub const EDGE_GAP_FRACTION: f64 = 0.15;

/// Upper bound on the off-grid padding ring, in cells.
pub const MAX_PAD: i32 = 48;

/// Road dash pattern in world units: `[dash, gap]`.
pub const ROAD_DASH: [f64; 2] = [4.0, 3.0];

/// Glyph font size as a fraction of the projected hex radius.
pub const GLYPH_SCALE: f64 = 0.9;

// ── Resize ──────────────────────────────────────────────────────

/// Delay before retrying a resize against a canvas that has not been laid out yet.
pub const RESIZE_RETRY_MS: u32 = 50;
