//! Engine configuration: camera defaults, render colors, and map endpoints.
//!
//! `GridConfig` is plain serde data so hosts can ship it as JSON next to the
//! terrain table. `EngineConfig` bundles it with the non-serializable pieces
//! (URL providers) that only the embedding code can supply.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::Deserialize;

use crate::error::GridError;

pub const DEFAULT_HEX_SIZE: f64 = 20.0;
pub const DEFAULT_ZOOM: f64 = 1.2;
pub const DEFAULT_TILT: f64 = 0.55;
pub const DEFAULT_ROTATION_DEG: f64 = -45.0;
pub const DEFAULT_GRID_ALPHA: f64 = 0.35;
pub const DEFAULT_MIN_ZOOM: f64 = 0.4;
pub const DEFAULT_MAX_ZOOM: f64 = 3.0;

pub const DEFAULT_EMPTY_TERRAIN: &str = "empty";
pub const DEFAULT_BRIDGE_TERRAIN: &str = "bridge";

/// Grid geometry and initial camera parameters.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Hex radius in world units.
    #[serde(alias = "hexSize")]
    pub hex_size: f64,
    pub zoom: f64,
    pub tilt: f64,
    /// Initial rotation in degrees.
    #[serde(alias = "rotation")]
    pub rot: f64,
    #[serde(alias = "gridAlpha")]
    pub grid_alpha: f64,
    #[serde(alias = "minZoom")]
    pub min_zoom: f64,
    #[serde(alias = "maxZoom")]
    pub max_zoom: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            hex_size: DEFAULT_HEX_SIZE,
            zoom: DEFAULT_ZOOM,
            tilt: DEFAULT_TILT,
            rot: DEFAULT_ROTATION_DEG,
            grid_alpha: DEFAULT_GRID_ALPHA,
            min_zoom: DEFAULT_MIN_ZOOM,
            max_zoom: DEFAULT_MAX_ZOOM,
        }
    }
}

impl GridConfig {
    /// Parse a JSON config object. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::Parse`] if the text is not a JSON object of the
    /// expected shape, or if the zoom bounds are inverted or non-positive.
    pub fn from_json(raw: &str) -> Result<Self, GridError> {
        let cfg: Self = serde_json::from_str(raw)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check the invariants the camera relies on.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::Parse`] describing the first violated bound.
    pub fn validate(&self) -> Result<(), GridError> {
        if !(self.hex_size.is_finite() && self.hex_size > 0.0) {
            return Err(GridError::Parse(format!("hex_size must be positive, got {}", self.hex_size)));
        }
        let finite_bounds = self.min_zoom.is_finite() && self.max_zoom.is_finite();
        if !finite_bounds || self.min_zoom <= 0.0 || self.min_zoom > self.max_zoom {
            return Err(GridError::Parse(format!(
                "zoom bounds must satisfy 0 < min <= max, got [{}, {}]",
                self.min_zoom, self.max_zoom
            )));
        }
        Ok(())
    }
}

/// Colors and line widths that are not tied to a terrain type.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RenderStyle {
    pub background: String,
    #[serde(alias = "gridLineColor")]
    pub grid_line_color: String,
    #[serde(alias = "gridLineWidth")]
    pub grid_line_width: f64,
    #[serde(alias = "roadColor")]
    pub road_color: String,
    #[serde(alias = "roadWidth")]
    pub road_width: f64,
    #[serde(alias = "highlightColor")]
    pub highlight_color: String,
    #[serde(alias = "highlightWidth")]
    pub highlight_width: f64,
    #[serde(alias = "fontFamily")]
    pub font_family: String,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            background: "#111418".to_owned(),
            grid_line_color: "#e8e2d0".to_owned(),
            grid_line_width: 1.0,
            road_color: "#c9a25e".to_owned(),
            road_width: 2.0,
            highlight_color: "#ffd166".to_owned(),
            highlight_width: 2.5,
            font_family: "monospace".to_owned(),
        }
    }
}

/// Where a URL comes from: a fixed string or a provider evaluated per request.
pub enum UrlSource {
    Fixed(String),
    Dynamic(Box<dyn Fn() -> String>),
}

impl UrlSource {
    /// Resolve the URL for the next request.
    #[must_use]
    pub fn resolve(&self) -> String {
        match self {
            Self::Fixed(url) => url.clone(),
            Self::Dynamic(provider) => provider(),
        }
    }
}

impl std::fmt::Debug for UrlSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fixed(url) => f.debug_tuple("Fixed").field(url).finish(),
            Self::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

impl From<&str> for UrlSource {
    fn from(url: &str) -> Self {
        Self::Fixed(url.to_owned())
    }
}

impl From<String> for UrlSource {
    fn from(url: String) -> Self {
        Self::Fixed(url)
    }
}

/// Everything an engine instance needs apart from its terrain table and callbacks.
#[derive(Debug)]
pub struct EngineConfig {
    /// DOM id of the target `<canvas>`; only the browser host reads it.
    pub canvas_id: String,
    pub grid: GridConfig,
    pub style: RenderStyle,
    pub fetch_map_url: Option<UrlSource>,
    pub fetch_hex_url: Option<UrlSource>,
    /// DOM id of an element that receives hover/selection text.
    pub hud_element_id: Option<String>,
    /// Reset pan to the origin whenever the canvas is resized.
    pub auto_center_on_resize: bool,
    /// Terrain key used for padding cells and blank terrain strings.
    pub empty_terrain: String,
    /// Terrain key whose glyph is mirrored to follow neighboring bridges.
    pub bridge_terrain: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            canvas_id: String::new(),
            grid: GridConfig::default(),
            style: RenderStyle::default(),
            fetch_map_url: None,
            fetch_hex_url: None,
            hud_element_id: None,
            auto_center_on_resize: false,
            empty_terrain: DEFAULT_EMPTY_TERRAIN.to_owned(),
            bridge_terrain: DEFAULT_BRIDGE_TERRAIN.to_owned(),
        }
    }
}

impl EngineConfig {
    /// Config bound to the given canvas id with every other field defaulted.
    #[must_use]
    pub fn for_canvas(canvas_id: impl Into<String>) -> Self {
        Self { canvas_id: canvas_id.into(), ..Self::default() }
    }
}
