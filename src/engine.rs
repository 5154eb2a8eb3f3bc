//! Hex grid engine: interaction state, camera updates, and redraw dispatch.
//!
//! `EngineCore` holds every piece of per-instance state and turns input into
//! [`Action`]s without touching a canvas, so it can be tested directly.
//! `Engine` wraps a core together with a [`Surface`], dispatches actions to
//! the caller's [`Callbacks`], and coalesces redraw requests into a single
//! synchronous draw.
//!
//! INACTIVE INSTANCES
//! ==================
//! Several engines may share one canvas (a world grid and a city grid). Only
//! the active one reacts to input, resizes the backing store, or draws. An
//! inactive engine still records viewport size so it can draw correctly the
//! moment it is reactivated.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use std::cell::RefCell;
use std::cmp::Ordering;

use serde::Deserialize;
use serde_json::Value;

use crate::camera::{Camera, Point};
use crate::config::{DEFAULT_HEX_SIZE, EngineConfig, GridConfig, RenderStyle, UrlSource};
use crate::consts::WHEEL_ZOOM_STEP;
use crate::error::GridError;
use crate::grid::{Cell, Grid, HexCoord};
use crate::hit::screen_to_hex;
use crate::hud::HoverInfo;
use crate::input::{Button, ClickOutcome, ClickTracker, DragState, TouchGesture, TouchUpdate, WheelDelta};
use crate::layout::HexLayout;
use crate::loader::{Fetch, MapParser, build_grid, default_parser, hex_detail_url};
use crate::render::{self, FrameStats, Scene};
use crate::surface::Surface;
use crate::terrain::TerrainMap;
use crate::viewport::{ResizeOutcome, Viewport, plan_resize};

/// Actions returned from core handlers for the engine to dispatch.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    HexClicked { coord: HexCoord, cell: Cell },
    HexDoubleClicked { coord: HexCoord, cell: Cell },
    HoverChanged(Option<HoverInfo>),
    ZoomChanged(f64),
    RenderNeeded,
}

type CellCallback = Box<dyn FnMut(&Cell, HexCoord)>;

/// Optional observers. Unset callbacks are skipped.
#[derive(Default)]
pub struct Callbacks {
    pub on_hex_click: Option<CellCallback>,
    pub on_hex_double_click: Option<CellCallback>,
    pub on_hover_update: Option<Box<dyn FnMut(Option<&HoverInfo>)>>,
    pub on_zoom_change: Option<Box<dyn FnMut(f64)>>,
}

impl Callbacks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn on_hex_click(mut self, f: impl FnMut(&Cell, HexCoord) + 'static) -> Self {
        self.on_hex_click = Some(Box::new(f));
        self
    }

    #[must_use]
    pub fn on_hex_double_click(mut self, f: impl FnMut(&Cell, HexCoord) + 'static) -> Self {
        self.on_hex_double_click = Some(Box::new(f));
        self
    }

    #[must_use]
    pub fn on_hover_update(mut self, f: impl FnMut(Option<&HoverInfo>) + 'static) -> Self {
        self.on_hover_update = Some(Box::new(f));
        self
    }

    #[must_use]
    pub fn on_zoom_change(mut self, f: impl FnMut(f64) + 'static) -> Self {
        self.on_zoom_change = Some(Box::new(f));
        self
    }
}

/// Partial camera update. Unset fields keep their current value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CameraPatch {
    pub zoom: Option<f64>,
    pub tilt: Option<f64>,
    #[serde(alias = "rotation")]
    pub rot: Option<f64>,
    #[serde(alias = "gridAlpha")]
    pub grid_alpha: Option<f64>,
    #[serde(alias = "panX")]
    pub pan_x: Option<f64>,
    #[serde(alias = "panY")]
    pub pan_y: Option<f64>,
}

impl CameraPatch {
    /// Apply to `camera`, clamping as the camera setters do.
    pub fn apply(&self, camera: &mut Camera) {
        if let Some(zoom) = self.zoom {
            camera.set_zoom(zoom);
        }
        if let Some(tilt) = self.tilt {
            camera.set_tilt(tilt);
        }
        if let Some(rot) = self.rot {
            camera.rotation_deg = rot;
        }
        if let Some(alpha) = self.grid_alpha {
            camera.set_grid_alpha(alpha);
        }
        if let Some(x) = self.pan_x {
            camera.pan_x = x;
        }
        if let Some(y) = self.pan_y {
            camera.pan_y = y;
        }
    }
}

/// Partial engine state update.
#[derive(Debug, Clone, Default)]
pub struct GridPatch {
    /// Replace the whole grid. Hover and selection are cleared.
    pub grid: Option<Grid>,
    pub camera: Option<CameraPatch>,
    /// `Some(None)` clears the selection.
    pub selected: Option<Option<HexCoord>>,
}

impl GridPatch {
    #[must_use]
    pub fn grid(grid: Grid) -> Self {
        Self { grid: Some(grid), ..Self::default() }
    }
}

/// Read-only view of an engine's state.
#[derive(Debug, Clone, Copy)]
pub struct GridState<'a> {
    pub grid: &'a Grid,
    pub camera: Camera,
    pub viewport: Viewport,
    pub hovered: Option<HexCoord>,
    pub selected: Option<HexCoord>,
    pub active: bool,
}

// =============================================================
// EngineCore
// =============================================================

/// Core engine state: all logic that doesn't depend on a drawing surface.
pub struct EngineCore {
    pub grid: Grid,
    pub terrain: TerrainMap,
    pub camera: Camera,
    pub viewport: Viewport,
    pub hex_size: f64,
    pub active: bool,
    pub hovered: Option<HexCoord>,
    pub selected: Option<HexCoord>,
    pub auto_center_on_resize: bool,
    drag: DragState,
    touch: TouchGesture,
    clicks: ClickTracker<Option<HexCoord>>,
    swallow_click: bool,
}

impl EngineCore {
    /// A non-positive or non-finite `hex_size` falls back to the default.
    #[must_use]
    pub fn new(config: &GridConfig, terrain: TerrainMap) -> Self {
        let hex_size = if config.hex_size.is_finite() && config.hex_size > 0.0 {
            config.hex_size
        } else {
            log::warn!("invalid hex_size {}, using {DEFAULT_HEX_SIZE}", config.hex_size);
            DEFAULT_HEX_SIZE
        };
        Self {
            grid: Grid::default(),
            terrain,
            camera: Camera::from_config(config),
            viewport: Viewport::default(),
            hex_size,
            active: true,
            hovered: None,
            selected: None,
            auto_center_on_resize: false,
            drag: DragState::default(),
            touch: TouchGesture::default(),
            clicks: ClickTracker::default(),
            swallow_click: false,
        }
    }

    // --- Queries ---

    #[must_use]
    pub fn layout(&self) -> HexLayout {
        HexLayout::new(self.hex_size, self.grid.rows(), self.grid.cols())
    }

    /// The in-bounds hex under a screen point, if any.
    #[must_use]
    pub fn hex_at(&self, screen: Point) -> Option<HexCoord> {
        screen_to_hex(screen, &self.camera, &self.layout(), self.viewport.center())
    }

    #[must_use]
    pub fn hover_info(&self, coord: HexCoord) -> Option<HoverInfo> {
        self.grid.get(coord).map(|cell| HoverInfo::new(coord, cell, &self.terrain))
    }

    /// Deadline of the pending single click, for scheduling a poll.
    #[must_use]
    pub fn click_deadline(&self) -> Option<f64> {
        self.clicks.deadline()
    }

    #[must_use]
    pub fn state(&self) -> GridState<'_> {
        GridState {
            grid: &self.grid,
            camera: self.camera,
            viewport: self.viewport,
            hovered: self.hovered,
            selected: self.selected,
            active: self.active,
        }
    }

    // --- Pointer ---

    pub fn on_pointer_down(&mut self, screen: Point, button: Button) -> Vec<Action> {
        self.swallow_click = false;
        if self.active && button == Button::Primary {
            self.drag.start(screen);
        }
        Vec::new()
    }

    pub fn on_pointer_move(&mut self, screen: Point) -> Vec<Action> {
        if !self.active {
            return Vec::new();
        }
        let mut actions = Vec::new();
        let mut render = false;
        if let Some((dx, dy)) = self.drag.advance(screen)
            && dx.abs() + dy.abs() > 0.0
        {
            self.camera.pan_by(dx, dy);
            render = true;
        }
        let hex = self.hex_at(screen);
        if hex != self.hovered {
            self.hovered = hex;
            actions.push(Action::HoverChanged(hex.and_then(|c| self.hover_info(c))));
            render = true;
        }
        if render {
            actions.push(Action::RenderNeeded);
        }
        actions
    }

    /// Pointer released anywhere in the window.
    pub fn on_pointer_up(&mut self) -> Vec<Action> {
        if self.drag.finish() {
            self.swallow_click = true;
        }
        Vec::new()
    }

    /// Pointer left the canvas. Drags continue until the window sees the release.
    pub fn on_pointer_leave(&mut self) -> Vec<Action> {
        if !self.active || self.hovered.is_none() {
            return Vec::new();
        }
        self.hovered = None;
        vec![Action::HoverChanged(None), Action::RenderNeeded]
    }

    // --- Clicks ---

    /// A raw click at `screen` at time `now_ms`.
    pub fn on_click(&mut self, screen: Point, now_ms: f64) -> Vec<Action> {
        if !self.active {
            return Vec::new();
        }
        if std::mem::take(&mut self.swallow_click) {
            return Vec::new();
        }
        let hex = self.hex_at(screen);
        let outcomes = self.clicks.register(hex, now_ms);
        outcomes.into_iter().flat_map(|o| self.resolve_click(o)).collect()
    }

    /// Fire the pending single click once its deadline has passed.
    pub fn poll_clicks(&mut self, now_ms: f64) -> Vec<Action> {
        if !self.active {
            return Vec::new();
        }
        self.clicks.poll(now_ms).map(|o| self.resolve_click(o)).unwrap_or_default()
    }

    fn resolve_click(&mut self, outcome: ClickOutcome<Option<HexCoord>>) -> Vec<Action> {
        let (coord, double) = match outcome {
            ClickOutcome::Single(hex) => (hex, false),
            ClickOutcome::Double(hex) => (hex, true),
        };
        let Some((coord, cell)) = coord.and_then(|c| self.grid.get(c).map(|cell| (c, cell.clone()))) else {
            return Vec::new();
        };
        if double {
            return vec![Action::HexDoubleClicked { coord, cell }];
        }
        self.selected = Some(coord);
        vec![Action::HexClicked { coord, cell }, Action::RenderNeeded]
    }

    // --- Wheel and touch ---

    pub fn on_wheel(&mut self, delta: WheelDelta) -> Vec<Action> {
        if !self.active {
            return Vec::new();
        }
        let step = match delta.dy.partial_cmp(&0.0) {
            Some(Ordering::Less) => WHEEL_ZOOM_STEP,
            Some(Ordering::Greater) => -WHEEL_ZOOM_STEP,
            _ => return Vec::new(),
        };
        self.zoom_actions(self.camera.zoom + step)
    }

    pub fn on_touch_start(&mut self, touches: &[Point]) -> Vec<Action> {
        if self.active {
            self.touch.begin(touches);
        }
        Vec::new()
    }

    pub fn on_touch_move(&mut self, touches: &[Point]) -> Vec<Action> {
        if !self.active {
            return Vec::new();
        }
        match self.touch.update(touches) {
            Some(TouchUpdate::Pan { dx, dy }) => {
                self.camera.pan_by(dx, dy);
                vec![Action::RenderNeeded]
            }
            Some(TouchUpdate::Zoom(factor)) => self.zoom_actions(self.camera.zoom * factor),
            None => Vec::new(),
        }
    }

    /// `remaining` are the fingers still down.
    pub fn on_touch_end(&mut self, remaining: &[Point]) -> Vec<Action> {
        self.touch.begin(remaining);
        Vec::new()
    }

    fn zoom_actions(&mut self, zoom: f64) -> Vec<Action> {
        if self.camera.set_zoom(zoom) {
            vec![Action::ZoomChanged(self.camera.zoom), Action::RenderNeeded]
        } else {
            Vec::new()
        }
    }

    // --- State ---

    pub fn set_state(&mut self, patch: GridPatch) -> Vec<Action> {
        let mut actions = Vec::new();
        if let Some(grid) = patch.grid {
            self.grid = grid;
            self.selected = None;
            self.clicks.cancel();
            if self.hovered.take().is_some() {
                actions.push(Action::HoverChanged(None));
            }
        }
        if let Some(camera) = patch.camera {
            camera.apply(&mut self.camera);
        }
        if let Some(selected) = patch.selected {
            self.selected = selected.filter(|c| self.grid.contains(*c));
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    pub fn update_params(&mut self, patch: CameraPatch) -> Vec<Action> {
        patch.apply(&mut self.camera);
        vec![Action::RenderNeeded]
    }

    pub fn center_grid(&mut self) -> Vec<Action> {
        self.camera.recenter();
        vec![Action::RenderNeeded]
    }

    /// Switch input handling and drawing on or off.
    ///
    /// Activating asks for one redraw at the recorded viewport. Deactivating drops any drag, touch, pending click, and hover without
    /// notifying observers.
    pub fn set_active(&mut self, active: bool) -> Vec<Action> {
        if self.active == active {
            return Vec::new();
        }
        self.active = active;
        if active {
            return vec![Action::RenderNeeded];
        }
        self.drag.finish();
        self.touch.begin(&[]);
        self.clicks.cancel();
        self.swallow_click = false;
        self.hovered = None;
        Vec::new()
    }

    /// Record a new viewport and decide what the surface must do.
    pub fn resize(&mut self, next: Viewport, backing: (u32, u32)) -> ResizeOutcome {
        let outcome = plan_resize(self.viewport, backing, next, self.active);
        match outcome {
            ResizeOutcome::Retry | ResizeOutcome::Unchanged => {}
            ResizeOutcome::Recorded => self.viewport = next,
            ResizeOutcome::Resized { .. } => {
                self.viewport = next;
                if self.auto_center_on_resize {
                    self.camera.recenter();
                }
            }
        }
        outcome
    }
}

// =============================================================
// Engine
// =============================================================

/// The full engine: a core bound to a drawing surface and observers.
pub struct Engine<S: Surface> {
    surface: S,
    pub core: EngineCore,
    style: RenderStyle,
    bridge_terrain: String,
    fetch_map_url: Option<UrlSource>,
    fetch_hex_url: Option<UrlSource>,
    parser: MapParser,
    callbacks: Callbacks,
}

impl<S: Surface> Engine<S> {
    /// `config.empty_terrain` replaces the terrain table's empty key.
    #[must_use]
    pub fn new(surface: S, config: EngineConfig, terrain: TerrainMap, callbacks: Callbacks) -> Self {
        let terrain = terrain.with_empty_key(config.empty_terrain);
        let mut core = EngineCore::new(&config.grid, terrain);
        core.auto_center_on_resize = config.auto_center_on_resize;
        Self {
            surface,
            core,
            style: config.style,
            bridge_terrain: config.bridge_terrain,
            fetch_map_url: config.fetch_map_url,
            fetch_hex_url: config.fetch_hex_url,
            parser: Box::new(default_parser),
            callbacks,
        }
    }

    /// Replace the map payload parser.
    #[must_use]
    pub fn with_parser(mut self, parser: MapParser) -> Self {
        self.parser = parser;
        self
    }

    pub fn set_parser(&mut self, parser: MapParser) {
        self.parser = parser;
    }

    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    #[must_use]
    pub fn state(&self) -> GridState<'_> {
        self.core.state()
    }

    #[must_use]
    pub fn click_deadline(&self) -> Option<f64> {
        self.core.click_deadline()
    }

    /// Hover info for the selected cell, used when nothing is hovered.
    #[must_use]
    pub fn selection_info(&self) -> Option<HoverInfo> {
        self.core.selected.and_then(|c| self.core.hover_info(c))
    }

    /// HUD line for the hovered cell, else the selected cell, else empty.
    #[must_use]
    pub fn hud_text(&self) -> String {
        self.core
            .hovered
            .and_then(|c| self.core.hover_info(c))
            .or_else(|| self.selection_info())
            .map(|info| info.hud_text())
            .unwrap_or_default()
    }

    /// Text the host should write to the HUD element, or `None` while inactive.
    #[must_use]
    pub fn hud_update(&self) -> Option<String> {
        self.core.active.then(|| self.hud_text())
    }

    // --- Delegated input ---

    /// # Errors
    ///
    /// Returns `Err` if a triggered redraw fails.
    pub fn on_pointer_down(&mut self, screen: Point, button: Button) -> Result<(), GridError> {
        let actions = self.core.on_pointer_down(screen, button);
        self.dispatch(actions)
    }

    /// # Errors
    ///
    /// Returns `Err` if a triggered redraw fails.
    pub fn on_pointer_move(&mut self, screen: Point) -> Result<(), GridError> {
        let actions = self.core.on_pointer_move(screen);
        self.dispatch(actions)
    }

    /// # Errors
    ///
    /// Returns `Err` if a triggered redraw fails.
    pub fn on_pointer_up(&mut self) -> Result<(), GridError> {
        let actions = self.core.on_pointer_up();
        self.dispatch(actions)
    }

    /// # Errors
    ///
    /// Returns `Err` if a triggered redraw fails.
    pub fn on_pointer_leave(&mut self) -> Result<(), GridError> {
        let actions = self.core.on_pointer_leave();
        self.dispatch(actions)
    }

    /// # Errors
    ///
    /// Returns `Err` if a triggered redraw fails.
    pub fn on_click(&mut self, screen: Point, now_ms: f64) -> Result<(), GridError> {
        let actions = self.core.on_click(screen, now_ms);
        self.dispatch(actions)
    }

    /// # Errors
    ///
    /// Returns `Err` if a triggered redraw fails.
    pub fn poll_clicks(&mut self, now_ms: f64) -> Result<(), GridError> {
        let actions = self.core.poll_clicks(now_ms);
        self.dispatch(actions)
    }

    /// # Errors
    ///
    /// Returns `Err` if a triggered redraw fails.
    pub fn on_wheel(&mut self, delta: WheelDelta) -> Result<(), GridError> {
        let actions = self.core.on_wheel(delta);
        self.dispatch(actions)
    }

    /// # Errors
    ///
    /// Returns `Err` if a triggered redraw fails.
    pub fn on_touch_start(&mut self, touches: &[Point]) -> Result<(), GridError> {
        let actions = self.core.on_touch_start(touches);
        self.dispatch(actions)
    }

    /// # Errors
    ///
    /// Returns `Err` if a triggered redraw fails.
    pub fn on_touch_move(&mut self, touches: &[Point]) -> Result<(), GridError> {
        let actions = self.core.on_touch_move(touches);
        self.dispatch(actions)
    }

    /// # Errors
    ///
    /// Returns `Err` if a triggered redraw fails.
    pub fn on_touch_end(&mut self, remaining: &[Point]) -> Result<(), GridError> {
        let actions = self.core.on_touch_end(remaining);
        self.dispatch(actions)
    }

    // --- Delegated state ---

    /// # Errors
    ///
    /// Returns `Err` if the redraw fails.
    pub fn set_state(&mut self, patch: GridPatch) -> Result<(), GridError> {
        let actions = self.core.set_state(patch);
        self.dispatch(actions)
    }

    /// # Errors
    ///
    /// Returns `Err` if the redraw fails.
    pub fn update_params(&mut self, patch: CameraPatch) -> Result<(), GridError> {
        let actions = self.core.update_params(patch);
        self.dispatch(actions)
    }

    /// # Errors
    ///
    /// Returns `Err` if the redraw fails.
    pub fn center_grid(&mut self) -> Result<(), GridError> {
        let actions = self.core.center_grid();
        self.dispatch(actions)
    }

    /// Switch the instance on or off.
    ///
    /// On activation the backing store is brought in line with the viewport
    /// recorded while inactive, then the grid is drawn once.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the redraw on activation fails.
    pub fn set_active(&mut self, active: bool) -> Result<(), GridError> {
        let actions = self.core.set_active(active);
        if !actions.is_empty() && !self.core.viewport.is_zero() {
            let (width_px, height_px) = self.core.viewport.backing_size();
            if self.surface.backing_size() != (width_px, height_px) {
                self.surface.set_backing_size(width_px, height_px);
            }
        }
        self.dispatch(actions)
    }

    /// Apply a new CSS size and device pixel ratio.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the redraw after resizing fails.
    pub fn resize(&mut self, css_width: f64, css_height: f64, dpr: f64) -> Result<ResizeOutcome, GridError> {
        let next = Viewport::new(css_width, css_height, dpr);
        let outcome = self.core.resize(next, self.surface.backing_size());
        match outcome {
            ResizeOutcome::Retry => log::debug!("canvas not laid out yet ({css_width}x{css_height}), retrying"),
            ResizeOutcome::Resized { width_px, height_px } => {
                self.surface.set_backing_size(width_px, height_px);
                self.draw_grid(None)?;
            }
            ResizeOutcome::Recorded | ResizeOutcome::Unchanged => {}
        }
        Ok(outcome)
    }

    /// Draw one frame. `highlight` also becomes the selection.
    ///
    /// Returns `None` without touching the surface when inactive.
    ///
    /// # Errors
    ///
    /// Returns `Err` if a surface call fails.
    pub fn draw_grid(&mut self, highlight: Option<HexCoord>) -> Result<Option<FrameStats>, GridError> {
        if !self.core.active {
            return Ok(None);
        }
        if let Some(coord) = highlight.filter(|c| self.core.grid.contains(*c)) {
            self.core.selected = Some(coord);
        }
        let scene = Scene {
            grid: &self.core.grid,
            terrain: &self.core.terrain,
            layout: self.core.layout(),
            camera: &self.core.camera,
            style: &self.style,
            viewport: self.core.viewport,
            bridge_terrain: &self.bridge_terrain,
            hovered: self.core.hovered,
            highlight: self.core.selected,
        };
        render::draw(&mut self.surface, &scene).map(Some)
    }

    // --- Loading ---

    /// Resolve the configured map URL.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::NoMapUrl`] if none is configured.
    pub fn map_url(&self) -> Result<String, GridError> {
        self.fetch_map_url.as_ref().map(UrlSource::resolve).ok_or(GridError::NoMapUrl)
    }

    /// Detail URL for one hex: the configured hex URL plus `row`/`col`.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::NoHexUrl`] if none is configured.
    pub fn hex_detail_url(&self, coord: HexCoord) -> Result<String, GridError> {
        let base = self.fetch_hex_url.as_ref().map(UrlSource::resolve).ok_or(GridError::NoHexUrl)?;
        Ok(hex_detail_url(&base, coord))
    }

    /// Apply a fetched map payload. On any failure the current grid is kept.
    pub fn apply_map_payload(&mut self, payload: Result<Value, GridError>) -> bool {
        let grid = match payload.and_then(|raw| build_grid(raw, &*self.parser)) {
            Ok(grid) => grid,
            Err(e) => {
                log::warn!("map load failed: {e}");
                return false;
            }
        };
        log::info!("map loaded: {}x{}", grid.rows(), grid.cols());
        if let Err(e) = self.set_state(GridPatch::grid(grid)) {
            log::warn!("draw after map load failed: {e}");
        }
        true
    }

    /// Fetch the configured map and apply it. Resolves `false` on failure.
    ///
    /// The engine is borrowed only to read the URL and to apply the result,
    /// never across the request, so input keeps flowing while it is in flight.
    pub async fn load_map<F: Fetch>(engine: &RefCell<Self>, fetch: &F) -> bool {
        let url = engine.try_borrow().map_or(Err(GridError::Busy), |e| e.map_url());
        let url = match url {
            Ok(url) => url,
            Err(e) => {
                log::warn!("map load skipped: {e}");
                return false;
            }
        };
        let payload = fetch.get_json(&url).await;
        match engine.try_borrow_mut() {
            Ok(mut e) => e.apply_map_payload(payload),
            Err(_) => {
                log::warn!("map load dropped: {}", GridError::Busy);
                false
            }
        }
    }

    /// Fetch the raw detail payload for one hex.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::NoHexUrl`], [`GridError::Busy`] if the engine is
    /// mid-update, or any fetch failure.
    pub async fn fetch_hex_detail<F: Fetch>(
        engine: &RefCell<Self>,
        fetch: &F,
        coord: HexCoord,
    ) -> Result<Value, GridError> {
        let url = engine.try_borrow().map_err(|_| GridError::Busy)?.hex_detail_url(coord)?;
        fetch.get_json(&url).await
    }

    // --- Dispatch ---

    fn dispatch(&mut self, actions: Vec<Action>) -> Result<(), GridError> {
        let mut render = false;
        for action in actions {
            match action {
                Action::HexClicked { coord, cell } => {
                    if let Some(f) = self.callbacks.on_hex_click.as_mut() {
                        f(&cell, coord);
                    }
                }
                Action::HexDoubleClicked { coord, cell } => {
                    if let Some(f) = self.callbacks.on_hex_double_click.as_mut() {
                        f(&cell, coord);
                    }
                }
                Action::HoverChanged(info) => {
                    if let Some(f) = self.callbacks.on_hover_update.as_mut() {
                        f(info.as_ref());
                    }
                }
                Action::ZoomChanged(zoom) => {
                    if let Some(f) = self.callbacks.on_zoom_change.as_mut() {
                        f(zoom);
                    }
                }
                Action::RenderNeeded => render = true,
            }
        }
        if render {
            self.draw_grid(None)?;
        }
        Ok(())
    }
}
