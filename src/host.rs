//! Browser host: binds an [`Engine`] to a `<canvas>` and the page around it.
//!
//! Everything here touches the DOM and is therefore untested; the logic it
//! drives lives in [`crate::engine`].
//!
//! WIRING
//! ======
//! - Mouse down/move/leave, click, wheel, and touch listeners on the canvas.
//! - Mouse up on the window, so a drag released outside the canvas still ends.
//! - A `ResizeObserver` on the canvas and its parent plus window `resize`,
//!   coalesced into one resize pass per animation frame.
//! - A `gloo-timers` timeout that polls the click tracker when a pending single
//!   click expires, and another that retries a resize against an unlaid-out
//!   canvas.
//!
//! Callbacks run while the engine is borrowed. They must not call back into
//! the [`GridHandle`] synchronously; such calls are dropped with a debug log.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use js_sys::Date;
use serde_json::Value;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{
    AddEventListenerOptions, Element, Event, EventTarget, HtmlCanvasElement, MouseEvent, ResizeObserver, TouchEvent,
    TouchList, WheelEvent,
};

use crate::camera::Point;
use crate::config::EngineConfig;
use crate::consts::RESIZE_RETRY_MS;
use crate::engine::{Callbacks, CameraPatch, Engine, GridPatch, GridState};
use crate::error::GridError;
use crate::grid::HexCoord;
use crate::input::{Button, WheelDelta};
use crate::loader::{HttpFetch, MapParser};
use crate::surface::{CanvasSurface, js_message};
use crate::terrain::TerrainMap;
use crate::viewport::ResizeOutcome;

type SharedEngine = Rc<RefCell<Engine<CanvasSurface>>>;

/// Install the `console_log` logger and the panic hook. Safe to call twice.
pub fn init_logging(level: log::Level) {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(level).is_err() {
        log::debug!("logger already installed");
    }
}

/// Per-mount state shared by every listener and timer.
struct Host {
    engine: SharedEngine,
    canvas: HtmlCanvasElement,
    hud: Option<Element>,
    click_timer: RefCell<Option<Timeout>>,
    resize_retry: RefCell<Option<Timeout>>,
    raf_pending: Cell<bool>,
    raf_callback: RefCell<Option<Closure<dyn FnMut(f64)>>>,
}

impl Host {
    /// Run `f` against the engine, log failures, and refresh the HUD.
    fn run(&self, f: impl FnOnce(&mut Engine<CanvasSurface>) -> Result<(), GridError>) {
        let Ok(mut engine) = self.engine.try_borrow_mut() else {
            log::debug!("engine busy, event dropped");
            return;
        };
        if let Err(e) = f(&mut engine) {
            log::warn!("grid update failed: {e}");
        }
        self.write_hud(&engine);
    }

    /// Inactive engines leave the shared HUD element to the active one.
    fn write_hud(&self, engine: &Engine<CanvasSurface>) {
        if let (Some(hud), Some(text)) = (&self.hud, engine.hud_update()) {
            hud.set_text_content(Some(&text));
        }
    }

    fn refresh_hud(&self) {
        match self.engine.try_borrow() {
            Ok(engine) => self.write_hud(&engine),
            Err(_) => log::debug!("engine busy, HUD not refreshed"),
        }
    }

    /// Canvas CSS size and the window's device pixel ratio.
    fn measure(&self) -> (f64, f64, f64) {
        let dpr = web_sys::window().map_or(1.0, |w| w.device_pixel_ratio());
        (f64::from(self.canvas.client_width()), f64::from(self.canvas.client_height()), dpr)
    }

    /// Drop pending timers and frame callbacks so nothing keeps the host alive.
    fn cancel_pending(&self) {
        self.click_timer.borrow_mut().take();
        self.resize_retry.borrow_mut().take();
        self.raf_callback.borrow_mut().take();
        self.raf_pending.set(false);
    }
}

// =============================================================
// Resize
// =============================================================

fn resize_now(host: &Rc<Host>) {
    let (width, height, dpr) = host.measure();
    let mut retry = false;
    host.run(|engine| {
        retry = engine.resize(width, height, dpr)? == ResizeOutcome::Retry;
        Ok(())
    });
    if retry {
        let host_for_retry = Rc::clone(host);
        let timeout = Timeout::new(RESIZE_RETRY_MS, move || {
            host_for_retry.resize_retry.borrow_mut().take();
            request_resize(&host_for_retry);
        });
        *host.resize_retry.borrow_mut() = Some(timeout);
    }
}

/// Coalesce resize notifications into one pass on the next animation frame.
fn request_resize(host: &Rc<Host>) {
    if host.raf_pending.get() {
        return;
    }
    host.raf_pending.set(true);

    let Some(window) = web_sys::window() else {
        host.raf_pending.set(false);
        resize_now(host);
        return;
    };

    let host_for_cb = Rc::clone(host);
    let cb = Closure::wrap(Box::new(move |_ts: f64| {
        host_for_cb.raf_pending.set(false);
        resize_now(&host_for_cb);
        host_for_cb.raf_callback.borrow_mut().take();
    }) as Box<dyn FnMut(f64)>);

    if window.request_animation_frame(cb.as_ref().unchecked_ref()).is_ok() {
        *host.raf_callback.borrow_mut() = Some(cb);
    } else {
        host.raf_pending.set(false);
        resize_now(host);
    }
}

// =============================================================
// Clicks
// =============================================================

/// Arm a timeout for the pending single click, replacing any earlier one.
fn schedule_click_poll(host: &Rc<Host>) {
    let Some(deadline) = host.engine.try_borrow().map_or(None, |e| e.click_deadline()) else {
        host.click_timer.borrow_mut().take();
        return;
    };
    let wait = deadline_delay_ms(deadline, Date::now());
    let host_for_timer = Rc::clone(host);
    let timeout = Timeout::new(wait, move || {
        host_for_timer.run(|engine| engine.poll_clicks(Date::now()));
        schedule_click_poll(&host_for_timer);
    });
    *host.click_timer.borrow_mut() = Some(timeout);
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn deadline_delay_ms(deadline: f64, now: f64) -> u32 {
    (deadline - now).ceil().clamp(0.0, f64::from(u32::MAX)) as u32
}

// =============================================================
// Listeners
// =============================================================

/// An attached DOM listener, removed again on drop.
struct Listener {
    target: EventTarget,
    kind: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
    fn attach(target: &EventTarget, kind: &'static str, handler: impl FnMut(Event) + 'static) -> Result<Self, GridError> {
        let callback = Closure::<dyn FnMut(Event)>::new(handler);
        target
            .add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref())
            .map_err(|e| GridError::Dom(js_message(&e)))?;
        Ok(Self { target: target.clone(), kind, callback })
    }

    /// Attach as a non-passive listener so the handler may call `prevent_default`.
    fn attach_active(
        target: &EventTarget,
        kind: &'static str,
        handler: impl FnMut(Event) + 'static,
    ) -> Result<Self, GridError> {
        let callback = Closure::<dyn FnMut(Event)>::new(handler);
        let options = AddEventListenerOptions::new();
        options.set_passive(false);
        target
            .add_event_listener_with_callback_and_add_event_listener_options(
                kind,
                callback.as_ref().unchecked_ref(),
                &options,
            )
            .map_err(|e| GridError::Dom(js_message(&e)))?;
        Ok(Self { target: target.clone(), kind, callback })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        if let Err(e) = self
            .target
            .remove_event_listener_with_callback(self.kind, self.callback.as_ref().unchecked_ref())
        {
            log::debug!("failed to remove {} listener: {}", self.kind, js_message(&e));
        }
    }
}

fn mouse_point(event: &MouseEvent) -> Point {
    Point::new(f64::from(event.offset_x()), f64::from(event.offset_y()))
}

fn touch_points(canvas: &HtmlCanvasElement, touches: &TouchList) -> Vec<Point> {
    let rect = canvas.get_bounding_client_rect();
    (0..touches.length())
        .filter_map(|i| touches.get(i))
        .map(|t| Point::new(f64::from(t.client_x()) - rect.left(), f64::from(t.client_y()) - rect.top()))
        .collect()
}

fn bind_listeners(host: &Rc<Host>, window: &web_sys::Window) -> Result<Vec<Listener>, GridError> {
    let canvas: &EventTarget = host.canvas.as_ref();
    let mut listeners = Vec::new();

    let h = Rc::clone(host);
    listeners.push(Listener::attach(canvas, "mousedown", move |event| {
        if let Some(e) = event.dyn_ref::<MouseEvent>() {
            let (at, button) = (mouse_point(e), Button::from_dom(e.button()));
            h.run(|engine| engine.on_pointer_down(at, button));
        }
    })?);

    let h = Rc::clone(host);
    listeners.push(Listener::attach(canvas, "mousemove", move |event| {
        if let Some(e) = event.dyn_ref::<MouseEvent>() {
            let at = mouse_point(e);
            h.run(|engine| engine.on_pointer_move(at));
        }
    })?);

    let h = Rc::clone(host);
    listeners.push(Listener::attach(canvas, "mouseleave", move |_| {
        h.run(Engine::on_pointer_leave);
    })?);

    let h = Rc::clone(host);
    listeners.push(Listener::attach(window.as_ref(), "mouseup", move |_| {
        h.run(Engine::on_pointer_up);
    })?);

    let h = Rc::clone(host);
    listeners.push(Listener::attach(canvas, "click", move |event| {
        if let Some(e) = event.dyn_ref::<MouseEvent>() {
            let at = mouse_point(e);
            h.run(|engine| engine.on_click(at, Date::now()));
            schedule_click_poll(&h);
        }
    })?);

    let h = Rc::clone(host);
    listeners.push(Listener::attach_active(canvas, "wheel", move |event| {
        if let Some(e) = event.dyn_ref::<WheelEvent>() {
            e.prevent_default();
            let delta = WheelDelta { dx: e.delta_x(), dy: e.delta_y() };
            h.run(|engine| engine.on_wheel(delta));
        }
    })?);

    let h = Rc::clone(host);
    listeners.push(Listener::attach_active(canvas, "touchstart", move |event| {
        if let Some(e) = event.dyn_ref::<TouchEvent>() {
            let points = touch_points(&h.canvas, &e.touches());
            h.run(|engine| engine.on_touch_start(&points));
        }
    })?);

    let h = Rc::clone(host);
    listeners.push(Listener::attach_active(canvas, "touchmove", move |event| {
        if let Some(e) = event.dyn_ref::<TouchEvent>() {
            e.prevent_default();
            let points = touch_points(&h.canvas, &e.touches());
            h.run(|engine| engine.on_touch_move(&points));
        }
    })?);

    for kind in ["touchend", "touchcancel"] {
        let h = Rc::clone(host);
        listeners.push(Listener::attach(canvas, kind, move |event| {
            if let Some(e) = event.dyn_ref::<TouchEvent>() {
                let points = touch_points(&h.canvas, &e.touches());
                h.run(|engine| engine.on_touch_end(&points));
            }
        })?);
    }

    let h = Rc::clone(host);
    listeners.push(Listener::attach(window.as_ref(), "resize", move |_| request_resize(&h))?);

    Ok(listeners)
}

/// A `ResizeObserver` and the callback it holds.
struct SizeWatch {
    observer: ResizeObserver,
    _callback: Closure<dyn FnMut()>,
}

impl Drop for SizeWatch {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

fn watch_size(host: &Rc<Host>) -> Result<SizeWatch, GridError> {
    let h = Rc::clone(host);
    let callback = Closure::<dyn FnMut()>::new(move || request_resize(&h));
    let observer =
        ResizeObserver::new(callback.as_ref().unchecked_ref()).map_err(|e| GridError::Dom(js_message(&e)))?;
    observer.observe(&host.canvas);
    if let Some(parent) = host.canvas.parent_element() {
        observer.observe(&parent);
    }
    Ok(SizeWatch { observer, _callback: callback })
}

// =============================================================
// Mount
// =============================================================

/// A mounted grid. Dropping it detaches every listener and timer.
pub struct GridHandle {
    host: Rc<Host>,
    _listeners: Vec<Listener>,
    _size_watch: SizeWatch,
}

/// Bind a new engine to the canvas named by `config.canvas_id`.
///
/// # Errors
///
/// Returns [`GridError::Parse`] if `config.grid` has an unusable hex size or
/// zoom bounds, [`GridError::CanvasNotFound`] if no such `<canvas>` exists,
/// [`GridError::Context`] if it has no 2D context, or [`GridError::Dom`] if
/// listeners cannot be attached.
pub fn mount(config: EngineConfig, terrain: TerrainMap, callbacks: Callbacks) -> Result<GridHandle, GridError> {
    config.grid.validate()?;
    let window = web_sys::window().ok_or_else(|| GridError::Dom("no window".to_owned()))?;
    let document = window.document().ok_or_else(|| GridError::Dom("no document".to_owned()))?;

    let canvas_id = config.canvas_id.clone();
    let Some(element) = document.get_element_by_id(&canvas_id) else {
        return Err(GridError::CanvasNotFound(canvas_id));
    };
    let canvas = element
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| GridError::CanvasNotFound(canvas_id.clone()))?;

    let hud = config.hud_element_id.as_deref().and_then(|id| {
        let found = document.get_element_by_id(id);
        if found.is_none() {
            log::warn!("HUD element #{id} not found; hover text disabled");
        }
        found
    });

    let surface = CanvasSurface::new(canvas.clone())?;
    let engine = Engine::new(surface, config, terrain, callbacks);
    let host = Rc::new(Host {
        engine: Rc::new(RefCell::new(engine)),
        canvas,
        hud,
        click_timer: RefCell::new(None),
        resize_retry: RefCell::new(None),
        raf_pending: Cell::new(false),
        raf_callback: RefCell::new(None),
    });

    let listeners = bind_listeners(&host, &window)?;
    let size_watch = watch_size(&host)?;
    resize_now(&host);
    log::info!("hex grid mounted on #{canvas_id}");

    Ok(GridHandle { host, _listeners: listeners, _size_watch: size_watch })
}

impl GridHandle {
    /// Shared engine, for callers that need direct access.
    #[must_use]
    pub fn engine(&self) -> SharedEngine {
        Rc::clone(&self.host.engine)
    }

    /// Read the current state.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::Busy`] if the engine is mid-update.
    pub fn with_state<R>(&self, f: impl FnOnce(GridState<'_>) -> R) -> Result<R, GridError> {
        let engine = self
            .host
            .engine
            .try_borrow()
            .map_err(|_| GridError::Busy)?;
        Ok(f(engine.state()))
    }

    pub fn set_parser(&self, parser: MapParser) {
        self.host.run(|engine| {
            engine.set_parser(parser);
            Ok(())
        });
    }

    pub fn set_state(&self, patch: GridPatch) {
        self.host.run(|engine| engine.set_state(patch));
    }

    pub fn update_params(&self, patch: CameraPatch) {
        self.host.run(|engine| engine.update_params(patch));
    }

    /// Activation records the current canvas size first, so the engine
    /// resizes its backing store and draws exactly once.
    pub fn set_active(&self, active: bool) {
        if active {
            resize_now(&self.host);
        }
        self.host.run(|engine| engine.set_active(active));
        if !active {
            self.host.click_timer.borrow_mut().take();
        }
    }

    pub fn center_grid(&self) {
        self.host.run(Engine::center_grid);
    }

    pub fn draw_grid(&self, highlight: Option<HexCoord>) {
        self.host.run(|engine| engine.draw_grid(highlight).map(|_| ()));
    }

    /// Re-measure the canvas now.
    pub fn resize(&self) {
        resize_now(&self.host);
    }

    /// Fetch the configured map over HTTP and apply it. Resolves `false` on failure.
    pub async fn load_map(&self) -> bool {
        load_map_into(&self.host).await
    }

    /// Start [`GridHandle::load_map`] in the background.
    pub fn spawn_load_map(&self) {
        let host = Rc::clone(&self.host);
        wasm_bindgen_futures::spawn_local(async move {
            load_map_into(&host).await;
        });
    }

    /// Fetch the detail payload for one hex from the configured hex URL.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::NoHexUrl`], [`GridError::Busy`] if the engine is
    /// mid-update, or any fetch failure.
    pub async fn fetch_hex_detail(&self, coord: HexCoord) -> Result<Value, GridError> {
        Engine::fetch_hex_detail(&self.host.engine, &HttpFetch, coord).await
    }
}

impl Drop for GridHandle {
    fn drop(&mut self) {
        self.host.cancel_pending();
    }
}

async fn load_map_into(host: &Rc<Host>) -> bool {
    let loaded = Engine::load_map(&host.engine, &HttpFetch).await;
    host.refresh_hud();
    loaded
}
