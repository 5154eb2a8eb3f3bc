//! Drawing surface abstraction.
//!
//! The renderer talks to a [`Surface`] instead of a concrete 2D context so the
//! engine stays portable and tests can record draw calls. [`CanvasSurface`] is
//! the browser implementation and the only place that touches
//! [`web_sys::CanvasRenderingContext2d`].

#[cfg(test)]
#[path = "surface_test.rs"]
pub(crate) mod surface_test;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::error::GridError;

/// The subset of the Canvas 2D API the renderer needs.
///
/// Coordinates are in the current transform's space. Fallible calls mirror the
/// ones that can throw in the browser.
pub trait Surface {
    /// Backing-store size in device pixels.
    fn backing_size(&self) -> (u32, u32);
    /// Resize the backing store. Clears the surface as a side effect.
    fn set_backing_size(&mut self, width: u32, height: u32);

    /// Replace the current transform matrix.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::Canvas`] if the context rejects the matrix.
    fn set_transform(&mut self, a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Result<(), GridError>;
    /// # Errors
    ///
    /// Returns [`GridError::Canvas`] if the context rejects the transform.
    fn translate(&mut self, x: f64, y: f64) -> Result<(), GridError>;
    /// # Errors
    ///
    /// Returns [`GridError::Canvas`] if the context rejects the transform.
    fn scale(&mut self, x: f64, y: f64) -> Result<(), GridError>;
    /// # Errors
    ///
    /// Returns [`GridError::Canvas`] if the context rejects the transform.
    fn rotate(&mut self, radians: f64) -> Result<(), GridError>;
    fn save(&mut self);
    fn restore(&mut self);

    fn clear_rect(&mut self, x: f64, y: f64, w: f64, h: f64);
    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64);

    fn begin_path(&mut self);
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    fn close_path(&mut self);
    fn fill(&mut self);
    fn stroke(&mut self);

    fn set_fill_style(&mut self, color: &str);
    fn set_stroke_style(&mut self, color: &str);
    fn set_line_width(&mut self, width: f64);
    /// # Errors
    ///
    /// Returns [`GridError::Canvas`] if the dash pattern is rejected.
    fn set_line_dash(&mut self, segments: &[f64]) -> Result<(), GridError>;
    fn set_global_alpha(&mut self, alpha: f64);

    fn set_font(&mut self, font: &str);
    fn set_text_align(&mut self, align: &str);
    fn set_text_baseline(&mut self, baseline: &str);
    /// # Errors
    ///
    /// Returns [`GridError::Canvas`] if text rendering fails.
    fn fill_text(&mut self, text: &str, x: f64, y: f64) -> Result<(), GridError>;
}

/// A `<canvas>` element and its 2D context.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    /// Acquire the 2D context of `canvas`.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::Context`] if the browser does not provide a 2D context.
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, GridError> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|e| GridError::Context(js_message(&e)))?
            .ok_or_else(|| GridError::Context("no 2d context".to_owned()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| GridError::Context("context is not 2d".to_owned()))?;
        Ok(Self { canvas, ctx })
    }

    #[must_use]
    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }
}

/// Best-effort string form of a thrown JS value.
pub(crate) fn js_message(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

fn canvas_err(value: JsValue) -> GridError {
    GridError::Canvas(js_message(&value))
}

impl Surface for CanvasSurface {
    fn backing_size(&self) -> (u32, u32) {
        (self.canvas.width(), self.canvas.height())
    }

    fn set_backing_size(&mut self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }

    fn set_transform(&mut self, a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Result<(), GridError> {
        self.ctx.set_transform(a, b, c, d, e, f).map_err(canvas_err)
    }

    fn translate(&mut self, x: f64, y: f64) -> Result<(), GridError> {
        self.ctx.translate(x, y).map_err(canvas_err)
    }

    fn scale(&mut self, x: f64, y: f64) -> Result<(), GridError> {
        self.ctx.scale(x, y).map_err(canvas_err)
    }

    fn rotate(&mut self, radians: f64) -> Result<(), GridError> {
        self.ctx.rotate(radians).map_err(canvas_err)
    }

    fn save(&mut self) {
        self.ctx.save();
    }

    fn restore(&mut self) {
        self.ctx.restore();
    }

    fn clear_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.ctx.clear_rect(x, y, w, h);
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.ctx.fill_rect(x, y, w, h);
    }

    fn begin_path(&mut self) {
        self.ctx.begin_path();
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.ctx.move_to(x, y);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.ctx.line_to(x, y);
    }

    fn close_path(&mut self) {
        self.ctx.close_path();
    }

    fn fill(&mut self) {
        self.ctx.fill();
    }

    fn stroke(&mut self) {
        self.ctx.stroke();
    }

    fn set_fill_style(&mut self, color: &str) {
        self.ctx.set_fill_style_str(color);
    }

    fn set_stroke_style(&mut self, color: &str) {
        self.ctx.set_stroke_style_str(color);
    }

    fn set_line_width(&mut self, width: f64) {
        self.ctx.set_line_width(width);
    }

    fn set_line_dash(&mut self, segments: &[f64]) -> Result<(), GridError> {
        let array = js_sys::Array::new();
        for &s in segments {
            array.push(&JsValue::from_f64(s));
        }
        self.ctx.set_line_dash(&array).map_err(canvas_err)
    }

    fn set_global_alpha(&mut self, alpha: f64) {
        self.ctx.set_global_alpha(alpha);
    }

    fn set_font(&mut self, font: &str) {
        self.ctx.set_font(font);
    }

    fn set_text_align(&mut self, align: &str) {
        self.ctx.set_text_align(align);
    }

    fn set_text_baseline(&mut self, baseline: &str) {
        self.ctx.set_text_baseline(baseline);
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) -> Result<(), GridError> {
        self.ctx.fill_text(text, x, y).map_err(canvas_err)
    }
}
