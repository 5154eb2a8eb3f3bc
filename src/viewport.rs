//! Viewport size and device-pixel-ratio bookkeeping.
//!
//! Resize decisions are pure: [`plan_resize`] compares the requested CSS size
//! against what the engine last recorded and what the canvas backing store
//! currently holds, and says what the engine should do about it.

#[cfg(test)]
#[path = "viewport_test.rs"]
mod viewport_test;

use crate::camera::Point;

/// CSS-pixel viewport plus device pixel ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub dpr: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { width: 0.0, height: 0.0, dpr: 1.0 }
    }
}

impl Viewport {
    #[must_use]
    pub fn new(width: f64, height: f64, dpr: f64) -> Self {
        Self { width, height, dpr: if dpr > 0.0 { dpr } else { 1.0 } }
    }

    /// Screen-space center, where the world origin lands with zero pan.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.width * 0.5, self.height * 0.5)
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Backing-store size in device pixels.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn backing_size(&self) -> (u32, u32) {
        (
            (self.width * self.dpr).round().max(0.0) as u32,
            (self.height * self.dpr).round().max(0.0) as u32,
        )
    }
}

/// What a resize request should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeOutcome {
    /// The canvas has no layout yet; try again shortly.
    Retry,
    /// The instance is inactive: the size was recorded, the canvas left alone.
    Recorded,
    /// Nothing changed.
    Unchanged,
    /// The backing store must be resized and the grid redrawn.
    Resized { width_px: u32, height_px: u32 },
}

/// Decide how to handle a resize to `next`.
///
/// `backing` is the canvas backing-store size as it currently stands.
#[must_use]
pub fn plan_resize(current: Viewport, backing: (u32, u32), next: Viewport, active: bool) -> ResizeOutcome {
    if next.is_zero() {
        return ResizeOutcome::Retry;
    }
    if !active {
        return ResizeOutcome::Recorded;
    }
    let (width_px, height_px) = next.backing_size();
    if current == next && backing == (width_px, height_px) {
        return ResizeOutcome::Unchanged;
    }
    ResizeOutcome::Resized { width_px, height_px }
}
