//! Input model: mouse buttons, wheel deltas, and the gesture state machines.
//!
//! `DragState` tracks a mouse pan between pointer-down and pointer-up.
//! `ClickTracker` merges raw clicks into single or double clicks using
//! deadlines instead of timers, so the host only has to call
//! [`ClickTracker::poll`] once the deadline passes. `TouchGesture` covers
//! one-finger pan and two-finger pinch.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::camera::Point;
use crate::consts::{DOUBLE_CLICK_WINDOW_MS, DRAG_CLICK_SLOP_PX};

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button.
    Secondary,
}

impl Button {
    /// Map a DOM `MouseEvent.button` value. Unknown buttons count as secondary.
    #[must_use]
    pub fn from_dom(button: i16) -> Self {
        match button {
            0 => Self::Primary,
            1 => Self::Middle,
            _ => Self::Secondary,
        }
    }
}

/// Wheel / trackpad scroll delta.
#[derive(Debug, Clone, Copy)]
pub struct WheelDelta {
    /// Horizontal scroll amount in pixels.
    pub dx: f64,
    /// Vertical scroll amount in pixels (positive = down).
    pub dy: f64,
}

// =============================================================
// Drag
// =============================================================

/// Mouse pan gesture.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        /// Pointer position at the previous event.
        last: Point,
        /// Pointer position at pointer-down.
        origin: Point,
        /// Whether the pointer has left the click slop radius.
        moved: bool,
    },
}

impl DragState {
    /// Begin a drag at `at`.
    pub fn start(&mut self, at: Point) {
        *self = Self::Dragging { last: at, origin: at, moved: false };
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        matches!(self, Self::Dragging { .. })
    }

    /// Advance to `to`, returning the pan delta since the previous event.
    pub fn advance(&mut self, to: Point) -> Option<(f64, f64)> {
        let Self::Dragging { last, origin, moved } = self else {
            return None;
        };
        let delta = (to.x - last.x, to.y - last.y);
        *last = to;
        if origin.distance_sq(to) > DRAG_CLICK_SLOP_PX * DRAG_CLICK_SLOP_PX {
            *moved = true;
        }
        Some(delta)
    }

    /// End the drag. Returns whether it travelled past the click slop.
    pub fn finish(&mut self) -> bool {
        let moved = matches!(self, Self::Dragging { moved: true, .. });
        *self = Self::Idle;
        moved
    }
}

// =============================================================
// Click / double-click
// =============================================================

/// A merged click carrying whatever was captured when the click landed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClickOutcome<T> {
    Single(T),
    Double(T),
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum ClickState<T> {
    Idle,
    PendingSingle { at: T, deadline: f64 },
}

/// `Idle -> PendingSingle -> Idle` click merger.
///
/// `T` is the payload captured per click (a screen point, or the hex resolved
/// under it). Times are milliseconds on a shared millisecond clock; the host uses
/// `Date.now()`.
#[derive(Debug, Clone, Copy)]
pub struct ClickTracker<T> {
    state: ClickState<T>,
    window_ms: f64,
}

impl<T: Copy> Default for ClickTracker<T> {
    fn default() -> Self {
        Self::new(DOUBLE_CLICK_WINDOW_MS)
    }
}

impl<T: Copy> ClickTracker<T> {
    #[must_use]
    pub fn new(window_ms: f64) -> Self {
        Self { state: ClickState::Idle, window_ms }
    }

    /// Register a raw click carrying `at`.
    ///
    /// A click inside the window of a pending single becomes a double click
    /// with the second click's payload. A click after an expired but unpolled
    /// single fires that single first and then starts a new pending one.
    pub fn register(&mut self, at: T, now: f64) -> Vec<ClickOutcome<T>> {
        let mut out = Vec::new();
        if let ClickState::PendingSingle { at: first, deadline } = self.state {
            if now < deadline {
                self.state = ClickState::Idle;
                out.push(ClickOutcome::Double(at));
                return out;
            }
            out.push(ClickOutcome::Single(first));
        }
        self.state = ClickState::PendingSingle { at, deadline: now + self.window_ms };
        out
    }

    /// Fire the pending single click if its deadline has passed.
    pub fn poll(&mut self, now: f64) -> Option<ClickOutcome<T>> {
        match self.state {
            ClickState::PendingSingle { at, deadline } if now >= deadline => {
                self.state = ClickState::Idle;
                Some(ClickOutcome::Single(at))
            }
            _ => None,
        }
    }

    /// Deadline of the pending single, if any.
    #[must_use]
    pub fn deadline(&self) -> Option<f64> {
        match self.state {
            ClickState::PendingSingle { deadline, .. } => Some(deadline),
            ClickState::Idle => None,
        }
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.deadline().is_some()
    }

    /// Drop any pending single without firing it.
    pub fn cancel(&mut self) {
        self.state = ClickState::Idle;
    }
}

// =============================================================
// Touch
// =============================================================

/// What a touch move asks the camera to do.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TouchUpdate {
    Pan { dx: f64, dy: f64 },
    /// Multiply zoom by this factor.
    Zoom(f64),
}

/// Active touch gesture, re-seeded whenever the finger count changes.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum TouchGesture {
    #[default]
    None,
    Pan {
        last: Point,
    },
    Pinch {
        last_distance: f64,
    },
}

impl TouchGesture {
    /// Start (or restart) from the fingers currently down.
    pub fn begin(&mut self, touches: &[Point]) {
        *self = match touches {
            [] => Self::None,
            [one] => Self::Pan { last: *one },
            [a, b, ..] => Self::Pinch { last_distance: a.distance_sq(*b).sqrt() },
        };
    }

    /// Feed the fingers' new positions.
    pub fn update(&mut self, touches: &[Point]) -> Option<TouchUpdate> {
        match (*self, touches) {
            (Self::Pan { last }, [one]) => {
                *self = Self::Pan { last: *one };
                Some(TouchUpdate::Pan { dx: one.x - last.x, dy: one.y - last.y })
            }
            (Self::Pinch { last_distance }, [a, b, ..]) => {
                let distance = a.distance_sq(*b).sqrt();
                *self = Self::Pinch { last_distance: distance };
                (last_distance > 0.0 && distance > 0.0).then(|| TouchUpdate::Zoom(distance / last_distance))
            }
            _ => {
                self.begin(touches);
                None
            }
        }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::None)
    }
}
