#![allow(clippy::float_cmp)]

use super::*;

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

// =============================================================
// Button
// =============================================================

#[test]
fn button_from_dom_values() {
    assert_eq!(Button::from_dom(0), Button::Primary);
    assert_eq!(Button::from_dom(1), Button::Middle);
    assert_eq!(Button::from_dom(2), Button::Secondary);
    assert_eq!(Button::from_dom(4), Button::Secondary);
}

// =============================================================
// DragState
// =============================================================

#[test]
fn idle_drag_ignores_moves() {
    let mut drag = DragState::default();
    assert!(!drag.is_dragging());
    assert_eq!(drag.advance(pt(10.0, 10.0)), None);
}

#[test]
fn drag_reports_incremental_deltas() {
    let mut drag = DragState::default();
    drag.start(pt(100.0, 100.0));
    assert_eq!(drag.advance(pt(110.0, 95.0)), Some((10.0, -5.0)));
    assert_eq!(drag.advance(pt(111.0, 95.0)), Some((1.0, 0.0)));
}

#[test]
fn small_drag_does_not_count_as_moved() {
    let mut drag = DragState::default();
    drag.start(pt(0.0, 0.0));
    drag.advance(pt(2.0, 2.0));
    assert!(!drag.finish());
    assert!(!drag.is_dragging());
}

#[test]
fn drag_past_slop_stays_moved_after_returning() {
    let mut drag = DragState::default();
    drag.start(pt(0.0, 0.0));
    drag.advance(pt(10.0, 0.0));
    drag.advance(pt(0.0, 0.0));
    assert!(drag.finish());
}

#[test]
fn finish_on_idle_is_harmless() {
    let mut drag = DragState::default();
    assert!(!drag.finish());
}

// =============================================================
// ClickTracker
// =============================================================

#[test]
fn first_click_is_pending_until_deadline() {
    let mut clicks = ClickTracker::<Point>::default();
    assert!(clicks.register(pt(1.0, 1.0), 1000.0).is_empty());
    assert_eq!(clicks.deadline(), Some(1250.0));
    assert_eq!(clicks.poll(1249.0), None);
    assert_eq!(clicks.poll(1250.0), Some(ClickOutcome::Single(pt(1.0, 1.0))));
    assert!(!clicks.is_pending());
}

#[test]
fn second_click_inside_window_is_double_at_second_point() {
    let mut clicks = ClickTracker::<Point>::default();
    clicks.register(pt(1.0, 1.0), 0.0);
    let out = clicks.register(pt(3.0, 2.0), 120.0);
    assert_eq!(out, vec![ClickOutcome::Double(pt(3.0, 2.0))]);
    assert_eq!(clicks.poll(10_000.0), None);
}

#[test]
fn late_unpolled_click_fires_old_single_then_pends() {
    let mut clicks = ClickTracker::<Point>::default();
    clicks.register(pt(1.0, 1.0), 0.0);
    let out = clicks.register(pt(5.0, 5.0), 400.0);
    assert_eq!(out, vec![ClickOutcome::Single(pt(1.0, 1.0))]);
    assert_eq!(clicks.deadline(), Some(650.0));
    assert_eq!(clicks.poll(650.0), Some(ClickOutcome::Single(pt(5.0, 5.0))));
}

#[test]
fn third_click_after_double_starts_fresh() {
    let mut clicks = ClickTracker::<Point>::default();
    clicks.register(pt(0.0, 0.0), 0.0);
    clicks.register(pt(0.0, 0.0), 100.0);
    assert!(clicks.register(pt(0.0, 0.0), 150.0).is_empty());
    assert!(clicks.is_pending());
}

#[test]
fn cancel_drops_pending_single() {
    let mut clicks = ClickTracker::<Point>::default();
    clicks.register(pt(0.0, 0.0), 0.0);
    clicks.cancel();
    assert_eq!(clicks.poll(1000.0), None);
}

#[test]
fn custom_window_is_respected() {
    let mut clicks = ClickTracker::<Point>::new(50.0);
    clicks.register(pt(0.0, 0.0), 0.0);
    assert_eq!(clicks.register(pt(0.0, 0.0), 60.0), vec![ClickOutcome::Single(pt(0.0, 0.0))]);
}

// =============================================================
// TouchGesture
// =============================================================

#[test]
fn one_finger_pans() {
    let mut touch = TouchGesture::default();
    touch.begin(&[pt(10.0, 10.0)]);
    assert_eq!(touch.update(&[pt(15.0, 7.0)]), Some(TouchUpdate::Pan { dx: 5.0, dy: -3.0 }));
}

#[test]
fn two_fingers_pinch_by_distance_ratio() {
    let mut touch = TouchGesture::default();
    touch.begin(&[pt(0.0, 0.0), pt(100.0, 0.0)]);
    assert_eq!(touch.update(&[pt(0.0, 0.0), pt(150.0, 0.0)]), Some(TouchUpdate::Zoom(1.5)));
    assert_eq!(touch.update(&[pt(0.0, 0.0), pt(75.0, 0.0)]), Some(TouchUpdate::Zoom(0.5)));
}

#[test]
fn finger_count_change_reseeds_without_jump() {
    let mut touch = TouchGesture::default();
    touch.begin(&[pt(0.0, 0.0), pt(100.0, 0.0)]);
    assert_eq!(touch.update(&[pt(40.0, 40.0)]), None);
    assert_eq!(touch, TouchGesture::Pan { last: pt(40.0, 40.0) });
}

#[test]
fn coincident_fingers_do_not_zoom() {
    let mut touch = TouchGesture::default();
    touch.begin(&[pt(5.0, 5.0), pt(5.0, 5.0)]);
    assert_eq!(touch.update(&[pt(5.0, 5.0), pt(50.0, 5.0)]), None);
}

#[test]
fn lifting_all_fingers_ends_gesture() {
    let mut touch = TouchGesture::default();
    touch.begin(&[pt(0.0, 0.0)]);
    touch.begin(&[]);
    assert!(!touch.is_active());
}
