use std::time::{Duration, Instant};

use super::*;

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

// =============================================================
// Tool
// =============================================================

#[test]
fn tool_default_is_select() {
    assert_eq!(Tool::default(), Tool::Select);
}

#[test]
fn drawing_tools() {
    assert!(Tool::Draw.is_drawing());
    assert!(Tool::Circle.is_drawing());
    assert!(!Tool::Erase.is_drawing());
    assert!(!Tool::Select.is_drawing());
}

#[test]
fn tool_serializes_lowercase() {
    assert_eq!(serde_json::to_string(&Tool::Erase).unwrap(), "\"erase\"");
}

// =============================================================
// TapTracker
// =============================================================

#[test]
fn first_tap_is_single() {
    let mut t = TapTracker::default();
    assert_eq!(t.register_tap(pt(0.0, 0.0), Instant::now()), TapKind::Single);
    assert!(t.is_armed());
}

#[test]
fn quick_nearby_second_tap_is_double() {
    let mut t = TapTracker::new(Duration::from_millis(300), 10.0);
    let start = Instant::now();
    t.register_tap(pt(0.0, 0.0), start);
    assert_eq!(t.register_tap(pt(3.0, 4.0), start + Duration::from_millis(200)), TapKind::Double);
    assert!(!t.is_armed());
}

#[test]
fn slow_second_tap_is_single() {
    let mut t = TapTracker::new(Duration::from_millis(300), 10.0);
    let start = Instant::now();
    t.register_tap(pt(0.0, 0.0), start);
    assert_eq!(t.register_tap(pt(0.0, 0.0), start + Duration::from_millis(301)), TapKind::Single);
}

#[test]
fn distant_second_tap_is_single() {
    let mut t = TapTracker::new(Duration::from_millis(300), 10.0);
    let start = Instant::now();
    t.register_tap(pt(0.0, 0.0), start);
    assert_eq!(t.register_tap(pt(30.0, 0.0), start + Duration::from_millis(50)), TapKind::Single);
}

#[test]
fn third_tap_after_double_starts_over() {
    let mut t = TapTracker::new(Duration::from_millis(300), 10.0);
    let start = Instant::now();
    t.register_tap(pt(0.0, 0.0), start);
    t.register_tap(pt(0.0, 0.0), start + Duration::from_millis(100));
    assert_eq!(t.register_tap(pt(0.0, 0.0), start + Duration::from_millis(150)), TapKind::Single);
}

#[test]
fn reset_disarms() {
    let mut t = TapTracker::default();
    let start = Instant::now();
    t.register_tap(pt(0.0, 0.0), start);
    t.reset();
    assert_eq!(t.register_tap(pt(0.0, 0.0), start + Duration::from_millis(10)), TapKind::Single);
}
