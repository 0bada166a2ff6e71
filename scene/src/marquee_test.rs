use uuid::Uuid;

use super::*;
use crate::selection::{SelectionController, SelectionMode};
use crate::snapshot::{SceneObject, SceneObjectKind};

// =============================================================
// Helpers
// =============================================================

fn id(n: u128) -> EntityId {
    Uuid::from_u128(n)
}

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn prop_at(n: u128, x: f64, y: f64, w: f64, h: f64) -> SceneObject {
    SceneObject {
        id: id(n),
        kind: SceneObjectKind::Prop,
        bounds: Rect::new(x, y, w, h),
        rotation: 0.0,
        locked: false,
        label: String::new(),
    }
}

fn scene() -> Snapshot {
    Snapshot {
        scene_objects: vec![
            prop_at(1, 0.0, 0.0, 10.0, 10.0),
            prop_at(2, 50.0, 50.0, 10.0, 10.0),
            prop_at(3, 8.0, 8.0, 4.0, 4.0),
        ],
        ..Snapshot::default()
    }
}

/// Sink without batch capability that records every call.
#[derive(Default)]
struct RecordingSink {
    calls: Vec<(Option<EntityId>, SelectMode)>,
}

impl SelectionSink for RecordingSink {
    fn select(&mut self, id: Option<EntityId>, mode: SelectMode) {
        self.calls.push((id, mode));
    }
}

// =============================================================
// Hit-testing
// =============================================================

#[test]
fn overlap_not_containment() {
    let m = {
        let mut m = Marquee::begin(pt(5.0, 5.0));
        m.update(pt(9.0, 9.0));
        m
    };
    assert_eq!(m.hits(&scene()), vec![id(1), id(3)]);
}

#[test]
fn reverse_drag_is_normalized() {
    let mut m = Marquee::begin(pt(55.0, 55.0));
    m.update(pt(45.0, 45.0));
    assert_eq!(m.rect(), Rect::new(45.0, 45.0, 10.0, 10.0));
    assert_eq!(m.hits(&scene()), vec![id(2)]);
}

#[test]
fn edge_touch_counts() {
    let rect = Rect::new(10.0, 0.0, 5.0, 5.0);
    assert_eq!(hit_test(&rect, &scene()), vec![id(1)]);
}

#[test]
fn empty_area_has_no_hits() {
    let rect = Rect::new(100.0, 100.0, 5.0, 5.0);
    assert!(hit_test(&rect, &scene()).is_empty());
}

// =============================================================
// Release
// =============================================================

#[test]
fn release_uses_batch_when_available() {
    let mut sel = SelectionController::new();
    let outcome = Marquee::begin(pt(-1.0, -1.0)).release(pt(100.0, 100.0), &scene(), &mut sel);
    assert_eq!(outcome, MarqueeOutcome::Batch(3));
    assert_eq!(sel.state().len(), 3);
}

#[test]
fn release_batch_replaces_previous_selection() {
    let mut sel = SelectionController::new();
    sel.select(Some(id(99)), SelectMode::Replace);
    Marquee::begin(pt(49.0, 49.0)).release(pt(51.0, 51.0), &scene(), &mut sel);
    assert_eq!(sel.state().single(), Some(id(2)));
}

#[test]
fn release_falls_back_to_replace_then_append() {
    let mut sink = RecordingSink::default();
    let outcome = Marquee::begin(pt(-1.0, -1.0)).release(pt(100.0, 100.0), &scene(), &mut sink);
    assert_eq!(outcome, MarqueeOutcome::Sequential(3));
    assert_eq!(
        sink.calls,
        vec![
            (Some(id(1)), SelectMode::Replace),
            (Some(id(2)), SelectMode::Append),
            (Some(id(3)), SelectMode::Append),
        ]
    );
}

#[test]
fn release_with_no_hits_clears() {
    let mut sel = SelectionController::new();
    sel.select(Some(id(1)), SelectMode::Replace);
    let outcome = Marquee::begin(pt(200.0, 200.0)).release(pt(210.0, 210.0), &scene(), &mut sel);
    assert_eq!(outcome, MarqueeOutcome::Cleared);
    assert_eq!(sel.state().mode(), SelectionMode::None);
}

#[test]
fn tiny_drag_on_empty_space_still_clears() {
    let mut sink = RecordingSink::default();
    let outcome = Marquee::begin(pt(30.0, 30.0)).release(pt(30.5, 30.0), &scene(), &mut sink);
    assert_eq!(outcome, MarqueeOutcome::Cleared);
    assert_eq!(sink.calls, vec![(None, SelectMode::Replace)]);
}
