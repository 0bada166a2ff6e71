use uuid::Uuid;

use super::*;
use crate::snapshot::StrokeStyle;

// =============================================================
// Helpers
// =============================================================

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn stroke(points: Vec<Point>) -> Drawing {
    Drawing {
        id: Uuid::from_u128(1),
        owner: Some(Uuid::from_u128(42)),
        shape: DrawingShape::Freehand,
        points,
        style: StrokeStyle { color: "#336699".into(), width: 3.0, opacity: 0.5 },
    }
}

#[allow(clippy::cast_precision_loss)]
fn horizontal(n: usize) -> Vec<Point> {
    (0..n).map(|i| pt(i as f64 * 10.0, 0.0)).collect()
}

fn counter_ids() -> impl FnMut() -> EntityId {
    let mut n = 1000u128;
    move || {
        n += 1;
        Uuid::from_u128(n)
    }
}

/// Vertical eraser line through `x`.
fn vertical_eraser(x: f64) -> Vec<Point> {
    vec![pt(x, -50.0), pt(x, 50.0)]
}

// =============================================================
// No-op
// =============================================================

#[test]
fn miss_returns_single_run_equal_to_original() {
    let s = stroke(horizontal(5));
    let out = erase(&s, &[pt(0.0, 100.0), pt(40.0, 100.0)], 5.0);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].points, s.points);
}

#[test]
fn miss_plans_noop() {
    let s = stroke(horizontal(5));
    assert_eq!(plan_erase(&s, &[pt(0.0, 100.0), pt(40.0, 100.0)], 5.0), ErasePlan::NoOp);
}

#[test]
fn miss_on_single_point_stroke_is_still_noop() {
    let s = stroke(vec![pt(0.0, 0.0)]);
    assert_eq!(plan_erase(&s, &vertical_eraser(100.0), 2.0), ErasePlan::NoOp);
}

#[test]
fn empty_eraser_path_is_noop() {
    let s = stroke(horizontal(3));
    assert_eq!(plan_erase(&s, &[], 10.0), ErasePlan::NoOp);
}

// =============================================================
// Splitting
// =============================================================

#[test]
fn crossing_between_two_points_drops_both_single_point_runs() {
    let s = stroke(vec![pt(0.0, 0.0), pt(10.0, 0.0)]);
    let eraser = vec![pt(5.0, -5.0), pt(5.0, 5.0)];
    assert_eq!(surviving_runs(&s.points, &eraser, 2.0), Some(Vec::new()));
    assert!(erase(&s, &eraser, 2.0).is_empty());
    assert_eq!(plan_erase(&s, &eraser, 2.0), ErasePlan::DeleteWhole { original_id: s.id });
}

#[test]
fn middle_cut_yields_two_viable_segments() {
    // Points at x = 0,10,...,90; eraser at x = 45 cuts between 40 and 50.
    let s = stroke(horizontal(10));
    let out = erase_with_ids(&s, &vertical_eraser(45.0), 2.0, counter_ids());
    assert_eq!(out.len(), 2);
    assert_eq!(out[0].points, horizontal(5));
    assert_eq!(out[1].points, horizontal(10)[5..].to_vec());
}

#[test]
fn erased_point_splits_runs() {
    let s = stroke(horizontal(7));
    let out = erase(&s, &vertical_eraser(30.0), 1.0);
    let runs: Vec<Vec<Point>> = out.into_iter().map(|d| d.points).collect();
    assert_eq!(runs, vec![horizontal(3), horizontal(7)[4..].to_vec()]);
}

#[test]
fn trimming_the_tail_is_a_split_with_one_segment() {
    let s = stroke(horizontal(6));
    match plan_erase_with_ids(&s, &vertical_eraser(50.0), 1.0, counter_ids()) {
        ErasePlan::Split { original_id, segments } => {
            assert_eq!(original_id, s.id);
            assert_eq!(segments.len(), 1);
            assert_eq!(segments[0].points, horizontal(5));
        }
        other => panic!("expected split, got {other:?}"),
    }
}

#[test]
fn wide_eraser_removes_everything() {
    let s = stroke(horizontal(4));
    assert_eq!(plan_erase(&s, &[pt(15.0, 0.0)], 100.0), ErasePlan::DeleteWhole { original_id: s.id });
}

#[test]
fn single_point_eraser_path_works() {
    let s = stroke(horizontal(5));
    let out = erase(&s, &[pt(20.0, 0.5)], 1.0);
    assert_eq!(out.len(), 2);
}

#[test]
fn segments_get_fresh_ids_and_copy_style() {
    let s = stroke(horizontal(10));
    let out = erase_with_ids(&s, &vertical_eraser(45.0), 2.0, counter_ids());
    assert_eq!(out[0].id, Uuid::from_u128(1001));
    assert_eq!(out[1].id, Uuid::from_u128(1002));
    for seg in &out {
        assert_ne!(seg.id, s.id);
        assert_eq!(seg.style, s.style);
        assert_eq!(seg.owner, s.owner);
        assert_eq!(seg.shape, DrawingShape::Freehand);
    }
}

// =============================================================
// Conservation
// =============================================================

/// Every output point appears in the original, in original order, at most
/// once, and every output run has at least two points.
fn assert_conserved(original: &Drawing, out: &[Drawing], context: &str) {
    let flattened: Vec<Point> = out.iter().flat_map(|d| d.points.clone()).collect();
    let mut cursor = 0;
    for p in &flattened {
        let found = original.points[cursor..].iter().position(|q| q == p);
        let Some(offset) = found else {
            panic!("{context}: point {p:?} out of order or duplicated");
        };
        cursor += offset + 1;
    }
    assert!(out.iter().all(|d| d.points.len() >= 2), "{context}: short run survived");
    assert!(out.iter().all(|d| d.id != original.id), "{context}: original id reused");
}

#[test]
fn surviving_points_are_ordered_subset_without_duplicates() {
    let zigzag = stroke(vec![
        pt(0.0, 0.0),
        pt(5.0, 3.0),
        pt(10.0, 0.0),
        pt(15.0, -3.0),
        pt(20.0, 0.0),
        pt(25.0, 3.0),
        pt(30.0, 0.0),
        pt(35.0, -3.0),
    ]);
    let straight = stroke(horizontal(12));
    // Loops back over itself so one eraser pass can cut it twice.
    let hairpin = stroke(vec![
        pt(0.0, 0.0),
        pt(20.0, 0.0),
        pt(40.0, 0.0),
        pt(40.0, 10.0),
        pt(20.0, 10.0),
        pt(0.0, 10.0),
    ]);

    let mut erasers: Vec<(String, Vec<Point>)> = Vec::new();
    for x in [-1.0, 0.0, 2.5, 12.0, 20.0, 27.0, 35.0, 55.0, 110.0, 200.0] {
        erasers.push((format!("vertical x={x}"), vertical_eraser(x)));
    }
    // Collinear with the strokes' baseline, partly and fully overlapping.
    erasers.push(("collinear prefix".into(), vec![pt(-10.0, 0.0), pt(18.0, 0.0)]));
    erasers.push(("collinear middle".into(), vec![pt(30.0, 0.0), pt(60.0, 0.0)]));
    erasers.push(("collinear full".into(), vec![pt(-10.0, 0.0), pt(300.0, 0.0)]));
    erasers.push(("horizontal y=3".into(), vec![pt(-10.0, 3.0), pt(40.0, 3.0)]));
    // Taps exactly on endpoints.
    erasers.push(("tap first point".into(), vec![pt(0.0, 0.0)]));
    erasers.push(("tap last straight point".into(), vec![pt(110.0, 0.0)]));
    erasers.push(("tap last zigzag point".into(), vec![pt(35.0, -3.0)]));
    erasers.push(("diagonal".into(), vec![pt(-5.0, -20.0), pt(60.0, 40.0)]));
    erasers.push(("multi-segment".into(), vec![pt(8.0, -20.0), pt(8.0, 20.0), pt(33.0, 20.0), pt(33.0, -20.0)]));

    for original in [&zigzag, &straight, &hairpin] {
        for (name, path) in &erasers {
            for width in [0.0, 0.5, 1.0, 4.0, 12.0] {
                let out = erase(original, path, width);
                assert_conserved(original, &out, &format!("{name} width={width}"));
            }
        }
    }
}

// =============================================================
// Primitives
// =============================================================

#[test]
fn primitive_touched_is_deleted_whole() {
    let line = Drawing { shape: DrawingShape::Line, ..stroke(vec![pt(0.0, 0.0), pt(100.0, 0.0)]) };
    assert_eq!(plan_erase(&line, &vertical_eraser(50.0), 1.0), ErasePlan::DeleteWhole { original_id: line.id });
}

#[test]
fn rect_interior_does_not_touch_outline() {
    let rect = Drawing { shape: DrawingShape::Rect, ..stroke(vec![pt(0.0, 0.0), pt(100.0, 100.0)]) };
    assert_eq!(plan_erase(&rect, &[pt(50.0, 50.0)], 5.0), ErasePlan::NoOp);
    assert_eq!(plan_erase(&rect, &[pt(100.0, 50.0)], 5.0), ErasePlan::DeleteWhole { original_id: rect.id });
}

#[test]
fn circle_outline_is_hit_on_the_rim() {
    let circle = Drawing { shape: DrawingShape::Circle, ..stroke(vec![pt(0.0, 0.0), pt(50.0, 0.0)]) };
    assert_eq!(plan_erase(&circle, &[pt(0.0, 0.0)], 5.0), ErasePlan::NoOp);
    assert_eq!(plan_erase(&circle, &[pt(0.0, 50.0)], 2.0), ErasePlan::DeleteWhole { original_id: circle.id });
}
