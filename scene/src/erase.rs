//! Partial erase: split a freehand stroke where an eraser path crosses it.
//!
//! DESIGN
//! ======
//! A stroke point is erased when it lies within `eraser_width` of any eraser
//! segment. A stroke segment between two kept points is cut when it passes
//! within `eraser_width` of the eraser path, even if both endpoints survive.
//! The kept points then fall into maximal runs; runs shorter than two points
//! cannot form a stroke and are dropped. No points are interpolated, so every
//! surviving point is an original point in original order.
//!
//! Surviving runs become new drawings with fresh ids and the original's
//! style and owner. The original id is retired, never reused.
//!
//! Callers act on an [`ErasePlan`]:
//! - `NoOp`: the eraser missed. Emit nothing; re-emitting the same stroke
//!   under a new id would orphan the original id for anyone tracking it.
//! - `DeleteWhole`: nothing survived, or the drawing is a primitive.
//! - `Split`: delete the original and create the segments atomically.

#[cfg(test)]
#[path = "erase_test.rs"]
mod erase_test;

use std::f64::consts::TAU;

use uuid::Uuid;

use crate::consts::MIN_RUN_POINTS;
use crate::geom::{Point, point_segment_distance, segment_segment_distance};
use crate::snapshot::{Drawing, DrawingShape, EntityId};

/// Vertices used to approximate a circle outline.
const CIRCLE_SEGMENTS: usize = 32;

/// What the caller should do about one drawing touched by the eraser.
#[derive(Debug, Clone, PartialEq)]
pub enum ErasePlan {
    NoOp,
    DeleteWhole { original_id: EntityId },
    Split { original_id: EntityId, segments: Vec<Drawing> },
}

/// Surviving segments of `stroke`, each under a fresh v4 id.
///
/// An empty result means fully erased. When the eraser misses, the result is
/// a single segment with the original points.
#[must_use]
pub fn erase(stroke: &Drawing, eraser_path: &[Point], eraser_width: f64) -> Vec<Drawing> {
    erase_with_ids(stroke, eraser_path, eraser_width, Uuid::new_v4)
}

/// [`erase`] with a caller-supplied id source.
#[must_use]
pub fn erase_with_ids(
    stroke: &Drawing,
    eraser_path: &[Point],
    eraser_width: f64,
    next_id: impl FnMut() -> EntityId,
) -> Vec<Drawing> {
    let runs = surviving_runs(&stroke.points, eraser_path, eraser_width).unwrap_or_else(|| vec![stroke.points.clone()]);
    into_segments(stroke, runs, next_id)
}

/// Decide how to erase `drawing`. Primitives are never split.
#[must_use]
pub fn plan_erase(drawing: &Drawing, eraser_path: &[Point], eraser_width: f64) -> ErasePlan {
    plan_erase_with_ids(drawing, eraser_path, eraser_width, Uuid::new_v4)
}

/// [`plan_erase`] with a caller-supplied id source.
#[must_use]
pub fn plan_erase_with_ids(
    drawing: &Drawing,
    eraser_path: &[Point],
    eraser_width: f64,
    next_id: impl FnMut() -> EntityId,
) -> ErasePlan {
    let original_id = drawing.id;
    if drawing.shape != DrawingShape::Freehand {
        return if outline_touched(&outline(drawing), eraser_path, eraser_width) {
            ErasePlan::DeleteWhole { original_id }
        } else {
            ErasePlan::NoOp
        };
    }
    match surviving_runs(&drawing.points, eraser_path, eraser_width) {
        None => ErasePlan::NoOp,
        Some(runs) if runs.is_empty() => ErasePlan::DeleteWhole { original_id },
        Some(runs) => ErasePlan::Split { original_id, segments: into_segments(drawing, runs, next_id) },
    }
}

/// Maximal kept runs of at least [`MIN_RUN_POINTS`] points, or `None` when
/// the eraser touched neither a point nor a segment of the stroke.
#[must_use]
pub fn surviving_runs(points: &[Point], eraser_path: &[Point], eraser_width: f64) -> Option<Vec<Vec<Point>>> {
    let mut touched = false;
    let mut runs = Vec::new();
    let mut current: Vec<Point> = Vec::new();

    for &p in points {
        if point_near_path(p, eraser_path, eraser_width) {
            touched = true;
            flush_run(&mut current, &mut runs);
            continue;
        }
        if let Some(&prev) = current.last()
            && segment_near_path(prev, p, eraser_path, eraser_width)
        {
            touched = true;
            flush_run(&mut current, &mut runs);
        }
        current.push(p);
    }
    flush_run(&mut current, &mut runs);

    touched.then_some(runs)
}

fn flush_run(current: &mut Vec<Point>, runs: &mut Vec<Vec<Point>>) {
    let run = std::mem::take(current);
    if run.len() >= MIN_RUN_POINTS {
        runs.push(run);
    }
}

fn into_segments(stroke: &Drawing, runs: Vec<Vec<Point>>, mut next_id: impl FnMut() -> EntityId) -> Vec<Drawing> {
    runs.into_iter()
        .map(|points| Drawing {
            id: next_id(),
            owner: stroke.owner,
            shape: DrawingShape::Freehand,
            points,
            style: stroke.style.clone(),
        })
        .collect()
}

fn point_near_path(p: Point, path: &[Point], width: f64) -> bool {
    match path {
        [] => false,
        [only] => p.distance(*only) <= width,
        _ => path
            .windows(2)
            .any(|w| point_segment_distance(p, w[0], w[1]) <= width),
    }
}

fn segment_near_path(a: Point, b: Point, path: &[Point], width: f64) -> bool {
    match path {
        [] => false,
        [only] => point_segment_distance(*only, a, b) <= width,
        _ => path
            .windows(2)
            .any(|w| segment_segment_distance(a, b, w[0], w[1]) <= width),
    }
}

/// Polyline tracing a primitive's visible outline.
#[allow(clippy::cast_precision_loss)]
fn outline(drawing: &Drawing) -> Vec<Point> {
    match (drawing.shape, drawing.points.as_slice()) {
        (DrawingShape::Rect, [a, b, ..]) => vec![
            *a,
            Point::new(b.x, a.y),
            *b,
            Point::new(a.x, b.y),
            *a,
        ],
        (DrawingShape::Circle, [center, edge, ..]) => {
            let r = center.distance(*edge);
            (0..=CIRCLE_SEGMENTS)
                .map(|i| {
                    let t = TAU * i as f64 / CIRCLE_SEGMENTS as f64;
                    Point::new(center.x + r * t.cos(), center.y + r * t.sin())
                })
                .collect()
        }
        _ => drawing.points.clone(),
    }
}

fn outline_touched(outline: &[Point], path: &[Point], width: f64) -> bool {
    match outline {
        [] => false,
        [only] => point_near_path(*only, path, width),
        _ => outline
            .windows(2)
            .any(|w| segment_near_path(w[0], w[1], path, width)),
    }
}
