//! Marquee (drag-rectangle) hit-testing against scene-object bounds.
//!
//! An object matches when its bounding box overlaps the normalized drag
//! rectangle; containment is not required. On release the matches replace
//! the selection in one batch call when the sink supports it. Otherwise the
//! first match is selected in `Replace` mode and the rest in `Append` mode.
//!
//! A release with zero matches clears the selection, including a tiny drag
//! that was really a click on empty space. Keyboard/escape flows rely on
//! that clear.

#[cfg(test)]
#[path = "marquee_test.rs"]
mod marquee_test;

use tracing::debug;

use crate::geom::{Point, Rect};
use crate::selection::{SelectMode, SelectionSink};
use crate::snapshot::{EntityId, Snapshot};

/// Scene geometry lookups used by hit-testing.
pub trait BoundsProvider {
    /// Bounding box of `id` in the shared coordinate space.
    fn bounding_box(&self, id: &EntityId) -> Option<Rect>;

    /// Every id eligible for hit-testing, in a stable order.
    fn candidates(&self) -> Vec<EntityId>;
}

impl BoundsProvider for Snapshot {
    fn bounding_box(&self, id: &EntityId) -> Option<Rect> {
        self.scene_object(id).map(|o| o.bounds)
    }

    fn candidates(&self) -> Vec<EntityId> {
        self.scene_objects.iter().map(|o| o.id).collect()
    }
}

/// How a release was applied to the sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarqueeOutcome {
    /// No matches; the selection was cleared.
    Cleared,
    /// One native batch call with this many ids.
    Batch(usize),
    /// Per-id fallback with this many calls.
    Sequential(usize),
}

/// An in-progress marquee drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marquee {
    origin: Point,
    current: Point,
}

impl Marquee {
    #[must_use]
    pub fn begin(origin: Point) -> Self {
        Self { origin, current: origin }
    }

    pub fn update(&mut self, current: Point) {
        self.current = current;
    }

    /// The normalized drag rectangle.
    #[must_use]
    pub fn rect(&self) -> Rect {
        Rect::from_corners(self.origin, self.current)
    }

    /// Ids whose bounds overlap the current rectangle.
    #[must_use]
    pub fn hits(&self, provider: &dyn BoundsProvider) -> Vec<EntityId> {
        hit_test(&self.rect(), provider)
    }

    /// Finish the drag at `end` and apply the result to `sink`.
    pub fn release(mut self, end: Point, provider: &dyn BoundsProvider, sink: &mut dyn SelectionSink) -> MarqueeOutcome {
        self.update(end);
        let matches = self.hits(provider);
        apply_matches(&matches, sink)
    }
}

/// Ids from `provider` whose bounding box overlaps `rect`, in candidate order.
#[must_use]
pub fn hit_test(rect: &Rect, provider: &dyn BoundsProvider) -> Vec<EntityId> {
    provider
        .candidates()
        .into_iter()
        .filter(|id| provider.bounding_box(id).is_some_and(|b| b.overlaps(rect)))
        .collect()
}

/// Apply marquee matches to a selection sink.
pub fn apply_matches(matches: &[EntityId], sink: &mut dyn SelectionSink) -> MarqueeOutcome {
    if matches.is_empty() {
        sink.select(None, SelectMode::Replace);
        return MarqueeOutcome::Cleared;
    }
    if let Some(batch) = sink.as_batch() {
        batch.select_batch(matches);
        return MarqueeOutcome::Batch(matches.len());
    }
    debug!(count = matches.len(), "marquee: sink has no batch select, falling back to per-id");
    for (i, id) in matches.iter().enumerate() {
        let mode = if i == 0 { SelectMode::Replace } else { SelectMode::Append };
        sink.select(Some(*id), mode);
    }
    MarqueeOutcome::Sequential(matches.len())
}
