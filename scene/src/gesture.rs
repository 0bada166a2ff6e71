//! Input model: tool modes and the double-tap state machine.
//!
//! `Tool` captures which interaction the pointer is bound to; the selection
//! controller resets when the select tool is left. `TapTracker` replaces a
//! process-wide "last tap" timer with state owned by the gesture component
//! and parameterized by its thresholds.

#[cfg(test)]
#[path = "gesture_test.rs"]
mod gesture_test;

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::consts::{DOUBLE_TAP_DISTANCE, DOUBLE_TAP_MS};
use crate::geom::Point;

/// Which tool is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    /// Pointer / marquee selection (default).
    #[default]
    Select,
    /// Pan the map.
    Pan,
    /// Freehand pen.
    Draw,
    /// Straight line primitive.
    Line,
    /// Rectangle primitive.
    Rect,
    /// Circle primitive.
    Circle,
    /// Partial eraser.
    Erase,
}

impl Tool {
    /// Whether this tool produces drawings.
    #[must_use]
    pub fn is_drawing(self) -> bool {
        matches!(self, Self::Draw | Self::Line | Self::Rect | Self::Circle)
    }
}

/// Outcome of registering a tap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapKind {
    Single,
    Double,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct LastTap {
    position: Point,
    at: Instant,
}

/// Classifies taps as single or double.
#[derive(Debug, Clone)]
pub struct TapTracker {
    last: Option<LastTap>,
    max_interval: Duration,
    max_distance: f64,
}

impl Default for TapTracker {
    fn default() -> Self {
        Self::new(Duration::from_millis(DOUBLE_TAP_MS), DOUBLE_TAP_DISTANCE)
    }
}

impl TapTracker {
    #[must_use]
    pub fn new(max_interval: Duration, max_distance: f64) -> Self {
        Self { last: None, max_interval, max_distance }
    }

    /// Register a tap. A tap close enough in time and space to the previous
    /// one is a double tap and consumes the state, so a third tap starts over.
    pub fn register_tap(&mut self, position: Point, now: Instant) -> TapKind {
        if let Some(last) = self.last
            && now.saturating_duration_since(last.at) <= self.max_interval
            && last.position.distance(position) <= self.max_distance
        {
            self.last = None;
            return TapKind::Double;
        }
        self.last = Some(LastTap { position, at: now });
        TapKind::Single
    }

    /// Forget any pending first tap.
    pub fn reset(&mut self) {
        self.last = None;
    }

    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.last.is_some()
    }
}
