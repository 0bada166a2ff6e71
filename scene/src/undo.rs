//! Undo history for drawing edits.
//!
//! DESIGN
//! ======
//! Each entry stores a forward action and its inverse, both fully resolved
//! when the edit is first applied. Redo replays the cached forward action
//! rather than recomputing it, so a partial erase redone after an undo
//! produces segments with the same ids as the first time. Recomputing would
//! mint fresh v4 ids and orphan any reference to the earlier segments.
//!
//! History is linear: recording a new entry drops the redo stack. Depth is
//! bounded; the oldest entry falls off first.
//!
//! Stepping is two-phase. The caller peeks the action with `next_undo` or
//! `next_redo`, applies it, and only then moves the entry with
//! `commit_undo` or `commit_redo`. A replay the host rejects leaves both
//! stacks as they were, so a retry targets the same entry.

#[cfg(test)]
#[path = "undo_test.rs"]
mod undo_test;

use std::collections::VecDeque;

use crate::action::Action;
use crate::geom::Rect;
use crate::snapshot::{Drawing, DrawingSlot, SceneObject};

/// A reversible edit.
#[derive(Debug, Clone, PartialEq)]
pub struct UndoEntry {
    pub forward: Action,
    pub inverse: Action,
}

impl UndoEntry {
    /// Erase that replaced `original` by `segments`. Undo drops the segments
    /// and reinstates the original under its own id, in its old slot.
    #[must_use]
    pub fn for_partial_erase(original: &DrawingSlot, segments: Vec<Drawing>) -> Self {
        let remove = segments.iter().map(|s| s.id).collect();
        Self {
            forward: Action::ErasePartial { original_id: original.drawing.id, segments },
            inverse: Action::RestoreDrawing { slot: original.clone(), remove },
        }
    }

    #[must_use]
    pub fn for_draw(drawing: &Drawing) -> Self {
        Self {
            forward: Action::Draw { drawing: drawing.clone() },
            inverse: Action::DeleteDrawing { id: drawing.id },
        }
    }

    #[must_use]
    pub fn for_delete_drawing(slot: &DrawingSlot) -> Self {
        Self {
            forward: Action::DeleteDrawing { id: slot.drawing.id },
            inverse: Action::RestoreDrawing { slot: slot.clone(), remove: Vec::new() },
        }
    }

    /// Move or resize of `before` to `bounds`/`rotation`.
    #[must_use]
    pub fn for_transform(before: &SceneObject, bounds: Rect, rotation: f64) -> Self {
        Self {
            forward: Action::TransformObject { id: before.id, bounds, rotation },
            inverse: Action::TransformObject { id: before.id, bounds: before.bounds, rotation: before.rotation },
        }
    }
}

/// Bounded linear undo/redo history for one owner.
#[derive(Debug, Clone)]
pub struct UndoLog {
    depth: usize,
    undo: VecDeque<UndoEntry>,
    redo: Vec<UndoEntry>,
}

impl UndoLog {
    #[must_use]
    pub fn new(depth: usize) -> Self {
        Self { depth, undo: VecDeque::new(), redo: Vec::new() }
    }

    /// Push a freshly applied edit. Clears the redo stack.
    pub fn record(&mut self, entry: UndoEntry) {
        self.redo.clear();
        if self.depth == 0 {
            return;
        }
        self.undo.push_back(entry);
        while self.undo.len() > self.depth {
            self.undo.pop_front();
        }
    }

    /// The action that reverses the newest edit.
    #[must_use]
    pub fn next_undo(&self) -> Option<&Action> {
        self.undo.back().map(|e| &e.inverse)
    }

    /// Move the newest edit onto the redo stack once its inverse applied.
    pub fn commit_undo(&mut self) {
        if let Some(entry) = self.undo.pop_back() {
            self.redo.push(entry);
        }
    }

    /// The cached forward action of the most recently undone edit.
    #[must_use]
    pub fn next_redo(&self) -> Option<&Action> {
        self.redo.last().map(|e| &e.forward)
    }

    /// Move the most recently undone edit back onto the undo stack once its
    /// forward action applied.
    pub fn commit_redo(&mut self) {
        if let Some(entry) = self.redo.pop() {
            self.undo.push_back(entry);
        }
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.undo.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.undo.is_empty()
    }
}
