//! Local selection state and its mode-aware mutation API.
//!
//! Each client owns its selection outright. The host keeps a read-only
//! mirror per client (see [`SelectionController::mirror_action`]) so game
//! masters can see what others have selected, but selections are never
//! merged across clients.
//!
//! | mode | effect on the current set S |
//! |------|-----------------------------|
//! | `Replace` | S := {id} |
//! | `Append` | S := S ∪ {id} |
//! | `Subtract` | S := S \ {id} |
//! | `Toggle` | remove if present, else add (replace when S is empty) |
//!
//! Selecting `None` clears regardless of mode. Batch selection always
//! replaces.

#[cfg(test)]
#[path = "selection_test.rs"]
mod selection_test;

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::action::Action;
use crate::gesture::Tool;
use crate::snapshot::{EntityId, Snapshot};

/// How a single-id selection combines with the current set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectMode {
    #[default]
    Replace,
    Append,
    Subtract,
    Toggle,
}

/// Cardinality of the current selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMode {
    None,
    Single,
    Multiple,
}

/// The selected ids. The mode is derived from the set size, so
/// `None ⇔ empty` and `Single ⇒ one id` hold by construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    ids: BTreeSet<EntityId>,
}

impl SelectionState {
    #[must_use]
    pub fn mode(&self) -> SelectionMode {
        match self.ids.len() {
            0 => SelectionMode::None,
            1 => SelectionMode::Single,
            _ => SelectionMode::Multiple,
        }
    }

    #[must_use]
    pub fn ids(&self) -> &BTreeSet<EntityId> {
        &self.ids
    }

    #[must_use]
    pub fn contains(&self, id: &EntityId) -> bool {
        self.ids.contains(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// The only selected id when the mode is `Single`.
    #[must_use]
    pub fn single(&self) -> Option<EntityId> {
        match self.mode() {
            SelectionMode::Single => self.ids.first().copied(),
            _ => None,
        }
    }
}

/// Anything that accepts single-id selection requests.
pub trait SelectionSink {
    fn select(&mut self, id: Option<EntityId>, mode: SelectMode);

    /// Native batch capability, when the sink has one.
    fn as_batch(&mut self) -> Option<&mut dyn BatchSelect> {
        None
    }
}

/// Replace-the-whole-selection in one call.
pub trait BatchSelect {
    fn select_batch(&mut self, ids: &[EntityId]);
}

/// Owns one client's selection.
#[derive(Debug, Clone, Default)]
pub struct SelectionController {
    state: SelectionState,
}

impl SelectionController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    /// Apply a single-id selection. Returns whether the set changed.
    pub fn select(&mut self, id: Option<EntityId>, mode: SelectMode) -> bool {
        let before = self.state.ids.clone();
        let ids = &mut self.state.ids;
        match (id, mode) {
            (None, _) => ids.clear(),
            (Some(id), SelectMode::Replace) => {
                ids.clear();
                ids.insert(id);
            }
            (Some(id), SelectMode::Append) => {
                ids.insert(id);
            }
            (Some(id), SelectMode::Subtract) => {
                ids.remove(&id);
            }
            (Some(id), SelectMode::Toggle) => {
                if !ids.remove(&id) {
                    ids.insert(id);
                }
            }
        }
        self.state.ids != before
    }

    /// Replace the selection with `ids`. An empty slice clears.
    pub fn select_batch(&mut self, ids: &[EntityId]) -> bool {
        let next: BTreeSet<EntityId> = ids.iter().copied().collect();
        let changed = next != self.state.ids;
        self.state.ids = next;
        changed
    }

    pub fn clear(&mut self) -> bool {
        self.select(None, SelectMode::Replace)
    }

    /// Reset hook for tool changes: leaving the select tool clears the selection.
    pub fn on_tool_change(&mut self, from: Tool, to: Tool) -> bool {
        if from == Tool::Select && to != Tool::Select {
            return self.clear();
        }
        false
    }

    /// Drop ids that no longer name a selectable object in `snapshot`.
    pub fn retain_existing(&mut self, snapshot: &Snapshot) -> bool {
        let before = self.state.ids.len();
        self.state.ids.retain(|id| snapshot.is_selectable(id));
        self.state.ids.len() != before
    }

    /// The action that mirrors this selection into the snapshot.
    #[must_use]
    pub fn mirror_action(&self) -> Action {
        match self.state.mode() {
            SelectionMode::None => Action::SelectObject { id: None },
            SelectionMode::Single => Action::SelectObject { id: self.state.single() },
            SelectionMode::Multiple => Action::SelectMultiple { ids: self.state.ids.iter().copied().collect() },
        }
    }
}

impl SelectionSink for SelectionController {
    fn select(&mut self, id: Option<EntityId>, mode: SelectMode) {
        SelectionController::select(self, id, mode);
    }

    fn as_batch(&mut self) -> Option<&mut dyn BatchSelect> {
        Some(self)
    }
}

impl BatchSelect for SelectionController {
    fn select_batch(&mut self, ids: &[EntityId]) {
        SelectionController::select_batch(self, ids);
    }
}
