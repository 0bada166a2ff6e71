//! Actions: tagged records a client sends to the authoritative host.
//!
//! The host's only contract toward clients is to reflect accepted actions in
//! a later snapshot and never reflect rejected ones. Actions therefore carry
//! everything needed to apply them; there is no acknowledgement channel.

#[cfg(test)]
#[path = "action_test.rs"]
mod action_test;

use serde::{Deserialize, Serialize};

use crate::geom::{Point, Rect};
use crate::snapshot::{Drawing, DrawingSlot, EntityId};

/// A single session mutation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Action {
    /// Register the sender as a player.
    Join {
        name: String,
        #[serde(default)]
        is_dm: bool,
    },
    /// Remove the sender and their selection mirror.
    Leave,
    /// Create a character owned by the sender, optionally with a token.
    CreateCharacter {
        name: String,
        #[serde(default)]
        token_at: Option<Point>,
    },
    DeleteCharacter { id: EntityId },
    /// Create an unowned character, optionally with a token.
    CreateNpc {
        name: String,
        #[serde(default)]
        token_at: Option<Point>,
    },
    DeleteNpc { id: EntityId },
    SetInitiative { character_id: EntityId, value: i32 },
    ClearInitiative { character_id: EntityId },
    StartCombat,
    EndCombat,
    AdvanceTurn,
    RewindTurn,
    CreateProp { label: String, bounds: Rect },
    UpdateProp {
        id: EntityId,
        #[serde(default)]
        label: Option<String>,
        #[serde(default)]
        bounds: Option<Rect>,
    },
    DeleteProp { id: EntityId },
    /// Add a drawing. The client chooses its id.
    Draw { drawing: Drawing },
    /// Replace one freehand stroke by its surviving segments, atomically.
    ErasePartial { original_id: EntityId, segments: Vec<Drawing> },
    /// Inverse of an erase: drop `remove` and reinstate the captured drawing
    /// at its old positions with its old placement.
    RestoreDrawing { slot: DrawingSlot, remove: Vec<EntityId> },
    DeleteDrawing { id: EntityId },
    TransformObject { id: EntityId, bounds: Rect, rotation: f64 },
    LockSelected { ids: Vec<EntityId> },
    UnlockSelected { ids: Vec<EntityId> },
    /// Mirror the sender's single selection (or none) into the snapshot.
    SelectObject { id: Option<EntityId> },
    /// Mirror the sender's multi-selection into the snapshot.
    SelectMultiple { ids: Vec<EntityId> },
    Undo,
    Redo,
}

impl Action {
    /// Stable kebab-case name, matching the serialized `type` tag.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Join { .. } => "join",
            Self::Leave => "leave",
            Self::CreateCharacter { .. } => "create-character",
            Self::DeleteCharacter { .. } => "delete-character",
            Self::CreateNpc { .. } => "create-npc",
            Self::DeleteNpc { .. } => "delete-npc",
            Self::SetInitiative { .. } => "set-initiative",
            Self::ClearInitiative { .. } => "clear-initiative",
            Self::StartCombat => "start-combat",
            Self::EndCombat => "end-combat",
            Self::AdvanceTurn => "advance-turn",
            Self::RewindTurn => "rewind-turn",
            Self::CreateProp { .. } => "create-prop",
            Self::UpdateProp { .. } => "update-prop",
            Self::DeleteProp { .. } => "delete-prop",
            Self::Draw { .. } => "draw",
            Self::ErasePartial { .. } => "erase-partial",
            Self::RestoreDrawing { .. } => "restore-drawing",
            Self::DeleteDrawing { .. } => "delete-drawing",
            Self::TransformObject { .. } => "transform-object",
            Self::LockSelected { .. } => "lock-selected",
            Self::UnlockSelected { .. } => "unlock-selected",
            Self::SelectObject { .. } => "select-object",
            Self::SelectMultiple { .. } => "select-multiple",
            Self::Undo => "undo",
            Self::Redo => "redo",
        }
    }
}

/// An action together with its sender, as carried by the channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub from: EntityId,
    pub action: Action,
}

impl Envelope {
    #[must_use]
    pub fn new(from: EntityId, action: Action) -> Self {
        Self { from, action }
    }
}
