//! Snapshot model: the full, replace-not-patch session state broadcast by
//! the authoritative host.
//!
//! A [`Snapshot`] is never patched on the client. Every broadcast replaces
//! the previous value wholesale, so the types here are plain data with
//! lookups and an invariant check ([`Snapshot::validate`]). Collections are
//! `Vec`s because their order is meaningful: combat ordering breaks ties by
//! position in `characters`, and the default combat order follows
//! `players`.

#[cfg(test)]
#[path = "snapshot_test.rs"]
mod snapshot_test;

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::consts::GRID_SIZE;
use crate::geom::{Point, Rect};

/// Unique identifier for any session entity.
pub type EntityId = Uuid;

// =============================================================================
// ERRORS
// =============================================================================

/// Lookup failure against the current snapshot.
///
/// Usually a race with a concurrent deletion. Callers log and drop the
/// operation rather than surfacing it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SceneError {
    #[error("object not found: {0}")]
    ObjectNotFound(EntityId),
}

/// Violation of the snapshot's structural invariants.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SnapshotError {
    #[error("duplicate {collection} id: {id}")]
    DuplicateId { collection: &'static str, id: EntityId },
    #[error("{from} {id} references missing {target}")]
    DanglingReference { from: &'static str, id: EntityId, target: &'static str },
}

// =============================================================================
// ENTITIES
// =============================================================================

/// A connected participant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub uid: EntityId,
    pub name: String,
    /// Game masters are pinned above the initiative order.
    #[serde(default)]
    pub is_dm: bool,
}

/// A player character (owned) or NPC (unowned).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub id: EntityId,
    pub name: String,
    /// Owning player's uid. `None` marks an NPC.
    #[serde(default)]
    pub owner: Option<EntityId>,
    #[serde(default)]
    pub initiative: Option<i32>,
    #[serde(default)]
    pub token_id: Option<EntityId>,
}

impl Character {
    #[must_use]
    pub fn is_npc(&self) -> bool {
        self.owner.is_none()
    }
}

/// A character's marker on the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub id: EntityId,
    #[serde(default)]
    pub character_id: Option<EntityId>,
    pub x: f64,
    pub y: f64,
    pub size: f64,
}

impl Token {
    #[must_use]
    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.size, self.size)
    }
}

/// Geometry family of a drawing. Only freehand strokes can be split by a
/// partial erase; primitives are erased whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrawingShape {
    Freehand,
    Line,
    Rect,
    Circle,
}

/// Non-geometric stroke attributes, copied verbatim onto split segments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrokeStyle {
    pub color: String,
    pub width: f64,
    pub opacity: f64,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self { color: "#1F1A17".into(), width: 2.0, opacity: 1.0 }
    }
}

/// A drawn stroke or primitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Drawing {
    pub id: EntityId,
    #[serde(default)]
    pub owner: Option<EntityId>,
    pub shape: DrawingShape,
    pub points: Vec<Point>,
    #[serde(default)]
    pub style: StrokeStyle,
}

impl Drawing {
    /// Point bounds inflated by half the stroke width, or `None` for a
    /// drawing with no points.
    #[must_use]
    pub fn bounds(&self) -> Option<Rect> {
        let r = Rect::bounding(&self.points)?;
        let pad = self.style.width / 2.0;
        Some(Rect::new(r.x - pad, r.y - pad, r.w + 2.0 * pad, r.h + 2.0 * pad))
    }
}

/// What a scene object stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SceneObjectKind {
    /// Placement of a [`Token`]; the object's id is the token's id.
    Token,
    /// Placement of a [`Drawing`]; the object's id is the drawing's id.
    Drawing,
    /// Free-standing prop with its own id.
    Prop,
    /// Staging zone for tokens about to enter the map.
    StagingZone,
}

/// A selectable, transformable placement on the scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
    pub id: EntityId,
    pub kind: SceneObjectKind,
    pub bounds: Rect,
    #[serde(default)]
    pub rotation: f64,
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub label: String,
}

/// A drawing, its placement, and where each sits in its collection.
///
/// Enough to put a removed drawing back exactly: same placement state and
/// same z-order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawingSlot {
    pub drawing: Drawing,
    pub placement: SceneObject,
    pub drawing_index: usize,
    pub object_index: usize,
}

// =============================================================================
// SNAPSHOT
// =============================================================================

/// Full session state as of one host broadcast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    /// Host-assigned counter, bumped once per applied batch.
    pub revision: u64,
    pub players: Vec<Player>,
    pub characters: Vec<Character>,
    pub tokens: Vec<Token>,
    pub drawings: Vec<Drawing>,
    pub scene_objects: Vec<SceneObject>,
    /// Per-client selection mirror, written only by its owner.
    pub selections: BTreeMap<EntityId, Vec<EntityId>>,
    pub grid_size: f64,
    pub combat_active: bool,
    pub current_turn_id: Option<EntityId>,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            revision: 0,
            players: Vec::new(),
            characters: Vec::new(),
            tokens: Vec::new(),
            drawings: Vec::new(),
            scene_objects: Vec::new(),
            selections: BTreeMap::new(),
            grid_size: GRID_SIZE,
            combat_active: false,
            current_turn_id: None,
        }
    }
}

impl Snapshot {
    #[must_use]
    pub fn player(&self, uid: &EntityId) -> Option<&Player> {
        self.players.iter().find(|p| &p.uid == uid)
    }

    #[must_use]
    pub fn character(&self, id: &EntityId) -> Option<&Character> {
        self.characters.iter().find(|c| &c.id == id)
    }

    #[must_use]
    pub fn token(&self, id: &EntityId) -> Option<&Token> {
        self.tokens.iter().find(|t| &t.id == id)
    }

    #[must_use]
    pub fn drawing(&self, id: &EntityId) -> Option<&Drawing> {
        self.drawings.iter().find(|d| &d.id == id)
    }

    #[must_use]
    pub fn scene_object(&self, id: &EntityId) -> Option<&SceneObject> {
        self.scene_objects.iter().find(|o| &o.id == id)
    }

    /// Look up a drawing, reporting a missing id as [`SceneError::ObjectNotFound`].
    ///
    /// # Errors
    ///
    /// Returns `ObjectNotFound` when no drawing has this id.
    pub fn require_drawing(&self, id: &EntityId) -> Result<&Drawing, SceneError> {
        self.drawing(id).ok_or(SceneError::ObjectNotFound(*id))
    }

    /// Look up a scene object, reporting a missing id as [`SceneError::ObjectNotFound`].
    ///
    /// # Errors
    ///
    /// Returns `ObjectNotFound` when no scene object has this id.
    pub fn require_scene_object(&self, id: &EntityId) -> Result<&SceneObject, SceneError> {
        self.scene_object(id).ok_or(SceneError::ObjectNotFound(*id))
    }

    /// Capture drawing `id` with its placement and collection positions.
    ///
    /// # Errors
    ///
    /// Returns `ObjectNotFound` when the drawing or its placement is missing.
    pub fn drawing_slot(&self, id: &EntityId) -> Result<DrawingSlot, SceneError> {
        let missing = || SceneError::ObjectNotFound(*id);
        let drawing_index = self.drawings.iter().position(|d| &d.id == id).ok_or_else(missing)?;
        let object_index = self.scene_objects.iter().position(|o| &o.id == id).ok_or_else(missing)?;
        Ok(DrawingSlot {
            drawing: self.drawings[drawing_index].clone(),
            placement: self.scene_objects[object_index].clone(),
            drawing_index,
            object_index,
        })
    }

    /// Whether `id` names anything a client can select.
    #[must_use]
    pub fn is_selectable(&self, id: &EntityId) -> bool {
        self.scene_object(id).is_some()
    }

    /// Number of player characters owned by `uid`.
    #[must_use]
    pub fn owned_character_count(&self, uid: &EntityId) -> usize {
        self.characters
            .iter()
            .filter(|c| c.owner.as_ref() == Some(uid))
            .count()
    }

    /// Number of NPCs in the session.
    #[must_use]
    pub fn npc_count(&self) -> usize {
        self.characters.iter().filter(|c| c.is_npc()).count()
    }

    /// Number of drawings owned by `uid`.
    #[must_use]
    pub fn owned_drawing_count(&self, uid: &EntityId) -> usize {
        self.drawings
            .iter()
            .filter(|d| d.owner.as_ref() == Some(uid))
            .count()
    }

    /// Check id uniqueness and cross-references.
    ///
    /// # Errors
    ///
    /// Returns the first violation found.
    pub fn validate(&self) -> Result<(), SnapshotError> {
        unique_ids("player", self.players.iter().map(|p| p.uid))?;
        unique_ids("character", self.characters.iter().map(|c| c.id))?;
        unique_ids("token", self.tokens.iter().map(|t| t.id))?;
        unique_ids("drawing", self.drawings.iter().map(|d| d.id))?;
        unique_ids("scene object", self.scene_objects.iter().map(|o| o.id))?;

        for obj in &self.scene_objects {
            let target = match obj.kind {
                SceneObjectKind::Token if self.token(&obj.id).is_none() => "token",
                SceneObjectKind::Drawing if self.drawing(&obj.id).is_none() => "drawing",
                _ => continue,
            };
            return Err(SnapshotError::DanglingReference { from: "scene object", id: obj.id, target });
        }
        for c in &self.characters {
            if let Some(token_id) = c.token_id
                && self.token(&token_id).is_none()
            {
                return Err(SnapshotError::DanglingReference { from: "character", id: c.id, target: "token" });
            }
        }
        if let Some(turn) = self.current_turn_id
            && self.character(&turn).is_none()
        {
            return Err(SnapshotError::DanglingReference { from: "current turn", id: turn, target: "character" });
        }
        Ok(())
    }
}

fn unique_ids(collection: &'static str, ids: impl Iterator<Item = EntityId>) -> Result<(), SnapshotError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(SnapshotError::DuplicateId { collection, id });
        }
    }
    Ok(())
}
