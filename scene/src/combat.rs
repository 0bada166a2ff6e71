//! Combat ordering: derive the initiative list from raw snapshot collections.
//!
//! DESIGN
//! ======
//! One [`CombatEntity`] per (player, owned character) pair and one per NPC.
//! Game-master entities are pinned above the list and never reordered. The
//! rest sort by initiative descending, then player characters before NPCs,
//! then position in the authoritative character collection. The last key
//! makes the output a pure function of the snapshot: re-deriving from an
//! unchanged snapshot yields the same id sequence, which turn advance relies
//! on when it does index arithmetic across re-renders.
//!
//! With combat inactive and no initiative rolled anywhere the list keeps its
//! build order: players in player-list order, then NPCs.

#[cfg(test)]
#[path = "combat_test.rs"]
mod combat_test;

use serde::Serialize;

use crate::consts::UNROLLED_INITIATIVE;
use crate::snapshot::{Character, EntityId, Player, Snapshot, Token};

/// A character joined with its owner and token for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CombatEntity {
    pub character: Character,
    pub player: Option<Player>,
    pub token: Option<Token>,
    pub is_me: bool,
    pub is_current_turn: bool,
    /// First pinned entity. Rendering only; not used for ordering.
    pub is_first_dm: bool,
    /// Position of the character in the snapshot's character list.
    pub source_index: usize,
}

impl CombatEntity {
    #[must_use]
    pub fn id(&self) -> EntityId {
        self.character.id
    }

    #[must_use]
    pub fn is_pc(&self) -> bool {
        self.player.is_some()
    }

    /// Initiative with "not rolled" sunk below every real roll.
    #[must_use]
    pub fn initiative_key(&self) -> i32 {
        self.character.initiative.unwrap_or(UNROLLED_INITIATIVE)
    }
}

/// Pinned game-master entities plus the ordered combatants.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CombatOrder {
    pub pinned: Vec<CombatEntity>,
    pub ordered: Vec<CombatEntity>,
}

impl CombatOrder {
    /// Ids of the ordered combatants, in turn order.
    #[must_use]
    pub fn ordered_ids(&self) -> Vec<EntityId> {
        self.ordered.iter().map(CombatEntity::id).collect()
    }
}

/// Direction of a turn change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnDirection {
    Next,
    Previous,
}

/// Build the combat order from snapshot collections.
#[must_use]
pub fn compute_order(
    players: &[Player],
    characters: &[Character],
    tokens: &[Token],
    current_uid: EntityId,
    combat_active: bool,
    current_turn_id: Option<EntityId>,
) -> CombatOrder {
    let make = |index: usize, character: &Character, player: Option<&Player>| CombatEntity {
        character: character.clone(),
        player: player.cloned(),
        token: find_token(tokens, character).cloned(),
        is_me: player.is_some_and(|p| p.uid == current_uid),
        is_current_turn: combat_active && current_turn_id == Some(character.id),
        is_first_dm: false,
        source_index: index,
    };

    let mut entities = Vec::with_capacity(characters.len());
    for player in players {
        for (index, character) in characters.iter().enumerate() {
            if character.owner == Some(player.uid) {
                entities.push(make(index, character, Some(player)));
            }
        }
    }
    for (index, character) in characters.iter().enumerate() {
        if character.is_npc() {
            entities.push(make(index, character, None));
        }
    }

    let (mut pinned, mut rest): (Vec<CombatEntity>, Vec<CombatEntity>) = entities
        .into_iter()
        .partition(|e| e.player.as_ref().is_some_and(|p| p.is_dm));
    if let Some(first) = pinned.first_mut() {
        first.is_first_dm = true;
    }

    let any_rolled = rest.iter().any(|e| e.character.initiative.is_some());
    if combat_active || any_rolled {
        rest.sort_by(|a, b| {
            b.initiative_key()
                .cmp(&a.initiative_key())
                .then_with(|| b.is_pc().cmp(&a.is_pc()))
                .then_with(|| a.source_index.cmp(&b.source_index))
        });
    }

    CombatOrder { pinned, ordered: rest }
}

/// [`compute_order`] over a whole snapshot.
#[must_use]
pub fn compute_order_for(snapshot: &Snapshot, current_uid: EntityId) -> CombatOrder {
    compute_order(
        &snapshot.players,
        &snapshot.characters,
        &snapshot.tokens,
        current_uid,
        snapshot.combat_active,
        snapshot.current_turn_id,
    )
}

fn find_token<'a>(tokens: &'a [Token], character: &Character) -> Option<&'a Token> {
    match character.token_id {
        Some(token_id) => tokens.iter().find(|t| t.id == token_id),
        None => tokens.iter().find(|t| t.character_id == Some(character.id)),
    }
}

/// Index of `current` in `ordered`.
#[must_use]
pub fn turn_index(ordered: &[CombatEntity], current: Option<EntityId>) -> Option<usize> {
    let current = current?;
    ordered.iter().position(|e| e.id() == current)
}

/// The combatant whose turn follows (or precedes) `current`, wrapping at
/// both ends. With no current turn, `Next` starts at the top and `Previous`
/// at the bottom.
#[must_use]
pub fn step_turn(ordered: &[CombatEntity], current: Option<EntityId>, direction: TurnDirection) -> Option<EntityId> {
    let len = ordered.len();
    if len == 0 {
        return None;
    }
    let next = match (turn_index(ordered, current), direction) {
        (Some(i), TurnDirection::Next) => (i + 1) % len,
        (Some(i), TurnDirection::Previous) => (i + len - 1) % len,
        (None, TurnDirection::Next) => 0,
        (None, TurnDirection::Previous) => len - 1,
    };
    Some(ordered[next].id())
}
