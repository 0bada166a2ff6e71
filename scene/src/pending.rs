//! Pending actions: confirmation by diffing consecutive snapshots.
//!
//! DESIGN
//! ======
//! The host never acknowledges an action directly. A client that fires a
//! creation or mutation registers a [`PendingAction`] carrying a match
//! predicate over `(new snapshot, reference snapshot)`. Every incoming
//! snapshot re-evaluates the predicates of all outstanding actions; a match
//! resolves the action and clears its loading state.
//!
//! Predicates compare counts and identities, never content. The transport
//! may coalesce or reorder fields, so "my character count went up" is the
//! confirmation for a create, even if the new name differs from the request.
//! A false positive clears a spinner slightly early; a false negative leaves
//! it stuck until the deadline.
//!
//! REFERENCE SNAPSHOTS
//! ===================
//! The reference a predicate compares against is the snapshot observed when
//! the action began. While an action of kind K is outstanding its reference
//! is frozen: later snapshots do not advance it, so an unrelated change to
//! the collection cannot move the baseline out from under it. Cancelling or
//! resolving drops the reference, and the next `begin` for K captures a
//! fresh one from the latest snapshot.
//!
//! POLICY
//! ======
//! One action per kind per owner. A second `begin` for a kind already in
//! flight returns [`PendingError::AlreadyInProgress`]; it is not queued.
//! Deadlines flip the action to [`PendingError::TimedOut`] and never retry.
//! `cancel` is idempotent. Nothing here panics.

#[cfg(test)]
#[path = "pending_test.rs"]
mod pending_test;

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::snapshot::{EntityId, SceneObjectKind, Snapshot};

// =============================================================================
// TYPES
// =============================================================================

/// What a pending action is waiting for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PendingKind {
    CreateCharacter,
    DeleteCharacter,
    CreateNpc,
    DeleteNpc,
    SetInitiative,
    CreateProp,
}

impl PendingKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CreateCharacter => "create-character",
            Self::DeleteCharacter => "delete-character",
            Self::CreateNpc => "create-npc",
            Self::DeleteNpc => "delete-npc",
            Self::SetInitiative => "set-initiative",
            Self::CreateProp => "create-prop",
        }
    }
}

impl fmt::Display for PendingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Predicate over `(new, reference)` snapshots that signals confirmation.
pub type MatchPredicate = Box<dyn Fn(&Snapshot, &Snapshot) -> bool + Send + Sync>;

/// Soft, user-recoverable failures. Display text is the inline UI message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PendingError {
    #[error("{kind} is already in progress, try again in a moment")]
    AlreadyInProgress { kind: PendingKind },
    #[error("{kind} was not confirmed within {waited_ms} ms, please retry")]
    TimedOut { kind: PendingKind, waited_ms: u64 },
}

/// Receipt for a successful `begin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Started {
    pub kind: PendingKind,
    pub deadline: Instant,
}

/// An outstanding action awaiting a confirming snapshot.
pub struct PendingAction {
    pub kind: PendingKind,
    pub owner: EntityId,
    pub submitted_at: Instant,
    reference: Arc<Snapshot>,
    predicate: MatchPredicate,
}

impl fmt::Debug for PendingAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingAction")
            .field("kind", &self.kind)
            .field("owner", &self.owner)
            .field("submitted_at", &self.submitted_at)
            .field("reference_revision", &self.reference.revision)
            .finish_non_exhaustive()
    }
}

/// Loading state of one kind, as shown next to its triggering control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingStatus {
    Idle,
    InProgress { since: Instant },
    Failed(PendingError),
}

// =============================================================================
// TRACKER
// =============================================================================

/// Per-owner tracker of in-flight actions, one per [`PendingKind`].
pub struct PendingTracker {
    owner: EntityId,
    timeout: Duration,
    latest: Arc<Snapshot>,
    active: BTreeMap<PendingKind, PendingAction>,
    failures: BTreeMap<PendingKind, PendingError>,
}

impl PendingTracker {
    /// The reference starts as an empty placeholder snapshot. Actions begun
    /// before the first real snapshot is recorded diff against it, so callers
    /// should feed one in before tracking count-based actions.
    #[must_use]
    pub fn new(owner: EntityId, timeout: Duration) -> Self {
        Self {
            owner,
            timeout,
            latest: Arc::new(Snapshot::default()),
            active: BTreeMap::new(),
            failures: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn owner(&self) -> EntityId {
        self.owner
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Start tracking an action of `kind`.
    ///
    /// # Errors
    ///
    /// Returns [`PendingError::AlreadyInProgress`] when `kind` is already in
    /// flight. The caller must not send the action in that case.
    pub fn begin(&mut self, kind: PendingKind, predicate: MatchPredicate) -> Result<Started, PendingError> {
        self.begin_at(kind, predicate, Instant::now())
    }

    /// [`begin`](Self::begin) with an explicit clock reading.
    ///
    /// # Errors
    ///
    /// Returns [`PendingError::AlreadyInProgress`] when `kind` is already in flight.
    pub fn begin_at(
        &mut self,
        kind: PendingKind,
        predicate: MatchPredicate,
        now: Instant,
    ) -> Result<Started, PendingError> {
        if self.active.contains_key(&kind) {
            debug!(owner = %self.owner, %kind, "pending action rejected: already in progress");
            return Err(PendingError::AlreadyInProgress { kind });
        }
        self.failures.remove(&kind);
        self.active.insert(
            kind,
            PendingAction {
                kind,
                owner: self.owner,
                submitted_at: now,
                reference: Arc::clone(&self.latest),
                predicate,
            },
        );
        info!(owner = %self.owner, %kind, revision = self.latest.revision, "pending action started");
        Ok(Started { kind, deadline: now + self.timeout })
    }

    /// Record a new snapshot and resolve every action whose predicate now holds.
    pub fn on_snapshot_change(&mut self, snapshot: Arc<Snapshot>) -> Vec<PendingKind> {
        self.on_snapshot_change_at(snapshot, Instant::now())
    }

    /// [`on_snapshot_change`](Self::on_snapshot_change) with an explicit clock reading.
    ///
    /// A match is honoured even past the deadline if the timeout has not been
    /// polled yet; the effect did land.
    pub fn on_snapshot_change_at(&mut self, snapshot: Arc<Snapshot>, now: Instant) -> Vec<PendingKind> {
        let resolved: Vec<PendingKind> = self
            .active
            .values()
            .filter(|p| (p.predicate)(&snapshot, &p.reference))
            .map(|p| p.kind)
            .collect();
        for kind in &resolved {
            if let Some(p) = self.active.remove(kind) {
                let elapsed_ms = now.saturating_duration_since(p.submitted_at).as_millis();
                info!(owner = %self.owner, %kind, revision = snapshot.revision, elapsed_ms, "pending action confirmed");
            }
        }
        self.latest = snapshot;
        resolved
    }

    /// Flip every action past its deadline to the failed state.
    pub fn poll_timeouts(&mut self) -> Vec<PendingError> {
        self.poll_timeouts_at(Instant::now())
    }

    /// [`poll_timeouts`](Self::poll_timeouts) with an explicit clock reading.
    pub fn poll_timeouts_at(&mut self, now: Instant) -> Vec<PendingError> {
        let expired: Vec<PendingKind> = self
            .active
            .values()
            .filter(|p| now.saturating_duration_since(p.submitted_at) >= self.timeout)
            .map(|p| p.kind)
            .collect();
        let mut errors = Vec::with_capacity(expired.len());
        for kind in expired {
            self.active.remove(&kind);
            let waited_ms = u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX);
            let err = PendingError::TimedOut { kind, waited_ms };
            warn!(owner = %self.owner, %kind, waited_ms, "pending action timed out");
            self.failures.insert(kind, err.clone());
            errors.push(err);
        }
        errors
    }

    /// Stop tracking `kind`. Returns whether anything was cancelled;
    /// cancelling an idle or already resolved kind is a no-op.
    pub fn cancel(&mut self, kind: PendingKind) -> bool {
        let cancelled = self.active.remove(&kind).is_some();
        if cancelled {
            info!(owner = %self.owner, %kind, "pending action cancelled");
        }
        cancelled
    }

    /// Clear a displayed failure for `kind`.
    pub fn dismiss(&mut self, kind: PendingKind) {
        self.failures.remove(&kind);
    }

    #[must_use]
    pub fn status(&self, kind: PendingKind) -> PendingStatus {
        if let Some(p) = self.active.get(&kind) {
            return PendingStatus::InProgress { since: p.submitted_at };
        }
        match self.failures.get(&kind) {
            Some(err) => PendingStatus::Failed(err.clone()),
            None => PendingStatus::Idle,
        }
    }

    #[must_use]
    pub fn is_in_progress(&self, kind: PendingKind) -> bool {
        self.active.contains_key(&kind)
    }

    /// Earliest deadline among outstanding actions.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.active.values().map(|p| p.submitted_at + self.timeout).min()
    }

    /// The most recently observed snapshot.
    #[must_use]
    pub fn latest(&self) -> &Arc<Snapshot> {
        &self.latest
    }
}

// =============================================================================
// PREDICATES
// =============================================================================

/// Confirms once `owner` owns more characters than at submission.
#[must_use]
pub fn owned_characters_increased(owner: EntityId) -> MatchPredicate {
    Box::new(move |new, reference| new.owned_character_count(&owner) > reference.owned_character_count(&owner))
}

/// Confirms once the session has more NPCs than at submission.
#[must_use]
pub fn npcs_increased() -> MatchPredicate {
    Box::new(|new, reference| new.npc_count() > reference.npc_count())
}

/// Confirms once the session has more props than at submission.
#[must_use]
pub fn props_increased() -> MatchPredicate {
    fn props(s: &Snapshot) -> usize {
        s.scene_objects
            .iter()
            .filter(|o| o.kind == SceneObjectKind::Prop)
            .count()
    }
    Box::new(|new, reference| props(new) > props(reference))
}

/// Confirms once character `id` is gone.
#[must_use]
pub fn character_removed(id: EntityId) -> MatchPredicate {
    Box::new(move |new, _| new.character(&id).is_none())
}

/// Confirms once character `id` carries initiative `value`, or is gone.
#[must_use]
pub fn initiative_settled(id: EntityId, value: Option<i32>) -> MatchPredicate {
    Box::new(move |new, _| new.character(&id).is_none_or(|c| c.initiative == value))
}
