//! Shared numeric defaults for the scene crate.

// ── Reconciliation ──────────────────────────────────────────────

/// Deadline after which an unconfirmed pending action flips to an error.
pub const PENDING_TIMEOUT_MS: u64 = 5_000;

// ── Combat ──────────────────────────────────────────────────────

/// Sort key used for a combatant with no initiative roll. Below any real
/// roll, including 0.
pub const UNROLLED_INITIATIVE: i32 = -1;

// ── Gestures ────────────────────────────────────────────────────

/// Max interval between two taps that still counts as a double tap.
pub const DOUBLE_TAP_MS: u64 = 300;

/// Max distance between two taps that still counts as a double tap.
pub const DOUBLE_TAP_DISTANCE: f64 = 10.0;

// ── Erase ───────────────────────────────────────────────────────

/// Default eraser radius in world units.
pub const ERASER_WIDTH: f64 = 8.0;

/// Fewest points a surviving stroke run may have.
pub const MIN_RUN_POINTS: usize = 2;

// ── Session ─────────────────────────────────────────────────────

/// Grid size of a fresh session.
pub const GRID_SIZE: f64 = 50.0;

/// Max undo entries retained per owner.
pub const UNDO_DEPTH: usize = 100;
