//! Optimistic action reconciliation and scene synchronization for the
//! shared tabletop session.
//!
//! Clients never own session state. They fire actions at the authoritative
//! host and learn the outcome only by watching the next full [`snapshot::Snapshot`]
//! broadcast. This crate holds the synchronous core of that loop: the data
//! model, the action vocabulary, and the algorithms that turn user gestures
//! into actions and snapshots back into derived view state. It has no async
//! runtime; callers inject time as `Instant` values.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`snapshot`] | Snapshot data model, id lookups and invariant validation |
//! | [`action`] | Tagged action records sent to the host |
//! | [`pending`] | Confirmation-by-diffing tracker for in-flight actions |
//! | [`selection`] | Mode-aware selection state and controller |
//! | [`marquee`] | Drag-rectangle hit-testing and release semantics |
//! | [`combat`] | Initiative ordering and turn-index arithmetic |
//! | [`erase`] | Partial erase of freehand strokes |
//! | [`undo`] | Forward/inverse undo entries and per-owner stacks |
//! | [`gesture`] | Tool modes and the double-tap state machine |
//! | [`geom`] | Points, rectangles and distance helpers |
//! | [`consts`] | Shared numeric defaults |

pub mod action;
pub mod combat;
pub mod consts;
pub mod erase;
pub mod geom;
pub mod gesture;
pub mod marquee;
pub mod pending;
pub mod selection;
pub mod snapshot;
pub mod undo;

pub use snapshot::{EntityId, SceneError, Snapshot};
