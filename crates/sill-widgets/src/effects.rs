#![forbid(unsafe_code)]

//! Persistence wire types shared by the widget models.
//!
//! A committed drag turns into a [`MoveRequest`]: prefixed row ids
//! resolved back into domain kind/key pairs plus the placement, the exact
//! shape the external persistence collaborator takes. The request travels
//! on an effect queue; the host executes it and reports back through the
//! model's completion hook, where failures are logged and the optimistic
//! UI state is left as-is.

use std::fmt;

use sill_core::id::RowKind;
use sill_sortable::intent::{Move, Placement};

/// Domain kind of a moved or target entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "state-persistence", derive(serde::Serialize, serde::Deserialize))]
pub enum EntryKind {
    /// A folder / directory.
    Folder,
    /// A leaf entry (favorite path, file, track).
    Item,
}

impl From<RowKind> for EntryKind {
    fn from(kind: RowKind) -> Self {
        match kind {
            RowKind::Folder => Self::Folder,
            RowKind::Item => Self::Item,
        }
    }
}

/// Placement on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "state-persistence", derive(serde::Serialize, serde::Deserialize))]
pub enum MovePlacement {
    /// Before the target.
    Before,
    /// After the target.
    After,
    /// As the target's last child.
    Inside,
}

impl From<Placement> for MovePlacement {
    fn from(placement: Placement) -> Self {
        match placement {
            Placement::Before => Self::Before,
            Placement::After => Self::After,
            Placement::Inside => Self::Inside,
        }
    }
}

/// The persistence collaborator's input: one durable move.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "state-persistence", derive(serde::Serialize, serde::Deserialize))]
pub struct MoveRequest {
    /// Kind of the moved entry.
    pub moved_kind: EntryKind,
    /// Domain key of the moved entry.
    pub moved_key: String,
    /// Kind of the drop target.
    pub target_kind: EntryKind,
    /// Domain key of the drop target.
    pub target_key: String,
    /// Where relative to the target the entry lands.
    pub placement: MovePlacement,
}

impl MoveRequest {
    /// Resolve a committed [`Move`] into domain terms.
    ///
    /// Returns `None` when either id carries no recognized kind prefix;
    /// such moves cannot be expressed to the domain and are dropped by
    /// callers (with a log line), never panicked on.
    #[must_use]
    pub fn from_move(mv: &Move) -> Option<Self> {
        let (moved_kind, moved_key) = mv.id.parse()?;
        let (target_kind, target_key) = mv.intent.target.parse()?;
        Some(Self {
            moved_kind: moved_kind.into(),
            moved_key: moved_key.to_string(),
            target_kind: target_kind.into(),
            target_key: target_key.to_string(),
            placement: mv.intent.placement.into(),
        })
    }
}

/// Broadcast to sibling widget instances after a tree mutation.
///
/// Siblings compare revisions and refresh their local caches from the
/// shared source of truth; the payload deliberately carries no tree data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "state-persistence", derive(serde::Serialize, serde::Deserialize))]
pub struct TreeChanged {
    /// Monotonic revision of the mutated tree.
    pub revision: u64,
}

/// A failed durable commit, reported back by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistError {
    /// Human-readable cause from the collaborator.
    pub message: String,
}

impl PersistError {
    /// Create an error with the given cause.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for PersistError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "persist failed: {}", self.message)
    }
}

impl std::error::Error for PersistError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use sill_core::id::RowId;
    use sill_sortable::intent::DropIntent;

    #[test]
    fn move_request_resolves_prefixed_ids() {
        let mv = Move {
            id: RowId::item("/home/docs"),
            intent: DropIntent::new(RowId::folder("work"), Placement::Inside),
        };
        let req = MoveRequest::from_move(&mv).expect("both ids parse");
        assert_eq!(req.moved_kind, EntryKind::Item);
        assert_eq!(req.moved_key, "/home/docs");
        assert_eq!(req.target_kind, EntryKind::Folder);
        assert_eq!(req.target_key, "work");
        assert_eq!(req.placement, MovePlacement::Inside);
    }

    #[cfg(feature = "state-persistence")]
    #[test]
    fn move_request_round_trips_through_json() {
        let req = MoveRequest {
            moved_kind: EntryKind::Item,
            moved_key: "/a".into(),
            target_kind: EntryKind::Folder,
            target_key: "f".into(),
            placement: MovePlacement::After,
        };
        let json = serde_json::to_string(&req).expect("serialize");
        let back: MoveRequest = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(req, back);
    }
}
