#![forbid(unsafe_code)]

//! Drop intents and committed moves.

use sill_core::id::RowId;

/// Where a drop lands relative to its target row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Immediately before the target, at the target's nesting level.
    Before,
    /// Immediately after the target (past its subtree), at the target's
    /// nesting level.
    After,
    /// As the last child of the target container.
    Inside,
}

/// The currently hovered candidate placement during a drag.
///
/// Owned by the driver: replaced on every pointer move, cleared on drag
/// end. Read by the hover controller, the visuals, and the final commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropIntent {
    /// The hovered row.
    pub target: RowId,
    /// Where relative to it the drop would land.
    pub placement: Placement,
}

impl DropIntent {
    /// Create an intent.
    #[must_use]
    pub fn new(target: RowId, placement: Placement) -> Self {
        Self { target, placement }
    }
}

/// A committed move instruction handed to the model adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Move {
    /// The dragged row.
    pub id: RowId,
    /// The final drop intent it is committed against.
    pub intent: DropIntent,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
