#![forbid(unsafe_code)]

//! The adapter contracts each sortable consumer implements.
//!
//! The driver never touches a widget's data or layout directly. A
//! consumer supplies a [`ModelAdapter`] (what the orderable tree looks
//! like and how to commit a move) and a [`GeometryAdapter`] (where the
//! pointer is relative to the rendered rows). Both are explicit trait
//! objects with every required operation declared, so a consumer that
//! forgets one fails to compile rather than failing mid-drag.

use sill_core::geometry::{Point, Rect};
use sill_core::id::RowId;
use sill_core::pointer::PointerEvent;

use crate::intent::Move;
use crate::snapshot::Snapshot;

/// A hit-test result: the row under the pointer and where within it the
/// pointer sits.
#[derive(Debug, Clone, PartialEq)]
pub struct RowHit {
    /// The hit row.
    pub id: RowId,
    /// Pointer position along the layout axis relative to the row, in
    /// `0.0..=1.0` (`0.0` = leading edge, `1.0` = trailing edge).
    pub relative: f32,
}

impl RowHit {
    /// Create a hit.
    #[must_use]
    pub fn new(id: RowId, relative: f32) -> Self {
        Self {
            id,
            relative: relative.clamp(0.0, 1.0),
        }
    }
}

/// The orderable data behind one sortable surface.
pub trait ModelAdapter {
    /// A fresh ordered view of the orderable nodes.
    ///
    /// Called on every drag-relevant query; implementations must
    /// regenerate it rather than return a cached copy, and must include
    /// parent/child relations only for currently-expanded containers so
    /// collapsed containers are never offered as nesting targets.
    fn snapshot(&self) -> Snapshot;

    /// Gate to disable dragging for specific rows (pinned roots,
    /// derived-sort sections). Defaults to allowing everything.
    fn can_start_drag(&self, _id: &RowId) -> bool {
        true
    }

    /// Commit a move.
    ///
    /// Implementations resolve both ids back to domain keys, update local
    /// caches optimistically, and dispatch the durable commit without
    /// blocking — the driver does not wait for completion, and failures
    /// must be caught and logged rather than propagated back into it.
    fn apply_move(&mut self, mv: Move);
}

/// Pointer-to-row geometry for one sortable surface.
pub trait GeometryAdapter {
    /// The row under the pointer, if any.
    ///
    /// Implementations convert client coordinates into content space
    /// (accounting for scroll) before testing row bounds, and should
    /// resolve a pointer inside the container but over no row to "after
    /// the last row" rather than `None`, so drops into empty trailing
    /// space are not silently rejected.
    fn hit_test(&self, event: &PointerEvent) -> Option<RowHit>;

    /// Content-space bounds of a registered row.
    ///
    /// A miss means the row unmounted mid-gesture; callers treat it as
    /// absent.
    fn row_bounds(&self, id: &RowId) -> Option<Rect>;

    /// Convert a pointer event to content coordinates.
    ///
    /// Defaults to the raw event position for surfaces that do not
    /// scroll.
    fn content_point(&self, event: &PointerEvent) -> Point {
        event.pos
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_hit_clamps_relative_position() {
        assert_eq!(RowHit::new(RowId::item("/a"), -0.5).relative, 0.0);
        assert_eq!(RowHit::new(RowId::item("/a"), 1.5).relative, 1.0);
        assert_eq!(RowHit::new(RowId::item("/a"), 0.25).relative, 0.25);
    }
}
