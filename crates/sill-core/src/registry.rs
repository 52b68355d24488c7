#![forbid(unsafe_code)]

//! The consumer-owned row registry.
//!
//! Hit-testing a pointer against rendered rows needs an id → bounds map
//! that tracks what is currently on screen. The registry is owned by the
//! consumer (one per sortable/marquee surface, so multiple instances
//! coexist without collision) and mutated as rows mount, move, and
//! unmount; the geometry adapters and the marquee driver only read it.
//!
//! # Failure Modes
//!
//! A lookup for an id that was unregistered mid-gesture returns `None`;
//! callers treat the row as absent. The registry never panics on misses.

use ahash::AHashMap;

use crate::geometry::{Point, Rect};
use crate::id::RowId;

/// Registered bounds for the rows of one scrollable surface.
///
/// All rectangles are in content coordinates (scroll-independent).
#[derive(Debug, Clone, Default)]
pub struct RowRegistry {
    rows: AHashMap<RowId, Rect>,
}

impl RowRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or update a row's content-space bounds.
    pub fn insert(&mut self, id: RowId, bounds: Rect) {
        self.rows.insert(id, bounds);
    }

    /// Remove a row. Returns its last bounds if it was registered.
    pub fn remove(&mut self, id: &RowId) -> Option<Rect> {
        self.rows.remove(id)
    }

    /// Drop every registration.
    pub fn clear(&mut self) {
        self.rows.clear();
    }

    /// Bounds of a row, if currently registered.
    #[must_use]
    pub fn bounds(&self, id: &RowId) -> Option<Rect> {
        self.rows.get(id).copied()
    }

    /// Whether a row is currently registered.
    #[must_use]
    pub fn contains(&self, id: &RowId) -> bool {
        self.rows.contains_key(id)
    }

    /// Number of registered rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when no rows are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterate over all registered rows.
    pub fn iter(&self) -> impl Iterator<Item = (&RowId, &Rect)> {
        self.rows.iter()
    }

    /// The row under a content-space point.
    ///
    /// When overlapping rows both contain the point, the smallest-area
    /// row wins (most specific), tie-broken by greater `y` then greater
    /// `x` then id, so the result is deterministic under any map
    /// iteration order.
    #[must_use]
    pub fn hit(&self, p: Point) -> Option<(&RowId, Rect)> {
        self.rows
            .iter()
            .filter(|(_, rect)| rect.contains(p))
            .min_by(|(a_id, a), (b_id, b)| {
                a.area()
                    .total_cmp(&b.area())
                    .then(b.y.total_cmp(&a.y))
                    .then(b.x.total_cmp(&a.x))
                    .then(a_id.cmp(b_id))
            })
            .map(|(id, rect)| (id, *rect))
    }

    /// The visually last row: maximum bottom edge, ties broken by the
    /// greater right edge then id.
    ///
    /// This is the fallback target for drops into empty trailing space.
    #[must_use]
    pub fn last_row(&self) -> Option<(&RowId, Rect)> {
        self.rows
            .iter()
            .max_by(|(a_id, a), (b_id, b)| {
                a.bottom()
                    .total_cmp(&b.bottom())
                    .then(a.right().total_cmp(&b.right()))
                    .then(b_id.cmp(a_id))
            })
            .map(|(id, rect)| (id, *rect))
    }

    /// Ids of all rows whose bounds overlap `rect`.
    ///
    /// Overlap, not containment: a row partially covered by the rectangle
    /// is included. The result is ordered by row origin (`y`, then `x`,
    /// then id) for deterministic selection snapshots.
    #[must_use]
    pub fn intersecting(&self, rect: &Rect) -> Vec<RowId> {
        let mut hits: Vec<(&RowId, &Rect)> = self
            .rows
            .iter()
            .filter(|(_, bounds)| bounds.intersects(rect))
            .collect();
        hits.sort_by(|(a_id, a), (b_id, b)| {
            a.y.total_cmp(&b.y)
                .then(a.x.total_cmp(&b.x))
                .then(a_id.cmp(b_id))
        });
        hits.into_iter().map(|(id, _)| id.clone()).collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
