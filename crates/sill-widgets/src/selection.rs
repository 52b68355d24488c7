#![forbid(unsafe_code)]

//! The default selection model.
//!
//! A plain id-set implementation of the marquee driver's [`SelectionHost`]
//! seam, with reason-tagged change logging. Hosts with their own selection
//! engine implement the trait themselves; this one covers the common case
//! and the tests.

use ahash::AHashSet;

use sill_core::id::RowId;
use sill_marquee::selection::{SelectionHost, SelectionReason};

/// Id-set selection state for one widget surface.
#[derive(Debug, Clone, Default)]
pub struct SelectionModel {
    selected: AHashSet<RowId>,
}

impl SelectionModel {
    /// Create an empty selection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a row is selected.
    #[must_use]
    pub fn is_selected(&self, id: &RowId) -> bool {
        self.selected.contains(id)
    }

    /// Number of selected rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// True when nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Iterate the selected ids (no particular order).
    pub fn iter(&self) -> impl Iterator<Item = &RowId> {
        self.selected.iter()
    }

    /// Select exactly one row (plain row click).
    pub fn select_only(&mut self, id: RowId) {
        self.selected.clear();
        self.selected.insert(id);
        self.log_change("click");
    }

    /// Toggle one row's membership (modifier click).
    pub fn toggle(&mut self, id: RowId) {
        if !self.selected.remove(&id) {
            self.selected.insert(id);
        }
        self.log_change("toggle");
    }

    /// Clear the selection.
    pub fn clear(&mut self) {
        if !self.selected.is_empty() {
            self.selected.clear();
            self.log_change("clear");
        }
    }

    fn log_change(&self, reason: &str) {
        tracing::debug!(reason, count = self.selected.len(), "selection changed");
    }
}

impl SelectionHost for SelectionModel {
    fn replace_selection(&mut self, ids: Vec<RowId>, reason: SelectionReason) {
        self.selected = ids.into_iter().collect();
        tracing::debug!(?reason, count = self.selected.len(), "selection replaced");
    }

    fn selected(&self) -> AHashSet<RowId> {
        self.selected.clone()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
