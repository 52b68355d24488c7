#![forbid(unsafe_code)]

//! The selection-engine seam.
//!
//! The marquee driver computes *which* rows a gesture selects; it never
//! owns the selection. Consumers hand it a [`SelectionHost`] — usually
//! the widget's existing selection engine — and the driver pushes
//! replacements through it, tagged with a reason so hosts can log or
//! filter.

use ahash::AHashSet;
use sill_core::id::RowId;

/// Why a selection replacement happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionReason {
    /// A live marquee update or its commit on release.
    Marquee,
    /// A plain click on empty space cleared the selection.
    EmptyClick,
}

/// External selection engine consumed by the marquee driver.
pub trait SelectionHost {
    /// Replace the selection with exactly `ids`.
    fn replace_selection(&mut self, ids: Vec<RowId>, reason: SelectionReason);

    /// The currently selected ids.
    fn selected(&self) -> AHashSet<RowId>;
}
