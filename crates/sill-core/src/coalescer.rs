#![forbid(unsafe_code)]

//! Coalescing for high-frequency pointer input.
//!
//! A drag gesture can deliver pointer-move events far faster than the
//! frame rate, and wheel scrolling arrives in bursts. Recomputing hit
//! tests and snapshots for every raw event wastes the frame budget, so
//! drivers are fed through a [`PointerCoalescer`] that collapses each
//! burst into at most one move and one scroll per flush.
//!
//! # Design
//!
//! "Latest wins" for moves — only the most recent pointer position
//! matters for a preview. Scroll deltas accumulate — the total
//! displacement matters, not the event count. The consumer flushes once
//! per animation frame and feeds the result to the drivers.

use crate::geometry::Offset;
use crate::pointer::PointerEvent;

/// Collapses pointer-move and scroll bursts into per-frame updates.
///
/// Not thread-safe; lives on the UI thread next to the drivers it feeds.
/// Holds at most one pending move and one pending scroll, so all
/// operations are O(1).
#[derive(Debug, Clone, Default)]
pub struct PointerCoalescer {
    pending_move: Option<PointerEvent>,
    pending_scroll: Offset,
}

/// One frame's worth of coalesced input.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CoalescedFrame {
    /// The most recent pointer move since the last flush, if any.
    pub pointer_move: Option<PointerEvent>,
    /// Accumulated scroll displacement since the last flush, if nonzero.
    pub scroll: Option<Offset>,
}

impl PointerCoalescer {
    /// Create an empty coalescer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a pointer move. The latest position replaces any pending one.
    pub fn note_move(&mut self, event: PointerEvent) {
        self.pending_move = Some(event);
    }

    /// Accumulate a scroll delta.
    pub fn note_scroll(&mut self, delta: Offset) {
        self.pending_scroll = self.pending_scroll + delta;
    }

    /// Whether a flush would yield anything.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.pending_move.is_some() || !self.pending_scroll.is_zero()
    }

    /// Take everything pending. After this the coalescer is empty.
    ///
    /// Scroll is reported before the move is applied by convention: the
    /// consumer adjusts its scroll offset first so the move's hit test
    /// sees up-to-date content coordinates.
    #[must_use]
    pub fn flush(&mut self) -> CoalescedFrame {
        let scroll = std::mem::take(&mut self.pending_scroll);
        CoalescedFrame {
            pointer_move: self.pending_move.take(),
            scroll: (!scroll.is_zero()).then_some(scroll),
        }
    }

    /// Discard pending input without processing it (mode change, focus
    /// loss).
    pub fn clear(&mut self) {
        self.pending_move = None;
        self.pending_scroll = Offset::ZERO;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
