#![forbid(unsafe_code)]

//! Hover-to-open: auto-expanding collapsed containers under a drag.
//!
//! Dropping into a collapsed folder would otherwise require opening it
//! first with a separate click. While a drag hovers an `Inside` intent
//! over a collapsed container long enough, the controller fires once and
//! the consumer asks the host UI to expand the container positioned
//! relative to the hovered row.
//!
//! # Design
//!
//! One tracked container, one pending deadline. Every preview either
//! re-arms the deadline (different collapsed container), keeps it (same
//! container), or clears it (no `Inside` intent, blocked intent, or an
//! already-open target). The controller is polled with an explicit
//! `Instant` — the same shape as a long-press detector — so consumers
//! drive it from their frame tick and tests drive it with synthetic
//! clocks.
//!
//! # Invariants
//!
//! 1. A container fires at most once per hover; re-hovering an already
//!    open container does nothing.
//! 2. Leaving `Inside` before the delay elapses fires nothing.
//! 3. `reset()` drops the pending deadline but keeps the open-set, which
//!    mirrors the host UI's actual expansion state.

use ahash::AHashSet;
use web_time::{Duration, Instant};

use sill_core::id::RowId;

use crate::intent::{DropIntent, Placement};

/// Timing for hover-to-open.
#[derive(Debug, Clone)]
pub struct HoverOpenConfig {
    /// Sustained hover required before a container opens (default: 450 ms).
    pub open_delay: Duration,
}

impl Default for HoverOpenConfig {
    fn default() -> Self {
        Self {
            open_delay: Duration::from_millis(450),
        }
    }
}

/// Opens collapsed containers under a sustained drag-hover.
#[derive(Debug, Clone)]
pub struct HoverOpenController {
    config: HoverOpenConfig,
    /// The collapsed container currently hovered, with its arm time.
    pending: Option<(RowId, Instant)>,
    /// Containers the host UI currently shows expanded.
    open: AHashSet<RowId>,
}

impl HoverOpenController {
    /// Create a controller with the default delay.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(HoverOpenConfig::default())
    }

    /// Create a controller with explicit timing.
    #[must_use]
    pub fn with_config(config: HoverOpenConfig) -> Self {
        Self {
            config,
            pending: None,
            open: AHashSet::new(),
        }
    }

    /// Feed the driver's current preview.
    ///
    /// Blocked intents never arm the timer: auto-expanding a container the
    /// drop could not land in (typically the dragged folder's own subtree)
    /// would only churn the UI.
    pub fn note_preview(&mut self, intent: Option<&DropIntent>, blocked: bool, now: Instant) {
        let target = match intent {
            Some(intent) if intent.placement == Placement::Inside && !blocked => &intent.target,
            _ => {
                self.pending = None;
                return;
            }
        };
        if self.open.contains(target) {
            self.pending = None;
            return;
        }
        match &self.pending {
            Some((pending, _)) if pending == target => {}
            _ => {
                self.pending = Some((target.clone(), now));
            }
        }
    }

    /// Check the pending deadline. Call from the frame tick.
    ///
    /// Returns the container to open when the delay has elapsed; the
    /// container is recorded as open so it cannot fire again.
    #[must_use]
    pub fn poll(&mut self, now: Instant) -> Option<RowId> {
        let (id, armed_at) = self.pending.as_ref()?;
        if now.duration_since(*armed_at) < self.config.open_delay {
            return None;
        }
        let id = id.clone();
        self.pending = None;
        self.open.insert(id.clone());
        tracing::debug!(container = %id, "hover-open fired");
        Some(id)
    }

    /// Record that the host UI expanded a container by other means.
    pub fn mark_open(&mut self, id: RowId) {
        self.open.insert(id);
    }

    /// Record that the host UI collapsed a container; a later hover may
    /// open it again.
    pub fn mark_closed(&mut self, id: &RowId) {
        self.open.remove(id);
    }

    /// Whether the controller considers a container open.
    #[must_use]
    pub fn is_open(&self, id: &RowId) -> bool {
        self.open.contains(id)
    }

    /// Drop the pending deadline (drag ended). The open-set is kept; it
    /// mirrors the host UI, not the gesture.
    pub fn reset(&mut self) {
        self.pending = None;
    }
}

impl Default for HoverOpenController {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn inside(folder: &str) -> DropIntent {
        DropIntent::new(RowId::folder(folder), Placement::Inside)
    }

    fn after(folder: &str) -> DropIntent {
        DropIntent::new(RowId::folder(folder), Placement::After)
    }

    const DELAY: Duration = Duration::from_millis(450);
    const HALF: Duration = Duration::from_millis(225);

    #[test]
    fn fires_after_sustained_hover() {
        let mut hover = HoverOpenController::new();
        let t = Instant::now();

        hover.note_preview(Some(&inside("work")), false, t);
        assert_eq!(hover.poll(t + HALF), None);
        assert_eq!(hover.poll(t + DELAY), Some(RowId::folder("work")));
        assert!(hover.is_open(&RowId::folder("work")));
    }

    #[test]
    fn fires_once_per_container() {
        let mut hover = HoverOpenController::new();
        let t = Instant::now();

        hover.note_preview(Some(&inside("work")), false, t);
        assert!(hover.poll(t + DELAY).is_some());

        // Still hovering the (now open) container: nothing re-arms.
        hover.note_preview(Some(&inside("work")), false, t + DELAY);
        assert_eq!(hover.poll(t + DELAY + DELAY), None);
    }

    #[test]
    fn switching_containers_restarts_the_delay() {
        let mut hover = HoverOpenController::new();
        let t = Instant::now();

        hover.note_preview(Some(&inside("work")), false, t);
        hover.note_preview(Some(&inside("games")), false, t + HALF);

        // 450ms after the original arm, but only 225ms on the new target.
        assert_eq!(hover.poll(t + DELAY), None);
        assert_eq!(hover.poll(t + HALF + DELAY), Some(RowId::folder("games")));
    }

    #[test]
    fn sustained_hover_keeps_the_original_deadline() {
        let mut hover = HoverOpenController::new();
        let t = Instant::now();

        hover.note_preview(Some(&inside("work")), false, t);
        // Re-previewing the same container later must not push the
        // deadline out.
        hover.note_preview(Some(&inside("work")), false, t + HALF);
        assert_eq!(hover.poll(t + DELAY), Some(RowId::folder("work")));
    }

    #[test]
    fn leaving_inside_clears_the_timer() {
        let mut hover = HoverOpenController::new();
        let t = Instant::now();

        hover.note_preview(Some(&inside("work")), false, t);
        hover.note_preview(Some(&after("work")), false, t + HALF);
        assert_eq!(hover.poll(t + DELAY + DELAY), None);

        hover.note_preview(Some(&inside("work")), false, t);
        hover.note_preview(None, false, t + HALF);
        assert_eq!(hover.poll(t + DELAY + DELAY), None);
    }

    #[test]
    fn blocked_intents_never_arm() {
        let mut hover = HoverOpenController::new();
        let t = Instant::now();

        hover.note_preview(Some(&inside("work-sub")), true, t);
        assert_eq!(hover.poll(t + DELAY + DELAY), None);
    }

    #[test]
    fn already_open_containers_do_not_rearm() {
        let mut hover = HoverOpenController::new();
        let t = Instant::now();

        hover.mark_open(RowId::folder("work"));
        hover.note_preview(Some(&inside("work")), false, t);
        assert_eq!(hover.poll(t + DELAY), None);

        // After a collapse it hovers open again.
        hover.mark_closed(&RowId::folder("work"));
        hover.note_preview(Some(&inside("work")), false, t + DELAY);
        assert_eq!(hover.poll(t + DELAY + DELAY), Some(RowId::folder("work")));
    }

    #[test]
    fn reset_drops_pending_but_keeps_open_set() {
        let mut hover = HoverOpenController::new();
        let t = Instant::now();

        hover.note_preview(Some(&inside("work")), false, t);
        hover.poll(t + DELAY).expect("fires");

        hover.note_preview(Some(&inside("games")), false, t + DELAY);
        hover.reset();
        assert_eq!(hover.poll(t + DELAY + DELAY), None);
        assert!(hover.is_open(&RowId::folder("work")));
    }
}
