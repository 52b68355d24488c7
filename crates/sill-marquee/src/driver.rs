#![forbid(unsafe_code)]

//! The marquee driver: rubber-band selection over a scrollable surface.
//!
//! # State Machine
//!
//! ```text
//! Idle ──pointer_down──▶ Pending ──move ≥ threshold──▶ Active
//!   ▲                       │                            │
//!   └─────pointer_up────────┴──────────pointer_up────────┘
//! ```
//!
//! The rectangle is anchored at the press point in *content* space, so
//! scrolling (including autoscroll) stretches it instead of dragging it
//! along. On every recompute the driver replaces the host selection with
//! exactly the set the combine policy yields for the current rectangle —
//! selection is never accumulated across frames of one drag.
//!
//! # Combine policy
//!
//! Captured once at press time: no modifier replaces the selection, Shift
//! adds the rectangle set to the pre-press selection, Ctrl toggles the
//! rectangle set against it (Cmd substitutes for Ctrl on mac-like
//! platforms).
//!
//! # Plain clicks
//!
//! A press released below the movement threshold never shows a rectangle.
//! On empty space it clears the selection; on an already-selected row it
//! leaves the selection untouched (that click starts a drag of the
//! selection, it does not deselect).

use ahash::AHashSet;

use sill_core::geometry::{Offset, Point, Rect};
use sill_core::id::RowId;
use sill_core::pointer::{ClickGate, Modifiers, Platform, PointerEvent};
use sill_core::registry::RowRegistry;

use crate::autoscroll::AutoScroller;
use crate::selection::{SelectionHost, SelectionReason};

/// Thresholds for marquee interpretation.
#[derive(Debug, Clone)]
pub struct MarqueeConfig {
    /// Minimum pointer travel in pixels before the rectangle appears
    /// (default: 4).
    pub move_threshold: f32,
}

impl Default for MarqueeConfig {
    fn default() -> Self {
        Self {
            move_threshold: 4.0,
        }
    }
}

/// Why a recompute was requested from outside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecomputeReason {
    /// The container scrolled (wheel, scrollbar, autoscroll).
    Scroll,
    /// Row layout changed under the gesture (refresh, resize).
    Layout,
}

/// How the rectangle set merges with the pre-press selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combine {
    Replace,
    Add,
    Toggle,
}

impl Combine {
    fn from_modifiers(modifiers: Modifiers, platform: Platform) -> Self {
        if modifiers.contains(Modifiers::SHIFT) {
            Self::Add
        } else if modifiers.contains(platform.toggle_modifier()) {
            Self::Toggle
        } else {
            Self::Replace
        }
    }
}

/// What a pointer-up resolved to.
#[derive(Debug, Clone, PartialEq)]
pub enum MarqueeOutcome {
    /// An active marquee completed; `rect` is the final rectangle.
    Completed {
        /// Final content-space rectangle at release.
        rect: Rect,
    },
    /// The press never crossed the threshold: an ordinary click.
    Click {
        /// The row under the press point, if any.
        row: Option<RowId>,
        /// Whether the click cleared the selection (empty space only).
        cleared: bool,
    },
    /// No gesture was in progress.
    NotActive,
}

#[derive(Debug, Clone)]
struct Press {
    /// Anchor in content space; fixed for the whole gesture.
    anchor: Point,
    /// Press position in client space, for the movement threshold.
    client: Point,
    /// Combine policy captured at press time.
    combine: Combine,
    /// Selection as it stood at press time.
    base: AHashSet<RowId>,
    /// Row under the press point, for plain-click semantics.
    row: Option<RowId>,
    /// Whether the rectangle has become visible.
    active: bool,
}

/// The rubber-band selection driver for one scrollable surface.
pub struct MarqueeDriver<S> {
    config: MarqueeConfig,
    platform: Platform,
    /// Client-space bounds of the scroll container.
    viewport: Rect,
    /// Current scroll offset of the container.
    scroll: Offset,
    /// Latest pointer position in client space.
    pointer: Point,
    press: Option<Press>,
    rect: Option<Rect>,
    gate: ClickGate,
    scroller: AutoScroller,
    selection: S,
}

impl<S: SelectionHost> MarqueeDriver<S> {
    /// Create a driver over `selection` for a container at `viewport`.
    #[must_use]
    pub fn new(selection: S, viewport: Rect) -> Self {
        Self {
            config: MarqueeConfig::default(),
            platform: Platform::default(),
            viewport,
            scroll: Offset::ZERO,
            pointer: Point::default(),
            press: None,
            rect: None,
            gate: ClickGate::new(),
            scroller: AutoScroller::new(),
            selection,
        }
    }

    /// Override the config.
    #[must_use]
    pub fn with_config(mut self, config: MarqueeConfig) -> Self {
        self.config = config;
        self
    }

    /// Override the platform (modifier conventions).
    #[must_use]
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    /// Override the autoscroller.
    #[must_use]
    pub fn with_scroller(mut self, scroller: AutoScroller) -> Self {
        self.scroller = scroller;
        self
    }

    /// Begin tracking a press on empty space or a row.
    pub fn pointer_down(&mut self, event: &PointerEvent, registry: &RowRegistry) {
        let anchor = self.to_content(event.pos);
        self.pointer = event.pos;
        self.press = Some(Press {
            anchor,
            client: event.pos,
            combine: Combine::from_modifiers(event.modifiers, self.platform),
            base: self.selection.selected(),
            row: registry.hit(anchor).map(|(id, _)| id.clone()),
            active: false,
        });
        self.rect = None;
    }

    /// Feed a pointer move.
    pub fn pointer_move(&mut self, event: &PointerEvent, registry: &RowRegistry) {
        self.pointer = event.pos;
        let Some(press) = &mut self.press else {
            return;
        };
        if !press.active {
            if event.pos.distance(press.client) < self.config.move_threshold {
                return;
            }
            press.active = true;
            tracing::trace!("marquee activated");
        }
        self.recompute(registry);
    }

    /// Feed a pointer release and resolve the gesture.
    pub fn pointer_up(&mut self, event: &PointerEvent, registry: &RowRegistry) -> MarqueeOutcome {
        self.pointer = event.pos;
        let Some(press) = self.press.take() else {
            return MarqueeOutcome::NotActive;
        };

        if press.active {
            // Final recompute at the release position.
            self.press = Some(press);
            self.recompute(registry);
            self.press = None;

            let rect = self.rect.take().unwrap_or_default();
            self.gate.arm();
            tracing::debug!(?rect, "marquee completed");
            return MarqueeOutcome::Completed { rect };
        }

        // Below threshold: a plain click.
        let cleared = press.row.is_none();
        if cleared {
            self.selection
                .replace_selection(Vec::new(), SelectionReason::EmptyClick);
        }
        // A click on a row — selected or not — is the consumer's click
        // path; in particular a click on an already-selected row must NOT
        // clear the selection.
        MarqueeOutcome::Click {
            row: press.row,
            cleared,
        }
    }

    /// Abort the gesture without touching the selection.
    pub fn cancel(&mut self) {
        self.press = None;
        self.rect = None;
    }

    /// The container scrolled by `delta`; keep the rectangle anchored.
    pub fn adjust_for_scroll(&mut self, delta: Offset, registry: &RowRegistry) {
        self.scroll = self.scroll + delta;
        if self.is_active() {
            self.recompute(registry);
        }
    }

    /// Re-derive the rectangle and selection against current layout.
    pub fn recompute_now(&mut self, reason: RecomputeReason, registry: &RowRegistry) {
        if self.is_active() {
            tracing::trace!(?reason, "marquee recompute");
            self.recompute(registry);
        }
    }

    /// The scroll delta edge autoscroll wants applied this frame.
    ///
    /// Non-zero only while the rectangle is visible and the pointer is
    /// outside the container. The consumer applies the delta to its
    /// scroll model (clamping as needed) and reports the applied amount
    /// back through [`adjust_for_scroll`].
    ///
    /// [`adjust_for_scroll`]: MarqueeDriver::adjust_for_scroll
    #[must_use]
    pub fn autoscroll_delta(&self) -> Option<Offset> {
        if !self.is_active() {
            return None;
        }
        let v = self.scroller.velocity(self.viewport, self.pointer);
        (!v.is_zero()).then_some(v)
    }

    /// Whether the rectangle is currently visible.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.press.as_ref().is_some_and(|p| p.active)
    }

    /// The current content-space rectangle, while active.
    #[must_use]
    pub fn rect(&self) -> Option<Rect> {
        self.rect
    }

    /// Swallow the click that follows a completed marquee. True exactly
    /// once per completed gesture.
    #[must_use]
    pub fn take_click_swallow(&mut self) -> bool {
        self.gate.consume()
    }

    /// Update the container's client-space bounds.
    pub fn set_viewport(&mut self, viewport: Rect) {
        self.viewport = viewport;
    }

    /// Replace the scroll offset (initial sync).
    pub fn set_scroll(&mut self, scroll: Offset) {
        self.scroll = scroll;
    }

    /// Current scroll offset as the driver knows it.
    #[must_use]
    pub fn scroll(&self) -> Offset {
        self.scroll
    }

    /// The selection host.
    #[must_use]
    pub fn selection(&self) -> &S {
        &self.selection
    }

    /// The selection host, mutably.
    pub fn selection_mut(&mut self) -> &mut S {
        &mut self.selection
    }

    fn to_content(&self, client: Point) -> Point {
        Point::new(client.x - self.viewport.x, client.y - self.viewport.y) + self.scroll
    }

    fn recompute(&mut self, registry: &RowRegistry) {
        let Some(press) = &self.press else {
            return;
        };
        if !press.active {
            return;
        }
        let current = self.to_content(self.pointer);
        let rect = Rect::from_points(press.anchor, current);
        self.rect = Some(rect);

        let hit: AHashSet<RowId> = registry.intersecting(&rect).into_iter().collect();
        let effective: AHashSet<RowId> = match press.combine {
            Combine::Replace => hit,
            Combine::Add => press.base.union(&hit).cloned().collect(),
            Combine::Toggle => press.base.symmetric_difference(&hit).cloned().collect(),
        };

        // Sorted for deterministic host updates under any set order.
        let mut ids: Vec<RowId> = effective.into_iter().collect();
        ids.sort();
        self.selection
            .replace_selection(ids, SelectionReason::Marquee);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
