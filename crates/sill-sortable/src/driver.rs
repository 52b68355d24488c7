#![forbid(unsafe_code)]

//! The sortable driver: a pointer-driven drag state machine.
//!
//! # State Machine
//!
//! ```text
//! Idle ──start_drag──▶ Armed ──move ≥ threshold──▶ Dragging
//!   ▲                    │                            │
//!   └──────pointer_up────┴────pointer_up / cancel─────┘
//! ```
//!
//! While dragging, every pointer move takes a fresh model snapshot, asks
//! the geometry adapter for a hit, derives a [`DropIntent`], and pushes
//! the preview into the visuals. Pointer-up commits the last unblocked
//! intent through [`ModelAdapter::apply_move`] and reports the outcome.
//!
//! # Invariants
//!
//! 1. At most one drag is active per driver; `start_drag` during an
//!    active gesture cancels it first.
//! 2. `is_dragging()` is true exactly in the dragging state — false while
//!    idle, armed, and after a drop or cancel.
//! 3. A blocked intent (self-drop, or a target inside the dragged row's
//!    own subtree) never reaches `apply_move`.
//! 4. `cancel()` is idempotent and never invokes the model.
//!
//! # Failure Modes
//!
//! - `start_drag` with an unresolvable or drag-refused row is a silent
//!   no-op.
//! - A hit on a row missing from the fresh snapshot (hit-test/model
//!   mismatch) is previewed as blocked; the release outcome still carries
//!   the intent so a consumer may apply domain-specific fallbacks.
//! - A registry miss during the drag degrades to "no intent" — the drag
//!   continues, nothing crashes.

use sill_core::geometry::Point;
use sill_core::id::RowId;
use sill_core::pointer::{ClickGate, PointerEvent};

use crate::adapter::{GeometryAdapter, ModelAdapter, RowHit};
use crate::intent::{DropIntent, Move, Placement};
use crate::visuals::SortableVisuals;

/// Thresholds for drag interpretation.
#[derive(Debug, Clone)]
pub struct SortableConfig {
    /// Minimum pointer travel in pixels before a drag starts (default: 4).
    pub drag_threshold: f32,
    /// Fraction of a container row, centered, that maps to an `Inside`
    /// placement (default: 0.5 — the middle half). The outer bands map to
    /// `Before`/`After` so containers stay reorderable among siblings.
    pub container_inside_band: f32,
}

impl Default for SortableConfig {
    fn default() -> Self {
        Self {
            drag_threshold: 4.0,
            container_inside_band: 0.5,
        }
    }
}

/// Transient drag state observed by visuals and consumer UI bindings.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DragState {
    /// True exactly while the driver is in the dragging state.
    pub is_dragging: bool,
    /// The dragged row, while armed or dragging.
    pub dragging: Option<RowId>,
    /// Snapshot position of the currently hovered target, while previewed.
    pub hover_index: Option<usize>,
}

/// What a pointer-up resolved to.
#[derive(Debug, Clone, PartialEq)]
pub enum DropOutcome {
    /// The move was handed to the model adapter.
    Committed(Move),
    /// The drag ended without a commit. The last intent (if any) is
    /// carried for consumers with domain-specific fallbacks; the engine
    /// itself has already discarded it.
    Cancelled {
        /// The intent current at release time, blocked or targetless.
        last_intent: Option<DropIntent>,
    },
    /// The pointer-up did not end a drag (idle, or an ordinary click that
    /// never crossed the threshold).
    NotDragging,
}

#[derive(Debug, Clone, Default)]
enum Phase {
    #[default]
    Idle,
    Armed {
        id: RowId,
        origin: Point,
    },
    Dragging {
        id: RowId,
    },
}

/// The pointer-driven reorder driver for one sortable surface.
pub struct SortableDriver<M, G, V> {
    config: SortableConfig,
    model: M,
    geometry: G,
    visuals: V,
    phase: Phase,
    intent: Option<DropIntent>,
    blocked: bool,
    hover_index: Option<usize>,
    gate: ClickGate,
}

impl<M, G, V> SortableDriver<M, G, V>
where
    M: ModelAdapter,
    G: GeometryAdapter,
    V: SortableVisuals,
{
    /// Create a driver with default thresholds.
    #[must_use]
    pub fn new(model: M, geometry: G, visuals: V) -> Self {
        Self::with_config(model, geometry, visuals, SortableConfig::default())
    }

    /// Create a driver with explicit thresholds.
    #[must_use]
    pub fn with_config(model: M, geometry: G, visuals: V, config: SortableConfig) -> Self {
        Self {
            config,
            model,
            geometry,
            visuals,
            phase: Phase::Idle,
            intent: None,
            blocked: false,
            hover_index: None,
            gate: ClickGate::new(),
        }
    }

    /// Begin tracking a potential drag of `id`.
    ///
    /// Silently ignored when the model refuses the row or the row has no
    /// resolvable bounds. An active gesture is cancelled first.
    pub fn start_drag(&mut self, id: RowId, event: &PointerEvent) {
        if !matches!(self.phase, Phase::Idle) {
            tracing::debug!(id = %id, "start_drag while active; cancelling previous drag");
            self.cancel();
        }
        if !self.model.can_start_drag(&id) {
            tracing::trace!(id = %id, "drag refused by model");
            return;
        }
        if self.geometry.row_bounds(&id).is_none() {
            tracing::trace!(id = %id, "drag origin not resolvable to a row");
            return;
        }
        self.phase = Phase::Armed {
            id,
            origin: event.pos,
        };
    }

    /// Feed a pointer move.
    pub fn pointer_move(&mut self, event: &PointerEvent) {
        match &self.phase {
            Phase::Idle => {}
            Phase::Armed { id, origin } => {
                if event.pos.distance(*origin) < self.config.drag_threshold {
                    return;
                }
                let id = id.clone();
                let bounds = self.geometry.row_bounds(&id);
                let pointer = self.geometry.content_point(event);
                self.visuals.attach(&id, bounds, pointer);
                self.phase = Phase::Dragging { id: id.clone() };
                let state = self.state();
                self.visuals.on_state(&state);
                tracing::debug!(id = %id, "drag started");
                // Initial preview at the crossing position.
                self.refresh_preview(event);
            }
            Phase::Dragging { .. } => {
                self.visuals.on_pointer(self.geometry.content_point(event));
                self.refresh_preview(event);
            }
        }
    }

    /// Feed a pointer release and resolve the gesture.
    pub fn pointer_up(&mut self, event: &PointerEvent) -> DropOutcome {
        if matches!(self.phase, Phase::Dragging { .. }) {
            // Final hit test at the release position.
            self.refresh_preview(event);
        }
        match std::mem::take(&mut self.phase) {
            Phase::Idle => DropOutcome::NotDragging,
            Phase::Armed { .. } => {
                // Never crossed the threshold: an ordinary click, not ours.
                self.clear_preview();
                DropOutcome::NotDragging
            }
            Phase::Dragging { id } => {
                let intent = self.intent.take();
                let blocked = std::mem::take(&mut self.blocked);
                self.hover_index = None;
                self.visuals.detach();
                let state = self.state();
                self.visuals.on_state(&state);
                // The click that ends a completed drag must not double as
                // a selection or menu click.
                self.gate.arm();

                match intent {
                    Some(intent) if !blocked => {
                        let mv = Move { id, intent };
                        tracing::debug!(
                            id = %mv.id,
                            target = %mv.intent.target,
                            placement = ?mv.intent.placement,
                            "drop committed"
                        );
                        self.model.apply_move(mv.clone());
                        DropOutcome::Committed(mv)
                    }
                    last_intent => {
                        tracing::debug!(id = %id, blocked, "drop cancelled");
                        DropOutcome::Cancelled { last_intent }
                    }
                }
            }
        }
    }

    /// Force-abort from any state (unmount, external invalidation).
    ///
    /// Clears drag state and visuals synchronously; pending domain
    /// commits are unaffected. Idempotent.
    pub fn cancel(&mut self) {
        let was_active = !matches!(self.phase, Phase::Idle);
        self.phase = Phase::Idle;
        self.clear_preview();
        self.visuals.detach();
        if was_active {
            let state = self.state();
            self.visuals.on_state(&state);
            tracing::debug!("drag cancelled");
        }
    }

    /// Current transient drag state.
    #[must_use]
    pub fn state(&self) -> DragState {
        match &self.phase {
            Phase::Idle => DragState {
                hover_index: self.hover_index,
                ..DragState::default()
            },
            Phase::Armed { id, .. } => DragState {
                is_dragging: false,
                dragging: Some(id.clone()),
                hover_index: self.hover_index,
            },
            Phase::Dragging { id } => DragState {
                is_dragging: true,
                dragging: Some(id.clone()),
                hover_index: self.hover_index,
            },
        }
    }

    /// True exactly while in the dragging state.
    #[inline]
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, Phase::Dragging { .. })
    }

    /// The current drop intent, while previewed.
    #[must_use]
    pub fn intent(&self) -> Option<&DropIntent> {
        self.intent.as_ref()
    }

    /// Whether the current intent is blocked (would be a no-op or a
    /// cycle).
    #[must_use]
    pub fn is_blocked(&self) -> bool {
        self.blocked
    }

    /// Swallow the click that follows a completed drag. True exactly once
    /// per completed gesture.
    #[must_use]
    pub fn take_click_swallow(&mut self) -> bool {
        self.gate.consume()
    }

    /// The model adapter.
    #[must_use]
    pub fn model(&self) -> &M {
        &self.model
    }

    /// The model adapter, mutably (external refreshes).
    pub fn model_mut(&mut self) -> &mut M {
        &mut self.model
    }

    /// The geometry adapter.
    #[must_use]
    pub fn geometry(&self) -> &G {
        &self.geometry
    }

    /// The geometry adapter, mutably (row mount/unmount, scroll updates).
    pub fn geometry_mut(&mut self) -> &mut G {
        &mut self.geometry
    }

    /// The visuals layer.
    #[must_use]
    pub fn visuals(&self) -> &V {
        &self.visuals
    }

    /// The visuals layer, mutably.
    pub fn visuals_mut(&mut self) -> &mut V {
        &mut self.visuals
    }

    fn clear_preview(&mut self) {
        self.intent = None;
        self.blocked = false;
        self.hover_index = None;
    }

    fn in_inside_band(&self, relative: f32) -> bool {
        let band = self.config.container_inside_band.clamp(0.0, 1.0);
        let lo = (1.0 - band) / 2.0;
        relative >= lo && relative < lo + band
    }

    fn refresh_preview(&mut self, event: &PointerEvent) {
        let Phase::Dragging { id: dragged } = &self.phase else {
            return;
        };
        let dragged = dragged.clone();

        // Fresh snapshot every frame: a background refresh must be
        // reflected before any decision against it.
        let snapshot = self.model.snapshot();
        let (intent, blocked, hover_index, target_bounds) =
            match self.geometry.hit_test(event) {
                None => (None, false, None, None),
                Some(RowHit { id: target, relative }) => {
                    let node = snapshot.get(&target);
                    let placement = match node {
                        Some(node) if node.is_container && self.in_inside_band(relative) => {
                            Placement::Inside
                        }
                        _ if relative < 0.5 => Placement::Before,
                        _ => Placement::After,
                    };
                    // Self-drops and drops into the dragged row's own
                    // subtree would cycle; a hit absent from the snapshot
                    // cannot be validated and is blocked the same way.
                    let blocked = target == dragged
                        || snapshot.is_descendant(&target, &dragged)
                        || node.is_none();
                    let hover_index = snapshot.position(&target);
                    let bounds = self.geometry.row_bounds(&target);
                    (
                        Some(DropIntent::new(target, placement)),
                        blocked,
                        hover_index,
                        bounds,
                    )
                }
            };

        if intent != self.intent || blocked != self.blocked {
            tracing::trace!(intent = ?intent, blocked, "preview updated");
        }
        self.intent = intent;
        self.blocked = blocked;
        self.hover_index = hover_index;
        self.visuals
            .on_preview(self.intent.as_ref(), self.blocked, target_bounds);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
