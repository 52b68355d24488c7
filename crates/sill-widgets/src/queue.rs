#![forbid(unsafe_code)]

//! Music queue wiring.
//!
//! The play queue is the simplest sortable consumer: a flat list of
//! tracks, no containers, manual order only. A committed reorder updates
//! the local list immediately and emits the new key sequence for the
//! playback collaborator to adopt — the queue never talks to the audio
//! subsystem directly.

use sill_core::coalescer::PointerCoalescer;
use sill_core::geometry::{Axis, Rect};
use sill_core::id::RowId;
use sill_core::pointer::PointerEvent;
use sill_sortable::adapter::ModelAdapter;
use sill_sortable::driver::{DropOutcome, SortableDriver};
use sill_sortable::geometry::RegistryGeometry;
use sill_sortable::intent::Move;
use sill_sortable::snapshot::{NodeRef, Snapshot};
use sill_sortable::visuals::IndicatorVisuals;

/// Effects the host's player plumbing executes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueueEffect {
    /// The queue order changed; hand the playback subsystem the new
    /// track-key sequence.
    SyncPlayer {
        /// Track keys in play order.
        order: Vec<String>,
    },
}

/// One queued track.
#[derive(Debug, Clone, PartialEq)]
pub struct QueueTrack {
    /// Row identity (`item:<track-key>`).
    pub id: RowId,
    /// Display title.
    pub title: String,
}

/// The play-queue model.
#[derive(Debug, Clone, Default)]
pub struct QueueModel {
    tracks: Vec<QueueTrack>,
    effects: Vec<QueueEffect>,
}

impl QueueModel {
    /// Create an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a track.
    pub fn push_track(&mut self, key: impl AsRef<str>, title: impl Into<String>) -> RowId {
        let id = RowId::item(key);
        self.tracks.push(QueueTrack {
            id: id.clone(),
            title: title.into(),
        });
        id
    }

    /// Tracks in play order.
    #[must_use]
    pub fn tracks(&self) -> &[QueueTrack] {
        &self.tracks
    }

    /// Position of a track in the queue.
    #[must_use]
    pub fn position(&self, id: &RowId) -> Option<usize> {
        self.tracks.iter().position(|t| &t.id == id)
    }

    /// Drain pending effects for the host to execute.
    #[must_use]
    pub fn take_effects(&mut self) -> Vec<QueueEffect> {
        std::mem::take(&mut self.effects)
    }

    fn order_keys(&self) -> Vec<String> {
        self.tracks
            .iter()
            .filter_map(|t| t.id.key().map(str::to_string))
            .collect()
    }
}

impl ModelAdapter for QueueModel {
    fn snapshot(&self) -> Snapshot {
        Snapshot::new(
            self.tracks
                .iter()
                .map(|t| NodeRef::leaf(t.id.clone()))
                .collect(),
        )
    }

    fn apply_move(&mut self, mv: Move) {
        let Some(next) = self.snapshot().with_move(&mv.id, &mv.intent) else {
            tracing::warn!(id = %mv.id, "queue reorder not applicable");
            return;
        };
        let mut by_id: ahash::AHashMap<RowId, QueueTrack> = self
            .tracks
            .drain(..)
            .map(|t| (t.id.clone(), t))
            .collect();
        self.tracks = next
            .iter()
            .filter_map(|node| by_id.remove(&node.id))
            .collect();
        self.effects.push(QueueEffect::SyncPlayer {
            order: self.order_keys(),
        });
    }
}

/// The assembled queue surface: driver + coalescing, no containers.
pub struct QueueView {
    driver: SortableDriver<QueueModel, RegistryGeometry, IndicatorVisuals>,
    coalescer: PointerCoalescer,
}

impl QueueView {
    /// Wire a model to a scroll container at `viewport`.
    #[must_use]
    pub fn new(model: QueueModel, viewport: Rect) -> Self {
        Self {
            driver: SortableDriver::new(
                model,
                RegistryGeometry::new(viewport, Axis::Vertical),
                IndicatorVisuals::new(Axis::Vertical),
            ),
            coalescer: PointerCoalescer::new(),
        }
    }

    /// The model.
    #[must_use]
    pub fn model(&self) -> &QueueModel {
        self.driver.model()
    }

    /// The model, mutably.
    pub fn model_mut(&mut self) -> &mut QueueModel {
        self.driver.model_mut()
    }

    /// The visuals, for the renderer to poll.
    #[must_use]
    pub fn visuals(&self) -> &IndicatorVisuals {
        self.driver.visuals()
    }

    /// Register a row's content-space bounds.
    pub fn mount_row(&mut self, id: RowId, bounds: Rect) {
        self.driver.geometry_mut().registry_mut().insert(id, bounds);
    }

    /// Unregister a row.
    pub fn unmount_row(&mut self, id: &RowId) {
        self.driver.geometry_mut().registry_mut().remove(id);
    }

    /// A pointer press on a row's drag handle.
    pub fn press_row(&mut self, id: RowId, event: &PointerEvent) {
        self.driver.start_drag(id, event);
    }

    /// Raw pointer move; coalesced until the next [`frame`].
    ///
    /// [`frame`]: QueueView::frame
    pub fn pointer_move(&mut self, event: &PointerEvent) {
        self.coalescer.note_move(*event);
    }

    /// Once-per-animation-frame pump.
    pub fn frame(&mut self) -> Vec<QueueEffect> {
        let frame = self.coalescer.flush();
        if let Some(scroll) = frame.scroll {
            self.driver.geometry_mut().scroll_by(scroll);
        }
        if let Some(event) = frame.pointer_move {
            self.driver.pointer_move(&event);
        }
        self.driver.model_mut().take_effects()
    }

    /// A pointer release.
    pub fn pointer_up(&mut self, event: &PointerEvent) -> (DropOutcome, Vec<QueueEffect>) {
        let pending = self.coalescer.flush();
        if let Some(event) = pending.pointer_move {
            self.driver.pointer_move(&event);
        }
        let outcome = self.driver.pointer_up(event);
        (outcome, self.driver.model_mut().take_effects())
    }

    /// Abort any gesture.
    pub fn cancel(&mut self) {
        self.driver.cancel();
        self.coalescer.clear();
    }

    /// Swallow the click that ends a completed drag.
    #[must_use]
    pub fn swallow_click(&mut self) -> bool {
        self.driver.take_click_swallow()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
