#![forbid(unsafe_code)]

//! Favorites tree wiring.
//!
//! The Favorites widget shows a tree of folders and favorite paths,
//! reorderable by drag, with cross-container moves into and out of
//! folders. Several instances can be embedded at once (sidebar, picker),
//! so every mutation bumps a revision and broadcasts a [`TreeChanged`]
//! for siblings to refresh from.
//!
//! The model keeps the *full* tree in display order; the driver sees only
//! the currently visible rows (collapsed folders hide their subtree), so
//! collapsed folders are never offered as nesting targets — hover-to-open
//! expands them first.
//!
//! Commits are optimistic: the local order updates immediately, the
//! durable move rides out on the effect queue, and a failed persist is
//! logged without rolling the visual order back (the next refresh from
//! the source of truth corrects it if needed).

use ahash::AHashMap;
use web_time::Instant;

use sill_core::coalescer::PointerCoalescer;
use sill_core::geometry::{Axis, Rect};
use sill_core::id::RowId;
use sill_core::pointer::PointerEvent;
use sill_sortable::adapter::ModelAdapter;
use sill_sortable::driver::{DropOutcome, SortableDriver};
use sill_sortable::geometry::RegistryGeometry;
use sill_sortable::hover::HoverOpenController;
use sill_sortable::intent::Move;
use sill_sortable::snapshot::{NodeRef, Snapshot, SortMode};
use sill_sortable::visuals::IndicatorVisuals;

use crate::effects::{MoveRequest, PersistError, TreeChanged};

/// Effects the host shell drains and executes.
#[derive(Debug, Clone, PartialEq)]
pub enum FavoritesEffect {
    /// Durably apply a move through the favorites service.
    Persist(MoveRequest),
    /// Notify sibling favorites instances that the tree changed.
    Announce(TreeChanged),
    /// Hover-to-open expanded a folder; re-render its children positioned
    /// relative to the hovered row.
    OpenFolder {
        /// The expanded folder.
        folder: RowId,
    },
}

/// One entry of the favorites tree.
#[derive(Debug, Clone, PartialEq)]
pub struct FavoriteEntry {
    /// Row identity (`folder:<key>` or `item:<path>`).
    pub id: RowId,
    /// Display label.
    pub label: String,
    /// Parent folder, if nested.
    pub parent: Option<RowId>,
    /// Whether this entry is a folder.
    pub is_folder: bool,
    /// Whether a folder currently shows its children.
    pub expanded: bool,
    /// Pinned entries (e.g. the Home root) cannot be dragged.
    pub pinned: bool,
}

/// The favorites tree model.
#[derive(Debug, Clone, Default)]
pub struct FavoritesModel {
    /// Full tree in display (pre-order) sequence.
    entries: Vec<FavoriteEntry>,
    revision: u64,
    effects: Vec<FavoritesEffect>,
}

impl FavoritesModel {
    /// Create an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a root-level folder. Folders start collapsed.
    pub fn add_folder(&mut self, key: impl AsRef<str>, label: impl Into<String>) -> RowId {
        let id = RowId::folder(key);
        self.entries.push(FavoriteEntry {
            id: id.clone(),
            label: label.into(),
            parent: None,
            is_folder: true,
            expanded: false,
            pinned: false,
        });
        id
    }

    /// Append a favorite path, optionally inside a folder.
    ///
    /// Nested entries are inserted at the end of the parent's subtree so
    /// the display sequence stays a valid pre-order.
    pub fn add_favorite(
        &mut self,
        path: impl AsRef<str>,
        label: impl Into<String>,
        parent: Option<&RowId>,
    ) -> RowId {
        let id = RowId::item(path);
        let entry = FavoriteEntry {
            id: id.clone(),
            label: label.into(),
            parent: parent.cloned(),
            is_folder: false,
            expanded: false,
            pinned: false,
        };
        match parent.and_then(|p| self.subtree_end(p)) {
            Some(at) => self.entries.insert(at, entry),
            None => self.entries.push(entry),
        }
        id
    }

    /// Mark an entry as pinned (drag refused).
    pub fn pin(&mut self, id: &RowId) {
        if let Some(entry) = self.entry_mut(id) {
            entry.pinned = true;
        }
    }

    /// Expand or collapse a folder.
    pub fn set_expanded(&mut self, id: &RowId, expanded: bool) {
        if let Some(entry) = self.entry_mut(id)
            && entry.is_folder
        {
            entry.expanded = expanded;
        }
    }

    /// Whether a folder is currently expanded.
    #[must_use]
    pub fn is_expanded(&self, id: &RowId) -> bool {
        self.entry(id).is_some_and(|e| e.expanded)
    }

    /// Look up an entry.
    #[must_use]
    pub fn entry(&self, id: &RowId) -> Option<&FavoriteEntry> {
        self.entries.iter().find(|e| &e.id == id)
    }

    /// All entries in display order (collapsed subtrees included).
    #[must_use]
    pub fn entries(&self) -> &[FavoriteEntry] {
        &self.entries
    }

    /// The entries a renderer actually shows: every ancestor expanded.
    #[must_use]
    pub fn visible(&self) -> Vec<&FavoriteEntry> {
        self.entries
            .iter()
            .filter(|e| self.ancestors_expanded(e))
            .collect()
    }

    /// Current tree revision.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Drain pending effects for the host to execute.
    #[must_use]
    pub fn take_effects(&mut self) -> Vec<FavoritesEffect> {
        std::mem::take(&mut self.effects)
    }

    /// Feedback from the host after executing a `Persist` effect.
    ///
    /// Failures are logged and swallowed; the optimistic order stands
    /// until a refresh from the source of truth says otherwise.
    pub fn complete_persist(&mut self, request: &MoveRequest, result: Result<(), PersistError>) {
        if let Err(err) = result {
            tracing::warn!(
                moved = %request.moved_key,
                target = %request.target_key,
                error = %err,
                "favorites move failed to persist"
            );
        }
    }

    fn entry_mut(&mut self, id: &RowId) -> Option<&mut FavoriteEntry> {
        self.entries.iter_mut().find(|e| &e.id == id)
    }

    fn ancestors_expanded(&self, entry: &FavoriteEntry) -> bool {
        let by_id: AHashMap<&RowId, &FavoriteEntry> =
            self.entries.iter().map(|e| (&e.id, e)).collect();
        let mut current = entry.parent.as_ref();
        let mut steps = self.entries.len();
        while let Some(parent_id) = current {
            let Some(parent) = by_id.get(parent_id) else {
                return false;
            };
            if !parent.expanded {
                return false;
            }
            steps = match steps.checked_sub(1) {
                Some(s) => s,
                None => return false,
            };
            current = parent.parent.as_ref();
        }
        true
    }

    /// Snapshot over the full tree, expansion ignored. Used for the
    /// optimistic local reorder, where collapsed subtrees must travel
    /// with their folder.
    fn full_snapshot(&self) -> Snapshot {
        Snapshot::new(self.entries.iter().map(Self::node_for).collect())
    }

    fn node_for(entry: &FavoriteEntry) -> NodeRef {
        let mut node = if entry.is_folder {
            NodeRef::container(entry.id.clone())
        } else {
            NodeRef::leaf(entry.id.clone())
        };
        if let Some(parent) = &entry.parent {
            node = node.with_parent(parent.clone());
        }
        if entry.pinned {
            node = node.with_sort_mode(SortMode::Derived);
        }
        node
    }

    fn subtree_end(&self, id: &RowId) -> Option<usize> {
        let snapshot = self.full_snapshot();
        let start = snapshot.position(id)?;
        let mut end = start + 1;
        while end < self.entries.len() && snapshot.is_descendant(&self.entries[end].id, id) {
            end += 1;
        }
        Some(end)
    }
}

impl ModelAdapter for FavoritesModel {
    fn snapshot(&self) -> Snapshot {
        Snapshot::new(
            self.entries
                .iter()
                .filter(|e| self.ancestors_expanded(e))
                .map(Self::node_for)
                .collect(),
        )
    }

    fn can_start_drag(&self, id: &RowId) -> bool {
        self.entry(id).is_some_and(|e| !e.pinned)
    }

    fn apply_move(&mut self, mv: Move) {
        let Some(request) = MoveRequest::from_move(&mv) else {
            tracing::warn!(id = %mv.id, "move with unrecognized id prefix dropped");
            return;
        };

        // Optimistic local reorder over the full tree.
        let Some(next) = self.full_snapshot().with_move(&mv.id, &mv.intent) else {
            tracing::warn!(id = %mv.id, target = %mv.intent.target, "move not applicable locally");
            return;
        };
        let mut by_id: AHashMap<RowId, FavoriteEntry> = self
            .entries
            .drain(..)
            .map(|e| (e.id.clone(), e))
            .collect();
        self.entries = next
            .iter()
            .filter_map(|node| {
                let mut entry = by_id.remove(&node.id)?;
                entry.parent = node.parent.clone();
                Some(entry)
            })
            .collect();

        self.revision += 1;
        self.effects.push(FavoritesEffect::Persist(request));
        self.effects.push(FavoritesEffect::Announce(TreeChanged {
            revision: self.revision,
        }));
    }
}

/// The assembled Favorites surface: driver + hover-to-open + coalescing.
pub struct FavoritesView {
    driver: SortableDriver<FavoritesModel, RegistryGeometry, IndicatorVisuals>,
    hover: HoverOpenController,
    coalescer: PointerCoalescer,
}

impl FavoritesView {
    /// Wire a model to a scroll container at `viewport`.
    #[must_use]
    pub fn new(model: FavoritesModel, viewport: Rect) -> Self {
        let mut view = Self {
            driver: SortableDriver::new(
                model,
                RegistryGeometry::new(viewport, Axis::Vertical),
                IndicatorVisuals::new(Axis::Vertical),
            ),
            hover: HoverOpenController::new(),
            coalescer: PointerCoalescer::new(),
        };
        view.sync_hover_open_state();
        view
    }

    /// The model.
    #[must_use]
    pub fn model(&self) -> &FavoritesModel {
        self.driver.model()
    }

    /// The model, mutably (external refreshes).
    pub fn model_mut(&mut self) -> &mut FavoritesModel {
        self.driver.model_mut()
    }

    /// The visuals, for the renderer to poll.
    #[must_use]
    pub fn visuals(&self) -> &IndicatorVisuals {
        self.driver.visuals()
    }

    /// Register a row's content-space bounds as it mounts or moves.
    pub fn mount_row(&mut self, id: RowId, bounds: Rect) {
        self.driver.geometry_mut().registry_mut().insert(id, bounds);
    }

    /// Unregister a row as it unmounts.
    pub fn unmount_row(&mut self, id: &RowId) {
        self.driver.geometry_mut().registry_mut().remove(id);
    }

    /// Expand or collapse a folder from the widget UI (chevron click),
    /// keeping hover-to-open's idempotence tracking in sync.
    pub fn set_expanded(&mut self, id: &RowId, expanded: bool) {
        self.driver.model_mut().set_expanded(id, expanded);
        if expanded {
            self.hover.mark_open(id.clone());
        } else {
            self.hover.mark_closed(id);
        }
    }

    /// A pointer press on a row's drag handle.
    pub fn press_row(&mut self, id: RowId, event: &PointerEvent) {
        self.driver.start_drag(id, event);
    }

    /// Raw pointer move; coalesced until the next [`frame`].
    ///
    /// [`frame`]: FavoritesView::frame
    pub fn pointer_move(&mut self, event: &PointerEvent) {
        self.coalescer.note_move(*event);
    }

    /// Once-per-animation-frame pump: applies coalesced input, advances
    /// hover-to-open, and drains effects.
    pub fn frame(&mut self, now: Instant) -> Vec<FavoritesEffect> {
        let frame = self.coalescer.flush();
        if let Some(scroll) = frame.scroll {
            self.driver.geometry_mut().scroll_by(scroll);
        }
        if let Some(event) = frame.pointer_move {
            self.driver.pointer_move(&event);
            self.hover
                .note_preview(self.driver.intent(), self.driver.is_blocked(), now);
        }

        let mut effects = Vec::new();
        if let Some(folder) = self.hover.poll(now) {
            self.driver.model_mut().set_expanded(&folder, true);
            effects.push(FavoritesEffect::OpenFolder { folder });
        }
        effects.extend(self.driver.model_mut().take_effects());
        effects
    }

    /// A pointer release; resolves the gesture and returns any resulting
    /// effects alongside the outcome.
    pub fn pointer_up(&mut self, event: &PointerEvent) -> (DropOutcome, Vec<FavoritesEffect>) {
        // Apply any coalesced move so the release sees the latest preview.
        let pending = self.coalescer.flush();
        if let Some(scroll) = pending.scroll {
            self.driver.geometry_mut().scroll_by(scroll);
        }
        if let Some(event) = pending.pointer_move {
            self.driver.pointer_move(&event);
        }

        let outcome = self.driver.pointer_up(event);
        self.hover.reset();
        let effects = self.driver.model_mut().take_effects();
        (outcome, effects)
    }

    /// Abort any gesture (unmount, focus loss).
    pub fn cancel(&mut self) {
        self.driver.cancel();
        self.hover.reset();
        self.coalescer.clear();
    }

    /// Swallow the click that ends a completed drag. True exactly once.
    #[must_use]
    pub fn swallow_click(&mut self) -> bool {
        self.driver.take_click_swallow()
    }

    fn sync_hover_open_state(&mut self) {
        let expanded: Vec<RowId> = self
            .driver
            .model()
            .entries()
            .iter()
            .filter(|e| e.is_folder && e.expanded)
            .map(|e| e.id.clone())
            .collect();
        for id in expanded {
            self.hover.mark_open(id);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
