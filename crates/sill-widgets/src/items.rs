#![forbid(unsafe_code)]

//! Items browser wiring.
//!
//! The Items browser is the busiest consumer: a flat listing where
//! directory rows are drop containers, rows reorder by drag, empty-space
//! drags marquee-select, and dragging past the container edge
//! autoscrolls. One row registry feeds both engines so a row can never be
//! a drop target and a selection target at different coordinates.
//!
//! Routing rule: a press on a row arms the sortable driver; a press on
//! empty space arms the marquee. Only one engine is ever active per
//! gesture.
//!
//! Dragging a row that belongs to the current selection moves the whole
//! selection into a directory; reorders move just the dragged row.

use ahash::AHashSet;
use web_time::Instant;

use sill_core::coalescer::PointerCoalescer;
use sill_core::geometry::{Axis, Offset, Rect};
use sill_core::id::RowId;
use sill_core::pointer::PointerEvent;
use sill_marquee::driver::{MarqueeDriver, MarqueeOutcome};
use sill_marquee::selection::SelectionHost;
use sill_sortable::adapter::ModelAdapter;
use sill_sortable::driver::{DropOutcome, SortableDriver};
use sill_sortable::geometry::RegistryGeometry;
use sill_sortable::hover::HoverOpenController;
use sill_sortable::intent::{Move, Placement};
use sill_sortable::snapshot::{NodeRef, Snapshot};
use sill_sortable::visuals::IndicatorVisuals;

use crate::selection::SelectionModel;

/// Effects the host shell drains and executes.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemsEffect {
    /// Move entries into a directory through the host bridge.
    RequestMove {
        /// Paths of the moved entries.
        paths: Vec<String>,
        /// Destination directory path.
        dest: String,
    },
    /// The custom order changed; persist the new path sequence.
    OrderChanged {
        /// Entry paths in display order.
        order: Vec<String>,
    },
    /// Hover-to-open wants a directory opened under the drag.
    OpenFolder {
        /// Directory path.
        path: String,
    },
    /// Edge autoscroll moved the container; sync the scrollbar.
    AutoScrolled {
        /// Horizontal delta in pixels.
        dx: f32,
        /// Vertical delta in pixels.
        dy: f32,
    },
}

/// Which engine resolved a pointer release.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemsGesture {
    /// The sortable driver resolved a drag.
    Drop(DropOutcome),
    /// The marquee driver resolved a selection gesture.
    Marquee(MarqueeOutcome),
}

/// One listed entry.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemEntry {
    /// Row identity (`folder:<path>` for directories, `item:<path>` for
    /// files).
    pub id: RowId,
    /// Display name.
    pub name: String,
    /// Whether the entry is a directory (a drop container).
    pub is_dir: bool,
}

/// The Items listing model.
#[derive(Debug, Clone, Default)]
pub struct ItemsModel {
    entries: Vec<ItemEntry>,
    /// Mirror of the selection engine, for whole-selection moves.
    selected: AHashSet<RowId>,
    effects: Vec<ItemsEffect>,
}

impl ItemsModel {
    /// Create an empty listing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a directory row.
    pub fn add_dir(&mut self, path: impl AsRef<str>, name: impl Into<String>) -> RowId {
        let id = RowId::folder(path);
        self.entries.push(ItemEntry {
            id: id.clone(),
            name: name.into(),
            is_dir: true,
        });
        id
    }

    /// Append a file row.
    pub fn add_file(&mut self, path: impl AsRef<str>, name: impl Into<String>) -> RowId {
        let id = RowId::item(path);
        self.entries.push(ItemEntry {
            id: id.clone(),
            name: name.into(),
            is_dir: false,
        });
        id
    }

    /// Entries in display order.
    #[must_use]
    pub fn entries(&self) -> &[ItemEntry] {
        &self.entries
    }

    /// Position of an entry.
    #[must_use]
    pub fn position(&self, id: &RowId) -> Option<usize> {
        self.entries.iter().position(|e| &e.id == id)
    }

    /// Mirror the selection engine's current set.
    pub fn set_selected(&mut self, selected: AHashSet<RowId>) {
        self.selected = selected;
    }

    /// Drain pending effects for the host to execute.
    #[must_use]
    pub fn take_effects(&mut self) -> Vec<ItemsEffect> {
        std::mem::take(&mut self.effects)
    }

    fn order_paths(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter_map(|e| e.id.key().map(str::to_string))
            .collect()
    }

    /// The paths a drop of `moved` carries: the whole selection when the
    /// dragged row is part of it, otherwise just the dragged row.
    fn moved_paths(&self, moved: &RowId) -> Vec<String> {
        if self.selected.contains(moved) {
            let mut paths: Vec<String> = self
                .entries
                .iter()
                .filter(|e| self.selected.contains(&e.id))
                .filter_map(|e| e.id.key().map(str::to_string))
                .collect();
            if paths.is_empty() {
                paths.extend(moved.key().map(str::to_string));
            }
            paths
        } else {
            moved.key().map(str::to_string).into_iter().collect()
        }
    }
}

impl ModelAdapter for ItemsModel {
    fn snapshot(&self) -> Snapshot {
        Snapshot::new(
            self.entries
                .iter()
                .map(|e| {
                    if e.is_dir {
                        NodeRef::container(e.id.clone())
                    } else {
                        NodeRef::leaf(e.id.clone())
                    }
                })
                .collect(),
        )
    }

    fn apply_move(&mut self, mv: Move) {
        match mv.intent.placement {
            Placement::Inside => {
                let Some(dest) = mv.intent.target.key().map(str::to_string) else {
                    tracing::warn!(target = %mv.intent.target, "drop target has no path");
                    return;
                };
                let paths = self.moved_paths(&mv.id);
                // Optimistic: the moved entries leave the listing now;
                // the next directory refresh is authoritative.
                self.entries
                    .retain(|e| e.id.key().is_none_or(|key| !paths.iter().any(|p| p == key)));
                self.effects.push(ItemsEffect::RequestMove { paths, dest });
            }
            Placement::Before | Placement::After => {
                let Some(next) = self.snapshot().with_move(&mv.id, &mv.intent) else {
                    tracing::warn!(id = %mv.id, "listing reorder not applicable");
                    return;
                };
                let mut by_id: ahash::AHashMap<RowId, ItemEntry> = self
                    .entries
                    .drain(..)
                    .map(|e| (e.id.clone(), e))
                    .collect();
                self.entries = next
                    .iter()
                    .filter_map(|node| by_id.remove(&node.id))
                    .collect();
                self.effects.push(ItemsEffect::OrderChanged {
                    order: self.order_paths(),
                });
            }
        }
    }
}

/// The assembled Items surface: both engines over one registry.
pub struct ItemsView {
    sortable: SortableDriver<ItemsModel, RegistryGeometry, IndicatorVisuals>,
    marquee: MarqueeDriver<SelectionModel>,
    hover: HoverOpenController,
    coalescer: PointerCoalescer,
}

impl ItemsView {
    /// Wire a model to a scroll container at `viewport`.
    #[must_use]
    pub fn new(model: ItemsModel, viewport: Rect) -> Self {
        Self {
            sortable: SortableDriver::new(
                model,
                RegistryGeometry::new(viewport, Axis::Vertical),
                IndicatorVisuals::new(Axis::Vertical),
            ),
            marquee: MarqueeDriver::new(SelectionModel::new(), viewport),
            hover: HoverOpenController::new(),
            coalescer: PointerCoalescer::new(),
        }
    }

    /// The model.
    #[must_use]
    pub fn model(&self) -> &ItemsModel {
        self.sortable.model()
    }

    /// The model, mutably (listing refreshes).
    pub fn model_mut(&mut self) -> &mut ItemsModel {
        self.sortable.model_mut()
    }

    /// The selection engine.
    #[must_use]
    pub fn selection(&self) -> &SelectionModel {
        self.marquee.selection()
    }

    /// The selection engine, mutably (row clicks).
    pub fn selection_mut(&mut self) -> &mut SelectionModel {
        self.marquee.selection_mut()
    }

    /// The drag visuals, for the renderer to poll.
    #[must_use]
    pub fn visuals(&self) -> &IndicatorVisuals {
        self.sortable.visuals()
    }

    /// The marquee rectangle, for the renderer to draw.
    #[must_use]
    pub fn marquee_rect(&self) -> Option<Rect> {
        self.marquee.rect()
    }

    /// Register a row's content-space bounds.
    pub fn mount_row(&mut self, id: RowId, bounds: Rect) {
        self.sortable.geometry_mut().registry_mut().insert(id, bounds);
    }

    /// Unregister a row.
    pub fn unmount_row(&mut self, id: &RowId) {
        self.sortable.geometry_mut().registry_mut().remove(id);
    }

    /// Route a pointer press: rows arm the sortable driver, empty space
    /// arms the marquee.
    pub fn pointer_down(&mut self, event: &PointerEvent) {
        let content = self.sortable.geometry().to_content(event.pos);
        let pressed = self
            .sortable
            .geometry()
            .registry()
            .hit(content)
            .map(|(id, _)| id.clone());
        match pressed {
            Some(id) => self.sortable.start_drag(id, event),
            None => self
                .marquee
                .pointer_down(event, self.sortable.geometry().registry()),
        }
    }

    /// Raw pointer move; coalesced until the next [`frame`].
    ///
    /// [`frame`]: ItemsView::frame
    pub fn pointer_move(&mut self, event: &PointerEvent) {
        self.coalescer.note_move(*event);
    }

    /// Raw scroll input; coalesced until the next [`frame`].
    pub fn scroll(&mut self, delta: Offset) {
        self.coalescer.note_scroll(delta);
    }

    /// Once-per-animation-frame pump: applies coalesced input, advances
    /// hover-to-open and autoscroll, and drains effects.
    pub fn frame(&mut self, now: Instant) -> Vec<ItemsEffect> {
        let mut effects = Vec::new();

        let frame = self.coalescer.flush();
        if let Some(delta) = frame.scroll {
            self.scroll_by(delta);
        }
        if let Some(event) = frame.pointer_move {
            if self.sortable.state().dragging.is_some() {
                self.sortable.pointer_move(&event);
                self.hover
                    .note_preview(self.sortable.intent(), self.sortable.is_blocked(), now);
            } else {
                self.marquee
                    .pointer_move(&event, self.sortable.geometry().registry());
            }
        }

        if let Some(folder) = self.hover.poll(now)
            && let Some(path) = folder.key()
        {
            effects.push(ItemsEffect::OpenFolder {
                path: path.to_string(),
            });
        }

        if let Some(delta) = self.marquee.autoscroll_delta() {
            self.scroll_by(delta);
            effects.push(ItemsEffect::AutoScrolled {
                dx: delta.dx,
                dy: delta.dy,
            });
        }

        // Keep the model's selection mirror fresh for group moves.
        let selected = self.marquee.selection().selected();
        self.sortable.model_mut().set_selected(selected);

        effects.extend(self.sortable.model_mut().take_effects());
        effects
    }

    /// A pointer release; resolves whichever gesture was active.
    pub fn pointer_up(&mut self, event: &PointerEvent) -> (ItemsGesture, Vec<ItemsEffect>) {
        // Apply coalesced input so the release sees the latest state.
        let pending = self.coalescer.flush();
        if let Some(delta) = pending.scroll {
            self.scroll_by(delta);
        }
        let sortable_active = self.sortable.state().dragging.is_some();
        if let Some(event) = pending.pointer_move {
            if sortable_active {
                self.sortable.pointer_move(&event);
            } else {
                self.marquee
                    .pointer_move(&event, self.sortable.geometry().registry());
            }
        }

        let gesture = if sortable_active {
            // Selection mirror for whole-selection drops.
            let selected = self.marquee.selection().selected();
            self.sortable.model_mut().set_selected(selected);
            ItemsGesture::Drop(self.sortable.pointer_up(event))
        } else {
            ItemsGesture::Marquee(
                self.marquee
                    .pointer_up(event, self.sortable.geometry().registry()),
            )
        };
        self.hover.reset();
        let effects = self.sortable.model_mut().take_effects();
        (gesture, effects)
    }

    /// Abort any gesture.
    pub fn cancel(&mut self) {
        self.sortable.cancel();
        self.marquee.cancel();
        self.hover.reset();
        self.coalescer.clear();
    }

    /// Swallow the click that ends a completed drag or marquee. True
    /// exactly once per completed gesture.
    #[must_use]
    pub fn swallow_click(&mut self) -> bool {
        let from_drag = self.sortable.take_click_swallow();
        let from_marquee = self.marquee.take_click_swallow();
        from_drag || from_marquee
    }

    fn scroll_by(&mut self, delta: Offset) {
        self.sortable.geometry_mut().scroll_by(delta);
        self.marquee
            .adjust_for_scroll(delta, self.sortable.geometry().registry());
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const ROW_H: f32 = 24.0;

    /// dirs "Games", "Music" then files a, b, c; 24px rows from y=0.
    fn seeded_view() -> ItemsView {
        let mut model = ItemsModel::new();
        model.add_dir("/drive/games", "Games");
        model.add_dir("/drive/music", "Music");
        model.add_file("/drive/a.iso", "a.iso");
        model.add_file("/drive/b.iso", "b.iso");
        model.add_file("/drive/c.iso", "c.iso");
        let mut view = ItemsView::new(model, Rect::new(0.0, 0.0, 300.0, 200.0));
        let ids: Vec<RowId> = view.model().entries().iter().map(|e| e.id.clone()).collect();
        for (i, id) in ids.into_iter().enumerate() {
            // Rows occupy the left 200px; x > 200 is empty space.
            view.mount_row(id, Rect::new(0.0, i as f32 * ROW_H, 200.0, ROW_H));
        }
        view
    }

    fn now() -> Instant {
        Instant::now()
    }

    fn row_center_y(index: usize) -> f32 {
        index as f32 * ROW_H + ROW_H / 2.0
    }

    #[test]
    fn press_on_row_arms_drag_press_on_empty_space_arms_marquee() {
        let mut view = seeded_view();

        view.pointer_down(&PointerEvent::at(10.0, 4.0));
        assert_eq!(
            view.sortable.state().dragging,
            Some(RowId::folder("/drive/games"))
        );
        view.cancel();

        view.pointer_down(&PointerEvent::at(250.0, 10.0));
        view.pointer_move(&PointerEvent::at(250.0, 100.0));
        let _ = view.frame(now());
        assert!(view.marquee_rect().is_some());
        assert!(!view.sortable.is_dragging());
    }

    #[test]
    fn marquee_selects_then_drag_moves_the_whole_selection() {
        let mut view = seeded_view();
        let t = now();

        // Marquee over the three files (rows 2..5, x within rows).
        view.pointer_down(&PointerEvent::at(250.0, row_center_y(2)));
        view.pointer_move(&PointerEvent::at(10.0, row_center_y(4)));
        let _ = view.frame(t);
        let (gesture, _) = view.pointer_up(&PointerEvent::at(10.0, row_center_y(4)));
        assert!(matches!(gesture, ItemsGesture::Marquee(_)));
        assert_eq!(view.selection().len(), 3);
        assert!(view.swallow_click());

        // Drag one selected file into the Music dir.
        view.pointer_down(&PointerEvent::at(10.0, row_center_y(3)));
        view.pointer_move(&PointerEvent::at(10.0, row_center_y(1)));
        let _ = view.frame(t);
        let (gesture, effects) = view.pointer_up(&PointerEvent::at(10.0, row_center_y(1)));

        match gesture {
            ItemsGesture::Drop(DropOutcome::Committed(mv)) => {
                assert_eq!(mv.intent.target, RowId::folder("/drive/music"));
                assert_eq!(mv.intent.placement, Placement::Inside);
            }
            other => unreachable!("expected committed drop, got {other:?}"),
        }
        assert_eq!(
            effects,
            vec![ItemsEffect::RequestMove {
                paths: vec![
                    "/drive/a.iso".to_string(),
                    "/drive/b.iso".to_string(),
                    "/drive/c.iso".to_string(),
                ],
                dest: "/drive/music".to_string(),
            }]
        );
        // Optimistically gone from the listing.
        assert_eq!(view.model().entries().len(), 2);
    }

    #[test]
    fn dragging_an_unselected_row_moves_only_itself() {
        let mut view = seeded_view();
        let t = now();

        view.selection_mut().select_only(RowId::item("/drive/a.iso"));
        view.pointer_down(&PointerEvent::at(10.0, row_center_y(4)));
        view.pointer_move(&PointerEvent::at(10.0, row_center_y(0)));
        let _ = view.frame(t);
        let (_, effects) = view.pointer_up(&PointerEvent::at(10.0, row_center_y(0)));

        assert_eq!(
            effects,
            vec![ItemsEffect::RequestMove {
                paths: vec!["/drive/c.iso".to_string()],
                dest: "/drive/games".to_string(),
            }]
        );
    }

    #[test]
    fn reorder_between_rows_emits_the_new_order() {
        let mut view = seeded_view();
        let t = now();

        // Drag c.iso to just below a.iso's top edge (upper half: before).
        view.pointer_down(&PointerEvent::at(10.0, row_center_y(4)));
        view.pointer_move(&PointerEvent::at(10.0, 2.0 * ROW_H + 3.0));
        let _ = view.frame(t);
        let (gesture, effects) = view.pointer_up(&PointerEvent::at(10.0, 2.0 * ROW_H + 3.0));

        assert!(matches!(
            gesture,
            ItemsGesture::Drop(DropOutcome::Committed(_))
        ));
        assert_eq!(
            effects,
            vec![ItemsEffect::OrderChanged {
                order: vec![
                    "/drive/games".to_string(),
                    "/drive/music".to_string(),
                    "/drive/c.iso".to_string(),
                    "/drive/a.iso".to_string(),
                    "/drive/b.iso".to_string(),
                ],
            }]
        );
    }

    #[test]
    fn hover_over_a_dir_opens_it_after_the_delay() {
        let mut view = seeded_view();
        let t = now();

        view.pointer_down(&PointerEvent::at(10.0, row_center_y(4)));
        view.pointer_move(&PointerEvent::at(10.0, row_center_y(0)));
        let effects = view.frame(t);
        assert!(effects.is_empty());

        view.pointer_move(&PointerEvent::at(11.0, row_center_y(0)));
        let effects = view.frame(t + web_time::Duration::from_millis(500));
        assert_eq!(
            effects,
            vec![ItemsEffect::OpenFolder {
                path: "/drive/games".to_string()
            }]
        );
    }

    #[test]
    fn active_marquee_autoscrolls_past_the_bottom_edge() {
        let mut view = seeded_view();
        let t = now();

        view.pointer_down(&PointerEvent::at(250.0, 100.0));
        view.pointer_move(&PointerEvent::at(250.0, 260.0));
        let effects = view.frame(t);

        let scrolled = effects
            .iter()
            .find_map(|e| match e {
                ItemsEffect::AutoScrolled { dy, .. } => Some(*dy),
                _ => None,
            })
            .expect("autoscroll effect");
        assert!(scrolled > 0.0);
        assert!(view.marquee.scroll().dy > 0.0);
        assert_eq!(view.sortable.geometry().scroll().dy, view.marquee.scroll().dy);
    }

    #[test]
    fn empty_space_click_clears_selection_and_is_not_swallowed() {
        let mut view = seeded_view();
        view.selection_mut().select_only(RowId::item("/drive/a.iso"));

        view.pointer_down(&PointerEvent::at(250.0, 150.0));
        let (gesture, _) = view.pointer_up(&PointerEvent::at(250.0, 150.0));
        assert_eq!(
            gesture,
            ItemsGesture::Marquee(MarqueeOutcome::Click {
                row: None,
                cleared: true
            })
        );
        assert!(view.selection().is_empty());
        assert!(!view.swallow_click());
    }
}
