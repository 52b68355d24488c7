#![forbid(unsafe_code)]

//! Reactive drag visuals: the ghost and the insert bar.
//!
//! This layer holds no business logic. The driver pushes state into it
//! through the [`SortableVisuals`] seam and the host renderer reads the
//! resulting geometry back out each frame. Everything here is plain data;
//! how a ghost or a bar is painted is the renderer's concern.
//!
//! # Invariants
//! - Creating a new ghost tears down any stale one first.
//! - The ghost never outlives a drag: every end and cancel clears it.
//! - The insert bar is hidden, not dropped, when there is no intent, so a
//!   flickering pointer does not thrash the host's layout.
//! - `detach` is idempotent.

use sill_core::geometry::{Axis, Offset, Point, Rect};
use sill_core::id::RowId;

use crate::driver::DragState;
use crate::intent::{DropIntent, Placement};

/// Visual feedback seam consumed by the driver.
///
/// All hooks default to no-ops so tests and headless consumers can plug
/// in [`NullVisuals`].
pub trait SortableVisuals {
    /// A drag started: install visual state.
    ///
    /// `row_bounds` is `None` when the dragged row unmounted between
    /// arming and the threshold crossing; implementations skip the ghost
    /// in that case.
    fn attach(&mut self, _dragged: &RowId, _row_bounds: Option<Rect>, _pointer: Point) {}

    /// Remove all visual state. Must be idempotent.
    fn detach(&mut self) {}

    /// The drag state changed (used for "is-dragging" styling).
    fn on_state(&mut self, _state: &DragState) {}

    /// The pointer moved, in content coordinates.
    fn on_pointer(&mut self, _pointer: Point) {}

    /// The drop intent changed.
    ///
    /// `target_bounds` carries the hovered row's content-space bounds so
    /// the indicator can be positioned without the visuals layer doing
    /// its own lookups.
    fn on_preview(
        &mut self,
        _intent: Option<&DropIntent>,
        _blocked: bool,
        _target_bounds: Option<Rect>,
    ) {
    }
}

/// No-op visuals for tests and headless drivers.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullVisuals;

impl SortableVisuals for NullVisuals {}

/// A floating clone of the dragged row, pinned to the pointer.
///
/// The offset between the pointer and the row's origin is captured at
/// drag start, so the clone follows the pointer without jumping to align
/// its corner with it.
#[derive(Debug, Clone, Default)]
pub struct DragGhost {
    state: Option<GhostState>,
}

#[derive(Debug, Clone)]
struct GhostState {
    /// Pointer-to-row-origin offset captured at drag start.
    anchor: Offset,
    width: f32,
    height: f32,
    pointer: Point,
}

impl DragGhost {
    /// Create an inactive ghost.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the ghost for a new drag. Any stale ghost is replaced.
    pub fn show(&mut self, row_bounds: Rect, pointer: Point) {
        self.state = Some(GhostState {
            anchor: pointer.offset_from(Point::new(row_bounds.x, row_bounds.y)),
            width: row_bounds.width,
            height: row_bounds.height,
            pointer,
        });
    }

    /// Move the ghost with the pointer. No-op while inactive.
    pub fn follow(&mut self, pointer: Point) {
        if let Some(state) = &mut self.state {
            state.pointer = pointer;
        }
    }

    /// Current ghost rectangle in content coordinates, while active.
    #[must_use]
    pub fn rect(&self) -> Option<Rect> {
        self.state.as_ref().map(|s| {
            let origin = s.pointer - s.anchor;
            Rect::new(origin.x, origin.y, s.width, s.height)
        })
    }

    /// Whether a ghost is currently installed.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.state.is_some()
    }

    /// Tear the ghost down. Idempotent.
    pub fn clear(&mut self) {
        self.state = None;
    }
}

/// The indicator geometry the renderer draws.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InsertIndicator {
    /// A thin line at the insertion position.
    Bar(Rect),
    /// The hovered container's outline (`Inside` placement).
    Outline(Rect),
}

/// The insertion-position indicator for one sortable surface.
#[derive(Debug, Clone)]
pub struct InsertBar {
    axis: Axis,
    thickness: f32,
    visible: bool,
    indicator: Option<InsertIndicator>,
    blocked: bool,
}

impl InsertBar {
    /// Create a hidden bar for the given layout axis.
    #[must_use]
    pub fn new(axis: Axis) -> Self {
        Self {
            axis,
            thickness: 2.0,
            visible: false,
            indicator: None,
            blocked: false,
        }
    }

    /// Override the bar thickness in pixels.
    #[must_use]
    pub fn with_thickness(mut self, thickness: f32) -> Self {
        self.thickness = thickness.max(1.0);
        self
    }

    /// Position the indicator against the hovered row.
    pub fn update(&mut self, target_bounds: Rect, placement: Placement, blocked: bool) {
        let t = self.thickness;
        let indicator = match (placement, self.axis) {
            (Placement::Inside, _) => InsertIndicator::Outline(target_bounds),
            (Placement::Before, Axis::Vertical) => InsertIndicator::Bar(Rect::new(
                target_bounds.x,
                target_bounds.y - t / 2.0,
                target_bounds.width,
                t,
            )),
            (Placement::After, Axis::Vertical) => InsertIndicator::Bar(Rect::new(
                target_bounds.x,
                target_bounds.bottom() - t / 2.0,
                target_bounds.width,
                t,
            )),
            (Placement::Before, Axis::Horizontal) => InsertIndicator::Bar(Rect::new(
                target_bounds.x - t / 2.0,
                target_bounds.y,
                t,
                target_bounds.height,
            )),
            (Placement::After, Axis::Horizontal) => InsertIndicator::Bar(Rect::new(
                target_bounds.right() - t / 2.0,
                target_bounds.y,
                t,
                target_bounds.height,
            )),
        };
        self.indicator = Some(indicator);
        self.blocked = blocked;
        self.visible = true;
    }

    /// Hide the indicator without discarding its last geometry.
    pub fn hide(&mut self) {
        self.visible = false;
    }

    /// Discard all indicator state (drag end).
    pub fn clear(&mut self) {
        self.visible = false;
        self.indicator = None;
        self.blocked = false;
    }

    /// The indicator to draw, while visible.
    #[must_use]
    pub fn indicator(&self) -> Option<InsertIndicator> {
        if self.visible { self.indicator } else { None }
    }

    /// Whether the current intent is invalid (draw the blocked styling).
    #[must_use]
    pub fn is_blocked(&self) -> bool {
        self.visible && self.blocked
    }

    /// Whether the indicator is currently shown.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }
}

/// Ready-made visuals: ghost + insert bar + dragging-row marker.
///
/// The host renderer polls [`ghost_rect`], [`indicator`], and
/// [`dragging_row`] each frame and styles accordingly.
///
/// [`ghost_rect`]: IndicatorVisuals::ghost_rect
/// [`indicator`]: IndicatorVisuals::indicator
/// [`dragging_row`]: IndicatorVisuals::dragging_row
#[derive(Debug, Clone)]
pub struct IndicatorVisuals {
    ghost: DragGhost,
    bar: InsertBar,
    dragging: Option<RowId>,
}

impl IndicatorVisuals {
    /// Create visuals for the given layout axis.
    #[must_use]
    pub fn new(axis: Axis) -> Self {
        Self {
            ghost: DragGhost::new(),
            bar: InsertBar::new(axis),
            dragging: None,
        }
    }

    /// Current ghost rectangle, while dragging.
    #[must_use]
    pub fn ghost_rect(&self) -> Option<Rect> {
        self.ghost.rect()
    }

    /// Current insert indicator, while an intent is previewed.
    #[must_use]
    pub fn indicator(&self) -> Option<InsertIndicator> {
        self.bar.indicator()
    }

    /// Whether the previewed intent is blocked.
    #[must_use]
    pub fn is_blocked(&self) -> bool {
        self.bar.is_blocked()
    }

    /// The row to style as dragging, if any.
    #[must_use]
    pub fn dragging_row(&self) -> Option<&RowId> {
        self.dragging.as_ref()
    }
}

impl SortableVisuals for IndicatorVisuals {
    fn attach(&mut self, dragged: &RowId, row_bounds: Option<Rect>, pointer: Point) {
        // Replace any stale ghost from an interrupted drag.
        self.ghost.clear();
        if let Some(bounds) = row_bounds {
            self.ghost.show(bounds, pointer);
        }
        self.bar.clear();
        self.dragging = Some(dragged.clone());
    }

    fn detach(&mut self) {
        self.ghost.clear();
        self.bar.clear();
        self.dragging = None;
    }

    fn on_state(&mut self, state: &DragState) {
        if !state.is_dragging {
            self.dragging = None;
        }
    }

    fn on_pointer(&mut self, pointer: Point) {
        self.ghost.follow(pointer);
    }

    fn on_preview(
        &mut self,
        intent: Option<&DropIntent>,
        blocked: bool,
        target_bounds: Option<Rect>,
    ) {
        match (intent, target_bounds) {
            (Some(intent), Some(bounds)) => self.bar.update(bounds, intent.placement, blocked),
            _ => self.bar.hide(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ghost_keeps_pointer_offset() {
        let mut ghost = DragGhost::new();
        let row = Rect::new(0.0, 100.0, 200.0, 24.0);
        // Grab the row 15px in and 10px down from its origin.
        ghost.show(row, Point::new(15.0, 110.0));

        let rect = ghost.rect().expect("active");
        assert_eq!(rect, row);

        ghost.follow(Point::new(55.0, 200.0));
        let rect = ghost.rect().expect("active");
        assert_eq!(rect.x, 40.0);
        assert_eq!(rect.y, 190.0);
        assert_eq!(rect.width, 200.0);
        assert_eq!(rect.height, 24.0);
    }

    #[test]
    fn ghost_show_replaces_stale_ghost() {
        let mut ghost = DragGhost::new();
        ghost.show(Rect::new(0.0, 0.0, 100.0, 20.0), Point::new(5.0, 5.0));
        ghost.show(Rect::new(0.0, 40.0, 100.0, 20.0), Point::new(50.0, 50.0));
        let rect = ghost.rect().expect("active");
        assert_eq!(rect.y, 40.0);
    }

    #[test]
    fn ghost_clear_is_idempotent() {
        let mut ghost = DragGhost::new();
        ghost.show(Rect::new(0.0, 0.0, 10.0, 10.0), Point::new(0.0, 0.0));
        ghost.clear();
        ghost.clear();
        assert!(!ghost.is_active());
        assert!(ghost.rect().is_none());
    }

    #[test]
    fn vertical_bar_sits_on_row_edges() {
        let mut bar = InsertBar::new(Axis::Vertical).with_thickness(2.0);
        let row = Rect::new(10.0, 100.0, 200.0, 24.0);

        bar.update(row, Placement::Before, false);
        assert_eq!(
            bar.indicator(),
            Some(InsertIndicator::Bar(Rect::new(10.0, 99.0, 200.0, 2.0)))
        );

        bar.update(row, Placement::After, false);
        assert_eq!(
            bar.indicator(),
            Some(InsertIndicator::Bar(Rect::new(10.0, 123.0, 200.0, 2.0)))
        );
    }

    #[test]
    fn horizontal_bar_sits_on_pill_edges() {
        let mut bar = InsertBar::new(Axis::Horizontal).with_thickness(2.0);
        let pill = Rect::new(100.0, 0.0, 80.0, 30.0);

        bar.update(pill, Placement::Before, false);
        assert_eq!(
            bar.indicator(),
            Some(InsertIndicator::Bar(Rect::new(99.0, 0.0, 2.0, 30.0)))
        );

        bar.update(pill, Placement::After, false);
        assert_eq!(
            bar.indicator(),
            Some(InsertIndicator::Bar(Rect::new(179.0, 0.0, 2.0, 30.0)))
        );
    }

    #[test]
    fn inside_placement_outlines_the_container() {
        let mut bar = InsertBar::new(Axis::Vertical);
        let row = Rect::new(0.0, 50.0, 150.0, 20.0);
        bar.update(row, Placement::Inside, false);
        assert_eq!(bar.indicator(), Some(InsertIndicator::Outline(row)));
    }

    #[test]
    fn blocked_state_is_signalled() {
        let mut bar = InsertBar::new(Axis::Vertical);
        bar.update(Rect::new(0.0, 0.0, 10.0, 10.0), Placement::Before, true);
        assert!(bar.is_blocked());
        bar.update(Rect::new(0.0, 0.0, 10.0, 10.0), Placement::Before, false);
        assert!(!bar.is_blocked());
    }

    #[test]
    fn hide_retains_geometry_clear_drops_it() {
        let mut bar = InsertBar::new(Axis::Vertical);
        bar.update(Rect::new(0.0, 0.0, 10.0, 10.0), Placement::Before, false);
        assert!(bar.indicator().is_some());

        bar.hide();
        assert!(bar.indicator().is_none());
        assert!(!bar.is_visible());

        // Re-showing after a hide reuses the retained state path.
        bar.update(Rect::new(0.0, 20.0, 10.0, 10.0), Placement::After, false);
        assert!(bar.indicator().is_some());

        bar.clear();
        bar.clear();
        assert!(bar.indicator().is_none());
    }

    #[test]
    fn indicator_visuals_detach_is_idempotent() {
        let mut vis = IndicatorVisuals::new(Axis::Vertical);
        vis.attach(
            &RowId::item("/a"),
            Some(Rect::new(0.0, 0.0, 100.0, 20.0)),
            Point::new(5.0, 5.0),
        );
        assert!(vis.ghost_rect().is_some());
        assert_eq!(vis.dragging_row(), Some(&RowId::item("/a")));

        vis.detach();
        vis.detach();
        assert!(vis.ghost_rect().is_none());
        assert!(vis.dragging_row().is_none());
    }

    #[test]
    fn attach_without_bounds_skips_ghost() {
        let mut vis = IndicatorVisuals::new(Axis::Vertical);
        vis.attach(&RowId::item("/gone"), None, Point::new(0.0, 0.0));
        assert!(vis.ghost_rect().is_none());
        assert_eq!(vis.dragging_row(), Some(&RowId::item("/gone")));
    }
}
