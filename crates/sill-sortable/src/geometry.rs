#![forbid(unsafe_code)]

//! Registry-backed geometry adapter.
//!
//! Most consumers lay their rows out in one scrollable container and
//! register each row's content-space bounds as it mounts. For those,
//! [`RegistryGeometry`] is the whole geometry story: it converts client
//! coordinates to content space using the container's viewport and scroll
//! offset, scans the registry, and applies the trailing-space fallback.
//!
//! Consumers with exotic layouts (nested sub-menus, virtualized grids)
//! implement [`GeometryAdapter`] themselves; the driver does not care.

use sill_core::geometry::{Axis, Offset, Point, Rect};
use sill_core::id::RowId;
use sill_core::pointer::PointerEvent;
use sill_core::registry::RowRegistry;

use crate::adapter::{GeometryAdapter, RowHit};

/// Geometry adapter over a consumer-owned [`RowRegistry`].
#[derive(Debug, Clone)]
pub struct RegistryGeometry {
    registry: RowRegistry,
    viewport: Rect,
    scroll: Offset,
    axis: Axis,
}

impl RegistryGeometry {
    /// Create an adapter for a scroll container occupying `viewport` in
    /// client coordinates.
    #[must_use]
    pub fn new(viewport: Rect, axis: Axis) -> Self {
        Self {
            registry: RowRegistry::new(),
            viewport,
            scroll: Offset::ZERO,
            axis,
        }
    }

    /// The registry, for hit-testing reads.
    #[must_use]
    pub fn registry(&self) -> &RowRegistry {
        &self.registry
    }

    /// The registry, for mount/unmount updates.
    pub fn registry_mut(&mut self) -> &mut RowRegistry {
        &mut self.registry
    }

    /// Current client-space viewport of the scroll container.
    #[must_use]
    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    /// Update the viewport (container resized or moved).
    pub fn set_viewport(&mut self, viewport: Rect) {
        self.viewport = viewport;
    }

    /// Current scroll offset.
    #[must_use]
    pub fn scroll(&self) -> Offset {
        self.scroll
    }

    /// Replace the scroll offset.
    pub fn set_scroll(&mut self, scroll: Offset) {
        self.scroll = scroll;
    }

    /// Apply a scroll delta.
    pub fn scroll_by(&mut self, delta: Offset) {
        self.scroll = self.scroll + delta;
    }

    /// Convert a client-space point into content space.
    #[must_use]
    pub fn to_content(&self, client: Point) -> Point {
        Point::new(client.x - self.viewport.x, client.y - self.viewport.y) + self.scroll
    }
}

impl GeometryAdapter for RegistryGeometry {
    fn hit_test(&self, event: &PointerEvent) -> Option<RowHit> {
        // Outside the scroll container there is no target at all.
        if !self.viewport.contains(event.pos) {
            return None;
        }
        let p = self.to_content(event.pos);
        if let Some((id, rect)) = self.registry.hit(p) {
            let relative = match self.axis {
                Axis::Vertical => rect.relative_y(p),
                Axis::Horizontal => rect.relative_x(p),
            };
            return Some(RowHit::new(id.clone(), relative));
        }
        // Inside the container but over no row: treat as "after the last
        // row" so drops into empty trailing space still land.
        self.registry
            .last_row()
            .map(|(id, _)| RowHit::new(id.clone(), 1.0))
    }

    fn row_bounds(&self, id: &RowId) -> Option<Rect> {
        self.registry.bounds(id)
    }

    fn content_point(&self, event: &PointerEvent) -> Point {
        self.to_content(event.pos)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
