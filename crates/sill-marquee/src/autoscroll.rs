#![forbid(unsafe_code)]

//! Edge autoscroll for active marquee drags.
//!
//! When the pointer leaves the scroll container during a marquee, the
//! content scrolls in the outward direction so the rectangle can keep
//! growing. The velocity ramps with a quadratic ease of the out-of-bounds
//! distance and is capped, so a pointer just past the edge crawls and a
//! pointer far past it moves briskly — but never faster than the cap.
//!
//! No scrolling happens while the pointer is inside the bounds, even
//! right at an edge.

use sill_core::easing::Ease;
use sill_core::geometry::{Offset, Point, Rect};

/// Velocity parameters for edge autoscroll.
#[derive(Debug, Clone)]
pub struct AutoScrollConfig {
    /// Maximum scroll speed in pixels per frame (default: 16).
    pub max_speed: f32,
    /// Out-of-bounds distance in pixels at which the speed reaches the
    /// maximum (default: 120).
    pub ramp: f32,
    /// Easing applied to the normalized overshoot (default: quadratic
    /// ease-in).
    pub ease: Ease,
}

impl Default for AutoScrollConfig {
    fn default() -> Self {
        Self {
            max_speed: 16.0,
            ramp: 120.0,
            ease: Ease::InQuad,
        }
    }
}

/// Computes per-frame scroll velocity from pointer overshoot.
#[derive(Debug, Clone, Default)]
pub struct AutoScroller {
    config: AutoScrollConfig,
}

impl AutoScroller {
    /// Create a scroller with default parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a scroller with explicit parameters.
    #[must_use]
    pub fn with_config(config: AutoScrollConfig) -> Self {
        Self { config }
    }

    /// The scroll delta to apply this frame for a pointer at `pointer`
    /// relative to container `bounds` (both client-space).
    ///
    /// Zero while the pointer is inside the bounds.
    #[must_use]
    pub fn velocity(&self, bounds: Rect, pointer: Point) -> Offset {
        Offset::new(
            self.axis_velocity(pointer.x, bounds.x, bounds.right()),
            self.axis_velocity(pointer.y, bounds.y, bounds.bottom()),
        )
    }

    fn axis_velocity(&self, pos: f32, min: f32, max: f32) -> f32 {
        let overshoot = if pos < min {
            pos - min // negative: scroll toward the start
        } else if pos > max {
            pos - max // positive: scroll toward the end
        } else {
            return 0.0;
        };
        let ramp = self.config.ramp.max(1.0);
        let eased = self.config.ease.apply(overshoot.abs() / ramp);
        self.config.max_speed * eased * overshoot.signum()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
