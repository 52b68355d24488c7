#![forbid(unsafe_code)]

//! Marquee (rubber-band) multi-selection for Sill widgets.
//!
//! # Role in Sill
//! An independent pointer-driven engine for rectangular multi-select over
//! a scrollable item surface: press, drag past a small threshold, and the
//! rectangle selects every row it overlaps, with edge autoscroll when the
//! pointer leaves the container.
//!
//! # Primary responsibilities
//! - **[`driver::MarqueeDriver`]**: the `Idle → Pending → Active` state
//!   machine, content-space rectangle, overlap hit-testing, and the
//!   modifier combine policy.
//! - **[`autoscroll::AutoScroller`]**: outward scroll velocity with a
//!   quadratic ease of the out-of-bounds distance, capped at a maximum.
//! - **[`selection::SelectionHost`]**: the seam to the external selection
//!   engine; the driver replaces selections, it never stores one.
//!
//! # Invariants
//! 1. The rectangle is always normalized (`w >= 0`, `h >= 0`) regardless
//!    of drag direction.
//! 2. The live selection always reflects the current rectangle — never a
//!    union with earlier frames of the same drag.
//! 3. No autoscroll while the pointer is inside the container bounds.

pub mod autoscroll;
pub mod driver;
pub mod selection;
