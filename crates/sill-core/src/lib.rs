#![forbid(unsafe_code)]

//! Core: geometry, pointer events, row identity, and the row registry.
//!
//! # Role in Sill
//! `sill-core` is the vocabulary layer. It owns the coordinate types the
//! interaction engines compute in, the pointer event and modifier types
//! consumers feed them, and the consumer-owned registry that maps row ids
//! to their on-screen rectangles.
//!
//! # Primary responsibilities
//! - **Geometry**: f32 points/rectangles in content (scrolled) space.
//! - **Pointer**: normalized pointer events, modifier flags, click gate.
//! - **RowId**: kind-prefixed string identities (`folder:` / `item:`).
//! - **RowRegistry**: id → bounds map mutated by consumers as rows mount
//!   and unmount, read by the hit-testing adapters.
//! - **PointerCoalescer**: collapses pointer-move bursts to one recompute
//!   per frame.
//!
//! # How it fits in the system
//! The sortable driver (`sill-sortable`) and the marquee driver
//! (`sill-marquee`) consume these types; the widget wiring
//! (`sill-widgets`) owns the registries and feeds events through. Nothing
//! in this crate renders or talks to the host shell.

pub mod coalescer;
pub mod easing;
pub mod geometry;
pub mod id;
pub mod pointer;
pub mod registry;
