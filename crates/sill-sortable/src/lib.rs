#![forbid(unsafe_code)]

//! Drag-to-reorder engine for Sill widgets.
//!
//! # Role in Sill
//! `sill-sortable` owns the pointer-driven drag lifecycle shared by every
//! manually orderable surface: the Favorites tree, the Items browser, and
//! the music queue. It is the one subsystem with real state-machine
//! structure; everything a consumer supplies goes through three explicit
//! seams.
//!
//! # Primary responsibilities
//! - **[`driver::SortableDriver`]**: the `Idle → Armed → Dragging` state
//!   machine that derives drop intents, rejects cycles, and commits moves.
//! - **[`adapter`]**: the `ModelAdapter` / `GeometryAdapter` contracts each
//!   widget implements.
//! - **[`snapshot`]**: fresh ordered views of the orderable tree, the
//!   descendant walk, and the pure reorder used for optimistic updates.
//! - **[`hover::HoverOpenController`]**: auto-expansion of collapsed
//!   containers under a sustained drag-hover.
//! - **[`visuals`]**: the reactive ghost / insert-bar layer behind the
//!   `SortableVisuals` seam.
//!
//! # Invariants
//! 1. At most one drag is active per driver instance; starting a new drag
//!    cancels the previous one.
//! 2. `is_dragging` is true exactly while the driver is in the dragging
//!    state.
//! 3. No committed move ever makes a row a descendant of itself.
//! 4. `cancel()` and visual teardown are idempotent.

pub mod adapter;
pub mod driver;
pub mod geometry;
pub mod hover;
pub mod intent;
pub mod snapshot;
pub mod visuals;
