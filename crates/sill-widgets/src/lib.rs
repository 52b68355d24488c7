#![forbid(unsafe_code)]

//! Widget wiring for the Sill interaction engines.
//!
//! # Role in Sill
//! `sill-widgets` connects the generic engines to each widget's data and
//! surface: the Favorites tree (hierarchical, persisted through an
//! external service), the Items browser (flat listing with directory
//! containers, marquee selection, autoscroll), and the music Queue (flat
//! manual reorder synced to the playback collaborator).
//!
//! Domain commits are fire-and-forget: models push effects onto a queue
//! the host shell drains and executes; the drivers never wait on them.
//! Failures come back through the completion hooks and are logged, never
//! re-thrown into a driver.
//!
//! The widget UIs themselves (rendering, theming, context menus) and the
//! host bridge (filesystem listing, durable storage, audio playback) are
//! external; everything here is the interaction layer between them.

pub mod effects;
pub mod favorites;
pub mod items;
pub mod queue;
pub mod selection;
