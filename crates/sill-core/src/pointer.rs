#![forbid(unsafe_code)]

//! Pointer events, modifier flags, and the post-drag click gate.
//!
//! The engines never see raw host events; consumers normalize whatever
//! their widget host delivers into [`PointerEvent`] values in client
//! coordinates and feed them to the drivers.

use bitflags::bitflags;

use crate::geometry::Point;

bitflags! {
    /// Keyboard modifiers held during a pointer event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// No modifiers.
        const NONE  = 0b0000;
        /// Shift key.
        const SHIFT = 0b0001;
        /// Alt/Option key.
        const ALT   = 0b0010;
        /// Control key.
        const CTRL  = 0b0100;
        /// Super/Meta/Cmd key.
        const SUPER = 0b1000;
    }
}

impl Default for Modifiers {
    fn default() -> Self {
        Self::NONE
    }
}

/// Host platform family, for modifier conventions.
///
/// On mac-like platforms Cmd (Super) substitutes for Ctrl in selection
/// gestures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Platform {
    /// macOS and friends: Cmd toggles selection membership.
    MacLike,
    /// Everything else: Ctrl toggles selection membership.
    #[default]
    Other,
}

impl Platform {
    /// The modifier that toggles selection membership on this platform.
    #[must_use]
    pub const fn toggle_modifier(self) -> Modifiers {
        match self {
            Self::MacLike => Modifiers::SUPER,
            Self::Other => Modifiers::CTRL,
        }
    }
}

/// A normalized pointer event in client (viewport) coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerEvent {
    /// Pointer position in client coordinates.
    pub pos: Point,
    /// Modifiers held at the time of the event.
    pub modifiers: Modifiers,
}

impl PointerEvent {
    /// Create an event at the given client position with no modifiers.
    #[must_use]
    pub const fn at(x: f32, y: f32) -> Self {
        Self {
            pos: Point::new(x, y),
            modifiers: Modifiers::NONE,
        }
    }

    /// Attach modifiers.
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

/// One-shot suppression of the click that ends a drag.
///
/// The pointer-up that completes a marquee or reorder drag is usually
/// followed by a synthetic click from the host. Drivers arm the gate when
/// a drag completes; the consumer's click handler calls [`consume`] first
/// and drops the click when it returns `true`.
///
/// [`consume`]: ClickGate::consume
#[derive(Debug, Clone, Copy, Default)]
pub struct ClickGate {
    armed: bool,
}

impl ClickGate {
    /// Create a disarmed gate.
    #[must_use]
    pub const fn new() -> Self {
        Self { armed: false }
    }

    /// Arm the gate: the next click will be swallowed.
    pub fn arm(&mut self) {
        self.armed = true;
    }

    /// Whether the next click would be swallowed.
    #[inline]
    #[must_use]
    pub const fn is_armed(&self) -> bool {
        self.armed
    }

    /// Consume the gate. Returns `true` exactly once after [`arm`].
    ///
    /// [`arm`]: ClickGate::arm
    #[must_use]
    pub fn consume(&mut self) -> bool {
        std::mem::take(&mut self.armed)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
