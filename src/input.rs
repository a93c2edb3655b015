//! Input model: mouse buttons and the drag state machine.
//!
//! The viewer has a single gesture: grabbing the light icon and dragging it.
//! `InputState` tracks whether that gesture is active and which sync session
//! it owns, so a release can cancel exactly that session.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::sync::SessionId;
use crate::transform::Point;

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button (or two-finger tap).
    Secondary,
}

impl Button {
    /// Map a DOM `MouseEvent.button` code.
    #[must_use]
    pub fn from_dom(code: i16) -> Self {
        match code {
            1 => Self::Middle,
            2 => Self::Secondary,
            _ => Self::Primary,
        }
    }
}

/// Gesture state between pointer-down and pointer-up.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InputState {
    /// No gesture in progress.
    #[default]
    Idle,
    /// The light is being dragged.
    DraggingLight {
        /// Sync session started by this drag.
        session: SessionId,
        /// Latest pointer position in screen space.
        last_screen: Point,
    },
}

impl InputState {
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        matches!(self, Self::DraggingLight { .. })
    }

    /// The session owned by the active drag, if any.
    #[must_use]
    pub fn session(&self) -> Option<SessionId> {
        match self {
            Self::Idle => None,
            Self::DraggingLight { session, .. } => Some(*session),
        }
    }
}
