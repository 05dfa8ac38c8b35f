//! Input model: modifier keys, mouse buttons, keys, and the gesture state machine.
//!
//! `InputState` is the active gesture tracked between pointer-down and
//! pointer-up. Each active variant carries the pointer's screen position and
//! the pose (or, for the canvas grip, the scene) at gesture start; every
//! pointer-move recomputes from that start plus the total delta, never from
//! the previous frame.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use serde::{Deserialize, Serialize};

use crate::doc::{ObjectId, Pose};
use crate::geometry::Point;
use crate::history::Snapshot;
use crate::hit::ResizeHandle;
use crate::snap::SnapLines;

/// Keyboard/mouse modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    /// Shift: aspect-lock while resizing, 15° steps while rotating, coarse nudge.
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    #[must_use]
    pub fn shift() -> Self {
        Self { shift: true, ..Self::default() }
    }
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    #[default]
    Primary,
    Middle,
    Secondary,
}

/// A keyboard key as reported by the browser (e.g. `"ArrowUp"`, `"Delete"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Key(pub String);

impl Key {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self(name.to_string())
    }
}

/// Persistent UI state visible to the presentation layer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UiState {
    /// The id of the currently selected object on the active side, if any.
    pub selected_id: Option<ObjectId>,
    pub show_grid: bool,
    pub show_rulers: bool,
    /// Guides the dragged object is currently locked onto.
    pub snap_lines: SnapLines,
}

/// Internal state for the gesture state machine.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum InputState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// Moving an object's center.
    Dragging {
        id: ObjectId,
        /// Screen position of the pointer at gesture start.
        start_screen: Point,
        /// Pose at gesture start; also the cancel target.
        orig: Pose,
    },
    /// Resizing an object by one of its eight handles.
    Resizing {
        id: ObjectId,
        handle: ResizeHandle,
        start_screen: Point,
        orig: Pose,
    },
    /// Rotating an object about its center.
    Rotating { id: ObjectId, orig: Pose },
    /// Resizing the physical canvas with the frame grip. `start` holds both
    /// sides and the dimensions at gesture start; every move rescales from it.
    ResizingCanvas { start_screen: Point, start: Snapshot },
}

impl InputState {
    /// The object being manipulated, if the gesture targets one.
    #[must_use]
    pub fn target(&self) -> Option<ObjectId> {
        match self {
            Self::Dragging { id, .. } | Self::Resizing { id, .. } | Self::Rotating { id, .. } => Some(*id),
            Self::Idle | Self::ResizingCanvas { .. } => None,
        }
    }

    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}
