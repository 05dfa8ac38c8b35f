//! Serializable editor commands.
//!
//! Every public operation and input event of [`EngineCore`] has a command
//! variant, so a session can be recorded as JSON and replayed headless.
//! Commands that target an object take an optional id; when omitted they
//! act on the current selection.

#[cfg(test)]
#[path = "command_test.rs"]
mod command_test;

use serde::{Deserialize, Serialize};

use crate::doc::{LayerMove, NewObject, ObjectId, ObjectPatch, Side};
use crate::engine::{Action, EngineCore};
use crate::geometry::Point;
use crate::input::{Button, Key, Modifiers};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum EditorCommand {
    Add {
        object: NewObject,
    },
    Update {
        #[serde(default)]
        id: Option<ObjectId>,
        patch: ObjectPatch,
    },
    Delete {
        #[serde(default)]
        id: Option<ObjectId>,
    },
    Duplicate {
        #[serde(default)]
        id: Option<ObjectId>,
    },
    Reorder {
        #[serde(default)]
        id: Option<ObjectId>,
        direction: LayerMove,
    },
    Clear,
    Select {
        #[serde(default)]
        id: Option<ObjectId>,
    },
    SetCanvasSize {
        width: f64,
        height: f64,
    },
    SetZoom {
        factor: f64,
    },
    ToggleGrid,
    ToggleRulers,
    SetCanvasOrigin {
        x: f64,
        y: f64,
    },
    Undo,
    Redo,
    SetActiveSide {
        side: Side,
    },
    ApplyTemplate {
        objects: Vec<NewObject>,
        width: f64,
        height: f64,
    },
    PointerDown {
        x: f64,
        y: f64,
        #[serde(default)]
        button: Button,
        #[serde(default)]
        modifiers: Modifiers,
    },
    PointerMove {
        x: f64,
        y: f64,
        #[serde(default)]
        modifiers: Modifiers,
    },
    PointerUp {
        x: f64,
        y: f64,
        #[serde(default)]
        button: Button,
        #[serde(default)]
        modifiers: Modifiers,
    },
    PointerLeave,
    KeyDown {
        key: Key,
        #[serde(default)]
        modifiers: Modifiers,
    },
}

impl EngineCore {
    /// Apply one command. Targeted commands with no id and no selection are no-ops.
    pub fn dispatch(&mut self, command: EditorCommand) -> Vec<Action> {
        match command {
            EditorCommand::Add { object } => self.add(object),
            EditorCommand::Update { id, patch } => self.with_target(id, |core, id| core.update(&id, &patch)),
            EditorCommand::Delete { id } => self.with_target(id, |core, id| core.delete(&id)),
            EditorCommand::Duplicate { id } => self.with_target(id, |core, id| core.duplicate(&id)),
            EditorCommand::Reorder { id, direction } => self.with_target(id, |core, id| core.reorder(&id, direction)),
            EditorCommand::Clear => self.clear(),
            EditorCommand::Select { id } => self.select(id),
            EditorCommand::SetCanvasSize { width, height } => self.set_canvas_size(width, height),
            EditorCommand::SetZoom { factor } => self.set_zoom(factor),
            EditorCommand::ToggleGrid => self.toggle_grid(),
            EditorCommand::ToggleRulers => self.toggle_rulers(),
            EditorCommand::SetCanvasOrigin { x, y } => self.set_canvas_origin(Point::new(x, y)),
            EditorCommand::Undo => self.undo(),
            EditorCommand::Redo => self.redo(),
            EditorCommand::SetActiveSide { side } => self.set_active_side(side),
            EditorCommand::ApplyTemplate { objects, width, height } => self.apply_template(objects, width, height),
            EditorCommand::PointerDown { x, y, button, modifiers } => {
                self.on_pointer_down(Point::new(x, y), button, modifiers)
            }
            EditorCommand::PointerMove { x, y, modifiers } => self.on_pointer_move(Point::new(x, y), modifiers),
            EditorCommand::PointerUp { x, y, button, modifiers } => self.on_pointer_up(Point::new(x, y), button, modifiers),
            EditorCommand::PointerLeave => self.on_pointer_leave(),
            EditorCommand::KeyDown { key, modifiers } => self.on_key_down(&key, modifiers),
        }
    }

    /// Apply every command in order, collecting all actions.
    pub fn replay(&mut self, commands: impl IntoIterator<Item = EditorCommand>) -> Vec<Action> {
        commands.into_iter().flat_map(|c| self.dispatch(c)).collect()
    }

    fn with_target(
        &mut self,
        id: Option<ObjectId>,
        f: impl FnOnce(&mut Self, ObjectId) -> Vec<Action>,
    ) -> Vec<Action> {
        match id.or(self.ui.selected_id) {
            Some(id) => f(self, id),
            None => Vec::new(),
        }
    }
}
