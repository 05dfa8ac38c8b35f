use crate::config::EditorConfig;
use crate::consts::{DUPLICATE_OFFSET, RESCALE_FLOOR};
use crate::doc::{CanvasObject, DesignData, LayerMove, NewObject, ObjectId, ObjectPatch, Pose, Scene, Side};
use crate::geometry::{Camera, Point};
use crate::gesture::{canvas_grip_size, drag_candidate, resize_pose, rotation_angle};
use crate::history::{History, Snapshot};
use crate::hit::{self, Hit, HitPart, ResizeHandle};
use crate::input::{Button, InputState, Key, Modifiers, UiState};
use crate::overlay::Overlay;
use crate::rescale::rescale_scene;
use crate::snap::snap_position;

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from operations and input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    ObjectCreated(CanvasObject),
    ObjectUpdated { id: ObjectId, fields: ObjectPatch },
    ObjectDeleted { id: ObjectId },
    SelectionChanged(Option<ObjectId>),
    /// Both sides were replaced wholesale (undo, redo, template, clear).
    SceneReplaced,
    CanvasResized { width: f64, height: f64 },
    HistoryChanged { can_undo: bool, can_redo: bool },
    SetCursor(String),
    RenderNeeded,
}

/// The single owner of all editor state.
///
/// Presentation code holds one `EngineCore` and routes every control change
/// and pointer/keyboard event through it. Nothing here touches a browser
/// API, so the whole state machine is testable natively.
pub struct EngineCore {
    pub scene: Scene,
    pub camera: Camera,
    pub ui: UiState,
    pub input: InputState,
    history: History,
    config: EditorConfig,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self::with_config(EditorConfig::default())
    }
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start an empty session with the given tunables. The initial empty
    /// scene is the oldest history entry.
    #[must_use]
    pub fn with_config(config: EditorConfig) -> Self {
        let scene = Scene::new(config.canvas_width, config.canvas_height);
        let history = History::new(Snapshot::capture(&scene), config.history_limit);
        Self { scene, camera: Camera::default(), ui: UiState::default(), input: InputState::default(), history, config }
    }

    // --- Object CRUD ---

    /// Create an object on top of the active side, select it and record history.
    pub fn add(&mut self, new: NewObject) -> Vec<Action> {
        self.settle_canvas_grip();
        let id = self.scene.active_mut().push_new(new);
        let mut actions = Vec::new();
        if let Some(obj) = self.scene.active().get(&id) {
            tracing::debug!(%id, kind = ?obj.object_type(), side = ?self.scene.active_side, "object added");
            actions.push(Action::ObjectCreated(obj.clone()));
        }
        self.ui.selected_id = Some(id);
        actions.push(Action::SelectionChanged(Some(id)));
        self.push_commit(&mut actions);
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Merge fields into an object on the active side. Never records history.
    pub fn update(&mut self, id: &ObjectId, patch: &ObjectPatch) -> Vec<Action> {
        self.settle_canvas_grip();
        if !self.scene.active_mut().apply_patch(id, patch) {
            return Vec::new();
        }
        vec![Action::ObjectUpdated { id: *id, fields: patch.clone() }, Action::RenderNeeded]
    }

    /// Remove an object from the active side and record history.
    pub fn delete(&mut self, id: &ObjectId) -> Vec<Action> {
        self.settle_canvas_grip();
        if self.scene.active_mut().remove(id).is_none() {
            return Vec::new();
        }
        tracing::debug!(%id, "object deleted");
        let mut actions = vec![Action::ObjectDeleted { id: *id }];
        if self.input.target() == Some(*id) {
            self.input = InputState::Idle;
            self.ui.snap_lines.clear();
        }
        if self.ui.selected_id == Some(*id) {
            self.ui.selected_id = None;
            actions.push(Action::SelectionChanged(None));
        }
        self.push_commit(&mut actions);
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Clone an object with a fresh id, offset by the duplicate step, on top
    /// of the stack. The clone is selected.
    pub fn duplicate(&mut self, id: &ObjectId) -> Vec<Action> {
        let Some(source) = self.scene.active().get(id).cloned() else {
            return Vec::new();
        };
        let mut new = NewObject::from(source);
        new.x += DUPLICATE_OFFSET;
        new.y += DUPLICATE_OFFSET;
        self.add(new)
    }

    /// Move an object within the active side's paint order and record history.
    pub fn reorder(&mut self, id: &ObjectId, direction: LayerMove) -> Vec<Action> {
        self.settle_canvas_grip();
        if !self.scene.active_mut().reorder(id, direction) {
            return Vec::new();
        }
        tracing::debug!(%id, ?direction, "object reordered");
        let mut actions = Vec::new();
        self.push_commit(&mut actions);
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Empty the active side and record history.
    pub fn clear(&mut self) -> Vec<Action> {
        self.input = InputState::Idle;
        self.ui.snap_lines.clear();
        self.scene.active_mut().clear();
        let mut actions = vec![Action::SceneReplaced];
        if self.ui.selected_id.take().is_some() {
            actions.push(Action::SelectionChanged(None));
        }
        self.push_commit(&mut actions);
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Select an object on the active side, or clear the selection with `None`.
    /// Unknown ids are ignored.
    pub fn select(&mut self, id: Option<ObjectId>) -> Vec<Action> {
        if id.is_some_and(|id| !self.scene.active().contains(&id)) || id == self.ui.selected_id {
            return Vec::new();
        }
        self.ui.selected_id = id;
        vec![Action::SelectionChanged(id), Action::RenderNeeded]
    }

    // --- Canvas controls ---

    /// Change the physical canvas size, rescaling both sides, and record history.
    pub fn set_canvas_size(&mut self, width: f64, height: f64) -> Vec<Action> {
        self.settle_canvas_grip();
        if rescale_scene(&mut self.scene, width, height).is_none() {
            return Vec::new();
        }
        let mut actions = vec![Action::CanvasResized { width: self.scene.width, height: self.scene.height }];
        self.push_commit(&mut actions);
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Set the zoom factor, clamped to the supported range.
    pub fn set_zoom(&mut self, factor: f64) -> Vec<Action> {
        self.camera.set_zoom(factor);
        vec![Action::RenderNeeded]
    }

    pub fn toggle_grid(&mut self) -> Vec<Action> {
        self.ui.show_grid = !self.ui.show_grid;
        vec![Action::RenderNeeded]
    }

    pub fn toggle_rulers(&mut self) -> Vec<Action> {
        self.ui.show_rulers = !self.ui.show_rulers;
        vec![Action::RenderNeeded]
    }

    /// Screen position of the canvas's top-left corner, set by host layout.
    pub fn set_canvas_origin(&mut self, origin: Point) -> Vec<Action> {
        self.camera.origin = origin;
        vec![Action::RenderNeeded]
    }

    // --- History ---

    /// Record the current scene if it differs from the entry at the cursor.
    /// Returns whether an entry was added.
    pub fn commit_history(&mut self) -> bool {
        let snapshot = Snapshot::capture(&self.scene);
        if self.history.current() == Some(&snapshot) {
            return false;
        }
        self.history.commit(snapshot);
        true
    }

    pub fn undo(&mut self) -> Vec<Action> {
        self.abandon_gesture();
        let Some(snapshot) = self.history.undo() else {
            return Vec::new();
        };
        snapshot.restore(&mut self.scene);
        self.after_restore()
    }

    pub fn redo(&mut self) -> Vec<Action> {
        self.abandon_gesture();
        let Some(snapshot) = self.history.redo() else {
            return Vec::new();
        };
        snapshot.restore(&mut self.scene);
        self.after_restore()
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // --- Sides and bulk load ---

    /// Switch which side receives edits. Any gesture is cancelled and the
    /// selection cleared, since ids do not cross sides.
    pub fn set_active_side(&mut self, side: Side) -> Vec<Action> {
        if side == self.scene.active_side {
            return Vec::new();
        }
        self.cancel_gesture();
        self.scene.active_side = side;
        let mut actions = Vec::new();
        if self.ui.selected_id.take().is_some() {
            actions.push(Action::SelectionChanged(None));
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Replace the front side and the canvas size in one step, with fresh ids
    /// and a dense stacking order following `objects`. One history entry.
    pub fn apply_template(&mut self, objects: Vec<NewObject>, width: f64, height: f64) -> Vec<Action> {
        self.abandon_gesture();
        let count = objects.len();
        self.scene.front.clear();
        for new in objects {
            self.scene.front.push_new(new);
        }
        if width.is_finite() && height.is_finite() {
            self.scene.width = width.max(RESCALE_FLOOR);
            self.scene.height = height.max(RESCALE_FLOOR);
        }
        tracing::info!(objects = count, width = self.scene.width, height = self.scene.height, "template applied");

        let mut actions = vec![
            Action::SceneReplaced,
            Action::CanvasResized { width: self.scene.width, height: self.scene.height },
        ];
        if self.ui.selected_id.take().is_some() {
            actions.push(Action::SelectionChanged(None));
        }
        self.push_commit(&mut actions);
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Copy of both sides and the canvas size for export collaborators.
    #[must_use]
    pub fn design_data(&self) -> DesignData {
        self.scene.design_data()
    }

    // --- Queries ---

    #[must_use]
    pub fn selection(&self) -> Option<ObjectId> {
        self.ui.selected_id
    }

    #[must_use]
    pub fn camera(&self) -> Camera {
        self.camera
    }

    /// Look up an object on the active side.
    #[must_use]
    pub fn object(&self, id: &ObjectId) -> Option<&CanvasObject> {
        self.scene.active().get(id)
    }

    #[must_use]
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    #[must_use]
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Pixel geometry for rulers, grid, snap lines and selection handles.
    #[must_use]
    pub fn overlay(&self) -> Overlay {
        Overlay::build(&self.scene, &self.camera, &self.ui)
    }

    // --- Input events ---

    /// Start a gesture. Priority: handles of the selected object, the
    /// canvas grip, the top-most body, then empty canvas (deselect).
    pub fn on_pointer_down(&mut self, screen_pt: Point, button: Button, _modifiers: Modifiers) -> Vec<Action> {
        let mut actions = self.finish_gesture();
        if button != Button::Primary {
            return actions;
        }

        let hit = hit::hit_test(screen_pt, self.scene.active(), &self.camera, self.ui.selected_id);
        match hit {
            Some(Hit { object_id: id, part: HitPart::ResizeHandle(handle) }) => {
                if let Some(orig) = self.object(&id).map(CanvasObject::pose) {
                    tracing::debug!(%id, ?handle, "gesture start: resize");
                    self.input = InputState::Resizing { id, handle, start_screen: screen_pt, orig };
                    actions.push(Action::SetCursor(handle_cursor(handle).into()));
                }
            }
            Some(Hit { object_id: id, part: HitPart::RotateHandle }) => {
                if let Some(orig) = self.object(&id).map(CanvasObject::pose) {
                    tracing::debug!(%id, "gesture start: rotate");
                    self.input = InputState::Rotating { id, orig };
                    actions.push(Action::SetCursor("grabbing".into()));
                }
            }
            _ if hit::canvas_grip_at(screen_pt, &self.camera, self.scene.width, self.scene.height) => {
                tracing::debug!(width = self.scene.width, height = self.scene.height, "canvas grip start");
                self.input = InputState::ResizingCanvas { start_screen: screen_pt, start: Snapshot::capture(&self.scene) };
                actions.push(Action::SetCursor("nwse-resize".into()));
            }
            Some(Hit { object_id: id, part: HitPart::Body }) => {
                actions.extend(self.select(Some(id)));
                let unlocked = self.object(&id).filter(|o| !o.locked).map(CanvasObject::pose);
                if let Some(orig) = unlocked {
                    tracing::debug!(%id, "gesture start: drag");
                    self.input = InputState::Dragging { id, start_screen: screen_pt, orig };
                    actions.push(Action::SetCursor("move".into()));
                }
            }
            None => actions.extend(self.select(None)),
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Recompute the active gesture from its start state and the total
    /// pointer delta; when idle, report the hover cursor.
    pub fn on_pointer_move(&mut self, screen_pt: Point, modifiers: Modifiers) -> Vec<Action> {
        match self.input {
            InputState::Idle => vec![Action::SetCursor(self.hover_cursor(screen_pt).into())],
            InputState::Dragging { id, start_screen, orig } => {
                let candidate = drag_candidate(&orig, self.pointer_delta(start_screen, screen_pt));
                let snapped = snap_position(
                    self.scene.active(),
                    &id,
                    candidate,
                    self.scene.width,
                    self.scene.height,
                    self.config.snap_threshold,
                );
                self.ui.snap_lines = snapped.lines;
                let pose = Pose { x: snapped.position.x, y: snapped.position.y, ..orig };
                self.apply_gesture_pose(id, pose)
            }
            InputState::Resizing { id, handle, start_screen, orig } => {
                let delta = self.pointer_delta(start_screen, screen_pt);
                let pose = resize_pose(&orig, handle, delta, modifiers.shift, self.config.min_object_size);
                self.apply_gesture_pose(id, pose)
            }
            InputState::Rotating { id, orig } => {
                let center = self.camera.canvas_to_screen(Point::new(orig.x, orig.y));
                let rotation = rotation_angle(center, screen_pt, modifiers.shift);
                self.apply_gesture_pose(id, Pose { rotation, ..orig })
            }
            InputState::ResizingCanvas { .. } => self.drag_canvas_grip(screen_pt),
        }
    }

    /// End the active gesture, committing history once if anything changed.
    pub fn on_pointer_up(&mut self, _screen_pt: Point, _button: Button, _modifiers: Modifiers) -> Vec<Action> {
        self.finish_gesture()
    }

    /// Pointer left the canvas: treated exactly like pointer-up.
    pub fn on_pointer_leave(&mut self) -> Vec<Action> {
        self.finish_gesture()
    }

    /// Keyboard shortcuts: arrow nudge, delete, and escape.
    pub fn on_key_down(&mut self, key: &Key, modifiers: Modifiers) -> Vec<Action> {
        if key.0 == "Escape" {
            if !self.input.is_idle() {
                let mut actions = self.cancel_gesture();
                actions.push(Action::SetCursor("default".into()));
                actions.push(Action::RenderNeeded);
                return actions;
            }
            return self.select(None);
        }

        if !self.input.is_idle() {
            return Vec::new();
        }
        let Some(selected) = self.ui.selected_id.and_then(|id| self.object(&id)) else {
            return Vec::new();
        };
        // A locked selection ignores every shortcut except Escape.
        if selected.locked {
            return Vec::new();
        }
        let (id, x, y) = (selected.id, selected.x, selected.y);

        let step = if modifiers.shift { self.config.nudge_step_coarse } else { self.config.nudge_step };
        let (dx, dy) = match key.0.as_str() {
            "Delete" | "Backspace" => return self.delete(&id),
            "ArrowUp" => (0.0, -step),
            "ArrowDown" => (0.0, step),
            "ArrowLeft" => (-step, 0.0),
            "ArrowRight" => (step, 0.0),
            _ => return Vec::new(),
        };

        let patch = ObjectPatch { x: Some(x + dx), y: Some(y + dy), ..Default::default() };
        let mut actions = self.update(&id, &patch);
        self.push_commit(&mut actions);
        actions
    }

    // --- Internals ---

    fn pointer_delta(&self, start: Point, now: Point) -> Point {
        Point::new(self.camera.screen_dist_to_canvas(now.x - start.x), self.camera.screen_dist_to_canvas(now.y - start.y))
    }

    /// Write a gesture pose without the patch-path clamp. Locked or vanished
    /// targets end the gesture untouched.
    fn apply_gesture_pose(&mut self, id: ObjectId, pose: Pose) -> Vec<Action> {
        match self.scene.active_mut().get_mut(&id) {
            Some(obj) if !obj.locked => {
                obj.set_pose(pose);
                vec![Action::ObjectUpdated { id, fields: ObjectPatch::from_pose(pose) }, Action::RenderNeeded]
            }
            _ => {
                tracing::debug!(%id, "gesture target unavailable; gesture dropped");
                self.input = InputState::Idle;
                self.ui.snap_lines.clear();
                Vec::new()
            }
        }
    }

    /// Rescale from the gesture-start scene, so the result depends only on
    /// the total pointer delta.
    fn drag_canvas_grip(&mut self, screen_pt: Point) -> Vec<Action> {
        let InputState::ResizingCanvas { start_screen, start } = &self.input else {
            return Vec::new();
        };
        let delta = self.pointer_delta(*start_screen, screen_pt);
        let (width, height) = canvas_grip_size(start.width, start.height, delta);
        if (width - self.scene.width).abs() < f64::EPSILON && (height - self.scene.height).abs() < f64::EPSILON {
            return Vec::new();
        }
        start.restore(&mut self.scene);
        if rescale_scene(&mut self.scene, width, height).is_none() {
            return Vec::new();
        }
        vec![Action::CanvasResized { width, height }, Action::RenderNeeded]
    }

    /// Edits made while the canvas grip is held keep the current rescaled
    /// scene; the gesture ends so later moves cannot restore its stale start.
    fn settle_canvas_grip(&mut self) {
        if matches!(self.input, InputState::ResizingCanvas { .. }) {
            tracing::debug!("canvas grip ended by edit");
            self.input = InputState::Idle;
        }
    }

    fn finish_gesture(&mut self) -> Vec<Action> {
        let state = std::mem::take(&mut self.input);
        if state.is_idle() {
            return Vec::new();
        }
        self.ui.snap_lines.clear();
        let mut actions = Vec::new();
        let committed = self.push_commit(&mut actions);
        tracing::debug!(committed, "gesture end");
        actions.push(Action::SetCursor("default".into()));
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Put the gesture target back at its start pose without committing.
    fn cancel_gesture(&mut self) -> Vec<Action> {
        let state = std::mem::take(&mut self.input);
        self.ui.snap_lines.clear();
        match state {
            InputState::Idle => Vec::new(),
            InputState::Dragging { id, orig, .. }
            | InputState::Resizing { id, orig, .. }
            | InputState::Rotating { id, orig } => {
                tracing::debug!(%id, "gesture cancelled");
                match self.scene.active_mut().get_mut(&id) {
                    Some(obj) => {
                        obj.set_pose(orig);
                        vec![Action::ObjectUpdated { id, fields: ObjectPatch::from_pose(orig) }]
                    }
                    None => Vec::new(),
                }
            }
            InputState::ResizingCanvas { start, .. } => {
                tracing::debug!("canvas grip cancelled");
                start.restore(&mut self.scene);
                vec![Action::CanvasResized { width: start.width, height: start.height }]
            }
        }
    }

    /// Drop a gesture whose effects are about to be overwritten wholesale.
    fn abandon_gesture(&mut self) {
        self.input = InputState::Idle;
        self.ui.snap_lines.clear();
    }

    fn after_restore(&mut self) -> Vec<Action> {
        let mut actions = vec![
            Action::SceneReplaced,
            Action::CanvasResized { width: self.scene.width, height: self.scene.height },
        ];
        if self.ui.selected_id.take().is_some() {
            actions.push(Action::SelectionChanged(None));
        }
        actions.push(self.history_changed());
        actions.push(Action::RenderNeeded);
        actions
    }

    fn push_commit(&mut self, actions: &mut Vec<Action>) -> bool {
        let committed = self.commit_history();
        if committed {
            actions.push(self.history_changed());
        }
        committed
    }

    fn history_changed(&self) -> Action {
        Action::HistoryChanged { can_undo: self.history.can_undo(), can_redo: self.history.can_redo() }
    }

    fn hover_cursor(&self, screen_pt: Point) -> &'static str {
        match hit::hit_test(screen_pt, self.scene.active(), &self.camera, self.ui.selected_id) {
            Some(h) => match h.part {
                HitPart::ResizeHandle(handle) => handle_cursor(handle),
                HitPart::RotateHandle => "grab",
                HitPart::Body => {
                    if self.object(&h.object_id).is_some_and(|o| o.locked) {
                        "default"
                    } else {
                        "move"
                    }
                }
            },
            None if hit::canvas_grip_at(screen_pt, &self.camera, self.scene.width, self.scene.height) => "nwse-resize",
            None => "default",
        }
    }
}

fn handle_cursor(handle: ResizeHandle) -> &'static str {
    match handle {
        ResizeHandle::N | ResizeHandle::S => "ns-resize",
        ResizeHandle::E | ResizeHandle::W => "ew-resize",
        ResizeHandle::Ne | ResizeHandle::Sw => "nesw-resize",
        ResizeHandle::Nw | ResizeHandle::Se => "nwse-resize",
    }
}
