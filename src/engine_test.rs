#![allow(clippy::float_cmp)]

use super::*;
use crate::config::EditorConfig;
use crate::doc::{ObjectKind, ShapeStyle};

// =============================================================
// Helpers
// =============================================================

const EPSILON: f64 = 1e-9;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn shape_at(x: f64, y: f64, w: f64, h: f64) -> NewObject {
    NewObject {
        x,
        y,
        width: w,
        height: h,
        rotation: 0.0,
        opacity: 1.0,
        locked: false,
        kind: ObjectKind::Shape(ShapeStyle::default()),
    }
}

fn locked_at(x: f64, y: f64) -> NewObject {
    NewObject { locked: true, ..shape_at(x, y, 4.0, 2.0) }
}

/// Add an object and return its id (add always selects).
fn add(core: &mut EngineCore, new: NewObject) -> ObjectId {
    core.add(new);
    core.selection().unwrap()
}

/// Screen point for a canvas point at zoom 1 with the origin at (0, 0).
fn at(x_in: f64, y_in: f64) -> Point {
    Point::new(x_in * 25.0, y_in * 25.0)
}

fn no_modifiers() -> Modifiers {
    Modifiers::default()
}

fn down(core: &mut EngineCore, p: Point) -> Vec<Action> {
    core.on_pointer_down(p, Button::Primary, no_modifiers())
}

fn up(core: &mut EngineCore, p: Point) -> Vec<Action> {
    core.on_pointer_up(p, Button::Primary, no_modifiers())
}

fn key(core: &mut EngineCore, name: &str, modifiers: Modifiers) -> Vec<Action> {
    core.on_key_down(&Key::new(name), modifiers)
}

fn pose_of(core: &EngineCore, id: &ObjectId) -> Pose {
    core.object(id).unwrap().pose()
}

fn z_indexes(core: &EngineCore) -> Vec<usize> {
    let mut z: Vec<usize> = core.scene.active().objects().iter().map(|o| o.z_index).collect();
    z.sort_unstable();
    z
}

fn has_action<F>(actions: &[Action], pred: F) -> bool
where
    F: Fn(&Action) -> bool,
{
    actions.iter().any(pred)
}

fn has_history_changed(actions: &[Action]) -> bool {
    has_action(actions, |a| matches!(a, Action::HistoryChanged { .. }))
}

// =============================================================
// Construction and defaults
// =============================================================

#[test]
fn core_new_is_empty_and_idle() {
    let core = EngineCore::new();
    assert!(core.selection().is_none());
    assert!(core.input.is_idle());
    assert!(!core.can_undo());
    assert!(!core.can_redo());
    assert_eq!((core.scene.width, core.scene.height), (24.0, 18.0));
    assert_eq!(core.camera().zoom(), 1.0);
}

#[test]
fn with_config_uses_canvas_size_and_limit() {
    let config = EditorConfig { canvas_width: 36.0, canvas_height: 12.0, history_limit: 3, ..EditorConfig::default() };
    let core = EngineCore::with_config(config);
    assert_eq!((core.scene.width, core.scene.height), (36.0, 12.0));
    assert_eq!(core.history().limit(), 3);
}

// =============================================================
// add / update / delete
// =============================================================

#[test]
fn add_selects_stacks_and_commits() {
    let mut core = EngineCore::new();
    let a = add(&mut core, shape_at(5.0, 5.0, 2.0, 2.0));
    let actions = core.add(shape_at(8.0, 8.0, 2.0, 2.0));
    let b = core.selection().unwrap();

    assert_ne!(a, b);
    assert_eq!(core.object(&b).unwrap().z_index, 1);
    assert!(has_action(&actions, |x| matches!(x, Action::ObjectCreated(o) if o.id == b)));
    assert!(has_history_changed(&actions));
    assert_eq!(core.history().len(), 3);
}

#[test]
fn update_merges_without_history() {
    let mut core = EngineCore::new();
    let id = add(&mut core, shape_at(5.0, 5.0, 2.0, 2.0));
    let before = core.history().len();

    let actions = core.update(&id, &ObjectPatch { opacity: Some(0.25), ..Default::default() });
    assert!(has_action(&actions, |a| matches!(a, Action::ObjectUpdated { .. })));
    assert_eq!(core.object(&id).unwrap().opacity, 0.25);
    assert_eq!(core.history().len(), before);
}

#[test]
fn update_missing_id_is_noop() {
    let mut core = EngineCore::new();
    let ghost = uuid::Uuid::new_v4();
    assert!(core.update(&ghost, &ObjectPatch { x: Some(1.0), ..Default::default() }).is_empty());
}

#[test]
fn delete_clears_selection_and_commits() {
    let mut core = EngineCore::new();
    let id = add(&mut core, shape_at(5.0, 5.0, 2.0, 2.0));
    let actions = core.delete(&id);

    assert!(core.object(&id).is_none());
    assert!(core.selection().is_none());
    assert!(actions.contains(&Action::ObjectDeleted { id }));
    assert!(actions.contains(&Action::SelectionChanged(None)));
    assert!(has_history_changed(&actions));
}

#[test]
fn delete_keeps_z_dense() {
    let mut core = EngineCore::new();
    add(&mut core, shape_at(1.0, 1.0, 1.0, 1.0));
    let mid = add(&mut core, shape_at(2.0, 2.0, 1.0, 1.0));
    add(&mut core, shape_at(3.0, 3.0, 1.0, 1.0));
    core.delete(&mid);
    assert_eq!(z_indexes(&core), vec![0, 1]);
}

#[test]
fn delete_missing_id_does_not_commit() {
    let mut core = EngineCore::new();
    let before = core.history().len();
    assert!(core.delete(&uuid::Uuid::new_v4()).is_empty());
    assert_eq!(core.history().len(), before);
}

// =============================================================
// duplicate / reorder / clear / select
// =============================================================

#[test]
fn duplicate_offsets_and_selects_clone() {
    let mut core = EngineCore::new();
    let id = add(&mut core, shape_at(5.0, 5.0, 2.0, 2.0));
    core.add(shape_at(9.0, 9.0, 1.0, 1.0));

    core.duplicate(&id);
    let clone = core.selection().unwrap();
    assert_ne!(clone, id);
    let obj = core.object(&clone).unwrap();
    assert_eq!((obj.x, obj.y, obj.width, obj.height), (6.0, 6.0, 2.0, 2.0));
    assert_eq!(obj.z_index, 2);
}

#[test]
fn duplicate_missing_id_is_noop() {
    let mut core = EngineCore::new();
    assert!(core.duplicate(&uuid::Uuid::new_v4()).is_empty());
}

#[test]
fn reorder_restacks_and_commits() {
    let mut core = EngineCore::new();
    let bottom = add(&mut core, shape_at(1.0, 1.0, 1.0, 1.0));
    let top = add(&mut core, shape_at(2.0, 2.0, 1.0, 1.0));
    let before = core.history().len();

    let actions = core.reorder(&bottom, LayerMove::Top);
    assert!(has_history_changed(&actions));
    assert_eq!(core.history().len(), before + 1);
    assert_eq!(core.object(&bottom).unwrap().z_index, 1);
    assert_eq!(core.object(&top).unwrap().z_index, 0);
}

#[test]
fn reorder_without_effect_does_not_commit() {
    let mut core = EngineCore::new();
    let only = add(&mut core, shape_at(1.0, 1.0, 1.0, 1.0));
    let before = core.history().len();
    core.reorder(&only, LayerMove::Up);
    assert_eq!(core.history().len(), before);
}

#[test]
fn clear_empties_active_side_only() {
    let mut core = EngineCore::new();
    add(&mut core, shape_at(1.0, 1.0, 1.0, 1.0));
    core.set_active_side(Side::Back);
    add(&mut core, shape_at(1.0, 1.0, 1.0, 1.0));

    core.clear();
    assert!(core.scene.back.is_empty());
    assert_eq!(core.scene.front.len(), 1);
    assert!(core.selection().is_none());
}

#[test]
fn select_ignores_unknown_id() {
    let mut core = EngineCore::new();
    assert!(core.select(Some(uuid::Uuid::new_v4())).is_empty());
    assert!(core.selection().is_none());
}

#[test]
fn select_and_deselect() {
    let mut core = EngineCore::new();
    let id = add(&mut core, shape_at(1.0, 1.0, 1.0, 1.0));
    core.select(None);
    assert!(core.selection().is_none());
    let actions = core.select(Some(id));
    assert_eq!(actions[0], Action::SelectionChanged(Some(id)));
}

// =============================================================
// Canvas controls
// =============================================================

#[test]
fn set_canvas_size_rescales_and_commits() {
    let mut core = EngineCore::new();
    let id = add(&mut core, shape_at(12.0, 9.0, 6.0, 6.0));

    let actions = core.set_canvas_size(48.0, 36.0);
    assert!(actions.contains(&Action::CanvasResized { width: 48.0, height: 36.0 }));
    let p = pose_of(&core, &id);
    assert_eq!((p.x, p.y, p.width, p.height), (24.0, 18.0, 12.0, 12.0));

    core.undo();
    assert_eq!((core.scene.width, core.scene.height), (24.0, 18.0));
    assert_eq!(core.scene.front.objects()[0].width, 6.0);
}

#[test]
fn set_canvas_size_ignores_non_finite() {
    let mut core = EngineCore::new();
    assert!(core.set_canvas_size(f64::INFINITY, 10.0).is_empty());
    assert_eq!(core.scene.width, 24.0);
}

#[test]
fn set_zoom_clamps() {
    let mut core = EngineCore::new();
    core.set_zoom(10.0);
    assert_eq!(core.camera().zoom(), 3.0);
    core.set_zoom(0.1);
    assert_eq!(core.camera().zoom(), 0.25);
}

#[test]
fn toggles_flip_ui_flags() {
    let mut core = EngineCore::new();
    core.toggle_grid();
    core.toggle_rulers();
    assert!(core.ui.show_grid);
    assert!(core.ui.show_rulers);
    core.toggle_grid();
    assert!(!core.ui.show_grid);
}

// =============================================================
// History
// =============================================================

#[test]
fn undo_restores_and_clears_selection() {
    let mut core = EngineCore::new();
    add(&mut core, shape_at(1.0, 1.0, 1.0, 1.0));
    let actions = core.undo();

    assert!(core.scene.front.is_empty());
    assert!(core.selection().is_none());
    assert!(actions.contains(&Action::HistoryChanged { can_undo: false, can_redo: true }));
}

#[test]
fn undo_at_start_is_noop() {
    let mut core = EngineCore::new();
    assert!(core.undo().is_empty());
}

#[test]
fn redo_reapplies_with_same_id() {
    let mut core = EngineCore::new();
    let id = add(&mut core, shape_at(1.0, 1.0, 1.0, 1.0));
    core.delete(&id);
    core.undo();
    assert!(core.object(&id).is_some());
    core.redo();
    assert!(core.object(&id).is_none());
    core.undo();
    assert!(core.object(&id).is_some());
}

#[test]
fn history_covers_back_side() {
    let mut core = EngineCore::new();
    core.set_active_side(Side::Back);
    add(&mut core, shape_at(1.0, 1.0, 1.0, 1.0));
    core.undo();
    assert!(core.scene.back.is_empty());
    assert_eq!(core.scene.active_side, Side::Back);
}

#[test]
fn new_edit_after_undo_drops_redo() {
    let mut core = EngineCore::new();
    add(&mut core, shape_at(1.0, 1.0, 1.0, 1.0));
    core.undo();
    add(&mut core, shape_at(2.0, 2.0, 1.0, 1.0));
    assert!(!core.can_redo());
}

#[test]
fn commit_history_skips_unchanged_scene() {
    let mut core = EngineCore::new();
    assert!(!core.commit_history());
    let id = add(&mut core, shape_at(1.0, 1.0, 1.0, 1.0));
    core.update(&id, &ObjectPatch { x: Some(3.0), ..Default::default() });
    assert!(core.commit_history());
    assert!(!core.commit_history());
}

// =============================================================
// Sides and templates
// =============================================================

#[test]
fn set_active_side_clears_selection() {
    let mut core = EngineCore::new();
    add(&mut core, shape_at(1.0, 1.0, 1.0, 1.0));
    let actions = core.set_active_side(Side::Back);
    assert!(core.selection().is_none());
    assert!(actions.contains(&Action::SelectionChanged(None)));
    assert!(core.set_active_side(Side::Back).is_empty());
}

#[test]
fn set_active_side_cancels_gesture() {
    let mut core = EngineCore::new();
    let id = add(&mut core, shape_at(4.0, 4.0, 2.0, 2.0));
    down(&mut core, at(4.0, 4.0));
    core.on_pointer_move(at(8.0, 6.0), no_modifiers());

    core.set_active_side(Side::Back);
    assert!(core.input.is_idle());
    let p = core.scene.front.get(&id).unwrap().pose();
    assert_eq!((p.x, p.y), (4.0, 4.0));
}

#[test]
fn apply_template_is_one_history_step() {
    let mut core = EngineCore::new();
    let keep = add(&mut core, shape_at(1.0, 1.0, 1.0, 1.0));
    let before = core.history().len();

    core.apply_template(vec![shape_at(5.0, 5.0, 2.0, 2.0), shape_at(6.0, 6.0, 2.0, 2.0)], 30.0, 20.0);
    assert_eq!(core.history().len(), before + 1);
    assert_eq!((core.scene.width, core.scene.height), (30.0, 20.0));
    assert_eq!(z_indexes(&core), vec![0, 1]);
    assert!(core.selection().is_none());

    core.undo();
    assert!(core.object(&keep).is_some());
    assert_eq!(core.scene.width, 24.0);
}

#[test]
fn design_data_reports_both_sides() {
    let mut core = EngineCore::new();
    add(&mut core, shape_at(1.0, 1.0, 1.0, 1.0));
    core.set_active_side(Side::Back);
    add(&mut core, shape_at(1.0, 1.0, 1.0, 1.0));
    add(&mut core, shape_at(2.0, 2.0, 1.0, 1.0));

    let design = core.design_data();
    assert_eq!(design.front.len(), 1);
    assert_eq!(design.back.len(), 2);
    assert_eq!((design.width, design.height), (24.0, 18.0));
}

// =============================================================
// Pointer: selection
// =============================================================

#[test]
fn pointer_down_on_body_selects_and_drags() {
    let mut core = EngineCore::new();
    let a = add(&mut core, shape_at(4.0, 4.0, 2.0, 2.0));
    add(&mut core, shape_at(15.0, 10.0, 2.0, 2.0));

    let actions = down(&mut core, at(4.0, 4.0));
    assert_eq!(core.selection(), Some(a));
    assert!(matches!(core.input, InputState::Dragging { id, .. } if id == a));
    assert!(actions.contains(&Action::SetCursor("move".into())));
}

#[test]
fn pointer_down_picks_topmost_body() {
    let mut core = EngineCore::new();
    add(&mut core, shape_at(10.0, 10.0, 4.0, 4.0));
    let top = add(&mut core, shape_at(10.0, 10.0, 2.0, 2.0));
    core.select(None);
    down(&mut core, at(10.0, 10.0));
    assert_eq!(core.selection(), Some(top));
}

#[test]
fn pointer_down_on_empty_canvas_deselects() {
    let mut core = EngineCore::new();
    add(&mut core, shape_at(4.0, 4.0, 2.0, 2.0));
    let actions = down(&mut core, at(20.0, 15.0));
    assert!(core.selection().is_none());
    assert!(core.input.is_idle());
    assert!(actions.contains(&Action::SelectionChanged(None)));
}

#[test]
fn secondary_button_is_ignored() {
    let mut core = EngineCore::new();
    add(&mut core, shape_at(4.0, 4.0, 2.0, 2.0));
    core.select(None);
    assert!(core.on_pointer_down(at(4.0, 4.0), Button::Secondary, no_modifiers()).is_empty());
    assert!(core.selection().is_none());
}

#[test]
fn locked_object_selects_without_gesture() {
    let mut core = EngineCore::new();
    let id = add(&mut core, locked_at(10.0, 10.0));
    core.select(None);

    down(&mut core, at(10.0, 10.0));
    assert_eq!(core.selection(), Some(id));
    assert!(core.input.is_idle());

    core.on_pointer_move(at(14.0, 12.0), no_modifiers());
    up(&mut core, at(14.0, 12.0));
    assert_eq!(pose_of(&core, &id).x, 10.0);
}

#[test]
fn hover_reports_cursor() {
    let mut core = EngineCore::new();
    add(&mut core, shape_at(4.0, 4.0, 2.0, 2.0));
    let actions = core.on_pointer_move(at(4.0, 4.0), no_modifiers());
    assert_eq!(actions, vec![Action::SetCursor("move".into())]);
    let actions = core.on_pointer_move(at(20.0, 15.0), no_modifiers());
    assert_eq!(actions, vec![Action::SetCursor("default".into())]);
}

// =============================================================
// Pointer: drag and snap
// =============================================================

#[test]
fn drag_converts_pixels_to_inches() {
    let mut core = EngineCore::new();
    let id = add(&mut core, shape_at(4.0, 4.0, 2.0, 2.0));
    down(&mut core, at(4.0, 4.0));
    core.on_pointer_move(Point::new(100.0 + 75.0, 100.0 + 50.0), no_modifiers());
    let p = pose_of(&core, &id);
    assert_eq!((p.x, p.y), (7.0, 6.0));
}

#[test]
fn drag_honors_zoom() {
    let mut core = EngineCore::new();
    let id = add(&mut core, shape_at(4.0, 4.0, 2.0, 2.0));
    core.set_zoom(2.0);
    // Object center is at (200, 200) on screen at zoom 2.
    down(&mut core, Point::new(200.0, 200.0));
    core.on_pointer_move(Point::new(300.0, 200.0), no_modifiers());
    assert_eq!(pose_of(&core, &id).x, 6.0);
}

#[test]
fn drag_snaps_onto_other_object_center() {
    let mut core = EngineCore::new();
    add(&mut core, shape_at(17.0, 14.0, 2.0, 2.0));
    let id = add(&mut core, shape_at(12.0, 4.0, 2.0, 2.0));

    down(&mut core, at(12.0, 4.0));
    core.on_pointer_move(Point::new(at(12.0, 4.0).x + 125.0, at(12.0, 4.0).y), no_modifiers());

    assert_eq!(pose_of(&core, &id).x, 17.0);
    assert_eq!(core.ui.snap_lines.x, vec![17.0]);
    assert!(core.ui.snap_lines.y.is_empty());
}

#[test]
fn snap_threshold_is_inclusive() {
    let mut core = EngineCore::new();
    add(&mut core, shape_at(17.0, 14.0, 2.0, 2.0));
    let id = add(&mut core, shape_at(12.0, 4.0, 2.0, 2.0));
    let start = at(12.0, 4.0);

    down(&mut core, start);
    // 5.5 inches: candidate 17.5 is exactly 0.5 from the guide at 17.
    core.on_pointer_move(Point::new(start.x + 137.5, start.y), no_modifiers());
    assert_eq!(pose_of(&core, &id).x, 17.0);

    // Just past the threshold: no snap.
    core.on_pointer_move(Point::new(start.x + 137.6, start.y), no_modifiers());
    assert!(approx_eq(pose_of(&core, &id).x, 12.0 + 137.6 / 25.0));
    assert!(core.ui.snap_lines.x.is_empty());
}

#[test]
fn drag_commits_once_on_release() {
    let mut core = EngineCore::new();
    let id = add(&mut core, shape_at(4.0, 4.0, 2.0, 2.0));
    let before = core.history().len();

    down(&mut core, at(4.0, 4.0));
    for i in 1..=10 {
        core.on_pointer_move(Point::new(100.0 + f64::from(i) * 5.0, 100.0), no_modifiers());
    }
    assert_eq!(core.history().len(), before);
    let actions = up(&mut core, Point::new(150.0, 100.0));

    assert!(has_history_changed(&actions));
    assert_eq!(core.history().len(), before + 1);
    assert!(core.ui.snap_lines.is_empty());
    assert!(core.input.is_idle());

    core.undo();
    assert_eq!(pose_of_any(&core, &id).x, 4.0);
}

fn pose_of_any(core: &EngineCore, id: &ObjectId) -> Pose {
    core.scene.front.get(id).unwrap().pose()
}

#[test]
fn click_without_move_does_not_commit() {
    let mut core = EngineCore::new();
    add(&mut core, shape_at(4.0, 4.0, 2.0, 2.0));
    let before = core.history().len();
    down(&mut core, at(4.0, 4.0));
    up(&mut core, at(4.0, 4.0));
    assert_eq!(core.history().len(), before);
}

#[test]
fn pointer_leave_ends_gesture_like_pointer_up() {
    let mut core = EngineCore::new();
    let id = add(&mut core, shape_at(4.0, 4.0, 2.0, 2.0));
    let before = core.history().len();
    down(&mut core, at(4.0, 4.0));
    core.on_pointer_move(at(6.0, 4.0), no_modifiers());

    core.on_pointer_leave();
    assert!(core.input.is_idle());
    assert_eq!(core.history().len(), before + 1);
    assert_eq!(pose_of(&core, &id).x, 6.0);
}

#[test]
fn drag_is_pure_function_of_total_delta() {
    let mut stepped = EngineCore::new();
    let a = add(&mut stepped, shape_at(4.0, 4.0, 2.0, 2.0));
    let mut direct = EngineCore::new();
    let b = add(&mut direct, shape_at(4.0, 4.0, 2.0, 2.0));

    down(&mut stepped, at(4.0, 4.0));
    for p in [Point::new(300.0, 20.0), Point::new(10.0, 400.0), Point::new(180.0, 130.0)] {
        stepped.on_pointer_move(p, no_modifiers());
    }
    down(&mut direct, at(4.0, 4.0));
    direct.on_pointer_move(Point::new(180.0, 130.0), no_modifiers());

    assert_eq!(pose_of(&stepped, &a), pose_of(&direct, &b));
}

#[test]
fn lock_during_drag_stops_gesture() {
    let mut core = EngineCore::new();
    let id = add(&mut core, shape_at(4.0, 4.0, 2.0, 2.0));
    down(&mut core, at(4.0, 4.0));
    core.update(&id, &ObjectPatch { locked: Some(true), ..Default::default() });

    assert!(core.on_pointer_move(at(8.0, 8.0), no_modifiers()).is_empty());
    assert!(core.input.is_idle());
    assert_eq!(pose_of(&core, &id).x, 4.0);
}

#[test]
fn delete_during_drag_ends_gesture() {
    let mut core = EngineCore::new();
    let id = add(&mut core, shape_at(4.0, 4.0, 2.0, 2.0));
    down(&mut core, at(4.0, 4.0));
    core.delete(&id);
    assert!(core.input.is_idle());
    assert!(core.on_pointer_move(at(8.0, 8.0), no_modifiers()).iter().all(|a| matches!(a, Action::SetCursor(_))));
}

// =============================================================
// Pointer: resize
// =============================================================

#[test]
fn east_handle_resizes_width() {
    let mut core = EngineCore::new();
    let id = add(&mut core, shape_at(10.0, 10.0, 4.0, 2.0));

    down(&mut core, at(12.0, 10.0));
    assert!(matches!(core.input, InputState::Resizing { handle: ResizeHandle::E, .. }));
    core.on_pointer_move(at(13.0, 10.0), no_modifiers());

    let p = pose_of(&core, &id);
    assert_eq!((p.x, p.width, p.height), (10.5, 5.0, 2.0));
}

#[test]
fn west_handle_keeps_east_edge() {
    let mut core = EngineCore::new();
    let id = add(&mut core, shape_at(10.0, 10.0, 4.0, 2.0));
    down(&mut core, at(8.0, 10.0));
    core.on_pointer_move(at(7.0, 10.0), no_modifiers());
    let p = pose_of(&core, &id);
    assert_eq!(p.width, 5.0);
    assert_eq!(p.x + p.width / 2.0, 12.0);
}

#[test]
fn resize_clamps_to_half_inch() {
    let mut core = EngineCore::new();
    let id = add(&mut core, shape_at(10.0, 10.0, 4.0, 2.0));
    down(&mut core, at(12.0, 10.0));
    core.on_pointer_move(at(2.0, 10.0), no_modifiers());
    assert_eq!(pose_of(&core, &id).width, 0.5);
}

#[test]
fn shift_corner_resize_keeps_aspect() {
    let mut core = EngineCore::new();
    let id = add(&mut core, shape_at(10.0, 10.0, 4.0, 2.0));
    down(&mut core, at(12.0, 11.0));
    assert!(matches!(core.input, InputState::Resizing { handle: ResizeHandle::Se, .. }));
    core.on_pointer_move(at(14.0, 11.1), Modifiers::shift());
    let p = pose_of(&core, &id);
    assert!(approx_eq(p.width, 6.0));
    assert!(approx_eq(p.height, 3.0));
}

#[test]
fn resize_commits_once() {
    let mut core = EngineCore::new();
    add(&mut core, shape_at(10.0, 10.0, 4.0, 2.0));
    let before = core.history().len();
    down(&mut core, at(12.0, 10.0));
    core.on_pointer_move(at(13.0, 10.0), no_modifiers());
    core.on_pointer_move(at(14.0, 10.0), no_modifiers());
    up(&mut core, at(14.0, 10.0));
    assert_eq!(core.history().len(), before + 1);
}

#[test]
fn handles_only_for_selected_object() {
    let mut core = EngineCore::new();
    let id = add(&mut core, shape_at(10.0, 10.0, 4.0, 2.0));
    core.select(None);
    // East edge is on the body, so without a selection this is a drag.
    down(&mut core, at(12.0, 10.0));
    assert!(matches!(core.input, InputState::Dragging { .. }));
    assert_eq!(core.selection(), Some(id));
}

#[test]
fn body_of_selected_object_drags_rather_than_rotates() {
    let mut core = EngineCore::new();
    let id = add(&mut core, shape_at(10.0, 10.0, 4.0, 2.0));
    let actions = down(&mut core, at(10.0, 10.0));
    assert!(matches!(core.input, InputState::Dragging { id: target, .. } if target == id));
    assert!(actions.contains(&Action::SetCursor("move".into())));
    assert!(!actions.contains(&Action::SetCursor("grabbing".into())));
}

// =============================================================
// Pointer: rotate
// =============================================================

#[test]
fn rotate_handle_sets_angle() {
    let mut core = EngineCore::new();
    let id = add(&mut core, shape_at(10.0, 10.0, 4.0, 2.0));
    // Rotate handle sits 30px above the top edge.
    down(&mut core, Point::new(250.0, 195.0));
    assert!(matches!(core.input, InputState::Rotating { .. }));

    core.on_pointer_move(Point::new(350.0, 250.0), no_modifiers());
    assert!(approx_eq(pose_of(&core, &id).rotation, 90.0));
}

#[test]
fn shift_rotation_snaps_to_fifteen() {
    let mut core = EngineCore::new();
    let id = add(&mut core, shape_at(10.0, 10.0, 4.0, 2.0));
    down(&mut core, Point::new(250.0, 195.0));

    let a = 20f64.to_radians();
    let pointer = Point::new(250.0 + a.sin() * 100.0, 250.0 - a.cos() * 100.0);
    core.on_pointer_move(pointer, Modifiers::shift());
    assert_eq!(pose_of(&core, &id).rotation, 15.0);
}

#[test]
fn rotation_keeps_size_and_center() {
    let mut core = EngineCore::new();
    let id = add(&mut core, shape_at(10.0, 10.0, 4.0, 2.0));
    down(&mut core, Point::new(250.0, 195.0));
    core.on_pointer_move(Point::new(150.0, 250.0), no_modifiers());
    let p = pose_of(&core, &id);
    assert_eq!((p.x, p.y, p.width, p.height), (10.0, 10.0, 4.0, 2.0));
}

// =============================================================
// Pointer: canvas grip
// =============================================================

#[test]
fn canvas_grip_resizes_in_half_inch_steps() {
    let mut core = EngineCore::new();
    let id = add(&mut core, shape_at(12.0, 9.0, 6.0, 6.0));
    core.select(None);

    down(&mut core, at(24.0, 18.0));
    assert!(matches!(core.input, InputState::ResizingCanvas { .. }));
    let actions = core.on_pointer_move(Point::new(600.0 + 12.5, 450.0 + 3.0), no_modifiers());
    assert!(actions.contains(&Action::CanvasResized { width: 24.5, height: 18.0 }));
    assert_eq!(core.scene.width, 24.5);
    assert!(approx_eq(pose_of(&core, &id).x, 12.0 * 24.5 / 24.0));

    let before = core.history().len();
    up(&mut core, Point::new(612.5, 453.0));
    assert_eq!(core.history().len(), before + 1);
    core.undo();
    assert_eq!(core.scene.width, 24.0);
}

#[test]
fn canvas_grip_result_ignores_intermediate_moves() {
    let start = || {
        let mut core = EngineCore::new();
        let id = add(&mut core, shape_at(3.3, 7.1, 2.2, 1.7));
        core.select(None);
        down(&mut core, at(24.0, 18.0));
        (core, id)
    };
    let end = Point::new(600.0 + 163.0, 450.0 - 71.0);

    let (mut stepped, a) = start();
    for i in 1..=40 {
        let i = f64::from(i);
        stepped.on_pointer_move(Point::new(600.0 + i * 7.0, 450.0 - i * 3.0), no_modifiers());
    }
    stepped.on_pointer_move(end, no_modifiers());

    let (mut direct, b) = start();
    direct.on_pointer_move(end, no_modifiers());

    assert_eq!((stepped.scene.width, stepped.scene.height), (direct.scene.width, direct.scene.height));
    assert_eq!(pose_of(&stepped, &a), pose_of(&direct, &b));
}

#[test]
fn edit_during_canvas_grip_ends_the_gesture() {
    let mut core = EngineCore::new();
    let id = add(&mut core, shape_at(12.0, 9.0, 6.0, 6.0));
    core.select(None);
    down(&mut core, at(24.0, 18.0));
    core.on_pointer_move(at(30.0, 20.0), no_modifiers());
    core.delete(&id);

    assert!(core.input.is_idle());
    core.on_pointer_move(at(26.0, 19.0), no_modifiers());
    assert!(core.object(&id).is_none());
    assert_eq!(core.scene.width, 30.0);
}

#[test]
fn canvas_grip_floors_at_two_inches() {
    let mut core = EngineCore::new();
    down(&mut core, at(24.0, 18.0));
    core.on_pointer_move(Point::new(0.0, 0.0), no_modifiers());
    assert_eq!((core.scene.width, core.scene.height), (2.0, 2.0));
}

// =============================================================
// Keyboard
// =============================================================

#[test]
fn arrow_nudges_and_commits() {
    let mut core = EngineCore::new();
    let id = add(&mut core, shape_at(10.0, 10.0, 2.0, 2.0));
    let before = core.history().len();

    key(&mut core, "ArrowRight", no_modifiers());
    assert!(approx_eq(pose_of(&core, &id).x, 10.1));
    key(&mut core, "ArrowUp", Modifiers::shift());
    assert!(approx_eq(pose_of(&core, &id).y, 9.0));
    assert_eq!(core.history().len(), before + 2);
}

#[test]
fn nudge_ignores_locked_object() {
    let mut core = EngineCore::new();
    let id = add(&mut core, locked_at(10.0, 10.0));
    assert!(key(&mut core, "ArrowLeft", no_modifiers()).is_empty());
    assert_eq!(pose_of(&core, &id).x, 10.0);
}

#[test]
fn delete_and_backspace_remove_selection() {
    let mut core = EngineCore::new();
    let a = add(&mut core, shape_at(1.0, 1.0, 1.0, 1.0));
    key(&mut core, "Delete", no_modifiers());
    assert!(core.object(&a).is_none());

    let b = add(&mut core, shape_at(5.0, 5.0, 1.0, 1.0));
    key(&mut core, "Backspace", no_modifiers());
    assert!(core.object(&b).is_none());
}

#[test]
fn delete_keys_ignore_locked_selection() {
    let mut core = EngineCore::new();
    let id = add(&mut core, locked_at(5.0, 5.0));
    let before = core.history().len();

    assert!(key(&mut core, "Delete", no_modifiers()).is_empty());
    assert!(key(&mut core, "Backspace", no_modifiers()).is_empty());
    assert!(core.object(&id).is_some());
    assert_eq!(core.history().len(), before);

    // The explicit operation still removes it.
    core.delete(&id);
    assert!(core.object(&id).is_none());
}

#[test]
fn keys_without_selection_are_noops() {
    let mut core = EngineCore::new();
    add(&mut core, shape_at(1.0, 1.0, 1.0, 1.0));
    core.select(None);
    assert!(key(&mut core, "Delete", no_modifiers()).is_empty());
    assert!(key(&mut core, "ArrowUp", no_modifiers()).is_empty());
    assert_eq!(core.scene.front.len(), 1);
}

#[test]
fn escape_deselects_when_idle() {
    let mut core = EngineCore::new();
    add(&mut core, shape_at(1.0, 1.0, 1.0, 1.0));
    let actions = key(&mut core, "Escape", no_modifiers());
    assert!(core.selection().is_none());
    assert!(actions.contains(&Action::SelectionChanged(None)));
}

#[test]
fn escape_cancels_drag_to_start_pose() {
    let mut core = EngineCore::new();
    let id = add(&mut core, shape_at(4.0, 4.0, 2.0, 2.0));
    let before = core.history().len();

    down(&mut core, at(4.0, 4.0));
    core.on_pointer_move(at(9.0, 7.0), no_modifiers());
    key(&mut core, "Escape", no_modifiers());

    assert!(core.input.is_idle());
    assert_eq!(pose_of(&core, &id), Pose { x: 4.0, y: 4.0, width: 2.0, height: 2.0, rotation: 0.0 });
    assert_eq!(core.selection(), Some(id));

    up(&mut core, at(9.0, 7.0));
    assert_eq!(core.history().len(), before);
}

#[test]
fn escape_cancels_canvas_grip() {
    let mut core = EngineCore::new();
    let id = add(&mut core, shape_at(12.0, 9.0, 6.0, 6.0));
    core.select(None);
    down(&mut core, at(24.0, 18.0));
    core.on_pointer_move(at(30.0, 20.0), no_modifiers());
    key(&mut core, "Escape", no_modifiers());

    assert_eq!((core.scene.width, core.scene.height), (24.0, 18.0));
    assert!(approx_eq(pose_of(&core, &id).width, 6.0));
}

#[test]
fn delete_key_ignored_during_gesture() {
    let mut core = EngineCore::new();
    let id = add(&mut core, shape_at(4.0, 4.0, 2.0, 2.0));
    down(&mut core, at(4.0, 4.0));
    assert!(key(&mut core, "Delete", no_modifiers()).is_empty());
    assert!(core.object(&id).is_some());
}

#[test]
fn overlay_reflects_engine_state() {
    let mut core = EngineCore::new();
    add(&mut core, shape_at(4.0, 4.0, 2.0, 2.0));
    core.toggle_grid();
    let overlay = core.overlay();
    assert_eq!(overlay.canvas_width_px, 600.0);
    assert_eq!(overlay.grid_cell_px, Some(25.0));
    assert!(overlay.selection.is_some());
}
