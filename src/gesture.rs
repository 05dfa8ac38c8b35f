//! Pure pose math for drag, resize, rotate and canvas-grip gestures.
//!
//! Every function takes the gesture-start state plus the *total* pointer
//! delta, so replaying the final pointer position always yields the same
//! result regardless of how many intermediate moves were delivered.

#[cfg(test)]
#[path = "gesture_test.rs"]
mod gesture_test;

use crate::consts::{CANVAS_GRIP_MIN, CANVAS_GRIP_STEP, ROTATION_SNAP_DEG};
use crate::doc::Pose;
use crate::geometry::{Point, rotate_about};
use crate::hit::ResizeHandle;

const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

/// Unsnapped center for a drag by `delta` inches.
#[must_use]
pub fn drag_candidate(orig: &Pose, delta: Point) -> Point {
    Point::new(orig.x + delta.x, orig.y + delta.y)
}

/// Pose after dragging `handle` by `delta` inches (screen axes).
///
/// The delta is projected onto the object's own axes so a rotated object
/// resizes along its edges. The edge opposite the handle stays fixed. With
/// `aspect_lock` on a corner handle, the dominant axis drives the other via
/// the start aspect ratio, and both sides grow together if the clamp bites.
#[must_use]
pub fn resize_pose(orig: &Pose, handle: ResizeHandle, delta: Point, aspect_lock: bool, min_size: f64) -> Pose {
    let local = rotate_about(delta, ORIGIN, -orig.rotation);
    let sx = handle.x_sign();
    let sy = handle.y_sign();

    let mut width = if handle.moves_x() { (orig.width + sx * local.x).max(min_size) } else { orig.width };
    let mut height = if handle.moves_y() { (orig.height + sy * local.y).max(min_size) } else { orig.height };

    if aspect_lock && handle.is_corner() && orig.height > 0.0 {
        let ratio = orig.width / orig.height;
        if local.x.abs() > local.y.abs() {
            height = width / ratio;
        } else {
            width = height * ratio;
        }
        let grow = (min_size / width).max(min_size / height).max(1.0);
        width *= grow;
        height *= grow;
    }

    let shift_local = Point::new(sx * (width - orig.width) / 2.0, sy * (height - orig.height) / 2.0);
    let shift = rotate_about(shift_local, ORIGIN, orig.rotation);

    Pose { x: orig.x + shift.x, y: orig.y + shift.y, width, height, rotation: orig.rotation }
}

/// Rotation in degrees that points the object's top at `pointer`, both in
/// screen pixels. "Up" is 0°. With `snap`, rounds to the nearest 15°.
#[must_use]
pub fn rotation_angle(center: Point, pointer: Point, snap: bool) -> f64 {
    let angle = (pointer.y - center.y).atan2(pointer.x - center.x).to_degrees() + 90.0;
    if snap { (angle / ROTATION_SNAP_DEG).round() * ROTATION_SNAP_DEG } else { angle }
}

/// Canvas size after dragging the frame grip by `delta` inches: half-inch
/// steps with a two-inch floor.
#[must_use]
pub fn canvas_grip_size(orig_width: f64, orig_height: f64, delta: Point) -> (f64, f64) {
    let step = |v: f64| ((v / CANVAS_GRIP_STEP).round() * CANVAS_GRIP_STEP).max(CANVAS_GRIP_MIN);
    (step(orig_width + delta.x), step(orig_height + delta.y))
}
