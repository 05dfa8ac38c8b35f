//! Hit-testing: resize/rotate handle placement and pointer-to-object lookup.
//!
//! Handle positions are computed in canvas inches on the object's rotated
//! bounding box; hit comparisons happen in screen pixels so the slop stays
//! constant across zoom levels.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use serde::{Deserialize, Serialize};

use crate::consts::{HANDLE_RADIUS_PX, ROTATE_HANDLE_OFFSET_PX};
use crate::doc::{ObjectId, ObjectStore, Pose};
use crate::geometry::{Camera, Point, rotate_about, to_inches};

/// Which part of an object was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitPart {
    Body,
    ResizeHandle(ResizeHandle),
    RotateHandle,
}

/// Resize handle position on the bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeHandle {
    N,
    Ne,
    E,
    Se,
    S,
    Sw,
    W,
    Nw,
}

impl ResizeHandle {
    /// All handles, edges and corners interleaved clockwise from north.
    pub const ALL: [Self; 8] = [Self::N, Self::Ne, Self::E, Self::Se, Self::S, Self::Sw, Self::W, Self::Nw];

    /// -1 when the handle moves the west edge, 1 for east, 0 otherwise.
    #[must_use]
    pub fn x_sign(self) -> f64 {
        match self {
            Self::E | Self::Ne | Self::Se => 1.0,
            Self::W | Self::Nw | Self::Sw => -1.0,
            Self::N | Self::S => 0.0,
        }
    }

    /// -1 when the handle moves the north edge, 1 for south, 0 otherwise.
    #[must_use]
    pub fn y_sign(self) -> f64 {
        match self {
            Self::S | Self::Se | Self::Sw => 1.0,
            Self::N | Self::Ne | Self::Nw => -1.0,
            Self::E | Self::W => 0.0,
        }
    }

    /// Whether the handle changes the width.
    #[must_use]
    pub fn moves_x(self) -> bool {
        !matches!(self, Self::N | Self::S)
    }

    /// Whether the handle changes the height.
    #[must_use]
    pub fn moves_y(self) -> bool {
        !matches!(self, Self::E | Self::W)
    }

    #[must_use]
    pub fn is_corner(self) -> bool {
        matches!(self, Self::Ne | Self::Se | Self::Sw | Self::Nw)
    }
}

/// Result of a hit test against an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub object_id: ObjectId,
    pub part: HitPart,
}

/// Canvas-space positions of the eight resize handles, in [`ResizeHandle::ALL`] order.
#[must_use]
pub fn resize_handle_positions(pose: &Pose) -> [Point; 8] {
    let center = Point::new(pose.x, pose.y);
    let hw = pose.width / 2.0;
    let hh = pose.height / 2.0;
    ResizeHandle::ALL.map(|h| {
        let unrotated = Point::new(pose.x + h.x_sign() * hw, pose.y + h.y_sign() * hh);
        rotate_about(unrotated, center, pose.rotation)
    })
}

/// Canvas-space position of the rotate handle: a fixed screen distance above
/// the top edge, rotated with the object.
#[must_use]
pub fn rotate_handle_position(pose: &Pose, zoom: f64) -> Point {
    let center = Point::new(pose.x, pose.y);
    let offset = to_inches(ROTATE_HANDLE_OFFSET_PX, zoom);
    let unrotated = Point::new(pose.x, pose.y - pose.height / 2.0 - offset);
    rotate_about(unrotated, center, pose.rotation)
}

fn within_slop(screen: Point, target: Point) -> bool {
    (screen.x - target.x).abs() <= HANDLE_RADIUS_PX && (screen.y - target.y).abs() <= HANDLE_RADIUS_PX
}

/// Test the rotate handle, then the resize handles, of one object.
#[must_use]
pub fn handle_at(screen: Point, pose: &Pose, camera: &Camera) -> Option<HitPart> {
    let rotate = camera.canvas_to_screen(rotate_handle_position(pose, camera.zoom()));
    if within_slop(screen, rotate) {
        return Some(HitPart::RotateHandle);
    }
    ResizeHandle::ALL
        .into_iter()
        .zip(resize_handle_positions(pose))
        .find(|(_, pos)| within_slop(screen, camera.canvas_to_screen(*pos)))
        .map(|(handle, _)| HitPart::ResizeHandle(handle))
}

/// Whether a canvas-space point lies inside the object's rotated box.
#[must_use]
pub fn contains(pose: &Pose, canvas_pt: Point) -> bool {
    let local = rotate_about(canvas_pt, Point::new(pose.x, pose.y), -pose.rotation);
    (local.x - pose.x).abs() <= pose.width / 2.0 && (local.y - pose.y).abs() <= pose.height / 2.0
}

/// The top-most object whose body contains the screen point.
#[must_use]
pub fn body_at(screen: Point, store: &ObjectStore, camera: &Camera) -> Option<ObjectId> {
    let canvas_pt = camera.screen_to_canvas(screen);
    store
        .objects()
        .iter()
        .filter(|o| contains(&o.pose(), canvas_pt))
        .max_by_key(|o| o.z_index)
        .map(|o| o.id)
}

/// Test `selected` handles first (unless locked), then object bodies.
#[must_use]
pub fn hit_test(screen: Point, store: &ObjectStore, camera: &Camera, selected: Option<ObjectId>) -> Option<Hit> {
    if let Some(obj) = selected.and_then(|id| store.get(&id)).filter(|o| !o.locked) {
        if let Some(part) = handle_at(screen, &obj.pose(), camera) {
            return Some(Hit { object_id: obj.id, part });
        }
    }
    body_at(screen, store, camera).map(|object_id| Hit { object_id, part: HitPart::Body })
}

/// Whether the screen point is on the canvas-frame resize grip at the
/// bottom-right corner of a `width` x `height` canvas.
#[must_use]
pub fn canvas_grip_at(screen: Point, camera: &Camera, width: f64, height: f64) -> bool {
    within_slop(screen, camera.canvas_to_screen(Point::new(width, height)))
}
