//! Proportional rescaling of both sides when the physical canvas changes size.

#[cfg(test)]
#[path = "rescale_test.rs"]
mod rescale_test;

use crate::consts::RESCALE_FLOOR;
use crate::doc::{ObjectStore, Scene};

/// Per-axis scale factors from the previous to the new canvas size.
///
/// Both previous dimensions are floored so a degenerate canvas never divides by zero.
#[must_use]
pub fn scale_factors(prev_width: f64, prev_height: f64, new_width: f64, new_height: f64) -> (f64, f64) {
    (new_width / prev_width.max(RESCALE_FLOOR), new_height / prev_height.max(RESCALE_FLOOR))
}

/// Scale positions and sizes per axis, and size-like payload fields by the mean factor.
pub fn rescale_store(store: &mut ObjectStore, scale_x: f64, scale_y: f64) {
    let mean = (scale_x + scale_y) / 2.0;
    for obj in store.objects_mut() {
        obj.x *= scale_x;
        obj.y *= scale_y;
        obj.width *= scale_x;
        obj.height *= scale_y;
        obj.kind.scale_sizes(mean);
    }
}

/// Resize the canvas and rescale both sides to keep the relative layout.
///
/// The new dimensions are floored like the previous ones. Returns the applied
/// scale factors, or `None` when either dimension is not finite.
pub fn rescale_scene(scene: &mut Scene, new_width: f64, new_height: f64) -> Option<(f64, f64)> {
    if !new_width.is_finite() || !new_height.is_finite() {
        return None;
    }
    let new_width = new_width.max(RESCALE_FLOOR);
    let new_height = new_height.max(RESCALE_FLOOR);
    let (sx, sy) = scale_factors(scene.width, scene.height, new_width, new_height);

    rescale_store(&mut scene.front, sx, sy);
    rescale_store(&mut scene.back, sx, sy);
    scene.width = new_width;
    scene.height = new_height;

    tracing::info!(width = new_width, height = new_height, scale_x = sx, scale_y = sy, "canvas resized");
    Some((sx, sy))
}
