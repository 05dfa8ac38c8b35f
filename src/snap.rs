//! Alignment snapping for dragged objects.
//!
//! Guides per axis are the canvas edges and center, followed by the centers
//! of every other object on the same side in store order. Each axis snaps
//! independently to the first guide within the threshold (inclusive).

#[cfg(test)]
#[path = "snap_test.rs"]
mod snap_test;

use serde::{Deserialize, Serialize};

use crate::doc::{ObjectId, ObjectStore};
use crate::geometry::Point;

/// Active guide values, in inches, for on-screen feedback.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SnapLines {
    /// Vertical guides (x positions).
    pub x: Vec<f64>,
    /// Horizontal guides (y positions).
    pub y: Vec<f64>,
}

impl SnapLines {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.x.is_empty() && self.y.is_empty()
    }

    pub fn clear(&mut self) {
        self.x.clear();
        self.y.clear();
    }
}

/// A snapped candidate position and the guides that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapped {
    pub position: Point,
    pub lines: SnapLines,
}

/// Candidate guides for the object `moving` on a `width` x `height` canvas.
#[must_use]
pub fn guides(store: &ObjectStore, moving: &ObjectId, width: f64, height: f64) -> (Vec<f64>, Vec<f64>) {
    let mut xs = vec![0.0, width / 2.0, width];
    let mut ys = vec![0.0, height / 2.0, height];
    for obj in store.objects().iter().filter(|o| o.id != *moving) {
        xs.push(obj.x);
        ys.push(obj.y);
    }
    (xs, ys)
}

/// First guide within `threshold` of `candidate`, if any.
#[must_use]
pub fn snap_axis(candidate: f64, guides: &[f64], threshold: f64) -> Option<f64> {
    guides.iter().copied().find(|g| (candidate - g).abs() <= threshold)
}

/// Snap a candidate center for `moving` against canvas and sibling guides.
#[must_use]
pub fn snap_position(
    store: &ObjectStore,
    moving: &ObjectId,
    candidate: Point,
    width: f64,
    height: f64,
    threshold: f64,
) -> Snapped {
    let (xs, ys) = guides(store, moving, width, height);
    let mut lines = SnapLines::default();
    let mut position = candidate;

    if let Some(gx) = snap_axis(candidate.x, &xs, threshold) {
        position.x = gx;
        lines.x.push(gx);
    }
    if let Some(gy) = snap_axis(candidate.y, &ys, threshold) {
        position.y = gy;
        lines.y.push(gy);
    }

    Snapped { position, lines }
}
