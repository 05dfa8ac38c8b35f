//! Overlay view model: pixel geometry for rulers, grid, snap lines and the
//! selection frame. Positions are in pixels relative to the canvas's top-left
//! corner, so the host can lay them out without knowing the camera origin.

#[cfg(test)]
#[path = "overlay_test.rs"]
mod overlay_test;

use serde::Serialize;

use crate::consts::MAX_RULER_INCH;
use crate::doc::{ObjectId, Scene};
use crate::geometry::{Camera, Point, to_pixels};
use crate::hit::{resize_handle_positions, rotate_handle_position};
use crate::input::UiState;

/// One labelled inch mark on a ruler.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RulerTick {
    pub inch: u32,
    pub offset_px: f64,
}

/// The selected object's frame in canvas pixels.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectionFrame {
    pub id: ObjectId,
    pub center: Point,
    pub width_px: f64,
    pub height_px: f64,
    pub rotation: f64,
    pub locked: bool,
    /// Resize handles in `ResizeHandle::ALL` order; empty when locked.
    pub handles: Vec<Point>,
    pub rotate_handle: Option<Point>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overlay {
    pub canvas_width_px: f64,
    pub canvas_height_px: f64,
    /// Empty unless rulers are shown.
    pub ruler_x: Vec<RulerTick>,
    pub ruler_y: Vec<RulerTick>,
    /// Side of one one-inch grid cell; `None` unless the grid is shown.
    pub grid_cell_px: Option<f64>,
    pub snap_lines_x_px: Vec<f64>,
    pub snap_lines_y_px: Vec<f64>,
    pub selection: Option<SelectionFrame>,
}

impl Overlay {
    #[must_use]
    pub fn build(scene: &Scene, camera: &Camera, ui: &UiState) -> Self {
        let zoom = camera.zoom();
        let px = |inches: f64| to_pixels(inches, zoom);
        let to_px_point = |p: Point| Point::new(px(p.x), px(p.y));

        let (ruler_x, ruler_y) = if ui.show_rulers {
            (ruler_ticks(scene.width, zoom), ruler_ticks(scene.height, zoom))
        } else {
            (Vec::new(), Vec::new())
        };

        let selection = ui.selected_id.and_then(|id| scene.active().get(&id)).map(|obj| {
            let pose = obj.pose();
            let (handles, rotate_handle) = if obj.locked {
                (Vec::new(), None)
            } else {
                (
                    resize_handle_positions(&pose).into_iter().map(to_px_point).collect(),
                    Some(to_px_point(rotate_handle_position(&pose, zoom))),
                )
            };
            SelectionFrame {
                id: obj.id,
                center: to_px_point(Point::new(pose.x, pose.y)),
                width_px: px(pose.width),
                height_px: px(pose.height),
                rotation: pose.rotation,
                locked: obj.locked,
                handles,
                rotate_handle,
            }
        });

        Self {
            canvas_width_px: px(scene.width),
            canvas_height_px: px(scene.height),
            ruler_x,
            ruler_y,
            grid_cell_px: ui.show_grid.then(|| px(1.0)),
            snap_lines_x_px: ui.snap_lines.x.iter().map(|&x| px(x)).collect(),
            snap_lines_y_px: ui.snap_lines.y.iter().map(|&y| px(y)).collect(),
            selection,
        }
    }
}

/// `ceil(dim) + 1` ticks, one per inch starting at zero, capped at
/// [`MAX_RULER_INCH`]. A non-finite `dim` yields no ticks.
#[must_use]
pub fn ruler_ticks(dim: f64, zoom: f64) -> Vec<RulerTick> {
    let last = dim.ceil();
    (0..=MAX_RULER_INCH)
        .take_while(|&inch| f64::from(inch) <= last)
        .map(|inch| RulerTick { inch, offset_px: to_pixels(f64::from(inch), zoom) })
        .collect()
}
