//! Unit conversion between physical canvas inches and screen pixels.
//!
//! Everything here is a pure function of its inputs. Screen space is CSS
//! pixels with the origin at the top-left of the host viewport; canvas space is
//! inches with the origin at the top-left of the design surface.

#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;

use serde::{Deserialize, Serialize};

use crate::consts::{PIXELS_PER_INCH, ZOOM_MAX, ZOOM_MIN};

/// A point in either screen or canvas space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Convert a length in inches to screen pixels at `zoom`.
#[must_use]
pub fn to_pixels(inches: f64, zoom: f64) -> f64 {
    inches * PIXELS_PER_INCH * zoom
}

/// Convert a length in screen pixels to inches at `zoom`.
#[must_use]
pub fn to_inches(pixels: f64, zoom: f64) -> f64 {
    pixels / (PIXELS_PER_INCH * zoom)
}

/// Rotate `point` about `pivot` by `degrees` (clockwise on a y-down screen).
#[must_use]
pub fn rotate_about(point: Point, pivot: Point, degrees: f64) -> Point {
    let (sin, cos) = degrees.to_radians().sin_cos();
    let dx = point.x - pivot.x;
    let dy = point.y - pivot.y;
    Point { x: pivot.x + dx * cos - dy * sin, y: pivot.y + dx * sin + dy * cos }
}

/// View state mapping the physical canvas onto the screen.
///
/// `origin` is the screen position (CSS pixels) of the canvas's top-left
/// corner. `zoom` is a scale factor clamped to `[ZOOM_MIN, ZOOM_MAX]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub origin: Point,
    zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self { origin: Point::default(), zoom: 1.0 }
    }
}

impl Camera {
    /// Current zoom factor.
    #[must_use]
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Set the zoom factor, clamped to the supported range. Non-finite input is ignored.
    pub fn set_zoom(&mut self, zoom: f64) {
        if zoom.is_finite() {
            self.zoom = zoom.clamp(ZOOM_MIN, ZOOM_MAX);
        }
    }

    /// Convert a screen-space point (CSS pixels) to canvas inches.
    #[must_use]
    pub fn screen_to_canvas(&self, screen: Point) -> Point {
        Point {
            x: to_inches(screen.x - self.origin.x, self.zoom),
            y: to_inches(screen.y - self.origin.y, self.zoom),
        }
    }

    /// Convert a canvas point (inches) to screen coordinates (CSS pixels).
    #[must_use]
    pub fn canvas_to_screen(&self, canvas: Point) -> Point {
        Point {
            x: to_pixels(canvas.x, self.zoom) + self.origin.x,
            y: to_pixels(canvas.y, self.zoom) + self.origin.y,
        }
    }

    /// Convert a screen-space distance (pixels) to inches.
    #[must_use]
    pub fn screen_dist_to_canvas(&self, screen_dist: f64) -> f64 {
        to_inches(screen_dist, self.zoom)
    }
}
