//! Shared numeric constants for the sign builder.

// ── Units ───────────────────────────────────────────────────────

/// Screen pixels per physical inch at zoom 1.0. Used by every pixel/inch
/// conversion, ruler tick, grid cell and snap line.
pub const PIXELS_PER_INCH: f64 = 25.0;

/// Lowest allowed zoom factor.
pub const ZOOM_MIN: f64 = 0.25;

/// Highest allowed zoom factor.
pub const ZOOM_MAX: f64 = 3.0;

// ── Objects ─────────────────────────────────────────────────────

/// Smallest width or height an object may have after a resize, in inches.
pub const MIN_OBJECT_SIZE: f64 = 0.5;

/// Offset applied to both axes of a duplicated object, in inches.
pub const DUPLICATE_OFFSET: f64 = 1.0;

/// Arrow-key nudge distance, in inches.
pub const NUDGE_STEP: f64 = 0.1;

/// Arrow-key nudge distance with shift held, in inches.
pub const NUDGE_STEP_COARSE: f64 = 1.0;

// ── Snapping ────────────────────────────────────────────────────

/// Distance (inclusive) within which a moving center locks onto a guide, in inches.
pub const SNAP_THRESHOLD: f64 = 0.5;

/// Rotation increment used while the angle-snap modifier is held, in degrees.
pub const ROTATION_SNAP_DEG: f64 = 15.0;

// ── History ─────────────────────────────────────────────────────

/// Maximum number of retained history snapshots.
pub const HISTORY_LIMIT: usize = 50;

// ── Canvas ──────────────────────────────────────────────────────

/// Default canvas width in inches.
pub const DEFAULT_CANVAS_WIDTH: f64 = 24.0;

/// Default canvas height in inches.
pub const DEFAULT_CANVAS_HEIGHT: f64 = 18.0;

/// Floor applied to the previous canvas dimension when computing rescale factors.
pub const RESCALE_FLOOR: f64 = 0.01;

/// Smallest canvas dimension reachable with the frame grip, in inches.
pub const CANVAS_GRIP_MIN: f64 = 2.0;

/// Canvas grip resizes in steps of this many inches.
pub const CANVAS_GRIP_STEP: f64 = 0.5;

/// Last labelled inch on a ruler; longer canvases get a truncated ruler.
pub const MAX_RULER_INCH: u32 = 1000;

// ── Hit-testing ─────────────────────────────────────────────────

/// Screen-space hit slop in pixels for handles and the canvas grip.
pub const HANDLE_RADIUS_PX: f64 = 8.0;

/// Distance from the top edge of the box to the rotate handle, in screen pixels.
pub const ROTATE_HANDLE_OFFSET_PX: f64 = 30.0;
