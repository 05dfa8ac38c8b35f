//! Factories for the objects the sidebar inserts, centered on the canvas.

#[cfg(test)]
#[path = "presets_test.rs"]
mod presets_test;

use crate::doc::{IconProps, ImageProps, NewObject, ObjectKind, QrCodeProps, ShapeStyle, ShapeVariant, TableProps, TextStyle};
use crate::geometry::Point;

const ICON_BASE_URL: &str = "https://api.iconify.design";

fn placed(center: Point, width: f64, height: f64, kind: ObjectKind) -> NewObject {
    NewObject { x: center.x, y: center.y, width, height, rotation: 0.0, opacity: 1.0, locked: false, kind }
}

/// A 12x3 text box. Pass `TextStyle::default()` for the plain "Your Text" preset.
#[must_use]
pub fn text(center: Point, style: TextStyle) -> NewObject {
    placed(center, 12.0, 3.0, ObjectKind::Text(style))
}

/// A shape with the per-variant size, fill and stroke the sidebar uses.
/// `polygon_sides` only matters for [`ShapeVariant::Polygon`].
#[must_use]
pub fn shape(center: Point, variant: ShapeVariant, polygon_sides: u32) -> NewObject {
    let style = |fill: &str, stroke: &str, stroke_width: f64| ShapeStyle {
        shape: variant,
        fill: fill.into(),
        stroke: stroke.into(),
        stroke_width,
        sides: None,
        corner_radius: None,
    };
    let (width, height, style) = match variant {
        ShapeVariant::Line => (8.0, 0.5, style("#000000", "#000000", 3.0)),
        ShapeVariant::Arrow => (8.0, 2.0, style("#000000", "#000000", 3.0)),
        ShapeVariant::Prohibition => (6.0, 6.0, style("transparent", "#dc2626", 4.0)),
        ShapeVariant::WarningTriangle => (6.0, 6.0, style("#facc15", "#000000", 2.0)),
        ShapeVariant::RoundedRectangle => {
            (8.0, 6.0, ShapeStyle { corner_radius: Some(12.0), ..style("#2563eb", "#000000", 0.0) })
        }
        ShapeVariant::Polygon => {
            (6.0, 6.0, ShapeStyle { sides: Some(polygon_sides.max(3)), ..style("#dc2626", "#000000", 0.0) })
        }
        ShapeVariant::Rectangle => (6.0, 6.0, style("#facc15", "#000000", 2.0)),
        ShapeVariant::Circle => (6.0, 6.0, style("#dc2626", "#000000", 0.0)),
        ShapeVariant::Triangle | ShapeVariant::Star => (6.0, 6.0, style("#2563eb", "#000000", 0.0)),
    };
    placed(center, width, height, ObjectKind::Shape(style))
}

/// A 4x4 icon tinted with `color`, sourced from the icon CDN by name.
#[must_use]
pub fn icon(center: Point, icon_name: &str, color: &str) -> NewObject {
    let src = format!("{ICON_BASE_URL}/{icon_name}.svg?color={}", color.replace('#', "%23"));
    placed(
        center,
        4.0,
        4.0,
        ObjectKind::Icon(IconProps { src, icon_name: icon_name.into(), color: color.into(), ..IconProps::default() }),
    )
}

/// A 5x5 QR code encoding `data`, or `None` for blank input.
#[must_use]
pub fn qr_code(center: Point, data: &str) -> Option<NewObject> {
    let data = data.trim();
    if data.is_empty() {
        return None;
    }
    Some(placed(center, 5.0, 5.0, ObjectKind::QrCode(QrCodeProps { src: String::new(), data: data.into() })))
}

/// A table sized 3 inches per column and 1.5 per row, every cell "Cell".
#[must_use]
pub fn table(center: Point, rows: u32, cols: u32) -> NewObject {
    let rows = rows.max(1);
    let cols = cols.max(1);
    let cells = (0..rows).map(|_| (0..cols).map(|_| "Cell".to_string()).collect()).collect();
    placed(
        center,
        f64::from(cols) * 3.0,
        f64::from(rows) * 1.5,
        ObjectKind::Table(TableProps { rows, cols, cells, ..TableProps::default() }),
    )
}

/// An 8x8 image from a hosted URL or data URI.
#[must_use]
pub fn image(center: Point, src: &str) -> NewObject {
    placed(center, 8.0, 8.0, ObjectKind::Image(ImageProps { src: src.into(), ..ImageProps::default() }))
}
