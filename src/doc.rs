//! Document model: canvas objects, their type payloads, and the per-side store.
//!
//! This module defines what is on the sign (`CanvasObject`, `ObjectKind`), the
//! sparse-update types used by style panels and gestures (`ObjectPatch` and
//! its payload half `KindPatch`), the store that owns one side's objects
//! (`ObjectStore`), and the two-sided `Scene` with its shared physical
//! dimensions.
//!
//! Every store operation on a missing id is a silent no-op reported through
//! its return value; nothing here can fail.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::consts::{DEFAULT_CANVAS_HEIGHT, DEFAULT_CANVAS_WIDTH, MIN_OBJECT_SIZE};

/// Unique identifier for a canvas object.
pub type ObjectId = Uuid;

/// One of the two printable faces of the sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    #[default]
    Front,
    Back,
}

/// The fixed type tag of an object, without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectType {
    Text,
    Image,
    Shape,
    QrCode,
    Table,
    Icon,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAlign {
    Top,
    #[default]
    Middle,
    Bottom,
}

/// Outline drawn by a `shape` object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShapeVariant {
    #[default]
    Rectangle,
    Circle,
    Triangle,
    Line,
    Arrow,
    Star,
    Polygon,
    RoundedRectangle,
    Prohibition,
    WarningTriangle,
}

/// Payload of a `text` object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextStyle {
    pub text: String,
    pub font_family: String,
    /// Point size; scaled with the canvas.
    pub font_size: f64,
    pub font_weight: String,
    pub font_style: String,
    pub text_decoration: String,
    pub text_align: TextAlign,
    pub vertical_align: VerticalAlign,
    pub text_color: String,
    pub background_color: String,
    /// Scaled with the canvas.
    pub letter_spacing: f64,
    pub line_height: f64,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            text: "Your Text".into(),
            font_family: "Arial".into(),
            font_size: 32.0,
            font_weight: "bold".into(),
            font_style: "normal".into(),
            text_decoration: "none".into(),
            text_align: TextAlign::Center,
            vertical_align: VerticalAlign::Middle,
            text_color: "#000000".into(),
            background_color: "transparent".into(),
            letter_spacing: 0.0,
            line_height: 1.2,
        }
    }
}

/// Payload of an `image` object.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageProps {
    /// Hosted URL or data URI of the bitmap.
    pub src: String,
    pub flip_h: bool,
    pub flip_v: bool,
    /// Scaled with the canvas.
    pub border_radius: f64,
    pub shadow: bool,
}

/// Payload of an `icon` object.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IconProps {
    pub src: String,
    pub icon_name: String,
    pub color: String,
    pub flip_h: bool,
    pub flip_v: bool,
}

/// Payload of a `shape` object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapeStyle {
    pub shape: ShapeVariant,
    pub fill: String,
    pub stroke: String,
    /// Scaled with the canvas.
    pub stroke_width: f64,
    /// Vertex count for `polygon`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sides: Option<u32>,
    /// Scaled with the canvas.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub corner_radius: Option<f64>,
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            shape: ShapeVariant::Rectangle,
            fill: "#facc15".into(),
            stroke: "#000000".into(),
            stroke_width: 0.0,
            sides: None,
            corner_radius: None,
        }
    }
}

/// Payload of a `qrcode` object.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct QrCodeProps {
    /// Rendered QR bitmap reference.
    pub src: String,
    /// Encoded content.
    pub data: String,
}

/// Payload of a `table` object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableProps {
    pub rows: u32,
    pub cols: u32,
    /// Row-major cell text.
    pub cells: Vec<Vec<String>>,
    /// Scaled with the canvas.
    pub cell_padding: f64,
    pub border_color: String,
    pub fill: String,
    pub stroke: String,
    /// Scaled with the canvas.
    pub stroke_width: f64,
}

impl Default for TableProps {
    fn default() -> Self {
        Self {
            rows: 0,
            cols: 0,
            cells: Vec::new(),
            cell_padding: 4.0,
            border_color: "#000000".into(),
            fill: "#ffffff".into(),
            stroke: "#000000".into(),
            stroke_width: 1.0,
        }
    }
}

/// Type-specific payload. The variant is fixed when the object is created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ObjectKind {
    Text(TextStyle),
    Image(ImageProps),
    Shape(ShapeStyle),
    QrCode(QrCodeProps),
    Table(TableProps),
    Icon(IconProps),
}

impl ObjectKind {
    /// The type tag of this payload.
    #[must_use]
    pub fn object_type(&self) -> ObjectType {
        match self {
            Self::Text(_) => ObjectType::Text,
            Self::Image(_) => ObjectType::Image,
            Self::Shape(_) => ObjectType::Shape,
            Self::QrCode(_) => ObjectType::QrCode,
            Self::Table(_) => ObjectType::Table,
            Self::Icon(_) => ObjectType::Icon,
        }
    }

    /// Multiply every size-like scalar (font size, spacing, stroke, radii, padding) by `k`.
    pub fn scale_sizes(&mut self, k: f64) {
        match self {
            Self::Text(t) => {
                t.font_size *= k;
                t.letter_spacing *= k;
            }
            Self::Image(i) => i.border_radius *= k,
            Self::Shape(s) => {
                s.stroke_width *= k;
                if let Some(r) = s.corner_radius.as_mut() {
                    *r *= k;
                }
            }
            Self::Table(t) => {
                t.cell_padding *= k;
                t.stroke_width *= k;
            }
            Self::QrCode(_) | Self::Icon(_) => {}
        }
    }
}

/// Generates a sparse patch for one payload struct: every field optional,
/// applied only when present.
macro_rules! payload_patch {
    ($(#[$meta:meta])* $name:ident => $target:ty { $($field:ident: $ty:ty),* $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
        #[serde(default)]
        pub struct $name {
            $(
                #[serde(skip_serializing_if = "Option::is_none")]
                pub $field: Option<$ty>,
            )*
        }

        impl $name {
            /// Overwrite the fields present in the patch and leave the rest.
            pub fn apply_to(&self, target: &mut $target) {
                $(
                    if let Some(value) = &self.$field {
                        target.$field.clone_from(value);
                    }
                )*
            }
        }

        impl From<$target> for $name {
            fn from(full: $target) -> Self {
                Self { $($field: Some(full.$field)),* }
            }
        }
    };
}

payload_patch!(
    /// Sparse update of a [`TextStyle`].
    TextPatch => TextStyle {
        text: String,
        font_family: String,
        font_size: f64,
        font_weight: String,
        font_style: String,
        text_decoration: String,
        text_align: TextAlign,
        vertical_align: VerticalAlign,
        text_color: String,
        background_color: String,
        letter_spacing: f64,
        line_height: f64,
    }
);

payload_patch!(
    /// Sparse update of an [`ImageProps`].
    ImagePatch => ImageProps { src: String, flip_h: bool, flip_v: bool, border_radius: f64, shadow: bool }
);

payload_patch!(
    /// Sparse update of an [`IconProps`].
    IconPatch => IconProps { src: String, icon_name: String, color: String, flip_h: bool, flip_v: bool }
);

payload_patch!(
    /// Sparse update of a [`ShapeStyle`].
    ShapePatch => ShapeStyle {
        shape: ShapeVariant,
        fill: String,
        stroke: String,
        stroke_width: f64,
        sides: Option<u32>,
        corner_radius: Option<f64>,
    }
);

payload_patch!(
    /// Sparse update of a [`QrCodeProps`].
    QrCodePatch => QrCodeProps { src: String, data: String }
);

payload_patch!(
    /// Sparse update of a [`TableProps`].
    TablePatch => TableProps {
        rows: u32,
        cols: u32,
        cells: Vec<Vec<String>>,
        cell_padding: f64,
        border_color: String,
        fill: String,
        stroke: String,
        stroke_width: f64,
    }
);

/// Sparse payload update, tagged with the object type it applies to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum KindPatch {
    Text(TextPatch),
    Image(ImagePatch),
    Shape(ShapePatch),
    QrCode(QrCodePatch),
    Table(TablePatch),
    Icon(IconPatch),
}

impl KindPatch {
    #[must_use]
    pub fn object_type(&self) -> ObjectType {
        match self {
            Self::Text(_) => ObjectType::Text,
            Self::Image(_) => ObjectType::Image,
            Self::Shape(_) => ObjectType::Shape,
            Self::QrCode(_) => ObjectType::QrCode,
            Self::Table(_) => ObjectType::Table,
            Self::Icon(_) => ObjectType::Icon,
        }
    }

    /// Merge into a payload of the same type. Returns false, leaving `kind`
    /// untouched, when the types differ.
    pub fn apply_to(&self, kind: &mut ObjectKind) -> bool {
        match (self, kind) {
            (Self::Text(p), ObjectKind::Text(t)) => p.apply_to(t),
            (Self::Image(p), ObjectKind::Image(i)) => p.apply_to(i),
            (Self::Shape(p), ObjectKind::Shape(s)) => p.apply_to(s),
            (Self::QrCode(p), ObjectKind::QrCode(q)) => p.apply_to(q),
            (Self::Table(p), ObjectKind::Table(t)) => p.apply_to(t),
            (Self::Icon(p), ObjectKind::Icon(i)) => p.apply_to(i),
            _ => return false,
        }
        true
    }
}

/// A full payload as a patch that sets every field.
impl From<ObjectKind> for KindPatch {
    fn from(kind: ObjectKind) -> Self {
        match kind {
            ObjectKind::Text(t) => Self::Text(t.into()),
            ObjectKind::Image(i) => Self::Image(i.into()),
            ObjectKind::Shape(s) => Self::Shape(s.into()),
            ObjectKind::QrCode(q) => Self::QrCode(q.into()),
            ObjectKind::Table(t) => Self::Table(t.into()),
            ObjectKind::Icon(i) => Self::Icon(i.into()),
        }
    }
}

/// Geometric pose of an object, in inches and degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pose {
    /// Center x.
    pub x: f64,
    /// Center y.
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Clockwise rotation in degrees about the center.
    pub rotation: f64,
}

/// A placed object as stored in the scene and handed to export collaborators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasObject {
    /// Assigned at creation and never reused.
    pub id: ObjectId,
    /// Center x in inches.
    pub x: f64,
    /// Center y in inches.
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Clockwise rotation in degrees around the center.
    pub rotation: f64,
    /// 0.0 (transparent) to 1.0 (opaque).
    pub opacity: f64,
    /// Blocks pointer and keyboard manipulation, but not patches.
    pub locked: bool,
    /// Paint order on its side; dense `0..n`.
    pub z_index: usize,
    #[serde(flatten)]
    pub kind: ObjectKind,
}

impl CanvasObject {
    /// Materialize a new object with a fresh id at the given stacking slot.
    #[must_use]
    pub fn from_new(new: NewObject, z_index: usize) -> Self {
        Self {
            id: Uuid::new_v4(),
            x: new.x,
            y: new.y,
            width: new.width.max(MIN_OBJECT_SIZE),
            height: new.height.max(MIN_OBJECT_SIZE),
            rotation: new.rotation,
            opacity: new.opacity.clamp(0.0, 1.0),
            locked: new.locked,
            z_index,
            kind: new.kind,
        }
    }

    #[must_use]
    pub fn object_type(&self) -> ObjectType {
        self.kind.object_type()
    }

    #[must_use]
    pub fn pose(&self) -> Pose {
        Pose { x: self.x, y: self.y, width: self.width, height: self.height, rotation: self.rotation }
    }

    pub fn set_pose(&mut self, pose: Pose) {
        self.x = pose.x;
        self.y = pose.y;
        self.width = pose.width;
        self.height = pose.height;
        self.rotation = pose.rotation;
    }
}

fn default_opacity() -> f64 {
    1.0
}

/// An object description before it has an id or a stacking slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewObject {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub rotation: f64,
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    #[serde(default)]
    pub locked: bool,
    #[serde(flatten)]
    pub kind: ObjectKind,
}

impl From<CanvasObject> for NewObject {
    fn from(obj: CanvasObject) -> Self {
        Self {
            x: obj.x,
            y: obj.y,
            width: obj.width,
            height: obj.height,
            rotation: obj.rotation,
            opacity: obj.opacity,
            locked: obj.locked,
            kind: obj.kind,
        }
    }
}

/// Sparse update for an object. Only present fields are applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObjectPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locked: Option<bool>,
    /// Payload fields to merge; ignored unless tagged with the object's own type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<KindPatch>,
}

impl ObjectPatch {
    /// A patch that sets the full pose.
    #[must_use]
    pub fn from_pose(pose: Pose) -> Self {
        Self {
            x: Some(pose.x),
            y: Some(pose.y),
            width: Some(pose.width),
            height: Some(pose.height),
            rotation: Some(pose.rotation),
            ..Default::default()
        }
    }
}

/// Direction for a layer-order change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerMove {
    Up,
    Down,
    Top,
    Bottom,
}

/// Ordered store of one side's objects.
///
/// Objects are kept in insertion order (which is also snap-guide order);
/// paint order is `z_index`, which stays a dense `0..len` permutation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectStore {
    objects: Vec<CanvasObject>,
}

impl ObjectStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self { objects: Vec::new() }
    }

    /// Append a new object on top of the stack and return its id.
    pub fn push_new(&mut self, new: NewObject) -> ObjectId {
        let obj = CanvasObject::from_new(new, self.objects.len());
        let id = obj.id;
        self.objects.push(obj);
        id
    }

    /// Remove an object by id, returning it if it was present. Remaining
    /// objects are restacked so `z_index` stays dense.
    pub fn remove(&mut self, id: &ObjectId) -> Option<CanvasObject> {
        let idx = self.objects.iter().position(|o| o.id == *id)?;
        let removed = self.objects.remove(idx);
        self.normalize_z();
        Some(removed)
    }

    #[must_use]
    pub fn get(&self, id: &ObjectId) -> Option<&CanvasObject> {
        self.objects.iter().find(|o| o.id == *id)
    }

    pub fn get_mut(&mut self, id: &ObjectId) -> Option<&mut CanvasObject> {
        self.objects.iter_mut().find(|o| o.id == *id)
    }

    #[must_use]
    pub fn contains(&self, id: &ObjectId) -> bool {
        self.get(id).is_some()
    }

    /// Apply a partial update. Returns false if the object doesn't exist.
    ///
    /// Sizes are clamped to the minimum object size and opacity to `[0, 1]`.
    pub fn apply_patch(&mut self, id: &ObjectId, patch: &ObjectPatch) -> bool {
        let Some(obj) = self.get_mut(id) else {
            return false;
        };
        if let Some(x) = patch.x {
            obj.x = x;
        }
        if let Some(y) = patch.y {
            obj.y = y;
        }
        if let Some(w) = patch.width {
            obj.width = w.max(MIN_OBJECT_SIZE);
        }
        if let Some(h) = patch.height {
            obj.height = h.max(MIN_OBJECT_SIZE);
        }
        if let Some(r) = patch.rotation {
            obj.rotation = r;
        }
        if let Some(o) = patch.opacity {
            obj.opacity = o.clamp(0.0, 1.0);
        }
        if let Some(locked) = patch.locked {
            obj.locked = locked;
        }
        if let Some(kind) = &patch.kind {
            if !kind.apply_to(&mut obj.kind) {
                tracing::warn!(
                    %id,
                    expected = ?obj.object_type(),
                    got = ?kind.object_type(),
                    "payload patch type mismatch ignored"
                );
            }
        }
        true
    }

    /// Move an object within the paint order and restack densely.
    /// Returns false if the object doesn't exist.
    pub fn reorder(&mut self, id: &ObjectId, direction: LayerMove) -> bool {
        let mut sorted = std::mem::take(&mut self.objects);
        sorted.sort_by_key(|o| o.z_index);
        let Some(index) = sorted.iter().position(|o| o.id == *id) else {
            self.objects = sorted;
            return false;
        };

        let last = sorted.len() - 1;
        let new_index = match direction {
            LayerMove::Up => (index + 1).min(last),
            LayerMove::Down => index.saturating_sub(1),
            LayerMove::Top => last,
            LayerMove::Bottom => 0,
        };

        let item = sorted.remove(index);
        sorted.insert(new_index, item);
        for (z, obj) in sorted.iter_mut().enumerate() {
            obj.z_index = z;
        }
        self.objects = sorted;
        true
    }

    /// Remove every object.
    pub fn clear(&mut self) {
        self.objects.clear();
    }

    /// Replace all objects with a stored snapshot, ids and stacking preserved.
    pub fn load_snapshot(&mut self, objects: Vec<CanvasObject>) {
        self.objects = objects;
    }

    /// Reassign `z_index` as `0..len`, preserving current relative order.
    pub fn normalize_z(&mut self) {
        let mut order: Vec<usize> = (0..self.objects.len()).collect();
        order.sort_by_key(|&i| self.objects[i].z_index);
        for (z, i) in order.into_iter().enumerate() {
            self.objects[i].z_index = z;
        }
    }

    /// Objects in insertion order.
    #[must_use]
    pub fn objects(&self) -> &[CanvasObject] {
        &self.objects
    }

    pub fn objects_mut(&mut self) -> impl Iterator<Item = &mut CanvasObject> {
        self.objects.iter_mut()
    }

    /// Objects sorted bottom-to-top for painting.
    #[must_use]
    pub fn sorted_objects(&self) -> Vec<&CanvasObject> {
        let mut objs: Vec<&CanvasObject> = self.objects.iter().collect();
        objs.sort_by_key(|o| o.z_index);
        objs
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

/// The editable design: two object collections over one physical canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub front: ObjectStore,
    pub back: ObjectStore,
    /// Canvas width in inches.
    pub width: f64,
    /// Canvas height in inches.
    pub height: f64,
    /// Side receiving new objects and interactive edits.
    pub active_side: Side,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(DEFAULT_CANVAS_WIDTH, DEFAULT_CANVAS_HEIGHT)
    }
}

impl Scene {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { front: ObjectStore::new(), back: ObjectStore::new(), width, height, active_side: Side::Front }
    }

    #[must_use]
    pub fn side(&self, side: Side) -> &ObjectStore {
        match side {
            Side::Front => &self.front,
            Side::Back => &self.back,
        }
    }

    pub fn side_mut(&mut self, side: Side) -> &mut ObjectStore {
        match side {
            Side::Front => &mut self.front,
            Side::Back => &mut self.back,
        }
    }

    #[must_use]
    pub fn active(&self) -> &ObjectStore {
        self.side(self.active_side)
    }

    pub fn active_mut(&mut self) -> &mut ObjectStore {
        self.side_mut(self.active_side)
    }

    /// Copy of both sides and the canvas size, for export collaborators.
    #[must_use]
    pub fn design_data(&self) -> DesignData {
        DesignData {
            front: self.front.objects().to_vec(),
            back: self.back.objects().to_vec(),
            width: self.width,
            height: self.height,
        }
    }
}

/// Read-only design snapshot consumed by export, upload and cart code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignData {
    pub front: Vec<CanvasObject>,
    pub back: Vec<CanvasObject>,
    pub width: f64,
    pub height: f64,
}
