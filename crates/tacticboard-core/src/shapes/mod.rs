//! Drawing objects placed on the board.

mod figure;
mod freehand;
mod text;

pub use figure::Figure;
pub use freehand::Freehand;
pub use text::Text;

use kurbo::Point;
use peniko::Color;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    /// Parse a CSS-style hex color (`#rgb`, `#rrggbb` or `#rrggbbaa`).
    ///
    /// Returns `None` for anything else, including named colors.
    pub fn from_hex(color: &str) -> Option<Self> {
        let hex = color.trim().strip_prefix('#')?;
        if !hex.is_ascii() {
            return None;
        }
        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
        match hex.len() {
            3 => {
                let r = channel(0..1)?;
                let g = channel(1..2)?;
                let b = channel(2..3)?;
                Some(Self::new(r * 17, g * 17, b * 17, 255))
            }
            6 => Some(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?, 255)),
            8 => Some(Self::new(
                channel(0..2)?,
                channel(2..4)?,
                channel(4..6)?,
                channel(6..8)?,
            )),
            _ => None,
        }
    }

    /// Format as `#rrggbb`, or `#rrggbbaa` when not fully opaque.
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl Default for SerializableColor {
    fn default() -> Self {
        Self::black()
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Unique identifier for drawing objects.
pub type ShapeId = Uuid;

/// Discriminant of a [`Shape`], without its geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Pen,
    Dashed,
    Circle,
    Square,
    Triangle,
    Text,
}

impl ShapeKind {
    pub fn name(self) -> &'static str {
        match self {
            ShapeKind::Pen => "pen",
            ShapeKind::Dashed => "dashed",
            ShapeKind::Circle => "circle",
            ShapeKind::Square => "square",
            ShapeKind::Triangle => "triangle",
            ShapeKind::Text => "text",
        }
    }
}

/// Common behaviour of every drawing object.
pub trait ShapeTrait {
    /// Get the unique identifier.
    fn id(&self) -> ShapeId;

    /// Get the stroke/fill color.
    fn color(&self) -> SerializableColor;

    /// Whether an eraser of the given radius centered at `point` touches this object.
    fn hit_test(&self, point: Point, radius: f64) -> bool;
}

/// A committed or previewed drawing object.
///
/// Committed shapes are never edited in place; the board only adds or drops
/// whole shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Shape {
    Pen(Freehand),
    Dashed(Freehand),
    Circle(Figure),
    Square(Figure),
    Triangle(Figure),
    Text(Text),
}

impl Shape {
    pub fn id(&self) -> ShapeId {
        match self {
            Shape::Pen(s) | Shape::Dashed(s) => s.id(),
            Shape::Circle(s) | Shape::Square(s) | Shape::Triangle(s) => s.id(),
            Shape::Text(s) => s.id(),
        }
    }

    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Pen(_) => ShapeKind::Pen,
            Shape::Dashed(_) => ShapeKind::Dashed,
            Shape::Circle(_) => ShapeKind::Circle,
            Shape::Square(_) => ShapeKind::Square,
            Shape::Triangle(_) => ShapeKind::Triangle,
            Shape::Text(_) => ShapeKind::Text,
        }
    }

    pub fn color(&self) -> SerializableColor {
        match self {
            Shape::Pen(s) | Shape::Dashed(s) => s.color(),
            Shape::Circle(s) | Shape::Square(s) | Shape::Triangle(s) => s.color(),
            Shape::Text(s) => s.color(),
        }
    }

    pub fn hit_test(&self, point: Point, radius: f64) -> bool {
        match self {
            Shape::Pen(s) | Shape::Dashed(s) => s.hit_test(point, radius),
            Shape::Circle(s) | Shape::Square(s) | Shape::Triangle(s) => s.hit_test(point, radius),
            Shape::Text(s) => s.hit_test(point, radius),
        }
    }

    /// Regenerate the shape's ID with a new unique identifier.
    /// Used when a preview is promoted to a committed object.
    pub fn regenerate_id(&mut self) {
        let new_id = Uuid::new_v4();
        match self {
            Shape::Pen(s) | Shape::Dashed(s) => s.id = new_id,
            Shape::Circle(s) | Shape::Square(s) | Shape::Triangle(s) => s.id = new_id,
            Shape::Text(s) => s.id = new_id,
        }
    }

    /// Get the stroke if this is a pen or dashed line.
    pub fn as_freehand(&self) -> Option<&Freehand> {
        match self {
            Shape::Pen(s) | Shape::Dashed(s) => Some(s),
            _ => None,
        }
    }

    /// Get the bounding-box figure if this is a circle, square or triangle.
    pub fn as_figure(&self) -> Option<&Figure> {
        match self {
            Shape::Circle(s) | Shape::Square(s) | Shape::Triangle(s) => Some(s),
            _ => None,
        }
    }
}
