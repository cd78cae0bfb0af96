//! Text annotation.

use super::{SerializableColor, ShapeId, ShapeTrait};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A text label anchored at its top-left corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Text {
    pub(crate) id: ShapeId,
    /// Fill color of the glyphs.
    pub color: SerializableColor,
    /// Top-left anchor.
    pub position: Point,
    /// Text content.
    pub content: String,
}

impl Text {
    pub fn new(position: Point, content: String, color: SerializableColor) -> Self {
        Self {
            id: Uuid::new_v4(),
            color,
            position,
            content,
        }
    }
}

impl ShapeTrait for Text {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn color(&self) -> SerializableColor {
        self.color
    }

    /// Text is not erasable by pointer sweeps.
    fn hit_test(&self, _point: Point, _radius: f64) -> bool {
        false
    }
}
