//! Bounding-box figures: circle, square and triangle markers.

use super::{SerializableColor, ShapeId, ShapeTrait};
use crate::geometry::drag_box;
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A figure defined by its center and bounding-box size.
///
/// The same geometry backs circles (inscribed ellipse), squares (the box
/// itself) and triangles (apex at top-center, base along the bottom edge).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Figure {
    pub(crate) id: ShapeId,
    /// Outline color.
    pub color: SerializableColor,
    /// Center of the bounding box.
    pub center: Point,
    /// Bounding-box width.
    pub width: f64,
    /// Bounding-box height.
    pub height: f64,
}

impl Figure {
    /// Create a new figure.
    pub fn new(center: Point, width: f64, height: f64, color: SerializableColor) -> Self {
        Self {
            id: Uuid::new_v4(),
            color,
            center,
            width,
            height,
        }
    }

    /// Create a figure from a drag gesture; the drag rectangle is center-anchored.
    pub fn from_drag(start: Point, current: Point, color: SerializableColor) -> Self {
        let (center, width, height) = drag_box(start, current);
        Self::new(center, width, height, color)
    }

    /// Radius used for erasing: half the larger bounding dimension.
    ///
    /// Exact for circles only; squares and triangles are treated as discs.
    pub fn proxy_radius(&self) -> f64 {
        self.width.max(self.height) / 2.0
    }

    /// The bounding box as a kurbo Rect.
    pub fn as_rect(&self) -> Rect {
        Rect::from_center_size(self.center, (self.width, self.height))
    }

    /// Triangle vertices: apex, bottom-right, bottom-left.
    pub fn triangle_vertices(&self) -> [Point; 3] {
        let half_w = self.width / 2.0;
        let half_h = self.height / 2.0;
        [
            Point::new(self.center.x, self.center.y - half_h),
            Point::new(self.center.x + half_w, self.center.y + half_h),
            Point::new(self.center.x - half_w, self.center.y + half_h),
        ]
    }
}

impl ShapeTrait for Figure {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn color(&self) -> SerializableColor {
        self.color
    }

    fn hit_test(&self, point: Point, radius: f64) -> bool {
        point.distance(self.center) <= self.proxy_radius() + radius
    }
}
