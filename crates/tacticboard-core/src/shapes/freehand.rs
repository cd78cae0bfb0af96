//! Freehand stroke, shared by the pen and dashed-line tools.

use super::{SerializableColor, ShapeId, ShapeTrait};
use crate::geometry::{line_distance, smooth_path, within_segment_box};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An open polyline drawn by hand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Freehand {
    pub(crate) id: ShapeId,
    /// Stroke color.
    pub color: SerializableColor,
    /// Points of the polyline, in drawing order.
    pub points: Vec<Point>,
}

impl Freehand {
    /// Minimum number of points for a committed stroke.
    pub const MIN_POINTS: usize = 2;

    /// Create a stroke from points as given, without smoothing or validation.
    pub fn new(points: Vec<Point>, color: SerializableColor) -> Self {
        Self {
            id: Uuid::new_v4(),
            color,
            points,
        }
    }

    /// Build a stroke from raw pointer samples.
    ///
    /// The samples are smoothed; returns `None` when fewer than
    /// [`Self::MIN_POINTS`] remain.
    pub fn from_samples(samples: &[Point], color: SerializableColor) -> Option<Self> {
        let points = smooth_path(samples);
        if points.len() < Self::MIN_POINTS {
            return None;
        }
        Some(Self::new(points, color))
    }

    /// Get the number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the path is empty.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Consecutive point pairs of the polyline.
    pub fn segments(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        self.points.windows(2).map(|w| (w[0], w[1]))
    }
}

impl ShapeTrait for Freehand {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn color(&self) -> SerializableColor {
        self.color
    }

    fn hit_test(&self, point: Point, radius: f64) -> bool {
        // The line distance alone matches far beyond the segment ends, so the
        // query must also sit inside the segment's inflated box.
        self.segments().any(|(a, b)| {
            line_distance(point, a, b) <= radius && within_segment_box(point, a, b, radius)
        })
    }
}
