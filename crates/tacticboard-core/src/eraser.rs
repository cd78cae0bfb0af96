//! Eraser hit-testing against committed drawings.

use crate::shapes::Shape;
use kurbo::Point;

/// Default eraser radius in canvas units.
pub const ERASER_RADIUS: f64 = 10.0;

/// Whether an eraser of `radius` at `point` removes `shape`.
///
/// - pen / dashed: within `radius` of some segment, measured to the segment's
///   line and bounded by the segment's box grown by `radius`;
/// - circle / square / triangle: within `max(width, height) / 2 + radius` of
///   the center;
/// - text: never.
pub fn should_erase(point: Point, shape: &Shape, radius: f64) -> bool {
    shape.hit_test(point, radius)
}

/// Drop every drawing touched by the eraser at `point`, keeping the order of
/// the rest.
pub fn erase_at(drawings: &[Shape], point: Point, radius: f64) -> Vec<Shape> {
    drawings
        .iter()
        .filter(|shape| !should_erase(point, shape, radius))
        .cloned()
        .collect()
}

/// Whether the eraser at `point` touches any drawing.
pub fn hits_any(drawings: &[Shape], point: Point, radius: f64) -> bool {
    drawings.iter().any(|shape| should_erase(point, shape, radius))
}
