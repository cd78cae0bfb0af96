//! Point-sequence geometry: stroke smoothing, segment distance and
//! eraser sweep interpolation.

use kurbo::Point;

/// Smooth a sampled stroke with a single 3-point moving average.
///
/// Endpoints are kept as-is; every interior point becomes the mean of itself
/// and its two neighbours in the *input*. Inputs shorter than three points are
/// returned unchanged. Applying this twice keeps flattening the curve, so it
/// is not idempotent.
pub fn smooth_path(points: &[Point]) -> Vec<Point> {
    if points.len() < 3 {
        return points.to_vec();
    }

    let mut smoothed = Vec::with_capacity(points.len());
    smoothed.push(points[0]);
    smoothed.extend(points.windows(3).map(|w| {
        Point::new(
            (w[0].x + w[1].x + w[2].x) / 3.0,
            (w[0].y + w[1].y + w[2].y) / 3.0,
        )
    }));
    smoothed.push(points[points.len() - 1]);
    smoothed
}

/// Distance from `point` to the infinite line through `a` and `b`.
///
/// Uses the normal form `A·x + B·y + C = 0`. The result says nothing about
/// whether the foot of the perpendicular lies between `a` and `b`; callers
/// that care must bound the query themselves (see [`within_segment_box`]).
/// A degenerate segment falls back to the distance to `a`.
pub fn line_distance(point: Point, a: Point, b: Point) -> f64 {
    let coeff_a = b.y - a.y;
    let coeff_b = a.x - b.x;
    let coeff_c = b.x * a.y - a.x * b.y;

    let norm = (coeff_a * coeff_a + coeff_b * coeff_b).sqrt();
    if norm < f64::EPSILON {
        return point.distance(a);
    }
    (coeff_a * point.x + coeff_b * point.y + coeff_c).abs() / norm
}

/// Whether `point` lies in the bounding box of segment `a`→`b` grown by
/// `margin` on both axes.
pub fn within_segment_box(point: Point, a: Point, b: Point, margin: f64) -> bool {
    point.x >= a.x.min(b.x) - margin
        && point.x <= a.x.max(b.x) + margin
        && point.y >= a.y.min(b.y) - margin
        && point.y <= a.y.max(b.y) + margin
}

/// Upper bound on the steps of one eraser sweep.
pub const MAX_SWEEP_STEPS: f64 = 4096.0;

/// Linear samples between two pointer positions for eraser sweeps.
///
/// The step count is `max(|dx|, |dy|)`, so consecutive samples are at most one
/// unit apart on the dominant axis. Yields `floor(steps) + 1` samples starting
/// at `from`, or nothing when the pointer has not moved. Jumps longer than
/// [`MAX_SWEEP_STEPS`] are spread over that many steps instead.
pub fn interpolate(from: Point, to: Point) -> impl Iterator<Item = Point> {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    let distance = dx.abs().max(dy.abs());
    let steps = distance.min(MAX_SWEEP_STEPS);
    let count = (steps > 0.0 && distance.is_finite()).then(|| steps.floor() as usize);

    count.into_iter().flat_map(move |count| {
        (0..=count).map(move |i| {
            let t = i as f64 / steps;
            Point::new(from.x + dx * t, from.y + dy * t)
        })
    })
}

/// Center-anchored box spanned by a drag from `start` to `current`.
///
/// Returns `(center, width, height)` with non-negative dimensions.
pub fn drag_box(start: Point, current: Point) -> (Point, f64, f64) {
    let width = (current.x - start.x).abs();
    let height = (current.y - start.y).abs();
    let center = Point::new(
        start.x.min(current.x) + width / 2.0,
        start.y.min(current.y) + height / 2.0,
    );
    (center, width, height)
}
