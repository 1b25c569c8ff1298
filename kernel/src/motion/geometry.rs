//! Point-to-segment distance used by the sweep step.

use crate::instance::target::Point;

/// Distance from `p` to the closed segment `[a, b]`.
///
/// The projection parameter is clamped to `[0, 1]`, so points beyond either
/// end measure to that endpoint. A zero-length segment degrades to the point
/// distance `|p − a|`.
#[must_use]
pub fn point_segment_distance(a: Point, b: Point, p: Point) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len_sq = dx * dx + dy * dy;
    if len_sq == 0.0 {
        return a.distance_to(p);
    }
    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
    p.distance_to(Point::new(a.x + t * dx, a.y + t * dy))
}
