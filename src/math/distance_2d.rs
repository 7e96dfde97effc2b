use super::{Point2, EPSILON};

/// Returns the point on the segment from `a` to `b` closest to `p`.
#[must_use]
pub fn closest_point_on_segment(p: &Point2, a: &Point2, b: &Point2) -> Point2 {
    let d = b - a;
    let len_sq = d.norm_squared();

    if len_sq < EPSILON * EPSILON {
        // Degenerate segment (zero length).
        return *a;
    }

    // Project point onto the infinite line, clamp to [0, 1].
    let t = ((p - a).dot(&d) / len_sq).clamp(0.0, 1.0);
    a + d * t
}

/// Returns the closest point to `p` on the boundary of triangle `abc`.
#[must_use]
pub fn closest_point_on_triangle_edges(p: &Point2, a: &Point2, b: &Point2, c: &Point2) -> Point2 {
    let candidates = [
        closest_point_on_segment(p, a, b),
        closest_point_on_segment(p, b, c),
        closest_point_on_segment(p, c, a),
    ];

    let mut best = candidates[0];
    let mut best_dist = (best - p).norm_squared();
    for candidate in &candidates[1..] {
        let dist = (candidate - p).norm_squared();
        if dist < best_dist {
            best = *candidate;
            best_dist = dist;
        }
    }
    best
}
