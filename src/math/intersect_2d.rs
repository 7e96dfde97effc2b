use super::{Point2, EPSILON};

/// Proper crossing test for segments `a0→a1` and `b0→b1`.
///
/// Returns `true` only when the segments intersect at a single point lying
/// more than `tolerance` (in distance units) away from every endpoint.
/// Segments meeting at a shared endpoint, touching at an endpoint, or lying
/// parallel never cross.
#[must_use]
pub fn segments_cross_2d(a0: &Point2, a1: &Point2, b0: &Point2, b1: &Point2, tolerance: f32) -> bool {
    let da = a1 - a0;
    let db = b1 - b0;
    let len_a = da.norm();
    let len_b = db.norm();
    if len_a < EPSILON || len_b < EPSILON {
        return false;
    }

    let cross = da.perp(&db);
    if cross.abs() < EPSILON * len_a * len_b {
        return false;
    }

    let diff = b0 - a0;
    let t = diff.perp(&db) / cross;
    let u = diff.perp(&da) / cross;

    let t_margin = tolerance / len_a;
    let u_margin = tolerance / len_b;
    t > t_margin && t < 1.0 - t_margin && u > u_margin && u < 1.0 - u_margin
}

/// Returns `true` if any edge of triangle `a` properly crosses any edge of
/// triangle `b`.
#[must_use]
pub fn triangles_cross_2d(a: &[Point2; 3], b: &[Point2; 3], tolerance: f32) -> bool {
    const EDGES: [(usize, usize); 3] = [(0, 1), (1, 2), (2, 0)];

    EDGES.iter().any(|&(i, j)| {
        EDGES
            .iter()
            .any(|&(k, l)| segments_cross_2d(&a[i], &a[j], &b[k], &b[l], tolerance))
    })
}
