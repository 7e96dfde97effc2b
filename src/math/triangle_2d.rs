use super::{Point2, EPSILON};

/// Tests whether `p` lies strictly inside triangle `abc`.
///
/// Uses barycentric weights of `b` and `c`; the point is inside when both
/// weights are at least `tolerance` and their sum is at most `1 - tolerance`.
/// Points on an edge or at a corner are therefore outside. Orientation of
/// the triangle does not matter. Degenerate (zero-area) triangles contain
/// nothing.
#[must_use]
pub fn point_in_triangle_2d(p: &Point2, a: &Point2, b: &Point2, c: &Point2, tolerance: f32) -> bool {
    let v0 = b - a;
    let v1 = c - a;
    let v2 = p - a;

    let denom = v0.perp(&v1);
    if denom.abs() < EPSILON {
        return false;
    }

    let w_b = v2.perp(&v1) / denom;
    let w_c = v0.perp(&v2) / denom;
    w_b >= tolerance && w_c >= tolerance && w_b + w_c <= 1.0 - tolerance
}

/// Centroid of a 2D triangle.
#[must_use]
pub fn centroid_2d(a: &Point2, b: &Point2, c: &Point2) -> Point2 {
    Point2::new((a.x + b.x + c.x) / 3.0, (a.y + b.y + c.y) / 3.0)
}

/// A 2D axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb2 {
    /// Minimum corner of the bounding box.
    pub min: Point2,
    /// Maximum corner of the bounding box.
    pub max: Point2,
}

impl Aabb2 {
    /// Bounding box of a triangle.
    #[must_use]
    pub fn from_triangle(a: &Point2, b: &Point2, c: &Point2) -> Self {
        Self {
            min: Point2::new(a.x.min(b.x).min(c.x), a.y.min(b.y).min(c.y)),
            max: Point2::new(a.x.max(b.x).max(c.x), a.y.max(b.y).max(c.y)),
        }
    }

    /// Returns `true` if the boxes overlap. Touching boxes overlap.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        !(self.max.x < other.min.x
            || self.max.y < other.min.y
            || self.min.x > other.max.x
            || self.min.y > other.max.y)
    }
}
