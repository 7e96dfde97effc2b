pub mod distance_2d;
pub mod intersect_2d;
pub mod triangle_2d;

/// 2D point type (navmesh plane, `x` and `z` of the 3D position).
pub type Point2 = nalgebra::Point2<f32>;

/// 3D point type.
pub type Point3 = nalgebra::Point3<f32>;

/// 2D vector type.
pub type Vector2 = nalgebra::Vector2<f32>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f32>;

/// Lengths below this are treated as zero.
pub const EPSILON: f32 = 1e-7;

/// Projects a 3D position onto the walkable plane by dropping the height.
#[must_use]
pub fn xz(p: &Point3) -> Point2 {
    Point2::new(p.x, p.z)
}

/// Squared 3D distance, used where only ordering matters.
#[must_use]
pub fn distance_squared(a: &Point3, b: &Point3) -> f32 {
    (a - b).norm_squared()
}

/// Returns `true` if no coordinate of `p` is NaN or infinite.
#[must_use]
pub fn is_finite(p: &Point3) -> bool {
    p.coords.iter().all(|c| c.is_finite())
}
