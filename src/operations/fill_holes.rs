use std::collections::BTreeSet;

use tracing::{debug, info};

use crate::cancel::CancelToken;
use crate::config::BakeParams;
use crate::error::Result;
use crate::math::distance_2d::closest_point_on_triangle_edges;
use crate::math::intersect_2d::triangles_cross_2d;
use crate::math::triangle_2d::{centroid_2d, point_in_triangle_2d, Aabb2};
use crate::math::{xz, Point2, EPSILON};
use crate::mesh::IndexedMesh;

use super::graph::BuildMeshGraph;

/// What a [`FillHoles`] run changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FillStats {
    /// Vertices pushed out of a triangle they were lying inside.
    pub snapped_vertices: usize,
    /// Triangles appended to close holes.
    pub filled_triangles: usize,
}

/// Closes triangular holes left between faces.
///
/// # Algorithm
///
/// 1. **Snap.** A vertex lying strictly inside (in XZ) a triangle it does not
///    belong to is pushed out past that triangle's nearest edge by
///    `snap_margin`. Height is kept.
/// 2. **Fill.** Every triple of mutually connected vertices
///    `original < other < last` is proposed as a triangle. A proposal is
///    rejected when the same vertex set already exists, when its centroid or
///    a corner lies inside an existing triangle, when it contains an existing
///    triangle's centroid, or when an edge properly crosses an existing edge.
///    Accepted triangles join the set later proposals are checked against.
///
/// Connectivity is taken once, before snapping; filled triangles do not
/// create new candidates.
#[derive(Debug, Clone, Copy)]
pub struct FillHoles {
    inside_tolerance: f32,
    snap_margin: f32,
}

impl FillHoles {
    /// Creates a new `FillHoles` operation.
    #[must_use]
    pub fn new(inside_tolerance: f32, snap_margin: f32) -> Self {
        Self {
            inside_tolerance,
            snap_margin,
        }
    }

    #[must_use]
    pub fn from_params(params: &BakeParams) -> Self {
        Self::new(params.inside_tolerance, params.snap_margin)
    }

    /// Executes the operation in place. New faces carry `T::default()`.
    ///
    /// On cancellation the mesh may be partially snapped.
    ///
    /// # Errors
    ///
    /// - `InputError` variants if the mesh references missing vertices
    /// - `NavoptError::Canceled` if `cancel` fires
    pub fn execute<T: Default>(&self, mesh: &mut IndexedMesh<T>, cancel: &CancelToken) -> Result<FillStats> {
        mesh.validate()?;

        let connections = BuildMeshGraph::new().connections(mesh);
        let snapped_vertices = self.snap_vertices(mesh, cancel)?;
        let filled_triangles = self.fill(mesh, &connections, cancel)?;

        let stats = FillStats {
            snapped_vertices,
            filled_triangles,
        };
        info!(
            snapped = stats.snapped_vertices,
            filled = stats.filled_triangles,
            triangles = mesh.faces.len(),
            "holes filled"
        );
        Ok(stats)
    }

    fn snap_vertices<T>(&self, mesh: &mut IndexedMesh<T>, cancel: &CancelToken) -> Result<usize> {
        let mut snapped = 0;
        for i in 0..mesh.vertices.len() {
            cancel.checkpoint()?;
            let mut moved = false;

            for face in &mesh.faces {
                if face.contains(&i) {
                    continue;
                }
                let p = xz(&mesh.vertices[i]);
                let [a, b, c] = face.map(|v| xz(&mesh.vertices[v]));
                if !point_in_triangle_2d(&p, &a, &b, &c, self.inside_tolerance) {
                    continue;
                }

                let offset = closest_point_on_triangle_edges(&p, &a, &b, &c) - p;
                let distance = offset.norm();
                if distance < EPSILON {
                    continue;
                }
                let step = offset * ((distance + self.snap_margin) / distance);
                let vertex = &mut mesh.vertices[i];
                vertex.x += step.x;
                vertex.z += step.y;
                moved = true;
                debug!(vertex = i, face = ?face, distance, "vertex snapped out of triangle");
            }

            if moved {
                snapped += 1;
            }
        }
        Ok(snapped)
    }

    fn fill<T: Default>(
        &self,
        mesh: &mut IndexedMesh<T>,
        connections: &[BTreeSet<usize>],
        cancel: &CancelToken,
    ) -> Result<usize> {
        let mut filled = 0;
        for (original, linked) in connections.iter().enumerate() {
            cancel.checkpoint()?;
            let higher: Vec<usize> = linked.range(original + 1..).copied().collect();

            for (k, &other) in higher.iter().enumerate() {
                for &last in &higher[k + 1..] {
                    if !connections[last].contains(&other) {
                        continue;
                    }
                    let face = [original, other, last];
                    if self.accepts(mesh, face) {
                        mesh.push_face(face, T::default());
                        filled += 1;
                        debug!(face = ?face, "hole triangle added");
                    }
                }
            }
        }
        Ok(filled)
    }

    fn accepts<T>(&self, mesh: &IndexedMesh<T>, face: [usize; 3]) -> bool {
        let tolerance = self.inside_tolerance;
        let proposal = face.map(|v| xz(&mesh.vertices[v]));
        let [a, b, c] = &proposal;
        let center = centroid_2d(a, b, c);
        let bounds = Aabb2::from_triangle(a, b, c);

        for existing in &mesh.faces {
            if face.iter().all(|v| existing.contains(v)) {
                return false;
            }

            let other = existing.map(|v| xz(&mesh.vertices[v]));
            let [p, q, r] = &other;
            if !bounds.overlaps(&Aabb2::from_triangle(p, q, r)) {
                continue;
            }

            let covered = |point: &Point2| point_in_triangle_2d(point, p, q, r, tolerance);
            if covered(&center) || proposal.iter().any(covered) {
                return false;
            }
            if point_in_triangle_2d(&centroid_2d(p, q, r), a, b, c, tolerance) {
                return false;
            }
            if triangles_cross_2d(&proposal, &other, tolerance) {
                return false;
            }
        }
        true
    }
}
