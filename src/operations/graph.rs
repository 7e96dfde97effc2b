use std::collections::{BTreeSet, HashSet};

use tracing::debug;

use crate::cancel::CancelToken;
use crate::error::Result;
use crate::mesh::{shared_vertices, IndexedMesh, NavTriangle};

/// Triangles with resolved adjacency plus the vertex → triangle incidence
/// map they were resolved from.
#[derive(Debug, Clone)]
pub struct MeshGraph<T = i32> {
    /// One entry per face, `id` equal to its position.
    pub triangles: Vec<NavTriangle<T>>,
    /// For each vertex, the ids of triangles using it, ascending.
    pub incidence: Vec<Vec<usize>>,
}

impl<T> MeshGraph<T> {
    /// Returns `true` if any triangle using `vertex` has at least one neighbor.
    #[must_use]
    pub fn vertex_touches_neighbor(&self, vertex: usize) -> bool {
        self.incidence
            .get(vertex)
            .is_some_and(|ids| ids.iter().any(|&t| !self.triangles[t].neighbors.is_empty()))
    }
}

/// Builds triangles and shared-edge adjacency from an indexed mesh.
///
/// # Algorithm
///
/// 1. Create one [`NavTriangle`] per face and record it under each of its
///    vertices in the incidence map.
/// 2. For every triangle, walk the incidence lists of its three vertices (in
///    corner order) and keep each candidate sharing exactly two vertices.
///    Neighbor order is the order of first discovery.
#[derive(Debug, Default, Clone, Copy)]
pub struct BuildMeshGraph;

impl BuildMeshGraph {
    /// Creates a new `BuildMeshGraph` operation.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Executes the operation.
    ///
    /// # Errors
    ///
    /// - `InputError` variants if the mesh references missing vertices
    /// - `NavoptError::Canceled` if `cancel` fires
    pub fn execute<T: Clone>(&self, mesh: &IndexedMesh<T>, cancel: &CancelToken) -> Result<MeshGraph<T>> {
        mesh.validate()?;

        let mut triangles = Vec::with_capacity(mesh.faces.len());
        let mut incidence: Vec<Vec<usize>> = vec![Vec::new(); mesh.vertices.len()];

        for (id, (face, tag)) in mesh.faces.iter().zip(&mesh.tags).enumerate() {
            triangles.push(NavTriangle::new(id, *face, tag.clone()));
            for &v in face {
                // Triangles arrive in id order, so a repeat can only be the last entry.
                if incidence[v].last() != Some(&id) {
                    incidence[v].push(id);
                }
            }
        }

        for id in 0..triangles.len() {
            cancel.checkpoint()?;
            let neighbors = resolve_neighbors(&triangles, &incidence, id);
            triangles[id].neighbors = neighbors;
        }

        debug!(
            triangles = triangles.len(),
            vertices = incidence.len(),
            "mesh graph built"
        );

        Ok(MeshGraph {
            triangles,
            incidence,
        })
    }

    /// Direct vertex-to-vertex edges observed in the mesh faces.
    ///
    /// Entry `v` holds every vertex sharing a face with `v`, ascending.
    #[must_use]
    pub fn connections<T>(&self, mesh: &IndexedMesh<T>) -> Vec<BTreeSet<usize>> {
        let mut connections = vec![BTreeSet::new(); mesh.vertices.len()];
        for &[a, b, c] in &mesh.faces {
            for (from, to) in [(a, b), (a, c), (b, a), (b, c), (c, a), (c, b)] {
                if from != to {
                    if let Some(set) = connections.get_mut(from) {
                        set.insert(to);
                    }
                }
            }
        }
        connections
    }
}

fn resolve_neighbors<T>(triangles: &[NavTriangle<T>], incidence: &[Vec<usize>], id: usize) -> Vec<usize> {
    let vertices = &triangles[id].vertices;
    let mut seen = HashSet::new();
    let mut neighbors = Vec::new();

    for &v in vertices {
        for &candidate in &incidence[v] {
            if candidate == id || !seen.insert(candidate) {
                continue;
            }
            if shared_vertices(vertices, &triangles[candidate].vertices).len() == 2 {
                neighbors.push(candidate);
            }
        }
    }
    neighbors
}
