use std::collections::{HashMap, VecDeque};

use tracing::{debug, info, warn};

use crate::cancel::CancelToken;
use crate::error::{InputError, Result};
use crate::math::{distance_squared, Point3};
use crate::mesh::IndexedMesh;

use super::graph::MeshGraph;

/// Result of [`FilterReachable`].
#[derive(Debug, Clone)]
pub struct Reachable<T = i32> {
    /// The kept triangles over a freshly compacted vertex array, in
    /// breadth-first visiting order.
    pub mesh: IndexedMesh<T>,
    /// Vertex (in the input numbering) the traversal started from, `None` if
    /// the input had no triangles.
    pub seed_vertex: Option<usize>,
    /// Triangles not reached from the seed.
    pub removed_triangles: usize,
}

/// Keeps only the triangles connected to a seed point.
///
/// # Algorithm
///
/// 1. Pick the vertex closest to the seed among vertices used by at least one
///    triangle that has a neighbor. Isolated triangles are only considered
///    when no vertex qualifies.
/// 2. Breadth-first traversal over triangle adjacency, starting from the first
///    triangle incident to that vertex that has a neighbor. Other triangles
///    that only touch the seed vertex are not pulled in, so the result is one
///    edge-connected component. Each triangle is enqueued at most once.
/// 3. Re-emit the visited triangles over a new vertex array, allocated in
///    visiting order and shared between vertices with identical positions.
#[derive(Debug, Clone, Copy)]
pub struct FilterReachable {
    seed: Point3,
}

impl FilterReachable {
    /// Creates a new `FilterReachable` operation.
    #[must_use]
    pub fn new(seed: Point3) -> Self {
        Self { seed }
    }

    /// Executes the filter over `graph`, whose triangles index `vertices`.
    ///
    /// # Errors
    ///
    /// - `InputError::EmptyVertices` if `vertices` is empty
    /// - `NavoptError::Canceled` if `cancel` fires
    pub fn execute<T: Clone>(
        &self,
        vertices: &[Point3],
        graph: &MeshGraph<T>,
        cancel: &CancelToken,
    ) -> Result<Reachable<T>> {
        if vertices.is_empty() {
            return Err(InputError::EmptyVertices.into());
        }

        let Some(seed_vertex) = self.seed_vertex(vertices, graph) else {
            info!("no triangles to filter");
            return Ok(Reachable {
                mesh: IndexedMesh::default(),
                seed_vertex: None,
                removed_triangles: 0,
            });
        };

        let order = self.traverse(graph, seed_vertex, cancel)?;

        let mut mesh = IndexedMesh::default();
        let mut by_position: HashMap<[u32; 3], usize> = HashMap::new();
        for &t in &order {
            let triangle = &graph.triangles[t];
            let face = triangle.vertices.map(|v| {
                let p = vertices[v];
                *by_position.entry(position_key(&p)).or_insert_with(|| {
                    mesh.vertices.push(p);
                    mesh.vertices.len() - 1
                })
            });
            mesh.push_face(face, triangle.tag.clone());
        }

        let removed_triangles = graph.triangles.len() - order.len();
        info!(
            seed_vertex,
            kept = order.len(),
            removed = removed_triangles,
            vertices = mesh.vertices.len(),
            "unreachable triangles removed"
        );

        Ok(Reachable {
            mesh,
            seed_vertex: Some(seed_vertex),
            removed_triangles,
        })
    }

    fn seed_vertex<T>(&self, vertices: &[Point3], graph: &MeshGraph<T>) -> Option<usize> {
        let mut connected: Option<(usize, f32)> = None;
        let mut any: Option<(usize, f32)> = None;

        for (i, p) in vertices.iter().enumerate() {
            if graph.incidence.get(i).map_or(true, Vec::is_empty) {
                continue;
            }
            let d = distance_squared(&self.seed, p);
            if any.map_or(true, |(_, best)| d < best) {
                any = Some((i, d));
            }
            if graph.vertex_touches_neighbor(i) && connected.map_or(true, |(_, best)| d < best) {
                connected = Some((i, d));
            }
        }

        match (connected, any) {
            (Some((v, d)), _) => {
                debug!(vertex = v, distance = d.sqrt(), "seed vertex chosen");
                Some(v)
            }
            (None, Some((v, _))) => {
                warn!(vertex = v, "no connected triangles, seeding from an isolated triangle");
                Some(v)
            }
            (None, None) => None,
        }
    }

    fn traverse<T>(&self, graph: &MeshGraph<T>, seed_vertex: usize, cancel: &CancelToken) -> Result<Vec<usize>> {
        let incident = &graph.incidence[seed_vertex];
        let start = incident
            .iter()
            .copied()
            .find(|&t| !graph.triangles[t].neighbors.is_empty())
            .or_else(|| incident.first().copied());

        let mut enqueued = vec![false; graph.triangles.len()];
        let mut queue = VecDeque::new();
        if let Some(t) = start {
            debug!(triangle = t, "traversal start");
            enqueued[t] = true;
            queue.push_back(t);
        }

        let mut order = Vec::new();
        while let Some(t) = queue.pop_front() {
            cancel.checkpoint()?;
            order.push(t);
            for &n in &graph.triangles[t].neighbors {
                if !enqueued[n] {
                    enqueued[n] = true;
                    queue.push_back(n);
                }
            }
        }
        Ok(order)
    }
}

/// Exact-equality key for a position; `-0.0` and `0.0` compare equal.
fn position_key(p: &Point3) -> [u32; 3] {
    [(p.x + 0.0).to_bits(), (p.y + 0.0).to_bits(), (p.z + 0.0).to_bits()]
}
