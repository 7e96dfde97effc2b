use tracing::{debug, info};

use crate::cancel::CancelToken;
use crate::config::BakeParams;
use crate::error::Result;
use crate::grid::SpatialGrid;
use crate::math::distance_squared;
use crate::mesh::IndexedMesh;

/// What a [`Deduplicate`] run changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DedupStats {
    /// Vertices folded into another vertex and removed.
    pub merged_vertices: usize,
    /// Faces dropped because welding collapsed them.
    pub dropped_triangles: usize,
}

/// Welds near-duplicate vertices and drops the faces that collapse.
///
/// # Algorithm
///
/// 1. Bucket every vertex into an XZ grid of `group_size` cells.
/// 2. Visit vertices in index order. A vertex not yet merged absorbs every
///    unmerged vertex of its 3x3 cell block lying within `overlap_distance`;
///    the absorbed vertex leaves the grid and its references are redirected.
/// 3. Compact the vertex array, keeping the relative order of survivors.
/// 4. Drop faces whose three indices are no longer pairwise distinct.
///
/// Survivors are more than `overlap_distance` apart, so a second run on the
/// output changes nothing.
#[derive(Debug, Clone, Copy)]
pub struct Deduplicate {
    overlap_distance: f32,
    group_size: f32,
}

impl Deduplicate {
    /// Creates a new `Deduplicate` operation.
    ///
    /// `group_size` must not be smaller than `overlap_distance`.
    #[must_use]
    pub fn new(overlap_distance: f32, group_size: f32) -> Self {
        Self {
            overlap_distance,
            group_size,
        }
    }

    /// Creates the operation from the welding fields of `params`.
    #[must_use]
    pub fn from_params(params: &BakeParams) -> Self {
        Self::new(params.overlap_distance, params.vertex_group_size)
    }

    /// Executes the operation in place.
    ///
    /// # Errors
    ///
    /// - `InputError` variants if the mesh references missing vertices or
    ///   holds a non-finite coordinate
    /// - `NavoptError::Canceled` if `cancel` fires
    pub fn execute<T>(&self, mesh: &mut IndexedMesh<T>, cancel: &CancelToken) -> Result<DedupStats> {
        mesh.validate()?;

        let vertex_count = mesh.vertices.len();
        let limit_sq = self.overlap_distance * self.overlap_distance;
        let mut grid = SpatialGrid::from_points(self.group_size, &mesh.vertices);
        let mut merged_into: Vec<Option<usize>> = vec![None; vertex_count];

        for current in 0..vertex_count {
            cancel.checkpoint()?;
            if merged_into[current].is_some() {
                continue;
            }

            let position = mesh.vertices[current];
            for other in grid.query_point(&position, 1) {
                if other == current || merged_into[other].is_some() {
                    continue;
                }
                // NaN distances never weld.
                let within = distance_squared(&position, &mesh.vertices[other]) <= limit_sq;
                if !within {
                    continue;
                }
                merged_into[other] = Some(current);
                grid.remove(other, &mesh.vertices[other]);
                debug!(from = other, into = current, "vertex welded");
            }
        }

        let merged_vertices = merged_into.iter().filter(|m| m.is_some()).count();
        let remap = compaction_map(&merged_into);

        let mut kept = 0;
        mesh.vertices.retain(|_| {
            let keep = merged_into[kept].is_none();
            kept += 1;
            keep
        });

        let before = mesh.faces.len();
        let faces = std::mem::take(&mut mesh.faces);
        let tags = std::mem::take(&mut mesh.tags);
        let survivor_count = mesh.vertices.len();
        (mesh.faces, mesh.tags) = faces
            .into_iter()
            .zip(tags)
            .filter_map(|([a, b, c], tag)| {
                let face = [remap[a], remap[b], remap[c]];
                let distinct = face[0] != face[1] && face[0] != face[2] && face[1] != face[2];
                let in_bounds = face.iter().all(|&v| v < survivor_count);
                (distinct && in_bounds).then_some((face, tag))
            })
            .unzip();

        let stats = DedupStats {
            merged_vertices,
            dropped_triangles: before - mesh.faces.len(),
        };
        info!(
            merged = stats.merged_vertices,
            dropped = stats.dropped_triangles,
            vertices = mesh.vertices.len(),
            triangles = mesh.faces.len(),
            "duplicate vertices welded"
        );
        Ok(stats)
    }
}

/// Maps every original vertex index to its index in the compacted array,
/// following merges to the surviving vertex.
fn compaction_map(merged_into: &[Option<usize>]) -> Vec<usize> {
    let mut compacted = Vec::with_capacity(merged_into.len());
    let mut next = 0;
    for merged in merged_into {
        compacted.push(next);
        if merged.is_none() {
            next += 1;
        }
    }

    (0..merged_into.len())
        .map(|mut v| {
            while let Some(target) = merged_into[v] {
                v = target;
            }
            compacted[v]
        })
        .collect()
}
