use tracing::info;

use crate::cancel::CancelToken;
use crate::config::BakeParams;
use crate::error::{InputError, NavoptError, Result};
use crate::math::{is_finite, Point3};
use crate::mesh::{IndexedMesh, NavigationMesh};

use super::border_width::AnnotateBorderWidths;
use super::deduplicate::Deduplicate;
use super::fill_holes::FillHoles;
use super::graph::BuildMeshGraph;
use super::reachability::FilterReachable;

/// Raw navmesh plus the point selecting its main component.
#[derive(Debug, Clone, PartialEq)]
pub struct BakeInput<T = i32> {
    pub seed: Point3,
    pub mesh: IndexedMesh<T>,
}

impl<T: Clone + Default> BakeInput<T> {
    /// Builds an input from a flat index list.
    ///
    /// # Errors
    ///
    /// - `InputError::IndexCountNotTriangles` / `InputError::IndexOutOfBounds`
    ///   for malformed indices
    pub fn from_flat(seed: Point3, vertices: Vec<Point3>, indices: &[i32]) -> Result<Self> {
        Ok(Self {
            seed,
            mesh: IndexedMesh::from_flat(vertices, indices)?,
        })
    }
}

/// Per-stage counts of a completed bake.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BakeReport {
    pub merged_vertices: usize,
    pub dropped_triangles: usize,
    pub unreachable_triangles: usize,
    pub snapped_vertices: usize,
    pub filled_triangles: usize,
}

/// How a bake ended. Cancellation is an outcome, not an error.
#[derive(Debug, Clone)]
pub enum BakeOutcome<T = i32> {
    Completed {
        mesh: NavigationMesh<T>,
        report: BakeReport,
    },
    Canceled,
}

impl<T> BakeOutcome<T> {
    #[must_use]
    pub fn is_canceled(&self) -> bool {
        matches!(self, Self::Canceled)
    }

    /// The finished mesh and report, or `None` if the bake was canceled.
    #[must_use]
    pub fn into_completed(self) -> Option<(NavigationMesh<T>, BakeReport)> {
        match self {
            Self::Completed { mesh, report } => Some((mesh, report)),
            Self::Canceled => None,
        }
    }
}

/// Runs the full cleanup pipeline on a raw navmesh.
///
/// # Stages
///
/// 1. [`Deduplicate`] welds near-duplicate vertices.
/// 2. [`BuildMeshGraph`] resolves triangle adjacency.
/// 3. [`FilterReachable`] keeps the component around the seed.
/// 4. [`FillHoles`] closes triangular gaps.
/// 5. [`BuildMeshGraph`] again, on the repaired mesh.
/// 6. [`AnnotateBorderWidths`] computes per-neighbor widths.
///
/// Nothing partial is returned: a failed or canceled bake yields no mesh.
#[derive(Debug, Clone, Default)]
pub struct Bake {
    params: BakeParams,
}

impl Bake {
    /// Creates a new `Bake` operation.
    #[must_use]
    pub fn new(params: BakeParams) -> Self {
        Self { params }
    }

    #[must_use]
    pub fn params(&self) -> &BakeParams {
        &self.params
    }

    /// Executes the pipeline.
    ///
    /// # Errors
    ///
    /// - `InputError::InvalidParams` if the parameters are out of range
    /// - `InputError::EmptyVertices` if the mesh has no vertices
    /// - `InputError::NonFiniteSeed` or `InputError::NonFiniteVertex` for NaN
    ///   or infinite coordinates
    /// - `InputError` variants for out-of-bounds indices or misaligned tags
    pub fn execute<T: Clone + Default>(&self, input: BakeInput<T>, cancel: &CancelToken) -> Result<BakeOutcome<T>> {
        match self.run(input, cancel) {
            Ok((mesh, report)) => Ok(BakeOutcome::Completed { mesh, report }),
            Err(NavoptError::Canceled) => {
                info!("bake canceled");
                Ok(BakeOutcome::Canceled)
            }
            Err(e) => Err(e),
        }
    }

    fn run<T: Clone + Default>(
        &self,
        input: BakeInput<T>,
        cancel: &CancelToken,
    ) -> Result<(NavigationMesh<T>, BakeReport)> {
        self.params.validate()?;
        let BakeInput { seed, mut mesh } = input;
        if mesh.vertices.is_empty() {
            return Err(InputError::EmptyVertices.into());
        }
        if !is_finite(&seed) {
            return Err(InputError::NonFiniteSeed.into());
        }
        mesh.validate()?;
        info!(
            vertices = mesh.vertices.len(),
            triangles = mesh.faces.len(),
            "bake started"
        );

        let dedup = Deduplicate::from_params(&self.params).execute(&mut mesh, cancel)?;
        let graph = BuildMeshGraph::new().execute(&mesh, cancel)?;
        let reachable = FilterReachable::new(seed).execute(&mesh.vertices, &graph, cancel)?;

        let mut mesh = reachable.mesh;
        let fill = FillHoles::from_params(&self.params).execute(&mut mesh, cancel)?;

        let mut graph = BuildMeshGraph::new().execute(&mesh, cancel)?;
        AnnotateBorderWidths::new().execute(&mut graph.triangles, &mesh.vertices, cancel)?;

        let report = BakeReport {
            merged_vertices: dedup.merged_vertices,
            dropped_triangles: dedup.dropped_triangles,
            unreachable_triangles: reachable.removed_triangles,
            snapped_vertices: fill.snapped_vertices,
            filled_triangles: fill.filled_triangles,
        };
        let navmesh = NavigationMesh::new(mesh.vertices, graph.triangles, self.params.triangle_group_size);
        info!(
            vertices = navmesh.vertices().len(),
            triangles = navmesh.triangles().len(),
            ?report,
            "bake finished"
        );
        Ok((navmesh, report))
    }
}
