use tracing::debug;

use crate::cancel::CancelToken;
use crate::error::Result;
use crate::math::Point3;
use crate::mesh::{shared_edge, NavTriangle};

/// Fills `border_widths` of every triangle, aligned with its `neighbors`.
///
/// The width towards a neighbor is the 3D length of the shared edge. When a
/// later neighbor in the list (`i + 2`, else `i + 1`) is itself adjacent to
/// neighbor `i`, the two edges form one border run: the summed length is
/// stored at both positions. Later neighbors overwrite earlier entries.
/// Triangles without neighbors get an empty list.
#[derive(Debug, Default, Clone, Copy)]
pub struct AnnotateBorderWidths;

impl AnnotateBorderWidths {
    /// Creates a new `AnnotateBorderWidths` operation.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Executes the operation in place.
    ///
    /// # Errors
    ///
    /// - `NavoptError::Canceled` if `cancel` fires
    pub fn execute<T>(&self, triangles: &mut [NavTriangle<T>], vertices: &[Point3], cancel: &CancelToken) -> Result<()> {
        for id in 0..triangles.len() {
            cancel.checkpoint()?;
            let widths = border_widths(triangles, vertices, id);
            triangles[id].border_widths = widths;
        }
        debug!(triangles = triangles.len(), "border widths annotated");
        Ok(())
    }
}

fn border_widths<T>(triangles: &[NavTriangle<T>], vertices: &[Point3], id: usize) -> Vec<f32> {
    let neighbors = &triangles[id].neighbors;
    let n = neighbors.len();
    let mut widths = vec![0.0; n];

    for (i, &other) in neighbors.iter().enumerate() {
        let Some(mut width) = edge_length(triangles, vertices, id, other) else {
            continue;
        };

        let linked = &triangles[other].neighbors;
        let run_end = if i + 2 < n {
            if linked.contains(&neighbors[i + 2]) {
                Some(i + 2)
            } else if linked.contains(&neighbors[i + 1]) {
                Some(i + 1)
            } else {
                None
            }
        } else if i + 1 < n && linked.contains(&neighbors[i + 1]) {
            Some(i + 1)
        } else {
            None
        };

        if let Some(end) = run_end {
            if let Some(extra) = edge_length(triangles, vertices, id, neighbors[end]) {
                width += extra;
                widths[end] = width;
            }
        }
        widths[i] = width;
    }
    widths
}

fn edge_length<T>(triangles: &[NavTriangle<T>], vertices: &[Point3], a: usize, b: usize) -> Option<f32> {
    shared_edge(&triangles[a].vertices, &triangles[b].vertices).map(|[p, q]| (vertices[p] - vertices[q]).norm())
}
