use serde::{Deserialize, Serialize};

use crate::error::{InputError, Result};

/// Tunable constants of the bake pipeline.
///
/// All distances are in the same units as the mesh coordinates.
///
/// # Example
///
/// ```
/// use navopt::BakeParams;
///
/// let params = BakeParams {
///     overlap_distance: 0.1,
///     ..Default::default()
/// };
/// assert!(params.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BakeParams {
    /// Cell size of the vertex grid used while welding.
    ///
    /// Must be at least `overlap_distance`, otherwise a 3x3 cell query can
    /// miss a neighbor within welding range.
    /// Default: `5.0`
    pub vertex_group_size: f32,

    /// Vertices at or below this distance from each other are welded.
    /// Default: `0.3`
    pub overlap_distance: f32,

    /// Cell size of the triangle lookup grid on the finished mesh.
    /// Default: `10.0`
    pub triangle_group_size: f32,

    /// Tolerance of the point-in-triangle and segment crossing tests.
    /// Default: `0.001`
    pub inside_tolerance: f32,

    /// Extra distance a vertex is pushed past the nearest edge when it is
    /// found inside another triangle.
    /// Default: `0.01`
    pub snap_margin: f32,
}

impl Default for BakeParams {
    fn default() -> Self {
        Self {
            vertex_group_size: 5.0,
            overlap_distance: 0.3,
            triangle_group_size: 10.0,
            inside_tolerance: 0.001,
            snap_margin: 0.01,
        }
    }
}

impl BakeParams {
    /// Checks that every parameter is usable.
    ///
    /// # Errors
    ///
    /// Returns `InputError::InvalidParams` naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        positive("vertex_group_size", self.vertex_group_size)?;
        positive("triangle_group_size", self.triangle_group_size)?;
        non_negative("overlap_distance", self.overlap_distance)?;
        non_negative("inside_tolerance", self.inside_tolerance)?;
        non_negative("snap_margin", self.snap_margin)?;

        if self.vertex_group_size < self.overlap_distance {
            return Err(InputError::InvalidParams {
                name: "vertex_group_size",
                value: self.vertex_group_size,
                reason: "must not be smaller than overlap_distance",
            }
            .into());
        }
        Ok(())
    }
}

fn positive(name: &'static str, value: f32) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(InputError::InvalidParams {
            name,
            value,
            reason: "must be finite and positive",
        }
        .into())
    }
}

fn non_negative(name: &'static str, value: f32) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(InputError::InvalidParams {
            name,
            value,
            reason: "must be finite and non-negative",
        }
        .into())
    }
}
