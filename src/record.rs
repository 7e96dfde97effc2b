//! Plain serializable records for bake inputs and results.
//!
//! Two input layouts are accepted: [`BakeRecord`], with one `[x, y, z]` array
//! per vertex, and [`SceneExport`], the column layout written by the scene
//! exporter (`cleanPoint` plus separate `x`, `y` and `z` columns).

use serde::{Deserialize, Serialize};

use crate::error::{InputError, NavoptError, Result};
use crate::math::Point3;
use crate::mesh::{IndexedMesh, NavigationMesh};
use crate::operations::BakeInput;

fn point(p: [f32; 3]) -> Point3 {
    Point3::new(p[0], p[1], p[2])
}

fn array(p: &Point3) -> [f32; 3] {
    [p.x, p.y, p.z]
}

/// Bake input with row-major vertices.
///
/// # Example
///
/// ```
/// use navopt::record::BakeRecord;
///
/// let record = BakeRecord::from_json(
///     r#"{"seedPoint":[0,0,0],"vertices":[[0,0,0],[1,0,0],[0,0,1]],"indices":[0,1,2]}"#,
/// )
/// .unwrap();
/// let input = record.into_input().unwrap();
/// assert_eq!(input.mesh.triangle_count(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BakeRecord {
    pub seed_point: [f32; 3],
    pub vertices: Vec<[f32; 3]>,
    /// Flat vertex indices, three per triangle.
    pub indices: Vec<i32>,
    /// Optional per-triangle tag, aligned with the index triples.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<i32>>,
}

impl BakeRecord {
    /// Captures an input, tags included.
    ///
    /// # Errors
    ///
    /// Returns `InputError::IndexOutOfBounds` for an index that does not fit
    /// the record's `i32` index column.
    pub fn from_input(input: &BakeInput) -> Result<Self> {
        let vertex_count = input.mesh.vertex_count();
        let indices = input
            .mesh
            .flat_indices()
            .into_iter()
            .enumerate()
            .map(|(position, i)| {
                i32::try_from(i).map_err(|_| InputError::IndexOutOfBounds {
                    index: i64::try_from(i).unwrap_or(i64::MAX),
                    position,
                    vertex_count,
                })
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Self {
            seed_point: array(&input.seed),
            vertices: input.mesh.vertices.iter().map(array).collect(),
            indices,
            tags: Some(input.mesh.tags.clone()),
        })
    }

    /// Converts the record into a validated [`BakeInput`].
    ///
    /// # Errors
    ///
    /// - `InputError` variants for malformed indices or misaligned tags
    pub fn into_input(self) -> Result<BakeInput> {
        let vertices = self.vertices.into_iter().map(point).collect();
        let mesh: IndexedMesh = IndexedMesh::from_flat(vertices, &self.indices)?;
        let mesh = match self.tags {
            Some(tags) => mesh.with_tags(tags)?,
            None => mesh,
        };
        Ok(BakeInput {
            seed: point(self.seed_point),
            mesh,
        })
    }

    /// Serializes the record to JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(NavoptError::from)
    }

    /// Deserializes a record from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(NavoptError::from)
    }
}

/// `{x, y, z}` object used by the column layout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointRecord {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl From<PointRecord> for Point3 {
    fn from(p: PointRecord) -> Self {
        Point3::new(p.x, p.y, p.z)
    }
}

/// Vertex, triangle and index counts a scene export expects after baking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpectedCounts {
    pub vertices: usize,
    pub triangles: usize,
    pub indices: usize,
}

impl ExpectedCounts {
    /// Returns `true` if `mesh` has exactly the expected sizes.
    #[must_use]
    pub fn matches<T>(&self, mesh: &NavigationMesh<T>) -> bool {
        mesh.vertices().len() == self.vertices
            && mesh.triangles().len() == self.triangles
            && mesh.triangles().len() * 3 == self.indices
    }
}

/// Column layout written by the scene exporter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneExport {
    #[serde(rename = "cleanPoint")]
    pub clean_point: PointRecord,
    pub x: Vec<f32>,
    pub y: Vec<f32>,
    pub z: Vec<f32>,
    pub indices: Vec<i32>,
    #[serde(rename = "finalVertexCount", default, skip_serializing_if = "Option::is_none")]
    pub final_vertex_count: Option<usize>,
    #[serde(rename = "finalTriangleCount", default, skip_serializing_if = "Option::is_none")]
    pub final_triangle_count: Option<usize>,
    #[serde(rename = "finalIndicesCount", default, skip_serializing_if = "Option::is_none")]
    pub final_indices_count: Option<usize>,
}

impl SceneExport {
    /// Deserializes an export from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(NavoptError::from)
    }

    /// Expected bake result sizes, when the export records all three.
    #[must_use]
    pub fn expected_counts(&self) -> Option<ExpectedCounts> {
        Some(ExpectedCounts {
            vertices: self.final_vertex_count?,
            triangles: self.final_triangle_count?,
            indices: self.final_indices_count?,
        })
    }

    /// Zips the coordinate columns into vertices and validates the indices.
    ///
    /// # Errors
    ///
    /// - `InputError::ColumnLengthMismatch` if the columns differ in length
    /// - `InputError` variants for malformed indices
    pub fn into_input(self) -> Result<BakeInput> {
        if self.x.len() != self.y.len() || self.x.len() != self.z.len() {
            return Err(InputError::ColumnLengthMismatch {
                x: self.x.len(),
                y: self.y.len(),
                z: self.z.len(),
            }
            .into());
        }
        let vertices = self
            .x
            .iter()
            .zip(&self.y)
            .zip(&self.z)
            .map(|((&x, &y), &z)| Point3::new(x, y, z))
            .collect();
        BakeInput::from_flat(self.clean_point.into(), vertices, &self.indices)
    }
}

/// One baked triangle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriangleRecord<T = i32> {
    pub id: usize,
    pub vertices: [usize; 3],
    pub neighbors: Vec<usize>,
    pub border_widths: Vec<f32>,
    pub tag: T,
}

/// Baked navigation mesh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavMeshRecord<T = i32> {
    pub vertices: Vec<[f32; 3]>,
    pub triangles: Vec<TriangleRecord<T>>,
}

impl<T: Clone> From<&NavigationMesh<T>> for NavMeshRecord<T> {
    fn from(mesh: &NavigationMesh<T>) -> Self {
        Self {
            vertices: mesh.vertices().iter().map(array).collect(),
            triangles: mesh
                .triangles()
                .iter()
                .map(|t| TriangleRecord {
                    id: t.id,
                    vertices: t.vertices,
                    neighbors: t.neighbors.clone(),
                    border_widths: t.border_widths.clone(),
                    tag: t.tag.clone(),
                })
                .collect(),
        }
    }
}

impl<T: Serialize> NavMeshRecord<T> {
    /// Serializes the record to pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(NavoptError::from)
    }
}
