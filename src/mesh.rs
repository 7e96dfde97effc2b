//! Mesh containers passed between pipeline stages and handed to callers.

use crate::error::{InputError, Result};
use crate::grid::SpatialGrid;
use crate::math::{is_finite, xz, Point2, Point3};

/// Triangle soup with indices into a shared vertex array.
///
/// `tags` holds one opaque payload per face (for example an area type). It is
/// carried along unchanged by welding and filtering; faces synthesized by
/// hole filling receive `T::default()`.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedMesh<T = i32> {
    /// Vertex positions.
    pub vertices: Vec<Point3>,
    /// Vertex index triples, one per triangle.
    pub faces: Vec<[usize; 3]>,
    /// Per-face payload, aligned with `faces`.
    pub tags: Vec<T>,
}

impl<T> Default for IndexedMesh<T> {
    fn default() -> Self {
        Self {
            vertices: Vec::new(),
            faces: Vec::new(),
            tags: Vec::new(),
        }
    }
}

impl<T: Clone + Default> IndexedMesh<T> {
    /// Creates a mesh whose faces all carry `T::default()`.
    #[must_use]
    pub fn new(vertices: Vec<Point3>, faces: Vec<[usize; 3]>) -> Self {
        let tags = vec![T::default(); faces.len()];
        Self {
            vertices,
            faces,
            tags,
        }
    }

    /// Creates a mesh from a flat index list, three indices per triangle.
    ///
    /// # Errors
    ///
    /// - `InputError::IndexCountNotTriangles` if `indices.len()` is not a multiple of 3
    /// - `InputError::IndexOutOfBounds` for a negative or too large index
    pub fn from_flat(vertices: Vec<Point3>, indices: &[i32]) -> Result<Self> {
        if indices.len() % 3 != 0 {
            return Err(InputError::IndexCountNotTriangles { len: indices.len() }.into());
        }

        let vertex_count = vertices.len();
        let mut flat = Vec::with_capacity(indices.len());
        for (position, &index) in indices.iter().enumerate() {
            match usize::try_from(index) {
                Ok(i) if i < vertex_count => flat.push(i),
                _ => {
                    return Err(InputError::IndexOutOfBounds {
                        index: i64::from(index),
                        position,
                        vertex_count,
                    }
                    .into())
                }
            }
        }

        let faces = flat.chunks_exact(3).map(|c| [c[0], c[1], c[2]]).collect();
        Ok(Self::new(vertices, faces))
    }
}

impl<T> IndexedMesh<T> {
    /// Replaces the per-face payload.
    ///
    /// # Errors
    ///
    /// Returns `InputError::TagCountMismatch` if `tags` is not aligned with the faces.
    pub fn with_tags<U>(self, tags: Vec<U>) -> Result<IndexedMesh<U>> {
        if tags.len() != self.faces.len() {
            return Err(InputError::TagCountMismatch {
                tags: tags.len(),
                triangles: self.faces.len(),
            }
            .into());
        }
        Ok(IndexedMesh {
            vertices: self.vertices,
            faces: self.faces,
            tags,
        })
    }

    /// Checks vertex coordinates, index bounds and tag alignment.
    ///
    /// Every vertex is checked, referenced or not: welding compares all of them.
    ///
    /// # Errors
    ///
    /// - `InputError::NonFiniteVertex` for a NaN or infinite coordinate
    /// - `InputError::IndexOutOfBounds` for an index past the vertex array
    /// - `InputError::TagCountMismatch` if tags and faces differ in length
    pub fn validate(&self) -> Result<()> {
        if let Some(index) = self.vertices.iter().position(|p| !is_finite(p)) {
            return Err(InputError::NonFiniteVertex { index }.into());
        }
        let vertex_count = self.vertices.len();
        for (face_index, face) in self.faces.iter().enumerate() {
            for (corner, &index) in face.iter().enumerate() {
                if index >= vertex_count {
                    return Err(InputError::IndexOutOfBounds {
                        index: i64::try_from(index).unwrap_or(i64::MAX),
                        position: face_index * 3 + corner,
                        vertex_count,
                    }
                    .into());
                }
            }
        }
        if self.tags.len() != self.faces.len() {
            return Err(InputError::TagCountMismatch {
                tags: self.tags.len(),
                triangles: self.faces.len(),
            }
            .into());
        }
        Ok(())
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.faces.len()
    }

    /// Indices flattened back into one list, three per triangle.
    #[must_use]
    pub fn flat_indices(&self) -> Vec<usize> {
        self.faces.iter().flatten().copied().collect()
    }

    /// Appends a face with its payload.
    pub fn push_face(&mut self, face: [usize; 3], tag: T) {
        self.faces.push(face);
        self.tags.push(tag);
    }
}

/// Returns the vertices `a` and `b` have in common, in `a`'s order.
#[must_use]
pub fn shared_vertices(a: &[usize; 3], b: &[usize; 3]) -> Vec<usize> {
    a.iter().filter(|v| b.contains(v)).copied().collect()
}

/// Returns the edge two triangles share, if they share exactly two vertices.
#[must_use]
pub fn shared_edge(a: &[usize; 3], b: &[usize; 3]) -> Option<[usize; 2]> {
    match shared_vertices(a, b).as_slice() {
        &[p, q] => Some([p, q]),
        _ => None,
    }
}

/// A triangle of the navigation graph.
#[derive(Debug, Clone, PartialEq)]
pub struct NavTriangle<T = i32> {
    /// Position of this triangle in its mesh.
    pub id: usize,
    /// Vertex indices, in input order.
    pub vertices: [usize; 3],
    /// Triangles sharing exactly one edge with this one, without duplicates.
    pub neighbors: Vec<usize>,
    /// Border width towards each neighbor, aligned with `neighbors`.
    /// Empty until annotated, and for triangles without neighbors.
    pub border_widths: Vec<f32>,
    /// Opaque per-triangle payload.
    pub tag: T,
}

impl<T> NavTriangle<T> {
    #[must_use]
    pub fn new(id: usize, vertices: [usize; 3], tag: T) -> Self {
        Self {
            id,
            vertices,
            neighbors: Vec::new(),
            border_widths: Vec::new(),
            tag,
        }
    }

    #[must_use]
    pub fn contains_vertex(&self, vertex: usize) -> bool {
        self.vertices.contains(&vertex)
    }

    /// Border width towards `neighbor`, if it is one.
    #[must_use]
    pub fn border_width_to(&self, neighbor: usize) -> Option<f32> {
        let at = self.neighbors.iter().position(|&n| n == neighbor)?;
        self.border_widths.get(at).copied()
    }
}

/// Finished navigation mesh: vertices, triangles with adjacency and border
/// widths, and lookups by vertex and by position.
#[derive(Debug, Clone)]
pub struct NavigationMesh<T = i32> {
    vertices: Vec<Point3>,
    triangles: Vec<NavTriangle<T>>,
    triangles_by_vertex: Vec<Vec<usize>>,
    triangle_grid: SpatialGrid,
}

impl<T> NavigationMesh<T> {
    /// Wraps annotated triangles and builds the lookup tables.
    ///
    /// Every triangle is bucketed under the grid cell of each of its corners.
    #[must_use]
    pub fn new(vertices: Vec<Point3>, triangles: Vec<NavTriangle<T>>, triangle_group_size: f32) -> Self {
        let mut triangles_by_vertex = vec![Vec::new(); vertices.len()];
        let mut triangle_grid = SpatialGrid::new(triangle_group_size);

        for triangle in &triangles {
            for &v in &triangle.vertices {
                if let Some(list) = triangles_by_vertex.get_mut(v) {
                    list.push(triangle.id);
                }
                if let Some(p) = vertices.get(v) {
                    triangle_grid.insert(triangle.id, p);
                }
            }
        }

        Self {
            vertices,
            triangles,
            triangles_by_vertex,
            triangle_grid,
        }
    }

    #[must_use]
    pub fn vertices(&self) -> &[Point3] {
        &self.vertices
    }

    #[must_use]
    pub fn triangles(&self) -> &[NavTriangle<T>] {
        &self.triangles
    }

    #[must_use]
    pub fn triangle(&self, id: usize) -> Option<&NavTriangle<T>> {
        self.triangles.get(id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Vertex positions on the walkable plane (`x`, `z`).
    #[must_use]
    pub fn positions_2d(&self) -> Vec<Point2> {
        self.vertices.iter().map(xz).collect()
    }

    /// Vertex heights (`y`), aligned with [`NavigationMesh::positions_2d`].
    #[must_use]
    pub fn heights(&self) -> Vec<f32> {
        self.vertices.iter().map(|p| p.y).collect()
    }

    /// Triangle vertex indices flattened, three per triangle.
    #[must_use]
    pub fn indices(&self) -> Vec<usize> {
        self.triangles.iter().flat_map(|t| t.vertices).collect()
    }

    /// Ids of the triangles using `vertex`.
    #[must_use]
    pub fn triangles_at_vertex(&self, vertex: usize) -> &[usize] {
        self.triangles_by_vertex
            .get(vertex)
            .map_or(&[][..], Vec::as_slice)
    }

    /// Ids of triangles with a corner in the grid cell of `point` or one of
    /// the eight cells around it.
    #[must_use]
    pub fn triangles_near(&self, point: &Point3) -> Vec<usize> {
        self.triangle_grid.query_point(point, 1)
    }

    /// Consumes the mesh, returning its vertices and triangles.
    #[must_use]
    pub fn into_parts(self) -> (Vec<Point3>, Vec<NavTriangle<T>>) {
        (self.vertices, self.triangles)
    }
}
