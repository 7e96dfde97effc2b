//! Uniform 2D bucketing of indices by position on the walkable plane.

use std::collections::{HashMap, HashSet};

use crate::math::Point3;

/// Integer cell coordinates `(floor(x / size), floor(z / size))`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellKey {
    pub x: i32,
    pub z: i32,
}

impl CellKey {
    #[must_use]
    pub fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// The cell `dx, dz` steps away, or `None` past the edge of the key range.
    #[must_use]
    pub fn offset(self, dx: i32, dz: i32) -> Option<Self> {
        Some(Self::new(self.x.checked_add(dx)?, self.z.checked_add(dz)?))
    }
}

/// Buckets indices (of vertices or triangles) into square XZ cells.
///
/// Each cell keeps its indices in insertion order, so queries are
/// deterministic for a given insertion sequence.
#[derive(Debug, Clone)]
pub struct SpatialGrid {
    cell_size: f32,
    cells: HashMap<CellKey, Vec<usize>>,
}

impl SpatialGrid {
    /// Creates an empty grid. `cell_size` must be positive.
    #[must_use]
    pub fn new(cell_size: f32) -> Self {
        Self {
            cell_size,
            cells: HashMap::new(),
        }
    }

    /// Builds a grid holding every index of `positions`.
    #[must_use]
    pub fn from_points(cell_size: f32, positions: &[Point3]) -> Self {
        let mut grid = Self::new(cell_size);
        for (i, p) in positions.iter().enumerate() {
            grid.insert(i, p);
        }
        grid
    }

    #[must_use]
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Cell containing `position`. Height is ignored; coordinates past the
    /// `i32` key range clamp to its edges.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn cell_of(&self, position: &Point3) -> CellKey {
        CellKey::new(
            (position.x / self.cell_size).floor() as i32,
            (position.z / self.cell_size).floor() as i32,
        )
    }

    /// Places `index` into the cell of `position`. Re-inserting an index
    /// already present in that cell is a no-op.
    pub fn insert(&mut self, index: usize, position: &Point3) {
        let key = self.cell_of(position);
        let bucket = self.cells.entry(key).or_default();
        if !bucket.contains(&index) {
            bucket.push(index);
        }
    }

    /// Removes `index` from the cell of `position`. Returns `false` if it was
    /// not there.
    pub fn remove(&mut self, index: usize, position: &Point3) -> bool {
        let key = self.cell_of(position);
        let Some(bucket) = self.cells.get_mut(&key) else {
            return false;
        };
        let Some(at) = bucket.iter().position(|&i| i == index) else {
            return false;
        };
        bucket.remove(at);
        if bucket.is_empty() {
            self.cells.remove(&key);
        }
        true
    }

    /// Indices stored in exactly this cell.
    #[must_use]
    pub fn cell(&self, key: CellKey) -> &[usize] {
        self.cells.get(&key).map_or(&[][..], Vec::as_slice)
    }

    /// Union of the indices in `center` and every cell within `radius` cells
    /// of it (`radius = 1` is the 3x3 block, `2` the 5x5 block).
    ///
    /// Cells are visited row by row from the lowest `x, z` offset; each index
    /// appears once, at its first occurrence.
    #[must_use]
    pub fn query(&self, center: CellKey, radius: i32) -> Vec<usize> {
        let mut seen = HashSet::new();
        let mut result = Vec::new();
        for dx in -radius..=radius {
            for dz in -radius..=radius {
                let Some(key) = center.offset(dx, dz) else {
                    continue;
                };
                for &index in self.cell(key) {
                    if seen.insert(index) {
                        result.push(index);
                    }
                }
            }
        }
        result
    }

    /// [`SpatialGrid::query`] around the cell of `position`.
    #[must_use]
    pub fn query_point(&self, position: &Point3, radius: i32) -> Vec<usize> {
        self.query(self.cell_of(position), radius)
    }

    /// Number of non-empty cells.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }
}
