//! End-to-end bake tests.
//!
//! Each scenario runs the full pipeline and then checks the structural
//! properties every baked navmesh must have: clean adjacency, one connected
//! component, aligned non-negative border widths and no overlapping
//! triangles on the walkable plane.

#![allow(clippy::unwrap_used)]

use std::collections::VecDeque;

use navopt::math::intersect_2d::triangles_cross_2d;
use navopt::math::triangle_2d::{centroid_2d, point_in_triangle_2d};
use navopt::math::{xz, Point2, Point3};
use navopt::mesh::shared_vertices;
use navopt::record::NavMeshRecord;
use navopt::{Bake, BakeInput, BakeReport, CancelToken, IndexedMesh, InputError, NavigationMesh, NavoptError};
use tracing_subscriber::EnvFilter;

const TOLERANCE: f32 = 0.001;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn bake(input: BakeInput) -> (NavigationMesh, BakeReport) {
    init_tracing();
    Bake::default()
        .execute(input, &CancelToken::new())
        .unwrap()
        .into_completed()
        .unwrap()
}

fn flat(points: &[(f32, f32)]) -> Vec<Point3> {
    points.iter().map(|&(x, z)| Point3::new(x, 0.0, z)).collect()
}

fn corners(mesh: &NavigationMesh, id: usize) -> [Point2; 3] {
    mesh.triangles()[id].vertices.map(|v| xz(&mesh.vertices()[v]))
}

// =============================================================================
// Structural checks
// =============================================================================

fn assert_adjacency(mesh: &NavigationMesh) {
    for t in mesh.triangles() {
        assert!(!t.neighbors.contains(&t.id), "triangle {} lists itself", t.id);
        for (k, &n) in t.neighbors.iter().enumerate() {
            assert!(!t.neighbors[k + 1..].contains(&n), "duplicate neighbor {n} of {}", t.id);
            let other = &mesh.triangles()[n];
            assert!(other.neighbors.contains(&t.id), "{} -> {n} is not symmetric", t.id);
            assert_eq!(shared_vertices(&t.vertices, &other.vertices).len(), 2);
        }
    }
}

fn assert_single_component(mesh: &NavigationMesh) {
    let count = mesh.triangles().len();
    if count == 0 {
        return;
    }
    if count > 1 {
        assert!(mesh.triangles().iter().all(|t| !t.neighbors.is_empty()));
    }

    let mut seen = vec![false; count];
    let mut queue = VecDeque::from([0]);
    seen[0] = true;
    while let Some(t) = queue.pop_front() {
        for &n in &mesh.triangles()[t].neighbors {
            if !seen[n] {
                seen[n] = true;
                queue.push_back(n);
            }
        }
    }
    assert!(seen.iter().all(|&s| s), "mesh has more than one component");
}

fn assert_border_widths(mesh: &NavigationMesh) {
    for t in mesh.triangles() {
        assert_eq!(t.border_widths.len(), t.neighbors.len());
        assert!(t.border_widths.iter().all(|&w| w >= 0.0));
    }
}

fn assert_no_overlap(mesh: &NavigationMesh) {
    let count = mesh.triangles().len();
    for i in 0..count {
        let a = corners(mesh, i);
        let center_a = centroid_2d(&a[0], &a[1], &a[2]);
        for j in (i + 1)..count {
            let b = corners(mesh, j);
            let center_b = centroid_2d(&b[0], &b[1], &b[2]);
            assert!(!triangles_cross_2d(&a, &b, TOLERANCE), "triangles {i} and {j} cross");
            assert!(!point_in_triangle_2d(&center_a, &b[0], &b[1], &b[2], TOLERANCE));
            assert!(!point_in_triangle_2d(&center_b, &a[0], &a[1], &a[2], TOLERANCE));
        }
    }
}

fn assert_well_formed(mesh: &NavigationMesh) {
    assert_adjacency(mesh);
    assert_single_component(mesh);
    assert_border_widths(mesh);
    assert_no_overlap(mesh);
}

// =============================================================================
// Fixtures
// =============================================================================

const N: usize = 6;

/// Sloped 5x5 quad grid with one missing triangle at cell (2, 2), cell (4, 4)
/// drawn over its own slightly offset vertex copies, and a lone triangle far
/// away. Every face is tagged 1.
#[allow(clippy::cast_precision_loss)]
fn terrain() -> BakeInput {
    let idx = |i: usize, j: usize| j * N + i;
    let mut vertices: Vec<Point3> = (0..N * N)
        .map(|k| {
            let (i, j) = (k % N, k / N);
            Point3::new(i as f32, 0.1 * i as f32, j as f32)
        })
        .collect();

    let mut faces = Vec::new();
    for j in 0..N - 1 {
        for i in 0..N - 1 {
            let (a, b, c, d) = (idx(i, j), idx(i + 1, j), idx(i, j + 1), idx(i + 1, j + 1));
            if (i, j) == (4, 4) {
                let base = vertices.len();
                for v in [a, b, c, d] {
                    let p = vertices[v];
                    vertices.push(Point3::new(p.x + 0.05, p.y, p.z + 0.05));
                }
                faces.push([base, base + 1, base + 3]);
                faces.push([base, base + 3, base + 2]);
                continue;
            }
            faces.push([a, b, d]);
            if (i, j) != (2, 2) {
                faces.push([a, d, c]);
            }
        }
    }

    let base = vertices.len();
    vertices.extend(flat(&[(50.0, 50.0), (51.0, 50.0), (50.0, 51.0)]));
    faces.push([base, base + 1, base + 2]);

    let tags = vec![1; faces.len()];
    BakeInput {
        seed: Point3::new(-0.5, 0.0, -0.5),
        mesh: IndexedMesh::<i32>::new(vertices, faces).with_tags(tags).unwrap(),
    }
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn single_triangle_drops_unused_vertex() {
    let input = BakeInput::from_flat(
        Point3::new(0.5, 0.0, 0.5),
        flat(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]),
        &[0, 1, 2],
    )
    .unwrap();
    let (mesh, report) = bake(input);

    assert_eq!(report, BakeReport::default());
    assert_eq!(mesh.triangles().len(), 1);
    assert_eq!(mesh.vertices().len(), 3);
    assert!(mesh.triangles()[0].neighbors.is_empty());
    assert!(mesh.triangles()[0].border_widths.is_empty());
}

#[test]
fn close_vertices_are_welded() {
    // Vertex 3 sits 0.1 from vertex 0; after welding the faces share 0-1.
    let vertices = vec![
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(0.0, 0.0, 1.0),
        Point3::new(-1.0, 0.0, 0.5),
        Point3::new(0.1, 0.0, 0.0),
        Point3::new(1.0, 0.0, 0.5),
    ];
    let input = BakeInput {
        seed: Point3::new(0.0, 0.0, 0.5),
        mesh: IndexedMesh::new(vertices, vec![[0, 1, 2], [3, 1, 4]]),
    };
    let (mesh, report) = bake(input);

    assert_eq!(report.merged_vertices, 1);
    assert_eq!(mesh.vertices().len(), 4);
    assert_eq!(mesh.triangles().len(), 2);
    assert_eq!(mesh.triangles()[0].neighbors, vec![1]);
    assert_well_formed(&mesh);
}

#[test]
fn isolated_island_is_not_used_as_seed() {
    let vertices = flat(&[
        (0.0, 0.0),
        (1.0, 0.0),
        (0.0, 1.0),
        (10.0, 0.0),
        (11.0, 0.0),
        (11.0, 1.0),
        (10.0, 1.0),
    ]);
    let input = BakeInput {
        seed: Point3::new(0.2, 0.0, 0.2),
        mesh: IndexedMesh::new(vertices, vec![[0, 1, 2], [3, 4, 5], [3, 5, 6]]),
    };
    let (mesh, report) = bake(input);

    assert_eq!(report.unreachable_triangles, 1);
    assert_eq!(mesh.triangles().len(), 2);
    assert!(mesh.vertices().iter().all(|p| p.x >= 10.0));
    assert_well_formed(&mesh);
}

#[test]
fn enclosed_hole_is_closed() {
    // Ring of seven triangles around the uncovered triangle D-E-F.
    let vertices = flat(&[
        (0.0, 0.0),
        (4.0, 0.0),
        (2.0, 4.0),
        (2.0, 0.0),
        (3.0, 2.0),
        (1.0, 2.0),
        (2.0, -2.0),
        (4.5, 3.0),
    ]);
    let faces = vec![[0, 3, 5], [3, 1, 4], [5, 4, 2], [0, 6, 3], [6, 1, 3], [1, 7, 4], [7, 2, 4]];
    let input = BakeInput {
        seed: Point3::new(2.0, 0.0, 1.0),
        mesh: IndexedMesh::new(vertices, faces),
    };
    let (mesh, report) = bake(input);

    assert_eq!(report.filled_triangles, 1);
    assert_eq!(mesh.triangles().len(), 8);

    let hole = [Point2::new(2.0, 0.0), Point2::new(3.0, 2.0), Point2::new(1.0, 2.0)];
    let filled = (0..mesh.triangles().len())
        .find(|&id| corners(&mesh, id).iter().all(|p| hole.contains(p)))
        .map(|id| &mesh.triangles()[id]);
    let Some(filled) = filled else {
        panic!("hole triangle missing");
    };
    assert_eq!(filled.neighbors.len(), 3);
    assert_eq!(filled.tag, 0);
    assert_well_formed(&mesh);
}

#[test]
fn terrain_bake_cleans_everything() {
    let (mesh, report) = bake(terrain());

    assert_eq!(
        report,
        BakeReport {
            merged_vertices: 4,
            dropped_triangles: 0,
            unreachable_triangles: 1,
            snapped_vertices: 0,
            filled_triangles: 1,
        }
    );
    assert_eq!(mesh.vertices().len(), N * N);
    assert_eq!(mesh.triangles().len(), 50);
    assert_eq!(mesh.triangles().iter().filter(|t| t.tag == 0).count(), 1);
    assert_well_formed(&mesh);
}

#[test]
fn terrain_lookups_agree_with_triangles() {
    let (mesh, _) = bake(terrain());

    for v in 0..mesh.vertices().len() {
        for &t in mesh.triangles_at_vertex(v) {
            assert!(mesh.triangles()[t].contains_vertex(v));
        }
    }

    let query = Point3::new(2.5, 0.0, 2.5);
    let near = mesh.triangles_near(&query);
    assert!(!near.is_empty());
    assert!(near.iter().all(|&t| t < mesh.triangles().len()));

    assert_eq!(mesh.positions_2d().len(), mesh.heights().len());
    assert_eq!(mesh.indices().len(), mesh.triangles().len() * 3);
}

#[test]
fn quads_touching_at_one_vertex_keep_one_side() {
    // Two quads share only the seed vertex; no edge joins them.
    let vertices = flat(&[
        (0.0, 0.0),
        (1.0, 0.0),
        (1.0, 1.0),
        (0.0, 1.0),
        (-1.0, 0.0),
        (-1.0, -1.0),
        (0.0, -1.0),
    ]);
    let input = BakeInput {
        seed: Point3::origin(),
        mesh: IndexedMesh::new(vertices, vec![[0, 1, 2], [0, 2, 3], [0, 4, 5], [0, 5, 6]]),
    };
    let (mesh, report) = bake(input);

    assert_eq!(report.unreachable_triangles, 2);
    assert_eq!(mesh.triangles().len(), 2);
    assert_eq!(mesh.vertices().len(), 4);
    assert_well_formed(&mesh);
}

#[test]
fn far_coordinates_bake_without_overflow() {
    // At 3e10 the grid cell index clamps to i32::MAX.
    let input = BakeInput::from_flat(
        Point3::new(3.0e10, 0.0, 0.0),
        vec![
            Point3::new(3.0e10, 0.0, 0.0),
            Point3::new(3.0e10, 0.0, 4096.0),
            Point3::new(3.0e10 + 8192.0, 0.0, 0.0),
        ],
        &[0, 1, 2],
    )
    .unwrap();
    let (mesh, report) = bake(input);

    assert_eq!(report, BakeReport::default());
    assert_eq!(mesh.triangles().len(), 1);
    assert_eq!(mesh.vertices().len(), 3);
}

#[test]
fn bake_is_deterministic() {
    let (first, _) = bake(terrain());
    let (second, _) = bake(terrain());
    assert_eq!(NavMeshRecord::from(&first), NavMeshRecord::from(&second));
}

#[test]
fn canceled_bake_returns_no_mesh() {
    init_tracing();
    let cancel = CancelToken::new();
    cancel.cancel();
    let outcome = Bake::default().execute(terrain(), &cancel);
    assert!(matches!(outcome, Ok(outcome) if outcome.is_canceled()));
}

// =============================================================================
// Preconditions
// =============================================================================

#[test]
fn index_count_must_be_triangles() {
    let err = BakeInput::<i32>::from_flat(Point3::origin(), flat(&[(0.0, 0.0), (1.0, 0.0)]), &[0, 1]);
    assert!(matches!(
        err,
        Err(NavoptError::Input(InputError::IndexCountNotTriangles { len: 2 }))
    ));
}

#[test]
fn out_of_bounds_index_rejected() {
    let err = BakeInput::<i32>::from_flat(
        Point3::origin(),
        flat(&[(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)]),
        &[0, 1, 3],
    );
    assert!(matches!(
        err,
        Err(NavoptError::Input(InputError::IndexOutOfBounds {
            index: 3,
            position: 2,
            vertex_count: 3
        }))
    ));
}

#[test]
fn nan_vertex_rejected_even_when_unused() {
    // Vertex 0 is referenced by no face but would sit in the quad's cell.
    let mut vertices = flat(&[(0.0, 0.0), (0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
    vertices[0] = Point3::new(f32::NAN, 0.0, f32::NAN);
    let input: BakeInput = BakeInput::from_flat(Point3::new(0.5, 0.0, 0.5), vertices, &[1, 2, 3, 1, 3, 4]).unwrap();
    let result = Bake::default().execute(input, &CancelToken::new());
    assert!(matches!(
        result,
        Err(NavoptError::Input(InputError::NonFiniteVertex { index: 0 }))
    ));
}

#[test]
fn infinite_seed_rejected() {
    let input: BakeInput = BakeInput::from_flat(
        Point3::new(f32::INFINITY, 0.0, 0.0),
        flat(&[(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)]),
        &[0, 1, 2],
    )
    .unwrap();
    let result = Bake::default().execute(input, &CancelToken::new());
    assert!(matches!(result, Err(NavoptError::Input(InputError::NonFiniteSeed))));
}

#[test]
fn empty_vertices_rejected() {
    let input: BakeInput = BakeInput {
        seed: Point3::origin(),
        mesh: IndexedMesh::default(),
    };
    let result = Bake::default().execute(input, &CancelToken::new());
    assert!(matches!(
        result,
        Err(NavoptError::Input(InputError::EmptyVertices))
    ));
}
