//! Analytic mesh generators.
//!
//! These build the standard test and benchmark tilings: the cubed sphere
//! (gnomonic projection of a subdivided cube) and the latitude-longitude
//! grid. Both produce closed, counter-clockwise-wound meshes.

// Generator output is manifold by construction
#![allow(clippy::expect_used)]

use hashbrown::HashMap;

use crate::edge::EdgeKind;
use crate::face::Face;
use crate::mesh::SphereMesh;
use crate::node::Node;

/// The six cube panels as integer lattice frames: start corner and the two
/// step directions, in units of `1/n`. Each frame satisfies
/// `du x dv = outward normal`, which makes the cell loops counter-clockwise
/// from outside.
const PANELS: [([i64; 3], [i64; 3], [i64; 3]); 6] = [
    ([1, -1, -1], [0, 2, 0], [0, 0, 2]),   // +x
    ([-1, 1, -1], [0, -2, 0], [0, 0, 2]),  // -x
    ([1, 1, -1], [-2, 0, 0], [0, 0, 2]),   // +y
    ([-1, -1, -1], [2, 0, 0], [0, 0, 2]),  // -y
    ([-1, -1, 1], [2, 0, 0], [0, 2, 0]),   // +z
    ([-1, -1, -1], [0, 2, 0], [2, 0, 0]),  // -z
];

/// A cube projected to the sphere: 8 nodes and 6 spherical quads.
///
/// # Example
///
/// ```
/// use sphere_types::cube_sphere;
///
/// let mesh = cube_sphere();
/// assert_eq!(mesh.node_count(), 8);
/// assert_eq!(mesh.face_count(), 6);
/// ```
#[must_use]
pub fn cube_sphere() -> SphereMesh {
    subdivided_cube_sphere(1)
}

/// A cubed-sphere mesh with `n x n` cells per cube panel (`6 * n * n` faces).
///
/// Panel grids are gnomonic: lattice points on the cube surface projected
/// radially onto the sphere, so cell boundaries are great-circle arcs.
/// Nodes on shared panel edges and corners are reused, making the mesh
/// closed. `n == 0` is treated as 1.
///
/// # Example
///
/// ```
/// use sphere_types::subdivided_cube_sphere;
///
/// let mesh = subdivided_cube_sphere(2);
/// assert_eq!(mesh.face_count(), 24);
/// assert_eq!(mesh.node_count(), 26);
/// assert!(mesh.is_closed());
/// ```
#[must_use]
#[allow(clippy::cast_possible_wrap)]
pub fn subdivided_cube_sphere(n: usize) -> SphereMesh {
    let n = n.max(1);
    let step = n as i64;

    let mut nodes: Vec<Node> = Vec::new();
    let mut lattice: HashMap<[i64; 3], usize> = HashMap::new();
    let mut faces: Vec<Face> = Vec::with_capacity(6 * n * n);

    for (start, du, dv) in PANELS {
        // Lattice coordinates of every grid point on this panel, in units
        // of 1/n. Integer keys make shared panel boundaries dedupe exactly.
        let point = |i: i64, j: i64| -> [i64; 3] {
            [
                start[0] * step + du[0] * i + dv[0] * j,
                start[1] * step + du[1] * i + dv[1] * j,
                start[2] * step + du[2] * i + dv[2] * j,
            ]
        };

        let mut grid = vec![0usize; (n + 1) * (n + 1)];
        for i in 0..=step {
            for j in 0..=step {
                let key = point(i, j);
                let ix = *lattice.entry(key).or_insert_with(|| {
                    let node = Node::from_coords(
                        key[0] as f64 / n as f64,
                        key[1] as f64 / n as f64,
                        key[2] as f64 / n as f64,
                    )
                    .normalized();
                    nodes.push(node);
                    nodes.len() - 1
                });
                grid[(i as usize) * (n + 1) + j as usize] = ix;
            }
        }

        for i in 0..n {
            for j in 0..n {
                let at = |a: usize, b: usize| grid[a * (n + 1) + b];
                faces.push(Face::from_node_loop(
                    &[at(i, j), at(i + 1, j), at(i + 1, j + 1), at(i, j + 1)],
                    EdgeKind::GreatCircle,
                ));
            }
        }
    }

    SphereMesh::from_parts(nodes, faces).expect("cubed sphere is manifold")
}

/// A latitude-longitude grid with `nlon` columns and `nlat` latitude bands.
///
/// Band boundaries are constant-latitude arcs; column boundaries are
/// meridian (great-circle) arcs. The two polar bands are triangles ending at
/// the pole nodes, so no face carries a degenerate edge. `nlon` is clamped
/// to at least 3 (shorter-arc semantics need spacing under 180 degrees) and
/// `nlat` to at least 2.
///
/// # Example
///
/// ```
/// use sphere_types::latlon_grid;
///
/// let mesh = latlon_grid(4, 2);
/// assert_eq!(mesh.node_count(), 6); // two poles and one equator ring
/// assert_eq!(mesh.face_count(), 8);
/// assert!(mesh.is_closed());
/// ```
#[must_use]
pub fn latlon_grid(nlon: usize, nlat: usize) -> SphereMesh {
    use std::f64::consts::PI;

    let nlon = nlon.max(3);
    let nlat = nlat.max(2);

    let mut nodes = vec![
        Node::from_coords(0.0, 0.0, 1.0),
        Node::from_coords(0.0, 0.0, -1.0),
    ];

    // Interior rings, pole to pole; ring r holds nlon nodes.
    let ring = |r: usize, i: usize| 2 + (r - 1) * nlon + (i % nlon);
    for r in 1..nlat {
        let lat = PI / 2.0 - PI * r as f64 / nlat as f64;
        for i in 0..nlon {
            let lon = 2.0 * PI * i as f64 / nlon as f64;
            nodes.push(Node::from_lonlat(lon, lat));
        }
    }

    let mut faces = Vec::with_capacity(nlon * nlat);

    // North cap: triangles against the pole.
    for i in 0..nlon {
        faces.push(Face::from_node_loop_with_kinds(
            &[ring(1, i), ring(1, i + 1), 0],
            &[
                EdgeKind::ConstantLatitude,
                EdgeKind::GreatCircle,
                EdgeKind::GreatCircle,
            ],
        ));
    }

    // Interior bands: quads between ring k (upper) and ring k + 1 (lower).
    for k in 1..nlat - 1 {
        for i in 0..nlon {
            faces.push(Face::from_node_loop_with_kinds(
                &[ring(k + 1, i), ring(k + 1, i + 1), ring(k, i + 1), ring(k, i)],
                &[
                    EdgeKind::ConstantLatitude,
                    EdgeKind::GreatCircle,
                    EdgeKind::ConstantLatitude,
                    EdgeKind::GreatCircle,
                ],
            ));
        }
    }

    // South cap: triangles against the pole, upper boundary traversed west.
    for i in 0..nlon {
        faces.push(Face::from_node_loop_with_kinds(
            &[ring(nlat - 1, i + 1), ring(nlat - 1, i), 1],
            &[
                EdgeKind::ConstantLatitude,
                EdgeKind::GreatCircle,
                EdgeKind::GreatCircle,
            ],
        ));
    }

    SphereMesh::from_parts(nodes, faces).expect("latitude-longitude grid is manifold")
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn cube_sphere_nodes_on_unit_sphere() {
        let mesh = cube_sphere();
        for node in &mesh.nodes {
            assert_relative_eq!(node.coords().norm(), 1.0, epsilon = 1e-15);
        }
        assert!(mesh.is_closed());
        mesh.validate().unwrap();
    }

    #[test]
    fn subdivided_cube_shares_panel_boundaries() {
        let mesh = subdivided_cube_sphere(2);
        // 8 corners, one midpoint per cube edge, one centre per panel.
        assert_eq!(mesh.node_count(), 26);
        assert_eq!(mesh.face_count(), 24);
        assert!(mesh.is_closed());
        mesh.validate().unwrap();
    }

    #[test]
    fn subdivided_cube_zero_is_cube() {
        let mesh = subdivided_cube_sphere(0);
        assert_eq!(mesh.face_count(), 6);
    }

    #[test]
    fn latlon_grid_shape() {
        let mesh = latlon_grid(4, 3);
        assert_eq!(mesh.node_count(), 2 + 2 * 4);
        assert_eq!(mesh.face_count(), 12);
        assert!(mesh.is_closed());
        mesh.validate().unwrap();
    }

    #[test]
    fn latlon_caps_are_triangles() {
        let mesh = latlon_grid(4, 2);
        for face in &mesh.faces {
            assert_eq!(face.edge_count(), 3);
            assert!(face.is_closed());
        }
        // Cap boundaries along the equator are constant-latitude arcs.
        assert_eq!(mesh.faces[0].edges[0].kind, EdgeKind::ConstantLatitude);
        assert_eq!(mesh.faces[0].edges[1].kind, EdgeKind::GreatCircle);
    }

    #[test]
    fn latlon_all_nodes_unit() {
        let mesh = latlon_grid(8, 4);
        for node in &mesh.nodes {
            assert_relative_eq!(node.coords().norm(), 1.0, epsilon = 1e-15);
        }
    }
}
