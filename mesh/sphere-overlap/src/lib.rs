//! Overlap mesh construction for spherical mesh pairs.
//!
//! Given two polygonal meshes that tile the unit sphere (a *first* mesh F
//! and a *second* mesh S), this crate produces a third mesh O whose faces
//! are the non-empty intersections of one face of F with one face of S.
//! Every face of O lies inside exactly one face of F and one face of S,
//! and the union of O's faces covers the sphere.
//!
//! The construction walks the boundary of each first-mesh face across the
//! second mesh (the *path tracer*), then weaves the tagged boundary
//! segments together with interior arcs of the second mesh into closed
//! overlap polygons (the *face assembler*). Second-mesh faces wholly
//! inside a first-mesh face are found by a flood fill over the second
//! mesh's edge map.
//!
//! # Quick Start
//!
//! ```
//! use sphere_overlap::{generate_overlap, OverlapConfig};
//! use sphere_types::{cube_sphere, subdivided_cube_sphere};
//!
//! let coarse = cube_sphere();
//! let fine = subdivided_cube_sphere(2);
//!
//! let result = generate_overlap(&coarse, &fine, &OverlapConfig::default()).unwrap();
//! assert_eq!(result.overlap.mesh.face_count(), 24);
//!
//! // Every overlap face knows the source and target face containing it.
//! assert_eq!(result.overlap.first_face_ix.len(), 24);
//! assert_eq!(result.overlap.second_face_ix.len(), 24);
//! ```
//!
//! # Kernels
//!
//! All geometric questions go through a [`sphere_kernel::SphericalKernel`].
//! Pick the kernel per run via [`OverlapConfig`]; the fuzzy and exact
//! kernels must produce the same overlap topology.
//!
//! # Robustness
//!
//! Coincident nodes between the inputs are unified before tracing, which
//! removes the most common degeneracy at the source. Crossings through
//! second-mesh vertices and first-mesh vertices lying on second-mesh edges
//! are handled as explicit tracer cases. Arcs of the two meshes that run
//! along the same circle are resolved through the vertex hits on the edges
//! adjoining the shared interval. Output nodes discovered at strict
//! interior crossings can be deduplicated by a configurable post-pass.

// Safety: Deny unwrap/expect in library code. Tests may use them.
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Allow some pedantic lints that conflict with API design choices
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
// Allow single-char names in math-heavy code (standard in geometry algorithms)
#![allow(clippy::many_single_char_names)]
#![allow(clippy::similar_names)]

mod assemble;
pub mod config;
mod dedup;
pub mod error;
mod node_map;
pub mod operation;
pub mod segment;
mod trace;

pub use config::{DedupStrategy, KernelChoice, OverlapConfig};
pub use error::{OverlapError, OverlapResult};
pub use operation::{
    generate_overlap, generate_overlap_with, generate_overlap_with_progress, OverlapMesh,
    OverlapOperationResult, OverlapStats,
};
pub use segment::{IntersectKind, PathSegment};

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;

    use approx::assert_relative_eq;
    use sphere_kernel::{FuzzyKernel, NodeLocation, SphericalKernel};
    use sphere_types::{
        cube_sphere, latlon_grid, subdivided_cube_sphere, EdgeKind, Face, Node, SphereMesh,
        Vector3,
    };

    use super::*;
    use crate::operation::prepare_overlap_nodes;
    use crate::trace::trace_face;

    fn node(lon_deg: f64, lat_deg: f64) -> Node {
        Node::from_lonlat(lon_deg.to_radians(), lat_deg.to_radians())
    }

    /// Girard area of a face with great-circle edges.
    fn face_area(nodes: &[Node], face: &Face) -> f64 {
        let verts: Vec<Vector3<f64>> = face
            .edges
            .iter()
            .filter(|e| !e.is_degenerate())
            .map(|e| nodes[e.begin()].coords())
            .collect();
        let n = verts.len();
        let mut angle_sum = 0.0;
        for i in 0..n {
            let p = verts[i];
            let prev = verts[(i + n - 1) % n];
            let next = verts[(i + 1) % n];
            let t_in = (prev - p * p.dot(&prev)).normalize();
            let t_out = (next - p * p.dot(&next)).normalize();
            let mut angle = t_out.cross(&t_in).dot(&p).atan2(t_out.dot(&t_in));
            if angle < 0.0 {
                angle += 2.0 * PI;
            }
            angle_sum += angle;
        }
        angle_sum - (n as f64 - 2.0) * PI
    }

    fn total_area(overlap: &OverlapMesh) -> f64 {
        overlap
            .mesh
            .faces
            .iter()
            .map(|f| face_area(&overlap.mesh.nodes, f))
            .sum()
    }

    fn assert_all_closed(mesh: &SphereMesh) {
        for (ix, face) in mesh.faces.iter().enumerate() {
            assert!(face.is_closed(), "overlap face {ix} is not closed");
            assert!(face.edge_count() >= 3, "overlap face {ix} is degenerate");
        }
    }

    /// Every segment's arc midpoint must lie in the closure of the second
    /// face the tracer tagged it with.
    fn assert_segment_tags(second: &SphereMesh, overlap_nodes: &[Node], segments: &[PathSegment]) {
        let kernel = FuzzyKernel::default();
        for segment in segments {
            let a = overlap_nodes[segment.begin()].coords();
            let b = overlap_nodes[segment.end()].coords();
            let mid = Node::new(nalgebra::Point3::from((a + b).normalize()));
            let found = kernel.find_face_from_node(second, &mid);
            assert!(
                found.faces.contains(&segment.second_face),
                "segment {segment:?} tagged with a face that does not contain it"
            );
        }
    }

    /// A two-face mesh: a small quad and its complement, the quad placed
    /// across a grid vertex of `latlon_grid(10, 10)`.
    fn quad_and_complement() -> SphereMesh {
        let nodes = vec![
            node(30.0, 12.0),
            node(42.0, 12.0),
            node(42.0, 24.0),
            node(30.0, 24.0),
        ];
        let faces = vec![
            Face::from_node_loop(&[0, 1, 2, 3], EdgeKind::GreatCircle),
            Face::from_node_loop(&[3, 2, 1, 0], EdgeKind::GreatCircle),
        ];
        SphereMesh::from_parts(nodes, faces).unwrap()
    }

    // Scenario: identical meshes.
    #[test]
    fn identical_cube_meshes() {
        let cube = cube_sphere();
        let result = generate_overlap(&cube, &cube, &OverlapConfig::default()).unwrap();

        assert_eq!(result.overlap.mesh.face_count(), 6);
        assert_eq!(result.overlap.mesh.node_count(), 8);
        assert_eq!(result.stats.coincident_nodes, 8);
        assert_eq!(result.stats.new_intersection_nodes, 0);
        assert_eq!(result.stats.interior_faces, 0);
        for (j, &ix) in result.overlap.second_node_map.iter().enumerate() {
            assert_eq!(ix, j);
        }
        // Each overlap face is a first face and the same second face.
        for i in 0..6 {
            assert_eq!(result.overlap.first_face_ix[i], result.overlap.second_face_ix[i]);
        }
        assert_all_closed(&result.overlap.mesh);
        assert_relative_eq!(total_area(&result.overlap), 4.0 * PI, epsilon = 1e-9);
    }

    // Scenario: refinement.
    #[test]
    fn refined_cube_partition() {
        let coarse = cube_sphere();
        let fine = subdivided_cube_sphere(2);
        let result = generate_overlap(&coarse, &fine, &OverlapConfig::default()).unwrap();

        assert_eq!(result.overlap.mesh.face_count(), 24);
        assert_eq!(result.stats.new_intersection_nodes, 0);
        assert_eq!(result.overlap.mesh.node_count(), 26);

        // Every second face appears exactly once.
        let mut seen = result.overlap.second_face_ix.clone();
        seen.sort_unstable();
        assert_eq!(seen, (0..24).collect::<Vec<_>>());

        assert_all_closed(&result.overlap.mesh);
        assert_relative_eq!(total_area(&result.overlap), 4.0 * PI, epsilon = 1e-9);
    }

    // Scenario: rotated overlay on a lat-lon grid.
    #[test]
    fn rotated_latlon_grid() {
        let first = latlon_grid(4, 2);
        let mut second = latlon_grid(4, 2);
        second.rotate_z(45f64.to_radians());

        let result = generate_overlap(&first, &second, &OverlapConfig::default()).unwrap();

        // Each of the 8 caps is split in two by one rotated meridian.
        assert_eq!(result.overlap.mesh.face_count(), 16);
        // Poles coincide; the four rotated equator nodes are new; no
        // intersection nodes are created (all hits land on vertices).
        assert_eq!(result.stats.coincident_nodes, 2);
        assert_eq!(result.stats.new_intersection_nodes, 0);
        assert_eq!(result.overlap.mesh.node_count(), 10);
        assert_all_closed(&result.overlap.mesh);

        // Transitions happen exactly at the rotated meridians: every
        // overlap face pairs one first cap with one of its two overlapping
        // second caps.
        for i in 0..result.overlap.mesh.face_count() {
            let f = result.overlap.first_face_ix[i];
            let s = result.overlap.second_face_ix[i];
            assert!(f < 8 && s < 8);
            // Northern caps only overlap northern caps.
            assert_eq!(f < 4, s < 4);
        }
    }

    // Scenario: a single face covering the sphere minus a hole, over a
    // fine grid; exercises the interior flood fill.
    #[test]
    fn single_face_over_many() {
        let first = quad_and_complement();
        let second = latlon_grid(10, 10);
        let result = generate_overlap(&first, &second, &OverlapConfig::default()).unwrap();

        // The quad overlaps the four grid faces around the vertex it
        // straddles; the complement overlaps every grid face.
        let complement_faces = result
            .overlap
            .first_face_ix
            .iter()
            .filter(|&&f| f == 1)
            .count();
        assert_eq!(complement_faces, 100);
        assert_eq!(result.overlap.mesh.face_count(), 104);
        assert_eq!(result.stats.interior_faces, 96);

        // Every second face is covered.
        let mut covered: Vec<usize> = result.overlap.second_face_ix.clone();
        covered.sort_unstable();
        covered.dedup();
        assert_eq!(covered, (0..100).collect::<Vec<_>>());

        assert_all_closed(&result.overlap.mesh);
    }

    // Scenario: a first-mesh vertex exactly on a second-mesh edge.
    #[test]
    fn vertex_on_edge_degeneracy() {
        // Two hemispheres split by the lon 0/180 meridian. All four
        // vertices are cube edge midpoints, and every boundary arc crosses
        // its cube edge transversally.
        let m = Node::from_coords(1.0, 0.0, -1.0).normalized();
        let q = Node::from_coords(1.0, 0.0, 1.0).normalized();
        let m_opp = Node::from_coords(-1.0, 0.0, 1.0).normalized();
        let q_opp = Node::from_coords(-1.0, 0.0, -1.0).normalized();
        let first = SphereMesh::from_parts(
            vec![m, q, m_opp, q_opp],
            vec![
                Face::from_node_loop(&[0, 1, 2, 3], EdgeKind::GreatCircle),
                Face::from_node_loop(&[3, 2, 1, 0], EdgeKind::GreatCircle),
            ],
        )
        .unwrap();
        let second = cube_sphere();

        let kernel = FuzzyKernel::default();
        let (mut overlap_nodes, map, _, _) =
            prepare_overlap_nodes(&kernel, &first, &second, 0.1);
        let segments =
            trace_face(&kernel, &first, &second, &map, 0, &mut overlap_nodes).unwrap();

        // The boundary vertex on the cube edge terminates a segment with
        // an edge intersection.
        assert!(segments
            .iter()
            .any(|s| s.intersection == IntersectKind::Edge && s.end() == 0));
        assert_segment_tags(&second, &overlap_nodes, &segments);

        // The full run assembles each hemisphere as four half-panels plus
        // one whole panel, covering the sphere.
        let result = generate_overlap(&first, &second, &OverlapConfig::default()).unwrap();
        assert_eq!(result.overlap.mesh.face_count(), 10);
        assert_eq!(result.stats.interior_faces, 2);
        assert_all_closed(&result.overlap.mesh);
        assert_relative_eq!(total_area(&result.overlap), 4.0 * PI, epsilon = 1e-9);
    }

    // Scenario: a first edge ending exactly on a shared second-mesh
    // vertex; the disambiguated face must be the one the following
    // segment is tagged with.
    #[test]
    fn edge_endpoint_on_shared_vertex() {
        let first = cube_sphere();
        let second = subdivided_cube_sphere(2);

        let kernel = FuzzyKernel::default();
        let (mut overlap_nodes, map, _, _) =
            prepare_overlap_nodes(&kernel, &first, &second, 0.1);

        for face_ix in 0..first.face_count() {
            let segments = trace_face(
                &kernel,
                &first,
                &second,
                &map,
                face_ix,
                &mut overlap_nodes,
            )
            .unwrap();
            assert_segment_tags(&second, &overlap_nodes, &segments);

            // Corner hits: the segment after a cube-corner arrival must be
            // tagged with the face its own arc lies in (checked above),
            // and the corner must be a shared vertex of the second mesh.
            for (k, segment) in segments.iter().enumerate() {
                if segment.end() < 8 {
                    let corner = overlap_nodes[segment.end()];
                    let found = kernel.find_face_from_node(&second, &corner);
                    assert_eq!(found.location, NodeLocation::Vertex);
                    assert!(found.len() >= 3);
                    let next = &segments[(k + 1) % segments.len()];
                    assert!(found.faces.contains(&next.second_face));
                }
            }
        }
    }

    // Universal property: rotated cubes create strict-interior crossing
    // nodes, and the overlap still partitions the sphere.
    #[test]
    fn rotated_cube_coverage_and_new_nodes() {
        let first = cube_sphere();
        let mut second = cube_sphere();
        second.rotate_z(0.5);

        let result = generate_overlap(&first, &second, &OverlapConfig::default()).unwrap();
        assert!(result.stats.new_intersection_nodes > 0);
        assert_eq!(result.stats.coincident_nodes, 0);
        assert_all_closed(&result.overlap.mesh);
        assert_relative_eq!(total_area(&result.overlap), 4.0 * PI, epsilon = 1e-9);

        // Containment: a representative interior point of each overlap
        // face lies in the closure of both tagged parents.
        let kernel = FuzzyKernel::default();
        for (i, face) in result.overlap.mesh.faces.iter().enumerate() {
            let centroid: Vector3<f64> = face
                .vertices()
                .map(|v| result.overlap.mesh.nodes[v].coords())
                .sum();
            let probe = Node::new(nalgebra::Point3::from(centroid.normalize()));
            let in_first = kernel.find_face_from_node(&first, &probe);
            let in_second = kernel.find_face_from_node(&second, &probe);
            assert!(in_first.faces.contains(&result.overlap.first_face_ix[i]));
            assert!(in_second.faces.contains(&result.overlap.second_face_ix[i]));
        }
    }

    // Universal property: node reuse. First-mesh nodes keep their
    // indices; second-mesh nodes map through the node map; new nodes only
    // appear past both.
    #[test]
    fn node_reuse_layout() {
        let first = cube_sphere();
        let mut second = cube_sphere();
        second.rotate_z(0.5);
        let result = generate_overlap(&first, &second, &OverlapConfig::default()).unwrap();

        for (i, n) in first.nodes.iter().enumerate() {
            assert_eq!(result.overlap.mesh.nodes[i].position, n.position);
        }
        for (j, &ix) in result.overlap.second_node_map.iter().enumerate() {
            assert_eq!(result.overlap.mesh.nodes[ix].position, second.nodes[j].position);
        }
        let new_start = first.node_count() + second.node_count();
        assert!(result.overlap.mesh.node_count() > new_start);
    }

    // Universal property: the fuzzy and exact kernels agree on topology.
    #[test]
    fn kernel_choice_is_topology_idempotent() {
        let first = cube_sphere();
        let mut second = cube_sphere();
        second.rotate_z(0.5);

        let fuzzy = generate_overlap(&first, &second, &OverlapConfig::default()).unwrap();
        let exact = generate_overlap(&first, &second, &OverlapConfig::exact()).unwrap();

        assert_eq!(fuzzy.overlap.mesh.face_count(), exact.overlap.mesh.face_count());

        let signature = |r: &OverlapOperationResult| {
            let mut sig: Vec<(usize, usize, usize)> = r
                .overlap
                .mesh
                .faces
                .iter()
                .enumerate()
                .map(|(i, f)| {
                    (
                        r.overlap.first_face_ix[i],
                        r.overlap.second_face_ix[i],
                        f.edge_count(),
                    )
                })
                .collect();
            sig.sort_unstable();
            sig
        };
        assert_eq!(signature(&fuzzy), signature(&exact));
    }

    // Dedup knob: duplicated crossing nodes from adjacent face traces are
    // unified by default and retained on request.
    #[test]
    fn dedup_strategies_differ_in_node_count() {
        let first = cube_sphere();
        let mut second = cube_sphere();
        second.rotate_z(0.5);

        let deduped = generate_overlap(&first, &second, &OverlapConfig::default()).unwrap();
        let retained = generate_overlap(&first, &second, &OverlapConfig::retain_all()).unwrap();
        let sorted = generate_overlap(
            &first,
            &second,
            &OverlapConfig::default().with_dedup(DedupStrategy::SortedMultimap),
        )
        .unwrap();

        assert!(deduped.stats.deduplicated_nodes > 0);
        assert_eq!(retained.stats.deduplicated_nodes, 0);
        assert_eq!(
            retained.overlap.mesh.node_count(),
            deduped.overlap.mesh.node_count() + deduped.stats.deduplicated_nodes
        );
        assert_eq!(
            sorted.overlap.mesh.node_count(),
            deduped.overlap.mesh.node_count()
        );
    }
}
