//! Path tracer: walk the boundary of one first-mesh face across the
//! second mesh.
//!
//! The tracer follows the edges of a first-mesh face in order, keeping
//! track of the second-mesh face currently containing the path. At every
//! crossing of a second-mesh feature it ends the running segment, tags it
//! with how it terminated, and re-resolves the containing face on the far
//! side. Intersection points found in the interior of a second-mesh edge
//! are appended to the overlap node array.

use smallvec::SmallVec;
use sphere_kernel::{FaceCandidates, SphericalKernel};
use sphere_types::{Edge, Node, SphereMesh};
use tracing::{debug, warn};

use crate::error::{OverlapError, OverlapResult};
use crate::segment::PathSegment;

/// Trace the boundary of first face `first_face_ix`, emitting the closed
/// loop of path segments in overlap-node indices.
///
/// `overlap_nodes` must already hold the first-mesh nodes at their
/// original indices and the mapped second-mesh nodes; strict-interior
/// crossing points are appended to it.
pub(crate) fn trace_face<K: SphericalKernel>(
    kernel: &K,
    first: &SphereMesh,
    second: &SphereMesh,
    second_node_map: &[usize],
    first_face_ix: usize,
    overlap_nodes: &mut Vec<Node>,
) -> OverlapResult<Vec<PathSegment>> {
    let face_first = &first.faces[first_face_ix];
    let n_edges = face_first.edges.len();

    let mut current_second = starting_second_face(kernel, first, second, first_face_ix)?;
    debug!(
        first_face = first_face_ix,
        second_face = current_second,
        "tracing face boundary"
    );

    let mut segments: Vec<PathSegment> = Vec::new();

    for i in 0..n_edges {
        let edge_first = face_first.edges[i];
        if edge_first.is_degenerate() {
            continue;
        }

        let begin_ix = edge_first.begin();
        let end_ix = edge_first.end();
        let node_first_end = first.nodes[end_ix];
        let mut current_overlap = begin_ix;
        let mut last_hit = overlap_nodes[begin_ix];

        'current_edge: loop {
            let face_second = &second.faces[current_second];
            let m_edges = face_second.edges.len();

            // Scan the current second face for the first crossing that is
            // not the point we entered through.
            let mut hit: Option<(usize, Node)> = None;
            for (j, edge_second) in face_second.edges.iter().enumerate() {
                if edge_second.is_degenerate() {
                    return Err(OverlapError::ZeroEdge {
                        face: current_second,
                        edge: j,
                    });
                }
                let crossings = kernel.edge_crossings(
                    &overlap_nodes[begin_ix],
                    &overlap_nodes[end_ix],
                    edge_first.kind,
                    &second.nodes[edge_second.begin()],
                    &second.nodes[edge_second.end()],
                    edge_second.kind,
                );
                if crossings.coincident {
                    if !crossings.points.is_empty() {
                        return Err(OverlapError::CoincidentEdges {
                            first_face: first_face_ix,
                            second_face: current_second,
                        });
                    }
                    // A shared arc is resolved by the vertex hits on the
                    // edges adjoining it; skip this edge.
                    continue;
                }
                let surviving: SmallVec<[Node; 2]> = crossings
                    .points
                    .into_iter()
                    .filter(|p| !kernel.nodes_equal(p, &last_hit))
                    .collect();
                if surviving.len() > 1 {
                    return Err(OverlapError::NonConvexIntersection {
                        first_face: first_face_ix,
                        second_face: current_second,
                    });
                }
                if let Some(point) = surviving.first() {
                    hit = Some((j, *point));
                    break;
                }
            }

            let Some((j_hit, point)) = hit else {
                // The rest of the edge lies inside the current second face.
                segments.push(PathSegment::boundary(
                    current_overlap,
                    end_ix,
                    edge_first.kind,
                    first_face_ix,
                    current_second,
                ));
                break 'current_edge;
            };

            let edge_second = face_second.edges[j_hit];
            let node_u0 = second.nodes[edge_second.begin()];
            let node_u1 = second.nodes[edge_second.end()];
            last_hit = point;

            // The crossing lands exactly on the end of the first edge.
            if kernel.nodes_equal(&point, &overlap_nodes[end_ix]) {
                let next_local = (i + 1) % n_edges;
                let next_kind = face_first
                    .edge_out_of_vertex(next_local)
                    .map_or(edge_first.kind, |e| e.kind);
                let next_toward = first.nodes[face_first.next_distinct_vertex(next_local)];

                let next_second = if kernel.nodes_equal(&point, &node_u0) {
                    kernel.find_face_near_vertex(
                        second,
                        edge_second.begin(),
                        &next_toward,
                        next_kind,
                    )?
                } else if kernel.nodes_equal(&point, &node_u1) {
                    kernel.find_face_near_vertex(second, edge_second.end(), &next_toward, next_kind)?
                } else {
                    let candidates = edge_pair_candidates(second, &edge_second)?;
                    kernel.find_face_near_node(
                        second,
                        &node_first_end,
                        &next_toward,
                        next_kind,
                        &candidates,
                    )?
                };

                if next_second == current_second {
                    let site = if kernel.nodes_equal(&point, &node_u0) {
                        "edge end on crossed-edge begin vertex"
                    } else if kernel.nodes_equal(&point, &node_u1) {
                        "edge end on crossed-edge end vertex"
                    } else {
                        "edge end inside crossed edge"
                    };
                    warn!(
                        first_face = first_face_ix,
                        second_face = current_second,
                        site,
                        "second face does not change across crossing"
                    );
                    segments.push(PathSegment::boundary(
                        current_overlap,
                        end_ix,
                        edge_first.kind,
                        first_face_ix,
                        current_second,
                    ));
                } else if kernel.nodes_equal(&point, &node_u0) {
                    segments.push(PathSegment::at_vertex(
                        current_overlap,
                        end_ix,
                        edge_first.kind,
                        first_face_ix,
                        current_second,
                        j_hit,
                    ));
                } else if kernel.nodes_equal(&point, &node_u1) {
                    segments.push(PathSegment::at_vertex(
                        current_overlap,
                        end_ix,
                        edge_first.kind,
                        first_face_ix,
                        current_second,
                        (j_hit + 1) % m_edges,
                    ));
                } else {
                    segments.push(PathSegment::through_edge(
                        current_overlap,
                        end_ix,
                        edge_first.kind,
                        first_face_ix,
                        current_second,
                        j_hit,
                        edge_second,
                    ));
                }

                current_second = next_second;
                break 'current_edge;
            }

            // The crossing lands on the begin vertex of the crossed edge.
            if kernel.nodes_equal(&point, &node_u0) {
                let next_overlap = second_node_map[edge_second.begin()];
                segments.push(PathSegment::at_vertex(
                    current_overlap,
                    next_overlap,
                    edge_first.kind,
                    first_face_ix,
                    current_second,
                    j_hit,
                ));
                let previous = current_second;
                current_second = kernel.find_face_near_vertex(
                    second,
                    edge_second.begin(),
                    &node_first_end,
                    edge_first.kind,
                )?;
                if previous == current_second {
                    warn!(
                        first_face = first_face_ix,
                        second_face = current_second,
                        site = "crossed-edge begin vertex",
                        "second face does not change across crossing"
                    );
                }
                current_overlap = next_overlap;
                if next_overlap == end_ix {
                    break 'current_edge;
                }
                continue 'current_edge;
            }

            // The crossing lands on the end vertex of the crossed edge.
            if kernel.nodes_equal(&point, &node_u1) {
                let next_overlap = second_node_map[edge_second.end()];
                segments.push(PathSegment::at_vertex(
                    current_overlap,
                    next_overlap,
                    edge_first.kind,
                    first_face_ix,
                    current_second,
                    (j_hit + 1) % m_edges,
                ));
                let previous = current_second;
                current_second = kernel.find_face_near_vertex(
                    second,
                    edge_second.end(),
                    &node_first_end,
                    edge_first.kind,
                )?;
                if previous == current_second {
                    warn!(
                        first_face = first_face_ix,
                        second_face = current_second,
                        site = "crossed-edge end vertex",
                        "second face does not change across crossing"
                    );
                }
                current_overlap = next_overlap;
                if next_overlap == end_ix {
                    break 'current_edge;
                }
                continue 'current_edge;
            }

            // General crossing in the interior of the crossed edge: a new
            // overlap node.
            let next_overlap = overlap_nodes.len();
            overlap_nodes.push(point);
            segments.push(PathSegment::through_edge(
                current_overlap,
                next_overlap,
                edge_first.kind,
                first_face_ix,
                current_second,
                j_hit,
                edge_second,
            ));
            current_overlap = next_overlap;

            let candidates = edge_pair_candidates(second, &edge_second)?;
            let previous = current_second;
            current_second = kernel.find_face_near_node(
                second,
                &point,
                &node_first_end,
                edge_first.kind,
                &candidates,
            )?;
            if previous == current_second {
                warn!(
                    first_face = first_face_ix,
                    second_face = current_second,
                    site = "interior crossing",
                    "second face does not change across crossing"
                );
            }
        }
    }

    Ok(segments)
}

/// The second-mesh face containing the start of the trace; on a boundary,
/// the one the first boundary edge enters.
fn starting_second_face<K: SphericalKernel>(
    kernel: &K,
    first: &SphereMesh,
    second: &SphereMesh,
    first_face_ix: usize,
) -> OverlapResult<usize> {
    let face_first = &first.faces[first_face_ix];
    let v0 = face_first.vertex(0);
    let start = &first.nodes[v0];

    let found = kernel.find_face_from_node(second, start);
    if found.is_empty() {
        return Err(OverlapError::NoInitialFace {
            face: first_face_ix,
            vertex: v0,
        });
    }
    if found.len() == 1 {
        return Ok(found.faces[0]);
    }

    let kind = face_first
        .edge_out_of_vertex(0)
        .map_or(face_first.edges[0].kind, |e| e.kind);
    let toward = first.nodes[face_first.next_distinct_vertex(0)];
    Ok(kernel.find_face_near_node(second, start, &toward, kind, &found)?)
}

/// Candidate set for a crossing through the interior of a second-mesh
/// edge: the two faces sharing it, with their local edge indices.
fn edge_pair_candidates(second: &SphereMesh, edge: &Edge) -> OverlapResult<FaceCandidates> {
    let (f0, f1) = second
        .edge_map
        .faces_sharing(edge)
        .ok_or(OverlapError::EdgeNotInMap {
            n0: edge.begin(),
            n1: edge.end(),
        })?;
    let le0 = second.faces[f0]
        .edge_index(edge)
        .ok_or(OverlapError::EdgeMapInconsistent {
            face: f0,
            n0: edge.begin(),
            n1: edge.end(),
        })?;
    let le1 = second.faces[f1]
        .edge_index(edge)
        .ok_or(OverlapError::EdgeMapInconsistent {
            face: f1,
            n0: edge.begin(),
            n1: edge.end(),
        })?;
    Ok(FaceCandidates::on_edge(f0, le0, f1, le1))
}
