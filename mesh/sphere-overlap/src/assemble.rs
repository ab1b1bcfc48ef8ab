//! Face assembler: weave traced path segments and interior arcs of the
//! second mesh into closed overlap faces.
//!
//! Assembly is purely topological: it consumes the segment tags left by
//! the tracer and the second-mesh edge map, never the geometry. Each
//! overlap face alternates between runs along the first face's traced
//! boundary (phase A) and runs along the interior boundary of the current
//! second face (phase B), until it closes on its origin node. Second-mesh
//! faces that the trace never touched but that neighbour a phase-B walk
//! are flood-filled afterwards as pure interior faces.

use std::collections::VecDeque;

use hashbrown::HashSet;
use sphere_types::{Edge, Face, SphereMesh};
use tracing::debug;

use crate::error::{OverlapError, OverlapResult};
use crate::segment::{IntersectKind, PathSegment};

/// Output of assembling one first-mesh face: overlap faces, each tagged
/// with the second-mesh face containing it. The first `boundary_count`
/// entries came from the traced boundary; the rest are flood-filled pure
/// interior faces.
#[derive(Debug, Default)]
pub(crate) struct AssembledFaces {
    pub faces: Vec<(Face, usize)>,
    pub boundary_count: usize,
}

/// Assemble the overlap faces for one first-mesh face from its traced
/// path.
pub(crate) fn assemble_faces(
    second: &SphereMesh,
    second_node_map: &[usize],
    segments: &[PathSegment],
    first_face_ix: usize,
) -> OverlapResult<AssembledFaces> {
    let n = segments.len();
    let mut out = AssembledFaces::default();
    if n == 0 {
        return Ok(out);
    }

    let mut used = vec![false; n];
    let touched: HashSet<usize> = segments.iter().map(|s| s.second_face).collect();
    let mut interior_candidates: HashSet<usize> = HashSet::new();

    while let Some(start) = used.iter().position(|&u| !u) {
        let polygon = build_face(
            second,
            second_node_map,
            segments,
            first_face_ix,
            &mut used,
            &mut interior_candidates,
            start,
        )?;
        out.faces.push((polygon, segments[start].second_face));
    }
    out.boundary_count = out.faces.len();

    flood_fill_interior(
        second,
        second_node_map,
        &touched,
        &interior_candidates,
        &mut out,
    )?;

    debug!(
        first_face = first_face_ix,
        boundary_faces = out.boundary_count,
        interior_faces = out.faces.len() - out.boundary_count,
        "assembled overlap faces"
    );
    Ok(out)
}

/// Build one closed overlap face starting at segment `start`.
#[allow(clippy::too_many_lines)]
fn build_face(
    second: &SphereMesh,
    second_node_map: &[usize],
    segments: &[PathSegment],
    first_face_ix: usize,
    used: &mut [bool],
    interior_candidates: &mut HashSet<usize>,
    start: usize,
) -> OverlapResult<Face> {
    let n = segments.len();
    let mut polygon = Face::default();
    let origin = segments[start].begin();
    let current_second = segments[start].second_face;
    let face_second = &second.faces[current_second];
    let m = face_second.edges.len();
    let mut k = start;

    'build: loop {
        // Phase A: consume consecutive path segments along the first
        // face's boundary.
        let branch = loop {
            if used[k] {
                return Err(OverlapError::SegmentReuse {
                    face: first_face_ix,
                    segment: k,
                });
            }
            used[k] = true;
            let segment = &segments[k];
            polygon.edges.push(segment.as_edge());
            if segment.intersection != IntersectKind::None {
                break segment;
            }
            if segment.end() == origin {
                break 'build;
            }
            k = (k + 1) % n;
        };

        // Phase B: walk the interior boundary of the current second face
        // until the traced path becomes active again.
        let mut e_local = branch.intersect_ix;
        let mut x = branch.end();
        let mut steps = 0usize;
        loop {
            if steps > m {
                return Err(OverlapError::PossibleInfiniteLoop {
                    face: first_face_ix,
                    second_face: current_second,
                });
            }
            steps += 1;

            let g = face_second.edges[e_local];
            if g.is_degenerate() {
                e_local = (e_local + 1) % m;
                x = second_node_map[g.end()];
                continue;
            }

            // The face across this edge is interior unless the trace
            // touched it.
            let pair = second
                .edge_map
                .get(&g)
                .ok_or(OverlapError::EdgeNotInMap {
                    n0: g.begin(),
                    n1: g.end(),
                })?;
            let neighbour =
                pair.other(current_second)
                    .ok_or(OverlapError::EdgeMapInconsistent {
                        face: current_second,
                        n0: g.begin(),
                        n1: g.end(),
                    })?;
            interior_candidates.insert(neighbour);

            // Does some later segment exit through this edge or one of
            // its vertices?
            let mut exit: Option<(usize, usize)> = None;
            for offset in 1..n {
                let k_exit = (k + offset) % n;
                let candidate = &segments[k_exit];
                if candidate.end() == x {
                    continue;
                }
                let matches = match candidate.intersection {
                    IntersectKind::Node => {
                        candidate.end() == second_node_map[g.begin()]
                            || candidate.end() == second_node_map[g.end()]
                    }
                    IntersectKind::Edge => candidate
                        .crossed_edge
                        .as_ref()
                        .is_some_and(|crossed| crossed.same_arc(&g)),
                    IntersectKind::None => false,
                };
                if matches {
                    exit = Some((k_exit, candidate.end()));
                    break;
                }
            }

            if let Some((k_exit, exit_node)) = exit {
                let k_next = (k_exit + 1) % n;
                if segments[k_next].second_face == current_second {
                    // The traced path re-enters this second face here.
                    polygon.edges.push(Edge::new(x, exit_node, g.kind));
                    k = k_next;
                    if exit_node == origin {
                        break 'build;
                    }
                    continue 'build;
                }
            }

            // Keep walking the second face's boundary.
            let y = second_node_map[g.end()];
            polygon.edges.push(Edge::new(x, y, g.kind));
            if y == origin {
                break 'build;
            }
            e_local = (e_local + 1) % m;
            x = y;
        }
    }

    Ok(polygon)
}

/// Emit the second-mesh faces that lie entirely inside the first face:
/// neighbours recorded during phase B that the trace never touched, plus
/// everything reachable from them through the edge map.
fn flood_fill_interior(
    second: &SphereMesh,
    second_node_map: &[usize],
    touched: &HashSet<usize>,
    interior_candidates: &HashSet<usize>,
    out: &mut AssembledFaces,
) -> OverlapResult<()> {
    let mut seeds: Vec<usize> = interior_candidates.difference(touched).copied().collect();
    seeds.sort_unstable();

    let mut added = touched.clone();
    let mut queue: VecDeque<usize> = seeds.into();

    while let Some(second_ix) = queue.pop_front() {
        if !added.insert(second_ix) {
            continue;
        }
        let face_second = &second.faces[second_ix];

        let mapped = Face::new(
            face_second
                .edges
                .iter()
                .map(|e| {
                    Edge::new(
                        second_node_map[e.begin()],
                        second_node_map[e.end()],
                        e.kind,
                    )
                })
                .collect(),
        );
        out.faces.push((mapped, second_ix));

        for edge in &face_second.edges {
            if edge.is_degenerate() {
                continue;
            }
            let pair = second
                .edge_map
                .get(edge)
                .ok_or(OverlapError::EdgeNotInMap {
                    n0: edge.begin(),
                    n1: edge.end(),
                })?;
            let neighbour = pair
                .other(second_ix)
                .ok_or(OverlapError::EdgeMapInconsistent {
                    face: second_ix,
                    n0: edge.begin(),
                    n1: edge.end(),
                })?;
            if !added.contains(&neighbour) {
                queue.push_back(neighbour);
            }
        }
    }
    Ok(())
}
