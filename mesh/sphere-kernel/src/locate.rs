//! Point location: face containment and direction-based disambiguation.

use nalgebra::Vector3;
use smallvec::SmallVec;
use sphere_types::{EdgeKind, Face, Node, SphereMesh};
use tracing::warn;

use crate::intersect::{edge_tangent, within_arc};
use crate::kernel::{FaceCandidates, KernelError, KernelResult, NodeLocation, SphericalKernel};
use crate::predicates::Sign;

/// All faces whose closure contains `node`; see the trait documentation.
pub(crate) fn find_face_from_node<K: SphericalKernel>(
    kernel: &K,
    mesh: &SphereMesh,
    node: &Node,
) -> FaceCandidates {
    let mut found = FaceCandidates::default();
    for (face_ix, face) in mesh.faces.iter().enumerate() {
        if let Some((location, local)) = classify_in_face(kernel, mesh, face, node) {
            found.faces.push(face_ix);
            found.locations.push(local);
            if location > found.location {
                found.location = location;
            }
        }
    }
    found
}

/// Locate `node` relative to one face: `None` when outside the closure,
/// otherwise the feature it lies on. Assumes a convex face.
fn classify_in_face<K: SphericalKernel>(
    kernel: &K,
    mesh: &SphereMesh,
    face: &Face,
    node: &Node,
) -> Option<(NodeLocation, usize)> {
    for (i, v) in face.vertices().enumerate() {
        if kernel.nodes_equal(node, &mesh.nodes[v]) {
            return Some((NodeLocation::Vertex, i));
        }
    }

    let mut on_edge = None;
    for (i, edge) in face.edges.iter().enumerate() {
        if edge.is_degenerate() {
            continue;
        }
        let p0 = &mesh.nodes[edge.begin()];
        let p1 = &mesh.nodes[edge.end()];
        match edge_side(kernel, p0, p1, edge.kind, node) {
            Sign::Negative => return None,
            Sign::Zero => {
                if within_arc(kernel, p0, p1, edge.kind, node, false) {
                    on_edge = Some(i);
                } else {
                    // On the carrier circle beyond the arc span: outside a
                    // convex face.
                    return None;
                }
            }
            Sign::Positive => {}
        }
    }

    match on_edge {
        Some(i) => Some((NodeLocation::Edge, i)),
        None => Some((NodeLocation::Interior, 0)),
    }
}

/// Which side of the directed edge `node` lies on: positive is the face
/// interior side (left of the edge).
fn edge_side<K: SphericalKernel>(
    kernel: &K,
    p0: &Node,
    p1: &Node,
    kind: EdgeKind,
    node: &Node,
) -> Sign {
    match kind {
        EdgeKind::GreatCircle => {
            kernel.triple_sign(&p0.coords(), &p1.coords(), &node.coords())
        }
        EdgeKind::ConstantLatitude => {
            // Interior is north of an eastward arc, south of a westward one.
            let dz = kernel.scalar_sign(node.position.z - p0.position.z);
            match kernel.triple_sign(&p0.coords(), &p1.coords(), &Vector3::z()) {
                Sign::Negative => dz.flipped(),
                _ => dz,
            }
        }
    }
}

/// Disambiguate among the faces incident to mesh vertex `vertex`; see the
/// trait documentation.
pub(crate) fn find_face_near_vertex<K: SphericalKernel>(
    kernel: &K,
    mesh: &SphereMesh,
    vertex: usize,
    toward: &Node,
    kind: EdgeKind,
) -> KernelResult<usize> {
    let mut candidates: SmallVec<[(usize, usize); 8]> = SmallVec::new();
    for (face_ix, face) in mesh.faces.iter().enumerate() {
        if let Some(local) = face.local_vertex(vertex) {
            candidates.push((face_ix, local));
        }
    }
    if candidates.is_empty() {
        return Err(KernelError::NoIncidentFace { vertex });
    }
    let at = &mesh.nodes[vertex];
    Ok(sector_select(kernel, mesh, at, toward, kind, &candidates))
}

/// Disambiguate among explicit candidates; see the trait documentation.
pub(crate) fn find_face_near_node<K: SphericalKernel>(
    kernel: &K,
    mesh: &SphereMesh,
    at: &Node,
    toward: &Node,
    kind: EdgeKind,
    candidates: &FaceCandidates,
) -> KernelResult<usize> {
    if candidates.is_empty() {
        return Err(KernelError::NoCandidates);
    }
    match candidates.location {
        NodeLocation::Interior => Ok(candidates.faces[0]),
        NodeLocation::Vertex => {
            let list: SmallVec<[(usize, usize); 8]> = candidates
                .faces
                .iter()
                .copied()
                .zip(candidates.locations.iter().copied())
                .collect();
            Ok(sector_select(kernel, mesh, at, toward, kind, &list))
        }
        NodeLocation::Edge => Ok(half_plane_select(kernel, mesh, at, toward, kind, candidates)),
    }
}

/// Pick the candidate whose interior sector at a shared vertex admits the
/// departing direction.
///
/// The sector of a face at one of its vertices spans from the outgoing
/// boundary tangent counter-clockwise to the incoming one. Membership is
/// inclusive on the outgoing tangent and exclusive on the incoming one, so
/// a direction along a shared boundary edge lands in the face traversing
/// that edge the same way.
fn sector_select<K: SphericalKernel>(
    kernel: &K,
    mesh: &SphereMesh,
    at: &Node,
    toward: &Node,
    kind: EdgeKind,
    candidates: &[(usize, usize)],
) -> usize {
    let d = edge_tangent(at, toward, kind);
    let fallback = candidates[0].0;
    if d == Vector3::zeros() {
        warn!(face = fallback, "degenerate departing direction at vertex");
        return fallback;
    }

    let n = at.coords();
    let tol = kernel.tolerance();
    let mut best = (f64::NEG_INFINITY, fallback);

    for &(face_ix, local) in candidates {
        let face = &mesh.faces[face_ix];
        let (Some(out_edge), Some(in_edge)) =
            (face.edge_out_of_vertex(local), face.edge_into_vertex(local))
        else {
            continue;
        };
        let t_out = edge_tangent(
            at,
            &mesh.nodes[face.next_distinct_vertex(local)],
            out_edge.kind,
        );
        let t_in = edge_tangent(
            at,
            &mesh.nodes[face.prev_distinct_vertex(local)],
            in_edge.kind,
        );
        if t_out == Vector3::zeros() || t_in == Vector3::zeros() {
            continue;
        }

        let s_sector = t_out.cross(&t_in).dot(&n);
        let s_from_out = t_out.cross(&d).dot(&n);
        let s_to_in = d.cross(&t_in).dot(&n);

        if s_from_out.abs() <= tol && t_out.dot(&d) > 0.0 {
            return face_ix;
        }
        let on_incoming = s_to_in.abs() <= tol && t_in.dot(&d) > 0.0;
        let inside = if s_sector >= -tol {
            s_from_out > tol && s_to_in > tol
        } else {
            s_from_out > tol || s_to_in > tol
        };
        if inside && !on_incoming {
            return face_ix;
        }

        let score = s_from_out.min(s_to_in);
        if score > best.0 {
            best = (score, face_ix);
        }
    }

    warn!(
        face = best.1,
        "no incident face cleanly admits the departing direction"
    );
    best.1
}

/// Pick the candidate on whose interior side of the crossed edge the
/// departing direction points. A direction along the edge selects the face
/// traversing the edge the same way.
fn half_plane_select<K: SphericalKernel>(
    kernel: &K,
    mesh: &SphereMesh,
    at: &Node,
    toward: &Node,
    kind: EdgeKind,
    candidates: &FaceCandidates,
) -> usize {
    let d = edge_tangent(at, toward, kind);
    let fallback = candidates.faces[0];
    if d == Vector3::zeros() {
        warn!(face = fallback, "degenerate departing direction on edge");
        return fallback;
    }

    let n = at.coords();
    let tol = kernel.tolerance();
    let mut best = (f64::NEG_INFINITY, fallback);

    for (&face_ix, &local) in candidates.faces.iter().zip(&candidates.locations) {
        let face = &mesh.faces[face_ix];
        let Some(edge) = face.edges.get(local) else {
            continue;
        };
        if edge.is_degenerate() {
            continue;
        }
        let t_edge = edge_tangent(at, &mesh.nodes[edge.end()], edge.kind);
        if t_edge == Vector3::zeros() {
            continue;
        }

        let s = t_edge.cross(&d).dot(&n);
        if s > tol {
            return face_ix;
        }
        if s.abs() <= tol && t_edge.dot(&d) > 0.0 {
            return face_ix;
        }
        if s > best.0 {
            best = (s, face_ix);
        }
    }

    warn!(
        face = best.1,
        "departing direction does not enter either face across the edge"
    );
    best.1
}
