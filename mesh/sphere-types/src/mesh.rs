//! The spherical mesh: nodes, faces, and the edge map.

use nalgebra::{Point3, Rotation3, Vector3};

use crate::edge_map::EdgeMap;
use crate::error::{MeshError, MeshResult};
use crate::face::Face;
use crate::node::Node;

/// A polygonal mesh on the unit sphere.
///
/// Faces wind counter-clockwise when viewed from outside the sphere. A mesh
/// that tiles the whole sphere is *closed*: every non-degenerate edge is
/// shared by exactly two faces.
///
/// The edge map can be empty on meshes under construction (the overlap
/// generator leaves it for a downstream rebuild); call
/// [`SphereMesh::rebuild_edge_map`] to compute it.
///
/// # Example
///
/// ```
/// use sphere_types::cube_sphere;
///
/// let mesh = cube_sphere();
/// let edge = mesh.faces[0].edges[0];
/// let (a, b) = mesh.edge_map.faces_sharing(&edge).unwrap();
/// assert!(a == 0 || b == 0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SphereMesh {
    /// Node positions.
    pub nodes: Vec<Node>,
    /// Faces as cyclic edge loops over node indices.
    pub faces: Vec<Face>,
    /// Undirected edge to face-pair lookup.
    pub edge_map: EdgeMap,
}

impl SphereMesh {
    /// Create an empty mesh.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty mesh with pre-allocated capacity.
    #[must_use]
    pub fn with_capacity(node_count: usize, face_count: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(node_count),
            faces: Vec::with_capacity(face_count),
            edge_map: EdgeMap::new(),
        }
    }

    /// Build a mesh from nodes and faces, constructing the edge map.
    ///
    /// # Errors
    ///
    /// Returns an error when a face references a node out of bounds or an
    /// edge is claimed by more than two faces.
    pub fn from_parts(nodes: Vec<Node>, faces: Vec<Face>) -> MeshResult<Self> {
        for (face_ix, face) in faces.iter().enumerate() {
            for edge in &face.edges {
                for &node in &edge.nodes {
                    if node >= nodes.len() {
                        return Err(MeshError::NodeOutOfBounds {
                            face: face_ix,
                            node,
                            count: nodes.len(),
                        });
                    }
                }
            }
        }
        let edge_map = EdgeMap::from_faces(&faces)?;
        Ok(Self {
            nodes,
            faces,
            edge_map,
        })
    }

    /// Number of nodes.
    #[inline]
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of faces.
    #[inline]
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// True if the mesh has no nodes or no faces.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() || self.faces.is_empty()
    }

    /// Node position of local vertex `i` of face `face`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    #[inline]
    #[must_use]
    pub fn face_vertex(&self, face: usize, i: usize) -> &Node {
        &self.nodes[self.faces[face].vertex(i)]
    }

    /// Recompute the edge map from the current face array.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::NonManifoldEdge`] when a third face claims an
    /// edge.
    pub fn rebuild_edge_map(&mut self) -> MeshResult<()> {
        self.edge_map = EdgeMap::from_faces(&self.faces)?;
        Ok(())
    }

    /// True if every edge in the map is shared by exactly two faces.
    ///
    /// An empty mesh is not closed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        !self.edge_map.is_empty() && self.edge_map.is_complete()
    }

    /// Check structural consistency: node bounds, face closure, and edge-map
    /// agreement.
    ///
    /// # Errors
    ///
    /// Returns the first inconsistency found.
    pub fn validate(&self) -> MeshResult<()> {
        for (face_ix, face) in self.faces.iter().enumerate() {
            if !face.is_closed() {
                return Err(MeshError::UnclosedFace { face: face_ix });
            }
            for edge in &face.edges {
                for &node in &edge.nodes {
                    if node >= self.nodes.len() {
                        return Err(MeshError::NodeOutOfBounds {
                            face: face_ix,
                            node,
                            count: self.nodes.len(),
                        });
                    }
                }
                if edge.is_degenerate() {
                    continue;
                }
                let claimed = self
                    .edge_map
                    .get(edge)
                    .is_some_and(|pair| pair.contains(face_ix));
                if !claimed {
                    return Err(MeshError::MissingEdge {
                        face: face_ix,
                        n0: edge.begin(),
                        n1: edge.end(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Strip degenerate edges from every face.
    ///
    /// Degenerate edges preserve local indexing during construction; callers
    /// that no longer need those indices can drop them. The edge map is
    /// unaffected (degenerate edges never enter it).
    pub fn remove_zero_edges(&mut self) {
        for face in &mut self.faces {
            face.edges.retain(|e| !e.is_degenerate());
        }
    }

    /// Rotate every node about the z-axis by `angle` radians.
    ///
    /// Latitudes are preserved, so constant-latitude edges keep their kind.
    pub fn rotate_z(&mut self, angle: f64) {
        let rotation = Rotation3::from_axis_angle(&Vector3::z_axis(), angle);
        for node in &mut self.nodes {
            node.position = Point3::from(rotation * node.position.coords);
        }
    }

    /// Remove all nodes, faces, and edge-map entries.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.faces.clear();
        self.edge_map = EdgeMap::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edge::{Edge, EdgeKind};
    use crate::grids::cube_sphere;
    use approx::assert_relative_eq;

    #[test]
    fn cube_sphere_is_closed_and_valid() {
        let mesh = cube_sphere();
        assert!(mesh.is_closed());
        mesh.validate().unwrap();
        assert_eq!(mesh.edge_map.len(), 12);
    }

    #[test]
    fn from_parts_rejects_bad_node_index() {
        let nodes = vec![Node::from_coords(0.0, 0.0, 1.0)];
        let faces = vec![Face::from_node_loop(&[0, 1, 2], EdgeKind::GreatCircle)];
        let err = SphereMesh::from_parts(nodes, faces).unwrap_err();
        assert!(matches!(err, MeshError::NodeOutOfBounds { node: 1, .. }));
    }

    #[test]
    fn validate_catches_unclosed_face() {
        let mut mesh = cube_sphere();
        mesh.faces[3].edges[1] = Edge::new(0, 0, EdgeKind::GreatCircle);
        assert_eq!(
            mesh.validate(),
            Err(MeshError::UnclosedFace { face: 3 })
        );
    }

    #[test]
    fn validate_catches_stale_edge_map() {
        let mut mesh = cube_sphere();
        mesh.edge_map = EdgeMap::new();
        assert!(matches!(
            mesh.validate(),
            Err(MeshError::MissingEdge { face: 0, .. })
        ));
    }

    #[test]
    fn remove_zero_edges_drops_degenerates() {
        let nodes = vec![
            Node::from_coords(1.0, 0.0, 0.0),
            Node::from_coords(0.0, 1.0, 0.0),
            Node::from_coords(0.0, 0.0, 1.0),
        ];
        let faces = vec![Face::new(vec![
            Edge::new(0, 1, EdgeKind::GreatCircle),
            Edge::new(1, 1, EdgeKind::GreatCircle),
            Edge::new(1, 2, EdgeKind::GreatCircle),
            Edge::new(2, 0, EdgeKind::GreatCircle),
        ])];
        let mut mesh = SphereMesh::from_parts(nodes, faces).unwrap();
        mesh.remove_zero_edges();
        assert_eq!(mesh.faces[0].edge_count(), 3);
        assert!(mesh.faces[0].is_closed());
    }

    #[test]
    fn rotate_z_preserves_latitude() {
        let mut mesh = cube_sphere();
        let before: Vec<f64> = mesh.nodes.iter().map(|n| n.position.z).collect();
        mesh.rotate_z(std::f64::consts::FRAC_PI_4);
        for (node, z) in mesh.nodes.iter().zip(before) {
            assert_relative_eq!(node.position.z, z, epsilon = 1e-15);
            assert_relative_eq!(node.coords().norm(), 1.0, epsilon = 1e-12);
        }
    }
}
