//! The kernel capability trait and its result types.

use nalgebra::Vector3;
use smallvec::SmallVec;
use sphere_types::{EdgeKind, Node, SphereMesh};
use thiserror::Error;

use crate::predicates::Sign;
use crate::{intersect, locate};

/// Where a node sits relative to a face's closure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum NodeLocation {
    /// Strictly inside the face.
    #[default]
    Interior,
    /// On the interior of a boundary edge.
    Edge,
    /// On a face vertex.
    Vertex,
}

/// The faces whose closure contains a query node.
///
/// `locations[i]` is the local index within `faces[i]` of the matched
/// feature: a vertex index when `location` is [`NodeLocation::Vertex`], an
/// edge index for [`NodeLocation::Edge`], and unused for interior hits.
#[derive(Debug, Clone, Default)]
pub struct FaceCandidates {
    /// Face indices whose closure contains the node.
    pub faces: SmallVec<[usize; 4]>,
    /// Local feature index within each face.
    pub locations: SmallVec<[usize; 4]>,
    /// The strongest feature the node lies on.
    pub location: NodeLocation,
}

impl FaceCandidates {
    /// A single-face interior result.
    #[must_use]
    pub fn interior(face: usize) -> Self {
        Self {
            faces: SmallVec::from_slice(&[face]),
            locations: SmallVec::from_slice(&[0]),
            location: NodeLocation::Interior,
        }
    }

    /// The two faces sharing an edge, with their local edge indices.
    #[must_use]
    pub fn on_edge(face0: usize, edge0: usize, face1: usize, edge1: usize) -> Self {
        Self {
            faces: SmallVec::from_slice(&[face0, face1]),
            locations: SmallVec::from_slice(&[edge0, edge1]),
            location: NodeLocation::Edge,
        }
    }

    /// Number of candidate faces.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.faces.len()
    }

    /// True when no face contains the node.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }
}

/// Result of intersecting two edges.
#[derive(Debug, Clone, Default)]
pub struct EdgeCrossings {
    /// True when the two arcs share an interval of the same circle. The
    /// point list is empty in that case.
    pub coincident: bool,
    /// Intersection points, at most two for ordinary edges.
    pub points: SmallVec<[Node; 2]>,
}

/// Errors from kernel point-location queries.
#[derive(Debug, Error, PartialEq)]
pub enum KernelError {
    /// No face of the mesh contains the query node.
    #[error("no face contains the node at ({x}, {y}, {z})")]
    NoFaceFound {
        /// Query position.
        x: f64,
        /// Query position.
        y: f64,
        /// Query position.
        z: f64,
    },

    /// No face of the mesh is incident to the queried vertex.
    #[error("no face is incident to vertex {vertex}")]
    NoIncidentFace {
        /// Queried vertex index.
        vertex: usize,
    },

    /// A near-node query was handed an empty candidate set.
    #[error("face disambiguation requires at least one candidate face")]
    NoCandidates,
}

/// Result type for kernel queries.
pub type KernelResult<T> = Result<T, KernelError>;

/// Predicates and constructions on spherical nodes and edges.
///
/// Implementations provide four primitives; the geometric operations are
/// built on top of them and shared. `triple_sign` is the workhorse: the
/// sign of `(a x b) . c` decides which side of the great circle through
/// `a` and `b` the point `c` lies on.
pub trait SphericalKernel {
    /// Geometric node equality. Reflexive and symmetric; a proximity
    /// relation, not necessarily transitive.
    fn nodes_equal(&self, a: &Node, b: &Node) -> bool;

    /// Sign of the scalar triple product `(a x b) . c`.
    fn triple_sign(&self, a: &Vector3<f64>, b: &Vector3<f64>, c: &Vector3<f64>) -> Sign;

    /// Sign of a scalar against the kernel's zero band.
    fn scalar_sign(&self, x: f64) -> Sign;

    /// Absolute tolerance used when filtering constructed points.
    fn tolerance(&self) -> f64;

    /// All intersections of two edges.
    ///
    /// Returns at most two points for ordinary edges; arc endpoints count
    /// as intersections. Reports `coincident` when the arcs share an
    /// interval of the same great or small circle.
    fn edge_crossings(
        &self,
        a0: &Node,
        a1: &Node,
        kind_a: EdgeKind,
        b0: &Node,
        b1: &Node,
        kind_b: EdgeKind,
    ) -> EdgeCrossings
    where
        Self: Sized,
    {
        intersect::edge_crossings(self, a0, a1, kind_a, b0, b1, kind_b)
    }

    /// All faces of `mesh` whose closure contains `node`.
    ///
    /// Containment assumes convex faces: the node must lie to the left of
    /// every directed boundary edge.
    fn find_face_from_node(&self, mesh: &SphereMesh, node: &Node) -> FaceCandidates
    where
        Self: Sized,
    {
        locate::find_face_from_node(self, mesh, node)
    }

    /// Of the faces incident to mesh vertex `vertex`, the unique one that
    /// an edge of kind `kind` leaving the vertex toward `toward` enters.
    ///
    /// A direction running exactly along a shared boundary edge selects
    /// the face whose counter-clockwise boundary traverses that edge in
    /// the same direction.
    ///
    /// # Errors
    ///
    /// Returns [`KernelError::NoFaceFound`] when no face of the mesh uses
    /// the vertex.
    fn find_face_near_vertex(
        &self,
        mesh: &SphereMesh,
        vertex: usize,
        toward: &Node,
        kind: EdgeKind,
    ) -> KernelResult<usize>
    where
        Self: Sized,
    {
        locate::find_face_near_vertex(self, mesh, vertex, toward, kind)
    }

    /// Of the candidate faces at `at`, the unique one that an edge of kind
    /// `kind` leaving `at` toward `toward` enters.
    ///
    /// # Errors
    ///
    /// Returns [`KernelError::NoCandidates`] when the candidate set is
    /// empty.
    fn find_face_near_node(
        &self,
        mesh: &SphereMesh,
        at: &Node,
        toward: &Node,
        kind: EdgeKind,
        candidates: &FaceCandidates,
    ) -> KernelResult<usize>
    where
        Self: Sized,
    {
        locate::find_face_near_node(self, mesh, at, toward, kind, candidates)
    }
}
