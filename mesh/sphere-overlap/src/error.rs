//! Error types for overlap generation.

use sphere_kernel::KernelError;
use sphere_types::MeshError;
use thiserror::Error;

/// Errors that can occur during overlap mesh generation.
#[derive(Debug, Error)]
pub enum OverlapError {
    /// An input mesh has no nodes or no faces.
    #[error("{which} mesh is empty")]
    EmptyMesh {
        /// Which input ("first" or "second").
        which: &'static str,
    },

    /// An input mesh does not tile the sphere: some edge has fewer than two
    /// adjacent faces.
    #[error("{which} mesh is not closed: every edge must be shared by two faces")]
    OpenMesh {
        /// Which input ("first" or "second").
        which: &'static str,
    },

    /// No second-mesh face contains the starting vertex of a first-mesh
    /// face.
    #[error("no second-mesh face contains vertex {vertex} of first face {face}")]
    NoInitialFace {
        /// First-mesh face being traced.
        face: usize,
        /// Its starting node index.
        vertex: usize,
    },

    /// The tracer met a degenerate edge in a second-mesh face.
    #[error("zero-length edge {edge} in second face {face}")]
    ZeroEdge {
        /// Second-mesh face index.
        face: usize,
        /// Local edge index within the face.
        edge: usize,
    },

    /// An edge of the first mesh shares an arc interval with an edge of the
    /// second mesh in a configuration the tracer cannot resolve.
    #[error(
        "coincident arcs between first face {first_face} and second face {second_face} \
         are not supported"
    )]
    CoincidentEdges {
        /// First-mesh face being traced.
        first_face: usize,
        /// Second-mesh face being scanned.
        second_face: usize,
    },

    /// One first-mesh edge crossed one second-mesh edge more than once.
    #[error(
        "multiple intersections between an edge of first face {first_face} and an edge of \
         second face {second_face}: non-convex intersections are not supported"
    )]
    NonConvexIntersection {
        /// First-mesh face being traced.
        first_face: usize,
        /// Second-mesh face being scanned.
        second_face: usize,
    },

    /// A second-mesh edge has no edge-map entry.
    #[error("edge ({n0}, {n1}) is missing from the second-mesh edge map")]
    EdgeNotInMap {
        /// First node index of the edge.
        n0: usize,
        /// Second node index of the edge.
        n1: usize,
    },

    /// An edge-map entry names neither the face being walked nor a
    /// neighbour.
    #[error("edge map names neither side of second face {face} for edge ({n0}, {n1})")]
    EdgeMapInconsistent {
        /// The face that claims the edge.
        face: usize,
        /// First node index of the edge.
        n0: usize,
        /// Second node index of the edge.
        n1: usize,
    },

    /// The assembler tried to consume a path segment twice.
    #[error("path segment {segment} of first face {face} is already part of an overlap face")]
    SegmentReuse {
        /// First-mesh face being assembled.
        face: usize,
        /// Offending segment index.
        segment: usize,
    },

    /// The assembler walked more interior edges than the second face has.
    #[error(
        "assembly of first face {face} looped past the boundary of second face \
         {second_face}: possible infinite loop"
    )]
    PossibleInfiniteLoop {
        /// First-mesh face being assembled.
        face: usize,
        /// Second-mesh face being walked.
        second_face: usize,
    },

    /// The progress callback requested cancellation.
    #[error("operation cancelled")]
    Cancelled,

    /// A kernel point-location query failed.
    #[error(transparent)]
    Kernel(#[from] KernelError),

    /// A mesh construction step failed.
    #[error(transparent)]
    Mesh(#[from] MeshError),
}

/// Result type for overlap generation.
pub type OverlapResult<T> = Result<T, OverlapError>;
