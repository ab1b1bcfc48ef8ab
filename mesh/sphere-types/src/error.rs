//! Error types for mesh construction and validation.

use thiserror::Error;

/// Errors that can occur while building or validating a mesh.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MeshError {
    /// An undirected edge is claimed by more than two faces.
    #[error("non-manifold edge ({n0}, {n1}): shared by more than two faces")]
    NonManifoldEdge {
        /// First node index of the edge.
        n0: usize,
        /// Second node index of the edge.
        n1: usize,
    },

    /// A face edge loop does not close on itself.
    #[error("face {face} is not a closed edge loop")]
    UnclosedFace {
        /// Offending face index.
        face: usize,
    },

    /// A face references a node index outside the node array.
    #[error("face {face} references node {node}, but the mesh has {count} nodes")]
    NodeOutOfBounds {
        /// Offending face index.
        face: usize,
        /// Out-of-bounds node index.
        node: usize,
        /// Number of nodes in the mesh.
        count: usize,
    },

    /// A non-degenerate face edge has no edge-map entry naming the face.
    #[error("edge ({n0}, {n1}) of face {face} is missing from the edge map")]
    MissingEdge {
        /// Offending face index.
        face: usize,
        /// First node index of the edge.
        n0: usize,
        /// Second node index of the edge.
        n1: usize,
    },
}

/// Result type for mesh construction and validation.
pub type MeshResult<T> = Result<T, MeshError>;
