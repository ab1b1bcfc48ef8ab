//! Core types for polygonal meshes on the unit sphere.
//!
//! This crate provides the foundational types for spherical mesh processing:
//!
//! - [`Node`] - A point on the unit sphere
//! - [`Edge`] - An arc between two nodes, either a great-circle arc or an
//!   arc of constant latitude
//! - [`Face`] - A spherical polygon as a cyclic sequence of edges
//! - [`SphereMesh`] - Nodes, faces, and the undirected edge-to-face-pair map
//! - [`EdgeMap`] - Lookup from undirected edge to the two faces sharing it
//!
//! # Coordinate System
//!
//! All nodes are Cartesian `f64` coordinates on the **unit sphere**. Faces
//! use **counter-clockwise winding when viewed from outside** the sphere:
//! the face interior lies to the left of each directed boundary edge.
//!
//! # Edge Semantics
//!
//! An edge is the *shorter* arc of its carrier curve between its endpoints.
//! An edge whose endpoints are the same node index is *degenerate*: it is
//! kept in the face edge list to preserve local indexing, and skipped by
//! all traversals.
//!
//! Node equality is **geometric**, decided by a kernel tolerance in
//! downstream crates; the `PartialEq` on [`Node`] is bitwise and exists for
//! container plumbing and tests only.
//!
//! # Example
//!
//! ```
//! use sphere_types::cube_sphere;
//!
//! let mesh = cube_sphere();
//! assert_eq!(mesh.node_count(), 8);
//! assert_eq!(mesh.face_count(), 6);
//! assert!(mesh.is_closed());
//! ```

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
#![allow(clippy::cast_precision_loss)]

pub mod edge;
pub mod edge_map;
pub mod error;
pub mod face;
pub mod grids;
pub mod mesh;
pub mod node;

pub use edge::{Edge, EdgeKey, EdgeKind, FacePair};
pub use edge_map::EdgeMap;
pub use error::{MeshError, MeshResult};
pub use face::Face;
pub use grids::{cube_sphere, latlon_grid, subdivided_cube_sphere};
pub use mesh::SphereMesh;
pub use node::Node;

// Re-export the nalgebra types used in public signatures
pub use nalgebra::{Point3, Vector3};
