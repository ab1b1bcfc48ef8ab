//! Geometric kernel for spherical meshes.
//!
//! This crate provides the predicates and constructions consumed by the
//! overlap generator:
//!
//! - [`SphericalKernel`] - the capability trait: node equality, sign
//!   predicates, edge-edge intersection, and point location
//! - [`FuzzyKernel`] - tolerance-based floating-point evaluation
//! - [`ExactKernel`] - adaptive exact sign predicates over input nodes
//!
//! Both kernels satisfy the same contract and are interchangeable; one run
//! of the overlap generator must use a single kernel throughout. Kernels
//! are stateless, so concurrent invocation is safe.
//!
//! # Equality Is a Proximity Relation
//!
//! `nodes_equal` is reflexive and symmetric but not necessarily transitive:
//! it compares positions against a tolerance. Constructed intersection
//! points are floating point under both kernels, so even the exact kernel
//! keeps a (tight) proximity equality. Exactness applies to the sign
//! predicates over input nodes: face containment, arc coincidence, and
//! latitude comparisons.
//!
//! # Conventions
//!
//! Faces wind counter-clockwise viewed from outside the sphere, so a node
//! is inside a face when it lies to the left of every directed boundary
//! edge. A constant-latitude edge takes its latitude from its begin node.

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
#![allow(clippy::suboptimal_flops)]

pub mod exact;
pub mod fuzzy;
mod intersect;
pub mod kernel;
mod locate;
pub mod predicates;

pub use exact::ExactKernel;
pub use fuzzy::FuzzyKernel;
pub use kernel::{
    EdgeCrossings, FaceCandidates, KernelError, KernelResult, NodeLocation, SphericalKernel,
};
pub use predicates::Sign;

/// Loose tolerance for checks that must absorb accumulated rounding.
pub const HIGH_TOLERANCE: f64 = 1.0e-10;

/// Baseline tolerance for node equality and sign zero bands.
pub const REFERENCE_TOLERANCE: f64 = 1.0e-12;
