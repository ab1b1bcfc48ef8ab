//! Tolerance-based floating-point kernel.

use nalgebra::Vector3;
use sphere_types::Node;

use crate::kernel::SphericalKernel;
use crate::predicates::Sign;
use crate::REFERENCE_TOLERANCE;

/// Floating-point kernel with an absolute tolerance zero band.
///
/// Every sign predicate treats results within `tolerance` of zero as zero,
/// and node equality is component-wise proximity. This is fast and fine for
/// meshes whose features are well separated relative to the tolerance; use
/// [`crate::ExactKernel`] when near-degenerate configurations must be
/// classified exactly.
///
/// # Example
///
/// ```
/// use sphere_kernel::{FuzzyKernel, SphericalKernel};
/// use sphere_types::Node;
///
/// let k = FuzzyKernel::default();
/// let a = Node::from_coords(1.0, 0.0, 0.0);
/// let b = Node::from_coords(1.0, 1e-14, 0.0);
/// assert!(k.nodes_equal(&a, &b));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct FuzzyKernel {
    /// Absolute tolerance for equality and zero bands.
    pub tolerance: f64,
}

impl Default for FuzzyKernel {
    fn default() -> Self {
        Self {
            tolerance: REFERENCE_TOLERANCE,
        }
    }
}

impl FuzzyKernel {
    /// A fuzzy kernel with an explicit tolerance.
    #[must_use]
    pub fn with_tolerance(tolerance: f64) -> Self {
        Self {
            tolerance: tolerance.abs(),
        }
    }
}

impl SphericalKernel for FuzzyKernel {
    fn nodes_equal(&self, a: &Node, b: &Node) -> bool {
        let d = a.coords() - b.coords();
        d.x.abs() <= self.tolerance && d.y.abs() <= self.tolerance && d.z.abs() <= self.tolerance
    }

    fn triple_sign(&self, a: &Vector3<f64>, b: &Vector3<f64>, c: &Vector3<f64>) -> Sign {
        Sign::of_tolerant(a.cross(b).dot(c), self.tolerance)
    }

    fn scalar_sign(&self, x: f64) -> Sign {
        Sign::of_tolerant(x, self.tolerance)
    }

    fn tolerance(&self) -> f64 {
        self.tolerance
    }
}
