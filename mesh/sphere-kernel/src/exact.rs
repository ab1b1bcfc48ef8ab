//! Adaptive exact kernel.

use nalgebra::Vector3;
use sphere_types::Node;

use crate::kernel::SphericalKernel;
use crate::predicates::{triple_product_sign, Sign};
use crate::REFERENCE_TOLERANCE;

/// Kernel with exact sign predicates over input nodes.
///
/// Triple-product and scalar signs are evaluated exactly (an adaptive
/// floating-point filter with an exact expansion-arithmetic fallback), so
/// containment and coincidence classifications never suffer rounding.
/// Intersection points are still constructed in floating point, which is
/// why node equality remains a proximity relation with a tight tolerance;
/// the tolerance also filters constructed points against arcs.
///
/// Running the overlap generator with this kernel and with
/// [`crate::FuzzyKernel`] must produce the same topology; coordinates may
/// differ within tolerance.
#[derive(Debug, Clone, Copy)]
pub struct ExactKernel {
    /// Tolerance for node equality and constructed-point filtering.
    pub tolerance: f64,
}

impl Default for ExactKernel {
    fn default() -> Self {
        Self {
            tolerance: REFERENCE_TOLERANCE,
        }
    }
}

impl SphericalKernel for ExactKernel {
    fn nodes_equal(&self, a: &Node, b: &Node) -> bool {
        let d = a.coords() - b.coords();
        d.x.abs() <= self.tolerance && d.y.abs() <= self.tolerance && d.z.abs() <= self.tolerance
    }

    fn triple_sign(&self, a: &Vector3<f64>, b: &Vector3<f64>, c: &Vector3<f64>) -> Sign {
        triple_product_sign(a, b, c)
    }

    fn scalar_sign(&self, x: f64) -> Sign {
        Sign::of(x)
    }

    fn tolerance(&self) -> f64 {
        self.tolerance
    }
}
