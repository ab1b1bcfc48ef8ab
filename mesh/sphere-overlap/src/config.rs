//! Configuration for overlap generation.
//!
//! # Example
//!
//! ```
//! use sphere_overlap::{DedupStrategy, KernelChoice, OverlapConfig};
//!
//! let config = OverlapConfig::default()
//!     .with_kernel(KernelChoice::Exact)
//!     .with_dedup(DedupStrategy::SortedMultimap);
//! assert_eq!(config.kernel, KernelChoice::Exact);
//! ```

use sphere_kernel::REFERENCE_TOLERANCE;

/// Which geometric kernel drives the whole run.
///
/// The same kernel is used throughout one invocation; switching kernels
/// between runs must not change the overlap topology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KernelChoice {
    /// Tolerance-based floating point. Fast; fine for well-separated
    /// meshes.
    #[default]
    Fuzzy,
    /// Adaptive exact sign predicates over input nodes.
    Exact,
}

/// How numerically-coincident new intersection nodes are unified after
/// generation.
///
/// Nodes carried over from the input meshes are never touched; only nodes
/// discovered as strict-interior edge crossings are candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DedupStrategy {
    /// Keep every node as discovered, duplicates included.
    RetainAll,
    /// Hash nodes into spatial bins and compare within the bins a
    /// tolerance cube overlaps. Fast; a duplicate straddling bins in an
    /// unlucky way can survive.
    #[default]
    HashedGrid,
    /// Ordered bins with an exhaustive neighbour scan. Slowest, but no
    /// duplicate survives.
    SortedMultimap,
}

/// Configuration for [`crate::generate_overlap`].
#[derive(Debug, Clone)]
pub struct OverlapConfig {
    /// Kernel selection for the whole run.
    pub kernel: KernelChoice,

    /// Post-pass deduplication of new intersection nodes.
    pub dedup: DedupStrategy,

    /// Spatial bin width used by the coincident-node pre-pass and the
    /// dedup post-pass.
    pub dedup_bin_width: f64,

    /// Absolute tolerance handed to the kernel for node equality and zero
    /// bands.
    pub tolerance: f64,
}

impl Default for OverlapConfig {
    fn default() -> Self {
        Self {
            kernel: KernelChoice::default(),
            dedup: DedupStrategy::default(),
            dedup_bin_width: 0.1,
            tolerance: REFERENCE_TOLERANCE,
        }
    }
}

impl OverlapConfig {
    /// Configuration using the exact kernel.
    #[must_use]
    pub fn exact() -> Self {
        Self {
            kernel: KernelChoice::Exact,
            ..Self::default()
        }
    }

    /// Configuration that keeps every discovered node.
    #[must_use]
    pub fn retain_all() -> Self {
        Self {
            dedup: DedupStrategy::RetainAll,
            ..Self::default()
        }
    }

    /// Set the kernel selection.
    #[must_use]
    pub fn with_kernel(mut self, kernel: KernelChoice) -> Self {
        self.kernel = kernel;
        self
    }

    /// Set the dedup strategy.
    #[must_use]
    pub fn with_dedup(mut self, dedup: DedupStrategy) -> Self {
        self.dedup = dedup;
        self
    }

    /// Set the spatial bin width.
    ///
    /// Values at or below zero fall back to the default width.
    #[must_use]
    pub fn with_dedup_bin_width(mut self, width: f64) -> Self {
        self.dedup_bin_width = if width > 0.0 { width } else { 0.1 };
        self
    }

    /// Set the kernel tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance.abs();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = OverlapConfig::default();
        assert_eq!(config.kernel, KernelChoice::Fuzzy);
        assert_eq!(config.dedup, DedupStrategy::HashedGrid);
        assert!((config.dedup_bin_width - 0.1).abs() < f64::EPSILON);
    }

    #[test]
    fn presets() {
        assert_eq!(OverlapConfig::exact().kernel, KernelChoice::Exact);
        assert_eq!(OverlapConfig::retain_all().dedup, DedupStrategy::RetainAll);
    }

    #[test]
    fn builder_methods() {
        let config = OverlapConfig::default()
            .with_kernel(KernelChoice::Exact)
            .with_dedup(DedupStrategy::RetainAll)
            .with_dedup_bin_width(0.25)
            .with_tolerance(-1e-10);
        assert_eq!(config.kernel, KernelChoice::Exact);
        assert_eq!(config.dedup, DedupStrategy::RetainAll);
        assert!((config.dedup_bin_width - 0.25).abs() < f64::EPSILON);
        assert!(config.tolerance > 0.0);
    }

    #[test]
    fn bad_bin_width_falls_back() {
        let config = OverlapConfig::default().with_dedup_bin_width(0.0);
        assert!((config.dedup_bin_width - 0.1).abs() < f64::EPSILON);
    }
}
