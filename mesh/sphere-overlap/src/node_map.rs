//! Coincident-node pre-pass.

use sphere_kernel::SphericalKernel;
use sphere_types::SphereMesh;

use crate::dedup::NodeBins;

/// For each second-mesh node, the first-mesh node it coincides with under
/// the kernel's equality, if any. Also returns the coincidence count.
///
/// Every node collapsed here is a degeneracy the tracer never has to
/// resolve: the shared node enters the overlap mesh once, under its
/// first-mesh index.
pub(crate) fn build_second_node_map<K: SphericalKernel>(
    kernel: &K,
    first: &SphereMesh,
    second: &SphereMesh,
    bin_width: f64,
) -> (Vec<Option<usize>>, usize) {
    let mut bins = NodeBins::hashed(bin_width);
    for (index, node) in first.nodes.iter().enumerate() {
        bins.insert(node, index);
    }

    let mut map = Vec::with_capacity(second.node_count());
    let mut coincident = 0usize;
    for node in &second.nodes {
        let hit = bins.find_equal(kernel, node);
        if hit.is_some() {
            coincident += 1;
        }
        map.push(hit);
    }
    (map, coincident)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sphere_kernel::FuzzyKernel;
    use sphere_types::{cube_sphere, subdivided_cube_sphere};

    #[test]
    fn identical_meshes_map_identically() {
        let kernel = FuzzyKernel::default();
        let mesh = cube_sphere();
        let (map, coincident) = build_second_node_map(&kernel, &mesh, &mesh, 0.1);
        assert_eq!(coincident, 8);
        for (j, entry) in map.iter().enumerate() {
            assert_eq!(*entry, Some(j));
        }
    }

    #[test]
    fn refined_mesh_shares_corners_only() {
        let kernel = FuzzyKernel::default();
        let coarse = cube_sphere();
        let fine = subdivided_cube_sphere(2);
        let (map, coincident) = build_second_node_map(&kernel, &coarse, &fine, 0.1);
        assert_eq!(coincident, 8);
        assert_eq!(map.iter().filter(|m| m.is_none()).count(), 18);
    }

    #[test]
    fn disjoint_nodes_do_not_map() {
        let kernel = FuzzyKernel::default();
        let coarse = cube_sphere();
        let mut rotated = cube_sphere();
        rotated.rotate_z(0.3);
        let (map, coincident) = build_second_node_map(&kernel, &coarse, &rotated, 0.1);
        assert_eq!(coincident, 0);
        assert!(map.iter().all(Option::is_none));
    }
}
