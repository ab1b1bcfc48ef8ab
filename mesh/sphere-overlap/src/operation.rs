//! Top-level overlap generation.

use sphere_kernel::{ExactKernel, FuzzyKernel, SphericalKernel};
use sphere_types::{EdgeMap, Node, SphereMesh};
use tracing::{debug, info};

use crate::assemble::assemble_faces;
use crate::config::{DedupStrategy, KernelChoice, OverlapConfig};
use crate::dedup::dedup_new_nodes;
use crate::error::{OverlapError, OverlapResult};
use crate::node_map::build_second_node_map;
use crate::trace::trace_face;

/// Statistics from an overlap generation run.
#[derive(Debug, Clone, Copy, Default)]
pub struct OverlapStats {
    /// Second-mesh nodes that coincided with a first-mesh node.
    pub coincident_nodes: usize,
    /// Intersection nodes discovered by the tracer.
    pub new_intersection_nodes: usize,
    /// Overlap faces assembled from traced boundaries.
    pub boundary_faces: usize,
    /// Overlap faces emitted by the interior flood fill.
    pub interior_faces: usize,
    /// Intersection nodes removed by the dedup post-pass.
    pub deduplicated_nodes: usize,
}

/// The overlap mesh with per-face provenance.
///
/// The node array starts with every first-mesh node at its original index,
/// followed by the second-mesh nodes that did not coincide with a
/// first-mesh node, followed by the intersection nodes the tracer
/// discovered. `second_node_map[j]` is the overlap index of second-mesh
/// node `j`. The edge map is left empty for a downstream rebuild.
#[derive(Debug, Clone, Default)]
pub struct OverlapMesh {
    /// Nodes and faces of the overlap mesh.
    pub mesh: SphereMesh,
    /// For each overlap face, the first-mesh face containing it.
    pub first_face_ix: Vec<usize>,
    /// For each overlap face, the second-mesh face containing it.
    pub second_face_ix: Vec<usize>,
    /// Overlap index of each second-mesh node.
    pub second_node_map: Vec<usize>,
}

/// Result of an overlap generation run.
#[derive(Debug, Clone, Default)]
pub struct OverlapOperationResult {
    /// The overlap mesh.
    pub overlap: OverlapMesh,
    /// Statistics about the run.
    pub stats: OverlapStats,
}

/// Generate the overlap mesh of two closed spherical meshes.
///
/// Every face of the result is the intersection of one `first` face with
/// one `second` face; the union of the result equals the sphere.
///
/// # Errors
///
/// Returns an error when an input mesh is empty or not closed, or when
/// the tracer or assembler meets an unsupported or inconsistent
/// configuration; see [`OverlapError`].
///
/// # Example
///
/// ```
/// use sphere_overlap::{generate_overlap, OverlapConfig};
/// use sphere_types::{cube_sphere, subdivided_cube_sphere};
///
/// let coarse = cube_sphere();
/// let fine = subdivided_cube_sphere(2);
/// let result = generate_overlap(&coarse, &fine, &OverlapConfig::default()).unwrap();
/// assert_eq!(result.overlap.mesh.face_count(), 24);
/// ```
pub fn generate_overlap(
    first: &SphereMesh,
    second: &SphereMesh,
    config: &OverlapConfig,
) -> OverlapResult<OverlapOperationResult> {
    generate_overlap_with_progress(first, second, config, |_, _| true)
}

/// [`generate_overlap`] with a cancellation hook.
///
/// `progress` is invoked before each first-mesh face with the face index
/// and the face count; returning `false` aborts the run with
/// [`OverlapError::Cancelled`].
///
/// # Errors
///
/// As [`generate_overlap`], plus [`OverlapError::Cancelled`].
pub fn generate_overlap_with_progress(
    first: &SphereMesh,
    second: &SphereMesh,
    config: &OverlapConfig,
    progress: impl FnMut(usize, usize) -> bool,
) -> OverlapResult<OverlapOperationResult> {
    match config.kernel {
        KernelChoice::Fuzzy => generate_overlap_impl(
            &FuzzyKernel::with_tolerance(config.tolerance),
            first,
            second,
            config,
            progress,
        ),
        KernelChoice::Exact => generate_overlap_impl(
            &ExactKernel {
                tolerance: config.tolerance,
            },
            first,
            second,
            config,
            progress,
        ),
    }
}

/// [`generate_overlap`] monomorphized over an explicit kernel.
///
/// The `kernel` field of `config` is ignored; everything else applies.
///
/// # Errors
///
/// As [`generate_overlap`].
pub fn generate_overlap_with<K: SphericalKernel>(
    kernel: &K,
    first: &SphereMesh,
    second: &SphereMesh,
    config: &OverlapConfig,
) -> OverlapResult<OverlapOperationResult> {
    generate_overlap_impl(kernel, first, second, config, |_, _| true)
}

fn generate_overlap_impl<K: SphericalKernel>(
    kernel: &K,
    first: &SphereMesh,
    second: &SphereMesh,
    config: &OverlapConfig,
    mut progress: impl FnMut(usize, usize) -> bool,
) -> OverlapResult<OverlapOperationResult> {
    validate_input(first, "first")?;
    validate_input(second, "second")?;

    let (nodes, second_node_map, coincident_nodes, new_start) =
        prepare_overlap_nodes(kernel, first, second, config.dedup_bin_width);
    info!(
        coincident_nodes,
        second_nodes = second.node_count(),
        "coincident node pre-pass"
    );

    let mut overlap = OverlapMesh {
        mesh: SphereMesh {
            nodes,
            faces: Vec::new(),
            edge_map: EdgeMap::new(),
        },
        first_face_ix: Vec::new(),
        second_face_ix: Vec::new(),
        second_node_map,
    };
    let mut stats = OverlapStats {
        coincident_nodes,
        ..OverlapStats::default()
    };

    let face_count = first.face_count();
    for first_face_ix in 0..face_count {
        if !progress(first_face_ix, face_count) {
            return Err(OverlapError::Cancelled);
        }
        let segments = trace_face(
            kernel,
            first,
            second,
            &overlap.second_node_map,
            first_face_ix,
            &mut overlap.mesh.nodes,
        )?;
        debug!(
            first_face = first_face_ix,
            segments = segments.len(),
            "traced boundary"
        );
        let assembled = assemble_faces(second, &overlap.second_node_map, &segments, first_face_ix)?;
        stats.boundary_faces += assembled.boundary_count;
        stats.interior_faces += assembled.faces.len() - assembled.boundary_count;
        for (face, second_face_ix) in assembled.faces {
            overlap.mesh.faces.push(face);
            overlap.first_face_ix.push(first_face_ix);
            overlap.second_face_ix.push(second_face_ix);
        }
    }

    stats.new_intersection_nodes = overlap.mesh.node_count() - new_start;
    if config.dedup != DedupStrategy::RetainAll {
        stats.deduplicated_nodes = dedup_new_nodes(
            kernel,
            &mut overlap.mesh,
            new_start,
            config.dedup,
            config.dedup_bin_width,
        );
    }

    info!(
        faces = overlap.mesh.face_count(),
        new_nodes = stats.new_intersection_nodes,
        deduplicated = stats.deduplicated_nodes,
        "overlap mesh generated"
    );
    Ok(OverlapOperationResult { overlap, stats })
}

/// Fill the overlap node array and resolve the second-node map: all
/// first-mesh nodes, then the second-mesh nodes with no coincident
/// first-mesh node. Returns the node array, the resolved map, the
/// coincidence count, and the index where tracer-discovered nodes will
/// start.
pub(crate) fn prepare_overlap_nodes<K: SphericalKernel>(
    kernel: &K,
    first: &SphereMesh,
    second: &SphereMesh,
    bin_width: f64,
) -> (Vec<Node>, Vec<usize>, usize, usize) {
    let (sparse_map, coincident_nodes) = build_second_node_map(kernel, first, second, bin_width);

    let mut nodes = first.nodes.clone();
    nodes.reserve(second.node_count());
    let mut second_node_map = Vec::with_capacity(second.node_count());
    for (j, entry) in sparse_map.iter().enumerate() {
        match entry {
            Some(first_ix) => second_node_map.push(*first_ix),
            None => {
                nodes.push(second.nodes[j]);
                second_node_map.push(nodes.len() - 1);
            }
        }
    }
    let new_start = nodes.len();
    (nodes, second_node_map, coincident_nodes, new_start)
}

fn validate_input(mesh: &SphereMesh, which: &'static str) -> OverlapResult<()> {
    if mesh.is_empty() {
        return Err(OverlapError::EmptyMesh { which });
    }
    if !mesh.is_closed() {
        return Err(OverlapError::OpenMesh { which });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sphere_types::cube_sphere;

    #[test]
    fn empty_input_is_rejected() {
        let empty = SphereMesh::new();
        let cube = cube_sphere();
        let err = generate_overlap(&empty, &cube, &OverlapConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            OverlapError::EmptyMesh { which: "first" }
        ));
    }

    #[test]
    fn open_input_is_rejected() {
        let mut open = cube_sphere();
        open.faces.pop();
        open.rebuild_edge_map().unwrap();
        let cube = cube_sphere();
        let err = generate_overlap(&cube, &open, &OverlapConfig::default()).unwrap_err();
        assert!(matches!(err, OverlapError::OpenMesh { which: "second" }));
    }

    #[test]
    fn cancellation_stops_the_run() {
        let cube = cube_sphere();
        let err = generate_overlap_with_progress(
            &cube,
            &cube,
            &OverlapConfig::default(),
            |face, _| face < 2,
        )
        .unwrap_err();
        assert!(matches!(err, OverlapError::Cancelled));
    }

    #[test]
    fn node_layout_preserves_first_indices() {
        let kernel = FuzzyKernel::default();
        let coarse = cube_sphere();
        let fine = sphere_types::subdivided_cube_sphere(2);
        let (nodes, map, coincident, new_start) =
            prepare_overlap_nodes(&kernel, &coarse, &fine, 0.1);
        assert_eq!(coincident, 8);
        assert_eq!(new_start, 8 + 18);
        for (i, node) in coarse.nodes.iter().enumerate() {
            assert_eq!(nodes[i].position, node.position);
        }
        // Mapped second nodes point either at a first node or at their
        // appended position.
        for (j, &ix) in map.iter().enumerate() {
            assert_eq!(nodes[ix].position, fine.nodes[j].position);
        }
    }
}
