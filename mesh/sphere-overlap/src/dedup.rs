//! Spatial node bins and the node-deduplication post-pass.

use std::collections::BTreeMap;

use hashbrown::HashMap;
use smallvec::SmallVec;
use sphere_kernel::SphericalKernel;
use sphere_types::{Node, SphereMesh};
use tracing::debug;

use crate::config::DedupStrategy;

type BinKey = [i64; 3];
type Bin = SmallVec<[(usize, Node); 4]>;

/// Nodes binned by quantized position for proximity lookups.
///
/// The hashed variant compares against the bins a tolerance cube around
/// the query overlaps; the sorted variant scans the full neighbourhood of
/// the query bin, so no equal node is ever missed (for tolerances below
/// the bin width).
#[derive(Debug)]
pub(crate) enum NodeBins {
    Hashed {
        /// Bin edge length.
        width: f64,
        /// Bin contents.
        bins: HashMap<BinKey, Bin>,
    },
    Sorted {
        /// Bin edge length.
        width: f64,
        /// Bin contents in key order.
        bins: BTreeMap<BinKey, Bin>,
    },
}

impl NodeBins {
    pub(crate) fn hashed(width: f64) -> Self {
        Self::Hashed {
            width,
            bins: HashMap::new(),
        }
    }

    pub(crate) fn sorted(width: f64) -> Self {
        Self::Sorted {
            width,
            bins: BTreeMap::new(),
        }
    }

    fn width(&self) -> f64 {
        match self {
            Self::Hashed { width, .. } | Self::Sorted { width, .. } => *width,
        }
    }

    fn key(&self, node: &Node) -> BinKey {
        let w = self.width();
        [
            (node.position.x / w).floor() as i64,
            (node.position.y / w).floor() as i64,
            (node.position.z / w).floor() as i64,
        ]
    }

    pub(crate) fn insert(&mut self, node: &Node, index: usize) {
        let key = self.key(node);
        match self {
            Self::Hashed { bins, .. } => bins.entry(key).or_default().push((index, *node)),
            Self::Sorted { bins, .. } => bins.entry(key).or_default().push((index, *node)),
        }
    }

    /// The lowest index of a stored node geometrically equal to `node`.
    pub(crate) fn find_equal<K: SphericalKernel>(&self, kernel: &K, node: &Node) -> Option<usize> {
        let mut found: Option<usize> = None;
        let mut check_bin = |bin: Option<&Bin>| {
            if let Some(entries) = bin {
                for (index, stored) in entries {
                    if kernel.nodes_equal(stored, node) && found.map_or(true, |f| *index < f) {
                        found = Some(*index);
                    }
                }
            }
        };

        match self {
            Self::Hashed { width, bins } => {
                // Only the bins a tolerance cube around the node overlaps.
                let tol = kernel.tolerance();
                let mut keys: SmallVec<[BinKey; 8]> = SmallVec::new();
                for dx in [-tol, tol] {
                    for dy in [-tol, tol] {
                        for dz in [-tol, tol] {
                            let key = [
                                ((node.position.x + dx) / width).floor() as i64,
                                ((node.position.y + dy) / width).floor() as i64,
                                ((node.position.z + dz) / width).floor() as i64,
                            ];
                            if !keys.contains(&key) {
                                keys.push(key);
                            }
                        }
                    }
                }
                for key in keys {
                    check_bin(bins.get(&key));
                }
            }
            Self::Sorted { bins, .. } => {
                let centre = self.key(node);
                for dx in -1..=1 {
                    for dy in -1..=1 {
                        for dz in -1..=1 {
                            let key = [centre[0] + dx, centre[1] + dy, centre[2] + dz];
                            check_bin(bins.get(&key));
                        }
                    }
                }
            }
        }
        found
    }
}

/// Unify geometrically-equal nodes at or past `new_start`, rewriting face
/// indices and compacting the node array. Nodes below `new_start` (the
/// nodes carried over from the input meshes) are never moved or merged
/// into each other.
///
/// Returns the number of nodes removed.
pub(crate) fn dedup_new_nodes<K: SphericalKernel>(
    kernel: &K,
    mesh: &mut SphereMesh,
    new_start: usize,
    strategy: DedupStrategy,
    bin_width: f64,
) -> usize {
    if mesh.nodes.len() <= new_start {
        return 0;
    }
    let mut bins = match strategy {
        DedupStrategy::RetainAll => return 0,
        DedupStrategy::HashedGrid => NodeBins::hashed(bin_width),
        DedupStrategy::SortedMultimap => NodeBins::sorted(bin_width),
    };

    for (index, node) in mesh.nodes[..new_start].iter().enumerate() {
        bins.insert(node, index);
    }

    let mut remap: Vec<usize> = (0..mesh.nodes.len()).collect();
    let mut kept: Vec<Node> = mesh.nodes[..new_start].to_vec();
    let mut removed = 0usize;

    for original in new_start..mesh.nodes.len() {
        let node = mesh.nodes[original];
        if let Some(existing) = bins.find_equal(kernel, &node) {
            remap[original] = existing;
            removed += 1;
        } else {
            let target = kept.len();
            kept.push(node);
            bins.insert(&node, target);
            remap[original] = target;
        }
    }

    if removed > 0 {
        mesh.nodes = kept;
        for face in &mut mesh.faces {
            for edge in &mut face.edges {
                edge.nodes = [remap[edge.nodes[0]], remap[edge.nodes[1]]];
            }
        }
        debug!(removed, "deduplicated new intersection nodes");
    }
    removed
}
