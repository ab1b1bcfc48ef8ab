//! Faces: cyclic edge loops forming spherical polygons.

use crate::edge::{Edge, EdgeKind};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A spherical polygon as an ordered cyclic sequence of edges.
///
/// Traversal is counter-clockwise when viewed from outside the sphere, so
/// the face interior lies to the left of each directed edge. Vertex `i` of
/// the face is `edges[i].begin()`, which equals `edges[i - 1].end()` on a
/// well-formed face.
///
/// # Example
///
/// ```
/// use sphere_types::{EdgeKind, Face};
///
/// let quad = Face::from_node_loop(&[0, 1, 2, 3], EdgeKind::GreatCircle);
/// assert_eq!(quad.edge_count(), 4);
/// assert_eq!(quad.vertex(2), 2);
/// assert!(quad.is_closed());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Face {
    /// Boundary edges in counter-clockwise order.
    pub edges: Vec<Edge>,
}

impl Face {
    /// Create a face from its boundary edges.
    #[inline]
    #[must_use]
    pub const fn new(edges: Vec<Edge>) -> Self {
        Self { edges }
    }

    /// Create a face from a cyclic node loop with a uniform edge kind.
    #[must_use]
    pub fn from_node_loop(nodes: &[usize], kind: EdgeKind) -> Self {
        let edges = nodes
            .iter()
            .enumerate()
            .map(|(i, &n0)| Edge::new(n0, nodes[(i + 1) % nodes.len()], kind))
            .collect();
        Self { edges }
    }

    /// Create a face from a cyclic node loop with one kind per edge.
    ///
    /// `kinds[i]` is the carrier of the edge leaving `nodes[i]`. The two
    /// slices must have equal length; excess entries of either are ignored.
    #[must_use]
    pub fn from_node_loop_with_kinds(nodes: &[usize], kinds: &[EdgeKind]) -> Self {
        debug_assert_eq!(nodes.len(), kinds.len());
        let edges = nodes
            .iter()
            .zip(kinds)
            .enumerate()
            .map(|(i, (&n0, &kind))| Edge::new(n0, nodes[(i + 1) % nodes.len()], kind))
            .collect();
        Self { edges }
    }

    /// Number of boundary edges (including degenerate ones).
    #[inline]
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// True if the face has no edges.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Node index of local vertex `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i` is out of bounds.
    #[inline]
    #[must_use]
    pub fn vertex(&self, i: usize) -> usize {
        self.edges[i].begin()
    }

    /// Iterate the node indices of the face vertices in boundary order.
    pub fn vertices(&self) -> impl Iterator<Item = usize> + '_ {
        self.edges.iter().map(Edge::begin)
    }

    /// Local index within the vertex loop of the vertex with node index
    /// `node`, if present.
    #[must_use]
    pub fn local_vertex(&self, node: usize) -> Option<usize> {
        self.edges.iter().position(|e| e.begin() == node)
    }

    /// Local index of the boundary edge covering the same undirected node
    /// pair as `edge`.
    #[must_use]
    pub fn edge_index(&self, edge: &Edge) -> Option<usize> {
        self.edges.iter().position(|e| e.same_arc(edge))
    }

    /// Node index of the next vertex along the boundary that differs from
    /// vertex `i`, walking forward past degenerate edges.
    ///
    /// Falls back to vertex `i` itself when every edge is degenerate.
    #[must_use]
    pub fn next_distinct_vertex(&self, i: usize) -> usize {
        let n = self.edges.len();
        let start = self.vertex(i);
        for step in 0..n {
            let candidate = self.edges[(i + step) % n].end();
            if candidate != start {
                return candidate;
            }
        }
        start
    }

    /// Node index of the previous vertex along the boundary that differs
    /// from vertex `i`, walking backward past degenerate edges.
    ///
    /// Falls back to vertex `i` itself when every edge is degenerate.
    #[must_use]
    pub fn prev_distinct_vertex(&self, i: usize) -> usize {
        let n = self.edges.len();
        let start = self.vertex(i);
        for step in 1..=n {
            let candidate = self.edges[(i + n - step) % n].begin();
            if candidate != start {
                return candidate;
            }
        }
        start
    }

    /// The edge arriving at local vertex `i`, i.e. the last non-degenerate
    /// edge before it; `None` when every edge is degenerate.
    #[must_use]
    pub fn edge_into_vertex(&self, i: usize) -> Option<&Edge> {
        let n = self.edges.len();
        (1..=n)
            .map(|step| &self.edges[(i + n - step) % n])
            .find(|e| !e.is_degenerate())
    }

    /// The edge leaving local vertex `i`, i.e. the first non-degenerate
    /// edge at or after it; `None` when every edge is degenerate.
    #[must_use]
    pub fn edge_out_of_vertex(&self, i: usize) -> Option<&Edge> {
        let n = self.edges.len();
        (0..n)
            .map(|step| &self.edges[(i + step) % n])
            .find(|e| !e.is_degenerate())
    }

    /// True if consecutive edges share endpoints all the way around.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        !self.edges.is_empty()
            && self
                .edges
                .iter()
                .enumerate()
                .all(|(i, e)| e.end() == self.edges[(i + 1) % self.edges.len()].begin())
    }
}
