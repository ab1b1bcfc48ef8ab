//! Lookup from undirected edge to the pair of faces sharing it.

use hashbrown::HashMap;

use crate::edge::{Edge, EdgeKey, FacePair};
use crate::error::{MeshError, MeshResult};
use crate::face::Face;

/// Map from undirected edge identity to the (at most) two faces sharing
/// the edge.
///
/// Degenerate edges never enter the map. On a closed mesh every entry is a
/// complete [`FacePair`].
#[derive(Debug, Clone, Default)]
pub struct EdgeMap {
    map: HashMap<EdgeKey, FacePair>,
}

impl EdgeMap {
    /// An empty edge map.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the map for a face array.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::NonManifoldEdge`] when a third face claims an
    /// edge.
    pub fn from_faces(faces: &[Face]) -> MeshResult<Self> {
        let mut map: HashMap<EdgeKey, FacePair> = HashMap::new();
        for (face_ix, face) in faces.iter().enumerate() {
            for edge in &face.edges {
                if edge.is_degenerate() {
                    continue;
                }
                let pair = map.entry(edge.key()).or_default();
                if !pair.insert(face_ix) {
                    return Err(MeshError::NonManifoldEdge {
                        n0: edge.key().nodes()[0],
                        n1: edge.key().nodes()[1],
                    });
                }
            }
        }
        Ok(Self { map })
    }

    /// The face pair sharing `edge`, if the edge is in the map.
    #[inline]
    #[must_use]
    pub fn get(&self, edge: &Edge) -> Option<&FacePair> {
        self.map.get(&edge.key())
    }

    /// Both faces sharing `edge`, when the edge is interior.
    #[must_use]
    pub fn faces_sharing(&self, edge: &Edge) -> Option<(usize, usize)> {
        let pair = self.get(edge)?;
        Some((pair.first()?, pair.second()?))
    }

    /// Number of undirected edges in the map.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// True if the map holds no edges.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Iterate over all entries.
    pub fn iter(&self) -> impl Iterator<Item = (&EdgeKey, &FacePair)> {
        self.map.iter()
    }

    /// True if every edge is shared by exactly two faces.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.map.values().all(FacePair::is_complete)
    }
}
