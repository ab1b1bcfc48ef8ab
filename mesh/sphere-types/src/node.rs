//! Nodes on the unit sphere.

use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A point on the unit sphere.
///
/// The derived `PartialEq` compares coordinates bitwise and exists for
/// container plumbing and tests. Geometric equality of nodes is a kernel
/// question and goes through a tolerance.
///
/// # Example
///
/// ```
/// use sphere_types::Node;
///
/// let n = Node::from_coords(0.0, 0.0, 1.0);
/// assert_eq!(n.position.z, 1.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Node {
    /// Cartesian position on the unit sphere.
    pub position: Point3<f64>,
}

impl Node {
    /// Create a node from a position.
    #[inline]
    #[must_use]
    pub const fn new(position: Point3<f64>) -> Self {
        Self { position }
    }

    /// Create a node from Cartesian coordinates.
    #[inline]
    #[must_use]
    pub fn from_coords(x: f64, y: f64, z: f64) -> Self {
        Self {
            position: Point3::new(x, y, z),
        }
    }

    /// Create a node from longitude and latitude, both in radians.
    ///
    /// # Example
    ///
    /// ```
    /// use sphere_types::Node;
    ///
    /// let pole = Node::from_lonlat(0.0, std::f64::consts::FRAC_PI_2);
    /// assert!((pole.position.z - 1.0).abs() < 1e-15);
    /// ```
    #[must_use]
    pub fn from_lonlat(lon: f64, lat: f64) -> Self {
        let (sin_lon, cos_lon) = lon.sin_cos();
        let (sin_lat, cos_lat) = lat.sin_cos();
        Self {
            position: Point3::new(cos_lat * cos_lon, cos_lat * sin_lon, sin_lat),
        }
    }

    /// The position as a vector from the sphere centre.
    #[inline]
    #[must_use]
    pub fn coords(&self) -> Vector3<f64> {
        self.position.coords
    }

    /// The node projected back onto the unit sphere.
    ///
    /// Returns the node unchanged if its position is too close to the
    /// centre to normalize.
    #[must_use]
    pub fn normalized(self) -> Self {
        let norm = self.position.coords.norm();
        if norm <= f64::EPSILON {
            return self;
        }
        Self {
            position: Point3::from(self.position.coords / norm),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn from_lonlat_on_unit_sphere() {
        let n = Node::from_lonlat(1.1, -0.7);
        assert_relative_eq!(n.coords().norm(), 1.0, epsilon = 1e-15);
    }

    #[test]
    fn from_lonlat_equator() {
        let n = Node::from_lonlat(std::f64::consts::FRAC_PI_2, 0.0);
        assert_relative_eq!(n.position.x, 0.0, epsilon = 1e-15);
        assert_relative_eq!(n.position.y, 1.0, epsilon = 1e-15);
        assert_relative_eq!(n.position.z, 0.0, epsilon = 1e-15);
    }

    #[test]
    fn normalized_projects_to_sphere() {
        let n = Node::from_coords(1.0, 1.0, 1.0).normalized();
        assert_relative_eq!(n.coords().norm(), 1.0, epsilon = 1e-15);
    }

    #[test]
    fn normalized_keeps_degenerate_input() {
        let n = Node::from_coords(0.0, 0.0, 0.0).normalized();
        assert_eq!(n.position, Point3::new(0.0, 0.0, 0.0));
    }
}
