//! Fundamental geometric types and degree-of-freedom numbering.

use nalgebra::Vector3;

/// Number of translational degrees of freedom carried by every node.
pub const DOFS_PER_NODE: usize = 3;

/// Position in three dimensional space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    /// Distance along the global X axis.
    pub x: f64,
    /// Distance along the global Y axis.
    pub y: f64,
    /// Distance along the global Z axis.
    pub z: f64,
}

impl Point {
    /// Create a [`Point`] with explicit coordinates.
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Convert the point into an algebraic vector.
    #[must_use]
    pub fn to_vector(self) -> Vector3<f64> {
        Vector3::new(self.x, self.y, self.z)
    }

    /// Coordinates as an ordered `[x, y, z]` array.
    #[must_use]
    pub const fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance_to(self, other: Point) -> f64 {
        (other.to_vector() - self.to_vector()).norm()
    }

    /// True when every coordinate differs from `other` by less than `tolerance`.
    #[must_use]
    pub fn is_near(self, other: Point, tolerance: f64) -> bool {
        (self.x - other.x).abs() < tolerance
            && (self.y - other.y).abs() < tolerance
            && (self.z - other.z).abs() < tolerance
    }
}

impl From<Vector3<f64>> for Point {
    fn from(value: Vector3<f64>) -> Self {
        Self::new(value.x, value.y, value.z)
    }
}

impl From<Point> for Vector3<f64> {
    fn from(value: Point) -> Self {
        value.to_vector()
    }
}

/// Convenience helper for creating [`Point`] instances.
///
/// # Examples
/// ```
/// use trussfem::point;
///
/// let origin = point(0.0, 0.0, 0.0);
/// assert_eq!(origin.x, 0.0);
/// ```
#[must_use]
pub const fn point(x: f64, y: f64, z: f64) -> Point {
    Point::new(x, y, z)
}

/// Global translation direction of a degree of freedom.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Translation along global X.
    X,
    /// Translation along global Y.
    Y,
    /// Translation along global Z.
    Z,
}

impl Axis {
    /// All axes in numbering order.
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Offset subtracted from `3n` for this axis.
    const fn offset(self) -> usize {
        match self {
            Axis::X => 2,
            Axis::Y => 1,
            Axis::Z => 0,
        }
    }
}

/// 1-based global degree of freedom owned by the node with 1-based `node_id` along `axis`.
///
/// Node `n` owns `3n-2`, `3n-1` and `3n`.
///
/// # Examples
/// ```
/// use trussfem::{dof_index, Axis};
///
/// assert_eq!(dof_index(1, Axis::X), 1);
/// assert_eq!(dof_index(4, Axis::Z), 12);
/// ```
///
/// # Panics
///
/// Panics when `node_id` is zero, since node IDs start at 1.
#[must_use]
pub const fn dof_index(node_id: usize, axis: Axis) -> usize {
    assert!(node_id > 0, "node IDs start at 1");
    DOFS_PER_NODE * node_id - axis.offset()
}
