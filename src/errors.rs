//! Error types produced by the dense matrix routines and the truss model.

use thiserror::Error;

use crate::element::ElementId;
use crate::geometry::Point;
use crate::material::MaterialId;
use crate::node::NodeId;

/// Error returned by [`Matrix`](crate::Matrix) operations.
///
/// Every mutating routine validates its arguments before touching storage, so a
/// matrix that produced one of these errors still holds its previous contents.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum MatrixError {
    /// Returned when the operand dimensions are incompatible for `op`.
    #[error("shape mismatch in {op}: {left:?} vs {right:?}")]
    ShapeMismatch {
        /// Name of the failing operation.
        op: &'static str,
        /// Shape (or length) of the receiver.
        left: (usize, usize),
        /// Shape (or length) of the argument.
        right: (usize, usize),
    },
    /// Returned when a nested row literal does not have a uniform width.
    #[error("row {row} has {found} entries, expected {expected}")]
    RaggedRows {
        /// Offending row.
        row: usize,
        /// Width of the first row.
        expected: usize,
        /// Width of the offending row.
        found: usize,
    },
    /// Returned when an index lies outside the matrix.
    #[error("index {index} is out of range for {op} (bound {bound})")]
    IndexOutOfRange {
        /// Name of the failing operation.
        op: &'static str,
        /// Rejected index.
        index: usize,
        /// Exclusive upper bound that applied.
        bound: usize,
    },
    /// Returned when a bulk row or column deletion request is invalid.
    #[error("invalid deletion request: {0}")]
    InvalidDeletion(#[from] DeletionError),
    /// Returned when a routine that needs a square matrix receives a rectangular one.
    #[error("{op} requires a square matrix, got {shape:?}")]
    NotSquare {
        /// Name of the failing operation.
        op: &'static str,
        /// Shape of the receiver.
        shape: (usize, usize),
    },
    /// Returned by [`Matrix::l_inverse`](crate::Matrix::l_inverse) when an entry above
    /// the diagonal is non-zero.
    #[error("matrix is not lower triangular: entry ({row}, {col}) is non-zero")]
    NotLowerTriangular {
        /// Row of the first offending entry.
        row: usize,
        /// Column of the first offending entry.
        col: usize,
    },
}

/// Reason a bulk deletion was rejected.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum DeletionError {
    /// No indices were supplied.
    #[error("no indices given")]
    Empty,
    /// More indices were supplied than the dimension holds.
    #[error("{requested} indices requested but only {available} available")]
    TooMany {
        /// Number of indices supplied.
        requested: usize,
        /// Size of the dimension.
        available: usize,
    },
    /// At least one index lies outside the dimension.
    #[error("index {index} is out of bounds (size {available})")]
    OutOfBounds {
        /// Largest rejected index.
        index: usize,
        /// Size of the dimension.
        available: usize,
    },
}

/// Error returned when element properties are not physically meaningful.
#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum PropertyError {
    /// Returned when the cross-sectional area is zero or negative.
    #[error("area must be positive (received {area})")]
    NonPositiveArea {
        /// Rejected cross-sectional area.
        area: f64,
    },
    /// Returned when the Young's modulus is zero or negative.
    #[error("Young's modulus must be positive (received {youngs_modulus})")]
    NonPositiveModulus {
        /// Rejected modulus.
        youngs_modulus: f64,
    },
}

/// Error returned while building or solving a [`TrussStructure`](crate::TrussStructure).
#[derive(Clone, Debug, Error, PartialEq)]
pub enum TrussError {
    /// Returned when a node already sits within tolerance of the requested position.
    #[error("node {existing:?} already exists near {position:?}")]
    CoincidentNode {
        /// Node occupying the location.
        existing: NodeId,
        /// Requested position.
        position: Point,
    },
    /// Returned when a material with the same name is already registered.
    #[error("material {0:?} already exists")]
    DuplicateMaterial(String),
    /// Returned when the DOF and force lists passed to `add_forces` differ in length.
    #[error("{dofs} degrees of freedom given for {forces} forces")]
    ForceListMismatch {
        /// Number of DOF indices.
        dofs: usize,
        /// Number of force magnitudes.
        forces: usize,
    },
    /// Returned when a 1-based DOF index is zero or exceeds the system size.
    #[error("degree of freedom {dof} is invalid (valid range 1..={max})")]
    InvalidDof {
        /// Rejected DOF index.
        dof: usize,
        /// Largest valid DOF index at the time of the check.
        max: usize,
    },
    /// Returned when a node handle does not belong to this structure.
    #[error("node {0:?} does not exist in this structure")]
    UnknownNode(NodeId),
    /// Returned when a material handle does not belong to this structure.
    #[error("material {0:?} does not exist in this structure")]
    UnknownMaterial(MaterialId),
    /// Returned when an element handle does not belong to this structure.
    #[error("element {0:?} does not exist in this structure")]
    UnknownElement(ElementId),
    /// Returned when an element is given a non-positive area or modulus.
    #[error("element {element:?} has invalid properties: {source}")]
    InvalidElementProperties {
        /// Identifier the element would have received.
        element: ElementId,
        /// Description of the invalid property.
        #[source]
        source: PropertyError,
    },
    /// Returned when both ends of an element occupy the same point.
    #[error("element {0:?} has zero length")]
    ZeroLengthElement(ElementId),
    /// Returned when a displacement vector has the wrong length.
    #[error("displacement vector has {found} entries, expected {expected}")]
    DisplacementLength {
        /// Required length.
        expected: usize,
        /// Supplied length.
        found: usize,
    },
    /// Returned when the reduced stiffness matrix is not positive definite.
    #[error("reduced stiffness matrix is not positive definite at pivot {pivot}; check supports and connectivity")]
    NotPositiveDefinite {
        /// Zero-based row of the first failing Cholesky pivot.
        pivot: usize,
    },
    /// Returned when an underlying matrix routine fails.
    #[error(transparent)]
    Matrix(#[from] MatrixError),
}
