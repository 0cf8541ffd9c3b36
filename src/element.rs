//! Finite elements and their stiffness, strain and stress in global coordinates.
//!
//! Elements refer to nodes and materials by handle. Every quantity is computed
//! from the current node positions on each call; nothing is cached.

use crate::errors::{MatrixError, TrussError};
use crate::material::{Material, MaterialId};
use crate::matrix::Matrix;
use crate::node::{Node, NodeId};

/// Handle to an element owned by a [`TrussStructure`](crate::TrussStructure).
///
/// The wrapped value is the element's 1-based ID.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ElementId(pub(crate) usize);

impl ElementId {
    /// 1-based ID of the element.
    #[must_use]
    pub const fn get(self) -> usize {
        self.0
    }

    /// Position of the element in its structure's element list.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 - 1
    }
}

/// Read access to the nodes and materials that elements refer to.
pub trait EntityLookup {
    /// Resolve a node handle.
    ///
    /// # Errors
    ///
    /// Returns [`TrussError::UnknownNode`] when the handle is not known.
    fn node(&self, id: NodeId) -> Result<&Node, TrussError>;

    /// Resolve a material handle.
    ///
    /// # Errors
    ///
    /// Returns [`TrussError::UnknownMaterial`] when the handle is not known.
    fn material(&self, id: MaterialId) -> Result<&Material, TrussError>;
}

/// Every element kind the assembly loop can hold.
#[derive(Clone, Debug, PartialEq)]
pub enum Element {
    /// Two-node axial bar.
    Truss(TrussElement),
}

impl Element {
    /// Handle and 1-based ID.
    #[must_use]
    pub fn id(&self) -> ElementId {
        match self {
            Element::Truss(truss) => truss.id(),
        }
    }

    /// The element as a truss bar, if it is one.
    #[must_use]
    pub fn as_truss(&self) -> Option<&TrussElement> {
        match self {
            Element::Truss(truss) => Some(truss),
        }
    }

    /// Stiffness matrix in global coordinates, ordered like [`Element::dofs`].
    ///
    /// # Errors
    ///
    /// Propagates lookup failures and degenerate geometry.
    pub fn global_stiffness_matrix(
        &self,
        model: &impl EntityLookup,
    ) -> Result<Matrix<f64>, TrussError> {
        match self {
            Element::Truss(truss) => truss.global_stiffness_matrix(model),
        }
    }

    /// 1-based global DOFs this element couples.
    #[must_use]
    pub fn dofs(&self) -> Vec<usize> {
        match self {
            Element::Truss(truss) => truss.dofs().to_vec(),
        }
    }

    /// Engineering strain for the full displacement vector `u`.
    ///
    /// # Errors
    ///
    /// Propagates lookup failures, degenerate geometry and a too-short `u`.
    pub fn strain(&self, model: &impl EntityLookup, u: &[f64]) -> Result<f64, TrussError> {
        match self {
            Element::Truss(truss) => truss.strain(model, u),
        }
    }

    /// Stress for the full displacement vector `u`.
    ///
    /// # Errors
    ///
    /// Same as [`Element::strain`].
    pub fn stress(&self, model: &impl EntityLookup, u: &[f64]) -> Result<f64, TrussError> {
        match self {
            Element::Truss(truss) => truss.stress(model, u),
        }
    }
}

impl From<TrussElement> for Element {
    fn from(value: TrussElement) -> Self {
        Element::Truss(value)
    }
}

/// Pin-ended bar carrying axial load only.
#[derive(Clone, Debug, PartialEq)]
pub struct TrussElement {
    /// Own handle.
    id: ElementId,
    /// Start node.
    node1: NodeId,
    /// End node.
    node2: NodeId,
    /// Material of the bar.
    material: MaterialId,
    /// Cross-sectional area.
    area: f64,
}

impl TrussElement {
    pub(crate) fn new(
        id: ElementId,
        node1: NodeId,
        node2: NodeId,
        material: MaterialId,
        area: f64,
    ) -> Self {
        Self {
            id,
            node1,
            node2,
            material,
            area,
        }
    }

    /// Handle and 1-based ID.
    #[must_use]
    pub fn id(&self) -> ElementId {
        self.id
    }

    /// Start node.
    #[must_use]
    pub fn node1(&self) -> NodeId {
        self.node1
    }

    /// End node.
    #[must_use]
    pub fn node2(&self) -> NodeId {
        self.node2
    }

    /// Material handle.
    #[must_use]
    pub fn material(&self) -> MaterialId {
        self.material
    }

    /// Cross-sectional area.
    #[must_use]
    pub fn area(&self) -> f64 {
        self.area
    }

    /// `[x1, y1, z1, x2, y2, z2]` as 1-based global DOFs.
    #[must_use]
    pub fn dofs(&self) -> [usize; 6] {
        let [a, b, c] = self.node1.dofs();
        let [d, e, f] = self.node2.dofs();
        [a, b, c, d, e, f]
    }

    /// Distance between the two nodes.
    ///
    /// # Errors
    ///
    /// Returns [`TrussError::UnknownNode`] when either node cannot be resolved.
    pub fn length(&self, model: &impl EntityLookup) -> Result<f64, TrussError> {
        let start = model.node(self.node1)?.position();
        let end = model.node(self.node2)?.position();
        Ok(start.distance_to(end))
    }

    /// Length and direction cosines `(cx, cy, cz)`.
    fn orientation(&self, model: &impl EntityLookup) -> Result<(f64, [f64; 3]), TrussError> {
        let start = model.node(self.node1)?.position().to_vector();
        let end = model.node(self.node2)?.position().to_vector();
        let delta = end - start;
        let length = delta.norm();
        if length == 0.0 {
            return Err(TrussError::ZeroLengthElement(self.id));
        }
        let direction = delta / length;
        Ok((length, [direction.x, direction.y, direction.z]))
    }

    /// The 2x6 matrix mapping both endpoints' global DOFs to axial displacements:
    /// `[[cx, cy, cz, 0, 0, 0], [0, 0, 0, cx, cy, cz]]`.
    ///
    /// # Errors
    ///
    /// Returns [`TrussError::ZeroLengthElement`] when both nodes coincide.
    pub fn transformation(&self, model: &impl EntityLookup) -> Result<Matrix<f64>, TrussError> {
        let (_, [cx, cy, cz]) = self.orientation(model)?;
        Ok(Self::transformation_from_cosines(cx, cy, cz)?)
    }

    fn transformation_from_cosines(
        cx: f64,
        cy: f64,
        cz: f64,
    ) -> Result<Matrix<f64>, MatrixError> {
        Matrix::from_rows(&[[cx, cy, cz, 0.0, 0.0, 0.0], [0.0, 0.0, 0.0, cx, cy, cz]])
    }

    /// `Tᵗ · (EA/L · [[1, -1], [-1, 1]]) · T`, a symmetric 6x6 matrix.
    ///
    /// # Errors
    ///
    /// Propagates lookup failures and [`TrussError::ZeroLengthElement`].
    pub fn global_stiffness_matrix(
        &self,
        model: &impl EntityLookup,
    ) -> Result<Matrix<f64>, TrussError> {
        let (length, [cx, cy, cz]) = self.orientation(model)?;
        let transformation = Self::transformation_from_cosines(cx, cy, cz)?;
        let youngs_modulus = model.material(self.material)?.youngs_modulus();
        let local = Matrix::from_rows(&[[1.0, -1.0], [-1.0, 1.0]])?
            .scale(youngs_modulus * self.area / length);
        let global = transformation
            .transpose()
            .try_mul(&local)?
            .try_mul(&transformation)?;
        Ok(global)
    }

    /// Engineering strain `(u_axial,2 - u_axial,1) / L` for the full displacement vector `u`.
    ///
    /// # Errors
    ///
    /// Returns [`TrussError::DisplacementLength`] when `u` does not cover this element's DOFs,
    /// and propagates lookup failures and degenerate geometry.
    pub fn strain(&self, model: &impl EntityLookup, u: &[f64]) -> Result<f64, TrussError> {
        let (length, [cx, cy, cz]) = self.orientation(model)?;
        let dofs = self.dofs();
        let required = dofs.iter().copied().max().unwrap_or(0);
        if u.len() < required {
            return Err(TrussError::DisplacementLength {
                expected: required,
                found: u.len(),
            });
        }
        let element_displacements: Vec<f64> = dofs.iter().map(|&dof| u[dof - 1]).collect();
        let axial = Self::transformation_from_cosines(cx, cy, cz)?.mvm(&element_displacements)?;
        Ok((axial[1] - axial[0]) / length)
    }

    /// Axial stress `E * strain`.
    ///
    /// # Errors
    ///
    /// Same as [`TrussElement::strain`].
    pub fn stress(&self, model: &impl EntityLookup, u: &[f64]) -> Result<f64, TrussError> {
        let youngs_modulus = model.material(self.material)?.youngs_modulus();
        Ok(youngs_modulus * self.strain(model, u)?)
    }

    /// Axial force `stress * A`, positive in tension.
    ///
    /// # Errors
    ///
    /// Same as [`TrussElement::strain`].
    pub fn axial_force(&self, model: &impl EntityLookup, u: &[f64]) -> Result<f64, TrussError> {
        Ok(self.stress(model, u)? * self.area)
    }
}
