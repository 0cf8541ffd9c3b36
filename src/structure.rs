//! The truss model and the direct stiffness pipeline.
//!
//! A solve runs in this order, each step a method on [`TrussStructure`]:
//!
//! 1. [`assemble_stiffness_matrix`](TrussStructure::assemble_stiffness_matrix)
//! 2. [`create_force_vector`](TrussStructure::create_force_vector)
//! 3. [`apply_hom_bcs`](TrussStructure::apply_hom_bcs)
//! 4. [`solve_truss_system`](TrussStructure::solve_truss_system)
//! 5. [`return_disp_vector`](TrussStructure::return_disp_vector)
//! 6. [`compute_strains`](TrussStructure::compute_strains) /
//!    [`compute_stresses`](TrussStructure::compute_stresses)
//!
//! [`TrussStructure::solve`] runs all of them.

use std::collections::BTreeMap;

use log::{debug, info, trace, warn};
use petgraph::algo::connected_components;
use petgraph::graph::UnGraph;

use crate::config::StructureConfig;
use crate::element::{Element, ElementId, EntityLookup, TrussElement};
use crate::errors::{MatrixError, PropertyError, TrussError};
use crate::geometry::{Point, DOFS_PER_NODE};
use crate::material::{Material, MaterialId};
use crate::matrix::Matrix;
use crate::node::{Node, NodeId};

/// Displacements and element results of a complete solve.
#[derive(Clone, Debug, PartialEq)]
pub struct Solution {
    /// Full displacement vector, `3N` long, indexed by `dof - 1`.
    pub displacements: Vec<f64>,
    /// Strain per element in insertion order.
    pub strains: Vec<f64>,
    /// Stress per element in insertion order.
    pub stresses: Vec<f64>,
    /// Axial force per element in insertion order, positive in tension.
    pub axial_forces: Vec<f64>,
}

impl Solution {
    /// `[ux, uy, uz]` of one node, if the node is part of the solved system.
    #[must_use]
    pub fn node_displacement(&self, node: NodeId) -> Option<[f64; 3]> {
        let [x, y, z] = node.dofs();
        Some([
            *self.displacements.get(x - 1)?,
            *self.displacements.get(y - 1)?,
            *self.displacements.get(z - 1)?,
        ])
    }
}

/// Container for a pin-jointed truss model.
///
/// Nodes, materials and elements are only ever appended, so every handle the
/// structure returns stays valid for the structure's lifetime.
#[derive(Debug, Default, Clone)]
pub struct TrussStructure {
    /// Behavioural settings.
    config: StructureConfig,
    /// Nodes in insertion order; node `n` sits at index `n - 1`.
    nodes: Vec<Node>,
    /// Elements in insertion order; element `e` sits at index `e - 1`.
    elements: Vec<Element>,
    /// Materials in insertion order.
    materials: Vec<Material>,
    /// 1-based DOF to fixed flag.
    boundary_conditions: BTreeMap<usize, bool>,
    /// 1-based DOF to applied force.
    forces: BTreeMap<usize, f64>,
}

impl TrussStructure {
    /// Create an empty structure with the default [`StructureConfig`].
    ///
    /// # Examples
    /// ```
    /// use trussfem::TrussStructure;
    ///
    /// let truss = TrussStructure::new();
    /// assert_eq!(truss.node_count(), 0);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty structure with explicit settings.
    #[must_use]
    pub fn with_config(config: StructureConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Active settings.
    #[must_use]
    pub fn config(&self) -> &StructureConfig {
        &self.config
    }

    /// Number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of elements.
    #[must_use]
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Size of the global system, `3 * node_count()`.
    #[must_use]
    pub fn dof_count(&self) -> usize {
        DOFS_PER_NODE * self.nodes.len()
    }

    /// Add a node at `(x, y, z)` and return its handle.
    ///
    /// # Errors
    ///
    /// Returns [`TrussError::CoincidentNode`] when an existing node lies within the
    /// configured tolerance of the requested position on all three axes.
    ///
    /// # Examples
    /// ```
    /// use trussfem::{TrussError, TrussStructure};
    ///
    /// let mut truss = TrussStructure::new();
    /// let first = truss.add_node(0.0, 0.0, 0.0).expect("empty structure");
    /// assert_eq!(first.get(), 1);
    /// assert!(matches!(
    ///     truss.add_node(0.05, 0.0, 0.0),
    ///     Err(TrussError::CoincidentNode { .. })
    /// ));
    /// ```
    pub fn add_node(&mut self, x: f64, y: f64, z: f64) -> Result<NodeId, TrussError> {
        self.add_node_at(Point::new(x, y, z))
    }

    /// Add a node at `position`. See [`TrussStructure::add_node`].
    ///
    /// # Errors
    ///
    /// Returns [`TrussError::CoincidentNode`] for a position that is already occupied.
    pub fn add_node_at(&mut self, position: Point) -> Result<NodeId, TrussError> {
        let tolerance = self.config.coincidence_tolerance;
        if let Some(existing) = self
            .nodes
            .iter()
            .find(|node| node.position().is_near(position, tolerance))
        {
            return Err(TrussError::CoincidentNode {
                existing: existing.id(),
                position,
            });
        }
        let id = NodeId(self.nodes.len() + 1);
        self.nodes.push(Node::new(id, position));
        Ok(id)
    }

    /// Register a material and return its handle.
    ///
    /// # Errors
    ///
    /// Returns [`TrussError::DuplicateMaterial`] when the name is already taken.
    pub fn add_material(
        &mut self,
        name: impl Into<String>,
        youngs_modulus: f64,
    ) -> Result<MaterialId, TrussError> {
        let name = name.into();
        if self.materials.iter().any(|material| material.name() == name) {
            return Err(TrussError::DuplicateMaterial(name));
        }
        let id = MaterialId(self.materials.len());
        self.materials.push(Material::new(name, youngs_modulus));
        Ok(id)
    }

    /// Connect two nodes with a truss bar of the given material and area.
    ///
    /// # Errors
    ///
    /// Returns [`TrussError::UnknownNode`] or [`TrussError::UnknownMaterial`] for
    /// handles that do not belong to this structure, and
    /// [`TrussError::InvalidElementProperties`] when the area or the material's
    /// modulus is not strictly positive.
    pub fn add_truss_element(
        &mut self,
        node1: NodeId,
        node2: NodeId,
        material: MaterialId,
        area: f64,
    ) -> Result<ElementId, TrussError> {
        let id = ElementId(self.elements.len() + 1);
        self.node(node1)?;
        self.node(node2)?;
        let youngs_modulus = self.material(material)?.youngs_modulus();
        if area <= 0.0 {
            return Err(TrussError::InvalidElementProperties {
                element: id,
                source: PropertyError::NonPositiveArea { area },
            });
        }
        if youngs_modulus <= 0.0 {
            return Err(TrussError::InvalidElementProperties {
                element: id,
                source: PropertyError::NonPositiveModulus { youngs_modulus },
            });
        }
        self.elements
            .push(TrussElement::new(id, node1, node2, material, area).into());
        Ok(id)
    }

    /// Mark every listed 1-based DOF as fixed. Repeated entries are harmless.
    ///
    /// DOFs may name nodes that do not exist yet; the upper bound is checked when
    /// the system is reduced.
    ///
    /// # Errors
    ///
    /// Returns [`TrussError::InvalidDof`] for a zero DOF. Nothing is recorded on error.
    pub fn add_bcs(&mut self, dofs: &[usize]) -> Result<(), TrussError> {
        self.reject_zero_dof(dofs)?;
        for &dof in dofs {
            self.boundary_conditions.insert(dof, true);
        }
        Ok(())
    }

    /// Record a force magnitude at each listed 1-based DOF, replacing any earlier value.
    ///
    /// # Errors
    ///
    /// Returns [`TrussError::ForceListMismatch`] when the lists differ in length and
    /// [`TrussError::InvalidDof`] for a zero DOF. Nothing is recorded on error.
    pub fn add_forces(&mut self, dofs: &[usize], forces: &[f64]) -> Result<(), TrussError> {
        if dofs.len() != forces.len() {
            return Err(TrussError::ForceListMismatch {
                dofs: dofs.len(),
                forces: forces.len(),
            });
        }
        self.reject_zero_dof(dofs)?;
        for (&dof, &force) in dofs.iter().zip(forces) {
            self.forces.insert(dof, force);
        }
        Ok(())
    }

    /// DOFs are 1-based, so zero never names a real DOF.
    fn reject_zero_dof(&self, dofs: &[usize]) -> Result<(), TrussError> {
        if dofs.contains(&0) {
            return Err(TrussError::InvalidDof {
                dof: 0,
                max: self.dof_count(),
            });
        }
        Ok(())
    }

    /// Nodes in insertion order.
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Elements in insertion order.
    #[must_use]
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Materials in insertion order.
    #[must_use]
    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    /// Boundary conditions keyed by 1-based DOF.
    #[must_use]
    pub fn conditions(&self) -> &BTreeMap<usize, bool> {
        &self.boundary_conditions
    }

    /// Applied forces keyed by 1-based DOF.
    #[must_use]
    pub fn forces(&self) -> &BTreeMap<usize, f64> {
        &self.forces
    }

    /// Mutable access to a node, e.g. to move it between solves.
    ///
    /// # Errors
    ///
    /// Returns [`TrussError::UnknownNode`] when `id` is not part of this structure.
    pub fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, TrussError> {
        match id.0.checked_sub(1) {
            Some(index) => self.nodes.get_mut(index).ok_or(TrussError::UnknownNode(id)),
            None => Err(TrussError::UnknownNode(id)),
        }
    }

    /// Look up an element.
    ///
    /// # Errors
    ///
    /// Returns [`TrussError::UnknownElement`] when `id` is not part of this structure.
    pub fn element(&self, id: ElementId) -> Result<&Element, TrussError> {
        id.0.checked_sub(1)
            .and_then(|index| self.elements.get(index))
            .ok_or(TrussError::UnknownElement(id))
    }

    /// Ascending list of DOFs marked fixed.
    #[must_use]
    pub fn fixed_dofs(&self) -> Vec<usize> {
        self.boundary_conditions
            .iter()
            .filter(|&(_, &fixed)| fixed)
            .map(|(&dof, _)| dof)
            .collect()
    }

    /// Assemble the `3N x 3N` global stiffness matrix by scattering each element's
    /// global stiffness into the rows and columns named by its DOFs.
    ///
    /// # Errors
    ///
    /// Propagates element failures such as [`TrussError::ZeroLengthElement`].
    pub fn assemble_stiffness_matrix(&self) -> Result<Matrix<f64>, TrussError> {
        let size = self.dof_count();
        debug!(
            "assembling {size}x{size} stiffness matrix from {} elements",
            self.elements.len()
        );
        let mut global = Matrix::zeros(size, size);
        for element in &self.elements {
            let local = element.global_stiffness_matrix(self)?;
            let dofs = element.dofs();
            trace!("element {:?} scatters into dofs {dofs:?}", element.id());
            for (row_local, &row) in dofs.iter().enumerate() {
                for (col_local, &col) in dofs.iter().enumerate() {
                    *global.at_mut(row - 1, col - 1)? += *local.at(row_local, col_local)?;
                }
            }
        }
        Ok(global)
    }

    /// Zero vector of length `3N` with every recorded force at its DOF.
    ///
    /// # Errors
    ///
    /// Returns [`TrussError::InvalidDof`] for a force recorded beyond `3N`.
    pub fn create_force_vector(&self) -> Result<Vec<f64>, TrussError> {
        let size = self.dof_count();
        let mut force_vector = vec![0.0; size];
        for (&dof, &force) in &self.forces {
            let slot = force_vector
                .get_mut(dof - 1)
                .ok_or(TrussError::InvalidDof { dof, max: size })?;
            *slot = force;
        }
        Ok(force_vector)
    }

    /// Reduce `stiffness` and `force_vector` in place by deleting the row, column
    /// and entry of every fixed DOF.
    ///
    /// Deletions run in descending DOF order so earlier removals never shift the
    /// indices still to be processed. Both arguments are left untouched on error.
    ///
    /// # Errors
    ///
    /// Returns [`TrussError::Matrix`] with a shape mismatch when `stiffness` is not
    /// square with as many rows as `force_vector` has entries, and
    /// [`TrussError::InvalidDof`] for a fixed DOF beyond the system size.
    pub fn apply_hom_bcs(
        &self,
        stiffness: &mut Matrix<f64>,
        force_vector: &mut Vec<f64>,
    ) -> Result<(), TrussError> {
        let size = force_vector.len();
        if stiffness.shape() != (size, size) {
            return Err(MatrixError::ShapeMismatch {
                op: "apply_hom_bcs",
                left: stiffness.shape(),
                right: (size, 1),
            }
            .into());
        }
        let mut fixed = self.fixed_dofs();
        if let Some(&dof) = fixed.iter().find(|&&dof| dof > size) {
            return Err(TrussError::InvalidDof { dof, max: size });
        }
        fixed.sort_unstable_by(|a, b| b.cmp(a));
        for &dof in &fixed {
            stiffness.delete_row(dof - 1)?;
            stiffness.delete_column(dof - 1)?;
            force_vector.remove(dof - 1);
        }
        debug!(
            "removed {} fixed dofs, reduced system is {}x{}",
            fixed.len(),
            stiffness.nrows(),
            stiffness.ncols()
        );
        Ok(())
    }

    /// Solve `K_red u = F_red` through `K_red = L Lᵗ` and the explicit inverse of `L`:
    /// `u = L⁻ᵀ (L⁻¹ F_red)`.
    ///
    /// `stiffness` must be symmetric positive definite. When
    /// [`StructureConfig::check_positive_definite`] is set, a factor with a
    /// non-positive or non-finite diagonal entry is reported instead of producing
    /// `NaN` displacements.
    ///
    /// # Errors
    ///
    /// Returns [`TrussError::Matrix`] for mismatched operands and
    /// [`TrussError::NotPositiveDefinite`] as described above.
    pub fn solve_truss_system(
        &self,
        stiffness: &Matrix<f64>,
        force_vector: &[f64],
    ) -> Result<Vec<f64>, TrussError> {
        debug!("solving reduced system of size {}", stiffness.nrows());
        let factor = stiffness.cho()?;
        if self.config.check_positive_definite {
            if let Some(pivot) =
                (0..factor.nrows()).find(|&i| !(factor[(i, i)].is_finite() && factor[(i, i)] > 0.0))
            {
                return Err(TrussError::NotPositiveDefinite { pivot });
            }
        }
        let inverse = factor.l_inverse()?;
        let intermediate = inverse.mvm(force_vector)?;
        Ok(inverse.transpose().mvm(&intermediate)?)
    }

    /// Expand a reduced solution to the full `3N` vector, with zeros at fixed DOFs.
    ///
    /// # Errors
    ///
    /// Returns [`TrussError::DisplacementLength`] when `reduced` does not hold exactly
    /// one entry per free DOF.
    pub fn return_disp_vector(&self, reduced: &[f64]) -> Result<Vec<f64>, TrussError> {
        let size = self.dof_count();
        let free = (1..=size)
            .filter(|dof| !self.boundary_conditions.contains_key(dof))
            .count();
        if reduced.len() != free {
            return Err(TrussError::DisplacementLength {
                expected: free,
                found: reduced.len(),
            });
        }
        let mut remaining = reduced.iter();
        Ok((1..=size)
            .map(|dof| {
                if self.boundary_conditions.contains_key(&dof) {
                    0.0
                } else {
                    remaining.next().copied().unwrap_or_default()
                }
            })
            .collect())
    }

    /// Post-processing needs the full, expanded displacement vector.
    fn check_displacement_length(&self, u: &[f64]) -> Result<(), TrussError> {
        if u.len() != self.dof_count() {
            return Err(TrussError::DisplacementLength {
                expected: self.dof_count(),
                found: u.len(),
            });
        }
        Ok(())
    }

    /// Strain of every element, in element order.
    ///
    /// # Errors
    ///
    /// Returns [`TrussError::DisplacementLength`] unless `u` has `3N` entries and
    /// propagates element failures.
    pub fn compute_strains(&self, u: &[f64]) -> Result<Vec<f64>, TrussError> {
        self.check_displacement_length(u)?;
        self.elements
            .iter()
            .map(|element| element.strain(self, u))
            .collect()
    }

    /// Stress of every element, in element order.
    ///
    /// # Errors
    ///
    /// Same as [`TrussStructure::compute_strains`].
    pub fn compute_stresses(&self, u: &[f64]) -> Result<Vec<f64>, TrussError> {
        self.check_displacement_length(u)?;
        self.elements
            .iter()
            .map(|element| element.stress(self, u))
            .collect()
    }

    /// Axial force of every truss element, in element order.
    ///
    /// # Errors
    ///
    /// Same as [`TrussStructure::compute_strains`].
    pub fn compute_axial_forces(&self, u: &[f64]) -> Result<Vec<f64>, TrussError> {
        self.check_displacement_length(u)?;
        self.elements
            .iter()
            .map(|element| match element {
                Element::Truss(truss) => truss.axial_force(self, u),
            })
            .collect()
    }

    /// Run the whole pipeline against the current model.
    ///
    /// # Errors
    ///
    /// Propagates the first failure of any pipeline step.
    ///
    /// # Examples
    /// ```
    /// use trussfem::TrussStructure;
    ///
    /// let mut truss = TrussStructure::new();
    /// let steel = truss.add_material("steel", 200.0e9).expect("new material");
    /// let a = truss.add_node(0.0, 0.0, 0.0).expect("free location");
    /// let b = truss.add_node(1.0, 0.0, 0.0).expect("free location");
    /// truss.add_truss_element(a, b, steel, 0.01).expect("valid element");
    /// truss.add_bcs(&[1, 2, 3, 5, 6]).expect("valid dofs");
    /// truss.add_forces(&[4], &[-1_000.0]).expect("valid dofs");
    ///
    /// let solution = truss.solve().expect("constrained bar");
    /// assert!((solution.displacements[3] + 5.0e-7).abs() < 1.0e-15);
    /// ```
    pub fn solve(&self) -> Result<Solution, TrussError> {
        let components = self.component_count();
        if components > 1 {
            warn!("structure splits into {components} disconnected parts");
        }
        let mut stiffness = self.assemble_stiffness_matrix()?;
        let mut force_vector = self.create_force_vector()?;
        self.apply_hom_bcs(&mut stiffness, &mut force_vector)?;
        let reduced = self.solve_truss_system(&stiffness, &force_vector)?;
        let displacements = self.return_disp_vector(&reduced)?;
        let strains = self.compute_strains(&displacements)?;
        let stresses = self.compute_stresses(&displacements)?;
        let axial_forces = self.compute_axial_forces(&displacements)?;
        info!(
            "solved {} dofs ({} free) for {} elements",
            displacements.len(),
            reduced.len(),
            strains.len()
        );
        Ok(Solution {
            displacements,
            strains,
            stresses,
            axial_forces,
        })
    }

    /// Connectivity of the structure: one graph node per truss node, one edge per element.
    ///
    /// Graph node indices follow node insertion order, so `NodeId(n)` maps to
    /// `NodeIndex::new(n - 1)`.
    #[must_use]
    pub fn topology(&self) -> UnGraph<NodeId, ElementId> {
        let mut graph = UnGraph::with_capacity(self.nodes.len(), self.elements.len());
        let indices: Vec<_> = self.nodes.iter().map(|node| graph.add_node(node.id())).collect();
        for element in &self.elements {
            match element {
                Element::Truss(truss) => {
                    if let (Some(&a), Some(&b)) = (
                        indices.get(truss.node1().index()),
                        indices.get(truss.node2().index()),
                    ) {
                        graph.add_edge(a, b, truss.id());
                    }
                }
            }
        }
        graph
    }

    /// Number of connected parts in [`TrussStructure::topology`].
    #[must_use]
    pub fn component_count(&self) -> usize {
        connected_components(&self.topology())
    }
}

impl EntityLookup for TrussStructure {
    fn node(&self, id: NodeId) -> Result<&Node, TrussError> {
        id.0.checked_sub(1)
            .and_then(|index| self.nodes.get(index))
            .ok_or(TrussError::UnknownNode(id))
    }

    fn material(&self, id: MaterialId) -> Result<&Material, TrussError> {
        self.materials
            .get(id.index())
            .ok_or(TrussError::UnknownMaterial(id))
    }
}
