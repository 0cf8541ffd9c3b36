//! Elastic materials.

/// Handle to a material owned by a [`TrussStructure`](crate::TrussStructure).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MaterialId(pub(crate) usize);

impl MaterialId {
    /// Position of the material in its structure's material list.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// A named linear-elastic material.
#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    /// Unique name within a structure.
    name: String,
    /// Young's modulus `E`.
    youngs_modulus: f64,
}

impl Material {
    /// Create a material. The name is only used to detect duplicates.
    #[must_use]
    pub fn new(name: impl Into<String>, youngs_modulus: f64) -> Self {
        Self {
            name: name.into(),
            youngs_modulus,
        }
    }

    /// Name given at construction.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Young's modulus `E`.
    #[must_use]
    pub fn youngs_modulus(&self) -> f64 {
        self.youngs_modulus
    }
}
