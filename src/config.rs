//! Tunable behaviour of a [`TrussStructure`](crate::TrussStructure).

/// Settings applied while building and solving a structure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StructureConfig {
    /// Per-axis absolute distance below which a new node counts as coincident
    /// with an existing one.
    pub coincidence_tolerance: f64,
    /// Reject reduced systems whose Cholesky factor has a non-positive or
    /// non-finite diagonal entry instead of returning `NaN` displacements.
    pub check_positive_definite: bool,
}

impl Default for StructureConfig {
    fn default() -> Self {
        Self {
            coincidence_tolerance: 0.1,
            check_positive_definite: true,
        }
    }
}

impl StructureConfig {
    /// Replace the coincidence tolerance.
    #[must_use]
    pub fn with_coincidence_tolerance(mut self, tolerance: f64) -> Self {
        self.coincidence_tolerance = tolerance;
        self
    }

    /// Enable or disable the positive-definiteness check.
    #[must_use]
    pub fn with_positive_definite_check(mut self, enabled: bool) -> Self {
        self.check_positive_definite = enabled;
        self
    }
}
