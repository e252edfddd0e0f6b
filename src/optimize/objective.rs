//! Provides the objective of a canonical linear program
use crate::model::Operation;

/// Linear objective of a canonical program
#[derive(Debug, Clone)]
pub struct Objective {
    /// Coefficients aligned with the problem's variable order
    pub coefficients: Vec<f64>,
    /// Sense of the objective (maximize, or minimize), see [`ObjectiveSense`]
    pub sense: ObjectiveSense,
}

impl Objective {
    /// Create a new objective
    pub fn new(coefficients: Vec<f64>, sense: ObjectiveSense) -> Objective {
        Objective {
            coefficients,
            sense,
        }
    }

    /// Value of the objective at a point
    pub fn evaluate(&self, values: &[f64]) -> f64 {
        self.coefficients
            .iter()
            .zip(values)
            .map(|(coefficient, value)| coefficient * value)
            .sum()
    }

    /// Cost vector normalized so the engine always minimizes
    ///
    /// Maximization is solved by negating the costs; the true objective value
    /// is recomputed from the original coefficients at extraction.
    pub(crate) fn minimized_costs(&self) -> Vec<f64> {
        match self.sense {
            ObjectiveSense::Minimize => self.coefficients.clone(),
            ObjectiveSense::Maximize => self.coefficients.iter().map(|c| -c).collect(),
        }
    }
}

/// Represents the sense of the objective, whether it should be maximized or
/// minimized
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectiveSense {
    /// The objective should be minimized
    Minimize,
    /// The objective should be maximized
    Maximize,
}

impl From<Operation> for ObjectiveSense {
    fn from(operation: Operation) -> Self {
        match operation {
            Operation::Min => ObjectiveSense::Minimize,
            Operation::Max => ObjectiveSense::Maximize,
        }
    }
}
