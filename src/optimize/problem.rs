//! Provides struct representing a canonical linear program
use indexmap::IndexMap;
use thiserror::Error;

use crate::configuration::SolverConfig;
use crate::model::{LinearModel, LinearResult};
use crate::optimize::branch_and_bound;
use crate::optimize::constraint::{ConstraintRow, Relation};
use crate::optimize::objective::Objective;
use crate::optimize::simplex::{self, Relaxation};
use crate::optimize::variable::{Variable, VariableType};
use crate::optimize::SolverError;

/// A canonical linear program
///
/// Built once per solve from a declarative model and immutable afterwards;
/// the engines only read it, keeping their own tableau and search state.
#[derive(Debug, Clone)]
pub struct Problem {
    /// Objective to optimize
    pub(crate) objective: Objective,
    /// Variables of the program, in model declaration order
    pub(crate) variables: Vec<Variable>,
    /// Constraint rows of the program
    pub(crate) rows: Vec<ConstraintRow>,
}

impl Problem {
    // region Creation Functions
    /// Translate a declarative model into a canonical linear program
    ///
    /// Normalization policy:
    /// - a `max` bound emits a `<=` row and a `min` bound a `>=` row; equal
    ///   bounds collapse into one `=` row; a constraint with neither bound is
    ///   dropped
    /// - constraints referenced by no variable are vacuous and dropped
    /// - an `optimize` key missing from every variable yields a zero
    ///   objective
    /// - `min` above `max` is not rejected here; the emitted rows conflict
    ///   and phase 1 reports the model infeasible
    pub fn from_model(model: &LinearModel) -> Result<Problem, ProblemError> {
        let mut variables = Vec::with_capacity(model.variables.len());
        for (index, (id, coefficients)) in model.variables.iter().enumerate() {
            for (key, value) in coefficients {
                if !value.is_finite() {
                    return Err(ProblemError::NonFiniteCoefficient {
                        variable: id.clone(),
                        key: key.clone(),
                    });
                }
            }
            let mut variable = Variable::new(id, index);
            if model.integer {
                variable.variable_type = VariableType::Integer;
            }
            variables.push(variable);
        }

        let objective_coefficients = model
            .variables
            .values()
            .map(|coefficients| coefficients.get(&model.optimize).copied().unwrap_or(0.0))
            .collect();
        let objective = Objective::new(objective_coefficients, model.operation.into());

        let mut rows = Vec::new();
        for (name, bounds) in &model.constraints {
            for bound in [bounds.min, bounds.max].into_iter().flatten() {
                if !bound.is_finite() {
                    return Err(ProblemError::NonFiniteBound {
                        constraint: name.clone(),
                    });
                }
            }
            let coefficients: Vec<f64> = model
                .variables
                .values()
                .map(|variable| variable.get(name).copied().unwrap_or(0.0))
                .collect();
            if coefficients.iter().all(|coefficient| *coefficient == 0.0) {
                // Vacuous: no variable contributes to this constraint
                continue;
            }
            match (bounds.min, bounds.max) {
                (Some(min), Some(max)) if min == max => {
                    rows.push(ConstraintRow::new(name, coefficients, Relation::Eq, min));
                }
                (min, max) => {
                    if let Some(max) = max {
                        rows.push(ConstraintRow::new(
                            name,
                            coefficients.clone(),
                            Relation::Le,
                            max,
                        ));
                    }
                    if let Some(min) = min {
                        rows.push(ConstraintRow::new(name, coefficients, Relation::Ge, min));
                    }
                }
            }
        }

        Ok(Problem {
            objective,
            variables,
            rows,
        })
    }
    // endregion Creation Functions

    // region Optimization
    /// Optimize the program, returning a solution with status and values
    pub fn optimize(&self, config: &SolverConfig) -> Result<ProblemSolution, SolverError> {
        let outcome = if self.has_integer_variables() {
            branch_and_bound::search(self, config)?
        } else {
            simplex::solve_relaxation(self, &self.bounds(), config)?
        };
        Ok(self.package(outcome))
    }
    // endregion Optimization

    // region Check Problem
    /// Number of variables in the program
    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    /// Number of constraint rows in the program
    pub fn num_constraints(&self) -> usize {
        self.rows.len()
    }

    /// Whether any variable is restricted to whole number values
    pub fn has_integer_variables(&self) -> bool {
        for variable in &self.variables {
            if variable.variable_type == VariableType::Integer {
                return true;
            }
        }
        false
    }

    /// Per-variable bounds used by the root relaxation
    pub(crate) fn bounds(&self) -> Vec<(f64, f64)> {
        self.variables
            .iter()
            .map(|variable| (variable.lower_bound, variable.upper_bound))
            .collect()
    }
    // endregion Check Problem

    // region Result Extraction
    /// Package an engine outcome into a [`ProblemSolution`]
    fn package(&self, outcome: Relaxation) -> ProblemSolution {
        match outcome {
            Relaxation::Optimal { values, .. } => {
                let values = self.snapped(values);
                let objective_value = self.objective.evaluate(&values);
                let variable_values: IndexMap<String, f64> = self
                    .variables
                    .iter()
                    .zip(&values)
                    .map(|(variable, value)| (variable.id.clone(), *value))
                    .collect();
                ProblemSolution {
                    status: OptimizationStatus::Optimal,
                    objective_value: Some(objective_value),
                    variable_values: Some(variable_values),
                }
            }
            Relaxation::Infeasible => ProblemSolution {
                status: OptimizationStatus::Infeasible,
                objective_value: None,
                variable_values: None,
            },
        }
    }

    /// Round integer restricted values to the nearest whole number, stripping
    /// floating point noise left by the relaxations
    fn snapped(&self, mut values: Vec<f64>) -> Vec<f64> {
        for (variable, value) in self.variables.iter().zip(values.iter_mut()) {
            if variable.variable_type == VariableType::Integer {
                *value = value.round();
            }
        }
        values
    }
    // endregion Result Extraction
}

/// Struct representing the solution to an optimization problem
#[derive(Debug, Clone)]
pub struct ProblemSolution {
    /// The status of the optimization problem, representing if the
    /// optimization was completed successfully
    pub status: OptimizationStatus,
    /// Optimized value of the objective
    ///
    /// Some(f64) if an optimum was found, None otherwise
    pub objective_value: Option<f64>,
    /// Values of the variables at the optimum, keyed by variable id, in model
    /// declaration order
    ///
    /// Some(IndexMap) if an optimum was found, None otherwise
    pub variable_values: Option<IndexMap<String, f64>>,
}

impl ProblemSolution {
    /// Package the solution in the declarative result shape
    pub fn into_linear_result(self) -> LinearResult {
        match self.status {
            OptimizationStatus::Optimal => LinearResult {
                feasible: true,
                result: self.objective_value.unwrap_or(0.0),
                variable_result: self.variable_values.unwrap_or_default(),
            },
            OptimizationStatus::Infeasible => LinearResult {
                feasible: false,
                result: 0.0,
                variable_result: IndexMap::new(),
            },
        }
    }
}

/// Status of an optimization problem after a solve
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum OptimizationStatus {
    /// An optimal assignment was found
    Optimal,
    /// The problem can't be solved because it is infeasible (conflicting
    /// constraints)
    Infeasible,
}

/// Errors raised while translating a model into a canonical program
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProblemError {
    /// A variable declared a coefficient that is NaN or infinite
    #[error("variable `{variable}` has a non-finite coefficient for `{key}`")]
    NonFiniteCoefficient {
        /// Variable carrying the bad coefficient
        variable: String,
        /// Coefficient key the bad value was declared under
        key: String,
    },
    /// A constraint declared a bound that is NaN or infinite
    #[error("constraint `{constraint}` has a non-finite bound")]
    NonFiniteBound {
        /// Constraint carrying the bad bound
        constraint: String,
    },
}
