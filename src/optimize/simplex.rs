//! Two phase simplex driver over the tableau engine
use crate::configuration::SolverConfig;
use crate::optimize::constraint::{ConstraintRow, Relation};
use crate::optimize::problem::Problem;
use crate::optimize::tableau::{CostRow, Tableau};
use crate::optimize::SolverError;

/// Result of solving one continuous relaxation
#[derive(Debug, Clone)]
pub enum Relaxation {
    /// An optimal basic feasible solution was found
    Optimal {
        /// Structural variable values, aligned with the problem's variables
        values: Vec<f64>,
        /// Objective value under the internal minimization convention
        cost: f64,
    },
    /// The constraints admit no feasible point
    Infeasible,
}

/// Terminal state of one pivoting loop over a cost row
enum PhaseEnd {
    /// No entering column remains; the phase objective is optimal
    Optimal,
    /// An entering column had no bounding row
    Unbounded { entering: usize },
}

/// Solve the relaxation of `problem` under explicit per-variable bounds
///
/// Finite upper bounds and positive lower bounds are folded into explicit
/// rows; branch and bound relies on this to tighten variables per node.
/// Phase 1 drives the artificial variable sum to zero to find a feasible
/// basis, phase 2 optimizes the real objective from there.
pub fn solve_relaxation(
    problem: &Problem,
    bounds: &[(f64, f64)],
    config: &SolverConfig,
) -> Result<Relaxation, SolverError> {
    let costs = problem.objective.minimized_costs();
    let rows = rows_with_bounds(problem, bounds);
    let mut tableau = Tableau::build(&rows, &costs, config.tolerance);

    if tableau.has_artificials() {
        match run_phase(&mut tableau, CostRow::PhaseOne, config)? {
            PhaseEnd::Optimal => {}
            PhaseEnd::Unbounded { entering } => {
                // The artificial sum is bounded below by zero, so a missing
                // leaving row cannot occur with a correctly built tableau
                return Err(SolverError::Internal(format!(
                    "phase 1 found no leaving row for column {entering}"
                )));
            }
        }
        if tableau.phase_one_objective() > config.tolerance {
            return Ok(Relaxation::Infeasible);
        }
        tableau.drive_out_artificials();
    }

    match run_phase(&mut tableau, CostRow::Objective, config)? {
        PhaseEnd::Optimal => {}
        PhaseEnd::Unbounded { .. } => return Err(SolverError::Unbounded),
    }

    let values = tableau.solution();
    let cost = costs
        .iter()
        .zip(&values)
        .map(|(cost, value)| cost * value)
        .sum();
    Ok(Relaxation::Optimal { values, cost })
}

/// Pivot until the given cost row shows no improving column
fn run_phase(
    tableau: &mut Tableau,
    cost_row: CostRow,
    config: &SolverConfig,
) -> Result<PhaseEnd, SolverError> {
    for _ in 0..config.max_pivots {
        let entering = match tableau.entering_column(cost_row) {
            Some(column) => column,
            None => return Ok(PhaseEnd::Optimal),
        };
        let leaving = match tableau.leaving_row(entering) {
            Some(row) => row,
            None => return Ok(PhaseEnd::Unbounded { entering }),
        };
        tableau.pivot(leaving, entering);
    }
    Err(SolverError::Internal(format!(
        "pivot budget of {} exhausted, likely cycling",
        config.max_pivots
    )))
}

/// Problem rows plus explicit rows for finite variable bounds
fn rows_with_bounds(problem: &Problem, bounds: &[(f64, f64)]) -> Vec<ConstraintRow> {
    let num_variables = problem.num_variables();
    let mut rows = problem.rows.clone();
    for (index, &(lower, upper)) in bounds.iter().enumerate() {
        let id = &problem.variables[index].id;
        if upper.is_finite() {
            let mut coefficients = vec![0.0; num_variables];
            coefficients[index] = 1.0;
            rows.push(ConstraintRow::new(id, coefficients, Relation::Le, upper));
        }
        if lower > 0.0 && lower.is_finite() {
            let mut coefficients = vec![0.0; num_variables];
            coefficients[index] = 1.0;
            rows.push(ConstraintRow::new(id, coefficients, Relation::Ge, lower));
        }
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::indexmap;

    use crate::model::{ConstraintBounds, LinearModel, Operation};

    fn problem_from(model: &LinearModel) -> Problem {
        Problem::from_model(model).unwrap()
    }

    fn free_bounds(problem: &Problem) -> Vec<(f64, f64)> {
        problem.bounds()
    }

    #[test]
    fn maximize_within_capacity() {
        // maximize 3x + 5y subject to x <= 4, 2y <= 12, 3x + 2y <= 18
        let model = LinearModel {
            optimize: "profit".to_string(),
            operation: Operation::Max,
            constraints: indexmap! {
                "a".to_string() => ConstraintBounds::at_most(4.0),
                "b".to_string() => ConstraintBounds::at_most(12.0),
                "c".to_string() => ConstraintBounds::at_most(18.0),
            },
            variables: indexmap! {
                "x".to_string() => indexmap! {
                    "profit".to_string() => 3.0,
                    "a".to_string() => 1.0,
                    "c".to_string() => 3.0,
                },
                "y".to_string() => indexmap! {
                    "profit".to_string() => 5.0,
                    "b".to_string() => 2.0,
                    "c".to_string() => 2.0,
                },
            },
            integer: false,
        };
        let problem = problem_from(&model);
        let config = SolverConfig::default();
        match solve_relaxation(&problem, &free_bounds(&problem), &config).unwrap() {
            Relaxation::Optimal { values, cost } => {
                assert!((values[0] - 2.0).abs() < 1e-6);
                assert!((values[1] - 6.0).abs() < 1e-6);
                // Internal cost is the negated maximum
                assert!((cost + 36.0).abs() < 1e-6);
            }
            Relaxation::Infeasible => panic!("Feasible problem reported infeasible"),
        }
    }

    #[test]
    fn lower_bounds_need_phase_one() {
        // minimize 1000m + 750w with m >= 5, w >= 6, m + w >= 10
        let model = LinearModel {
            optimize: "cost".to_string(),
            operation: Operation::Min,
            constraints: indexmap! {
                "people".to_string() => ConstraintBounds::at_least(10.0),
                "men".to_string() => ConstraintBounds::at_least(5.0),
                "women".to_string() => ConstraintBounds::at_least(6.0),
            },
            variables: indexmap! {
                "man".to_string() => indexmap! {
                    "cost".to_string() => 1_000.0,
                    "men".to_string() => 1.0,
                    "people".to_string() => 1.0,
                },
                "woman".to_string() => indexmap! {
                    "cost".to_string() => 750.0,
                    "women".to_string() => 1.0,
                    "people".to_string() => 1.0,
                },
            },
            integer: false,
        };
        let problem = problem_from(&model);
        let config = SolverConfig::default();
        match solve_relaxation(&problem, &free_bounds(&problem), &config).unwrap() {
            Relaxation::Optimal { values, cost } => {
                assert!((values[0] - 5.0).abs() < 1e-6);
                assert!((values[1] - 6.0).abs() < 1e-6);
                assert!((cost - 9_500.0).abs() < 1e-6);
            }
            Relaxation::Infeasible => panic!("Feasible problem reported infeasible"),
        }
    }

    #[test]
    fn conflicting_bounds_are_infeasible() {
        // k >= 100 and k <= 10 cannot both hold
        let model = LinearModel {
            optimize: "k".to_string(),
            operation: Operation::Min,
            constraints: indexmap! {
                "k".to_string() => ConstraintBounds::between(100.0, 10.0),
            },
            variables: indexmap! {
                "x".to_string() => indexmap! { "k".to_string() => 1.0 },
            },
            integer: false,
        };
        let problem = problem_from(&model);
        let config = SolverConfig::default();
        match solve_relaxation(&problem, &free_bounds(&problem), &config).unwrap() {
            Relaxation::Infeasible => {}
            Relaxation::Optimal { .. } => panic!("Conflicting bounds not reported infeasible"),
        }
    }

    #[test]
    fn missing_upper_bound_is_unbounded() {
        let model = LinearModel {
            optimize: "profit".to_string(),
            operation: Operation::Max,
            constraints: indexmap! {},
            variables: indexmap! {
                "x".to_string() => indexmap! { "profit".to_string() => 1.0 },
            },
            integer: false,
        };
        let problem = problem_from(&model);
        let config = SolverConfig::default();
        match solve_relaxation(&problem, &free_bounds(&problem), &config) {
            Err(SolverError::Unbounded) => {}
            _ => panic!("Unbounded objective not detected"),
        }
    }

    #[test]
    fn equality_row_from_collapsed_bounds() {
        // x + y = 2, minimize x + 2y: optimum at x = 2, y = 0
        let model = LinearModel {
            optimize: "cost".to_string(),
            operation: Operation::Min,
            constraints: indexmap! {
                "total".to_string() => ConstraintBounds::between(2.0, 2.0),
            },
            variables: indexmap! {
                "x".to_string() => indexmap! {
                    "cost".to_string() => 1.0,
                    "total".to_string() => 1.0,
                },
                "y".to_string() => indexmap! {
                    "cost".to_string() => 2.0,
                    "total".to_string() => 1.0,
                },
            },
            integer: false,
        };
        let problem = problem_from(&model);
        let config = SolverConfig::default();
        match solve_relaxation(&problem, &free_bounds(&problem), &config).unwrap() {
            Relaxation::Optimal { values, cost } => {
                assert!((values[0] - 2.0).abs() < 1e-6);
                assert!(values[1].abs() < 1e-6);
                assert!((cost - 2.0).abs() < 1e-6);
            }
            Relaxation::Infeasible => panic!("Equality constrained problem reported infeasible"),
        }
    }

    #[test]
    fn variable_bounds_become_rows() {
        // maximize x with x in [0, 2.5]
        let model = LinearModel {
            optimize: "profit".to_string(),
            operation: Operation::Max,
            constraints: indexmap! {},
            variables: indexmap! {
                "x".to_string() => indexmap! { "profit".to_string() => 1.0 },
            },
            integer: false,
        };
        let problem = problem_from(&model);
        let config = SolverConfig::default();
        match solve_relaxation(&problem, &[(0.0, 2.5)], &config).unwrap() {
            Relaxation::Optimal { values, .. } => {
                assert!((values[0] - 2.5).abs() < 1e-6);
            }
            Relaxation::Infeasible => panic!("Bounded variable reported infeasible"),
        }
    }

    #[test]
    fn empty_problem_is_trivially_optimal() {
        let model = LinearModel {
            optimize: "anything".to_string(),
            operation: Operation::Min,
            constraints: indexmap! {},
            variables: indexmap! {},
            integer: false,
        };
        let problem = problem_from(&model);
        let config = SolverConfig::default();
        match solve_relaxation(&problem, &free_bounds(&problem), &config).unwrap() {
            Relaxation::Optimal { values, cost } => {
                assert!(values.is_empty());
                assert_eq!(cost, 0.0);
            }
            Relaxation::Infeasible => panic!("Empty problem reported infeasible"),
        }
    }
}
