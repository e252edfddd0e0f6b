//! Branch and bound search over continuous relaxations
use crate::configuration::SolverConfig;
use crate::optimize::problem::Problem;
use crate::optimize::simplex::{self, Relaxation};
use crate::optimize::variable::VariableType;
use crate::optimize::SolverError;

/// One subproblem of the search: the root bounds with per-branch tightenings
#[derive(Debug, Clone)]
struct BranchNode {
    /// Per-variable bounds for this node's relaxation
    bounds: Vec<(f64, f64)>,
    /// Objective value of the parent relaxation, used for pruning
    relaxation_bound: f64,
    /// Number of branching decisions above this node
    depth: usize,
}

/// Depth first branch and bound over the integer restricted problem
///
/// Each popped node's relaxation is solved with the simplex engine. Nodes are
/// pruned when infeasible or when their bound cannot beat the incumbent; an
/// integral relaxation that improves the incumbent replaces it; otherwise the
/// most fractional integer variable is branched into floor and ceiling
/// children. The work list is a stack, so memory stays proportional to the
/// search depth. The search stops when the list empties or the node budget is
/// exhausted, returning the best incumbent found.
pub fn search(problem: &Problem, config: &SolverConfig) -> Result<Relaxation, SolverError> {
    let mut work_list = vec![BranchNode {
        bounds: problem.bounds(),
        relaxation_bound: f64::NEG_INFINITY,
        depth: 0,
    }];

    let mut incumbent: Option<(Vec<f64>, f64)> = None;
    let mut explored = 0usize;

    while let Some(node) = work_list.pop() {
        explored += 1;
        if explored > config.max_nodes {
            break;
        }

        if let Some((_, best_cost)) = &incumbent {
            if node.relaxation_bound >= best_cost - config.tolerance {
                continue;
            }
        }

        let (values, cost) = match simplex::solve_relaxation(problem, &node.bounds, config)? {
            Relaxation::Optimal { values, cost } => (values, cost),
            Relaxation::Infeasible => continue,
        };

        if let Some((_, best_cost)) = &incumbent {
            if cost >= best_cost - config.tolerance {
                continue;
            }
        }

        match fractional_variable(problem, &values, config) {
            None => {
                // Integral on every restricted variable and better than the
                // incumbent: this relaxation becomes the incumbent
                incumbent = Some((values, cost));
            }
            Some(branch) => {
                let value = values[branch];
                let (floor, ceiling) = (value.floor(), value.ceil());

                let mut ceiling_child = node.bounds.clone();
                ceiling_child[branch].0 = ceiling_child[branch].0.max(ceiling);
                if ceiling_child[branch].0 <= ceiling_child[branch].1 {
                    work_list.push(BranchNode {
                        bounds: ceiling_child,
                        relaxation_bound: cost,
                        depth: node.depth + 1,
                    });
                }

                let mut floor_child = node.bounds.clone();
                floor_child[branch].1 = floor_child[branch].1.min(floor);
                if floor_child[branch].0 <= floor_child[branch].1 {
                    work_list.push(BranchNode {
                        bounds: floor_child,
                        relaxation_bound: cost,
                        depth: node.depth + 1,
                    });
                }
            }
        }
    }

    Ok(match incumbent {
        Some((values, cost)) => Relaxation::Optimal { values, cost },
        None => Relaxation::Infeasible,
    })
}

/// Integer restricted variable farthest from a whole number, if any
///
/// Ties are broken by the lowest variable index.
fn fractional_variable(
    problem: &Problem,
    values: &[f64],
    config: &SolverConfig,
) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (index, variable) in problem.variables.iter().enumerate() {
        if variable.variable_type != VariableType::Integer {
            continue;
        }
        let value = values[index];
        let fraction = value - value.floor();
        let distance = fraction.min(1.0 - fraction);
        if distance <= config.integrality_tolerance {
            continue;
        }
        let better = match best {
            Some((_, current)) => distance > current,
            None => true,
        };
        if better {
            best = Some((index, distance));
        }
    }
    best.map(|(index, _)| index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::indexmap;

    use crate::model::{ConstraintBounds, LinearModel, Operation};

    #[test]
    fn branches_to_the_integer_optimum() {
        // maximize a + 2b with a + b <= 3.5 and a <= 2.5; the relaxation is
        // fractional (b = 3.5), the integer optimum is a = 0, b = 3
        let model = LinearModel {
            optimize: "profit".to_string(),
            operation: Operation::Max,
            constraints: indexmap! {
                "cap".to_string() => ConstraintBounds::at_most(3.5),
                "alim".to_string() => ConstraintBounds::at_most(2.5),
            },
            variables: indexmap! {
                "a".to_string() => indexmap! {
                    "profit".to_string() => 1.0,
                    "cap".to_string() => 1.0,
                    "alim".to_string() => 1.0,
                },
                "b".to_string() => indexmap! {
                    "profit".to_string() => 2.0,
                    "cap".to_string() => 1.0,
                },
            },
            integer: true,
        };
        let problem = Problem::from_model(&model).unwrap();
        let config = SolverConfig::default();
        match search(&problem, &config).unwrap() {
            Relaxation::Optimal { values, cost } => {
                assert!(values[0].abs() < 1e-6);
                assert!((values[1] - 3.0).abs() < 1e-6);
                assert!((cost + 6.0).abs() < 1e-6);
            }
            Relaxation::Infeasible => panic!("Feasible integer problem reported infeasible"),
        }
    }

    #[test]
    fn knapsack_style_selection() {
        // maximize 3x + 4y with 2x + 3y <= 5 and x, y each capped at one
        let model = LinearModel {
            optimize: "value".to_string(),
            operation: Operation::Max,
            constraints: indexmap! {
                "weight".to_string() => ConstraintBounds::at_most(5.0),
                "xcap".to_string() => ConstraintBounds::at_most(1.0),
                "ycap".to_string() => ConstraintBounds::at_most(1.0),
            },
            variables: indexmap! {
                "x".to_string() => indexmap! {
                    "value".to_string() => 3.0,
                    "weight".to_string() => 2.0,
                    "xcap".to_string() => 1.0,
                },
                "y".to_string() => indexmap! {
                    "value".to_string() => 4.0,
                    "weight".to_string() => 3.0,
                    "ycap".to_string() => 1.0,
                },
            },
            integer: true,
        };
        let problem = Problem::from_model(&model).unwrap();
        let config = SolverConfig::default();
        match search(&problem, &config).unwrap() {
            Relaxation::Optimal { values, cost } => {
                assert!((values[0] - 1.0).abs() < 1e-6);
                assert!((values[1] - 1.0).abs() < 1e-6);
                assert!((cost + 7.0).abs() < 1e-6);
            }
            Relaxation::Infeasible => panic!("Feasible knapsack reported infeasible"),
        }
    }

    #[test]
    fn infeasible_search_reports_no_incumbent() {
        let model = LinearModel {
            optimize: "k".to_string(),
            operation: Operation::Min,
            constraints: indexmap! {
                "k".to_string() => ConstraintBounds::between(100.0, 10.0),
            },
            variables: indexmap! {
                "x".to_string() => indexmap! { "k".to_string() => 1.0 },
            },
            integer: true,
        };
        let problem = Problem::from_model(&model).unwrap();
        let config = SolverConfig::default();
        match search(&problem, &config).unwrap() {
            Relaxation::Infeasible => {}
            Relaxation::Optimal { .. } => panic!("Infeasible search produced an incumbent"),
        }
    }

    #[test]
    fn node_budget_stops_the_search() {
        let model = LinearModel {
            optimize: "profit".to_string(),
            operation: Operation::Max,
            constraints: indexmap! {
                "cap".to_string() => ConstraintBounds::at_most(3.5),
            },
            variables: indexmap! {
                "a".to_string() => indexmap! {
                    "profit".to_string() => 1.0,
                    "cap".to_string() => 1.0,
                },
            },
            integer: true,
        };
        let problem = Problem::from_model(&model).unwrap();
        let mut config = SolverConfig::default();
        config.max_nodes = 1;
        // The root relaxation is fractional, and the budget forbids exploring
        // its children; the search terminates without an incumbent
        match search(&problem, &config).unwrap() {
            Relaxation::Infeasible => {}
            Relaxation::Optimal { .. } => panic!("Budgeted search should not find an incumbent"),
        }
    }
}
