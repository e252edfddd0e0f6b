//! Core rust implementation of a linear programming solver.
//!
//! Models are declared as named variables whose coefficients contribute to
//! named constraints (see [`model::LinearModel`]), translated into a canonical
//! program ([`optimize::problem::Problem`]), and solved with a two phase
//! simplex engine, plus branch and bound when whole number values are
//! required.

pub mod configuration;
pub mod io;
pub mod model;
pub mod optimize;

pub use configuration::{SolverConfig, SolverConfigBuilder};
pub use model::{ConstraintBounds, LinearModel, LinearResult, Operation};
pub use optimize::SolverError;

use optimize::problem::Problem;

/// Solve a declarative linear model with the default configuration
///
/// # Examples
/// ```rust
/// use indexmap::indexmap;
/// use simplexrs::{ConstraintBounds, LinearModel, Operation};
///
/// // Staff a venue as cheaply as possible while meeting headcount floors
/// let model = LinearModel {
///     optimize: "cost".to_string(),
///     operation: Operation::Min,
///     constraints: indexmap! {
///         "cost".to_string() => ConstraintBounds::between(0.0, 25_000.0),
///         "peopleAmount".to_string() => ConstraintBounds::between(10.0, 50.0),
///         "manAmount".to_string() => ConstraintBounds::between(5.0, 30.0),
///         "womanAmount".to_string() => ConstraintBounds::between(6.0, 35.0),
///     },
///     variables: indexmap! {
///         "man".to_string() => indexmap! {
///             "cost".to_string() => 1_000.0,
///             "manAmount".to_string() => 1.0,
///             "peopleAmount".to_string() => 1.0,
///         },
///         "woman".to_string() => indexmap! {
///             "cost".to_string() => 750.0,
///             "womanAmount".to_string() => 1.0,
///             "peopleAmount".to_string() => 1.0,
///         },
///     },
///     integer: true,
/// };
///
/// let outcome = simplexrs::solve(&model).unwrap();
/// assert!(outcome.feasible);
/// assert_eq!(outcome.result, 9_500.0);
/// assert_eq!(outcome.variable_result["man"], 5.0);
/// assert_eq!(outcome.variable_result["woman"], 6.0);
/// ```
pub fn solve(model: &LinearModel) -> Result<LinearResult, SolverError> {
    solve_with_config(model, &SolverConfig::default())
}

/// Solve a declarative linear model under an explicit [`SolverConfig`]
///
/// Each call owns its tableau and search state exclusively, so independent
/// solves may run in parallel without synchronization.
pub fn solve_with_config(
    model: &LinearModel,
    config: &SolverConfig,
) -> Result<LinearResult, SolverError> {
    let problem = Problem::from_model(model)?;
    let solution = problem.optimize(config)?;
    Ok(solution.into_linear_result())
}
