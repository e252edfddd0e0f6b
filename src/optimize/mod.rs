//! Canonical linear programs and the engines that solve them
pub mod branch_and_bound;
pub mod constraint;
pub mod objective;
pub mod problem;
pub mod simplex;
pub mod tableau;
pub mod variable;

use thiserror::Error;

use crate::optimize::problem::ProblemError;

/// Errors surfaced by a solve call
///
/// An infeasible model is not an error; it is reported through the result
/// types (see [`problem::OptimizationStatus`]).
#[derive(Error, Debug)]
pub enum SolverError {
    /// The model could not be translated into a canonical linear program
    #[error(transparent)]
    Model(#[from] ProblemError),
    /// The objective has no finite optimum within the feasible region
    #[error("objective is unbounded in the feasible region")]
    Unbounded,
    /// A pivot loop invariant was violated or a search budget exhausted;
    /// results would not be trustworthy
    #[error("internal solver error: {0}")]
    Internal(String),
}
