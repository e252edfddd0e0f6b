//! Numeric tolerances and search budgets for a solve call
use derive_builder::Builder;

/// Configuration for a single solve call
///
/// A configuration is passed per call rather than held in process-wide state,
/// so concurrent solves never share anything mutable.
#[derive(Builder, Debug, Clone)]
pub struct SolverConfig {
    /// Tolerance used for every comparison against zero in the tableau
    /// (reduced costs, ratio test entries, the phase 1 objective)
    #[builder(default = "1e-9")]
    pub tolerance: f64,
    /// Distance from the nearest whole number below which a value is
    /// considered integral
    #[builder(default = "1e-6")]
    pub integrality_tolerance: f64,
    /// Pivot budget per simplex phase, guards against cycling
    #[builder(default = "10_000")]
    pub max_pivots: usize,
    /// Node budget for the branch and bound search
    #[builder(default = "10_000")]
    pub max_nodes: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            tolerance: 1e-9,
            integrality_tolerance: 1e-6,
            max_pivots: 10_000,
            max_nodes: 10_000,
        }
    }
}
