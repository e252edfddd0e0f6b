//! Declarative linear model consumed by the solver
use std::fmt::{Display, Formatter};

use derive_builder::Builder;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Whether the objective should be minimized or maximized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    /// Drive the objective as low as possible
    Min,
    /// Drive the objective as high as possible
    Max,
}

impl Display for Operation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Min => write!(f, "min"),
            Operation::Max => write!(f, "max"),
        }
    }
}

/// Bounds on the weighted sum collected under one constraint name
///
/// A `min` and a `max` on the same name are independent inequalities sharing
/// one coefficient row; either side may be absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ConstraintBounds {
    /// Lowest value the weighted sum may take
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    /// Highest value the weighted sum may take
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

impl ConstraintBounds {
    /// Bound the weighted sum from above only
    pub fn at_most(max: f64) -> Self {
        ConstraintBounds {
            min: None,
            max: Some(max),
        }
    }

    /// Bound the weighted sum from below only
    pub fn at_least(min: f64) -> Self {
        ConstraintBounds {
            min: Some(min),
            max: None,
        }
    }

    /// Bound the weighted sum on both sides
    pub fn between(min: f64, max: f64) -> Self {
        ConstraintBounds {
            min: Some(min),
            max: Some(max),
        }
    }
}

/// A linear optimization model in declarative form
///
/// Variables map coefficient keys to the amount one unit of the variable
/// contributes to the total collected under that key. Constraints bound those
/// totals by name, and `optimize` names the total driven by the objective.
///
/// # Examples
/// ```rust
/// use indexmap::indexmap;
/// use simplexrs::model::{ConstraintBounds, LinearModelBuilder, Operation};
///
/// let model = LinearModelBuilder::default()
///     .optimize("profit")
///     .operation(Operation::Max)
///     .constraints(indexmap! {
///         "hours".to_string() => ConstraintBounds::at_most(40.0),
///     })
///     .variables(indexmap! {
///         "widget".to_string() => indexmap! {
///             "profit".to_string() => 3.0,
///             "hours".to_string() => 2.0,
///         },
///     })
///     .build()
///     .unwrap();
/// assert!(!model.integer);
/// ```
#[derive(Builder, Debug, Clone, Serialize, Deserialize)]
pub struct LinearModel {
    /// Name of the coefficient key the objective collects
    #[builder(setter(into))]
    pub optimize: String,
    /// Whether the objective is minimized or maximized
    pub operation: Operation,
    /// Named constraints with their bounds
    #[serde(default)]
    #[builder(default = "IndexMap::new()")]
    pub constraints: IndexMap<String, ConstraintBounds>,
    /// Named variables mapping coefficient keys to contributions
    #[builder(default = "IndexMap::new()")]
    pub variables: IndexMap<String, IndexMap<String, f64>>,
    /// Restrict every variable to whole number values
    #[serde(default)]
    #[builder(default = "false")]
    pub integer: bool,
}

/// Outcome of a solve in the declarative result shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearResult {
    /// Whether any assignment satisfies all constraints
    pub feasible: bool,
    /// Objective value at the optimum; meaningless when not feasible
    pub result: f64,
    /// Value assigned to each variable, in model declaration order
    #[serde(default, rename = "variableResult")]
    pub variable_result: IndexMap<String, f64>,
}
