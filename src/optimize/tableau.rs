//! Simplex tableau construction and pivoting
use nalgebra::DMatrix;

use crate::optimize::constraint::{ConstraintRow, Relation};

/// Which cost row drives the entering selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CostRow {
    /// The real objective row
    Objective,
    /// The phase 1 row minimizing the artificial variable sum
    PhaseOne,
}

/// Dense simplex tableau in standard equality form
///
/// Columns are laid out as structural variables, then slack and surplus
/// variables, then artificial variables, then the right hand side. Two cost
/// rows follow the constraint rows (the real objective and the phase 1
/// artificial sum); both are updated by every pivot, so phase 2 starts from an
/// already priced out objective row.
#[derive(Debug, Clone)]
pub struct Tableau {
    /// Augmented coefficient matrix including both cost rows
    matrix: DMatrix<f64>,
    /// Basic variable column for each constraint row
    basis: Vec<usize>,
    /// Number of structural variables
    num_structural: usize,
    /// Number of constraint rows
    num_rows: usize,
    /// First artificial column; artificial columns are never eligible to enter
    artificial_start: usize,
    /// Tolerance used for every comparison against zero
    tolerance: f64,
}

impl Tableau {
    /// Build the standard form tableau for a set of canonical rows
    ///
    /// `<=` rows receive a slack variable, `>=` rows a surplus and an
    /// artificial variable, `=` rows an artificial variable only. Rows with a
    /// negative right hand side are negated (and their relation flipped)
    /// first, so the right hand side column starts nonnegative and the slack
    /// and artificial columns form an initial basic feasible solution of the
    /// phase 1 program.
    pub fn build(rows: &[ConstraintRow], costs: &[f64], tolerance: f64) -> Tableau {
        let num_structural = costs.len();
        let num_rows = rows.len();

        let normalized: Vec<(Vec<f64>, Relation, f64)> = rows
            .iter()
            .map(|row| {
                if row.rhs < 0.0 {
                    let coefficients = row.coefficients.iter().map(|c| -c).collect();
                    let relation = match row.relation {
                        Relation::Le => Relation::Ge,
                        Relation::Ge => Relation::Le,
                        Relation::Eq => Relation::Eq,
                    };
                    (coefficients, relation, -row.rhs)
                } else {
                    (row.coefficients.clone(), row.relation, row.rhs)
                }
            })
            .collect();

        let num_slack = normalized
            .iter()
            .filter(|(_, relation, _)| *relation != Relation::Eq)
            .count();
        let num_artificial = normalized
            .iter()
            .filter(|(_, relation, _)| *relation != Relation::Le)
            .count();
        let artificial_start = num_structural + num_slack;
        let num_cols = artificial_start + num_artificial + 1;
        let rhs_col = num_cols - 1;

        let mut matrix = DMatrix::zeros(num_rows + 2, num_cols);
        let mut basis = vec![0usize; num_rows];
        let mut slack_idx = num_structural;
        let mut artificial_idx = artificial_start;

        for (i, (coefficients, relation, rhs)) in normalized.iter().enumerate() {
            for (j, &value) in coefficients.iter().enumerate() {
                matrix[(i, j)] = value;
            }
            matrix[(i, rhs_col)] = *rhs;
            match relation {
                Relation::Le => {
                    matrix[(i, slack_idx)] = 1.0;
                    basis[i] = slack_idx;
                    slack_idx += 1;
                }
                Relation::Ge => {
                    matrix[(i, slack_idx)] = -1.0;
                    slack_idx += 1;
                    matrix[(i, artificial_idx)] = 1.0;
                    basis[i] = artificial_idx;
                    artificial_idx += 1;
                }
                Relation::Eq => {
                    matrix[(i, artificial_idx)] = 1.0;
                    basis[i] = artificial_idx;
                    artificial_idx += 1;
                }
            }
        }

        let cost_row = num_rows;
        for (j, &cost) in costs.iter().enumerate() {
            matrix[(cost_row, j)] = cost;
        }

        // Phase 1 row: unit cost per artificial, priced out against the rows
        // whose basic variable is artificial
        let phase_row = num_rows + 1;
        for j in artificial_start..rhs_col {
            matrix[(phase_row, j)] = 1.0;
        }
        for i in 0..num_rows {
            if basis[i] >= artificial_start {
                for j in 0..num_cols {
                    let value = matrix[(i, j)];
                    matrix[(phase_row, j)] -= value;
                }
            }
        }

        Tableau {
            matrix,
            basis,
            num_structural,
            num_rows,
            artificial_start,
            tolerance,
        }
    }

    /// Whether any artificial columns were added during construction
    pub fn has_artificials(&self) -> bool {
        self.artificial_start < self.rhs_col()
    }

    /// Column with the most negative reduced cost under the given cost row,
    /// or `None` when no column can improve the phase objective
    ///
    /// Ties are broken by the lowest column index. Artificial columns are
    /// never eligible to enter.
    pub fn entering_column(&self, cost_row: CostRow) -> Option<usize> {
        let row = self.cost_row(cost_row);
        let mut best: Option<(usize, f64)> = None;
        for j in 0..self.artificial_start {
            let reduced = self.matrix[(row, j)];
            if reduced < -self.tolerance {
                let better = match best {
                    Some((_, current)) => reduced < current,
                    None => true,
                };
                if better {
                    best = Some((j, reduced));
                }
            }
        }
        best.map(|(j, _)| j)
    }

    /// Row selected by the minimum ratio test for an entering column, or
    /// `None` when no row bounds the entering column
    ///
    /// Ties are broken by the lowest row index.
    pub fn leaving_row(&self, entering: usize) -> Option<usize> {
        let rhs_col = self.rhs_col();
        let mut best: Option<(usize, f64)> = None;
        for i in 0..self.num_rows {
            let entry = self.matrix[(i, entering)];
            if entry > self.tolerance {
                let ratio = self.matrix[(i, rhs_col)] / entry;
                let better = match best {
                    Some((_, current)) => ratio < current,
                    None => true,
                };
                if better {
                    best = Some((i, ratio));
                }
            }
        }
        best.map(|(i, _)| i)
    }

    /// Pivot the tableau so `entering` becomes basic in `row`
    ///
    /// Normalizes the pivot row so the pivot element is one, then eliminates
    /// the entering column from every other row including both cost rows.
    /// Every basic column stays an identity column.
    pub fn pivot(&mut self, row: usize, entering: usize) {
        let num_cols = self.matrix.ncols();
        let pivot_value = self.matrix[(row, entering)];
        for j in 0..num_cols {
            self.matrix[(row, j)] /= pivot_value;
        }
        for i in 0..self.matrix.nrows() {
            if i == row {
                continue;
            }
            let factor = self.matrix[(i, entering)];
            if factor.abs() <= self.tolerance {
                continue;
            }
            for j in 0..num_cols {
                let value = self.matrix[(row, j)];
                self.matrix[(i, j)] -= factor * value;
            }
        }
        self.basis[row] = entering;
    }

    /// Current value of the phase 1 objective, the artificial variable sum
    pub fn phase_one_objective(&self) -> f64 {
        -self.matrix[(self.num_rows + 1, self.rhs_col())]
    }

    /// Pivot zero valued artificial variables out of the basis after phase 1
    ///
    /// Rows whose artificial cannot be replaced by any structural, slack, or
    /// surplus column carry a redundant constraint; they are zeroed so later
    /// pivots never touch them.
    pub fn drive_out_artificials(&mut self) {
        let rhs_col = self.rhs_col();
        for i in 0..self.num_rows {
            if self.basis[i] < self.artificial_start {
                continue;
            }
            let replacement =
                (0..self.artificial_start).find(|&j| self.matrix[(i, j)].abs() > self.tolerance);
            match replacement {
                Some(j) => self.pivot(i, j),
                None => {
                    for j in 0..=rhs_col {
                        self.matrix[(i, j)] = 0.0;
                    }
                }
            }
        }
    }

    /// Current values of the structural variables
    ///
    /// Basic variables are read from the right hand side column; non-basic
    /// variables are zero.
    pub fn solution(&self) -> Vec<f64> {
        let rhs_col = self.rhs_col();
        let mut values = vec![0.0; self.num_structural];
        for (i, &basic) in self.basis.iter().enumerate() {
            if basic < self.num_structural {
                values[basic] = self.matrix[(i, rhs_col)];
            }
        }
        values
    }

    fn rhs_col(&self) -> usize {
        self.matrix.ncols() - 1
    }

    fn cost_row(&self, which: CostRow) -> usize {
        match which {
            CostRow::Objective => self.num_rows,
            CostRow::PhaseOne => self.num_rows + 1,
        }
    }
}
