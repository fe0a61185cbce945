//! Allocation gate: every participant must hand out exactly 100%.
//!
//! The check is aggregate: the L2 norm of the
//! vector of row-sum deviations `(Σⱼ M₀[i,j] − 1)ᵢ` must not exceed the
//! tolerance. Negative entries are rejected outright since no stochastic
//! matrix can be built from them.

use nalgebra::{DMatrix, DVector};

use crate::error::{EquityError, Result};
use crate::table::VoteTable;

/// Per-row deviation `Σⱼ m[i,j] − 1`.
pub fn row_sum_deviation(m: &DMatrix<f64>) -> DVector<f64> {
    // column_sum adds the columns together, giving one entry per row
    m.column_sum().map(|s| s - 1.0)
}

/// Check that `table` is a valid allocation matrix.
///
/// Returns the L2 norm of the row-sum deviation on success.
pub fn validate_allocations(table: &VoteTable, tolerance: f64) -> Result<f64> {
    let m = table.votes();
    let names = table.participants();

    for i in 0..m.nrows() {
        for j in 0..m.ncols() {
            let value = m[(i, j)];
            if value < 0.0 {
                return Err(EquityError::NegativeAllocation {
                    participant: names[i].clone(),
                    target: names[j].clone(),
                    value,
                });
            }
        }
    }

    let deviations = row_sum_deviation(m);
    let deviation = deviations.norm();
    tracing::debug!(deviation, tolerance, "row-sum deviation");

    if deviation > tolerance {
        let rows = deviations
            .iter()
            .zip(names)
            .filter(|(d, _)| d.abs() > tolerance)
            .map(|(_, name)| name.clone())
            .collect();
        return Err(EquityError::RowSums {
            deviation,
            tolerance,
            rows,
        });
    }
    Ok(deviation)
}
