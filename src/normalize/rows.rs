//! Row normalisation onto the set of row-stochastic matrices.
//!
//! One pass divides every row by its sum. A row whose mass is at or below
//! [`MIN_ROW_MASS`] cannot be normalised and is reported instead of being
//! turned into NaN/Inf.
//!
//! # Invariants
//! - Output entries are non-negative when input entries are.
//! - Output rows sum to 1 up to rounding.
//! - A row-stochastic input is returned unchanged up to rounding.

use nalgebra::DMatrix;

use crate::error::{EquityError, Result};

/// Smallest row sum that is still normalised.
pub const MIN_ROW_MASS: f64 = 1e-12;

/// Divide each row of `m` by its sum.
///
/// `participants[i]` names row `i` in the error raised for a massless row.
pub fn normalize_rows(m: &DMatrix<f64>, participants: &[String]) -> Result<DMatrix<f64>> {
    let mut out = m.clone();
    for (i, mut row) in out.row_iter_mut().enumerate() {
        let s = row.sum();
        // `!(s > ..)` also catches NaN
        if !(s > MIN_ROW_MASS) {
            return Err(EquityError::DegenerateInput {
                participant: participants
                    .get(i)
                    .cloned()
                    .unwrap_or_else(|| format!("row {i}")),
            });
        }
        row /= s;
    }
    Ok(out)
}

/// Maximum absolute deviation of any row sum from 1.0.
pub fn max_row_residual(m: &DMatrix<f64>) -> f64 {
    m.row_iter()
        .map(|row| (row.sum() - 1.0).abs())
        .fold(0.0_f64, f64::max)
}

/// True when every entry is non-negative and every row sums to 1 within `tolerance`.
pub fn is_row_stochastic(m: &DMatrix<f64>, tolerance: f64) -> bool {
    m.iter().all(|&v| v >= 0.0) && max_row_residual(m) <= tolerance
}
