//! Self-vote removal.
//!
//! Equity is earned from what others say, not from what a participant asks
//! for. The diagonal of M₀ is zeroed and each row rescaled so the remaining
//! votes keep their proportions and sum to 1 again.

use nalgebra::DMatrix;

use super::rows::normalize_rows;
use crate::error::Result;

/// `M₁ = rownorm(M₀ − diag(M₀))`.
///
/// Fails with [`crate::EquityError::DegenerateInput`] when a participant gave
/// everything to themselves, which always happens for a single participant.
pub fn strip_self_votes(votes: &DMatrix<f64>, participants: &[String]) -> Result<DMatrix<f64>> {
    let mut m = votes.clone();
    m.fill_diagonal(0.0);
    normalize_rows(&m, participants)
}
