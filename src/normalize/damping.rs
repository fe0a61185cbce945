//! Uniform mixing for irreducibility.
//!
//! The blend is defined as:
//! ```text
//! M₂ = α × M₁  +  (1 − α) × J / N
//! ```
//! where J is the all-ones matrix. For α < 1 every entry of M₂ is positive,
//! so the chain is irreducible and aperiodic and has exactly one stationary
//! distribution even when the preference graph is disconnected.
//!
//! The set of row-stochastic matrices is convex, so M₂ is stochastic whenever
//! M₁ is. A final row normalisation only removes rounding drift.

use nalgebra::DMatrix;

use super::rows::normalize_rows;
use crate::config::Damping;
use crate::error::Result;

/// `rownorm(α·m + (1 − α)·J/N)`.
pub fn apply_damping(
    m: &DMatrix<f64>,
    damping: Damping,
    participants: &[String],
) -> Result<DMatrix<f64>> {
    let n = m.nrows();
    let alpha = damping.alpha();
    let uniform = damping.teleport() / n as f64;
    let mixed = m.map(|v| alpha * v + uniform);
    normalize_rows(&mixed, participants)
}
