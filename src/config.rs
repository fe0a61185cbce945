//! Run configuration: damping coefficient, tolerances and table delimiter.
//!
//! The damping coefficient α is an explicit value threaded into the
//! normalizer, so several α values can be evaluated side by side in one
//! process (see `demos/damping_sweep.rs`).

use core::fmt;

use crate::error::{EquityError, Result};

// ─── Damping ─────────────────────────────────────────────────────────────────

/// Mixing weight α ∈ [0, 1] between stated preferences and the uniform matrix.
///
/// - `1.0` (default): pure EigenEquity, no uniform mixing.
/// - `0.85`: the random-surfer weighting used for web ranking.
/// - `0.0`: everyone receives `1/N` regardless of votes.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Damping(f64);

impl Damping {
    /// Pure EigenEquity.
    pub const PURE: Damping = Damping(1.0);

    /// Random-surfer damping.
    pub const PAGERANK: Damping = Damping(0.85);

    /// Validate and wrap `alpha`.
    ///
    /// Fails with [`EquityError::InvalidDamping`] when `alpha` is NaN or
    /// outside `[0, 1]`.
    pub fn new(alpha: f64) -> Result<Self> {
        if (0.0..=1.0).contains(&alpha) {
            Ok(Self(alpha))
        } else {
            Err(EquityError::InvalidDamping(alpha))
        }
    }

    /// Raw α.
    #[inline]
    pub fn alpha(self) -> f64 {
        self.0
    }

    /// Weight given to the uniform matrix, `1 − α`.
    #[inline]
    pub fn teleport(self) -> f64 {
        1.0 - self.0
    }
}

impl Default for Damping {
    fn default() -> Self {
        Self::PURE
    }
}

impl fmt::Display for Damping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<f64> for Damping {
    type Error = EquityError;

    fn try_from(alpha: f64) -> Result<Self> {
        Self::new(alpha)
    }
}

// ─── EquityConfig ────────────────────────────────────────────────────────────

/// Tolerance on the L2 norm of row-sum deviations accepted by the validator.
pub const ROW_SUM_TOLERANCE: f64 = 1e-8;

/// Maximum distance between the selected eigenvalue and 1.
pub const EIGEN_TOLERANCE: f64 = 1e-8;

/// Configuration for one equity computation.
#[derive(Clone, Debug, PartialEq)]
pub struct EquityConfig {
    /// Damping coefficient. Default: 1.0.
    pub damping: Damping,

    /// Accepted L2 norm of `row_sums − 1`. Default: 1e-8.
    pub row_sum_tolerance: f64,

    /// Accepted `|λ − 1|` for the selected eigenvalue. Default: 1e-8.
    pub eigen_tolerance: f64,

    /// Iteration cap for the Schur and SVD decompositions. Default: 10 000.
    pub max_iterations: usize,

    /// Field separator of the votes table. Default: tab.
    pub delimiter: char,
}

impl Default for EquityConfig {
    fn default() -> Self {
        Self {
            damping: Damping::default(),
            row_sum_tolerance: ROW_SUM_TOLERANCE,
            eigen_tolerance: EIGEN_TOLERANCE,
            max_iterations: 10_000,
            delimiter: '\t',
        }
    }
}

impl EquityConfig {
    /// Default configuration with the given damping.
    pub fn with_damping(damping: Damping) -> Self {
        Self {
            damping,
            ..Self::default()
        }
    }
}
