//! Stationary distribution of a stochastic matrix.
//!
//! The stationary distribution p satisfies `pᵀM = pᵀ`, i.e. p is a left
//! eigenvector of M (a right eigenvector of Mᵀ) for eigenvalue 1.
//!
//! # Algorithm
//!
//! 1. Real Schur decomposition of Mᵀ; read off all N eigenvalues as complex
//!    numbers (a real non-symmetric matrix has conjugate pairs).
//! 2. Pick the eigenvalue λ* with the smallest complex modulus `|λ − 1|`.
//!    If that distance exceeds the tolerance, M is not a Markov matrix and the
//!    run fails with [`EquityError::NotMarkovian`].
//! 3. Once λ* is known to be within tolerance of 1, its imaginary part is
//!    rounding noise and is dropped. The eigenvector is the null vector of the
//!    real matrix `Mᵀ − Re(λ*)·I`: the right singular vector belonging to its
//!    smallest singular value.
//! 4. Divide by the component sum so the entries sum to 1 (this also fixes
//!    the arbitrary sign the SVD returns).
//! 5. Entries between −[`NEGATIVE_SHARE_TOLERANCE`] and 0 are rounding noise
//!    and become 0; anything more negative fails with
//!    [`EquityError::NegativeShare`].
//!
//! Cost is dominated by the two dense O(N³) decompositions.
//!
//! # Reducible chains
//!
//! When the preference graph splits into several closed classes (possible
//! only with α = 1) eigenvalue 1 is repeated and its null space holds
//! combinations of the per-class solutions, some with negative entries. The
//! solver then solves each closed class on its own block with steps 1 to 4
//! and weights class k by the fraction of an equal starting split that ends
//! up inside it:
//!
//! ```text
//! w_k = (|C_k| + Σ_{i transient} P(i is absorbed into C_k)) / N
//! ```
//!
//! This is the limit of the damped solution as α → 1. Transient states get 0.
//! [`StationaryDistribution::is_unique`] reports that other stationary
//! distributions exist.

use nalgebra::{Complex, DMatrix, DVector, Schur};

use crate::classes::ChainClasses;
use crate::config::{EquityConfig, EIGEN_TOLERANCE};
use crate::error::{EquityError, Result};

/// Shares at or above this negative value are rounding noise and clamp to 0.
pub const NEGATIVE_SHARE_TOLERANCE: f64 = 1e-9;

/// Smallest eigenvector component sum that can be normalised.
const MIN_MASS: f64 = 1e-12;

/// Result of a stationary-distribution solve.
#[derive(Clone, Debug, PartialEq)]
pub struct StationaryDistribution {
    /// Probability of each state: non-negative, summing to 1.
    pub shares: DVector<f64>,
    /// Eigenvalue of the whole matrix nearest 1.
    pub eigenvalue: Complex<f64>,
    /// `|eigenvalue − 1|`.
    pub distance: f64,
    /// Number of closed classes, i.e. the multiplicity of eigenvalue 1.
    pub multiplicity: usize,
    /// `‖Mᵀp − p‖∞` for the returned distribution.
    pub residual: f64,
}

impl StationaryDistribution {
    /// Shares as a slice, one per state.
    pub fn shares(&self) -> &[f64] {
        self.shares.as_slice()
    }

    /// False when eigenvalue 1 is repeated and other distributions are stationary too.
    pub fn is_unique(&self) -> bool {
        self.multiplicity <= 1
    }
}

/// Dense eigen-decomposition solver for the stationary distribution.
#[derive(Clone, Debug)]
pub struct StationarySolver {
    /// Largest accepted `|λ − 1|` (default: 1e-8).
    pub tolerance: f64,
    /// Iteration cap passed to the Schur and SVD routines (default: 10 000).
    pub max_iterations: usize,
}

impl Default for StationarySolver {
    fn default() -> Self {
        Self {
            tolerance: EIGEN_TOLERANCE,
            max_iterations: 10_000,
        }
    }
}

impl StationarySolver {
    /// Create a solver with the given tolerance and iteration cap.
    pub fn new(tolerance: f64, max_iterations: usize) -> Self {
        Self {
            tolerance,
            max_iterations,
        }
    }

    /// Solver settings taken from a run configuration.
    pub fn from_config(config: &EquityConfig) -> Self {
        Self::new(config.eigen_tolerance, config.max_iterations)
    }

    /// Stationary distribution of the row-stochastic matrix `m`.
    pub fn solve(&self, m: &DMatrix<f64>) -> Result<StationaryDistribution> {
        let n = m.nrows();
        if n == 0 || !m.is_square() {
            return Err(EquityError::ZeroMass);
        }
        let mt = m.transpose();
        let (eigenvalue, distance) = self.unit_eigenvalue(&mt)?;

        let classes = ChainClasses::of(m);
        let multiplicity = classes.len();
        tracing::debug!(
            re = eigenvalue.re,
            im = eigenvalue.im,
            distance,
            multiplicity,
            transient = classes.transient.len(),
            "eigenvalue nearest 1"
        );

        let raw = if multiplicity > 1 {
            tracing::warn!(
                multiplicity,
                "preference graph is disconnected; eigenvalue 1 is repeated and the \
                 stationary distribution is not unique (use damping below 1.0)"
            );
            self.combine_classes(m, &classes)?
        } else {
            self.null_vector(&mt, eigenvalue.re)?
        };
        let shares = clamp_rounding_noise(raw)?;
        let residual = (&mt * &shares - &shares).amax();

        Ok(StationaryDistribution {
            shares,
            eigenvalue,
            distance,
            multiplicity,
            residual,
        })
    }

    /// Eigenvalue of `mt` nearest 1, failing when it is beyond tolerance.
    fn unit_eigenvalue(&self, mt: &DMatrix<f64>) -> Result<(Complex<f64>, f64)> {
        let schur = Schur::try_new(mt.clone(), f64::EPSILON, self.max_iterations)
            .ok_or(EquityError::SolverDiverged { stage: "Schur" })?;
        let one = Complex::new(1.0, 0.0);
        let (eigenvalue, distance) = schur
            .complex_eigenvalues()
            .iter()
            .map(|&lambda| (lambda, (lambda - one).norm()))
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .ok_or(EquityError::ZeroMass)?;

        if distance > self.tolerance {
            return Err(EquityError::NotMarkovian {
                eigenvalue,
                distance,
            });
        }
        Ok((eigenvalue, distance))
    }

    /// Null vector of `mt − shift·I`, scaled to sum to 1.
    fn null_vector(&self, mt: &DMatrix<f64>, shift: f64) -> Result<DVector<f64>> {
        let n = mt.nrows();
        let shifted = mt - DMatrix::<f64>::identity(n, n) * shift;
        let svd = shifted
            .try_svd(false, true, f64::EPSILON, self.max_iterations)
            .ok_or(EquityError::SolverDiverged { stage: "SVD" })?;
        let v_t = svd.v_t.ok_or(EquityError::SolverDiverged { stage: "SVD" })?;
        let null_index = svd
            .singular_values
            .iter()
            .enumerate()
            .min_by(|a, b| a.1.total_cmp(b.1))
            .map(|(k, _)| k)
            .ok_or(EquityError::ZeroMass)?;

        let v: DVector<f64> = v_t.row(null_index).transpose();
        let mass = v.sum();
        if mass.abs() <= MIN_MASS {
            return Err(EquityError::ZeroMass);
        }
        Ok(v / mass)
    }

    /// Solve every closed class on its own block and weight the results.
    fn combine_classes(&self, m: &DMatrix<f64>, classes: &ChainClasses) -> Result<DVector<f64>> {
        let weights = absorption_weights(m, classes)?;
        let mut shares = DVector::<f64>::zeros(m.nrows());
        for (class, weight) in classes.closed.iter().zip(weights) {
            let block = m.select_rows(class).select_columns(class).transpose();
            let (eigenvalue, _) = self.unit_eigenvalue(&block)?;
            let local = self.null_vector(&block, eigenvalue.re)?;
            for (&state, share) in class.iter().zip(local.iter()) {
                shares[state] = weight * share;
            }
            tracing::debug!(size = class.len(), weight, "closed class");
        }
        Ok(shares)
    }
}

/// Fraction of an equal starting split that ends up in each closed class.
fn absorption_weights(m: &DMatrix<f64>, classes: &ChainClasses) -> Result<Vec<f64>> {
    let n = m.nrows() as f64;
    let mut weights: Vec<f64> = classes.closed.iter().map(|c| c.len() as f64).collect();

    let transient = &classes.transient;
    if !transient.is_empty() {
        // (I − Q)·X = R, Q transient → transient, R transient → class
        let t = transient.len();
        let q = m.select_rows(transient).select_columns(transient);
        let r = DMatrix::from_fn(t, classes.len(), |i, k| {
            classes.closed[k]
                .iter()
                .map(|&j| m[(transient[i], j)])
                .sum::<f64>()
        });
        let absorbed = (DMatrix::<f64>::identity(t, t) - q)
            .lu()
            .solve(&r)
            .ok_or(EquityError::SolverDiverged {
                stage: "absorption",
            })?;
        for (k, weight) in weights.iter_mut().enumerate() {
            *weight += absorbed.column(k).sum();
        }
    }
    Ok(weights.into_iter().map(|w| w / n).collect())
}

/// Zero out rounding noise below 0 and rescale to sum 1.
///
/// Fails with [`EquityError::NegativeShare`] on anything more negative than
/// [`NEGATIVE_SHARE_TOLERANCE`].
fn clamp_rounding_noise(mut shares: DVector<f64>) -> Result<DVector<f64>> {
    if let Some((state, &value)) = shares
        .iter()
        .enumerate()
        .min_by(|a, b| a.1.total_cmp(b.1))
    {
        if value < -NEGATIVE_SHARE_TOLERANCE {
            return Err(EquityError::NegativeShare { state, value });
        }
    }
    // `<=` also catches -0.0
    shares.apply(|s| {
        if *s <= 0.0 {
            *s = 0.0;
        }
    });
    let mass = shares.sum();
    if mass <= MIN_MASS {
        return Err(EquityError::ZeroMass);
    }
    Ok(shares / mass)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn solve(rows: usize, data: &[f64]) -> StationaryDistribution {
        let m = DMatrix::from_row_slice(rows, rows, data);
        StationarySolver::default().solve(&m).unwrap()
    }

    fn assert_close(actual: &[f64], expected: &[f64], tol: f64) {
        assert_eq!(actual.len(), expected.len());
        for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
            assert!((a - e).abs() < tol, "entry {i}: {a} != {e}");
        }
    }

    #[test]
    fn three_cycle_is_uniform() {
        let d = solve(3, &[0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0]);
        let third = 1.0 / 3.0;
        assert_close(d.shares(), &[third, third, third], 1e-9);
        assert!(d.is_unique());
        assert!(d.distance <= 1e-8);
    }

    #[test]
    fn swap_chain_has_half_half() {
        let d = solve(2, &[0.0, 1.0, 1.0, 0.0]);
        assert_close(d.shares(), &[0.5, 0.5], 1e-9);
    }

    #[test]
    fn three_founders_closed_form() {
        // self-votes already stripped from
        // [0.5 0.3 0.2; 0.2 0.6 0.2; 0.4 0.4 0.2]
        let d = solve(3, &[0.0, 0.6, 0.4, 0.5, 0.0, 0.5, 0.5, 0.5, 0.0]);
        assert_close(d.shares(), &[1.0 / 3.0, 16.0 / 45.0, 14.0 / 45.0], 1e-9);
        assert!(d.residual < 1e-9);
    }

    #[test]
    fn transient_state_gets_nothing() {
        // a feeds b, b and c trade with each other
        let d = solve(3, &[0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 1.0, 0.0]);
        assert_close(d.shares(), &[0.0, 0.5, 0.5], 1e-9);
    }

    #[test]
    fn substochastic_matrix_is_not_markovian() {
        let m = DMatrix::from_row_slice(2, 2, &[0.5, 0.0, 0.0, 0.5]);
        let err = StationarySolver::default().solve(&m).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvariantViolation);
        match err {
            EquityError::NotMarkovian { distance, .. } => assert!((distance - 0.5).abs() < 1e-12),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn disconnected_chain_weights_classes_by_size() {
        // {a, b, c} cycle with an extra a ← c edge, {d, e} swap
        let d = solve(
            5,
            &[
                0.0, 1.0, 0.0, 0.0, 0.0, //
                0.0, 0.0, 1.0, 0.0, 0.0, //
                0.5, 0.5, 0.0, 0.0, 0.0, //
                0.0, 0.0, 0.0, 0.0, 1.0, //
                0.0, 0.0, 0.0, 1.0, 0.0,
            ],
        );
        assert_eq!(d.multiplicity, 2);
        assert!(!d.is_unique());
        assert_close(d.shares(), &[0.12, 0.24, 0.24, 0.2, 0.2], 1e-9);
        assert!(d.residual < 1e-9);
    }

    #[test]
    fn three_uneven_islands_stay_non_negative() {
        // groups {0, 4, 7}, {1, 3, 5, 8}, {2, 6}; dense random-ish votes inside each
        let mut m = DMatrix::<f64>::zeros(9, 9);
        let groups: [&[usize]; 3] = [&[0, 4, 7], &[1, 3, 5, 8], &[2, 6]];
        for (g, group) in groups.iter().enumerate() {
            for (a, &i) in group.iter().enumerate() {
                for (b, &j) in group.iter().enumerate() {
                    if i != j {
                        m[(i, j)] = 1.0 + ((3 * a + 5 * b + 7 * g) % 11) as f64;
                    }
                }
            }
        }
        for mut row in m.row_iter_mut() {
            let total = row.sum();
            row /= total;
        }

        let d = StationarySolver::default().solve(&m).unwrap();
        assert_eq!(d.multiplicity, 3);
        assert!(d.shares().iter().all(|&s| s >= 0.0), "{:?}", d.shares());
        assert!((d.shares().iter().sum::<f64>() - 1.0).abs() < 1e-12);
        assert!(d.residual < 1e-9);
        for group in groups {
            let mass: f64 = group.iter().map(|&i| d.shares[i]).sum();
            assert!((mass - group.len() as f64 / 9.0).abs() < 1e-9, "{group:?}: {mass}");
        }
    }

    #[test]
    fn transient_voter_splits_their_weight_between_islands() {
        // {a, b} swap, {c, d, e} cycle, f gives a 25% and c 75%
        let d = solve(
            6,
            &[
                0.0, 1.0, 0.0, 0.0, 0.0, 0.0, //
                1.0, 0.0, 0.0, 0.0, 0.0, 0.0, //
                0.0, 0.0, 0.0, 1.0, 0.0, 0.0, //
                0.0, 0.0, 0.0, 0.0, 1.0, 0.0, //
                0.0, 0.0, 1.0, 0.0, 0.0, 0.0, //
                0.25, 0.0, 0.75, 0.0, 0.0, 0.0,
            ],
        );
        let c = 0.625 / 3.0;
        assert_close(d.shares(), &[0.1875, 0.1875, c, c, c, 0.0], 1e-9);
        assert_eq!(d.shares[5], 0.0);
        assert!(d.shares[5].is_sign_positive());
    }

    #[test]
    fn nearly_decoupled_chain_is_still_unique() {
        // second eigenvalue at 1 − 5e-7
        let eps = 2.5e-7;
        let d = solve(2, &[1.0 - eps, eps, eps, 1.0 - eps]);
        assert_eq!(d.multiplicity, 1);
        assert!(d.is_unique());
        assert_close(d.shares(), &[0.5, 0.5], 1e-6);
    }

    #[test]
    fn rounding_noise_is_clamped_to_positive_zero() {
        let shares = DVector::from_vec(vec![-0.0, -1e-17, 0.5, 0.5]);
        let clamped = clamp_rounding_noise(shares).unwrap();
        assert_eq!(clamped.as_slice(), &[0.0, 0.0, 0.5, 0.5]);
        assert!(clamped.iter().all(|s| s.is_sign_positive()));
    }

    #[test]
    fn clearly_negative_share_is_an_invariant_violation() {
        let shares = DVector::from_vec(vec![0.6, 0.5, -0.1]);
        let err = clamp_rounding_noise(shares).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvariantViolation);
        match err {
            EquityError::NegativeShare { state, value } => {
                assert_eq!(state, 2);
                assert_eq!(value, -0.1);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn empty_matrix_is_rejected() {
        let m = DMatrix::<f64>::zeros(0, 0);
        assert!(StationarySolver::default().solve(&m).is_err());
    }
}
