//! Property tests for the normalizer and the stationary solver.

use eigen_equity::normalize::{is_row_stochastic, normalize_rows};
use eigen_equity::{compute_equity, Damping, EquityConfig, StationarySolver, VoteTable};
use nalgebra::{DMatrix, DVector};
use proptest::prelude::*;

fn names(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("p{i:02}")).collect()
}

/// Strictly positive N×N matrix with rows summing to 1.
fn arb_stochastic() -> impl Strategy<Value = DMatrix<f64>> {
    (2usize..8).prop_flat_map(|n| {
        prop::collection::vec(0.01f64..1.0, n * n).prop_map(move |data| {
            let m = DMatrix::from_row_slice(n, n, &data);
            normalize_rows(&m, &names(n)).unwrap()
        })
    })
}

/// Strictly positive probability vector.
fn arb_distribution() -> impl Strategy<Value = DVector<f64>> {
    prop::collection::vec(0.05f64..1.0, 2..8).prop_map(|v| {
        let total: f64 = v.iter().sum();
        DVector::from_vec(v) / total
    })
}

/// Block-diagonal stochastic matrix: 2 to 4 islands of 2 to 4 states with
/// positive votes inside each island and none across. Returns the island sizes.
fn arb_islands() -> impl Strategy<Value = (DMatrix<f64>, Vec<usize>)> {
    prop::collection::vec(2usize..5, 2..5).prop_flat_map(|sizes| {
        let n: usize = sizes.iter().sum();
        prop::collection::vec(0.01f64..1.0, n * n).prop_map(move |data| {
            let mut m = DMatrix::<f64>::zeros(n, n);
            let mut offset = 0;
            for &size in &sizes {
                for i in offset..offset + size {
                    for j in offset..offset + size {
                        if i != j {
                            m[(i, j)] = data[i * n + j];
                        }
                    }
                }
                offset += size;
            }
            (normalize_rows(&m, &names(n)).unwrap(), sizes.clone())
        })
    })
}

/// Valid votes table: positive off-diagonal allocations, arbitrary self-votes.
fn arb_votes() -> impl Strategy<Value = Vec<Vec<f64>>> {
    (2usize..7).prop_flat_map(|n| {
        prop::collection::vec(prop::collection::vec(0.01f64..1.0, n), n).prop_map(|rows| {
            rows.into_iter()
                .map(|row| {
                    let total: f64 = row.iter().sum();
                    row.into_iter().map(|v| v / total).collect()
                })
                .collect()
        })
    })
}

proptest! {
    #[test]
    fn solver_output_is_a_distribution(m in arb_stochastic()) {
        let d = StationarySolver::default().solve(&m).unwrap();
        let total: f64 = d.shares().iter().sum();
        prop_assert!((total - 1.0).abs() < 1e-6, "sum {}", total);
        for &s in d.shares() {
            prop_assert!(s >= 0.0, "negative share {}", s);
        }
        prop_assert!(d.is_unique());
        prop_assert!(d.residual < 1e-6, "residual {}", d.residual);
    }

    #[test]
    fn disconnected_islands_yield_a_distribution((m, sizes) in arb_islands()) {
        let d = StationarySolver::default().solve(&m).unwrap();
        prop_assert_eq!(d.multiplicity, sizes.len());
        prop_assert!(!d.is_unique());
        prop_assert!(d.shares().iter().all(|&s| s >= 0.0), "{:?}", d.shares());
        let total: f64 = d.shares().iter().sum();
        prop_assert!((total - 1.0).abs() < 1e-9, "sum {}", total);
        prop_assert!(d.residual < 1e-6, "residual {}", d.residual);

        let n = m.nrows() as f64;
        let mut offset = 0;
        for &size in &sizes {
            let mass: f64 = d.shares()[offset..offset + size].iter().sum();
            prop_assert!((mass - size as f64 / n).abs() < 1e-9, "island mass {}", mass);
            offset += size;
        }
    }

    #[test]
    fn known_stationary_vector_is_recovered(p in arb_distribution(), beta in 0.0f64..0.9) {
        // M = βI + (1 − β)·1pᵀ satisfies pᵀM = pᵀ
        let n = p.len();
        let ones = DVector::<f64>::from_element(n, 1.0);
        let m = DMatrix::<f64>::identity(n, n) * beta + (ones * p.transpose()) * (1.0 - beta);
        let d = StationarySolver::default().solve(&m).unwrap();
        for (got, want) in d.shares().iter().zip(p.iter()) {
            prop_assert!((got - want).abs() < 1e-6, "{} vs {}", got, want);
        }
    }

    #[test]
    fn normalizing_stochastic_rows_is_idempotent(m in arb_stochastic()) {
        let again = normalize_rows(&m, &names(m.nrows())).unwrap();
        for (a, b) in m.iter().zip(again.iter()) {
            prop_assert!((a - b).abs() < 1e-12);
        }
        prop_assert!(is_row_stochastic(&again, 1e-12));
    }

    #[test]
    fn pipeline_yields_a_distribution(rows in arb_votes(), alpha in 0.0f64..=1.0) {
        let n = rows.len();
        let table = VoteTable::from_rows(names(n), rows).unwrap();
        let config = EquityConfig::with_damping(Damping::new(alpha).unwrap());
        let report = compute_equity(&table, &config).unwrap();
        let total: f64 = report.shares().iter().sum();
        prop_assert!((total - 1.0).abs() < 1e-6);
        prop_assert!(report.shares().iter().all(|&s| s >= 0.0));
        prop_assert_eq!(report.allocations.len(), n);
    }
}
