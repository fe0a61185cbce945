//! # eigen-equity
//!
//! EigenEquity: a consensus equity split among N collaborators, computed from
//! what each of them thinks everyone else deserves.
//!
//! ---
//!
//! ## Equity is earned from others, not self-assigned.
//!
//! Every participant hands out 100% across the team. Those allocations form a
//! row-stochastic matrix, i.e. a Markov chain over participants: "a unit of
//! credit sitting with Alice moves to Bob with the probability Alice says Bob
//! deserves". The long-run share of credit each participant holds is the
//! stationary distribution of that chain, the same eigenvector PageRank uses
//! to rank web pages by their links.
//!
//! Self-votes are dropped before anything else, and each voter's remaining
//! allocations are rescaled to keep their proportions. An optional damping
//! coefficient α mixes in a uniform allocation so the result is unique even
//! for fragmented teams.
//!
//! ---
//!
//! ## The pipeline
//!
//! ```text
//! votes.tsv → VoteTable → validate → adjust(α) → StationarySolver → EquityReport
//!               (M₀)        ΣM₀=1      M            pᵀM = pᵀ          share / wanted
//! ```
//!
//! ## Module overview
//!
//! | Module | Key types | What it does |
//! |--------|-----------|--------------|
//! | [`table`] | [`VoteTable`] | Parse the delimited votes table; sort names, permute the matrix |
//! | [`validate`] | [`validate_allocations`] | Every row must sum to 1, no negative votes |
//! | [`normalize`] | [`normalize::adjust`] | Strip self-votes, renormalise, mix with uniform |
//! | [`solver`] | [`StationarySolver`], [`StationaryDistribution`] | Eigenpair nearest 1 via dense decomposition |
//! | [`classes`] | [`ChainClasses`] | Closed classes and transient states of the chain |
//! | [`report`] | [`EquityReport`], [`Allocation`] | Share and wanted share per participant |
//! | [`config`] | [`Damping`], [`EquityConfig`] | α, tolerances, delimiter |
//! | [`error`] | [`EquityError`], [`ErrorKind`] | Error taxonomy and exit codes |
//!
//! ## Example
//!
//! ```rust
//! use eigen_equity::{compute_equity, EquityConfig, VoteTable};
//!
//! let table = VoteTable::parse("a\tb\tc\n0\t1\t0\n0\t0\t1\n1\t0\t0\n", '\t').unwrap();
//! let report = compute_equity(&table, &EquityConfig::default()).unwrap();
//! for allocation in &report.allocations {
//!     assert!((allocation.share - 1.0 / 3.0).abs() < 1e-9);
//! }
//! ```
//!
//! ## Features
//!
//! - `serde`: `Serialize` for [`EquityReport`]; JSON output in the CLI.
//! - `python-ffi`: PyO3 bindings, built with `maturin develop --features python-ffi`.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod classes;
pub mod config;
pub mod error;
pub mod normalize;
pub mod report;
pub mod solver;
pub mod table;
pub mod validate;

#[cfg(feature = "python-ffi")]
pub mod ffi;

pub use classes::ChainClasses;
pub use config::{Damping, EquityConfig};
pub use error::{EquityError, ErrorKind, Result};
pub use report::{Allocation, EquityReport};
pub use solver::{StationaryDistribution, StationarySolver};
pub use table::VoteTable;
pub use validate::validate_allocations;

/// Run validate → adjust → solve → report on a loaded table.
pub fn compute_equity(table: &VoteTable, config: &EquityConfig) -> Result<EquityReport> {
    validate_allocations(table, config.row_sum_tolerance)?;
    let m = normalize::adjust(table, config.damping)?;
    let distribution = StationarySolver::from_config(config).solve(&m)?;
    tracing::debug!(
        participants = table.len(),
        alpha = config.damping.alpha(),
        residual = distribution.residual,
        unique = distribution.is_unique(),
        "stationary distribution"
    );
    Ok(EquityReport::new(table, config.damping, &distribution))
}

/// Load `path` with the configured delimiter and compute the report.
pub fn compute_equity_from_path(
    path: impl AsRef<std::path::Path>,
    config: &EquityConfig,
) -> Result<EquityReport> {
    let table = VoteTable::from_path(path, config.delimiter)?;
    compute_equity(&table, config)
}
