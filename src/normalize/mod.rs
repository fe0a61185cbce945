//! Matrix normalizer: raw votes M₀ → stochastic transition matrix M.
//!
//! ```text
//! M₀ ──zero diagonal──▶ ──rownorm──▶ M₁ ──α·M₁ + (1−α)·J/N──▶ M₂ ──rownorm──▶ M
//! ```
//!
//! [`adjust`] runs the four steps in order. The pieces are public so each
//! step can be tested and reused on its own.

pub mod damping;
pub mod rows;
pub mod self_votes;

pub use damping::apply_damping;
pub use rows::{is_row_stochastic, max_row_residual, normalize_rows, MIN_ROW_MASS};
pub use self_votes::strip_self_votes;

use nalgebra::DMatrix;

use crate::config::Damping;
use crate::error::Result;
use crate::table::VoteTable;

/// Build the stochastic matrix M the solver consumes.
///
/// `table` must already have passed [`crate::validate::validate_allocations`].
pub fn adjust(table: &VoteTable, damping: Damping) -> Result<DMatrix<f64>> {
    let participants = table.participants();
    let earned = strip_self_votes(table.votes(), participants)?;
    let m = apply_damping(&earned, damping, participants)?;
    tracing::debug!(
        alpha = damping.alpha(),
        residual = max_row_residual(&m),
        "adjusted transition matrix"
    );
    Ok(m)
}
