//! Equity report: one line per participant.
//!
//! Pairs every participant with the share the stationary distribution gives
//! them and the share they asked for themselves in M₀.
//!
//! Text form:
//!
//! ```text
//! Alpha value of EigenEquity:	1
//! alice should receive:		33.33%		(Wanted 50%)
//! ```
//!
//! With the `serde` feature the report serialises as
//! `{ "alpha": 1.0, "allocations": [{ "name": .., "share": .., "wanted": .. }], "unique": true }`
//! with fractions in `[0, 1]`.

use core::fmt;

use crate::config::Damping;
use crate::solver::StationaryDistribution;
use crate::table::VoteTable;

/// Round a fraction to a percentage with two decimals.
///
/// Never returns `-0.0`, so a zero share prints as `0`.
pub fn percent(fraction: f64) -> f64 {
    (fraction * 100.0 * 100.0).round() / 100.0 + 0.0
}

/// One participant's outcome.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Allocation {
    /// Participant name.
    pub name: String,
    /// Computed equity share in `[0, 1]`.
    pub share: f64,
    /// Share the participant allocated to themselves in the raw votes.
    pub wanted: f64,
}

impl fmt::Display for Allocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} should receive:\t\t{}%\t\t(Wanted {}%)",
            self.name,
            percent(self.share),
            percent(self.wanted)
        )
    }
}

/// Complete result of one equity computation, in sorted participant order.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct EquityReport {
    /// Damping used for the run.
    pub alpha: Damping,
    /// One entry per participant.
    pub allocations: Vec<Allocation>,
    /// False when the preference graph admits several stationary distributions.
    pub unique: bool,
}

impl EquityReport {
    /// Assemble a report from the loaded table and the solver output.
    pub fn new(table: &VoteTable, damping: Damping, distribution: &StationaryDistribution) -> Self {
        let wanted = table.self_votes();
        let allocations = table
            .participants()
            .iter()
            .zip(distribution.shares())
            .zip(wanted.iter())
            .map(|((name, &share), &wanted)| Allocation {
                name: name.clone(),
                share,
                wanted,
            })
            .collect();
        Self {
            alpha: damping,
            allocations,
            unique: distribution.is_unique(),
        }
    }

    /// Allocation of `name`, if present.
    pub fn get(&self, name: &str) -> Option<&Allocation> {
        self.allocations.iter().find(|a| a.name == name)
    }

    /// Shares in participant order.
    pub fn shares(&self) -> Vec<f64> {
        self.allocations.iter().map(|a| a.share).collect()
    }
}

impl fmt::Display for EquityReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Alpha value of EigenEquity:\t{}", self.alpha)?;
        for allocation in &self.allocations {
            writeln!(f, "{allocation}")?;
        }
        Ok(())
    }
}
