//! Error taxonomy for the equity pipeline.
//!
//! Every stage returns [`Result`]. Errors are terminal for a run: the binary
//! prints the message and exits with [`ErrorKind::exit_code`]. Variants are
//! grouped into six kinds so callers can react to the class of failure
//! without matching every variant.
//!
//! | Kind | Variants | Exit status |
//! |------|----------|-------------|
//! | [`ErrorKind::Usage`] | `Usage` | 0 |
//! | [`ErrorKind::Parse`] | `Io`, `Parse` | 255 (−1) |
//! | [`ErrorKind::Validation`] | `RowSums`, `NegativeAllocation` | 254 (−2) |
//! | [`ErrorKind::InvariantViolation`] | `NotMarkovian`, `SolverDiverged`, `ZeroMass`, `NegativeShare`, `Serialize` | 253 (−3) |
//! | [`ErrorKind::DegenerateInput`] | `DegenerateInput` | 252 (−4) |
//! | [`ErrorKind::Config`] | `InvalidDamping` | 251 (−5) |

use std::path::PathBuf;

use nalgebra::Complex;
use thiserror::Error;

/// Result type for equity pipeline operations.
pub type Result<T> = std::result::Result<T, EquityError>;

/// Errors raised by the loader, validator, normalizer and solver.
#[derive(Debug, Error)]
pub enum EquityError {
    /// No votes file was supplied.
    #[error("no votes file given")]
    Usage,

    /// The votes file could not be opened or read.
    #[error("unable to open votes file {}: {source}", .path.display())]
    Io {
        /// Path that failed to open.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The votes table is malformed.
    #[error("unable to parse votes matrix (line {line}): {message}")]
    Parse {
        /// 1-based line number in the input, 0 when the whole input is at fault.
        line: usize,
        /// What was wrong with the line.
        message: String,
    },

    /// At least one row does not allocate exactly 100%.
    #[error(
        "allocations must sum to 100%: row-sum deviation {deviation:.3e} exceeds {tolerance:.0e} (rows: {})",
        .rows.join(", ")
    )]
    RowSums {
        /// L2 norm of the per-row deviation from 1.
        deviation: f64,
        /// Tolerance the deviation was checked against.
        tolerance: f64,
        /// Participants whose rows are individually off.
        rows: Vec<String>,
    },

    /// A participant allocated a negative share to someone.
    #[error("{participant} allocated a negative share ({value}) to {target}")]
    NegativeAllocation {
        /// Voter.
        participant: String,
        /// Recipient of the negative share.
        target: String,
        /// Offending value.
        value: f64,
    },

    /// Damping coefficient outside `[0, 1]`.
    #[error("damping coefficient must lie in [0, 1], got {0}")]
    InvalidDamping(f64),

    /// A row carries no weight once self-votes are removed.
    #[error("{participant} allocated everything to themselves; nothing is left to redistribute")]
    DegenerateInput {
        /// Participant whose row became all-zero.
        participant: String,
    },

    /// No eigenvalue within tolerance of 1; the adjusted matrix is not stochastic.
    #[error(
        "input matrix is not Markovian: eigenvalue nearest 1 is {}{:+}i (distance {distance:.3e})",
        .eigenvalue.re,
        .eigenvalue.im
    )]
    NotMarkovian {
        /// Eigenvalue closest to 1.
        eigenvalue: Complex<f64>,
        /// `|eigenvalue - 1|`.
        distance: f64,
    },

    /// A dense decomposition failed to converge.
    #[error("{stage} decomposition did not converge")]
    SolverDiverged {
        /// Which decomposition gave up.
        stage: &'static str,
    },

    /// The stationary eigenvector sums to zero and cannot be normalised.
    #[error("stationary eigenvector has zero total mass")]
    ZeroMass,

    /// The solved distribution has an entry clearly below zero.
    #[error("stationary distribution has a negative share {value:.3e} at state {state}")]
    NegativeShare {
        /// Index of the offending state.
        state: usize,
        /// Its share.
        value: f64,
    },

    /// The report could not be serialised.
    #[cfg(feature = "serde")]
    #[error("unable to serialise report: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Coarse classification of [`EquityError`] variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// No input given.
    Usage,
    /// Input unreadable or malformed.
    Parse,
    /// Allocations do not form valid rows.
    Validation,
    /// A row vanished after self-vote removal.
    DegenerateInput,
    /// Internal numeric invariant broken.
    InvariantViolation,
    /// Bad configuration value.
    Config,
}

impl ErrorKind {
    /// Process exit status for this class of failure.
    ///
    /// Negative statuses −1 to −5 as the shell sees them; usage is not a failure.
    pub fn exit_code(self) -> u8 {
        match self {
            Self::Usage => 0,
            Self::Parse => 255,
            Self::Validation => 254,
            Self::InvariantViolation => 253,
            Self::DegenerateInput => 252,
            Self::Config => 251,
        }
    }
}

impl EquityError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Usage => ErrorKind::Usage,
            Self::Io { .. } | Self::Parse { .. } => ErrorKind::Parse,
            Self::RowSums { .. } | Self::NegativeAllocation { .. } => ErrorKind::Validation,
            Self::InvalidDamping(_) => ErrorKind::Config,
            Self::DegenerateInput { .. } => ErrorKind::DegenerateInput,
            Self::NotMarkovian { .. }
            | Self::SolverDiverged { .. }
            | Self::ZeroMass
            | Self::NegativeShare { .. } => ErrorKind::InvariantViolation,
            #[cfg(feature = "serde")]
            Self::Serialize(_) => ErrorKind::InvariantViolation,
        }
    }

    /// Shorthand for `self.kind().exit_code()`.
    pub fn exit_code(&self) -> u8 {
        self.kind().exit_code()
    }

    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }
}
