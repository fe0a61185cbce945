//! Python FFI bindings via PyO3.
//!
//! Exposes the equity pipeline to Python with plain lists for names and votes.
//!
//! # Building the Python extension
//!
//! ```bash
//! pip install maturin
//! maturin develop --features python-ffi
//! ```
//!
//! # Usage
//!
//! ```python
//! import eigen_equity
//!
//! names, votes = eigen_equity.load("votes.tsv")
//! for a in eigen_equity.compute(names, votes, alpha=0.85):
//!     print(a.name, a.share, a.wanted)
//! ```

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::config::{Damping, EquityConfig};
use crate::error::EquityError;
use crate::report::Allocation as RustAllocation;
use crate::table::VoteTable;

fn to_py_err(e: EquityError) -> PyErr {
    PyValueError::new_err(e.to_string())
}

// ── Allocation ───────────────────────────────────────────────────────────────

/// One participant's computed share and the share they asked for.
#[pyclass(name = "Allocation")]
#[derive(Clone)]
pub struct PyAllocation {
    inner: RustAllocation,
}

#[pymethods]
impl PyAllocation {
    /// Participant name.
    #[getter]
    pub fn name(&self) -> String {
        self.inner.name.clone()
    }

    /// Computed share in [0.0, 1.0].
    #[getter]
    pub fn share(&self) -> f64 {
        self.inner.share
    }

    /// Self-allocated share from the raw votes, in [0.0, 1.0].
    #[getter]
    pub fn wanted(&self) -> f64 {
        self.inner.wanted
    }

    /// Python repr string.
    pub fn __repr__(&self) -> String {
        format!(
            "Allocation(name={:?}, share={:.4}, wanted={:.4})",
            self.inner.name, self.inner.share, self.inner.wanted
        )
    }
}

// ── Functions ────────────────────────────────────────────────────────────────

/// Compute the equity split.
///
/// Args:
///     names: participant names, in the same order as the rows of `votes`
///     votes: N rows of N allocations, each row summing to 1.0
///     alpha: damping coefficient in [0.0, 1.0] (default 1.0)
///
/// Returns:
///     list of Allocation in sorted name order
///
/// Raises:
///     ValueError: malformed input, rows not summing to 1, degenerate votes
#[pyfunction]
#[pyo3(signature = (names, votes, alpha=1.0))]
pub fn compute(names: Vec<String>, votes: Vec<Vec<f64>>, alpha: f64) -> PyResult<Vec<PyAllocation>> {
    let table = VoteTable::from_rows(names, votes).map_err(to_py_err)?;
    let config = EquityConfig::with_damping(Damping::new(alpha).map_err(to_py_err)?);
    let report = crate::compute_equity(&table, &config).map_err(to_py_err)?;
    Ok(report
        .allocations
        .into_iter()
        .map(|inner| PyAllocation { inner })
        .collect())
}

/// Load a votes table.
///
/// Returns:
///     (names, votes) with names sorted and votes permuted to match
#[pyfunction]
#[pyo3(signature = (path, delimiter='\t'))]
pub fn load(path: &str, delimiter: char) -> PyResult<(Vec<String>, Vec<Vec<f64>>)> {
    let table = VoteTable::from_path(path, delimiter).map_err(to_py_err)?;
    let votes = table
        .votes()
        .row_iter()
        .map(|row| row.iter().copied().collect())
        .collect();
    Ok((table.participants().to_vec(), votes))
}

// ── Module entry point ────────────────────────────────────────────────────────

/// EigenEquity Python bindings.
#[pymodule]
pub fn eigen_equity(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyAllocation>()?;
    m.add_function(wrap_pyfunction!(compute, m)?)?;
    m.add_function(wrap_pyfunction!(load, m)?)?;
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    m.add("PAGERANK_ALPHA", Damping::PAGERANK.alpha())?;
    Ok(())
}
