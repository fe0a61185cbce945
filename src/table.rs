//! Votes table loader.
//!
//! The input is a delimited text table (tab-separated by default):
//!
//! ```text
//! alice   bob     carol
//! 0.5     0.3     0.2
//! 0.2     0.6     0.2
//! 0.4     0.4     0.2
//! ```
//!
//! The header names the N participants in any order. Data row `i` is the
//! allocation of the participant named in header column `i`, one field per
//! header column. Blank lines and lines starting with `#` are skipped, fields
//! are trimmed, and CRLF endings are accepted.
//!
//! A loaded [`VoteTable`] is always in lexicographic name order: rows and
//! columns are permuted together so `votes[(i, j)]` is what
//! `participants[i]` allocated to `participants[j]`.

use std::fs;
use std::path::Path;

use hashbrown::HashMap;
use nalgebra::{DMatrix, DVector};

use crate::error::{EquityError, Result};

/// Participant names and the raw preference matrix M₀, in sorted name order.
#[derive(Clone, Debug, PartialEq)]
pub struct VoteTable {
    participants: Vec<String>,
    votes: DMatrix<f64>,
}

impl VoteTable {
    /// Read and parse a votes file.
    pub fn from_path(path: impl AsRef<Path>, delimiter: char) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| EquityError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let table = Self::parse(&text, delimiter)?;
        tracing::debug!(
            path = %path.display(),
            participants = table.len(),
            "loaded votes table"
        );
        Ok(table)
    }

    /// Parse a votes table from text.
    pub fn parse(text: &str, delimiter: char) -> Result<Self> {
        let mut lines = text
            .lines()
            .enumerate()
            .map(|(i, line)| (i + 1, line.trim_end_matches('\r')))
            .filter(|(_, line)| {
                let t = line.trim();
                !t.is_empty() && !t.starts_with('#')
            });

        let (header_line, header) = lines
            .next()
            .ok_or_else(|| EquityError::parse(0, "input is empty; expected a header row"))?;
        let names: Vec<String> = header
            .split(delimiter)
            .map(|name| name.trim().to_owned())
            .collect();
        check_names(&names, header_line)?;

        let n = names.len();
        let mut rows = Vec::with_capacity(n);
        for (line_no, line) in lines {
            if rows.len() == n {
                return Err(EquityError::parse(
                    line_no,
                    format!("expected exactly {n} data rows after the header"),
                ));
            }
            rows.push(parse_row(line, delimiter, n, line_no)?);
        }
        if rows.len() != n {
            return Err(EquityError::parse(
                0,
                format!("expected {n} data rows, found {}", rows.len()),
            ));
        }

        Ok(Self::assemble(names, rows))
    }

    /// Build a table from names and rows given in the same (arbitrary) order.
    ///
    /// Applies the same shape, uniqueness and finiteness checks as [`Self::parse`].
    pub fn from_rows(names: Vec<String>, rows: Vec<Vec<f64>>) -> Result<Self> {
        check_names(&names, 0)?;
        let n = names.len();
        if rows.len() != n {
            return Err(EquityError::parse(
                0,
                format!("expected {n} rows, found {}", rows.len()),
            ));
        }
        for (i, row) in rows.iter().enumerate() {
            if row.len() != n {
                return Err(EquityError::parse(
                    0,
                    format!("row for {} has {} fields, expected {n}", names[i], row.len()),
                ));
            }
            if let Some(v) = row.iter().find(|v| !v.is_finite()) {
                return Err(EquityError::parse(
                    0,
                    format!("row for {} contains non-finite value {v}", names[i]),
                ));
            }
        }
        Ok(Self::assemble(names, rows))
    }

    /// Sort names and permute rows and columns to match.
    fn assemble(names: Vec<String>, rows: Vec<Vec<f64>>) -> Self {
        let n = names.len();
        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&a, &b| names[a].cmp(&names[b]));

        let votes = DMatrix::from_fn(n, n, |i, j| rows[order[i]][order[j]]);
        let participants = order.iter().map(|&k| names[k].clone()).collect();
        Self {
            participants,
            votes,
        }
    }

    /// Participant names in sorted order.
    pub fn participants(&self) -> &[String] {
        &self.participants
    }

    /// Raw preference matrix M₀.
    pub fn votes(&self) -> &DMatrix<f64> {
        &self.votes
    }

    /// Number of participants.
    pub fn len(&self) -> usize {
        self.participants.len()
    }

    /// Always `false` for a parsed table.
    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    /// Diagonal of M₀: the share each participant asked for themselves.
    pub fn self_votes(&self) -> DVector<f64> {
        self.votes.diagonal()
    }

    /// Position of `name` in the sorted participant list.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.participants
            .binary_search_by(|p| p.as_str().cmp(name))
            .ok()
    }
}

fn check_names(names: &[String], line: usize) -> Result<()> {
    if names.is_empty() {
        return Err(EquityError::parse(line, "header names no participants"));
    }
    let mut seen: HashMap<&str, usize> = HashMap::with_capacity(names.len());
    for (col, name) in names.iter().enumerate() {
        if name.is_empty() {
            return Err(EquityError::parse(
                line,
                format!("column {} has an empty participant name", col + 1),
            ));
        }
        if let Some(first) = seen.insert(name.as_str(), col) {
            return Err(EquityError::parse(
                line,
                format!(
                    "participant {name:?} appears in columns {} and {}",
                    first + 1,
                    col + 1
                ),
            ));
        }
    }
    Ok(())
}

fn parse_row(line: &str, delimiter: char, n: usize, line_no: usize) -> Result<Vec<f64>> {
    let fields: Vec<&str> = line.split(delimiter).map(str::trim).collect();
    if fields.len() != n {
        return Err(EquityError::parse(
            line_no,
            format!("expected {n} fields, found {}", fields.len()),
        ));
    }
    fields
        .iter()
        .enumerate()
        .map(|(col, field)| match field.parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(v),
            Ok(v) => Err(EquityError::parse(
                line_no,
                format!("field {} is not a finite number: {v}", col + 1),
            )),
            Err(_) if field.is_empty() => Err(EquityError::parse(
                line_no,
                format!("field {} is missing", col + 1),
            )),
            Err(_) => Err(EquityError::parse(
                line_no,
                format!("field {} is not a number: {field:?}", col + 1),
            )),
        })
        .collect()
}
