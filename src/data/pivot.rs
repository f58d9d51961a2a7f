//! Reshaping row-oriented observations into a dense 2D grid.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Column, Dataset};
use crate::error::ReportError;

/// What to do when two rows land on the same (row key, column key) cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicatePolicy {
    #[default]
    Reject,
    FirstWins,
    LastWins,
}

/// Totally ordered wrapper so float keys can index a `BTreeMap`.
#[derive(Debug, Clone, Copy)]
struct AxisKey(f64);

impl PartialEq for AxisKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for AxisKey {}

impl PartialOrd for AxisKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for AxisKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PivotGrid {
    row_column: Column,
    col_column: Column,
    value_column: Column,
    row_keys: Vec<f64>,
    col_keys: Vec<f64>,
    /// Row-major, `row_keys.len() * col_keys.len()` entries.
    cells: Vec<Option<f64>>,
}

impl PivotGrid {
    pub fn row_column(&self) -> Column {
        self.row_column
    }

    pub fn col_column(&self) -> Column {
        self.col_column
    }

    pub fn value_column(&self) -> Column {
        self.value_column
    }

    pub fn row_keys(&self) -> &[f64] {
        &self.row_keys
    }

    pub fn col_keys(&self) -> &[f64] {
        &self.col_keys
    }

    pub fn n_rows(&self) -> usize {
        self.row_keys.len()
    }

    pub fn n_cols(&self) -> usize {
        self.col_keys.len()
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row >= self.n_rows() || col >= self.n_cols() {
            return None;
        }
        self.cells[row * self.n_cols() + col]
    }

    pub fn lookup(&self, row_key: f64, col_key: f64) -> Option<f64> {
        let row = key_index(&self.row_keys, row_key)?;
        let col = key_index(&self.col_keys, col_key)?;
        self.get(row, col)
    }

    /// Present cells as `(row key, column key, value)`, row-major.
    pub fn flatten(&self) -> Vec<(f64, f64, f64)> {
        let mut out = Vec::with_capacity(self.cells.len());
        for (i, &rk) in self.row_keys.iter().enumerate() {
            for (j, &ck) in self.col_keys.iter().enumerate() {
                if let Some(v) = self.get(i, j) {
                    out.push((rk, ck, v));
                }
            }
        }
        out
    }

    /// Grid positions without a value.
    pub fn missing_cells(&self) -> Vec<(usize, usize)> {
        let n_cols = self.n_cols();
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, v)| v.is_none())
            .map(|(idx, _)| (idx / n_cols, idx % n_cols))
            .collect()
    }

    /// `(min, max)` over present finite cells.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.cells
            .iter()
            .flatten()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

fn key_index(keys: &[f64], key: f64) -> Option<usize> {
    keys.binary_search_by(|k| k.total_cmp(&key)).ok()
}

/// Reshapes `dataset` into a grid indexed by `row` and `col` holding `value`.
///
/// Keys are sorted ascending. Combinations absent from the source stay empty.
pub fn pivot(
    dataset: &Dataset,
    row: Column,
    col: Column,
    value: Column,
    policy: DuplicatePolicy,
) -> Result<PivotGrid, ReportError> {
    for column in [row, col, value] {
        if !dataset.has_column(column) {
            return Err(ReportError::missing_column(dataset.source(), column));
        }
    }
    if row == col {
        return Err(ReportError::Schema {
            dataset: dataset.source().to_string(),
            column: row,
            reason: "cannot index both pivot axes",
        });
    }

    let mut entries: BTreeMap<(AxisKey, AxisKey), f64> = BTreeMap::new();
    let mut row_set: BTreeSet<AxisKey> = BTreeSet::new();
    let mut col_set: BTreeSet<AxisKey> = BTreeSet::new();

    for obs in dataset.rows() {
        let (Some(rk), Some(ck), Some(v)) = (obs.get(row), obs.get(col), obs.get(value)) else {
            continue;
        };
        let key = (AxisKey(rk), AxisKey(ck));
        row_set.insert(key.0);
        col_set.insert(key.1);
        match (entries.get(&key), policy) {
            (None, _) | (Some(_), DuplicatePolicy::LastWins) => {
                entries.insert(key, v);
            }
            (Some(_), DuplicatePolicy::FirstWins) => {}
            (Some(_), DuplicatePolicy::Reject) => {
                return Err(ReportError::DuplicateCell {
                    dataset: dataset.source().to_string(),
                    row_key: rk,
                    col_key: ck,
                });
            }
        }
    }

    let row_keys: Vec<f64> = row_set.into_iter().map(|k| k.0).collect();
    let col_keys: Vec<f64> = col_set.into_iter().map(|k| k.0).collect();
    let mut cells = vec![None; row_keys.len() * col_keys.len()];
    for ((rk, ck), v) in entries {
        // Both keys were inserted above, so the lookups cannot miss.
        if let (Some(i), Some(j)) = (key_index(&row_keys, rk.0), key_index(&col_keys, ck.0)) {
            cells[i * col_keys.len() + j] = Some(v);
        }
    }

    debug!(
        "pivoted {} on ({row}, {col}): {}x{} grid",
        dataset.source(),
        row_keys.len(),
        col_keys.len()
    );

    Ok(PivotGrid {
        row_column: row,
        col_column: col,
        value_column: value,
        row_keys,
        col_keys,
        cells,
    })
}
