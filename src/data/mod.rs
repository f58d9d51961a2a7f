//! Typed experiment tables.
//!
//! Every experiment file shares one schema: a subset of the parameters
//! `r`, `l`, `n` plus the measured `win_probability`. Columns are resolved
//! against the header once, at load time, so later stages address values
//! through [`Column`] instead of raw header strings.

pub mod load;
pub mod optimum;
pub mod pivot;
pub mod series;

use std::fmt;

use crate::error::ReportError;

pub use load::load_dataset;
pub use optimum::{Optimum, report_optimum};
pub use pivot::{DuplicatePolicy, PivotGrid, pivot};
pub use series::{Series, group_series};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Column {
    R,
    L,
    N,
    WinProbability,
}

impl Column {
    pub const ALL: [Column; 4] = [Column::R, Column::L, Column::N, Column::WinProbability];

    /// Header name as written by the experiment runner.
    pub fn name(self) -> &'static str {
        match self {
            Column::R => "r",
            Column::L => "l",
            Column::N => "n",
            Column::WinProbability => "win_probability",
        }
    }

    pub fn from_name(name: &str) -> Option<Column> {
        Column::ALL.into_iter().find(|c| c.name() == name)
    }

    /// Human-readable axis description.
    pub fn describe(self) -> &'static str {
        match self {
            Column::R => "r (dummy radius)",
            Column::L => "l (max displacement)",
            Column::N => "n (number of squares)",
            Column::WinProbability => "win probability",
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One row of an experiment table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    pub r: Option<f64>,
    pub l: Option<f64>,
    pub n: Option<f64>,
    pub win_probability: f64,
}

impl Observation {
    pub fn get(&self, column: Column) -> Option<f64> {
        match column {
            Column::R => self.r,
            Column::L => self.l,
            Column::N => self.n,
            Column::WinProbability => Some(self.win_probability),
        }
    }
}

/// Rows loaded verbatim from one source. Immutable after load.
///
/// Every row holds a value for each column listed in `columns`.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    source: String,
    columns: Vec<Column>,
    rows: Vec<Observation>,
}

impl Dataset {
    /// Builds a dataset from rows already in memory.
    ///
    /// Fails with a schema error naming the first column some row has no
    /// value for.
    pub fn from_rows(
        source: impl Into<String>,
        columns: &[Column],
        rows: Vec<Observation>,
    ) -> Result<Self, ReportError> {
        let source = source.into();
        let mut columns: Vec<Column> = columns.to_vec();
        if !columns.contains(&Column::WinProbability) {
            columns.push(Column::WinProbability);
        }
        columns.sort();
        columns.dedup();
        let hole = rows
            .iter()
            .find_map(|row| columns.iter().copied().find(|&c| row.get(c).is_none()));
        if let Some(column) = hole {
            return Err(ReportError::Schema {
                dataset: source,
                column,
                reason: "has a row without a value",
            });
        }
        Ok(Self {
            source,
            columns,
            rows,
        })
    }

    pub(crate) fn from_parts(source: String, columns: Vec<Column>, rows: Vec<Observation>) -> Self {
        Self {
            source,
            columns,
            rows,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn rows(&self) -> &[Observation] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, column: Column) -> bool {
        self.columns.contains(&column)
    }

    /// Values of `column` in row order. Present columns never yield holes.
    pub fn values(&self, column: Column) -> impl Iterator<Item = f64> + '_ {
        self.rows.iter().filter_map(move |row| row.get(column))
    }
}
