use std::fmt;

use super::{Column, Dataset, Observation};
use crate::error::ReportError;

/// The best row of a dataset with respect to one column.
#[derive(Debug, Clone, PartialEq)]
pub struct Optimum {
    pub index: usize,
    pub row: Observation,
    pub value_column: Column,
    pub value: f64,
    params: Vec<Column>,
}

impl Optimum {
    /// Parameter values of the winning row, in schema order.
    pub fn params(&self) -> Vec<(Column, f64)> {
        self.params
            .iter()
            .filter_map(|&c| self.row.get(c).map(|v| (c, v)))
            .collect()
    }
}

impl fmt::Display for Optimum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  Maximum {}: {:.3}", self.value_column.describe(), self.value)?;
        let params: Vec<String> = self
            .params()
            .into_iter()
            .map(|(c, v)| format!("{c}={v}"))
            .collect();
        write!(f, "  At {}", params.join(", "))
    }
}

/// Stable argmax of `value` over the rows of `dataset`.
///
/// Ties keep the earliest row. NaN values never win.
pub fn report_optimum(dataset: &Dataset, value: Column) -> Result<Optimum, ReportError> {
    if !dataset.has_column(value) {
        return Err(ReportError::missing_column(dataset.source(), value));
    }
    let mut best: Option<(usize, f64)> = None;
    for (idx, row) in dataset.rows().iter().enumerate() {
        let Some(v) = row.get(value) else { continue };
        if v.is_nan() {
            continue;
        }
        if best.is_none_or(|(_, best_v)| v > best_v) {
            best = Some((idx, v));
        }
    }
    let (index, value_found) = best.ok_or_else(|| ReportError::EmptyDataset {
        dataset: dataset.source().to_string(),
    })?;
    let params = dataset
        .columns()
        .iter()
        .copied()
        .filter(|&c| c != value && c != Column::WinProbability)
        .collect();
    Ok(Optimum {
        index,
        row: dataset.rows()[index],
        value_column: value,
        value: value_found,
        params,
    })
}
