use std::collections::BTreeMap;

use super::{Column, Dataset};
use crate::error::ReportError;

/// One line of a series comparison chart.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub group_column: Column,
    pub group_value: f64,
    /// `(x, y)` sorted by x; rows sharing an x keep their file order.
    pub points: Vec<(f64, f64)>,
}

impl Series {
    pub fn label(&self) -> String {
        format!("{}={}", self.group_column, self.group_value)
    }
}

/// Splits `dataset` into one series per distinct `group` value, ascending.
pub fn group_series(
    dataset: &Dataset,
    group: Column,
    x: Column,
    y: Column,
) -> Result<Vec<Series>, ReportError> {
    for column in [group, x, y] {
        if !dataset.has_column(column) {
            return Err(ReportError::missing_column(dataset.source(), column));
        }
    }

    // Keyed by bit pattern; ordering is restored with total_cmp below.
    let mut groups: BTreeMap<u64, (f64, Vec<(f64, f64)>)> = BTreeMap::new();
    for row in dataset.rows() {
        let (Some(g), Some(xv), Some(yv)) = (row.get(group), row.get(x), row.get(y)) else {
            continue;
        };
        groups
            .entry(g.to_bits())
            .or_insert_with(|| (g, Vec::new()))
            .1
            .push((xv, yv));
    }

    let mut series: Vec<Series> = groups
        .into_values()
        .map(|(group_value, mut points)| {
            points.sort_by(|a, b| a.0.total_cmp(&b.0));
            Series {
                group_column: group,
                group_value,
                points,
            }
        })
        .collect();
    series.sort_by(|a, b| a.group_value.total_cmp(&b.group_value));
    Ok(series)
}
