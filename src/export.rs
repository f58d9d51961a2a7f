use std::path::Path;

use csv::Writer;
use tracing::info;

use crate::data::PivotGrid;
use crate::error::ReportError;
use crate::render::key_label;

/// Writes `grid` as a wide table: one line per row key, one column per
/// column key, empty fields where the grid has no value.
pub fn write_grid_csv(grid: &PivotGrid, path: &Path) -> Result<(), ReportError> {
    let csv_err = |source: csv::Error| ReportError::Export {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut writer = Writer::from_path(path).map_err(csv_err)?;

    let mut header = vec![format!("{}\\{}", grid.row_column(), grid.col_column())];
    header.extend(grid.col_keys().iter().map(|&k| key_label(k)));
    writer.write_record(&header).map_err(csv_err)?;

    for (i, &row_key) in grid.row_keys().iter().enumerate() {
        let mut record = Vec::with_capacity(grid.n_cols() + 1);
        record.push(key_label(row_key));
        for j in 0..grid.n_cols() {
            record.push(grid.get(i, j).map(|v| format!("{v}")).unwrap_or_default());
        }
        writer.write_record(&record).map_err(csv_err)?;
    }
    writer.flush()?;
    info!("grid table written to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Column, Dataset, DuplicatePolicy, Observation, pivot};

    #[test]
    fn writes_wide_table_with_blank_holes() {
        let rows = [(4.0, 0.5, 0.25), (4.0, 1.0, 0.5), (9.0, 0.5, 0.75)]
            .into_iter()
            .map(|(n, l, p)| Observation {
                r: None,
                l: Some(l),
                n: Some(n),
                win_probability: p,
            })
            .collect();
        let ds = Dataset::from_rows("t", &[Column::L, Column::N], rows).unwrap();
        let grid = pivot(
            &ds,
            Column::L,
            Column::N,
            Column::WinProbability,
            DuplicatePolicy::Reject,
        )
        .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grid.csv");
        write_grid_csv(&grid, &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "l\\n,4,9\n0.5,0.25,0.75\n1,0.5,\n");
    }
}
