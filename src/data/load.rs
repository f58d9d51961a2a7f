use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use serde::Deserialize;
use tracing::debug;

use super::{Column, Dataset, Observation};
use crate::error::ReportError;

/// A table row as read, before present columns are checked for holes.
#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(default)]
    r: Option<f64>,
    #[serde(default)]
    l: Option<f64>,
    #[serde(default)]
    n: Option<f64>,
    #[serde(default)]
    win_probability: Option<f64>,
}

impl RawRow {
    fn get(&self, column: Column) -> Option<f64> {
        match column {
            Column::R => self.r,
            Column::L => self.l,
            Column::N => self.n,
            Column::WinProbability => self.win_probability,
        }
    }
}

/// Reads one experiment table.
///
/// `win_probability` is always required in addition to `required`. Known
/// columns beyond that are picked up when the header has them, unknown ones
/// are ignored. The reader lives only for the duration of this call.
pub fn load_dataset(path: &Path, required: &[Column]) -> Result<Dataset, ReportError> {
    let source_err = |source: csv::Error| ReportError::DataSource {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .from_path(path)
        .map_err(source_err)?;
    let headers = reader.headers().map_err(source_err)?.clone();

    let columns: Vec<Column> = Column::ALL
        .into_iter()
        .filter(|c| headers.iter().any(|h| h == c.name()))
        .collect();

    let dataset_name = path.display().to_string();
    let missing = Column::ALL
        .into_iter()
        .filter(|c| *c == Column::WinProbability || required.contains(c))
        .find(|c| !columns.contains(c));
    if let Some(column) = missing {
        return Err(ReportError::missing_column(&dataset_name, column));
    }

    let mut rows = Vec::new();
    let mut record = StringRecord::new();
    while reader.read_record(&mut record).map_err(source_err)? {
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let raw: RawRow = record.deserialize(Some(&headers)).map_err(source_err)?;
        let missing = |column| ReportError::MissingValue {
            path: path.to_path_buf(),
            line,
            column,
        };
        if let Some(column) = columns.iter().copied().find(|&c| raw.get(c).is_none()) {
            return Err(missing(column));
        }
        let win_probability = raw
            .win_probability
            .ok_or_else(|| missing(Column::WinProbability))?;
        rows.push(Observation {
            r: raw.r,
            l: raw.l,
            n: raw.n,
            win_probability,
        });
    }

    debug!(
        "loaded {} rows from {} (columns: {:?})",
        rows.len(),
        dataset_name,
        columns
    );
    Ok(Dataset::from_parts(dataset_name, columns, rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::fs;

    fn write_csv(dir: &tempfile::TempDir, name: &str, body: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn reads_rows_in_file_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(
            &dir,
            "rl.csv",
            "r,l,win_probability\n0.5,1,0.25\n1.5,0.5,0.75\n",
        );
        let ds = load_dataset(&path, &[Column::R, Column::L]).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.rows()[1].r, Some(1.5));
        assert_eq!(ds.rows()[1].win_probability, 0.75);
        assert!(!ds.has_column(Column::N));
    }

    #[test]
    fn tolerates_padding_and_extra_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(
            &dir,
            "rn.csv",
            " r , n , win_probability , seed\n1, 4, 0.1, 7\n",
        );
        let ds = load_dataset(&path, &[Column::R]).unwrap();
        assert!(ds.has_column(Column::N));
        assert_eq!(ds.rows()[0].n, Some(4.0));
    }

    #[test]
    fn missing_file_is_a_data_source_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_dataset(&dir.path().join("absent.csv"), &[]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DataSource);
    }

    #[test]
    fn missing_required_parameter_is_a_schema_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(&dir, "l_only.csv", "l,win_probability\n1,0.5\n");
        match load_dataset(&path, &[Column::R, Column::L]) {
            Err(ReportError::Schema { column, .. }) => assert_eq!(column, Column::R),
            other => panic!("expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn empty_cell_in_present_column_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(&dir, "holes.csv", "r,n,win_probability\n1,4,0.2\n1,,0.3\n");
        match load_dataset(&path, &[Column::R]) {
            Err(ReportError::MissingValue { line, column, .. }) => {
                assert_eq!(line, 3);
                assert_eq!(column, Column::N);
            }
            other => panic!("expected missing value, got {other:?}"),
        }
    }

    #[test]
    fn empty_probability_is_a_missing_value() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(&dir, "no_p.csv", "r,l,win_probability
1,1,0.5
1,2,
");
        match load_dataset(&path, &[Column::R, Column::L]) {
            Err(ReportError::MissingValue { line, column, .. }) => {
                assert_eq!(line, 3);
                assert_eq!(column, Column::WinProbability);
            }
            other => panic!("expected missing value, got {other:?}"),
        }
    }

    #[test]
    fn non_numeric_probability_is_a_data_source_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(&dir, "bad.csv", "r,l,win_probability\n1,1,high\n");
        let err = load_dataset(&path, &[Column::R, Column::L]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DataSource);
    }

    #[test]
    fn header_only_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(&dir, "empty.csv", "r,l,win_probability\n");
        let ds = load_dataset(&path, &[Column::R, Column::L]).unwrap();
        assert!(ds.is_empty());
    }
}
