use std::path::PathBuf;

use thiserror::Error;

use crate::data::Column;

/// Coarse classification of a [`ReportError`], used by callers that only care
/// about which stage of the run went wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    DataSource,
    Schema,
    Render,
    EmptyDataset,
    DuplicateCell,
    Io,
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("cannot read data source {}: {source}", path.display())]
    DataSource {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("malformed row at line {line} of {}: column `{column}` is empty", path.display())]
    MissingValue {
        path: PathBuf,
        line: u64,
        column: Column,
    },

    #[error("{dataset}: column `{column}` {reason}")]
    Schema {
        dataset: String,
        column: Column,
        reason: &'static str,
    },

    #[error("cannot render {figure}: {reason}")]
    Render { figure: String, reason: String },

    #[error("{dataset}: no rows to take an optimum from")]
    EmptyDataset { dataset: String },

    #[error("duplicate cell ({row_key}, {col_key}) while pivoting {dataset}")]
    DuplicateCell {
        dataset: String,
        row_key: f64,
        col_key: f64,
    },

    #[error("cannot write table {}: {source}", path.display())]
    Export {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ReportError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ReportError::DataSource { .. } | ReportError::MissingValue { .. } => {
                ErrorKind::DataSource
            }
            ReportError::Schema { .. } => ErrorKind::Schema,
            ReportError::Render { .. } => ErrorKind::Render,
            ReportError::EmptyDataset { .. } => ErrorKind::EmptyDataset,
            ReportError::DuplicateCell { .. } => ErrorKind::DuplicateCell,
            ReportError::Export { .. } | ReportError::Io(_) => ErrorKind::Io,
        }
    }

    pub(crate) fn missing_column(dataset: &str, column: Column) -> Self {
        ReportError::Schema {
            dataset: dataset.to_string(),
            column,
            reason: "is missing",
        }
    }

    pub(crate) fn render(figure: impl Into<String>, reason: impl ToString) -> Self {
        ReportError::Render {
            figure: figure.into(),
            reason: reason.to_string(),
        }
    }
}
