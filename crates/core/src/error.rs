//! Error types for kpidash.

use kpidash_sheet::SheetError;
use thiserror::Error;

/// Result type for kpidash operations.
pub type DashResult<T> = Result<T, DashError>;

/// Errors that can occur while loading dashboard data.
#[derive(Debug, Error)]
pub enum DashError {
    /// The input could not be decoded as an xlsx workbook.
    #[error("could not read workbook: {0}")]
    Workbook(#[from] SheetError),

    /// One of the four required sheets is absent.
    #[error("missing sheet '{sheet}'")]
    MissingSheet { sheet: String },

    /// A required column is absent from a sheet's header row.
    #[error("sheet '{sheet}' is missing column '{column}'")]
    MissingColumn { sheet: String, column: String },

    /// A cell does not hold the expected kind of value.
    #[error("sheet '{sheet}', row {row}, column '{column}': expected {expected}, found '{found}'")]
    InvalidCell {
        sheet: String,
        row: usize,
        column: String,
        expected: &'static str,
        found: String,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DashError {
    /// Create a missing-column error.
    pub fn missing_column(sheet: impl Into<String>, column: impl Into<String>) -> Self {
        Self::MissingColumn {
            sheet: sheet.into(),
            column: column.into(),
        }
    }

    /// Whether this error comes from parsing an input workbook.
    ///
    /// These are the user-correctable failures: re-upload the file or switch
    /// to sample data.
    #[must_use]
    pub fn is_parse_error(&self) -> bool {
        !matches!(self, Self::Io(_))
    }
}
