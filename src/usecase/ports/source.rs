use async_trait::async_trait;
use thiserror::Error;

use crate::config::SheetSpec;

/// Header row plus data rows, as read from a sheet. Cells are trimmed text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Cell by position; short rows read as empty.
    pub fn cell<'a>(row: &'a [String], idx: usize) -> &'a str {
        row.get(idx).map(String::as_str).unwrap_or("")
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LoadError {
    #[error("failed to fetch sheet `{sheet}`: {message}")]
    Fetch { sheet: String, message: String },
    #[error("sheet `{sheet}` returned HTTP {status}")]
    HttpStatus { sheet: String, status: u16 },
    #[error("sheet `{sheet}` headers do not match: expected {expected:?}, got {actual:?}")]
    HeaderMismatch {
        sheet: String,
        expected: Vec<String>,
        actual: Vec<String>,
    },
    #[error("sheet `{sheet}` is empty")]
    EmptySheet { sheet: String },
    #[error("failed to parse sheet `{sheet}`: {message}")]
    Parse { sheet: String, message: String },
    #[error("failed to open workbook: {0}")]
    Workbook(String),
    #[error("workbook has no sheet named `{sheet}`")]
    MissingSheet { sheet: String },
}

impl LoadError {
    /// The sheet could not be read at all, as opposed to being malformed.
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            LoadError::Fetch { .. }
                | LoadError::HttpStatus { .. }
                | LoadError::MissingSheet { .. }
                | LoadError::EmptySheet { .. }
        )
    }
}

/// Where the planning sheets come from.
#[async_trait]
pub trait SheetSource: Send + Sync {
    async fn fetch_table(&self, sheet: &SheetSpec) -> Result<RawTable, LoadError>;

    /// Short description for status text and logs.
    fn describe(&self) -> String;
}
