use std::path::PathBuf;
use thiserror::Error;

/// All errors produced while loading, aggregating and presenting reports.
///
/// Row-level extraction problems are not errors: the parser reports them as
/// [`crate::parser::Skip`] and drops the row.
#[derive(Error, Debug)]
pub enum ReportError {
    /// A workbook could not be opened or its first worksheet read.
    #[error("Failed to open workbook {path}: {source}")]
    Workbook {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },

    /// The workbook contains no worksheet at all.
    #[error("Workbook {0} has no worksheets")]
    EmptyWorkbook(PathBuf),

    /// The file extension is not one of the supported spreadsheet kinds.
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(PathBuf),

    /// A directory of reports could not be listed.
    #[error("Failed to read directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A labels file could not be parsed.
    #[error("Invalid labels file {path}: {source}")]
    Labels {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to render chart: {0}")]
    Chart(String),

    #[error("Failed to export results: {0}")]
    Export(String),

    #[error("Failed to render page: {0}")]
    Template(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ReportError>;
