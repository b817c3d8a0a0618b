use crate::cell::CellValue;
use crate::error::{ReportError, Result};
use calamine::{Reader, open_workbook_auto};
use log::debug;
use std::path::Path;

/// File extensions accepted as traffic reports (compared case-insensitively)
pub const SUPPORTED_EXTENSIONS: [&str; 2] = ["xls", "xlsx"];

/// Options controlling how a workbook is turned into raw rows
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadOptions {
    /// Leading rows of the used range treated as a title/header and not scanned
    pub header_rows: usize,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self { header_rows: 1 }
    }
}

/// Check whether a path names one of the supported spreadsheet kinds
///
/// # Examples
/// ```
/// use traffic_dashboard::loader::is_supported;
///
/// assert!(is_supported("report.xls"));
/// assert!(is_supported("REPORT.XLSX"));
/// assert!(!is_supported("report.csv"));
/// ```
pub fn is_supported(filepath: impl AsRef<Path>) -> bool {
    extension(filepath.as_ref())
        .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
}

/// Load the raw rows of a report with the default options
///
/// # Arguments
/// * `filepath` - Path to the `.xls` or `.xlsx` report
///
/// # Returns
/// * `Result<Vec<Vec<CellValue>>>` - Rows of the first worksheet, header row excluded
pub fn load_rows(filepath: impl AsRef<Path>) -> Result<Vec<Vec<CellValue>>> {
    load_rows_with(filepath, &LoadOptions::default())
}

/// Detect the file type and load the rows of its first worksheet
///
/// Anything other than `.xls`/`.xlsx` is rejected with
/// [`ReportError::UnsupportedFormat`] before the file is opened.
pub fn load_rows_with(
    filepath: impl AsRef<Path>,
    options: &LoadOptions,
) -> Result<Vec<Vec<CellValue>>> {
    let path = filepath.as_ref();

    match extension(path).as_deref() {
        Some("xls") | Some("xlsx") => from_excel(path, options),
        _ => Err(ReportError::UnsupportedFormat(path.to_path_buf())),
    }
}

/// Read the first worksheet of an Excel workbook (XLS or XLSX)
///
/// Column positions stay absolute: when the used range starts after
/// column A, every row is left-padded with empty cells.
fn from_excel(path: &Path, options: &LoadOptions) -> Result<Vec<Vec<CellValue>>> {
    let workbook_error = |source| ReportError::Workbook {
        path: path.to_path_buf(),
        source,
    };

    let mut workbook = open_workbook_auto(path).map_err(workbook_error)?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ReportError::EmptyWorkbook(path.to_path_buf()))?
        .map_err(workbook_error)?;

    let leading_columns = range.start().map(|(_, col)| col as usize).unwrap_or(0);

    let rows: Vec<Vec<CellValue>> = range
        .rows()
        .skip(options.header_rows)
        .map(|row| {
            let mut cells = vec![CellValue::Empty; leading_columns];
            cells.extend(row.iter().map(CellValue::from));
            cells
        })
        .collect();

    debug!(
        "Loaded {} rows x {} columns from {}",
        rows.len(),
        range.width() + leading_columns,
        path.display()
    );

    Ok(rows)
}
