//! Batch processing of report files into one combined result set.

use crate::error::{ReportError, Result};
use crate::loader::{LoadOptions, is_supported, load_rows_with};
use crate::parser::parse;
use crate::record::Record;
use crate::result_set::ResultSet;
use log::{debug, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// Load and scan a single report file.
pub fn parse_file(filepath: impl AsRef<Path>, options: &LoadOptions) -> Result<Vec<Record>> {
    let rows = load_rows_with(filepath, options)?;
    Ok(parse(&rows))
}

/// Aggregate reports with the default load options.
pub fn aggregate<P: AsRef<Path>>(paths: &[P]) -> ResultSet {
    aggregate_with(paths, &LoadOptions::default())
}

/// Parse every supported file in `paths` and concatenate the results.
///
/// Records are tagged with their file name and kept in input order. Files
/// with an unsupported extension, files that cannot be read and files that
/// yield no records contribute nothing; the result is empty (never an
/// error) when no file produced a record.
pub fn aggregate_with<P: AsRef<Path>>(paths: &[P], options: &LoadOptions) -> ResultSet {
    let named: Vec<(&Path, String)> = paths
        .iter()
        .map(|path| (path.as_ref(), source_name(path.as_ref())))
        .collect();
    aggregate_named(&named, options)
}

/// Same as [`aggregate_with`], with an explicit `Source_File` tag per file.
pub fn aggregate_named<P: AsRef<Path>>(files: &[(P, String)], options: &LoadOptions) -> ResultSet {
    let mut results = ResultSet::new();

    for (path, name) in files {
        let path = path.as_ref();
        if !is_supported(path) {
            debug!("Ignoring unsupported file {}", path.display());
            continue;
        }

        let records = match parse_file(path, options) {
            Ok(records) => records,
            Err(e) => {
                warn!("Skipping {}: {}", name, e);
                continue;
            }
        };

        if records.is_empty() {
            debug!("No records found in {}", name);
            continue;
        }

        debug!("{} records from {}", records.len(), name);
        results.extend_from_file(name, records);
    }

    results
}

/// Aggregate every report stored directly in `dir`.
pub fn aggregate_dir(dir: impl AsRef<Path>) -> Result<ResultSet> {
    aggregate_dir_with(dir, &LoadOptions::default())
}

/// Aggregate the files of a directory, ordered by file name.
///
/// Only a failure to list the directory itself is an error.
pub fn aggregate_dir_with(dir: impl AsRef<Path>, options: &LoadOptions) -> Result<ResultSet> {
    let dir = dir.as_ref();
    let entries = fs::read_dir(dir).map_err(|source| ReportError::ReadDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect();
    files.sort_by_key(|path| source_name(path));

    Ok(aggregate_with(&files, options))
}

/// Name used for the `Source_File` tag: the final path component.
fn source_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
