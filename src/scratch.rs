//! Per-request scratch storage for uploaded reports.

use crate::aggregator::aggregate_named;
use crate::error::Result;
use crate::loader::LoadOptions;
use crate::result_set::ResultSet;
use lazy_static::lazy_static;
use log::{debug, warn};
use regex::Regex;
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

lazy_static! {
    static ref UNSAFE_NAME_CHARS: Regex = Regex::new(r#"[\p{Cc}<>:"/\\|?*]"#).unwrap();
}

const FALLBACK_NAME: &str = "upload";

/// An uploaded file held in memory until it is written to scratch storage
#[derive(Clone, Debug)]
pub struct Upload {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    /// Name the records of this upload are tagged with: the uploaded name
    /// without any directory part, otherwise untouched.
    pub fn source_name(&self) -> String {
        Path::new(&self.name)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| sanitize_file_name(&self.name))
    }
}

/// Reduce an uploaded file name to a safe final path component
///
/// # Examples
/// ```
/// use traffic_dashboard::scratch::sanitize_file_name;
///
/// assert_eq!(sanitize_file_name("../../etc/relatório.xlsx"), "relatório.xlsx");
/// assert_eq!(sanitize_file_name("a|b.xls"), "a_b.xls");
/// assert_eq!(sanitize_file_name(".."), "upload");
/// ```
pub fn sanitize_file_name(name: &str) -> String {
    let base = Path::new(name)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let cleaned = UNSAFE_NAME_CHARS.replace_all(base.trim(), "_").into_owned();

    if cleaned.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        cleaned
    }
}

/// Temporary directory that lives for one processing cycle
///
/// The directory is removed by [`ScratchDir::close`], or on drop if the
/// cycle ends early.
pub struct ScratchDir {
    dir: TempDir,
}

impl ScratchDir {
    pub fn create() -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix("traffic-report-")
            .tempdir()?;
        debug!("Created scratch directory {}", dir.path().display());
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write one upload under its sanitized name. Same-named uploads overwrite.
    pub fn write_upload(&self, upload: &Upload) -> Result<PathBuf> {
        let path = self.dir.path().join(sanitize_file_name(&upload.name));
        std::fs::write(&path, &upload.bytes)?;
        Ok(path)
    }

    /// Remove the directory; a directory that is already gone is not an error.
    pub fn close(self) -> Result<()> {
        match self.dir.close() {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Run one full cycle: scratch dir, write uploads, aggregate, release.
///
/// The scratch directory is released whatever the outcome.
pub fn process_uploads(uploads: &[Upload], options: &LoadOptions) -> Result<ResultSet> {
    let scratch = ScratchDir::create()?;
    let outcome = write_and_aggregate(&scratch, uploads, options);

    if let Err(e) = scratch.close() {
        warn!("Failed to remove scratch directory: {}", e);
    }

    outcome
}

fn write_and_aggregate(
    scratch: &ScratchDir,
    uploads: &[Upload],
    options: &LoadOptions,
) -> Result<ResultSet> {
    // Keyed by stored file name: same-named uploads overwrite, and files are
    // processed in name order
    let mut stored: BTreeMap<PathBuf, String> = BTreeMap::new();
    for upload in uploads {
        let path = scratch.write_upload(upload)?;
        stored.insert(path, upload.source_name());
    }

    let files: Vec<(PathBuf, String)> = stored.into_iter().collect();
    Ok(aggregate_named(&files, options))
}
