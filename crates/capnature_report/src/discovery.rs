//! Log-file lookup for a scrape run.
//!
//! A scrape output and its log are paired by the date stamp embedded in
//! their filenames: the trailing substring starting at the first ASCII
//! digit. The contract lives behind this one function so the pairing
//! scheme can later move to an explicit run identifier.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{ReportError, Result};

/// Trailing substring of `name` starting at its first ASCII digit.
pub(crate) fn date_suffix(name: &str) -> Option<&str> {
    name.find(|c: char| c.is_ascii_digit()).map(|i| &name[i..])
}

/// Locate the log CSV whose filename date stamp matches `scrape_file`'s.
pub fn find_log_file(logs_dir: &Path, scrape_file: &Path) -> Result<PathBuf> {
    let base = scrape_file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let wanted = date_suffix(&base)
        .ok_or_else(|| ReportError::NoDateStamp(scrape_file.to_path_buf()))?;

    for entry in fs::read_dir(logs_dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some("csv") {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if date_suffix(&name) == Some(wanted) {
            debug!(log = %path.display(), date = wanted, "Matched log file");
            return Ok(path);
        }
    }

    Err(ReportError::LogNotFound {
        date: wanted.to_string(),
        dir: logs_dir.to_path_buf(),
    })
}
