//! Error types for the export pipeline

use std::io;
use thiserror::Error;

/// Export error type
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Upload of '{key}' failed: {source}")]
    Upload {
        key: String,
        #[source]
        source: anyhow::Error,
    },
}

/// Result type alias
pub type Result<T> = std::result::Result<T, ExportError>;
