//! Error types for the reporting pipeline

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Report error type
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Registry error: {0}")]
    Registry(String),

    #[error("Scrape filename '{0}' carries no date stamp")]
    NoDateStamp(PathBuf),

    #[error("No log file matching date '{date}' under {dir}")]
    LogNotFound { date: String, dir: PathBuf },

    #[error("Missing column '{column}' in {path}")]
    MissingColumn { column: String, path: PathBuf },
}

/// Result type alias
pub type Result<T> = std::result::Result<T, ReportError>;
