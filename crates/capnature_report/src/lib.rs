//! Scrape reporting: cross-references one scrape output with its log file
//! and classifies the health of every event source.
//!
//! The pipeline is a single pass: count events per organizer, count log
//! entries per (source, severity), outer-merge the two, classify each row
//! with an ordered decision table, and backfill known sources that
//! produced no activity at all.

mod discovery;
mod error;
mod registry;
mod report;
mod status;

pub use discovery::find_log_file;
pub use error::{ReportError, Result};
pub use registry::SourceRegistry;
pub use report::{ReportTable, ScrapeReport, SourceStatus, LOG_LEVEL_COLUMN, LOG_SOURCE_COLUMN};
pub use status::{Status, CRITICAL_SEVERITY};
