//! Report assembly: aggregate, merge, classify, backfill, write.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use capnature_export::{date_stamp, ORGANIZER_FIELD};

use crate::discovery::find_log_file;
use crate::error::{ReportError, Result};
use crate::registry::SourceRegistry;
use crate::status::{Status, CRITICAL_SEVERITY};

/// Log column naming the source a message came from.
pub const LOG_SOURCE_COLUMN: &str = "Event Source";

/// Log column carrying the message severity.
pub const LOG_LEVEL_COLUMN: &str = "Level";

/// One report row: the health of a single event source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceStatus {
    pub organizer: String,
    pub events: u64,
    /// Count per severity column of the report, zero-filled.
    pub errors_by_severity: BTreeMap<String, u64>,
    pub total_errors: u64,
    pub status: Status,
}

/// The assembled report before it is written out.
#[derive(Debug, Clone)]
pub struct ReportTable {
    /// Severity columns present in this run's log, sorted.
    pub severities: Vec<String>,
    pub rows: Vec<SourceStatus>,
}

impl ReportTable {
    pub fn row(&self, organizer: &str) -> Option<&SourceStatus> {
        self.rows.iter().find(|row| row.organizer == organizer)
    }
}

/// Builds the per-source health report for one scrape run.
#[derive(Debug)]
pub struct ScrapeReport {
    scrape_file: PathBuf,
    log_file: PathBuf,
    reports_dir: PathBuf,
    registry: SourceRegistry,
}

impl ScrapeReport {
    /// Pair `scrape_file` with its log under `logs_dir`. Fails with
    /// [`ReportError::LogNotFound`] when no log shares its date stamp.
    pub fn new(
        scrape_file: impl Into<PathBuf>,
        logs_dir: &Path,
        reports_dir: impl Into<PathBuf>,
        registry: SourceRegistry,
    ) -> Result<Self> {
        let scrape_file = scrape_file.into();
        let log_file = find_log_file(logs_dir, &scrape_file)?;
        Ok(Self {
            scrape_file,
            log_file,
            reports_dir: reports_dir.into(),
            registry,
        })
    }

    pub fn log_file(&self) -> &Path {
        &self.log_file
    }

    /// Aggregate both tables, outer-merge, classify, and backfill.
    pub fn build(&self) -> Result<ReportTable> {
        let event_counts = count_events(&self.scrape_file)?;
        let error_counts = count_errors(&self.log_file)?;

        let severities: Vec<String> = error_counts
            .values()
            .flat_map(|by_severity| by_severity.keys().cloned())
            .collect::<BTreeSet<String>>()
            .into_iter()
            .collect();

        // Outer merge: a source present in either table gets a row, with
        // the missing side's counts at zero.
        let names: BTreeSet<&String> = event_counts.keys().chain(error_counts.keys()).collect();

        let mut rows = Vec::with_capacity(names.len() + self.registry.len());
        for name in names {
            let events = event_counts.get(name).copied().unwrap_or(0);
            let observed = error_counts.get(name);
            let errors_by_severity: BTreeMap<String, u64> = severities
                .iter()
                .map(|severity| {
                    let count = observed
                        .and_then(|by_severity| by_severity.get(severity))
                        .copied()
                        .unwrap_or(0);
                    (severity.clone(), count)
                })
                .collect();
            let total_errors: u64 = errors_by_severity.values().sum();
            let critical_errors = errors_by_severity
                .get(CRITICAL_SEVERITY)
                .copied()
                .unwrap_or(0);
            let status = Status::classify(events, total_errors, critical_errors);
            if status == Status::Unknown {
                warn!(organizer = %name, "Merged row with no activity; inputs are inconsistent");
            }
            rows.push(SourceStatus {
                organizer: name.clone(),
                events,
                errors_by_severity,
                total_errors,
                status,
            });
        }

        // Every known source appears exactly once: those absent from both
        // tables get a synthetic zero-count row.
        for name in self.registry.names() {
            if rows.iter().any(|row| row.organizer == name) {
                continue;
            }
            rows.push(SourceStatus {
                organizer: name.to_string(),
                events: 0,
                errors_by_severity: severities.iter().map(|s| (s.clone(), 0)).collect(),
                total_errors: 0,
                status: Status::NoEventsFound,
            });
        }

        debug!(rows = rows.len(), severities = severities.len(), "Assembled report table");
        Ok(ReportTable { severities, rows })
    }

    /// Build the report and write it to the dated report file.
    pub fn write(&self) -> Result<PathBuf> {
        let table = self.build()?;

        fs::create_dir_all(&self.reports_dir)?;
        let path = self
            .reports_dir
            .join(format!("scrape-report-{}.csv", date_stamp()));

        let mut writer = csv::Writer::from_path(&path)?;
        let mut header = vec!["Event Organizers", "Number of Events Scraped"];
        header.extend(table.severities.iter().map(String::as_str));
        header.push("Number of Errors");
        header.push("Status");
        writer.write_record(&header)?;

        for row in &table.rows {
            let mut record = vec![row.organizer.clone(), row.events.to_string()];
            record.extend(
                table
                    .severities
                    .iter()
                    .map(|severity| row.errors_by_severity[severity].to_string()),
            );
            record.push(row.total_errors.to_string());
            record.push(row.status.label().to_string());
            writer.write_record(&record)?;
        }
        writer.flush().map_err(ReportError::Io)?;

        info!(path = %path.display(), rows = table.rows.len(), "Wrote scrape report");
        Ok(path)
    }
}

/// Events per organizer in the scrape output. Rows with an empty
/// organizer cell are skipped.
fn count_events(path: &Path) -> Result<BTreeMap<String, u64>> {
    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.clone();
    let organizer_idx = headers
        .iter()
        .position(|header| header == ORGANIZER_FIELD)
        .ok_or_else(|| ReportError::MissingColumn {
            column: ORGANIZER_FIELD.to_string(),
            path: path.to_path_buf(),
        })?;

    let mut counts = BTreeMap::new();
    for record in reader.records() {
        let record = record?;
        let organizer = record.get(organizer_idx).unwrap_or("");
        if organizer.is_empty() {
            continue;
        }
        *counts.entry(organizer.to_string()).or_insert(0) += 1;
    }
    Ok(counts)
}

/// Log entries per (source, severity). An empty log file, or one without
/// the source/level columns, counts as no errors for every source.
fn count_errors(path: &Path) -> Result<BTreeMap<String, BTreeMap<String, u64>>> {
    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.clone();
    let source_idx = headers.iter().position(|header| header == LOG_SOURCE_COLUMN);
    let level_idx = headers.iter().position(|header| header == LOG_LEVEL_COLUMN);

    let (Some(source_idx), Some(level_idx)) = (source_idx, level_idx) else {
        warn!(path = %path.display(), "Log table is empty or unlabeled; assuming zero errors");
        return Ok(BTreeMap::new());
    };

    let mut counts: BTreeMap<String, BTreeMap<String, u64>> = BTreeMap::new();
    for record in reader.records() {
        let record = record?;
        let source = record.get(source_idx).unwrap_or("");
        let level = record.get(level_idx).unwrap_or("");
        if source.is_empty() || level.is_empty() {
            continue;
        }
        *counts
            .entry(source.to_string())
            .or_default()
            .entry(level.to_string())
            .or_insert(0) += 1;
    }
    Ok(counts)
}
