//! Source status classification.

use std::fmt;

/// Severity that marks a source broken on sight.
pub const CRITICAL_SEVERITY: &str = "CRITICAL";

/// Health of one event source for a scrape run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Critical error, or errors with nothing scraped.
    Broken,
    /// Events scraped, clean log.
    Operational,
    /// Events scraped despite logged errors.
    OperationalWithErrors,
    /// Known source with no events and no errors this run.
    NoEventsFound,
    /// Zero events and zero errors on a merged row. The merge only emits
    /// rows for sources with some activity, so this indicates an
    /// inconsistency in the input tables rather than a healthy state.
    Unknown,
}

impl Status {
    /// Ordered decision table over the merged per-source counts.
    pub fn classify(events: u64, total_errors: u64, critical_errors: u64) -> Self {
        if total_errors >= 1 && critical_errors >= 1 {
            Status::Broken
        } else if total_errors >= 1 && events == 0 {
            Status::Broken
        } else if total_errors == 0 && events >= 1 {
            Status::Operational
        } else if total_errors >= 1 && events >= 1 {
            Status::OperationalWithErrors
        } else {
            Status::Unknown
        }
    }

    /// Label used in the report CSV.
    pub fn label(&self) -> &'static str {
        match self {
            Status::Broken => "Broken",
            Status::Operational => "Operational",
            Status::OperationalWithErrors => "Operational, but with errors",
            Status::NoEventsFound => "Operational, but no events found",
            Status::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
