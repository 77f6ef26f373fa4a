//! End-to-end report assembly over real files.

use capnature_report::{ScrapeReport, SourceRegistry, Status};
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

struct Fixture {
    _dir: tempfile::TempDir,
    scrape_file: PathBuf,
    logs_dir: PathBuf,
    reports_dir: PathBuf,
}

fn fixture(scrape_rows: &str, log_rows: &str) -> Fixture {
    let dir = tempdir().unwrap();
    let logs_dir = dir.path().join("logs");
    let reports_dir = dir.path().join("reports");
    fs::create_dir_all(&logs_dir).unwrap();

    let scrape_file = dir.path().join("cap-nature-events-scraped-06-01-2020.csv");
    fs::write(
        &scrape_file,
        format!("Event Name,Event Organizers\n{}", scrape_rows),
    )
    .unwrap();
    fs::write(
        logs_dir.join("scraper-log-06-01-2020.csv"),
        format!("Time,Event Source,Level\n{}", log_rows),
    )
    .unwrap();

    Fixture {
        _dir: dir,
        scrape_file,
        logs_dir,
        reports_dir,
    }
}

#[test]
fn classifies_merged_sources_per_decision_table() {
    // GreenOrg: 3 events, clean log. RiverGroup: no events, one CRITICAL.
    // TrailCrew: 2 events, one WARNING.
    let fx = fixture(
        "A,GreenOrg\nB,GreenOrg\nC,GreenOrg\nD,TrailCrew\nE,TrailCrew\n",
        "09:00,RiverGroup,CRITICAL\n09:05,TrailCrew,WARNING\n",
    );
    let report = ScrapeReport::new(
        &fx.scrape_file,
        &fx.logs_dir,
        &fx.reports_dir,
        SourceRegistry::default(),
    )
    .unwrap();
    let table = report.build().unwrap();

    let green = table.row("GreenOrg").unwrap();
    assert_eq!(green.events, 3);
    assert_eq!(green.total_errors, 0);
    assert_eq!(green.status, Status::Operational);

    let river = table.row("RiverGroup").unwrap();
    assert_eq!(river.events, 0);
    assert_eq!(river.total_errors, 1);
    assert_eq!(river.status, Status::Broken);

    let trail = table.row("TrailCrew").unwrap();
    assert_eq!(trail.events, 2);
    assert_eq!(trail.total_errors, 1);
    assert_eq!(trail.status, Status::OperationalWithErrors);
}

#[test]
fn every_registry_source_appears_exactly_once() {
    let fx = fixture("A,GreenOrg\n", "09:00,RiverGroup,ERROR\n");
    let registry: SourceRegistry = [
        ("green", "GreenOrg"),
        ("quiet", "Quiet Society"),
    ]
    .into_iter()
    .collect();

    let report =
        ScrapeReport::new(&fx.scrape_file, &fx.logs_dir, &fx.reports_dir, registry).unwrap();
    let table = report.build().unwrap();

    for name in ["GreenOrg", "Quiet Society"] {
        let occurrences = table
            .rows
            .iter()
            .filter(|row| row.organizer == name)
            .count();
        assert_eq!(occurrences, 1, "{} should appear exactly once", name);
    }

    let quiet = table.row("Quiet Society").unwrap();
    assert_eq!(quiet.events, 0);
    assert_eq!(quiet.total_errors, 0);
    assert_eq!(quiet.status, Status::NoEventsFound);
}

#[test]
fn empty_log_defaults_every_count_to_zero() {
    let fx = fixture("A,GreenOrg\n", "");
    // Overwrite the log with a fully empty file (not even headers).
    fs::write(fx.logs_dir.join("scraper-log-06-01-2020.csv"), "").unwrap();

    let report = ScrapeReport::new(
        &fx.scrape_file,
        &fx.logs_dir,
        &fx.reports_dir,
        SourceRegistry::default(),
    )
    .unwrap();
    let table = report.build().unwrap();

    assert!(table.severities.is_empty());
    let green = table.row("GreenOrg").unwrap();
    assert_eq!(green.total_errors, 0);
    assert_eq!(green.status, Status::Operational);
}

#[test]
fn written_report_has_severity_columns_between_counts() {
    let fx = fixture(
        "A,GreenOrg\n",
        "09:00,RiverGroup,CRITICAL\n09:01,GreenOrg,WARNING\n",
    );
    let report = ScrapeReport::new(
        &fx.scrape_file,
        &fx.logs_dir,
        &fx.reports_dir,
        SourceRegistry::default(),
    )
    .unwrap();
    let path = report.write().unwrap();

    let content = fs::read_to_string(&path).unwrap();
    let mut lines = content.lines();
    assert_eq!(
        lines.next().unwrap(),
        "Event Organizers,Number of Events Scraped,CRITICAL,WARNING,Number of Errors,Status"
    );
    // Rows are sorted by organizer name, then registry backfill.
    assert_eq!(
        lines.next().unwrap(),
        "GreenOrg,1,0,1,1,\"Operational, but with errors\""
    );
    assert_eq!(lines.next().unwrap(), "RiverGroup,0,1,0,1,Broken");
}

#[test]
fn missing_log_file_surfaces_as_error() {
    let fx = fixture("A,GreenOrg\n", "");
    fs::remove_file(fx.logs_dir.join("scraper-log-06-01-2020.csv")).unwrap();

    let err = ScrapeReport::new(
        &fx.scrape_file,
        &fx.logs_dir,
        &fx.reports_dir,
        SourceRegistry::default(),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        capnature_report::ReportError::LogNotFound { .. }
    ));
}
