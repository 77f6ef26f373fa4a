//! Capital Nature reporting launcher.
//!
//! Batch commands over one scrape run:
//! - `export`: write the event, venue, and organizer CSVs
//! - `report`: cross-reference a scrape output with its log
//! - `run`: export everything, then report on the fresh output

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use capnature_export::{EventRecord, ExportTarget, Exporter, HttpObjectStore};
use capnature_report::{ScrapeReport, SourceRegistry};

mod logging;

#[derive(Parser, Debug)]
#[command(name = "capnature", about = "CSV exports and scrape reports for Capital Nature")]
struct Cli {
    /// Enable verbose logging (debug to stderr)
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args, Debug)]
struct ExportOpts {
    /// JSON array of scraped event records
    input: PathBuf,

    /// Directory for the written CSVs
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// Upload exports to this bucket (requires --endpoint)
    #[arg(long)]
    bucket: Option<String>,

    /// Object-store endpoint URL (requires --bucket)
    #[arg(long)]
    endpoint: Option<String>,
}

#[derive(clap::Args, Debug)]
struct ReportOpts {
    /// Directory holding the scraper log CSVs
    #[arg(long, default_value = "logs")]
    logs_dir: PathBuf,

    /// Directory the report is written to
    #[arg(long, default_value = "reports")]
    reports_dir: PathBuf,

    /// TOML registry of known sources
    #[arg(long, default_value = "sources.toml")]
    sources: PathBuf,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write event, venue, and organizer CSVs from a scraped-events feed
    Export {
        #[command(flatten)]
        opts: ExportOpts,
    },

    /// Cross-reference a scrape output with its log and write the report
    Report {
        /// Date-stamped scrape output CSV
        scrape_file: PathBuf,

        #[command(flatten)]
        opts: ReportOpts,
    },

    /// Full pipeline: export all CSVs, then report on the fresh output
    Run {
        #[command(flatten)]
        export: ExportOpts,

        #[command(flatten)]
        report: ReportOpts,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match cli.command {
        Commands::Export { opts } => {
            run_export(&opts)?;
        }
        Commands::Report { scrape_file, opts } => {
            run_report(&scrape_file, &opts)?;
        }
        Commands::Run { export, report } => {
            let scrape_file = run_export(&export)?;
            run_report(&scrape_file, &report)?;
        }
    }
    Ok(())
}

/// Run all three exporters; returns the local path of the event CSV.
fn run_export(opts: &ExportOpts) -> Result<PathBuf> {
    let events = load_events(&opts.input)?;
    info!(events = events.len(), input = %opts.input.display(), "Loaded event feed");

    let store = opts.endpoint.as_deref().map(HttpObjectStore::new);
    let target = match (opts.bucket.as_deref(), store.as_ref()) {
        (Some(bucket), Some(store)) => ExportTarget::Remote { store, bucket },
        (Some(_), None) => bail!("--bucket requires --endpoint"),
        (None, Some(_)) => bail!("--endpoint requires --bucket"),
        (None, None) => ExportTarget::Local,
    };

    let exporter = Exporter::new(&opts.data_dir, target);
    let scrape_file = exporter
        .export_events(&events)
        .context("Event export failed")?;
    exporter
        .export_venues(&events)
        .context("Venue export failed")?;
    exporter
        .export_organizers(&events)
        .context("Organizer export failed")?;

    Ok(scrape_file)
}

fn run_report(scrape_file: &Path, opts: &ReportOpts) -> Result<()> {
    let registry = if opts.sources.exists() {
        SourceRegistry::load(&opts.sources)
            .with_context(|| format!("Failed to load registry: {}", opts.sources.display()))?
    } else {
        warn!(path = %opts.sources.display(), "No sources registry; report covers observed sources only");
        SourceRegistry::default()
    };

    let report = ScrapeReport::new(scrape_file, &opts.logs_dir, &opts.reports_dir, registry)
        .context("Failed to pair scrape output with its log")?;
    info!(log = %report.log_file().display(), "Matched log file");

    let path = report.write().context("Failed to write scrape report")?;
    info!(path = %path.display(), "Scrape report written");
    Ok(())
}

fn load_events(path: &Path) -> Result<Vec<EventRecord>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read event feed: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Event feed is not a JSON array of objects: {}", path.display()))
}
