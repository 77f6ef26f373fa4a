//! The three export operations and their prior-run deduplication.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{ExportError, Result};
use crate::event::{EventRecord, EVENT_FIELDS, ORGANIZER_FIELD, VENUE_FIELD};
use crate::target::{ExportTarget, KEY_PREFIX};

/// Header of the single-column venue export.
pub const VENUE_HEADER: &str = "VENUE NAME";

/// Header of the single-column organizer export.
pub const ORGANIZER_HEADER: &str = "Event Organizer Name(s) or ID(s)";

/// Today's date the way export filenames embed it.
pub fn date_stamp() -> String {
    chrono::Local::now().format("%m-%d-%Y").to_string()
}

/// Filename for an export of the given kind, stamped with today's date.
pub fn export_filename(kind: &str) -> String {
    format!("cap-nature-{}-scraped-{}.csv", kind, date_stamp())
}

/// Writes event, venue, and organizer CSVs for one scrape run.
pub struct Exporter<'a> {
    data_dir: PathBuf,
    target: ExportTarget<'a>,
}

impl<'a> Exporter<'a> {
    pub fn new(data_dir: impl Into<PathBuf>, target: ExportTarget<'a>) -> Self {
        Self {
            data_dir: data_dir.into(),
            target,
        }
    }

    /// Write the full event table and return the local path it landed at.
    ///
    /// The path is returned even for remote targets; the scrape reporter
    /// reads it back.
    pub fn export_events(&self, events: &[EventRecord]) -> Result<PathBuf> {
        let path = self.out_path(&export_filename("events"))?;

        let mut writer = csv::Writer::from_path(&path)?;
        writer.write_record(EVENT_FIELDS)?;
        for event in events {
            writer.write_record(EVENT_FIELDS.iter().map(|field| event.get(field)))?;
        }
        writer.flush().map_err(ExportError::Io)?;

        info!(path = %path.display(), rows = events.len(), "Wrote event export");
        self.finish(&path)?;
        Ok(path)
    }

    /// Write the deduplicated venue list.
    pub fn export_venues(&self, events: &[EventRecord]) -> Result<PathBuf> {
        self.export_column(events, VENUE_FIELD, VENUE_HEADER, "venues")
    }

    /// Write the deduplicated organizer list.
    pub fn export_organizers(&self, events: &[EventRecord]) -> Result<PathBuf> {
        self.export_column(events, ORGANIZER_FIELD, ORGANIZER_HEADER, "organizers")
    }

    /// Single-column export: this run's values unioned with the prior
    /// run's file, which is deleted once read.
    fn export_column(
        &self,
        events: &[EventRecord],
        field: &str,
        header: &str,
        kind: &str,
    ) -> Result<PathBuf> {
        let marker = format!("{}-", kind);
        // Blank cells carry no venue/organizer and are not list entries.
        let mut values: BTreeSet<String> = events
            .iter()
            .map(|event| event.get(field))
            .filter(|value| !value.is_empty())
            .map(str::to_string)
            .collect();
        values.extend(self.past_entries(&marker)?);

        let path = self.out_path(&export_filename(kind))?;
        let mut writer = csv::Writer::from_path(&path)?;
        writer.write_record([header])?;
        for value in &values {
            writer.write_record([value.as_str()])?;
        }
        writer.flush().map_err(ExportError::Io)?;

        info!(path = %path.display(), entries = values.len(), "Wrote {} export", kind);
        self.finish(&path)?;
        Ok(path)
    }

    /// First column of the previous export of this kind, header dropped.
    ///
    /// The prior file is located by its `marker` substring, read, then
    /// deleted: the file about to be written supersedes it. No prior file
    /// is the normal first-run case and yields an empty set.
    fn past_entries(&self, marker: &str) -> Result<BTreeSet<String>> {
        let Some(path) = self.find_prior(marker)? else {
            debug!(marker, "No prior export to merge");
            return Ok(BTreeSet::new());
        };

        let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(&path)?;
        let mut entries = BTreeSet::new();
        for record in reader.records() {
            let record = record?;
            if let Some(value) = record.get(0) {
                entries.insert(value.to_string());
            }
        }

        fs::remove_file(&path)?;
        debug!(path = %path.display(), entries = entries.len(), "Merged and removed prior export");
        Ok(entries)
    }

    /// First file in the data directory whose name contains `marker`.
    fn find_prior(&self, marker: &str) -> Result<Option<PathBuf>> {
        fs::create_dir_all(&self.data_dir)?;
        for entry in fs::read_dir(&self.data_dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            if entry.file_name().to_string_lossy().contains(marker) {
                return Ok(Some(entry.path()));
            }
        }
        Ok(None)
    }

    fn out_path(&self, filename: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.data_dir)?;
        Ok(self.data_dir.join(filename))
    }

    /// Push the written file to the bucket when the target is remote.
    fn finish(&self, path: &Path) -> Result<()> {
        let ExportTarget::Remote { store, bucket } = &self.target else {
            return Ok(());
        };
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let key = format!("{}/{}", KEY_PREFIX, filename);
        store
            .put_object(bucket, &key, path)
            .map_err(|source| ExportError::Upload {
                key: key.clone(),
                source,
            })?;
        info!(bucket, key, "Uploaded export to bucket");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target::ObjectStore;
    use std::sync::Mutex;
    use tempfile::tempdir;

    fn event(name: &str, venue: &str, organizer: &str) -> EventRecord {
        let mut event = EventRecord::new();
        event.set("Event Name", name);
        event.set(VENUE_FIELD, venue);
        event.set(ORGANIZER_FIELD, organizer);
        event
    }

    #[derive(Default)]
    struct RecordingStore {
        puts: Mutex<Vec<(String, String)>>,
    }

    impl ObjectStore for RecordingStore {
        fn put_object(&self, bucket: &str, key: &str, _file: &Path) -> anyhow::Result<()> {
            self.puts
                .lock()
                .unwrap()
                .push((bucket.to_string(), key.to_string()));
            Ok(())
        }
    }

    #[test]
    fn event_export_writes_all_columns() {
        let dir = tempdir().unwrap();
        let exporter = Exporter::new(dir.path(), ExportTarget::Local);

        let path = exporter
            .export_events(&[event("Bird Walk", "Meadowside", "Audubon")])
            .unwrap();
        assert!(path.exists());

        let content = fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        let header = lines.next().unwrap();
        assert_eq!(header.split(',').count(), EVENT_FIELDS.len());
        assert!(header.starts_with("Do Not Import,Event Name"));
        assert!(lines.next().unwrap().contains("Bird Walk"));
    }

    #[test]
    fn venue_export_handles_missing_prior_file() {
        let dir = tempdir().unwrap();
        let exporter = Exporter::new(dir.path(), ExportTarget::Local);

        let path = exporter
            .export_venues(&[event("Hike", "Rock Creek Park", "NPS")])
            .unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], VENUE_HEADER);
        assert_eq!(lines[1], "Rock Creek Park");
    }

    #[test]
    fn remote_target_puts_under_key_prefix() {
        let dir = tempdir().unwrap();
        let store = RecordingStore::default();
        let exporter = Exporter::new(
            dir.path(),
            ExportTarget::Remote {
                store: &store,
                bucket: "scrape-bucket",
            },
        );

        exporter
            .export_organizers(&[event("Hike", "Park", "NPS")])
            .unwrap();

        let puts = store.puts.lock().unwrap();
        assert_eq!(puts.len(), 1);
        assert_eq!(puts[0].0, "scrape-bucket");
        assert!(puts[0].1.starts_with("capital-nature/cap-nature-organizers-scraped-"));
    }
}
