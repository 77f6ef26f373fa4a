//! CSV exporters for scraped event data.
//!
//! Three exports are produced per scrape run:
//! - the full event table (one row per event, fixed column set)
//! - the deduplicated venue list
//! - the deduplicated organizer list
//!
//! Venue and organizer exports carry forward the entries of the previous
//! run: the superseded file is read, deleted, and its values merged into
//! the new file. Every export can stay on the local filesystem or be
//! pushed to an object-store bucket under the `capital-nature/` prefix.

mod error;
mod event;
mod exporter;
mod target;

pub use error::{ExportError, Result};
pub use event::{EventRecord, EVENT_FIELDS, ORGANIZER_FIELD, VENUE_FIELD};
pub use exporter::{date_stamp, export_filename, Exporter, ORGANIZER_HEADER, VENUE_HEADER};
pub use target::{ExportTarget, HttpObjectStore, ObjectStore, KEY_PREFIX};
