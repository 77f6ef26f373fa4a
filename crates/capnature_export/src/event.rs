//! Event records as produced by the upstream scrapers.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Field holding the venue name of an event.
pub const VENUE_FIELD: &str = "Event Venue Name";

/// Field holding the organizer (source) name of an event.
pub const ORGANIZER_FIELD: &str = "Event Organizers";

/// Column set of the full event export, in output order.
///
/// This is the import format expected downstream; every export writes all
/// columns even when an event carries only a subset of them.
pub const EVENT_FIELDS: [&str; 26] = [
    "Do Not Import",
    "Event Name",
    "Event Description",
    "Event Excerpt",
    "Event Start Date",
    "Event Start Time",
    "Event End Date",
    "Event End Time",
    "Timezone",
    "All Day Event",
    "Hide Event From Event Listings",
    "Event Sticky in Month View",
    "Feature Event",
    VENUE_FIELD,
    ORGANIZER_FIELD,
    "Event Show Map Link",
    "Event Show Map",
    "Event Cost",
    "Event Currency Symbol",
    "Event Currency Position",
    "Event Category",
    "Event Tags",
    "Event Website",
    "Event Featured Image",
    "Allow Comments",
    "Event Allow Trackbacks and Pingbacks",
];

/// A single scraped event: named fields mapped to string values.
///
/// Serializes transparently, so a JSON array of objects deserializes
/// straight into `Vec<EventRecord>`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventRecord(BTreeMap<String, String>);

impl EventRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of a field, or the empty string when the scraper left it out.
    pub fn get(&self, field: &str) -> &str {
        self.0.get(field).map(String::as_str).unwrap_or("")
    }

    pub fn set(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.0.insert(field.into(), value.into());
    }

    pub fn venue(&self) -> &str {
        self.get(VENUE_FIELD)
    }

    pub fn organizer(&self) -> &str {
        self.get(ORGANIZER_FIELD)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for EventRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
