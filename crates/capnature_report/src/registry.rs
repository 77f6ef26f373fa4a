//! Known-sources registry.
//!
//! Maps internal scraper keys to canonical organizer names. The registry
//! is loaded once and passed into the reporter by value, so every report
//! run sees the same read-only mapping and the classifier stays free of
//! process-wide state.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{ReportError, Result};

/// Read-only mapping from scraper key to canonical organizer name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRegistry {
    #[serde(default)]
    sources: BTreeMap<String, String>,
}

impl SourceRegistry {
    /// Load the registry from a TOML file with a `[sources]` table.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| ReportError::Registry(e.to_string()))
    }

    pub fn insert(&mut self, key: impl Into<String>, name: impl Into<String>) {
        self.sources.insert(key.into(), name.into());
    }

    /// Canonical organizer names, sorted by scraper key.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sources.values().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for SourceRegistry {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            sources: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_sources_table_from_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sources.toml");
        std::fs::write(
            &path,
            "[sources]\nans = \"Audubon Naturalist Society\"\nnps = \"National Park Service\"\n",
        )
        .unwrap();

        let registry = SourceRegistry::load(&path).unwrap();
        assert_eq!(registry.len(), 2);
        let names: Vec<&str> = registry.names().collect();
        assert!(names.contains(&"National Park Service"));
    }

    #[test]
    fn rejects_malformed_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sources.toml");
        std::fs::write(&path, "sources = 3\n").unwrap();

        let err = SourceRegistry::load(&path).unwrap_err();
        assert!(matches!(err, ReportError::Registry(_)));
    }
}
