//! Write targets for export files.
//!
//! An export either stays under the local data directory or is pushed to
//! an object-store bucket after the local write. The store is a trait so
//! tests can record uploads without a network.

use anyhow::Context;
use std::fs;
use std::path::Path;
use tracing::info;

/// Key prefix for every uploaded export.
pub const KEY_PREFIX: &str = "capital-nature";

/// Destination of an export run.
pub enum ExportTarget<'a> {
    /// Leave the file under the local data directory.
    Local,
    /// Upload the written file to `bucket` under [`KEY_PREFIX`].
    Remote {
        store: &'a dyn ObjectStore,
        bucket: &'a str,
    },
}

/// Minimal object-store client surface.
pub trait ObjectStore {
    fn put_object(&self, bucket: &str, key: &str, file: &Path) -> anyhow::Result<()>;
}

/// Object store speaking plain HTTP: `PUT <endpoint>/<bucket>/<key>`.
///
/// Works against any S3-compatible endpoint that accepts unsigned puts
/// (the public scrape bucket does).
pub struct HttpObjectStore {
    endpoint: String,
    agent: ureq::Agent,
}

impl HttpObjectStore {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            agent: ureq::agent(),
        }
    }
}

impl ObjectStore for HttpObjectStore {
    fn put_object(&self, bucket: &str, key: &str, file: &Path) -> anyhow::Result<()> {
        let url = format!("{}/{}/{}", self.endpoint.trim_end_matches('/'), bucket, key);
        let body = fs::read(file)
            .with_context(|| format!("Failed to read upload source: {}", file.display()))?;

        self.agent
            .put(&url)
            .set("Content-Type", "text/csv")
            .send_bytes(&body)
            .with_context(|| format!("PUT {} failed", url))?;

        info!(url = %url, bytes = body.len(), "Uploaded export");
        Ok(())
    }
}
