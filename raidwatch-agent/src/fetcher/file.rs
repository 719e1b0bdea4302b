//! Local dump file fetcher
//!
//! Reads status dumps that a job on the host writes periodically, e.g.
//! `raidstatus_esx01_pdinfo_252_1`. A dump older than `max_age_secs` is
//! reported as failed so a dead job does not look like a healthy array.

use super::Fetcher;
use async_trait::async_trait;
use raidwatch_common::{Query, RawResult};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::SystemTime;
use tracing::{debug, error};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileFetcherConfig {
    /// Directory holding the dump files
    pub path: PathBuf,
    /// Host prefix in the file names
    pub prefix: String,
    /// Maximum accepted age of a dump file
    pub max_age_secs: u64,
}

impl Default for FileFetcherConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("/var/lib/raidwatch/dumps"),
            prefix: "esxi".to_string(),
            max_age_secs: 3600,
        }
    }
}

pub struct FileFetcher {
    config: FileFetcherConfig,
}

impl FileFetcher {
    pub fn new(config: FileFetcherConfig) -> Self {
        debug!(path = %config.path.display(), "File fetcher initialized");
        Self { config }
    }

    /// Name of the dump file for a query
    pub fn file_name(&self, query: &Query) -> String {
        let prefix = &self.config.prefix;
        match query {
            Query::Adapter { id } => format!("raidstatus_{}_adapterinfo_{}", prefix, id),
            Query::LogicalDisk { id } => format!("raidstatus_{}_ldinfo_{}", prefix, id),
            Query::PhysicalDisk { enclosure, slot } => {
                format!("raidstatus_{}_pdinfo_{}_{}", prefix, enclosure, slot)
            }
        }
    }

    async fn read_dump(&self, file_name: &str) -> RawResult {
        let file_path = self.config.path.join(file_name);

        let metadata = match tokio::fs::metadata(&file_path).await {
            Ok(m) if m.is_file() => m,
            _ => {
                error!(path = %file_path.display(), "Found no file matching {}", file_name);
                return RawResult::error("File not found");
            }
        };
        debug!(path = %file_path.display(), "Found entry for file");

        // A modification time in the future counts as fresh
        let age = metadata
            .modified()
            .ok()
            .and_then(|mtime| SystemTime::now().duration_since(mtime).ok())
            .map(|d| d.as_secs())
            .unwrap_or(0);

        if age > self.config.max_age_secs {
            error!(
                path = %file_path.display(),
                age_secs = age,
                max_age_secs = self.config.max_age_secs,
                "File {} exceeds the maximum allowed age",
                file_name
            );
            return RawResult::failed("Maximum Time Exceeded");
        }

        match tokio::fs::read_to_string(&file_path).await {
            Ok(contents) => RawResult::success(contents),
            Err(e) => {
                error!(path = %file_path.display(), "Failed to read file: {}", e);
                RawResult::error(format!("Failed to read {}: {}", file_name, e))
            }
        }
    }
}

#[async_trait]
impl Fetcher for FileFetcher {
    async fn fetch(&self, query: &Query) -> RawResult {
        debug!(query = %query, "Getting data from file");
        let file_name = self.file_name(query);
        self.read_dump(&file_name).await
    }
}
