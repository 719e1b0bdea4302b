//! Monitoring run orchestration
//!
//! Fetches every entity listed in the [`Inventory`], runs the matching
//! category checker and sums the tallies into a [`RunReport`].

use crate::checks;
use crate::fetcher::Fetcher;
use futures::future::join_all;
use raidwatch_common::{EntityKind, FetchStatus, Query};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{error, info};

/// Physical disks behind one enclosure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enclosure {
    pub id: u32,
    pub slots: Vec<u32>,
}

/// Entities to monitor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    #[serde(default)]
    pub adapters: Vec<u32>,
    #[serde(default)]
    pub logical_disks: Vec<u32>,
    #[serde(default)]
    pub enclosures: Vec<Enclosure>,
}

impl Default for Inventory {
    fn default() -> Self {
        Self {
            adapters: vec![0],
            logical_disks: vec![0],
            enclosures: vec![Enclosure { id: 252, slots: vec![0, 1] }],
        }
    }
}

impl Inventory {
    /// All queries: adapters, then logical disks, then physical disks
    pub fn queries(&self) -> Vec<Query> {
        let adapters = self.adapters.iter().map(|&id| Query::Adapter { id });
        let logical_disks = self.logical_disks.iter().map(|&id| Query::LogicalDisk { id });
        let physical_disks = self.enclosures.iter().flat_map(|enclosure| {
            enclosure.slots.iter().map(move |&slot| Query::PhysicalDisk {
                enclosure: enclosure.id,
                slot,
            })
        });

        adapters.chain(logical_disks).chain(physical_disks).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
            && self.logical_disks.is_empty()
            && self.enclosures.iter().all(|e| e.slots.is_empty())
    }
}

/// Notification level of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Level(pub u8);

impl Level {
    pub const HEALTHY: Level = Level(10);
    pub const FAILED: Level = Level(50);

    pub fn from_error_count(errors: u32) -> Self {
        if errors == 0 {
            Level::HEALTHY
        } else {
            Level::FAILED
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Outcome for a single entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityReport {
    pub query: Query,
    pub fetch_status: FetchStatus,
    pub errors: u32,
}

impl EntityReport {
    pub fn kind(&self) -> EntityKind {
        self.query.kind()
    }
}

/// Outcome of one monitoring run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub entities: Vec<EntityReport>,
    pub total_errors: u32,
    pub level: Level,
    /// Unix timestamp when the run finished
    pub checked_at: i64,
}

impl RunReport {
    pub fn new(entities: Vec<EntityReport>) -> Self {
        let total_errors = entities.iter().map(|e| e.errors).sum();
        Self {
            entities,
            total_errors,
            level: Level::from_error_count(total_errors),
            checked_at: chrono::Utc::now().timestamp(),
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.total_errors == 0
    }

    /// Plain-text summary, one line per entity
    pub fn render_text(&self) -> String {
        let mut text = String::new();
        let checked_at = chrono::DateTime::from_timestamp(self.checked_at, 0)
            .map(|dt| dt.to_rfc2822())
            .unwrap_or_else(|| "Unknown".to_string());

        text.push_str(&format!("Checked at: {}\r\n", checked_at));
        text.push_str(&format!(
            "Status: {} ({} errors)\r\n\r\n",
            if self.is_healthy() { "OK" } else { "ERRORS" },
            self.total_errors
        ));

        for entity in &self.entities {
            text.push_str(&format!(
                "{:<16} fetch={:<8} errors={}\r\n",
                entity.query.to_string(),
                entity.fetch_status.to_string(),
                entity.errors
            ));
        }

        text
    }
}

/// Runs checks for an inventory through one fetcher
pub struct Monitor<F: Fetcher> {
    fetcher: F,
    inventory: Inventory,
}

impl<F: Fetcher> Monitor<F> {
    pub fn new(fetcher: F, inventory: Inventory) -> Self {
        Self { fetcher, inventory }
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    /// Fetch and check every entity once
    ///
    /// Fetches run concurrently; report order follows the inventory.
    pub async fn run_once(&self) -> RunReport {
        info!("Started RAID status check");
        let queries = self.inventory.queries();

        let results = join_all(queries.iter().map(|query| self.fetcher.fetch(query))).await;

        let entities: Vec<EntityReport> = queries
            .into_iter()
            .zip(results)
            .map(|(query, raw)| {
                let errors = checks::check_entity(query.kind(), &raw);
                EntityReport {
                    query,
                    fetch_status: raw.status,
                    errors,
                }
            })
            .collect();

        let report = RunReport::new(entities);
        if report.is_healthy() {
            info!("RAID status check completed without errors");
        } else {
            error!(
                total_errors = report.total_errors,
                "RAID status check completed WITH errors. Check log for details"
            );
        }

        report
    }
}
