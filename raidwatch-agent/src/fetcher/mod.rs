//! Status retrieval backends
//!
//! A [`Fetcher`] turns a [`Query`] into the raw controller dump. Transport
//! problems are reported inside the returned [`RawResult`], never as an error,
//! so one unreachable entity cannot abort a monitoring run.

pub mod file;
pub mod ssh;

pub use file::{FileFetcher, FileFetcherConfig};
pub use ssh::{SshFetcher, SshFetcherConfig};

use async_trait::async_trait;
use raidwatch_common::{Query, RawResult};
use serde::{Deserialize, Serialize};

#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Retrieve the status dump for a single entity
    async fn fetch(&self, query: &Query) -> RawResult;

    async fn get_adapter(&self, id: u32) -> RawResult {
        self.fetch(&Query::Adapter { id }).await
    }

    async fn get_logical_disk(&self, id: u32) -> RawResult {
        self.fetch(&Query::LogicalDisk { id }).await
    }

    async fn get_physical_disk(&self, enclosure: u32, slot: u32) -> RawResult {
        self.fetch(&Query::PhysicalDisk { enclosure, slot }).await
    }
}

#[async_trait]
impl<T: Fetcher + ?Sized> Fetcher for Box<T> {
    async fn fetch(&self, query: &Query) -> RawResult {
        (**self).fetch(query).await
    }
}

/// Fetcher backend selection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum FetcherConfig {
    /// Poll dump files written on the host
    File(FileFetcherConfig),
    /// Run the controller CLI over ssh
    Ssh(SshFetcherConfig),
}

impl Default for FetcherConfig {
    fn default() -> Self {
        FetcherConfig::Ssh(SshFetcherConfig::default())
    }
}

/// Build the configured fetcher backend
pub fn build_fetcher(config: &FetcherConfig) -> Box<dyn Fetcher> {
    match config {
        FetcherConfig::File(c) => Box::new(FileFetcher::new(c.clone())),
        FetcherConfig::Ssh(c) => Box::new(SshFetcher::new(c.clone())),
    }
}
