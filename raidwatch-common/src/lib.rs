//! Common types shared between the raidwatch engine and its collaborators

use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of a status retrieval attempt
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FetchStatus {
    Success,
    Failed,  // data was found but is not trustworthy (e.g. stale dump)
    Error,   // data could not be retrieved at all
}

impl fmt::Display for FetchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Failed => write!(f, "failed"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Raw status dump as returned by a fetcher
///
/// When `status` is not `Success`, `text` carries the failure message instead
/// of controller output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RawResult {
    pub status: FetchStatus,
    pub text: String,
}

impl RawResult {
    pub fn success(text: impl Into<String>) -> Self {
        Self { status: FetchStatus::Success, text: text.into() }
    }

    pub fn failed(text: impl Into<String>) -> Self {
        Self { status: FetchStatus::Failed, text: text.into() }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self { status: FetchStatus::Error, text: text.into() }
    }

    pub fn is_success(&self) -> bool {
        self.status == FetchStatus::Success
    }
}

/// Category of a monitored RAID entity
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Adapter,
    LogicalDisk,
    PhysicalDisk,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Adapter => write!(f, "adapter"),
            Self::LogicalDisk => write!(f, "logical disk"),
            Self::PhysicalDisk => write!(f, "physical disk"),
        }
    }
}

/// A single entity to fetch status for
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Query {
    Adapter { id: u32 },
    LogicalDisk { id: u32 },
    PhysicalDisk { enclosure: u32, slot: u32 },
}

impl Query {
    pub fn kind(&self) -> EntityKind {
        match self {
            Query::Adapter { .. } => EntityKind::Adapter,
            Query::LogicalDisk { .. } => EntityKind::LogicalDisk,
            Query::PhysicalDisk { .. } => EntityKind::PhysicalDisk,
        }
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Query::Adapter { id } => write!(f, "adapter {}", id),
            Query::LogicalDisk { id } => write!(f, "ld {}", id),
            Query::PhysicalDisk { enclosure, slot } => write!(f, "pd {}:{}", enclosure, slot),
        }
    }
}

/// Collaborator error types
///
/// The parsing and evaluation engine never produces these; they cover
/// notification delivery and state persistence failures.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Notification error: {0}")]
    Notification(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
