//! Report notification with rate limiting
//!
//! A [`NotificationGate`] decides whether a run's report is delivered through
//! its [`Notifier`]. Reports at or above `level_minimum` are rate limited to
//! one per `interval_secs`; reports at or above the optional `level_required`
//! (but below `level_minimum`) are always delivered.

pub mod mail;

pub use mail::{MailConfig, MailNotifier};

use crate::monitor::{Level, RunReport};
use async_trait::async_trait;
use raidwatch_common::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, level: Level, report: &RunReport) -> Result<()>;
}

/// Notification settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    pub enabled: bool,
    /// Reports at or above this level are rate limited
    pub level_minimum: Level,
    /// Reports at or above this level but below `level_minimum` are always sent
    pub level_required: Option<Level>,
    /// Minimum time between two rate-limited notifications
    pub interval_secs: u64,
    /// File persisting the time of the last rate-limited notification
    pub state_path: PathBuf,
    pub mail: MailConfig,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level_minimum: Level::FAILED,
            level_required: None,
            interval_secs: 86400,
            state_path: PathBuf::from("/var/lib/raidwatch/notification_state.json"),
            mail: MailConfig::default(),
        }
    }
}

/// Persisted rate-limit state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationState {
    /// Unix timestamp of the last rate-limited notification
    pub last_sent: Option<i64>,
}

impl NotificationState {
    /// Load the state, treating a missing or unreadable file as "never sent"
    pub async fn load(path: &Path) -> Self {
        match tokio::fs::read_to_string(path).await {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
                warn!(path = %path.display(), "Ignoring corrupt notification state: {}", e);
                Self::default()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Self::default(),
            Err(e) => {
                warn!(path = %path.display(), "Unable to read notification state: {}", e);
                Self::default()
            }
        }
    }

    pub async fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let contents = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, contents).await?;
        Ok(())
    }
}

/// What the gate did with a report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    Sent,
    RateLimited { retry_in_secs: u64 },
    BelowThreshold,
}

pub struct NotificationGate<N: Notifier> {
    notifier: N,
    level_minimum: Level,
    level_required: Option<Level>,
    interval_secs: u64,
    state_path: PathBuf,
}

impl<N: Notifier> NotificationGate<N> {
    pub fn new(notifier: N, config: &NotificationConfig) -> Self {
        Self {
            notifier,
            level_minimum: config.level_minimum,
            level_required: config.level_required,
            interval_secs: config.interval_secs,
            state_path: config.state_path.clone(),
        }
    }

    pub async fn dispatch(&self, report: &RunReport) -> Result<Dispatch> {
        self.dispatch_at(report, chrono::Utc::now().timestamp()).await
    }

    /// Apply the dispatch policy as if the current time were `now`
    pub async fn dispatch_at(&self, report: &RunReport, now: i64) -> Result<Dispatch> {
        let level = report.level;

        if level >= self.level_minimum {
            debug!(level = %level, "Level exceeding minimum level");
            let mut state = NotificationState::load(&self.state_path).await;
            let elapsed = state.last_sent.map(|last| now.saturating_sub(last));

            if let Some(elapsed) = elapsed {
                if elapsed <= self.interval_secs as i64 {
                    let retry_in_secs = (self.interval_secs as i64 - elapsed).max(0) as u64;
                    debug!(elapsed, retry_in_secs, "Notification rate limited");
                    return Ok(Dispatch::RateLimited { retry_in_secs });
                }
            }

            debug!(elapsed = ?elapsed, "Notification interval exceeded");
            state.last_sent = Some(now);
            state.save(&self.state_path).await?;

            self.notifier.notify(level, report).await?;
            return Ok(Dispatch::Sent);
        }

        if self.level_required.is_some_and(|required| level >= required) {
            debug!(level = %level, "Level exceeding required level");
            self.notifier.notify(level, report).await?;
            return Ok(Dispatch::Sent);
        }

        Ok(Dispatch::BelowThreshold)
    }
}
