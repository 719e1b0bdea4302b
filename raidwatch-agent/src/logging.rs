//! Logging configuration module
//!
//! Console output plus an optional log file. The file is written without
//! rotation so that the notifier can attach its tail to a report.
//!
//! File writes are synchronous: the mail notifier reads the tail right after
//! a run and must see that run's events.

use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    pub level: String,
    /// Log file path
    pub file_path: Option<PathBuf>,
    /// Use JSON formatting for the log file
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file_path: Some(PathBuf::from("/var/log/raidwatch/monitoring.log")),
            json_format: false,
        }
    }
}

impl LoggingConfig {
    /// Initialize logging based on configuration
    pub fn init(&self) -> Result<(), Box<dyn std::error::Error>> {
        let env_filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&self.level))?;

        let console_layer = fmt::layer()
            .with_target(true)
            .with_level(true)
            .with_ansi(true)
            .with_writer(io::stderr);

        let registry = tracing_subscriber::registry()
            .with(env_filter)
            .with(console_layer);

        let Some(writer) = self.file_writer()? else {
            registry.try_init()?;
            tracing::info!("Logging initialized - level: {}", self.level);
            return Ok(());
        };

        if self.json_format {
            registry
                .with(fmt::layer().with_ansi(false).json().with_writer(writer))
                .try_init()?;
        } else {
            registry
                .with(fmt::layer().with_ansi(false).with_writer(writer))
                .try_init()?;
        }

        tracing::info!(file = ?self.file_path, "Logging initialized - level: {}", self.level);
        Ok(())
    }

    /// Appender for the configured log file, creating its directory
    pub fn file_writer(&self) -> io::Result<Option<RollingFileAppender>> {
        let Some(ref path) = self.file_path else {
            return Ok(None);
        };

        let (dir, file_name) = split_log_path(path)?;
        std::fs::create_dir_all(&dir)?;
        let appender = RollingFileAppender::builder()
            .rotation(Rotation::NEVER)
            .filename_prefix(file_name)
            .build(dir)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;

        Ok(Some(appender))
    }
}

/// Split a log file path into its directory and file name
fn split_log_path(path: &Path) -> io::Result<(PathBuf, String)> {
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, format!("Invalid log file path: {}", path.display())))?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    Ok((dir, file_name.to_string()))
}
