//! Configuration management for raidwatch
//!
//! Settings are loaded from:
//! 1. Environment variables (highest priority)
//! 2. Configuration file (TOML format)
//! 3. Default values (lowest priority)

use crate::fetcher::{FetcherConfig, SshFetcherConfig};
use crate::logging::LoggingConfig;
use crate::monitor::Inventory;
use crate::notifier::NotificationConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration struct
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RaidwatchConfig {
    /// Name of the monitored server, used in notifications
    pub server_name: String,
    /// Entities to check
    pub inventory: Inventory,
    /// Where status dumps come from
    pub fetcher: FetcherConfig,
    /// Notification policy and delivery
    pub notification: NotificationConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
    /// Periodic mode settings
    pub watch: WatchConfig,
}

/// Periodic mode configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    /// Seconds between two runs
    pub interval_secs: u64,
}

impl Default for RaidwatchConfig {
    fn default() -> Self {
        Self {
            server_name: hostname::get()
                .ok()
                .and_then(|h| h.into_string().ok())
                .unwrap_or_else(|| "localhost".to_string()),
            inventory: Inventory::default(),
            fetcher: FetcherConfig::default(),
            notification: NotificationConfig::default(),
            logging: LoggingConfig::default(),
            watch: WatchConfig::default(),
        }
    }
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self { interval_secs: 3600 }
    }
}

impl RaidwatchConfig {
    /// Load configuration from `path`, or from the standard locations when `None`
    ///
    /// An explicitly given file must exist and parse; a missing file in the
    /// standard locations falls back to defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::load_from_file(path)?,
            None => match Self::find_config_file() {
                Some(found) => Self::load_from_file(&found)?,
                None => Self::default(),
            },
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Load configuration from a specific file path
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_path_buf(), e.to_string()))?;

        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Find configuration file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        let paths = [
            std::env::var("RAIDWATCH_CONFIG").ok().map(PathBuf::from),
            Some(PathBuf::from("/etc/raidwatch/config.toml")),
            Some(PathBuf::from("./raidwatch.toml")),
        ];

        paths.into_iter().flatten().find(|p| p.exists())
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        if let Ok(name) = std::env::var("RAIDWATCH_SERVER_NAME") {
            self.server_name = name;
        }

        // SSH
        if let FetcherConfig::Ssh(ref mut ssh) = self.fetcher {
            if let Ok(host) = std::env::var("RAIDWATCH_SSH_HOST") {
                ssh.host = host;
            }
            if let Ok(user) = std::env::var("RAIDWATCH_SSH_USER") {
                ssh.user = user;
            }
            if let Ok(path) = std::env::var("RAIDWATCH_SSH_IDENTITY") {
                ssh.identity_file = Some(PathBuf::from(path));
            }
        }

        // Mail
        if let Ok(server) = std::env::var("RAIDWATCH_SMTP_SERVER") {
            self.notification.mail.server = server;
        }
        if let Ok(user) = std::env::var("RAIDWATCH_SMTP_USER") {
            self.notification.mail.user = Some(user);
        }
        if let Ok(password) = std::env::var("RAIDWATCH_SMTP_PASSWORD") {
            self.notification.mail.password = Some(password);
        }
        if let Ok(path) = std::env::var("RAIDWATCH_STATE_PATH") {
            self.notification.state_path = PathBuf::from(path);
        }

        // Logging
        if let Ok(level) = std::env::var("RAIDWATCH_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(path) = std::env::var("RAIDWATCH_LOG_FILE") {
            self.logging.file_path = Some(PathBuf::from(path));
        }
    }

    /// Generate a sample configuration file
    pub fn generate_sample() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.inventory.is_empty() {
            return Err(ConfigError::Validation("Inventory lists no entities to check".to_string()));
        }

        if self.watch.interval_secs == 0 {
            return Err(ConfigError::Validation("Watch interval cannot be 0".to_string()));
        }

        match &self.fetcher {
            FetcherConfig::File(file) => {
                if file.prefix.is_empty() {
                    return Err(ConfigError::Validation("File prefix cannot be empty".to_string()));
                }
                if file.max_age_secs == 0 {
                    return Err(ConfigError::Validation("File max_age_secs cannot be 0".to_string()));
                }
            }
            FetcherConfig::Ssh(ssh) => validate_ssh(ssh)?,
        }

        Ok(())
    }

    /// Validate the notification settings
    ///
    /// Only needed when a run may notify; disabled notifications always pass.
    pub fn validate_notification(&self) -> Result<(), ConfigError> {
        let notification = &self.notification;
        if !notification.enabled {
            return Ok(());
        }

        if notification.mail.recipients.is_empty() {
            return Err(ConfigError::Validation(
                "Notifications are enabled but no mail recipients are configured".to_string(),
            ));
        }
        if notification.interval_secs == 0 {
            return Err(ConfigError::Validation("Notification interval cannot be 0".to_string()));
        }

        Ok(())
    }
}

fn validate_ssh(ssh: &SshFetcherConfig) -> Result<(), ConfigError> {
    if ssh.host.is_empty() {
        return Err(ConfigError::Validation("SSH host cannot be empty".to_string()));
    }
    if ssh.port == 0 {
        return Err(ConfigError::Validation("SSH port cannot be 0".to_string()));
    }

    let templates = [
        ("get_adapter", &ssh.get_adapter, &["{id}"][..]),
        ("get_ld", &ssh.get_ld, &["{id}"][..]),
        ("get_pd", &ssh.get_pd, &["{enclosure}", "{slot}"][..]),
    ];

    for (name, template, placeholders) in templates {
        for placeholder in placeholders {
            if !template.contains(placeholder) {
                return Err(ConfigError::Validation(format!(
                    "SSH command {} must contain {} placeholder",
                    name, placeholder
                )));
            }
        }
    }

    Ok(())
}

/// Configuration errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {0:?}: {1}")]
    FileRead(PathBuf, String),

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Config validation failed: {0}")]
    Validation(String),
}
