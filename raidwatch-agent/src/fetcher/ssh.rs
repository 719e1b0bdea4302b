//! Remote fetcher running MegaCli over ssh
//!
//! Uses the system `ssh` client with key-based authentication. MegaCli exit
//! codes are not reliable, so a fetch is successful when nothing was written
//! to stderr. The client runs with `LogLevel=ERROR` so its own notices (host
//! key additions, banners) stay off stderr.

use super::Fetcher;
use async_trait::async_trait;
use raidwatch_common::{Query, RawResult};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, error, info};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SshFetcherConfig {
    /// ssh client executable
    pub ssh_binary: PathBuf,
    pub host: String,
    pub port: u16,
    pub user: String,
    /// Private key used for authentication (ssh default keys when unset)
    pub identity_file: Option<PathBuf>,
    /// Value for ssh's StrictHostKeyChecking option
    pub host_key_checking: String,
    pub connect_timeout_secs: u64,
    /// Upper bound for a whole remote command
    pub command_timeout_secs: u64,
    /// Directory holding the MegaCli binary on the host
    pub megacli_path: String,
    /// Adapter command; `{id}` is replaced by the adapter number
    pub get_adapter: String,
    /// Logical disk command; `{id}` is replaced by the virtual drive number
    pub get_ld: String,
    /// Physical disk command; `{enclosure}` and `{slot}` are replaced
    pub get_pd: String,
}

impl Default for SshFetcherConfig {
    fn default() -> Self {
        Self {
            ssh_binary: PathBuf::from("ssh"),
            host: "esxi.local".to_string(),
            port: 22,
            user: "root".to_string(),
            identity_file: None,
            host_key_checking: "accept-new".to_string(),
            connect_timeout_secs: 10,
            command_timeout_secs: 60,
            megacli_path: "/opt/lsi/MegaCLI".to_string(),
            get_adapter: "./MegaCli -AdpAllInfo -a{id} -NoLog".to_string(),
            get_ld: "./MegaCli -LDInfo -L{id} -a0 -NoLog".to_string(),
            get_pd: "./MegaCli -pdInfo -PhysDrv[{enclosure}:{slot}] -a0 -NoLog".to_string(),
        }
    }
}

pub struct SshFetcher {
    config: SshFetcherConfig,
}

impl SshFetcher {
    pub fn new(config: SshFetcherConfig) -> Self {
        debug!(host = %config.host, "SSH fetcher initialized");
        Self { config }
    }

    /// Shell command executed on the host for a query
    pub fn remote_command(&self, query: &Query) -> String {
        let command = match query {
            Query::Adapter { id } => self.config.get_adapter.replace("{id}", &id.to_string()),
            Query::LogicalDisk { id } => self.config.get_ld.replace("{id}", &id.to_string()),
            Query::PhysicalDisk { enclosure, slot } => self
                .config
                .get_pd
                .replace("{enclosure}", &enclosure.to_string())
                .replace("{slot}", &slot.to_string()),
        };

        format!("cd {} && {}", shell_quote(&self.config.megacli_path), command)
    }

    /// Arguments passed to the ssh client, remote command last
    pub fn ssh_args(&self, remote_command: &str) -> Vec<String> {
        let mut args = vec![
            "-o".to_string(),
            "BatchMode=yes".to_string(),
            "-o".to_string(),
            "LogLevel=ERROR".to_string(),
            "-o".to_string(),
            format!("StrictHostKeyChecking={}", self.config.host_key_checking),
            "-o".to_string(),
            format!("ConnectTimeout={}", self.config.connect_timeout_secs),
            "-p".to_string(),
            self.config.port.to_string(),
            "-l".to_string(),
            self.config.user.clone(),
        ];

        if let Some(ref identity) = self.config.identity_file {
            args.push("-i".to_string());
            args.push(identity.display().to_string());
        }

        args.push(self.config.host.clone());
        args.push(remote_command.to_string());
        args
    }

    async fn execute_command(&self, remote_command: &str) -> RawResult {
        debug!(host = %self.config.host, command = remote_command, "Executing command");

        let mut cmd = Command::new(&self.config.ssh_binary);
        cmd.args(self.ssh_args(remote_command))
            .stdin(Stdio::null())
            .kill_on_drop(true);

        let output = match tokio::time::timeout(
            Duration::from_secs(self.config.command_timeout_secs),
            cmd.output(),
        )
        .await
        {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                error!(host = %self.config.host, "Unable to run ssh: {}", e);
                return RawResult::error(format!("Failed to execute ssh: {}", e));
            }
            Err(_) => {
                error!(host = %self.config.host, "Command timed out");
                return RawResult::error(format!(
                    "Command timed out after {}s",
                    self.config.command_timeout_secs
                ));
            }
        };

        let data_out = String::from_utf8_lossy(&output.stdout).to_string();
        let data_err = String::from_utf8_lossy(&output.stderr).to_string();
        debug!(stdout = %data_out, stderr = %data_err, exit = ?output.status.code(), "Command finished");

        if data_err.is_empty() {
            info!(host = %self.config.host, "Successfully fetched data via SSH");
            RawResult::success(data_out)
        } else {
            error!(host = %self.config.host, "Unable to fetch data: {}", data_err.trim_end());
            RawResult::error(data_err)
        }
    }
}

/// Quote a value for a POSIX shell
fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "'\\''"))
}

#[async_trait]
impl Fetcher for SshFetcher {
    async fn fetch(&self, query: &Query) -> RawResult {
        let command = self.remote_command(query);
        self.execute_command(&command).await
    }
}
