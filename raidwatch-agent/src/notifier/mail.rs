//! E-mail notifier

use super::Notifier;
use crate::monitor::{Level, RunReport};
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::extension::ClientId;
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use raidwatch_common::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, error};

/// SMTP delivery settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MailConfig {
    pub server: String,
    pub port: u16,
    /// Upgrade the connection with STARTTLS
    pub starttls: bool,
    /// Name announced in EHLO; lettre picks the local hostname when unset
    pub hello_name: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub sender: String,
    pub recipients: Vec<String>,
    /// Number of trailing log lines appended to the report
    pub log_tail_lines: usize,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            server: "localhost".to_string(),
            port: 587,
            starttls: true,
            hello_name: None,
            user: None,
            password: None,
            sender: "raidwatch@localhost".to_string(),
            recipients: vec![],
            log_tail_lines: 200,
        }
    }
}

pub struct MailNotifier {
    config: MailConfig,
    server_name: String,
    log_file: Option<PathBuf>,
}

impl MailNotifier {
    pub fn new(config: MailConfig, server_name: impl Into<String>, log_file: Option<PathBuf>) -> Self {
        Self {
            config,
            server_name: server_name.into(),
            log_file,
        }
    }

    pub fn subject(&self, level: Level) -> String {
        format!("{} Raid Status Report - {}", self.server_name, level)
    }

    /// Mail body: report summary followed by the log tail, if any
    pub fn compose_body(&self, report: &RunReport, log_tail: Option<&str>) -> String {
        let mut body = format!("RAID Status Report from {}:\r\n", self.server_name);
        body.push_str(&report.render_text());

        if let Some(log) = log_tail {
            body.push_str("\r\n--- log ---\r\n");
            body.push_str(log);
        }

        body
    }

    /// Build the message for a report
    pub fn build_message(&self, level: Level, report: &RunReport, log_tail: Option<&str>) -> Result<Message> {
        let sender: Address = self
            .config
            .sender
            .parse()
            .map_err(|e| Error::Notification(format!("Invalid sender '{}': {}", self.config.sender, e)))?;

        let mut builder = Message::builder()
            .from(Mailbox::new(Some(self.server_name.clone()), sender))
            .subject(self.subject(level))
            .header(ContentType::TEXT_PLAIN);

        for recipient in &self.config.recipients {
            let mailbox: Mailbox = recipient
                .parse()
                .map_err(|e| Error::Notification(format!("Invalid recipient '{}': {}", recipient, e)))?;
            builder = builder.to(mailbox);
        }

        builder
            .body(self.compose_body(report, log_tail))
            .map_err(|e| Error::Notification(format!("Failed to build mail: {}", e)))
    }

    /// Last `log_tail_lines` lines of the log file
    ///
    /// Relies on the file layer writing each event through to disk, so the
    /// current run's events are part of the tail.
    async fn read_log_tail(&self) -> Option<String> {
        let path = self.log_file.as_ref()?;
        match tokio::fs::read_to_string(path).await {
            Ok(contents) => {
                let lines: Vec<&str> = contents.lines().collect();
                let start = lines.len().saturating_sub(self.config.log_tail_lines);
                Some(lines[start..].join("\r\n"))
            }
            Err(e) => {
                debug!(path = %path.display(), "Log file unavailable for mail: {}", e);
                None
            }
        }
    }

    fn transport(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>> {
        let mut builder = if self.config.starttls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.server)
                .map_err(|e| Error::Notification(format!("Invalid SMTP relay: {}", e)))?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&self.config.server)
        };

        builder = builder.port(self.config.port);

        if let Some(ref hello) = self.config.hello_name {
            builder = builder.hello_name(ClientId::Domain(hello.clone()));
        }

        if let (Some(user), Some(password)) = (&self.config.user, &self.config.password) {
            builder = builder.credentials(Credentials::new(user.clone(), password.clone()));
        }

        Ok(builder.build())
    }
}

#[async_trait]
impl Notifier for MailNotifier {
    async fn notify(&self, level: Level, report: &RunReport) -> Result<()> {
        debug!(server = %self.config.server, "Sending Mail");
        let log_tail = self.read_log_tail().await;
        let message = self.build_message(level, report, log_tail.as_deref())?;

        let transport = self.transport()?;
        match transport.send(message).await {
            Ok(_) => {
                debug!("Successfully sent Mail");
                Ok(())
            }
            Err(e) => {
                error!(server = %self.config.server, "Unable to send Mail: {}", e);
                Err(Error::Notification(format!("SMTP delivery failed: {}", e)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitor::EntityReport;
    use raidwatch_common::{FetchStatus, Query};

    fn notifier(recipients: Vec<&str>) -> MailNotifier {
        MailNotifier::new(
            MailConfig {
                sender: "raid@example.com".to_string(),
                recipients: recipients.into_iter().map(String::from).collect(),
                ..Default::default()
            },
            "esx01",
            None,
        )
    }

    fn report() -> RunReport {
        RunReport::new(vec![EntityReport {
            query: Query::LogicalDisk { id: 0 },
            fetch_status: FetchStatus::Success,
            errors: 2,
        }])
    }

    #[test]
    fn test_subject() {
        assert_eq!(notifier(vec![]).subject(Level::FAILED), "esx01 Raid Status Report - 50");
    }

    #[test]
    fn test_body_includes_report_and_log() {
        let body = notifier(vec![]).compose_body(&report(), Some("ERROR State not Optimal"));
        assert!(body.starts_with("RAID Status Report from esx01:\r\n"));
        assert!(body.contains("ld 0"));
        assert!(body.ends_with("ERROR State not Optimal"));
    }

    #[test]
    fn test_build_message() {
        let n = notifier(vec!["admin@example.com", "Ops <ops@example.com>"]);
        let message = n.build_message(Level::FAILED, &report(), None).unwrap();
        let formatted = String::from_utf8(message.formatted()).unwrap();
        assert!(formatted.contains("Subject: esx01 Raid Status Report - 50"));
        assert!(formatted.contains("admin@example.com"));
        assert!(formatted.contains("ops@example.com"));
    }

    #[test]
    fn test_invalid_recipient() {
        let n = notifier(vec!["not an address"]);
        assert!(matches!(
            n.build_message(Level::FAILED, &report(), None),
            Err(Error::Notification(_))
        ));
    }
}
