//! raidwatch
//!
//! Checks RAID controller, virtual drive and physical drive health and mails
//! a report when something is wrong.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use raidwatch_agent::config::RaidwatchConfig;
use raidwatch_agent::fetcher::build_fetcher;
use raidwatch_agent::monitor::{Monitor, RunReport};
use raidwatch_agent::notifier::{Dispatch, MailNotifier, NotificationGate};
use raidwatch_agent::output::{self, OutputFormat};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{debug, error, info};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Configuration file (defaults to RAIDWATCH_CONFIG or the standard locations)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    output: OutputFormat,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run all checks once (default)
    Check {
        /// Do not send a notification
        #[arg(long)]
        no_notify: bool,
    },
    /// Run checks periodically until interrupted
    Watch {
        /// Seconds between runs (overrides watch.interval_secs)
        #[arg(short, long)]
        interval: Option<u64>,
    },
    /// Configuration helpers
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print a sample configuration file
    Sample,
    /// Load and validate the configuration
    Validate,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Check { no_notify: false });

    if let Commands::Config { command: ConfigCommands::Sample } = command {
        print!("{}", RaidwatchConfig::generate_sample());
        return Ok(ExitCode::SUCCESS);
    }

    let config = RaidwatchConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;

    if let Commands::Config { command: ConfigCommands::Validate } = command {
        config.validate()?;
        config.validate_notification()?;
        output::print_success("Configuration is valid");
        return Ok(ExitCode::SUCCESS);
    }

    config.validate()?;
    if !matches!(command, Commands::Check { no_notify: true }) {
        config.validate_notification()?;
    }

    config
        .logging
        .init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    let monitor = Monitor::new(build_fetcher(&config.fetcher), config.inventory.clone());

    match command {
        Commands::Watch { interval } => {
            let interval = interval.unwrap_or(config.watch.interval_secs).max(1);
            watch(&config, &monitor, Duration::from_secs(interval)).await;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Check { no_notify } => {
            let report = monitor.run_once().await;
            output::print_report(&report, cli.output)?;
            if !no_notify {
                notify(&config, &report).await;
            }

            if report.is_healthy() {
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::FAILURE)
            }
        }
        Commands::Config { .. } => Ok(ExitCode::SUCCESS),
    }
}

async fn watch<F>(config: &RaidwatchConfig, monitor: &Monitor<F>, interval: Duration)
where
    F: raidwatch_agent::fetcher::Fetcher,
{
    info!(
        interval_secs = interval.as_secs(),
        entities = monitor.inventory().queries().len(),
        "Started RAID watch"
    );

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        let report = monitor.run_once().await;
        notify(config, &report).await;

        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            _ = &mut shutdown => break,
        }
    }

    info!("RAID watch stopped");
}

/// Hand the report to the rate-limited mail notifier
async fn notify(config: &RaidwatchConfig, report: &RunReport) {
    if !config.notification.enabled {
        debug!("Notifications disabled");
        return;
    }

    let notifier = MailNotifier::new(
        config.notification.mail.clone(),
        config.server_name.clone(),
        config.logging.file_path.clone(),
    );
    let gate = NotificationGate::new(notifier, &config.notification);

    match gate.dispatch(report).await {
        Ok(Dispatch::Sent) => info!(level = %report.level, "Notification sent"),
        Ok(Dispatch::RateLimited { retry_in_secs }) => info!(
            level = %report.level,
            "Notification suppressed, next one allowed in {}",
            output::format_duration(retry_in_secs)
        ),
        Ok(Dispatch::BelowThreshold) => debug!(level = %report.level, "No notification required"),
        Err(e) => error!("Notification failed: {}", e),
    }
}

/// Wait for SIGINT or SIGTERM
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        if let Ok(mut sigterm) = signal(SignalKind::terminate()) {
            tokio::select! {
                _ = sigterm.recv() => info!("Received SIGTERM"),
                _ = tokio::signal::ctrl_c() => info!("Received SIGINT"),
            }
            return;
        }
    }

    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Received SIGINT");
    }
}
