//! Output formatting for the command line
//!
//! Reports are printed as a table, JSON or YAML.

use crate::monitor::{EntityReport, RunReport};
use colored::Colorize;
use raidwatch_common::FetchStatus;
use serde::Serialize;
use tabled::{Table, Tabled};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Yaml,
}

/// One table row per checked entity
#[derive(Tabled)]
pub struct EntityRow {
    #[tabled(rename = "Entity")]
    pub entity: String,
    #[tabled(rename = "Kind")]
    pub kind: String,
    #[tabled(rename = "Fetch")]
    pub fetch: String,
    #[tabled(rename = "Errors")]
    pub errors: u32,
}

impl From<&EntityReport> for EntityRow {
    fn from(report: &EntityReport) -> Self {
        Self {
            entity: report.query.to_string(),
            kind: report.kind().to_string(),
            fetch: report.fetch_status.to_string(),
            errors: report.errors,
        }
    }
}

/// Print a run report in the specified format
pub fn print_report(report: &RunReport, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Table => print_report_table(report),
        OutputFormat::Json => print_json(report)?,
        OutputFormat::Yaml => print_yaml(report)?,
    }
    Ok(())
}

fn print_report_table(report: &RunReport) {
    let rows: Vec<EntityRow> = report.entities.iter().map(EntityRow::from).collect();
    if rows.is_empty() {
        println!("{}", "No entities checked".yellow());
    } else {
        println!("{}", Table::new(rows));
    }

    let failed_fetches = report
        .entities
        .iter()
        .filter(|e| e.fetch_status != FetchStatus::Success)
        .count();
    if failed_fetches > 0 {
        print_warning(&format!("{} fetch(es) did not succeed", failed_fetches));
    }

    if report.is_healthy() {
        print_success("RAID status check completed without errors");
    } else {
        print_error(&format!(
            "RAID status check completed with {} error(s)",
            report.total_errors
        ));
    }
}

/// Print data as pretty-printed JSON
pub fn print_json<T: Serialize>(data: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(data)?;
    println!("{}", json);
    Ok(())
}

/// Print data as YAML
pub fn print_yaml<T: Serialize>(data: &T) -> anyhow::Result<()> {
    let yaml = serde_yaml::to_string(data)?;
    println!("{}", yaml);
    Ok(())
}

/// Print a success message with green checkmark
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message.green());
}

/// Print an error message with red X
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message.red());
}

/// Print a warning message with yellow triangle
pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow().bold(), message.yellow());
}

/// Format duration in seconds to human-readable string
pub fn format_duration(secs: u64) -> String {
    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        let m = secs / 60;
        let s = secs % 60;
        if s > 0 {
            format!("{}m {}s", m, s)
        } else {
            format!("{}m", m)
        }
    } else {
        let h = secs / 3600;
        let m = (secs % 3600) / 60;
        if m > 0 {
            format!("{}h {}m", h, m)
        } else {
            format!("{}h", h)
        }
    }
}
