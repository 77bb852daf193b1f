//! Logs command - inspect the local event log
//!
//! The log holds event names, commands and outcome kinds only, so every
//! column here is safe to print or paste into a bug report.

use std::collections::BTreeMap;

use anyhow::{bail, Result};
use clap::Subcommand;
use colored::Colorize;
use healthbridge_core::{EntryPoint, LogEntry, LoggingService};
use serde::Serialize;

use super::get_data_dir;
use crate::output;

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

#[derive(Subcommand)]
pub enum LogsCommands {
    /// Show recent events
    List {
        /// Number of entries to show
        #[arg(short, long, default_value = "50")]
        limit: usize,
        /// Only failed operations
        #[arg(long)]
        errors: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete old events
    Clear {
        /// Keep the last N days
        #[arg(long, default_value = "30")]
        older_than_days: u64,
        /// Skip confirmation prompt
        #[arg(long, short = 'f')]
        force: bool,
        /// Output as JSON (requires --force)
        #[arg(long)]
        json: bool,
    },
    /// Count events per name and outcome
    Stats {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Default, Serialize)]
struct LogStats {
    total_entries: u64,
    error_count: usize,
    by_event: BTreeMap<String, usize>,
    by_outcome: BTreeMap<String, usize>,
    database_path: String,
}

fn open_log() -> Result<LoggingService> {
    let data_dir = get_data_dir()?;
    std::fs::create_dir_all(&data_dir)?;
    LoggingService::new(&data_dir, EntryPoint::Cli, env!("CARGO_PKG_VERSION"))
}

/// Outcome column: the recorded kind, or the error kind for failures
fn outcome_of(entry: &LogEntry) -> String {
    match (&entry.outcome, &entry.error_message) {
        (Some(kind), _) => kind.clone(),
        (None, Some(message)) => format!("error: {}", message),
        (None, None) => "ok".to_string(),
    }
}

fn tally(entries: &[LogEntry]) -> (BTreeMap<String, usize>, BTreeMap<String, usize>) {
    let mut by_event = BTreeMap::new();
    let mut by_outcome = BTreeMap::new();
    for entry in entries {
        *by_event.entry(entry.event.clone()).or_insert(0) += 1;
        *by_outcome.entry(outcome_of(entry)).or_insert(0) += 1;
    }
    (by_event, by_outcome)
}

pub fn run(command: LogsCommands) -> Result<()> {
    match command {
        LogsCommands::List { limit, errors, json } => {
            let log = open_log()?;
            let entries = if errors {
                log.get_errors(limit)?
            } else {
                log.get_recent(limit)?
            };

            if json {
                return output::json(&entries);
            }
            if entries.is_empty() {
                output::info("No events recorded.");
                return Ok(());
            }

            let mut table = output::table(&["Time", "Source", "Event", "Command", "Outcome"]);
            for entry in &entries {
                let outcome = outcome_of(entry);
                let outcome = if entry.error_message.is_some() {
                    outcome.red().to_string()
                } else {
                    outcome
                };
                table.add_row(vec![
                    output::timestamp_ms(entry.timestamp),
                    entry.entry_point.clone(),
                    entry.event.clone(),
                    entry.command.clone().unwrap_or_default(),
                    outcome,
                ]);
            }
            println!("{}", table);
        }
        LogsCommands::Clear { older_than_days, force, json } => {
            if json && !force {
                bail!("--json cannot prompt for confirmation; pass --force");
            }
            if !force
                && !dialoguer::Confirm::new()
                    .with_prompt(format!("Delete events older than {} days?", older_than_days))
                    .default(false)
                    .interact()?
            {
                println!("{}", "Cancelled".dimmed());
                return Ok(());
            }

            let cutoff = chrono::Utc::now().timestamp_millis() - older_than_days as i64 * DAY_MS;
            let deleted = open_log()?.delete_before(cutoff)?;

            if json {
                output::json(&serde_json::json!({ "deleted": deleted }))?;
            } else {
                output::success(&format!("Deleted {} events", deleted));
            }
        }
        LogsCommands::Stats { json } => {
            let log = open_log()?;
            let total_entries = log.count()?;
            let entries = log.get_recent(total_entries as usize)?;
            let (by_event, by_outcome) = tally(&entries);

            let stats = LogStats {
                total_entries,
                error_count: entries.iter().filter(|e| e.error_message.is_some()).count(),
                by_event,
                by_outcome,
                database_path: log.db_path().display().to_string(),
            };

            if json {
                return output::json(&stats);
            }

            println!("{}", "Event Log".bold());
            println!("  {} events, {} failed", stats.total_entries, stats.error_count);
            println!("  {}", stats.database_path.dimmed());

            let mut table = output::table(&["Event", "Count"]);
            for (event, count) in &stats.by_event {
                table.add_row(vec![event.clone(), count.to_string()]);
            }
            println!("{}", table);

            let mut table = output::table(&["Outcome", "Count"]);
            for (outcome, count) in &stats.by_outcome {
                table.add_row(vec![outcome.clone(), count.to_string()]);
            }
            println!("{}", table);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(event: &str, outcome: Option<&str>, error: Option<&str>) -> LogEntry {
        LogEntry {
            id: 1,
            timestamp: 0,
            entry_point: "cli".to_string(),
            app_version: "0.1.0".to_string(),
            platform: "linux".to_string(),
            event: event.to_string(),
            command: None,
            screen: None,
            outcome: outcome.map(str::to_string),
            error_message: error.map(str::to_string),
            error_details: None,
        }
    }

    #[test]
    fn test_outcome_column() {
        assert_eq!(outcome_of(&entry("login_attempted", Some("invalid_password"), None)), "invalid_password");
        assert_eq!(outcome_of(&entry("account_store_write_failed", None, Some("persistence_write"))), "error: persistence_write");
        assert_eq!(outcome_of(&entry("config_changed", None, None)), "ok");
    }

    #[test]
    fn test_tally_groups_by_event_and_outcome() {
        let entries = vec![
            entry("login_attempted", Some("authenticated"), None),
            entry("login_attempted", Some("account_not_found"), None),
            entry("login_attempted", Some("authenticated"), None),
        ];
        let (by_event, by_outcome) = tally(&entries);
        assert_eq!(by_event["login_attempted"], 3);
        assert_eq!(by_outcome["authenticated"], 2);
        assert_eq!(by_outcome["account_not_found"], 1);
    }
}
