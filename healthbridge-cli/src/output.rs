//! Terminal rendering shared by the commands

use anyhow::Result;
use chrono::{TimeZone, Utc};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL_CONDENSED, ContentArrangement, Table};
use healthbridge_core::domain::assessment::RiskLevel;
use serde::Serialize;

pub fn success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

/// Errors and warnings go to stderr so `--json` output stays parseable
pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg.red());
}

pub fn warning(msg: &str) {
    eprintln!("{}", msg.yellow());
}

pub fn info(msg: &str) {
    println!("{}", msg.cyan());
}

pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Table with an optional header row
pub fn table(header: &[&str]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    if !header.is_empty() {
        table.set_header(header.to_vec());
    }
    table
}

/// Two-column label/value table
pub fn details(rows: &[(&str, String)]) -> Table {
    let mut table = table(&[]);
    for (label, value) in rows {
        table.add_row(vec![label.to_string(), value.clone()]);
    }
    table
}

pub fn risk_label(level: RiskLevel) -> String {
    match level {
        RiskLevel::High => level.label().red().bold().to_string(),
        RiskLevel::Medium => level.label().yellow().to_string(),
        RiskLevel::Low | RiskLevel::Good => level.label().green().to_string(),
    }
}

/// Unix milliseconds rendered in UTC
pub fn timestamp_ms(ms: i64) -> String {
    Utc.timestamp_millis_opt(ms)
        .single()
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| ms.to_string())
}
