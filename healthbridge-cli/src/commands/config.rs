//! Config command - view and change settings

use anyhow::{bail, Result};
use clap::Subcommand;
use colored::Colorize;
use healthbridge_core::config::{Config, StorageBackend};
use healthbridge_core::LogEvent;

use super::{get_data_dir, get_logger, log_event};
use crate::output;

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Change a setting (storageBackend, passwordHashing)
    Set {
        key: String,
        value: String,
    },
}

/// Each `hb` invocation is its own process, so a memory store would drop
/// every account as soon as the command exits
pub(crate) fn ensure_persistent(config: &Config) -> Result<()> {
    if config.storage_backend == StorageBackend::Memory {
        bail!("The memory backend does not persist between hb commands; use file or duckdb");
    }
    Ok(())
}

pub fn run(command: ConfigCommands) -> Result<()> {
    let data_dir = get_data_dir()?;

    match command {
        ConfigCommands::Show { json } => {
            let config = Config::load(&data_dir)?;
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&serde_json::json!({
                        "storageBackend": config.storage_backend,
                        "passwordHashing": config.password_policy,
                        "dataDir": data_dir.to_string_lossy(),
                    }))?
                );
            } else {
                println!("{}", "Configuration".bold());
                println!("  Storage backend:  {}", config.storage_backend);
                println!("  Password hashing: {}", config.password_policy);
                println!("  Data directory:   {}", data_dir.display());
            }
        }
        ConfigCommands::Set { key, value } => {
            std::fs::create_dir_all(&data_dir)?;
            let mut config = Config::load(&data_dir)?;
            config.set(&key, &value)?;
            ensure_persistent(&config)?;
            config.save(&data_dir)?;

            let logger = get_logger().map(std::sync::Arc::new);
            log_event(&logger, LogEvent::new("config_changed").with_command("config"));
            output::success(&format!("Set {} = {}", key, value));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_backend_rejected() {
        let mut config = Config::default();
        assert!(ensure_persistent(&config).is_ok());

        config.set("storageBackend", "memory").unwrap();
        assert!(ensure_persistent(&config).is_err());

        config.set("storageBackend", "duckdb").unwrap();
        assert!(ensure_persistent(&config).is_ok());
    }
}
