//! CLI command implementations

pub mod account;
pub mod assess;
pub mod config;
pub mod logs;
pub mod status;

use std::io::BufRead;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use dialoguer::Password;
use healthbridge_core::{EntryPoint, HealthBridgeContext, LogEvent, LoggingService, StoreObserver};

use crate::output;

/// Get the logging service for CLI operations
///
/// Returns None if logging fails to initialize (shouldn't block operations)
pub fn get_logger() -> Option<LoggingService> {
    let data_dir = get_data_dir().ok()?;
    std::fs::create_dir_all(&data_dir).ok()?;
    LoggingService::new(&data_dir, EntryPoint::Cli, env!("CARGO_PKG_VERSION")).ok()
}

/// Log an event, ignoring any errors (logging should never break the app)
pub fn log_event(logger: &Option<Arc<LoggingService>>, event: LogEvent) {
    if let Some(l) = logger {
        let _ = l.log(event);
    }
}

/// Get the data directory from environment or default
pub fn get_data_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("HEALTHBRIDGE_DIR") {
        return Ok(PathBuf::from(dir));
    }
    dirs::home_dir()
        .map(|home| home.join(".healthbridge"))
        .ok_or_else(|| anyhow!("Could not find home directory; set HEALTHBRIDGE_DIR"))
}

/// Build a context whose store reports recoveries to the event log
///
/// Returns the logger alongside so commands can record their own outcome.
pub fn get_context() -> Result<(HealthBridgeContext, Option<Arc<LoggingService>>)> {
    let data_dir = get_data_dir()?;

    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("Failed to create data directory: {:?}", data_dir))?;

    let logger = get_logger().map(Arc::new);
    let observer = logger
        .as_ref()
        .map(|l| Arc::clone(l) as Arc<dyn StoreObserver>);

    let ctx = HealthBridgeContext::with_observer(&data_dir, observer)
        .context("Failed to initialize healthbridge context")?;
    if config::ensure_persistent(&ctx.config).is_err() {
        output::warning("Storage backend is 'memory': changes are lost when this command exits.");
    }
    Ok((ctx, logger))
}

/// Use the given password, prompt on a terminal, or read one line from stdin
pub fn read_password(given: Option<String>, prompt: &str, confirm: bool) -> Result<String> {
    if let Some(password) = given {
        return Ok(password);
    }

    if atty::is(atty::Stream::Stdin) {
        let mut input = Password::new().with_prompt(prompt).allow_empty_password(true);
        if confirm {
            input = input.with_confirmation("Confirm password", "Passwords do not match");
        }
        return Ok(input.interact()?);
    }

    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read password from stdin")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
