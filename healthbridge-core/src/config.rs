//! Configuration management
//!
//! Settings live in `<data_dir>/settings.json`:
//! ```json
//! {
//!   "app": { "storageBackend": "file", "passwordHashing": "plaintext", ... }
//! }
//! ```
//! Keys this crate does not manage are preserved on save.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::domain::PasswordPolicy;

/// Where the account slot is stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// `<data_dir>/storage/<slot>.json`
    #[default]
    File,
    /// `<data_dir>/healthbridge.duckdb`
    DuckDb,
    /// Process-local, lost on exit
    Memory,
}

impl StorageBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageBackend::File => "file",
            StorageBackend::DuckDb => "duckdb",
            StorageBackend::Memory => "memory",
        }
    }
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "file" | "json" => Ok(StorageBackend::File),
            "duckdb" => Ok(StorageBackend::DuckDb),
            "memory" => Ok(StorageBackend::Memory),
            other => Err(format!("unknown storage backend: {}", other)),
        }
    }
}

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    app: AppSettings,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppSettings {
    #[serde(default)]
    storage_backend: StorageBackend,
    #[serde(default)]
    password_hashing: PasswordPolicy,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

/// HealthBridge configuration (simplified view of settings)
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub storage_backend: StorageBackend,
    pub password_policy: PasswordPolicy,
}

impl Config {
    /// Load config from the data directory
    ///
    /// A missing or malformed settings file yields defaults. Environment
    /// variables override the file:
    /// - HEALTHBRIDGE_STORAGE_BACKEND (file | duckdb | memory)
    /// - HEALTHBRIDGE_PASSWORD_HASHING (plaintext | argon2)
    pub fn load(data_dir: &Path) -> Result<Self> {
        let raw = read_settings(data_dir)?;

        let storage_backend = std::env::var("HEALTHBRIDGE_STORAGE_BACKEND")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(raw.app.storage_backend);

        let password_policy = std::env::var("HEALTHBRIDGE_PASSWORD_HASHING")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(raw.app.password_hashing);

        Ok(Self {
            storage_backend,
            password_policy,
        })
    }

    /// Save config to the data directory
    /// Preserves other settings that this crate doesn't manage
    pub fn save(&self, data_dir: &Path) -> Result<()> {
        let mut settings = read_settings(data_dir)?;

        settings.app.storage_backend = self.storage_backend;
        settings.app.password_hashing = self.password_policy;

        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(data_dir.join("settings.json"), content)?;
        Ok(())
    }

    /// Set a managed key from its settings name
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "storageBackend" | "storage-backend" | "storage_backend" => {
                self.storage_backend = value.parse().map_err(anyhow::Error::msg)?;
            }
            "passwordHashing" | "password-hashing" | "password_hashing" => {
                self.password_policy = value.parse().map_err(anyhow::Error::msg)?;
            }
            other => anyhow::bail!("Unknown setting: {}", other),
        }
        Ok(())
    }
}

fn read_settings(data_dir: &Path) -> Result<SettingsFile> {
    let settings_path = data_dir.join("settings.json");
    if !settings_path.exists() {
        return Ok(SettingsFile::default());
    }
    let content = std::fs::read_to_string(&settings_path)?;
    Ok(serde_json::from_str(&content).unwrap_or_default())
}
