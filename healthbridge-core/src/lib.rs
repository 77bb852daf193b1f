//! HealthBridge Core - local account store and health check logic
//!
//! This crate implements the core domain logic following hexagonal architecture:
//!
//! - **domain**: Core entities (Account, SignupForm, HealthCheck, etc.)
//! - **ports**: Trait definitions for external dependencies (SlotStorage)
//! - **services**: Business logic orchestration (AccountStore, AuthService)
//! - **adapters**: Concrete storage implementations (file, DuckDB, memory)

pub mod domain;
pub mod ports;
pub mod services;
pub mod adapters;
pub mod config;
pub mod migrations;
pub mod log_migrations;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};

use adapters::duckdb::DuckDbSlotStorage;
use adapters::file::FileSlotStorage;
use adapters::memory::MemorySlotStorage;
use config::{Config, StorageBackend};
use ports::SlotStorage;
use services::StatusService;

// Re-export commonly used types at crate root
pub use domain::{
    analyze_health, Account, Assessment, HealthCheck, PasswordPolicy, SignupForm, VitalSigns,
};
pub use domain::result::{Error, OperationResult};
pub use services::{
    AccountStore, AuthService, EntryPoint, LogEntry, LogEvent, LoggingService, LoginOutcome,
    PasswordResetOutcome, StoreObserver,
};

/// Main context for HealthBridge operations
///
/// This is the primary entry point for all business logic. It holds the
/// configuration, the shared account store, and the services built on it.
pub struct HealthBridgeContext {
    pub config: Config,
    pub data_dir: PathBuf,
    pub account_store: Arc<AccountStore>,
    pub auth_service: AuthService,
    pub status_service: StatusService,
}

impl HealthBridgeContext {
    /// Create a new context rooted at `data_dir`
    pub fn new(data_dir: &Path) -> Result<Self> {
        Self::with_observer(data_dir, None)
    }

    /// Create a context whose store reports recovered reads and failed writes
    pub fn with_observer(
        data_dir: &Path,
        observer: Option<Arc<dyn StoreObserver>>,
    ) -> Result<Self> {
        let config = Config::load(data_dir)?;
        let storage = open_storage(data_dir, config.storage_backend)?;

        let mut store = AccountStore::new(storage, config.password_policy);
        if let Some(observer) = observer {
            store = store.with_observer(observer);
        }
        let account_store = Arc::new(store);

        let auth_service = AuthService::new(Arc::clone(&account_store));
        let status_service = StatusService::new(Arc::clone(&account_store));

        Ok(Self {
            config,
            data_dir: data_dir.to_path_buf(),
            account_store,
            auth_service,
            status_service,
        })
    }
}

/// Open the configured storage backend under `data_dir`
pub fn open_storage(data_dir: &Path, backend: StorageBackend) -> Result<Arc<dyn SlotStorage>> {
    let storage: Arc<dyn SlotStorage> = match backend {
        StorageBackend::File => {
            let dir = data_dir.join("storage");
            Arc::new(
                FileSlotStorage::new(&dir)
                    .with_context(|| format!("Failed to open storage directory: {:?}", dir))?,
            )
        }
        StorageBackend::DuckDb => {
            let db_path = data_dir.join("healthbridge.duckdb");
            Arc::new(
                DuckDbSlotStorage::new(&db_path)
                    .with_context(|| format!("Failed to open database: {:?}", db_path))?,
            )
        }
        StorageBackend::Memory => Arc::new(MemorySlotStorage::new()),
    };
    Ok(storage)
}
