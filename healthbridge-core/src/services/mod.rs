//! Service layer - business logic orchestration
//!
//! Services coordinate domain logic and port interactions. Each service
//! focuses on a specific use case or feature area.

mod account_store;
mod auth;
pub mod logging;
pub mod migration;
pub mod password;
mod status;

pub use account_store::{AccountStore, StoreObserver, ACCOUNTS_SLOT, QUARANTINE_SLOT};
pub use auth::{AuthService, LoginOutcome, PasswordResetOutcome};
pub use logging::{EntryPoint, LogEntry, LogEvent, LoggingService};
pub use migration::{MigrationResult, MigrationService};
pub use status::{AccountSummary, StatusService, StatusSummary};
