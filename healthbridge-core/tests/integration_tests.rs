//! Integration tests for healthbridge-core
//!
//! These tests exercise the account store against every real storage
//! backend, including reopening persisted data and recovering from
//! damaged blobs.
//!
//! Run with: cargo test --test integration_tests -- --nocapture

use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

use healthbridge_core::adapters::duckdb::DuckDbSlotStorage;
use healthbridge_core::adapters::file::FileSlotStorage;
use healthbridge_core::adapters::memory::MemorySlotStorage;
use healthbridge_core::config::{Config, StorageBackend};
use healthbridge_core::ports::SlotStorage;
use healthbridge_core::services::{ACCOUNTS_SLOT, QUARANTINE_SLOT};
use healthbridge_core::{
    AccountStore, Error, HealthBridgeContext, LoginOutcome, PasswordPolicy, SignupForm,
};

// ============================================================================
// Test Helpers
// ============================================================================

fn file_store(dir: &Path) -> AccountStore {
    let storage = FileSlotStorage::new(&dir.join("storage")).expect("Failed to open file storage");
    AccountStore::new(Arc::new(storage), PasswordPolicy::Plaintext)
}

fn duckdb_store(dir: &Path) -> AccountStore {
    let storage =
        DuckDbSlotStorage::new(&dir.join("test.duckdb")).expect("Failed to open database");
    AccountStore::new(Arc::new(storage), PasswordPolicy::Plaintext)
}

/// Registration, lookup and clearing behave the same on every backend
fn exercise_store(store: &AccountStore) {
    let account = store.register("Jane Doe", "jane@x.com", "pw1").unwrap();
    assert_eq!(account.email, "jane@x.com");

    assert!(store.exists("JANE@X.COM"));
    assert!(store.authenticate("Jane@X.com", "pw1"));
    assert!(!store.authenticate("jane@x.com", "PW1"));
    assert!(!store.authenticate("bob@x.com", "pw1"));
    assert_eq!(store.find("jane@x.com").unwrap().full_name, "Jane Doe");

    let dup = store.register("Jane Again", "JANE@x.com", "pw2");
    assert!(matches!(dup, Err(Error::DuplicateAccount(_))));
    assert_eq!(store.count(), 1);

    store.register("Bob Smith", "bob@x.com", "pw2").unwrap();
    let emails: Vec<String> = store.list().into_iter().map(|a| a.email).collect();
    assert_eq!(emails, vec!["jane@x.com", "bob@x.com"]);

    store.clear().unwrap();
    assert!(!store.exists("jane@x.com"));
    assert_eq!(store.count(), 0);
}

// ============================================================================
// Backend Tests
// ============================================================================

#[test]
fn test_file_backend_behaviour() {
    let temp_dir = TempDir::new().unwrap();
    exercise_store(&file_store(temp_dir.path()));
}

#[test]
fn test_duckdb_backend_behaviour() {
    let temp_dir = TempDir::new().unwrap();
    exercise_store(&duckdb_store(temp_dir.path()));
}

#[test]
fn test_memory_backend_behaviour() {
    let store = AccountStore::new(Arc::new(MemorySlotStorage::new()), PasswordPolicy::Plaintext);
    exercise_store(&store);
}

#[test]
fn test_argon2_policy_end_to_end() {
    let temp_dir = TempDir::new().unwrap();
    let storage = Arc::new(FileSlotStorage::new(temp_dir.path()).unwrap());
    let store = AccountStore::new(storage.clone(), PasswordPolicy::Argon2);

    store.register("Jane Doe", "jane@x.com", "pw1").unwrap();
    assert!(store.authenticate("jane@x.com", "pw1"));
    assert!(!store.authenticate("jane@x.com", "pw2"));

    let raw = storage.read(ACCOUNTS_SLOT).unwrap().unwrap();
    let text = String::from_utf8(raw).unwrap();
    assert!(!text.contains("\"pw1\""), "Password must not be stored in clear");
    assert!(text.contains("$argon2"));
}

// ============================================================================
// Persistence Tests
// ============================================================================

/// Accounts survive dropping the store and reopening the same directory
#[test]
fn test_file_accounts_survive_reopen() {
    let temp_dir = TempDir::new().unwrap();
    {
        let store = file_store(temp_dir.path());
        store.register("Jane Doe", "jane@x.com", "pw1").unwrap();
    }

    let store = file_store(temp_dir.path());
    assert!(store.authenticate("jane@x.com", "pw1"));
    assert_eq!(store.count(), 1);
}

#[test]
fn test_duckdb_accounts_survive_reopen() {
    let temp_dir = TempDir::new().unwrap();
    {
        let store = duckdb_store(temp_dir.path());
        store.register("Jane Doe", "jane@x.com", "pw1").unwrap();
    }

    let store = duckdb_store(temp_dir.path());
    assert!(store.exists("JANE@X.COM"));
    assert_eq!(store.find("jane@x.com").unwrap().full_name, "Jane Doe");
}

/// The persisted layout is a JSON array with camelCase fields
#[test]
fn test_persisted_layout() {
    let temp_dir = TempDir::new().unwrap();
    let store = file_store(temp_dir.path());
    let account = store.register("Jane Doe", "jane@x.com", "pw1").unwrap();

    let path = temp_dir.path().join("storage").join("RegisteredUsers.json");
    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();

    let entries = value.as_array().expect("Slot should hold an array");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["id"], account.id.to_string());
    assert_eq!(entries[0]["fullName"], "Jane Doe");
    assert_eq!(entries[0]["email"], "jane@x.com");
    assert_eq!(entries[0]["password"], "pw1");
    assert!(entries[0]["createdAt"].is_string());
}

// ============================================================================
// Recovery Tests
// ============================================================================

/// A corrupt blob reads as empty and is kept aside before the next write
#[test]
fn test_corrupt_blob_is_quarantined() {
    let temp_dir = TempDir::new().unwrap();
    let storage = Arc::new(FileSlotStorage::new(temp_dir.path()).unwrap());
    storage.write(ACCOUNTS_SLOT, b"[{\"broken\": ").unwrap();

    let store = AccountStore::new(storage.clone(), PasswordPolicy::Plaintext);
    assert!(!store.exists("jane@x.com"));
    assert!(matches!(store.read_accounts(), Err(Error::Serialization(_))));

    store.register("Jane Doe", "jane@x.com", "pw1").unwrap();
    assert!(store.exists("jane@x.com"));

    let kept = storage.read(QUARANTINE_SLOT).unwrap().unwrap();
    assert_eq!(kept, b"[{\"broken\": ");
}

#[test]
fn test_cleared_store_accepts_same_email_again() {
    let temp_dir = TempDir::new().unwrap();
    let store = duckdb_store(temp_dir.path());

    store.register("Jane Doe", "jane@x.com", "pw1").unwrap();
    store.clear().unwrap();
    store.register("Jane Doe", "jane@x.com", "pw2").unwrap();

    assert!(store.authenticate("jane@x.com", "pw2"));
    assert!(!store.authenticate("jane@x.com", "pw1"));
}

// ============================================================================
// Context Tests
// ============================================================================

#[test]
fn test_context_honours_configured_backend() {
    let temp_dir = TempDir::new().unwrap();
    let config = Config {
        storage_backend: StorageBackend::DuckDb,
        password_policy: PasswordPolicy::Plaintext,
    };
    config.save(temp_dir.path()).unwrap();

    let ctx = HealthBridgeContext::new(temp_dir.path()).unwrap();
    assert_eq!(ctx.account_store.storage().name(), "duckdb");

    ctx.account_store
        .register("Jane Doe", "jane@x.com", "pw1")
        .unwrap();
    assert!(temp_dir.path().join("healthbridge.duckdb").exists());
}

#[test]
fn test_signup_then_login_flow() {
    let temp_dir = TempDir::new().unwrap();
    let ctx = HealthBridgeContext::new(temp_dir.path()).unwrap();

    let form = SignupForm::new("Jane Doe", "jane@x.com", "pw1", "pw1", true);
    ctx.auth_service.signup(&form).unwrap();

    let outcome = ctx.auth_service.login("JANE@X.COM", "pw1");
    assert!(outcome.is_success());
    assert_eq!(
        ctx.auth_service.login("jane@x.com", "wrong"),
        LoginOutcome::InvalidPassword
    );

    // A second context over the same directory sees the account
    let reopened = HealthBridgeContext::new(temp_dir.path()).unwrap();
    assert!(reopened.account_store.exists("jane@x.com"));
}
