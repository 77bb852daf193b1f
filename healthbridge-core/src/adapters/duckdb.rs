//! DuckDB slot storage implementation

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::thread;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use duckdb::{params, Connection};

use crate::domain::result::{Error, Result};
use crate::migrations::MIGRATIONS;
use crate::ports::SlotStorage;
use crate::services::{MigrationResult, MigrationService};

/// Maximum number of retries when database file is locked
const MAX_RETRIES: u32 = 5;

/// Initial retry delay in milliseconds (doubles each retry: 50, 100, 200, 400, 800ms)
const INITIAL_RETRY_DELAY_MS: u64 = 50;

/// Check if an error message indicates a file locking issue that should be retried
fn is_retryable_error(err_msg: &str) -> bool {
    let lower = err_msg.to_lowercase();
    // Windows error messages
    lower.contains("being used by another process")
        || lower.contains("cannot access the file")
        // Unix/macOS error messages
        || lower.contains("resource temporarily unavailable")
        || lower.contains("database is locked")
        || lower.contains("could not set lock on file")
        || lower.contains("file is already open")
}

fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

/// Slot storage backed by the `sys_slots` table of a DuckDB file
pub struct DuckDbSlotStorage {
    conn: Mutex<Connection>,
    db_path: Option<PathBuf>,
}

impl DuckDbSlotStorage {
    /// Open (or create) a DuckDB-backed slot store
    ///
    /// Includes retry logic with exponential backoff for file locking errors,
    /// which occur when another process holds the database open.
    pub fn new(db_path: &Path) -> Result<Self> {
        let mut last_error = None;

        for attempt in 0..MAX_RETRIES {
            match Self::try_open_connection(db_path) {
                Ok(conn) => {
                    let storage = Self {
                        conn: Mutex::new(conn),
                        db_path: Some(db_path.to_path_buf()),
                    };
                    storage.ensure_schema()?;
                    return Ok(storage);
                }
                Err(e) => {
                    let err_msg = e.to_string();
                    if is_retryable_error(&err_msg) && attempt < MAX_RETRIES - 1 {
                        let delay =
                            Duration::from_millis(INITIAL_RETRY_DELAY_MS * 2u64.pow(attempt));
                        eprintln!(
                            "[healthbridge] Database busy, retrying in {}ms (attempt {}/{}): {}",
                            delay.as_millis(),
                            attempt + 1,
                            MAX_RETRIES,
                            err_msg
                        );
                        thread::sleep(delay);
                        last_error = Some(e);
                        continue;
                    }
                    return Err(e.into());
                }
            }
        }

        Err(last_error.map(Error::from).unwrap_or_else(|| {
            Error::storage(format!("Failed to open database after {} retries", MAX_RETRIES))
        }))
    }

    /// In-memory DuckDB instance, mainly for tests
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let storage = Self {
            conn: Mutex::new(conn),
            db_path: None,
        };
        storage.ensure_schema()?;
        Ok(storage)
    }

    fn try_open_connection(db_path: &Path) -> std::result::Result<Connection, duckdb::Error> {
        // Extension autoloading stays off; the slot table needs no extensions
        let config = duckdb::Config::default().enable_autoload_extension(false)?;
        Connection::open_with_flags(db_path, config)
    }

    fn conn(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| Error::storage(format!("Lock poisoned: {}", e)))
    }

    /// Run pending schema migrations
    pub fn run_migrations(&self) -> Result<MigrationResult> {
        let conn = self.conn()?;
        MigrationService::new(&conn, MIGRATIONS).run_pending()
    }

    /// Ensure database schema exists (runs pending migrations)
    pub fn ensure_schema(&self) -> Result<()> {
        self.run_migrations()?;
        Ok(())
    }

    /// Names of all stored slots
    pub fn slot_names(&self) -> Result<Vec<String>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT slot_name FROM sys_slots ORDER BY slot_name")?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(names)
    }
}

impl SlotStorage for DuckDbSlotStorage {
    fn name(&self) -> &str {
        "duckdb"
    }

    fn location(&self) -> String {
        match &self.db_path {
            Some(path) => path.display().to_string(),
            None => ":memory:".to_string(),
        }
    }

    fn read(&self, slot: &str) -> Result<Option<Vec<u8>>> {
        let conn = self.conn()?;
        let result = conn.query_row(
            "SELECT data FROM sys_slots WHERE slot_name = ?",
            params![slot],
            |row| row.get::<_, Vec<u8>>(0),
        );

        match result {
            Ok(data) => Ok(Some(data)),
            Err(duckdb::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, slot: &str, data: &[u8]) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO sys_slots (slot_name, data, updated_at) VALUES (?, ?, ?)
             ON CONFLICT (slot_name) DO UPDATE SET
                data = EXCLUDED.data,
                updated_at = EXCLUDED.updated_at",
            params![slot, data.to_vec(), now_ms()],
        )?;
        Ok(())
    }

    fn remove(&self, slot: &str) -> Result<()> {
        let conn = self.conn()?;
        conn.execute("DELETE FROM sys_slots WHERE slot_name = ?", params![slot])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_read_missing_slot() {
        let storage = DuckDbSlotStorage::in_memory().unwrap();
        assert_eq!(storage.read("RegisteredUsers").unwrap(), None);
    }

    #[test]
    fn test_write_then_overwrite() {
        let storage = DuckDbSlotStorage::in_memory().unwrap();
        storage.write("RegisteredUsers", b"[1]").unwrap();
        storage.write("RegisteredUsers", b"[1,2]").unwrap();

        assert_eq!(storage.read("RegisteredUsers").unwrap(), Some(b"[1,2]".to_vec()));
        assert_eq!(storage.slot_names().unwrap(), vec!["RegisteredUsers"]);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let storage = DuckDbSlotStorage::in_memory().unwrap();
        storage.write("slot", b"x").unwrap();
        storage.remove("slot").unwrap();
        storage.remove("slot").unwrap();
        assert_eq!(storage.read("slot").unwrap(), None);
    }

    #[test]
    fn test_persists_across_reopen() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("healthbridge.duckdb");

        {
            let storage = DuckDbSlotStorage::new(&db_path).unwrap();
            storage.write("RegisteredUsers", b"[]").unwrap();
        }

        let storage = DuckDbSlotStorage::new(&db_path).unwrap();
        assert_eq!(storage.read("RegisteredUsers").unwrap(), Some(b"[]".to_vec()));
        assert_eq!(storage.location(), db_path.display().to_string());
    }

    #[test]
    fn test_migrations_are_idempotent() {
        let storage = DuckDbSlotStorage::in_memory().unwrap();
        let again = storage.run_migrations().unwrap();
        assert!(again.applied.is_empty());
        assert_eq!(again.already_applied, MIGRATIONS.len());
    }

    #[test]
    fn test_retryable_errors() {
        assert!(is_retryable_error("IO Error: Could not set lock on file"));
        assert!(is_retryable_error("The process cannot access the file"));
        assert!(!is_retryable_error("Catalog Error: Table does not exist"));
    }
}
