//! Account store - durable registry of user accounts
//!
//! The whole collection lives as one JSON array in the `RegisteredUsers`
//! slot. Every query decodes the full array; every mutation rewrites it in a
//! single storage write. Nothing is cached between calls.

use std::sync::{Arc, Mutex};

use crate::domain::result::{Error, Result};
use crate::domain::{Account, PasswordPolicy};
use crate::ports::SlotStorage;
use crate::services::password;

/// Slot holding the serialized account array
pub const ACCOUNTS_SLOT: &str = "RegisteredUsers";

/// Slot that receives an undecodable blob before it is overwritten
pub const QUARANTINE_SLOT: &str = "RegisteredUsers-corrupt";

/// Notified when the store recovers from a storage problem
///
/// Implementations must not record account contents.
pub trait StoreObserver: Send + Sync {
    /// A read failed and was treated as an empty collection
    fn read_recovered(&self, error: &Error);

    /// A write failed and nothing was committed
    fn write_failed(&self, _error: &Error) {}
}

pub struct AccountStore {
    storage: Arc<dyn SlotStorage>,
    policy: PasswordPolicy,
    write_lock: Mutex<()>,
    observer: Option<Arc<dyn StoreObserver>>,
}

impl AccountStore {
    pub fn new(storage: Arc<dyn SlotStorage>, policy: PasswordPolicy) -> Self {
        Self {
            storage,
            policy,
            write_lock: Mutex::new(()),
            observer: None,
        }
    }

    /// Attach an observer for recovered read and failed write events
    pub fn with_observer(mut self, observer: Arc<dyn StoreObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn policy(&self) -> PasswordPolicy {
        self.policy
    }

    pub fn storage(&self) -> &Arc<dyn SlotStorage> {
        &self.storage
    }

    // === Operations ===

    /// Register a new account
    ///
    /// Fails with `DuplicateAccount` if the email is already taken under
    /// case-insensitive comparison. The uniqueness check and the write happen
    /// under the store's mutex and the slot's storage lock.
    ///
    /// Surrounding whitespace is trimmed from the email before it is checked
    /// and stored. Only an undecodable blob is recovered from; any other read
    /// failure aborts with `PersistenceWrite` and nothing is written.
    pub fn register(&self, full_name: &str, email: &str, password: &str) -> Result<Account> {
        let email = email.trim();
        if full_name.trim().is_empty() {
            return Err(Error::validation("Full name cannot be empty"));
        }
        if email.is_empty() {
            return Err(Error::validation("Email cannot be empty"));
        }

        let _guard = self
            .write_lock
            .lock()
            .map_err(|e| Error::storage(format!("Lock poisoned: {}", e)))?;
        let _slot_lock = self.storage.lock(ACCOUNTS_SLOT)?;

        let mut accounts = match self.read_accounts() {
            Ok(accounts) => accounts,
            Err(e @ Error::Serialization(_)) => {
                self.recovered(&e);
                self.quarantine()?;
                Vec::new()
            }
            Err(e) => {
                let err = Error::write_failed(format!("existing accounts unreadable: {}", e));
                self.write_failure(&err);
                return Err(err);
            }
        };

        if accounts.iter().any(|a| a.has_email(email)) {
            return Err(Error::duplicate(email));
        }

        let account = Account::new(full_name, email, password::seal(self.policy, password)?);
        accounts.push(account.clone());
        self.persist(&accounts)?;

        Ok(account)
    }

    /// Case-insensitive membership test
    pub fn exists(&self, email: &str) -> bool {
        self.load().iter().any(|a| a.has_email(email))
    }

    /// True iff an account matches the email (case-insensitive) and the
    /// password (exact). Does not say which of the two failed.
    pub fn authenticate(&self, email: &str, password: &str) -> bool {
        self.load()
            .iter()
            .any(|a| a.has_email(email) && password::matches(self.policy, &a.password, password))
    }

    /// First account whose email matches case-insensitively
    pub fn find(&self, email: &str) -> Option<Account> {
        self.load().into_iter().find(|a| a.has_email(email))
    }

    /// Remove every account
    pub fn clear(&self) -> Result<()> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|e| Error::storage(format!("Lock poisoned: {}", e)))?;
        let _slot_lock = self.storage.lock(ACCOUNTS_SLOT)?;

        self.storage.remove(ACCOUNTS_SLOT).map_err(|e| {
            let err = Error::write_failed(e.to_string());
            self.write_failure(&err);
            err
        })
    }

    /// Number of stored accounts
    pub fn count(&self) -> usize {
        self.load().len()
    }

    /// All stored accounts in registration order
    pub fn list(&self) -> Vec<Account> {
        self.load()
    }

    // === Persistence ===

    /// Decode the persisted array, failing on unreadable or malformed data
    pub fn read_accounts(&self) -> Result<Vec<Account>> {
        match self.storage.read(ACCOUNTS_SLOT)? {
            None => Ok(Vec::new()),
            Some(data) => serde_json::from_slice(&data).map_err(|e| decode_error(&e)),
        }
    }

    /// Fail-open read: any failure yields an empty collection
    fn load(&self) -> Vec<Account> {
        self.read_accounts().unwrap_or_else(|e| {
            self.recovered(&e);
            Vec::new()
        })
    }

    fn persist(&self, accounts: &[Account]) -> Result<()> {
        let data = serde_json::to_vec(accounts).map_err(|e| Error::write_failed(e.to_string()))?;
        self.storage.write(ACCOUNTS_SLOT, &data).map_err(|e| {
            let err = Error::write_failed(e.to_string());
            self.write_failure(&err);
            err
        })
    }

    /// Copy an undecodable blob aside so the next write does not destroy it
    fn quarantine(&self) -> Result<()> {
        if let Some(raw) = self.storage.read(ACCOUNTS_SLOT)? {
            self.storage
                .write(QUARANTINE_SLOT, &raw)
                .map_err(|e| Error::write_failed(e.to_string()))?;
        }
        Ok(())
    }

    fn recovered(&self, error: &Error) {
        if let Some(observer) = &self.observer {
            observer.read_recovered(error);
        }
    }

    fn write_failure(&self, error: &Error) {
        if let Some(observer) = &self.observer {
            observer.write_failed(error);
        }
    }
}

/// Decode errors name the category and position only, never blob contents
fn decode_error(e: &serde_json::Error) -> Error {
    let category = match e.classify() {
        serde_json::error::Category::Io => "io error",
        serde_json::error::Category::Syntax => "syntax error",
        serde_json::error::Category::Data => "unexpected data",
        serde_json::error::Category::Eof => "unexpected end of input",
    };
    Error::Serialization(format!("{} at line {} column {}", category, e.line(), e.column()))
}
