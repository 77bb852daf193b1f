//! Status service - account store summary

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::Account;
use crate::services::AccountStore;

/// Status service for store summaries
pub struct StatusService {
    store: Arc<AccountStore>,
}

impl StatusService {
    pub fn new(store: Arc<AccountStore>) -> Self {
        Self { store }
    }

    /// Get overall status summary
    pub fn get_status(&self) -> StatusSummary {
        let accounts = self.store.list();
        let storage = self.store.storage();

        StatusSummary {
            total_accounts: accounts.len(),
            storage_backend: storage.name().to_string(),
            storage_location: storage.location(),
            password_hashing: self.store.policy().to_string(),
            accounts: accounts.iter().map(AccountSummary::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StatusSummary {
    pub total_accounts: usize,
    pub storage_backend: String,
    pub storage_location: String,
    pub password_hashing: String,
    pub accounts: Vec<AccountSummary>,
}

/// Account view without the password field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountSummary {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Account> for AccountSummary {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id.to_string(),
            full_name: account.full_name.clone(),
            email: account.email.clone(),
            created_at: account.created_at,
        }
    }
}
