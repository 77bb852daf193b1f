//! Registered user account

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered user credential record
///
/// Field names map 1:1 onto the persisted JSON array
/// (`id`, `fullName`, `email`, `password`, `createdAt`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: Uuid,
    pub full_name: String,
    /// Stored as supplied; matched case-insensitively
    pub email: String,
    /// Plaintext or an Argon2 PHC string, depending on the password policy
    pub password: String,
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Create a new account with a fresh id and the current timestamp
    pub fn new(
        full_name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            full_name: full_name.into(),
            email: email.into(),
            password: password.into(),
            created_at: Utc::now(),
        }
    }

    /// Case-insensitive email comparison
    pub fn has_email(&self, email: &str) -> bool {
        normalize_email(&self.email) == normalize_email(email)
    }
}

/// Lowercase form used for every email comparison
pub fn normalize_email(email: &str) -> String {
    email.to_lowercase()
}
