//! Password sealing and comparison under a `PasswordPolicy`

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use rand::rngs::OsRng;

use crate::domain::result::{Error, Result};
use crate::domain::PasswordPolicy;

/// Produce the value written to the account's `password` field
pub fn seal(policy: PasswordPolicy, raw: &str) -> Result<String> {
    match policy {
        PasswordPolicy::Plaintext => Ok(raw.to_string()),
        PasswordPolicy::Argon2 => {
            let salt = SaltString::generate(&mut OsRng);
            Argon2::default()
                .hash_password(raw.as_bytes(), &salt)
                .map(|hash| hash.to_string())
                .map_err(|e| Error::Other(format!("Failed to hash password: {}", e)))
        }
    }
}

/// Compare a supplied password with a stored one
///
/// Plaintext compares exactly (case-sensitive). Under Argon2, stored values
/// that are not PHC strings (accounts written before hashing was enabled)
/// still compare exactly.
pub fn matches(policy: PasswordPolicy, stored: &str, supplied: &str) -> bool {
    match policy {
        PasswordPolicy::Plaintext => stored == supplied,
        PasswordPolicy::Argon2 => match PasswordHash::new(stored) {
            Ok(parsed) => Argon2::default()
                .verify_password(supplied.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => stored == supplied,
        },
    }
}
