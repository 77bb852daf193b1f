//! Signup form domain model

use serde::{Deserialize, Serialize};

use super::result::{Error, Result};

/// Raw input collected by the signup screen
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupForm {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub agree_to_terms: bool,
}

/// Validated registration request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub full_name: String,
    pub email: String,
    pub password: String,
}

impl SignupForm {
    pub fn new(
        full_name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
        confirm_password: impl Into<String>,
        agree_to_terms: bool,
    ) -> Self {
        Self {
            full_name: full_name.into(),
            email: email.into(),
            password: password.into(),
            confirm_password: confirm_password.into(),
            agree_to_terms,
        }
    }

    /// Check the form and produce a registration request
    ///
    /// Name and email are trimmed; the password is kept byte-for-byte.
    pub fn validate(&self) -> Result<NewAccount> {
        let full_name = self.full_name.trim();
        if full_name.is_empty() {
            return Err(Error::validation("Please enter your full name"));
        }

        let email = self.email.trim();
        if email.is_empty() {
            return Err(Error::validation("Please enter your email address"));
        }
        if !looks_like_email(email) {
            return Err(Error::validation("Please enter a valid email address"));
        }

        if self.password.is_empty() {
            return Err(Error::validation("Please enter a password"));
        }
        if self.password != self.confirm_password {
            return Err(Error::validation("Passwords do not match"));
        }

        if !self.agree_to_terms {
            return Err(Error::validation(
                "Please agree to the Terms of Service and Privacy Policy",
            ));
        }

        Ok(NewAccount {
            full_name: full_name.to_string(),
            email: email.to_string(),
            password: self.password.clone(),
        })
    }
}

/// `local@domain` with both parts non-empty and no whitespace
fn looks_like_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !domain.contains('@'),
        None => false,
    }
}
