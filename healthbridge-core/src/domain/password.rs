//! Password storage policy

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How the `password` field of an account is written
///
/// `Plaintext` keeps the supplied string as-is. This is the historical
/// behavior of the account store and is insecure; `Argon2` stores an
/// Argon2id PHC string instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PasswordPolicy {
    #[default]
    Plaintext,
    Argon2,
}

impl PasswordPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            PasswordPolicy::Plaintext => "plaintext",
            PasswordPolicy::Argon2 => "argon2",
        }
    }
}

impl fmt::Display for PasswordPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PasswordPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "plaintext" | "plain" | "none" => Ok(PasswordPolicy::Plaintext),
            "argon2" | "argon2id" => Ok(PasswordPolicy::Argon2),
            other => Err(format!("unknown password hashing policy: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_plaintext() {
        assert_eq!(PasswordPolicy::default(), PasswordPolicy::Plaintext);
    }

    #[test]
    fn test_parse() {
        assert_eq!("ARGON2".parse::<PasswordPolicy>(), Ok(PasswordPolicy::Argon2));
        assert_eq!("plaintext".parse::<PasswordPolicy>(), Ok(PasswordPolicy::Plaintext));
        assert!("md5".parse::<PasswordPolicy>().is_err());
    }
}
