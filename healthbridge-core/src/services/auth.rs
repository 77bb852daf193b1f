//! Auth service - login, signup and password-reset flows
//!
//! These are the decisions the login and signup screens make on top of the
//! account store. Each outcome carries the alert title and message shown to
//! the user.

use std::sync::Arc;

use serde::Serialize;

use crate::domain::result::Result;
use crate::domain::{Account, SignupForm};
use crate::services::AccountStore;

/// Result of a login attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    MissingEmail,
    MissingPassword,
    AccountNotFound,
    InvalidPassword,
    Authenticated(Account),
}

impl LoginOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, LoginOutcome::Authenticated(_))
    }

    /// Stable identifier, safe to log
    pub fn kind(&self) -> &'static str {
        match self {
            LoginOutcome::MissingEmail => "missing_email",
            LoginOutcome::MissingPassword => "missing_password",
            LoginOutcome::AccountNotFound => "account_not_found",
            LoginOutcome::InvalidPassword => "invalid_password",
            LoginOutcome::Authenticated(_) => "authenticated",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            LoginOutcome::MissingEmail => "Missing Email",
            LoginOutcome::MissingPassword => "Missing Password",
            LoginOutcome::AccountNotFound => "Account Not Found",
            LoginOutcome::InvalidPassword => "Invalid Password",
            LoginOutcome::Authenticated(_) => "Welcome",
        }
    }

    pub fn message(&self) -> String {
        match self {
            LoginOutcome::MissingEmail => "Please enter your email address".to_string(),
            LoginOutcome::MissingPassword => "Please enter your password".to_string(),
            LoginOutcome::AccountNotFound => "No account found with this email address. \
                 Please create an account first or check your email."
                .to_string(),
            LoginOutcome::InvalidPassword => {
                "The password you entered is incorrect. Please try again.".to_string()
            }
            LoginOutcome::Authenticated(account) => {
                format!("Welcome back, {}!", account.full_name)
            }
        }
    }

    pub fn account(&self) -> Option<&Account> {
        match self {
            LoginOutcome::Authenticated(account) => Some(account),
            _ => None,
        }
    }
}

/// Result of a "Forgot Password?" request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PasswordResetOutcome {
    EnterEmail,
    AccountNotFound,
    /// The account exists; reset itself is not offered yet
    ResetUnavailable,
}

impl PasswordResetOutcome {
    pub fn title(&self) -> &'static str {
        match self {
            PasswordResetOutcome::EnterEmail => "Enter Email",
            PasswordResetOutcome::AccountNotFound => "Account Not Found",
            PasswordResetOutcome::ResetUnavailable => "Password Reset",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            PasswordResetOutcome::EnterEmail => {
                "Please enter your email address first, then tap 'Forgot Password?'"
            }
            PasswordResetOutcome::AccountNotFound => "No account found with this email address.",
            PasswordResetOutcome::ResetUnavailable => {
                "Password reset functionality will be available in the next update."
            }
        }
    }
}

/// Login/signup flows over a shared account store
pub struct AuthService {
    store: Arc<AccountStore>,
}

impl AuthService {
    pub fn new(store: Arc<AccountStore>) -> Self {
        Self { store }
    }

    /// Check input, then credentials, then existence
    ///
    /// `authenticate` alone cannot tell a wrong password from an unknown
    /// email, so a failed check is followed by `exists`.
    pub fn login(&self, email: &str, password: &str) -> LoginOutcome {
        let email = email.trim();
        if email.is_empty() {
            return LoginOutcome::MissingEmail;
        }
        if password.is_empty() {
            return LoginOutcome::MissingPassword;
        }

        if self.store.authenticate(email, password) {
            if let Some(account) = self.store.find(email) {
                return LoginOutcome::Authenticated(account);
            }
        }

        if self.store.exists(email) {
            LoginOutcome::InvalidPassword
        } else {
            LoginOutcome::AccountNotFound
        }
    }

    pub fn forgot_password(&self, email: &str) -> PasswordResetOutcome {
        let email = email.trim();
        if email.is_empty() {
            PasswordResetOutcome::EnterEmail
        } else if self.store.exists(email) {
            PasswordResetOutcome::ResetUnavailable
        } else {
            PasswordResetOutcome::AccountNotFound
        }
    }

    /// Validate the signup form and register the account
    pub fn signup(&self, form: &SignupForm) -> Result<Account> {
        let request = form.validate()?;
        self.store
            .register(&request.full_name, &request.email, &request.password)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::MemorySlotStorage;
    use crate::domain::result::Error;
    use crate::domain::PasswordPolicy;

    fn service() -> AuthService {
        let storage = Arc::new(MemorySlotStorage::new());
        let store = Arc::new(AccountStore::new(storage, PasswordPolicy::Plaintext));
        store.register("Jane Doe", "jane@x.com", "pw1").unwrap();
        AuthService::new(store)
    }

    #[test]
    fn test_login_success() {
        let auth = service();
        let outcome = auth.login("JANE@x.com", "pw1");
        assert!(outcome.is_success());
        assert_eq!(outcome.account().unwrap().full_name, "Jane Doe");
        assert_eq!(outcome.message(), "Welcome back, Jane Doe!");
    }

    #[test]
    fn test_login_missing_input() {
        let auth = service();
        assert_eq!(auth.login("", "pw1"), LoginOutcome::MissingEmail);
        assert_eq!(auth.login("   ", "pw1"), LoginOutcome::MissingEmail);
        assert_eq!(auth.login("jane@x.com", ""), LoginOutcome::MissingPassword);
    }

    #[test]
    fn test_login_distinguishes_failures() {
        let auth = service();

        let wrong = auth.login("jane@x.com", "nope");
        assert_eq!(wrong, LoginOutcome::InvalidPassword);
        assert_eq!(wrong.title(), "Invalid Password");

        let unknown = auth.login("bob@x.com", "pw1");
        assert_eq!(unknown, LoginOutcome::AccountNotFound);
        assert_eq!(unknown.title(), "Account Not Found");
        assert_eq!(unknown.kind(), "account_not_found");
    }

    #[test]
    fn test_forgot_password() {
        let auth = service();
        assert_eq!(auth.forgot_password(""), PasswordResetOutcome::EnterEmail);
        assert_eq!(auth.forgot_password("bob@x.com"), PasswordResetOutcome::AccountNotFound);
        assert_eq!(
            auth.forgot_password("Jane@X.com"),
            PasswordResetOutcome::ResetUnavailable
        );
    }

    #[test]
    fn test_signup_registers_account() {
        let auth = service();
        let form = SignupForm::new(" Bob Smith ", "bob@x.com", "hunter2", "hunter2", true);

        let account = auth.signup(&form).unwrap();
        assert_eq!(account.full_name, "Bob Smith");
        assert!(auth.login("bob@x.com", "hunter2").is_success());
    }

    #[test]
    fn test_signup_surfaces_duplicate() {
        let auth = service();
        let form = SignupForm::new("Jane Again", "JANE@X.COM", "pw2", "pw2", true);
        assert!(matches!(auth.signup(&form), Err(Error::DuplicateAccount(_))));
    }

    #[test]
    fn test_signup_validation_runs_first() {
        let auth = service();
        let form = SignupForm::new("Bob", "bob@x.com", "a", "b", true);
        assert!(matches!(auth.signup(&form), Err(Error::Validation(_))));
        assert_eq!(auth.login("bob@x.com", "a"), LoginOutcome::AccountNotFound);
    }
}
