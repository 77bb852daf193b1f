//! Core domain entities
//!
//! All business entities are defined here. These are pure data structures
//! with validation logic - no I/O or external dependencies.

mod account;
pub mod assessment;
mod password;
pub mod result;
mod signup;

pub use account::{normalize_email, Account};
pub use assessment::{analyze_health, Assessment, HealthCheck, HealthRisk, RiskLevel, VitalSigns};
pub use password::PasswordPolicy;
pub use signup::{NewAccount, SignupForm};
