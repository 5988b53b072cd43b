pub mod manager;
pub mod preferences;
pub mod validation;

pub use manager::AccountManager;
pub use preferences::LanguagePreference;
pub use validation::{password_strength, NewAccount, PasswordStrength, RegistrationForm};

use nomad_core::validation::{summarize, ValidationError};
use nomad_core::CoreError;

#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error("Validation failed: {}", summarize(.0))]
    Validation(Vec<ValidationError>),

    #[error("Email already registered: {0}")]
    EmailTaken(String),

    /// Deliberately does not say whether the email or the password was wrong.
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type AccountResult<T> = Result<T, AccountError>;
