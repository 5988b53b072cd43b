use nomad_core::validation::{is_valid_email, ValidationError};
use serde::Deserialize;

pub const USERNAME_MIN: usize = 3;
pub const USERNAME_MAX: usize = 20;
pub const PASSWORD_MIN: usize = 6;

/// Registration input.
#[derive(Debug, Clone, Deserialize)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl NewAccount {
    pub fn new(username: impl Into<String>, email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password: password.into(),
        }
    }

    /// Trimmed username and email; the password is kept verbatim.
    pub fn normalized(self) -> Self {
        Self {
            username: self.username.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password,
        }
    }

    /// Every failing field is reported, not just the first.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        errors.extend(validate_username(&self.username));
        errors.extend(validate_email(&self.email));
        errors.extend(validate_password(&self.password));
        errors
    }
}

/// The register form, with its confirmation fields.
#[derive(Debug, Clone, Deserialize)]
pub struct RegistrationForm {
    pub username: String,
    pub email: String,
    pub email_confirm: String,
    pub password: String,
    pub password_confirm: String,
}

impl RegistrationForm {
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = self.as_account().validate();
        if self.email != self.email_confirm {
            errors.push(ValidationError::new("email_confirm", "emails do not match"));
        }
        if self.password != self.password_confirm {
            errors.push(ValidationError::new("password_confirm", "passwords do not match"));
        }
        errors
    }

    pub fn into_account(self) -> NewAccount {
        NewAccount::new(self.username, self.email, self.password)
    }

    fn as_account(&self) -> NewAccount {
        NewAccount::new(self.username.trim(), self.email.trim(), self.password.clone())
    }
}

fn validate_username(username: &str) -> Option<ValidationError> {
    let len = username.trim().chars().count();
    if len == 0 {
        Some(ValidationError::new("username", "username is required"))
    } else if len < USERNAME_MIN {
        Some(ValidationError::new("username", format!("minimum {} characters", USERNAME_MIN)))
    } else if len > USERNAME_MAX {
        Some(ValidationError::new("username", format!("maximum {} characters", USERNAME_MAX)))
    } else {
        None
    }
}

fn validate_email(email: &str) -> Option<ValidationError> {
    let email = email.trim();
    if email.is_empty() {
        Some(ValidationError::new("email", "email is required"))
    } else if !is_valid_email(email) {
        Some(ValidationError::new("email", "invalid email"))
    } else {
        None
    }
}

fn validate_password(password: &str) -> Option<ValidationError> {
    let message = if password.is_empty() {
        "password is required".to_string()
    } else if password.chars().count() < PASSWORD_MIN {
        format!("minimum {} characters", PASSWORD_MIN)
    } else if !password.chars().any(|c| c.is_ascii_uppercase()) {
        "must contain an uppercase letter".to_string()
    } else if !password.chars().any(|c| c.is_ascii_lowercase()) {
        "must contain a lowercase letter".to_string()
    } else if !password.chars().any(|c| c.is_ascii_digit()) {
        "must contain a digit".to_string()
    } else {
        return None;
    };
    Some(ValidationError::new("password", message))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordStrength {
    Weak,
    Medium,
    Strong,
}

/// Scores one point each for: length ≥ 6, length ≥ 10, uppercase, lowercase,
/// digit, symbol. 0–2 is weak, 3–4 medium, 5–6 strong.
pub fn password_strength(password: &str) -> (u8, PasswordStrength) {
    let len = password.chars().count();
    let checks = [
        len >= 6,
        len >= 10,
        password.chars().any(|c| c.is_ascii_uppercase()),
        password.chars().any(|c| c.is_ascii_lowercase()),
        password.chars().any(|c| c.is_ascii_digit()),
        password.chars().any(|c| !c.is_ascii_alphanumeric()),
    ];
    let score = checks.iter().filter(|&&ok| ok).count() as u8;
    let level = match score {
        0..=2 => PasswordStrength::Weak,
        3..=4 => PasswordStrength::Medium,
        _ => PasswordStrength::Strong,
    };
    (score, level)
}
