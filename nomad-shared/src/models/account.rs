use crate::ids::new_id;
use crate::pii::Masked;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered account as kept in the `registeredUsers` array.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAccount {
    pub id: String,
    pub username: String,
    pub email: String,
    pub password: Masked<String>,
    pub created_at: DateTime<Utc>,
}

impl UserAccount {
    pub fn new(username: String, email: String, password: String, created_at: DateTime<Utc>) -> Self {
        Self {
            id: new_id(""),
            username,
            email,
            password: Masked(password),
            created_at,
        }
    }

    /// Exact credential match. Callers must not reveal which half failed.
    pub fn credentials_match(&self, email: &str, password: &str) -> bool {
        self.email == email && self.password.expose() == password
    }

    pub fn session(&self) -> Session {
        Session {
            id: self.id.clone(),
            username: self.username.clone(),
            email: self.email.clone(),
        }
    }
}

/// The logged-in user, persisted under `currentUser`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub username: String,
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_json_shape() {
        let account = UserAccount::new(
            "alice".to_string(),
            "alice@example.com".to_string(),
            "Passw0rd!".to_string(),
            Utc::now(),
        );
        let json = serde_json::to_value(&account).unwrap();

        assert_eq!(json["password"], "Passw0rd!");
        assert!(json.get("createdAt").is_some());
        // Debug output never carries the password
        assert!(!format!("{:?}", account).contains("Passw0rd!"));
    }

    #[test]
    fn test_session_projection() {
        let account = UserAccount::new(
            "alice".to_string(),
            "alice@example.com".to_string(),
            "Passw0rd!".to_string(),
            Utc::now(),
        );
        let session = account.session();
        assert_eq!(session.id, account.id);
        assert_eq!(session.username, "alice");
        assert!(account.credentials_match("alice@example.com", "Passw0rd!"));
        assert!(!account.credentials_match("alice@example.com", "passw0rd!"));
    }
}
