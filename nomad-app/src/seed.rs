use chrono::{DateTime, Utc};
use nomad_shared::{Masked, UserAccount};

/// Test accounts written to an empty registry on first start.
const DEMO_USERS: [(&str, &str, &str, &str); 3] = [
    ("1", "demo", "demo@nomadtrails.com", "Demo123"),
    ("2", "viajero", "viajero@example.com", "Viaje123"),
    ("3", "aventurero", "aventurero@example.com", "Aventura123"),
];

pub fn demo_accounts(now: DateTime<Utc>) -> Vec<UserAccount> {
    DEMO_USERS
        .iter()
        .map(|(id, username, email, password)| UserAccount {
            id: id.to_string(),
            username: username.to_string(),
            email: email.to_string(),
            password: Masked(password.to_string()),
            created_at: now,
        })
        .collect()
}
