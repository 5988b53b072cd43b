use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A review as stored under `destinationReviews[destinationId]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: String,
    pub user_email: String,
    pub username: String,
    pub destination_name: String,
    pub rating: u8,
    pub comment: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    /// Filled in on `list_by_user` results; not part of the stored record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_id: Option<String>,
}

impl Review {
    pub fn is_written_by(&self, email: &str) -> bool {
        self.user_email == email
    }
}
