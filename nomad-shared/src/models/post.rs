use crate::models::destination::DestinationSnapshot;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostAuthor {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// A traveler's story in the `communityPosts` feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunityPost {
    pub id: String,
    pub user: PostAuthor,
    pub destination: DestinationSnapshot,
    pub rating: u8,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub likes: u32,
    #[serde(default)]
    pub comments: u32,
    /// Emails of the users who liked the post; `likes` may also count seeded likes.
    #[serde(default)]
    pub liked_by: Vec<String>,
}

impl CommunityPost {
    pub fn is_liked_by(&self, email: &str) -> bool {
        self.liked_by.iter().any(|e| e == email)
    }

    /// Flip `email`'s like and adjust the counter. Returns true if now liked.
    pub fn toggle_like(&mut self, email: &str) -> bool {
        match self.liked_by.iter().position(|e| e == email) {
            Some(index) => {
                self.liked_by.remove(index);
                self.likes = self.likes.saturating_sub(1);
                false
            }
            None => {
                self.liked_by.push(email.to_string());
                self.likes = self.likes.saturating_add(1);
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_like_is_per_user() {
        let mut post = CommunityPost {
            id: "POST1".to_string(),
            user: PostAuthor { name: "María García".to_string(), email: None, avatar: None },
            destination: DestinationSnapshot::new("kioto-japon", "Kioto", "Japón"),
            rating: 5,
            description: "Templos preciosos".to_string(),
            image: None,
            date: Utc::now(),
            likes: 10,
            comments: 0,
            liked_by: vec![],
        };

        assert!(post.toggle_like("alice@example.com"));
        assert!(post.toggle_like("bob@example.com"));
        assert_eq!(post.likes, 12);

        assert!(!post.toggle_like("alice@example.com"));
        assert_eq!(post.likes, 11);
        assert!(!post.is_liked_by("alice@example.com"));
        assert!(post.is_liked_by("bob@example.com"));

        let json = serde_json::to_value(&post).unwrap();
        assert_eq!(json["likedBy"][0], "bob@example.com");
    }
}
