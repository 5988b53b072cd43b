pub mod community;
pub mod favorites;
pub mod reviews;

pub use community::{CommunityStore, NewPost, PostSort};
pub use favorites::FavoritesStore;
pub use reviews::{average, ReviewsStore};

use nomad_core::validation::{summarize, ValidationError};
use nomad_core::CoreError;

#[derive(Debug, thiserror::Error)]
pub enum SocialError {
    #[error("Validation failed: {}", summarize(.0))]
    Validation(Vec<ValidationError>),

    #[error("Destination {0} already reviewed by this user")]
    AlreadyReviewed(String),

    #[error("Review not found: {0}")]
    ReviewNotFound(String),

    #[error("Post not found: {0}")]
    PostNotFound(String),

    #[error("Review {0} belongs to another user")]
    Forbidden(String),

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type SocialResult<T> = Result<T, SocialError>;
