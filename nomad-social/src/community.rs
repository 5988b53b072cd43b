use crate::reviews::{MAX_RATING, MIN_RATING};
use crate::{SocialError, SocialResult};
use nomad_core::validation::ValidationError;
use nomad_core::{keys, AuthProvider, Clock, EventBus, InFlightGuard, JsonStoreExt, KeyValueStore};
use nomad_shared::ids::new_id;
use nomad_shared::{CommunityPost, DestinationSnapshot, PostAuthor, StoreEvent};
use std::sync::Arc;
use tracing::{debug, info};

/// Input of the "share your trip" form.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub destination: DestinationSnapshot,
    pub rating: u8,
    pub description: String,
    pub image: Option<String>,
}

impl NewPost {
    pub fn new(destination: DestinationSnapshot, rating: u8, description: impl Into<String>) -> Self {
        Self {
            destination,
            rating,
            description: description.into(),
            image: None,
        }
    }

    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.image = Some(url.into());
        self
    }

    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        if self.destination.id.trim().is_empty() {
            errors.push(ValidationError::new("destination", "destination is required"));
        }
        if !(MIN_RATING..=MAX_RATING).contains(&self.rating) {
            errors.push(ValidationError::new("rating", "rating must be between 1 and 5"));
        }
        if self.description.trim().is_empty() {
            errors.push(ValidationError::new("description", "description is required"));
        }
        errors
    }
}

/// Feed ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PostSort {
    #[default]
    Recent,
    /// Most liked first.
    Popular,
    Rating,
}

/// The community feed, newest first, under `communityPosts`.
pub struct CommunityStore {
    store: Arc<dyn KeyValueStore>,
    auth: Arc<dyn AuthProvider>,
    events: Arc<EventBus>,
    clock: Arc<dyn Clock>,
    guard: InFlightGuard,
}

impl CommunityStore {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        auth: Arc<dyn AuthProvider>,
        events: Arc<EventBus>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            auth,
            events,
            clock,
            guard: InFlightGuard::new(),
        }
    }

    /// Publish a post as the logged-in user. It goes to the top of the feed.
    pub fn create(&self, input: NewPost) -> SocialResult<CommunityPost> {
        let session = self.auth.require_session("create post")?;
        let errors = input.validate();
        if !errors.is_empty() {
            return Err(SocialError::Validation(errors));
        }
        let _token = self.guard.try_acquire(&format!("post:{}", session.email))?;

        let post = CommunityPost {
            id: new_id("POST"),
            user: PostAuthor {
                name: session.username,
                email: Some(session.email),
                avatar: None,
            },
            image: input.image.or_else(|| input.destination.image.clone()),
            destination: input.destination,
            rating: input.rating,
            description: input.description.trim().to_string(),
            date: self.clock.now(),
            likes: 0,
            comments: 0,
            liked_by: Vec::new(),
        };

        let mut posts = self.load_all()?;
        posts.insert(0, post.clone());
        self.store.save_json(keys::COMMUNITY_POSTS, &posts)?;

        info!("Post {} created for {}", post.id, post.destination.id);
        self.events.publish(StoreEvent::PostCreated {
            post_id: post.id.clone(),
            destination_id: post.destination.id.clone(),
        });
        Ok(post)
    }

    /// Like or unlike a post as the logged-in user. Returns the new post state.
    pub fn toggle_like(&self, post_id: &str) -> SocialResult<CommunityPost> {
        let session = self.auth.require_session("like post")?;
        let _token = self.guard.try_acquire(&format!("like:{}", post_id))?;

        let mut posts = self.load_all()?;
        let post = posts
            .iter_mut()
            .find(|p| p.id == post_id)
            .ok_or_else(|| SocialError::PostNotFound(post_id.to_string()))?;
        let liked = post.toggle_like(&session.email);
        let updated = post.clone();
        self.store.save_json(keys::COMMUNITY_POSTS, &posts)?;

        debug!("{} {} post {}", session.email, if liked { "liked" } else { "unliked" }, post_id);
        self.events.publish(StoreEvent::PostLikeToggled {
            post_id: post_id.to_string(),
            liked,
            likes: updated.likes,
        });
        Ok(updated)
    }

    /// Feed view, optionally narrowed to one destination.
    pub fn list(&self, destination_id: Option<&str>, sort: PostSort) -> SocialResult<Vec<CommunityPost>> {
        let mut posts: Vec<CommunityPost> = self
            .load_all()?
            .into_iter()
            .filter(|p| destination_id.map_or(true, |id| p.destination.id == id))
            .collect();
        // Stable sorts keep feed order among ties
        match sort {
            PostSort::Recent => posts.sort_by(|a, b| b.date.cmp(&a.date)),
            PostSort::Popular => posts.sort_by(|a, b| b.likes.cmp(&a.likes)),
            PostSort::Rating => posts.sort_by(|a, b| b.rating.cmp(&a.rating)),
        }
        Ok(posts)
    }

    pub fn get(&self, post_id: &str) -> SocialResult<CommunityPost> {
        self.load_all()?
            .into_iter()
            .find(|p| p.id == post_id)
            .ok_or_else(|| SocialError::PostNotFound(post_id.to_string()))
    }

    pub fn count_by_author(&self, email: &str) -> SocialResult<usize> {
        Ok(self
            .load_all()?
            .iter()
            .filter(|p| p.user.email.as_deref() == Some(email))
            .count())
    }

    /// Write `posts` as the feed only if none has been stored yet.
    pub fn seed_if_empty(&self, posts: Vec<CommunityPost>) -> SocialResult<bool> {
        if self.store.get(keys::COMMUNITY_POSTS)?.is_some() {
            return Ok(false);
        }
        self.store.save_json(keys::COMMUNITY_POSTS, &posts)?;
        info!("Seeded {} community posts", posts.len());
        Ok(true)
    }

    fn load_all(&self) -> SocialResult<Vec<CommunityPost>> {
        Ok(self.store.load_json(keys::COMMUNITY_POSTS)?)
    }
}
