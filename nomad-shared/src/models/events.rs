use crate::models::booking::BookingStatus;
use serde::{Deserialize, Serialize};

/// Change notifications published after a store mutation is persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StoreEvent {
    SessionStarted {
        username: String,
        email: String,
    },
    SessionEnded {
        /// False when the presentation should skip the "logged out" notice.
        notify: bool,
    },
    LoginRequired {
        action: String,
    },
    BookingCreated {
        booking_id: String,
        user_id: String,
    },
    BookingStatusChanged {
        booking_id: String,
        from: BookingStatus,
        to: BookingStatus,
    },
    BookingDeleted {
        booking_id: String,
    },
    ItineraryUpdated {
        booking_id: String,
        items: usize,
    },
    FavoriteToggled {
        user_email: String,
        destination_id: String,
        is_favorite: bool,
    },
    ReviewAdded {
        destination_id: String,
        review_id: String,
    },
    ReviewUpdated {
        destination_id: String,
        review_id: String,
    },
    ReviewDeleted {
        destination_id: String,
        review_id: String,
    },
    LanguageChanged {
        language: String,
    },
    PostCreated {
        post_id: String,
        destination_id: String,
    },
    PostLikeToggled {
        post_id: String,
        liked: bool,
        likes: u32,
    },
}

impl StoreEvent {
    pub fn name(&self) -> &'static str {
        match self {
            StoreEvent::SessionStarted { .. } => "SESSION_STARTED",
            StoreEvent::SessionEnded { .. } => "SESSION_ENDED",
            StoreEvent::LoginRequired { .. } => "LOGIN_REQUIRED",
            StoreEvent::BookingCreated { .. } => "BOOKING_CREATED",
            StoreEvent::BookingStatusChanged { .. } => "BOOKING_STATUS_CHANGED",
            StoreEvent::BookingDeleted { .. } => "BOOKING_DELETED",
            StoreEvent::ItineraryUpdated { .. } => "ITINERARY_UPDATED",
            StoreEvent::FavoriteToggled { .. } => "FAVORITE_TOGGLED",
            StoreEvent::ReviewAdded { .. } => "REVIEW_ADDED",
            StoreEvent::ReviewUpdated { .. } => "REVIEW_UPDATED",
            StoreEvent::ReviewDeleted { .. } => "REVIEW_DELETED",
            StoreEvent::LanguageChanged { .. } => "LANGUAGE_CHANGED",
            StoreEvent::PostCreated { .. } => "POST_CREATED",
            StoreEvent::PostLikeToggled { .. } => "POST_LIKE_TOGGLED",
        }
    }
}
