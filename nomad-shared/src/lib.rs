pub mod ids;
pub mod models;
pub mod pii;

pub use models::account::{Session, UserAccount};
pub use models::booking::{
    Accommodation, Booking, BookingStatus, ItineraryItem, PetInfo, PricingBreakdown,
};
pub use models::destination::DestinationSnapshot;
pub use models::events::StoreEvent;
pub use models::language::Language;
pub use models::post::{CommunityPost, PostAuthor};
pub use models::review::Review;
pub use pii::Masked;
