pub mod itinerary;
pub mod manager;
pub mod models;
pub mod payment;
pub mod pricing;

pub use itinerary::ItineraryPlanner;
pub use manager::BookingStore;
pub use models::BookingDraft;
pub use payment::PaymentDetails;
pub use pricing::{PricingEngine, Quote};

use nomad_core::validation::{summarize, ValidationError};
use nomad_core::CoreError;
use nomad_shared::BookingStatus;

#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("Validation failed: {}", summarize(.0))]
    Validation(Vec<ValidationError>),

    #[error("Booking not found: {0}")]
    NotFound(String),

    /// The booking exists but belongs to someone else.
    #[error("Booking {0} belongs to another user")]
    Forbidden(String),

    #[error("Invalid state transition from {from} to {to}")]
    InvalidTransition {
        from: BookingStatus,
        to: BookingStatus,
    },

    #[error("Booking {id} is {status} and can no longer be modified")]
    NotModifiable {
        id: String,
        status: BookingStatus,
    },

    #[error("Activity not found: {0}")]
    ActivityNotFound(String),

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type BookingResult<T> = Result<T, BookingError>;
