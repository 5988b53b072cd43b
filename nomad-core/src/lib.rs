pub mod clock;
pub mod events;
pub mod guard;
pub mod identity;
pub mod repository;
pub mod validation;

pub use clock::{Clock, FixedClock, SystemClock};
pub use events::{EventBus, SubscriptionId};
pub use guard::{InFlightGuard, InFlightToken};
pub use identity::{AuthProvider, MockAuthProvider};
pub use repository::{keys, JsonStoreExt, KeyValueStore};
pub use validation::ValidationError;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Storage error: {0}")]
    StorageError(String),
    #[error("Corrupt stored data: {0}")]
    SerializationError(#[from] serde_json::Error),
    #[error("Authentication required")]
    Unauthenticated,
    #[error("Operation already in progress for {0}")]
    Busy(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
