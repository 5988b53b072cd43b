use nomad_account::AccountError;
use nomad_booking::BookingError;
use nomad_catalog::CatalogError;
use nomad_core::CoreError;
use nomad_social::SocialError;

/// How a failure should be surfaced to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed input; show inline next to the field.
    Validation,
    /// No session; the login prompt has already been signaled.
    Unauthenticated,
    NotFound,
    Forbidden,
    /// Duplicate email or review; nothing was changed.
    Conflict,
    /// Re-entrant call while the same operation is in flight.
    Busy,
    Internal,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Account(#[from] AccountError),
    #[error(transparent)]
    Booking(#[from] BookingError),
    #[error(transparent)]
    Social(#[from] SocialError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Core(#[from] CoreError),
}

fn core_kind(err: &CoreError) -> ErrorKind {
    match err {
        CoreError::Unauthenticated => ErrorKind::Unauthenticated,
        CoreError::Busy(_) => ErrorKind::Busy,
        CoreError::StorageError(_) | CoreError::SerializationError(_) => ErrorKind::Internal,
    }
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Account(e) => match e {
                AccountError::Validation(_) => ErrorKind::Validation,
                AccountError::EmailTaken(_) => ErrorKind::Conflict,
                // Generic on purpose: never hint which credential was wrong
                AccountError::InvalidCredentials => ErrorKind::Validation,
                AccountError::Core(c) => core_kind(c),
            },
            AppError::Booking(e) => match e {
                BookingError::Validation(_) | BookingError::ActivityNotFound(_) => ErrorKind::Validation,
                BookingError::NotFound(_) => ErrorKind::NotFound,
                BookingError::Forbidden(_) => ErrorKind::Forbidden,
                BookingError::InvalidTransition { .. } | BookingError::NotModifiable { .. } => {
                    ErrorKind::Conflict
                }
                BookingError::Core(c) => core_kind(c),
            },
            AppError::Social(e) => match e {
                SocialError::Validation(_) => ErrorKind::Validation,
                SocialError::AlreadyReviewed(_) => ErrorKind::Conflict,
                SocialError::ReviewNotFound(_) | SocialError::PostNotFound(_) => ErrorKind::NotFound,
                SocialError::Forbidden(_) => ErrorKind::Forbidden,
                SocialError::Core(c) => core_kind(c),
            },
            AppError::Catalog(_) => ErrorKind::Internal,
            AppError::Core(c) => core_kind(c),
        }
    }

    pub fn is_user_error(&self) -> bool {
        self.kind() != ErrorKind::Internal
    }
}
