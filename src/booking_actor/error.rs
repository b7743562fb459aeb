use thiserror::Error;

use crate::actor_framework::FrameworkError;

/// Errors that can occur during booking operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum BookingError {
    #[error("Booking not found: {0}")]
    NotFound(String),
    #[error("Booking validation error: {0}")]
    ValidationError(String),
    #[error("Not authorized: {0}")]
    AuthorizationError(String),
    #[error("Booking data access error: {0}")]
    DataAccessError(String),
}

impl From<FrameworkError> for BookingError {
    fn from(e: FrameworkError) -> Self {
        match e {
            FrameworkError::NotFound(id) => BookingError::NotFound(id),
            FrameworkError::Rejected(reason) => BookingError::ValidationError(reason),
            other => BookingError::DataAccessError(other.to_string()),
        }
    }
}
