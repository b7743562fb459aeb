use thiserror::Error;

use crate::actor_framework::FrameworkError;

/// Errors that can occur during customer profile operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CustomerError {
    #[error("Customer not found: {0}")]
    NotFound(String),
    #[error("Customer validation error: {0}")]
    ValidationError(String),
    #[error("Not authorized: {0}")]
    AuthorizationError(String),
    #[error("Customer data access error: {0}")]
    DataAccessError(String),
}

impl From<FrameworkError> for CustomerError {
    fn from(e: FrameworkError) -> Self {
        match e {
            FrameworkError::NotFound(id) => CustomerError::NotFound(id),
            FrameworkError::Rejected(reason) => CustomerError::ValidationError(reason),
            other => CustomerError::DataAccessError(other.to_string()),
        }
    }
}
