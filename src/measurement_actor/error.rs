use thiserror::Error;

use crate::actor_framework::FrameworkError;

/// Errors that can occur during measurement operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum MeasurementError {
    #[error("Measurements not found: {0}")]
    NotFound(String),
    #[error("Invalid customer: {0}")]
    InvalidCustomer(String),
    #[error("Measurement validation error: {0}")]
    ValidationError(String),
    #[error("Not authorized: {0}")]
    AuthorizationError(String),
    #[error("Measurement data access error: {0}")]
    DataAccessError(String),
}

impl From<FrameworkError> for MeasurementError {
    fn from(e: FrameworkError) -> Self {
        match e {
            FrameworkError::NotFound(id) => MeasurementError::NotFound(id),
            FrameworkError::Rejected(reason) => MeasurementError::ValidationError(reason),
            other => MeasurementError::DataAccessError(other.to_string()),
        }
    }
}
