use thiserror::Error;

use crate::actor_framework::FrameworkError;

/// Errors that can occur during customer note operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum NoteError {
    #[error("Note not found: {0}")]
    NotFound(String),
    #[error("Note validation error: {0}")]
    ValidationError(String),
    #[error("Not authorized: {0}")]
    AuthorizationError(String),
    #[error("Note data access error: {0}")]
    DataAccessError(String),
}

impl From<FrameworkError> for NoteError {
    fn from(e: FrameworkError) -> Self {
        match e {
            FrameworkError::NotFound(id) => NoteError::NotFound(id),
            FrameworkError::Rejected(reason) => NoteError::ValidationError(reason),
            other => NoteError::DataAccessError(other.to_string()),
        }
    }
}
