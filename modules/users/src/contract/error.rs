use http::StatusCode;
use thiserror::Error;

/// Errors that are safe to expose to other modules
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UsersError {
    #[error("User not found: {id}")]
    NotFound { id: String },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Internal error")]
    Internal,
}

impl UsersError {
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn internal() -> Self {
        Self::Internal
    }

    /// Status a transport layer should answer with.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<crate::domain::error::DomainError> for UsersError {
    fn from(domain_error: crate::domain::error::DomainError) -> Self {
        use crate::domain::error::DomainError::*;
        match domain_error {
            UserNotFound { id } => Self::not_found(id),
            Validation { field, message } => Self::validation(format!("{}: {}", field, message)),
            InvalidPatch { message } => Self::validation(message),
            e @ PatchDeclined { .. } => Self::validation(e.to_string()),
            VersionConflict { id, message } => {
                Self::conflict(format!("User {} was modified concurrently: {}", id, message))
            }
            DuplicateKey { field, value } => {
                Self::conflict(format!("A user with {} '{}' already exists", field, value))
            }
            InvalidArgument { message } => {
                tracing::error!(%message, "Repository precondition violated");
                Self::internal()
            }
            Internal { message } => {
                tracing::error!(%message, "Internal error occurred");
                Self::internal()
            }
            Database { message } => {
                // Log the internal error details but don't expose them to the caller
                tracing::error!(%message, "Database error occurred");
                Self::internal()
            }
        }
    }
}
