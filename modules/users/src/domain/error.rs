use thiserror::Error;

use crate::contract::model::PatchOperation;
use crate::domain::repo::{LockConflict, RepoError};

/// Domain-specific errors using thiserror
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("User not found: {id}")]
    UserNotFound { id: String },

    #[error("Validation failed: {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Malformed patch: {message}")]
    InvalidPatch { message: String },

    #[error("No handler accepts '{operation}' on path '{path}'")]
    PatchDeclined {
        operation: PatchOperation,
        path: String,
    },

    #[error("Version conflict for user {id}: {message}")]
    VersionConflict { id: String, message: String },

    #[error("Duplicate {field}: '{value}'")]
    DuplicateKey { field: String, value: String },

    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("Database error: {message}")]
    Database { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn user_not_found(id: impl Into<String>) -> Self {
        Self::UserNotFound { id: id.into() }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn invalid_patch(message: impl Into<String>) -> Self {
        Self::InvalidPatch {
            message: message.into(),
        }
    }

    pub fn patch_declined(operation: PatchOperation, path: impl Into<String>) -> Self {
        Self::PatchDeclined {
            operation,
            path: path.into(),
        }
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// True for the bad-request class: the caller sent something unusable.
    pub fn is_bad_request(&self) -> bool {
        matches!(
            self,
            Self::Validation { .. } | Self::InvalidPatch { .. } | Self::PatchDeclined { .. }
        )
    }
}

impl From<RepoError> for DomainError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::InvalidArgument(message) => Self::InvalidArgument { message },
            RepoError::OptimisticLock { id, reason } => Self::VersionConflict {
                id,
                message: match reason {
                    LockConflict::NoSuchId => "no such id".to_string(),
                    LockConflict::VersionMismatch { expected, actual } => {
                        format!("expected version {expected}, got {actual}")
                    }
                },
            },
            RepoError::DuplicateKey { field, value } => Self::DuplicateKey { field, value },
            RepoError::Backend(e) => Self::database(format!("{e:#}")),
        }
    }
}
