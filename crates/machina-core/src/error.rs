//! Unified error type for DAO contracts and their adapters.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use thiserror::Error;

/// Error type shared by every DAO operation.
///
/// The variants split into caller mistakes (`InvalidArgument`,
/// `NotPersistent`, `Conflict`, `Validation`), absence the caller asserted
/// against (`NotFound`) and faults of the backing store (`Backend`, `Other`),
/// which are passed through untouched.
#[derive(Error, Debug)]
pub enum DaoError {
    // ============ Caller Errors ============
    /// A required argument was absent or out of range.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The entity is transient or was already removed from the store.
    #[error("Entity {entity} is not persistent{}", key_suffix(.id))]
    NotPersistent {
        entity: &'static str,
        id: Option<String>,
    },

    /// An entity with the same key is already stored.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The entity failed field validation.
    #[error("Validation error: {0}")]
    Validation(String),

    // ============ Lookup Errors ============
    /// The entity the caller asserted to exist is absent.
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    // ============ Infrastructure Errors ============
    /// The entity could not be converted to or from its property form.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Storage-layer fault.
    #[error("Backend error: {0}")]
    Backend(String),

    /// Generic error wrapper
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DaoError {
    /// Returns a machine-readable error code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidArgument(_) => "INVALID_ARGUMENT",
            Self::NotPersistent { .. } => "NOT_PERSISTENT",
            Self::Conflict(_) => "CONFLICT",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Serialization(_) => "SERIALIZATION_ERROR",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Backend(_) | Self::Other(_) => "BACKEND_ERROR",
        }
    }

    /// Creates an invalid argument error.
    #[must_use]
    pub fn invalid_argument<T: Into<String>>(message: T) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Creates a not found error for an entity.
    #[must_use]
    pub fn not_found<T: ToString>(entity: &'static str, id: T) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Creates a not persistent error, optionally naming the key.
    #[must_use]
    pub fn not_persistent<T: ToString>(entity: &'static str, id: Option<T>) -> Self {
        Self::NotPersistent {
            entity,
            id: id.map(|id| id.to_string()),
        }
    }

    /// Creates a conflict error.
    #[must_use]
    pub fn conflict<T: Into<String>>(message: T) -> Self {
        Self::Conflict(message.into())
    }

    /// Creates a backend error.
    #[must_use]
    pub fn backend<T: Into<String>>(message: T) -> Self {
        Self::Backend(message.into())
    }

    /// Checks if this error reports an absent entity.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Checks if this error came from the storage layer.
    #[must_use]
    pub const fn is_backend(&self) -> bool {
        matches!(self, Self::Backend(_) | Self::Other(_))
    }
}

fn key_suffix(id: &Option<String>) -> String {
    id.as_ref().map(|id| format!(" (id {id})")).unwrap_or_default()
}

impl From<serde_json::Error> for DaoError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Serializable error description, for consumers that report DAO failures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Machine-readable error code
    pub code: String,
    /// Human-readable error message
    pub message: String,
}

impl From<&DaoError> for ErrorResponse {
    fn from(error: &DaoError) -> Self {
        Self {
            code: error.error_code().to_string(),
            message: error.to_string(),
        }
    }
}
