//! Error types for the dandi library.

use thiserror::Error;

use crate::doi::RegistrationError;
use crate::record::{RecordId, RecordStatus};

/// Main error type for dandi operations.
///
/// Schema violations have no variant here: they are recorded on the
/// record as `validation_error` text and never returned to the caller.
#[derive(Debug, Error)]
pub enum DandiError {
    /// The record's stored data could not be read or parsed.
    #[error("Storage error for record '{id}': {message}")]
    Storage { id: RecordId, message: String },

    /// No record exists with the given identifier.
    #[error("Record not found: {0}")]
    NotFound(RecordId),

    /// The record exists but is not of the expected kind.
    #[error("Record '{id}' is not a{article} {expected} record")]
    WrongKind {
        id: RecordId,
        expected: &'static str,
        article: &'static str,
    },

    /// A status change that the state machine does not permit.
    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition { from: RecordStatus, to: RecordStatus },

    /// The operation needs a record that has passed validation.
    #[error("Record '{id}' is {status}, expected VALID")]
    NotValid { id: RecordId, status: RecordStatus },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Metadata could not be converted into a registration payload.
    #[error("Transform error: {0}")]
    Transform(String),

    /// DOI registry failure.
    #[error(transparent)]
    Registration(#[from] RegistrationError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Filesystem error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DandiError {
    pub(crate) fn storage(id: &RecordId, message: impl Into<String>) -> Self {
        DandiError::Storage {
            id: id.clone(),
            message: message.into(),
        }
    }

    pub(crate) fn wrong_kind(id: &RecordId, expected: &'static str) -> Self {
        let article = if expected.starts_with(['a', 'e', 'i', 'o', 'u']) {
            "n"
        } else {
            ""
        };
        DandiError::WrongKind {
            id: id.clone(),
            expected,
            article,
        }
    }
}

/// Result type alias for dandi operations.
pub type Result<T> = std::result::Result<T, DandiError>;
