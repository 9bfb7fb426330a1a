//! Registry client errors.

use std::fmt;

use thiserror::Error;

/// Registry call that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegistryOperation {
    Create,
    Fetch,
    Delete,
}

impl fmt::Display for RegistryOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RegistryOperation::Create => "create",
            RegistryOperation::Fetch => "fetch",
            RegistryOperation::Delete => "delete",
        })
    }
}

/// Failure talking to the DOI registry.
///
/// None of these are retried internally; retry policy belongs to the caller.
#[derive(Debug, Error)]
pub enum RegistrationError {
    /// The registry answered with a non-2xx status.
    #[error("DOI registry returned {status} on {operation} of {doi}: {body}")]
    Http {
        doi: String,
        operation: RegistryOperation,
        status: u16,
        body: String,
    },

    /// The request never produced a response (connection, timeout, ...).
    #[error("DOI registry request failed on {operation} of {doi}: {message}")]
    Transport {
        doi: String,
        operation: RegistryOperation,
        message: String,
    },

    /// The registry's answer did not have the expected shape.
    #[error("Malformed registry response for {doi}: {message}")]
    MalformedResponse { doi: String, message: String },

    /// Registration is partially configured.
    #[error("DOI registry configuration error: {0}")]
    Config(String),
}

impl RegistrationError {
    /// HTTP status of the failed call, if there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            RegistrationError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}
