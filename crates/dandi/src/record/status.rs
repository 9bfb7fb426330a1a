//! Validation status state machine.
//!
//! ```text
//! PENDING ──┐
//! VALID ────┼──> VALIDATING ──> VALID | INVALID
//! INVALID ──┘
//! ```
//!
//! `VALIDATING` only exists for the duration of a validation call. It is
//! never written to storage, so concurrent readers keep seeing the previous
//! settled status until the run writes its result.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{DandiError, Result};

/// Observable status of a metadata record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecordStatus {
    /// Metadata stored but never validated.
    #[default]
    Pending,
    /// A validation run is in progress.
    Validating,
    /// The last validation run found no errors.
    Valid,
    /// The last validation run found errors.
    Invalid,
}

impl RecordStatus {
    /// Label as stored and rendered.
    pub fn label(&self) -> &'static str {
        match self {
            RecordStatus::Pending => "PENDING",
            RecordStatus::Validating => "VALIDATING",
            RecordStatus::Valid => "VALID",
            RecordStatus::Invalid => "INVALID",
        }
    }

    /// Whether this is the result of a finished validation run.
    pub fn is_settled(&self) -> bool {
        matches!(self, RecordStatus::Valid | RecordStatus::Invalid)
    }

    /// Whether `next` may directly follow this status.
    pub fn can_transition_to(self, next: RecordStatus) -> bool {
        matches!(
            (self, next),
            (
                RecordStatus::Pending | RecordStatus::Valid | RecordStatus::Invalid,
                RecordStatus::Validating
            ) | (
                RecordStatus::Validating,
                RecordStatus::Valid | RecordStatus::Invalid
            )
        )
    }

    /// Enter `VALIDATING`. The returned run is the only way to reach a
    /// settled status, so no run can skip the transient state.
    pub fn begin_validation(self) -> Result<ValidationRun> {
        if !self.can_transition_to(RecordStatus::Validating) {
            return Err(DandiError::InvalidTransition {
                from: self,
                to: RecordStatus::Validating,
            });
        }
        Ok(ValidationRun { prior: self })
    }
}

impl fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A validation run in progress.
#[derive(Debug)]
#[must_use = "a validation run must be settled"]
pub struct ValidationRun {
    prior: RecordStatus,
}

impl ValidationRun {
    /// Status the record held when the run began.
    pub fn prior(&self) -> RecordStatus {
        self.prior
    }

    /// Status while the run is in progress.
    pub fn status(&self) -> RecordStatus {
        RecordStatus::Validating
    }

    /// Finish the run. An empty report settles to `VALID`, anything else
    /// to `INVALID`.
    pub fn settle(self, validation_error: impl Into<String>) -> Settled {
        let validation_error = validation_error.into();
        let status = if validation_error.is_empty() {
            RecordStatus::Valid
        } else {
            RecordStatus::Invalid
        };
        Settled {
            status,
            validation_error,
        }
    }
}

/// The outcome of a finished validation run.
///
/// `status == INVALID` exactly when `validation_error` is non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settled {
    status: RecordStatus,
    validation_error: String,
}

impl Settled {
    pub fn status(&self) -> RecordStatus {
        self.status
    }

    pub fn validation_error(&self) -> &str {
        &self.validation_error
    }

    pub fn is_valid(&self) -> bool {
        self.status == RecordStatus::Valid
    }
}
