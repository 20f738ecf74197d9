use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::api::ApiError;
use crate::workflow::{Event, InterviewId, InvalidTransition};

/// A single rejected input field and what is wrong with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Local input rejection. Lists every offending field so the caller can
/// highlight all of them at once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Error)]
#[error("validation failed: {}", join_fields(.fields))]
pub struct ValidationError {
    fields: Vec<FieldError>,
}

fn join_fields(fields: &[FieldError]) -> String {
    fields
        .iter()
        .map(FieldError::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationError {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: &'static str, message: impl Into<String>) -> Self {
        let mut err = Self::new();
        err.push(field, message);
        err
    }

    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.fields.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn extend(&mut self, other: ValidationError) {
        self.fields.extend(other.fields);
    }

    pub fn fields(&self) -> &[FieldError] {
        &self.fields
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.fields.iter().any(|f| f.field == field)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// `Ok(())` when nothing was pushed.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

/// Broad category of a [`WorkflowError`], for UI messaging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    Validation,
    InvalidTransition,
    Dispatch,
    Persistence,
    Conflict,
    NotFound,
}

/// How the operator should react to a [`WorkflowError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Severity {
    /// Fix the input and try again.
    Recoverable,
    /// A collaborator failed before anything changed; retrying is safe.
    Retryable,
    /// The outside world and the record store may disagree.
    Reconcile,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Recoverable => write!(f, "recoverable"),
            Severity::Retryable => write!(f, "retryable"),
            Severity::Reconcile => write!(f, "needs reconciliation"),
        }
    }
}

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    InvalidTransition(#[from] InvalidTransition),

    #[error("email to candidate of interview {id} was not sent: {source}")]
    Dispatch {
        id: InterviewId,
        #[source]
        source: ApiError,
    },

    #[error("meeting could not be provisioned: {source}")]
    Provisioning {
        #[source]
        source: ApiError,
    },

    #[error("record store request failed: {source}")]
    Store {
        #[source]
        source: ApiError,
    },

    #[error("interview {id} could not be saved: {source}")]
    Persistence {
        id: InterviewId,
        #[source]
        source: ApiError,
    },

    #[error(
        "{event} email was sent to {recipient} but interview {id} could not be updated: {source}"
    )]
    Reconciliation {
        id: InterviewId,
        event: Event,
        recipient: String,
        #[source]
        source: ApiError,
    },

    #[error("interview {0} already has an action in flight")]
    Busy(InterviewId),

    #[error("interview {0} not found")]
    NotFound(InterviewId),
}

impl WorkflowError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            WorkflowError::Validation(_) => ErrorKind::Validation,
            WorkflowError::InvalidTransition(_) => ErrorKind::InvalidTransition,
            WorkflowError::Dispatch { .. } => ErrorKind::Dispatch,
            WorkflowError::Provisioning { .. }
            | WorkflowError::Store { .. }
            | WorkflowError::Persistence { .. }
            | WorkflowError::Reconciliation { .. } => ErrorKind::Persistence,
            WorkflowError::Busy(_) => ErrorKind::Conflict,
            WorkflowError::NotFound(_) => ErrorKind::NotFound,
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            WorkflowError::Validation(_)
            | WorkflowError::InvalidTransition(_)
            | WorkflowError::NotFound(_) => Severity::Recoverable,
            WorkflowError::Dispatch { .. }
            | WorkflowError::Provisioning { .. }
            | WorkflowError::Store { .. }
            | WorkflowError::Persistence { .. }
            | WorkflowError::Busy(_) => Severity::Retryable,
            WorkflowError::Reconciliation { .. } => Severity::Reconcile,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::{Status, TransitionBlock};

    #[test]
    fn validation_error_lists_every_field() {
        let mut err = ValidationError::new();
        err.push("technical_score", "must be between 0 and 10");
        err.push("comments", "must not be empty");
        assert_eq!(
            err.to_string(),
            "validation failed: technical_score: must be between 0 and 10; comments: must not be empty"
        );
        assert!(err.has_field("comments"));
        assert_eq!(err.fields().len(), 2);
    }

    #[test]
    fn empty_validation_is_ok() {
        assert!(ValidationError::new().into_result().is_ok());
        assert!(ValidationError::single("body", "empty").into_result().is_err());
    }

    #[test]
    fn reconciliation_is_highest_severity() {
        let err = WorkflowError::Reconciliation {
            id: InterviewId::from("iv-1"),
            event: Event::Accept,
            recipient: "a@b.c".into(),
            source: ApiError::Status {
                status: 503,
                message: "unavailable".into(),
            },
        };
        assert_eq!(err.severity(), Severity::Reconcile);
        assert_eq!(err.kind(), ErrorKind::Persistence);
        assert!(err.severity() > Severity::Retryable);
        assert_eq!(
            err.to_string(),
            "ACCEPT email was sent to a@b.c but interview iv-1 could not be updated: \
             API error (status 503): unavailable"
        );
    }

    #[test]
    fn invalid_transition_kind_is_distinct_from_validation() {
        let err = WorkflowError::from(InvalidTransition {
            from: Status::Cancelled,
            event: Event::Cancel,
            reason: TransitionBlock::Terminal,
        });
        assert_eq!(err.kind(), ErrorKind::InvalidTransition);
        assert_ne!(
            err.kind(),
            WorkflowError::from(ValidationError::single("body", "empty")).kind()
        );
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<WorkflowError>();
    }
}
