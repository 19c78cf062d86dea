//! Submission pipeline errors
//!
//! Every variant except [`SubmissionError::AlreadyInFlight`] is reported to
//! the author through the notification channel.

use crate::storage::StoreError;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Message posted when the title is blank
pub const TITLE_REQUIRED: &str = "Title is required.";

/// External step bounded by a deadline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStep {
    Upload,
    CreateRecord,
}

impl fmt::Display for PipelineStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineStep::Upload => f.write_str("upload"),
            PipelineStep::CreateRecord => f.write_str("record creation"),
        }
    }
}

#[derive(Debug, Error)]
pub enum SubmissionError {
    /// Input rejected before any store call
    #[error("{0}")]
    Validation(String),

    /// Object store write or URL resolution failed
    #[error("upload failed: {0}")]
    UploadFailed(#[source] StoreError),

    /// Document store rejected the record
    #[error("record creation failed: {0}")]
    RecordCreationFailed(#[source] StoreError),

    /// A step exceeded its configured deadline
    #[error("{step} timed out after {}ms", .after.as_millis())]
    Timeout { step: PipelineStep, after: Duration },

    /// Another submission from this orchestrator is still running
    #[error("a submission is already in progress")]
    AlreadyInFlight,
}

impl SubmissionError {
    /// Text shown to the author
    ///
    /// Store failures show the store's cause; the step name is only in
    /// `Display` (logs).
    pub fn user_message(&self) -> String {
        match self {
            SubmissionError::Validation(message) => message.clone(),
            SubmissionError::UploadFailed(cause) | SubmissionError::RecordCreationFailed(cause) => {
                format!("Failed: {}", cause.cause())
            }
            other => format!("Failed: {}", other),
        }
    }
}

/// Result type for pipeline operations
pub type SubmissionResult<T> = Result<T, SubmissionError>;
