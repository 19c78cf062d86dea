//! Submission state machine types

use serde::{Deserialize, Serialize};

/// Submission pipeline state
///
/// `Idle → Validating → (UploadingAsset)? → CreatingRecord → Succeeded | Failed`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubmissionState {
    /// No submission running
    Idle,
    /// Checking user-supplied fields
    Validating,
    /// Writing the cover image to the object store
    UploadingAsset,
    /// Writing the draft record to the document store
    CreatingRecord,
    /// Record created
    Succeeded,
    /// Submission ended with an error
    Failed,
}

impl SubmissionState {
    pub fn is_terminal(self) -> bool {
        matches!(self, SubmissionState::Succeeded | SubmissionState::Failed)
    }
}
