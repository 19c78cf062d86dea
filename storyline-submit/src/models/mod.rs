//! Data models for draft work submission

pub mod asset_reference;
pub mod draft_work;
pub mod genre;
pub mod submission_session;
pub mod upload_candidate;

pub use asset_reference::AssetReference;
pub use draft_work::{ChapterRef, DraftWork, ServerTimestamp, StoredWork, WorkFields};
pub use genre::Genre;
pub use submission_session::{StateTransition, SubmissionSession};
pub use upload_candidate::UploadCandidate;
