//! Submission pipeline services

pub mod asset_uploader;
pub mod navigator;
pub mod notification_channel;
pub mod record_composer;
pub mod submission_orchestrator;

pub use asset_uploader::{AssetUploader, UploadedAsset};
pub use navigator::{LogNavigator, Navigator};
pub use notification_channel::NotificationChannel;
pub use record_composer::compose;
pub use submission_orchestrator::{SubmissionOrchestrator, SubmittedWork};
