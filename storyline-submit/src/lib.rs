//! storyline-submit library interface
//!
//! Draft work submission pipeline: optional cover upload, draft record
//! creation, outcome notification and delayed redirect.

pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod storage;

pub use crate::error::{SubmissionError, SubmissionResult};

use crate::services::{AssetUploader, Navigator, NotificationChannel, SubmissionOrchestrator};
use crate::storage::{DocumentStore, KeyGenerator, ObjectStore, UuidKeyGenerator};
use std::sync::Arc;
use storyline_common::config::SubmissionSettings;
use storyline_common::events::EventBus;

/// Collaborators the pipeline is wired to
#[derive(Clone)]
pub struct SubmissionServices {
    pub object_store: Arc<dyn ObjectStore>,
    pub document_store: Arc<dyn DocumentStore>,
    pub navigator: Arc<dyn Navigator>,
    pub key_generator: Arc<dyn KeyGenerator>,
    pub event_bus: EventBus,
}

impl SubmissionServices {
    /// Services using random UUID storage keys
    pub fn new(
        object_store: Arc<dyn ObjectStore>,
        document_store: Arc<dyn DocumentStore>,
        navigator: Arc<dyn Navigator>,
        event_bus: EventBus,
    ) -> Self {
        Self {
            object_store,
            document_store,
            navigator,
            key_generator: Arc::new(UuidKeyGenerator),
            event_bus,
        }
    }

    pub fn with_key_generator(mut self, key_generator: Arc<dyn KeyGenerator>) -> Self {
        self.key_generator = key_generator;
        self
    }
}

/// Build an orchestrator with its own notification channel
pub fn build_orchestrator(
    settings: SubmissionSettings,
    services: SubmissionServices,
) -> storyline_common::Result<SubmissionOrchestrator> {
    settings.validate()?;

    let uploader = AssetUploader::new(
        services.object_store,
        services.key_generator,
        &settings.asset_prefix,
    );
    let notifications =
        NotificationChannel::new(settings.notification_display(), services.event_bus.clone());

    Ok(SubmissionOrchestrator::new(
        uploader,
        services.document_store,
        services.navigator,
        notifications,
        services.event_bus,
        settings,
    ))
}
