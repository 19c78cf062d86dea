//! Draft work submission state machine
//!
//! Sequences one submission:
//! `Idle → Validating → (UploadingAsset)? → CreatingRecord → Succeeded | Failed → Idle`
//!
//! - Only one submission runs at a time per orchestrator; a concurrent call
//!   is rejected with [`SubmissionError::AlreadyInFlight`].
//! - Upload always completes before the record is created.
//! - Every outcome except that rejection is posted to the notification
//!   channel. Success also schedules a redirect to the work's detail view.
//! - If record creation fails after an upload, the uploaded asset is deleted
//!   on a best-effort basis (cleanup failures are only logged).

use crate::error::{PipelineStep, SubmissionError, SubmissionResult, TITLE_REQUIRED};
use crate::models::{SubmissionSession, UploadCandidate, WorkFields};
use crate::services::asset_uploader::{AssetUploader, UploadedAsset};
use crate::services::navigator::Navigator;
use crate::services::notification_channel::NotificationChannel;
use crate::services::record_composer;
use crate::storage::DocumentStore;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use storyline_common::config::SubmissionSettings;
use storyline_common::events::{EventBus, StorylineEvent, SubmissionState};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Message posted when a submission succeeds
pub const SUCCESS_MESSAGE: &str = "Uploaded!";

/// Outcome of a successful submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmittedWork {
    pub id: String,
    pub created_at: DateTime<Utc>,
    /// Reference embedded in the record, empty without a cover
    pub cover_image: String,
    /// Detail view the scheduled redirect goes to
    pub redirect_path: String,
}

/// Clears the in-flight flag on every exit path
struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct SubmissionOrchestrator {
    uploader: AssetUploader,
    documents: Arc<dyn DocumentStore>,
    navigator: Arc<dyn Navigator>,
    notifications: NotificationChannel,
    event_bus: EventBus,
    settings: SubmissionSettings,
    in_flight: AtomicBool,
    state: Mutex<SubmissionState>,
    candidate: Mutex<Option<UploadCandidate>>,
    pending_redirect: Mutex<Option<JoinHandle<()>>>,
}

impl SubmissionOrchestrator {
    pub fn new(
        uploader: AssetUploader,
        documents: Arc<dyn DocumentStore>,
        navigator: Arc<dyn Navigator>,
        notifications: NotificationChannel,
        event_bus: EventBus,
        settings: SubmissionSettings,
    ) -> Self {
        Self {
            uploader,
            documents,
            navigator,
            notifications,
            event_bus,
            settings,
            in_flight: AtomicBool::new(false),
            state: Mutex::new(SubmissionState::Idle),
            candidate: Mutex::new(None),
            pending_redirect: Mutex::new(None),
        }
    }

    pub fn notifications(&self) -> &NotificationChannel {
        &self.notifications
    }

    pub fn settings(&self) -> &SubmissionSettings {
        &self.settings
    }

    pub fn state(&self) -> SubmissionState {
        *self.state.lock()
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Label for the submit control
    pub fn submit_label(&self) -> &'static str {
        if self.is_in_flight() {
            "Uploading..."
        } else {
            "Post"
        }
    }

    // ------------------------------------------------------------------
    // Cover selection
    // ------------------------------------------------------------------

    /// Hold a cover image for the next submission; returns its preview reference
    ///
    /// A new selection supersedes the previous one.
    pub fn select_cover(&self, payload: Vec<u8>, file_name: Option<String>) -> String {
        let bytes = payload.len();
        let candidate = UploadCandidate::new(payload, file_name);
        let preview = candidate.preview_ref().to_string();
        debug!(
            preview = %preview,
            bytes,
            file_name = candidate.file_name().unwrap_or("-"),
            "Cover selected"
        );
        if let Some(previous) = self.candidate.lock().replace(candidate) {
            debug!(preview = %previous.preview_ref(), "Cover selection superseded");
        }
        preview
    }

    /// Preview reference of the held cover, if any
    pub fn cover_preview(&self) -> Option<String> {
        self.candidate
            .lock()
            .as_ref()
            .map(|c| c.preview_ref().to_string())
    }

    pub fn discard_cover(&self) {
        self.candidate.lock().take();
    }

    /// Submit using the held cover image (if one was selected)
    ///
    /// The held cover is consumed by the attempt whatever its outcome, unless
    /// the attempt is rejected because another submission is running.
    pub async fn submit_selected(&self, fields: WorkFields) -> SubmissionResult<SubmittedWork> {
        let guard = self.acquire()?;
        let payload = self.candidate.lock().take().map(UploadCandidate::into_payload);
        self.run(guard, fields, payload).await
    }

    // ------------------------------------------------------------------
    // Pipeline
    // ------------------------------------------------------------------

    /// Run one submission
    pub async fn submit(
        &self,
        fields: WorkFields,
        payload: Option<Vec<u8>>,
    ) -> SubmissionResult<SubmittedWork> {
        let guard = self.acquire()?;
        self.run(guard, fields, payload).await
    }

    fn acquire(&self) -> SubmissionResult<InFlightGuard<'_>> {
        InFlightGuard::acquire(&self.in_flight).ok_or_else(|| {
            warn!("Submission rejected: another submission is in progress");
            SubmissionError::AlreadyInFlight
        })
    }

    /// Pipeline body; `_guard` holds the in-flight flag until it returns
    async fn run(
        &self,
        _guard: InFlightGuard<'_>,
        fields: WorkFields,
        payload: Option<Vec<u8>>,
    ) -> SubmissionResult<SubmittedWork> {
        let mut session = SubmissionSession::new();
        info!(
            submission_id = %session.submission_id,
            title = %fields.title,
            has_cover = payload.is_some(),
            "Starting submission"
        );

        // Step 1: Validate
        self.transition(&mut session, SubmissionState::Validating);
        if let Err(e) = validate(&fields) {
            return Err(self.fail(&mut session, e));
        }

        // Step 2: Upload (only when a cover was supplied)
        let asset = match payload {
            Some(bytes) => {
                self.transition(&mut session, SubmissionState::UploadingAsset);
                let upload = self.uploader.upload(&bytes);
                match bounded(PipelineStep::Upload, self.settings.upload_deadline(), upload).await {
                    Ok(asset) => Some(asset),
                    Err(e) => return Err(self.fail(&mut session, e)),
                }
            }
            None => None,
        };

        // Step 3: Compose
        let record = record_composer::compose(&fields, asset.as_ref().map(|a| &a.reference));

        // Step 4: Create record
        self.transition(&mut session, SubmissionState::CreatingRecord);
        let create = async {
            self.documents
                .create(&self.settings.collection, &record)
                .await
                .map_err(SubmissionError::RecordCreationFailed)
        };
        let created = match bounded(
            PipelineStep::CreateRecord,
            self.settings.create_deadline(),
            create,
        )
        .await
        {
            Ok(created) => created,
            Err(e) => {
                if let Some(asset) = &asset {
                    self.cleanup_orphan(asset).await;
                }
                return Err(self.fail(&mut session, e));
            }
        };

        // Step 5: Succeed
        self.transition(&mut session, SubmissionState::Succeeded);
        self.notifications.success(SUCCESS_MESSAGE);

        let redirect_path = self.settings.detail_path(&created.id);
        self.schedule_redirect(redirect_path.clone());

        info!(
            submission_id = %session.submission_id,
            work_id = %created.id,
            redirect = %redirect_path,
            "Submission succeeded"
        );
        self.transition(&mut session, SubmissionState::Idle);

        Ok(SubmittedWork {
            id: created.id,
            created_at: created.created_at,
            cover_image: record.cover_image,
            redirect_path,
        })
    }

    fn transition(&self, session: &mut SubmissionSession, new_state: SubmissionState) {
        let transition = session.transition_to(new_state);
        *self.state.lock() = new_state;
        debug!(
            submission_id = %transition.submission_id,
            from = ?transition.old_state,
            to = ?transition.new_state,
            "Submission state changed"
        );
        self.event_bus.emit_lossy(StorylineEvent::SubmissionStateChanged {
            submission_id: transition.submission_id,
            old_state: transition.old_state,
            new_state: transition.new_state,
            timestamp: transition.transitioned_at,
        });
    }

    /// Report a terminal failure and return the error for the caller
    fn fail(&self, session: &mut SubmissionSession, error: SubmissionError) -> SubmissionError {
        self.transition(session, SubmissionState::Failed);
        warn!(
            submission_id = %session.submission_id,
            error = %error,
            "Submission failed"
        );
        self.notifications.error(error.user_message());
        self.transition(session, SubmissionState::Idle);
        error
    }

    async fn cleanup_orphan(&self, asset: &UploadedAsset) {
        if !self.settings.cleanup_orphaned_assets {
            warn!(
                path = %asset.object.path,
                "Record creation failed; uploaded asset left unreferenced (cleanup disabled)"
            );
            return;
        }

        let removal = self.uploader.remove(asset);
        let result = match self.settings.upload_deadline() {
            Some(limit) => match tokio::time::timeout(limit, removal).await {
                Ok(result) => result.map_err(|e| e.to_string()),
                Err(_) => Err(format!("timed out after {}ms", limit.as_millis())),
            },
            None => removal.await.map_err(|e| e.to_string()),
        };

        match result {
            Ok(()) => info!(path = %asset.object.path, "Removed asset orphaned by failed record creation"),
            Err(e) => warn!(
                path = %asset.object.path,
                error = %e,
                "Failed to remove orphaned asset (continuing)"
            ),
        }
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    fn schedule_redirect(&self, path: String) {
        let navigator = Arc::clone(&self.navigator);
        let bus = self.event_bus.clone();
        let delay = self.settings.redirect_delay();

        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            navigate(navigator.as_ref(), &bus, &path);
        });

        if let Some(previous) = self.pending_redirect.lock().replace(handle) {
            previous.abort();
        }
    }

    /// Wait until the scheduled redirect (if any) has been issued
    pub async fn wait_for_redirect(&self) {
        let handle = self.pending_redirect.lock().take();
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                if !e.is_cancelled() {
                    warn!(error = %e, "Redirect task failed");
                }
            }
        }
    }

    /// Cancel a pending redirect and return to the dashboard
    pub fn go_back(&self) {
        if let Some(pending) = self.pending_redirect.lock().take() {
            pending.abort();
        }
        navigate(
            self.navigator.as_ref(),
            &self.event_bus,
            &self.settings.dashboard_path,
        );
    }
}

fn validate(fields: &WorkFields) -> SubmissionResult<()> {
    if fields.title.trim().is_empty() {
        return Err(SubmissionError::Validation(TITLE_REQUIRED.to_string()));
    }
    Ok(())
}

/// Run `step` under an optional deadline
async fn bounded<T, F>(step: PipelineStep, deadline: Option<Duration>, step_future: F) -> SubmissionResult<T>
where
    F: Future<Output = SubmissionResult<T>>,
{
    match deadline {
        Some(after) => tokio::time::timeout(after, step_future)
            .await
            .unwrap_or(Err(SubmissionError::Timeout { step, after })),
        None => step_future.await,
    }
}

fn navigate(navigator: &dyn Navigator, bus: &EventBus, path: &str) {
    navigator.navigate(path);
    bus.emit_lossy(StorylineEvent::NavigationRequested {
        path: path.to_string(),
        timestamp: Utc::now(),
    });
}
