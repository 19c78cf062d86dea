//! Single-slot, self-expiring notification store
//!
//! Holds at most one [`SubmissionNotification`]. Posting replaces whatever is
//! showing and restarts the expiry timer; there is no queue. Every change is
//! also broadcast on the [`EventBus`] for presentation layers.
//!
//! Timers are tokio tasks, so `post` must run inside a tokio runtime.

use chrono::Utc;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use storyline_common::events::{
    EventBus, NotificationKind, StorylineEvent, SubmissionNotification,
};
use tokio::task::JoinHandle;
use tracing::debug;

#[derive(Default)]
struct Slot {
    current: Option<SubmissionNotification>,
    /// Bumped on every post/clear; a timer only clears its own generation
    generation: u64,
    timer: Option<JoinHandle<()>>,
}

#[derive(Clone)]
pub struct NotificationChannel {
    slot: Arc<Mutex<Slot>>,
    display_interval: Duration,
    event_bus: EventBus,
}

impl NotificationChannel {
    pub fn new(display_interval: Duration, event_bus: EventBus) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Slot::default())),
            display_interval,
            event_bus,
        }
    }

    pub fn display_interval(&self) -> Duration {
        self.display_interval
    }

    /// Show a notification, replacing any active one
    pub fn post(&self, kind: NotificationKind, message: impl Into<String>) {
        let notification = SubmissionNotification {
            kind,
            message: message.into(),
        };

        let mut slot = self.slot.lock();
        slot.generation += 1;
        let generation = slot.generation;

        if let Some(previous) = slot.timer.take() {
            previous.abort();
        }
        if let Some(replaced) = slot.current.replace(notification.clone()) {
            debug!(message = %replaced.message, "Notification replaced");
        }

        let expiry = Arc::clone(&self.slot);
        let bus = self.event_bus.clone();
        let interval = self.display_interval;
        slot.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(interval).await;
            let mut slot = expiry.lock();
            if slot.generation == generation && slot.current.take().is_some() {
                slot.timer = None;
                drop(slot);
                bus.emit_lossy(StorylineEvent::NotificationCleared {
                    expired: true,
                    timestamp: Utc::now(),
                });
            }
        }));
        drop(slot);

        self.event_bus.emit_lossy(StorylineEvent::NotificationPosted {
            notification,
            timestamp: Utc::now(),
        });
    }

    pub fn success(&self, message: impl Into<String>) {
        self.post(NotificationKind::Success, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.post(NotificationKind::Error, message);
    }

    /// Empty the slot early and cancel its timer
    pub fn clear(&self) {
        let mut slot = self.slot.lock();
        slot.generation += 1;
        if let Some(timer) = slot.timer.take() {
            timer.abort();
        }
        let had_notification = slot.current.take().is_some();
        drop(slot);

        if had_notification {
            self.event_bus.emit_lossy(StorylineEvent::NotificationCleared {
                expired: false,
                timestamp: Utc::now(),
            });
        }
    }

    /// Notification currently showing, if any
    pub fn current(&self) -> Option<SubmissionNotification> {
        self.slot.lock().current.clone()
    }
}
