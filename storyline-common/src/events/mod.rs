//! Event types for the Storyline event system
//!
//! Provides shared event definitions and the EventBus used to fan
//! notification, state and navigation changes out to presentation layers.

mod notification_types;
mod submission_types;

pub use notification_types::{NotificationKind, SubmissionNotification};
pub use submission_types::SubmissionState;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

/// Storyline event types
///
/// Events are broadcast via EventBus and serialize with a `type` tag so a
/// presentation layer can forward them verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum StorylineEvent {
    /// A notification replaced whatever occupied the slot
    NotificationPosted {
        notification: SubmissionNotification,
        timestamp: DateTime<Utc>,
    },

    /// The notification slot was emptied
    NotificationCleared {
        /// true when the display interval ran out, false for an explicit clear
        expired: bool,
        timestamp: DateTime<Utc>,
    },

    /// Submission state machine moved
    SubmissionStateChanged {
        submission_id: Uuid,
        old_state: SubmissionState,
        new_state: SubmissionState,
        timestamp: DateTime<Utc>,
    },

    /// A navigation intent was handed to the navigation sink
    NavigationRequested {
        path: String,
        timestamp: DateTime<Utc>,
    },
}

impl StorylineEvent {
    /// Event name used in logs and SSE-style `event:` fields
    pub fn event_type(&self) -> &'static str {
        match self {
            StorylineEvent::NotificationPosted { .. } => "NotificationPosted",
            StorylineEvent::NotificationCleared { .. } => "NotificationCleared",
            StorylineEvent::SubmissionStateChanged { .. } => "SubmissionStateChanged",
            StorylineEvent::NavigationRequested { .. } => "NavigationRequested",
        }
    }
}

// ========================================
// EventBus Implementation
// ========================================

/// Central event distribution bus
///
/// Uses tokio::broadcast internally:
/// - Non-blocking publish (slow subscribers don't block producers)
/// - Multiple concurrent subscribers
/// - Lagged message detection for slow subscribers
///
/// # Examples
///
/// ```
/// use storyline_common::events::{EventBus, StorylineEvent};
///
/// let event_bus = EventBus::new(100);
/// let mut rx = event_bus.subscribe();
///
/// event_bus.emit_lossy(StorylineEvent::NavigationRequested {
///     path: "/writerDashboard".to_string(),
///     timestamp: chrono::Utc::now(),
/// });
///
/// assert!(rx.try_recv().is_ok());
/// ```
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<StorylineEvent>,
}

impl EventBus {
    /// Creates a new EventBus with specified channel capacity
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Subscribe to all future events
    pub fn subscribe(&self) -> broadcast::Receiver<StorylineEvent> {
        self.tx.subscribe()
    }

    /// Emit an event to all subscribers
    ///
    /// Returns `Err` if no subscribers are listening.
    #[allow(clippy::result_large_err)]
    pub fn emit(
        &self,
        event: StorylineEvent,
    ) -> Result<usize, broadcast::error::SendError<StorylineEvent>> {
        self.tx.send(event)
    }

    /// Emit an event, ignoring if no subscribers are listening
    pub fn emit_lossy(&self, event: StorylineEvent) {
        let _ = self.tx.send(event);
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}
