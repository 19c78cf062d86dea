//! Per-submission state machine record

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use storyline_common::events::SubmissionState;
use storyline_common::{time, uuid_utils};
use uuid::Uuid;

/// State transition event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateTransition {
    pub submission_id: Uuid,
    pub old_state: SubmissionState,
    pub new_state: SubmissionState,
    pub transitioned_at: DateTime<Utc>,
}

/// One submission attempt (in-memory state)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionSession {
    pub submission_id: Uuid,
    pub state: SubmissionState,
    pub started_at: DateTime<Utc>,
    /// Set when the session reaches Succeeded or Failed
    pub ended_at: Option<DateTime<Utc>>,
}

impl SubmissionSession {
    pub fn new() -> Self {
        Self {
            submission_id: uuid_utils::generate(),
            state: SubmissionState::Idle,
            started_at: time::now(),
            ended_at: None,
        }
    }

    pub fn transition_to(&mut self, new_state: SubmissionState) -> StateTransition {
        let transition = StateTransition {
            submission_id: self.submission_id,
            old_state: self.state,
            new_state,
            transitioned_at: time::now(),
        };
        self.state = new_state;

        if new_state.is_terminal() {
            self.ended_at = Some(transition.transitioned_at);
        }

        transition
    }

    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }
}

impl Default for SubmissionSession {
    fn default() -> Self {
        Self::new()
    }
}
