//! Draft work record
//!
//! Field names serialize in camelCase so stored documents keep the
//! `coverImage` / `createdAt` shape the dashboard reads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque chapter reference, filled in by the chapter editor
pub type ChapterRef = String;

/// Creation timestamp owned by the document store
///
/// The composer always writes `Pending`; the store substitutes `Assigned`
/// at write time so ordering never depends on an author's clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum ServerTimestamp {
    Pending,
    Assigned(DateTime<Utc>),
}

/// User-supplied fields from the submission form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkFields {
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Selected genre value, empty when none was chosen
    #[serde(default)]
    pub tag: String,
}

impl WorkFields {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }
}

/// Record written to the document store for a new work
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftWork {
    pub title: String,
    pub description: String,
    /// Zero or one genre values
    pub tags: Vec<String>,
    pub chapters: Vec<ChapterRef>,
    /// Asset reference, or empty when no cover was attached
    pub cover_image: String,
    pub published: bool,
    pub created_at: ServerTimestamp,
}

/// Draft work as read back from a document store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredWork {
    pub id: String,
    pub work: DraftWork,
}
