//! Cover image selected but not yet submitted

use uuid::Uuid;

/// Client-held cover payload plus a local preview reference
///
/// The preview reference is for UI feedback only and is never persisted.
#[derive(Debug, Clone)]
pub struct UploadCandidate {
    payload: Vec<u8>,
    file_name: Option<String>,
    preview_ref: String,
}

impl UploadCandidate {
    pub fn new(payload: Vec<u8>, file_name: Option<String>) -> Self {
        Self {
            payload,
            file_name,
            preview_ref: format!("preview:{}", Uuid::new_v4()),
        }
    }

    pub fn preview_ref(&self) -> &str {
        &self.preview_ref
    }

    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    pub fn into_payload(self) -> Vec<u8> {
        self.payload
    }
}
