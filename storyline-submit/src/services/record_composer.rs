//! Draft record composition

use crate::models::{AssetReference, DraftWork, ServerTimestamp, WorkFields};

/// Build the record for a new work
///
/// Never fails and does no I/O. New works are always unpublished with no
/// chapters, carry at most one tag, and leave `created_at` for the store.
/// The title is taken as-is; validation happens before this is called.
pub fn compose(fields: &WorkFields, asset: Option<&AssetReference>) -> DraftWork {
    let tag = fields.tag.trim();

    DraftWork {
        title: fields.title.clone(),
        description: fields.description.clone(),
        tags: if tag.is_empty() {
            Vec::new()
        } else {
            vec![tag.to_string()]
        },
        chapters: Vec::new(),
        cover_image: asset.map(|a| a.as_str().to_string()).unwrap_or_default(),
        published: false,
        created_at: ServerTimestamp::Pending,
    }
}
