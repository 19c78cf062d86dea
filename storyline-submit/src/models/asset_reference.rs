//! Public reference to an uploaded asset

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque, publicly resolvable handle returned by the asset uploader
///
/// Embedded verbatim into `DraftWork::cover_image`; nothing in the pipeline
/// interprets it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetReference(String);

impl AssetReference {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
