//! Cover image upload
//!
//! Writes the payload under `<prefix>/<random key>` and resolves a public
//! reference for it. No retries; every store failure becomes
//! [`SubmissionError::UploadFailed`] with the store error as its cause.

use crate::error::SubmissionError;
use crate::models::AssetReference;
use crate::storage::{KeyGenerator, ObjectStore, StoreError, StoredObject};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Result of a successful upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedAsset {
    /// Store handle, kept for cleanup
    pub object: StoredObject,
    pub reference: AssetReference,
}

pub struct AssetUploader {
    store: Arc<dyn ObjectStore>,
    keys: Arc<dyn KeyGenerator>,
    prefix: String,
}

impl AssetUploader {
    pub fn new(store: Arc<dyn ObjectStore>, keys: Arc<dyn KeyGenerator>, prefix: &str) -> Self {
        Self {
            store,
            keys,
            prefix: prefix.trim_matches('/').to_string(),
        }
    }

    /// Object path for a freshly generated key
    fn next_path(&self) -> String {
        format!("{}/{}", self.prefix, self.keys.generate())
    }

    pub async fn upload(&self, payload: &[u8]) -> Result<UploadedAsset, SubmissionError> {
        let path = self.next_path();
        debug!(path = %path, bytes = payload.len(), "Uploading asset");

        let object = self
            .store
            .put(&path, payload)
            .await
            .map_err(SubmissionError::UploadFailed)?;

        let url = match self.store.public_url(&object).await {
            Ok(url) => url,
            Err(e) => {
                // Object is written but unreachable; nothing will reference it
                self.discard(&object).await;
                return Err(SubmissionError::UploadFailed(e));
            }
        };

        info!(path = %object.path, bytes = object.size, "Asset uploaded");

        Ok(UploadedAsset {
            object,
            reference: AssetReference::new(url),
        })
    }

    /// Delete a previously uploaded asset
    pub async fn remove(&self, asset: &UploadedAsset) -> Result<(), StoreError> {
        self.store.delete(&asset.object).await
    }

    async fn discard(&self, object: &StoredObject) {
        if let Err(e) = self.store.delete(object).await {
            warn!(path = %object.path, error = %e, "Failed to delete unresolvable asset");
        }
    }
}
