//! Filesystem-backed object store
//!
//! Objects live under `<root>/<prefix>/<key>`. Public references are built
//! from a configured base URL when one is set (e.g. a static file server in
//! front of the root), otherwise they are `file://` URLs.

use super::{ObjectStore, StoreError, StoredObject};
use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

pub struct LocalObjectStore {
    root: PathBuf,
    public_base_url: Option<String>,
    max_object_bytes: Option<usize>,
}

impl LocalObjectStore {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            public_base_url: None,
            max_object_bytes: None,
        }
    }

    pub fn with_public_base_url(mut self, base_url: Option<String>) -> Self {
        self.public_base_url = base_url.filter(|url| !url.trim().is_empty());
        self
    }

    pub fn with_size_limit(mut self, max_object_bytes: usize) -> Self {
        self.max_object_bytes = Some(max_object_bytes);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map an object path onto the filesystem, refusing anything that
    /// could escape the root
    fn resolve(&self, path: &str) -> Result<PathBuf, StoreError> {
        let relative = Path::new(path);
        let escapes = path.is_empty()
            || relative
                .components()
                .any(|c| !matches!(c, Component::Normal(_)));
        if escapes {
            return Err(StoreError::PermissionDenied(format!(
                "object path outside store root: {}",
                path
            )));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    async fn put(&self, path: &str, payload: &[u8]) -> Result<StoredObject, StoreError> {
        if let Some(limit) = self.max_object_bytes {
            if payload.len() > limit {
                return Err(StoreError::PayloadTooLarge {
                    size: payload.len(),
                    limit,
                });
            }
        }

        let target = self.resolve(path)?;
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&target, payload).await?;

        debug!(path = %path, bytes = payload.len(), "Object written");

        Ok(StoredObject {
            path: path.to_string(),
            size: payload.len(),
        })
    }

    async fn public_url(&self, object: &StoredObject) -> Result<String, StoreError> {
        let target = self.resolve(&object.path)?;
        if !tokio::fs::try_exists(&target).await? {
            return Err(StoreError::NotFound(object.path.clone()));
        }

        match &self.public_base_url {
            Some(base) => Ok(format!("{}/{}", base.trim_end_matches('/'), object.path)),
            None => Ok(format!("file://{}", target.display())),
        }
    }

    async fn delete(&self, object: &StoredObject) -> Result<(), StoreError> {
        let target = self.resolve(&object.path)?;
        match tokio::fs::remove_file(&target).await {
            Ok(()) => {
                debug!(path = %object.path, "Object deleted");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StoreError::NotFound(object.path.clone()))
            }
            Err(e) => Err(StoreError::Io(e)),
        }
    }
}
