//! Object-store and document-store contracts
//!
//! The pipeline only talks to stores through these traits. Reference
//! adapters: [`LocalObjectStore`] here and
//! [`crate::db::SqliteDocumentStore`].

pub mod local_object_store;

pub use local_object_store::LocalObjectStore;

use crate::models::DraftWork;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Store-level failure, carried as the cause of pipeline errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// Store could not be reached
    #[error("store unreachable: {0}")]
    Unavailable(String),

    /// Payload exceeds the store's size limit
    #[error("payload of {size} bytes exceeds limit of {limit} bytes")]
    PayloadTooLarge { size: usize, limit: usize },

    /// Caller may not write or read the location
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// Object or record does not exist
    #[error("not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StoreError {
    /// Cause text as the store reported it, without the variant label
    pub fn cause(&self) -> String {
        match self {
            StoreError::Unavailable(cause) | StoreError::PermissionDenied(cause) => cause.clone(),
            other => other.to_string(),
        }
    }
}

/// Handle to an object written by [`ObjectStore::put`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredObject {
    /// Namespaced path: `<prefix>/<key>`
    pub path: String,
    pub size: usize,
}

/// Identifier and server-assigned fields returned by [`DocumentStore::create`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedRecord {
    pub id: String,
    pub created_at: DateTime<Utc>,
}

#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Write `payload` under `path`
    async fn put(&self, path: &str, payload: &[u8]) -> Result<StoredObject, StoreError>;

    /// Resolve a stable, publicly fetchable reference for a stored object
    async fn public_url(&self, object: &StoredObject) -> Result<String, StoreError>;

    /// Remove a stored object
    async fn delete(&self, object: &StoredObject) -> Result<(), StoreError>;
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert `record` into `collection`
    ///
    /// The store assigns the identifier and replaces the pending
    /// `created_at` sentinel with its own clock.
    async fn create(&self, collection: &str, record: &DraftWork) -> Result<CreatedRecord, StoreError>;
}

/// Source of collision-resistant storage keys
pub trait KeyGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// Random UUIDv4 keys
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidKeyGenerator;

impl KeyGenerator for UuidKeyGenerator {
    fn generate(&self) -> String {
        storyline_common::uuid_utils::generate_key()
    }
}
