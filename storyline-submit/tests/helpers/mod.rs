//! Test Helper Utilities
//!
//! Recording fakes for the stores and navigation sink. All fakes share one
//! call log so tests can assert ordering across collaborators.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use storyline_common::config::SubmissionSettings;
use storyline_common::events::EventBus;
use storyline_submit::models::DraftWork;
use storyline_submit::services::{Navigator, SubmissionOrchestrator};
use storyline_submit::storage::{
    CreatedRecord, DocumentStore, KeyGenerator, ObjectStore, StoreError, StoredObject,
};
use storyline_submit::{build_orchestrator, SubmissionServices};

pub type CallLog = Arc<Mutex<Vec<String>>>;

/// Object store that records calls and can be told to fail
#[derive(Default)]
pub struct FakeObjectStore {
    pub log: CallLog,
    pub fail_put: Mutex<Option<String>>,
    pub fail_url: Mutex<Option<String>>,
    pub fail_delete: Mutex<Option<String>>,
    pub put_delay: Mutex<Option<Duration>>,
    pub objects: Mutex<Vec<String>>,
}

impl FakeObjectStore {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            ..Default::default()
        }
    }

    pub fn put_count(&self) -> usize {
        self.log.lock().iter().filter(|c| c.starts_with("put:")).count()
    }

    pub fn stored_paths(&self) -> Vec<String> {
        self.objects.lock().clone()
    }
}

#[async_trait]
impl ObjectStore for FakeObjectStore {
    async fn put(&self, path: &str, payload: &[u8]) -> Result<StoredObject, StoreError> {
        self.log.lock().push(format!("put:{}", path));
        let delay = *self.put_delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(cause) = self.fail_put.lock().clone() {
            return Err(StoreError::Unavailable(cause));
        }
        self.objects.lock().push(path.to_string());
        Ok(StoredObject {
            path: path.to_string(),
            size: payload.len(),
        })
    }

    async fn public_url(&self, object: &StoredObject) -> Result<String, StoreError> {
        self.log.lock().push(format!("url:{}", object.path));
        if let Some(cause) = self.fail_url.lock().clone() {
            return Err(StoreError::PermissionDenied(cause));
        }
        Ok(format!("https://assets.test/{}", object.path))
    }

    async fn delete(&self, object: &StoredObject) -> Result<(), StoreError> {
        self.log.lock().push(format!("delete:{}", object.path));
        if let Some(cause) = self.fail_delete.lock().clone() {
            return Err(StoreError::Unavailable(cause));
        }
        self.objects.lock().retain(|p| p != &object.path);
        Ok(())
    }
}

/// Document store that keeps created records in memory
#[derive(Default)]
pub struct FakeDocumentStore {
    pub log: CallLog,
    pub fail_create: Mutex<Option<String>>,
    pub create_delay: Mutex<Option<Duration>>,
    pub records: Mutex<Vec<(String, String, DraftWork)>>,
    next_id: AtomicUsize,
}

impl FakeDocumentStore {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            ..Default::default()
        }
    }

    pub fn create_count(&self) -> usize {
        self.log
            .lock()
            .iter()
            .filter(|c| c.starts_with("create:"))
            .count()
    }

    pub fn only_record(&self) -> DraftWork {
        let records = self.records.lock();
        assert_eq!(records.len(), 1, "expected exactly one created record");
        records[0].2.clone()
    }
}

#[async_trait]
impl DocumentStore for FakeDocumentStore {
    async fn create(&self, collection: &str, record: &DraftWork) -> Result<CreatedRecord, StoreError> {
        self.log.lock().push(format!("create:{}", collection));
        let delay = *self.create_delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(cause) = self.fail_create.lock().clone() {
            return Err(StoreError::Unavailable(cause));
        }
        let id = format!("work-{}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        self.records
            .lock()
            .push((collection.to_string(), id.clone(), record.clone()));
        Ok(CreatedRecord {
            id,
            created_at: Utc::now(),
        })
    }
}

#[derive(Default)]
pub struct RecordingNavigator {
    pub paths: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn paths(&self) -> Vec<String> {
        self.paths.lock().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, path: &str) {
        self.paths.lock().push(path.to_string());
    }
}

/// Keys `key-1`, `key-2`, ...
#[derive(Default)]
pub struct SequenceKeyGenerator {
    next: AtomicUsize,
}

impl KeyGenerator for SequenceKeyGenerator {
    fn generate(&self) -> String {
        format!("key-{}", self.next.fetch_add(1, Ordering::SeqCst) + 1)
    }
}

/// Orchestrator wired to fakes
pub struct Harness {
    pub log: CallLog,
    pub objects: Arc<FakeObjectStore>,
    pub documents: Arc<FakeDocumentStore>,
    pub navigator: Arc<RecordingNavigator>,
    pub event_bus: EventBus,
    pub orchestrator: Arc<SubmissionOrchestrator>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_settings(SubmissionSettings::default())
    }

    pub fn with_settings(settings: SubmissionSettings) -> Self {
        let log: CallLog = Arc::new(Mutex::new(Vec::new()));
        let objects = Arc::new(FakeObjectStore::new(log.clone()));
        let documents = Arc::new(FakeDocumentStore::new(log.clone()));
        let navigator = Arc::new(RecordingNavigator::default());
        let event_bus = EventBus::new(64);

        let services = SubmissionServices::new(
            objects.clone(),
            documents.clone(),
            navigator.clone(),
            event_bus.clone(),
        )
        .with_key_generator(Arc::new(SequenceKeyGenerator::default()));

        let orchestrator = Arc::new(
            build_orchestrator(settings, services).expect("default settings are valid"),
        );

        Self {
            log,
            objects,
            documents,
            navigator,
            event_bus,
            orchestrator,
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.log.lock().clone()
    }
}
