//! Draft work persistence
//!
//! Records are stored as JSON bodies keyed by a store-generated UUID. The
//! `created_at` column is filled by SQLite's clock inside the INSERT, and is
//! the value substituted for the pending sentinel when a work is read back.

use crate::models::{DraftWork, ServerTimestamp, StoredWork};
use crate::storage::{CreatedRecord, DocumentStore, StoreError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

#[derive(Clone)]
pub struct SqliteDocumentStore {
    pool: SqlitePool,
}

impl SqliteDocumentStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Load one work by id
    pub async fn fetch(&self, collection: &str, id: &str) -> Result<Option<StoredWork>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, body, created_at
            FROM documents
            WHERE collection = ? AND id = ?
            "#,
        )
        .bind(collection)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|row| stored_work_from_row(&row)).transpose()
    }

    /// All works in a collection, oldest first
    pub async fn list(&self, collection: &str) -> Result<Vec<StoredWork>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, body, created_at
            FROM documents
            WHERE collection = ?
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(collection)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(stored_work_from_row).collect()
    }
}

#[async_trait]
impl DocumentStore for SqliteDocumentStore {
    async fn create(&self, collection: &str, record: &DraftWork) -> Result<CreatedRecord, StoreError> {
        let id = Uuid::new_v4().to_string();
        let body = serde_json::to_string(record)?;

        let row = sqlx::query(
            r#"
            INSERT INTO documents (id, collection, body, created_at)
            VALUES (?, ?, ?, strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
            RETURNING created_at
            "#,
        )
        .bind(&id)
        .bind(collection)
        .bind(&body)
        .fetch_one(&self.pool)
        .await?;

        let created_at = parse_timestamp(row.try_get("created_at")?)?;

        tracing::debug!(collection = %collection, id = %id, "Document created");

        Ok(CreatedRecord { id, created_at })
    }
}

fn stored_work_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<StoredWork, StoreError> {
    let body: String = row.try_get("body")?;
    let mut work: DraftWork = serde_json::from_str(&body)?;
    work.created_at = ServerTimestamp::Assigned(parse_timestamp(row.try_get("created_at")?)?);

    Ok(StoredWork {
        id: row.try_get("id")?,
        work,
    })
}

fn parse_timestamp(raw: String) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(&raw)
        .map(|at| at.with_timezone(&Utc))
        .map_err(|e| StoreError::Database(sqlx::Error::Decode(Box::new(e))))
}
