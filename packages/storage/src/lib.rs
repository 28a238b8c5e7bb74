// ABOUTME: Record store adapter for the CRM pipeline
// ABOUTME: Generic document CRUD over named collections, with memory and SQLite backends

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, warn};

pub mod memory;
pub mod sqlite;

pub use memory::MemoryRecordStore;
pub use sqlite::SqliteRecordStore;

/// Storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Database error: {0}")]
    Database(String),
    #[error("Sqlx error: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Document not found: {collection}/{id}")]
    NotFound { collection: String, id: String },
    #[error("Invalid document format: {0}")]
    InvalidFormat(String),
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Flat mapping of field names to stored values
pub type Fields = serde_json::Map<String, Value>;

/// Fields owned by the store; never written by callers
pub const RESERVED_FIELDS: [&str; 3] = ["id", "createdAt", "updatedAt"];

/// A stored record: server-assigned id and timestamps plus its fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub fields: Fields,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document {
    /// String value of a field, if present and a string
    pub fn field_str(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(Value::as_str)
    }

    /// Decode into a typed record, injecting the id and timestamps
    pub fn decode<T: DeserializeOwned>(&self) -> StorageResult<T> {
        let mut map = self.fields.clone();
        map.insert("id".to_string(), Value::String(self.id.clone()));
        map.insert("createdAt".to_string(), serde_json::to_value(self.created_at)?);
        map.insert("updatedAt".to_string(), serde_json::to_value(self.updated_at)?);
        Ok(serde_json::from_value(Value::Object(map))?)
    }
}

/// Encode a typed record or partial update into storable fields.
///
/// Store-owned fields are stripped.
pub fn encode<T: Serialize>(value: &T) -> StorageResult<Fields> {
    match serde_json::to_value(value)? {
        Value::Object(mut map) => {
            for field in RESERVED_FIELDS {
                map.remove(field);
            }
            Ok(map)
        }
        other => Err(StorageError::InvalidFormat(format!(
            "expected an object, got {}",
            other
        ))),
    }
}

/// Generic CRUD over named collections.
///
/// No transactions and no schema: whatever fields are handed in are stored.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Store a new document; the store assigns its id and timestamps
    async fn create(&self, collection: &str, fields: Fields) -> StorageResult<Document>;

    /// Full unfiltered scan of a collection, in insertion order
    async fn list(&self, collection: &str) -> StorageResult<Vec<Document>>;

    async fn get(&self, collection: &str, id: &str) -> StorageResult<Option<Document>>;

    /// Shallow-merge `fields` into an existing document and bump `updated_at`
    async fn update(&self, collection: &str, id: &str, fields: Fields) -> StorageResult<()>;

    /// Remove a document. Deleting a missing document succeeds.
    async fn delete(&self, collection: &str, id: &str) -> StorageResult<()>;
}

/// A document that could not be decoded into its record type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedDocument {
    pub id: String,
    pub reason: String,
}

/// Documents owned by one user, split into decoded records and rejects
#[derive(Debug, Clone)]
pub struct UserDocuments<T> {
    pub records: Vec<T>,
    pub rejected: Vec<RejectedDocument>,
}

impl<T> Default for UserDocuments<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            rejected: Vec::new(),
        }
    }
}

/// Scan a collection and keep the documents whose `userId` matches.
///
/// Documents that belong to the user but fail to decode are reported in
/// `rejected` rather than dropped.
pub async fn user_documents<T: DeserializeOwned>(
    store: &dyn RecordStore,
    collection: &str,
    user_id: &str,
) -> StorageResult<UserDocuments<T>> {
    if user_id.is_empty() {
        return Ok(UserDocuments::default());
    }

    let documents = store.list(collection).await?;
    let mut result = UserDocuments::default();

    for document in documents
        .iter()
        .filter(|doc| doc.field_str("userId") == Some(user_id))
    {
        match document.decode::<T>() {
            Ok(record) => result.records.push(record),
            Err(e) => {
                warn!("Skipping {}/{}: {}", collection, document.id, e);
                result.rejected.push(RejectedDocument {
                    id: document.id.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    debug!(
        "Loaded {} {} for user {} ({} rejected)",
        result.records.len(),
        collection,
        user_id,
        result.rejected.len()
    );
    Ok(result)
}

/// Storage configuration for the SQLite backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub path: PathBuf,
    pub enable_wal: bool,
    pub max_connections: u32,
    pub busy_timeout_seconds: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: crm_core::database_file(),
            enable_wal: true,
            max_connections: 5,
            busy_timeout_seconds: 30,
        }
    }
}
