// ABOUTME: In-memory record store
// ABOUTME: Per-collection ordered documents behind an async RwLock

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

use crate::{Document, Fields, RecordStore, StorageError, StorageResult, RESERVED_FIELDS};
use crm_core::generate_document_id;

/// Record store kept entirely in memory. Used for tests and demos.
#[derive(Default)]
pub struct MemoryRecordStore {
    collections: RwLock<HashMap<String, Vec<Document>>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents in a collection
    pub async fn count(&self, collection: &str) -> usize {
        self.collections
            .read()
            .await
            .get(collection)
            .map_or(0, Vec::len)
    }
}

fn strip_reserved(mut fields: Fields) -> Fields {
    for field in RESERVED_FIELDS {
        fields.remove(field);
    }
    fields
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn create(&self, collection: &str, fields: Fields) -> StorageResult<Document> {
        let now = Utc::now();
        let document = Document {
            id: generate_document_id(),
            fields: strip_reserved(fields),
            created_at: now,
            updated_at: now,
        };

        self.collections
            .write()
            .await
            .entry(collection.to_string())
            .or_default()
            .push(document.clone());

        debug!("Created {}/{}", collection, document.id);
        Ok(document)
    }

    async fn list(&self, collection: &str) -> StorageResult<Vec<Document>> {
        Ok(self
            .collections
            .read()
            .await
            .get(collection)
            .cloned()
            .unwrap_or_default())
    }

    async fn get(&self, collection: &str, id: &str) -> StorageResult<Option<Document>> {
        Ok(self
            .collections
            .read()
            .await
            .get(collection)
            .and_then(|docs| docs.iter().find(|doc| doc.id == id).cloned()))
    }

    async fn update(&self, collection: &str, id: &str, fields: Fields) -> StorageResult<()> {
        let mut collections = self.collections.write().await;
        let document = collections
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|doc| doc.id == id))
            .ok_or_else(|| StorageError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            })?;

        document.fields.extend(strip_reserved(fields));
        document.updated_at = Utc::now().max(document.updated_at);

        debug!("Updated {}/{}", collection, id);
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> StorageResult<()> {
        if let Some(docs) = self.collections.write().await.get_mut(collection) {
            docs.retain(|doc| doc.id != id);
        }
        debug!("Deleted {}/{}", collection, id);
        Ok(())
    }
}
