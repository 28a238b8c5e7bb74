// ABOUTME: Integration tests for the record store backends
// ABOUTME: Runs the same CRUD expectations against the memory and SQLite stores

use crm_storage::{
    Fields, MemoryRecordStore, RecordStore, SqliteRecordStore, StorageConfig, StorageError,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use tempfile::TempDir;

fn fields(value: serde_json::Value) -> Fields {
    value.as_object().cloned().unwrap()
}

async fn create_sqlite_store(temp_dir: &TempDir) -> SqliteRecordStore {
    let config = StorageConfig {
        path: temp_dir.path().join("crm.db"),
        enable_wal: true,
        max_connections: 1,
        busy_timeout_seconds: 5,
    };
    SqliteRecordStore::new(&config).await.unwrap()
}

async fn check_create_and_list(store: &dyn RecordStore) {
    let first = store
        .create("deals", fields(json!({ "title": "First", "status": "OPEN" })))
        .await
        .unwrap();
    let second = store
        .create("deals", fields(json!({ "title": "Second", "status": "WON" })))
        .await
        .unwrap();
    store
        .create("customers", fields(json!({ "name": "Acme" })))
        .await
        .unwrap();

    assert_ne!(first.id, second.id);
    assert!(first.updated_at >= first.created_at);

    let deals = store.list("deals").await.unwrap();
    let titles: Vec<&str> = deals.iter().filter_map(|d| d.field_str("title")).collect();
    assert_eq!(titles, vec!["First", "Second"]);

    assert!(store.list("tasks").await.unwrap().is_empty());
}

async fn check_update_merges_fields(store: &dyn RecordStore) {
    let created = store
        .create("deals", fields(json!({ "title": "Renewal", "status": "OPEN" })))
        .await
        .unwrap();

    store
        .update("deals", &created.id, fields(json!({ "status": "PENDING" })))
        .await
        .unwrap();

    let stored = store.get("deals", &created.id).await.unwrap().unwrap();
    assert_eq!(stored.field_str("status"), Some("PENDING"));
    assert_eq!(stored.field_str("title"), Some("Renewal"));
    assert!(stored.updated_at >= created.updated_at);
    assert_eq!(stored.created_at, created.created_at);
}

async fn check_update_missing_document(store: &dyn RecordStore) {
    let result = store
        .update("deals", "missing", fields(json!({ "status": "WON" })))
        .await;
    assert!(matches!(result, Err(StorageError::NotFound { .. })));
}

async fn check_delete(store: &dyn RecordStore) {
    let created = store
        .create("tasks", fields(json!({ "title": "Call" })))
        .await
        .unwrap();

    store.delete("tasks", &created.id).await.unwrap();
    assert!(store.get("tasks", &created.id).await.unwrap().is_none());

    // Deleting again is not an error
    store.delete("tasks", &created.id).await.unwrap();
}

async fn check_reserved_fields_ignored(store: &dyn RecordStore) {
    let created = store
        .create(
            "customers",
            fields(json!({ "id": "chosen", "name": "Globex", "createdAt": "1999-01-01T00:00:00Z" })),
        )
        .await
        .unwrap();

    assert_ne!(created.id, "chosen");
    assert!(!created.fields.contains_key("id"));
    assert!(!created.fields.contains_key("createdAt"));
}

#[tokio::test]
async fn test_memory_store_crud() {
    let store = MemoryRecordStore::new();
    check_create_and_list(&store).await;
    check_update_merges_fields(&store).await;
    check_update_missing_document(&store).await;
    check_delete(&store).await;
    check_reserved_fields_ignored(&store).await;
}

#[tokio::test]
async fn test_sqlite_store_crud() {
    let temp_dir = TempDir::new().unwrap();
    let store = create_sqlite_store(&temp_dir).await;
    check_create_and_list(&store).await;
    check_update_merges_fields(&store).await;
    check_update_missing_document(&store).await;
    check_delete(&store).await;
    check_reserved_fields_ignored(&store).await;
}

#[tokio::test]
async fn test_sqlite_store_persists_across_reopen() {
    let temp_dir = TempDir::new().unwrap();

    let id = {
        let store = create_sqlite_store(&temp_dir).await;
        store
            .create("deals", fields(json!({ "title": "Kept", "value": 12.5 })))
            .await
            .unwrap()
            .id
    };

    let store = create_sqlite_store(&temp_dir).await;
    let stored = store.get("deals", &id).await.unwrap().unwrap();
    assert_eq!(stored.fields.get("value"), Some(&json!(12.5)));
}

#[tokio::test]
async fn test_sqlite_migrations_applied_once() {
    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();

    let store = SqliteRecordStore::from_pool(pool.clone()).await.unwrap();
    store
        .create("tasks", fields(json!({ "title": "Call" })))
        .await
        .unwrap();

    // A second open over the same database finds nothing left to apply
    let reopened = SqliteRecordStore::from_pool(pool.clone()).await.unwrap();
    assert_eq!(reopened.list("tasks").await.unwrap().len(), 1);

    let versions: Vec<i64> = sqlx::query_scalar("SELECT version FROM _sqlx_migrations ORDER BY version")
        .fetch_all(&pool)
        .await
        .unwrap();
    assert_eq!(versions, vec![1]);
}
