// ABOUTME: Integration tests for the customer directory
// ABOUTME: Exercises CRUD against the memory store and failure handling against a mock store

use async_trait::async_trait;
use crm_core::{CustomerCreateInput, CustomerStatus, CustomerUpdateInput};
use crm_customers::{CustomerDirectory, DirectoryError, StatusFilter};
use crm_storage::{
    Document, Fields, MemoryRecordStore, RecordStore, StorageError, StorageResult,
};
use mockall::mock;
use pretty_assertions::assert_eq;
use std::sync::Arc;

mock! {
    Store {}

    #[async_trait]
    impl RecordStore for Store {
        async fn create(&self, collection: &str, fields: Fields) -> StorageResult<Document>;
        async fn list(&self, collection: &str) -> StorageResult<Vec<Document>>;
        async fn get(&self, collection: &str, id: &str) -> StorageResult<Option<Document>>;
        async fn update(&self, collection: &str, id: &str, fields: Fields) -> StorageResult<()>;
        async fn delete(&self, collection: &str, id: &str) -> StorageResult<()>;
    }
}

const USER: &str = "user-1";

fn input(name: &str, company: Option<&str>, status: CustomerStatus) -> CustomerCreateInput {
    CustomerCreateInput {
        name: name.to_string(),
        email: Some(format!("{}@example.com", name.to_lowercase())),
        company: company.map(str::to_string),
        status: Some(status),
        ..Default::default()
    }
}

async fn seeded() -> (Arc<MemoryRecordStore>, CustomerDirectory) {
    let store = Arc::new(MemoryRecordStore::new());
    let directory = CustomerDirectory::new(store.clone());
    directory.load(USER).await.unwrap();

    directory
        .create(input("Alice", Some("Acme Inc."), CustomerStatus::Active))
        .await
        .unwrap();
    directory
        .create(input("Bob", Some("Globex"), CustomerStatus::Lead))
        .await
        .unwrap();
    directory
        .create(input("Carol", None, CustomerStatus::Active))
        .await
        .unwrap();

    (store, directory)
}

fn names(customers: &[crm_core::Customer]) -> Vec<&str> {
    customers.iter().map(|c| c.name.as_str()).collect()
}

#[tokio::test]
async fn test_create_and_reload() {
    let (store, _) = seeded().await;

    let fresh = CustomerDirectory::new(store);
    let loaded = fresh.load(USER).await.unwrap();

    assert_eq!(names(&loaded), vec!["Alice", "Bob", "Carol"]);
    assert!(loaded.iter().all(|c| c.user_id == USER && c.created_at.is_some()));

    let other = fresh.load("someone-else").await.unwrap();
    assert!(other.is_empty());
}

#[tokio::test]
async fn test_create_requires_name() {
    let (store, directory) = seeded().await;

    let result = directory
        .create(input("  ", None, CustomerStatus::Lead))
        .await;

    assert!(matches!(result, Err(DirectoryError::Invalid(_))));
    assert_eq!(store.count("customers").await, 3);
}

#[tokio::test]
async fn test_create_without_session() {
    let directory = CustomerDirectory::new(Arc::new(MemoryRecordStore::new()));
    let result = directory
        .create(input("Alice", None, CustomerStatus::Lead))
        .await;
    assert!(matches!(result, Err(DirectoryError::NoSession)));
}

#[tokio::test]
async fn test_filtered_by_query_and_status() {
    let (_, directory) = seeded().await;

    let acme = directory.filtered("acme", StatusFilter::All).await;
    assert_eq!(names(&acme), vec!["Alice"]);

    let by_email = directory.filtered("BOB@", StatusFilter::All).await;
    assert_eq!(names(&by_email), vec!["Bob"]);

    let active = directory
        .filtered("", StatusFilter::Only(CustomerStatus::Active))
        .await;
    assert_eq!(names(&active), vec!["Alice", "Carol"]);

    let none = directory
        .filtered("globex", StatusFilter::Only(CustomerStatus::Active))
        .await;
    assert!(none.is_empty());
}

#[tokio::test]
async fn test_update_merges_fields() {
    let (store, directory) = seeded().await;
    let bob = directory.filtered("bob", StatusFilter::All).await.remove(0);

    let updated = directory
        .update(
            &bob.id,
            CustomerUpdateInput {
                status: Some(CustomerStatus::Prospect),
                phone: Some("555-0100".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.status, CustomerStatus::Prospect);
    assert_eq!(updated.company.as_deref(), Some("Globex"));

    let stored = store.get("customers", &bob.id).await.unwrap().unwrap();
    assert_eq!(stored.field_str("status"), Some("PROSPECT"));
    assert_eq!(stored.field_str("phone"), Some("555-0100"));
    assert_eq!(stored.field_str("name"), Some("Bob"));
}

#[tokio::test]
async fn test_update_rejects_blank_name() {
    let (_, directory) = seeded().await;
    let alice = directory.filtered("alice", StatusFilter::All).await.remove(0);

    let result = directory
        .update(
            &alice.id,
            CustomerUpdateInput {
                name: Some(String::new()),
                ..Default::default()
            },
        )
        .await;

    assert!(matches!(result, Err(DirectoryError::Invalid(_))));
    assert_eq!(directory.customer(&alice.id).await.unwrap().name, "Alice");
}

#[tokio::test]
async fn test_delete_and_unknown_ids() {
    let (store, directory) = seeded().await;
    let carol = directory.filtered("carol", StatusFilter::All).await.remove(0);

    directory.delete(&carol.id).await.unwrap();
    assert_eq!(directory.len().await, 2);
    assert_eq!(store.count("customers").await, 2);

    assert!(matches!(
        directory.delete(&carol.id).await,
        Err(DirectoryError::NotFound(_))
    ));
    assert!(matches!(
        directory
            .update("missing", CustomerUpdateInput::default())
            .await,
        Err(DirectoryError::NotFound(_))
    ));
}

fn customer_doc(id: &str) -> Document {
    let now = chrono::Utc::now();
    let fields = serde_json::json!({ "name": "Alice", "status": "ACTIVE", "userId": USER });
    Document {
        id: id.to_string(),
        fields: fields.as_object().cloned().unwrap(),
        created_at: now,
        updated_at: now,
    }
}

#[tokio::test]
async fn test_rejected_writes_leave_local_copy() {
    let mut store = MockStore::new();
    store
        .expect_list()
        .returning(|_| Ok(vec![customer_doc("c1")]));
    store
        .expect_update()
        .returning(|_, _, _| Err(StorageError::Unavailable("offline".to_string())));
    store
        .expect_delete()
        .returning(|_, _| Err(StorageError::Unavailable("offline".to_string())));

    let directory = CustomerDirectory::new(Arc::new(store));
    directory.load(USER).await.unwrap();

    let update = directory
        .update(
            "c1",
            CustomerUpdateInput {
                status: Some(CustomerStatus::Inactive),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(update, Err(DirectoryError::Remote(_))));
    assert_eq!(
        directory.customer("c1").await.unwrap().status,
        CustomerStatus::Active
    );

    let delete = directory.delete("c1").await;
    assert!(matches!(delete, Err(DirectoryError::Remote(_))));
    assert_eq!(directory.len().await, 1);
}

#[tokio::test]
async fn test_load_failure_empties_directory() {
    let mut store = MockStore::new();
    store
        .expect_list()
        .returning(|_| Err(StorageError::Unavailable("offline".to_string())));

    let directory = CustomerDirectory::new(Arc::new(store));
    let result = directory.load(USER).await;

    assert!(matches!(result, Err(DirectoryError::Load(_))));
    assert!(directory.is_empty().await);
}
