// ABOUTME: Integration tests for the task list
// ABOUTME: CRUD, completion toggling and upcoming queries over memory and mock stores

use async_trait::async_trait;
use chrono::{Duration, Utc};
use crm_core::{TaskCreateInput, TaskPriority, TaskUpdateInput};
use crm_storage::{
    Document, Fields, MemoryRecordStore, RecordStore, StorageError, StorageResult,
};
use crm_tasks::{TaskList, TaskListError};
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

async fn loaded_list() -> (Arc<MemoryRecordStore>, TaskList) {
    let store = Arc::new(MemoryRecordStore::new());
    let list = TaskList::new(store.clone());
    list.load(USER).await.unwrap();
    (store, list)
}

fn titled(title: &str) -> TaskCreateInput {
    TaskCreateInput {
        title: title.to_string(),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_create_defaults() {
    let (store, list) = loaded_list().await;

    let task = list.create(titled("Call Acme")).await.unwrap();

    assert_eq!(task.priority, TaskPriority::Medium);
    assert!(!task.completed);
    assert_eq!(task.user_id, USER);
    assert_eq!(store.count("tasks").await, 1);

    let reloaded = TaskList::new(store);
    assert_eq!(reloaded.load(USER).await.unwrap(), vec![task]);
}

#[tokio::test]
async fn test_create_requires_title() {
    let (store, list) = loaded_list().await;

    let result = list.create(titled("   ")).await;

    assert!(matches!(result, Err(TaskListError::Invalid(_))));
    assert_eq!(store.count("tasks").await, 0);
}

#[tokio::test]
async fn test_create_without_session() {
    let list = TaskList::new(Arc::new(MemoryRecordStore::new()));
    assert!(matches!(
        list.create(titled("Call")).await,
        Err(TaskListError::NoSession)
    ));
}

#[tokio::test]
async fn test_toggle_completion_round_trips() {
    let (store, list) = loaded_list().await;
    let task = list.create(titled("Send proposal")).await.unwrap();

    let done = list.toggle_completion(&task.id).await.unwrap();
    assert!(done.completed);
    let stored = store.get("tasks", &task.id).await.unwrap().unwrap();
    assert_eq!(stored.fields.get("completed"), Some(&serde_json::json!(true)));

    let reopened = list.toggle_completion(&task.id).await.unwrap();
    assert!(!reopened.completed);
}

#[tokio::test]
async fn test_update_and_delete() {
    let (store, list) = loaded_list().await;
    let task = list.create(titled("Draft contract")).await.unwrap();

    let updated = list
        .update(
            &task.id,
            TaskUpdateInput {
                priority: Some(TaskPriority::High),
                description: Some("Use the new template".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.priority, TaskPriority::High);
    assert_eq!(updated.title, "Draft contract");

    let stored = store.get("tasks", &task.id).await.unwrap().unwrap();
    assert_eq!(stored.field_str("priority"), Some("high"));

    list.delete(&task.id).await.unwrap();
    assert!(list.is_empty().await);
    assert!(matches!(
        list.delete(&task.id).await,
        Err(TaskListError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_upcoming_and_filtered() {
    let (_, list) = loaded_list().await;
    let now = Utc::now();

    for (title, due) in [
        ("Undated follow-up", None),
        ("Renewal call", Some(now + Duration::days(3))),
        ("Kickoff", Some(now + Duration::days(1))),
    ] {
        list.create(TaskCreateInput {
            title: title.to_string(),
            due_date: due,
            ..Default::default()
        })
        .await
        .unwrap();
    }
    let kickoff = list.filtered("kickoff").await.remove(0);
    list.toggle_completion(&kickoff.id).await.unwrap();

    let upcoming: Vec<String> = list.upcoming(4).await.into_iter().map(|t| t.title).collect();
    assert_eq!(upcoming, vec!["Renewal call", "Undated follow-up"]);

    assert_eq!(list.filtered("CALL").await.len(), 1);
    assert_eq!(list.filtered("").await.len(), 3);
}

fn task_doc(id: &str) -> Document {
    let now = Utc::now();
    let fields = serde_json::json!({ "title": "Call", "userId": USER, "completed": false });
    Document {
        id: id.to_string(),
        fields: fields.as_object().cloned().unwrap(),
        created_at: now,
        updated_at: now,
    }
}

#[tokio::test]
async fn test_rejected_toggle_keeps_local_state() {
    let mut store = MockStore::new();
    store.expect_list().returning(|_| Ok(vec![task_doc("t1")]));
    store
        .expect_update()
        .times(1)
        .returning(|_, _, _| Err(StorageError::Unavailable("offline".to_string())));

    let list = TaskList::new(Arc::new(store));
    list.load(USER).await.unwrap();

    let result = list.toggle_completion("t1").await;

    assert!(matches!(result, Err(TaskListError::Remote(_))));
    assert!(!list.task("t1").await.unwrap().completed);
}

#[tokio::test]
async fn test_load_failure() {
    let mut store = MockStore::new();
    store
        .expect_list()
        .returning(|_| Err(StorageError::Database("locked".to_string())));

    let list = TaskList::new(Arc::new(store));

    assert!(matches!(list.load(USER).await, Err(TaskListError::Load(_))));
    assert!(list.is_empty().await);
}
