// ABOUTME: Task list backed by the record store
// ABOUTME: Writes reach the local list only after the store acknowledges them

use chrono::Utc;
use crm_core::{
    collections, filter_records, validate_task_input, Task, TaskCreateInput, TaskUpdateInput,
    ValidationError,
};
use crm_storage::{encode, user_documents, Fields, RecordStore};
use std::cmp::Ordering;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info, warn};

use crate::error::{TaskListError, TaskListResult};

/// Incomplete tasks ordered by due date, undated tasks last, at most `limit`.
///
/// Ties keep their original order.
pub fn upcoming_tasks(tasks: &[Task], limit: usize) -> Vec<&Task> {
    let mut pending: Vec<&Task> = tasks.iter().filter(|task| !task.completed).collect();
    pending.sort_by(|a, b| match (a.due_date, b.due_date) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    pending.truncate(limit);
    pending
}

#[derive(Debug, Default)]
struct ListState {
    user_id: Option<String>,
    tasks: Vec<Task>,
}

#[derive(Clone)]
pub struct TaskList {
    store: Arc<dyn RecordStore>,
    state: Arc<RwLock<ListState>>,
}

impl TaskList {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            store,
            state: Arc::new(RwLock::new(ListState::default())),
        }
    }

    pub async fn load(&self, user_id: &str) -> TaskListResult<Vec<Task>> {
        let loaded = user_documents::<Task>(self.store.as_ref(), collections::TASKS, user_id).await;

        let mut state = self.state.write().await;
        state.user_id = Some(user_id.to_string());
        match loaded {
            Ok(loaded) => {
                state.tasks = loaded.records.clone();
                info!("Loaded {} tasks for user {}", loaded.records.len(), user_id);
                Ok(loaded.records)
            }
            Err(e) => {
                error!("Error fetching tasks for user {}: {}", user_id, e);
                state.tasks.clear();
                Err(TaskListError::Load(e))
            }
        }
    }

    pub async fn create(&self, input: TaskCreateInput) -> TaskListResult<Task> {
        let user_id = match self.state.read().await.user_id.as_deref() {
            Some(user_id) if !user_id.is_empty() => user_id.to_string(),
            _ => return Err(TaskListError::NoSession),
        };

        let errors = validate_task_input(&input);
        if !errors.is_empty() {
            return Err(TaskListError::Invalid(errors));
        }

        let task = Task {
            id: String::new(),
            title: input.title.trim().to_string(),
            description: input.description.filter(|d| !d.trim().is_empty()),
            due_date: input.due_date,
            completed: false,
            priority: input.priority.unwrap_or_default(),
            customer_id: input.customer_id,
            deal_id: input.deal_id,
            user_id,
            created_at: None,
            updated_at: None,
        };

        let document = self
            .store
            .create(collections::TASKS, encode(&task)?)
            .await
            .map_err(|e| {
                error!("Error adding task: {}", e);
                TaskListError::Remote(e)
            })?;
        let created: Task = document.decode()?;

        self.state.write().await.tasks.push(created.clone());
        info!("Created task '{}' with ID {}", created.title, created.id);
        Ok(created)
    }

    /// Flip a task between complete and incomplete
    pub async fn toggle_completion(&self, id: &str) -> TaskListResult<Task> {
        let completed = self.require(id).await?.completed;

        let mut fields = Fields::new();
        fields.insert("completed".to_string(), (!completed).into());
        self.write_update(id, fields).await?;

        self.modify(id, |task| task.completed = !completed).await
    }

    pub async fn update(&self, id: &str, input: TaskUpdateInput) -> TaskListResult<Task> {
        if input.title.as_deref().is_some_and(|title| title.trim().is_empty()) {
            return Err(TaskListError::Invalid(vec![ValidationError::new(
                "title",
                "Task title is required",
            )]));
        }
        self.require(id).await?;
        self.write_update(id, encode(&input)?).await?;

        self.modify(id, move |task| {
            if let Some(title) = input.title {
                task.title = title;
            }
            if let Some(description) = input.description {
                task.description = Some(description);
            }
            if let Some(due_date) = input.due_date {
                task.due_date = Some(due_date);
            }
            if let Some(completed) = input.completed {
                task.completed = completed;
            }
            if let Some(priority) = input.priority {
                task.priority = priority;
            }
            if let Some(customer_id) = input.customer_id {
                task.customer_id = Some(customer_id);
            }
            if let Some(deal_id) = input.deal_id {
                task.deal_id = Some(deal_id);
            }
        })
        .await
    }

    pub async fn delete(&self, id: &str) -> TaskListResult<()> {
        self.require(id).await?;

        self.store
            .delete(collections::TASKS, id)
            .await
            .map_err(|e| {
                error!("Error deleting task {}: {}", id, e);
                TaskListError::Remote(e)
            })?;

        self.state.write().await.tasks.retain(|task| task.id != id);
        info!("Deleted task {}", id);
        Ok(())
    }

    pub async fn upcoming(&self, limit: usize) -> Vec<Task> {
        let state = self.state.read().await;
        upcoming_tasks(&state.tasks, limit)
            .into_iter()
            .cloned()
            .collect()
    }

    pub async fn filtered(&self, query: &str) -> Vec<Task> {
        let state = self.state.read().await;
        filter_records(&state.tasks, query)
            .into_iter()
            .cloned()
            .collect()
    }

    pub async fn tasks(&self) -> Vec<Task> {
        self.state.read().await.tasks.clone()
    }

    pub async fn task(&self, id: &str) -> Option<Task> {
        self.state
            .read()
            .await
            .tasks
            .iter()
            .find(|task| task.id == id)
            .cloned()
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.tasks.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    async fn require(&self, id: &str) -> TaskListResult<Task> {
        self.task(id).await.ok_or_else(|| {
            warn!("Could not find task with ID {}", id);
            TaskListError::NotFound(id.to_string())
        })
    }

    async fn write_update(&self, id: &str, fields: Fields) -> TaskListResult<()> {
        self.store
            .update(collections::TASKS, id, fields)
            .await
            .map_err(|e| {
                error!("Error updating task {}: {}", id, e);
                TaskListError::Remote(e)
            })
    }

    async fn modify<F>(&self, id: &str, change: F) -> TaskListResult<Task>
    where
        F: FnOnce(&mut Task),
    {
        let mut state = self.state.write().await;
        let task = state
            .tasks
            .iter_mut()
            .find(|task| task.id == id)
            .ok_or_else(|| TaskListError::NotFound(id.to_string()))?;

        change(task);
        task.updated_at = Some(Utc::now());
        info!("Updated task {}", id);
        Ok(task.clone())
    }
}
