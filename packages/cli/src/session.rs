// ABOUTME: Per-invocation session over the configured record store
// ABOUTME: Opens the SQLite store and hands out loaded views for the configured user

use crm_customers::CustomerDirectory;
use crm_pipeline::{DragTracker, PipelineController};
use crm_storage::{RecordStore, SqliteRecordStore};
use crm_tasks::TaskList;
use std::sync::Arc;
use tracing::debug;

use crate::config::Config;

pub struct Session {
    store: Arc<dyn RecordStore>,
    config: Config,
}

impl Session {
    pub async fn open(config: Config) -> anyhow::Result<Self> {
        let store = SqliteRecordStore::new(&config.storage_config()).await?;
        debug!(
            "Opened record store at {} for user {}",
            config.database_path.display(),
            config.user_id
        );
        Ok(Self::with_store(Arc::new(store), config))
    }

    pub fn with_store(store: Arc<dyn RecordStore>, config: Config) -> Self {
        Self { store, config }
    }

    pub fn user_id(&self) -> &str {
        &self.config.user_id
    }

    pub fn drag_tracker(&self) -> DragTracker {
        DragTracker::new(self.config.drag_activation_distance)
    }

    pub async fn pipeline(&self) -> anyhow::Result<PipelineController> {
        let controller = PipelineController::new(self.store.clone());
        controller.load(self.user_id()).await?;
        Ok(controller)
    }

    pub async fn customers(&self) -> anyhow::Result<CustomerDirectory> {
        let directory = CustomerDirectory::new(self.store.clone());
        directory.load(self.user_id()).await?;
        Ok(directory)
    }

    pub async fn tasks(&self) -> anyhow::Result<TaskList> {
        let list = TaskList::new(self.store.clone());
        list.load(self.user_id()).await?;
        Ok(list)
    }
}
