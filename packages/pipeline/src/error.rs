use crm_storage::StorageError;
use thiserror::Error;

/// Pipeline errors
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Failed to load deals: {0}")]
    Load(#[source] StorageError),
    #[error("Deal not found: {0}")]
    NotFound(String),
    #[error("Record store rejected the request: {0}")]
    Remote(#[from] StorageError),
}

pub type PipelineResult<T> = Result<T, PipelineError>;
