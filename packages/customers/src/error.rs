use crm_core::ValidationError;
use crm_storage::StorageError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("Failed to load customers: {0}")]
    Load(#[source] StorageError),
    #[error("No user session")]
    NoSession,
    #[error("Invalid customer input: {}", .0.iter().map(ToString::to_string).collect::<Vec<_>>().join(", "))]
    Invalid(Vec<ValidationError>),
    #[error("Customer not found: {0}")]
    NotFound(String),
    #[error("Record store rejected the request: {0}")]
    Remote(#[from] StorageError),
}

pub type DirectoryResult<T> = Result<T, DirectoryError>;
