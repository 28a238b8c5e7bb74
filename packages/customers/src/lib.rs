// ABOUTME: Customer directory for the CRM
// ABOUTME: Loads, searches and edits a user's customers through the record store

pub mod directory;
pub mod error;

pub use directory::{CustomerDirectory, StatusFilter};
pub use error::{DirectoryError, DirectoryResult};
