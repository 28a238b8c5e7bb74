// ABOUTME: Follow-up task list for the CRM
// ABOUTME: Provides CRUD, completion toggling and upcoming-task queries over the record store

pub mod error;
pub mod list;

pub use error::{TaskListError, TaskListResult};
pub use list::{upcoming_tasks, TaskList};
