// ABOUTME: Core record types, validation and search for the CRM pipeline
// ABOUTME: Foundational package shared by the storage, pipeline, customer and task packages

pub mod constants;
pub mod format;
pub mod search;
pub mod types;
pub mod utils;
pub mod validation;

// Re-export main types
pub use types::{
    Customer, CustomerCreateInput, CustomerStatus, CustomerUpdateInput, Deal, DealCreateInput,
    DealStage, Task, TaskCreateInput, TaskPriority, TaskUpdateInput, UnknownVariant,
};

// Re-export constants
pub use constants::{collections, crm_dir, database_file};

// Re-export utilities
pub use utils::{generate_document_id, placeholder_customer_id, PLACEHOLDER_CUSTOMER_PREFIX};

// Re-export formatting
pub use format::{format_currency, format_date, format_number, format_relative_date};

// Re-export search
pub use search::{filter_records, matches_query, Searchable};

// Re-export validation
pub use validation::{
    truncate, validate_customer_input, validate_deal_input, validate_task_input, ValidationError,
};
