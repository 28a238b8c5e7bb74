// ABOUTME: Input validation for record creation and updates
// ABOUTME: Collects field-level errors instead of failing on the first one

use crate::types::{CustomerCreateInput, DealCreateInput, TaskCreateInput};
use std::fmt;

/// Validation error for a single input field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}

/// Validates a new deal. Title and customer name are required.
pub fn validate_deal_input(data: &DealCreateInput) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if data.title.trim().is_empty() {
        errors.push(ValidationError::new("title", "Deal title is required"));
    }

    if is_blank(data.customer_name.as_deref()) {
        errors.push(ValidationError::new(
            "customerName",
            "Customer name is required",
        ));
    }

    if !data.value.is_finite() || data.value < 0.0 {
        errors.push(ValidationError::new(
            "value",
            "Deal value must be a non-negative amount",
        ));
    }

    errors
}

/// Validates a new customer. Only the name is required.
pub fn validate_customer_input(data: &CustomerCreateInput) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if data.name.trim().is_empty() {
        errors.push(ValidationError::new("name", "Customer name is required"));
    }

    errors
}

/// Validates a new task. Only the title is required.
pub fn validate_task_input(data: &TaskCreateInput) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if data.title.trim().is_empty() {
        errors.push(ValidationError::new("title", "Task title is required"));
    }

    errors
}

/// Truncates a string to a maximum number of characters with ellipsis
pub fn truncate(text: &str, max_length: usize) -> String {
    if text.chars().count() <= max_length {
        text.to_string()
    } else {
        let kept: String = text.chars().take(max_length.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
