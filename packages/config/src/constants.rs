// ABOUTME: Environment variable name constants
// ABOUTME: Centralized definitions of all environment variable names and defaults used across the CRM

// Storage
pub const CRM_DATABASE_PATH: &str = "CRM_DATABASE_PATH";
pub const CRM_MAX_CONNECTIONS: &str = "CRM_MAX_CONNECTIONS";

// Session
pub const CRM_USER_ID: &str = "CRM_USER_ID";

// Board interaction
pub const CRM_DRAG_ACTIVATION_DISTANCE: &str = "CRM_DRAG_ACTIVATION_DISTANCE";

// System
pub const HOME: &str = "HOME";

// Defaults
pub const DEFAULT_USER_ID: &str = "local-user";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_DRAG_ACTIVATION_DISTANCE: f64 = 5.0;
pub const DEFAULT_LOG_FILTER: &str = "warn";
