use std::env;
use std::path::PathBuf;

/// Collection names in the record store
pub mod collections {
    pub const CUSTOMERS: &str = "customers";
    pub const DEALS: &str = "deals";
    pub const TASKS: &str = "tasks";
}

/// Get the path to the CRM data directory (~/.crm)
pub fn crm_dir() -> PathBuf {
    // HOME first so tests can redirect it
    if let Ok(home) = env::var("HOME") {
        PathBuf::from(home).join(".crm")
    } else {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".crm")
    }
}

/// Get the path to the default database file (~/.crm/crm.db)
pub fn database_file() -> PathBuf {
    crm_dir().join("crm.db")
}
