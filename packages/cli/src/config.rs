use crm_config::constants::{
    CRM_DATABASE_PATH, CRM_DRAG_ACTIVATION_DISTANCE, CRM_MAX_CONNECTIONS, CRM_USER_ID,
    DEFAULT_DRAG_ACTIVATION_DISTANCE, DEFAULT_MAX_CONNECTIONS, DEFAULT_USER_ID,
};
use crm_storage::StorageConfig;
use std::env;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value}")]
    InvalidNumber { name: &'static str, value: String },
    #[error("{name} must be at least {min}, got {value}")]
    OutOfRange {
        name: &'static str,
        min: f64,
        value: f64,
    },
    #[error("{0} must not be empty")]
    Empty(&'static str),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub database_path: PathBuf,
    pub user_id: String,
    pub drag_activation_distance: f64,
    pub max_connections: u32,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_path = match env::var(CRM_DATABASE_PATH) {
            Ok(path) if !path.trim().is_empty() => expand_home(path.trim()),
            _ => crm_core::database_file(),
        };

        let user_id = env::var(CRM_USER_ID).unwrap_or_else(|_| DEFAULT_USER_ID.to_string());
        let user_id = user_id.trim().to_string();
        if user_id.is_empty() {
            return Err(ConfigError::Empty(CRM_USER_ID));
        }

        let drag_activation_distance = match env::var(CRM_DRAG_ACTIVATION_DISTANCE) {
            Ok(raw) => {
                let distance = raw
                    .trim()
                    .parse::<f64>()
                    .map_err(|_| ConfigError::InvalidNumber {
                        name: CRM_DRAG_ACTIVATION_DISTANCE,
                        value: raw.clone(),
                    })?;
                if !distance.is_finite() || distance < 0.0 {
                    return Err(ConfigError::OutOfRange {
                        name: CRM_DRAG_ACTIVATION_DISTANCE,
                        min: 0.0,
                        value: distance,
                    });
                }
                distance
            }
            Err(_) => DEFAULT_DRAG_ACTIVATION_DISTANCE,
        };

        let max_connections = match env::var(CRM_MAX_CONNECTIONS) {
            Ok(raw) => {
                let connections =
                    raw.trim()
                        .parse::<u32>()
                        .map_err(|_| ConfigError::InvalidNumber {
                            name: CRM_MAX_CONNECTIONS,
                            value: raw.clone(),
                        })?;
                if connections == 0 {
                    return Err(ConfigError::OutOfRange {
                        name: CRM_MAX_CONNECTIONS,
                        min: 1.0,
                        value: 0.0,
                    });
                }
                connections
            }
            Err(_) => DEFAULT_MAX_CONNECTIONS,
        };

        Ok(Config {
            database_path,
            user_id,
            drag_activation_distance,
            max_connections,
        })
    }

    pub fn storage_config(&self) -> StorageConfig {
        StorageConfig {
            path: self.database_path.clone(),
            max_connections: self.max_connections,
            ..StorageConfig::default()
        }
    }
}

/// Expand a leading `~/` to the home directory
fn expand_home(path: &str) -> PathBuf {
    match path.strip_prefix("~/") {
        Some(rest) => dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(rest),
        None => PathBuf::from(path),
    }
}
