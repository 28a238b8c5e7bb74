// ABOUTME: Shared plumbing for the crm command line tool
// ABOUTME: Environment configuration, logging setup and session wiring over the SQLite store

pub mod config;
pub mod session;


pub use config::{Config, ConfigError};
pub use session::Session;

use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber. `RUST_LOG` overrides the default filter.
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(crm_config::constants::DEFAULT_LOG_FILTER)),
        )
        .with_target(false)
        .compact()
        .with_writer(std::io::stderr)
        .init();
}
