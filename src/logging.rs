//! Tracing subscriber initialization.

use thiserror::Error;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("tracing subscriber already initialized")]
    AlreadyInitialized,
}

/// Install a fmt subscriber.
///
/// `RUST_LOG` takes precedence; otherwise `level` (from `general.log_level`) is used.
pub fn init(level: &str) -> Result<(), LoggingError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .map_err(|_| LoggingError::AlreadyInitialized)
}
