pub mod config;
pub mod error;

pub use config::{Config, DatabaseConfig, ServerConfig, ValidationResult};
pub use error::{AppError, ConfigError, DatabaseError, RusqliteErrorExt, ValidationError};

use anyhow::Result;

/// Initialize logging for the service
pub fn init() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {}", e))?;

    tracing::info!("Surfs Up core initialized");
    Ok(())
}
