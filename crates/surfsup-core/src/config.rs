use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Environment variable pointing at an alternative config file.
pub const CONFIG_PATH_ENV: &str = "SURFSUP_CONFIG";

/// Environment variable overriding `database.path`.
pub const DATABASE_PATH_ENV: &str = "SURFSUP_DATABASE";

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Add an error
    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Add a warning
    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a message summarizing all errors
    pub fn error_summary(&self) -> String {
        if self.errors.is_empty() {
            return String::new();
        }
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// HTTP listener settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Observation database settings
    #[serde(default)]
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind the HTTP listener to
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// Parse the bind address and port into a socket address.
    pub fn socket_addr(&self) -> Result<std::net::SocketAddr> {
        let ip: IpAddr = self
            .bind_address
            .parse()
            .with_context(|| format!("Invalid bind address: {}", self.bind_address))?;
        Ok((ip, self.port).into())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite observation database
    #[serde(default = "default_database_path")]
    pub path: PathBuf,

    /// How long a query waits on a locked database before giving up
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
}

fn default_database_path() -> PathBuf {
    PathBuf::from("Resources").join("hawaii.sqlite")
}

fn default_busy_timeout_ms() -> u64 {
    5000
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
            busy_timeout_ms: default_busy_timeout_ms(),
        }
    }
}

impl Config {
    /// Load configuration from file, creating default if it doesn't exist.
    ///
    /// `SURFSUP_CONFIG` replaces the default location and `SURFSUP_DATABASE`
    /// overrides the database path after the file is read.
    pub fn load() -> Result<Self> {
        let config_path = match std::env::var_os(CONFIG_PATH_ENV) {
            Some(path) => PathBuf::from(path),
            None => Self::config_path()?,
        };

        let mut config = if config_path.exists() {
            Self::load_from(&config_path)?
        } else {
            let config = Self::default();
            if let Err(e) = config.save_to(&config_path) {
                tracing::warn!("Could not write default config to {}: {:#}", config_path.display(), e);
            }
            config
        };

        if let Some(path) = std::env::var_os(DATABASE_PATH_ENV) {
            config.database.path = PathBuf::from(path);
        }

        Ok(config)
    }

    /// Load configuration from an explicit file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::NotFound(format!("{}: {}", path.display(), e)))?;

        let config: Config = toml::from_str(&contents)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;

        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load configuration and validate it
    ///
    /// Returns the config along with any validation warnings.
    /// Returns an error if validation fails with critical errors.
    pub fn load_validated() -> Result<(Self, ValidationResult)> {
        let config = Self::load()?;
        let validation = config.validate();

        if !validation.is_valid() {
            return Err(ConfigError::Invalid(validation.error_summary()).into());
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok((config, validation))
    }

    /// Validate the configuration
    ///
    /// Returns a ValidationResult containing any errors or warnings.
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        if self.server.bind_address.parse::<IpAddr>().is_err() {
            result.add_error(
                "server.bind_address",
                format!("Not an IP address: {}", self.server.bind_address),
            );
        }

        if self.server.port == 0 {
            result.add_error("server.port", "Port cannot be 0");
        }

        if self.database.path.as_os_str().is_empty() {
            result.add_error("database.path", "Database path must not be empty");
        } else if !self.database.path.exists() {
            result.add_warning(
                "database.path",
                format!("Database file does not exist: {}", self.database.path.display()),
            );
        } else if !self.database.path.is_file() {
            result.add_error(
                "database.path",
                format!("Path is not a file: {}", self.database.path.display()),
            );
        }

        if self.database.busy_timeout_ms == 0 {
            result.add_warning(
                "database.busy_timeout_ms",
                "Busy timeout disabled; locked reads fail immediately",
            );
        }

        result
    }

    /// Save configuration to the given file
    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        // Ensure config directory exists
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(config_path, contents).context("Failed to write config file")?;

        Ok(())
    }

    /// Get the path to the default configuration file
    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("surfsup");

        Ok(config_dir.join("config.toml"))
    }
}
