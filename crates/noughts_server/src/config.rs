//! Server settings: TOML file, then environment, then command-line flags.

use std::path::Path;

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Environment variable overriding the database path.
pub const DB_PATH_ENV: &str = "NOUGHTS_DB";

/// Settings for `noughts serve`.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind.
    #[serde(default = "default_host")]
    host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    port: u16,

    /// SQLite database file.
    #[serde(default = "default_db_path")]
    db_path: String,

    /// Queue move notifications for email delivery; when off they are only
    /// logged.
    #[serde(default = "default_notifications")]
    notifications: bool,

    /// `tracing` filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    log_filter: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_db_path() -> String {
    "noughts.db".to_string()
}

fn default_notifications() -> bool {
    true
}

fn default_log_filter() -> String {
    "info,noughts_server=debug".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            db_path: default_db_path(),
            notifications: default_notifications(),
            log_filter: default_log_filter(),
        }
    }
}

impl ServerConfig {
    /// Loads settings from a TOML file; missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed, or holds
    /// invalid values.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {e}")))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {e}")))?;
        config.validate()?;

        info!(host = %config.host, port = config.port, "Config loaded");
        Ok(config)
    }

    /// Takes the database path from [`DB_PATH_ENV`] when it is set.
    #[instrument(skip(self))]
    pub fn apply_env(mut self) -> Self {
        match std::env::var(DB_PATH_ENV) {
            Ok(path) if !path.is_empty() => {
                debug!(%path, "Database path from environment");
                self.db_path = path;
            }
            _ => {}
        }
        self
    }

    /// Applies command-line overrides.
    pub fn with_overrides(
        mut self,
        host: Option<String>,
        port: Option<u16>,
        db_path: Option<String>,
    ) -> Self {
        if let Some(host) = host {
            self.host = host;
        }
        if let Some(port) = port {
            self.port = port;
        }
        if let Some(db_path) = db_path {
            self.db_path = db_path;
        }
        self
    }

    /// Checks values serde cannot.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for an empty host or database path.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::new("host must not be empty".to_string()));
        }
        if self.db_path.trim().is_empty() {
            return Err(ConfigError::new("db_path must not be empty".to_string()));
        }
        Ok(())
    }

    /// `host:port` for binding.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a configuration error at the caller's location.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
