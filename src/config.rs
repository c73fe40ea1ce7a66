//! Configuration module for the message board.

use serde::Deserialize;
use std::path::Path;

use crate::{BoardError, Result};

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file, or `:memory:`.
    #[serde(default = "default_db_path")]
    pub path: String,
}

fn default_db_path() -> String {
    "data/board.db".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Listing limits for board pages.
#[derive(Debug, Clone, Deserialize)]
pub struct BoardConfig {
    /// Maximum number of threads returned by a board listing.
    #[serde(default = "default_max_threads")]
    pub max_threads: u32,
    /// Maximum number of replies embedded in each listed thread.
    #[serde(default = "default_max_replies_per_thread")]
    pub max_replies_per_thread: u32,
}

fn default_max_threads() -> u32 {
    10
}

fn default_max_replies_per_thread() -> u32 {
    3
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            max_threads: default_max_threads(),
            max_replies_per_thread: default_max_replies_per_thread(),
        }
    }
}

/// Web API configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebConfig {
    /// Allowed CORS origins. Empty means any origin (development).
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file. Empty disables file logging.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/board.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Board listing limits.
    #[serde(default)]
    pub board: BoardConfig,
    /// Web API configuration.
    #[serde(default)]
    pub web: WebConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(BoardError::Io)?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| BoardError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `BOARD_HOST`: bind address
    /// - `BOARD_PORT`: listen port (ignored if not a valid port number)
    /// - `BOARD_DATABASE_PATH`: SQLite database path
    /// - `BOARD_LOG_LEVEL`: log level
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let lookup = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(host) = lookup("BOARD_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("BOARD_PORT") {
            match port.parse() {
                Ok(port) => self.server.port = port,
                Err(_) => tracing::warn!(value = %port, "Ignoring invalid BOARD_PORT"),
            }
        }
        if let Some(path) = lookup("BOARD_DATABASE_PATH") {
            self.database.path = path;
        }
        if let Some(level) = lookup("BOARD_LOG_LEVEL") {
            self.logging.level = level;
        }
    }

    /// Validate the configuration.
    ///
    /// Returns an error if either listing cap is zero.
    pub fn validate(&self) -> Result<()> {
        if self.board.max_threads == 0 {
            return Err(BoardError::Config(
                "board.max_threads must be greater than zero".to_string(),
            ));
        }
        if self.board.max_replies_per_thread == 0 {
            return Err(BoardError::Config(
                "board.max_replies_per_thread must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
