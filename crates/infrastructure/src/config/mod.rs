//! YAML configuration file.
//!
//! ```yaml
//! storage:
//!   base_path: ~/.relay
//! defaults:
//!   timeout:
//!     connect_ms: 30000
//!     read_ms: 30000
//!   cookies:
//!     auto_manage: true
//! logging:
//!   level: info
//!   format: text
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::adapters::ClientConfig;

/// Errors raised while loading, validating or saving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read or written.
    #[error("config I/O error at {path}: {source}")]
    Io {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The YAML is malformed or does not match the schema.
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// A value is out of range or missing.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    /// Where collections and environments live
    pub storage: StorageConfig,
    /// Defaults for the HTTP client
    pub defaults: DefaultsConfig,
    /// Log output
    pub logging: LoggingConfig,
}

/// Storage location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Root directory; a leading `~/` is expanded to the home directory.
    pub base_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            base_path: dirs::home_dir().map_or_else(|| PathBuf::from(".relay"), |home| home.join(".relay")),
        }
    }
}

/// HTTP client defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Timeouts
    pub timeout: TimeoutConfig,
    /// Cookie handling
    pub cookies: CookiesConfig,
}

/// Timeouts in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Connect timeout
    pub connect_ms: u64,
    /// Whole-request timeout
    pub read_ms: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_ms: 30_000,
            read_ms: 30_000,
        }
    }
}

/// Cookie handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CookiesConfig {
    /// Capture and replay cookies per host
    pub auto_manage: bool,
}

impl Default for CookiesConfig {
    fn default() -> Self {
        Self { auto_manage: true }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// One JSON object per event
    Json,
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    pub level: String,
    /// Output format
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Text,
        }
    }
}

impl RelayConfig {
    /// Parses and validates YAML.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` or `ConfigError::Invalid`.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Renders the configuration as YAML.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` if serialization fails.
    pub fn to_yaml_string(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Loads and validates a config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let yaml = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&yaml)
    }

    /// Validates and writes the config, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails or the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        self.validate()?;
        let yaml = self.to_yaml_string()?;
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        std::fs::write(path, yaml).map_err(io_err)
    }

    /// Checks required values and ranges.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` naming the offending key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage.base_path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("storage.base_path is required".to_string()));
        }
        if self.defaults.timeout.connect_ms == 0 {
            return Err(ConfigError::Invalid(
                "defaults.timeout.connect_ms must be positive".to_string(),
            ));
        }
        if self.defaults.timeout.read_ms == 0 {
            return Err(ConfigError::Invalid(
                "defaults.timeout.read_ms must be positive".to_string(),
            ));
        }
        if self.logging.level.trim().is_empty() {
            return Err(ConfigError::Invalid("logging.level is required".to_string()));
        }
        Ok(())
    }

    /// Returns the storage root with a leading `~/` expanded.
    #[must_use]
    pub fn base_path(&self) -> PathBuf {
        expand_home(&self.storage.base_path)
    }

    /// Builds the HTTP client settings.
    #[must_use]
    pub const fn client_config(&self) -> ClientConfig {
        ClientConfig {
            connect_timeout: Duration::from_millis(self.defaults.timeout.connect_ms),
            read_timeout: Duration::from_millis(self.defaults.timeout.read_ms),
            auto_manage_cookies: self.defaults.cookies.auto_manage,
        }
    }
}

/// Expands a leading `~` or `~/` to the home directory.
#[must_use]
pub fn expand_home(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    dirs::home_dir().map_or_else(|| path.to_path_buf(), |home| home.join(rest))
}
