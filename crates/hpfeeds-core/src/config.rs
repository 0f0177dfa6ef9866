//! Configuration system for the hpfeeds logger
//!
//! Provides:
//! - Config file discovery (CLI flag, env var, standard paths)
//! - TOML parsing with serde
//! - Environment variable overrides
//! - Validation

use crate::processor::ErrorPolicy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Complete logger configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Logger settings
    pub logger: LoggerSettings,

    /// Enrichment database settings
    pub geo: GeoSettings,

    /// Output settings
    pub output: OutputSettings,
}

/// Logger settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerSettings {
    /// Log level: trace, debug, info, warn, error
    pub log_level: String,

    /// Decoder failure policy
    pub error_policy: ErrorPolicy,
}

impl Default for LoggerSettings {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            error_policy: ErrorPolicy::Lenient,
        }
    }
}

/// Geolocation / ASN databases. Either may be absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeoSettings {
    /// MaxMind City database (.mmdb)
    pub geo_db: Option<PathBuf>,

    /// MaxMind ASN database (.mmdb)
    pub asn_db: Option<PathBuf>,
}

impl GeoSettings {
    pub fn is_enabled(&self) -> bool {
        self.geo_db.is_some() || self.asn_db.is_some()
    }
}

/// JSONL output settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Output file path, stdout when absent
    pub path: Option<PathBuf>,

    /// Append to existing file
    pub append: bool,

    /// Pretty print JSON
    pub pretty: bool,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            path: None,
            append: true,
            pretty: false,
        }
    }
}

/// Configuration loader
pub struct ConfigLoader {
    /// Path to config file (if specified via CLI)
    cli_path: Option<PathBuf>,
}

impl ConfigLoader {
    /// Create a new config loader
    pub fn new() -> Self {
        Self { cli_path: None }
    }

    /// Set the config path from CLI argument
    pub fn with_cli_path(mut self, path: Option<PathBuf>) -> Self {
        self.cli_path = path;
        self
    }

    /// Load configuration with the following precedence:
    /// 1. CLI --config flag
    /// 2. HPFEEDS_CONFIG environment variable
    /// 3. ~/.config/hpfeeds-logger/config.toml
    /// 4. /etc/hpfeeds-logger/config.toml
    /// 5. Default values
    pub fn load(&self) -> ConfigResult<LoggerConfig> {
        let mut config = match self.find_config_file() {
            Some(path) => {
                info!("Loading configuration from: {}", path.display());
                Self::load_from_file(&path)?
            }
            None => {
                debug!("No config file found, using defaults");
                LoggerConfig::default()
            }
        };

        Self::apply_overrides(&mut config, |key| std::env::var(key).ok());
        Self::validate(&config)?;

        Ok(config)
    }

    /// Find the config file to use
    fn find_config_file(&self) -> Option<PathBuf> {
        if let Some(path) = &self.cli_path {
            if path.exists() {
                return Some(path.clone());
            }
            warn!("CLI config path does not exist: {}", path.display());
        }

        if let Ok(env_path) = std::env::var("HPFEEDS_CONFIG") {
            let path = PathBuf::from(&env_path);
            if path.exists() {
                return Some(path);
            }
            warn!("HPFEEDS_CONFIG path does not exist: {}", env_path);
        }

        if let Some(path) = Self::default_config_path() {
            if path.exists() {
                return Some(path);
            }
        }

        #[cfg(unix)]
        {
            let path = PathBuf::from("/etc/hpfeeds-logger/config.toml");
            if path.exists() {
                return Some(path);
            }
        }

        None
    }

    /// Load configuration from a TOML file
    pub fn load_from_file(path: &Path) -> ConfigResult<LoggerConfig> {
        let content = std::fs::read_to_string(path)?;
        let config: LoggerConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Apply `HPFEEDS_*` overrides. `lookup` is the environment.
    fn apply_overrides(config: &mut LoggerConfig, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(val) = lookup("HPFEEDS_LOG_LEVEL") {
            config.logger.log_level = val;
        }
        if let Some(val) = lookup("HPFEEDS_ERROR_POLICY") {
            match val.parse() {
                Ok(policy) => config.logger.error_policy = policy,
                Err(e) => warn!("Ignoring HPFEEDS_ERROR_POLICY: {}", e),
            }
        }
        if let Some(val) = lookup("HPFEEDS_GEO_DB") {
            config.geo.geo_db = Some(PathBuf::from(val));
        }
        if let Some(val) = lookup("HPFEEDS_ASN_DB") {
            config.geo.asn_db = Some(PathBuf::from(val));
        }
        if let Some(val) = lookup("HPFEEDS_OUTPUT_PATH") {
            config.output.path = Some(PathBuf::from(val));
        }
    }

    /// Validate configuration
    fn validate(config: &LoggerConfig) -> ConfigResult<()> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&config.logger.log_level.to_lowercase().as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "Invalid log level: {}. Must be one of: {:?}",
                config.logger.log_level, valid_levels
            )));
        }

        for path in [&config.geo.geo_db, &config.geo.asn_db].into_iter().flatten() {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::ValidationError(
                    "Database path cannot be empty".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// Get the default config file path for the current platform
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("hpfeeds-logger").join("config.toml"))
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Helper module for platform-specific directories
mod dirs {
    use std::path::PathBuf;

    /// Get the user's config directory
    pub fn config_dir() -> Option<PathBuf> {
        #[cfg(unix)]
        {
            std::env::var("XDG_CONFIG_HOME")
                .ok()
                .map(PathBuf::from)
                .or_else(|| {
                    std::env::var("HOME")
                        .ok()
                        .map(|h| PathBuf::from(h).join(".config"))
                })
        }

        #[cfg(windows)]
        {
            std::env::var("APPDATA").ok().map(PathBuf::from)
        }

        #[cfg(not(any(unix, windows)))]
        {
            None
        }
    }
}
