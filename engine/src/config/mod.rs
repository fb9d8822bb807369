//! Configuration management
//!
//! This module handles loading, validation, and management of the explorer
//! configuration. Configuration is stored in TOML format at
//! ~/.argonaut/config.toml.
//!
//! # Configuration Sections
//!
//! - **core**: Log level and data directory
//! - **interpreter**: Question-interpretation defaults (region band widths,
//!   default variable, default row limit, default time window)
//! - **store**: Profile store settings (SQLite database path, query timeout)
//!
//! The interpreter defaults exist because the region vocabulary carries
//! judgment calls (how wide is "near the equator"?) that a deployment should
//! be able to tune without a rebuild.
//!
//! # Path Expansion
//!
//! The configuration system automatically expands ~ to the user's home
//! directory and creates the data directory if it doesn't exist.
//!
//! # Examples
//!
//! ```no_run
//! use argonaut_engine::config::Config;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::load_or_create()?;
//! println!("Database: {:?}", config.store.db_path);
//! # Ok(())
//! # }
//! ```

use sdk::errors::ExplorerError;
use sdk::types::Variable;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure
///
/// Represents the complete explorer configuration loaded from
/// ~/.argonaut/config.toml. Every section has sensible defaults, so an empty
/// file is a valid configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Core engine settings
    #[serde(default)]
    pub core: CoreConfig,

    /// Question interpretation defaults
    #[serde(default)]
    pub interpreter: InterpreterConfig,

    /// Profile store settings
    #[serde(default)]
    pub store: StoreConfig,
}

/// Core engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Data directory path (supports ~ expansion)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

/// Question interpretation defaults
///
/// These feed the interpreter's merge step: they fill whatever dimension the
/// question left unspecified.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterpreterConfig {
    /// Half-width in degrees of the latitude band meant by "the equator"
    #[serde(default = "default_equator_band_degrees")]
    pub equator_band_degrees: f64,

    /// Variable assumed when the question names none
    #[serde(default = "default_variable")]
    pub default_variable: String,

    /// Row cap applied when the question names no limit
    #[serde(default = "default_limit")]
    pub default_limit: u32,

    /// Days before "now" covered when the question names no time window
    #[serde(default = "default_window_days")]
    pub default_window_days: i64,
}

/// Profile store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// SQLite database path (supports ~ expansion)
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Seconds to wait for the store before giving up on a query
    #[serde(default = "default_query_timeout_secs")]
    pub query_timeout_secs: u64,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("~/.argonaut/data")
}

fn default_equator_band_degrees() -> f64 {
    5.0
}

fn default_variable() -> String {
    "salinity".to_string()
}

fn default_limit() -> u32 {
    200
}

fn default_window_days() -> i64 {
    30
}

fn default_db_path() -> PathBuf {
    PathBuf::from("~/.argonaut/data/argo.db")
}

fn default_query_timeout_secs() -> u64 {
    30
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            data_dir: default_data_dir(),
        }
    }
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            equator_band_degrees: default_equator_band_degrees(),
            default_variable: default_variable(),
            default_limit: default_limit(),
            default_window_days: default_window_days(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            query_timeout_secs: default_query_timeout_secs(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            core: CoreConfig::default(),
            interpreter: InterpreterConfig::default(),
            store: StoreConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from the default location (~/.argonaut/config.toml)
    ///
    /// If the configuration file doesn't exist, creates a default
    /// configuration. Validates the configuration after loading and returns
    /// descriptive errors if validation fails.
    pub fn load_or_create() -> Result<Self, ExplorerError> {
        let config_path = Self::default_config_path()?;

        if config_path.exists() {
            Self::load_from_path(&config_path)
        } else {
            Self::create_default(&config_path)
        }
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self, ExplorerError> {
        let contents = fs::read_to_string(path)
            .map_err(|e| ExplorerError::Config(format!("Failed to read config file: {}", e)))?;

        let mut config: Config = toml::from_str(&contents)
            .map_err(|e| ExplorerError::Config(format!("Failed to parse config: {}", e)))?;

        config.validate_and_process()?;

        Ok(config)
    }

    /// Create default configuration and save it to path
    fn create_default(path: &Path) -> Result<Self, ExplorerError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                ExplorerError::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let mut config = Self::default();
        config.validate_and_process()?;

        let toml_string = toml::to_string_pretty(&config)
            .map_err(|e| ExplorerError::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(path, toml_string)
            .map_err(|e| ExplorerError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(config)
    }

    /// Get the default configuration file path (~/.argonaut/config.toml)
    fn default_config_path() -> Result<PathBuf, ExplorerError> {
        let home = dirs::home_dir().ok_or_else(|| {
            ExplorerError::Config("Could not determine home directory".to_string())
        })?;

        Ok(home.join(".argonaut").join("config.toml"))
    }

    /// The configured default variable, parsed.
    pub fn default_variable(&self) -> Result<Variable, ExplorerError> {
        Variable::parse(&self.interpreter.default_variable).ok_or_else(|| {
            ExplorerError::Config(format!(
                "Invalid default_variable '{}'. Must be one of: salinity, temperature, pressure",
                self.interpreter.default_variable
            ))
        })
    }

    /// Validate and process configuration
    ///
    /// Validates field ranges, expands ~ in paths, and creates the data
    /// directory if it doesn't exist.
    fn validate_and_process(&mut self) -> Result<(), ExplorerError> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.core.log_level.as_str()) {
            return Err(ExplorerError::Config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.core.log_level,
                valid_log_levels.join(", ")
            )));
        }

        // Parsed here only to fail fast on a bad value
        self.default_variable()?;

        if self.interpreter.equator_band_degrees <= 0.0
            || self.interpreter.equator_band_degrees > 90.0
        {
            return Err(ExplorerError::Config(
                "equator_band_degrees must be in (0, 90]".to_string(),
            ));
        }

        if self.interpreter.default_limit == 0 {
            return Err(ExplorerError::Config(
                "default_limit must be a positive integer".to_string(),
            ));
        }

        if self.interpreter.default_window_days <= 0 {
            return Err(ExplorerError::Config(
                "default_window_days must be a positive number of days".to_string(),
            ));
        }

        self.core.data_dir = expand_path(&self.core.data_dir)?;
        if !self.core.data_dir.exists() {
            fs::create_dir_all(&self.core.data_dir).map_err(|e| {
                ExplorerError::Config(format!("Failed to create data directory: {}", e))
            })?;
        }

        self.store.db_path = expand_path(&self.store.db_path)?;

        Ok(())
    }
}

/// Expand ~ in path to user's home directory
fn expand_path(path: &Path) -> Result<PathBuf, ExplorerError> {
    let path_str = path
        .to_str()
        .ok_or_else(|| ExplorerError::Config("Invalid UTF-8 in path".to_string()))?;

    if let Some(rest) = path_str.strip_prefix("~/") {
        let home = dirs::home_dir().ok_or_else(|| {
            ExplorerError::Config("Could not determine home directory".to_string())
        })?;

        Ok(home.join(rest))
    } else if path_str == "~" {
        dirs::home_dir()
            .ok_or_else(|| ExplorerError::Config("Could not determine home directory".to_string()))
    } else {
        Ok(path.to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let mut config = Config::default();
        // Keep the test out of the real home directory
        config.core.data_dir = std::env::temp_dir().join("argonaut-test-data");
        config.store.db_path = config.core.data_dir.join("argo.db");
        assert!(config.validate_and_process().is_ok());
        assert_eq!(config.interpreter.equator_band_degrees, 5.0);
        assert_eq!(config.interpreter.default_limit, 200);
    }

    #[test]
    fn test_empty_toml_gives_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.core.log_level, "info");
        assert_eq!(config.interpreter.default_variable, "salinity");
        assert_eq!(config.store.query_timeout_secs, 30);
    }

    #[test]
    fn test_invalid_log_level_rejected() {
        let mut config = Config::default();
        config.core.log_level = "verbose".to_string();
        assert!(config.validate_and_process().is_err());
    }

    #[test]
    fn test_invalid_default_variable_rejected() {
        let mut config = Config::default();
        config.interpreter.default_variable = "oxygen".to_string();
        assert!(config.validate_and_process().is_err());
    }

    #[test]
    fn test_zero_limit_rejected() {
        let mut config = Config::default();
        config.interpreter.default_limit = 0;
        assert!(config.validate_and_process().is_err());
    }

    #[test]
    fn test_partial_toml_overrides() {
        let toml_str = r#"
            [interpreter]
            equator_band_degrees = 10.0
        "#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.interpreter.equator_band_degrees, 10.0);
        assert_eq!(config.interpreter.default_limit, 200);
    }
}
