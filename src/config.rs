//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::table::{CSV_FILENAME, DEFAULT_PAGE_SIZE};

/// Backend used when neither the build nor the environment names one
pub const FALLBACK_API_BASE: &str = "https://realstate-ai-project.onrender.com/api";

/// Base URL baked in at build time, falling back to the hosted backend
pub fn default_api_base() -> String {
    normalize_base_url(option_env!("ESTATE_API_URL").unwrap_or(FALLBACK_API_BASE))
}

/// Remove trailing slashes so paths can be appended directly
pub fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

/// Query endpoint under a base URL
pub fn query_endpoint(base_url: &str) -> String {
    format!("{}/query/", normalize_base_url(base_url))
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub table: TableConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Analysis backend configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_api_base")]
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_api_base(),
        }
    }
}

impl ApiConfig {
    pub fn query_endpoint(&self) -> String {
        query_endpoint(&self.base_url)
    }
}

/// Result table configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TableConfig {
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    #[serde(default = "default_csv_filename")]
    pub csv_filename: String,
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn default_csv_filename() -> String {
    CSV_FILENAME.to_string()
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            csv_filename: default_csv_filename(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|error| ConfigError::Parse {
            path: path.to_path_buf(),
            error,
        })
    }

    fn parse(content: &str) -> Result<Self, String> {
        let mut config: Config = toml::from_str(content).map_err(|e| e.to_string())?;
        config.api.base_url = normalize_base_url(&config.api.base_url);
        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        for path in Self::search_paths() {
            if path.exists() {
                match Self::load_with_env(&path) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        tracing::debug!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Config file locations, in lookup order
    pub fn search_paths() -> Vec<PathBuf> {
        [
            dirs::config_dir().map(|p| p.join("estate-chat").join("config.toml")),
            Some(PathBuf::from("./estate-chat.toml")),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("ESTATE_API_URL") {
            self.api.base_url = normalize_base_url(&url);
        }
        if let Some(size) = lookup("ESTATE_PAGE_SIZE") {
            match size.parse::<usize>() {
                Ok(n) if n > 0 => self.table.page_size = n,
                _ => tracing::warn!("Ignoring invalid ESTATE_PAGE_SIZE: {}", size),
            }
        }
        if let Some(level) = lookup("ESTATE_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("ESTATE_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    format!(
        r#"# Estate Chat Configuration
#
# Environment variables override these settings:
# - ESTATE_API_URL
# - ESTATE_PAGE_SIZE
# - ESTATE_LOG_LEVEL
# - ESTATE_LOG_FORMAT

[api]
# Analysis backend; queries are posted to {{base_url}}/query/
base_url = "{base_url}"

[table]
# Rows per result table page
page_size = {page_size}

# Default file name for CSV exports
csv_filename = "{csv_filename}"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty, json
format = "pretty"
"#,
        base_url = default_api_base(),
        page_size = DEFAULT_PAGE_SIZE,
        csv_filename = CSV_FILENAME,
    )
}
