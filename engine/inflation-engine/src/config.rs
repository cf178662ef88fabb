//! Service configuration management

use anyhow::{bail, Context, Result};
use rate_repository::RepositoryConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Rate repository configuration
    pub repository: RepositoryConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error) or a full filter directive
    pub level: String,

    /// Log format (json, pretty, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "compact".to_string(),
        }
    }
}

impl ServiceConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: ServiceConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

/// Load configuration: defaults, then an optional TOML file, then environment
pub fn load_config(config_file: Option<&Path>) -> Result<ServiceConfig> {
    // A missing .env file is not an error
    dotenv::dotenv().ok();

    let mut config = match config_file {
        Some(path) => {
            tracing::debug!("Loading configuration from file: {:?}", path);
            ServiceConfig::from_file(path)?
        }
        None => ServiceConfig::default(),
    };

    load_from_env(&mut config)?;
    validate_config(&config)?;

    Ok(config)
}

/// Override configuration with environment variables
fn load_from_env(config: &mut ServiceConfig) -> Result<()> {
    if let Ok(data_path) = std::env::var("INFLATION_DATA_PATH") {
        config.repository.data_path = PathBuf::from(data_path);
    }

    if let Ok(year_column) = std::env::var("INFLATION_YEAR_COLUMN") {
        config.repository.columns.year = year_column;
    }

    if let Ok(rate_column) = std::env::var("INFLATION_RATE_COLUMN") {
        config.repository.columns.rate = rate_column;
    }

    if let Ok(max_skips) = std::env::var("INFLATION_MAX_REPORTED_SKIPS") {
        config.repository.max_reported_skips = max_skips.parse().with_context(|| {
            format!("INFLATION_MAX_REPORTED_SKIPS is not a number: {max_skips}")
        })?;
    }

    if let Ok(level) = std::env::var("INFLATION_LOG_LEVEL") {
        config.logging.level = level;
    }

    if let Ok(format) = std::env::var("INFLATION_LOG_FORMAT") {
        config.logging.format = format;
    }

    Ok(())
}

/// Validate configuration
fn validate_config(config: &ServiceConfig) -> Result<()> {
    config.repository.validate().context("Invalid repository configuration")?;

    match config.logging.format.as_str() {
        "json" | "pretty" | "compact" => {}
        other => bail!("Unknown log format '{other}' (expected json, pretty or compact)"),
    }

    if config.logging.level.trim().is_empty() {
        bail!("Log level must not be empty");
    }

    Ok(())
}
