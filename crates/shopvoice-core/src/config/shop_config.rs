//! Top-level shopvoice configuration with layered resolution.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::storage_config::MAX_READ_POOL_SIZE;
use super::{ReportConfig, StorageConfig};
use crate::errors::ConfigError;

/// Name of the project-level config file looked up by [`ShopConfig::load`].
pub const PROJECT_CONFIG_FILENAME: &str = "shopvoice.toml";

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. CLI flags (applied via `apply_cli_overrides`)
/// 2. Environment variables (`SHOPVOICE_*`)
/// 3. Project config (`shopvoice.toml` in the project root)
/// 4. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ShopConfig {
    pub storage: StorageConfig,
    pub reports: ReportConfig,
}

/// CLI override arguments that can be applied to a config.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub db_path: Option<PathBuf>,
    pub read_pool_size: Option<usize>,
    pub seed_sample_data: Option<bool>,
    pub most_reviewed_limit: Option<usize>,
}

impl ShopConfig {
    /// Load configuration with layered resolution rooted at `root`.
    pub fn load(root: &Path, cli_overrides: Option<&CliOverrides>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        let project_config_path = root.join(PROJECT_CONFIG_FILENAME);
        if project_config_path.exists() {
            Self::merge_toml_file(&mut config, &project_config_path)?;
        }

        Self::apply_env_overrides(&mut config);

        if let Some(cli) = cli_overrides {
            Self::apply_cli_overrides(&mut config, cli);
        }

        Self::validate(&config)?;

        Ok(config)
    }

    /// Load configuration from a TOML string (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    /// Validate the configuration values.
    pub fn validate(config: &ShopConfig) -> Result<(), ConfigError> {
        if let Some(size) = config.storage.read_pool_size {
            if size == 0 || size > MAX_READ_POOL_SIZE {
                return Err(ConfigError::ValidationFailed {
                    field: "storage.read_pool_size".to_string(),
                    message: format!("must be between 1 and {MAX_READ_POOL_SIZE}"),
                });
            }
        }
        if let Some(threshold) = config.reports.high_rating_threshold {
            if !(1.0..=5.0).contains(&threshold) {
                return Err(ConfigError::ValidationFailed {
                    field: "reports.high_rating_threshold".to_string(),
                    message: "must be between 1.0 and 5.0".to_string(),
                });
            }
        }
        if config.reports.most_reviewed_limit == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "reports.most_reviewed_limit".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        Ok(())
    }

    /// Merge a TOML file into the existing config.
    /// Unknown keys are silently ignored (forward-compatible).
    fn merge_toml_file(config: &mut ShopConfig, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let file_config: ShopConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`; only `Some` values in `other` win.
    fn merge(base: &mut ShopConfig, other: &ShopConfig) {
        if other.storage.db_path.is_some() {
            base.storage.db_path = other.storage.db_path.clone();
        }
        if other.storage.read_pool_size.is_some() {
            base.storage.read_pool_size = other.storage.read_pool_size;
        }
        if other.storage.busy_timeout_ms.is_some() {
            base.storage.busy_timeout_ms = other.storage.busy_timeout_ms;
        }
        if other.storage.seed_sample_data.is_some() {
            base.storage.seed_sample_data = other.storage.seed_sample_data;
        }

        if other.reports.most_reviewed_limit.is_some() {
            base.reports.most_reviewed_limit = other.reports.most_reviewed_limit;
        }
        if other.reports.high_rating_threshold.is_some() {
            base.reports.high_rating_threshold = other.reports.high_rating_threshold;
        }
    }

    /// Apply environment variable overrides.
    /// Values that fail to parse are ignored with a warning.
    fn apply_env_overrides(config: &mut ShopConfig) {
        if let Ok(val) = std::env::var("SHOPVOICE_DB_PATH") {
            config.storage.db_path = Some(PathBuf::from(val));
        }
        if let Ok(val) = std::env::var("SHOPVOICE_READ_POOL_SIZE") {
            match val.parse::<usize>() {
                Ok(v) => config.storage.read_pool_size = Some(v),
                Err(_) => ::tracing::warn!(value = %val, "ignoring SHOPVOICE_READ_POOL_SIZE"),
            }
        }
        if let Ok(val) = std::env::var("SHOPVOICE_BUSY_TIMEOUT_MS") {
            match val.parse::<u32>() {
                Ok(v) => config.storage.busy_timeout_ms = Some(v),
                Err(_) => ::tracing::warn!(value = %val, "ignoring SHOPVOICE_BUSY_TIMEOUT_MS"),
            }
        }
        if let Ok(val) = std::env::var("SHOPVOICE_MOST_REVIEWED_LIMIT") {
            match val.parse::<usize>() {
                Ok(v) => config.reports.most_reviewed_limit = Some(v),
                Err(_) => {
                    ::tracing::warn!(value = %val, "ignoring SHOPVOICE_MOST_REVIEWED_LIMIT")
                }
            }
        }
    }

    /// Apply CLI overrides (highest priority).
    fn apply_cli_overrides(config: &mut ShopConfig, cli: &CliOverrides) {
        if let Some(ref v) = cli.db_path {
            config.storage.db_path = Some(v.clone());
        }
        if let Some(v) = cli.read_pool_size {
            config.storage.read_pool_size = Some(v);
        }
        if let Some(v) = cli.seed_sample_data {
            config.storage.seed_sample_data = Some(v);
        }
        if let Some(v) = cli.most_reviewed_limit {
            config.reports.most_reviewed_limit = Some(v);
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}
