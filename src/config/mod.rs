//! Configuration types for the well-depth log converter.

use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while loading, saving or validating a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write config '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid YAML in config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("decimation rate must be at least 1")]
    ZeroDecimationRate,

    #[error("date format must not be empty")]
    EmptyDateFormat,

    #[error("unsupported specifier in date format '{0}'")]
    InvalidDateFormat(String),

    #[error("depth field index must not be 0 (field 0 holds the epoch)")]
    DepthFieldIsEpoch,
}

/// Settings for one conversion pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConverterConfig {
    /// Keep every Nth input line (1-based line numbers, header included)
    #[serde(default = "default_decimation_rate")]
    pub decimation_rate: usize,

    /// Lines starting with this character are comments
    #[serde(default = "default_comment_prefix")]
    pub comment_prefix: char,

    /// chrono format string for the date column
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// First line of the output file
    #[serde(default = "default_header")]
    pub header: String,

    /// Index of the raw depth reading among the space-separated fields
    #[serde(default = "default_depth_field")]
    pub depth_field: usize,
}

fn default_decimation_rate() -> usize {
    10
}

fn default_comment_prefix() -> char {
    '#'
}

fn default_date_format() -> String {
    "%Y-%m-%d_%H%M%S".to_string()
}

fn default_header() -> String {
    "date, epoch, meters".to_string()
}

fn default_depth_field() -> usize {
    2
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            decimation_rate: default_decimation_rate(),
            comment_prefix: default_comment_prefix(),
            date_format: default_date_format(),
            header: default_header(),
            depth_field: default_depth_field(),
        }
    }
}

impl ConverterConfig {
    /// Default settings with a different decimation rate.
    pub fn with_rate(decimation_rate: usize) -> Self {
        Self {
            decimation_rate,
            ..Self::default()
        }
    }

    /// Check the settings before a pass starts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.decimation_rate == 0 {
            return Err(ConfigError::ZeroDecimationRate);
        }
        if self.date_format.is_empty() {
            return Err(ConfigError::EmptyDateFormat);
        }
        if StrftimeItems::new(&self.date_format).any(|item| matches!(item, Item::Error)) {
            return Err(ConfigError::InvalidDateFormat(self.date_format.clone()));
        }
        if self.depth_field == 0 {
            return Err(ConfigError::DepthFieldIsEpoch);
        }
        Ok(())
    }

    /// Load configuration from a YAML file.
    pub fn from_yaml<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: ConverterConfig = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a YAML file.
    pub fn to_yaml<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_converter_config() {
        let config = ConverterConfig::default();
        assert_eq!(config.decimation_rate, 10);
        assert_eq!(config.comment_prefix, '#');
        assert_eq!(config.header, "date, epoch, meters");
        assert_eq!(config.depth_field, 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_rate() {
        let config = ConverterConfig::with_rate(0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ZeroDecimationRate)
        ));
    }

    #[test]
    fn test_validate_rejects_epoch_as_depth() {
        let config = ConverterConfig {
            depth_field: 0,
            ..ConverterConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::DepthFieldIsEpoch)
        ));
    }

    #[test]
    fn test_validate_rejects_bad_date_format() {
        let config = ConverterConfig {
            date_format: "%Y-%Q".to_string(),
            ..ConverterConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidDateFormat(_))
        ));
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config: ConverterConfig = serde_yaml::from_str("decimation_rate: 5\n").unwrap();
        assert_eq!(config.decimation_rate, 5);
        assert_eq!(config.date_format, "%Y-%m-%d_%H%M%S");
    }

    #[test]
    fn test_yaml_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("converter.yaml");

        let config = ConverterConfig::with_rate(3);
        config.to_yaml(&path).unwrap();

        let loaded = ConverterConfig::from_yaml(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_from_yaml_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let result = ConverterConfig::from_yaml(temp_dir.path().join("missing.yaml"));
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }
}
