//! Configuration loading utilities

use crate::schema::{Config, Environment};
use crate::validator::{ConfigValidator, ValidationIssue};
use std::env;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Environment variable naming an explicit configuration file.
pub const CONFIG_PATH_VAR: &str = "LEXICON_CONFIG_PATH";

/// Files probed, in order, when no explicit configuration file is given.
pub const DEFAULT_CONFIG_FILES: [&str; 3] = ["lexicon.yaml", "lexicon.yml", "lexicon.toml"];

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error when reading configuration file
    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML configuration: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// TOML parsing error
    #[error("Failed to parse TOML configuration: {0}")]
    TomlError(#[from] toml::de::Error),

    /// File extension is neither YAML nor TOML
    #[error("Unsupported configuration file format: {0}")]
    UnsupportedFormat(PathBuf),

    /// Environment variable holds an unusable value
    #[error("Invalid value '{value}' for environment variable '{var}'")]
    EnvParseError {
        /// Variable name
        var: String,
        /// Offending value
        value: String,
    },

    /// Configuration validation error
    #[error("Configuration validation failed: {}", describe(.0))]
    Validation(Vec<ValidationIssue>),
}

fn describe(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(|issue| format!("{}: {}", issue.field, issue.message))
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<ConfigError> for lexicon_common::LexiconError {
    fn from(err: ConfigError) -> Self {
        Self::config_with_source("Failed to load configuration", err)
    }
}

/// Serialization format of a configuration file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// `.yaml` / `.yml`
    Yaml,
    /// `.toml`
    Toml,
}

impl ConfigFormat {
    /// Pick the format from a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()?.to_ascii_lowercase().as_str() {
            "yaml" | "yml" => Some(Self::Yaml),
            "toml" => Some(Self::Toml),
            _ => None,
        }
    }
}

/// Configuration loader for the application
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a YAML or TOML file with environment variable overrides
    pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let path = path.as_ref();
        let format = ConfigFormat::from_path(path)
            .ok_or_else(|| ConfigError::UnsupportedFormat(path.to_path_buf()))?;

        debug!(path = %path.display(), ?format, "reading configuration file");
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::parse(&content, format)?;

        Self::apply_env_overrides(&mut config, |var| env::var(var).ok())?;
        ConfigValidator::validate(&config)?;

        info!(
            path = %path.display(),
            content_path = %config.content.path.display(),
            fallback = %config.content.fallback,
            environment = %config.environment,
            "configuration loaded"
        );
        Ok(config)
    }

    /// Load configuration from `LEXICON_CONFIG_PATH`, the default files, or
    /// defaults plus environment overrides, in that order.
    pub fn load() -> Result<Config, ConfigError> {
        if let Ok(config_path) = env::var(CONFIG_PATH_VAR) {
            return Self::load_config(config_path);
        }

        if let Some(found) = DEFAULT_CONFIG_FILES.iter().map(Path::new).find(|p| p.exists()) {
            return Self::load_config(found);
        }

        debug!("no configuration file found, using defaults");
        let mut config = Config::default();
        Self::apply_env_overrides(&mut config, |var| env::var(var).ok())?;
        ConfigValidator::validate(&config)?;
        Ok(config)
    }

    /// Parse configuration text without overrides or validation
    pub fn parse(content: &str, format: ConfigFormat) -> Result<Config, ConfigError> {
        Ok(match format {
            ConfigFormat::Yaml => serde_yaml::from_str(content)?,
            ConfigFormat::Toml => toml::from_str(content)?,
        })
    }

    /// Apply `LEXICON_*` overrides, reading variables through `lookup`
    pub fn apply_env_overrides<F>(config: &mut Config, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup("LEXICON_CONTENT_PATH") {
            config.content.path = PathBuf::from(path);
        }

        if let Some(fallback) = lookup("LEXICON_FALLBACK_LOCALE") {
            config.content.fallback = fallback;
        }

        if let Some(value) = lookup(crate::schema::ENV_VAR) {
            config.environment =
                Environment::from_name(&value).ok_or_else(|| ConfigError::EnvParseError {
                    var: crate::schema::ENV_VAR.to_string(),
                    value,
                })?;
        }

        if let Some(level) = lookup("LEXICON_LOG_LEVEL") {
            config.logging.level = level;
        }

        if let Some(format) = lookup("LEXICON_LOG_FORMAT") {
            config.logging.format = format;
        }

        Ok(())
    }
}
