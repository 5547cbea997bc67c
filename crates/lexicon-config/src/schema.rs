//! Configuration schema definitions using serde.

use lexicon_common::{LogFormat, LoggingConfig};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Environment variable consulted for the runtime environment.
pub const ENV_VAR: &str = "LEXICON_ENV";

/// Main configuration structure for Lexicon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Content configuration.
    pub content: ContentConfig,
    /// Runtime environment; decides whether content loads are cached.
    #[serde(default)]
    pub environment: Environment,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Where content bundles live and which locale to fall back to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentConfig {
    /// Root directory handed to the content source.
    pub path: PathBuf,
    /// Fallback locale as `language-COUNTRY`.
    #[serde(default = "default_fallback")]
    pub fallback: String,
}

/// Runtime environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development: content is re-read on every load.
    Development,
    /// Deployed service: content loads are memoized.
    #[default]
    Production,
    /// Automated tests: content loads are memoized.
    Test,
}

impl Environment {
    /// Parse an environment name. Accepts `dev` and `prod` shorthands.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Some(Self::Development),
            "production" | "prod" => Some(Self::Production),
            "test" => Some(Self::Test),
            _ => None,
        }
    }

    /// Whether this is the development environment.
    pub const fn is_development(self) -> bool {
        matches!(self, Self::Development)
    }

    /// Environment as seen right now: `LEXICON_ENV` when it holds a known
    /// name, `configured` otherwise.
    pub fn current(configured: Self) -> Self {
        std::env::var(ENV_VAR)
            .ok()
            .and_then(|value| Self::from_name(&value))
            .unwrap_or(configured)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
            Self::Test => write!(f, "test"),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Log level filter.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Line format: `pretty`, `compact` or `json`.
    #[serde(default = "default_log_format")]
    pub format: String,
    /// Optional log file.
    #[serde(default)]
    pub file: Option<String>,
}

impl LoggingSettings {
    /// Convert into the logging setup consumed by `lexicon_common::init_logging`.
    pub fn to_logging_config(&self) -> LoggingConfig {
        LoggingConfig {
            level: self.level.clone(),
            format: LogFormat::from_name(&self.format).unwrap_or_default(),
            file_path: self.file.clone(),
            ..LoggingConfig::default()
        }
    }
}

pub(crate) fn default_fallback() -> String {
    "en-US".to_string()
}

pub(crate) fn default_log_level() -> String {
    "info".to_string()
}

pub(crate) fn default_log_format() -> String {
    "pretty".to_string()
}
