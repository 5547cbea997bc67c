//! Error types and utilities for Lexicon

use thiserror::Error;

/// Result type alias for Lexicon operations
pub type Result<T> = std::result::Result<T, LexiconError>;

/// Main error type for Lexicon operations
#[derive(Error, Debug)]
pub enum LexiconError {
    /// Configuration related errors
    #[error("Configuration error: {message}")]
    Config {
        /// Human readable description
        message: String,
        /// Underlying cause, if any
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// I/O related errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Content loading errors (content source failures, malformed bundles)
    #[error("Content error: {message}")]
    Content {
        /// Human readable description
        message: String,
        /// Locale tag the failing load was for
        locale: Option<String>,
        /// Underlying cause, if any
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Validation errors for user input or data
    #[error("Validation error: {message}")]
    Validation {
        /// Human readable description
        message: String,
        /// Offending field, if known
        field: Option<String>,
    },

    /// Generic error with custom message
    #[error("{message}")]
    Generic {
        /// Human readable description
        message: String,
        /// Underlying cause, if any
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl LexiconError {
    /// Create a new generic error with a custom message
    pub fn new(msg: impl Into<String>) -> Self {
        Self::Generic {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new configuration error with source
    pub fn config_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Config {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new content error
    pub fn content(msg: impl Into<String>) -> Self {
        Self::Content {
            message: msg.into(),
            locale: None,
            source: None,
        }
    }

    /// Create a new content error for a specific locale
    pub fn content_with_locale(msg: impl Into<String>, locale: impl Into<String>) -> Self {
        Self::Content {
            message: msg.into(),
            locale: Some(locale.into()),
            source: None,
        }
    }

    /// Create a new content error for a locale, with source
    pub fn content_with_source(
        msg: impl Into<String>,
        locale: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Content {
            message: msg.into(),
            locale: Some(locale.into()),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new validation error with field name
    pub fn validation_field(msg: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
            field: Some(field.into()),
        }
    }

    /// Locale tag attached to a content error, if any
    pub fn locale(&self) -> Option<&str> {
        match self {
            Self::Content { locale, .. } => locale.as_deref(),
            _ => None,
        }
    }
}
