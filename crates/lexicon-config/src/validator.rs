//! Runtime validation of a loaded configuration.

use crate::loader::ConfigError;
use crate::schema::Config;
use lexicon_common::LogFormat;

/// A single problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// Dotted path of the offending field.
    pub field: &'static str,
    /// What is wrong with it.
    pub message: String,
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validates a configuration, reporting every issue at once.
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        let issues = Self::issues(config);
        if issues.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(issues))
        }
    }

    /// Collects all validation issues without failing.
    pub fn issues(config: &Config) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();

        if config.content.path.as_os_str().is_empty() {
            issues.push(ValidationIssue {
                field: "content.path",
                message: "content path cannot be empty".to_string(),
            });
        }

        if !is_language_country(&config.content.fallback) {
            issues.push(ValidationIssue {
                field: "content.fallback",
                message: format!(
                    "fallback locale '{}' must look like language-COUNTRY",
                    config.content.fallback
                ),
            });
        }

        if LogFormat::from_name(&config.logging.format).is_none() {
            issues.push(ValidationIssue {
                field: "logging.format",
                message: format!(
                    "unknown log format '{}', expected pretty, compact or json",
                    config.logging.format
                ),
            });
        }

        issues
    }
}

/// The fallback must split into exactly one non-empty language and one
/// non-empty country; codes are not checked against any registry.
fn is_language_country(tag: &str) -> bool {
    matches!(
        tag.split_once('-'),
        Some((language, country)) if !language.is_empty() && !country.is_empty() && !country.contains('-')
    )
}
