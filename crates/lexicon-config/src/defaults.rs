//! Default values for every configuration section.

use crate::schema::*;
use std::path::PathBuf;

impl Default for Config {
    fn default() -> Self {
        Self {
            content: ContentConfig::default(),
            environment: Environment::default(),
            logging: LoggingSettings::default(),
        }
    }
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("content"),
            fallback: default_fallback(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
        }
    }
}
