//! Application-wide error types using thiserror.

use lexicon_common::LexiconError;
use lexicon_config::ConfigError;
use lexicon_content::SourceError;

/// Main application error type.
#[derive(thiserror::Error, Debug)]
pub enum CliError {
    /// Configuration could not be loaded or is invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The content source failed.
    #[error("Content error: {0}")]
    Content(#[from] SourceError),

    /// Setup failure reported by a library crate.
    #[error(transparent)]
    Lexicon(#[from] LexiconError),

    /// Result could not be rendered.
    #[error("Output error: {0}")]
    Output(#[from] serde_json::Error),
}

/// Result type for the command line host.
pub type CliResult<T> = Result<T, CliError>;
