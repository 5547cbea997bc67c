//! Error types for content loading

use crate::bundle::ContentBundle;
use lexicon_common::LexiconError;
use std::sync::Arc;
use thiserror::Error;

/// Outcome of one load: a bundle, no content for the locale (`None`), or a
/// content source failure.
pub type LoadResult = Result<Option<Arc<ContentBundle>>, SourceError>;

/// The content source failed while loading a locale.
///
/// Cloneable so that a single memoized failure can be handed to every
/// caller of the same key.
#[derive(Debug, Clone, Error)]
#[error("content source failed for locale {locale}: {source}")]
pub struct SourceError {
    locale: String,
    source: Arc<LexiconError>,
}

impl SourceError {
    /// Wrap a content source failure for `locale`
    pub fn new(locale: impl Into<String>, source: LexiconError) -> Self {
        Self {
            locale: locale.into(),
            source: Arc::new(source),
        }
    }

    /// Locale tag whose load failed
    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// The underlying content source error
    pub fn cause(&self) -> &LexiconError {
        &self.source
    }
}

impl From<SourceError> for LexiconError {
    fn from(err: SourceError) -> Self {
        Self::Content {
            message: "content source failed".to_string(),
            locale: Some(err.locale.clone()),
            source: Some(Box::new(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_source_error_display_and_source() {
        let err = SourceError::new("fr-CA", LexiconError::content("disk on fire"));
        assert_eq!(err.locale(), "fr-CA");
        assert!(err.to_string().contains("fr-CA"));
        assert!(err.to_string().contains("disk on fire"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_clones_share_the_cause() {
        let err = SourceError::new("en-US", LexiconError::new("boom"));
        let clone = err.clone();
        assert!(std::ptr::eq(err.cause(), clone.cause()));
    }

    #[test]
    fn test_into_lexicon_error_keeps_locale() {
        let err: LexiconError = SourceError::new("de-DE", LexiconError::new("boom")).into();
        assert_eq!(err.locale(), Some("de-DE"));
    }
}
