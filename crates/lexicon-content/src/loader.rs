//! Content loading for a single locale key

use crate::bundle::ContentBundle;
use crate::error::{LoadResult, SourceError};
use crate::source::ContentSource;
use async_trait::async_trait;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Identity of one load: the locale tag plus the country and language
/// handed to the content source.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LoadKey {
    /// Locale tag selected from the source's output
    pub locale: String,
    /// Country passed to the source
    pub country: String,
    /// Language passed to the source
    pub language: String,
}

impl LoadKey {
    /// Build a key
    pub fn new(locale: impl Into<String>, country: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            locale: locale.into(),
            country: country.into(),
            language: language.into(),
        }
    }
}

impl fmt::Display for LoadKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}/{})", self.locale, self.country, self.language)
    }
}

/// Anything that can produce the bundle for a load key.
#[async_trait]
pub trait LoadContent: Send + Sync {
    /// Load the bundle for `key`; `Ok(None)` means the locale has no content.
    async fn load(&self, key: &LoadKey) -> LoadResult;
}

/// Loads straight from a content source on every call.
#[derive(Debug, Clone)]
pub struct DirectLoader<S> {
    source: S,
    content_path: PathBuf,
}

impl<S: ContentSource> DirectLoader<S> {
    /// Loader reading below `content_path`
    pub fn new(source: S, content_path: impl Into<PathBuf>) -> Self {
        Self {
            source,
            content_path: content_path.into(),
        }
    }

    /// Content root handed to the source
    pub fn content_path(&self) -> &Path {
        &self.content_path
    }
}

#[async_trait]
impl<S: ContentSource> LoadContent for DirectLoader<S> {
    #[instrument(skip(self), fields(locale = %key.locale))]
    async fn load(&self, key: &LoadKey) -> LoadResult {
        let mut bundles = self
            .source
            .load_bundles(&self.content_path, &key.country, &key.language)
            .await
            .map_err(|e| SourceError::new(&key.locale, e))?;

        let Some(items) = bundles.remove(&key.locale) else {
            debug!(available = ?bundles.keys().collect::<Vec<_>>(), "no content for locale");
            return Ok(None);
        };

        let bundle = ContentBundle::from_raw(items);
        debug!(items = ?bundle.names(), "loaded and normalized content");
        Ok(Some(Arc::new(bundle)))
    }
}

#[async_trait]
impl<L: LoadContent + ?Sized> LoadContent for Arc<L> {
    async fn load(&self, key: &LoadKey) -> LoadResult {
        (**self).load(key).await
    }
}
