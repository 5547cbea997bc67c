//! The pluggable content source

use crate::bundle::LocaleBundles;
use async_trait::async_trait;
use lexicon_common::Result;
use std::path::Path;
use std::sync::Arc;

/// Loads raw content bundles from wherever they are stored.
///
/// Given a content root, a country and a language, returns the items of
/// every locale the source found, keyed by locale tag. A source may return
/// no entry for the requested locale; that is not an error.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Load bundles for `country`/`language` below `content_path`
    async fn load_bundles(&self, content_path: &Path, country: &str, language: &str) -> Result<LocaleBundles>;
}

#[async_trait]
impl<S: ContentSource + ?Sized> ContentSource for Arc<S> {
    async fn load_bundles(&self, content_path: &Path, country: &str, language: &str) -> Result<LocaleBundles> {
        (**self).load_bundles(content_path, country, language).await
    }
}
