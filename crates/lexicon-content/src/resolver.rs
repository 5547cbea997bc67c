//! Per-request content resolution
//!
//! [`ContentResolver`] is built once per process configuration. On the first
//! request it decides, once and for good, whether loads are memoized; every
//! request then resolves its locale, loads the matching bundle, and falls
//! back to the fallback locale when the requested one has no content.

use crate::bundle::ContentBundle;
use crate::error::{LoadResult, SourceError};
use crate::loader::{DirectLoader, LoadContent, LoadKey};
use crate::locale::{FallbackLocale, LocaleRequest, LocaleResolver, ResolvedLocale};
use crate::memo::{CacheMetrics, MemoizedLoader};
use crate::source::ContentSource;
use lexicon_common::Result;
use lexicon_config::{Config, Environment};
use once_cell::sync::OnceCell;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, instrument, warn};

type SharedSource = Arc<dyn ContentSource>;

/// Answers "is this a development process?" when the first request arrives.
pub type ModeProbe = Arc<dyn Fn() -> bool + Send + Sync>;

/// How loads are served for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoaderMode {
    /// Every load reads from the content source, so edits show up live.
    Development,
    /// Each key is loaded once and cached forever.
    Caching,
}

impl fmt::Display for LoaderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Caching => write!(f, "caching"),
        }
    }
}

/// Which locale the served bundle came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentOrigin {
    /// The resolved locale had content
    Requested,
    /// The resolved locale had none; the fallback locale's bundle is served
    Fallback,
    /// Neither had content; the bundle is empty
    Empty,
}

/// Content handed to downstream consumers of a request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocalizedContent {
    /// Resolved locale tag of the request, kept even when fallback content is served
    pub locales: String,
    /// The bundle; empty when even the fallback locale has no content
    pub messages: Arc<ContentBundle>,
    /// Where `messages` came from
    pub origin: ContentOrigin,
}

/// Construction-time settings.
#[derive(Debug, Clone)]
pub struct ResolverSettings {
    /// Root directory handed to the content source
    pub content_path: PathBuf,
    /// Fallback locale
    pub fallback: FallbackLocale,
    /// Configured environment, consulted by the default mode probe
    pub environment: Environment,
}

impl ResolverSettings {
    /// Settings from a loaded configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            content_path: config.content.path.clone(),
            fallback: FallbackLocale::parse(&config.content.fallback)?,
            environment: config.environment,
        })
    }
}

type Memoized = MemoizedLoader<DirectLoader<SharedSource>>;

enum ActiveLoader {
    Direct(DirectLoader<SharedSource>),
    Memoized(Memoized),
}

impl ActiveLoader {
    const fn mode(&self) -> LoaderMode {
        match self {
            Self::Direct(_) => LoaderMode::Development,
            Self::Memoized(_) => LoaderMode::Caching,
        }
    }

    async fn load(&self, key: &LoadKey) -> LoadResult {
        match self {
            Self::Direct(loader) => loader.load(key).await,
            Self::Memoized(loader) => loader.load(key).await,
        }
    }
}

/// Resolves each request's locale and content.
pub struct ContentResolver {
    locales: LocaleResolver,
    content_path: PathBuf,
    source: SharedSource,
    probe: ModeProbe,
    loader: OnceCell<ActiveLoader>,
}

impl ContentResolver {
    /// Resolver over `source`.
    ///
    /// The default mode probe reads `LEXICON_ENV` at the first request and
    /// otherwise uses `settings.environment`.
    pub fn new(settings: ResolverSettings, source: impl ContentSource + 'static) -> Self {
        let environment = settings.environment;
        info!(
            content_path = %settings.content_path.display(),
            fallback = %settings.fallback,
            %environment,
            "content resolver configured"
        );

        Self {
            locales: LocaleResolver::new(settings.fallback),
            content_path: settings.content_path,
            source: Arc::new(source),
            probe: Arc::new(move || Environment::current(environment).is_development()),
            loader: OnceCell::new(),
        }
    }

    /// Resolver from a loaded configuration
    pub fn from_config(config: &Config, source: impl ContentSource + 'static) -> Result<Self> {
        Ok(Self::new(ResolverSettings::from_config(config)?, source))
    }

    /// Replace the mode probe. Only effective before the first request.
    #[must_use]
    pub fn with_mode_probe(mut self, probe: impl Fn() -> bool + Send + Sync + 'static) -> Self {
        self.probe = Arc::new(probe);
        self
    }

    /// The fallback locale
    pub const fn fallback(&self) -> &FallbackLocale {
        self.locales.fallback()
    }

    /// Mode chosen at the first request; `None` before it
    pub fn mode(&self) -> Option<LoaderMode> {
        self.loader.get().map(ActiveLoader::mode)
    }

    /// Cache metrics, when running in caching mode
    pub fn cache_metrics(&self) -> Option<Arc<CacheMetrics>> {
        match self.loader.get()? {
            ActiveLoader::Memoized(memo) => Some(memo.metrics()),
            ActiveLoader::Direct(_) => None,
        }
    }

    /// Number of cached keys; zero unless running in caching mode
    pub async fn cached_entries(&self) -> u64 {
        match self.loader.get() {
            Some(ActiveLoader::Memoized(memo)) => memo.entry_count().await,
            _ => 0,
        }
    }

    /// Decide the mode once; concurrent first requests all see one decision.
    fn active_loader(&self) -> &ActiveLoader {
        self.loader.get_or_init(|| {
            let direct = DirectLoader::new(Arc::clone(&self.source), self.content_path.clone());
            let loader = if (self.probe)() {
                ActiveLoader::Direct(direct)
            } else {
                ActiveLoader::Memoized(MemoizedLoader::new(direct))
            };
            info!(mode = %loader.mode(), "content loader initialized");
            loader
        })
    }

    /// Load one key through the active loader
    pub async fn load(&self, key: &LoadKey) -> LoadResult {
        self.active_loader().load(key).await
    }

    /// Resolve a request: locale first, then its content, then the fallback
    /// locale's content if the requested locale has none.
    ///
    /// Only content source failures are errors; missing content, even for
    /// the fallback locale, yields an empty bundle.
    #[instrument(skip_all)]
    pub async fn resolve(&self, request: &LocaleRequest) -> std::result::Result<LocalizedContent, SourceError> {
        let resolved = self.locales.resolve(request);
        let (messages, origin) = self.content_for(&resolved).await?;

        Ok(LocalizedContent {
            locales: resolved.locale,
            messages,
            origin,
        })
    }

    async fn content_for(
        &self,
        resolved: &ResolvedLocale,
    ) -> std::result::Result<(Arc<ContentBundle>, ContentOrigin), SourceError> {
        let key = resolved.load_key();
        if let Some(bundle) = self.load(&key).await? {
            return Ok((bundle, ContentOrigin::Requested));
        }

        let fallback_key = self.fallback().load_key();

        // Already asked for exactly this key.
        let fallback = if fallback_key == key {
            None
        } else {
            info!(locale = %resolved, fallback = %self.fallback(), "content not found, using fallback locale");
            self.load(&fallback_key).await?
        };

        match fallback {
            Some(bundle) => Ok((bundle, ContentOrigin::Fallback)),
            None => {
                warn!(fallback = %self.fallback(), "no content for fallback locale, serving empty bundle");
                Ok((Arc::new(ContentBundle::empty()), ContentOrigin::Empty))
            }
        }
    }
}

impl fmt::Debug for ContentResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentResolver")
            .field("locales", &self.locales)
            .field("content_path", &self.content_path)
            .field("mode", &self.mode())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundle::{LocaleBundles, RawItems};
    use crate::locale::LocaleHint;
    use crate::source::MockContentSource;
    use lexicon_common::test_utils::capture_logs;
    use lexicon_common::LexiconError;
    use serde_json::json;
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn settings() -> ResolverSettings {
        ResolverSettings {
            content_path: PathBuf::from("/content"),
            fallback: FallbackLocale::parse("en-US").unwrap(),
            environment: Environment::Production,
        }
    }

    fn english() -> LocaleBundles {
        let mut items = RawItems::new();
        items.insert("index.properties".to_string(), json!({"greeting": "Hello"}));
        LocaleBundles::from([("en-US".to_string(), items)])
    }

    fn source_with_english_only() -> MockContentSource {
        let mut source = MockContentSource::new();
        source.expect_load_bundles().returning(|_: &Path, country: &str, language: &str| {
            if (country, language) == ("US", "en") {
                Ok(english())
            } else {
                Ok(LocaleBundles::new())
            }
        });
        source
    }

    #[tokio::test]
    async fn test_requested_locale_served() {
        let resolver = ContentResolver::new(settings(), source_with_english_only()).with_mode_probe(|| false);
        let request = LocaleRequest::with_content_locale(LocaleHint::new("en", "US"));

        let content = resolver.resolve(&request).await.unwrap();

        assert_eq!(content.locales, "en-US");
        assert_eq!(content.origin, ContentOrigin::Requested);
        assert_eq!(content.messages.message("index", "greeting"), Some("Hello"));
    }

    #[tokio::test]
    async fn test_fallback_when_requested_locale_missing() {
        let resolver = ContentResolver::new(settings(), source_with_english_only()).with_mode_probe(|| false);
        let request = LocaleRequest::with_content_locale(LocaleHint::new("fr", "CA"));

        let content = resolver.resolve(&request).await.unwrap();

        assert_eq!(content.locales, "fr-CA");
        assert_eq!(content.origin, ContentOrigin::Fallback);
        assert_eq!(content.messages.names(), vec!["index"]);
    }

    #[tokio::test]
    async fn test_empty_when_fallback_missing_too() {
        let mut source = MockContentSource::new();
        source.expect_load_bundles().times(2).returning(|_, _, _| Ok(LocaleBundles::new()));
        let resolver = ContentResolver::new(settings(), source).with_mode_probe(|| true);

        let content = resolver
            .resolve(&LocaleRequest::with_content_locale(LocaleHint::new("fr", "CA")))
            .await
            .unwrap();

        assert_eq!(content.origin, ContentOrigin::Empty);
        assert!(content.messages.is_empty());
    }

    #[tokio::test]
    async fn test_fallback_load_skipped_when_request_is_fallback() {
        let mut source = MockContentSource::new();
        source.expect_load_bundles().times(1).returning(|_, _, _| Ok(LocaleBundles::new()));
        let resolver = ContentResolver::new(settings(), source).with_mode_probe(|| true);

        let content = resolver.resolve(&LocaleRequest::empty()).await.unwrap();

        assert_eq!(content.locales, "en-US");
        assert_eq!(content.origin, ContentOrigin::Empty);
    }

    #[tokio::test]
    async fn test_primary_error_does_not_fall_back() {
        let mut source = MockContentSource::new();
        source
            .expect_load_bundles()
            .times(1)
            .returning(|_, _, _| Err(LexiconError::content("unreadable")));
        let resolver = ContentResolver::new(settings(), source).with_mode_probe(|| false);

        let err = resolver
            .resolve(&LocaleRequest::with_content_locale(LocaleHint::new("fr", "CA")))
            .await
            .unwrap_err();

        assert_eq!(err.locale(), "fr-CA");
    }

    #[tokio::test]
    async fn test_fallback_error_propagates() {
        let mut source = MockContentSource::new();
        source.expect_load_bundles().returning(|_: &Path, country: &str, _: &str| {
            if country == "US" {
                Err(LexiconError::content("fallback unreadable"))
            } else {
                Ok(LocaleBundles::new())
            }
        });
        let resolver = ContentResolver::new(settings(), source).with_mode_probe(|| false);

        let err = resolver
            .resolve(&LocaleRequest::with_content_locale(LocaleHint::new("fr", "CA")))
            .await
            .unwrap_err();

        assert_eq!(err.locale(), "en-US");
    }

    #[tokio::test]
    async fn test_mode_decided_once() {
        let probes = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&probes);
        let resolver = ContentResolver::new(settings(), source_with_english_only()).with_mode_probe(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            false
        });

        assert_eq!(resolver.mode(), None);
        for _ in 0..3 {
            resolver.resolve(&LocaleRequest::empty()).await.unwrap();
        }

        assert_eq!(probes.load(Ordering::SeqCst), 1);
        assert_eq!(resolver.mode(), Some(LoaderMode::Caching));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_first_requests_share_one_decision() {
        let probes = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&probes);
        let mut source = MockContentSource::new();
        source.expect_load_bundles().times(1).returning(|_, _, _| Ok(english()));
        let resolver = Arc::new(ContentResolver::new(settings(), source).with_mode_probe(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            std::thread::sleep(Duration::from_millis(20));
            false
        }));
        let barrier = Arc::new(tokio::sync::Barrier::new(8));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let resolver = Arc::clone(&resolver);
                let barrier = Arc::clone(&barrier);
                tokio::spawn(async move {
                    barrier.wait().await;
                    let content = resolver.resolve(&LocaleRequest::empty()).await.unwrap();
                    (content.origin, resolver.cache_metrics().unwrap())
                })
            })
            .collect();

        let mut metrics = Vec::new();
        for handle in handles {
            let (origin, cache) = handle.await.unwrap();
            assert_eq!(origin, ContentOrigin::Requested);
            metrics.push(cache);
        }

        assert_eq!(probes.load(Ordering::SeqCst), 1);
        assert_eq!(resolver.mode(), Some(LoaderMode::Caching));
        // A second memoized loader would own its own metrics and reload the key.
        assert!(metrics.iter().all(|cache| Arc::ptr_eq(cache, &metrics[0])));
        assert_eq!(metrics[0].misses(), 1);
        assert_eq!(metrics[0].hits(), 7);
    }

    #[test]
    fn test_fallback_switch_logged_when_fallback_loaded() {
        let resolver = ContentResolver::new(settings(), source_with_english_only()).with_mode_probe(|| true);
        let request = LocaleRequest::with_content_locale(LocaleHint::new("fr", "CA"));

        let logs = capture_logs(|| {
            let content = tokio_test::block_on(resolver.resolve(&request)).unwrap();
            assert_eq!(content.origin, ContentOrigin::Fallback);
        });

        assert!(logs.contains("content not found, using fallback locale"));
    }

    #[test]
    fn test_no_fallback_switch_logged_when_request_is_fallback() {
        let mut source = MockContentSource::new();
        source.expect_load_bundles().times(1).returning(|_, _, _| Ok(LocaleBundles::new()));
        let resolver = ContentResolver::new(settings(), source).with_mode_probe(|| true);

        let logs = capture_logs(|| {
            let content = tokio_test::block_on(resolver.resolve(&LocaleRequest::empty())).unwrap();
            assert_eq!(content.origin, ContentOrigin::Empty);
        });

        assert!(!logs.contains("using fallback locale"));
        assert!(logs.contains("serving empty bundle"));
    }

    #[tokio::test]
    async fn test_caching_mode_loads_each_key_once() {
        let mut source = MockContentSource::new();
        source.expect_load_bundles().times(2).returning(|_: &Path, country: &str, _: &str| {
            if country == "US" {
                Ok(english())
            } else {
                Ok(LocaleBundles::new())
            }
        });
        let resolver = ContentResolver::new(settings(), source).with_mode_probe(|| false);
        let request = LocaleRequest::with_content_locale(LocaleHint::new("fr", "CA"));

        for _ in 0..3 {
            let content = resolver.resolve(&request).await.unwrap();
            assert_eq!(content.origin, ContentOrigin::Fallback);
        }

        assert_eq!(resolver.cached_entries().await, 2);
        let metrics = resolver.cache_metrics().unwrap();
        assert_eq!(metrics.misses(), 2);
        assert_eq!(metrics.hits(), 4);
    }

    #[tokio::test]
    async fn test_development_mode_has_no_cache() {
        let mut source = MockContentSource::new();
        source.expect_load_bundles().times(2).returning(|_, _, _| Ok(english()));
        let resolver = ContentResolver::new(settings(), source).with_mode_probe(|| true);
        let key = LoadKey::new("en-US", "US", "en");

        resolver.load(&key).await.unwrap();
        resolver.load(&key).await.unwrap();

        assert_eq!(resolver.mode(), Some(LoaderMode::Development));
        assert!(resolver.cache_metrics().is_none());
        assert_eq!(resolver.cached_entries().await, 0);
    }

    #[test]
    fn test_settings_from_config_rejects_bad_fallback() {
        let mut config = Config::default();
        config.content.fallback = "english".to_string();
        assert!(ResolverSettings::from_config(&config).is_err());

        config.content.fallback = "zh-Hant-TW".to_string();
        assert!(ResolverSettings::from_config(&config).is_err());
    }
}
