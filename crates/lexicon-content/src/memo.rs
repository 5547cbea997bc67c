//! Memoization of content loads for the lifetime of the process

use crate::error::LoadResult;
use crate::loader::{LoadContent, LoadKey};
use async_trait::async_trait;
use moka::future::Cache;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Cache hit and miss counters
#[derive(Debug, Default)]
pub struct CacheMetrics {
    /// Loads answered from the cache, including callers that joined an in-flight load
    pub hits: AtomicU64,
    /// Loads that ran the wrapped loader
    pub misses: AtomicU64,
}

impl CacheMetrics {
    /// Record a cache hit
    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a cache miss
    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    /// Hits so far
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    /// Misses so far
    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    /// Fraction of loads answered from the cache
    #[allow(clippy::cast_precision_loss)]
    pub fn hit_rate(&self) -> f64 {
        let hits = self.hits() as f64;
        let total = hits + self.misses() as f64;
        if total > 0.0 {
            hits / total
        } else {
            0.0
        }
    }
}

/// Wraps a loader so each distinct key is loaded at most once.
///
/// Concurrent callers of an uncached key share one in-flight load. Every
/// outcome, including no-content and source failures, is kept and replayed
/// to later callers. Entries are never evicted or expired: the cache holds
/// at most one entry per distinct `(locale, country, language)` key ever
/// requested, which is a small, finite set.
pub struct MemoizedLoader<L> {
    inner: L,
    cache: Cache<LoadKey, LoadResult>,
    metrics: Arc<CacheMetrics>,
}

impl<L: LoadContent> MemoizedLoader<L> {
    /// Memoize `inner`
    pub fn new(inner: L) -> Self {
        let cache = Cache::builder().name("lexicon-content").build();

        Self {
            inner,
            cache,
            metrics: Arc::new(CacheMetrics::default()),
        }
    }

    /// The wrapped loader
    pub const fn inner(&self) -> &L {
        &self.inner
    }

    /// Cache metrics
    pub fn metrics(&self) -> Arc<CacheMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Whether `key` has a completed entry
    pub fn contains(&self, key: &LoadKey) -> bool {
        self.cache.contains_key(key)
    }

    /// Number of cached keys, after applying pending cache bookkeeping
    pub async fn entry_count(&self) -> u64 {
        self.cache.run_pending_tasks().await;
        self.cache.entry_count()
    }
}

#[async_trait]
impl<L: LoadContent> LoadContent for MemoizedLoader<L> {
    #[instrument(skip(self), fields(locale = %key.locale))]
    async fn load(&self, key: &LoadKey) -> LoadResult {
        let entry = self
            .cache
            .entry_by_ref(key)
            .or_insert_with(self.inner.load(key))
            .await;

        if entry.is_fresh() {
            self.metrics.record_miss();
            debug!("content loaded and cached");
        } else {
            self.metrics.record_hit();
            debug!(hit_rate = self.metrics.hit_rate(), "content served from cache");
        }

        entry.into_value()
    }
}
