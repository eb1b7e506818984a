//! URL resolution caching.
//!
//! [`ResolveCache`] remembers which route a URL resolved to, together with
//! the raw captures, so that history traversal and repeated visits skip the
//! linear pattern scan. It is gated behind the `cache` feature flag and uses
//! the [`lru`] crate internally.
//!
//! [`CacheStats`] tracks hits, misses, and invalidations so you can monitor
//! cache effectiveness at runtime.
//!
//! # Examples
//!
//! ```
//! use page_navigator::cache::ResolveCache;
//! use page_navigator::RouteParams;
//!
//! let mut cache = ResolveCache::new();
//! cache.insert("/post/5", 2, RouteParams::new().with("id", "5"));
//!
//! let (index, captures) = cache.get("/post/5").unwrap();
//! assert_eq!(index, 2);
//! assert_eq!(captures.get("id"), Some("5"));
//! assert_eq!(cache.stats().hits, 1);
//! ```

use crate::{debug_log, trace_log, RouteParams};
use lru::LruCache;
use std::num::NonZeroUsize;

/// Cached result of resolving one URL.
#[derive(Debug, Clone)]
struct CachedMatch {
    route_index: usize,
    captures: RouteParams,
}

/// Counters tracking cache hit/miss rates and invalidations.
#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    /// Number of cache hits.
    pub hits: usize,
    /// Number of cache misses.
    pub misses: usize,
    /// Number of full cache invalidations (via [`ResolveCache::clear`]).
    pub invalidations: usize,
}

impl CacheStats {
    /// Return the hit rate as a value in `0.0..=1.0`.
    ///
    /// Returns `0.0` if no lookups have been performed.
    #[allow(clippy::cast_precision_loss)]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// LRU cache for URL resolution results.
///
/// The route table clears it whenever a route is registered, so an entry
/// can never point at a stale route index.
#[derive(Debug)]
pub struct ResolveCache {
    entries: LruCache<String, CachedMatch>,
    stats: CacheStats,
}

impl ResolveCache {
    pub const DEFAULT_CAPACITY: NonZeroUsize = match NonZeroUsize::new(256) {
        Some(capacity) => capacity,
        None => panic!("capacity must be non-zero"),
    };

    /// Create a cache with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// Create a cache holding at most `capacity` URLs.
    pub fn with_capacity(capacity: NonZeroUsize) -> Self {
        Self {
            entries: LruCache::new(capacity),
            stats: CacheStats::default(),
        }
    }

    /// Clear the cache and increment the invalidation counter.
    pub fn clear(&mut self) {
        let len = self.entries.len();
        self.entries.clear();
        self.stats.invalidations += 1;
        debug_log!(
            "Resolve cache cleared: {} entries removed ({} total invalidations, hit rate: {:.1}%)",
            len,
            self.stats.invalidations,
            self.stats.hit_rate() * 100.0
        );
    }

    /// Look up the route index and captures `url` resolved to.
    ///
    /// Returns `None` on a cache miss. Updates hit/miss stats.
    pub fn get(&mut self, url: &str) -> Option<(usize, RouteParams)> {
        if let Some(entry) = self.entries.get(url) {
            self.stats.hits += 1;
            trace_log!("Resolve cache hit for '{}'", url);
            Some((entry.route_index, entry.captures.clone()))
        } else {
            self.stats.misses += 1;
            trace_log!("Resolve cache miss for '{}'", url);
            None
        }
    }

    /// Remember that `url` resolved to the route at `route_index`.
    pub fn insert(&mut self, url: impl Into<String>, route_index: usize, captures: RouteParams) {
        self.entries.push(
            url.into(),
            CachedMatch {
                route_index,
                captures,
            },
        );
    }

    /// Return a reference to the current cache statistics.
    pub const fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Reset all counters in [`CacheStats`] to zero.
    pub fn reset_stats(&mut self) {
        self.stats = CacheStats::default();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ResolveCache {
    fn default() -> Self {
        Self::new()
    }
}
