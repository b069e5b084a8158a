//! # TTL Cache
//!
//! A key→entry store with per-entry expiration, used to memoize REST GET
//! responses between refreshes.
//!
//! Entries are evicted lazily: an expired entry is discarded by the next
//! `get` that touches it. [`TtlCache::clean_expired`] exists to bound memory
//! growth under sustained traffic, not for correctness.
//!
//! The store is in-memory only and none of its operations fail. Lock
//! poisoning is treated as a cleared cache, matching the availability-first
//! policy of this layer.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use tracing::debug;

use pocket_core::DEFAULT_CACHE_TTL_MS;

// =============================================================================
// Cache Entry
// =============================================================================

/// A single cached value with its expiration metadata.
#[derive(Debug, Clone)]
struct CacheEntry<V> {
    /// The memoized payload.
    value: V,

    /// When the entry was stored.
    stored_at: Instant,

    /// How long after `stored_at` the entry stays readable.
    ttl: Duration,
}

impl<V> CacheEntry<V> {
    /// An entry is readable only while `now - stored_at <= ttl`.
    fn is_expired(&self) -> bool {
        self.stored_at.elapsed() > self.ttl
    }
}

// =============================================================================
// TTL Cache
// =============================================================================

/// Generic in-memory cache with time-to-live expiration.
///
/// ## Example
/// ```rust
/// use pocket_cache::TtlCache;
///
/// let cache: TtlCache<String> = TtlCache::new();
/// cache.set("greeting", "hello".to_string());
/// assert_eq!(cache.get("greeting"), Some("hello".to_string()));
///
/// cache.delete("greeting");
/// assert_eq!(cache.get("greeting"), None);
/// ```
#[derive(Debug)]
pub struct TtlCache<V> {
    /// Keyed entries. A `Mutex` suffices: accesses are short and the cache
    /// is touched from one logical thread of control at a time.
    entries: Mutex<HashMap<String, CacheEntry<V>>>,

    /// TTL applied when the caller doesn't pass one.
    default_ttl: Duration,
}

impl<V: Clone> TtlCache<V> {
    /// Creates a cache with the default TTL (5 minutes).
    pub fn new() -> Self {
        Self::with_default_ttl(Duration::from_millis(DEFAULT_CACHE_TTL_MS))
    }

    /// Creates a cache with a custom default TTL.
    pub fn with_default_ttl(default_ttl: Duration) -> Self {
        TtlCache {
            entries: Mutex::new(HashMap::new()),
            default_ttl,
        }
    }

    /// Returns the stored value if present and not expired.
    ///
    /// A stale entry is discarded on the way out and reported as absent.
    pub fn get(&self, key: &str) -> Option<V> {
        let Ok(mut entries) = self.entries.lock() else {
            return None;
        };

        match entries.get(key) {
            Some(entry) if entry.is_expired() => {
                entries.remove(key);
                None
            }
            Some(entry) => Some(entry.value.clone()),
            None => None,
        }
    }

    /// Stores a value under `key` with the default TTL.
    ///
    /// Unconditionally overwrites any previous entry and restamps its age.
    pub fn set(&self, key: impl Into<String>, value: V) {
        self.set_with_ttl(key, value, self.default_ttl);
    }

    /// Stores a value under `key` with an explicit TTL.
    pub fn set_with_ttl(&self, key: impl Into<String>, value: V, ttl: Duration) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(
                key.into(),
                CacheEntry {
                    value,
                    stored_at: Instant::now(),
                    ttl,
                },
            );
        }
    }

    /// Removes an entry. Idempotent; absent keys are a no-op.
    pub fn delete(&self, key: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.remove(key);
        }
    }

    /// Empties the whole store. Used on logout or explicit invalidation.
    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.clear();
        }
    }

    /// Removes every stale entry.
    ///
    /// `get` already self-heals, so this is purely a maintenance sweep that
    /// bounds memory under sustained traffic.
    pub fn clean_expired(&self) {
        if let Ok(mut entries) = self.entries.lock() {
            let before = entries.len();
            entries.retain(|_, entry| !entry.is_expired());
            let removed = before - entries.len();
            if removed > 0 {
                debug!(removed, remaining = entries.len(), "Evicted expired cache entries");
            }
        }
    }

    /// Number of entries currently stored (stale entries included until
    /// they are evicted).
    pub fn len(&self) -> usize {
        self.entries.lock().map(|entries| entries.len()).unwrap_or(0)
    }

    /// True when the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fetch-through memoization with the default TTL.
    ///
    /// Returns the cached value when fresh; otherwise awaits `producer`,
    /// stores its result under `key`, and returns it. A producer error is
    /// propagated without caching anything.
    ///
    /// Concurrent callers for the same key may each invoke the producer;
    /// in-flight deduplication is deliberately not provided.
    pub async fn wrap_fetch<F, Fut, E>(&self, key: &str, producer: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        self.wrap_fetch_with_ttl(key, self.default_ttl, producer).await
    }

    /// Fetch-through memoization with an explicit TTL.
    pub async fn wrap_fetch_with_ttl<F, Fut, E>(
        &self,
        key: &str,
        ttl: Duration,
        producer: F,
    ) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(cached) = self.get(key) {
            return Ok(cached);
        }

        debug!(key, "Cache miss, invoking producer");
        let value = producer().await?;
        self.set_with_ttl(key, value.clone(), ttl);
        Ok(value)
    }
}

impl<V: Clone> Default for TtlCache<V> {
    fn default() -> Self {
        TtlCache::new()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
