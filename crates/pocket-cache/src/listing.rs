//! # Cached List Fetch
//!
//! Glue between the TTL cache and the pagination normalizer: every list
//! response is normalized into a [`PageEnvelope`] *before* it is cached, so
//! a cached value always holds the one consistent shape regardless of
//! whether the backend paginated that endpoint.

use std::future::Future;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::Value;

use pocket_core::page::{normalize, PageEnvelope};

use crate::ttl::TtlCache;

/// Fetches a list resource through the cache, normalizing on the way in.
///
/// On a fresh hit the stored envelope is returned and `fetch` is never
/// invoked. On a miss the raw response is fetched, normalized, cached under
/// `key` for `ttl`, and returned. Fetch errors are propagated uncached.
///
/// ## Example
/// ```rust,ignore
/// let cache: TtlCache<PageEnvelope<Product>> = TtlCache::new();
/// let key = cache_key("products", [("page", page)]);
///
/// let page = fetch_normalized(&cache, &key, ttl, || api.get_raw("products/", page)).await?;
/// ```
pub async fn fetch_normalized<T, F, Fut, E>(
    cache: &TtlCache<PageEnvelope<T>>,
    key: &str,
    ttl: Duration,
    fetch: F,
) -> Result<PageEnvelope<T>, E>
where
    T: DeserializeOwned + Clone,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<Value, E>>,
{
    cache
        .wrap_fetch_with_ttl(key, ttl, || async { fetch().await.map(normalize) })
        .await
}

// =============================================================================
// Unit Tests
// =============================================================================
