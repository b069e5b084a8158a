//! # pocket-cache: TTL Response Cache for the Pocket POS Client Core
//!
//! Generic, time-bounded memoization of idempotent read results.
//!
//! ## Data Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Cached List Fetch                                  │
//! │                                                                         │
//! │  Caller requests a resource                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  cache_key("products", [("page", 1)])  ← deterministic key             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  TtlCache::get(key)                                                    │
//! │       │                                                                 │
//! │       ├── fresh hit ──► return cached PageEnvelope                     │
//! │       │                                                                 │
//! │       └── miss/stale ──► fetch raw response                            │
//! │                              │                                          │
//! │                              ▼                                          │
//! │                          normalize() ← BEFORE caching, always          │
//! │                              │                                          │
//! │                              ▼                                          │
//! │                          TtlCache::set(key, envelope, ttl)             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The cache is an explicitly constructed component. The application root
//! creates one instance per value type and hands it to the services that
//! need it; there is no hidden global map.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod key;
pub mod listing;
pub mod ttl;

// =============================================================================
// Re-exports
// =============================================================================

pub use key::cache_key;
pub use listing::fetch_normalized;
pub use ttl::TtlCache;
