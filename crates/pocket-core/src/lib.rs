//! # pocket-core: Pure Business Logic for the Pocket POS Client Core
//!
//! This crate is the **heart** of the Pocket POS client core. It contains
//! all business logic as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                   Pocket POS Client Architecture                        │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Web Frontend (out of repo)                   │   │
//! │  │    Product List ──► Point of Sale ──► Receipt ──► Sync Badge   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │          pocket-sync / pocket-cache / pocket-db                 │   │
//! │  │    Offline queue, TTL memoization, durable client storage      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ pocket-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐   ┌───────────┐   ┌──────────────────────┐    │   │
//! │  │   │   sale    │   │   money   │   │        page          │    │   │
//! │  │   │OfflineSale│   │   Money   │   │  PageEnvelope<T>     │    │   │
//! │  │   │ SaleDraft │   │  (cents)  │   │  normalize/extract   │    │   │
//! │  │   └───────────┘   └───────────┘   └──────────────────────┘    │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`sale`] - Offline sale domain types and draft coercion
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`page`] - Pagination envelope and response normalization
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **No Clock**: Ids and timestamps are injected by callers
//! 4. **Integer Money**: All monetary values are in cents (i64) to avoid float errors

// =============================================================================
// Module Declarations
// =============================================================================

pub mod money;
pub mod page;
pub mod sale;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use pocket_core::Money` instead of
// `use pocket_core::money::Money`

pub use money::Money;
pub use page::{extract_results, is_paginated, normalize, total_pages, PageEnvelope, PageQuery};
pub use sale::{DraftItem, OfflineSale, OfflineSaleItem, SaleDraft};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Prefix for client-generated sale ids.
///
/// Keeps offline ids distinguishable from server-assigned numeric ids, so a
/// record that never reached the backend can never be mistaken for one that did.
pub const OFFLINE_ID_PREFIX: &str = "offline_";

/// Default number of items per page when the caller doesn't specify one.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Default retention window for synced offline sales, in days.
///
/// Unsynced sales are never subject to retention regardless of age.
pub const DEFAULT_RETENTION_DAYS: i64 = 7;

/// Default time-to-live for cached responses, in milliseconds (5 minutes).
pub const DEFAULT_CACHE_TTL_MS: u64 = 5 * 60 * 1000;
