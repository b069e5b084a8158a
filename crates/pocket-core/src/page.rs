//! # Pagination Normalization
//!
//! The REST backend returns list endpoints in one of two shapes depending on
//! the endpoint and on whether filters are applied:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Response Normalization                             │
//! │                                                                         │
//! │  {count: 42, next: "...", previous: null, results: [...]}              │
//! │       │                                                                 │
//! │       │  pass through unchanged                                         │
//! │       ▼                                                                 │
//! │  PageEnvelope<T> ◄──────────────────────────────────────────┐          │
//! │       ▲                                                      │          │
//! │       │  wrap: count = len, next = previous = null           │          │
//! │       │                                                      │          │
//! │  [item, item, item]                     anything else ───────┘          │
//! │                                         (empty envelope)                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Callers always see a [`PageEnvelope`]. Normalization happens immediately
//! after every list fetch, before the result is cached, so cached values hold
//! one consistent shape.
//!
//! Malformed responses never raise an error at this boundary. They degrade to
//! an empty envelope.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::DEFAULT_PAGE_SIZE;

// =============================================================================
// Page Envelope
// =============================================================================

/// The normalized pagination wrapper for list responses.
///
/// Invariant: `results.len() <= count`. `count` is the total across all
/// pages; `results` holds only the current page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageEnvelope<T> {
    /// Total number of items across all pages.
    pub count: u64,

    /// Opaque cursor to the next page, if any.
    #[serde(default)]
    pub next: Option<String>,

    /// Opaque cursor to the previous page, if any.
    #[serde(default)]
    pub previous: Option<String>,

    /// The items of the current page, in backend order.
    pub results: Vec<T>,
}

impl<T> PageEnvelope<T> {
    /// An envelope with no items (the defensive default for malformed input).
    pub fn empty() -> Self {
        PageEnvelope {
            count: 0,
            next: None,
            previous: None,
            results: Vec::new(),
        }
    }

    /// Wraps a bare item list as a single-page envelope.
    pub fn from_items(items: Vec<T>) -> Self {
        PageEnvelope {
            count: items.len() as u64,
            next: None,
            previous: None,
            results: items,
        }
    }
}

impl<T> Default for PageEnvelope<T> {
    fn default() -> Self {
        PageEnvelope::empty()
    }
}

// =============================================================================
// Shape Detection & Normalization
// =============================================================================

/// Checks whether a raw response is a paginated envelope.
///
/// True iff the response is a JSON object exposing both a `count` and a
/// `results` field.
pub fn is_paginated(response: &Value) -> bool {
    response
        .as_object()
        .is_some_and(|obj| obj.contains_key("count") && obj.contains_key("results"))
}

/// Extracts the item list from a response of either shape.
///
/// Paginated envelope → its `results`; bare array → the array itself;
/// anything else → an empty list. Never fails.
pub fn extract_results(response: &Value) -> Vec<Value> {
    if is_paginated(response) {
        return response
            .get("results")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
    }

    response.as_array().cloned().unwrap_or_default()
}

/// Normalizes a raw list response into a typed [`PageEnvelope`].
///
/// - Already paginated: passed through unchanged.
/// - Bare array: wrapped with `count = len`, no cursors.
/// - Anything else (including an envelope whose items don't deserialize as
///   `T`): an empty envelope.
///
/// Idempotent: normalizing an already-normalized envelope returns it
/// unchanged.
///
/// ## Example
/// ```rust
/// use pocket_core::page::{normalize, PageEnvelope};
/// use serde_json::json;
///
/// let page: PageEnvelope<u32> = normalize(json!([1, 2, 3]));
/// assert_eq!(page.count, 3);
/// assert_eq!(page.results, vec![1, 2, 3]);
/// assert!(page.next.is_none());
/// ```
pub fn normalize<T: DeserializeOwned>(response: Value) -> PageEnvelope<T> {
    if is_paginated(&response) {
        return serde_json::from_value(response).unwrap_or_else(|_| PageEnvelope::empty());
    }

    if response.is_array() {
        return serde_json::from_value::<Vec<T>>(response)
            .map(PageEnvelope::from_items)
            .unwrap_or_else(|_| PageEnvelope::empty());
    }

    PageEnvelope::empty()
}

// =============================================================================
// Page Math & Request Params
// =============================================================================

/// Total number of pages for `count` items at `page_size` per page.
///
/// `page_size` must be greater than zero (caller contract).
pub fn total_pages(count: u64, page_size: u32) -> u64 {
    count.div_ceil(page_size as u64)
}

/// Outgoing pagination request parameters.
///
/// Serializes to `{page, page_size}`, the query-parameter names the backend
/// expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageQuery {
    /// 1-based page number.
    pub page: u32,

    /// Items per page.
    pub page_size: u32,
}

impl PageQuery {
    /// Builds request parameters for the given page.
    pub fn new(page: u32, page_size: u32) -> Self {
        PageQuery { page, page_size }
    }

    /// First page at the default page size.
    pub fn first() -> Self {
        PageQuery::new(1, DEFAULT_PAGE_SIZE)
    }
}

impl Default for PageQuery {
    fn default() -> Self {
        PageQuery::first()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
