//! # Cache Key Construction
//!
//! Deterministic keys for memoized REST reads: resource prefix plus the
//! request parameters, sorted by name. Two logically identical parameter
//! sets always produce the same key, independent of the order the caller
//! supplies them in.

use std::collections::BTreeMap;
use std::fmt::Display;

/// Builds a cache key from a resource prefix and request parameters.
///
/// Parameters are sorted by name and joined as `k=v&k=v`; an empty
/// parameter set yields the prefix alone.
///
/// ## Example
/// ```rust
/// use pocket_cache::cache_key;
///
/// let a = cache_key("products", [("page", "1"), ("search", "coke")]);
/// let b = cache_key("products", [("search", "coke"), ("page", "1")]);
/// assert_eq!(a, b);
/// assert_eq!(a, "products_page=1&search=coke");
///
/// assert_eq!(cache_key::<&str, &str>("sessions", []), "sessions");
/// ```
pub fn cache_key<K, V>(prefix: &str, params: impl IntoIterator<Item = (K, V)>) -> String
where
    K: Into<String>,
    V: Display,
{
    // BTreeMap gives the sorted iteration order the contract requires.
    let sorted: BTreeMap<String, String> = params
        .into_iter()
        .map(|(k, v)| (k.into(), v.to_string()))
        .collect();

    if sorted.is_empty() {
        return prefix.to_string();
    }

    let joined = sorted
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    format!("{prefix}_{joined}")
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_is_order_independent() {
        let a = cache_key("p", [("b", 1), ("a", 2)]);
        let b = cache_key("p", [("a", 2), ("b", 1)]);
        assert_eq!(a, b);
        assert_eq!(a, "p_a=2&b=1");
    }

    #[test]
    fn test_no_params_yields_prefix() {
        assert_eq!(cache_key::<&str, i64>("inventory", []), "inventory");
    }

    #[test]
    fn test_mixed_value_types_display() {
        let key = cache_key("sales", [("page", "2".to_string()), ("page_size", "50".to_string())]);
        assert_eq!(key, "sales_page=2&page_size=50");
    }

    #[test]
    fn test_duplicate_param_keeps_last() {
        let key = cache_key("p", [("a", 1), ("a", 9)]);
        assert_eq!(key, "p_a=9");
    }
}
