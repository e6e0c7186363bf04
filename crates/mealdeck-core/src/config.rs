// ── Runtime storefront configuration ──
//
// These types describe *where* the food API lives and how aggressively
// results are cached and retried. They never touch disk: the CLI (via
// mealdeck-config) constructs a `StorefrontConfig` and hands it in.

use std::time::Duration;

use crate::retry::RetryPolicy;

/// Freshness, retention, and retry settings for the query cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachePolicy {
    /// Freshness window for the unfiltered list.
    pub list_stale_time: Duration,
    /// Freshness window for search, filtered, and advanced-search results.
    pub search_stale_time: Duration,
    /// Freshness window for single-record reads.
    pub detail_stale_time: Duration,
    /// How long an unobserved entry survives before garbage collection.
    pub gc_time: Duration,
    /// Retry budget for reads.
    pub query_retry: RetryPolicy,
    /// Retry budget for writes.
    pub mutation_retry: RetryPolicy,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            list_stale_time: Duration::from_secs(5 * 60),
            search_stale_time: Duration::from_secs(2 * 60),
            detail_stale_time: Duration::from_secs(5 * 60),
            gc_time: Duration::from_secs(10 * 60),
            query_retry: RetryPolicy::with_retries(3),
            mutation_retry: RetryPolicy::with_retries(1),
        }
    }
}

/// Configuration for a single storefront session.
///
/// Built by the CLI, passed to `Storefront` -- core never reads config files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorefrontConfig {
    /// API base URL, concatenated verbatim with endpoint paths. May be empty.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Cache and retry behaviour.
    pub cache: CachePolicy,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            timeout: Duration::from_secs(30),
            cache: CachePolicy::default(),
        }
    }
}

impl StorefrontConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }
}
