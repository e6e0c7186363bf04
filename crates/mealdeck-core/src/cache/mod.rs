// ── Query cache ──
//
// Generic keyed cache used by the food queries and mutations. Values must be
// cheap to clone; the food layer stores `Arc`-wrapped records.

mod key;
mod query_cache;

pub use key::QueryKey;
pub use query_cache::{CacheStats, FetchOptions, QueryCache, QueryState, QueryStatus};
