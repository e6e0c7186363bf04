// ── Keyed query cache ──
//
// Per-key state lives in `watch` channels so observers are pushed every
// transition. Concurrent reads of one key share a single `Shared` fetch
// future, which is spawned so it always runs to completion even when every
// caller stops waiting.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry as MapEntry;
use futures_util::future::{BoxFuture, FutureExt, Shared};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use super::key::QueryKey;
use crate::error::CoreError;
use crate::retry::RetryPolicy;

type SharedFetch<V> = Shared<BoxFuture<'static, Result<V, CoreError>>>;

/// A running fetch and the entry generation it started under.
struct InFlight<V> {
    id: u64,
    generation: u64,
    fetch: SharedFetch<V>,
}

// ── Query state ──────────────────────────────────────────────────────

/// Lifecycle of a cache entry's data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStatus {
    /// Never fetched.
    Idle,
    /// First fetch in progress, no data yet.
    Pending,
    /// Last fetch succeeded (or data was written directly).
    Success,
    /// Last fetch failed after exhausting retries. Older data may remain.
    Error,
}

/// Snapshot of one cache entry.
#[derive(Debug, Clone)]
pub struct QueryState<V> {
    pub status: QueryStatus,
    pub data: Option<V>,
    pub error: Option<CoreError>,
    /// When `data` was last written.
    pub updated_at: Option<Instant>,
    /// A network request for this key is in flight.
    pub is_fetching: bool,
    /// Marked stale by a group invalidation.
    pub is_invalidated: bool,
}

impl<V> Default for QueryState<V> {
    fn default() -> Self {
        Self {
            status: QueryStatus::Idle,
            data: None,
            error: None,
            updated_at: None,
            is_fetching: false,
            is_invalidated: false,
        }
    }
}

impl<V> QueryState<V> {
    /// Whether a read should revalidate this entry.
    pub fn is_stale(&self, stale_time: Duration) -> bool {
        self.is_invalidated || self.updated_at.is_none_or(|at| at.elapsed() >= stale_time)
    }
}

/// Per-read freshness and retry settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchOptions {
    pub stale_time: Duration,
    pub retry: RetryPolicy,
}

/// Counters for cache effectiveness.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Reads answered from cached data (fresh or stale).
    pub hits: u64,
    /// Reads that had to wait for the network.
    pub misses: u64,
    /// Network fetches started.
    pub fetches: u64,
    /// Reads that joined a fetch already in flight.
    pub deduplicated: u64,
}

#[derive(Debug, Default)]
struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
    fetches: AtomicU64,
    deduplicated: AtomicU64,
}

struct Entry<V> {
    state: watch::Sender<QueryState<V>>,
    /// Replaced on every invalidation or direct write. A fetch that
    /// started under an older generation is neither joined by new readers
    /// nor allowed to overwrite existing data.
    generation: AtomicU64,
    created_at: Instant,
}

impl<V> Entry<V> {
    fn new(generation: u64) -> Self {
        let (state, _) = watch::channel(QueryState::default());
        Self {
            state,
            generation: AtomicU64::new(generation),
            created_at: Instant::now(),
        }
    }
}

// ── QueryCache ───────────────────────────────────────────────────────

/// Keyed cache with request deduplication, freshness windows,
/// stale-while-revalidate reads, prefix invalidation, and idle eviction.
pub struct QueryCache<V: Clone + Send + Sync + 'static> {
    entries: DashMap<QueryKey, Arc<Entry<V>>>,
    in_flight: DashMap<QueryKey, InFlight<V>>,
    /// Source of generations and fetch ids; unique across entry recreation.
    sequence: AtomicU64,
    gc_time: Duration,
    counters: Counters,
}

impl<V: Clone + Send + Sync + 'static> QueryCache<V> {
    /// Create an empty cache. Unobserved entries older than `gc_time` are
    /// dropped by [`collect_garbage`](Self::collect_garbage).
    pub fn new(gc_time: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            in_flight: DashMap::new(),
            sequence: AtomicU64::new(0),
            gc_time,
            counters: Counters::default(),
        }
    }

    // ── Reads ────────────────────────────────────────────────────────

    /// Current state for `key`; `Idle` when nothing is cached.
    pub fn get(&self, key: &QueryKey) -> QueryState<V> {
        self.entries
            .get(key)
            .map_or_else(QueryState::default, |entry| entry.state.borrow().clone())
    }

    /// Read `key`, fetching through `fetcher` when needed.
    ///
    /// - fresh data: returned without a network call
    /// - data past its stale time: returned immediately, refresh started in
    ///   the background
    /// - invalidated or no data: waits for the (possibly shared) fetch
    pub async fn fetch<F, Fut>(
        self: &Arc<Self>,
        key: QueryKey,
        options: FetchOptions,
        fetcher: F,
    ) -> Result<V, CoreError>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<V, CoreError>> + Send + 'static,
    {
        let current = self.get(&key);
        let stale = current.is_stale(options.stale_time);
        let invalidated = current.is_invalidated;

        if let Some(data) = current.data.filter(|_| !invalidated) {
            self.counters.hits.fetch_add(1, Ordering::Relaxed);
            if stale {
                debug!(%key, "serving stale data, revalidating");
                drop(self.start_fetch(key, options.retry, fetcher));
            } else {
                trace!(%key, "cache hit");
            }
            return Ok(data);
        }

        self.counters.misses.fetch_add(1, Ordering::Relaxed);
        trace!(%key, "cache miss");
        self.start_fetch(key, options.retry, fetcher).await
    }

    /// Join the in-flight fetch for `key` when it started under the entry's
    /// current generation, otherwise start (and spawn) a new one.
    fn start_fetch<F, Fut>(
        self: &Arc<Self>,
        key: QueryKey,
        retry: RetryPolicy,
        fetcher: F,
    ) -> SharedFetch<V>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<V, CoreError>> + Send + 'static,
    {
        let entry = self.entry(&key);
        let generation = entry.generation.load(Ordering::SeqCst);

        match self.in_flight.entry(key.clone()) {
            MapEntry::Occupied(existing) if existing.get().generation == generation => {
                self.counters.deduplicated.fetch_add(1, Ordering::Relaxed);
                debug!(%key, "joining in-flight fetch");
                existing.get().fetch.clone()
            }
            slot => {
                if matches!(slot, MapEntry::Occupied(_)) {
                    debug!(%key, "in-flight fetch predates invalidation, starting another");
                }
                self.counters.fetches.fetch_add(1, Ordering::Relaxed);

                entry.state.send_modify(|s| {
                    s.is_fetching = true;
                    if s.data.is_none() {
                        s.status = QueryStatus::Pending;
                    }
                });

                let id = self.next_sequence();
                let cache = Arc::clone(self);
                let fut = async move {
                    let label = key.to_string();
                    let result = retry.run(&label, &fetcher).await;
                    cache.settle(&key, id, generation, &result);
                    result
                }
                .boxed()
                .shared();

                slot.insert(InFlight {
                    id,
                    generation,
                    fetch: fut.clone(),
                });
                tokio::spawn(fut.clone());
                fut
            }
        }
    }

    /// Record a finished fetch, then release its in-flight slot.
    ///
    /// The state is published before the slot is freed, so a reader never
    /// sees a fetch in progress with nothing to join.
    fn settle(&self, key: &QueryKey, id: u64, generation: u64, result: &Result<V, CoreError>) {
        let entry = self.entries.get(key).map(|e| Arc::clone(e.value()));
        if let Some(entry) = entry {
            self.publish(key, &entry, id, generation, result);
        } else {
            debug!(%key, "entry removed while fetching, discarding result");
        }
        self.in_flight.remove_if(key, |_, running| running.id == id);
    }

    fn publish(
        &self,
        key: &QueryKey,
        entry: &Entry<V>,
        id: u64,
        generation: u64,
        result: &Result<V, CoreError>,
    ) {
        let superseded = entry.generation.load(Ordering::SeqCst) != generation;
        let newer_in_flight = self
            .in_flight
            .get(key)
            .is_some_and(|running| running.id != id);

        entry.state.send_modify(|s| {
            s.is_fetching = newer_in_flight;
            match result {
                Ok(data) if !superseded || s.data.is_none() => {
                    s.status = QueryStatus::Success;
                    s.data = Some(data.clone());
                    s.error = None;
                    s.updated_at = Some(Instant::now());
                    // An invalidation that raced this fetch still stands.
                    s.is_invalidated = superseded;
                }
                Err(err) if !superseded => {
                    s.status = QueryStatus::Error;
                    s.error = Some(err.clone());
                }
                _ => {
                    debug!(%key, "discarding superseded fetch result");
                }
            }
        });
    }

    // ── Writes ───────────────────────────────────────────────────────

    /// Overwrite `key` with server-confirmed data. The entry becomes fresh
    /// and observers are notified.
    pub fn set_data(&self, key: &QueryKey, data: V) {
        let entry = self.entry(key);
        entry
            .generation
            .store(self.next_sequence(), Ordering::SeqCst);
        entry.state.send_modify(|s| {
            s.status = QueryStatus::Success;
            s.data = Some(data);
            s.error = None;
            s.updated_at = Some(Instant::now());
            s.is_invalidated = false;
        });
    }

    /// Mark every entry under `prefix` stale. Returns the number marked.
    pub fn invalidate(&self, prefix: &QueryKey) -> usize {
        let mut marked = 0;
        for item in &self.entries {
            if item.key().starts_with(prefix) {
                item.value()
                    .generation
                    .store(self.next_sequence(), Ordering::SeqCst);
                item.value().state.send_modify(|s| s.is_invalidated = true);
                marked += 1;
            }
        }
        debug!(%prefix, marked, "invalidated cache entries");
        marked
    }

    /// Drop every entry under `prefix`. Returns the number removed.
    pub fn remove(&self, prefix: &QueryKey) -> usize {
        let mut removed = 0;
        self.entries.retain(|key, _| {
            let matches = key.starts_with(prefix);
            if matches {
                removed += 1;
            }
            !matches
        });
        debug!(%prefix, removed, "removed cache entries");
        removed
    }

    /// Subscribe to state transitions for `key`, creating an idle entry if
    /// needed. A live receiver keeps the entry from garbage collection.
    pub fn subscribe(&self, key: &QueryKey) -> watch::Receiver<QueryState<V>> {
        self.entry(key).state.subscribe()
    }

    // ── Retention ────────────────────────────────────────────────────

    /// Drop entries with no observers and no fetch in flight whose data is
    /// older than `gc_time`. Returns the number dropped.
    pub fn collect_garbage(&self) -> usize {
        let mut removed = 0;
        self.entries.retain(|key, entry| {
            let idle_since = entry.state.borrow().updated_at.unwrap_or(entry.created_at);
            let keep = entry.state.receiver_count() > 0
                || self.in_flight.contains_key(key)
                || idle_since.elapsed() < self.gc_time;
            if !keep {
                removed += 1;
            }
            keep
        });
        removed
    }

    /// Run [`collect_garbage`](Self::collect_garbage) every `interval` until
    /// `cancel` fires.
    pub fn spawn_gc(self: &Arc<Self>, interval: Duration, cancel: CancellationToken) -> JoinHandle<()> {
        let cache = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    biased;
                    () = cancel.cancelled() => break,
                    _ = ticker.tick() => {
                        let removed = cache.collect_garbage();
                        if removed > 0 {
                            debug!(removed, "collected idle cache entries");
                        }
                    }
                }
            }
        })
    }

    // ── Introspection ────────────────────────────────────────────────

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.counters.hits.load(Ordering::Relaxed),
            misses: self.counters.misses.load(Ordering::Relaxed),
            fetches: self.counters.fetches.load(Ordering::Relaxed),
            deduplicated: self.counters.deduplicated.load(Ordering::Relaxed),
        }
    }

    /// Cached keys in sorted order.
    pub fn keys(&self) -> Vec<QueryKey> {
        let mut keys: Vec<QueryKey> = self.entries.iter().map(|e| e.key().clone()).collect();
        keys.sort();
        keys
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // ── Private helpers ──────────────────────────────────────────────

    fn entry(&self, key: &QueryKey) -> Arc<Entry<V>> {
        let entry = self
            .entries
            .entry(key.clone())
            .or_insert_with(|| Arc::new(Entry::new(self.next_sequence())));
        Arc::clone(entry.value())
    }

    fn next_sequence(&self) -> u64 {
        self.sequence.fetch_add(1, Ordering::SeqCst) + 1
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::AtomicU32;

    use tokio::sync::Notify;

    use super::*;

    fn options(stale_time: Duration) -> FetchOptions {
        FetchOptions {
            stale_time,
            retry: RetryPolicy::none(),
        }
    }

    const FRESH: Duration = Duration::from_secs(300);

    fn key(parts: &[&str]) -> QueryKey {
        QueryKey::new(parts.iter().copied())
    }

    /// Fetcher that returns how many times it has been called.
    fn counting_fetcher(
        calls: &Arc<AtomicU32>,
    ) -> impl Fn() -> BoxFuture<'static, Result<u32, CoreError>> + Send + Sync + 'static {
        let calls = Arc::clone(calls);
        move || {
            let calls = Arc::clone(&calls);
            async move {
                tokio::time::sleep(Duration::from_millis(10)).await;
                Ok(calls.fetch_add(1, Ordering::SeqCst) + 1)
            }
            .boxed()
        }
    }

    #[tokio::test]
    async fn fresh_data_is_served_without_refetch() {
        let cache = Arc::new(QueryCache::new(FRESH));
        let calls = Arc::new(AtomicU32::new(0));
        let k = key(&["food", "list"]);

        let first = cache
            .fetch(k.clone(), options(FRESH), counting_fetcher(&calls))
            .await
            .unwrap();
        let second = cache
            .fetch(k.clone(), options(FRESH), counting_fetcher(&calls))
            .await
            .unwrap();

        assert_eq!((first, second), (1, 1));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.get(&k).status, QueryStatus::Success);
        assert_eq!(cache.stats().hits, 1);
        assert_eq!(cache.stats().misses, 1);
    }

    #[tokio::test]
    async fn concurrent_reads_share_one_fetch() {
        let cache = Arc::new(QueryCache::new(FRESH));
        let calls = Arc::new(AtomicU32::new(0));
        let k = key(&["food", "list"]);

        let (a, b) = tokio::join!(
            cache.fetch(k.clone(), options(FRESH), counting_fetcher(&calls)),
            cache.fetch(k.clone(), options(FRESH), counting_fetcher(&calls)),
        );

        assert_eq!(a.unwrap(), 1);
        assert_eq!(b.unwrap(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.stats().deduplicated, 1);
    }

    #[tokio::test]
    async fn stale_data_is_served_then_revalidated() {
        let cache = Arc::new(QueryCache::new(FRESH));
        let calls = Arc::new(AtomicU32::new(0));
        let k = key(&["food", "list"]);

        cache
            .fetch(k.clone(), options(Duration::ZERO), counting_fetcher(&calls))
            .await
            .unwrap();

        let mut rx = cache.subscribe(&k);
        let served = cache
            .fetch(k.clone(), options(Duration::ZERO), counting_fetcher(&calls))
            .await
            .unwrap();
        assert_eq!(served, 1, "stale value is returned immediately");

        let refreshed = tokio::time::timeout(
            Duration::from_secs(5),
            rx.wait_for(|s| s.data == Some(2) && !s.is_fetching),
        )
        .await
        .unwrap()
        .unwrap()
        .clone();
        assert_eq!(refreshed.status, QueryStatus::Success);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn invalidate_forces_refetch_under_prefix_only() {
        let cache = Arc::new(QueryCache::new(FRESH));
        let calls = Arc::new(AtomicU32::new(0));
        let list = key(&["food", "list"]);
        let search = key(&["food", "list", "search", "pizza"]);
        let detail = key(&["food", "detail", "1"]);

        for k in [&list, &search, &detail] {
            cache
                .fetch(k.clone(), options(FRESH), counting_fetcher(&calls))
                .await
                .unwrap();
        }

        assert_eq!(cache.invalidate(&list), 2);
        assert!(cache.get(&list).is_invalidated);
        assert!(cache.get(&search).is_invalidated);
        assert!(!cache.get(&detail).is_invalidated);
        assert!(!cache.get(&detail).is_stale(FRESH));
    }

    #[tokio::test]
    async fn remove_drops_entries() {
        let cache: Arc<QueryCache<u32>> = Arc::new(QueryCache::new(FRESH));
        let detail = key(&["food", "detail", "7"]);
        cache.set_data(&detail, 7);
        cache.set_data(&key(&["food", "detail", "8"]), 8);

        assert_eq!(cache.remove(&detail), 1);
        assert_eq!(cache.get(&detail).status, QueryStatus::Idle);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn invalidated_read_waits_for_refetch() {
        let cache = Arc::new(QueryCache::new(FRESH));
        let calls = Arc::new(AtomicU32::new(0));
        let k = key(&["food", "list"]);

        cache
            .fetch(k.clone(), options(FRESH), counting_fetcher(&calls))
            .await
            .unwrap();
        cache.invalidate(&k);

        let after = cache
            .fetch(k.clone(), options(FRESH), counting_fetcher(&calls))
            .await
            .unwrap();
        assert_eq!(after, 2);
        assert!(!cache.get(&k).is_invalidated);
    }

    #[tokio::test]
    async fn set_data_wins_over_fetch_in_flight() {
        let cache: Arc<QueryCache<u32>> = Arc::new(QueryCache::new(FRESH));
        let gate = Arc::new(Notify::new());
        let k = key(&["food", "detail", "42"]);

        cache.set_data(&k, 1);
        cache.invalidate(&k);
        let mut rx = cache.subscribe(&k);

        let fetch = {
            let cache = Arc::clone(&cache);
            let gate = Arc::clone(&gate);
            let k = k.clone();
            tokio::spawn(async move {
                let fetcher = move || {
                    let gate = Arc::clone(&gate);
                    async move {
                        gate.notified().await;
                        Ok(2)
                    }
                };
                cache.fetch(k, options(FRESH), fetcher).await
            })
        };

        tokio::time::timeout(Duration::from_secs(5), rx.wait_for(|s| s.is_fetching))
            .await
            .unwrap()
            .unwrap();

        cache.set_data(&k, 99);
        gate.notify_one();

        // The caller still gets what its own request returned.
        assert_eq!(fetch.await.unwrap().unwrap(), 2);
        let settled = cache.get(&k);
        assert!(!settled.is_fetching);
        assert_eq!(settled.data, Some(99));
    }

    fn gated_fetcher(
        gate: &Arc<Notify>,
        value: u32,
    ) -> impl Fn() -> BoxFuture<'static, Result<u32, CoreError>> + Send + Sync + 'static {
        let gate = Arc::clone(gate);
        move || {
            let gate = Arc::clone(&gate);
            async move {
                gate.notified().await;
                Ok(value)
            }
            .boxed()
        }
    }

    #[tokio::test]
    async fn read_after_invalidation_skips_older_fetch() {
        let cache: Arc<QueryCache<u32>> = Arc::new(QueryCache::new(FRESH));
        let gate = Arc::new(Notify::new());
        let k = key(&["food", "list"]);

        cache.set_data(&k, 1);
        // Stale read: served from cache, refresh left waiting on the gate.
        let stale = cache
            .fetch(k.clone(), options(Duration::ZERO), gated_fetcher(&gate, 1))
            .await
            .unwrap();
        assert_eq!(stale, 1);
        assert!(cache.get(&k).is_fetching);

        cache.invalidate(&key(&["food"]));
        let fresh = cache
            .fetch(k.clone(), options(FRESH), || async { Ok::<_, CoreError>(2) })
            .await
            .unwrap();
        assert_eq!(fresh, 2);
        assert_eq!(cache.stats().deduplicated, 0);

        let mut rx = cache.subscribe(&k);
        rx.borrow_and_update();
        gate.notify_one();
        tokio::time::timeout(Duration::from_secs(5), rx.changed())
            .await
            .unwrap()
            .unwrap();

        let settled = cache.get(&k);
        assert_eq!(settled.data, Some(2));
        assert!(!settled.is_invalidated);
        assert!(!settled.is_fetching);
        assert!(cache.in_flight.is_empty());
    }

    #[tokio::test]
    async fn older_fetch_settling_leaves_newer_fetch_joinable() {
        let cache: Arc<QueryCache<u32>> = Arc::new(QueryCache::new(FRESH));
        let old_gate = Arc::new(Notify::new());
        let new_gate = Arc::new(Notify::new());
        let k = key(&["food", "detail", "7"]);

        cache.set_data(&k, 1);
        cache
            .fetch(k.clone(), options(Duration::ZERO), gated_fetcher(&old_gate, 1))
            .await
            .unwrap();
        cache.invalidate(&k);

        let newer = {
            let cache = Arc::clone(&cache);
            let k = k.clone();
            let fetcher = gated_fetcher(&new_gate, 3);
            tokio::spawn(async move { cache.fetch(k, options(FRESH), fetcher).await })
        };
        let mut rx = cache.subscribe(&k);
        while cache.stats().fetches < 2 {
            tokio::task::yield_now().await;
        }

        rx.borrow_and_update();
        old_gate.notify_one();
        tokio::time::timeout(Duration::from_secs(5), rx.changed())
            .await
            .unwrap()
            .unwrap();

        // The older result is discarded and the newer fetch keeps its slot.
        let state = cache.get(&k);
        assert!(state.is_fetching);
        assert_eq!(state.data, Some(1));
        assert_eq!(cache.in_flight.len(), 1);

        let joined = {
            let cache = Arc::clone(&cache);
            let k = k.clone();
            tokio::spawn(async move { cache.fetch(k, options(FRESH), || async { Ok::<_, CoreError>(0) }).await })
        };
        while cache.stats().deduplicated < 1 {
            tokio::task::yield_now().await;
        }

        new_gate.notify_one();
        assert_eq!(newer.await.unwrap().unwrap(), 3);
        assert_eq!(joined.await.unwrap().unwrap(), 3);
        let settled = cache.get(&k);
        assert_eq!(settled.data, Some(3));
        assert!(!settled.is_fetching);
        assert!(cache.in_flight.is_empty());
    }

    #[tokio::test]
    async fn failed_fetch_records_error() {
        let cache: Arc<QueryCache<u32>> = Arc::new(QueryCache::new(FRESH));
        let k = key(&["food", "detail", "404"]);
        let not_found = CoreError::RequestFailed {
            status: 404,
            status_text: "Not Found".into(),
        };

        let expected = not_found.clone();
        let result = cache
            .fetch(k.clone(), options(FRESH), move || {
                let err = expected.clone();
                async move { Err(err) }
            })
            .await;

        assert_eq!(result, Err(not_found.clone()));
        let state = cache.get(&k);
        assert_eq!(state.status, QueryStatus::Error);
        assert_eq!(state.error, Some(not_found));
        assert!(!state.is_fetching);
    }

    #[tokio::test]
    async fn garbage_collection_spares_observed_entries() {
        let cache: Arc<QueryCache<u32>> = Arc::new(QueryCache::new(Duration::ZERO));
        let observed = key(&["food", "list"]);
        let idle = key(&["food", "detail", "1"]);

        cache.set_data(&observed, 1);
        cache.set_data(&idle, 2);
        let _rx = cache.subscribe(&observed);

        assert_eq!(cache.collect_garbage(), 1);
        assert_eq!(cache.keys(), vec![observed]);
    }

    #[tokio::test]
    async fn gc_task_stops_on_cancel() {
        let cache: Arc<QueryCache<u32>> = Arc::new(QueryCache::new(Duration::ZERO));
        cache.set_data(&key(&["food", "detail", "1"]), 1);

        let cancel = CancellationToken::new();
        let handle = cache.spawn_gc(Duration::from_millis(5), cancel.clone());
        tokio::time::sleep(Duration::from_millis(30)).await;
        cancel.cancel();
        handle.await.unwrap();

        assert!(cache.is_empty());
    }
}
