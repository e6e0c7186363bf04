// ── Storefront facade ──
//
// Ties the query cache, reads, writes, and the display store together for a
// presentation layer. Each user intent becomes one method returning either
// the result plus a success notice, or the error plus the notice to show.
// The active view's cache entry is watched, so background revalidation
// reaches the display store without another call.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use mealdeck_api::{DeletedFood, FoodClient, FoodItem, TransportConfig};
use thiserror::Error;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::cache::{QueryKey, QueryStatus};
use crate::config::StorefrontConfig;
use crate::error::CoreError;
use crate::form::MealForm;
use crate::keys;
use crate::mutations::FoodMutations;
use crate::notice::Notice;
use crate::queries::{FoodCache, FoodData, FoodQueries, QueryOutcome};
use crate::store::DisplayStore;
use crate::stream::FoodStream;

const MIN_GC_INTERVAL: Duration = Duration::from_secs(1);
const MAX_GC_INTERVAL: Duration = Duration::from_secs(60);

// ── Outcomes ─────────────────────────────────────────────────────────

/// Which query currently feeds the display store.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ActiveView {
    #[default]
    All,
    Search(String),
}

impl ActiveView {
    /// Cache key whose data this view shows.
    pub fn key(&self) -> QueryKey {
        match self {
            Self::All => keys::lists(),
            Self::Search(term) => keys::search(term),
        }
    }
}

/// A completed action and the notice to show for it.
#[derive(Debug, Clone)]
pub struct Action<T> {
    pub value: T,
    pub notice: Notice,
}

/// A failed action. `notice` is `None` when the failure is reported
/// field-by-field instead (form validation) or needs no toast.
#[derive(Debug, Clone, Error)]
#[error("{source}")]
pub struct ActionError {
    pub notice: Option<Notice>,
    pub source: CoreError,
}

impl ActionError {
    fn new(notice: Option<Notice>, source: CoreError) -> Self {
        Self { notice, source }
    }
}

// ── Storefront ───────────────────────────────────────────────────────

/// Entry point for presentation layers.
///
/// Cheaply cloneable via `Arc<StorefrontInner>`. Owns its cache and display
/// store; two storefronts never share state.
#[derive(Clone)]
pub struct Storefront {
    inner: Arc<StorefrontInner>,
}

struct StorefrontInner {
    config: StorefrontConfig,
    cache: Arc<FoodCache>,
    queries: FoodQueries,
    mutations: FoodMutations,
    store: DisplayStore,
    view: Mutex<ActiveView>,
    /// Forwards the active view's cache updates to the store.
    watcher: Mutex<Option<JoinHandle<()>>>,
    cancel: CancellationToken,
    task_handles: Mutex<Vec<JoinHandle<()>>>,
}

impl Storefront {
    /// Build a storefront and its HTTP client from configuration. Does not
    /// touch the network; call [`start`](Self::start) for background upkeep.
    pub fn new(config: StorefrontConfig) -> Result<Self, CoreError> {
        let transport = TransportConfig::default().with_timeout(config.timeout);
        let client = FoodClient::new(config.base_url.clone(), &transport)?;
        Ok(Self::with_client(config, client))
    }

    /// Build a storefront around an existing client.
    pub fn with_client(config: StorefrontConfig, client: FoodClient) -> Self {
        let api = Arc::new(client);
        let cache = Arc::new(FoodCache::new(config.cache.gc_time));
        let queries = FoodQueries::new(Arc::clone(&api), Arc::clone(&cache), config.cache.clone());
        let mutations = FoodMutations::new(api, Arc::clone(&cache), config.cache.mutation_retry);

        Self {
            inner: Arc::new(StorefrontInner {
                config,
                cache,
                queries,
                mutations,
                store: DisplayStore::new(),
                view: Mutex::new(ActiveView::All),
                watcher: Mutex::new(None),
                cancel: CancellationToken::new(),
                task_handles: Mutex::new(Vec::new()),
            }),
        }
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Spawn the cache garbage collector.
    pub async fn start(&self) {
        let interval = (self.inner.config.cache.gc_time / 2).clamp(MIN_GC_INTERVAL, MAX_GC_INTERVAL);
        let handle = self
            .inner
            .cache
            .spawn_gc(interval, self.inner.cancel.child_token());
        self.inner.task_handles.lock().await.push(handle);
        debug!(?interval, "cache garbage collector started");
    }

    /// Stop background tasks and wait for them to finish.
    pub async fn shutdown(&self) {
        self.inner.cancel.cancel();
        let mut handles: Vec<_> = self.inner.task_handles.lock().await.drain(..).collect();
        handles.extend(self.inner.watcher.lock().await.take());
        for handle in handles {
            let _ = handle.await;
        }
        debug!("storefront shut down");
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    pub fn queries(&self) -> &FoodQueries {
        &self.inner.queries
    }

    pub fn mutations(&self) -> &FoodMutations {
        &self.inner.mutations
    }

    pub fn cache(&self) -> &Arc<FoodCache> {
        &self.inner.cache
    }

    pub fn store(&self) -> &DisplayStore {
        &self.inner.store
    }

    /// The visible meal list.
    pub fn items(&self) -> Arc<Vec<FoodItem>> {
        self.inner.store.items()
    }

    pub fn subscribe(&self) -> FoodStream {
        self.inner.store.subscribe()
    }

    pub async fn active_view(&self) -> ActiveView {
        self.inner.view.lock().await.clone()
    }

    // ── Reads ────────────────────────────────────────────────────────

    /// Show every meal.
    pub async fn show_all(&self) -> Result<Arc<Vec<FoodItem>>, ActionError> {
        let items = self
            .inner
            .queries
            .list_all()
            .await
            .map_err(|e| ActionError::new(None, e))?;
        self.present(ActiveView::All, &items).await;
        Ok(items)
    }

    /// Show meals matching `term`; a blank term shows every meal.
    pub async fn search(&self, term: &str) -> Result<Arc<Vec<FoodItem>>, ActionError> {
        let items = self.inner.queries.search(term).await.map_err(|e| {
            warn!(term, error = %e, "meal search failed");
            ActionError::new(Some(Notice::search_failed()), e)
        })?;

        let term = term.trim();
        let view = if term.is_empty() {
            ActiveView::All
        } else {
            ActiveView::Search(term.to_owned())
        };
        self.present(view, &items).await;
        Ok(items)
    }

    /// Re-run the active view's query and push its result to the display
    /// store. Serves cached data when fresh.
    pub async fn refresh_view(&self) -> Result<Arc<Vec<FoodItem>>, CoreError> {
        let view = self.active_view().await;
        let items = match &view {
            ActiveView::All => self.inner.queries.list_all().await?,
            ActiveView::Search(term) => self.inner.queries.search(term).await?,
        };
        self.present(view, &items).await;
        Ok(items)
    }

    /// One meal by id; dormant for a missing or empty id.
    pub async fn get_meal(&self, id: Option<&str>) -> Result<QueryOutcome<Arc<FoodItem>>, CoreError> {
        self.inner.queries.get_by_id(id).await
    }

    // ── Writes ───────────────────────────────────────────────────────

    /// Validate `form` and create the meal.
    pub async fn add_meal(&self, form: &MealForm) -> Result<Action<FoodItem>, ActionError> {
        let meal = form
            .validate()
            .map_err(|e| ActionError::new(None, CoreError::ValidationFailed(e)))?;
        let payload = meal.into_create(Utc::now());

        let created = self.inner.mutations.create(&payload).await.map_err(|e| {
            warn!(error = %e, "adding meal failed");
            ActionError::new(Some(Notice::add_failed()), e)
        })?;

        info!(id = %created.id, "meal added");
        self.refresh_after_write().await;
        Ok(Action {
            value: created,
            notice: Notice::meal_added(&form.name),
        })
    }

    /// Validate `form` and apply it to `existing`.
    pub async fn edit_meal(
        &self,
        existing: &FoodItem,
        form: &MealForm,
    ) -> Result<Action<FoodItem>, ActionError> {
        let meal = form
            .validate()
            .map_err(|e| ActionError::new(None, CoreError::ValidationFailed(e)))?;
        let payload = meal.into_update(existing);

        let updated = self.inner.mutations.update(&payload).await.map_err(|e| {
            warn!(id = %existing.id, error = %e, "updating meal failed");
            ActionError::new(Some(Notice::update_failed()), e)
        })?;

        self.refresh_after_write().await;
        Ok(Action {
            value: updated,
            notice: Notice::meal_updated(&form.name),
        })
    }

    /// Delete `meal`.
    pub async fn delete_meal(&self, meal: &FoodItem) -> Result<Action<DeletedFood>, ActionError> {
        let deleted = self.inner.mutations.delete(&meal.id).await.map_err(|e| {
            warn!(id = %meal.id, error = %e, "deleting meal failed");
            ActionError::new(Some(Notice::delete_failed()), e)
        })?;

        self.refresh_after_write().await;
        Ok(Action {
            value: deleted,
            notice: Notice::meal_deleted(&meal.name),
        })
    }

    // ── Private helpers ──────────────────────────────────────────────

    /// Make `view` the active view and show its newest list.
    ///
    /// `items` is what the caller's read returned; a background refresh may
    /// already have replaced it in the cache, in which case the cached list
    /// is shown.
    async fn present(&self, view: ActiveView, items: &Arc<Vec<FoodItem>>) {
        let key = view.key();
        {
            let mut current = self.inner.view.lock().await;
            let mut watcher = self.inner.watcher.lock().await;
            let watching = watcher.as_ref().is_some_and(|h| !h.is_finished());
            if *current != view || !watching {
                if let Some(old) = watcher.take() {
                    old.abort();
                }
                if !self.inner.cancel.is_cancelled() {
                    *watcher = Some(self.watch_view(key.clone()));
                }
                debug!(?view, "active view changed");
                *current = view;
            }
        }

        let latest = self
            .inner
            .cache
            .get(&key)
            .data
            .as_ref()
            .and_then(FoodData::as_list)
            .cloned()
            .unwrap_or_else(|| Arc::clone(items));
        self.inner.store.set_items(latest);
    }

    /// Push every new successful list under `key` into the display store
    /// until cancelled or the entry is dropped.
    fn watch_view(&self, key: QueryKey) -> JoinHandle<()> {
        let mut rx = self.inner.cache.subscribe(&key);
        let store = self.inner.store.clone();
        let cancel = self.inner.cancel.child_token();
        let mut shown = rx
            .borrow_and_update()
            .data
            .as_ref()
            .and_then(FoodData::as_list)
            .cloned();

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    biased;
                    () = cancel.cancelled() => break,
                    changed = rx.changed() => {
                        if changed.is_err() {
                            debug!(%key, "watched entry dropped");
                            break;
                        }
                        let next = {
                            let state = rx.borrow_and_update();
                            if state.status == QueryStatus::Success {
                                state.data.as_ref().and_then(FoodData::as_list).cloned()
                            } else {
                                None
                            }
                        };
                        let Some(items) = next else { continue };
                        if shown.as_ref().is_some_and(|prev| Arc::ptr_eq(prev, &items)) {
                            continue;
                        }
                        debug!(%key, count = items.len(), "pushing revalidated list");
                        store.set_items(Arc::clone(&items));
                        shown = Some(items);
                    }
                }
            }
        })
    }

    async fn refresh_after_write(&self) {
        if let Err(e) = self.refresh_view().await {
            warn!(error = %e, "display refresh after write failed");
        }
    }
}
