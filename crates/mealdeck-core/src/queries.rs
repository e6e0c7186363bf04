// ── Food read queries ──
//
// Every read goes through the shared `FoodCache`, so repeated and
// concurrent reads of one key cost at most one request.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use mealdeck_api::{FoodClient, FoodItem};
use tracing::debug;

use crate::cache::{FetchOptions, QueryCache, QueryKey};
use crate::config::CachePolicy;
use crate::error::CoreError;
use crate::filters::FoodFilters;
use crate::keys;

/// Value stored in the food cache: a list result or a single record.
#[derive(Debug, Clone, PartialEq)]
pub enum FoodData {
    List(Arc<Vec<FoodItem>>),
    Item(Arc<FoodItem>),
}

impl FoodData {
    pub fn as_list(&self) -> Option<&Arc<Vec<FoodItem>>> {
        match self {
            Self::List(items) => Some(items),
            Self::Item(_) => None,
        }
    }

    pub fn as_item(&self) -> Option<&Arc<FoodItem>> {
        match self {
            Self::Item(item) => Some(item),
            Self::List(_) => None,
        }
    }

    fn into_list(self) -> Result<Arc<Vec<FoodItem>>, CoreError> {
        match self {
            Self::List(items) => Ok(items),
            Self::Item(_) => Err(CoreError::Internal(
                "cache entry holds a single record where a list was expected".into(),
            )),
        }
    }

    fn into_item(self) -> Result<Arc<FoodItem>, CoreError> {
        match self {
            Self::Item(item) => Ok(item),
            Self::List(_) => Err(CoreError::Internal(
                "cache entry holds a list where a single record was expected".into(),
            )),
        }
    }
}

pub type FoodCache = QueryCache<FoodData>;

/// Result of a query that may be disabled by its input.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome<T> {
    Ready(T),
    /// The query was not run: its input was absent or empty.
    Dormant,
}

impl<T> QueryOutcome<T> {
    pub fn is_dormant(&self) -> bool {
        matches!(self, Self::Dormant)
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Ready(value) => Some(value),
            Self::Dormant => None,
        }
    }
}

/// Cached reads against `/Food`.
#[derive(Clone)]
pub struct FoodQueries {
    api: Arc<FoodClient>,
    cache: Arc<FoodCache>,
    policy: CachePolicy,
}

impl FoodQueries {
    pub fn new(api: Arc<FoodClient>, cache: Arc<FoodCache>, policy: CachePolicy) -> Self {
        Self { api, cache, policy }
    }

    pub fn cache(&self) -> &Arc<FoodCache> {
        &self.cache
    }

    /// Every listed meal.
    pub async fn list_all(&self) -> Result<Arc<Vec<FoodItem>>, CoreError> {
        let api = Arc::clone(&self.api);
        self.fetch_list(keys::lists(), self.policy.list_stale_time, move || {
            let api = Arc::clone(&api);
            async move { api.list_food().await }
        })
        .await
    }

    /// One meal by id. A missing or empty id leaves the query dormant.
    pub async fn get_by_id(
        &self,
        id: Option<&str>,
    ) -> Result<QueryOutcome<Arc<FoodItem>>, CoreError> {
        let Some(id) = id.filter(|id| !id.is_empty()) else {
            debug!("get_by_id without an id, query dormant");
            return Ok(QueryOutcome::Dormant);
        };

        let api = Arc::clone(&self.api);
        let owned = id.to_owned();
        let data = self
            .cache
            .fetch(
                keys::detail(id),
                self.options(self.policy.detail_stale_time),
                move || {
                    let api = Arc::clone(&api);
                    let id = owned.clone();
                    async move {
                        let item = api.get_food(&id).await?;
                        Ok::<_, CoreError>(FoodData::Item(Arc::new(item)))
                    }
                },
            )
            .await?;
        data.into_item().map(QueryOutcome::Ready)
    }

    /// Meals whose name matches `term`. A blank term is the unfiltered list.
    pub async fn search(&self, term: &str) -> Result<Arc<Vec<FoodItem>>, CoreError> {
        let term = term.trim();
        if term.is_empty() {
            return self.list_all().await;
        }

        let api = Arc::clone(&self.api);
        let owned = term.to_owned();
        self.fetch_list(keys::search(term), self.policy.search_stale_time, move || {
            let api = Arc::clone(&api);
            let term = owned.clone();
            async move { api.search_food(&term).await }
        })
        .await
    }

    /// Meals matching `filters`. Runs even when every filter is blank.
    pub async fn filtered(&self, filters: &FoodFilters) -> Result<Arc<Vec<FoodItem>>, CoreError> {
        self.fetch_filtered(keys::list(filters), filters).await
    }

    /// Like [`filtered`](Self::filtered), but dormant until some filter is set.
    pub async fn advanced_search(
        &self,
        filters: &FoodFilters,
    ) -> Result<QueryOutcome<Arc<Vec<FoodItem>>>, CoreError> {
        if filters.is_empty() {
            return Ok(QueryOutcome::Dormant);
        }
        self.fetch_filtered(keys::advanced(filters), filters)
            .await
            .map(QueryOutcome::Ready)
    }

    // ── Private helpers ──────────────────────────────────────────────

    fn options(&self, stale_time: Duration) -> FetchOptions {
        FetchOptions {
            stale_time,
            retry: self.policy.query_retry,
        }
    }

    async fn fetch_filtered(
        &self,
        key: QueryKey,
        filters: &FoodFilters,
    ) -> Result<Arc<Vec<FoodItem>>, CoreError> {
        let api = Arc::clone(&self.api);
        let params = filters.to_params();
        self.fetch_list(key, self.policy.search_stale_time, move || {
            let api = Arc::clone(&api);
            let params = params.clone();
            async move { api.list_food_filtered(params.as_slice()).await }
        })
        .await
    }

    async fn fetch_list<F, Fut>(
        &self,
        key: QueryKey,
        stale_time: Duration,
        fetcher: F,
    ) -> Result<Arc<Vec<FoodItem>>, CoreError>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Vec<FoodItem>, mealdeck_api::Error>> + Send + 'static,
    {
        let data = self
            .cache
            .fetch(key, self.options(stale_time), move || {
                let request = fetcher();
                async move {
                    let items = request.await?;
                    Ok::<_, CoreError>(FoodData::List(Arc::new(items)))
                }
            })
            .await?;
        data.into_list()
    }
}
