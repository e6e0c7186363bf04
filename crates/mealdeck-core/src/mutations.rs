// ── Food write operations ──
//
// Each write is retried by the mutation policy, then reconciles the query
// cache with what the server confirmed. A failed write leaves the cache
// untouched.

use std::sync::Arc;

use mealdeck_api::{CreateFoodItem, DeletedFood, FoodClient, FoodItem, UpdateFoodItem};
use tracing::{debug, info};

use crate::error::CoreError;
use crate::keys;
use crate::queries::{FoodCache, FoodData};
use crate::retry::RetryPolicy;

/// Create, update, and delete against `/Food`.
#[derive(Clone)]
pub struct FoodMutations {
    api: Arc<FoodClient>,
    cache: Arc<FoodCache>,
    retry: RetryPolicy,
}

impl FoodMutations {
    pub fn new(api: Arc<FoodClient>, cache: Arc<FoodCache>, retry: RetryPolicy) -> Self {
        Self { api, cache, retry }
    }

    /// `POST /Food`. Every food query is marked stale afterwards.
    pub async fn create(&self, data: &CreateFoodItem) -> Result<FoodItem, CoreError> {
        let api = &self.api;
        let created = self
            .retry
            .run("create food", move || async move {
                api.create_food(data).await.map_err(CoreError::from)
            })
            .await?;

        info!(id = %created.id, name = %created.name, "meal created");
        let marked = self.cache.invalidate(&keys::all());
        debug!(marked, "food queries invalidated after create");
        Ok(created)
    }

    /// `PUT /Food/{id}`. The detail entry takes the server's record and
    /// every list query is marked stale.
    pub async fn update(&self, data: &UpdateFoodItem) -> Result<FoodItem, CoreError> {
        let api = &self.api;
        let updated = self
            .retry
            .run("update food", move || async move {
                api.update_food(data).await.map_err(CoreError::from)
            })
            .await?;

        info!(id = %updated.id, name = %updated.name, "meal updated");
        self.cache.set_data(
            &keys::detail(&updated.id),
            FoodData::Item(Arc::new(updated.clone())),
        );
        self.cache.invalidate(&keys::lists());
        Ok(updated)
    }

    /// `DELETE /Food/{id}`. The detail entry is dropped and every list
    /// query is marked stale.
    pub async fn delete(&self, id: &str) -> Result<DeletedFood, CoreError> {
        let api = &self.api;
        let deleted = self
            .retry
            .run("delete food", move || async move {
                api.delete_food(id).await.map_err(CoreError::from)
            })
            .await?;

        info!(id, "meal deleted");
        self.cache.remove(&keys::detail(id));
        self.cache.invalidate(&keys::lists());
        Ok(deleted)
    }
}
