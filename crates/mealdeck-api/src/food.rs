// `/Food` resource endpoints
//
// Collection reads, single-record reads, and the three write verbs.
// Query strings are `application/x-www-form-urlencoded`; ids are
// percent-encoded as a single path segment.

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use tracing::debug;
use url::form_urlencoded;

use crate::client::{FoodClient, RequestOptions};
use crate::error::Error;
use crate::models::{CreateFoodItem, DeletedFood, FoodItem, UpdateFoodItem};

const FOOD_PATH: &str = "/Food";

/// Bytes escaped inside one path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// `/Food/{id}` with the id escaped as one path segment.
fn item_path(id: &str) -> String {
    format!("{FOOD_PATH}/{}", utf8_percent_encode(id, PATH_SEGMENT))
}

/// `/Food?k=v&...`, or bare `/Food` when there are no parameters.
fn collection_path<K: AsRef<str>, V: AsRef<str>>(params: &[(K, V)]) -> String {
    if params.is_empty() {
        return FOOD_PATH.to_owned();
    }
    let mut query = form_urlencoded::Serializer::new(String::new());
    for (key, value) in params {
        query.append_pair(key.as_ref(), value.as_ref());
    }
    format!("{FOOD_PATH}?{}", query.finish())
}

impl FoodClient {
    /// List every food item.
    ///
    /// `GET /Food`
    pub async fn list_food(&self) -> Result<Vec<FoodItem>, Error> {
        debug!("listing food items");
        self.request_as(FOOD_PATH, RequestOptions::get()).await
    }

    /// Search food items by name substring (server-side filter).
    ///
    /// `GET /Food?name={term}`. A blank term asks for the unfiltered list.
    pub async fn search_food(&self, name: &str) -> Result<Vec<FoodItem>, Error> {
        let term = name.trim();
        if term.is_empty() {
            return self.list_food().await;
        }
        debug!(term, "searching food items");
        self.request_as(&collection_path(&[("name", term)]), RequestOptions::get())
            .await
    }

    /// List food items matching arbitrary query parameters.
    ///
    /// `GET /Food?{params}`. Callers are expected to have dropped empty values.
    pub async fn list_food_filtered<K, V>(&self, params: &[(K, V)]) -> Result<Vec<FoodItem>, Error>
    where
        K: AsRef<str> + Sync,
        V: AsRef<str> + Sync,
    {
        let path = collection_path(params);
        debug!(%path, "listing filtered food items");
        self.request_as(&path, RequestOptions::get()).await
    }

    /// Fetch a single food item.
    ///
    /// `GET /Food/{id}`
    pub async fn get_food(&self, id: &str) -> Result<FoodItem, Error> {
        debug!(id, "fetching food item");
        self.request_as(&item_path(id), RequestOptions::get()).await
    }

    /// Create a food item; the server assigns `id`.
    ///
    /// `POST /Food`
    pub async fn create_food(&self, data: &CreateFoodItem) -> Result<FoodItem, Error> {
        debug!(name = %data.name, "creating food item");
        self.request_as(FOOD_PATH, RequestOptions::post(data)?).await
    }

    /// Replace a food item's fields.
    ///
    /// `PUT /Food/{id}` with every field except `id` in the body.
    pub async fn update_food(&self, data: &UpdateFoodItem) -> Result<FoodItem, Error> {
        debug!(id = %data.id, "updating food item");
        self.request_as(&item_path(&data.id), RequestOptions::put(data)?)
            .await
    }

    /// Delete a food item.
    ///
    /// `DELETE /Food/{id}`. An empty response body is treated as `{ id }`.
    pub async fn delete_food(&self, id: &str) -> Result<DeletedFood, Error> {
        debug!(id, "deleting food item");
        let value = self.request(&item_path(id), RequestOptions::delete()).await?;
        if value.is_null() {
            return Ok(DeletedFood { id: id.to_owned() });
        }
        serde_json::from_value(value.clone()).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body: value.to_string(),
        })
    }
}
