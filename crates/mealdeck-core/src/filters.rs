// ── Query filters for the food list ──

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Filter set for `GET /Food?...`.
///
/// Unset fields and empty strings are left out of the query string. `extra`
/// passes through any other backend-supported parameter verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoodFilters {
    pub name: Option<String>,
    pub rating: Option<String>,
    pub open: Option<bool>,
    pub price: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, String>,
}

impl FoodFilters {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn rating(mut self, rating: impl Into<String>) -> Self {
        self.rating = Some(rating.into());
        self
    }

    #[must_use]
    pub fn open(mut self, open: bool) -> Self {
        self.open = Some(open);
        self
    }

    #[must_use]
    pub fn price(mut self, price: impl Into<String>) -> Self {
        self.price = Some(price.into());
        self
    }

    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Query parameters in a stable order, using the backend's names.
    pub fn to_params(&self) -> Vec<(String, String)> {
        let fixed = [
            ("name", self.name.clone()),
            ("rating", self.rating.clone()),
            ("open", self.open.map(|o| o.to_string())),
            ("Price", self.price.clone()),
        ];

        fixed
            .into_iter()
            .filter_map(|(key, value)| value.map(|v| (key.to_owned(), v)))
            .chain(self.extra.iter().map(|(k, v)| (k.clone(), v.clone())))
            .filter(|(_, value)| !value.is_empty())
            .collect()
    }

    /// `true` when no parameter would be sent.
    pub fn is_empty(&self) -> bool {
        self.to_params().is_empty()
    }

    /// Stable textual form used as a cache key segment.
    pub fn canonical(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.to_params())
            .finish()
    }
}
