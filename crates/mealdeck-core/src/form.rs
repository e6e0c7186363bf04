// ── Meal form validation ──
//
// Input for the add and edit flows is checked here, before any request is
// made. Every offending field is reported, not only the first.

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use mealdeck_api::{CreateFoodItem, FoodItem, UpdateFoodItem};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use url::Url;

/// Restaurant status as chosen on the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MealStatus {
    Open,
    Closed,
}

impl MealStatus {
    pub fn is_open(self) -> bool {
        matches!(self, Self::Open)
    }
}

impl From<bool> for MealStatus {
    fn from(open: bool) -> Self {
        if open { Self::Open } else { Self::Closed }
    }
}

/// Raw form fields, as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealForm {
    pub name: String,
    pub rating: String,
    /// Meal image URL.
    pub avatar: String,
    /// Collected and required, but never sent to the backend.
    pub restaurant_name: String,
    pub logo: String,
    /// `"open"` or `"closed"`.
    pub status: String,
}

/// One rejected field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

/// All field errors from one validation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormErrors(Vec<FieldError>);

impl FormErrors {
    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    /// Message for `field`, if it was rejected.
    pub fn message_for(&self, field: &str) -> Option<&'static str> {
        self.0.iter().find(|e| e.field == field).map(|e| e.message)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for err in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", err.field, err.message)?;
            first = false;
        }
        Ok(())
    }
}

/// A form that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidMeal {
    pub name: String,
    pub rating: String,
    pub avatar: String,
    pub restaurant_name: String,
    pub logo: String,
    pub status: MealStatus,
}

impl MealForm {
    /// Pre-fill the edit form from a stored record. The record has no
    /// restaurant name, so that field starts empty.
    pub fn from_item(item: &FoodItem) -> Self {
        Self {
            name: item.name.clone(),
            rating: item.rating.clone(),
            avatar: item.avatar.clone(),
            restaurant_name: String::new(),
            logo: item.logo.clone(),
            status: MealStatus::from(item.open).to_string(),
        }
    }

    pub fn validate(&self) -> Result<ValidMeal, FormErrors> {
        let mut errors = Vec::new();
        let mut reject = |field, message| errors.push(FieldError { field, message });

        if self.name.is_empty() {
            reject("name", "Food name is required");
        }
        if self.rating.is_empty() {
            reject("rating", "Food rating is required");
        }
        if !is_url(&self.avatar) {
            reject("avatar", "Please enter a valid image URL");
        }
        if self.restaurant_name.is_empty() {
            reject("restaurant_name", "Restaurant name is required");
        }
        if !is_url(&self.logo) {
            reject("logo", "Please enter a valid logo URL");
        }
        let status = self.status.parse::<MealStatus>().ok();
        if status.is_none() {
            reject("status", "Please select restaurant status");
        }

        match status {
            Some(status) if errors.is_empty() => Ok(ValidMeal {
                name: self.name.clone(),
                rating: self.rating.clone(),
                avatar: self.avatar.clone(),
                restaurant_name: self.restaurant_name.clone(),
                logo: self.logo.clone(),
                status,
            }),
            _ => Err(FormErrors(errors)),
        }
    }
}

impl ValidMeal {
    /// Create payload stamped with `created_at`.
    pub fn into_create(self, created_at: DateTime<Utc>) -> CreateFoodItem {
        CreateFoodItem {
            created_at: Some(created_at.to_rfc3339_opts(SecondsFormat::Millis, true)),
            name: self.name,
            avatar: self.avatar,
            rating: self.rating,
            price: None,
            open: Some(self.status.is_open()),
            logo: Some(self.logo),
        }
    }

    /// Update payload for `existing`, keeping its id and creation time.
    pub fn into_update(self, existing: &FoodItem) -> UpdateFoodItem {
        UpdateFoodItem {
            id: existing.id.clone(),
            created_at: Some(existing.created_at.clone()),
            name: Some(self.name),
            avatar: Some(self.avatar),
            rating: Some(self.rating),
            price: None,
            open: Some(self.status.is_open()),
            logo: Some(self.logo),
        }
    }
}

fn is_url(value: &str) -> bool {
    Url::parse(value).is_ok()
}
