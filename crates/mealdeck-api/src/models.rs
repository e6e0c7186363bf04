// Wire types for the `/Food` resource.
//
// Field names follow the backend's JSON exactly (`createdAt`, `Price`, and
// the snake_case legacy fields), so every struct renames explicitly.

use serde::{Deserialize, Deserializer, Serialize};

/// A listed meal as stored by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodItem {
    /// Server-assigned identifier, immutable once assigned.
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(rename = "createdAt", default)]
    pub created_at: String,
    #[serde(default)]
    pub name: String,
    /// Meal image URL.
    #[serde(default)]
    pub avatar: String,
    /// Free-form rating text. Never validated as a number.
    #[serde(default, deserialize_with = "string_or_number")]
    pub rating: String,
    #[serde(default)]
    pub open: bool,
    /// Restaurant logo URL.
    #[serde(default)]
    pub logo: String,
    #[serde(rename = "Price", default, deserialize_with = "string_or_number")]
    pub price: String,

    // Legacy / alternate fields, carried through but unused by the core flows.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub food_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub food_rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub food_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restaurant_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restaurant_logo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restaurant_status: Option<String>,
}

/// Body of `POST /Food`. The server assigns `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateFoodItem {
    #[serde(rename = "createdAt", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    pub name: String,
    pub avatar: String,
    pub rating: String,
    #[serde(rename = "Price", skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
}

/// Partial update for `PUT /Food/{id}`.
///
/// `id` only selects the URL path; it is never serialized into the body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateFoodItem {
    #[serde(skip_serializing)]
    pub id: String,
    #[serde(rename = "createdAt", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<String>,
    #[serde(rename = "Price", skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
}

/// Response of `DELETE /Food/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletedFood {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
}

/// Accept a JSON string or number and keep it as text.
///
/// Some backends emit numeric ids and ratings; the client treats both as
/// opaque strings.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
        Null,
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
        Raw::Null => String::new(),
    })
}
