// ── User-facing notices ──
//
// Outcome messages shown after a storefront action, mirroring a toast with
// a title and a description.

use std::fmt;

use serde::Serialize;
use strum::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub description: Option<String>,
}

impl Notice {
    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            title: title.into(),
            description: Some(description.into()),
        }
    }

    pub fn error(title: impl Into<String>, description: Option<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            title: title.into(),
            description,
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }

    // ── Storefront messages ──────────────────────────────────────────

    pub fn meal_added(name: &str) -> Self {
        Self::success(
            "Meal added successfully!",
            format!("{name} has been added to the menu."),
        )
    }

    pub fn meal_updated(name: &str) -> Self {
        Self::success("Meal updated successfully!", format!("{name} has been updated."))
    }

    pub fn meal_deleted(name: &str) -> Self {
        Self::success(
            "Meal deleted successfully!",
            format!("{name} has been removed from the menu."),
        )
    }

    pub fn add_failed() -> Self {
        Self::error(
            "Failed to add meal",
            Some("There was an error adding the meal. Please try again.".into()),
        )
    }

    pub fn update_failed() -> Self {
        Self::error(
            "Failed to update meal",
            Some("There was an error updating the meal. Please try again.".into()),
        )
    }

    pub fn delete_failed() -> Self {
        Self::error(
            "Failed to delete meal",
            Some("There was an error deleting the meal. Please try again.".into()),
        )
    }

    pub fn search_failed() -> Self {
        Self::error("Error searching for meals. Please try again.", None)
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.title)?;
        if let Some(description) = &self.description {
            write!(f, " {description}")?;
        }
        Ok(())
    }
}
