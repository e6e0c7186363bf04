//! Query cache and storefront logic between `mealdeck-api` and presentation
//! layers (the `mealdeck` CLI).
//!
//! - **[`Storefront`]**: facade for user intents. Show all or search,
//!   add/edit/delete a meal; each returns the result plus the [`Notice`] to
//!   display, and refreshes the [`DisplayStore`] after writes.
//!
//! - **[`QueryCache`]**: keyed cache (`DashMap` + `tokio::sync::watch`) with
//!   in-flight request sharing, stale times, stale-while-revalidate reads,
//!   prefix invalidation, and idle-entry garbage collection.
//!
//! - **[`FoodQueries`] / [`FoodMutations`]**: reads and writes against
//!   `/Food`, keyed by the scheme in [`keys`]. Writes reconcile the cache
//!   with the server's response.
//!
//! - **[`DisplayStore`]**: the visible meal list, replaced wholesale by the
//!   last query; observed through [`FoodStream`].
//!
//! - **[`MealForm`]**: add/edit form input, validated before any request.

pub mod cache;
pub mod config;
pub mod error;
pub mod filters;
pub mod form;
pub mod keys;
pub mod mutations;
pub mod notice;
pub mod queries;
pub mod retry;
pub mod store;
pub mod storefront;
pub mod stream;

// ── Primary re-exports ──────────────────────────────────────────────
pub use cache::{CacheStats, FetchOptions, QueryCache, QueryKey, QueryState, QueryStatus};
pub use config::{CachePolicy, StorefrontConfig};
pub use error::CoreError;
pub use filters::FoodFilters;
pub use form::{FieldError, FormErrors, MealForm, MealStatus, ValidMeal};
pub use mutations::FoodMutations;
pub use notice::{Notice, NoticeLevel};
pub use queries::{FoodCache, FoodData, FoodQueries, QueryOutcome};
pub use retry::RetryPolicy;
pub use store::DisplayStore;
pub use storefront::{Action, ActionError, ActiveView, Storefront};
pub use stream::FoodStream;

// Wire types callers need alongside the core API.
pub use mealdeck_api::{CreateFoodItem, DeletedFood, FoodItem, UpdateFoodItem};
