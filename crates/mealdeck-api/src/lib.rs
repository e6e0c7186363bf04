// mealdeck-api: Async Rust client for the food listing REST API

pub mod client;
pub mod error;
mod food;
pub mod models;
pub mod transport;

pub use client::{FoodClient, RequestOptions};
pub use error::Error;
pub use models::{CreateFoodItem, DeletedFood, FoodItem, UpdateFoodItem};
pub use transport::TransportConfig;
