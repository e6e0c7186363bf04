//! Command handlers: bridge CLI args -> storefront actions -> output formatting.

pub mod config_cmd;
pub mod meals;
pub mod util;
