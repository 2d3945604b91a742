//! # Mealwise
//!
//! Ingredient extraction and store price aggregation for meal notes.
//!
//! Free-form notes are parsed into ingredient quantities, a search location
//! is resolved from the device or a postal code, nearby grocery stores are
//! located and every ingredient is quoted at every store. The cheapest
//! available quote per ingredient gives the estimated total.
//!
//! ```rust,no_run
//! use mealwise::config::ServiceConfig;
//! use mealwise::store_service::StoreService;
//!
//! # async fn run() {
//! let service = StoreService::new(ServiceConfig::from_env());
//! let result = service
//!     .search_stores_and_prices_with_zip("Chicken breast (2 lbs)\n- Rice (1 bag)", "30301")
//!     .await;
//! println!("Estimated total: ${:.2}", result.total_estimated_cost);
//! # }
//! ```

pub mod config;
pub mod cost;
pub mod errors;
pub mod geo;
pub mod google_maps;
pub mod measurement_patterns;
pub mod price_oracle;
pub mod store_locator;
pub mod store_service;
pub mod store_types;
pub mod text_processing;
pub mod unit_conversion;
