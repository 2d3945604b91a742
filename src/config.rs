//! # Configuration Module
//!
//! This module defines configuration structures for the store search pipeline:
//! location fallbacks, store search limits, synthetic pricing heuristics and
//! the environment variables that override them.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use tracing::{info, warn};

use crate::store_types::StoreChain;
use crate::text_processing::ExtractorConfig;

// Constants for location resolution
pub const DEFAULT_FALLBACK_LATITUDE: f64 = 33.748997;
pub const DEFAULT_FALLBACK_LONGITUDE: f64 = -84.387985;
pub const GEOLOCATION_TIMEOUT: Duration = Duration::from_secs(10);
pub const GEOLOCATION_MAXIMUM_AGE: Duration = Duration::from_secs(5 * 60);

// Constants for store search
pub const SEARCH_RADIUS_METERS: u32 = 50_000; // 50km
pub const MAX_STORES: usize = 10;
pub const FALLBACK_MAX_DISTANCE_MILES: f64 = 5.0;

pub const DEFAULT_GOOGLE_MAPS_BASE_URL: &str = "https://maps.googleapis.com";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

/// Latitude and longitude in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Whether both components are finite and within their ranges
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// Knobs passed to the device geolocation provider
#[derive(Debug, Clone, PartialEq)]
pub struct PositionOptions {
    pub enable_high_accuracy: bool,
    /// Upper bound on one position request
    pub timeout: Duration,
    /// How long a previous fix may be reused
    pub maximum_age: Duration,
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self {
            enable_high_accuracy: false,
            timeout: GEOLOCATION_TIMEOUT,
            maximum_age: GEOLOCATION_MAXIMUM_AGE,
        }
    }
}

/// Location resolution configuration
#[derive(Debug, Clone)]
pub struct GeoConfig {
    /// Substituted whenever a location cannot be resolved
    pub fallback: Coordinates,
    pub position_options: PositionOptions,
}

impl Default for GeoConfig {
    fn default() -> Self {
        Self {
            fallback: Coordinates::new(DEFAULT_FALLBACK_LATITUDE, DEFAULT_FALLBACK_LONGITUDE),
            position_options: PositionOptions::default(),
        }
    }
}

/// A built-in store used when no real store search is possible
#[derive(Debug, Clone)]
pub struct FallbackStore {
    pub id: String,
    pub name: String,
    pub address: String,
    pub chain: StoreChain,
    pub location: Coordinates,
}

/// Store search configuration
#[derive(Debug, Clone)]
pub struct LocatorConfig {
    /// Chains searched for, in merge order
    pub chains: Vec<StoreChain>,
    pub radius_meters: u32,
    pub max_stores: usize,
    /// Fallback stores get a random distance in `[0, fallback_max_distance_miles)`
    pub fallback_max_distance_miles: f64,
    pub fallback_stores: Vec<FallbackStore>,
}

impl Default for LocatorConfig {
    fn default() -> Self {
        let location = Coordinates::new(DEFAULT_FALLBACK_LATITUDE, DEFAULT_FALLBACK_LONGITUDE);
        Self {
            chains: StoreChain::ALL.to_vec(),
            radius_meters: SEARCH_RADIUS_METERS,
            max_stores: MAX_STORES,
            fallback_max_distance_miles: FALLBACK_MAX_DISTANCE_MILES,
            fallback_stores: vec![
                FallbackStore {
                    id: "kroger1".to_string(),
                    name: "Kroger".to_string(),
                    address: "123 Main St, Anytown, USA".to_string(),
                    chain: StoreChain::Kroger,
                    location,
                },
                FallbackStore {
                    id: "walmart1".to_string(),
                    name: "Walmart Supercenter".to_string(),
                    address: "456 Oak Ave, Anytown, USA".to_string(),
                    chain: StoreChain::Walmart,
                    location,
                },
            ],
        }
    }
}

/// Price range for a food category, matched by name keywords
#[derive(Debug, Clone, PartialEq)]
pub struct PriceCategory {
    pub name: String,
    /// Lowercase substrings of an ingredient name that select this category
    pub keywords: Vec<String>,
    pub min_price: f64,
    pub max_price: f64,
}

impl PriceCategory {
    pub fn new(name: &str, keywords: &[&str], min_price: f64, max_price: f64) -> Self {
        Self {
            name: name.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            min_price,
            max_price,
        }
    }

    pub fn matches(&self, ingredient_name: &str) -> bool {
        let name = ingredient_name.to_lowercase();
        self.keywords.iter().any(|keyword| name.contains(keyword.as_str()))
    }
}

/// Synthetic pricing heuristics
///
/// These stand in for real vendor pricing and can be replaced wholesale.
#[derive(Debug, Clone)]
pub struct PricingConfig {
    /// Checked in order, first match wins
    pub categories: Vec<PriceCategory>,
    /// `(min, max)` used when no category matches
    pub default_range: (f64, f64),
    /// Relative per-store variation, 0.1 means ±10%
    pub store_variation: f64,
    /// Probability that a quote is available
    pub availability_rate: f64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            categories: vec![
                PriceCategory::new("meat", &["chicken", "beef", "pork"], 3.0, 5.0),
                PriceCategory::new("seafood", &["salmon", "shrimp", "seafood"], 6.0, 9.0),
                PriceCategory::new(
                    "vegetables",
                    &["onion", "garlic", "pepper", "broccoli", "carrot", "tomato"],
                    0.5,
                    2.0,
                ),
                PriceCategory::new("grains", &["rice", "pasta", "spaghetti"], 1.0, 2.0),
                PriceCategory::new("dairy", &["cheese", "milk", "butter"], 2.0, 4.0),
                PriceCategory::new("oils_condiments", &["oil", "vinegar", "sauce"], 1.0, 2.5),
                PriceCategory::new(
                    "herbs_spices",
                    &["basil", "parsley", "cilantro", "saffron", "seasoning"],
                    1.0,
                    3.0,
                ),
                PriceCategory::new("bread", &["tortilla", "bread"], 1.5, 2.5),
            ],
            default_range: (1.0, 2.5),
            store_variation: 0.1,
            availability_rate: 0.9,
        }
    }
}

impl PricingConfig {
    /// Price range for an ingredient name
    pub fn range_for(&self, ingredient_name: &str) -> (f64, f64) {
        self.categories
            .iter()
            .find(|category| category.matches(ingredient_name))
            .map(|category| (category.min_price, category.max_price))
            .unwrap_or(self.default_range)
    }
}

/// Google Maps credentials and endpoint
#[derive(Debug, Clone)]
pub struct GoogleMapsConfig {
    pub api_key: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl GoogleMapsConfig {
    pub fn new(api_key: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            base_url: DEFAULT_GOOGLE_MAPS_BASE_URL.to_string(),
            timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
        }
    }
}

/// Configuration for a complete store search service
#[derive(Debug, Clone, Default)]
pub struct ServiceConfig {
    /// `None` means external lookups are unavailable and built-in data is used
    pub google_maps: Option<GoogleMapsConfig>,
    pub geo: GeoConfig,
    pub locator: LocatorConfig,
    pub pricing: PricingConfig,
    pub extractor: ExtractorConfig,
    /// Seed for the per-search random source; random when absent
    pub price_seed: Option<u64>,
}

impl ServiceConfig {
    /// Build configuration from the environment, loading `.env` first
    ///
    /// Recognized variables:
    /// - `GOOGLE_MAPS_API_KEY`
    /// - `GOOGLE_MAPS_BASE_URL`
    /// - `MEALWISE_HTTP_TIMEOUT_SECS`
    /// - `MEALWISE_FALLBACK_LATITUDE`, `MEALWISE_FALLBACK_LONGITUDE`
    /// - `MEALWISE_PRICE_SEED`
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();

        let mut config = Self::default();

        match env::var("GOOGLE_MAPS_API_KEY") {
            Ok(key) if !key.trim().is_empty() => {
                let mut maps = GoogleMapsConfig::new(key.trim());
                if let Ok(base_url) = env::var("GOOGLE_MAPS_BASE_URL") {
                    maps.base_url = base_url.trim_end_matches('/').to_string();
                }
                if let Some(timeout) = parse_env("MEALWISE_HTTP_TIMEOUT_SECS") {
                    maps.timeout_secs = timeout;
                }
                config.google_maps = Some(maps);
            }
            _ => info!("GOOGLE_MAPS_API_KEY not set, store search will use built-in data"),
        }

        if let Some(latitude) = parse_env("MEALWISE_FALLBACK_LATITUDE") {
            config.geo.fallback.latitude = latitude;
        }
        if let Some(longitude) = parse_env("MEALWISE_FALLBACK_LONGITUDE") {
            config.geo.fallback.longitude = longitude;
        }
        if !config.geo.fallback.is_valid() {
            warn!(
                "Configured fallback coordinate {:?} is invalid, using default",
                config.geo.fallback
            );
            config.geo.fallback = GeoConfig::default().fallback;
        }

        config.price_seed = parse_env("MEALWISE_PRICE_SEED");
        config
    }
}

fn parse_env<T: FromStr>(name: &str) -> Option<T> {
    let raw = env::var(name).ok()?;
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("Ignoring unparseable {}={:?}", name, raw);
            None
        }
    }
}
