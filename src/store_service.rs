//! # Store Service Module
//!
//! Orchestrates one complete store search: extract ingredients from notes,
//! resolve a location, find nearby stores, quote every ingredient at every
//! store and estimate the cheapest total.
//!
//! Every stage degrades to a documented fallback, so a search always
//! produces a [`StoreSearchResult`], at worst an empty one.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, warn};

use crate::config::{Coordinates, ServiceConfig};
use crate::cost::aggregate;
use crate::geo::{DeviceLocator, GeoResolver, Geocoder};
use crate::google_maps::GoogleMapsClient;
use crate::price_oracle::{PriceOracle, PriceSource};
use crate::store_locator::{PlacesSearch, StoreLocator};
use crate::store_types::{StoreChain, StoreSearchResult};
use crate::text_processing::IngredientExtractor;

/// Where a search should be centred
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchLocation {
    /// Current device position
    Device,
    /// A postal code to geocode
    PostalCode(String),
}

impl SearchLocation {
    /// A postal code location, or the device when the code is blank
    pub fn from_postal_code(code: &str) -> Self {
        let code = code.trim();
        if code.is_empty() {
            SearchLocation::Device
        } else {
            SearchLocation::PostalCode(code.to_string())
        }
    }
}

/// End-to-end store and price search
pub struct StoreService {
    extractor: IngredientExtractor,
    geo: GeoResolver,
    locator: StoreLocator,
    oracle: PriceOracle,
    price_seed: Option<u64>,
}

impl StoreService {
    /// Build a service from configuration
    ///
    /// With Google Maps credentials the resolver and locator use live
    /// geocoding and places search; otherwise both answer built-in data.
    pub fn new(config: ServiceConfig) -> Self {
        let mut geo = GeoResolver::new(config.geo);
        let mut locator = StoreLocator::new(config.locator);

        match config.google_maps.as_ref().map(GoogleMapsClient::new) {
            Some(Ok(client)) => {
                let client = Arc::new(client);
                geo = geo.with_geocoder(client.clone());
                locator = locator.with_places(client);
            }
            Some(Err(e)) => {
                warn!("Failed to create Google Maps client: {}, using built-in data", e)
            }
            None => debug!("No Google Maps configuration, using built-in data"),
        }

        Self {
            extractor: IngredientExtractor::with_config(config.extractor),
            geo,
            locator,
            oracle: PriceOracle::new(config.pricing),
            price_seed: config.price_seed,
        }
    }

    /// Assemble a service from prebuilt components
    pub fn with_components(
        extractor: IngredientExtractor,
        geo: GeoResolver,
        locator: StoreLocator,
        oracle: PriceOracle,
    ) -> Self {
        Self {
            extractor,
            geo,
            locator,
            oracle,
            price_seed: None,
        }
    }

    pub fn with_geocoder(mut self, geocoder: Arc<dyn Geocoder>) -> Self {
        self.geo = self.geo.with_geocoder(geocoder);
        self
    }

    pub fn with_device(mut self, device: Arc<dyn DeviceLocator>) -> Self {
        self.geo = self.geo.with_device(device);
        self
    }

    pub fn with_places(mut self, places: Arc<dyn PlacesSearch>) -> Self {
        self.locator = self.locator.with_places(places);
        self
    }

    pub fn with_chain_price_source(
        mut self,
        chain: StoreChain,
        source: Arc<dyn PriceSource>,
    ) -> Self {
        self.oracle = self.oracle.with_chain_source(chain, source);
        self
    }

    /// Fix the random source so searches are reproducible
    pub fn with_price_seed(mut self, seed: u64) -> Self {
        self.price_seed = Some(seed);
        self
    }

    /// Search around the device position
    pub async fn search_stores_and_prices(&self, notes: &str) -> StoreSearchResult {
        self.search(notes, &SearchLocation::Device).await
    }

    /// Search around a postal code
    ///
    /// A blank code searches around the device position instead.
    pub async fn search_stores_and_prices_with_zip(
        &self,
        notes: &str,
        zip_code: &str,
    ) -> StoreSearchResult {
        self.search(notes, &SearchLocation::from_postal_code(zip_code)).await
    }

    /// Run the full pipeline for one location source
    ///
    /// Notes without ingredients give an empty result without any location
    /// or store lookup.
    pub async fn search(&self, notes: &str, location: &SearchLocation) -> StoreSearchResult {
        let ingredients = self.extractor.extract(notes);
        if ingredients.is_empty() {
            info!("No ingredients found in notes");
            return StoreSearchResult::empty();
        }

        let coordinates = self.resolve(location).await;
        let mut rng = self.rng();

        let stores = self.locator.locate(coordinates, &mut rng).await;
        let prices = self.oracle.quote(&ingredients, &stores, &mut rng);
        let total_estimated_cost = aggregate(&prices, &ingredients);

        info!(
            "Search complete: {} ingredients, {} stores, {} quotes, total ${:.2}",
            ingredients.len(),
            stores.len(),
            prices.len(),
            total_estimated_cost
        );
        StoreSearchResult {
            stores,
            prices,
            total_estimated_cost,
        }
    }

    async fn resolve(&self, location: &SearchLocation) -> Coordinates {
        match location {
            SearchLocation::Device => self.geo.resolve_from_device().await,
            SearchLocation::PostalCode(code) => self.geo.resolve_from_postal_code(code).await,
        }
    }

    fn rng(&self) -> StdRng {
        match self.price_seed {
            Some(seed) => {
                debug!("Using seeded random source ({})", seed);
                StdRng::seed_from_u64(seed)
            }
            None => StdRng::from_entropy(),
        }
    }
}

impl Default for StoreService {
    fn default() -> Self {
        Self::new(ServiceConfig::default())
    }
}
