//! # Store Locator Module
//!
//! Finds nearby stores of each supported chain through a places-search
//! collaborator, annotates them with a great-circle distance and keeps the
//! closest ones.
//!
//! Searches for the individual chains run concurrently. A failing chain is
//! logged and skipped; only when nothing usable comes back (or no places
//! service is configured) does the locator answer its built-in store list.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::{Coordinates, LocatorConfig};
use crate::errors::{ExternalApiError, LocatorError};
use crate::geo::{haversine_miles, Geometry};
use crate::store_types::{Store, StoreChain};

/// One place in a nearby-search response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceResult {
    pub place_id: String,
    pub name: String,
    #[serde(default)]
    pub vicinity: String,
    pub geometry: Geometry,
}

/// Nearby-search response body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacesResponse {
    pub status: String,
    #[serde(default)]
    pub results: Vec<PlaceResult>,
    #[serde(default)]
    pub error_message: Option<String>,
}

/// Keyword search for places around a coordinate
#[async_trait]
pub trait PlacesSearch: Send + Sync {
    async fn find_nearby(
        &self,
        location: Coordinates,
        radius_meters: u32,
        keyword: &str,
    ) -> Result<PlacesResponse, ExternalApiError>;
}

/// Locates the closest stores of the configured chains
pub struct StoreLocator {
    places: Option<Arc<dyn PlacesSearch>>,
    config: LocatorConfig,
}

impl StoreLocator {
    /// A locator with no places service, always answering the built-in list
    pub fn new(config: LocatorConfig) -> Self {
        Self {
            places: None,
            config,
        }
    }

    pub fn with_places(mut self, places: Arc<dyn PlacesSearch>) -> Self {
        self.places = Some(places);
        self
    }

    pub fn config(&self) -> &LocatorConfig {
        &self.config
    }

    /// Stores near `location`, closest first, at most `max_stores` of them
    ///
    /// `rng` is only drawn from when the built-in list is used.
    pub async fn locate(
        &self,
        location: Coordinates,
        rng: &mut (dyn RngCore + Send),
    ) -> Vec<Store> {
        let Some(places) = self.places.as_ref() else {
            warn!("Places search not configured, using built-in stores");
            return self.fallback_stores(rng);
        };

        let searches = self
            .config
            .chains
            .iter()
            .map(|&chain| self.search_chain(places.as_ref(), location, chain));
        let outcomes = join_all(searches).await;

        let mut stores = Vec::new();
        let mut failures = 0;
        for outcome in outcomes {
            match outcome {
                Ok(found) => stores.extend(found),
                Err(e) => {
                    warn!("Store search failed: {}", e);
                    failures += 1;
                }
            }
        }

        if failures == self.config.chains.len() {
            warn!("Store search failed for every chain, using built-in stores");
            return self.fallback_stores(rng);
        }
        if stores.is_empty() {
            warn!("No real stores found, using built-in stores");
            return self.fallback_stores(rng);
        }

        let mut seen = HashSet::new();
        stores.retain(|store| seen.insert(store.id.clone()));
        let stores = closest(stores, self.config.max_stores);
        info!("Found {} stores near {:?}", stores.len(), location);
        stores
    }

    /// Search one chain and map its places to stores
    pub async fn search_chain(
        &self,
        places: &dyn PlacesSearch,
        location: Coordinates,
        chain: StoreChain,
    ) -> Result<Vec<Store>, LocatorError> {
        debug!("Searching for {} stores at {:?}", chain, location);
        let response = places
            .find_nearby(location, self.config.radius_meters, chain.keyword())
            .await
            .map_err(|source| LocatorError::Api { chain, source })?;

        match response.status.as_str() {
            "OK" | "ZERO_RESULTS" => {}
            _ => {
                return Err(LocatorError::Status {
                    chain,
                    status: response.status,
                    message: response.error_message.unwrap_or_default(),
                })
            }
        }

        let stores: Vec<Store> = response
            .results
            .into_iter()
            .map(|place| {
                let place_location: Coordinates = place.geometry.location.into();
                Store {
                    id: format!("{}_{}", chain.as_str(), place.place_id),
                    name: place.name,
                    address: place.vicinity,
                    chain,
                    distance: haversine_miles(location, place_location),
                    latitude: place_location.latitude,
                    longitude: place_location.longitude,
                }
            })
            .collect();
        debug!("Found {} {} stores", stores.len(), chain);
        Ok(stores)
    }

    /// The built-in store list with random distances, closest first
    pub fn fallback_stores(&self, rng: &mut dyn RngCore) -> Vec<Store> {
        let max_distance = self.config.fallback_max_distance_miles.max(0.0);
        let stores = self
            .config
            .fallback_stores
            .iter()
            .map(|store| Store {
                id: store.id.clone(),
                name: store.name.clone(),
                address: store.address.clone(),
                chain: store.chain,
                distance: rng.gen::<f64>() * max_distance,
                latitude: store.location.latitude,
                longitude: store.location.longitude,
            })
            .collect();
        closest(stores, self.config.max_stores)
    }
}

/// Sort ascending by distance and keep the first `limit`
fn closest(mut stores: Vec<Store>, limit: usize) -> Vec<Store> {
    stores.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    stores.truncate(limit);
    stores
}
