//! End-to-end store searches through `StoreService` with in-memory
//! collaborators standing in for the device and the maps services.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use mealwise::config::{
    Coordinates, GeoConfig, LocatorConfig, PositionOptions, PricingConfig, ServiceConfig,
};
use mealwise::errors::{ExternalApiError, LocationError};
use mealwise::geo::{
    DeviceLocator, GeoResolver, GeocodeResponse, GeocodeResult, Geocoder, Geometry, LatLng,
};
use mealwise::price_oracle::PriceOracle;
use mealwise::store_locator::{PlaceResult, PlacesResponse, PlacesSearch, StoreLocator};
use mealwise::store_service::{SearchLocation, StoreService};
use mealwise::store_types::StoreChain;
use mealwise::text_processing::IngredientExtractor;

const NOTES: &str = "Chicken breast (2 lbs)\n- Rice (1 bag)";
const FALLBACK: Coordinates = Coordinates::new(33.748997, -84.387985);
const MIDTOWN: Coordinates = Coordinates::new(33.7838, -84.3830);

struct UnavailableDevice;

#[async_trait]
impl DeviceLocator for UnavailableDevice {
    async fn current_position(
        &self,
        _options: &PositionOptions,
    ) -> Result<Coordinates, LocationError> {
        Err(LocationError::Unavailable("no signal".to_string()))
    }
}

/// Geocoder answering one status for every address
struct StatusGeocoder {
    status: &'static str,
    location: Coordinates,
}

#[async_trait]
impl Geocoder for StatusGeocoder {
    async fn geocode(&self, _address: &str) -> Result<GeocodeResponse, ExternalApiError> {
        let results = if self.status == "OK" {
            vec![GeocodeResult {
                geometry: Geometry {
                    location: LatLng {
                        lat: self.location.latitude,
                        lng: self.location.longitude,
                    },
                },
            }]
        } else {
            Vec::new()
        };
        Ok(GeocodeResponse {
            status: self.status.to_string(),
            results,
        })
    }
}

/// Places search with per-keyword canned responses; unknown keywords are denied
struct CannedPlaces {
    kroger: Vec<PlaceResult>,
    walmart: Option<Vec<PlaceResult>>,
    searched_from: std::sync::Mutex<Vec<Coordinates>>,
    calls: AtomicUsize,
}

impl CannedPlaces {
    fn new(kroger: Vec<PlaceResult>, walmart: Option<Vec<PlaceResult>>) -> Self {
        Self {
            kroger,
            walmart,
            searched_from: std::sync::Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl PlacesSearch for CannedPlaces {
    async fn find_nearby(
        &self,
        location: Coordinates,
        _radius_meters: u32,
        keyword: &str,
    ) -> Result<PlacesResponse, ExternalApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.searched_from.lock().unwrap().push(location);

        let results = match keyword {
            "Kroger" => Some(self.kroger.clone()),
            "Walmart" => self.walmart.clone(),
            _ => None,
        };
        Ok(match results {
            Some(results) => PlacesResponse {
                status: if results.is_empty() { "ZERO_RESULTS" } else { "OK" }.to_string(),
                results,
                error_message: None,
            },
            None => PlacesResponse {
                status: "REQUEST_DENIED".to_string(),
                results: Vec::new(),
                error_message: Some("denied".to_string()),
            },
        })
    }
}

fn place(id: &str, name: &str, lat: f64, lng: f64) -> PlaceResult {
    PlaceResult {
        place_id: id.to_string(),
        name: name.to_string(),
        vicinity: format!("{name} address"),
        geometry: Geometry {
            location: LatLng { lat, lng },
        },
    }
}

fn seeded_config(seed: u64) -> ServiceConfig {
    ServiceConfig {
        price_seed: Some(seed),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_end_to_end_with_unavailable_device() {
    let service = StoreService::new(seeded_config(42)).with_device(Arc::new(UnavailableDevice));

    let result = service.search_stores_and_prices(NOTES).await;

    assert!(!result.stores.is_empty());
    assert!(result.stores.len() <= 10);
    assert_eq!(result.stores.len(), 2);
    assert!(result.stores.windows(2).all(|w| w[0].distance <= w[1].distance));
    assert_eq!(result.prices.len(), 2 * result.stores.len());
    assert!(result.total_estimated_cost >= 0.0);
    assert_eq!(result.priced_ingredients(), vec!["chicken breast", "rice"]);

    let again = StoreService::new(seeded_config(42))
        .with_device(Arc::new(UnavailableDevice))
        .search_stores_and_prices(NOTES)
        .await;
    assert_eq!(again.total_estimated_cost, result.total_estimated_cost);
    assert_eq!(again.stores, result.stores);
}

#[tokio::test]
async fn test_zip_search_with_zero_results_uses_fallback() {
    let places = Arc::new(CannedPlaces::new(
        vec![place("k1", "Kroger", 33.76, -84.39)],
        Some(vec![place("w1", "Walmart Supercenter", 33.70, -84.40)]),
    ));
    let service = StoreService::new(seeded_config(1))
        .with_geocoder(Arc::new(StatusGeocoder {
            status: "ZERO_RESULTS",
            location: MIDTOWN,
        }))
        .with_places(places.clone());

    let result = service.search_stores_and_prices_with_zip(NOTES, "00000").await;

    assert_eq!(result.stores.len(), 2);
    let searched_from = places.searched_from.lock().unwrap().clone();
    assert_eq!(searched_from, vec![FALLBACK, FALLBACK]);
}

#[tokio::test]
async fn test_zip_search_uses_geocoded_location() {
    let places = Arc::new(CannedPlaces::new(
        vec![place("k1", "Kroger", 33.78, -84.38)],
        Some(Vec::new()),
    ));
    let service = StoreService::new(seeded_config(1))
        .with_geocoder(Arc::new(StatusGeocoder {
            status: "OK",
            location: MIDTOWN,
        }))
        .with_places(places.clone());

    let result = service.search_stores_and_prices_with_zip(NOTES, " 30308 ").await;

    assert_eq!(result.stores.len(), 1);
    assert_eq!(result.stores[0].id, "kroger_k1");
    assert!(result.stores[0].distance < 1.0);
    assert_eq!(places.searched_from.lock().unwrap()[0], MIDTOWN);
}

#[tokio::test]
async fn test_one_failing_chain_keeps_the_other() {
    let places = Arc::new(CannedPlaces::new(
        vec![
            place("far", "Kroger Far", 34.20, -84.40),
            place("near", "Kroger Near", 33.75, -84.39),
        ],
        None,
    ));
    let service = StoreService::new(seeded_config(3)).with_places(places.clone());

    let result = service.search(NOTES, &SearchLocation::Device).await;

    assert_eq!(places.calls.load(Ordering::SeqCst), 2);
    assert_eq!(result.stores.len(), 2);
    assert!(result.stores.iter().all(|s| s.chain == StoreChain::Kroger));
    assert_eq!(result.stores[0].id, "kroger_near");
    assert_eq!(result.prices.len(), 4);
}

#[tokio::test]
async fn test_every_chain_failing_uses_built_in_stores() {
    let places = Arc::new(CannedPlaces::new(Vec::new(), None));
    let locator = StoreLocator::new(LocatorConfig {
        chains: vec![StoreChain::Walmart],
        ..Default::default()
    })
    .with_places(places);
    let service = StoreService::with_components(
        IngredientExtractor::new(),
        GeoResolver::new(GeoConfig::default()),
        locator,
        PriceOracle::new(PricingConfig::default()),
    )
    .with_price_seed(9);

    let result = service.search_stores_and_prices(NOTES).await;

    let ids: Vec<&str> = result.stores.iter().map(|s| s.id.as_str()).collect();
    assert!(ids.contains(&"kroger1"));
    assert!(ids.contains(&"walmart1"));
}

#[tokio::test]
async fn test_store_limit_is_applied() {
    let kroger: Vec<PlaceResult> = (0..8)
        .map(|i| place(&format!("k{i}"), "Kroger", 33.75 + i as f64 * 0.01, -84.39))
        .collect();
    let walmart: Vec<PlaceResult> = (0..8)
        .map(|i| place(&format!("w{i}"), "Walmart", 33.75 - i as f64 * 0.01, -84.39))
        .collect();
    let service = StoreService::new(seeded_config(5))
        .with_places(Arc::new(CannedPlaces::new(kroger, Some(walmart))));

    let result = service.search_stores_and_prices("salmon").await;

    assert_eq!(result.stores.len(), 10);
    assert!(result.stores.windows(2).all(|w| w[0].distance <= w[1].distance));
    assert_eq!(result.prices.len(), 10);
}

#[tokio::test]
async fn test_no_ingredients_skips_lookups() {
    let places = Arc::new(CannedPlaces::new(Vec::new(), Some(Vec::new())));
    let service = StoreService::new(ServiceConfig::default()).with_places(places.clone());

    let result = service.search_stores_and_prices_with_zip("see you at 7", "30308").await;

    assert!(result.stores.is_empty());
    assert!(result.prices.is_empty());
    assert_eq!(result.total_estimated_cost, 0.0);
    assert_eq!(places.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_result_serializes_camel_case() {
    let service = StoreService::new(seeded_config(11));
    let result = service.search_stores_and_prices("Rice (1 bag)").await;

    let json = serde_json::to_value(&result).unwrap();
    assert!(json["totalEstimatedCost"].is_number());
    assert!(json["prices"][0]["storeId"].is_string());
    assert!(json["prices"][0]["unitPrice"].is_number());
    assert!(json["prices"][0]["lastUpdated"].is_string());
    let chain = json["stores"][0]["chain"].as_str();
    assert!(matches!(chain, Some("kroger") | Some("walmart")));
}
