//! # Geo Module
//!
//! Resolves the coordinate a store search is centred on, either from the
//! device or from a postal code, and computes great-circle distances.
//!
//! Resolution is fail-soft: the `try_*` functions report why a lookup failed,
//! and the `resolve_*` wrappers substitute the configured fallback coordinate.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::{Coordinates, GeoConfig, PositionOptions};
use crate::errors::{ExternalApiError, LocationError};

/// Earth's radius in miles
pub const EARTH_RADIUS_MILES: f64 = 3959.0;

/// Great-circle distance between two coordinates in miles (Haversine formula)
///
/// # Examples
///
/// ```rust
/// use mealwise::config::Coordinates;
/// use mealwise::geo::haversine_miles;
///
/// let atlanta = Coordinates::new(33.748997, -84.387985);
/// assert_eq!(haversine_miles(atlanta, atlanta), 0.0);
/// ```
pub fn haversine_miles(from: Coordinates, to: Coordinates) -> f64 {
    let d_lat = (to.latitude - from.latitude).to_radians();
    let d_lon = (to.longitude - from.longitude).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + from.latitude.to_radians().cos()
            * to.latitude.to_radians().cos()
            * (d_lon / 2.0).sin().powi(2);

    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_MILES * c
}

/// `{ lat, lng }` as returned by the maps APIs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl From<LatLng> for Coordinates {
    fn from(location: LatLng) -> Self {
        Coordinates::new(location.lat, location.lng)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    pub location: LatLng,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodeResult {
    pub geometry: Geometry,
}

/// Geocoding response body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodeResponse {
    pub status: String,
    #[serde(default)]
    pub results: Vec<GeocodeResult>,
}

/// Turns a free-form address (here, a postal code) into coordinates
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn geocode(&self, address: &str) -> Result<GeocodeResponse, ExternalApiError>;
}

/// Device "get current position" primitive
#[async_trait]
pub trait DeviceLocator: Send + Sync {
    async fn current_position(
        &self,
        options: &PositionOptions,
    ) -> Result<Coordinates, LocationError>;
}

/// Resolves search coordinates with a fixed fallback
pub struct GeoResolver {
    geocoder: Option<Arc<dyn Geocoder>>,
    device: Option<Arc<dyn DeviceLocator>>,
    config: GeoConfig,
    last_fix: Mutex<Option<(Instant, Coordinates)>>,
}

impl GeoResolver {
    /// A resolver with no collaborators, always answering the fallback
    pub fn new(config: GeoConfig) -> Self {
        Self {
            geocoder: None,
            device: None,
            config,
            last_fix: Mutex::new(None),
        }
    }

    pub fn with_geocoder(mut self, geocoder: Arc<dyn Geocoder>) -> Self {
        self.geocoder = Some(geocoder);
        self
    }

    pub fn with_device(mut self, device: Arc<dyn DeviceLocator>) -> Self {
        self.device = Some(device);
        self
    }

    pub fn fallback(&self) -> Coordinates {
        self.config.fallback
    }

    /// Ask the device for its position, reusing a recent fix
    ///
    /// A fix younger than `maximum_age` is returned without prompting the
    /// device again. A request taking longer than `timeout` is abandoned.
    pub async fn try_resolve_from_device(&self) -> Result<Coordinates, LocationError> {
        let device = self.device.as_ref().ok_or(LocationError::Unsupported)?;
        let options = &self.config.position_options;

        if let Some(cached) = self.cached_fix() {
            debug!("Using cached device position {:?}", cached);
            return Ok(cached);
        }

        let position = tokio::time::timeout(options.timeout, device.current_position(options))
            .await
            .map_err(|_| LocationError::Timeout(options.timeout))??;
        let position = validate(position)?;

        *self.last_fix.lock().unwrap_or_else(PoisonError::into_inner) =
            Some((Instant::now(), position));
        info!(
            "Got device location: {}, {}",
            position.latitude, position.longitude
        );
        Ok(position)
    }

    /// Geocode a postal code to coordinates
    pub async fn try_resolve_from_postal_code(
        &self,
        code: &str,
    ) -> Result<Coordinates, LocationError> {
        let code = code.trim();
        if code.is_empty() {
            return Err(LocationError::EmptyPostalCode);
        }
        let geocoder = self.geocoder.as_ref().ok_or(LocationError::NotConfigured)?;

        let response = geocoder.geocode(code).await?;
        if response.status != "OK" {
            return Err(LocationError::GeocodeStatus(response.status));
        }
        let first = response
            .results
            .first()
            .ok_or_else(|| LocationError::NoResults(code.to_string()))?;

        let position = validate(first.geometry.location.into())?;
        info!("Converted postal code {} to coordinates {:?}", code, position);
        Ok(position)
    }

    /// Device position, or the fallback coordinate on any failure
    pub async fn resolve_from_device(&self) -> Coordinates {
        match self.try_resolve_from_device().await {
            Ok(position) => position,
            Err(e) => {
                warn!("Geolocation failed: {}, using default location", e);
                self.config.fallback
            }
        }
    }

    /// Postal code position, or the fallback coordinate on any failure
    pub async fn resolve_from_postal_code(&self, code: &str) -> Coordinates {
        match self.try_resolve_from_postal_code(code).await {
            Ok(position) => position,
            Err(e) => {
                warn!("Geocoding postal code {:?} failed: {}, using default location", code, e);
                self.config.fallback
            }
        }
    }

    fn cached_fix(&self) -> Option<Coordinates> {
        let last_fix = *self.last_fix.lock().unwrap_or_else(PoisonError::into_inner);
        last_fix
            .filter(|(at, _)| at.elapsed() <= self.config.position_options.maximum_age)
            .map(|(_, position)| position)
    }
}

fn validate(position: Coordinates) -> Result<Coordinates, LocationError> {
    if position.is_valid() {
        Ok(position)
    } else {
        Err(LocationError::InvalidCoordinates {
            latitude: position.latitude,
            longitude: position.longitude,
        })
    }
}
