//! # Error Types Module
//!
//! Error types returned at the external boundaries of the search pipeline:
//! the HTTP collaborators, location resolution and per-chain store searches.
//! The pipeline itself never surfaces these to its caller; each one is
//! matched and replaced by a documented fallback value.

use std::time::Duration;
use thiserror::Error;

use crate::store_types::StoreChain;

/// Failures talking to an external HTTP API
#[derive(Debug, Error)]
pub enum ExternalApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Reasons a location could not be resolved
#[derive(Debug, Error)]
pub enum LocationError {
    #[error("device geolocation is not supported")]
    Unsupported,

    #[error("device geolocation permission denied")]
    PermissionDenied,

    #[error("device geolocation timed out after {0:?}")]
    Timeout(Duration),

    #[error("device position unavailable: {0}")]
    Unavailable(String),

    #[error("no geocoding service configured")]
    NotConfigured,

    #[error("postal code is empty")]
    EmptyPostalCode,

    #[error("geocoding request failed: {0}")]
    Geocoding(#[from] ExternalApiError),

    #[error("geocoding returned status {0}")]
    GeocodeStatus(String),

    #[error("geocoding returned no results for \"{0}\"")]
    NoResults(String),

    #[error("invalid coordinates ({latitude}, {longitude})")]
    InvalidCoordinates { latitude: f64, longitude: f64 },
}

/// Failures searching for stores of one chain
#[derive(Debug, Error)]
pub enum LocatorError {
    #[error("places search for {chain} failed: {source}")]
    Api {
        chain: StoreChain,
        #[source]
        source: ExternalApiError,
    },

    #[error("places search for {chain} returned status {status}: {message}")]
    Status {
        chain: StoreChain,
        status: String,
        message: String,
    },
}
