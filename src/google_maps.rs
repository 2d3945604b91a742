//! # Google Maps Client
//!
//! HTTP client for the two Google Maps web services the pipeline uses:
//! geocoding postal codes and nearby places search. It implements the
//! [`Geocoder`] and [`PlacesSearch`] collaborator traits so the resolver and
//! locator never see HTTP details.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::config::{Coordinates, GoogleMapsConfig};
use crate::errors::ExternalApiError;
use crate::geo::{GeocodeResponse, Geocoder};
use crate::store_locator::{PlacesResponse, PlacesSearch};

const GEOCODE_PATH: &str = "/maps/api/geocode/json";
const NEARBY_SEARCH_PATH: &str = "/maps/api/place/nearbysearch/json";
const PLACE_TYPE: &str = "store";

/// Google Maps web service client
#[derive(Clone)]
pub struct GoogleMapsClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl fmt::Debug for GoogleMapsClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GoogleMapsClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl GoogleMapsClient {
    /// Create a client with the configured timeout
    ///
    /// # Errors
    ///
    /// Returns [`ExternalApiError::Http`] if the underlying HTTP client
    /// cannot be built.
    pub fn new(config: &GoogleMapsConfig) -> Result<Self, ExternalApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        info!(
            "Google Maps client initialized (base_url={}, timeout={}s)",
            config.base_url, config.timeout_secs
        );
        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET `path` with `params` plus the API key and decode the JSON body
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
        context: &str,
    ) -> Result<T, ExternalApiError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {} {:?}", url, params);

        let response = self
            .client
            .get(&url)
            .query(params)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(redact)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExternalApiError::UnexpectedStatus {
                status: status.as_u16(),
                url,
            });
        }

        let body = response.text().await.map_err(redact)?;
        serde_json::from_str(&body).map_err(|source| ExternalApiError::Deserialize {
            context: context.to_string(),
            source,
        })
    }
}

/// Request URLs carry the API key, so errors drop them
fn redact(error: reqwest::Error) -> ExternalApiError {
    ExternalApiError::Http(error.without_url())
}

#[async_trait]
impl Geocoder for GoogleMapsClient {
    async fn geocode(&self, address: &str) -> Result<GeocodeResponse, ExternalApiError> {
        let response: GeocodeResponse = self
            .get_json(
                GEOCODE_PATH,
                &[("address", address.to_string())],
                "geocode response",
            )
            .await?;
        debug!(
            "Geocode for {:?} returned {} ({} results)",
            address,
            response.status,
            response.results.len()
        );
        Ok(response)
    }
}

#[async_trait]
impl PlacesSearch for GoogleMapsClient {
    async fn find_nearby(
        &self,
        location: Coordinates,
        radius_meters: u32,
        keyword: &str,
    ) -> Result<PlacesResponse, ExternalApiError> {
        let params = [
            (
                "location",
                format!("{},{}", location.latitude, location.longitude),
            ),
            ("radius", radius_meters.to_string()),
            ("keyword", keyword.to_string()),
            ("type", PLACE_TYPE.to_string()),
        ];
        let response: PlacesResponse = self
            .get_json(NEARBY_SEARCH_PATH, &params, "nearby search response")
            .await?;
        debug!(
            "Nearby search for {} returned {} ({} results)",
            keyword,
            response.status,
            response.results.len()
        );
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let mut config = GoogleMapsConfig::new("test-key");
        config.base_url = "http://localhost:1234/".to_string();
        let client = GoogleMapsClient::new(&config).unwrap();
        assert_eq!(client.base_url(), "http://localhost:1234");
    }

    #[test]
    fn test_debug_output_hides_api_key() {
        let client = GoogleMapsClient::new(&GoogleMapsConfig::new("secret-key")).unwrap();
        let debug = format!("{client:?}");
        assert!(!debug.contains("secret-key"));
        assert!(debug.contains("maps.googleapis.com"));
    }
}
