//! OpenCage forward geocoding
//!
//! Resolves a full address label to the geometry of the first result.
//! The API key comes from configuration and is never compiled in.

use crate::config::Config;
use crate::constants::api::OPENCAGE_GEOCODE_URL;
use crate::coord::Coordinates;
use crate::error::{Error, Result};
use crate::geo::Geocoder;
use serde::Deserialize;
use tracing::debug;

/// OpenCage geocoding backend
#[derive(Clone)]
pub struct OpenCageGeocoder {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

/// OpenCage response envelope
#[derive(Debug, Deserialize)]
struct OpenCageResponse {
    results: Vec<OpenCageResult>,
}

/// A single OpenCage result; only the geometry is used
#[derive(Debug, Deserialize)]
struct OpenCageResult {
    geometry: Coordinates,
}

impl OpenCageGeocoder {
    /// Create a backend against the public OpenCage API
    pub fn new(api_key: &str) -> Result<Self> {
        Self::with_endpoint(OPENCAGE_GEOCODE_URL, api_key)
    }

    /// Create a backend from config, with an optional key override
    ///
    /// Fails if neither the override nor `api_keys.opencage` holds a key.
    pub fn from_config(config: &Config, key_override: Option<&str>) -> Result<Self> {
        let key = key_override.unwrap_or(&config.api_keys.opencage);
        Self::with_endpoint(&config.geocode.endpoint, key)
    }

    /// Create a backend against an explicit endpoint
    pub fn with_endpoint(endpoint: &str, api_key: &str) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(Error::Config(
                "OpenCage API key not configured (set api_keys.opencage or pass --api-key)"
                    .to_string(),
            ));
        }

        Ok(Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.to_string(),
            api_key: api_key.to_string(),
        })
    }

    /// Build the full request URL for an address
    fn geocode_url(&self, address: &str) -> String {
        format!(
            "{}?q={}&key={}",
            self.endpoint,
            urlencoding::encode(address),
            urlencoding::encode(&self.api_key)
        )
    }
}

impl std::fmt::Debug for OpenCageGeocoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenCageGeocoder")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"***")
            .finish()
    }
}

impl Geocoder for OpenCageGeocoder {
    async fn geocode(&self, address: &str) -> Result<Option<Coordinates>> {
        let url = self.geocode_url(address);
        debug!(address, "requesting coordinates");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::Resolution(format!("OpenCage request failed: {}", e.without_url())))?;

        if !response.status().is_success() {
            return Err(Error::Resolution(format!(
                "OpenCage returned status: {}",
                response.status()
            )));
        }

        let data: OpenCageResponse = response.json().await.map_err(|e| {
            Error::Resolution(format!("Failed to parse OpenCage response: {}", e.without_url()))
        })?;

        let Some(first) = data.results.into_iter().next() else {
            return Ok(None);
        };

        first
            .geometry
            .validate()
            .map_err(|e| Error::Resolution(format!("OpenCage returned bad geometry: {}", e)))?;

        Ok(Some(first.geometry))
    }
}
