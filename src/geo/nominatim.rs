//! Nominatim address search (OpenStreetMap)
//!
//! Uses the free Nominatim `/search` API for autocomplete suggestions.
//! Nominatim rejects requests without an identifying User-Agent.

use crate::config::SearchConfig;
use crate::constants::api::{NOMINATIM_SEARCH_URL, USER_AGENT};
use crate::constants::autocomplete::{COUNTRY_CODES, SUGGESTION_LIMIT};
use crate::error::{Error, Result};
use crate::geo::{Suggestion, SuggestionSource};
use tracing::debug;

/// Nominatim suggestion backend
#[derive(Debug, Clone)]
pub struct NominatimSearch {
    client: reqwest::Client,
    endpoint: String,
    country_codes: String,
    limit: usize,
}

impl NominatimSearch {
    /// Create a backend against the public Nominatim instance
    pub fn new() -> Result<Self> {
        Self::with_endpoint(NOMINATIM_SEARCH_URL, COUNTRY_CODES, SUGGESTION_LIMIT, USER_AGENT)
    }

    /// Create a backend from the `[search]` config section
    ///
    /// The suggestion limit is kept between 1 and the default cap.
    pub fn from_config(config: &SearchConfig) -> Result<Self> {
        Self::with_endpoint(
            &config.endpoint,
            &config.country_codes,
            config.limit.clamp(1, SUGGESTION_LIMIT),
            &config.user_agent,
        )
    }

    /// Create a backend against an explicit endpoint
    pub fn with_endpoint(
        endpoint: &str,
        country_codes: &str,
        limit: usize,
        user_agent: &str,
    ) -> Result<Self> {
        let client = reqwest::Client::builder().user_agent(user_agent).build()?;

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
            country_codes: country_codes.to_string(),
            limit,
        })
    }

    /// Build the full request URL for a query
    fn search_url(&self, query: &str) -> String {
        format!(
            "{}?q={}&format=json&addressdetails=1&limit={}&countrycodes={}",
            self.endpoint,
            urlencoding::encode(query),
            self.limit,
            urlencoding::encode(&self.country_codes)
        )
    }
}

impl SuggestionSource for NominatimSearch {
    async fn search(&self, query: &str) -> Result<Vec<Suggestion>> {
        let url = self.search_url(query);
        debug!(query, "requesting suggestions");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::SuggestionFetch(format!("Nominatim request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::SuggestionFetch(format!(
                "Nominatim returned status: {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| Error::SuggestionFetch(format!("Failed to parse Nominatim response: {}", e)))
    }
}
