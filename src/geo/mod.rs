//! Address search and geocoding
//!
//! Two external services back the autocomplete flow: an address-search
//! service that turns partial input into candidate labels, and a
//! geocoding service that turns a full label into coordinates.

#[cfg(test)]
pub(crate) mod fake;
pub mod nominatim;
pub mod opencage;

use crate::coord::Coordinates;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::future::Future;
use tracing::{debug, warn};

/// One candidate location returned by the address-search service
///
/// Only `display_name` is interpreted. Everything else the service sends
/// (structured address, ids, bounding box) rides along in `details`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Human-readable label
    pub display_name: String,

    /// Opaque pass-through fields
    #[serde(flatten)]
    pub details: serde_json::Map<String, serde_json::Value>,
}

impl Suggestion {
    /// Create a suggestion with no extra details
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            details: serde_json::Map::new(),
        }
    }
}

/// Trait for address-search backends
pub trait SuggestionSource: Send + Sync {
    /// Search for candidate addresses matching free text
    ///
    /// The returned list is the service's result array, unfiltered and in
    /// the order the service produced it.
    fn search(&self, query: &str) -> impl Future<Output = Result<Vec<Suggestion>>> + Send;
}

/// Trait for geocoding backends
pub trait Geocoder: Send + Sync {
    /// Geocode an address label to coordinates
    ///
    /// Returns the first result's geometry, or None when the service has
    /// no result for the label.
    fn geocode(&self, address: &str) -> impl Future<Output = Result<Option<Coordinates>>> + Send;
}

/// Whether a query is long enough to be sent to the search service
pub fn is_searchable(query: &str, min_query_len: usize) -> bool {
    query.chars().count() >= min_query_len
}

/// Fetch suggestions for a query
///
/// Queries shorter than `min_query_len` characters yield an empty list
/// without touching the network. Errors are returned to the caller; the
/// autocomplete controller decides what a failure means for its state.
pub async fn fetch_suggestions<S: SuggestionSource>(
    source: &S,
    query: &str,
    min_query_len: usize,
) -> Result<Vec<Suggestion>> {
    if !is_searchable(query, min_query_len) {
        debug!(query, "query below search threshold, skipping request");
        return Ok(Vec::new());
    }

    source.search(query).await
}

/// Resolve an address label to coordinates
///
/// Every failure mode (transport, status, payload, zero results) collapses
/// to `None` and is logged. Nothing is raised to the caller.
pub async fn resolve_coordinates<G: Geocoder>(geocoder: &G, address: &str) -> Option<Coordinates> {
    match geocoder.geocode(address).await {
        Ok(Some(coords)) => Some(coords),
        Ok(None) => {
            warn!(address, "no coordinates found for address");
            None
        }
        Err(e) => {
            warn!(address, error = %e, "coordinate lookup failed");
            None
        }
    }
}
