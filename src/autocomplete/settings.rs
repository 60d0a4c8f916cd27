//! Controller settings
//!
//! The query threshold and the policy for overlapping responses.

use crate::config::SearchConfig;
use crate::constants::autocomplete::MIN_QUERY_LEN;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// How completed responses are matched against newer requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseOrdering {
    /// Only the response to the most recently issued request is applied
    #[default]
    LatestRequest,
    /// Every response is applied as it arrives; the last to finish wins
    LastArrival,
}

impl std::fmt::Display for ResponseOrdering {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LatestRequest => write!(f, "latest_request"),
            Self::LastArrival => write!(f, "last_arrival"),
        }
    }
}

impl std::str::FromStr for ResponseOrdering {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "latest_request" | "latest-request" | "latest" => Ok(Self::LatestRequest),
            "last_arrival" | "last-arrival" | "arrival" => Ok(Self::LastArrival),
            _ => Err(format!("Unknown response ordering: {}", s)),
        }
    }
}

/// Controller behaviour knobs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Shortest query (in characters) that triggers a search
    pub min_query_len: usize,
    pub ordering: ResponseOrdering,
}

impl Settings {
    /// Build settings from the `[search]` config section
    ///
    /// A threshold below the minimum is raised to it, so short queries
    /// never reach the search service.
    pub fn from_config(config: &SearchConfig) -> Self {
        if config.min_query_len < MIN_QUERY_LEN {
            warn!(
                configured = config.min_query_len,
                minimum = MIN_QUERY_LEN,
                "search.min_query_len too low, using minimum"
            );
        }

        Self {
            min_query_len: config.min_query_len.max(MIN_QUERY_LEN),
            ordering: config.ordering,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            min_query_len: MIN_QUERY_LEN,
            ordering: ResponseOrdering::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_ordering_parse() {
        assert_eq!(
            ResponseOrdering::from_str("latest_request").unwrap(),
            ResponseOrdering::LatestRequest
        );
        assert_eq!(
            ResponseOrdering::from_str("Last-Arrival").unwrap(),
            ResponseOrdering::LastArrival
        );
        assert!(ResponseOrdering::from_str("random").is_err());
    }

    #[test]
    fn test_ordering_display_matches_serde() {
        for ordering in [ResponseOrdering::LatestRequest, ResponseOrdering::LastArrival] {
            let json = serde_json::to_string(&ordering).unwrap();
            assert_eq!(json, format!("\"{}\"", ordering));
        }
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.min_query_len, 3);
        assert_eq!(settings.ordering, ResponseOrdering::LatestRequest);
    }

    #[test]
    fn test_from_config_raises_low_threshold() {
        let mut config = SearchConfig::default();
        config.min_query_len = 0;
        assert_eq!(Settings::from_config(&config).min_query_len, 3);

        config.min_query_len = 6;
        config.ordering = ResponseOrdering::LastArrival;
        let settings = Settings::from_config(&config);
        assert_eq!(settings.min_query_len, 6);
        assert_eq!(settings.ordering, ResponseOrdering::LastArrival);
    }
}
