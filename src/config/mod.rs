//! Configuration management
//!
//! Loads and saves configuration from XDG-compliant paths.
//! Config location: ~/.config/addrpin/config.toml

pub mod defaults;

use crate::autocomplete::ResponseOrdering;
use crate::constants::api::{NOMINATIM_SEARCH_URL, OPENCAGE_GEOCODE_URL, USER_AGENT};
use crate::constants::autocomplete::{COUNTRY_CODES, MIN_QUERY_LEN, SUGGESTION_LIMIT};
use crate::constants::map::{
    DEFAULT_LAT, DEFAULT_LNG, DEFAULT_ZOOM, INITIAL_POPUP, TILE_ATTRIBUTION, TILE_URL_TEMPLATE,
};
use crate::coord::Coordinates;
use crate::error::{Error, Result};
use defaults::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Address search settings
    #[serde(default)]
    pub search: SearchConfig,

    /// Geocoding settings
    #[serde(default)]
    pub geocode: GeocodeConfig,

    /// Map view settings
    #[serde(default)]
    pub map: MapConfig,

    /// Server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Map link settings
    #[serde(default)]
    pub url: UrlConfig,

    /// API keys for external services
    #[serde(default)]
    pub api_keys: ApiKeysConfig,
}

/// Address search settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Search endpoint
    #[serde(default = "default_search_endpoint")]
    pub endpoint: String,

    /// Comma-separated ISO country codes
    #[serde(default = "default_country_codes")]
    pub country_codes: String,

    /// Maximum number of suggestions
    #[serde(default = "default_limit")]
    pub limit: usize,

    /// Shortest query that triggers a search
    #[serde(default = "default_min_query_len")]
    pub min_query_len: usize,

    /// How overlapping responses are applied
    #[serde(default)]
    pub ordering: ResponseOrdering,

    /// User-Agent sent with search requests
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// Geocoding settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodeConfig {
    /// Geocoding endpoint
    #[serde(default = "default_geocode_endpoint")]
    pub endpoint: String,
}

/// Map view settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapConfig {
    /// Initial centre latitude
    #[serde(default = "default_lat")]
    pub lat: f64,

    /// Initial centre longitude
    #[serde(default = "default_lng")]
    pub lng: f64,

    /// Zoom level at mount and on recentre
    #[serde(default = "default_zoom")]
    pub zoom: u8,

    /// XYZ tile template
    #[serde(default = "default_tile_url")]
    pub tile_url: String,

    /// Tile attribution
    #[serde(default = "default_attribution")]
    pub attribution: String,

    /// Popup text of the initial marker
    #[serde(default = "default_initial_popup")]
    pub initial_popup: String,
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Idle seconds before a session is unmounted (0 keeps sessions forever)
    #[serde(default = "default_session_ttl")]
    pub session_ttl_secs: u64,
}

/// Map link settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UrlConfig {
    /// Default URL provider
    #[serde(default = "default_url_provider")]
    pub default: String,

    /// URL provider templates
    #[serde(default = "default_url_providers")]
    pub providers: HashMap<String, String>,
}

/// API keys for external services
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ApiKeysConfig {
    /// OpenCage geocoding API key
    #[serde(default)]
    pub opencage: String,
}

// Default value functions for serde
fn default_search_endpoint() -> String {
    NOMINATIM_SEARCH_URL.to_string()
}
fn default_country_codes() -> String {
    COUNTRY_CODES.to_string()
}
fn default_limit() -> usize {
    SUGGESTION_LIMIT
}
fn default_min_query_len() -> usize {
    MIN_QUERY_LEN
}
fn default_user_agent() -> String {
    USER_AGENT.to_string()
}
fn default_geocode_endpoint() -> String {
    OPENCAGE_GEOCODE_URL.to_string()
}
fn default_lat() -> f64 {
    DEFAULT_LAT
}
fn default_lng() -> f64 {
    DEFAULT_LNG
}
fn default_zoom() -> u8 {
    DEFAULT_ZOOM
}
fn default_tile_url() -> String {
    TILE_URL_TEMPLATE.to_string()
}
fn default_attribution() -> String {
    TILE_ATTRIBUTION.to_string()
}
fn default_initial_popup() -> String {
    INITIAL_POPUP.to_string()
}
fn default_host() -> String {
    DEFAULT_HOST.to_string()
}
fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_session_ttl() -> u64 {
    DEFAULT_SESSION_TTL_SECS
}
fn default_url_provider() -> String {
    DEFAULT_URL_PROVIDER.to_string()
}
fn default_url_providers() -> HashMap<String, String> {
    let mut providers = HashMap::new();
    providers.insert(
        "google".to_string(),
        "https://www.google.com/maps/@{lat},{lng},{zoom}z".to_string(),
    );
    providers.insert(
        "openstreetmap".to_string(),
        "https://www.openstreetmap.org/?mlat={lat}&mlon={lng}#map={zoom}/{lat}/{lng}".to_string(),
    );
    providers.insert(
        "apple".to_string(),
        "https://maps.apple.com/?ll={lat},{lng}&z={zoom}".to_string(),
    );
    providers
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: default_search_endpoint(),
            country_codes: default_country_codes(),
            limit: default_limit(),
            min_query_len: default_min_query_len(),
            ordering: ResponseOrdering::default(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for GeocodeConfig {
    fn default() -> Self {
        Self {
            endpoint: default_geocode_endpoint(),
        }
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            lat: default_lat(),
            lng: default_lng(),
            zoom: default_zoom(),
            tile_url: default_tile_url(),
            attribution: default_attribution(),
            initial_popup: default_initial_popup(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            session_ttl_secs: default_session_ttl(),
        }
    }
}

impl Default for UrlConfig {
    fn default() -> Self {
        Self {
            default: default_url_provider(),
            providers: default_url_providers(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join(APP_DIR_NAME))
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Load configuration from the default path
    ///
    /// Creates default config if file doesn't exist
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from `path`, creating it with defaults if missing
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)
                .map_err(|e| Error::Config(format!("Failed to read config file: {}", e)))?;

            toml::from_str(&content)
                .map_err(|e| Error::Config(format!("Failed to parse config file: {}", e)))
        } else {
            let config = Config::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to `path`
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                Error::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(path, content)
            .map_err(|e| Error::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Get a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns the value as a string, or None if not found
    pub fn get(&self, key: &str) -> Option<String> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["search", "endpoint"] => Some(self.search.endpoint.clone()),
            ["search", "country_codes"] => Some(self.search.country_codes.clone()),
            ["search", "limit"] => Some(self.search.limit.to_string()),
            ["search", "min_query_len"] => Some(self.search.min_query_len.to_string()),
            ["search", "ordering"] => Some(self.search.ordering.to_string()),
            ["search", "user_agent"] => Some(self.search.user_agent.clone()),

            ["geocode", "endpoint"] => Some(self.geocode.endpoint.clone()),

            ["map", "lat"] => Some(self.map.lat.to_string()),
            ["map", "lng"] => Some(self.map.lng.to_string()),
            ["map", "zoom"] => Some(self.map.zoom.to_string()),
            ["map", "tile_url"] => Some(self.map.tile_url.clone()),
            ["map", "attribution"] => Some(self.map.attribution.clone()),
            ["map", "initial_popup"] => Some(self.map.initial_popup.clone()),

            ["server", "host"] => Some(self.server.host.clone()),
            ["server", "port"] => Some(self.server.port.to_string()),
            ["server", "session_ttl_secs"] => Some(self.server.session_ttl_secs.to_string()),

            ["url", "default"] => Some(self.url.default.clone()),

            ["api_keys", "opencage"] => Some(self.api_keys.opencage.clone()),

            _ => None,
        }
    }

    /// Set a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns error if key is invalid or value type is wrong
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["search", "endpoint"] => self.search.endpoint = value.to_string(),
            ["search", "country_codes"] => self.search.country_codes = value.to_string(),
            ["search", "limit"] => {
                let limit: usize = parse_value(value, "limit")?;
                if !(1..=SUGGESTION_LIMIT).contains(&limit) {
                    return Err(Error::Config(format!(
                        "limit must be between 1 and {}",
                        SUGGESTION_LIMIT
                    )));
                }
                self.search.limit = limit;
            }
            ["search", "min_query_len"] => {
                let min_query_len: usize = parse_value(value, "min_query_len")?;
                if min_query_len < MIN_QUERY_LEN {
                    return Err(Error::Config(format!(
                        "min_query_len must be at least {}",
                        MIN_QUERY_LEN
                    )));
                }
                self.search.min_query_len = min_query_len;
            }
            ["search", "ordering"] => {
                self.search.ordering = value.parse().map_err(Error::Config)?;
            }
            ["search", "user_agent"] => self.search.user_agent = value.to_string(),

            ["geocode", "endpoint"] => self.geocode.endpoint = value.to_string(),

            ["map", "lat"] => {
                let lat = parse_value(value, "latitude")?;
                check_centre(lat, self.map.lng)?;
                self.map.lat = lat;
            }
            ["map", "lng"] => {
                let lng = parse_value(value, "longitude")?;
                check_centre(self.map.lat, lng)?;
                self.map.lng = lng;
            }
            ["map", "zoom"] => {
                self.map.zoom = parse_value(value, "zoom")?;
            }
            ["map", "tile_url"] => self.map.tile_url = value.to_string(),
            ["map", "attribution"] => self.map.attribution = value.to_string(),
            ["map", "initial_popup"] => self.map.initial_popup = value.to_string(),

            ["server", "host"] => self.server.host = value.to_string(),
            ["server", "port"] => {
                self.server.port = parse_value(value, "port")?;
            }
            ["server", "session_ttl_secs"] => {
                self.server.session_ttl_secs = parse_value(value, "session_ttl_secs")?;
            }

            ["url", "default"] => self.url.default = value.to_string(),

            ["api_keys", "opencage"] => self.api_keys.opencage = value.to_string(),

            _ => {
                return Err(Error::Config(format!("Unknown config key: {}", key)));
            }
        }

        Ok(())
    }

    /// List all available config keys
    pub fn available_keys() -> Vec<&'static str> {
        vec![
            "search.endpoint",
            "search.country_codes",
            "search.limit",
            "search.min_query_len",
            "search.ordering",
            "search.user_agent",
            "geocode.endpoint",
            "map.lat",
            "map.lng",
            "map.zoom",
            "map.tile_url",
            "map.attribution",
            "map.initial_popup",
            "server.host",
            "server.port",
            "server.session_ttl_secs",
            "url.default",
            "api_keys.opencage",
        ]
    }

    /// Format a map URL using the specified provider
    ///
    /// Replaces {lat}, {lng} and {zoom} placeholders with actual values
    pub fn format_url(&self, provider: Option<&str>, lat: f64, lng: f64) -> Result<String> {
        let provider_name = provider.unwrap_or(&self.url.default);

        let template = self.url.providers.get(provider_name).ok_or_else(|| {
            Error::Config(format!("Unknown URL provider: {}", provider_name))
        })?;

        Ok(template
            .replace("{lat}", &lat.to_string())
            .replace("{lng}", &lng.to_string())
            .replace("{zoom}", &self.map.zoom.to_string()))
    }

    /// Get server address as "host:port"
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn check_centre(lat: f64, lng: f64) -> Result<()> {
    Coordinates::new(lat, lng)
        .validate()
        .map_err(|e| Error::Config(format!("Invalid map centre: {}", e)))
}

fn parse_value<T: std::str::FromStr>(value: &str, what: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| Error::Config(format!("Invalid {} value: {}", what, value)))
}
