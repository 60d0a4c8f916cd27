//! Centralized constants for the addrpin crate
//!
//! Endpoints, map defaults and autocomplete thresholds shared by the
//! config defaults, the backends and the tests.

/// External API endpoints
pub mod api {
    /// OpenStreetMap Nominatim address search
    pub const NOMINATIM_SEARCH_URL: &str = "https://nominatim.openstreetmap.org/search";

    /// OpenCage forward geocoding
    pub const OPENCAGE_GEOCODE_URL: &str = "https://api.opencagedata.com/geocode/v1/json";

    /// User-Agent sent to Nominatim (required by its usage policy)
    pub const USER_AGENT: &str = concat!("addrpin/", env!("CARGO_PKG_VERSION"));
}

/// Autocomplete behaviour
pub mod autocomplete {
    /// Queries shorter than this (in characters) never reach the network
    pub const MIN_QUERY_LEN: usize = 3;

    /// Maximum number of suggestions requested from the search service
    pub const SUGGESTION_LIMIT: usize = 5;

    /// Country filter passed as `countrycodes`
    pub const COUNTRY_CODES: &str = "br";
}

/// Map presentation
pub mod map {
    /// Latitude of the initial view and marker
    pub const DEFAULT_LAT: f64 = -22.8722784;

    /// Longitude of the initial view and marker
    pub const DEFAULT_LNG: f64 = -46.0669339;

    /// Zoom used at mount and on every recentre
    pub const DEFAULT_ZOOM: u8 = 13;

    /// XYZ tile template
    pub const TILE_URL_TEMPLATE: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";

    /// Attribution required by the tile provider
    pub const TILE_ATTRIBUTION: &str =
        "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors";

    /// Subdomains substituted for `{s}`
    pub const TILE_SUBDOMAINS: &str = "abc";

    /// Popup shown on the marker placed at mount
    pub const INITIAL_POPUP: &str = "Initial location";
}
