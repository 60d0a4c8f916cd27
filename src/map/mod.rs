//! Map presentation model
//!
//! A headless stand-in for an interactive tile map: it owns the view
//! centre, zoom, tile layer and the single location marker. Rendering is
//! left to whatever front end reads a [`MapView`].
//!
//! The marker slot is an `Option`, so at most one marker can exist.
//! Placing a new one always takes the old one out first.

use crate::config::MapConfig;
use crate::constants::map::{
    DEFAULT_LAT, DEFAULT_LNG, DEFAULT_ZOOM, INITIAL_POPUP, TILE_ATTRIBUTION, TILE_SUBDOMAINS,
    TILE_URL_TEMPLATE,
};
use crate::coord::Coordinates;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// XYZ tile source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileLayer {
    /// Template with `{s}`, `{z}`, `{x}` and `{y}` placeholders
    pub url_template: String,
    /// Attribution text that must be displayed with the tiles
    pub attribution: String,
    /// Characters rotated into `{s}`
    pub subdomains: String,
}

impl TileLayer {
    /// Expand the template for one tile
    ///
    /// The subdomain rotates with `x + y` so neighbouring tiles spread
    /// across hosts.
    pub fn tile_url(&self, z: u8, x: u32, y: u32) -> String {
        let subdomain = if self.subdomains.is_empty() {
            String::new()
        } else {
            let chars: Vec<char> = self.subdomains.chars().collect();
            let index = (u64::from(x) + u64::from(y)) % chars.len() as u64;
            chars[index as usize].to_string()
        };

        self.url_template
            .replace("{s}", &subdomain)
            .replace("{z}", &z.to_string())
            .replace("{x}", &x.to_string())
            .replace("{y}", &y.to_string())
    }
}

impl Default for TileLayer {
    fn default() -> Self {
        Self {
            url_template: TILE_URL_TEMPLATE.to_string(),
            attribution: TILE_ATTRIBUTION.to_string(),
            subdomains: TILE_SUBDOMAINS.to_string(),
        }
    }
}

/// Popup attached to a marker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Popup {
    pub text: String,
    pub open: bool,
}

/// The single location annotation on the map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    /// Increases with every placement; a replaced marker never comes back
    pub id: u64,
    pub position: Coordinates,
    pub popup: Popup,
}

/// Options used once, at mount
#[derive(Debug, Clone, PartialEq)]
pub struct MapOptions {
    pub center: Coordinates,
    pub zoom: u8,
    pub tiles: TileLayer,
    pub initial_popup: String,
}

impl MapOptions {
    /// Build options from the `[map]` config section
    ///
    /// An out-of-range centre falls back to the default one.
    pub fn from_config(config: &MapConfig) -> Self {
        let mut center = Coordinates::new(config.lat, config.lng);
        if let Err(e) = center.validate() {
            warn!(error = %e, "invalid map centre in config, using default");
            center = Coordinates::new(DEFAULT_LAT, DEFAULT_LNG);
        }

        Self {
            center,
            zoom: config.zoom,
            tiles: TileLayer {
                url_template: config.tile_url.clone(),
                attribution: config.attribution.clone(),
                subdomains: TILE_SUBDOMAINS.to_string(),
            },
            initial_popup: config.initial_popup.clone(),
        }
    }
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            center: Coordinates::new(DEFAULT_LAT, DEFAULT_LNG),
            zoom: DEFAULT_ZOOM,
            tiles: TileLayer::default(),
            initial_popup: INITIAL_POPUP.to_string(),
        }
    }
}

/// A mounted map view
#[derive(Debug, Clone, Serialize)]
pub struct MapView {
    center: Coordinates,
    zoom: u8,
    tiles: TileLayer,
    marker: Option<Marker>,
    #[serde(skip)]
    next_marker_id: u64,
}

impl MapView {
    /// Mount a map centred on `options.center` with the initial marker
    ///
    /// The initial marker carries the static popup text, opened.
    pub fn mount(options: MapOptions) -> Self {
        let mut view = Self {
            center: options.center,
            zoom: options.zoom,
            tiles: options.tiles,
            marker: None,
            next_marker_id: 1,
        };
        view.place_marker(options.center, options.initial_popup);
        debug!(center = %view.center, zoom = view.zoom, "map mounted");
        view
    }

    pub fn center(&self) -> Coordinates {
        self.center
    }

    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    pub fn tiles(&self) -> &TileLayer {
        &self.tiles
    }

    pub fn marker(&self) -> Option<&Marker> {
        self.marker.as_ref()
    }

    /// Show a resolved location
    ///
    /// Replaces the marker with one at `coords` whose popup is the literal
    /// coordinate pair, then recentres the view at the mount zoom.
    pub fn show(&mut self, coords: Coordinates) {
        self.place_marker(coords, format!("Coordinates: {}", coords));
        self.center = coords;
        debug!(center = %coords, "map recentred");
    }

    /// Remove the marker, leaving centre and zoom untouched
    pub fn clear_marker(&mut self) -> Option<Marker> {
        self.marker.take()
    }

    /// Dispose of the view
    pub fn unmount(mut self) {
        if let Some(marker) = self.marker.take() {
            debug!(marker = marker.id, "removing marker on unmount");
        }
        debug!("map unmounted");
    }

    fn place_marker(&mut self, position: Coordinates, popup_text: String) {
        if let Some(old) = self.marker.take() {
            debug!(marker = old.id, "removing previous marker");
        }

        let id = self.next_marker_id;
        self.next_marker_id += 1;
        self.marker = Some(Marker {
            id,
            position,
            popup: Popup {
                text: popup_text,
                open: true,
            },
        });
    }
}
