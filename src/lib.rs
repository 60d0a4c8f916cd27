//! addrpin: Address Autocomplete and Geocoding
//!
//! A library and CLI tool that turns free-text address input into
//! suggestions, lets one be selected, resolves it to coordinates and keeps
//! a single map marker on the result.
//!
//! ## Features
//!
//! - Nominatim address suggestions (country-filtered, capped at 5)
//! - OpenCage geocoding of the selected label
//! - Autocomplete controller with optional map view
//! - Request sequencing for overlapping responses
//! - HTTP API + CLI interface
//!
//! ## Quick Start
//!
//! ```no_run
//! use addrpin::autocomplete::{Autocomplete, Settings};
//! use addrpin::geo::nominatim::NominatimSearch;
//! use addrpin::geo::opencage::OpenCageGeocoder;
//! use addrpin::map::MapOptions;
//!
//! # async fn demo() -> addrpin::Result<()> {
//! let search = NominatimSearch::new()?;
//! let geocoder = OpenCageGeocoder::new("your-opencage-key")?;
//! let mut component = Autocomplete::with_map(Settings::default(), MapOptions::default());
//!
//! component.focus();
//! component.input(&search, "Av Paulista").await;
//! component.choose(&geocoder, 0).await?;
//!
//! if let Some(coords) = component.coordinates() {
//!     println!("Latitude: {}, Longitude: {}", coords.lat, coords.lng);
//! }
//! # Ok(())
//! # }
//! ```

pub mod autocomplete;
pub mod cli;
pub mod config;
pub mod constants;
pub mod coord;
pub mod error;
pub mod format;
pub mod geo;
pub mod map;
pub mod server;

// Re-export commonly used types
pub use autocomplete::{Autocomplete, ResponseOrdering, Settings, Snapshot};
pub use config::Config;
pub use coord::Coordinates;
pub use error::{Error, Result};
pub use geo::{Geocoder, Suggestion, SuggestionSource};
