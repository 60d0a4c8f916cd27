//! Geocode command handler

use crate::config::Config;
use crate::error::{Error, Result};
use crate::geo::opencage::OpenCageGeocoder;
use crate::geo::resolve_coordinates;
use clap::Args;

/// Geocode command arguments
#[derive(Args)]
pub struct GeocodeArgs {
    /// Full address label
    pub address: String,

    /// OpenCage API key (overrides api_keys.opencage)
    #[arg(long)]
    pub api_key: Option<String>,

    /// Print as JSON instead of text
    #[arg(long)]
    pub json: bool,
}

/// Run the geocode command
pub async fn run(args: GeocodeArgs) -> Result<()> {
    super::init_logging("warn");

    let config = Config::load()?;
    let geocoder = OpenCageGeocoder::from_config(&config, args.api_key.as_deref())?;

    let coords = resolve_coordinates(&geocoder, &args.address)
        .await
        .ok_or_else(|| Error::Resolution(format!("No coordinates found for '{}'", args.address)))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&coords)?);
    } else {
        println!("Latitude: {}", coords.lat);
        println!("Longitude: {}", coords.lng);
    }
    Ok(())
}
