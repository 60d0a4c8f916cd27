//! Pick command handler
//!
//! Drives one autocomplete component end to end: type the query, show
//! the list, select a suggestion, resolve it and print the result.

use crate::autocomplete::{Autocomplete, Settings};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::format::url::UrlFormatter;
use crate::format::{available_formats, get_formatter, OutputFormatter};
use crate::geo::nominatim::NominatimSearch;
use crate::geo::opencage::OpenCageGeocoder;
use crate::map::MapOptions;
use clap::Args;

/// Pick command arguments
#[derive(Args)]
pub struct PickArgs {
    /// Free-text address query
    pub query: String,

    /// Suggestion to select (as numbered by `search`)
    #[arg(long, short = 'i', default_value_t = 0)]
    pub index: usize,

    /// Run without the map view
    #[arg(long)]
    pub no_map: bool,

    /// OpenCage API key (overrides api_keys.opencage)
    #[arg(long)]
    pub api_key: Option<String>,

    /// Output format
    #[arg(long, short = 'f', default_value = "text")]
    pub format: String,

    /// Map link provider for the url format
    #[arg(long)]
    pub provider: Option<String>,

    /// List available formats
    #[arg(short = 'F', long = "list-formats")]
    pub list_formats: bool,
}

/// Run the pick command
pub async fn run(args: PickArgs) -> Result<()> {
    if args.list_formats {
        for format in available_formats() {
            println!("{:<6} {}", format.name, format.description);
        }
        return Ok(());
    }

    super::init_logging("warn");

    let config = Config::load()?;
    let formatter = formatter_for(&args.format, args.provider)?;
    let search = NominatimSearch::from_config(&config.search)?;
    let geocoder = OpenCageGeocoder::from_config(&config, args.api_key.as_deref())?;

    let settings = Settings::from_config(&config.search);
    let mut component = if args.no_map {
        Autocomplete::new(settings)
    } else {
        Autocomplete::with_map(settings, MapOptions::from_config(&config.map))
    };

    component.focus();
    component.input(&search, args.query.as_str()).await;
    if component.suggestions().is_empty() {
        return Err(Error::SuggestionFetch(format!(
            "No suggestions for '{}'",
            args.query
        )));
    }

    component.choose(&geocoder, args.index).await?;

    let output = formatter.format(&component.snapshot(), &config)?;
    println!("{}", output.trim_end());

    component.unmount();
    Ok(())
}

fn formatter_for(name: &str, provider: Option<String>) -> Result<Box<dyn OutputFormatter>> {
    if let Some(provider) = provider {
        if name.eq_ignore_ascii_case("url") {
            return Ok(Box::new(UrlFormatter::with_provider(provider)));
        }
    }

    get_formatter(name).ok_or_else(|| Error::Config(format!("Unknown output format: {}", name)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formatter_for() {
        assert_eq!(formatter_for("json", None).unwrap().name(), "json");
        assert_eq!(formatter_for("URL", Some("google".into())).unwrap().name(), "url");
        assert!(formatter_for("gpx", None).is_err());
    }
}
