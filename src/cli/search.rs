//! Search command handler
//!
//! Prints the suggestions the address-search service returns for a query.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::geo::nominatim::NominatimSearch;
use crate::geo::{fetch_suggestions, Suggestion};
use clap::Args;

/// Search command arguments
#[derive(Args)]
pub struct SearchArgs {
    /// Free-text address query
    pub query: String,

    /// Output format: text or json
    #[arg(long, short = 'f', default_value = "text")]
    pub format: String,
}

/// Run the search command
pub async fn run(args: SearchArgs) -> Result<()> {
    super::init_logging("warn");

    let config = Config::load()?;
    let source = NominatimSearch::from_config(&config.search)?;

    let suggestions = fetch_suggestions(&source, &args.query, config.search.min_query_len).await?;
    print!("{}", render(&suggestions, &args.format)?);
    Ok(())
}

/// Render a suggestion list in the requested format
fn render(suggestions: &[Suggestion], format: &str) -> Result<String> {
    match format.to_lowercase().as_str() {
        "json" => Ok(format!("{}\n", serde_json::to_string_pretty(suggestions)?)),
        "text" => Ok(suggestions
            .iter()
            .enumerate()
            .map(|(i, s)| format!("{}. {}\n", i, s.display_name))
            .collect()),
        other => Err(Error::Config(format!(
            "Unknown format for search: {} (expected text or json)",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_text_is_indexed_for_pick() {
        let suggestions = vec![
            Suggestion::new("Av Paulista, São Paulo"),
            Suggestion::new("Av Paulista, Campinas"),
        ];
        assert_eq!(
            render(&suggestions, "text").unwrap(),
            "0. Av Paulista, São Paulo\n1. Av Paulista, Campinas\n"
        );
    }

    #[test]
    fn test_render_json() {
        let output = render(&[Suggestion::new("Av Paulista")], "json").unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed[0]["display_name"], "Av Paulista");
    }

    #[test]
    fn test_render_empty_and_unknown() {
        assert_eq!(render(&[], "text").unwrap(), "");
        assert!(render(&[], "gpx").is_err());
    }
}
