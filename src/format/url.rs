//! Map URL output formatter

use crate::autocomplete::Snapshot;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::format::OutputFormatter;

/// URL formatter - outputs a map link for the resolved coordinate
#[derive(Debug, Default)]
pub struct UrlFormatter {
    /// Provider name; None uses `url.default`
    pub provider: Option<String>,
}

impl UrlFormatter {
    pub fn with_provider(provider: impl Into<String>) -> Self {
        Self {
            provider: Some(provider.into()),
        }
    }
}

impl OutputFormatter for UrlFormatter {
    fn name(&self) -> &str {
        "url"
    }

    fn description(&self) -> &str {
        "Map link for the resolved location"
    }

    fn format(&self, snapshot: &Snapshot, config: &Config) -> Result<String> {
        let coords = snapshot.coordinates.ok_or_else(|| {
            Error::Resolution(format!("No coordinates resolved for '{}'", snapshot.query))
        })?;

        config.format_url(self.provider.as_deref(), coords.lat, coords.lng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::Coordinates;
    use crate::format::fixtures::resolved_snapshot;

    #[test]
    fn test_url_format_default_provider() {
        let snapshot = resolved_snapshot(Some(Coordinates::new(-23.5, -46.6)));
        let output = UrlFormatter::default()
            .format(&snapshot, &Config::default())
            .unwrap();

        assert!(output.starts_with("https://www.openstreetmap.org/"));
        assert!(output.contains("mlat=-23.5"));
    }

    #[test]
    fn test_url_format_with_provider() {
        let snapshot = resolved_snapshot(Some(Coordinates::new(-23.5, -46.6)));
        let output = UrlFormatter::with_provider("google")
            .format(&snapshot, &Config::default())
            .unwrap();

        assert_eq!(output, "https://www.google.com/maps/@-23.5,-46.6,13z");
    }

    #[test]
    fn test_url_format_unresolved() {
        let snapshot = resolved_snapshot(None);
        let result = UrlFormatter::default().format(&snapshot, &Config::default());
        assert!(matches!(result, Err(Error::Resolution(_))));
    }
}
