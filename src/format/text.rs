//! Human-readable text output formatter

use crate::autocomplete::Snapshot;
use crate::config::Config;
use crate::error::Result;
use crate::format::OutputFormatter;

/// Text formatter - outputs a human-readable summary
pub struct TextFormatter;

impl OutputFormatter for TextFormatter {
    fn name(&self) -> &str {
        "text"
    }

    fn description(&self) -> &str {
        "Human-readable text"
    }

    fn format(&self, snapshot: &Snapshot, _config: &Config) -> Result<String> {
        let mut output = String::new();

        output.push_str(&format!("Query: {}\n", snapshot.query));

        let visible = snapshot.visible_suggestions();
        if !visible.is_empty() {
            output.push_str("Suggestions:\n");
            for (i, suggestion) in visible.iter().enumerate() {
                output.push_str(&format!("  {}. {}\n", i + 1, suggestion.display_name));
            }
        }

        // An unresolved coordinate shows nothing rather than a placeholder
        if let Some(coords) = snapshot.coordinates {
            output.push_str("\nCoordinates:\n");
            output.push_str(&format!("  Latitude: {}\n", coords.lat));
            output.push_str(&format!("  Longitude: {}\n", coords.lng));
        }

        if let Some(map) = &snapshot.map {
            output.push_str(&format!("\nMap: centre ({}) zoom {}\n", map.center(), map.zoom()));
            if let Some(marker) = map.marker() {
                output.push_str(&format!("  Marker #{}: {}\n", marker.id, marker.popup.text));
            }
            output.push_str(&format!("  Tiles: {}\n", map.tiles().url_template));
        }

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::autocomplete::{Autocomplete, Settings};
    use crate::coord::Coordinates;
    use crate::geo::Suggestion;
    use crate::format::fixtures::resolved_snapshot;

    #[test]
    fn test_text_format_resolved() {
        let snapshot = resolved_snapshot(Some(Coordinates::new(-23.5, -46.6)));
        let output = TextFormatter.format(&snapshot, &Config::default()).unwrap();

        assert!(output.starts_with("Query: Av Paulista, São Paulo\n"));
        assert!(!output.contains("Suggestions:"));
        assert!(output.contains("Latitude: -23.5"));
        assert!(output.contains("Longitude: -46.6"));
        assert!(output.contains("Coordinates: -23.5, -46.6"));
    }

    #[test]
    fn test_text_format_unresolved_hides_coordinates() {
        let snapshot = resolved_snapshot(None);
        let output = TextFormatter.format(&snapshot, &Config::default()).unwrap();

        assert!(!output.contains("Latitude"));
        assert!(!output.contains("Marker"));
        assert!(output.contains("Map: centre"));
    }

    #[test]
    fn test_text_format_lists_visible_suggestions() {
        let mut component = Autocomplete::new(Settings::default());
        component.focus();
        let search = component.set_query("Av Paulista").unwrap();
        component.apply_suggestions(
            &search,
            Ok(vec![
                Suggestion::new("Av Paulista, São Paulo"),
                Suggestion::new("Av Paulista, Campinas"),
            ]),
        );

        let output = TextFormatter
            .format(&component.snapshot(), &Config::default())
            .unwrap();
        assert_eq!(
            output,
            "Query: Av Paulista\nSuggestions:\n  1. Av Paulista, São Paulo\n  2. Av Paulista, Campinas\n"
        );
    }

    #[test]
    fn test_text_formatter_info() {
        assert_eq!(TextFormatter.name(), "text");
        assert!(!TextFormatter.description().is_empty());
    }
}
