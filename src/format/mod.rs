//! Output formatters
//!
//! Provides trait-based rendering of an autocomplete [`Snapshot`].

pub mod json;
pub mod text;
pub mod url;

use crate::autocomplete::Snapshot;
use crate::config::Config;
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Information about an output format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormatInfo {
    /// Format name
    pub name: String,
    /// Format description
    pub description: String,
}

/// Trait for output formatters
pub trait OutputFormatter: Send + Sync {
    /// Get the format name
    fn name(&self) -> &str;

    /// Get the format description
    fn description(&self) -> &str;

    /// Format a component snapshot
    fn format(&self, snapshot: &Snapshot, config: &Config) -> Result<String>;
}

/// Get a formatter by name
pub fn get_formatter(name: &str) -> Option<Box<dyn OutputFormatter>> {
    match name.to_lowercase().as_str() {
        "json" => Some(Box::new(json::JsonFormatter)),
        "text" => Some(Box::new(text::TextFormatter)),
        "url" => Some(Box::new(url::UrlFormatter::default())),
        _ => None,
    }
}

/// List all available formatters
pub fn available_formats() -> Vec<FormatInfo> {
    let formatters: [Box<dyn OutputFormatter>; 3] = [
        Box::new(json::JsonFormatter),
        Box::new(text::TextFormatter),
        Box::new(url::UrlFormatter::default()),
    ];

    formatters
        .iter()
        .map(|f| FormatInfo {
            name: f.name().to_string(),
            description: f.description().to_string(),
        })
        .collect()
}
