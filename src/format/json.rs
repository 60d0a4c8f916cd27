//! JSON output formatter

use crate::autocomplete::Snapshot;
use crate::config::Config;
use crate::error::Result;
use crate::format::OutputFormatter;

/// JSON formatter - outputs the full snapshot as pretty-printed JSON
pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn name(&self) -> &str {
        "json"
    }

    fn description(&self) -> &str {
        "Full component state as JSON"
    }

    fn format(&self, snapshot: &Snapshot, _config: &Config) -> Result<String> {
        Ok(serde_json::to_string_pretty(snapshot)?)
    }
}
