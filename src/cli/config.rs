//! Config command handler
//!
//! View and modify configuration settings.

use crate::config::Config;
use crate::error::{Error, Result};
use clap::Args;

/// Config command arguments
#[derive(Args)]
pub struct ConfigArgs {
    /// Configuration key (e.g., "search.country_codes")
    pub key: Option<String>,

    /// Value to set (if not provided, shows current value)
    pub value: Option<String>,

    /// Show config file path
    #[arg(long)]
    pub path: bool,

    /// Reset config to defaults
    #[arg(long)]
    pub reset: bool,
}

/// Run the config command
pub fn run(args: ConfigArgs) -> Result<()> {
    if args.path {
        println!("{}", Config::config_path()?.display());
        return Ok(());
    }

    if args.reset {
        Config::default().save()?;
        println!("Configuration reset to defaults");
        return Ok(());
    }

    let mut config = Config::load()?;

    match (&args.key, &args.value) {
        (None, None) => print!("{}", render_config(&config)),

        (Some(key), None) => {
            let value = config.get(key).ok_or_else(|| unknown_key(key))?;
            if key == "api_keys.opencage" {
                println!("{}", mask(&value));
            } else {
                println!("{}", value);
            }
        }

        (Some(key), Some(value)) => {
            config.set(key, value)?;
            config.save()?;
            if key == "api_keys.opencage" {
                println!("{} = {}", key, mask(value));
            } else {
                println!("{} = {}", key, value);
            }
        }

        (None, Some(_)) => {
            return Err(Error::Config("Must specify a key to set a value".to_string()));
        }
    }

    Ok(())
}

fn unknown_key(key: &str) -> Error {
    Error::Config(format!(
        "Unknown config key: {}\nAvailable keys:\n  {}",
        key,
        Config::available_keys().join("\n  ")
    ))
}

fn mask(secret: &str) -> &'static str {
    if secret.is_empty() {
        "\"\" # not configured"
    } else {
        "\"***\" # configured"
    }
}

/// Render every key as `key = value`, grouped by section
fn render_config(config: &Config) -> String {
    let mut output = String::new();
    let mut section = "";

    for key in Config::available_keys() {
        let (sect, name) = key.split_once('.').unwrap_or(("", key));
        if sect != section {
            if !section.is_empty() {
                output.push('\n');
            }
            output.push_str(&format!("[{}]\n", sect));
            section = sect;
        }

        let value = config.get(key).unwrap_or_default();
        if key == "api_keys.opencage" {
            output.push_str(&format!("{} = {}\n", name, mask(&value)));
        } else {
            output.push_str(&format!("{} = {:?}\n", name, value));
        }
    }

    let mut providers: Vec<_> = config.url.providers.iter().collect();
    providers.sort();
    output.push_str("\n[url.providers]\n");
    for (name, template) in providers {
        output.push_str(&format!("{} = {:?}\n", name, template));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_config_masks_key() {
        let mut config = Config::default();
        config.api_keys.opencage = "very-secret".to_string();

        let output = render_config(&config);
        assert!(output.contains("[search]"));
        assert!(output.contains("country_codes = \"br\""));
        assert!(output.contains("[url.providers]"));
        assert!(output.contains("opencage = \"***\" # configured"));
        assert!(!output.contains("very-secret"));
    }

    #[test]
    fn test_unknown_key_lists_available() {
        let err = unknown_key("nope");
        assert!(err.to_string().contains("search.ordering"));
    }
}
