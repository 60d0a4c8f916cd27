//! CLI command handlers
//!
//! Each subcommand has its own module with handler functions.

pub mod config;
pub mod geocode;
pub mod pick;
pub mod search;
pub mod serve;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Address autocomplete and geocoding
#[derive(Parser)]
#[command(name = "addrpin")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List address suggestions for a query
    Search(search::SearchArgs),

    /// Resolve an address to coordinates
    Geocode(geocode::GeocodeArgs),

    /// Search, select a suggestion and resolve it
    Pick(pick::PickArgs),

    /// Start web server (foreground)
    Serve(serve::ServeArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

/// Run the CLI
pub async fn run() -> crate::error::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Search(args) => search::run(args).await,
        Commands::Geocode(args) => geocode::run(args).await,
        Commands::Pick(args) => pick::run(args).await,
        Commands::Serve(args) => serve::run(args).await,
        Commands::Config(args) => config::run(args),
    }
}

/// Initialize stderr logging, honouring RUST_LOG over `default_level`
pub(crate) fn init_logging(default_level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}
