//! addrpin CLI entry point
//!
//! Address autocomplete and geocoding - CLI + web API

use addrpin::cli;

#[tokio::main]
async fn main() {
    if let Err(e) = cli::run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
