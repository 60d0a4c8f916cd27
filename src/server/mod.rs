//! HTTP server for addrpin
//!
//! Exposes autocomplete sessions over a small JSON API so a browser
//! front end can drive the component.

pub mod routes;
pub mod state;

use crate::config::Config;
use crate::error::{Error, Result};
use routes::create_router;
use state::AppState;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{debug, info};

/// Upper bound on the time between idle-session sweeps
const MAX_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Start the HTTP server
///
/// # Arguments
/// * `config` - Server configuration
/// * `api_key` - Geocoding key overriding `api_keys.opencage`
///
/// # Returns
/// Never returns unless the server shuts down
pub async fn run(config: Config, api_key: Option<&str>) -> Result<()> {
    let addr: SocketAddr = config
        .server_addr()
        .parse()
        .map_err(|e| Error::Server(format!("Invalid server address: {}", e)))?;

    let state = Arc::new(AppState::new(config, api_key)?);
    if let Some(ttl) = state.session_ttl() {
        tokio::spawn(sweep_idle_sessions(state.clone(), ttl));
    }
    let app = create_router(state);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| Error::Server(format!("Failed to bind to {}: {}", addr, e)))?;

    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| Error::Server(format!("Server error: {}", e)))?;

    Ok(())
}

/// Periodically unmount sessions idle for longer than `ttl`
async fn sweep_idle_sessions(state: Arc<AppState>, ttl: Duration) {
    let mut ticker = tokio::time::interval(ttl.min(MAX_SWEEP_INTERVAL));
    loop {
        ticker.tick().await;
        let expired = state.expire_idle(ttl).await;
        if expired > 0 {
            let remaining = state.session_count().await;
            debug!(expired, remaining, "swept idle sessions");
        }
    }
}
