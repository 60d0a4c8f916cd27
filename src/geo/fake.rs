//! Test doubles for the geo backends
//!
//! In-memory sources for controller tests, and a throwaway axum server
//! standing in for the remote HTTP services.

use crate::coord::Coordinates;
use crate::error::{Error, Result};
use crate::geo::{Geocoder, Suggestion, SuggestionSource};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

/// Suggestion source with a canned answer that records every query
pub(crate) struct FakeSearch {
    response: std::result::Result<Vec<Suggestion>, String>,
    calls: Mutex<Vec<String>>,
}

impl FakeSearch {
    pub(crate) fn returning(suggestions: Vec<Suggestion>) -> Self {
        Self {
            response: Ok(suggestions),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn failing() -> Self {
        Self {
            response: Err("connection refused".to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl SuggestionSource for FakeSearch {
    async fn search(&self, query: &str) -> Result<Vec<Suggestion>> {
        self.calls.lock().unwrap().push(query.to_string());
        self.response.clone().map_err(Error::SuggestionFetch)
    }
}

/// Geocoder with a canned answer that records every address
pub(crate) struct FakeGeocoder {
    response: std::result::Result<Option<Coordinates>, String>,
    calls: Mutex<Vec<String>>,
}

impl FakeGeocoder {
    pub(crate) fn returning(coords: Option<Coordinates>) -> Self {
        Self {
            response: Ok(coords),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn failing() -> Self {
        Self {
            response: Err("connection reset".to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl Geocoder for FakeGeocoder {
    async fn geocode(&self, address: &str) -> Result<Option<Coordinates>> {
        self.calls.lock().unwrap().push(address.to_string());
        self.response.clone().map_err(Error::Resolution)
    }
}

/// Decoded query strings received by a fake upstream
pub(crate) type Recorded = Arc<Mutex<Vec<HashMap<String, String>>>>;

#[derive(Clone)]
struct Canned {
    status: StatusCode,
    body: serde_json::Value,
    recorded: Recorded,
}

async fn canned_handler(
    State(canned): State<Canned>,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, Json<serde_json::Value>) {
    canned.recorded.lock().unwrap().push(params);
    (canned.status, Json(canned.body))
}

/// Serve a fixed JSON response at `path` on an ephemeral local port
///
/// Returns the full endpoint URL and the log of received query strings.
pub(crate) async fn spawn_upstream(
    path: &str,
    status: StatusCode,
    body: serde_json::Value,
) -> (String, Recorded) {
    let recorded: Recorded = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new().route(path, get(canned_handler)).with_state(Canned {
        status,
        body,
        recorded: recorded.clone(),
    });

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}{}", addr, path), recorded)
}
