//! HTTP API routes
//!
//! Defines all REST API endpoints for the server.

use crate::autocomplete::Snapshot;
use crate::error::Error;
use crate::map::{MapOptions, TileLayer};
use crate::server::state::{mounted, AppState};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/status", get(status_handler))
        .route("/api/tiles", get(tiles_handler))
        .route("/api/sessions", post(create_session_handler))
        .route(
            "/api/sessions/:id",
            get(session_handler).delete(delete_session_handler),
        )
        .route("/api/sessions/:id/query", put(query_handler))
        .route("/api/sessions/:id/focus", post(focus_handler))
        .route("/api/sessions/:id/select", post(select_handler))
        .with_state(state)
}

/// API error response
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
    pub code: String,
    #[serde(skip)]
    pub status: StatusCode,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status, Json(self)).into_response()
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let (status, code) = match &err {
            Error::InvalidSelection(_) => (StatusCode::BAD_REQUEST, "INVALID_SELECTION"),
            Error::SessionNotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Error::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "CONFIG_ERROR"),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };
        ApiError {
            error: err.to_string(),
            code: code.to_string(),
            status,
        }
    }
}

/// Session state response
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub id: Uuid,
    #[serde(flatten)]
    pub state: Snapshot,
}

/// Create session request body
#[derive(Debug, Default, Deserialize)]
pub struct CreateSessionRequest {
    /// Mount the map variant
    #[serde(default)]
    pub map: bool,
}

/// Query update request body
#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    pub text: String,
}

/// Selection request body
#[derive(Debug, Deserialize)]
pub struct SelectRequest {
    pub index: usize,
}

/// Status response
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    /// Server is running
    pub running: bool,
    /// Server version
    pub version: String,
    /// Number of mounted sessions
    pub sessions: usize,
}

/// Server status endpoint
///
/// GET /api/status
async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    Json(StatusResponse {
        running: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
        sessions: state.session_count().await,
    })
}

/// Tile layer used by map sessions
///
/// GET /api/tiles
async fn tiles_handler(State(state): State<Arc<AppState>>) -> Json<TileLayer> {
    Json(MapOptions::from_config(&state.config.map).tiles)
}

/// Mount a component
///
/// POST /api/sessions
async fn create_session_handler(
    State(state): State<Arc<AppState>>,
    body: Option<Json<CreateSessionRequest>>,
) -> (StatusCode, Json<SessionResponse>) {
    let req = body.map(|Json(req)| req).unwrap_or_default();
    let (id, snapshot) = state.create_session(req.map).await;

    (StatusCode::CREATED, Json(SessionResponse { id, state: snapshot }))
}

/// Current component state
///
/// GET /api/sessions/:id
async fn session_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, ApiError> {
    let session = state.session(id).await?;
    let snapshot = mounted(&mut *session.lock().await, id)?.snapshot();
    Ok(Json(SessionResponse { id, state: snapshot }))
}

/// Unmount a component
///
/// DELETE /api/sessions/:id
async fn delete_session_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.remove_session(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Text change
///
/// PUT /api/sessions/:id/query
///
/// The session lock is released while the search runs, so overlapping
/// calls race and the session's ordering policy decides which wins. A
/// session unmounted in the meantime answers 404.
async fn query_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(req): Json<QueryRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
    let session = state.session(id).await?;

    let ticket = mounted(&mut *session.lock().await, id)?.set_query(req.text);
    let mut slot = match ticket {
        Some(ticket) => {
            let outcome = ticket.run(&state.search).await;
            let mut slot = session.lock().await;
            mounted(&mut slot, id)?.apply_suggestions(&ticket, outcome);
            slot
        }
        None => session.lock().await,
    };

    let snapshot = mounted(&mut slot, id)?.snapshot();
    Ok(Json(SessionResponse { id, state: snapshot }))
}

/// Input focus
///
/// POST /api/sessions/:id/focus
async fn focus_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, ApiError> {
    let session = state.session(id).await?;
    let mut slot = session.lock().await;
    let component = mounted(&mut slot, id)?;
    component.focus();
    Ok(Json(SessionResponse {
        id,
        state: component.snapshot(),
    }))
}

/// Suggestion selection
///
/// POST /api/sessions/:id/select
async fn select_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(req): Json<SelectRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
    let session = state.session(id).await?;

    let ticket = mounted(&mut *session.lock().await, id)?.select(req.index)?;
    let outcome = ticket.run(&state.geocoder).await;

    let mut slot = session.lock().await;
    let component = mounted(&mut slot, id)?;
    component.apply_resolution(&ticket, outcome);
    Ok(Json(SessionResponse {
        id,
        state: component.snapshot(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::geo::fake::{spawn_upstream, Recorded};
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use std::time::Duration;
    use tower::ServiceExt;

    struct Harness {
        app: Router,
        state: Arc<AppState>,
        searches: Recorded,
        geocodes: Recorded,
    }

    async fn harness(geocode_body: Value) -> Harness {
        let suggestions = json!([
            {"display_name": "Av Paulista, São Paulo", "osm_id": 1},
            {"display_name": "Av Paulista, Campinas", "osm_id": 2}
        ]);
        let (search_url, searches) = spawn_upstream("/search", StatusCode::OK, suggestions).await;
        let (geocode_url, geocodes) =
            spawn_upstream("/geocode/v1/json", StatusCode::OK, geocode_body).await;

        let mut config = Config::default();
        config.search.endpoint = search_url;
        config.geocode.endpoint = geocode_url;

        let state = Arc::new(AppState::new(config, Some("test-key")).unwrap());
        Harness {
            app: create_router(state.clone()),
            state,
            searches,
            geocodes,
        }
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn create(app: &Router, map: bool) -> String {
        let (status, body) = send(app, "POST", "/api/sessions", Some(json!({"map": map}))).await;
        assert_eq!(status, StatusCode::CREATED);
        body["id"].as_str().unwrap().to_string()
    }

    #[test]
    fn test_missing_key_fails_state() {
        assert!(matches!(
            AppState::new(Config::default(), None),
            Err(Error::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_status_endpoint() {
        let h = harness(json!({"results": []})).await;
        create(&h.app, false).await;

        let (status, body) = send(&h.app, "GET", "/api/status", None).await;
        assert_eq!(status, StatusCode::OK);

        let parsed: StatusResponse = serde_json::from_value(body).unwrap();
        assert!(parsed.running);
        assert_eq!(parsed.sessions, 1);
    }

    #[tokio::test]
    async fn test_tiles_endpoint() {
        let h = harness(json!({"results": []})).await;
        let (status, body) = send(&h.app, "GET", "/api/tiles", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["url_template"],
            "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png"
        );
        assert!(body["attribution"].as_str().unwrap().contains("OpenStreetMap"));
    }

    #[tokio::test]
    async fn test_create_session_variants() {
        let h = harness(json!({"results": []})).await;

        let (_, plain) = send(&h.app, "POST", "/api/sessions", Some(json!({}))).await;
        assert!(plain["coordinates"].is_null());
        assert!(plain.get("map").is_none());

        let (_, mapped) = send(&h.app, "POST", "/api/sessions", Some(json!({"map": true}))).await;
        assert_eq!(mapped["coordinates"]["lat"], -22.8722784);
        assert_eq!(mapped["map"]["marker"]["popup"]["text"], "Initial location");

        let (status, _) = send(&h.app, "POST", "/api/sessions", None).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(h.state.session_count().await, 3);
    }

    #[tokio::test]
    async fn test_end_to_end_flow() {
        let h = harness(json!({"results": [
            {"geometry": {"lat": -23.5, "lng": -46.6}},
            {"geometry": {"lat": 0.0, "lng": 0.0}}
        ]}))
        .await;
        let id = create(&h.app, true).await;
        let base = format!("/api/sessions/{}", id);

        // Short input never reaches the search service
        let (_, body) = send(&h.app, "PUT", &format!("{}/query", base), Some(json!({"text": "Av"}))).await;
        assert_eq!(body["query"], "Av");
        assert!(h.searches.lock().unwrap().is_empty());

        send(&h.app, "POST", &format!("{}/focus", base), None).await;
        let (status, body) = send(
            &h.app,
            "PUT",
            &format!("{}/query", base),
            Some(json!({"text": "Av Paulista"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["suggestions_visible"], true);
        assert_eq!(body["suggestions"][0]["display_name"], "Av Paulista, São Paulo");
        assert_eq!(body["suggestions"][1]["osm_id"], 2);
        {
            let searches = h.searches.lock().unwrap();
            assert_eq!(searches.len(), 1);
            assert_eq!(searches[0]["q"], "Av Paulista");
            assert_eq!(searches[0]["limit"], "5");
            assert_eq!(searches[0]["countrycodes"], "br");
        }

        let (status, body) =
            send(&h.app, "POST", &format!("{}/select", base), Some(json!({"index": 0}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["query"], "Av Paulista, São Paulo");
        assert_eq!(body["suggestions_visible"], false);
        assert_eq!(body["coordinates"]["lat"], -23.5);
        assert_eq!(body["coordinates"]["lng"], -46.6);
        assert_eq!(body["map"]["marker"]["position"]["lat"], -23.5);
        assert_eq!(body["map"]["marker"]["popup"]["text"], "Coordinates: -23.5, -46.6");

        let geocodes = h.geocodes.lock().unwrap();
        assert_eq!(geocodes.len(), 1);
        assert_eq!(geocodes[0]["q"], "Av Paulista, São Paulo");
        assert_eq!(geocodes[0]["key"], "test-key");
    }

    #[tokio::test]
    async fn test_select_with_no_results_clears_coordinates() {
        let h = harness(json!({"results": []})).await;
        let id = create(&h.app, true).await;
        let base = format!("/api/sessions/{}", id);

        send(&h.app, "PUT", &format!("{}/query", base), Some(json!({"text": "Av Paulista"}))).await;
        let (status, body) =
            send(&h.app, "POST", &format!("{}/select", base), Some(json!({"index": 1}))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["query"], "Av Paulista, Campinas");
        assert!(body["coordinates"].is_null());
        assert!(body["map"]["marker"].is_null());
    }

    #[tokio::test]
    async fn test_select_out_of_range() {
        let h = harness(json!({"results": []})).await;
        let id = create(&h.app, false).await;

        let (status, body) = send(
            &h.app,
            "POST",
            &format!("/api/sessions/{}/select", id),
            Some(json!({"index": 0})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_SELECTION");
        assert!(h.geocodes.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_session() {
        let h = harness(json!({"results": []})).await;
        let uri = format!("/api/sessions/{}", Uuid::new_v4());

        let (status, body) = send(&h.app, "GET", &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_expired_session_not_found() {
        let h = harness(json!({"results": []})).await;
        let stale = create(&h.app, true).await;

        assert_eq!(h.state.expire_idle(Duration::from_secs(60)).await, 0);
        let (status, _) = send(&h.app, "GET", &format!("/api/sessions/{}", stale), None).await;
        assert_eq!(status, StatusCode::OK);

        assert_eq!(h.state.expire_idle(Duration::ZERO).await, 1);
        let (status, body) = send(
            &h.app,
            "PUT",
            &format!("/api/sessions/{}/query", stale),
            Some(json!({"text": "Av Paulista"})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "NOT_FOUND");
        assert!(h.searches.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_session() {
        let h = harness(json!({"results": []})).await;
        let id = create(&h.app, true).await;
        let uri = format!("/api/sessions/{}", id);

        let (status, _) = send(&h.app, "DELETE", &uri, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(h.state.session_count().await, 0);

        let (status, _) = send(&h.app, "DELETE", &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
