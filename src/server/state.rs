//! Server shared state
//!
//! Holds configuration, the upstream backends and the live component
//! sessions. Each session is an independent [`Autocomplete`] behind its
//! own lock. Sessions idle for longer than `server.session_ttl_secs` are
//! unmounted by [`AppState::expire_idle`].

use crate::autocomplete::{Autocomplete, Settings, Snapshot};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::geo::nominatim::NominatimSearch;
use crate::geo::opencage::OpenCageGeocoder;
use crate::map::MapOptions;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, RwLock};
use tracing::info;
use uuid::Uuid;

/// One mounted component; the slot is emptied when it is unmounted
pub type Session = Arc<Mutex<Option<Autocomplete>>>;

struct Entry {
    session: Session,
    last_used: Instant,
}

/// Shared state for the HTTP server
pub struct AppState {
    /// Configuration
    pub config: Config,

    /// Address-search backend
    pub search: NominatimSearch,

    /// Geocoding backend
    pub geocoder: OpenCageGeocoder,

    sessions: RwLock<HashMap<Uuid, Entry>>,
}

impl AppState {
    /// Create application state, building both backends from config
    pub fn new(config: Config, api_key: Option<&str>) -> Result<Self> {
        let search = NominatimSearch::from_config(&config.search)?;
        let geocoder = OpenCageGeocoder::from_config(&config, api_key)?;

        Ok(Self {
            config,
            search,
            geocoder,
            sessions: RwLock::new(HashMap::new()),
        })
    }

    /// Idle lifetime of a session, or `None` if sessions never expire
    pub fn session_ttl(&self) -> Option<Duration> {
        match self.config.server.session_ttl_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    /// Mount a new component and return its id with its initial state
    pub async fn create_session(&self, with_map: bool) -> (Uuid, Snapshot) {
        let settings = Settings::from_config(&self.config.search);
        let component = if with_map {
            Autocomplete::with_map(settings, MapOptions::from_config(&self.config.map))
        } else {
            Autocomplete::new(settings)
        };
        let snapshot = component.snapshot();

        let id = Uuid::new_v4();
        let entry = Entry {
            session: Arc::new(Mutex::new(Some(component))),
            last_used: Instant::now(),
        };
        self.sessions.write().await.insert(id, entry);
        info!(%id, with_map, "session mounted");
        (id, snapshot)
    }

    /// Look up a live session and mark it as used
    pub async fn session(&self, id: Uuid) -> Result<Session> {
        let mut sessions = self.sessions.write().await;
        let entry = sessions
            .get_mut(&id)
            .ok_or_else(|| Error::SessionNotFound(id.to_string()))?;
        entry.last_used = Instant::now();
        Ok(entry.session.clone())
    }

    /// Unmount and forget a session
    ///
    /// Waits for the component lock, so a request still holding the
    /// session finds an empty slot once it next locks it.
    pub async fn remove_session(&self, id: Uuid) -> Result<()> {
        let entry = self
            .sessions
            .write()
            .await
            .remove(&id)
            .ok_or_else(|| Error::SessionNotFound(id.to_string()))?;

        teardown(&entry.session).await;
        info!(%id, "session unmounted");
        Ok(())
    }

    /// Unmount every session unused for at least `max_idle`
    ///
    /// Returns the number of sessions removed.
    pub async fn expire_idle(&self, max_idle: Duration) -> usize {
        let expired: Vec<(Uuid, Session)> = {
            let mut sessions = self.sessions.write().await;
            let ids: Vec<Uuid> = sessions
                .iter()
                .filter(|(_, entry)| entry.last_used.elapsed() >= max_idle)
                .map(|(id, _)| *id)
                .collect();
            ids.into_iter()
                .filter_map(|id| sessions.remove(&id).map(|entry| (id, entry.session)))
                .collect()
        };

        for (id, session) in &expired {
            teardown(session).await;
            info!(%id, "idle session unmounted");
        }
        expired.len()
    }

    /// Number of live sessions
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

/// The component in a session slot, or `SessionNotFound` once unmounted
pub fn mounted(slot: &mut Option<Autocomplete>, id: Uuid) -> Result<&mut Autocomplete> {
    slot.as_mut()
        .ok_or_else(|| Error::SessionNotFound(id.to_string()))
}

async fn teardown(session: &Session) {
    if let Some(component) = session.lock().await.take() {
        component.unmount();
    }
}
