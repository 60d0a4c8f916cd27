//! Address autocomplete controller
//!
//! [`Autocomplete`] owns the component state: the query text, the latest
//! suggestion list, the list's visibility flag, the resolved coordinate
//! and, for the map variant, the [`MapView`].
//!
//! Network work is split from state changes. `set_query` and `select`
//! mutate state synchronously and hand back a ticket; the ticket runs the
//! request without borrowing the controller; `apply_suggestions` and
//! `apply_resolution` fold the outcome back in. Callers that can hold
//! `&mut self` across the request use `input` and `choose` instead.
//!
//! Failure handling is intentionally asymmetric: a failed search leaves
//! the previous suggestions in place, a failed resolution clears the
//! coordinate.

mod settings;

pub use settings::{ResponseOrdering, Settings};

use crate::coord::Coordinates;
use crate::error::{Error, Result};
use crate::geo::{fetch_suggestions, is_searchable, resolve_coordinates, Geocoder, Suggestion, SuggestionSource};
use crate::map::{MapOptions, MapView};
use serde::Serialize;
use tracing::{debug, warn};

/// Monotonic request counter for one kind of request
#[derive(Debug, Default)]
struct Sequence {
    issued: u64,
}

impl Sequence {
    fn issue(&mut self) -> u64 {
        self.issued += 1;
        self.issued
    }

    fn is_latest(&self, seq: u64) -> bool {
        seq == self.issued
    }
}

/// An issued address search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    seq: u64,
    query: String,
    min_query_len: usize,
}

impl SearchTicket {
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Run the search against `source`
    pub async fn run<S: SuggestionSource>(&self, source: &S) -> Result<Vec<Suggestion>> {
        fetch_suggestions(source, &self.query, self.min_query_len).await
    }
}

/// An issued coordinate lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveTicket {
    seq: u64,
    address: String,
}

impl ResolveTicket {
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Run the lookup against `geocoder`; failures come back as `None`
    pub async fn run<G: Geocoder>(&self, geocoder: &G) -> Option<Coordinates> {
        resolve_coordinates(geocoder, &self.address).await
    }
}

/// Point-in-time copy of the component state
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub query: String,
    pub suggestions: Vec<Suggestion>,
    pub suggestions_visible: bool,
    pub coordinates: Option<Coordinates>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub map: Option<MapView>,
}

impl Snapshot {
    /// Suggestions as they would be rendered (empty while hidden)
    pub fn visible_suggestions(&self) -> &[Suggestion] {
        if self.suggestions_visible {
            &self.suggestions
        } else {
            &[]
        }
    }
}

/// Address autocomplete component
#[derive(Debug)]
pub struct Autocomplete {
    settings: Settings,
    query: String,
    suggestions: Vec<Suggestion>,
    show_suggestions: bool,
    coordinates: Option<Coordinates>,
    map: Option<MapView>,
    searches: Sequence,
    resolutions: Sequence,
}

impl Autocomplete {
    /// Mount the variant without a map; the coordinate starts unresolved
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            query: String::new(),
            suggestions: Vec::new(),
            show_suggestions: false,
            coordinates: None,
            map: None,
            searches: Sequence::default(),
            resolutions: Sequence::default(),
        }
    }

    /// Mount the map variant; the coordinate starts at the map centre
    pub fn with_map(settings: Settings, options: MapOptions) -> Self {
        let center = options.center;
        Self {
            coordinates: Some(center),
            map: Some(MapView::mount(options)),
            ..Self::new(settings)
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// The full suggestion list, regardless of visibility
    pub fn suggestions(&self) -> &[Suggestion] {
        &self.suggestions
    }

    /// Whether the suggestion list is rendered
    pub fn is_list_visible(&self) -> bool {
        self.show_suggestions && !self.suggestions.is_empty()
    }

    /// Suggestions as they would be rendered (empty while hidden)
    pub fn visible_suggestions(&self) -> &[Suggestion] {
        if self.is_list_visible() {
            &self.suggestions
        } else {
            &[]
        }
    }

    pub fn coordinates(&self) -> Option<Coordinates> {
        self.coordinates
    }

    pub fn map(&self) -> Option<&MapView> {
        self.map.as_ref()
    }

    /// Handle a text change
    ///
    /// The query is updated immediately. Short queries clear the list and
    /// return no ticket; anything else returns a search to run. Visibility
    /// is left alone.
    pub fn set_query(&mut self, text: impl Into<String>) -> Option<SearchTicket> {
        self.query = text.into();
        let seq = self.searches.issue();

        if !is_searchable(&self.query, self.settings.min_query_len) {
            self.suggestions.clear();
            return None;
        }

        debug!(seq, query = %self.query, "search issued");
        Some(SearchTicket {
            seq,
            query: self.query.clone(),
            min_query_len: self.settings.min_query_len,
        })
    }

    /// Handle focus on the input
    pub fn focus(&mut self) {
        self.show_suggestions = true;
    }

    /// Select the suggestion at `index`
    ///
    /// The query becomes the suggestion's label and the list is hidden
    /// before any lookup happens, so both stick whatever the lookup does.
    pub fn select(&mut self, index: usize) -> Result<ResolveTicket> {
        let label = self
            .suggestions
            .get(index)
            .map(|s| s.display_name.clone())
            .ok_or(Error::InvalidSelection(index))?;

        self.query = label.clone();
        self.show_suggestions = false;

        let seq = self.resolutions.issue();
        debug!(seq, address = %label, "resolution issued");
        Ok(ResolveTicket { seq, address: label })
    }

    /// Fold a finished search into the state
    ///
    /// Returns true if the suggestion list was replaced. Failures are
    /// logged and leave the previous list untouched.
    pub fn apply_suggestions(
        &mut self,
        ticket: &SearchTicket,
        outcome: Result<Vec<Suggestion>>,
    ) -> bool {
        if self.is_stale(&self.searches, ticket.seq) {
            debug!(seq = ticket.seq, query = %ticket.query, "discarding stale suggestions");
            return false;
        }

        match outcome {
            Ok(suggestions) => {
                self.suggestions = suggestions;
                true
            }
            Err(e) => {
                warn!(query = %ticket.query, error = %e, "failed to fetch suggestions");
                false
            }
        }
    }

    /// Fold a finished lookup into the state
    ///
    /// Any outcome that is not discarded as stale overwrites the
    /// coordinate. On the map variant a resolved coordinate moves the
    /// marker and an unresolved one removes it.
    pub fn apply_resolution(&mut self, ticket: &ResolveTicket, outcome: Option<Coordinates>) -> bool {
        if self.is_stale(&self.resolutions, ticket.seq) {
            debug!(seq = ticket.seq, address = %ticket.address, "discarding stale resolution");
            return false;
        }

        self.coordinates = outcome;
        if let Some(map) = self.map.as_mut() {
            match outcome {
                Some(coords) => map.show(coords),
                None => {
                    map.clear_marker();
                }
            }
        }
        true
    }

    /// Type `text` and wait for its suggestions
    pub async fn input<S: SuggestionSource>(&mut self, source: &S, text: impl Into<String>) {
        if let Some(ticket) = self.set_query(text) {
            let outcome = ticket.run(source).await;
            self.apply_suggestions(&ticket, outcome);
        }
    }

    /// Select the suggestion at `index` and wait for its coordinates
    ///
    /// Only an out-of-range index is an error; lookup failures end up as
    /// an unresolved coordinate.
    pub async fn choose<G: Geocoder>(&mut self, geocoder: &G, index: usize) -> Result<()> {
        let ticket = self.select(index)?;
        let outcome = ticket.run(geocoder).await;
        self.apply_resolution(&ticket, outcome);
        Ok(())
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            query: self.query.clone(),
            suggestions: self.suggestions.clone(),
            suggestions_visible: self.is_list_visible(),
            coordinates: self.coordinates,
            map: self.map.clone(),
        }
    }

    /// Tear the component down, disposing of the map if there is one
    pub fn unmount(self) {
        if let Some(map) = self.map {
            map.unmount();
        }
    }

    fn is_stale(&self, sequence: &Sequence, seq: u64) -> bool {
        match self.settings.ordering {
            ResponseOrdering::LatestRequest => !sequence.is_latest(seq),
            ResponseOrdering::LastArrival => false,
        }
    }
}
