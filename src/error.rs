//! Error types for addrpin

use thiserror::Error;

/// Main error type for addrpin operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Suggestion fetch failed: {0}")]
    SuggestionFetch(String),

    #[error("Coordinate resolution failed: {0}")]
    Resolution(String),

    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("No suggestion at index {0}")]
    InvalidSelection(usize),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Server error: {0}")]
    Server(String),

    #[error("Session not found: {0}")]
    SessionNotFound(String),
}

/// Result type alias for addrpin operations
pub type Result<T> = std::result::Result<T, Error>;
