//! Unified error type for winevino.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("Catalog server returned {status} for {url}")]
    HttpStatus { status: u16, url: String },

    #[error("Catalog fetch timed out after {secs}s")]
    Timeout { secs: u64 },

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Invalid personal score {0}: must be between 0 and 5")]
    InvalidScore(i64),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("A catalog load is already in flight")]
    LoadInFlight,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True for failures of the remote fetch itself (transport, status, timeout).
    pub fn is_network(&self) -> bool {
        matches!(
            self,
            Error::Http(_) | Error::HttpStatus { .. } | Error::Timeout { .. }
        )
    }
}
