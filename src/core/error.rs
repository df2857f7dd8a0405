//! Error handling - one hierarchy for the whole bot

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// market-bot error hierarchy
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Order-book fetch failed before a response arrived
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Snapshot was empty, lacked a negative-size entry, or could not be decoded
    #[error("Malformed order book: {0}")]
    MalformedBook(String),

    /// Socket and file IO
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid state
    #[error("Invalid state: {0}")]
    InvalidState(String),
}

impl Error {
    pub fn malformed(reason: impl Into<String>) -> Self {
        Error::MalformedBook(reason.into())
    }
}
