//! Error types for fetching and extracting the ticket page

use thiserror::Error;

/// Errors that can occur during HTTP fetching operations
#[derive(Error, Debug)]
pub enum FetchError {
    /// HTTP request error
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success status code
    #[error("Server responded with status {0}")]
    ServerError(u16),

    /// Request timeout
    #[error("Request timeout")]
    Timeout,

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// Errors raised when the page does not have the expected structure
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// No match blocks at all, usually an error page or a redesign
    #[error("No match blocks found on the ticket page")]
    NoMatchBlocks,

    /// A tracked team is not listed in any match block
    #[error("Event '{name}' not found on the ticket page")]
    EntityNotFound { name: String },
}
